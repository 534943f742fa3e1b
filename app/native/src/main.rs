#![allow(clippy::multiple_crate_versions)]

//! Spaces command-line interface.

fn main() {
    spaces_lib::init_logging();

    if let Err(err) = spaces_lib::cli::run() {
        eprintln!("spaces: {err}");
        std::process::exit(1);
    }
}
