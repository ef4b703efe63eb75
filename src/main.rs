//! Provides the main entry point to the program.
use human_panic::setup_panic;
use renewable_atlas::cli::run_cli;
use renewable_atlas::log::is_logger_initialised;

fn main() {
    setup_panic!();

    if let Err(err) = run_cli() {
        if is_logger_initialised() {
            ::log::error!("{err:?}");
        } else {
            eprintln!("Error: {err:?}");
        }

        // Terminate program, signalling an error
        std::process::exit(1);
    }
}
