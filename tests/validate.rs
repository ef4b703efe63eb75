//! Integration tests for the `validate` command.
use renewable_atlas::cli::handle_validate_command;
use renewable_atlas::log::{LOG_LEVEL_ENV_VAR, is_logger_initialised};
use renewable_atlas::settings::Settings;
use tempfile::tempdir;

mod common;
use common::write_dataset;

/// An integration test for the `validate` command.
///
/// We also check that the logger is initialised after it is run.
#[test]
fn test_handle_validate_command() {
    unsafe { std::env::set_var(LOG_LEVEL_ENV_VAR, "off") };

    let dir = tempdir().unwrap();
    write_dataset(dir.path());

    assert!(!is_logger_initialised());

    handle_validate_command(dir.path(), Some(Settings::default())).unwrap();

    assert!(is_logger_initialised());

    // A directory without data fails
    let empty = tempdir().unwrap();
    assert!(handle_validate_command(empty.path(), Some(Settings::default())).is_err());
}
