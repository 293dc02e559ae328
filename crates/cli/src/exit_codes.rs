//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                         |
//! |------|-------------------------------------------------|
//! | 0    | Success                                         |
//! | 1    | General error (unspecified)                     |
//! | 2    | CLI usage error (bad args)                      |
//! | 3    | Input file not found                            |
//! | 4    | Input file unreadable or not a table            |
//! | 5    | Timepoint column missing                        |
//! | 6    | Baseline or endline partition empty             |
//! | 7    | No usable name column                           |
//! | 8    | Output could not be written                     |
//! | 9    | Invalid config (bad TOML, threshold off scale)  |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Map it in `recon_exit_code` or `io_exit_code`

use namelink_io::IoError;
use namelink_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, flag values out of range.
/// clap also exits with this on parse failures.
pub const EXIT_USAGE: u8 = 2;

/// Input path does not exist.
pub const EXIT_INPUT_NOT_FOUND: u8 = 3;

/// Input exists but could not be read or parsed, or has an unknown extension.
pub const EXIT_INPUT_PARSE: u8 = 4;

/// The timepoint column named in config is absent from the input.
pub const EXIT_NO_TIMEPOINT: u8 = 5;

/// Baseline or endline group has no rows.
pub const EXIT_EMPTY_GROUP: u8 = 6;

/// Name-column detection failed, or the configured name column is absent.
pub const EXIT_NO_NAME_COLUMN: u8 = 7;

/// Output file could not be written.
pub const EXIT_WRITE: u8 = 8;

/// Config file unreadable, malformed, or invalid.
pub const EXIT_INVALID_CONFIG: u8 = 9;

/// Exit code for an engine error. `timepoint_column` tells a missing
/// timepoint column apart from a missing configured name column.
pub fn recon_exit_code(err: &ReconError, timepoint_column: &str) -> u8 {
    match err {
        ReconError::ConfigParse(_)
        | ReconError::ConfigValidation(_)
        | ReconError::InvalidThreshold(_) => EXIT_INVALID_CONFIG,
        ReconError::MissingColumn { column } if column == timepoint_column => EXIT_NO_TIMEPOINT,
        ReconError::MissingColumn { .. } | ReconError::NoSuitableColumn { .. } => {
            EXIT_NO_NAME_COLUMN
        }
        ReconError::EmptyGroup { .. } => EXIT_EMPTY_GROUP,
    }
}

pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::NotFound(_) => EXIT_INPUT_NOT_FOUND,
        IoError::Read { .. } | IoError::Parse { .. } | IoError::UnsupportedFormat(_) => {
            EXIT_INPUT_PARSE
        }
        IoError::Write { .. } => EXIT_WRITE,
    }
}
