//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Description                                              |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | General error (unspecified)                              |
//! | 2    | Usage / invalid input (bad matching type, missing file)  |
//! | 3    | I/O error (cannot read config, cannot write output)      |
//! | 4    | Parse error (malformed or undecodable input table)       |
//! | 5    | Config error (bad TOML, failed validation)               |

use personid_engine::GroupError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unknown matching type, missing input file.
/// Matches clap's own exit code for argument errors.
pub const EXIT_USAGE: u8 = 2;

/// Cannot read the config file or write the output.
pub const EXIT_IO: u8 = 3;

/// Input table could not be parsed.
pub const EXIT_PARSE: u8 = 4;

/// Config file failed to parse or validate.
pub const EXIT_CONFIG: u8 = 5;

/// Map an engine error to its exit code.
pub fn group_exit_code(err: &GroupError) -> u8 {
    match err {
        GroupError::InvalidInput(_) | GroupError::FileNotFound(_) => EXIT_USAGE,
        GroupError::ConfigParse(_) | GroupError::ConfigValidation(_) => EXIT_CONFIG,
    }
}
