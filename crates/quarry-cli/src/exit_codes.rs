//! Process exit codes reported by `quarry`

/// Unexpected failure
pub const ERROR: i32 = 1;

/// A repository declaration was rejected
pub const CONFIG_ERROR: i32 = 2;

/// The local Maven repository could not be provisioned
pub const REPOSITORY_ERROR: i32 = 3;

/// A repositories file could not be read
pub const IO_ERROR: i32 = 5;
