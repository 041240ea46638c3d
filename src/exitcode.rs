//! Process exit codes, following BSD sysexits.h

/// Bad arguments or no command
pub const USAGE: i32 = 64;

/// Rejected unit data (level, parent or name)
pub const DATAERR: i32 = 65;

/// Referenced unit does not exist
pub const NOINPUT: i32 = 66;

/// Unit store could not be read or written
pub const UNAVAILABLE: i32 = 69;

/// Input/output error outside the store
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
