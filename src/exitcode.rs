//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Graph or document is malformed, or the tree cannot be derived
pub const DATAERR: i32 = 65;

/// Graph file missing
pub const NOINPUT: i32 = 66;

/// Refusing to overwrite an existing graph
pub const CANTCREAT: i32 = 73;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
