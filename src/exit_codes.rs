//! Exit code constants for the promptloom CLI.
//!
//! - 0: Success
//! - 1: User error (bad arguments, malformed bindings)
//! - 2: Config failure (prompt documents unreadable or unparsable)
//! - 3: Lookup failure (unknown category, section, or prompt id)
//! - 4: Render failure (missing required variables, malformed template)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or malformed variable bindings.
pub const USER_ERROR: i32 = 1;

/// Config failure: prompt documents could not be read or parsed.
pub const CONFIG_FAILURE: i32 = 2;

/// Lookup failure: the requested category or prompt id did not resolve.
pub const LOOKUP_FAILURE: i32 = 3;

/// Render failure: missing required variables or a malformed template.
pub const RENDER_FAILURE: i32 = 4;
