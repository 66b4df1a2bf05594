//! CLI Exit Code Registry
//!
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | Preference store error (unreadable, corrupt, unwritable) |
//! | 2    | Usage error (bad args, unknown key, unparsable value) |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Store error - the preferences file could not be read or written.
pub const EXIT_STORE: u8 = 1;

/// Usage error - bad arguments, unknown setting, value of the wrong type.
pub const EXIT_USAGE: u8 = 2;
