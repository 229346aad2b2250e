//! Process exit codes.
//!
//! Library errors map through `SignerError::exit_code`: 1 for key and
//! configuration problems, 2 for malformed input, 3 for signing or
//! verification failures.

pub const SUCCESS: i32 = 0;
pub const ERROR: i32 = 1;
pub const SIGNATURE_MISMATCH: i32 = 4; // Signature checked and rejected
