//! Conditions that halt execution without propagating a `Result` out of
//! [`Interpreter::step`](crate::Interpreter::step): `step`'s contract is
//! infallible by construction, so a trap is recorded on the interpreter
//! for a host to inspect via
//! [`Interpreter::last_trap`](crate::Interpreter::last_trap) rather than
//! returned.

use thiserror::Error;

/// a halting condition other than running off the end of `text` or
/// hitting `HALT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Trap {
    /// `IALOAD`/`IASTORE` with an index outside the array's logical
    /// length.
    #[error("array index {index} out of bounds for reference {reference} (len {len})")]
    ArrayIndexOutOfBounds { reference: i32, index: i32, len: usize },
    /// the program executed `ERR` explicitly.
    #[error("program executed ERR")]
    ExplicitError,
}
