//! Opcode handlers, one module per instruction family, mirroring how the
//! reference runtime splits its `interpreter` module. Every handler takes
//! the whole [`Interpreter`](crate::Interpreter) and is responsible for
//! its own program-counter advance, since that amount (and whether it
//! happens at all on a precondition failure) varies per opcode.

pub mod arithmetic;
pub mod arrays;
pub mod calls;
pub mod control;
pub mod io;
pub mod locals;
