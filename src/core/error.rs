// This module defines error types for the tmgen backend using the thiserror
// crate. CompileError is the main error enum covering the generator-fatal
// input shapes from the translation contract: opcodes the backend does not
// lower (LOAD/STORE/GETC and anything newer), jumps through a register, and
// arithmetic whose source and destination are the same register (the copy
// engine needs non-overlapping records). Structural protocol violations are
// deliberately NOT errors
// here: those are routed to the emitted machine's reject state and only
// surface at target run time. The module also provides CompileResult<T> as a
// convenience alias for Result<T, CompileError>.

//! Error types for the Turing machine backend.
//!
//! Using thiserror for more idiomatic error handling.

use thiserror::Error;

use crate::ir::Reg;

/// Main error type for IR-to-tape compilation.
///
/// Every variant is generator-fatal: translation stops immediately and no
/// partial transition table is usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("unsupported instruction: {mnemonic}")]
    UnsupportedInstruction { mnemonic: &'static str },

    #[error("indirect jump through a register is not supported")]
    IndirectJump,

    #[error("same-register arithmetic on {reg} is not supported")]
    SameRegisterArithmetic { reg: Reg },
}

/// Result type alias for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;
