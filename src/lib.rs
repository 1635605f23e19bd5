//! tmgen - register-machine IR to single-tape Turing machine compilation.
//!
//! tmgen is a code-generation backend: it lowers a small register-machine
//! intermediate representation (six registers, byte-wide words, MOV/ADD/SUB
//! arithmetic, jumps, character output) into an equivalent program for a
//! single-tape Turing machine, expressed as a list of transition rules. The
//! register file, memory and instruction pointer are rebuilt out of
//! tape-scanning marker protocols plus a bit-serial ALU.
//!
//! # Primary Usage
//!
//! ```
//! use bumpalo::Bump;
//! use tmgen::ir::Module;
//!
//! let module = Module::parse("mov A, 72\nputc A\nexit\n").unwrap();
//! let arena = Bump::new();
//! let program = tmgen::compile(&arena, &module).unwrap();
//! println!("{program}");
//! ```
//!
//! # Architecture
//!
//! - [`ir`] - input IR model and its text parser
//! - [`core`] - shared infrastructure (session, errors)
//! - [`tape`] - target model and the emitter layers (primitives,
//!   navigation, copy engine, bit-serial ALU, program emitter)

pub mod core;
pub mod ir;
pub mod tape;

// Re-export the common entry points
pub use crate::core::{CompileError, CompileResult, GenSession, SessionStats};
pub use crate::tape::backend::compile;
pub use crate::tape::{CopyMode, Dir, Line, Rule, StateId, Symbol, TmProgram, WORD_SIZE};
