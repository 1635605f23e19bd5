// This module serves as the central hub for tmgen's core infrastructure,
// providing the building blocks shared by every layer of the backend: the
// arena-based generation session (state allocation, the append-only rule
// table, comment interning, generation statistics) and the error types for
// generator-fatal input shapes. The emitter layers in `tape` all borrow a
// GenSession and push rules through it, so the session is the single piece
// of mutable state one compilation run touches.

//! Core generation infrastructure.
//!
//! # Key Components
//!
//! ## Session Management (`session`)
//! - Arena-based allocation using `bumpalo`
//! - Monotonic state allocation and the reject sink
//! - The append-only transition table under construction
//!
//! ## Error Handling (`error`)
//! - `CompileError` for generator-fatal input shapes
//! - `CompileResult<T>` alias used throughout the backend

pub mod error;
pub mod session;

// Re-export core components
pub use error::{CompileError, CompileResult};
pub use session::{GenSession, SessionStats};
