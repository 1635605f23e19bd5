// This module defines the register-machine intermediate representation the
// backend consumes: six named registers, register/immediate operands, a
// typed instruction enum with one variant per opcode, and a Module holding
// the instruction list plus the initial memory image. The structures are
// produced externally (front end or the text parser in ir::parser) and read
// by the backend only; nothing here mutates after construction. Display
// implementations render instructions back in source syntax so the backend
// can echo them as comment lines in the transition table.

//! Register-machine IR consumed by the tape backend.
//!
//! # Text format
//!
//! ```text
//! ; comments run to end of line
//! .text
//! main:
//!     mov A, 72
//!     putc A
//!     exit
//! .data
//!     104 105 "!"
//! ```
//!
//! Each label opens a new basic block; the block index is the program
//! counter shared by every instruction in the block, and jump targets name
//! either a label or a block number.

use std::fmt;

pub mod parser;

pub use parser::{parse_module, ParseError};

/// One of the six machine registers, in canonical tape record order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    A,
    B,
    C,
    D,
    Bp,
    Sp,
}

impl Reg {
    /// Number of registers; the bootstrap emits one record per entry.
    pub const COUNT: usize = 6;

    /// All registers in record order.
    pub const ALL: [Reg; Self::COUNT] = [Reg::A, Reg::B, Reg::C, Reg::D, Reg::Bp, Reg::Sp];

    /// Record position on the tape, also the id encoded in the record.
    pub fn index(self) -> u32 {
        match self {
            Reg::A => 0,
            Reg::B => 1,
            Reg::C => 2,
            Reg::D => 3,
            Reg::Bp => 4,
            Reg::Sp => 5,
        }
    }

    /// Source-syntax name.
    pub fn name(self) -> &'static str {
        match self {
            Reg::A => "A",
            Reg::B => "B",
            Reg::C => "C",
            Reg::D => "D",
            Reg::Bp => "BP",
            Reg::Sp => "SP",
        }
    }

    pub fn from_name(name: &str) -> Option<Reg> {
        match name.to_ascii_uppercase().as_str() {
            "A" => Some(Reg::A),
            "B" => Some(Reg::B),
            "C" => Some(Reg::C),
            "D" => Some(Reg::D),
            "BP" => Some(Reg::Bp),
            "SP" => Some(Reg::Sp),
            _ => None,
        }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Instruction operand: a register or an immediate.
///
/// Immediates are reduced modulo 2^word_size when written to the tape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg),
    Imm(u32),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(reg) => write!(f, "{reg}"),
            Operand::Imm(imm) => write!(f, "{imm}"),
        }
    }
}

/// One instruction, typed per opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstKind {
    Mov { dst: Reg, src: Operand },
    Add { dst: Reg, src: Operand },
    Sub { dst: Reg, src: Operand },
    Load { dst: Reg, addr: Operand },
    Store { src: Reg, addr: Operand },
    Jmp { target: Operand },
    Putc { src: Operand },
    Getc { dst: Reg },
    Exit,
    Dump,
}

impl InstKind {
    /// Source mnemonic, used in error reports and statistics.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            InstKind::Mov { .. } => "mov",
            InstKind::Add { .. } => "add",
            InstKind::Sub { .. } => "sub",
            InstKind::Load { .. } => "load",
            InstKind::Store { .. } => "store",
            InstKind::Jmp { .. } => "jmp",
            InstKind::Putc { .. } => "putc",
            InstKind::Getc { .. } => "getc",
            InstKind::Exit => "exit",
            InstKind::Dump => "dump",
        }
    }
}

impl fmt::Display for InstKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstKind::Mov { dst, src } => write!(f, "mov {dst}, {src}"),
            InstKind::Add { dst, src } => write!(f, "add {dst}, {src}"),
            InstKind::Sub { dst, src } => write!(f, "sub {dst}, {src}"),
            InstKind::Load { dst, addr } => write!(f, "load {dst}, {addr}"),
            InstKind::Store { src, addr } => write!(f, "store {src}, {addr}"),
            InstKind::Jmp { target } => write!(f, "jmp {target}"),
            InstKind::Putc { src } => write!(f, "putc {src}"),
            InstKind::Getc { dst } => write!(f, "getc {dst}"),
            InstKind::Exit => write!(f, "exit"),
            InstKind::Dump => write!(f, "dump"),
        }
    }
}

/// One instruction with its program counter (basic block index).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inst {
    pub pc: u32,
    pub kind: InstKind,
}

/// A complete input module: instruction list plus initial memory image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Module {
    /// Instructions in source order. Program counters are non-decreasing.
    pub text: Vec<Inst>,
    /// Initial memory cells, addressed by position.
    pub data: Vec<u8>,
}

impl Module {
    /// Parse the text format described in the module docs.
    pub fn parse(text: &str) -> Result<Module, ParseError> {
        parse_module(text)
    }

    /// Highest program counter in the instruction list, if any.
    pub fn max_pc(&self) -> Option<u32> {
        self.text.iter().map(|inst| inst.pc).max()
    }
}
