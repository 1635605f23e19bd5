// This module defines the target model for the Turing machine backend: the
// 12-symbol tape alphabet with its fixed rendering table, head movement
// directions, transition rules, and the TmProgram container that holds the
// finished transition table interleaved with comment lines. Everything the
// emitter layers produce ultimately bottoms out in Rule values collected by
// the generation session; TmProgram renders them in the textual format the
// downstream interpreter consumes (one rule per line, `// ` comment lines).

//! Turing machine target model: alphabet, directions, rules, programs.
//!
//! The tape is laid out like this:
//!
//! ```text
//! ^_x_0_0_..._0_x_0_0_..._0_$
//! ```
//!
//! where `x` is one of `r`, `a`, `v`, `o`. The blanks between the symbols
//! are used as scratch space.

use std::fmt;

pub mod arith;
pub mod backend;
pub mod copy;
pub mod emitter;
pub mod navigate;

pub use backend::TapeBackend;
pub use copy::CopyMode;
pub use emitter::TapeEmitter;

/// Opaque machine state identifier. State 0 is the start state; instruction
/// program counters double as state ids.
pub type StateId = u32;

/// Fixed bit width of every register id, memory address and value word.
pub const WORD_SIZE: u32 = 8;

/// One tape cell symbol. Unwritten cells read as `Blank`.
///
/// `Reserved` is the alphabet's unused slot; no emitter ever writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Blank,
    Start,
    End,
    Zero,
    One,
    Register,
    Address,
    Value,
    Output,
    Src,
    Dst,
    Reserved,
}

impl Symbol {
    /// Alphabet size.
    pub const COUNT: usize = 12;

    /// Every alphabet symbol, in name-table order.
    pub const ALL: [Symbol; Self::COUNT] = [
        Symbol::Blank,
        Symbol::Start,
        Symbol::End,
        Symbol::Zero,
        Symbol::One,
        Symbol::Register,
        Symbol::Address,
        Symbol::Value,
        Symbol::Output,
        Symbol::Src,
        Symbol::Dst,
        Symbol::Reserved,
    ];

    /// Rendered name in the transition table.
    pub fn name(self) -> &'static str {
        match self {
            Symbol::Blank => "_",
            Symbol::Start => "^",
            Symbol::End => "$",
            Symbol::Zero => "0",
            Symbol::One => "1",
            Symbol::Register => "r",
            Symbol::Address => "a",
            Symbol::Value => "v",
            Symbol::Output => "o",
            Symbol::Src => "s",
            Symbol::Dst => "d",
            Symbol::Reserved => ".",
        }
    }

    /// Bit symbol for one bit of a word.
    pub fn bit(set: bool) -> Symbol {
        if set {
            Symbol::One
        } else {
            Symbol::Zero
        }
    }

    /// Whether this symbol encodes a word bit.
    pub fn is_bit(self) -> bool {
        matches!(self, Symbol::Zero | Symbol::One)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Head movement of a transition rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Left,
    Stay,
    Right,
}

impl Dir {
    /// Rendered move letter.
    pub fn letter(self) -> &'static str {
        match self {
            Dir::Left => "L",
            Dir::Stay => "N",
            Dir::Right => "R",
        }
    }

    /// Opposite scan direction. `Stay` flips to itself.
    pub fn flip(self) -> Dir {
        match self {
            Dir::Left => Dir::Right,
            Dir::Stay => Dir::Stay,
            Dir::Right => Dir::Left,
        }
    }

    /// Tape boundary marker that terminates a scan in this direction:
    /// `^` when scanning left, `$` when scanning right.
    pub fn boundary(self) -> Symbol {
        match self {
            Dir::Left => Symbol::Start,
            _ => Symbol::End,
        }
    }
}

/// One transition rule: in `state` reading `read`, write `write`, move the
/// head `dir`, and enter `next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub state: StateId,
    pub read: Symbol,
    pub next: StateId,
    pub write: Symbol,
    pub dir: Dir,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.state,
            self.read,
            self.next,
            self.write,
            self.dir.letter()
        )
    }
}

/// One line of the generated transition table.
#[derive(Debug, Clone, Copy)]
pub enum Line<'arena> {
    /// Echo of a source construct; consumers must ignore these.
    Comment(&'arena str),
    Rule(Rule),
}

/// The finished transition table for one compiled module.
///
/// State 0 is implicitly the start state. The reject state and the
/// post-exit halt state carry no textual marking; a consuming simulator
/// halts on any (state, symbol) pair with no rule.
#[derive(Debug)]
pub struct TmProgram<'arena> {
    lines: Vec<Line<'arena>>,
}

impl<'arena> TmProgram<'arena> {
    pub(crate) fn new(lines: Vec<Line<'arena>>) -> Self {
        Self { lines }
    }

    /// All table lines, comments included, in emission order.
    pub fn lines(&self) -> &[Line<'arena>] {
        &self.lines
    }

    /// The transition rules only.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.lines.iter().filter_map(|line| match line {
            Line::Rule(rule) => Some(rule),
            Line::Comment(_) => None,
        })
    }

    /// Number of transition rules (excludes comments).
    pub fn rule_count(&self) -> usize {
        self.rules().count()
    }
}

impl fmt::Display for TmProgram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match line {
                Line::Comment(text) => writeln!(f, "// {text}")?,
                Line::Rule(rule) => writeln!(f, "{rule}")?,
            }
        }
        Ok(())
    }
}
