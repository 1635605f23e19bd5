//! Shared test support: a single-tape simulator for generated rule tables
//! plus tape builders and decoders for the record layout.
//!
//! The simulator follows the consumer contract of the generated programs:
//! rules are indexed by (state, symbol), unwritten cells read as blank, and
//! any pair with no rule halts the machine in its current state.

#![allow(dead_code)]

use std::borrow::Borrow;
use std::collections::HashMap;

use tmgen::ir::Reg;
use tmgen::{Dir, Rule, StateId, Symbol, WORD_SIZE};

/// Cells one register or memory record occupies: lead blank, marker, id
/// word, blank, value marker, value word.
pub const RECORD_CELLS: usize = 4 + 2 * WORD_SIZE as usize * 2;

pub struct Machine {
    rules: HashMap<(StateId, Symbol), Rule>,
    pub tape: Vec<Symbol>,
    pub head: usize,
    pub state: StateId,
}

impl Machine {
    pub fn new<R: Borrow<Rule>>(
        rules: impl IntoIterator<Item = R>,
        tape: Vec<Symbol>,
        state: StateId,
        head: usize,
    ) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| {
                let rule = *rule.borrow();
                ((rule.state, rule.read), rule)
            })
            .collect();
        Self {
            rules,
            tape,
            state,
            head,
        }
    }

    /// Start from an all-blank tape in state 0, as the bootstrap expects.
    pub fn boot<R: Borrow<Rule>>(rules: impl IntoIterator<Item = R>) -> Self {
        Self::new(rules, vec![Symbol::Blank], 0, 0)
    }

    fn read(&self) -> Symbol {
        self.tape.get(self.head).copied().unwrap_or(Symbol::Blank)
    }

    /// Apply one rule. Returns false when no rule matches (halt).
    pub fn step(&mut self) -> bool {
        let Some(rule) = self.rules.get(&(self.state, self.read())).copied() else {
            return false;
        };
        if self.head >= self.tape.len() {
            self.tape.resize(self.head + 1, Symbol::Blank);
        }
        self.tape[self.head] = rule.write;
        match rule.dir {
            Dir::Left => {
                assert!(self.head > 0, "head fell off the left tape edge");
                self.head -= 1;
            }
            Dir::Stay => {}
            Dir::Right => self.head += 1,
        }
        self.state = rule.next;
        true
    }

    /// Run until no rule matches; panics if the budget runs out first.
    pub fn run(&mut self, max_steps: usize) -> StateId {
        for _ in 0..max_steps {
            if !self.step() {
                return self.state;
            }
        }
        panic!("machine did not halt within {max_steps} steps");
    }

    /// Count a symbol's occurrences on the tape.
    pub fn count(&self, symbol: Symbol) -> usize {
        self.tape.iter().filter(|&&s| s == symbol).count()
    }
}

/// A value word region: a scratch blank before each bit, MSB first.
pub fn word_cells(value: u32) -> Vec<Symbol> {
    let mut cells = Vec::with_capacity(2 * WORD_SIZE as usize);
    for i in (0..WORD_SIZE).rev() {
        cells.push(Symbol::Blank);
        cells.push(Symbol::bit(value & (1 << i) != 0));
    }
    cells
}

/// One full record: lead blank, marker, id word, blank, value marker,
/// value word.
pub fn record_cells(marker: Symbol, id: u32, value: u32) -> Vec<Symbol> {
    let mut cells = vec![Symbol::Blank, marker];
    cells.extend(word_cells(id));
    cells.push(Symbol::Blank);
    cells.push(Symbol::Value);
    cells.extend(word_cells(value));
    cells
}

/// The static tape region as the bootstrap lays it out: start marker, six
/// zeroed registers, one record per memory byte, blank, end marker.
pub fn bootstrap_tape(data: &[u8]) -> Vec<Symbol> {
    let mut tape = vec![Symbol::Start];
    for reg in Reg::ALL {
        tape.extend(record_cells(Symbol::Register, reg.index(), 0));
    }
    for (addr, &value) in data.iter().enumerate() {
        tape.extend(record_cells(Symbol::Address, addr as u32, value as u32));
    }
    tape.push(Symbol::Blank);
    tape.push(Symbol::End);
    tape
}

/// Offset of a register record's first cell in [`bootstrap_tape`].
pub fn register_record_offset(reg: Reg) -> usize {
    1 + reg.index() as usize * RECORD_CELLS
}

/// Offset of the scratch cell left of a register's value word, where
/// `find_register` parks the head.
pub fn register_value_offset(reg: Reg) -> usize {
    register_record_offset(reg) + 2 + 2 * WORD_SIZE as usize + 2
}

/// Decode a word region laid out by [`word_cells`] starting at `offset`
/// (the first scratch cell).
pub fn decode_word(tape: &[Symbol], offset: usize) -> u32 {
    let mut value = 0;
    for i in 0..WORD_SIZE as usize {
        let bit = tape[offset + 2 * i + 1];
        assert!(bit.is_bit(), "cell {} is {bit:?}, not a bit", offset + 2 * i + 1);
        value = value << 1 | (bit == Symbol::One) as u32;
    }
    value
}

/// Decode the compacted output run a finished program leaves at the left
/// tape edge: contiguous bits from cell 0, eight per byte.
pub fn output_bytes(tape: &[Symbol]) -> Vec<u8> {
    let bits: Vec<bool> = tape
        .iter()
        .take_while(|s| s.is_bit())
        .map(|&s| s == Symbol::One)
        .collect();
    assert_eq!(bits.len() % 8, 0, "ragged output run");
    bits.chunks(8)
        .map(|byte| byte.iter().fold(0u8, |acc, &b| acc << 1 | b as u8))
        .collect()
}
