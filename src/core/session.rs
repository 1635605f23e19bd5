// This module provides arena-based generation session management using the
// bumpalo crate. GenSession is the central hub that owns the state allocator,
// the distinguished reject state, and the append-only transition table being
// built. Rules are only ever appended and states are created and wired once,
// so the session exposes interior mutability (Cell/RefCell) rather than
// requiring &mut threading through every emitter helper. Comment lines are
// interned in the arena so the table can interleave them with rules without
// cloning. SessionStats tracks generation metrics (states allocated, rules
// emitted, per-opcode instruction counts) for the CLI's --stats report. The
// session keeps the state counter as an explicit context value rather than a
// process-wide global, which is what makes the individual tape operations
// unit-testable in isolation.

//! Arena-based generation session management.
//!
//! A [`GenSession`] carries everything one compilation run mutates: the
//! monotonic state counter, the reject state, and the growing rule list.
//! All emitter layers borrow the session and thread "current state" values
//! through it, so whole operations compose as state-in/state-out edges.

use bumpalo::Bump;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;

use crate::tape::{Line, Rule, StateId, TmProgram};

/// Arena-based generation session.
///
/// States are issued monotonically and never reused. The reject state is the
/// first state after the reserved program-counter range; it is a sink with no
/// outgoing rules, entered only on structural protocol violations that the
/// generator's invariants should make unreachable.
pub struct GenSession<'arena> {
    /// Arena allocator for interned table text.
    arena: &'arena Bump,

    /// Next unissued state id.
    next_state: Cell<StateId>,

    /// Distinguished ruleless sink for protocol violations.
    reject: StateId,

    /// The transition table under construction, comments interleaved.
    lines: RefCell<Vec<Line<'arena>>>,

    /// String interning for comment lines.
    interned_strings: RefCell<HashMap<String, &'arena str>>,

    /// Session statistics for the --stats report and debugging.
    stats: RefCell<SessionStats>,
}

impl<'arena> GenSession<'arena> {
    /// Create a session with no reserved program-counter states.
    ///
    /// State 0 stays free for use as an entry state; the reject state is
    /// state 1. Mostly useful for exercising single operations in tests.
    pub fn new(arena: &'arena Bump) -> Self {
        Self::with_reserved(arena, 1)
    }

    /// Create a session whose states `0..first_free` are reserved for
    /// instruction program counters. The reject state is `first_free`
    /// itself; fresh scratch states follow it.
    pub fn with_reserved(arena: &'arena Bump, first_free: StateId) -> Self {
        Self {
            arena,
            next_state: Cell::new(first_free + 1),
            reject: first_free,
            lines: RefCell::new(Vec::new()),
            interned_strings: RefCell::new(HashMap::new()),
            stats: RefCell::new(SessionStats::default()),
        }
    }

    /// Get access to the session arena.
    pub fn arena(&self) -> &'arena Bump {
        self.arena
    }

    /// Issue the next unused state id. Monotonic, never reused.
    pub fn fresh_state(&self) -> StateId {
        let id = self.next_state.get();
        self.next_state.set(id + 1);
        self.stats.borrow_mut().states_allocated += 1;
        id
    }

    /// The distinguished reject sink.
    pub fn reject(&self) -> StateId {
        self.reject
    }

    /// Append one transition rule to the table.
    pub fn push_rule(&self, rule: Rule) {
        self.lines.borrow_mut().push(Line::Rule(rule));
        self.stats.borrow_mut().rules_emitted += 1;
    }

    /// Append one comment line to the table.
    pub fn comment(&self, text: &str) {
        let interned = self.intern_str(text);
        self.lines.borrow_mut().push(Line::Comment(interned));
        self.stats.borrow_mut().comments_emitted += 1;
    }

    /// Intern a string in the arena.
    pub fn intern_str(&self, s: &str) -> &'arena str {
        let mut strings = self.interned_strings.borrow_mut();
        if let Some(&interned) = strings.get(s) {
            return interned;
        }

        let interned = self.arena.alloc_str(s);
        strings.insert(s.to_string(), interned);
        interned
    }

    /// Record that one source instruction was translated.
    pub fn record_instruction(&self, mnemonic: &'static str) {
        let mut stats = self.stats.borrow_mut();
        stats.instructions_translated += 1;
        *stats.instruction_counts.entry(mnemonic).or_insert(0) += 1;
    }

    /// Snapshot of the rules emitted so far. Test support.
    pub fn rules(&self) -> Vec<Rule> {
        self.lines
            .borrow()
            .iter()
            .filter_map(|line| match line {
                Line::Rule(rule) => Some(*rule),
                Line::Comment(_) => None,
            })
            .collect()
    }

    /// Current generation statistics.
    pub fn stats(&self) -> SessionStats {
        self.stats.borrow().clone()
    }

    /// Consume the session and hand over the finished table.
    pub fn finish(self) -> TmProgram<'arena> {
        TmProgram::new(self.lines.into_inner())
    }
}

/// Generation session statistics.
#[derive(Debug, Default, Clone)]
pub struct SessionStats {
    /// Scratch states issued by the allocator.
    pub states_allocated: usize,

    /// Transition rules appended to the table.
    pub rules_emitted: usize,

    /// Comment lines appended to the table.
    pub comments_emitted: usize,

    /// Source instructions translated.
    pub instructions_translated: usize,

    /// Count of each opcode translated.
    pub instruction_counts: HashMap<&'static str, usize>,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generation Session Statistics:")?;
        writeln!(f, "  Instructions translated: {}", self.instructions_translated)?;
        writeln!(f, "  Rules emitted: {}", self.rules_emitted)?;
        writeln!(f, "  Comment lines: {}", self.comments_emitted)?;
        writeln!(f, "  States allocated: {}", self.states_allocated)?;

        if !self.instruction_counts.is_empty() {
            writeln!(f, "  Instruction breakdown:")?;
            let mut sorted: Vec<_> = self.instruction_counts.iter().collect();
            sorted.sort_by_key(|(_, count)| std::cmp::Reverse(**count));

            for (mnemonic, count) in sorted {
                writeln!(f, "    {mnemonic}: {count}")?;
            }
        }

        Ok(())
    }
}
