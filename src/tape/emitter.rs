// This module provides the primitive rule emitters every higher layer of the
// backend is built from. TapeEmitter wraps a GenSession and exposes the
// unconditional stamp (write), the one- and two-symbol branching variants
// (write_if/write_if2), the read-preserving move family, the state-only noop
// used to wire pc fallthrough and jump targets, and the MSB-first bit writer
// that lays words down with a scratch blank before each bit. Every helper
// takes the entry state and the continuation state and returns the
// continuation, so whole operations chain as state-in/state-out edges; the
// branching helpers return the default-case continuation. Each helper emits
// one rule per alphabet symbol for its entry state, which is what makes the
// generated machine total on every reachable state.

//! Primitive transition emitters.
//!
//! All helpers compose by threading the returned state into the next call's
//! entry state. Branching behavior is described with [`Effect`] (write,
//! move, next) for the write family and [`Step`] (move, next) for the
//! read-preserving move family.

use crate::core::GenSession;
use crate::tape::{Dir, Rule, StateId, Symbol};

/// Full outcome of a write-family branch: symbol to write, head move, next
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    pub write: Symbol,
    pub dir: Dir,
    pub next: StateId,
}

impl Effect {
    pub fn new(write: Symbol, dir: Dir, next: StateId) -> Self {
        Self { write, dir, next }
    }
}

/// Outcome of a move-family branch: the read symbol is preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub dir: Dir,
    pub next: StateId,
}

impl Step {
    pub fn new(dir: Dir, next: StateId) -> Self {
        Self { dir, next }
    }
}

/// Primitive rule emitter over one generation session.
#[derive(Clone, Copy)]
pub struct TapeEmitter<'s, 'arena> {
    session: &'s GenSession<'arena>,
}

impl<'s, 'arena> TapeEmitter<'s, 'arena> {
    pub fn new(session: &'s GenSession<'arena>) -> Self {
        Self { session }
    }

    /// The session this emitter appends to.
    pub fn session(&self) -> &'s GenSession<'arena> {
        self.session
    }

    /// Issue a fresh scratch state.
    pub fn fresh(&self) -> StateId {
        self.session.fresh_state()
    }

    /// The session's reject sink.
    pub fn reject(&self) -> StateId {
        self.session.reject()
    }

    /// Emit one rule: in `q` reading `read`, write `write`, move `dir`,
    /// enter `next`. Returns `next`.
    pub fn transition(
        &self,
        q: StateId,
        read: Symbol,
        write: Symbol,
        dir: Dir,
        next: StateId,
    ) -> StateId {
        self.session.push_rule(Rule {
            state: q,
            read,
            next,
            write,
            dir,
        });
        next
    }

    /// Write `write` and move `dir` regardless of the read symbol.
    pub fn write(&self, q: StateId, write: Symbol, dir: Dir, next: StateId) -> StateId {
        for read in Symbol::ALL {
            self.transition(q, read, write, dir, next);
        }
        next
    }

    /// Write transitions that do one thing for symbol `on` and another for
    /// all other symbols. Returns the default continuation.
    pub fn write_if(&self, q: StateId, on: Symbol, then: Effect, default: Effect) -> StateId {
        for read in Symbol::ALL {
            let effect = if read == on { then } else { default };
            self.transition(q, read, effect.write, effect.dir, effect.next);
        }
        default.next
    }

    /// Write transitions distinguishing two symbols; every other read symbol
    /// follows `default`. `on1` wins if both symbols are equal.
    pub fn write_if2(
        &self,
        q: StateId,
        on1: Symbol,
        then1: Effect,
        on2: Symbol,
        then2: Effect,
        default: Effect,
    ) -> StateId {
        for read in Symbol::ALL {
            let effect = if read == on1 {
                then1
            } else if read == on2 {
                then2
            } else {
                default
            };
            self.transition(q, read, effect.write, effect.dir, effect.next);
        }
        default.next
    }

    /// Move `dir` preserving the read symbol.
    pub fn move_head(&self, q: StateId, dir: Dir, next: StateId) -> StateId {
        for read in Symbol::ALL {
            self.transition(q, read, read, dir, next);
        }
        next
    }

    /// Move transitions that do one thing for symbol `on` and another for
    /// all other symbols. Returns the default continuation.
    pub fn move_head_if(&self, q: StateId, on: Symbol, then: Step, default: Step) -> StateId {
        for read in Symbol::ALL {
            let step = if read == on { then } else { default };
            self.transition(q, read, read, step.dir, step.next);
        }
        default.next
    }

    /// Move transitions distinguishing two symbols. `on1` wins if both are
    /// equal. Returns the default continuation.
    pub fn move_head_if2(
        &self,
        q: StateId,
        on1: Symbol,
        then1: Step,
        on2: Symbol,
        then2: Step,
        default: Step,
    ) -> StateId {
        for read in Symbol::ALL {
            let step = if read == on1 {
                then1
            } else if read == on2 {
                then2
            } else {
                default
            };
            self.transition(q, read, read, step.dir, step.next);
        }
        default.next
    }

    /// Change state only; no write, no move. Wires pc fallthrough and jump
    /// targets.
    pub fn noop(&self, q: StateId, next: StateId) -> StateId {
        self.move_head(q, Dir::Stay, next)
    }

    /// Write the low `n` bits of `x` MSB-first, leaving a scratch cell
    /// before each bit. The head ends one cell past the last bit.
    ///
    /// The scratch cells are skipped, not blanked: whatever they hold is
    /// preserved.
    pub fn write_bits(&self, q: StateId, x: u32, n: u32, r: StateId) -> StateId {
        debug_assert!(n >= 1);
        let mut q = q;
        for i in (1..n).rev() {
            q = self.move_head(q, Dir::Right, self.fresh());
            q = self.write(q, Symbol::bit(x & (1 << i) != 0), Dir::Right, self.fresh());
        }
        q = self.move_head(q, Dir::Right, self.fresh());
        self.write(q, Symbol::bit(x & 1 != 0), Dir::Right, r)
    }

    /// Write one word-sized value.
    pub fn write_word(&self, q: StateId, x: u32, r: StateId) -> StateId {
        self.write_bits(q, x, super::WORD_SIZE, r)
    }

    /// Write one output byte.
    pub fn write_byte(&self, q: StateId, x: u32, r: StateId) -> StateId {
        self.write_bits(q, x, 8, r)
    }
}
