// This module implements the bit-serial ALU: a five-state adder and its
// subtractor twin. Both operate on two interleaved words positioned by the
// backend: the main word in its permanent record cells and a scratch word in
// the scratch cells immediately right of each main bit. Words are MSB-first,
// so the machine works right to left: two fetch states (carry in 0/1) pick
// up and erase a scratch bit, three combine states (partial sum 0/1/2) fold
// it into the main bit and produce the carry out. A fetch state reading
// anything but a bit means the scratch word is spent and the operation is
// done; a combine state reading anything but a bit means the interleave
// invariant broke, which rejects. Subtraction differs from addition only in
// the carry wiring of the mixed combine state.

//! Bit-serial binary addition and subtraction.

use crate::tape::emitter::Effect;
use crate::tape::{Dir, StateId, Symbol, TapeEmitter};

impl TapeEmitter<'_, '_> {
    /// Add the scratch word into the main word, modulo 2^word_size.
    ///
    /// The head starts on the scratch cell to the right of the number and
    /// ends on the scratch cell to the left of it, with every scratch bit
    /// erased. Returns `r`.
    pub fn add(&self, q: StateId, r: StateId) -> StateId {
        self.arith(q, r, false)
    }

    /// Subtract the scratch word from the main word, with borrow, modulo
    /// 2^word_size. Same layout contract as [`add`](Self::add).
    pub fn sub(&self, q: StateId, r: StateId) -> StateId {
        self.arith(q, r, true)
    }

    fn arith(&self, q: StateId, r: StateId, borrow: bool) -> StateId {
        let reject = self.reject();
        let s0 = q;
        let s1 = self.fresh();
        let m0 = self.fresh();
        let m1 = self.fresh();
        let m2 = self.fresh();

        // Fetch: consume one scratch bit, fold it into the carry. Anything
        // that is not a bit ends the operation.
        self.write_if2(
            s0,
            Symbol::Zero,
            Effect::new(Symbol::Blank, Dir::Left, m0),
            Symbol::One,
            Effect::new(Symbol::Blank, Dir::Left, m1),
            Effect::new(Symbol::Blank, Dir::Stay, r),
        );
        self.write_if2(
            s1,
            Symbol::Zero,
            Effect::new(Symbol::Blank, Dir::Left, m1),
            Symbol::One,
            Effect::new(Symbol::Blank, Dir::Left, m2),
            Effect::new(Symbol::Blank, Dir::Stay, r),
        );

        // Combine: rewrite the main bit, carry out into the next fetch.
        // The mixed state m1 is where addition and subtraction differ.
        let (m1_zero, m1_one) = if borrow { (s1, s0) } else { (s0, s1) };
        self.write_if2(
            m0,
            Symbol::Zero,
            Effect::new(Symbol::Zero, Dir::Left, s0),
            Symbol::One,
            Effect::new(Symbol::One, Dir::Left, s0),
            Effect::new(Symbol::Zero, Dir::Stay, reject),
        );
        self.write_if2(
            m1,
            Symbol::Zero,
            Effect::new(Symbol::One, Dir::Left, m1_zero),
            Symbol::One,
            Effect::new(Symbol::Zero, Dir::Left, m1_one),
            Effect::new(Symbol::Zero, Dir::Stay, reject),
        );
        self.write_if2(
            m2,
            Symbol::Zero,
            Effect::new(Symbol::Zero, Dir::Left, s1),
            Symbol::One,
            Effect::new(Symbol::One, Dir::Left, s1),
            Effect::new(Symbol::Zero, Dir::Stay, reject),
        );
        r
    }
}
