// This module implements the bit-serial copy engine. A copy relocates the
// word starting one cell right of the head to the position tagged DST
// somewhere in the caller-chosen scan direction, one bit per round trip:
// tag the current scratch cell SRC, read the next bit, remember it in one of
// two symmetric state branches, travel to DST, deposit the bit per the copy
// mode, re-tag DST one cell further, and travel back to SRC. When the source
// word runs out the final DST tag is cleared and the continuation runs. The
// caller picks the direction from static record order so source and
// destination never collide; both tags are transient and gone by the time
// the continuation state is reached.

//! Bit-serial word relocation across tape regions.

use crate::tape::emitter::Step;
use crate::tape::{Dir, StateId, Symbol, TapeEmitter};

/// How the copy engine lays bits down at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    /// Insert a fresh scratch blank before each bit, growing a full word
    /// region at the destination. Register-to-register and output moves.
    BlankBeforeDst,
    /// Leave the cell after each bit untouched, writing the bits into the
    /// existing scratch cells. Arithmetic operand fetch.
    BlankAfterDst,
    /// Neither: bits land contiguously. Output consolidation at exit.
    Compact,
}

impl CopyMode {
    fn blank_before(self) -> bool {
        matches!(self, CopyMode::BlankBeforeDst)
    }

    fn blank_after(self) -> bool {
        matches!(self, CopyMode::BlankAfterDst)
    }
}

impl TapeEmitter<'_, '_> {
    /// Copy the word starting one cell right of the head to the position
    /// marked DST, scanning `dir` to reach it.
    ///
    /// The head starts on the scratch cell to the left of the source word
    /// and ends on the cell to the right of the destination word (which is
    /// blanked). Returns `r`.
    pub fn copy(&self, q: StateId, dir: Dir, mode: CopyMode, r: StateId) -> StateId {
        let reject = self.reject();

        // [_]0_1 ... dx_x
        let q = self.write(q, Symbol::Src, Dir::Stay, self.fresh());
        let q_next_bit = q;
        // _[0]_1 ... dx_x
        let q = self.write(q, Symbol::Blank, Dir::Right, self.fresh());

        let q0 = self.fresh();
        let q1 = self.fresh();
        // _0[_]1 ... dx_x  (bit remembered in the branch taken)
        let q_clean = self.move_head_if2(
            q,
            Symbol::Zero,
            Step::new(Dir::Right, q0),
            Symbol::One,
            Step::new(Dir::Right, q1),
            Step::new(Dir::Stay, self.fresh()),
        );

        let q_join = self.fresh();
        for (branch, bit) in [(q0, Symbol::Zero), (q1, Symbol::One)] {
            // _0s[1] ... dx_x
            let mut q = self.write(branch, Symbol::Src, Dir::Right, self.fresh());
            // _0s1 ... [d]x_x
            q = self.find(q, dir, Symbol::Dst, self.fresh(), reject);
            if mode.blank_before() {
                // _0s1 ... _[x]_x
                q = self.write(q, Symbol::Blank, Dir::Right, self.fresh());
            }
            // _0s1 ... _0[_]x
            self.write(q, bit, Dir::Right, q_join);
        }

        let mut q = q_join;
        if mode.blank_after() {
            q = self.move_head(q, Dir::Right, self.fresh());
        }
        // _0s1 ... _0[d]x
        q = self.write(q, Symbol::Dst, Dir::Stay, self.fresh());
        // _0[s]1 ... _0dx
        self.find(q, dir.flip(), Symbol::Src, q_next_bit, reject);

        // Source exhausted: clear the final DST tag and finish.
        let q = self.find(q_clean, dir, Symbol::Dst, self.fresh(), reject);
        self.write(q, Symbol::Blank, Dir::Stay, r)
    }
}
