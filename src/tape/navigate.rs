// This module builds the word/search navigation layer on top of the
// primitive emitters: bounded marker scans in either direction, the
// rewind/fast-forward sweeps to the tape boundaries, and the register lookup
// protocol that scans record by record and compares the stored id against
// the wanted one bit by bit. Reaching the tape boundary mid-lookup means a
// structural protocol violation (all six register records always pre-exist
// after bootstrap), so those paths go to the reject sink rather than to a
// recoverable continuation.

//! Marker search and register lookup.

use crate::ir::Reg;
use crate::tape::emitter::Step;
use crate::tape::{Dir, StateId, Symbol, TapeEmitter, WORD_SIZE};

impl TapeEmitter<'_, '_> {
    /// Scan in `dir` for `target`. Found: continue at `r_yes` with the head
    /// on the match. Boundary marker for `dir` reached first: continue at
    /// `r_no`. Returns `r_yes`.
    pub fn find(
        &self,
        q: StateId,
        dir: Dir,
        target: Symbol,
        r_yes: StateId,
        r_no: StateId,
    ) -> StateId {
        self.move_head_if2(
            q,
            target,
            Step::new(Dir::Stay, r_yes),
            dir.boundary(),
            Step::new(Dir::Stay, r_no),
            Step::new(dir, q),
        );
        r_yes
    }

    /// Scan left to the beginning-of-tape marker.
    pub fn rewind(&self, q: StateId, r: StateId) -> StateId {
        self.move_head_if(
            q,
            Symbol::Start,
            Step::new(Dir::Stay, r),
            Step::new(Dir::Left, q),
        );
        r
    }

    /// Scan right to the end of the used portion of the tape.
    pub fn ffwd(&self, q: StateId, r: StateId) -> StateId {
        self.move_head_if(
            q,
            Symbol::End,
            Step::new(Dir::Stay, r),
            Step::new(Dir::Right, q),
        );
        r
    }

    /// Find `reg`'s record. The head ends on the scratch cell to the left
    /// of the register's value word.
    ///
    /// Scans right for a register marker, then compares the stored id
    /// against `reg`'s binary form one bit at a time; any mismatch resumes
    /// the scan at the next record. Hitting the end of tape at any point is
    /// a protocol violation and rejects.
    pub fn find_register(&self, q: StateId, reg: Reg, r: StateId) -> StateId {
        let q_start = q;
        // _[r]_0_1 ... _v_0_1
        let mut q = self.find(q, Dir::Right, Symbol::Register, self.fresh(), self.reject());
        // _r[_]0_1 ... _v_0_1
        q = self.move_head(q, Dir::Right, self.fresh());
        for i in (0..WORD_SIZE).rev() {
            // _r_[0]_1 ... _v_0_1
            q = self.move_head(q, Dir::Right, self.fresh());
            let bit = Symbol::bit(reg.index() & (1 << i) != 0);
            let q_match = self.fresh();
            self.move_head_if2(
                q,
                bit,
                // _r_0[_]1 ... _v_0_1
                Step::new(Dir::Right, q_match),
                Symbol::End,
                Step::new(Dir::Stay, self.reject()),
                Step::new(Dir::Right, q_start),
            );
            q = q_match;
        }
        // _r_0_1 ... _[v]_0_1
        q = self.move_head(q, Dir::Right, self.fresh());
        self.move_head_if(
            q,
            Symbol::Value,
            // _r_0_1 ... _v[_]0_1
            Step::new(Dir::Right, r),
            Step::new(Dir::Stay, self.reject()),
        );
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GenSession;
    use bumpalo::Bump;

    #[test]
    fn test_find_loops_until_target_or_boundary() {
        let arena = Bump::new();
        let session = GenSession::new(&arena);
        let emit = TapeEmitter::new(&session);

        let q = emit.fresh();
        let (yes, no) = (emit.fresh(), emit.fresh());
        assert_eq!(emit.find(q, Dir::Right, Symbol::Output, yes, no), yes);

        for rule in session.rules() {
            assert_eq!(rule.state, q);
            let expect = match rule.read {
                Symbol::Output => (yes, Dir::Stay),
                Symbol::End => (no, Dir::Stay),
                _ => (q, Dir::Right),
            };
            assert_eq!((rule.next, rule.dir), expect);
        }
    }

    #[test]
    fn test_rewind_stops_on_start_marker() {
        let arena = Bump::new();
        let session = GenSession::new(&arena);
        let emit = TapeEmitter::new(&session);

        let q = emit.fresh();
        let r = emit.fresh();
        emit.rewind(q, r);

        for rule in session.rules() {
            if rule.read == Symbol::Start {
                assert_eq!((rule.next, rule.dir), (r, Dir::Stay));
            } else {
                assert_eq!((rule.next, rule.dir), (q, Dir::Left));
            }
        }
    }
}
