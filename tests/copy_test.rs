//! Simulation tests for the bit-serial copy engine: every mode in both
//! scan directions, checked against fully spelled-out expected tapes.

mod common;

use bumpalo::Bump;
use common::Machine;
use tmgen::tape::TapeEmitter;
use tmgen::{CopyMode, Dir, GenSession, StateId, Symbol};

const SAMPLES: [u32; 4] = [0x00, 0xff, 0xb5, 0x4a];

fn run_copy(
    mode: CopyMode,
    dir: Dir,
    tape: Vec<Symbol>,
    head: usize,
) -> (Machine, StateId, StateId) {
    let arena = Bump::new();
    let session = GenSession::new(&arena);
    let emit = TapeEmitter::new(&session);

    let q = emit.fresh();
    let r = emit.fresh();
    emit.copy(q, dir, mode, r);

    let mut machine = Machine::new(session.rules(), tape, q, head);
    let halted = machine.run(100_000);
    (machine, halted, r)
}

/// Bits of `x` MSB-first, no scratch interleave.
fn bit_run(x: u32) -> Vec<Symbol> {
    (0..8).rev().map(|i| Symbol::bit(x & (1 << i) != 0)).collect()
}

fn assert_no_tags(machine: &Machine) {
    assert_eq!(machine.count(Symbol::Src), 0, "leftover source tag");
    assert_eq!(machine.count(Symbol::Dst), 0, "leftover destination tag");
}

#[test]
fn test_blank_before_dst_rightward() {
    for x in SAMPLES {
        // Source word at 1, destination tag at 20 with room to grow.
        let mut tape = vec![Symbol::Start];
        tape.extend(common::word_cells(x));
        tape.extend([Symbol::Blank; 3]);
        tape.push(Symbol::Dst);
        tape.extend([Symbol::Blank; 17]);
        tape.push(Symbol::End);

        let (machine, halted, r) = run_copy(CopyMode::BlankBeforeDst, Dir::Right, tape, 1);
        assert_eq!(halted, r);
        assert_eq!(machine.head, 36);

        let mut expect = vec![Symbol::Start];
        expect.extend(common::word_cells(x)); // source preserved
        expect.extend([Symbol::Blank; 3]);
        expect.extend(common::word_cells(x)); // grown word region at 20
        expect.extend([Symbol::Blank; 2]);
        expect.push(Symbol::End);
        assert_eq!(machine.tape, expect);
        assert_no_tags(&machine);
    }
}

#[test]
fn test_blank_before_dst_leftward() {
    for x in SAMPLES {
        // Destination tag at 1, source word at 19.
        let mut tape = vec![Symbol::Start, Symbol::Dst];
        tape.extend([Symbol::Blank; 17]);
        tape.extend(common::word_cells(x));
        tape.extend([Symbol::Blank; 2]);
        tape.push(Symbol::End);

        let (machine, halted, r) = run_copy(CopyMode::BlankBeforeDst, Dir::Left, tape, 19);
        assert_eq!(halted, r);
        assert_eq!(machine.head, 17);

        let mut expect = vec![Symbol::Start];
        expect.extend(common::word_cells(x)); // grown word region at 1
        expect.extend([Symbol::Blank; 2]);
        expect.extend(common::word_cells(x)); // source preserved
        expect.extend([Symbol::Blank; 2]);
        expect.push(Symbol::End);
        assert_eq!(machine.tape, expect);
        assert_no_tags(&machine);
    }
}

#[test]
fn test_blank_after_dst_rightward() {
    let a = 0x5a;
    for x in SAMPLES {
        // Source word at 1; destination is an existing word region at 20
        // with the tag planted on the scratch cell right of its first bit.
        let mut tape = vec![Symbol::Start];
        tape.extend(common::word_cells(x));
        tape.extend([Symbol::Blank; 3]);
        tape.extend(common::word_cells(a));
        tape[22] = Symbol::Dst;
        tape.extend([Symbol::Blank; 4]);
        tape.push(Symbol::End);

        let (machine, halted, r) = run_copy(CopyMode::BlankAfterDst, Dir::Right, tape, 1);
        assert_eq!(halted, r);
        assert_eq!(machine.head, 38);

        let mut expect = vec![Symbol::Start];
        expect.extend(common::word_cells(x));
        expect.extend([Symbol::Blank; 3]);
        expect.extend(common::word_cells(a));
        // Copied bits interleave into the scratch cells right of each
        // destination bit; the low bit spills one past the region.
        for (k, bit) in bit_run(x).into_iter().enumerate() {
            if 22 + 2 * k < expect.len() {
                expect[22 + 2 * k] = bit;
            } else {
                expect.push(bit);
            }
        }
        expect.extend([Symbol::Blank; 3]);
        expect.push(Symbol::End);
        assert_eq!(machine.tape, expect);
        assert_no_tags(&machine);
    }
}

#[test]
fn test_blank_after_dst_leftward() {
    let a = 0x5a;
    for x in SAMPLES {
        // Destination word region at 1, tag at 3; source word at 20.
        let mut tape = vec![Symbol::Start];
        tape.extend(common::word_cells(a));
        tape[3] = Symbol::Dst;
        tape.extend([Symbol::Blank; 3]);
        tape.extend(common::word_cells(x));
        tape.extend([Symbol::Blank; 2]);
        tape.push(Symbol::End);

        let (machine, halted, r) = run_copy(CopyMode::BlankAfterDst, Dir::Left, tape, 20);
        assert_eq!(halted, r);
        assert_eq!(machine.head, 19);

        let mut expect = vec![Symbol::Start];
        expect.extend(common::word_cells(a));
        expect.push(Symbol::Blank); // cell 17 takes the low-bit spill
        for (k, bit) in bit_run(x).into_iter().enumerate() {
            expect[3 + 2 * k] = bit;
        }
        expect.extend([Symbol::Blank; 2]);
        expect.extend(common::word_cells(x));
        expect.extend([Symbol::Blank; 2]);
        expect.push(Symbol::End);
        assert_eq!(machine.tape, expect);
        assert_no_tags(&machine);
    }
}

#[test]
fn test_compact_leftward() {
    for x in SAMPLES {
        // The exit consolidation shape: tag at the left edge, source word
        // further right, bits landing contiguously from cell 0.
        let mut tape = vec![Symbol::Dst];
        tape.extend([Symbol::Blank; 9]);
        tape.extend(common::word_cells(x));
        tape.push(Symbol::Blank);
        tape.push(Symbol::End);

        let (machine, halted, r) = run_copy(CopyMode::Compact, Dir::Left, tape, 10);
        assert_eq!(halted, r);
        assert_eq!(machine.head, 8);

        let mut expect = bit_run(x);
        expect.extend([Symbol::Blank; 2]);
        expect.extend(common::word_cells(x));
        expect.push(Symbol::Blank);
        expect.push(Symbol::End);
        assert_eq!(machine.tape, expect);
        assert_no_tags(&machine);
    }
}

#[test]
fn test_compact_rightward() {
    for x in SAMPLES {
        let mut tape = vec![Symbol::Start];
        tape.extend(common::word_cells(x));
        tape.extend([Symbol::Blank; 2]);
        tape.push(Symbol::Dst);
        tape.extend([Symbol::Blank; 9]);
        tape.push(Symbol::End);

        let (machine, halted, r) = run_copy(CopyMode::Compact, Dir::Right, tape, 1);
        assert_eq!(halted, r);
        assert_eq!(machine.head, 27);

        let mut expect = vec![Symbol::Start];
        expect.extend(common::word_cells(x));
        expect.extend([Symbol::Blank; 2]);
        expect.extend(bit_run(x));
        expect.extend([Symbol::Blank; 2]);
        expect.push(Symbol::End);
        assert_eq!(machine.tape, expect);
        assert_no_tags(&machine);
    }
}

#[test]
fn test_missing_destination_rejects() {
    // No DST tag anywhere: the first travel to the destination runs into
    // the boundary and must reject rather than loop.
    let mut tape = vec![Symbol::Start];
    tape.extend(common::word_cells(0x01));
    tape.extend([Symbol::Blank; 4]);
    tape.push(Symbol::End);

    let (_machine, halted, r) = run_copy(CopyMode::BlankBeforeDst, Dir::Right, tape, 1);
    assert_ne!(halted, r);
    assert_eq!(halted, 1, "travel without a tag must reject");
}
