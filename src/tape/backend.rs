// This module is the program emitter that orchestrates the whole backend.
// compile() reserves one state per instruction program counter (every pc is
// the canonical state for jumps to that instruction), bootstraps the tape
// from state 0 (start marker, six zeroed register records, one record per
// initial memory cell, end marker, rewind), then walks the instruction list
// once, translating each opcode into chains of primitive operations and
// wiring a no-op edge whenever a new pc is not already the current chain
// state. Unsupported input shapes (LOAD/STORE/GETC, jump through a register,
// same-register arithmetic) abort translation with a CompileError. The EXIT
// lowering consolidates the output segments into one contiguous run at the
// left tape edge, erases everything right of it, and parks the machine in a
// ruleless halt state.

//! Tape bootstrap and per-instruction translation.

use bumpalo::Bump;
use log::{debug, info};

use crate::core::{CompileError, CompileResult, GenSession};
use crate::ir::{Inst, InstKind, Module, Operand, Reg};
use crate::tape::emitter::Effect;
use crate::tape::{CopyMode, Dir, StateId, Symbol, TapeEmitter, TmProgram};

/// Session with one state reserved per program counter of `module`.
///
/// Every instruction's pc doubles as its state id, so scratch states are
/// numbered after the highest pc.
pub fn session_for<'arena>(arena: &'arena Bump, module: &Module) -> GenSession<'arena> {
    let first_free = module.max_pc().map_or(1, |pc| pc + 1);
    GenSession::with_reserved(arena, first_free)
}

/// Compile one module into a transition table allocated in `arena`.
pub fn compile<'arena>(arena: &'arena Bump, module: &Module) -> CompileResult<TmProgram<'arena>> {
    let session = session_for(arena, module);

    TapeBackend::new(&session).translate(module)?;

    let stats = session.stats();
    info!(
        "translated {} instructions into {} rules",
        stats.instructions_translated, stats.rules_emitted
    );
    Ok(session.finish())
}

/// Turing machine backend: one instance translates one module.
pub struct TapeBackend<'s, 'arena> {
    emit: TapeEmitter<'s, 'arena>,
}

impl<'s, 'arena> TapeBackend<'s, 'arena> {
    pub fn new(session: &'s GenSession<'arena>) -> Self {
        Self {
            emit: TapeEmitter::new(session),
        }
    }

    /// Emit the bootstrap and every instruction into the session.
    pub fn translate(&self, module: &Module) -> CompileResult<()> {
        let mut q = self.bootstrap(module);

        let mut prev_pc = 0;
        for inst in &module.text {
            debug!("pc {}: {}", inst.pc, inst.kind);
            self.emit.session().comment(&inst.kind.to_string());

            // A fresh pc becomes reachable as a jump target here: wire the
            // running chain onto the pc's canonical state unless the chain
            // is already sitting in it.
            if inst.pc != prev_pc && q != inst.pc {
                q = self.emit.noop(q, inst.pc);
            }
            prev_pc = inst.pc;

            q = self.translate_inst(q, inst)?;
            self.emit.session().record_instruction(inst.kind.mnemonic());
        }
        Ok(())
    }

    /// Lay out the static tape region. Runs from state 0; returns the state
    /// the first instruction chains from, with the head on the start marker.
    fn bootstrap(&self, module: &Module) -> StateId {
        let emit = self.emit;
        let session = emit.session();

        session.comment("beginning-of-tape marker");
        let mut q = emit.write(0, Symbol::Start, Dir::Right, emit.fresh());

        for reg in Reg::ALL {
            session.comment(&format!("register {reg} value 0"));
            q = self.record(q, Symbol::Register, reg.index(), 0);
        }

        for (addr, &value) in module.data.iter().enumerate() {
            if value.is_ascii_graphic() || value == b' ' {
                session.comment(&format!("address {addr} value {value} '{}'", value as char));
            } else {
                session.comment(&format!("address {addr} value {value}"));
            }
            q = self.record(q, Symbol::Address, addr as u32, value as u32);
        }

        q = emit.write(q, Symbol::Blank, Dir::Right, emit.fresh());
        q = emit.write(q, Symbol::End, Dir::Left, emit.fresh());
        emit.rewind(q, emit.fresh())
    }

    /// Emit one marker/id/value record.
    fn record(&self, q: StateId, marker: Symbol, id: u32, value: u32) -> StateId {
        let emit = self.emit;
        let mut q = emit.write(q, Symbol::Blank, Dir::Right, emit.fresh());
        q = emit.write(q, marker, Dir::Right, emit.fresh());
        q = emit.write_word(q, id, emit.fresh());
        q = emit.write(q, Symbol::Blank, Dir::Right, emit.fresh());
        q = emit.write(q, Symbol::Value, Dir::Right, emit.fresh());
        emit.write_word(q, value, emit.fresh())
    }

    fn translate_inst(&self, q: StateId, inst: &Inst) -> CompileResult<StateId> {
        match inst.kind {
            InstKind::Mov { dst, src } => Ok(self.lower_mov(q, dst, src)),
            InstKind::Add { dst, src } => self.lower_arith(q, dst, src, false),
            InstKind::Sub { dst, src } => self.lower_arith(q, dst, src, true),
            InstKind::Jmp { target } => match target {
                Operand::Imm(pc) => {
                    self.emit.noop(q, pc);
                    // No fallthrough: the chain continues from a dead state
                    // so the target pc's state is defined exactly once, by
                    // the instruction that owns it.
                    Ok(self.emit.fresh())
                }
                Operand::Reg(_) => Err(CompileError::IndirectJump),
            },
            InstKind::Putc { src } => Ok(self.lower_putc(q, src)),
            InstKind::Exit => Ok(self.lower_exit(q)),
            // Debug aid on richer targets; no observable effect on the tape.
            InstKind::Dump => Ok(q),
            InstKind::Load { .. } | InstKind::Store { .. } | InstKind::Getc { .. } => {
                Err(CompileError::UnsupportedInstruction {
                    mnemonic: inst.kind.mnemonic(),
                })
            }
        }
    }

    fn lower_mov(&self, q: StateId, dst: Reg, src: Operand) -> StateId {
        let emit = self.emit;
        let q = match src {
            Operand::Reg(src) if src == dst => return q,
            Operand::Reg(src) => {
                let mut q = emit.find_register(q, dst, emit.fresh());
                q = emit.write(q, Symbol::Dst, Dir::Left, emit.fresh());
                q = emit.rewind(q, emit.fresh());
                q = emit.find_register(q, src, emit.fresh());
                emit.copy(q, record_dir(dst, src), CopyMode::BlankBeforeDst, emit.fresh())
            }
            Operand::Imm(imm) => {
                let q = emit.find_register(q, dst, emit.fresh());
                emit.write_word(q, imm, emit.fresh())
            }
        };
        emit.rewind(q, emit.fresh())
    }

    fn lower_arith(&self, q: StateId, dst: Reg, src: Operand, borrow: bool) -> CompileResult<StateId> {
        let emit = self.emit;

        // The ALU works right to left, so position the head past the
        // destination word and stage the source word in its scratch cells.
        let mut q = emit.find_register(q, dst, emit.fresh());
        q = emit.move_head(q, Dir::Right, emit.fresh());
        match src {
            Operand::Reg(src) if src == dst => {
                // The copy engine needs non-overlapping records.
                return Err(CompileError::SameRegisterArithmetic { reg: dst });
            }
            Operand::Reg(src) => {
                q = emit.move_head(q, Dir::Right, emit.fresh());
                q = emit.write(q, Symbol::Dst, Dir::Stay, emit.fresh());
                q = emit.rewind(q, emit.fresh());
                q = emit.find_register(q, src, emit.fresh());
                q = emit.copy(q, record_dir(dst, src), CopyMode::BlankAfterDst, emit.fresh());
                q = emit.move_head(q, Dir::Left, emit.fresh());
            }
            Operand::Imm(imm) => {
                q = emit.write_word(q, imm, emit.fresh());
            }
        }
        q = emit.move_head(q, Dir::Left, emit.fresh());
        q = if borrow {
            emit.sub(q, emit.fresh())
        } else {
            emit.add(q, emit.fresh())
        };
        Ok(emit.rewind(q, emit.fresh()))
    }

    fn lower_putc(&self, q: StateId, src: Operand) -> StateId {
        let emit = self.emit;

        // Append an output record past the end marker, then re-terminate.
        let mut q = emit.ffwd(q, emit.fresh());
        q = emit.write(q, Symbol::Output, Dir::Right, emit.fresh());
        match src {
            Operand::Reg(src) => {
                q = emit.write(q, Symbol::Dst, Dir::Left, emit.fresh());
                q = emit.rewind(q, emit.fresh());
                q = emit.find_register(q, src, emit.fresh());
                q = emit.copy(q, Dir::Right, CopyMode::BlankBeforeDst, emit.fresh());
            }
            Operand::Imm(imm) => {
                q = emit.write_byte(q, imm, emit.fresh());
            }
        }
        q = emit.write(q, Symbol::Blank, Dir::Right, emit.fresh());
        q = emit.write(q, Symbol::End, Dir::Stay, emit.fresh());
        emit.rewind(q, emit.fresh())
    }

    fn lower_exit(&self, q: StateId) -> StateId {
        let emit = self.emit;

        // Consolidate output segments: tag the left tape edge DST and pull
        // each output byte leftward, compacted, until none remain.
        let q = emit.write(q, Symbol::Dst, Dir::Right, emit.fresh());
        let q_clear = emit.fresh();
        let q_find_output = q;
        let mut q = emit.find(q, Dir::Right, Symbol::Output, emit.fresh(), q_clear);
        q = emit.write(q, Symbol::Blank, Dir::Right, emit.fresh());
        q = emit.copy(q, Dir::Left, CopyMode::Compact, emit.fresh());
        emit.write(q, Symbol::Dst, Dir::Right, q_find_output);

        // Erase the rest of the tape right to left, then halt: the halt
        // state gets no rules, so the consuming interpreter stops there.
        let q_clear = emit.ffwd(q_clear, emit.fresh());
        let q_halt = emit.fresh();
        emit.write_if(
            q_clear,
            Symbol::Dst,
            Effect::new(Symbol::Blank, Dir::Stay, q_halt),
            Effect::new(Symbol::Blank, Dir::Left, q_clear),
        );

        // Anything chained after exit is unreachable; give it a dead state
        // so the halt state stays ruleless.
        emit.fresh()
    }
}

/// Scan direction from source record toward destination record. Record
/// order on the tape never changes at runtime, so this is static.
fn record_dir(dst: Reg, src: Reg) -> Dir {
    debug_assert_ne!(dst, src);
    if dst.index() > src.index() {
        Dir::Right
    } else {
        Dir::Left
    }
}
