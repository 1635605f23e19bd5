// This module implements the line-oriented parser for the IR text format.
// Parsing is two-phase: a single forward pass turns lines into instructions
// while assigning program counters (each label opens a new basic block and
// every instruction in a block shares the block's index as its pc), then a
// fixup pass resolves jump targets that named labels. The parser only
// validates shape; whether an opcode or operand combination is actually
// supported by the backend is the backend's call, so `jmp A` parses fine
// here and fails translation later. Errors carry the 1-based source line.

//! Parser for the register-machine IR text format.

use std::collections::HashMap;

use thiserror::Error;

use super::{Inst, InstKind, Module, Operand, Reg};

/// Parse failure, with the 1-based source line it occurred on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: unknown mnemonic `{mnemonic}`")]
    UnknownMnemonic { line: usize, mnemonic: String },

    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("line {line}: duplicate label `{label}`")]
    DuplicateLabel { line: usize, label: String },

    #[error("line {line}: undefined label `{label}`")]
    UndefinedLabel { line: usize, label: String },
}

impl ParseError {
    fn malformed(line: usize, message: impl Into<String>) -> Self {
        ParseError::Malformed {
            line,
            message: message.into(),
        }
    }
}

/// Parse a complete module from text.
pub fn parse_module(text: &str) -> Result<Module, ParseError> {
    Parser::new().parse(text)
}

#[derive(PartialEq)]
enum Section {
    Text,
    Data,
}

/// Jump operand that named a label, patched after all labels are known.
struct Fixup {
    inst_index: usize,
    label: String,
    line: usize,
}

struct Parser {
    module: Module,
    section: Section,
    labels: HashMap<String, u32>,
    fixups: Vec<Fixup>,
    /// Program counter of the block currently being filled.
    pc: u32,
    /// Whether the current block already holds an instruction; a label seen
    /// afterwards starts the next block.
    block_dirty: bool,
}

impl Parser {
    fn new() -> Self {
        Self {
            module: Module::default(),
            section: Section::Text,
            labels: HashMap::new(),
            fixups: Vec::new(),
            pc: 0,
            block_dirty: false,
        }
    }

    fn parse(mut self, text: &str) -> Result<Module, ParseError> {
        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            if let Some(section) = line.strip_prefix('.') {
                match section {
                    "text" => self.section = Section::Text,
                    "data" => self.section = Section::Data,
                    other => {
                        return Err(ParseError::malformed(
                            line_no,
                            format!("unknown section `.{other}`"),
                        ))
                    }
                }
                continue;
            }

            match self.section {
                Section::Text => self.parse_text_line(line, line_no)?,
                Section::Data => self.parse_data_line(line, line_no)?,
            }
        }

        self.resolve_fixups()?;
        Ok(self.module)
    }

    fn parse_text_line(&mut self, line: &str, line_no: usize) -> Result<(), ParseError> {
        if let Some(label) = line.strip_suffix(':') {
            let label = label.trim();
            if label.is_empty() || label.contains(char::is_whitespace) {
                return Err(ParseError::malformed(line_no, "malformed label"));
            }
            if self.block_dirty {
                self.pc += 1;
                self.block_dirty = false;
            }
            if self.labels.insert(label.to_string(), self.pc).is_some() {
                return Err(ParseError::DuplicateLabel {
                    line: line_no,
                    label: label.to_string(),
                });
            }
            return Ok(());
        }

        let (mnemonic, rest) = match line.split_once(char::is_whitespace) {
            Some((m, rest)) => (m, rest.trim()),
            None => (line, ""),
        };
        let operands: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(',').map(str::trim).collect()
        };

        let kind = self.parse_inst(mnemonic, &operands, line_no)?;
        self.module.text.push(Inst { pc: self.pc, kind });
        self.block_dirty = true;
        Ok(())
    }

    fn parse_inst(
        &mut self,
        mnemonic: &str,
        operands: &[&str],
        line_no: usize,
    ) -> Result<InstKind, ParseError> {
        let kind = match mnemonic.to_ascii_lowercase().as_str() {
            "mov" => {
                let (dst, src) = self.reg_and_operand(operands, line_no)?;
                InstKind::Mov { dst, src }
            }
            "add" => {
                let (dst, src) = self.reg_and_operand(operands, line_no)?;
                InstKind::Add { dst, src }
            }
            "sub" => {
                let (dst, src) = self.reg_and_operand(operands, line_no)?;
                InstKind::Sub { dst, src }
            }
            "load" => {
                let (dst, addr) = self.reg_and_operand(operands, line_no)?;
                InstKind::Load { dst, addr }
            }
            "store" => {
                let (src, addr) = self.reg_and_operand(operands, line_no)?;
                InstKind::Store { src, addr }
            }
            "jmp" => {
                let target = self.one_operand(operands, line_no, true)?;
                InstKind::Jmp { target }
            }
            "putc" => {
                let src = self.one_operand(operands, line_no, false)?;
                InstKind::Putc { src }
            }
            "getc" => {
                let dst = self.one_reg(operands, line_no)?;
                InstKind::Getc { dst }
            }
            "exit" => {
                self.no_operands(operands, line_no)?;
                InstKind::Exit
            }
            "dump" => {
                self.no_operands(operands, line_no)?;
                InstKind::Dump
            }
            other => {
                return Err(ParseError::UnknownMnemonic {
                    line: line_no,
                    mnemonic: other.to_string(),
                })
            }
        };
        Ok(kind)
    }

    fn reg_and_operand(
        &mut self,
        operands: &[&str],
        line_no: usize,
    ) -> Result<(Reg, Operand), ParseError> {
        let [dst, src] = operands else {
            return Err(ParseError::malformed(line_no, "expected two operands"));
        };
        let dst = Reg::from_name(dst)
            .ok_or_else(|| ParseError::malformed(line_no, format!("`{dst}` is not a register")))?;
        let src = self.operand(src, line_no, false)?;
        Ok((dst, src))
    }

    fn one_operand(
        &mut self,
        operands: &[&str],
        line_no: usize,
        allow_label: bool,
    ) -> Result<Operand, ParseError> {
        let [op] = operands else {
            return Err(ParseError::malformed(line_no, "expected one operand"));
        };
        self.operand(op, line_no, allow_label)
    }

    fn one_reg(&mut self, operands: &[&str], line_no: usize) -> Result<Reg, ParseError> {
        match self.one_operand(operands, line_no, false)? {
            Operand::Reg(reg) => Ok(reg),
            Operand::Imm(_) => Err(ParseError::malformed(line_no, "expected a register")),
        }
    }

    fn no_operands(&self, operands: &[&str], line_no: usize) -> Result<(), ParseError> {
        if operands.is_empty() {
            Ok(())
        } else {
            Err(ParseError::malformed(line_no, "expected no operands"))
        }
    }

    fn operand(
        &mut self,
        text: &str,
        line_no: usize,
        allow_label: bool,
    ) -> Result<Operand, ParseError> {
        if let Some(reg) = Reg::from_name(text) {
            return Ok(Operand::Reg(reg));
        }
        if let Ok(imm) = text.parse::<u32>() {
            return Ok(Operand::Imm(imm));
        }
        if let Some(ch) = parse_char_literal(text) {
            return Ok(Operand::Imm(ch as u32));
        }
        if allow_label && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            // Resolved once all labels are known.
            self.fixups.push(Fixup {
                inst_index: self.module.text.len(),
                label: text.to_string(),
                line: line_no,
            });
            return Ok(Operand::Imm(0));
        }
        Err(ParseError::malformed(
            line_no,
            format!("malformed operand `{text}`"),
        ))
    }

    fn parse_data_line(&mut self, line: &str, line_no: usize) -> Result<(), ParseError> {
        let mut rest = line;
        while !rest.is_empty() {
            rest = rest.trim_start();
            if rest.is_empty() {
                break;
            }
            if let Some(tail) = rest.strip_prefix('"') {
                let Some(end) = tail.find('"') else {
                    return Err(ParseError::malformed(line_no, "unterminated string"));
                };
                self.module.data.extend(tail[..end].bytes());
                rest = &tail[end + 1..];
            } else {
                let token = rest.split_whitespace().next().unwrap_or(rest);
                let value: u32 = token.parse().map_err(|_| {
                    ParseError::malformed(line_no, format!("malformed data value `{token}`"))
                })?;
                self.module.data.push((value & 0xff) as u8);
                rest = &rest[token.len()..];
            }
        }
        Ok(())
    }

    fn resolve_fixups(&mut self) -> Result<(), ParseError> {
        for fixup in &self.fixups {
            let Some(&pc) = self.labels.get(&fixup.label) else {
                return Err(ParseError::UndefinedLabel {
                    line: fixup.line,
                    label: fixup.label.clone(),
                });
            };
            let inst = &mut self.module.text[fixup.inst_index];
            match &mut inst.kind {
                InstKind::Jmp { target } => *target = Operand::Imm(pc),
                _ => unreachable!("label fixup on non-jump"),
            }
        }
        Ok(())
    }
}

fn strip_comment(line: &str) -> &str {
    // `;` comments; quoted data strings never contain one in our inputs.
    match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_char_literal(text: &str) -> Option<u8> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut chars = inner.chars();
    let ch = chars.next()?;
    if chars.next().is_some() || !ch.is_ascii() {
        return None;
    }
    Some(ch as u8)
}
