//! Encoding dispatchers, one per family, plus the shared emission machinery.
//!
//! Every dispatcher follows the same shape: parse the operands the encoding
//! expects, parse the modifier tail, choose the concrete form, compose the
//! little-endian words and record register usage. All of that happens on a
//! staging [`Emitter`]; bytes and usage records only reach the section when
//! the whole instruction parsed cleanly.

mod ds;
mod flat;
mod mem;
mod smem;
mod sop;
mod vop;
mod vop3;

use tracing::trace;

use crate::arch::{ArchProps, GpuArch};
use crate::error::AsmError;
use crate::imm::PendingExpr;
use crate::insn::{GcnEncoding, GcnInstruction, InstrFlags};
use crate::operand::{parse_operand, GcnOperand, OperandMask, OperandValue};
use crate::parser::Cursor;
use crate::regs::{self, RegRange, RegVarTable, VGPR_COUNT, VGPR_OFFSET};
use crate::section::{Fixup, FixupKind, Section};
use crate::usage::{RegField, RegVarUsage, RwFlags};

/// Everything a dispatcher needs besides the line itself.
pub(crate) struct EncodeCtx<'a> {
    /// Current architecture family.
    pub arch: GpuArch,
    /// Properties of that family.
    pub props: ArchProps,
    /// Declared register variables.
    pub vars: &'a RegVarTable,
}

/// Diagnostics raised while encoding one instruction: `(column, error)`.
pub(crate) type Diags = Vec<(usize, AsmError)>;

/// Encode one instruction onto `section`.
///
/// On error the section is untouched: no bytes, no usage records.
pub(crate) fn encode_instruction(
    ctx: &EncodeCtx,
    insn: &GcnInstruction,
    cursor: &mut Cursor,
    section: &mut Section,
) -> Result<(), Diags> {
    trace!(mnemonic = insn.mnemonic, encoding = %insn.encoding, "dispatch");
    match insn.encoding {
        GcnEncoding::Sop2 => sop::encode_sop2(ctx, insn, cursor, section),
        GcnEncoding::Sop1 => sop::encode_sop1(ctx, insn, cursor, section),
        GcnEncoding::Sopk => sop::encode_sopk(ctx, insn, cursor, section),
        GcnEncoding::Sopc => sop::encode_sopc(ctx, insn, cursor, section),
        GcnEncoding::Sopp => sop::encode_sopp(ctx, insn, cursor, section),
        GcnEncoding::Smrd => smem::encode_smrd(ctx, insn, cursor, section),
        GcnEncoding::Smem => smem::encode_smem(ctx, insn, cursor, section),
        GcnEncoding::Vop2 | GcnEncoding::Vop1 | GcnEncoding::Vopc => {
            vop::encode_vop(ctx, insn, cursor, section)
        }
        GcnEncoding::Vop3 => vop3::encode_vop3(ctx, insn, cursor, section),
        GcnEncoding::Vintrp => vop3::encode_vintrp(ctx, insn, cursor, section),
        GcnEncoding::Ds => ds::encode_ds(ctx, insn, cursor, section),
        GcnEncoding::Mubuf | GcnEncoding::Mtbuf => mem::encode_buf(ctx, insn, cursor, section),
        GcnEncoding::Mimg => mem::encode_mimg(ctx, insn, cursor, section),
        GcnEncoding::Exp => flat::encode_exp(ctx, insn, cursor, section),
        GcnEncoding::Flat => flat::encode_flat(ctx, insn, cursor, section),
    }
}

/// Literal-typing bits of the operand mask for a mnemonic.
pub(crate) fn lit_type(flags: InstrFlags) -> OperandMask {
    if flags.contains(InstrFlags::LIT_F16) {
        OperandMask::F16_LITERAL
    } else if flags.contains(InstrFlags::LIT_FLOAT) {
        OperandMask::FLOAT_LITERAL
    } else {
        OperandMask::empty()
    }
}

/// Staging area for one instruction.
pub(crate) struct Emitter<'a, 'v> {
    pub ctx: &'a EncodeCtx<'v>,
    offset: usize,
    words: Vec<u32>,
    usage: Vec<RegVarUsage>,
    errors: Diags,
    literal: Option<(u32, Option<PendingExpr>)>,
    fixups: Vec<Fixup>,
    just_recovered: bool,
}

impl<'a, 'v> Emitter<'a, 'v> {
    pub fn new(ctx: &'a EncodeCtx<'v>, section: &Section) -> Self {
        Self {
            ctx,
            offset: section.offset(),
            words: Vec::with_capacity(2),
            usage: Vec::with_capacity(4),
            errors: Vec::new(),
            literal: None,
            fixups: Vec::new(),
            just_recovered: false,
        }
    }

    /// Offset the instruction will land at.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn error(&mut self, pos: usize, e: AsmError) {
        self.errors.push((pos, e));
    }

    /// Require the operand separator, unless we just recovered from a bad
    /// operand (recovery already skipped past it).
    pub fn comma(&mut self, cursor: &mut Cursor) {
        if self.just_recovered {
            self.just_recovered = false;
            return;
        }
        if !cursor.try_consume(b',') {
            let pos = cursor.pos();
            self.error(pos, AsmError::ExpectedToken("`,`"));
        }
    }

    /// Required scalar register range.
    pub fn sreg(&mut self, cursor: &mut Cursor, width: u16) -> RegRange {
        cursor.skip_spaces();
        let pos = cursor.pos();
        match regs::parse_sreg_range(cursor, self.ctx.vars, &self.ctx.props, width, true) {
            Ok(range) => range,
            Err(e) => {
                self.recover(cursor, pos, e);
                RegRange::Empty
            }
        }
    }

    /// Required vector register range.
    pub fn vreg(&mut self, cursor: &mut Cursor, width: u16) -> RegRange {
        cursor.skip_spaces();
        let pos = cursor.pos();
        match regs::parse_vreg_range(cursor, self.ctx.vars, width, true) {
            Ok(range) => range,
            Err(e) => {
                self.recover(cursor, pos, e);
                RegRange::Empty
            }
        }
    }

    /// General operand under `mask`; tracks the literal slot.
    pub fn operand(&mut self, cursor: &mut Cursor, width: u16, mask: OperandMask) -> GcnOperand {
        cursor.skip_spaces();
        let pos = cursor.pos();
        let mut expr = None;
        match parse_operand(
            cursor,
            self.ctx.vars,
            &self.ctx.props,
            width,
            mask,
            Some(&mut expr),
        ) {
            Ok(op) => {
                match op.value {
                    OperandValue::Literal(v) => self.set_literal(pos, v, None),
                    OperandValue::Expr => self.set_literal(pos, 0, expr),
                    _ => {}
                }
                op
            }
            Err(e) => {
                self.recover(cursor, pos, e);
                GcnOperand::default()
            }
        }
    }

    /// Nothing but whitespace may remain after the last operand.
    pub fn expect_end(&mut self, cursor: &mut Cursor) {
        cursor.skip_spaces();
        if !cursor.at_end() {
            let pos = cursor.pos();
            self.error(pos, AsmError::GarbageAtEnd);
        }
    }

    fn recover(&mut self, cursor: &mut Cursor, pos: usize, e: AsmError) {
        self.error(pos, e);
        cursor.skip_to_next_operand();
        self.just_recovered = true;
    }

    /// Claim the instruction's single literal word.
    ///
    /// The same value may be claimed twice (both fields then share the one
    /// trailing word); two distinct values cannot.
    pub fn set_literal(&mut self, pos: usize, value: u32, expr: Option<PendingExpr>) {
        match &self.literal {
            None => self.literal = Some((value, expr)),
            Some((existing, None)) if *existing == value && expr.is_none() => {}
            Some(_) => self.error(pos, AsmError::TooManyLiterals),
        }
    }

    pub fn has_literal(&self) -> bool {
        self.literal.is_some()
    }

    pub fn push_word(&mut self, word: u32) {
        self.words.push(word);
    }

    /// Register a fixup against word `word_index` of this instruction.
    pub fn fixup(
        &mut self,
        word_index: usize,
        bit_offset: u8,
        bit_width: u8,
        signed: bool,
        kind: FixupKind,
        expr: PendingExpr,
    ) {
        self.fixups.push(Fixup {
            offset: self.offset + word_index * 4,
            bit_offset,
            bit_width,
            signed,
            kind,
            expr,
        });
    }

    /// Record usage for a register range.
    ///
    /// Physical ranges are recorded only inside the allocatable scalar pool
    /// or the vector pool; fixed specials never appear in the log.
    /// `var_align` is the slot alignment recorded for register variables.
    pub fn record(&mut self, range: RegRange, field: RegField, rw: RwFlags, var_align: u8) {
        match range {
            RegRange::Empty => {}
            RegRange::Var {
                var, start, end, ..
            } => self.usage.push(RegVarUsage {
                offset: self.offset,
                regvar: Some(var),
                rstart: start,
                rend: end,
                field,
                rw,
                align: var_align,
            }),
            RegRange::Phys { start, end } => {
                let scalar = end <= self.ctx.props.max_sgprs;
                let vector = start >= VGPR_OFFSET && end <= VGPR_OFFSET + VGPR_COUNT;
                if scalar || vector {
                    self.usage.push(RegVarUsage {
                        offset: self.offset,
                        regvar: None,
                        rstart: start,
                        rend: end,
                        field,
                        rw,
                        align: 0,
                    });
                }
            }
        }
    }

    /// Record usage for an operand that may be a register.
    pub fn record_op(&mut self, op: &GcnOperand, field: RegField, rw: RwFlags, var_align: u8) {
        if let OperandValue::Reg(range) = op.value {
            self.record(range, field, rw, var_align);
        }
    }

    /// Commit to the section, or hand the diagnostics back.
    pub fn finish(self, section: &mut Section) -> Result<(), Diags> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        for word in &self.words {
            section.emit_u32(*word);
        }
        if let Some((value, expr)) = self.literal {
            let literal_offset = section.offset();
            section.emit_u32(value);
            if let Some(expr) = expr {
                section.fixups.push(Fixup {
                    offset: literal_offset,
                    bit_offset: 0,
                    bit_width: 32,
                    signed: false,
                    kind: FixupKind::Absolute,
                    expr,
                });
            }
        }
        section.fixups.extend(self.fixups);
        for usage in self.usage {
            section.usage.push(usage);
        }
        trace!(offset = self.offset, size = section.offset() - self.offset, "emitted");
        Ok(())
    }
}

/// `:<imm>` payload of a tail modifier, `bits` wide.
pub(crate) fn mod_imm(em: &mut Emitter, cursor: &mut Cursor, bits: u32) -> Option<u32> {
    if !cursor.try_consume(b':') {
        em.error(cursor.pos(), AsmError::ExpectedToken("`:` after modifier"));
        return None;
    }
    cursor.skip_spaces();
    let pos = cursor.pos();
    match crate::imm::parse_imm_u32(cursor, None, bits, crate::imm::Signedness::Unsigned) {
        Ok(v) => Some(v),
        Err(e) => {
            em.error(pos, e);
            None
        }
    }
}

/// Alignment recorded for a register variable in a scalar slot.
pub(crate) fn scalar_slot_align(width: u16) -> u8 {
    regs::sgpr_align(width) as u8
}

/// Mask for a plain scalar source slot.
pub(crate) fn ssrc_mask(flags: InstrFlags) -> OperandMask {
    OperandMask::SSOURCE | OperandMask::SREGS | lit_type(flags)
}
