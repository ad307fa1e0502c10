//! Scalar-memory dispatchers: SMRD (GCN 1.0/1.1) and SMEM (GCN 1.2).
//!
//! The same source line selects between the two purely by architecture;
//! the mnemonic table carries one row per generation.

use super::{scalar_slot_align, Diags, Emitter, EncodeCtx};
use crate::error::AsmError;
use crate::imm::{parse_imm_u32, Signedness};
use crate::insn::{GcnInstruction, InstrFlags};
use crate::parser::Cursor;
use crate::regs::{self, RegRange};
use crate::section::{FixupKind, Section};
use crate::usage::{RegField, RwFlags};

fn sbase_width(flags: InstrFlags) -> u16 {
    if flags.contains(InstrFlags::SBASE4) {
        4
    } else {
        2
    }
}

/// Optional scalar-register offset; falls back to an immediate of `bits`.
/// Returns `(field_value, imm_flag, register)`; the caller records the
/// register after the base so the usage log keeps field order.
fn parse_soffset(
    em: &mut Emitter,
    cursor: &mut Cursor,
    bits: u32,
    word_index: usize,
    bit_offset: u8,
) -> (u32, bool, RegRange) {
    cursor.skip_spaces();
    let pos = cursor.pos();
    match regs::parse_sreg_range(cursor, em.ctx.vars, &em.ctx.props, 1, false) {
        Ok(RegRange::Empty) => {}
        Ok(range) => return (u32::from(range.src_value()), false, range),
        Err(e) => {
            em.error(pos, e);
            return (0, false, RegRange::Empty);
        }
    }
    let mut expr = None;
    match parse_imm_u32(cursor, Some(&mut expr), bits, Signedness::Unsigned) {
        Ok(value) => {
            if let Some(expr) = expr {
                em.fixup(word_index, bit_offset, bits as u8, false, FixupKind::Absolute, expr);
            }
            (value, true, RegRange::Empty)
        }
        Err(e) => {
            em.error(pos, e);
            (0, true, RegRange::Empty)
        }
    }
}

pub(crate) fn encode_smrd(
    ctx: &EncodeCtx,
    insn: &GcnInstruction,
    cursor: &mut Cursor,
    section: &mut Section,
) -> Result<(), Diags> {
    let mut em = Emitter::new(ctx, section);
    let flags = insn.flags;
    let width = flags.data_width();

    let mut sdst = RegRange::Empty;
    let mut sbase = RegRange::Empty;
    let mut offset = (0u32, false, RegRange::Empty);
    if !flags.contains(InstrFlags::NO_ARGS) {
        sdst = em.sreg(cursor, width);
        if !flags.contains(InstrFlags::ONLY_DST) {
            em.comma(cursor);
            sbase = em.sreg(cursor, sbase_width(flags));
            em.comma(cursor);
            offset = parse_soffset(&mut em, cursor, 8, 0, 0);
        }
    }
    em.expect_end(cursor);

    let (off_value, imm, soffset_reg) = offset;
    em.push_word(
        0xc000_0000
            | u32::from(insn.code) << 22
            | u32::from(sdst.src_value()) << 15
            | (u32::from(sbase.src_value()) >> 1) << 9
            | u32::from(imm) << 8
            | (off_value & 0xff),
    );
    em.record(sdst, RegField::SmrdSdst, RwFlags::WRITE, scalar_slot_align(width));
    em.record(
        sbase,
        RegField::SmrdSbase,
        RwFlags::READ,
        scalar_slot_align(sbase_width(flags)),
    );
    em.record(soffset_reg, RegField::SmrdSoffset, RwFlags::READ, 1);
    em.finish(section)
}

pub(crate) fn encode_smem(
    ctx: &EncodeCtx,
    insn: &GcnInstruction,
    cursor: &mut Cursor,
    section: &mut Section,
) -> Result<(), Diags> {
    let mut em = Emitter::new(ctx, section);
    let flags = insn.flags;
    let width = flags.data_width();

    let mut sdata = RegRange::Empty;
    let mut sdata_imm = 0u32;
    let mut sbase = RegRange::Empty;
    let mut offset = (0u32, false, RegRange::Empty);
    if !flags.contains(InstrFlags::NO_ARGS) {
        if flags.contains(InstrFlags::SDATA_IMM) {
            cursor.skip_spaces();
            let pos = cursor.pos();
            match parse_imm_u32(cursor, None, 7, Signedness::Unsigned) {
                Ok(v) => sdata_imm = v,
                Err(e) => em.error(pos, e),
            }
        } else {
            sdata = em.sreg(cursor, width);
        }
        if !flags.contains(InstrFlags::ONLY_DST) {
            em.comma(cursor);
            sbase = em.sreg(cursor, sbase_width(flags));
            em.comma(cursor);
            offset = parse_soffset(&mut em, cursor, 20, 1, 0);
        }
    }
    let glc = parse_smem_tail(&mut em, cursor);

    let (off_value, imm, soffset_reg) = offset;
    let sdata_field = if flags.contains(InstrFlags::SDATA_IMM) {
        sdata_imm
    } else {
        u32::from(sdata.src_value())
    };
    em.push_word(
        0xc000_0000
            | u32::from(insn.code) << 18
            | u32::from(imm) << 17
            | u32::from(glc) << 16
            | (sdata_field & 0x7f) << 6
            | (u32::from(sbase.src_value()) >> 1),
    );
    em.push_word(off_value & 0xf_ffff);

    let rw = if flags.contains(InstrFlags::STORE) {
        RwFlags::READ
    } else {
        RwFlags::WRITE
    };
    em.record(sdata, RegField::SmrdSdst, rw, scalar_slot_align(width));
    em.record(
        sbase,
        RegField::SmrdSbase,
        RwFlags::READ,
        scalar_slot_align(sbase_width(flags)),
    );
    em.record(soffset_reg, RegField::SmrdSoffset, RwFlags::READ, 1);
    em.finish(section)
}

fn parse_smem_tail(em: &mut Emitter, cursor: &mut Cursor) -> bool {
    let mut glc = false;
    loop {
        cursor.skip_spaces();
        if cursor.at_end() {
            return glc;
        }
        let pos = cursor.pos();
        match cursor.parse_name() {
            Some("glc") => glc = true,
            Some(other) => {
                em.error(pos, AsmError::UnknownModifier(other.to_string()));
                return glc;
            }
            None => {
                em.error(pos, AsmError::GarbageAtEnd);
                return glc;
            }
        }
    }
}
