//! Scalar-ALU dispatchers: SOP2, SOP1, SOPK, SOPC, SOPP.

use super::{scalar_slot_align, ssrc_mask, Diags, Emitter, EncodeCtx};
use crate::error::AsmError;
use crate::imm::{parse_imm_u32, Signedness};
use crate::insn::{GcnInstruction, InstrFlags};
use crate::parser::Cursor;
use crate::section::{FixupKind, Section};
use crate::usage::{RegField, RwFlags};

pub(crate) fn encode_sop2(
    ctx: &EncodeCtx,
    insn: &GcnInstruction,
    cursor: &mut Cursor,
    section: &mut Section,
) -> Result<(), Diags> {
    let mut em = Emitter::new(ctx, section);
    let flags = insn.flags;

    let sdst = if flags.contains(InstrFlags::NO_DST) {
        crate::regs::RegRange::Empty
    } else {
        let r = em.sreg(cursor, flags.dst_width());
        em.comma(cursor);
        r
    };
    let src0 = em.operand(cursor, flags.src0_width(), ssrc_mask(flags));
    em.comma(cursor);
    let src1 = em.operand(cursor, flags.src1_width(), ssrc_mask(flags));
    em.expect_end(cursor);

    em.push_word(
        0x8000_0000
            | u32::from(insn.code) << 23
            | u32::from(sdst.src_value()) << 16
            | u32::from(src1.src_value()) << 8
            | u32::from(src0.src_value()),
    );
    em.record(sdst, RegField::SDst, RwFlags::WRITE, scalar_slot_align(flags.dst_width()));
    em.record_op(&src0, RegField::Ssrc0, RwFlags::READ, scalar_slot_align(flags.src0_width()));
    em.record_op(&src1, RegField::Ssrc1, RwFlags::READ, scalar_slot_align(flags.src1_width()));
    em.finish(section)
}

pub(crate) fn encode_sop1(
    ctx: &EncodeCtx,
    insn: &GcnInstruction,
    cursor: &mut Cursor,
    section: &mut Section,
) -> Result<(), Diags> {
    let mut em = Emitter::new(ctx, section);
    let flags = insn.flags;

    let sdst = if flags.contains(InstrFlags::NO_DST) {
        crate::regs::RegRange::Empty
    } else {
        em.sreg(cursor, flags.dst_width())
    };
    let src0 = if flags.contains(InstrFlags::NO_SRC) {
        crate::operand::GcnOperand::default()
    } else {
        if !flags.contains(InstrFlags::NO_DST) {
            em.comma(cursor);
        }
        em.operand(cursor, flags.src0_width(), ssrc_mask(flags))
    };
    em.expect_end(cursor);

    em.push_word(
        0xbe80_0000
            | u32::from(sdst.src_value()) << 16
            | u32::from(insn.code) << 8
            | u32::from(src0.src_value()),
    );
    em.record(sdst, RegField::SDst, RwFlags::WRITE, scalar_slot_align(flags.dst_width()));
    em.record_op(&src0, RegField::Ssrc0, RwFlags::READ, scalar_slot_align(flags.src0_width()));
    em.finish(section)
}

pub(crate) fn encode_sopk(
    ctx: &EncodeCtx,
    insn: &GcnInstruction,
    cursor: &mut Cursor,
    section: &mut Section,
) -> Result<(), Diags> {
    let mut em = Emitter::new(ctx, section);
    let flags = insn.flags;
    let mut sdst = crate::regs::RegRange::Empty;
    let mut imm16 = 0u16;
    let mut imm32 = None;

    if flags.contains(InstrFlags::HWREG) {
        if flags.contains(InstrFlags::IMM32) {
            // s_setreg_imm32_b32  hwreg(...), imm32
            imm16 = parse_hwreg(&mut em, cursor);
            em.comma(cursor);
            cursor.skip_spaces();
            let pos = cursor.pos();
            match parse_imm_u32(cursor, None, 32, Signedness::Both) {
                Ok(v) => imm32 = Some(v),
                Err(e) => em.error(pos, e),
            }
        } else if flags.contains(InstrFlags::DST_READ) {
            // s_setreg_b32  hwreg(...), sN
            imm16 = parse_hwreg(&mut em, cursor);
            em.comma(cursor);
            sdst = em.sreg(cursor, 1);
        } else {
            // s_getreg_b32  sN, hwreg(...)
            sdst = em.sreg(cursor, 1);
            em.comma(cursor);
            imm16 = parse_hwreg(&mut em, cursor);
        }
    } else {
        sdst = em.sreg(cursor, flags.dst_width());
        em.comma(cursor);
        imm16 = parse_imm16_or_branch(&mut em, cursor, flags);
    }
    em.expect_end(cursor);

    em.push_word(
        0xb000_0000
            | u32::from(insn.code) << 23
            | u32::from(sdst.src_value()) << 16
            | u32::from(imm16),
    );
    if let Some(extra) = imm32 {
        em.push_word(extra);
    }
    let rw = if flags.contains(InstrFlags::DST_READ) {
        RwFlags::READ
    } else {
        RwFlags::WRITE
    };
    em.record(sdst, RegField::SDst, rw, scalar_slot_align(flags.dst_width()));
    em.finish(section)
}

pub(crate) fn encode_sopc(
    ctx: &EncodeCtx,
    insn: &GcnInstruction,
    cursor: &mut Cursor,
    section: &mut Section,
) -> Result<(), Diags> {
    let mut em = Emitter::new(ctx, section);
    let flags = insn.flags;

    let src0 = em.operand(cursor, flags.src0_width(), ssrc_mask(flags));
    em.comma(cursor);
    let src1 = em.operand(cursor, flags.src1_width(), ssrc_mask(flags));
    em.expect_end(cursor);

    em.push_word(
        0xbf00_0000
            | u32::from(insn.code) << 16
            | u32::from(src1.src_value()) << 8
            | u32::from(src0.src_value()),
    );
    em.record_op(&src0, RegField::Ssrc0, RwFlags::READ, scalar_slot_align(flags.src0_width()));
    em.record_op(&src1, RegField::Ssrc1, RwFlags::READ, scalar_slot_align(flags.src1_width()));
    em.finish(section)
}

pub(crate) fn encode_sopp(
    ctx: &EncodeCtx,
    insn: &GcnInstruction,
    cursor: &mut Cursor,
    section: &mut Section,
) -> Result<(), Diags> {
    let mut em = Emitter::new(ctx, section);
    let flags = insn.flags;

    let imm16 = if flags.contains(InstrFlags::NO_ARGS) {
        0
    } else if flags.contains(InstrFlags::WAITCNT) {
        parse_waitcnt(&mut em, cursor)
    } else {
        parse_imm16_or_branch(&mut em, cursor, flags)
    };
    em.expect_end(cursor);

    em.push_word(0xbf80_0000 | u32::from(insn.code) << 16 | u32::from(imm16));
    em.finish(section)
}

/// 16-bit immediate; branch-style mnemonics take labels and get the
/// delta-encoded word offset (via a fixup for forward references).
fn parse_imm16_or_branch(em: &mut Emitter, cursor: &mut Cursor, flags: InstrFlags) -> u16 {
    cursor.skip_spaces();
    let pos = cursor.pos();
    let mut expr = None;
    match parse_imm_u32(cursor, Some(&mut expr), 16, Signedness::Both) {
        Ok(value) => {
            if let Some(expr) = expr {
                let kind = if flags.contains(InstrFlags::IMM_REL) {
                    FixupKind::BranchWord
                } else {
                    FixupKind::Absolute
                };
                em.fixup(0, 0, 16, true, kind, expr);
                0
            } else if flags.contains(InstrFlags::IMM_REL) {
                // Numeric branch target: absolute section offset.
                let delta = (value as i64 - (em.offset() as i64 + 4)) / 4;
                delta as u16
            } else {
                value as u16
            }
        }
        Err(e) => {
            em.error(pos, e);
            0
        }
    }
}

/// `hwreg(<name|id>, offset, size)` for `s_getreg`/`s_setreg`.
fn parse_hwreg(em: &mut Emitter, cursor: &mut Cursor) -> u16 {
    cursor.skip_spaces();
    let pos = cursor.pos();
    let name = cursor.parse_name();
    if name != Some("hwreg") {
        em.error(pos, AsmError::ExpectedToken("hwreg"));
        return 0;
    }
    if !cursor.try_consume(b'(') {
        em.error(cursor.pos(), AsmError::ExpectedToken("`(`"));
        return 0;
    }
    cursor.skip_spaces();
    let id_pos = cursor.pos();
    let id = if let Some(reg_name) = cursor.parse_name() {
        match hwreg_id(reg_name) {
            Some(id) => u32::from(id),
            None => {
                em.error(id_pos, AsmError::UnknownRegister(reg_name.to_string()));
                0
            }
        }
    } else {
        match parse_imm_u32(cursor, None, 6, Signedness::Unsigned) {
            Ok(v) => v,
            Err(e) => {
                em.error(id_pos, e);
                0
            }
        }
    };
    let field = |em: &mut Emitter, cursor: &mut Cursor, bits: u32| -> u32 {
        if !cursor.try_consume(b',') {
            em.error(cursor.pos(), AsmError::ExpectedToken("`,`"));
            return 0;
        }
        cursor.skip_spaces();
        let pos = cursor.pos();
        match parse_imm_u32(cursor, None, bits, Signedness::Unsigned) {
            Ok(v) => v,
            Err(e) => {
                em.error(pos, e);
                0
            }
        }
    };
    let offset = field(em, cursor, 5);
    let size = field(em, cursor, 6).clamp(1, 32);
    if !cursor.try_consume(b')') {
        em.error(cursor.pos(), AsmError::ExpectedToken("`)`"));
    }
    (id | offset << 6 | (size - 1) << 11) as u16
}

fn hwreg_id(name: &str) -> Option<u16> {
    Some(match name {
        "mode" => 1,
        "status" => 2,
        "trapsts" => 3,
        "hw_id" => 4,
        "gpr_alloc" => 5,
        "lds_alloc" => 6,
        "ib_sts" => 7,
        "pc_lo" => 8,
        "pc_hi" => 9,
        "inst_dw0" => 10,
        "inst_dw1" => 11,
        "ib_dbg0" => 12,
        _ => return None,
    })
}

/// `s_waitcnt` immediate: either a plain value or the
/// `vmcnt(N) & expcnt(N) & lgkmcnt(N)` spelling. Unnamed counters stay at
/// their no-wait maxima.
fn parse_waitcnt(em: &mut Emitter, cursor: &mut Cursor) -> u16 {
    cursor.skip_spaces();
    if matches!(cursor.peek(), Some(b'0'..=b'9' | b'-')) {
        let pos = cursor.pos();
        return match parse_imm_u32(cursor, None, 16, Signedness::Both) {
            Ok(v) => v as u16,
            Err(e) => {
                em.error(pos, e);
                0
            }
        };
    }
    let (mut vmcnt, mut expcnt, mut lgkmcnt) = (0xfu32, 0x7u32, 0xfu32);
    loop {
        cursor.skip_spaces();
        let pos = cursor.pos();
        let Some(name) = cursor.parse_name() else {
            em.error(pos, AsmError::ExpectedToken("waitcnt counter"));
            break;
        };
        let (slot, bits) = match name {
            "vmcnt" => (&mut vmcnt, 4),
            "expcnt" => (&mut expcnt, 3),
            "lgkmcnt" => (&mut lgkmcnt, 4),
            other => {
                em.error(pos, AsmError::UnknownModifier(other.to_string()));
                break;
            }
        };
        if !cursor.try_consume(b'(') {
            em.error(cursor.pos(), AsmError::ExpectedToken("`(`"));
            break;
        }
        cursor.skip_spaces();
        let vpos = cursor.pos();
        match parse_imm_u32(cursor, None, bits, Signedness::Unsigned) {
            Ok(v) => *slot = v,
            Err(e) => em.error(vpos, e),
        }
        if !cursor.try_consume(b')') {
            em.error(cursor.pos(), AsmError::ExpectedToken("`)`"));
            break;
        }
        cursor.skip_spaces();
        if !cursor.try_consume(b'&') && !cursor.try_consume(b',') {
            break;
        }
    }
    (vmcnt | expcnt << 4 | lgkmcnt << 8) as u16
}
