//! Short vector-ALU dispatchers: VOP1, VOP2, VOPC.
//!
//! These encodings have four concrete forms. The short 4-byte word is the
//! default; operand shape (a scalar or second-destination where the short
//! field cannot hold one) or an explicit modifier promotes to the 8-byte
//! VOP3 form; SDWA and DPP append their extra dword instead on GCN 1.2.

use super::vop3::{emit_vop3_words, vop3_opcode, Vop3Args};
use super::{lit_type, Diags, Emitter, EncodeCtx};
use crate::error::AsmError;
use crate::imm::{parse_imm_f16, parse_imm_f32, parse_imm_u32, Signedness};
use crate::insn::{GcnEncoding, GcnInstruction, InstrFlags};
use crate::operand::{GcnOperand, OperandMask, OperandValue, SrcMods};
use crate::parser::Cursor;
use crate::regs::{RegRange, VCC};
use crate::section::Section;
use crate::usage::{RegField, RwFlags};
use crate::vopmods::parse_vop_modifiers;

/// Source-0 operand mask: the full scalar-source set plus VGPRs, LDS
/// direct and wrapper modifiers.
fn src0_mask(flags: InstrFlags) -> OperandMask {
    OperandMask::SSOURCE
        | OperandMask::SREGS
        | OperandMask::VREGS
        | OperandMask::LDS
        | OperandMask::VOP3_MODS
        | OperandMask::PARSE_WITH_NEG
        | lit_type(flags)
}

fn src1_mask(flags: InstrFlags) -> OperandMask {
    if flags.contains(InstrFlags::SRC1_SGPR) {
        // Lane selects take a scalar register (or m0), never constants.
        OperandMask::SREGS
    } else {
        src0_mask(flags) - OperandMask::LDS
    }
}

fn is_vcc(range: RegRange) -> bool {
    matches!(range, RegRange::Phys { start, end } if start == VCC && end == VCC + 2)
}

pub(crate) fn encode_vop(
    ctx: &EncodeCtx,
    insn: &GcnInstruction,
    cursor: &mut Cursor,
    section: &mut Section,
) -> Result<(), Diags> {
    let mut em = Emitter::new(ctx, section);
    let flags = insn.flags;
    let enc = insn.encoding;

    // Operand phase. VOPC's destination is the compare target (vcc or an
    // explicit SGPR pair); VOP1/VOP2 write a VGPR unless the mnemonic is a
    // lane read.
    let mut dst = RegRange::Empty;
    let mut carry_out = None;
    let mut src0 = GcnOperand::default();
    let mut src1 = None;
    let mut carry_in = None;

    if !flags.contains(InstrFlags::NO_ARGS) {
        dst = if enc == GcnEncoding::Vopc {
            em.sreg(cursor, 2)
        } else if flags.contains(InstrFlags::DST_SGPR) {
            em.sreg(cursor, 1)
        } else {
            em.vreg(cursor, flags.dst_width())
        };
        em.comma(cursor);
        if enc == GcnEncoding::Vop2 && flags.contains(InstrFlags::CARRY_OUT) {
            carry_out = Some(em.sreg(cursor, 2));
            em.comma(cursor);
        }
        src0 = em.operand(cursor, flags.src0_width(), src0_mask(flags));
        if flags.contains(InstrFlags::ARG1_LIT) {
            em.comma(cursor);
            parse_forced_literal(&mut em, cursor, flags);
        }
        if enc != GcnEncoding::Vop1 {
            em.comma(cursor);
            src1 = Some(em.operand(cursor, flags.src1_width(), src1_mask(flags)));
        }
        if flags.contains(InstrFlags::ARG2_LIT) {
            em.comma(cursor);
            parse_forced_literal(&mut em, cursor, flags);
        }
        if flags.contains(InstrFlags::CARRY_IN) {
            em.comma(cursor);
            carry_in = Some(em.sreg(cursor, 2));
        }
    }

    cursor.skip_spaces();
    let tail_pos = cursor.pos();
    let (mods, mut extra) = match parse_vop_modifiers(cursor, &ctx.props, true) {
        Ok(parsed) => parsed,
        Err(e) => {
            em.error(tail_pos, e);
            Default::default()
        }
    };

    // A sext() wrapper is SDWA syntax; it selects the SDWA form like the
    // sel modifiers do.
    let has_sext = src0.mods.contains(SrcMods::SEXT)
        || src1.map_or(false, |s| s.mods.contains(SrcMods::SEXT));
    if has_sext && !extra.need_dpp {
        extra.need_sdwa = true;
        if !ctx.props.has_sdwa_dpp {
            em.error(
                tail_pos,
                AsmError::IncompatibleModifiers(
                    "SDWA and DPP are not available on this architecture",
                ),
            );
        }
    }

    // Form selection.
    let src_mods_used = !src0.mods.is_empty() || src1.map_or(false, |s| !s.mods.is_empty());
    let mut need_vop3 = mods.requires_vop3();
    if enc == GcnEncoding::Vopc && !is_vcc(dst) {
        need_vop3 = true;
    }
    if carry_out.map_or(false, |r| !is_vcc(r)) || carry_in.map_or(false, |r| !is_vcc(r)) {
        need_vop3 = true;
    }
    if !flags.contains(InstrFlags::SRC1_SGPR) {
        if let Some(s1) = &src1 {
            if !s1.is_vector_reg() {
                need_vop3 = true;
            }
        }
    }
    if src_mods_used && !extra.need_sdwa && !extra.need_dpp {
        need_vop3 = true;
    }

    if extra.need_sdwa || extra.need_dpp {
        if need_vop3 {
            em.error(
                tail_pos,
                AsmError::IncompatibleModifiers("operand shape requires VOP3, which excludes SDWA/DPP"),
            );
        }
        if em.has_literal() {
            em.error(tail_pos, AsmError::LiteralNotAllowed);
        }
        if !src0.is_vector_reg() {
            em.error(
                tail_pos,
                AsmError::IncompatibleModifiers("SDWA/DPP source 0 must be a vector register"),
            );
        }
    }
    if need_vop3 && flags.intersects(InstrFlags::ARG1_LIT | InstrFlags::ARG2_LIT) {
        em.error(
            tail_pos,
            AsmError::IncompatibleModifiers("this instruction has no VOP3 form"),
        );
    }

    if need_vop3 {
        if em.has_literal() {
            em.error(tail_pos, AsmError::LiteralNotAllowed);
        }
        let code = vop3_opcode(enc, insn.code, ctx.arch);
        // Carry forms use the VOP3b layout; the second destination rides in
        // the former abs field.
        let sdst = if enc == GcnEncoding::Vop2 && flags.contains(InstrFlags::CARRY_OUT) {
            carry_out
        } else {
            None
        };
        let carry_src = carry_in.map(|r| GcnOperand {
            value: OperandValue::Reg(r),
            mods: SrcMods::empty(),
        });
        let srcs: [Option<&GcnOperand>; 3] = match enc {
            GcnEncoding::Vop1 => [Some(&src0), None, None],
            _ => [Some(&src0), src1.as_ref(), carry_src.as_ref()],
        };
        emit_vop3_words(
            &mut em,
            &Vop3Args {
                code,
                vdst: dst.src_value(),
                sdst: sdst.map(|r| r.src_value()),
                srcs,
                mods,
            },
        );
        let dst_field = if enc == GcnEncoding::Vopc || flags.contains(InstrFlags::DST_SGPR) {
            RegField::Vop3Sdst0
        } else {
            RegField::Vop3Vdst
        };
        em.record(dst, dst_field, RwFlags::WRITE, 1);
        if let Some(sdst) = sdst {
            em.record(sdst, RegField::Vop3Sdst1, RwFlags::WRITE, 1);
        }
        em.record_op(&src0, RegField::Vop3Src0, RwFlags::READ, 1);
        if let Some(s1) = &src1 {
            em.record_op(s1, RegField::Vop3Src1, RwFlags::READ, 1);
        }
        if let Some(carry) = carry_in {
            em.record(carry, RegField::Vop3Ssrc, RwFlags::READ, 1);
        }
        return em.finish(section);
    }

    // Short form; SDWA/DPP replace the src0 field and append their dword.
    let src0_field = if extra.need_sdwa {
        249
    } else if extra.need_dpp {
        250
    } else {
        u32::from(src0.src_value())
    };
    let vsrc1 = src1.map_or(0u32, |s| u32::from(s.src_value() & 0xff));
    let word = match enc {
        GcnEncoding::Vop2 => {
            u32::from(insn.code) << 25
                | u32::from(dst.src_value() & 0xff) << 17
                | vsrc1 << 9
                | src0_field
        }
        GcnEncoding::Vop1 => {
            0x7e00_0000
                | u32::from(dst.src_value() & 0xff) << 17
                | u32::from(insn.code) << 9
                | src0_field
        }
        _ => 0x7c00_0000 | u32::from(insn.code) << 17 | vsrc1 << 9 | src0_field,
    };
    em.push_word(word);
    if extra.need_sdwa {
        let s1 = src1.map(|s| s.mods).unwrap_or_else(SrcMods::empty);
        let sdwa = u32::from(src0.src_value() & 0xff)
            | u32::from(extra.dst_sel) << 8
            | u32::from(extra.dst_unused) << 11
            | u32::from(mods.clamp) << 13
            | u32::from(extra.src0_sel) << 16
            | u32::from(src0.mods.contains(SrcMods::SEXT) || (mods.sext_mask & 1) != 0) << 19
            | u32::from(src0.mods.contains(SrcMods::NEG)) << 20
            | u32::from(src0.mods.contains(SrcMods::ABS)) << 21
            | u32::from(extra.src1_sel) << 24
            | u32::from(s1.contains(SrcMods::SEXT) || (mods.sext_mask & 2) != 0) << 27
            | u32::from(s1.contains(SrcMods::NEG)) << 28
            | u32::from(s1.contains(SrcMods::ABS)) << 29;
        em.push_word(sdwa);
    } else if extra.need_dpp {
        let s1 = src1.map(|s| s.mods).unwrap_or_else(SrcMods::empty);
        let dpp = u32::from(src0.src_value() & 0xff)
            | u32::from(extra.dpp_ctrl) << 8
            | u32::from(extra.bound_ctrl) << 19
            | u32::from(src0.mods.contains(SrcMods::NEG)) << 20
            | u32::from(src0.mods.contains(SrcMods::ABS)) << 21
            | u32::from(s1.contains(SrcMods::NEG)) << 22
            | u32::from(s1.contains(SrcMods::ABS)) << 23
            | u32::from(extra.bank_mask) << 24
            | u32::from(extra.row_mask) << 28;
        em.push_word(dpp);
    }

    let dst_field = if enc == GcnEncoding::Vopc || flags.contains(InstrFlags::DST_SGPR) {
        RegField::VopSdst
    } else {
        RegField::VopVdst
    };
    if enc != GcnEncoding::Vopc {
        em.record(dst, dst_field, RwFlags::WRITE, 1);
    }
    em.record_op(&src0, RegField::VopSrc0, RwFlags::READ, 1);
    if let Some(s1) = &src1 {
        let field = if flags.contains(InstrFlags::SRC1_SGPR) {
            RegField::VopSsrc1
        } else {
            RegField::VopVsrc1
        };
        em.record_op(s1, field, RwFlags::READ, 1);
    }
    em.finish(section)
}

/// The mandatory literal of `v_madmk`/`v_madak`. Always consumes the
/// trailing word, even for values with an inline-constant encoding.
fn parse_forced_literal(em: &mut Emitter, cursor: &mut Cursor, flags: InstrFlags) {
    cursor.skip_spaces();
    let pos = cursor.pos();
    let parsed = if flags.contains(InstrFlags::LIT_F16) {
        parse_imm_f16(cursor).map(u32::from)
    } else if flags.contains(InstrFlags::LIT_FLOAT) {
        parse_imm_f32(cursor)
    } else {
        parse_imm_u32(cursor, None, 32, Signedness::Both)
    };
    match parsed {
        Ok(value) => em.set_literal(pos, value, None),
        Err(e) => em.error(pos, e),
    }
}
