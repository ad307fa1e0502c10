//! VOP3-proper and VINTRP dispatchers, plus the long-form word builder
//! shared with the promoted VOP1/VOP2/VOPC paths.

use super::{lit_type, Diags, Emitter, EncodeCtx};
use crate::arch::GpuArch;
use crate::error::AsmError;
use crate::insn::{GcnEncoding, GcnInstruction, InstrFlags};
use crate::operand::{GcnOperand, OperandMask, SrcMods};
use crate::parser::Cursor;
use crate::regs::RegRange;
use crate::section::Section;
use crate::usage::{RegField, RwFlags};
use crate::vopmods::{parse_vop_modifiers, VopMods};

/// VOP3 opcode for a mnemonic, including short-encoding promotions.
pub(super) fn vop3_opcode(encoding: GcnEncoding, code: u16, arch: GpuArch) -> u16 {
    match encoding {
        GcnEncoding::Vopc => code,
        GcnEncoding::Vop2 => 0x100 + code,
        GcnEncoding::Vop1 => {
            if arch.contains(GpuArch::GCN1_2) {
                0x140 + code
            } else {
                0x180 + code
            }
        }
        _ => code,
    }
}

/// Field values for one VOP3 instruction.
pub(super) struct Vop3Args<'o> {
    pub code: u16,
    /// `vdst` field value (a VGPR index, or the SGPR of a promoted
    /// scalar-destination form).
    pub vdst: u16,
    /// VOP3b second destination; `None` selects the VOP3a layout.
    pub sdst: Option<u16>,
    pub srcs: [Option<&'o GcnOperand>; 3],
    pub mods: VopMods,
}

/// Compose the two VOP3 words. Layouts differ between generations: GCN 1.2
/// widens the opcode to 10 bits and moves clamp to bit 15.
pub(super) fn emit_vop3_words(em: &mut Emitter, args: &Vop3Args) {
    let abs = args.mods.abs_mask
        | src_mask(&args.srcs, SrcMods::ABS);
    let neg = args.mods.neg_mask
        | src_mask(&args.srcs, SrcMods::NEG);

    let vi = em.ctx.arch.contains(GpuArch::GCN1_2);
    let mut w0: u32 = 0xd000_0000;
    if vi {
        w0 |= u32::from(args.code & 0x3ff) << 16;
        if args.mods.clamp {
            w0 |= 1 << 15;
        }
    } else {
        w0 |= u32::from(args.code & 0x1ff) << 17;
        // SI/CI VOP3b has no clamp bit; the field is the second destination.
        if args.sdst.is_none() && args.mods.clamp {
            w0 |= 1 << 11;
        }
    }
    match args.sdst {
        Some(sdst) => w0 |= u32::from(sdst & 0x7f) << 8,
        None => w0 |= u32::from(abs & 7) << 8,
    }
    w0 |= u32::from(args.vdst & 0xff);

    let src = |i: usize| -> u32 {
        args.srcs[i].map_or(0, |op| u32::from(op.src_value()))
    };
    let w1 = u32::from(neg & 7) << 29
        | u32::from(args.mods.omod & 3) << 27
        | src(2) << 18
        | src(1) << 9
        | src(0);
    em.push_word(w0);
    em.push_word(w1);
}

fn src_mask(srcs: &[Option<&GcnOperand>; 3], bit: SrcMods) -> u8 {
    let mut mask = 0u8;
    for (i, src) in srcs.iter().enumerate() {
        if let Some(op) = src {
            if op.mods.contains(bit) {
                mask |= 1 << i;
            }
        }
    }
    mask
}

fn vop3_src_mask(flags: InstrFlags) -> OperandMask {
    OperandMask::SSOURCE
        | OperandMask::SREGS
        | OperandMask::VREGS
        | OperandMask::VOP3_MODS
        | OperandMask::VOP3_NEG
        | OperandMask::ONLY_INLINE_CONSTS
        | OperandMask::NO_LITERAL
        | lit_type(flags)
}

pub(crate) fn encode_vop3(
    ctx: &EncodeCtx,
    insn: &GcnInstruction,
    cursor: &mut Cursor,
    section: &mut Section,
) -> Result<(), Diags> {
    let mut em = Emitter::new(ctx, section);
    let flags = insn.flags;

    let vdst = em.vreg(cursor, flags.dst_width());
    let sdst = if flags.contains(InstrFlags::VOP3B) {
        em.comma(cursor);
        Some(em.sreg(cursor, 2))
    } else {
        None
    };
    em.comma(cursor);
    let src0 = em.operand(cursor, flags.src0_width(), vop3_src_mask(flags));
    em.comma(cursor);
    let src1 = em.operand(cursor, flags.src1_width(), vop3_src_mask(flags));
    let src2 = if flags.contains(InstrFlags::TWO_SRC) {
        None
    } else {
        em.comma(cursor);
        Some(em.operand(cursor, flags.src2_width(), vop3_src_mask(flags)))
    };

    cursor.skip_spaces();
    let tail_pos = cursor.pos();
    let (mods, extra) = match parse_vop_modifiers(cursor, &ctx.props, true) {
        Ok(parsed) => parsed,
        Err(e) => {
            em.error(tail_pos, e);
            Default::default()
        }
    };
    if extra.need_sdwa || extra.need_dpp {
        em.error(
            tail_pos,
            AsmError::IncompatibleModifiers("SDWA/DPP cannot be used with a VOP3-only instruction"),
        );
    }

    emit_vop3_words(
        &mut em,
        &Vop3Args {
            code: insn.code,
            vdst: vdst.src_value(),
            sdst: sdst.map(|r| r.src_value()),
            srcs: [Some(&src0), Some(&src1), src2.as_ref()],
            mods,
        },
    );
    em.record(vdst, RegField::Vop3Vdst, RwFlags::WRITE, 1);
    if let Some(sdst) = sdst {
        em.record(sdst, RegField::Vop3Sdst1, RwFlags::WRITE, 1);
    }
    em.record_op(&src0, RegField::Vop3Src0, RwFlags::READ, 1);
    em.record_op(&src1, RegField::Vop3Src1, RwFlags::READ, 1);
    if let Some(src2) = &src2 {
        em.record_op(src2, RegField::Vop3Src2, RwFlags::READ, 1);
    }
    em.finish(section)
}

pub(crate) fn encode_vintrp(
    ctx: &EncodeCtx,
    insn: &GcnInstruction,
    cursor: &mut Cursor,
    section: &mut Section,
) -> Result<(), Diags> {
    let mut em = Emitter::new(ctx, section);

    let vdst = em.vreg(cursor, 1);
    em.comma(cursor);
    let (vsrc_field, vsrc_range) = if insn.flags.contains(InstrFlags::VINTRP_P) {
        (parse_param_src(&mut em, cursor), RegRange::Empty)
    } else {
        let r = em.vreg(cursor, 1);
        (u32::from(r.vgpr_value()), r)
    };
    em.comma(cursor);
    let (attr, chan) = parse_attr(&mut em, cursor);
    em.expect_end(cursor);

    let base: u32 = if ctx.arch.contains(GpuArch::GCN1_2) {
        0xd400_0000
    } else {
        0xc800_0000
    };
    em.push_word(
        base | u32::from(vdst.vgpr_value()) << 18
            | u32::from(insn.code) << 16
            | attr << 10
            | chan << 8
            | vsrc_field,
    );
    em.record(vdst, RegField::VintrpVdst, RwFlags::WRITE, 1);
    em.record(vsrc_range, RegField::VintrpVsrc, RwFlags::READ, 1);
    em.finish(section)
}

/// `p10` / `p20` / `p0` source selector of `v_interp_mov_f32`.
fn parse_param_src(em: &mut Emitter, cursor: &mut Cursor) -> u32 {
    cursor.skip_spaces();
    let pos = cursor.pos();
    match cursor.parse_name() {
        Some("p10") => 0,
        Some("p20") => 1,
        Some("p0") => 2,
        Some(other) => {
            em.error(pos, AsmError::UnknownRegister(other.to_string()));
            0
        }
        None => {
            em.error(pos, AsmError::ExpectedToken("p0, p10 or p20"));
            0
        }
    }
}

/// `attr<N>.<x|y|z|w>` descriptor.
fn parse_attr(em: &mut Emitter, cursor: &mut Cursor) -> (u32, u32) {
    cursor.skip_spaces();
    let pos = cursor.pos();
    let Some(name) = cursor.parse_name() else {
        em.error(pos, AsmError::ExpectedToken("attribute"));
        return (0, 0);
    };
    let parsed = name.strip_prefix("attr").and_then(|rest| {
        let (num, chan) = rest.split_once('.')?;
        let attr: u32 = num.parse().ok().filter(|&n| n < 64)?;
        let chan = match chan {
            "x" => 0,
            "y" => 1,
            "z" => 2,
            "w" => 3,
            _ => return None,
        };
        Some((attr, chan))
    });
    match parsed {
        Some(pair) => pair,
        None => {
            em.error(pos, AsmError::ExpectedToken("attribute (attr<N>.<x|y|z|w>)"));
            (0, 0)
        }
    }
}
