//! FLAT memory and EXP dispatchers.

use super::{Diags, Emitter, EncodeCtx};
use crate::arch::GpuArch;
use crate::error::AsmError;
use crate::insn::{GcnInstruction, InstrFlags};
use crate::parser::Cursor;
use crate::regs::RegRange;
use crate::section::Section;
use crate::usage::{RegField, RwFlags};

pub(crate) fn encode_flat(
    ctx: &EncodeCtx,
    insn: &GcnInstruction,
    cursor: &mut Cursor,
    section: &mut Section,
) -> Result<(), Diags> {
    let mut em = Emitter::new(ctx, section);
    let flags = insn.flags;
    let data_width =
        flags.data_width() * if flags.contains(InstrFlags::CMPSWAP) { 2 } else { 1 };

    let mut vdst = RegRange::Empty;
    let mut vdst_pos = 0usize;
    let mut data = RegRange::Empty;
    let is_store = flags.contains(InstrFlags::STORE);
    let is_atomic = flags.contains(InstrFlags::ATOMIC);

    if !is_store {
        cursor.skip_spaces();
        vdst_pos = cursor.pos();
        // Width checked after the tail; tfe widens loads by one register.
        vdst = em.vreg(cursor, 0);
        em.comma(cursor);
    }
    let addr = em.vreg(cursor, 2);
    if is_store || is_atomic {
        em.comma(cursor);
        data = em.vreg(cursor, data_width);
    }
    let (glc, slc, tfe) = parse_flat_tail(&mut em, cursor);

    if !is_store {
        let expected = if is_atomic {
            flags.data_width()
        } else {
            flags.data_width() + u16::from(tfe)
        };
        if !vdst.is_empty() && vdst.width() != expected {
            em.error(
                vdst_pos,
                AsmError::WidthMismatch {
                    expected,
                    got: vdst.width(),
                },
            );
        }
    }

    em.push_word(
        0xdc00_0000
            | u32::from(insn.code) << 18
            | u32::from(slc) << 17
            | u32::from(glc) << 16,
    );
    em.push_word(
        u32::from(vdst.vgpr_value()) << 24
            | u32::from(tfe) << 23
            | u32::from(data.vgpr_value()) << 8
            | u32::from(addr.vgpr_value()),
    );

    // An atomic writes its destination only when glc requests the
    // pre-operation value back.
    if !is_atomic || glc {
        em.record(vdst, RegField::FlatVdst, RwFlags::WRITE, 1);
    }
    em.record(addr, RegField::FlatAddr, RwFlags::READ, 1);
    em.record(data, RegField::FlatData, RwFlags::READ, 1);
    em.finish(section)
}

fn parse_flat_tail(em: &mut Emitter, cursor: &mut Cursor) -> (bool, bool, bool) {
    let (mut glc, mut slc, mut tfe) = (false, false, false);
    loop {
        cursor.skip_spaces();
        if cursor.at_end() {
            return (glc, slc, tfe);
        }
        let pos = cursor.pos();
        match cursor.parse_name() {
            Some("glc") => glc = true,
            Some("slc") => slc = true,
            Some("tfe") => tfe = true,
            Some(other) => {
                em.error(pos, AsmError::UnknownModifier(other.to_string()));
                return (glc, slc, tfe);
            }
            None => {
                em.error(pos, AsmError::GarbageAtEnd);
                return (glc, slc, tfe);
            }
        }
    }
}

pub(crate) fn encode_exp(
    ctx: &EncodeCtx,
    _insn: &GcnInstruction,
    cursor: &mut Cursor,
    section: &mut Section,
) -> Result<(), Diags> {
    let mut em = Emitter::new(ctx, section);

    let target = parse_exp_target(&mut em, cursor);
    let mut en = 0u32;
    let mut srcs = [RegRange::Empty; 4];
    for (i, slot) in srcs.iter_mut().enumerate() {
        em.comma(cursor);
        cursor.skip_spaces();
        let save = cursor.pos();
        if let Some(name) = cursor.parse_name() {
            if name == "off" {
                continue;
            }
            cursor.set_pos(save);
        }
        *slot = em.vreg(cursor, 1);
        en |= 1 << i;
    }
    let (done, compr, vm) = parse_exp_tail(&mut em, cursor);

    let base: u32 = if ctx.arch.contains(GpuArch::GCN1_2) {
        0xc400_0000
    } else {
        0xf800_0000
    };
    em.push_word(
        base | u32::from(vm) << 12
            | u32::from(done) << 11
            | u32::from(compr) << 10
            | target << 4
            | en,
    );
    em.push_word(
        u32::from(srcs[3].vgpr_value()) << 24
            | u32::from(srcs[2].vgpr_value()) << 16
            | u32::from(srcs[1].vgpr_value()) << 8
            | u32::from(srcs[0].vgpr_value()),
    );
    let fields = [
        RegField::ExpVsrc0,
        RegField::ExpVsrc1,
        RegField::ExpVsrc2,
        RegField::ExpVsrc3,
    ];
    for (range, field) in srcs.into_iter().zip(fields) {
        em.record(range, field, RwFlags::READ, 1);
    }
    em.finish(section)
}

/// Export target: `mrt0..7`, `mrtz`, `null`, `pos0..3`, `param0..31`.
fn parse_exp_target(em: &mut Emitter, cursor: &mut Cursor) -> u32 {
    cursor.skip_spaces();
    let pos = cursor.pos();
    let Some(name) = cursor.parse_name() else {
        em.error(pos, AsmError::ExpectedToken("export target"));
        return 0;
    };
    let parse_indexed = |prefix: &str, base: u32, count: u32| -> Option<u32> {
        let digits = name.strip_prefix(prefix)?;
        let n: u32 = digits.parse().ok()?;
        (n < count).then_some(base + n)
    };
    let target = match name {
        "mrtz" => Some(8),
        "null" => Some(9),
        _ => parse_indexed("mrt", 0, 8)
            .or_else(|| parse_indexed("pos", 12, 4))
            .or_else(|| parse_indexed("param", 32, 32)),
    };
    match target {
        Some(t) => t,
        None => {
            em.error(pos, AsmError::ExpectedToken("export target"));
            0
        }
    }
}

fn parse_exp_tail(em: &mut Emitter, cursor: &mut Cursor) -> (bool, bool, bool) {
    let (mut done, mut compr, mut vm) = (false, false, false);
    loop {
        cursor.skip_spaces();
        if cursor.at_end() {
            return (done, compr, vm);
        }
        let pos = cursor.pos();
        match cursor.parse_name() {
            Some("done") => done = true,
            Some("compr") => compr = true,
            Some("vm") => vm = true,
            Some(other) => {
                em.error(pos, AsmError::UnknownModifier(other.to_string()));
                return (done, compr, vm);
            }
            None => {
                em.error(pos, AsmError::GarbageAtEnd);
                return (done, compr, vm);
            }
        }
    }
}
