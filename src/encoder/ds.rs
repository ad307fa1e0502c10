//! LDS/GDS dispatcher.

use super::{Diags, Emitter, EncodeCtx};
use crate::arch::GpuArch;
use crate::error::AsmError;
use crate::insn::{GcnInstruction, InstrFlags};
use crate::parser::Cursor;
use crate::regs::RegRange;
use crate::section::Section;
use crate::usage::{RegField, RwFlags};

#[derive(Default)]
struct DsTail {
    offset0: u32,
    offset1: u32,
    gds: bool,
}

pub(crate) fn encode_ds(
    ctx: &EncodeCtx,
    insn: &GcnInstruction,
    cursor: &mut Cursor,
    section: &mut Section,
) -> Result<(), Diags> {
    let mut em = Emitter::new(ctx, section);
    let flags = insn.flags;
    let width = flags.data_width();

    let mut vdst = RegRange::Empty;
    let mut addr = RegRange::Empty;
    let mut data0 = RegRange::Empty;
    let mut data1 = RegRange::Empty;
    let mut first = true;
    let mut sep = |em: &mut Emitter, cursor: &mut Cursor, first: &mut bool| {
        if !*first {
            em.comma(cursor);
        }
        *first = false;
    };

    if flags.contains(InstrFlags::DS_VDST) {
        // read2 returns two elements, so the destination doubles.
        let vdst_width = if flags.contains(InstrFlags::DS_OFF2) {
            width * 2
        } else {
            width
        };
        sep(&mut em, cursor, &mut first);
        vdst = em.vreg(cursor, vdst_width);
    }
    if !flags.contains(InstrFlags::DS_NO_ADDR) {
        sep(&mut em, cursor, &mut first);
        addr = em.vreg(cursor, 1);
    }
    if !flags.contains(InstrFlags::DS_NO_DATA) {
        sep(&mut em, cursor, &mut first);
        data0 = em.vreg(cursor, width);
        if flags.contains(InstrFlags::DS_2D) {
            em.comma(cursor);
            data1 = em.vreg(cursor, width);
        }
    }
    let tail = parse_ds_tail(&mut em, cursor);
    let gds = tail.gds || flags.contains(InstrFlags::DS_GDS);

    let mut w0: u32 = 0xd800_0000 | tail.offset0 | tail.offset1 << 8;
    if ctx.arch.contains(GpuArch::GCN1_2) {
        w0 |= u32::from(insn.code) << 17 | u32::from(gds) << 16;
    } else {
        w0 |= u32::from(insn.code) << 18 | u32::from(gds) << 17;
    }
    em.push_word(w0);
    em.push_word(
        u32::from(vdst.vgpr_value()) << 24
            | u32::from(data1.vgpr_value()) << 16
            | u32::from(data0.vgpr_value()) << 8
            | u32::from(addr.vgpr_value()),
    );
    em.record(vdst, RegField::DsVdst, RwFlags::WRITE, 1);
    em.record(addr, RegField::DsAddr, RwFlags::READ, 1);
    em.record(data0, RegField::DsData0, RwFlags::READ, 1);
    em.record(data1, RegField::DsData1, RwFlags::READ, 1);
    em.finish(section)
}

fn parse_ds_tail(em: &mut Emitter, cursor: &mut Cursor) -> DsTail {
    let mut tail = DsTail::default();
    loop {
        cursor.skip_spaces();
        if cursor.at_end() {
            return tail;
        }
        let pos = cursor.pos();
        let Some(name) = cursor.parse_name() else {
            em.error(pos, AsmError::GarbageAtEnd);
            return tail;
        };
        match name {
            // A single `offset:` spans the full 16-bit field; on two-offset
            // ops it fills both bytes at once.
            "offset" => match super::mod_imm(em, cursor, 16) {
                Some(v) => {
                    tail.offset0 = v & 0xff;
                    tail.offset1 = (v >> 8) & 0xff;
                }
                None => return tail,
            },
            "offset0" => match super::mod_imm(em, cursor, 8) {
                Some(v) => tail.offset0 = v,
                None => return tail,
            },
            "offset1" => match super::mod_imm(em, cursor, 8) {
                Some(v) => tail.offset1 = v,
                None => return tail,
            },
            "gds" => tail.gds = true,
            other => {
                em.error(pos, AsmError::UnknownModifier(other.to_string()));
                return tail;
            }
        }
    }
}
