//! Buffer and image dispatchers: MUBUF, MTBUF, MIMG.
//!
//! The vector-data and vector-address widths of these encodings depend on
//! tail modifiers (`tfe`, `offen`/`idxen`, `r128`, `dmask`), so both are
//! parsed width-free and validated once the tail is known.

use super::{Diags, Emitter, EncodeCtx};
use crate::error::AsmError;
use crate::insn::{GcnEncoding, GcnInstruction, InstrFlags};
use crate::operand::OperandMask;
use crate::parser::Cursor;
use crate::regs::RegRange;
use crate::section::Section;
use crate::usage::{RegField, RwFlags};

#[derive(Default)]
struct BufTail {
    offen: bool,
    idxen: bool,
    addr64: bool,
    glc: bool,
    slc: bool,
    tfe: bool,
    lds: bool,
    offset: u32,
    dfmt: u32,
    nfmt: u32,
}

fn data_rw(flags: InstrFlags, glc: bool) -> RwFlags {
    if flags.contains(InstrFlags::ATOMIC) {
        if glc {
            RwFlags::READ | RwFlags::WRITE
        } else {
            RwFlags::READ
        }
    } else if flags.contains(InstrFlags::STORE) {
        RwFlags::READ
    } else {
        RwFlags::WRITE
    }
}

fn check_width(em: &mut Emitter, pos: usize, range: RegRange, expected: u16) {
    let got = range.width();
    if !range.is_empty() && expected != 0 && got != expected {
        em.error(pos, AsmError::WidthMismatch { expected, got });
    }
}

pub(crate) fn encode_buf(
    ctx: &EncodeCtx,
    insn: &GcnInstruction,
    cursor: &mut Cursor,
    section: &mut Section,
) -> Result<(), Diags> {
    let mut em = Emitter::new(ctx, section);
    let flags = insn.flags;
    let mtbuf = insn.encoding == GcnEncoding::Mtbuf;

    if flags.contains(InstrFlags::NO_ARGS) {
        cursor.skip_spaces();
        em.expect_end(cursor);
        em.push_word(0xe000_0000 | u32::from(insn.code) << 18);
        em.push_word(0);
        return em.finish(section);
    }

    cursor.skip_spaces();
    let vdata_pos = cursor.pos();
    let vdata = em.vreg(cursor, 0);
    em.comma(cursor);
    cursor.skip_spaces();
    let vaddr_pos = cursor.pos();
    let vaddr = em.vreg(cursor, 0);
    em.comma(cursor);
    let srsrc = em.sreg(cursor, 4);
    em.comma(cursor);
    let soffset = em.operand(
        cursor,
        1,
        OperandMask::SSOURCE
            | OperandMask::SREGS
            | OperandMask::ONLY_INLINE_CONSTS
            | OperandMask::NO_LITERAL_MUBUF,
    );
    let tail = parse_buf_tail(&mut em, cursor, mtbuf, ctx);

    let data_width =
        flags.data_width() * if flags.contains(InstrFlags::CMPSWAP) { 2 } else { 1 }
            + u16::from(tail.tfe);
    check_width(&mut em, vdata_pos, vdata, data_width);
    let addr_width = if tail.addr64 || (tail.offen && tail.idxen) {
        2
    } else {
        1
    };
    check_width(&mut em, vaddr_pos, vaddr, addr_width);

    let mut w0: u32 = if mtbuf {
        0xe800_0000
            | tail.nfmt << 23
            | tail.dfmt << 19
            | u32::from(insn.code & 7) << 16
    } else {
        0xe000_0000 | u32::from(insn.code) << 18 | u32::from(tail.lds) << 16
    };
    w0 |= u32::from(tail.addr64) << 15
        | u32::from(tail.glc) << 14
        | u32::from(tail.idxen) << 13
        | u32::from(tail.offen) << 12
        | (tail.offset & 0xfff);
    em.push_word(w0);
    em.push_word(
        u32::from(soffset.src_value()) << 24
            | u32::from(tail.tfe) << 23
            | u32::from(tail.slc) << 22
            | (u32::from(srsrc.src_value()) >> 2) << 16
            | u32::from(vdata.vgpr_value()) << 8
            | u32::from(vaddr.vgpr_value()),
    );

    em.record(vdata, RegField::MubufVdata, data_rw(flags, tail.glc), 1);
    em.record(vaddr, RegField::MubufVaddr, RwFlags::READ, 1);
    em.record(srsrc, RegField::MubufSrsrc, RwFlags::READ, 4);
    em.record_op(&soffset, RegField::MubufSoffset, RwFlags::READ, 1);
    em.finish(section)
}

fn parse_buf_tail(em: &mut Emitter, cursor: &mut Cursor, mtbuf: bool, ctx: &EncodeCtx) -> BufTail {
    let mut tail = BufTail::default();
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
            "offen" => tail.offen = true,
            "idxen" => tail.idxen = true,
            "addr64" => {
                if ctx.props.has_smem {
                    // addr64 addressing was dropped together with SMRD.
                    em.error(pos, AsmError::UnknownModifier(name.to_string()));
                } else {
                    tail.addr64 = true;
                }
            }
            "glc" => tail.glc = true,
            "slc" => tail.slc = true,
            "tfe" => tail.tfe = true,
            "lds" if !mtbuf => tail.lds = true,
            "offset" => match super::mod_imm(em, cursor, 12) {
                Some(v) => tail.offset = v,
                None => return tail,
            },
            "format" if mtbuf => {
                if !parse_format(em, cursor, &mut tail) {
                    return tail;
                }
            }
            other => {
                em.error(pos, AsmError::UnknownModifier(other.to_string()));
                return tail;
            }
        }
    }
}

/// MTBUF `format:[dfmt,nfmt]`. Either component may be named or numeric,
/// in either order.
fn parse_format(em: &mut Emitter, cursor: &mut Cursor, tail: &mut BufTail) -> bool {
    if !cursor.try_consume(b':') || !cursor.try_consume(b'[') {
        em.error(cursor.pos(), AsmError::ExpectedToken("`:[` after format"));
        return false;
    }
    loop {
        cursor.skip_spaces();
        let pos = cursor.pos();
        // Format names may start with a digit (`8_8_8_8`), so scan the
        // token by hand instead of using the identifier rules.
        let mut token = String::new();
        while let Some(b) = cursor.peek() {
            if !b.is_ascii_alphanumeric() && b != b'_' {
                break;
            }
            token.push(b as char);
            cursor.bump();
        }
        if let Some(dfmt) = dfmt_value(&token) {
            tail.dfmt = dfmt;
        } else if let Some(nfmt) = nfmt_value(&token) {
            tail.nfmt = nfmt;
        } else if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            match token.parse::<u32>() {
                Ok(v) if v < 16 => tail.dfmt = v,
                _ => {
                    em.error(pos, AsmError::UnknownModifier(token));
                    return false;
                }
            }
        } else {
            em.error(pos, AsmError::UnknownModifier(token));
            return false;
        }
        if cursor.try_consume(b']') {
            return true;
        }
        if !cursor.try_consume(b',') {
            em.error(cursor.pos(), AsmError::ExpectedToken("`,` or `]`"));
            return false;
        }
    }
}

fn dfmt_value(name: &str) -> Option<u32> {
    Some(match name {
        "8" => 1,
        "16" => 2,
        "8_8" => 3,
        "32" => 4,
        "16_16" => 5,
        "10_11_11" => 6,
        "11_11_10" => 7,
        "10_10_10_2" => 8,
        "2_10_10_10" => 9,
        "8_8_8_8" => 10,
        "32_32" => 11,
        "16_16_16_16" => 12,
        "32_32_32" => 13,
        "32_32_32_32" => 14,
        _ => return None,
    })
}

fn nfmt_value(name: &str) -> Option<u32> {
    Some(match name {
        "unorm" => 0,
        "snorm" => 1,
        "uscaled" => 2,
        "sscaled" => 3,
        "uint" => 4,
        "sint" => 5,
        "snorm_ogl" => 6,
        "float" => 7,
        _ => return None,
    })
}

#[derive(Default)]
struct MimgTail {
    dmask: u32,
    unorm: bool,
    glc: bool,
    slc: bool,
    r128: bool,
    tfe: bool,
    lwe: bool,
    da: bool,
    d16: bool,
}

pub(crate) fn encode_mimg(
    ctx: &EncodeCtx,
    insn: &GcnInstruction,
    cursor: &mut Cursor,
    section: &mut Section,
) -> Result<(), Diags> {
    let mut em = Emitter::new(ctx, section);
    let flags = insn.flags;

    cursor.skip_spaces();
    let vdata_pos = cursor.pos();
    let vdata = em.vreg(cursor, 0);
    em.comma(cursor);
    cursor.skip_spaces();
    let vaddr_pos = cursor.pos();
    let vaddr = em.vreg(cursor, 0);
    em.comma(cursor);
    cursor.skip_spaces();
    let srsrc_pos = cursor.pos();
    let srsrc = em.sreg(cursor, 0);
    let ssamp = if flags.contains(InstrFlags::MIMG_SAMPLE) {
        em.comma(cursor);
        em.sreg(cursor, 4)
    } else {
        RegRange::Empty
    };
    let tail = parse_mimg_tail(&mut em, cursor, ctx);

    let dmask = if tail.dmask == 0 { 1 } else { tail.dmask };
    let data_width = (dmask.count_ones() as u16)
        * if flags.contains(InstrFlags::CMPSWAP) { 2 } else { 1 }
        + u16::from(tail.tfe);
    check_width(&mut em, vdata_pos, vdata, data_width);
    check_width(&mut em, srsrc_pos, srsrc, if tail.r128 { 4 } else { 8 });
    if !vaddr.is_empty() && !(1..=4).contains(&vaddr.width()) {
        em.error(
            vaddr_pos,
            AsmError::WidthMismatch {
                expected: 4,
                got: vaddr.width(),
            },
        );
    }

    em.push_word(
        0xf000_0000
            | u32::from(tail.slc) << 25
            | u32::from(insn.code) << 18
            | u32::from(tail.lwe) << 17
            | u32::from(tail.tfe) << 16
            | u32::from(tail.r128) << 15
            | u32::from(tail.da) << 14
            | u32::from(tail.glc) << 13
            | u32::from(tail.unorm) << 12
            | dmask << 8,
    );
    em.push_word(
        u32::from(tail.d16) << 31
            | (u32::from(ssamp.src_value()) >> 2) << 21
            | (u32::from(srsrc.src_value()) >> 2) << 16
            | u32::from(vdata.vgpr_value()) << 8
            | u32::from(vaddr.vgpr_value()),
    );

    em.record(vdata, RegField::MimgVdata, data_rw(flags, tail.glc), 1);
    em.record(vaddr, RegField::MimgVaddr, RwFlags::READ, 1);
    em.record(srsrc, RegField::MimgSrsrc, RwFlags::READ, 4);
    em.record(ssamp, RegField::MimgSsamp, RwFlags::READ, 4);
    em.finish(section)
}

fn parse_mimg_tail(em: &mut Emitter, cursor: &mut Cursor, ctx: &EncodeCtx) -> MimgTail {
    let mut tail = MimgTail::default();
    tail.dmask = 1;
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
            "dmask" => match super::mod_imm(em, cursor, 4) {
                Some(v) => tail.dmask = v,
                None => return tail,
            },
            "unorm" => tail.unorm = true,
            "glc" => tail.glc = true,
            "slc" => tail.slc = true,
            "r128" => tail.r128 = true,
            "tfe" => tail.tfe = true,
            "lwe" => tail.lwe = true,
            "da" => tail.da = true,
            "d16" => {
                if ctx.props.has_f16_consts {
                    tail.d16 = true;
                } else {
                    em.error(pos, AsmError::UnknownModifier(name.to_string()));
                }
            }
            other => {
                em.error(pos, AsmError::UnknownModifier(other.to_string()));
                return tail;
            }
        }
    }
}
