//! VOP modifier-tail parsing: output modifiers, VOP3 forcing, SDWA and DPP.
//!
//! After the positional operands of a vector-ALU instruction the tail may
//! carry whitespace-separated modifier tokens. Which concrete form the
//! instruction takes (short, VOP3, SDWA word, DPP word) falls out of what
//! was collected here plus the operand shapes.

use crate::arch::ArchProps;
use crate::error::AsmError;
use crate::imm::{parse_imm_u32, Signedness};
use crate::parser::Cursor;

/// Output-modifier field values.
pub const OMOD_NONE: u8 = 0;
/// `mul:2`.
pub const OMOD_MUL2: u8 = 1;
/// `mul:4`.
pub const OMOD_MUL4: u8 = 2;
/// `div:2`.
pub const OMOD_DIV2: u8 = 3;

/// SDWA selector for a full dword.
pub const SDWA_DWORD: u8 = 6;
/// SDWA `dst_unused:PAD`.
pub const SDWA_UNUSED_PAD: u8 = 0;
/// SDWA `dst_unused:SEXT`.
pub const SDWA_UNUSED_SEXT: u8 = 1;
/// SDWA `dst_unused:PRESERVE`.
pub const SDWA_UNUSED_PRESERVE: u8 = 2;

/// Modifiers that pick or decorate the VOP3 form.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VopMods {
    /// Output-modifier field (`OMOD_*`).
    pub omod: u8,
    /// Clamp bit.
    pub clamp: bool,
    /// `vop3` token: long form requested explicitly.
    pub force_vop3: bool,
    /// Per-source absolute-value bits from `abs:[…]`.
    pub abs_mask: u8,
    /// Per-source negation bits from `neg:[…]`.
    pub neg_mask: u8,
    /// Per-source sign-extension bits from `sext:[…]` (SDWA).
    pub sext_mask: u8,
}

impl VopMods {
    /// True when a collected modifier is only expressible in VOP3.
    pub fn requires_vop3(&self) -> bool {
        self.force_vop3 || self.omod != OMOD_NONE || self.abs_mask != 0 || self.neg_mask != 0
    }
}

/// SDWA and DPP fields, a plain record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VopExtraModifiers {
    /// SDWA destination selector.
    pub dst_sel: u8,
    /// SDWA destination unused-bits policy.
    pub dst_unused: u8,
    /// SDWA source-0 selector.
    pub src0_sel: u8,
    /// SDWA source-1 selector.
    pub src1_sel: u8,
    /// DPP bank mask.
    pub bank_mask: u8,
    /// DPP row mask.
    pub row_mask: u8,
    /// DPP control field.
    pub dpp_ctrl: u16,
    /// DPP bound-control bit.
    pub bound_ctrl: bool,
    /// An SDWA field was written; the SDWA word must be emitted.
    pub need_sdwa: bool,
    /// A DPP field was written; the DPP word must be emitted.
    pub need_dpp: bool,
}

impl Default for VopExtraModifiers {
    fn default() -> Self {
        Self {
            dst_sel: SDWA_DWORD,
            dst_unused: SDWA_UNUSED_PAD,
            src0_sel: SDWA_DWORD,
            src1_sel: SDWA_DWORD,
            bank_mask: 0xf,
            row_mask: 0xf,
            dpp_ctrl: 0x100,
            bound_ctrl: false,
            need_sdwa: false,
            need_dpp: false,
        }
    }
}

fn expect_colon(cursor: &mut Cursor, name: &'static str) -> Result<(), AsmError> {
    if cursor.try_consume(b':') {
        cursor.skip_spaces();
        Ok(())
    } else {
        Err(AsmError::ExpectedToken(name))
    }
}

fn mod_value(cursor: &mut Cursor, name: &'static str, max: u32) -> Result<u32, AsmError> {
    expect_colon(cursor, name)?;
    let value = parse_imm_u32(cursor, None, 0, Signedness::Unsigned)?;
    if value > max {
        return Err(AsmError::ImmOutOfRange {
            value,
            bits: 32 - max.leading_zeros(),
        });
    }
    Ok(value)
}

/// `[a,b,c]` list of 0/1 flags (one per source), or a plain bitmask.
fn src_bitmask(cursor: &mut Cursor, name: &'static str) -> Result<u8, AsmError> {
    expect_colon(cursor, name)?;
    if cursor.try_consume(b'[') {
        let mut mask = 0u8;
        let mut bit = 0u8;
        loop {
            cursor.skip_spaces();
            let v = parse_imm_u32(cursor, None, 1, Signedness::Unsigned)?;
            if v != 0 {
                mask |= 1 << bit;
            }
            bit += 1;
            if cursor.try_consume(b']') {
                break;
            }
            if !cursor.try_consume(b',') || bit >= 3 {
                return Err(AsmError::ExpectedToken("`,` or `]`"));
            }
        }
        Ok(mask)
    } else {
        parse_imm_u32(cursor, None, 3, Signedness::Unsigned).map(|v| v as u8)
    }
}

fn sdwa_sel(cursor: &mut Cursor) -> Result<u8, AsmError> {
    cursor.skip_spaces();
    let save = cursor.pos();
    if let Some(name) = cursor.parse_name() {
        let sel = match name {
            "byte0" | "byte_0" | "b0" => 0,
            "byte1" | "byte_1" | "b1" => 1,
            "byte2" | "byte_2" | "b2" => 2,
            "byte3" | "byte_3" | "b3" => 3,
            "word0" | "word_0" | "w0" => 4,
            "word1" | "word_1" | "w1" => 5,
            "dword" | "dw" => SDWA_DWORD,
            _ => {
                cursor.set_pos(save);
                return Err(AsmError::ExpectedToken("SDWA selector"));
            }
        };
        return Ok(sel);
    }
    parse_imm_u32(cursor, None, 3, Signedness::Unsigned).map(|v| v as u8)
}

/// Parse the modifier tail until end of line.
///
/// `with_clamp` is false for the few encodings that reject `clamp`.
pub fn parse_vop_modifiers(
    cursor: &mut Cursor,
    props: &ArchProps,
    with_clamp: bool,
) -> Result<(VopMods, VopExtraModifiers), AsmError> {
    let mut mods = VopMods::default();
    let mut extra = VopExtraModifiers::default();

    loop {
        cursor.skip_spaces();
        if cursor.at_end() {
            break;
        }
        let Some(name) = cursor.parse_name() else {
            return Err(AsmError::GarbageAtEnd);
        };
        match name {
            "mul" => {
                let v = mod_value(cursor, "`:` after mul", 4)?;
                let omod = match v {
                    2 => OMOD_MUL2,
                    4 => OMOD_MUL4,
                    _ => return Err(AsmError::ExpectedToken("2 or 4 after mul:")),
                };
                if mods.omod != OMOD_NONE && mods.omod != omod {
                    return Err(AsmError::DuplicatedModifier("mul"));
                }
                mods.omod = omod;
            }
            "div" => {
                let v = mod_value(cursor, "`:` after div", 2)?;
                if v != 2 {
                    return Err(AsmError::ExpectedToken("2 after div:"));
                }
                if mods.omod != OMOD_NONE && mods.omod != OMOD_DIV2 {
                    return Err(AsmError::DuplicatedModifier("div"));
                }
                mods.omod = OMOD_DIV2;
            }
            "clamp" => {
                if !with_clamp {
                    return Err(AsmError::IncompatibleModifiers(
                        "clamp is not allowed in this encoding",
                    ));
                }
                mods.clamp = true;
            }
            "vop3" => mods.force_vop3 = true,
            "abs" => mods.abs_mask = src_bitmask(cursor, "`:` after abs")?,
            "neg" => mods.neg_mask = src_bitmask(cursor, "`:` after neg")?,
            "sext" => {
                mods.sext_mask = src_bitmask(cursor, "`:` after sext")?;
                extra.need_sdwa = true;
            }
            "dst_sel" => {
                expect_colon(cursor, "`:` after dst_sel")?;
                extra.dst_sel = sdwa_sel(cursor)?;
                extra.need_sdwa = true;
            }
            "src0_sel" => {
                expect_colon(cursor, "`:` after src0_sel")?;
                extra.src0_sel = sdwa_sel(cursor)?;
                extra.need_sdwa = true;
            }
            "src1_sel" => {
                expect_colon(cursor, "`:` after src1_sel")?;
                extra.src1_sel = sdwa_sel(cursor)?;
                extra.need_sdwa = true;
            }
            "dst_unused" => {
                expect_colon(cursor, "`:` after dst_unused")?;
                let save = cursor.pos();
                let word = cursor
                    .parse_name()
                    .ok_or(AsmError::ExpectedToken("dst_unused policy"))?;
                extra.dst_unused = match word {
                    "pad" | "PAD" => SDWA_UNUSED_PAD,
                    "sext" | "SEXT" => SDWA_UNUSED_SEXT,
                    "preserve" | "PRESERVE" => SDWA_UNUSED_PRESERVE,
                    _ => {
                        cursor.set_pos(save);
                        return Err(AsmError::ExpectedToken("dst_unused policy"));
                    }
                };
                extra.need_sdwa = true;
            }
            "quad_perm" => {
                expect_colon(cursor, "`:` after quad_perm")?;
                if !cursor.try_consume(b'[') {
                    return Err(AsmError::ExpectedToken("`[`"));
                }
                let mut ctrl = 0u16;
                for lane in 0..4 {
                    cursor.skip_spaces();
                    let v = parse_imm_u32(cursor, None, 2, Signedness::Unsigned)?;
                    ctrl |= (v as u16 & 3) << (lane * 2);
                    let closer = if lane == 3 { b']' } else { b',' };
                    if !cursor.try_consume(closer) {
                        return Err(AsmError::ExpectedToken("`,` or `]`"));
                    }
                }
                extra.dpp_ctrl = ctrl;
                extra.need_dpp = true;
            }
            "row_shl" | "row_shr" | "row_ror" => {
                let base = match name {
                    "row_shl" => 0x100,
                    "row_shr" => 0x110,
                    _ => 0x120,
                };
                let v = mod_value(cursor, "`:` after row shift", 15)?;
                if v == 0 {
                    return Err(AsmError::ExpectedToken("shift of 1..15"));
                }
                extra.dpp_ctrl = base + v as u16;
                extra.need_dpp = true;
            }
            "wave_shl" | "wave_rol" | "wave_shr" | "wave_ror" => {
                extra.dpp_ctrl = match name {
                    "wave_shl" => 0x130,
                    "wave_rol" => 0x134,
                    "wave_shr" => 0x138,
                    _ => 0x13c,
                };
                // The `:1` spelling is accepted and checked.
                if cursor.try_consume(b':') {
                    cursor.skip_spaces();
                    let v = parse_imm_u32(cursor, None, 1, Signedness::Unsigned)?;
                    if v != 1 {
                        return Err(AsmError::ExpectedToken("1 after wave shift"));
                    }
                }
                extra.need_dpp = true;
            }
            "row_mirror" => {
                extra.dpp_ctrl = 0x140;
                extra.need_dpp = true;
            }
            "row_half_mirror" => {
                extra.dpp_ctrl = 0x141;
                extra.need_dpp = true;
            }
            "row_bcast15" => {
                extra.dpp_ctrl = 0x142;
                extra.need_dpp = true;
            }
            "row_bcast31" => {
                extra.dpp_ctrl = 0x143;
                extra.need_dpp = true;
            }
            "row_bcast" => {
                let v = mod_value(cursor, "`:` after row_bcast", 31)?;
                extra.dpp_ctrl = match v {
                    15 => 0x142,
                    31 => 0x143,
                    _ => return Err(AsmError::ExpectedToken("15 or 31 after row_bcast:")),
                };
                extra.need_dpp = true;
            }
            "row_mask" => {
                extra.row_mask = mod_value(cursor, "`:` after row_mask", 15)? as u8;
                extra.need_dpp = true;
            }
            "bank_mask" => {
                extra.bank_mask = mod_value(cursor, "`:` after bank_mask", 15)? as u8;
                extra.need_dpp = true;
            }
            "bound_ctrl" => {
                if cursor.try_consume(b':') {
                    cursor.skip_spaces();
                    let v = parse_imm_u32(cursor, None, 1, Signedness::Unsigned)?;
                    extra.bound_ctrl = v != 0;
                } else {
                    extra.bound_ctrl = true;
                }
                extra.need_dpp = true;
            }
            other => return Err(AsmError::UnknownModifier(other.to_string())),
        }
    }

    if extra.need_sdwa && extra.need_dpp {
        return Err(AsmError::IncompatibleModifiers(
            "SDWA and DPP cannot be combined",
        ));
    }
    if (extra.need_sdwa || extra.need_dpp) && mods.requires_vop3() {
        return Err(AsmError::IncompatibleModifiers(
            "VOP3 form cannot carry SDWA or DPP",
        ));
    }
    if (extra.need_sdwa || extra.need_dpp) && !props.has_sdwa_dpp {
        return Err(AsmError::IncompatibleModifiers(
            "SDWA and DPP are not available on this architecture",
        ));
    }
    if extra.need_dpp && mods.clamp {
        return Err(AsmError::IncompatibleModifiers("clamp cannot be used with DPP"));
    }
    Ok((mods, extra))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{ArchProps, GpuArch};

    fn parse(text: &str, arch: GpuArch) -> Result<(VopMods, VopExtraModifiers), AsmError> {
        parse_vop_modifiers(&mut Cursor::new(text), &ArchProps::of(arch), true)
    }

    #[test]
    fn empty_tail() {
        let (mods, extra) = parse("", GpuArch::GCN1_0).unwrap();
        assert!(!mods.requires_vop3());
        assert!(!extra.need_sdwa && !extra.need_dpp);
    }

    #[test]
    fn omod_and_clamp() {
        let (mods, _) = parse("mul:2 clamp", GpuArch::GCN1_0).unwrap();
        assert_eq!(mods.omod, OMOD_MUL2);
        assert!(mods.clamp);
        assert!(mods.requires_vop3());
        let (mods, _) = parse("div:2", GpuArch::GCN1_0).unwrap();
        assert_eq!(mods.omod, OMOD_DIV2);
        assert!(matches!(
            parse("mul:3", GpuArch::GCN1_0),
            Err(AsmError::ExpectedToken(_))
        ));
        assert!(matches!(
            parse("mul:2 div:2", GpuArch::GCN1_0),
            Err(AsmError::DuplicatedModifier(_))
        ));
    }

    #[test]
    fn vop3_token() {
        let (mods, _) = parse("vop3", GpuArch::GCN1_0).unwrap();
        assert!(mods.force_vop3);
    }

    #[test]
    fn per_source_lists() {
        let (mods, _) = parse("abs:[1,0,1] neg:[0,1]", GpuArch::GCN1_0).unwrap();
        assert_eq!(mods.abs_mask, 0b101);
        assert_eq!(mods.neg_mask, 0b010);
    }

    #[test]
    fn sdwa_selectors() {
        let (mods, extra) =
            parse("dst_sel:byte0 src0_sel:word1 dst_unused:preserve", GpuArch::GCN1_2).unwrap();
        assert!(extra.need_sdwa);
        assert_eq!(extra.dst_sel, 0);
        assert_eq!(extra.src0_sel, 5);
        assert_eq!(extra.dst_unused, SDWA_UNUSED_PRESERVE);
        assert_eq!(extra.src1_sel, SDWA_DWORD);
        assert!(!mods.requires_vop3());
    }

    #[test]
    fn dpp_controls() {
        let (_, extra) = parse("quad_perm:[3,2,1,0]", GpuArch::GCN1_2).unwrap();
        assert!(extra.need_dpp);
        assert_eq!(extra.dpp_ctrl, 0b00_01_10_11);
        let (_, extra) = parse("row_shl:5 row_mask:3 bank_mask:1", GpuArch::GCN1_2).unwrap();
        assert_eq!(extra.dpp_ctrl, 0x105);
        assert_eq!(extra.row_mask, 3);
        assert_eq!(extra.bank_mask, 1);
        let (_, extra) = parse("row_mirror bound_ctrl", GpuArch::GCN1_2).unwrap();
        assert_eq!(extra.dpp_ctrl, 0x140);
        assert!(extra.bound_ctrl);
    }

    #[test]
    fn sdwa_and_dpp_conflict() {
        assert!(matches!(
            parse("dst_sel:byte0 row_mirror", GpuArch::GCN1_2),
            Err(AsmError::IncompatibleModifiers(_))
        ));
        assert!(matches!(
            parse("vop3 dst_sel:byte0", GpuArch::GCN1_2),
            Err(AsmError::IncompatibleModifiers(_))
        ));
    }

    #[test]
    fn sdwa_needs_gcn12() {
        assert!(matches!(
            parse("dst_sel:byte0", GpuArch::GCN1_0),
            Err(AsmError::IncompatibleModifiers(_))
        ));
    }
}
