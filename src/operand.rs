//! Instruction-operand parsing.
//!
//! Each operand slot hands the parser an [`OperandMask`] describing which
//! forms are legal there: register pools, inline constants, true literals,
//! LDS direct, source modifiers and the literal's numeric type. The parser
//! composes the register-range and immediate parsers under that mask and
//! classifies literals as inline-constant selectors or true literal words.

use bitflags::bitflags;

use crate::arch::ArchProps;
use crate::error::AsmError;
use crate::imm::{self, PendingExpr, Signedness};
use crate::parser::Cursor;
use crate::regs::{self, RegRange, RegVarTable, LDS_DIRECT, LITERAL_SRC};

bitflags! {
    /// Which operand forms a slot accepts.
    pub struct OperandMask: u32 {
        /// Scalar registers.
        const SREGS = 0x1;
        /// Full scalar-source set: registers, inline constants, literal.
        const SSOURCE = 0x2;
        /// Vector registers.
        const VREGS = 0x4;
        /// LDS direct access.
        const LDS = 0x8;
        /// `abs()`/`neg()`/`sext()` wrapper modifiers.
        const VOP3_MODS = 0x10;
        /// Leading `-` negation (short-form source continuing with mods).
        const PARSE_WITH_NEG = 0x20;
        /// Leading `-` negation in a VOP3 source.
        const VOP3_NEG = 0x40;
        /// Literal must have an inline-constant encoding.
        const ONLY_INLINE_CONSTS = 0x80;
        /// A true literal is rejected outright in this encoding.
        const NO_LITERAL = 0x100;
        /// A true literal is rejected here under MUBUF rules.
        const NO_LITERAL_MUBUF = 0x200;
        /// Literal parses with single-float semantics.
        const FLOAT_LITERAL = 0x1000;
        /// Literal parses with half-float semantics.
        const F16_LITERAL = 0x2000;
    }
}

bitflags! {
    /// Per-source modifier bits.
    pub struct SrcMods: u8 {
        /// Absolute value.
        const ABS = 1;
        /// Negation.
        const NEG = 2;
        /// Sign extension (SDWA only).
        const SEXT = 4;
    }
}

/// Payload of a parsed operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandValue {
    /// A register range (physical or variable).
    Reg(RegRange),
    /// An inline constant, stored as its source-operand selector.
    Const(u16),
    /// A true 32-bit literal word.
    Literal(u32),
    /// An unresolved expression occupying the literal slot.
    Expr,
}

/// One parsed operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GcnOperand {
    /// What the operand is.
    pub value: OperandValue,
    /// Source modifiers collected from wrappers and leading `-`.
    pub mods: SrcMods,
}

impl Default for GcnOperand {
    fn default() -> Self {
        Self {
            value: OperandValue::Reg(RegRange::Empty),
            mods: SrcMods::empty(),
        }
    }
}

impl GcnOperand {
    /// Value for a 9-bit source-operand field.
    pub fn src_value(&self) -> u16 {
        match self.value {
            OperandValue::Reg(range) => range.src_value(),
            OperandValue::Const(sel) => sel,
            OperandValue::Literal(_) | OperandValue::Expr => LITERAL_SRC,
        }
    }

    /// The register range when the operand is one, else `Empty`.
    pub fn reg(&self) -> RegRange {
        match self.value {
            OperandValue::Reg(range) => range,
            _ => RegRange::Empty,
        }
    }

    /// True when this operand consumes the instruction's literal word.
    pub fn uses_literal(&self) -> bool {
        matches!(self.value, OperandValue::Literal(_) | OperandValue::Expr)
    }

    /// True when the operand is a scalar register range (not vector, not a
    /// constant).
    pub fn is_scalar_reg(&self) -> bool {
        match self.value {
            OperandValue::Reg(range) => !range.is_empty() && !range.is_vector(),
            _ => false,
        }
    }

    /// True when the operand is a vector register range.
    pub fn is_vector_reg(&self) -> bool {
        match self.value {
            OperandValue::Reg(range) => range.is_vector(),
            _ => false,
        }
    }
}

/// Inline-constant selector for a small integer, if it has one.
pub fn inline_int_selector(value: i32) -> Option<u16> {
    match value {
        0..=64 => Some(128 + value as u16),
        -16..=-1 => Some((192 - value) as u16),
        _ => None,
    }
}

/// Inline-constant selector for a single-float bit pattern.
pub fn inline_f32_selector(bits: u32, props: &ArchProps) -> Option<u16> {
    Some(match bits {
        0x0000_0000 => 128,
        0x3f00_0000 => 240, // 0.5
        0xbf00_0000 => 241,
        0x3f80_0000 => 242, // 1.0
        0xbf80_0000 => 243,
        0x4000_0000 => 244, // 2.0
        0xc000_0000 => 245,
        0x4080_0000 => 246, // 4.0
        0xc080_0000 => 247,
        0x3e22_f983 if props.has_f16_consts => 248, // 1/(2*pi)
        _ => return None,
    })
}

/// Inline-constant selector for a half-float bit pattern.
pub fn inline_f16_selector(bits: u16, props: &ArchProps) -> Option<u16> {
    if !props.has_f16_consts {
        return if bits == 0 { Some(128) } else { None };
    }
    Some(match bits {
        0x0000 => 128,
        0x3800 => 240, // 0.5
        0xb800 => 241,
        0x3c00 => 242, // 1.0
        0xbc00 => 243,
        0x4000 => 244, // 2.0
        0xc000 => 245,
        0x4400 => 246, // 4.0
        0xc400 => 247,
        0x3118 => 248, // 1/(2*pi)
        _ => return None,
    })
}

/// Parse one operand under `mask`.
///
/// `regs_num` is the register width the slot demands (0 for any). On
/// success the cursor stands just past the operand; on error no characters
/// past the offending token are consumed.
pub fn parse_operand(
    cursor: &mut Cursor,
    vars: &RegVarTable,
    props: &ArchProps,
    regs_num: u16,
    mask: OperandMask,
    mut expr_out: Option<&mut Option<PendingExpr>>,
) -> Result<GcnOperand, AsmError> {
    cursor.skip_spaces();
    let mut mods = SrcMods::empty();
    let mut open_wrappers = 0usize;

    // Prefix modifiers: `-`, `abs(`, `neg(`, `sext(`. Wrappers nest and
    // toggle their bit; each one owes a closing `)`.
    loop {
        cursor.skip_spaces();
        if cursor.peek() == Some(b'-')
            && mask.intersects(OperandMask::VOP3_NEG | OperandMask::PARSE_WITH_NEG)
        {
            let mut probe = cursor.clone();
            probe.bump();
            probe.skip_spaces();
            let negates_register = !matches!(probe.peek(), Some(b'0'..=b'9' | b'.' | b'\''));
            if negates_register {
                mods.toggle(SrcMods::NEG);
                cursor.bump();
                continue;
            }
        }
        if mask.contains(OperandMask::VOP3_MODS) {
            let save = cursor.pos();
            if let Some(name) = cursor.parse_name() {
                let bit = match name {
                    "abs" => Some(SrcMods::ABS),
                    "neg" => Some(SrcMods::NEG),
                    "sext" => Some(SrcMods::SEXT),
                    _ => None,
                };
                if let Some(bit) = bit {
                    if cursor.peek() == Some(b'(') {
                        cursor.bump();
                        mods.toggle(bit);
                        open_wrappers += 1;
                        continue;
                    }
                }
                cursor.set_pos(save);
            }
        }
        break;
    }

    let value = parse_operand_core(cursor, vars, props, regs_num, mask, expr_out.as_deref_mut())?;

    for _ in 0..open_wrappers {
        if !cursor.try_consume(b')') {
            return Err(AsmError::ExpectedToken("`)`"));
        }
    }
    Ok(GcnOperand { value, mods })
}

fn parse_operand_core(
    cursor: &mut Cursor,
    vars: &RegVarTable,
    props: &ArchProps,
    regs_num: u16,
    mask: OperandMask,
    expr_out: Option<&mut Option<PendingExpr>>,
) -> Result<OperandValue, AsmError> {
    if mask.intersects(OperandMask::SREGS | OperandMask::SSOURCE) {
        let range = regs::parse_sreg_range(cursor, vars, props, regs_num, false)?;
        if !range.is_empty() {
            return Ok(OperandValue::Reg(range));
        }
    }
    if mask.contains(OperandMask::VREGS) {
        let range = regs::parse_vreg_range(cursor, vars, regs_num, false)?;
        if !range.is_empty() {
            return Ok(OperandValue::Reg(range));
        }
    }
    if mask.contains(OperandMask::LDS) {
        let save = cursor.pos();
        if let Some(name) = cursor.parse_name() {
            if matches!(name, "lds" | "lds_direct" | "src_lds_direct") {
                return Ok(OperandValue::Const(LDS_DIRECT));
            }
            cursor.set_pos(save);
        }
    }
    if mask.contains(OperandMask::SSOURCE) {
        return parse_scalar_literal(cursor, props, mask, expr_out);
    }
    Err(AsmError::ExpectedToken("operand"))
}

fn parse_scalar_literal(
    cursor: &mut Cursor,
    props: &ArchProps,
    mask: OperandMask,
    mut expr_out: Option<&mut Option<PendingExpr>>,
) -> Result<OperandValue, AsmError> {
    cursor.skip_spaces();
    let float_ahead = imm::float_token_ahead(cursor);

    let (word, selector) = if mask.contains(OperandMask::F16_LITERAL) && float_ahead {
        let bits = imm::parse_imm_f16(cursor)?;
        (u32::from(bits), inline_f16_selector(bits, props))
    } else if mask.contains(OperandMask::FLOAT_LITERAL) && float_ahead {
        let bits = imm::parse_imm_f32(cursor)?;
        (bits, inline_f32_selector(bits, props))
    } else {
        let value = imm::parse_imm_u32(cursor, expr_out.as_deref_mut(), 32, Signedness::Both)?;
        if expr_out.map_or(false, |slot| slot.is_some()) {
            // Forwarded expression: lands in the literal word, patched later.
            return literal_allowed(mask, OperandValue::Expr, 0);
        }
        (value, inline_int_selector(value as i32))
    };

    match selector {
        Some(sel) => Ok(OperandValue::Const(sel)),
        None => literal_allowed(mask, OperandValue::Literal(word), word),
    }
}

fn literal_allowed(
    mask: OperandMask,
    value: OperandValue,
    word: u32,
) -> Result<OperandValue, AsmError> {
    if mask.contains(OperandMask::ONLY_INLINE_CONSTS) {
        if mask.intersects(OperandMask::NO_LITERAL | OperandMask::NO_LITERAL_MUBUF) {
            return Err(AsmError::LiteralNotAllowed);
        }
        return Err(AsmError::NotInlineConst(word));
    }
    Ok(value)
}
