//! Register ranges, special-register names and the range parsers.
//!
//! A [`RegRange`] is either empty, a span of physical registers in the
//! operand-encoding index space (SGPRs at `0..`, specials above them, VGPRs
//! at `256..`), or a span inside a named register variable. Ranges are
//! half-open; source syntax (`s[24:25]`, `var[2:5]`) is inclusive.

use std::collections::HashMap;

use crate::arch::ArchProps;
use crate::error::AsmError;
use crate::parser::Cursor;

/// First VGPR in the operand-encoding index space.
pub const VGPR_OFFSET: u16 = 256;
/// Number of addressable VGPRs.
pub const VGPR_COUNT: u16 = 256;

/// `vcc_lo` source-operand index.
pub const VCC: u16 = 106;
/// `m0` source-operand index.
pub const M0: u16 = 124;
/// `exec_lo` source-operand index.
pub const EXEC: u16 = 126;
/// First `ttmp` source-operand index.
pub const TTMP0: u16 = 112;
/// LDS-direct source-operand index.
pub const LDS_DIRECT: u16 = 254;
/// Source-operand index that introduces a trailing 32-bit literal.
pub const LITERAL_SRC: u16 = 255;

/// Identifier of a declared register variable.
pub type RegVarId = u32;

/// Register pool of a variable or slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegKind {
    /// SGPR pool.
    Scalar,
    /// VGPR pool.
    Vector,
}

/// A register span, physical or symbolic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegRange {
    /// No register (optional operand not present).
    Empty,
    /// Physical registers in operand-encoding index space, `end` exclusive.
    Phys {
        /// First index.
        start: u16,
        /// One past the last index.
        end: u16,
    },
    /// Sub-range of a register variable, indices relative to its allocation.
    Var {
        /// The variable.
        var: RegVarId,
        /// Pool the variable was declared in.
        kind: RegKind,
        /// First element.
        start: u16,
        /// One past the last element.
        end: u16,
    },
}

impl RegRange {
    /// True for the `Empty` variant.
    pub fn is_empty(&self) -> bool {
        matches!(self, RegRange::Empty)
    }

    /// Number of registers covered; 0 when empty.
    pub fn width(&self) -> u16 {
        match *self {
            RegRange::Empty => 0,
            RegRange::Phys { start, end } | RegRange::Var { start, end, .. } => end - start,
        }
    }

    /// Value for a source-operand field.
    ///
    /// Variables encode their relative start (the allocation pass patches the
    /// field); vector variables keep the VGPR bank bit so the field still
    /// decodes as a vector register.
    pub fn src_value(&self) -> u16 {
        match *self {
            RegRange::Empty => 0,
            RegRange::Phys { start, .. } => start,
            RegRange::Var { kind, start, .. } => match kind {
                RegKind::Scalar => start,
                RegKind::Vector => VGPR_OFFSET + start,
            },
        }
    }

    /// Value for an 8-bit VGPR-only field (`vdst`, `vsrc1`, DS/MUBUF slots).
    pub fn vgpr_value(&self) -> u8 {
        (self.src_value() & 0xff) as u8
    }

    /// True when the span is a physical or symbolic VGPR range.
    pub fn is_vector(&self) -> bool {
        match *self {
            RegRange::Empty => false,
            RegRange::Phys { start, .. } => (VGPR_OFFSET..VGPR_OFFSET + VGPR_COUNT).contains(&start),
            RegRange::Var { kind, .. } => kind == RegKind::Vector,
        }
    }
}

/// A `.regvar` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegVar {
    /// Declared name.
    pub name: String,
    /// Pool.
    pub kind: RegKind,
    /// Declared size in registers.
    pub size: u16,
}

/// Interned register-variable declarations for one assembly pass.
#[derive(Debug, Default)]
pub struct RegVarTable {
    vars: Vec<RegVar>,
    index: HashMap<String, RegVarId>,
}

impl RegVarTable {
    /// Fresh, empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variable; redeclaration is an error.
    pub fn declare(&mut self, name: &str, kind: RegKind, size: u16) -> Result<RegVarId, AsmError> {
        if self.index.contains_key(name) {
            return Err(AsmError::RegVarRedefined(name.to_string()));
        }
        let id = self.vars.len() as RegVarId;
        self.vars.push(RegVar {
            name: name.to_string(),
            kind,
            size,
        });
        self.index.insert(name.to_string(), id);
        Ok(id)
    }

    /// Look a name up.
    pub fn lookup(&self, name: &str) -> Option<RegVarId> {
        self.index.get(name).copied()
    }

    /// Descriptor of a declared variable.
    pub fn get(&self, id: RegVarId) -> &RegVar {
        &self.vars[id as usize]
    }
}

/// `name` resolved against the special-register table, as `(start, width)`.
fn special_sreg(name: &str, props: &ArchProps) -> Option<(u16, u16)> {
    Some(match name {
        "vcc" => (VCC, 2),
        "vcc_lo" => (VCC, 1),
        "vcc_hi" => (VCC + 1, 1),
        "exec" => (EXEC, 2),
        "exec_lo" => (EXEC, 1),
        "exec_hi" => (EXEC + 1, 1),
        "m0" => (M0, 1),
        "tba" => (108, 2),
        "tba_lo" => (108, 1),
        "tba_hi" => (109, 1),
        "tma" => (110, 2),
        "tma_lo" => (110, 1),
        "tma_hi" => (111, 1),
        "flat_scratch" => (props.flat_scratch?, 2),
        "flat_scratch_lo" => (props.flat_scratch?, 1),
        "flat_scratch_hi" => (props.flat_scratch? + 1, 1),
        "xnack_mask" => (props.xnack_mask?, 2),
        "xnack_mask_lo" => (props.xnack_mask?, 1),
        "xnack_mask_hi" => (props.xnack_mask? + 1, 1),
        _ => {
            // ttmp0..ttmp11
            let digits = name.strip_prefix("ttmp")?;
            let n: u16 = digits.parse().ok()?;
            if n > 11 {
                return None;
            }
            (TTMP0 + n, 1)
        }
    })
}

/// Inclusive `[a]` / `[a:b]` bracket, if present at the cursor.
fn parse_bracket(cursor: &mut Cursor) -> Result<Option<(u16, u16)>, AsmError> {
    if cursor.peek() != Some(b'[') {
        return Ok(None);
    }
    cursor.bump();
    cursor.skip_spaces();
    let first = cursor
        .parse_digits()
        .ok_or(AsmError::ExpectedToken("register index"))? as u16;
    let last = if cursor.try_consume(b':') {
        cursor.skip_spaces();
        cursor
            .parse_digits()
            .ok_or(AsmError::ExpectedToken("register index"))? as u16
    } else {
        first
    };
    if !cursor.try_consume(b']') {
        return Err(AsmError::ExpectedToken("`]`"));
    }
    if last < first {
        return Err(AsmError::InvertedRange);
    }
    Ok(Some((first, last)))
}

fn check_width(width: u16, regs_num: u16) -> Result<(), AsmError> {
    if regs_num != 0 && width != regs_num {
        return Err(AsmError::WidthMismatch {
            expected: regs_num,
            got: width,
        });
    }
    Ok(())
}

/// Required scalar alignment for a span of `width` registers.
pub fn sgpr_align(width: u16) -> u16 {
    match width {
        0 | 1 => 1,
        2 | 3 => 2,
        _ => 4,
    }
}

fn resolve_var_range(
    vars: &RegVarTable,
    id: RegVarId,
    cursor: &mut Cursor,
    regs_num: u16,
) -> Result<RegRange, AsmError> {
    let var = vars.get(id);
    let (start, end) = match parse_bracket(cursor)? {
        Some((a, b)) => (a, b + 1),
        None => (0, var.size),
    };
    if end > var.size {
        return Err(AsmError::RegVarRangeOutOfBounds {
            start,
            end,
            size: var.size,
        });
    }
    check_width(end - start, regs_num)?;
    Ok(RegRange::Var {
        var: id,
        kind: var.kind,
        start,
        end,
    })
}

/// Parse a scalar register or register range.
///
/// `regs_num` is the width the slot demands (0 accepts any width). With
/// `required == false`, input that does not look like a scalar register
/// leaves the cursor untouched and yields `Empty`.
pub fn parse_sreg_range(
    cursor: &mut Cursor,
    vars: &RegVarTable,
    props: &ArchProps,
    regs_num: u16,
    required: bool,
) -> Result<RegRange, AsmError> {
    cursor.skip_spaces();
    let save = cursor.pos();
    let not_a_reg = |cursor: &mut Cursor| {
        cursor.set_pos(save);
        if required {
            Err(AsmError::ExpectedRegister {
                pool: "scalar",
                width: regs_num,
            })
        } else {
            Ok(RegRange::Empty)
        }
    };

    let Some(name) = cursor.parse_name() else {
        return not_a_reg(cursor);
    };

    // `s[..]`, `s<n>`, `ttmp[..]`
    if name == "s" || name == "ttmp" {
        let base = if name == "s" { 0 } else { TTMP0 };
        let limit = if name == "s" { props.max_sgprs } else { 12 };
        match parse_bracket(cursor)? {
            Some((first, last)) => {
                let width = last - first + 1;
                if last >= limit {
                    return Err(AsmError::OutOfPool {
                        index: base + last,
                        max: base + limit - 1,
                    });
                }
                check_width(width, regs_num)?;
                let align = sgpr_align(width);
                if first % align != 0 {
                    return Err(AsmError::MisalignedRegister {
                        start: first,
                        width,
                    });
                }
                return Ok(RegRange::Phys {
                    start: base + first,
                    end: base + last + 1,
                });
            }
            None => return not_a_reg(cursor),
        }
    }
    if let Some(index) = single_reg_index(name, b's') {
        if index >= props.max_sgprs {
            return Err(AsmError::OutOfPool {
                index,
                max: props.max_sgprs - 1,
            });
        }
        check_width(1, regs_num)?;
        return Ok(RegRange::Phys {
            start: index,
            end: index + 1,
        });
    }
    if let Some((start, width)) = special_sreg(name, props) {
        check_width(width, regs_num)?;
        return Ok(RegRange::Phys {
            start,
            end: start + width,
        });
    }
    if let Some(id) = vars.lookup(name) {
        if vars.get(id).kind != RegKind::Scalar {
            return not_a_reg(cursor);
        }
        return resolve_var_range(vars, id, cursor, regs_num);
    }
    not_a_reg(cursor)
}

/// Parse a vector register or register range. Same contract as
/// [`parse_sreg_range`]; VGPRs have no alignment constraint.
pub fn parse_vreg_range(
    cursor: &mut Cursor,
    vars: &RegVarTable,
    regs_num: u16,
    required: bool,
) -> Result<RegRange, AsmError> {
    cursor.skip_spaces();
    let save = cursor.pos();
    let not_a_reg = |cursor: &mut Cursor| {
        cursor.set_pos(save);
        if required {
            Err(AsmError::ExpectedRegister {
                pool: "vector",
                width: regs_num,
            })
        } else {
            Ok(RegRange::Empty)
        }
    };

    let Some(name) = cursor.parse_name() else {
        return not_a_reg(cursor);
    };

    if name == "v" {
        match parse_bracket(cursor)? {
            Some((first, last)) => {
                if last >= VGPR_COUNT {
                    return Err(AsmError::OutOfPool {
                        index: VGPR_OFFSET + last,
                        max: VGPR_OFFSET + VGPR_COUNT - 1,
                    });
                }
                check_width(last - first + 1, regs_num)?;
                return Ok(RegRange::Phys {
                    start: VGPR_OFFSET + first,
                    end: VGPR_OFFSET + last + 1,
                });
            }
            None => return not_a_reg(cursor),
        }
    }
    if let Some(index) = single_reg_index(name, b'v') {
        if index >= VGPR_COUNT {
            return Err(AsmError::OutOfPool {
                index: VGPR_OFFSET + index,
                max: VGPR_OFFSET + VGPR_COUNT - 1,
            });
        }
        check_width(1, regs_num)?;
        return Ok(RegRange::Phys {
            start: VGPR_OFFSET + index,
            end: VGPR_OFFSET + index + 1,
        });
    }
    if let Some(id) = vars.lookup(name) {
        if vars.get(id).kind != RegKind::Vector {
            return not_a_reg(cursor);
        }
        return resolve_var_range(vars, id, cursor, regs_num);
    }
    not_a_reg(cursor)
}

/// `s42` / `v17` style single-register names.
fn single_reg_index(name: &str, prefix: u8) -> Option<u16> {
    let digits = name.strip_prefix(prefix as char)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{ArchProps, GpuArch};

    fn props() -> ArchProps {
        ArchProps::of(GpuArch::GCN1_0)
    }

    fn sreg(text: &str, regs_num: u16) -> Result<RegRange, AsmError> {
        parse_sreg_range(
            &mut Cursor::new(text),
            &RegVarTable::new(),
            &props(),
            regs_num,
            true,
        )
    }

    #[test]
    fn single_and_ranged_sgprs() {
        assert_eq!(sreg("s23", 1).unwrap(), RegRange::Phys { start: 23, end: 24 });
        assert_eq!(
            sreg("s[24:25]", 2).unwrap(),
            RegRange::Phys { start: 24, end: 26 }
        );
        assert_eq!(
            sreg("s[12:15]", 4).unwrap(),
            RegRange::Phys { start: 12, end: 16 }
        );
    }

    #[test]
    fn width_and_alignment_are_enforced() {
        assert!(matches!(sreg("s[4:6]", 2), Err(AsmError::WidthMismatch { .. })));
        assert!(matches!(
            sreg("s[25:26]", 2),
            Err(AsmError::MisalignedRegister { .. })
        ));
        assert!(matches!(
            sreg("s[13:16]", 4),
            Err(AsmError::MisalignedRegister { .. })
        ));
        assert!(matches!(sreg("s[15:12]", 4), Err(AsmError::InvertedRange)));
    }

    #[test]
    fn pool_ceiling_depends_on_arch() {
        assert!(sreg("s103", 1).is_ok());
        assert!(matches!(sreg("s104", 1), Err(AsmError::OutOfPool { .. })));
        let rx = ArchProps::of(GpuArch::GCN1_2);
        let mut c = Cursor::new("s102");
        assert!(matches!(
            parse_sreg_range(&mut c, &RegVarTable::new(), &rx, 1, true),
            Err(AsmError::OutOfPool { .. })
        ));
    }

    #[test]
    fn special_registers() {
        assert_eq!(sreg("vcc", 2).unwrap(), RegRange::Phys { start: 106, end: 108 });
        assert_eq!(
            sreg("exec_lo", 1).unwrap(),
            RegRange::Phys { start: 126, end: 127 }
        );
        assert_eq!(sreg("m0", 1).unwrap(), RegRange::Phys { start: 124, end: 125 });
        assert_eq!(
            sreg("ttmp4", 1).unwrap(),
            RegRange::Phys { start: 116, end: 117 }
        );
        assert!(matches!(sreg("vcc", 1), Err(AsmError::WidthMismatch { .. })));
        // No flat_scratch on GCN 1.0.
        assert!(sreg("flat_scratch", 2).is_err());
    }

    #[test]
    fn regvar_subranges() {
        let mut vars = RegVarTable::new();
        let rax4 = vars.declare("rax4", RegKind::Scalar, 6).unwrap();
        let mut c = Cursor::new("rax4[2:3]");
        let r = parse_sreg_range(&mut c, &vars, &props(), 2, true).unwrap();
        assert_eq!(
            r,
            RegRange::Var {
                var: rax4,
                kind: RegKind::Scalar,
                start: 2,
                end: 4,
            }
        );
        let mut c = Cursor::new("rax4[4:6]");
        assert!(matches!(
            parse_sreg_range(&mut c, &vars, &props(), 3, true),
            Err(AsmError::RegVarRangeOutOfBounds { .. })
        ));
    }

    #[test]
    fn wrong_pool_is_not_consumed_when_optional() {
        let mut vars = RegVarTable::new();
        vars.declare("vvar", RegKind::Vector, 1).unwrap();
        let mut c = Cursor::new("vvar");
        let r = parse_sreg_range(&mut c, &vars, &props(), 1, false).unwrap();
        assert!(r.is_empty());
        assert_eq!(c.pos(), 0);
    }

    #[test]
    fn vector_registers() {
        let vars = RegVarTable::new();
        let mut c = Cursor::new("v42");
        assert_eq!(
            parse_vreg_range(&mut c, &vars, 1, true).unwrap(),
            RegRange::Phys { start: 298, end: 299 }
        );
        let mut c = Cursor::new("v[0:3]");
        assert_eq!(
            parse_vreg_range(&mut c, &vars, 4, true).unwrap(),
            RegRange::Phys { start: 256, end: 260 }
        );
        // Odd starts are fine for VGPRs.
        let mut c = Cursor::new("v[27:28]");
        assert!(parse_vreg_range(&mut c, &vars, 2, true).is_ok());
    }
}
