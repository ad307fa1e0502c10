//! Immediate parsing: integers with C-style bases, character literals,
//! float and half-precision literals, and unresolved-expression forwarding.
//!
//! One monomorphic entry point per width/signedness combination; the
//! dispatchers never parse immediates generically.

use crate::error::AsmError;
use crate::parser::Cursor;

/// How an immediate must fit its bit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signedness {
    /// Must fit as a signed value.
    Signed,
    /// Must fit as an unsigned value.
    Unsigned,
    /// Accepted when either interpretation fits.
    Both,
}

/// A `symbol ± addend` expression left for the fixup phase.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingExpr {
    /// Referenced symbol name.
    pub symbol: String,
    /// Constant added to the symbol's value.
    pub addend: i64,
}

/// Parse a 32-bit immediate, or forward an expression.
///
/// When the cursor holds an unresolved symbol reference and `expr_out` is
/// provided, the expression is deposited there and `Ok(0)` is returned; the
/// caller records a fixup for the field. `bits == 0` means the full 32-bit
/// range.
pub fn parse_imm_u32(
    cursor: &mut Cursor,
    mut expr_out: Option<&mut Option<PendingExpr>>,
    bits: u32,
    signedness: Signedness,
) -> Result<u32, AsmError> {
    if let Some(out) = expr_out.as_deref_mut() {
        *out = None;
    }
    cursor.skip_spaces();
    if let Some(value) = parse_int_token(cursor)? {
        let bits = if bits == 0 { 32 } else { bits };
        check_range(value, bits, signedness)?;
        return Ok(value as u32);
    }
    // Not numeric: either an expression to resolve later, or a parse error.
    let save = cursor.pos();
    if let Some(name) = cursor.parse_name() {
        if let Some(out) = expr_out {
            let mut addend = 0i64;
            let after_name = cursor.pos();
            cursor.skip_spaces();
            match cursor.peek() {
                Some(sign @ (b'+' | b'-')) => {
                    cursor.skip_char_and_spaces();
                    match parse_int_token(cursor)? {
                        Some(v) => addend = if sign == b'-' { -v } else { v },
                        None => cursor.set_pos(after_name),
                    }
                }
                _ => cursor.set_pos(after_name),
            }
            *out = Some(PendingExpr {
                symbol: name.to_string(),
                addend,
            });
            return Ok(0);
        }
        cursor.set_pos(save);
    }
    Err(AsmError::ExpectedToken("immediate"))
}

/// 16-bit unsigned-or-signed immediate.
pub fn parse_imm_u16(
    cursor: &mut Cursor,
    expr_out: Option<&mut Option<PendingExpr>>,
    signedness: Signedness,
) -> Result<u16, AsmError> {
    parse_imm_u32(cursor, expr_out, 16, signedness).map(|v| v as u16)
}

/// 16-bit immediate that must fit as signed.
pub fn parse_imm_i16(
    cursor: &mut Cursor,
    expr_out: Option<&mut Option<PendingExpr>>,
) -> Result<i16, AsmError> {
    parse_imm_u32(cursor, expr_out, 16, Signedness::Signed).map(|v| v as i16)
}

/// Parse a float literal into its IEEE-754 single bits.
///
/// Hex and binary tokens give the raw bit pattern.
pub fn parse_imm_f32(cursor: &mut Cursor) -> Result<u32, AsmError> {
    cursor.skip_spaces();
    if raw_bits_ahead(cursor) {
        return parse_imm_u32(cursor, None, 32, Signedness::Both);
    }
    let text = scan_float_token(cursor).ok_or(AsmError::ExpectedToken("float literal"))?;
    text.parse::<f32>()
        .map(f32::to_bits)
        .map_err(|_| AsmError::ExpectedToken("float literal"))
}

/// Parse a float literal into IEEE-754 half bits.
pub fn parse_imm_f16(cursor: &mut Cursor) -> Result<u16, AsmError> {
    cursor.skip_spaces();
    if raw_bits_ahead(cursor) {
        return parse_imm_u32(cursor, None, 16, Signedness::Both).map(|v| v as u16);
    }
    let text = scan_float_token(cursor).ok_or(AsmError::ExpectedToken("float literal"))?;
    let value = text
        .parse::<f32>()
        .map_err(|_| AsmError::ExpectedToken("float literal"))?;
    Ok(f32_to_f16_bits(value))
}

/// True when the token ahead reads as a float rather than an integer:
/// a decimal run containing `.` or an exponent.
pub fn float_token_ahead(cursor: &Cursor) -> bool {
    let mut probe = cursor.clone();
    probe.skip_spaces();
    if matches!(probe.peek(), Some(b'+' | b'-')) {
        probe.bump();
    }
    if matches!(probe.peek(), Some(b'0')) && matches!(probe.peek_at(1), Some(b'x' | b'X' | b'b' | b'B')) {
        return false;
    }
    let mut seen_digit = false;
    let mut n = 0usize;
    loop {
        match probe.peek_at(n) {
            Some(b'0'..=b'9') => seen_digit = true,
            Some(b'.') => return seen_digit || matches!(probe.peek_at(n + 1), Some(b'0'..=b'9')),
            Some(b'e' | b'E') if seen_digit => return true,
            _ => return false,
        }
        n += 1;
    }
}

fn raw_bits_ahead(cursor: &Cursor) -> bool {
    let mut probe = cursor.clone();
    if matches!(probe.peek(), Some(b'+' | b'-')) {
        probe.bump();
    }
    matches!(probe.peek(), Some(b'0'))
        && matches!(probe.peek_at(1), Some(b'x' | b'X' | b'b' | b'B'))
        || probe.peek() == Some(b'\'')
}

fn scan_float_token<'a>(cursor: &mut Cursor<'a>) -> Option<String> {
    let start = cursor.pos();
    let mut text = String::new();
    if matches!(cursor.peek(), Some(b'+' | b'-')) {
        text.push(cursor.peek().unwrap() as char);
        cursor.bump();
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;
    while let Some(b) = cursor.peek() {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => {
                seen_exp = true;
                text.push(b as char);
                cursor.bump();
                if matches!(cursor.peek(), Some(b'+' | b'-')) {
                    text.push(cursor.peek().unwrap() as char);
                    cursor.bump();
                }
                continue;
            }
            _ => break,
        }
        text.push(b as char);
        cursor.bump();
    }
    if !seen_digit {
        cursor.set_pos(start);
        return None;
    }
    Some(text)
}

/// Integer token: optional sign, C-style base prefix, or a char literal.
/// Returns `Ok(None)` without consuming when the cursor is not at one.
fn parse_int_token(cursor: &mut Cursor) -> Result<Option<i64>, AsmError> {
    let start = cursor.pos();
    let mut negative = false;
    match cursor.peek() {
        Some(b'+') => cursor.bump(),
        Some(b'-') => {
            negative = true;
            cursor.bump();
        }
        _ => {}
    }
    let magnitude: i64 = match cursor.peek() {
        Some(b'\'') => {
            cursor.bump();
            let v = parse_char_body(cursor)?;
            if cursor.peek() != Some(b'\'') {
                return Err(AsmError::ExpectedToken("closing `'`"));
            }
            cursor.bump();
            i64::from(v)
        }
        Some(b'0'..=b'9') => {
            let radix = if cursor.peek() == Some(b'0') {
                match cursor.peek_at(1) {
                    Some(b'x' | b'X') => {
                        cursor.bump();
                        cursor.bump();
                        16
                    }
                    Some(b'b' | b'B') => {
                        cursor.bump();
                        cursor.bump();
                        2
                    }
                    Some(b'0'..=b'7') => 8,
                    _ => 10,
                }
            } else {
                10
            };
            let mut value: i64 = 0;
            let mut any = false;
            while let Some(b) = cursor.peek() {
                let digit = match b {
                    b'0'..=b'9' => i64::from(b - b'0'),
                    b'a'..=b'f' => i64::from(b - b'a') + 10,
                    b'A'..=b'F' => i64::from(b - b'A') + 10,
                    _ => break,
                };
                if digit >= radix {
                    break;
                }
                value = value
                    .checked_mul(radix)
                    .and_then(|v| v.checked_add(digit))
                    .ok_or(AsmError::ImmOutOfRange {
                        value: u32::MAX,
                        bits: 32,
                    })?;
                any = true;
                cursor.bump();
            }
            if !any {
                return Err(AsmError::ExpectedToken("digits after base prefix"));
            }
            value
        }
        _ => {
            cursor.set_pos(start);
            return Ok(None);
        }
    };
    Ok(Some(if negative { -magnitude } else { magnitude }))
}

fn parse_char_body(cursor: &mut Cursor) -> Result<u8, AsmError> {
    match cursor.peek() {
        Some(b'\\') => {
            cursor.bump();
            let b = cursor.peek().ok_or(AsmError::ExpectedToken("escape character"))?;
            cursor.bump();
            Ok(match b {
                b'n' => b'\n',
                b't' => b'\t',
                b'r' => b'\r',
                b'0' => 0,
                b'\\' => b'\\',
                b'\'' => b'\'',
                other => other,
            })
        }
        Some(b) => {
            cursor.bump();
            Ok(b)
        }
        None => Err(AsmError::ExpectedToken("character")),
    }
}

fn check_range(value: i64, bits: u32, signedness: Signedness) -> Result<(), AsmError> {
    if bits >= 32 {
        if value < -(1i64 << 31) || value > u32::MAX as i64 {
            return Err(AsmError::ImmOutOfRange {
                value: value as u32,
                bits,
            });
        }
        return Ok(());
    }
    let smin = -(1i64 << (bits - 1));
    let smax = (1i64 << (bits - 1)) - 1;
    let umax = (1i64 << bits) - 1;
    let ok = match signedness {
        Signedness::Signed => value >= smin && value <= smax,
        Signedness::Unsigned => value >= 0 && value <= umax,
        Signedness::Both => value >= smin && value <= umax,
    };
    if ok {
        Ok(())
    } else {
        Err(AsmError::ImmOutOfRange {
            value: value as u32,
            bits,
        })
    }
}

/// Single-precision to half-precision, round to nearest even.
pub fn f32_to_f16_bits(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exp = ((bits >> 23) & 0xff) as i32;
    let mant = bits & 0x7f_ffff;

    if exp == 0xff {
        // Inf / NaN; keep a quiet-NaN payload bit.
        return sign | 0x7c00 | if mant != 0 { 0x200 } else { 0 };
    }
    let unbiased = exp - 127;
    if unbiased > 15 {
        return sign | 0x7c00; // overflow to infinity
    }
    if unbiased >= -14 {
        // Normal half: 10 mantissa bits, round to nearest even.
        let mut half = ((unbiased + 15) as u32) << 10 | (mant >> 13);
        let round = mant & 0x1fff;
        if round > 0x1000 || (round == 0x1000 && (half & 1) != 0) {
            half += 1; // may carry into the exponent, which is correct
        }
        return sign | half as u16;
    }
    if unbiased < -25 {
        return sign; // underflow to zero
    }
    // Subnormal half.
    let mant = mant | 0x80_0000;
    let shift = (-14 - unbiased + 13) as u32;
    let mut half = mant >> shift;
    let rem = mant & ((1 << shift) - 1);
    let halfway = 1u32 << (shift - 1);
    if rem > halfway || (rem == halfway && (half & 1) != 0) {
        half += 1;
    }
    sign | half as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn imm(text: &str, bits: u32, sign: Signedness) -> Result<u32, AsmError> {
        parse_imm_u32(&mut Cursor::new(text), None, bits, sign)
    }

    #[rstest]
    #[case("0x5b", 0x5b)]
    #[case("0b1011", 11)]
    #[case("017", 15)]
    #[case("64", 64)]
    #[case("'a'", 97)]
    #[case("'\\n'", 10)]
    fn bases(#[case] text: &str, #[case] expected: u32) {
        assert_eq!(imm(text, 32, Signedness::Both).unwrap(), expected);
    }

    #[test]
    fn negative_wraps_to_twos_complement() {
        assert_eq!(imm("-8", 16, Signedness::Both).unwrap(), 0xffff_fff8);
        assert_eq!(imm("-1", 32, Signedness::Both).unwrap(), u32::MAX);
    }

    #[rstest]
    #[case("0x1ffff", 16, Signedness::Both)]
    #[case("-40000", 16, Signedness::Both)]
    #[case("-1", 16, Signedness::Unsigned)]
    #[case("0x8000", 16, Signedness::Signed)]
    fn overflow_is_rejected(#[case] text: &str, #[case] bits: u32, #[case] sign: Signedness) {
        assert!(matches!(imm(text, bits, sign), Err(AsmError::ImmOutOfRange { .. })));
    }

    #[test]
    fn sixteen_bit_boundaries() {
        assert_eq!(imm("0xd3b9", 16, Signedness::Both).unwrap(), 0xd3b9);
        assert_eq!(imm("-32768", 16, Signedness::Signed).unwrap() as u16, 0x8000);
    }

    #[test]
    fn expression_is_forwarded() {
        let mut expr = None;
        let mut c = Cursor::new("xxxx-8");
        let v = parse_imm_u32(&mut c, Some(&mut expr), 16, Signedness::Both).unwrap();
        assert_eq!(v, 0);
        assert_eq!(
            expr,
            Some(PendingExpr {
                symbol: "xxxx".into(),
                addend: -8,
            })
        );
    }

    #[test]
    fn expression_without_slot_is_an_error() {
        let mut c = Cursor::new("label");
        assert!(parse_imm_u32(&mut c, None, 16, Signedness::Both).is_err());
    }

    #[test]
    fn float_bits() {
        assert_eq!(parse_imm_f32(&mut Cursor::new("1.0")).unwrap(), 0x3f80_0000);
        assert_eq!(parse_imm_f32(&mut Cursor::new("-0.5")).unwrap(), 0xbf00_0000);
        assert_eq!(parse_imm_f32(&mut Cursor::new("0x3e22f983")).unwrap(), 0x3e22_f983);
    }

    #[rstest]
    #[case(0.5, 0x3800)]
    #[case(-0.5, 0xb800)]
    #[case(1.0, 0x3c00)]
    #[case(2.0, 0x4000)]
    #[case(-4.0, 0xc400)]
    #[case(65536.0, 0x7c00)] // overflow to +inf
    fn half_conversion(#[case] value: f32, #[case] bits: u16) {
        assert_eq!(f32_to_f16_bits(value), bits);
    }

    #[test]
    fn float_lookahead() {
        assert!(float_token_ahead(&Cursor::new("1.25")));
        assert!(float_token_ahead(&Cursor::new("-2.0")));
        assert!(float_token_ahead(&Cursor::new("3e4")));
        assert!(!float_token_ahead(&Cursor::new("25")));
        assert!(!float_token_ahead(&Cursor::new("0x3f")));
        assert!(!float_token_ahead(&Cursor::new("label")));
    }
}
