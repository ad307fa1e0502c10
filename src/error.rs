//! Assembler diagnostics.

use thiserror::Error;

/// Everything the operand parsers and encoding dispatchers can reject.
///
/// Parse routines return `Result<_, AsmError>`; the dispatcher lowers each
/// error into a [`Diagnostic`] carrying the source position and keeps going,
/// so a single malformed line can surface several diagnostics. An instruction
/// whose parse produced any diagnostic emits no bytes and no usage records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AsmError {
    /// A specific syntactic element is missing at the cursor.
    #[error("expected {0}")]
    ExpectedToken(&'static str),
    /// Expected a register of the named pool.
    #[error("expected {pool} register{}", width_hint(.width))]
    ExpectedRegister {
        /// Human name of the register pool ("scalar", "vector").
        pool: &'static str,
        /// Required width in registers, 0 when any width is accepted.
        width: u16,
    },
    /// A register name that does not exist on any architecture.
    #[error("unknown register `{0}`")]
    UnknownRegister(String),
    /// A register-variable reference that was never declared.
    #[error("undefined register variable `{0}`")]
    UnknownRegVar(String),
    /// A register variable declared twice.
    #[error("register variable `{0}` already defined")]
    RegVarRedefined(String),
    /// Range width disagrees with what the slot requires.
    #[error("expected {expected} registers, got {got}")]
    WidthMismatch {
        /// Width the consuming slot demands.
        expected: u16,
        /// Width actually written in the source.
        got: u16,
    },
    /// 64-bit and wider scalar slots need an even (or 4-aligned) first index.
    #[error("unaligned scalar register range s[{start}:{}]", .start + .width - 1)]
    MisalignedRegister {
        /// First register of the range.
        start: u16,
        /// Width of the range.
        width: u16,
    },
    /// Register index above the pool available on the architecture.
    #[error("register index {index} out of pool (max {max})")]
    OutOfPool {
        /// Offending register index.
        index: u16,
        /// Highest legal index for the current architecture.
        max: u16,
    },
    /// Sub-range of a register variable exceeds its declared size.
    #[error("register range [{start}:{}] exceeds variable size {size}", .end - 1)]
    RegVarRangeOutOfBounds {
        /// First element of the sub-range.
        start: u16,
        /// One past the last element.
        end: u16,
        /// Declared size of the variable.
        size: u16,
    },
    /// An inverted `[hi:lo]` range.
    #[error("inverted register range")]
    InvertedRange,
    /// Literal required to be inline-representable but is not.
    #[error("value {0:#x} has no inline-constant encoding")]
    NotInlineConst(u32),
    /// A true 32-bit literal is not accepted by this slot.
    #[error("literal is not allowed in this place")]
    LiteralNotAllowed,
    /// More than one distinct literal in one instruction.
    #[error("only one literal can be used per instruction")]
    TooManyLiterals,
    /// Immediate overflows the field in every requested interpretation.
    #[error("immediate {value:#x} does not fit in {bits} bits")]
    ImmOutOfRange {
        /// Parsed value.
        value: u32,
        /// Field width.
        bits: u32,
    },
    /// Modifier combination the hardware cannot express.
    #[error("incompatible modifiers: {0}")]
    IncompatibleModifiers(&'static str),
    /// Same modifier written twice with conflicting values.
    #[error("duplicated modifier `{0}`")]
    DuplicatedModifier(&'static str),
    /// Unknown tail modifier token.
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
    /// Mnemonic exists but not on the current architecture.
    #[error("`{mnemonic}` is not supported on {arch}")]
    UnsupportedOnArch {
        /// The offending mnemonic.
        mnemonic: String,
        /// Human name of the current architecture family.
        arch: &'static str,
    },
    /// Mnemonic not present in the instruction table at all.
    #[error("unknown instruction `{0}`")]
    UnknownMnemonic(String),
    /// A resolved fixup exceeds its bit field.
    #[error("expression value {value:#x} does not fit in {bits} bits at offset {offset}")]
    ExpressionOutOfRange {
        /// Resolved value.
        value: i64,
        /// Bit width of the patched field.
        bits: u8,
        /// Section offset of the patched instruction.
        offset: usize,
    },
    /// A fixup references a symbol that was never defined.
    #[error("undefined symbol `{0}`")]
    UndefinedSymbol(String),
    /// Unknown GPU device name in a `.gpu` directive.
    #[error("unknown device type `{0}`")]
    UnknownDevice(String),
    /// Malformed directive argument.
    #[error("garbage at end of line")]
    GarbageAtEnd,
}

fn width_hint(width: &u16) -> String {
    if *width == 0 {
        String::new()
    } else {
        format!(" range ({width} registers)")
    }
}

/// One reported problem, anchored to a source position.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// 1-based source line.
    pub line: usize,
    /// 0-based byte column within the line.
    pub column: usize,
    /// Rendered message.
    pub message: String,
}

impl Diagnostic {
    pub(crate) fn new(line: usize, column: usize, error: &AsmError) -> Self {
        Self {
            line,
            column,
            message: error.to_string(),
        }
    }
}

impl core::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column + 1, self.message)
    }
}
