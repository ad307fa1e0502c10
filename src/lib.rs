//! GCN machine-code encoder with per-instruction register-usage tracking.
//!
//! The crate assembles AMD GCN instructions (generations 1.0 through 1.2)
//! from their textual form into architecturally correct little-endian
//! machine code, and records for every instruction which registers (or
//! symbolic register variables) each encoding field reads and writes. The
//! usage log feeds a later register-allocation/liveness pass.
//!
//! The public surface is the [`Assembler`] driver plus the data-model
//! types: [`RegRange`], [`RegVarUsage`], [`Fixup`] and the architecture
//! tables. The per-encoding dispatchers are internal.
//!
//! ```
//! use gcn_asm::{Assembler, GpuDeviceType};
//!
//! let mut asm = Assembler::new(GpuDeviceType::CapeVerde);
//! assert!(asm.assemble("s_mov_b32 s23, s31\n"));
//! assert_eq!(asm.sections()[0].content, 0xbe97_031fu32.to_le_bytes());
//! ```

pub mod arch;
pub mod asm;
mod encoder;
pub mod error;
pub mod imm;
pub mod insn;
pub mod operand;
pub mod parser;
pub mod regs;
pub mod section;
pub mod usage;
pub mod vopmods;

pub use arch::{ArchProps, GpuArch, GpuDeviceType};
pub use asm::Assembler;
pub use error::{AsmError, Diagnostic};
pub use imm::{PendingExpr, Signedness};
pub use insn::{GcnEncoding, GcnInstruction, InstrFlags};
pub use operand::{GcnOperand, OperandMask, OperandValue, SrcMods};
pub use regs::{RegKind, RegRange, RegVar, RegVarId, RegVarTable};
pub use section::{Fixup, FixupKind, Section};
pub use usage::{RegField, RegVarUsage, RwFlags, UsageHandler};
pub use vopmods::{VopExtraModifiers, VopMods};
