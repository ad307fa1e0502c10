//! Instruction descriptors and the mnemonic table.
//!
//! One [`GcnInstruction`] row per mnemonic and architecture variant; rows
//! for the same mnemonic with disjoint architecture masks carry the
//! per-generation opcode differences. The table is grouped by encoding for
//! maintainability; lookup goes through a lazily built sorted index.

use std::sync::OnceLock;

use bitflags::bitflags;

use crate::arch::GpuArch;
use crate::error::AsmError;

/// Binary encoding family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum GcnEncoding {
    Sop1,
    Sop2,
    Sopk,
    Sopc,
    Sopp,
    Smrd,
    Smem,
    Vop1,
    Vop2,
    Vopc,
    Vop3,
    Vintrp,
    Ds,
    Mubuf,
    Mtbuf,
    Mimg,
    Exp,
    Flat,
}

bitflags! {
    /// Per-mnemonic quirks consumed by the dispatchers.
    pub struct InstrFlags: u64 {
        /// Destination is a 64-bit pair.
        const DST_64 = 1 << 0;
        /// Source 0 is a 64-bit pair.
        const SRC0_64 = 1 << 1;
        /// Source 1 is a 64-bit pair.
        const SRC1_64 = 1 << 2;
        /// Source 2 is a 64-bit pair.
        const SRC2_64 = 1 << 3;
        /// Source-only form (no destination operand).
        const NO_DST = 1 << 4;
        /// Destination-only form (no source operand).
        const NO_SRC = 1 << 5;
        /// No operands at all.
        const NO_ARGS = 1 << 6;
        /// The 16-bit immediate is a branch target (delta-encoded words).
        const IMM_REL = 1 << 7;
        /// The single register slot is read rather than written.
        const DST_READ = 1 << 8;
        /// SOPK `hwreg(...)` operand.
        const HWREG = 1 << 9;
        /// SOPK trailing 32-bit immediate word.
        const IMM32 = 1 << 10;
        /// SOPP `vmcnt()`/`expcnt()`/`lgkmcnt()` immediate syntax.
        const WAITCNT = 1 << 11;
        /// Vector-encoding destination is a scalar register (lane reads).
        const DST_SGPR = 1 << 12;
        /// Vector-encoding source 1 is a scalar register (lane selects).
        const SRC1_SGPR = 1 << 13;
        /// Short form writes carry to implicit `vcc`.
        const CARRY_OUT = 1 << 14;
        /// Short form reads carry from implicit `vcc`.
        const CARRY_IN = 1 << 15;
        /// Mandatory literal in source position 1 (`v_madmk`).
        const ARG1_LIT = 1 << 16;
        /// Mandatory literal in source position 2 (`v_madak`).
        const ARG2_LIT = 1 << 17;
        /// VOP3-only op with two sources instead of three.
        const TWO_SRC = 1 << 18;
        /// VOP3b form with a second scalar destination.
        const VOP3B = 1 << 19;
        /// Scalar-memory base is a quad (buffer forms).
        const SBASE4 = 1 << 20;
        /// SMEM probe: the data field holds an immediate.
        const SDATA_IMM = 1 << 21;
        /// Scalar-memory op with destination only (`s_memtime`).
        const ONLY_DST = 1 << 22;
        /// Store: the data operand is read.
        const STORE = 1 << 23;
        /// Memory atomic; `glc` turns the data slot into a read-write.
        const ATOMIC = 1 << 24;
        /// DS op reads back into `vdst`.
        const DS_VDST = 1 << 25;
        /// DS op takes two data operands.
        const DS_2D = 1 << 26;
        /// DS op takes no data operand.
        const DS_NO_DATA = 1 << 27;
        /// DS op takes no address operand.
        const DS_NO_ADDR = 1 << 28;
        /// DS op uses the two 8-bit offsets.
        const DS_OFF2 = 1 << 29;
        /// DS op is GDS-only.
        const DS_GDS = 1 << 30;
        /// MIMG op carries a sampler quad.
        const MIMG_SAMPLE = 1 << 31;
        /// Data/destination width of 2 dwords.
        const D2 = 1 << 32;
        /// Data/destination width of 3 dwords.
        const D3 = 1 << 33;
        /// Data/destination width of 4 dwords.
        const D4 = 1 << 34;
        /// Data/destination width of 8 dwords.
        const D8 = 1 << 35;
        /// Data/destination width of 16 dwords.
        const D16 = 1 << 36;
        /// Literals parse with single-float semantics.
        const LIT_FLOAT = 1 << 37;
        /// Literals parse with half-float semantics.
        const LIT_F16 = 1 << 38;
        /// VINTRP source is a `p0`/`p10`/`p20` selector.
        const VINTRP_P = 1 << 39;
        /// Atomic compare-swap: data operand is twice the data width.
        const CMPSWAP = 1 << 40;
    }
}

impl InstrFlags {
    /// Data/destination width in dwords for memory-style ops.
    pub fn data_width(self) -> u16 {
        if self.contains(InstrFlags::D16) {
            16
        } else if self.contains(InstrFlags::D8) {
            8
        } else if self.contains(InstrFlags::D4) {
            4
        } else if self.contains(InstrFlags::D3) {
            3
        } else if self.contains(InstrFlags::D2) {
            2
        } else {
            1
        }
    }

    fn w(self, flag: InstrFlags) -> u16 {
        if self.contains(flag) {
            2
        } else {
            1
        }
    }

    /// Destination width in registers (scalar/vector ALU).
    pub fn dst_width(self) -> u16 {
        self.w(InstrFlags::DST_64)
    }

    /// Source-0 width in registers.
    pub fn src0_width(self) -> u16 {
        self.w(InstrFlags::SRC0_64)
    }

    /// Source-1 width in registers.
    pub fn src1_width(self) -> u16 {
        self.w(InstrFlags::SRC1_64)
    }

    /// Source-2 width in registers.
    pub fn src2_width(self) -> u16 {
        self.w(InstrFlags::SRC2_64)
    }
}

/// One row of the mnemonic table.
#[derive(Debug, Clone, Copy)]
pub struct GcnInstruction {
    /// Assembly mnemonic.
    pub mnemonic: &'static str,
    /// Encoding family of this row.
    pub encoding: GcnEncoding,
    /// Opcode within the family.
    pub code: u16,
    /// Quirk flags.
    pub flags: InstrFlags,
    /// Architectures this row applies to.
    pub arch: GpuArch,
}

const fn ins(
    mnemonic: &'static str,
    encoding: GcnEncoding,
    code: u16,
    flags: InstrFlags,
    arch: GpuArch,
) -> GcnInstruction {
    GcnInstruction {
        mnemonic,
        encoding,
        code,
        flags,
        arch,
    }
}

macro_rules! f {
    () => { InstrFlags::empty() };
    ($($n:ident)|+) => { InstrFlags::from_bits_truncate(0 $(| InstrFlags::$n.bits())+) };
}

/// All three generations.
const ALL: GpuArch = GpuArch::from_bits_truncate(0b111);
/// GCN 1.0 and 1.1 (SMRD, SI vector opcodes).
const GCN10_11: GpuArch = GpuArch::from_bits_truncate(0b011);
/// GCN 1.1 and 1.2 (FLAT).
const GCN11_12: GpuArch = GpuArch::from_bits_truncate(0b110);
const GCN11: GpuArch = GpuArch::GCN1_1;
const GCN12: GpuArch = GpuArch::GCN1_2;

use GcnEncoding as E;

/// The mnemonic table, grouped by encoding family.
#[rustfmt::skip]
pub static GCN_INSTR_TABLE: &[GcnInstruction] = &[
    // ---- SOP2 ----------------------------------------------------------
    ins("s_add_u32", E::Sop2, 0, f!(), ALL),
    ins("s_sub_u32", E::Sop2, 1, f!(), ALL),
    ins("s_add_i32", E::Sop2, 2, f!(), ALL),
    ins("s_sub_i32", E::Sop2, 3, f!(), ALL),
    ins("s_addc_u32", E::Sop2, 4, f!(), ALL),
    ins("s_subb_u32", E::Sop2, 5, f!(), ALL),
    ins("s_min_i32", E::Sop2, 6, f!(), ALL),
    ins("s_min_u32", E::Sop2, 7, f!(), ALL),
    ins("s_max_i32", E::Sop2, 8, f!(), ALL),
    ins("s_max_u32", E::Sop2, 9, f!(), ALL),
    ins("s_cselect_b32", E::Sop2, 10, f!(), ALL),
    ins("s_cselect_b64", E::Sop2, 11, f!(DST_64 | SRC0_64 | SRC1_64), ALL),
    ins("s_and_b32", E::Sop2, 14, f!(), ALL),
    ins("s_and_b64", E::Sop2, 15, f!(DST_64 | SRC0_64 | SRC1_64), ALL),
    ins("s_or_b32", E::Sop2, 16, f!(), ALL),
    ins("s_or_b64", E::Sop2, 17, f!(DST_64 | SRC0_64 | SRC1_64), ALL),
    ins("s_xor_b32", E::Sop2, 18, f!(), ALL),
    ins("s_xor_b64", E::Sop2, 19, f!(DST_64 | SRC0_64 | SRC1_64), ALL),
    ins("s_andn2_b32", E::Sop2, 20, f!(), ALL),
    ins("s_andn2_b64", E::Sop2, 21, f!(DST_64 | SRC0_64 | SRC1_64), ALL),
    ins("s_orn2_b32", E::Sop2, 22, f!(), ALL),
    ins("s_orn2_b64", E::Sop2, 23, f!(DST_64 | SRC0_64 | SRC1_64), ALL),
    ins("s_nand_b32", E::Sop2, 24, f!(), ALL),
    ins("s_nand_b64", E::Sop2, 25, f!(DST_64 | SRC0_64 | SRC1_64), ALL),
    ins("s_nor_b32", E::Sop2, 26, f!(), ALL),
    ins("s_nor_b64", E::Sop2, 27, f!(DST_64 | SRC0_64 | SRC1_64), ALL),
    ins("s_xnor_b32", E::Sop2, 28, f!(), ALL),
    ins("s_xnor_b64", E::Sop2, 29, f!(DST_64 | SRC0_64 | SRC1_64), ALL),
    ins("s_lshl_b32", E::Sop2, 30, f!(), ALL),
    ins("s_lshl_b64", E::Sop2, 31, f!(DST_64 | SRC0_64), ALL),
    ins("s_lshr_b32", E::Sop2, 32, f!(), ALL),
    ins("s_lshr_b64", E::Sop2, 33, f!(DST_64 | SRC0_64), ALL),
    ins("s_ashr_i32", E::Sop2, 34, f!(), ALL),
    ins("s_ashr_i64", E::Sop2, 35, f!(DST_64 | SRC0_64), ALL),
    ins("s_bfm_b32", E::Sop2, 36, f!(), ALL),
    ins("s_bfm_b64", E::Sop2, 37, f!(DST_64), ALL),
    ins("s_mul_i32", E::Sop2, 38, f!(), ALL),
    ins("s_bfe_u32", E::Sop2, 39, f!(), ALL),
    ins("s_bfe_i32", E::Sop2, 40, f!(), ALL),
    ins("s_bfe_u64", E::Sop2, 41, f!(DST_64 | SRC0_64), ALL),
    ins("s_bfe_i64", E::Sop2, 42, f!(DST_64 | SRC0_64), ALL),
    ins("s_cbranch_g_fork", E::Sop2, 43, f!(NO_DST | SRC0_64 | SRC1_64), ALL),
    ins("s_absdiff_i32", E::Sop2, 44, f!(), ALL),
    // ---- SOP1 ----------------------------------------------------------
    ins("s_mov_b32", E::Sop1, 3, f!(), GCN10_11),
    ins("s_mov_b32", E::Sop1, 0, f!(), GCN12),
    ins("s_mov_b64", E::Sop1, 4, f!(DST_64 | SRC0_64), GCN10_11),
    ins("s_mov_b64", E::Sop1, 1, f!(DST_64 | SRC0_64), GCN12),
    ins("s_cmov_b32", E::Sop1, 5, f!(), GCN10_11),
    ins("s_cmov_b32", E::Sop1, 2, f!(), GCN12),
    ins("s_cmov_b64", E::Sop1, 6, f!(DST_64 | SRC0_64), GCN10_11),
    ins("s_cmov_b64", E::Sop1, 3, f!(DST_64 | SRC0_64), GCN12),
    ins("s_not_b32", E::Sop1, 7, f!(), GCN10_11),
    ins("s_not_b32", E::Sop1, 4, f!(), GCN12),
    ins("s_not_b64", E::Sop1, 8, f!(DST_64 | SRC0_64), GCN10_11),
    ins("s_not_b64", E::Sop1, 5, f!(DST_64 | SRC0_64), GCN12),
    ins("s_wqm_b32", E::Sop1, 9, f!(), GCN10_11),
    ins("s_wqm_b32", E::Sop1, 6, f!(), GCN12),
    ins("s_wqm_b64", E::Sop1, 10, f!(DST_64 | SRC0_64), GCN10_11),
    ins("s_wqm_b64", E::Sop1, 7, f!(DST_64 | SRC0_64), GCN12),
    ins("s_brev_b32", E::Sop1, 11, f!(), GCN10_11),
    ins("s_brev_b32", E::Sop1, 8, f!(), GCN12),
    ins("s_brev_b64", E::Sop1, 12, f!(DST_64 | SRC0_64), GCN10_11),
    ins("s_brev_b64", E::Sop1, 9, f!(DST_64 | SRC0_64), GCN12),
    ins("s_bcnt0_i32_b32", E::Sop1, 13, f!(), GCN10_11),
    ins("s_bcnt0_i32_b32", E::Sop1, 10, f!(), GCN12),
    ins("s_bcnt0_i32_b64", E::Sop1, 14, f!(SRC0_64), GCN10_11),
    ins("s_bcnt0_i32_b64", E::Sop1, 11, f!(SRC0_64), GCN12),
    ins("s_bcnt1_i32_b32", E::Sop1, 15, f!(), GCN10_11),
    ins("s_bcnt1_i32_b32", E::Sop1, 12, f!(), GCN12),
    ins("s_bcnt1_i32_b64", E::Sop1, 16, f!(SRC0_64), GCN10_11),
    ins("s_bcnt1_i32_b64", E::Sop1, 13, f!(SRC0_64), GCN12),
    ins("s_ff0_i32_b32", E::Sop1, 17, f!(), GCN10_11),
    ins("s_ff0_i32_b32", E::Sop1, 14, f!(), GCN12),
    ins("s_ff0_i32_b64", E::Sop1, 18, f!(SRC0_64), GCN10_11),
    ins("s_ff0_i32_b64", E::Sop1, 15, f!(SRC0_64), GCN12),
    ins("s_ff1_i32_b32", E::Sop1, 19, f!(), GCN10_11),
    ins("s_ff1_i32_b32", E::Sop1, 16, f!(), GCN12),
    ins("s_ff1_i32_b64", E::Sop1, 20, f!(SRC0_64), GCN10_11),
    ins("s_ff1_i32_b64", E::Sop1, 17, f!(SRC0_64), GCN12),
    ins("s_flbit_i32_b32", E::Sop1, 21, f!(), GCN10_11),
    ins("s_flbit_i32_b32", E::Sop1, 18, f!(), GCN12),
    ins("s_flbit_i32_b64", E::Sop1, 22, f!(SRC0_64), GCN10_11),
    ins("s_flbit_i32_b64", E::Sop1, 19, f!(SRC0_64), GCN12),
    ins("s_flbit_i32", E::Sop1, 23, f!(), GCN10_11),
    ins("s_flbit_i32", E::Sop1, 20, f!(), GCN12),
    ins("s_flbit_i32_i64", E::Sop1, 24, f!(SRC0_64), GCN10_11),
    ins("s_flbit_i32_i64", E::Sop1, 21, f!(SRC0_64), GCN12),
    ins("s_sext_i32_i8", E::Sop1, 25, f!(), GCN10_11),
    ins("s_sext_i32_i8", E::Sop1, 22, f!(), GCN12),
    ins("s_sext_i32_i16", E::Sop1, 26, f!(), GCN10_11),
    ins("s_sext_i32_i16", E::Sop1, 23, f!(), GCN12),
    ins("s_bitset0_b32", E::Sop1, 27, f!(), GCN10_11),
    ins("s_bitset0_b32", E::Sop1, 24, f!(), GCN12),
    ins("s_bitset0_b64", E::Sop1, 28, f!(DST_64), GCN10_11),
    ins("s_bitset0_b64", E::Sop1, 25, f!(DST_64), GCN12),
    ins("s_bitset1_b32", E::Sop1, 29, f!(), GCN10_11),
    ins("s_bitset1_b32", E::Sop1, 26, f!(), GCN12),
    ins("s_bitset1_b64", E::Sop1, 30, f!(DST_64), GCN10_11),
    ins("s_bitset1_b64", E::Sop1, 27, f!(DST_64), GCN12),
    ins("s_getpc_b64", E::Sop1, 31, f!(DST_64 | NO_SRC), GCN10_11),
    ins("s_getpc_b64", E::Sop1, 28, f!(DST_64 | NO_SRC), GCN12),
    ins("s_setpc_b64", E::Sop1, 32, f!(SRC0_64 | NO_DST), GCN10_11),
    ins("s_setpc_b64", E::Sop1, 29, f!(SRC0_64 | NO_DST), GCN12),
    ins("s_swappc_b64", E::Sop1, 33, f!(DST_64 | SRC0_64), GCN10_11),
    ins("s_swappc_b64", E::Sop1, 30, f!(DST_64 | SRC0_64), GCN12),
    ins("s_rfe_b64", E::Sop1, 34, f!(SRC0_64 | NO_DST), GCN10_11),
    ins("s_rfe_b64", E::Sop1, 31, f!(SRC0_64 | NO_DST), GCN12),
    ins("s_and_saveexec_b64", E::Sop1, 36, f!(DST_64 | SRC0_64), GCN10_11),
    ins("s_and_saveexec_b64", E::Sop1, 32, f!(DST_64 | SRC0_64), GCN12),
    ins("s_or_saveexec_b64", E::Sop1, 37, f!(DST_64 | SRC0_64), GCN10_11),
    ins("s_or_saveexec_b64", E::Sop1, 33, f!(DST_64 | SRC0_64), GCN12),
    ins("s_xor_saveexec_b64", E::Sop1, 38, f!(DST_64 | SRC0_64), GCN10_11),
    ins("s_xor_saveexec_b64", E::Sop1, 34, f!(DST_64 | SRC0_64), GCN12),
    ins("s_andn2_saveexec_b64", E::Sop1, 39, f!(DST_64 | SRC0_64), GCN10_11),
    ins("s_andn2_saveexec_b64", E::Sop1, 35, f!(DST_64 | SRC0_64), GCN12),
    ins("s_orn2_saveexec_b64", E::Sop1, 40, f!(DST_64 | SRC0_64), GCN10_11),
    ins("s_orn2_saveexec_b64", E::Sop1, 36, f!(DST_64 | SRC0_64), GCN12),
    ins("s_nand_saveexec_b64", E::Sop1, 41, f!(DST_64 | SRC0_64), GCN10_11),
    ins("s_nand_saveexec_b64", E::Sop1, 37, f!(DST_64 | SRC0_64), GCN12),
    ins("s_nor_saveexec_b64", E::Sop1, 42, f!(DST_64 | SRC0_64), GCN10_11),
    ins("s_nor_saveexec_b64", E::Sop1, 38, f!(DST_64 | SRC0_64), GCN12),
    ins("s_xnor_saveexec_b64", E::Sop1, 43, f!(DST_64 | SRC0_64), GCN10_11),
    ins("s_xnor_saveexec_b64", E::Sop1, 39, f!(DST_64 | SRC0_64), GCN12),
    ins("s_quadmask_b32", E::Sop1, 44, f!(), GCN10_11),
    ins("s_quadmask_b32", E::Sop1, 40, f!(), GCN12),
    ins("s_quadmask_b64", E::Sop1, 45, f!(DST_64 | SRC0_64), GCN10_11),
    ins("s_quadmask_b64", E::Sop1, 41, f!(DST_64 | SRC0_64), GCN12),
    ins("s_movrels_b32", E::Sop1, 46, f!(), GCN10_11),
    ins("s_movrels_b32", E::Sop1, 42, f!(), GCN12),
    ins("s_movrels_b64", E::Sop1, 47, f!(DST_64 | SRC0_64), GCN10_11),
    ins("s_movrels_b64", E::Sop1, 43, f!(DST_64 | SRC0_64), GCN12),
    ins("s_movreld_b32", E::Sop1, 48, f!(), GCN10_11),
    ins("s_movreld_b32", E::Sop1, 44, f!(), GCN12),
    ins("s_movreld_b64", E::Sop1, 49, f!(DST_64 | SRC0_64), GCN10_11),
    ins("s_movreld_b64", E::Sop1, 45, f!(DST_64 | SRC0_64), GCN12),
    ins("s_cbranch_join", E::Sop1, 50, f!(NO_DST), GCN10_11),
    ins("s_cbranch_join", E::Sop1, 46, f!(NO_DST), GCN12),
    ins("s_abs_i32", E::Sop1, 52, f!(), GCN10_11),
    ins("s_abs_i32", E::Sop1, 48, f!(), GCN12),
    ins("s_mov_fed_b32", E::Sop1, 53, f!(), GCN10_11),
    ins("s_mov_fed_b32", E::Sop1, 49, f!(), GCN12),
    // ---- SOPK ----------------------------------------------------------
    ins("s_movk_i32", E::Sopk, 0, f!(), GCN10_11),
    ins("s_movk_i32", E::Sopk, 0, f!(), GCN12),
    ins("s_cmovk_i32", E::Sopk, 2, f!(), GCN10_11),
    ins("s_cmovk_i32", E::Sopk, 1, f!(), GCN12),
    ins("s_cmpk_eq_i32", E::Sopk, 3, f!(DST_READ), GCN10_11),
    ins("s_cmpk_eq_i32", E::Sopk, 2, f!(DST_READ), GCN12),
    ins("s_cmpk_lg_i32", E::Sopk, 4, f!(DST_READ), GCN10_11),
    ins("s_cmpk_lg_i32", E::Sopk, 3, f!(DST_READ), GCN12),
    ins("s_cmpk_gt_i32", E::Sopk, 5, f!(DST_READ), GCN10_11),
    ins("s_cmpk_gt_i32", E::Sopk, 4, f!(DST_READ), GCN12),
    ins("s_cmpk_ge_i32", E::Sopk, 6, f!(DST_READ), GCN10_11),
    ins("s_cmpk_ge_i32", E::Sopk, 5, f!(DST_READ), GCN12),
    ins("s_cmpk_lt_i32", E::Sopk, 7, f!(DST_READ), GCN10_11),
    ins("s_cmpk_lt_i32", E::Sopk, 6, f!(DST_READ), GCN12),
    ins("s_cmpk_le_i32", E::Sopk, 8, f!(DST_READ), GCN10_11),
    ins("s_cmpk_le_i32", E::Sopk, 7, f!(DST_READ), GCN12),
    ins("s_cmpk_eq_u32", E::Sopk, 9, f!(DST_READ), GCN10_11),
    ins("s_cmpk_eq_u32", E::Sopk, 8, f!(DST_READ), GCN12),
    ins("s_cmpk_lg_u32", E::Sopk, 10, f!(DST_READ), GCN10_11),
    ins("s_cmpk_lg_u32", E::Sopk, 9, f!(DST_READ), GCN12),
    ins("s_cmpk_gt_u32", E::Sopk, 11, f!(DST_READ), GCN10_11),
    ins("s_cmpk_gt_u32", E::Sopk, 10, f!(DST_READ), GCN12),
    ins("s_cmpk_ge_u32", E::Sopk, 12, f!(DST_READ), GCN10_11),
    ins("s_cmpk_ge_u32", E::Sopk, 11, f!(DST_READ), GCN12),
    ins("s_cmpk_lt_u32", E::Sopk, 13, f!(DST_READ), GCN10_11),
    ins("s_cmpk_lt_u32", E::Sopk, 12, f!(DST_READ), GCN12),
    ins("s_cmpk_le_u32", E::Sopk, 14, f!(DST_READ), GCN10_11),
    ins("s_cmpk_le_u32", E::Sopk, 13, f!(DST_READ), GCN12),
    ins("s_addk_i32", E::Sopk, 15, f!(), GCN10_11),
    ins("s_addk_i32", E::Sopk, 14, f!(), GCN12),
    ins("s_mulk_i32", E::Sopk, 16, f!(), GCN10_11),
    ins("s_mulk_i32", E::Sopk, 15, f!(), GCN12),
    ins("s_cbranch_i_fork", E::Sopk, 17, f!(DST_READ | DST_64 | IMM_REL), GCN10_11),
    ins("s_cbranch_i_fork", E::Sopk, 16, f!(DST_READ | DST_64 | IMM_REL), GCN12),
    ins("s_getreg_b32", E::Sopk, 18, f!(HWREG), GCN10_11),
    ins("s_getreg_b32", E::Sopk, 17, f!(HWREG), GCN12),
    ins("s_setreg_b32", E::Sopk, 19, f!(HWREG | DST_READ), GCN10_11),
    ins("s_setreg_b32", E::Sopk, 18, f!(HWREG | DST_READ), GCN12),
    ins("s_setreg_imm32_b32", E::Sopk, 21, f!(HWREG | IMM32), GCN10_11),
    ins("s_setreg_imm32_b32", E::Sopk, 20, f!(HWREG | IMM32), GCN12),
    // ---- SOPC ----------------------------------------------------------
    ins("s_cmp_eq_i32", E::Sopc, 0, f!(), ALL),
    ins("s_cmp_lg_i32", E::Sopc, 1, f!(), ALL),
    ins("s_cmp_gt_i32", E::Sopc, 2, f!(), ALL),
    ins("s_cmp_ge_i32", E::Sopc, 3, f!(), ALL),
    ins("s_cmp_lt_i32", E::Sopc, 4, f!(), ALL),
    ins("s_cmp_le_i32", E::Sopc, 5, f!(), ALL),
    ins("s_cmp_eq_u32", E::Sopc, 6, f!(), ALL),
    ins("s_cmp_lg_u32", E::Sopc, 7, f!(), ALL),
    ins("s_cmp_gt_u32", E::Sopc, 8, f!(), ALL),
    ins("s_cmp_ge_u32", E::Sopc, 9, f!(), ALL),
    ins("s_cmp_lt_u32", E::Sopc, 10, f!(), ALL),
    ins("s_cmp_le_u32", E::Sopc, 11, f!(), ALL),
    ins("s_bitcmp0_b32", E::Sopc, 12, f!(), ALL),
    ins("s_bitcmp1_b32", E::Sopc, 13, f!(), ALL),
    ins("s_bitcmp0_b64", E::Sopc, 14, f!(SRC0_64), ALL),
    ins("s_bitcmp1_b64", E::Sopc, 15, f!(SRC0_64), ALL),
    ins("s_setvskip", E::Sopc, 16, f!(), ALL),
    // ---- SOPP ----------------------------------------------------------
    ins("s_nop", E::Sopp, 0, f!(), ALL),
    ins("s_endpgm", E::Sopp, 1, f!(NO_ARGS), ALL),
    ins("s_branch", E::Sopp, 2, f!(IMM_REL), ALL),
    ins("s_cbranch_scc0", E::Sopp, 4, f!(IMM_REL), ALL),
    ins("s_cbranch_scc1", E::Sopp, 5, f!(IMM_REL), ALL),
    ins("s_cbranch_vccz", E::Sopp, 6, f!(IMM_REL), ALL),
    ins("s_cbranch_vccnz", E::Sopp, 7, f!(IMM_REL), ALL),
    ins("s_cbranch_execz", E::Sopp, 8, f!(IMM_REL), ALL),
    ins("s_cbranch_execnz", E::Sopp, 9, f!(IMM_REL), ALL),
    ins("s_barrier", E::Sopp, 10, f!(NO_ARGS), ALL),
    ins("s_waitcnt", E::Sopp, 12, f!(WAITCNT), ALL),
    ins("s_sethalt", E::Sopp, 13, f!(), ALL),
    ins("s_sleep", E::Sopp, 14, f!(), ALL),
    ins("s_setprio", E::Sopp, 15, f!(), ALL),
    ins("s_sendmsg", E::Sopp, 16, f!(), ALL),
    ins("s_sendmsghalt", E::Sopp, 17, f!(), ALL),
    ins("s_trap", E::Sopp, 18, f!(), ALL),
    ins("s_icache_inv", E::Sopp, 19, f!(NO_ARGS), ALL),
    ins("s_incperflevel", E::Sopp, 20, f!(), ALL),
    ins("s_decperflevel", E::Sopp, 21, f!(), ALL),
    ins("s_ttracedata", E::Sopp, 22, f!(NO_ARGS), ALL),
    // ---- SMRD (4-byte scalar memory) -----------------------------------
    ins("s_load_dword", E::Smrd, 0, f!(), GCN10_11),
    ins("s_load_dwordx2", E::Smrd, 1, f!(D2), GCN10_11),
    ins("s_load_dwordx4", E::Smrd, 2, f!(D4), GCN10_11),
    ins("s_load_dwordx8", E::Smrd, 3, f!(D8), GCN10_11),
    ins("s_load_dwordx16", E::Smrd, 4, f!(D16), GCN10_11),
    ins("s_buffer_load_dword", E::Smrd, 8, f!(SBASE4), GCN10_11),
    ins("s_buffer_load_dwordx2", E::Smrd, 9, f!(SBASE4 | D2), GCN10_11),
    ins("s_buffer_load_dwordx4", E::Smrd, 10, f!(SBASE4 | D4), GCN10_11),
    ins("s_buffer_load_dwordx8", E::Smrd, 11, f!(SBASE4 | D8), GCN10_11),
    ins("s_buffer_load_dwordx16", E::Smrd, 12, f!(SBASE4 | D16), GCN10_11),
    ins("s_memtime", E::Smrd, 30, f!(ONLY_DST | D2), GCN10_11),
    ins("s_dcache_inv", E::Smrd, 31, f!(NO_ARGS), GCN10_11),
    // ---- SMEM (8-byte scalar memory) -----------------------------------
    ins("s_load_dword", E::Smem, 0, f!(), GCN12),
    ins("s_load_dwordx2", E::Smem, 1, f!(D2), GCN12),
    ins("s_load_dwordx4", E::Smem, 2, f!(D4), GCN12),
    ins("s_load_dwordx8", E::Smem, 3, f!(D8), GCN12),
    ins("s_load_dwordx16", E::Smem, 4, f!(D16), GCN12),
    ins("s_buffer_load_dword", E::Smem, 8, f!(SBASE4), GCN12),
    ins("s_buffer_load_dwordx2", E::Smem, 9, f!(SBASE4 | D2), GCN12),
    ins("s_buffer_load_dwordx4", E::Smem, 10, f!(SBASE4 | D4), GCN12),
    ins("s_buffer_load_dwordx8", E::Smem, 11, f!(SBASE4 | D8), GCN12),
    ins("s_buffer_load_dwordx16", E::Smem, 12, f!(SBASE4 | D16), GCN12),
    ins("s_store_dword", E::Smem, 16, f!(STORE), GCN12),
    ins("s_store_dwordx2", E::Smem, 17, f!(STORE | D2), GCN12),
    ins("s_store_dwordx4", E::Smem, 18, f!(STORE | D4), GCN12),
    ins("s_buffer_store_dword", E::Smem, 24, f!(STORE | SBASE4), GCN12),
    ins("s_buffer_store_dwordx2", E::Smem, 25, f!(STORE | SBASE4 | D2), GCN12),
    ins("s_buffer_store_dwordx4", E::Smem, 26, f!(STORE | SBASE4 | D4), GCN12),
    ins("s_dcache_inv", E::Smem, 32, f!(NO_ARGS), GCN12),
    ins("s_dcache_wb", E::Smem, 33, f!(NO_ARGS), GCN12),
    ins("s_dcache_inv_vol", E::Smem, 34, f!(NO_ARGS), GCN12),
    ins("s_dcache_wb_vol", E::Smem, 35, f!(NO_ARGS), GCN12),
    ins("s_memtime", E::Smem, 36, f!(ONLY_DST | D2), GCN12),
    ins("s_memrealtime", E::Smem, 37, f!(ONLY_DST | D2), GCN12),
    ins("s_atc_probe", E::Smem, 38, f!(SDATA_IMM), GCN12),
    ins("s_atc_probe_buffer", E::Smem, 39, f!(SDATA_IMM | SBASE4), GCN12),
    // ---- VOP2 ----------------------------------------------------------
    ins("v_cndmask_b32", E::Vop2, 0, f!(CARRY_IN), GCN10_11),
    ins("v_cndmask_b32", E::Vop2, 0, f!(CARRY_IN), GCN12),
    ins("v_readlane_b32", E::Vop2, 1, f!(DST_SGPR | SRC1_SGPR), GCN10_11),
    ins("v_writelane_b32", E::Vop2, 2, f!(SRC1_SGPR), GCN10_11),
    ins("v_add_f32", E::Vop2, 3, f!(LIT_FLOAT), GCN10_11),
    ins("v_add_f32", E::Vop2, 1, f!(LIT_FLOAT), GCN12),
    ins("v_sub_f32", E::Vop2, 4, f!(LIT_FLOAT), GCN10_11),
    ins("v_sub_f32", E::Vop2, 2, f!(LIT_FLOAT), GCN12),
    ins("v_subrev_f32", E::Vop2, 5, f!(LIT_FLOAT), GCN10_11),
    ins("v_subrev_f32", E::Vop2, 3, f!(LIT_FLOAT), GCN12),
    ins("v_mac_legacy_f32", E::Vop2, 6, f!(LIT_FLOAT), GCN10_11),
    ins("v_mul_legacy_f32", E::Vop2, 7, f!(LIT_FLOAT), GCN10_11),
    ins("v_mul_legacy_f32", E::Vop2, 4, f!(LIT_FLOAT), GCN12),
    ins("v_mul_f32", E::Vop2, 8, f!(LIT_FLOAT), GCN10_11),
    ins("v_mul_f32", E::Vop2, 5, f!(LIT_FLOAT), GCN12),
    ins("v_mul_i32_i24", E::Vop2, 9, f!(), GCN10_11),
    ins("v_mul_i32_i24", E::Vop2, 6, f!(), GCN12),
    ins("v_mul_hi_i32_i24", E::Vop2, 10, f!(), GCN10_11),
    ins("v_mul_hi_i32_i24", E::Vop2, 7, f!(), GCN12),
    ins("v_mul_u32_u24", E::Vop2, 11, f!(), GCN10_11),
    ins("v_mul_u32_u24", E::Vop2, 8, f!(), GCN12),
    ins("v_mul_hi_u32_u24", E::Vop2, 12, f!(), GCN10_11),
    ins("v_mul_hi_u32_u24", E::Vop2, 9, f!(), GCN12),
    ins("v_min_f32", E::Vop2, 15, f!(LIT_FLOAT), GCN10_11),
    ins("v_min_f32", E::Vop2, 10, f!(LIT_FLOAT), GCN12),
    ins("v_max_f32", E::Vop2, 16, f!(LIT_FLOAT), GCN10_11),
    ins("v_max_f32", E::Vop2, 11, f!(LIT_FLOAT), GCN12),
    ins("v_min_i32", E::Vop2, 17, f!(), GCN10_11),
    ins("v_min_i32", E::Vop2, 12, f!(), GCN12),
    ins("v_max_i32", E::Vop2, 18, f!(), GCN10_11),
    ins("v_max_i32", E::Vop2, 13, f!(), GCN12),
    ins("v_min_u32", E::Vop2, 19, f!(), GCN10_11),
    ins("v_min_u32", E::Vop2, 14, f!(), GCN12),
    ins("v_max_u32", E::Vop2, 20, f!(), GCN10_11),
    ins("v_max_u32", E::Vop2, 15, f!(), GCN12),
    ins("v_lshr_b32", E::Vop2, 21, f!(), GCN10_11),
    ins("v_lshrrev_b32", E::Vop2, 22, f!(), GCN10_11),
    ins("v_lshrrev_b32", E::Vop2, 16, f!(), GCN12),
    ins("v_ashr_i32", E::Vop2, 23, f!(), GCN10_11),
    ins("v_ashrrev_i32", E::Vop2, 24, f!(), GCN10_11),
    ins("v_ashrrev_i32", E::Vop2, 17, f!(), GCN12),
    ins("v_lshl_b32", E::Vop2, 25, f!(), GCN10_11),
    ins("v_lshlrev_b32", E::Vop2, 26, f!(), GCN10_11),
    ins("v_lshlrev_b32", E::Vop2, 18, f!(), GCN12),
    ins("v_and_b32", E::Vop2, 27, f!(), GCN10_11),
    ins("v_and_b32", E::Vop2, 19, f!(), GCN12),
    ins("v_or_b32", E::Vop2, 28, f!(), GCN10_11),
    ins("v_or_b32", E::Vop2, 20, f!(), GCN12),
    ins("v_xor_b32", E::Vop2, 29, f!(), GCN10_11),
    ins("v_xor_b32", E::Vop2, 21, f!(), GCN12),
    ins("v_bfm_b32", E::Vop2, 30, f!(), GCN10_11),
    ins("v_mac_f32", E::Vop2, 31, f!(LIT_FLOAT), GCN10_11),
    ins("v_mac_f32", E::Vop2, 22, f!(LIT_FLOAT), GCN12),
    ins("v_madmk_f32", E::Vop2, 32, f!(ARG1_LIT | LIT_FLOAT), GCN10_11),
    ins("v_madmk_f32", E::Vop2, 23, f!(ARG1_LIT | LIT_FLOAT), GCN12),
    ins("v_madak_f32", E::Vop2, 33, f!(ARG2_LIT | LIT_FLOAT), GCN10_11),
    ins("v_madak_f32", E::Vop2, 24, f!(ARG2_LIT | LIT_FLOAT), GCN12),
    ins("v_bcnt_u32_b32", E::Vop2, 34, f!(), GCN10_11),
    ins("v_mbcnt_lo_u32_b32", E::Vop2, 35, f!(), GCN10_11),
    ins("v_mbcnt_hi_u32_b32", E::Vop2, 36, f!(), GCN10_11),
    ins("v_add_i32", E::Vop2, 37, f!(CARRY_OUT), GCN10_11),
    ins("v_sub_i32", E::Vop2, 38, f!(CARRY_OUT), GCN10_11),
    ins("v_subrev_i32", E::Vop2, 39, f!(CARRY_OUT), GCN10_11),
    ins("v_add_u32", E::Vop2, 25, f!(CARRY_OUT), GCN12),
    ins("v_sub_u32", E::Vop2, 26, f!(CARRY_OUT), GCN12),
    ins("v_subrev_u32", E::Vop2, 27, f!(CARRY_OUT), GCN12),
    ins("v_addc_u32", E::Vop2, 40, f!(CARRY_OUT | CARRY_IN), GCN10_11),
    ins("v_addc_u32", E::Vop2, 28, f!(CARRY_OUT | CARRY_IN), GCN12),
    ins("v_subb_u32", E::Vop2, 41, f!(CARRY_OUT | CARRY_IN), GCN10_11),
    ins("v_subb_u32", E::Vop2, 29, f!(CARRY_OUT | CARRY_IN), GCN12),
    ins("v_subbrev_u32", E::Vop2, 42, f!(CARRY_OUT | CARRY_IN), GCN10_11),
    ins("v_subbrev_u32", E::Vop2, 30, f!(CARRY_OUT | CARRY_IN), GCN12),
    ins("v_ldexp_f32", E::Vop2, 43, f!(LIT_FLOAT), GCN10_11),
    ins("v_cvt_pkrtz_f16_f32", E::Vop2, 47, f!(LIT_FLOAT), GCN10_11),
    ins("v_add_f16", E::Vop2, 31, f!(LIT_F16), GCN12),
    ins("v_sub_f16", E::Vop2, 32, f!(LIT_F16), GCN12),
    ins("v_subrev_f16", E::Vop2, 33, f!(LIT_F16), GCN12),
    ins("v_mul_f16", E::Vop2, 34, f!(LIT_F16), GCN12),
    ins("v_mac_f16", E::Vop2, 35, f!(LIT_F16), GCN12),
    ins("v_madmk_f16", E::Vop2, 36, f!(ARG1_LIT | LIT_F16), GCN12),
    ins("v_madak_f16", E::Vop2, 37, f!(ARG2_LIT | LIT_F16), GCN12),
    ins("v_add_u16", E::Vop2, 38, f!(), GCN12),
    ins("v_sub_u16", E::Vop2, 39, f!(), GCN12),
    ins("v_subrev_u16", E::Vop2, 40, f!(), GCN12),
    ins("v_mul_lo_u16", E::Vop2, 41, f!(), GCN12),
    ins("v_lshlrev_b16", E::Vop2, 42, f!(), GCN12),
    ins("v_lshrrev_b16", E::Vop2, 43, f!(), GCN12),
    ins("v_ashrrev_i16", E::Vop2, 44, f!(), GCN12),
    ins("v_max_f16", E::Vop2, 45, f!(LIT_F16), GCN12),
    ins("v_min_f16", E::Vop2, 46, f!(LIT_F16), GCN12),
    ins("v_max_u16", E::Vop2, 47, f!(), GCN12),
    ins("v_max_i16", E::Vop2, 48, f!(), GCN12),
    ins("v_min_u16", E::Vop2, 49, f!(), GCN12),
    ins("v_min_i16", E::Vop2, 50, f!(), GCN12),
    ins("v_ldexp_f16", E::Vop2, 51, f!(LIT_F16), GCN12),
    // ---- VOP1 ----------------------------------------------------------
    ins("v_nop", E::Vop1, 0, f!(NO_ARGS), ALL),
    ins("v_mov_b32", E::Vop1, 1, f!(), ALL),
    ins("v_readfirstlane_b32", E::Vop1, 2, f!(DST_SGPR), ALL),
    ins("v_cvt_i32_f64", E::Vop1, 3, f!(SRC0_64 | LIT_FLOAT), ALL),
    ins("v_cvt_f64_i32", E::Vop1, 4, f!(DST_64), ALL),
    ins("v_cvt_f32_i32", E::Vop1, 5, f!(), ALL),
    ins("v_cvt_f32_u32", E::Vop1, 6, f!(), ALL),
    ins("v_cvt_u32_f32", E::Vop1, 7, f!(LIT_FLOAT), ALL),
    ins("v_cvt_i32_f32", E::Vop1, 8, f!(LIT_FLOAT), ALL),
    ins("v_cvt_f16_f32", E::Vop1, 10, f!(LIT_FLOAT), ALL),
    ins("v_cvt_f32_f16", E::Vop1, 11, f!(LIT_F16), ALL),
    ins("v_cvt_rpi_i32_f32", E::Vop1, 12, f!(LIT_FLOAT), ALL),
    ins("v_cvt_flr_i32_f32", E::Vop1, 13, f!(LIT_FLOAT), ALL),
    ins("v_cvt_off_f32_i4", E::Vop1, 14, f!(), ALL),
    ins("v_cvt_f32_f64", E::Vop1, 15, f!(SRC0_64 | LIT_FLOAT), ALL),
    ins("v_cvt_f64_f32", E::Vop1, 16, f!(DST_64 | LIT_FLOAT), ALL),
    ins("v_cvt_f32_ubyte0", E::Vop1, 17, f!(), ALL),
    ins("v_cvt_f32_ubyte1", E::Vop1, 18, f!(), ALL),
    ins("v_cvt_f32_ubyte2", E::Vop1, 19, f!(), ALL),
    ins("v_cvt_f32_ubyte3", E::Vop1, 20, f!(), ALL),
    ins("v_cvt_u32_f64", E::Vop1, 21, f!(SRC0_64 | LIT_FLOAT), ALL),
    ins("v_cvt_f64_u32", E::Vop1, 22, f!(DST_64), ALL),
    ins("v_fract_f32", E::Vop1, 32, f!(LIT_FLOAT), GCN10_11),
    ins("v_fract_f32", E::Vop1, 27, f!(LIT_FLOAT), GCN12),
    ins("v_trunc_f32", E::Vop1, 33, f!(LIT_FLOAT), GCN10_11),
    ins("v_trunc_f32", E::Vop1, 28, f!(LIT_FLOAT), GCN12),
    ins("v_ceil_f32", E::Vop1, 34, f!(LIT_FLOAT), GCN10_11),
    ins("v_ceil_f32", E::Vop1, 29, f!(LIT_FLOAT), GCN12),
    ins("v_rndne_f32", E::Vop1, 35, f!(LIT_FLOAT), GCN10_11),
    ins("v_rndne_f32", E::Vop1, 30, f!(LIT_FLOAT), GCN12),
    ins("v_floor_f32", E::Vop1, 36, f!(LIT_FLOAT), GCN10_11),
    ins("v_floor_f32", E::Vop1, 31, f!(LIT_FLOAT), GCN12),
    ins("v_exp_f32", E::Vop1, 37, f!(LIT_FLOAT), GCN10_11),
    ins("v_exp_f32", E::Vop1, 32, f!(LIT_FLOAT), GCN12),
    ins("v_log_f32", E::Vop1, 39, f!(LIT_FLOAT), GCN10_11),
    ins("v_log_f32", E::Vop1, 33, f!(LIT_FLOAT), GCN12),
    ins("v_rcp_f32", E::Vop1, 42, f!(LIT_FLOAT), GCN10_11),
    ins("v_rcp_f32", E::Vop1, 34, f!(LIT_FLOAT), GCN12),
    ins("v_rcp_iflag_f32", E::Vop1, 43, f!(LIT_FLOAT), GCN10_11),
    ins("v_rcp_iflag_f32", E::Vop1, 35, f!(LIT_FLOAT), GCN12),
    ins("v_rsq_f32", E::Vop1, 46, f!(LIT_FLOAT), GCN10_11),
    ins("v_rsq_f32", E::Vop1, 36, f!(LIT_FLOAT), GCN12),
    ins("v_rcp_f64", E::Vop1, 47, f!(DST_64 | SRC0_64 | LIT_FLOAT), GCN10_11),
    ins("v_rcp_f64", E::Vop1, 37, f!(DST_64 | SRC0_64 | LIT_FLOAT), GCN12),
    ins("v_rsq_f64", E::Vop1, 49, f!(DST_64 | SRC0_64 | LIT_FLOAT), GCN10_11),
    ins("v_rsq_f64", E::Vop1, 38, f!(DST_64 | SRC0_64 | LIT_FLOAT), GCN12),
    ins("v_sqrt_f32", E::Vop1, 51, f!(LIT_FLOAT), GCN10_11),
    ins("v_sqrt_f32", E::Vop1, 39, f!(LIT_FLOAT), GCN12),
    ins("v_sqrt_f64", E::Vop1, 52, f!(DST_64 | SRC0_64 | LIT_FLOAT), GCN10_11),
    ins("v_sqrt_f64", E::Vop1, 40, f!(DST_64 | SRC0_64 | LIT_FLOAT), GCN12),
    ins("v_sin_f32", E::Vop1, 53, f!(LIT_FLOAT), GCN10_11),
    ins("v_sin_f32", E::Vop1, 41, f!(LIT_FLOAT), GCN12),
    ins("v_cos_f32", E::Vop1, 54, f!(LIT_FLOAT), GCN10_11),
    ins("v_cos_f32", E::Vop1, 42, f!(LIT_FLOAT), GCN12),
    ins("v_not_b32", E::Vop1, 55, f!(), GCN10_11),
    ins("v_not_b32", E::Vop1, 43, f!(), GCN12),
    ins("v_bfrev_b32", E::Vop1, 56, f!(), GCN10_11),
    ins("v_bfrev_b32", E::Vop1, 44, f!(), GCN12),
    ins("v_ffbh_u32", E::Vop1, 57, f!(), GCN10_11),
    ins("v_ffbh_u32", E::Vop1, 45, f!(), GCN12),
    ins("v_ffbl_b32", E::Vop1, 58, f!(), GCN10_11),
    ins("v_ffbl_b32", E::Vop1, 46, f!(), GCN12),
    ins("v_ffbh_i32", E::Vop1, 59, f!(), GCN10_11),
    ins("v_ffbh_i32", E::Vop1, 47, f!(), GCN12),
    ins("v_frexp_exp_i32_f64", E::Vop1, 60, f!(SRC0_64 | LIT_FLOAT), GCN10_11),
    ins("v_frexp_exp_i32_f64", E::Vop1, 48, f!(SRC0_64 | LIT_FLOAT), GCN12),
    ins("v_frexp_mant_f64", E::Vop1, 61, f!(DST_64 | SRC0_64 | LIT_FLOAT), GCN10_11),
    ins("v_frexp_mant_f64", E::Vop1, 49, f!(DST_64 | SRC0_64 | LIT_FLOAT), GCN12),
    ins("v_fract_f64", E::Vop1, 62, f!(DST_64 | SRC0_64 | LIT_FLOAT), GCN10_11),
    ins("v_fract_f64", E::Vop1, 50, f!(DST_64 | SRC0_64 | LIT_FLOAT), GCN12),
    ins("v_frexp_exp_i32_f32", E::Vop1, 63, f!(LIT_FLOAT), GCN10_11),
    ins("v_frexp_exp_i32_f32", E::Vop1, 51, f!(LIT_FLOAT), GCN12),
    ins("v_frexp_mant_f32", E::Vop1, 64, f!(LIT_FLOAT), GCN10_11),
    ins("v_frexp_mant_f32", E::Vop1, 52, f!(LIT_FLOAT), GCN12),
    ins("v_clrexcp", E::Vop1, 65, f!(NO_ARGS), GCN10_11),
    ins("v_clrexcp", E::Vop1, 53, f!(NO_ARGS), GCN12),
    ins("v_movreld_b32", E::Vop1, 66, f!(), GCN10_11),
    ins("v_movreld_b32", E::Vop1, 54, f!(), GCN12),
    ins("v_movrels_b32", E::Vop1, 67, f!(), GCN10_11),
    ins("v_movrels_b32", E::Vop1, 55, f!(), GCN12),
    ins("v_movrelsd_b32", E::Vop1, 68, f!(), GCN10_11),
    ins("v_movrelsd_b32", E::Vop1, 56, f!(), GCN12),
    // ---- VOPC ----------------------------------------------------------
    ins("v_cmp_lt_f32", E::Vopc, 0x01, f!(LIT_FLOAT), GCN10_11),
    ins("v_cmp_lt_f32", E::Vopc, 0x41, f!(LIT_FLOAT), GCN12),
    ins("v_cmp_eq_f32", E::Vopc, 0x02, f!(LIT_FLOAT), GCN10_11),
    ins("v_cmp_eq_f32", E::Vopc, 0x42, f!(LIT_FLOAT), GCN12),
    ins("v_cmp_le_f32", E::Vopc, 0x03, f!(LIT_FLOAT), GCN10_11),
    ins("v_cmp_le_f32", E::Vopc, 0x43, f!(LIT_FLOAT), GCN12),
    ins("v_cmp_gt_f32", E::Vopc, 0x04, f!(LIT_FLOAT), GCN10_11),
    ins("v_cmp_gt_f32", E::Vopc, 0x44, f!(LIT_FLOAT), GCN12),
    ins("v_cmp_lg_f32", E::Vopc, 0x05, f!(LIT_FLOAT), GCN10_11),
    ins("v_cmp_lg_f32", E::Vopc, 0x45, f!(LIT_FLOAT), GCN12),
    ins("v_cmp_ge_f32", E::Vopc, 0x06, f!(LIT_FLOAT), GCN10_11),
    ins("v_cmp_ge_f32", E::Vopc, 0x46, f!(LIT_FLOAT), GCN12),
    ins("v_cmp_nge_f32", E::Vopc, 0x09, f!(LIT_FLOAT), GCN10_11),
    ins("v_cmp_nge_f32", E::Vopc, 0x49, f!(LIT_FLOAT), GCN12),
    ins("v_cmp_neq_f32", E::Vopc, 0x0d, f!(LIT_FLOAT), GCN10_11),
    ins("v_cmp_neq_f32", E::Vopc, 0x4d, f!(LIT_FLOAT), GCN12),
    ins("v_cmp_lt_f64", E::Vopc, 0x21, f!(SRC0_64 | SRC1_64 | LIT_FLOAT), GCN10_11),
    ins("v_cmp_lt_f64", E::Vopc, 0x61, f!(SRC0_64 | SRC1_64 | LIT_FLOAT), GCN12),
    ins("v_cmp_eq_f64", E::Vopc, 0x22, f!(SRC0_64 | SRC1_64 | LIT_FLOAT), GCN10_11),
    ins("v_cmp_eq_f64", E::Vopc, 0x62, f!(SRC0_64 | SRC1_64 | LIT_FLOAT), GCN12),
    ins("v_cmp_gt_f64", E::Vopc, 0x24, f!(SRC0_64 | SRC1_64 | LIT_FLOAT), GCN10_11),
    ins("v_cmp_gt_f64", E::Vopc, 0x64, f!(SRC0_64 | SRC1_64 | LIT_FLOAT), GCN12),
    ins("v_cmp_lt_i32", E::Vopc, 0x81, f!(), GCN10_11),
    ins("v_cmp_lt_i32", E::Vopc, 0xc1, f!(), GCN12),
    ins("v_cmp_eq_i32", E::Vopc, 0x82, f!(), GCN10_11),
    ins("v_cmp_eq_i32", E::Vopc, 0xc2, f!(), GCN12),
    ins("v_cmp_le_i32", E::Vopc, 0x83, f!(), GCN10_11),
    ins("v_cmp_le_i32", E::Vopc, 0xc3, f!(), GCN12),
    ins("v_cmp_gt_i32", E::Vopc, 0x84, f!(), GCN10_11),
    ins("v_cmp_gt_i32", E::Vopc, 0xc4, f!(), GCN12),
    ins("v_cmp_ne_i32", E::Vopc, 0x85, f!(), GCN10_11),
    ins("v_cmp_ne_i32", E::Vopc, 0xc5, f!(), GCN12),
    ins("v_cmp_ge_i32", E::Vopc, 0x86, f!(), GCN10_11),
    ins("v_cmp_ge_i32", E::Vopc, 0xc6, f!(), GCN12),
    ins("v_cmp_lt_u32", E::Vopc, 0xc1, f!(), GCN10_11),
    ins("v_cmp_lt_u32", E::Vopc, 0xc9, f!(), GCN12),
    ins("v_cmp_eq_u32", E::Vopc, 0xc2, f!(), GCN10_11),
    ins("v_cmp_eq_u32", E::Vopc, 0xca, f!(), GCN12),
    ins("v_cmp_le_u32", E::Vopc, 0xc3, f!(), GCN10_11),
    ins("v_cmp_le_u32", E::Vopc, 0xcb, f!(), GCN12),
    ins("v_cmp_gt_u32", E::Vopc, 0xc4, f!(), GCN10_11),
    ins("v_cmp_gt_u32", E::Vopc, 0xcc, f!(), GCN12),
    ins("v_cmp_ne_u32", E::Vopc, 0xc5, f!(), GCN10_11),
    ins("v_cmp_ne_u32", E::Vopc, 0xcd, f!(), GCN12),
    ins("v_cmp_ge_u32", E::Vopc, 0xc6, f!(), GCN10_11),
    ins("v_cmp_ge_u32", E::Vopc, 0xce, f!(), GCN12),
    ins("v_cmp_lt_i64", E::Vopc, 0xa1, f!(SRC0_64 | SRC1_64), GCN10_11),
    ins("v_cmp_lt_i64", E::Vopc, 0xe1, f!(SRC0_64 | SRC1_64), GCN12),
    ins("v_cmp_eq_i64", E::Vopc, 0xa2, f!(SRC0_64 | SRC1_64), GCN10_11),
    ins("v_cmp_eq_i64", E::Vopc, 0xe2, f!(SRC0_64 | SRC1_64), GCN12),
    ins("v_cmp_gt_i64", E::Vopc, 0xa4, f!(SRC0_64 | SRC1_64), GCN10_11),
    ins("v_cmp_gt_i64", E::Vopc, 0xe4, f!(SRC0_64 | SRC1_64), GCN12),
    ins("v_cmp_lt_u64", E::Vopc, 0xe1, f!(SRC0_64 | SRC1_64), GCN10_11),
    ins("v_cmp_lt_u64", E::Vopc, 0xe9, f!(SRC0_64 | SRC1_64), GCN12),
    ins("v_cmp_eq_u64", E::Vopc, 0xe2, f!(SRC0_64 | SRC1_64), GCN10_11),
    ins("v_cmp_eq_u64", E::Vopc, 0xea, f!(SRC0_64 | SRC1_64), GCN12),
    ins("v_cmp_gt_u64", E::Vopc, 0xe4, f!(SRC0_64 | SRC1_64), GCN10_11),
    ins("v_cmp_gt_u64", E::Vopc, 0xec, f!(SRC0_64 | SRC1_64), GCN12),
    ins("v_cmpx_gt_u32", E::Vopc, 0xd4, f!(), GCN10_11),
    ins("v_cmpx_gt_u32", E::Vopc, 0xdc, f!(), GCN12),
    ins("v_cmpx_eq_i32", E::Vopc, 0x92, f!(), GCN10_11),
    ins("v_cmpx_eq_i32", E::Vopc, 0xd2, f!(), GCN12),
    // ---- VOP3 ----------------------------------------------------------
    ins("v_mad_legacy_f32", E::Vop3, 0x140, f!(LIT_FLOAT), GCN10_11),
    ins("v_mad_legacy_f32", E::Vop3, 0x1c0, f!(LIT_FLOAT), GCN12),
    ins("v_mad_f32", E::Vop3, 0x141, f!(LIT_FLOAT), GCN10_11),
    ins("v_mad_f32", E::Vop3, 0x1c1, f!(LIT_FLOAT), GCN12),
    ins("v_mad_i32_i24", E::Vop3, 0x142, f!(), GCN10_11),
    ins("v_mad_i32_i24", E::Vop3, 0x1c2, f!(), GCN12),
    ins("v_mad_u32_u24", E::Vop3, 0x143, f!(), GCN10_11),
    ins("v_mad_u32_u24", E::Vop3, 0x1c3, f!(), GCN12),
    ins("v_bfe_u32", E::Vop3, 0x148, f!(), GCN10_11),
    ins("v_bfe_u32", E::Vop3, 0x1c8, f!(), GCN12),
    ins("v_bfe_i32", E::Vop3, 0x149, f!(), GCN10_11),
    ins("v_bfe_i32", E::Vop3, 0x1c9, f!(), GCN12),
    ins("v_bfi_b32", E::Vop3, 0x14a, f!(), GCN10_11),
    ins("v_bfi_b32", E::Vop3, 0x1ca, f!(), GCN12),
    ins("v_fma_f32", E::Vop3, 0x14b, f!(LIT_FLOAT), GCN10_11),
    ins("v_fma_f32", E::Vop3, 0x1cb, f!(LIT_FLOAT), GCN12),
    ins("v_fma_f64", E::Vop3, 0x14c, f!(DST_64 | SRC0_64 | SRC1_64 | SRC2_64 | LIT_FLOAT), GCN10_11),
    ins("v_fma_f64", E::Vop3, 0x1cc, f!(DST_64 | SRC0_64 | SRC1_64 | SRC2_64 | LIT_FLOAT), GCN12),
    ins("v_alignbit_b32", E::Vop3, 0x14e, f!(), GCN10_11),
    ins("v_alignbit_b32", E::Vop3, 0x1ce, f!(), GCN12),
    ins("v_alignbyte_b32", E::Vop3, 0x14f, f!(), GCN10_11),
    ins("v_alignbyte_b32", E::Vop3, 0x1cf, f!(), GCN12),
    ins("v_min3_f32", E::Vop3, 0x151, f!(LIT_FLOAT), GCN10_11),
    ins("v_min3_f32", E::Vop3, 0x1d0, f!(LIT_FLOAT), GCN12),
    ins("v_min3_i32", E::Vop3, 0x152, f!(), GCN10_11),
    ins("v_min3_i32", E::Vop3, 0x1d1, f!(), GCN12),
    ins("v_min3_u32", E::Vop3, 0x153, f!(), GCN10_11),
    ins("v_min3_u32", E::Vop3, 0x1d2, f!(), GCN12),
    ins("v_max3_f32", E::Vop3, 0x154, f!(LIT_FLOAT), GCN10_11),
    ins("v_max3_f32", E::Vop3, 0x1d3, f!(LIT_FLOAT), GCN12),
    ins("v_max3_i32", E::Vop3, 0x155, f!(), GCN10_11),
    ins("v_max3_i32", E::Vop3, 0x1d4, f!(), GCN12),
    ins("v_max3_u32", E::Vop3, 0x156, f!(), GCN10_11),
    ins("v_max3_u32", E::Vop3, 0x1d5, f!(), GCN12),
    ins("v_med3_f32", E::Vop3, 0x157, f!(LIT_FLOAT), GCN10_11),
    ins("v_med3_f32", E::Vop3, 0x1d6, f!(LIT_FLOAT), GCN12),
    ins("v_med3_i32", E::Vop3, 0x158, f!(), GCN10_11),
    ins("v_med3_i32", E::Vop3, 0x1d7, f!(), GCN12),
    ins("v_med3_u32", E::Vop3, 0x159, f!(), GCN10_11),
    ins("v_med3_u32", E::Vop3, 0x1d8, f!(), GCN12),
    ins("v_sad_u8", E::Vop3, 0x15a, f!(), GCN10_11),
    ins("v_sad_u8", E::Vop3, 0x1d9, f!(), GCN12),
    ins("v_sad_u32", E::Vop3, 0x15d, f!(), GCN10_11),
    ins("v_sad_u32", E::Vop3, 0x1dc, f!(), GCN12),
    ins("v_div_fixup_f32", E::Vop3, 0x15f, f!(LIT_FLOAT), GCN10_11),
    ins("v_div_fixup_f32", E::Vop3, 0x1de, f!(LIT_FLOAT), GCN12),
    ins("v_div_fixup_f64", E::Vop3, 0x160, f!(DST_64 | SRC0_64 | SRC1_64 | SRC2_64 | LIT_FLOAT), GCN10_11),
    ins("v_div_fixup_f64", E::Vop3, 0x1df, f!(DST_64 | SRC0_64 | SRC1_64 | SRC2_64 | LIT_FLOAT), GCN12),
    ins("v_lshl_b64", E::Vop3, 0x161, f!(DST_64 | SRC0_64 | TWO_SRC), GCN10_11),
    ins("v_lshr_b64", E::Vop3, 0x162, f!(DST_64 | SRC0_64 | TWO_SRC), GCN10_11),
    ins("v_ashr_i64", E::Vop3, 0x163, f!(DST_64 | SRC0_64 | TWO_SRC), GCN10_11),
    ins("v_add_f64", E::Vop3, 0x164, f!(DST_64 | SRC0_64 | SRC1_64 | TWO_SRC | LIT_FLOAT), GCN10_11),
    ins("v_add_f64", E::Vop3, 0x280, f!(DST_64 | SRC0_64 | SRC1_64 | TWO_SRC | LIT_FLOAT), GCN12),
    ins("v_mul_f64", E::Vop3, 0x165, f!(DST_64 | SRC0_64 | SRC1_64 | TWO_SRC | LIT_FLOAT), GCN10_11),
    ins("v_mul_f64", E::Vop3, 0x281, f!(DST_64 | SRC0_64 | SRC1_64 | TWO_SRC | LIT_FLOAT), GCN12),
    ins("v_min_f64", E::Vop3, 0x166, f!(DST_64 | SRC0_64 | SRC1_64 | TWO_SRC | LIT_FLOAT), GCN10_11),
    ins("v_min_f64", E::Vop3, 0x282, f!(DST_64 | SRC0_64 | SRC1_64 | TWO_SRC | LIT_FLOAT), GCN12),
    ins("v_max_f64", E::Vop3, 0x167, f!(DST_64 | SRC0_64 | SRC1_64 | TWO_SRC | LIT_FLOAT), GCN10_11),
    ins("v_max_f64", E::Vop3, 0x283, f!(DST_64 | SRC0_64 | SRC1_64 | TWO_SRC | LIT_FLOAT), GCN12),
    ins("v_ldexp_f64", E::Vop3, 0x168, f!(DST_64 | SRC0_64 | TWO_SRC | LIT_FLOAT), GCN10_11),
    ins("v_ldexp_f64", E::Vop3, 0x284, f!(DST_64 | SRC0_64 | TWO_SRC | LIT_FLOAT), GCN12),
    ins("v_mul_lo_u32", E::Vop3, 0x169, f!(TWO_SRC), GCN10_11),
    ins("v_mul_lo_u32", E::Vop3, 0x285, f!(TWO_SRC), GCN12),
    ins("v_mul_hi_u32", E::Vop3, 0x16a, f!(TWO_SRC), GCN10_11),
    ins("v_mul_hi_u32", E::Vop3, 0x286, f!(TWO_SRC), GCN12),
    ins("v_mul_lo_i32", E::Vop3, 0x16b, f!(TWO_SRC), GCN10_11),
    ins("v_mul_hi_i32", E::Vop3, 0x16c, f!(TWO_SRC), GCN10_11),
    ins("v_mul_hi_i32", E::Vop3, 0x287, f!(TWO_SRC), GCN12),
    ins("v_div_scale_f32", E::Vop3, 0x16d, f!(VOP3B | LIT_FLOAT), GCN10_11),
    ins("v_div_scale_f32", E::Vop3, 0x1e0, f!(VOP3B | LIT_FLOAT), GCN12),
    ins("v_div_scale_f64", E::Vop3, 0x16e, f!(VOP3B | DST_64 | SRC0_64 | SRC1_64 | SRC2_64 | LIT_FLOAT), GCN10_11),
    ins("v_div_scale_f64", E::Vop3, 0x1e1, f!(VOP3B | DST_64 | SRC0_64 | SRC1_64 | SRC2_64 | LIT_FLOAT), GCN12),
    ins("v_div_fmas_f32", E::Vop3, 0x16f, f!(LIT_FLOAT), GCN10_11),
    ins("v_div_fmas_f32", E::Vop3, 0x1e2, f!(LIT_FLOAT), GCN12),
    ins("v_div_fmas_f64", E::Vop3, 0x170, f!(DST_64 | SRC0_64 | SRC1_64 | SRC2_64 | LIT_FLOAT), GCN10_11),
    ins("v_div_fmas_f64", E::Vop3, 0x1e3, f!(DST_64 | SRC0_64 | SRC1_64 | SRC2_64 | LIT_FLOAT), GCN12),
    ins("v_trig_preop_f64", E::Vop3, 0x174, f!(DST_64 | SRC0_64 | TWO_SRC | LIT_FLOAT), GCN10_11),
    ins("v_trig_preop_f64", E::Vop3, 0x292, f!(DST_64 | SRC0_64 | TWO_SRC | LIT_FLOAT), GCN12),
    // ---- VINTRP --------------------------------------------------------
    ins("v_interp_p1_f32", E::Vintrp, 0, f!(), ALL),
    ins("v_interp_p2_f32", E::Vintrp, 1, f!(), ALL),
    ins("v_interp_mov_f32", E::Vintrp, 2, f!(VINTRP_P), ALL),
    // ---- DS ------------------------------------------------------------
    ins("ds_add_u32", E::Ds, 0, f!(), ALL),
    ins("ds_sub_u32", E::Ds, 1, f!(), ALL),
    ins("ds_rsub_u32", E::Ds, 2, f!(), ALL),
    ins("ds_inc_u32", E::Ds, 3, f!(), ALL),
    ins("ds_dec_u32", E::Ds, 4, f!(), ALL),
    ins("ds_min_i32", E::Ds, 5, f!(), ALL),
    ins("ds_max_i32", E::Ds, 6, f!(), ALL),
    ins("ds_min_u32", E::Ds, 7, f!(), ALL),
    ins("ds_max_u32", E::Ds, 8, f!(), ALL),
    ins("ds_and_b32", E::Ds, 9, f!(), ALL),
    ins("ds_or_b32", E::Ds, 10, f!(), ALL),
    ins("ds_xor_b32", E::Ds, 11, f!(), ALL),
    ins("ds_mskor_b32", E::Ds, 12, f!(DS_2D), ALL),
    ins("ds_write_b32", E::Ds, 13, f!(), ALL),
    ins("ds_write2_b32", E::Ds, 14, f!(DS_2D | DS_OFF2), ALL),
    ins("ds_write2st64_b32", E::Ds, 15, f!(DS_2D | DS_OFF2), ALL),
    ins("ds_cmpst_b32", E::Ds, 16, f!(DS_2D), ALL),
    ins("ds_cmpst_f32", E::Ds, 17, f!(DS_2D), ALL),
    ins("ds_min_f32", E::Ds, 18, f!(), ALL),
    ins("ds_max_f32", E::Ds, 19, f!(), ALL),
    ins("ds_add_rtn_u32", E::Ds, 32, f!(DS_VDST), ALL),
    ins("ds_sub_rtn_u32", E::Ds, 33, f!(DS_VDST), ALL),
    ins("ds_rsub_rtn_u32", E::Ds, 34, f!(DS_VDST), ALL),
    ins("ds_inc_rtn_u32", E::Ds, 35, f!(DS_VDST), ALL),
    ins("ds_dec_rtn_u32", E::Ds, 36, f!(DS_VDST), ALL),
    ins("ds_min_rtn_i32", E::Ds, 37, f!(DS_VDST), ALL),
    ins("ds_max_rtn_i32", E::Ds, 38, f!(DS_VDST), ALL),
    ins("ds_min_rtn_u32", E::Ds, 39, f!(DS_VDST), ALL),
    ins("ds_max_rtn_u32", E::Ds, 40, f!(DS_VDST), ALL),
    ins("ds_and_rtn_b32", E::Ds, 41, f!(DS_VDST), ALL),
    ins("ds_or_rtn_b32", E::Ds, 42, f!(DS_VDST), ALL),
    ins("ds_xor_rtn_b32", E::Ds, 43, f!(DS_VDST), ALL),
    ins("ds_mskor_rtn_b32", E::Ds, 44, f!(DS_VDST | DS_2D), ALL),
    ins("ds_wrxchg_rtn_b32", E::Ds, 45, f!(DS_VDST), ALL),
    ins("ds_cmpst_rtn_b32", E::Ds, 48, f!(DS_VDST | DS_2D), ALL),
    ins("ds_min_rtn_f32", E::Ds, 50, f!(DS_VDST), ALL),
    ins("ds_max_rtn_f32", E::Ds, 51, f!(DS_VDST), ALL),
    ins("ds_swizzle_b32", E::Ds, 53, f!(DS_VDST | DS_NO_DATA), ALL),
    ins("ds_read_b32", E::Ds, 54, f!(DS_VDST | DS_NO_DATA), ALL),
    ins("ds_read2_b32", E::Ds, 55, f!(DS_VDST | DS_NO_DATA | DS_OFF2), ALL),
    ins("ds_read2st64_b32", E::Ds, 56, f!(DS_VDST | DS_NO_DATA | DS_OFF2), ALL),
    ins("ds_read_i8", E::Ds, 57, f!(DS_VDST | DS_NO_DATA), ALL),
    ins("ds_read_u8", E::Ds, 58, f!(DS_VDST | DS_NO_DATA), ALL),
    ins("ds_read_i16", E::Ds, 59, f!(DS_VDST | DS_NO_DATA), ALL),
    ins("ds_read_u16", E::Ds, 60, f!(DS_VDST | DS_NO_DATA), ALL),
    ins("ds_consume", E::Ds, 61, f!(DS_VDST | DS_NO_DATA | DS_NO_ADDR), ALL),
    ins("ds_append", E::Ds, 62, f!(DS_VDST | DS_NO_DATA | DS_NO_ADDR), ALL),
    ins("ds_ordered_count", E::Ds, 63, f!(DS_VDST | DS_NO_DATA | DS_GDS), ALL),
    ins("ds_add_u64", E::Ds, 64, f!(D2), ALL),
    ins("ds_sub_u64", E::Ds, 65, f!(D2), ALL),
    ins("ds_min_u64", E::Ds, 71, f!(D2), ALL),
    ins("ds_max_u64", E::Ds, 72, f!(D2), ALL),
    ins("ds_and_b64", E::Ds, 73, f!(D2), ALL),
    ins("ds_or_b64", E::Ds, 74, f!(D2), ALL),
    ins("ds_xor_b64", E::Ds, 75, f!(D2), ALL),
    ins("ds_mskor_b64", E::Ds, 76, f!(DS_2D | D2), ALL),
    ins("ds_write_b64", E::Ds, 77, f!(D2), ALL),
    ins("ds_write2_b64", E::Ds, 78, f!(DS_2D | DS_OFF2 | D2), ALL),
    ins("ds_cmpst_b64", E::Ds, 80, f!(DS_2D | D2), ALL),
    ins("ds_add_rtn_u64", E::Ds, 96, f!(DS_VDST | D2), ALL),
    ins("ds_wrxchg_rtn_b64", E::Ds, 109, f!(DS_VDST | D2), ALL),
    ins("ds_read_b64", E::Ds, 118, f!(DS_VDST | DS_NO_DATA | D2), ALL),
    ins("ds_read2_b64", E::Ds, 119, f!(DS_VDST | DS_NO_DATA | DS_OFF2 | D2), ALL),
    ins("ds_read2st64_b64", E::Ds, 120, f!(DS_VDST | DS_NO_DATA | DS_OFF2 | D2), ALL),
    // ---- MUBUF ---------------------------------------------------------
    ins("buffer_load_format_x", E::Mubuf, 0, f!(), ALL),
    ins("buffer_load_format_xy", E::Mubuf, 1, f!(D2), ALL),
    ins("buffer_load_format_xyz", E::Mubuf, 2, f!(D3), ALL),
    ins("buffer_load_format_xyzw", E::Mubuf, 3, f!(D4), ALL),
    ins("buffer_store_format_x", E::Mubuf, 4, f!(STORE), ALL),
    ins("buffer_store_format_xy", E::Mubuf, 5, f!(STORE | D2), ALL),
    ins("buffer_store_format_xyz", E::Mubuf, 6, f!(STORE | D3), ALL),
    ins("buffer_store_format_xyzw", E::Mubuf, 7, f!(STORE | D4), ALL),
    ins("buffer_load_ubyte", E::Mubuf, 8, f!(), GCN10_11),
    ins("buffer_load_ubyte", E::Mubuf, 16, f!(), GCN12),
    ins("buffer_load_sbyte", E::Mubuf, 9, f!(), GCN10_11),
    ins("buffer_load_sbyte", E::Mubuf, 17, f!(), GCN12),
    ins("buffer_load_ushort", E::Mubuf, 10, f!(), GCN10_11),
    ins("buffer_load_ushort", E::Mubuf, 18, f!(), GCN12),
    ins("buffer_load_sshort", E::Mubuf, 11, f!(), GCN10_11),
    ins("buffer_load_sshort", E::Mubuf, 19, f!(), GCN12),
    ins("buffer_load_dword", E::Mubuf, 12, f!(), GCN10_11),
    ins("buffer_load_dword", E::Mubuf, 20, f!(), GCN12),
    ins("buffer_load_dwordx2", E::Mubuf, 13, f!(D2), GCN10_11),
    ins("buffer_load_dwordx2", E::Mubuf, 21, f!(D2), GCN12),
    ins("buffer_load_dwordx3", E::Mubuf, 15, f!(D3), GCN11),
    ins("buffer_load_dwordx3", E::Mubuf, 22, f!(D3), GCN12),
    ins("buffer_load_dwordx4", E::Mubuf, 14, f!(D4), GCN10_11),
    ins("buffer_load_dwordx4", E::Mubuf, 23, f!(D4), GCN12),
    ins("buffer_store_byte", E::Mubuf, 24, f!(STORE), ALL),
    ins("buffer_store_short", E::Mubuf, 26, f!(STORE), ALL),
    ins("buffer_store_dword", E::Mubuf, 28, f!(STORE), ALL),
    ins("buffer_store_dwordx2", E::Mubuf, 29, f!(STORE | D2), ALL),
    ins("buffer_store_dwordx3", E::Mubuf, 31, f!(STORE | D3), GCN11),
    ins("buffer_store_dwordx3", E::Mubuf, 30, f!(STORE | D3), GCN12),
    ins("buffer_store_dwordx4", E::Mubuf, 30, f!(STORE | D4), GCN10_11),
    ins("buffer_store_dwordx4", E::Mubuf, 31, f!(STORE | D4), GCN12),
    ins("buffer_atomic_swap", E::Mubuf, 48, f!(ATOMIC), GCN10_11),
    ins("buffer_atomic_swap", E::Mubuf, 64, f!(ATOMIC), GCN12),
    ins("buffer_atomic_cmpswap", E::Mubuf, 49, f!(ATOMIC | CMPSWAP), GCN10_11),
    ins("buffer_atomic_cmpswap", E::Mubuf, 65, f!(ATOMIC | CMPSWAP), GCN12),
    ins("buffer_atomic_add", E::Mubuf, 50, f!(ATOMIC), GCN10_11),
    ins("buffer_atomic_add", E::Mubuf, 66, f!(ATOMIC), GCN12),
    ins("buffer_atomic_sub", E::Mubuf, 51, f!(ATOMIC), GCN10_11),
    ins("buffer_atomic_sub", E::Mubuf, 67, f!(ATOMIC), GCN12),
    ins("buffer_atomic_and", E::Mubuf, 57, f!(ATOMIC), GCN10_11),
    ins("buffer_atomic_and", E::Mubuf, 72, f!(ATOMIC), GCN12),
    ins("buffer_atomic_or", E::Mubuf, 58, f!(ATOMIC), GCN10_11),
    ins("buffer_atomic_or", E::Mubuf, 73, f!(ATOMIC), GCN12),
    ins("buffer_atomic_xor", E::Mubuf, 59, f!(ATOMIC), GCN10_11),
    ins("buffer_atomic_xor", E::Mubuf, 74, f!(ATOMIC), GCN12),
    ins("buffer_atomic_inc", E::Mubuf, 60, f!(ATOMIC), GCN10_11),
    ins("buffer_atomic_inc", E::Mubuf, 75, f!(ATOMIC), GCN12),
    ins("buffer_atomic_dec", E::Mubuf, 61, f!(ATOMIC), GCN10_11),
    ins("buffer_atomic_dec", E::Mubuf, 76, f!(ATOMIC), GCN12),
    ins("buffer_wbinvl1", E::Mubuf, 0x71, f!(NO_ARGS), GCN10_11),
    ins("buffer_wbinvl1", E::Mubuf, 0x3e, f!(NO_ARGS), GCN12),
    // ---- MTBUF ---------------------------------------------------------
    ins("tbuffer_load_format_x", E::Mtbuf, 0, f!(), ALL),
    ins("tbuffer_load_format_xy", E::Mtbuf, 1, f!(D2), ALL),
    ins("tbuffer_load_format_xyz", E::Mtbuf, 2, f!(D3), ALL),
    ins("tbuffer_load_format_xyzw", E::Mtbuf, 3, f!(D4), ALL),
    ins("tbuffer_store_format_x", E::Mtbuf, 4, f!(STORE), ALL),
    ins("tbuffer_store_format_xy", E::Mtbuf, 5, f!(STORE | D2), ALL),
    ins("tbuffer_store_format_xyz", E::Mtbuf, 6, f!(STORE | D3), ALL),
    ins("tbuffer_store_format_xyzw", E::Mtbuf, 7, f!(STORE | D4), ALL),
    // ---- MIMG ----------------------------------------------------------
    ins("image_load", E::Mimg, 0, f!(), ALL),
    ins("image_load_mip", E::Mimg, 1, f!(), ALL),
    ins("image_store", E::Mimg, 8, f!(STORE), ALL),
    ins("image_store_mip", E::Mimg, 9, f!(STORE), ALL),
    ins("image_get_resinfo", E::Mimg, 14, f!(), ALL),
    ins("image_atomic_swap", E::Mimg, 15, f!(ATOMIC), GCN10_11),
    ins("image_atomic_swap", E::Mimg, 16, f!(ATOMIC), GCN12),
    ins("image_atomic_cmpswap", E::Mimg, 16, f!(ATOMIC | CMPSWAP), GCN10_11),
    ins("image_atomic_cmpswap", E::Mimg, 17, f!(ATOMIC | CMPSWAP), GCN12),
    ins("image_atomic_add", E::Mimg, 17, f!(ATOMIC), GCN10_11),
    ins("image_atomic_add", E::Mimg, 18, f!(ATOMIC), GCN12),
    ins("image_atomic_sub", E::Mimg, 18, f!(ATOMIC), GCN10_11),
    ins("image_atomic_sub", E::Mimg, 19, f!(ATOMIC), GCN12),
    ins("image_atomic_and", E::Mimg, 24, f!(ATOMIC), ALL),
    ins("image_atomic_or", E::Mimg, 25, f!(ATOMIC), ALL),
    ins("image_atomic_xor", E::Mimg, 26, f!(ATOMIC), ALL),
    ins("image_atomic_inc", E::Mimg, 27, f!(ATOMIC), ALL),
    ins("image_atomic_dec", E::Mimg, 28, f!(ATOMIC), ALL),
    ins("image_sample", E::Mimg, 32, f!(MIMG_SAMPLE), ALL),
    ins("image_sample_cl", E::Mimg, 33, f!(MIMG_SAMPLE), ALL),
    ins("image_sample_d", E::Mimg, 34, f!(MIMG_SAMPLE), ALL),
    ins("image_sample_l", E::Mimg, 36, f!(MIMG_SAMPLE), ALL),
    ins("image_sample_b", E::Mimg, 37, f!(MIMG_SAMPLE), ALL),
    ins("image_sample_lz", E::Mimg, 39, f!(MIMG_SAMPLE), ALL),
    ins("image_sample_c", E::Mimg, 40, f!(MIMG_SAMPLE), ALL),
    // ---- EXP -----------------------------------------------------------
    ins("exp", E::Exp, 0, f!(), ALL),
    // ---- FLAT ----------------------------------------------------------
    ins("flat_load_ubyte", E::Flat, 8, f!(), GCN11),
    ins("flat_load_ubyte", E::Flat, 16, f!(), GCN12),
    ins("flat_load_sbyte", E::Flat, 9, f!(), GCN11),
    ins("flat_load_sbyte", E::Flat, 17, f!(), GCN12),
    ins("flat_load_ushort", E::Flat, 10, f!(), GCN11),
    ins("flat_load_ushort", E::Flat, 18, f!(), GCN12),
    ins("flat_load_sshort", E::Flat, 11, f!(), GCN11),
    ins("flat_load_sshort", E::Flat, 19, f!(), GCN12),
    ins("flat_load_dword", E::Flat, 12, f!(), GCN11),
    ins("flat_load_dword", E::Flat, 20, f!(), GCN12),
    ins("flat_load_dwordx2", E::Flat, 13, f!(D2), GCN11),
    ins("flat_load_dwordx2", E::Flat, 21, f!(D2), GCN12),
    ins("flat_load_dwordx3", E::Flat, 15, f!(D3), GCN11),
    ins("flat_load_dwordx3", E::Flat, 22, f!(D3), GCN12),
    ins("flat_load_dwordx4", E::Flat, 14, f!(D4), GCN11),
    ins("flat_load_dwordx4", E::Flat, 23, f!(D4), GCN12),
    ins("flat_store_byte", E::Flat, 24, f!(STORE), GCN11_12),
    ins("flat_store_short", E::Flat, 26, f!(STORE), GCN11_12),
    ins("flat_store_dword", E::Flat, 28, f!(STORE), GCN11_12),
    ins("flat_store_dwordx2", E::Flat, 29, f!(STORE | D2), GCN11_12),
    ins("flat_store_dwordx3", E::Flat, 31, f!(STORE | D3), GCN11),
    ins("flat_store_dwordx3", E::Flat, 30, f!(STORE | D3), GCN12),
    ins("flat_store_dwordx4", E::Flat, 30, f!(STORE | D4), GCN11),
    ins("flat_store_dwordx4", E::Flat, 31, f!(STORE | D4), GCN12),
    ins("flat_atomic_swap", E::Flat, 48, f!(ATOMIC), GCN11),
    ins("flat_atomic_swap", E::Flat, 64, f!(ATOMIC), GCN12),
    ins("flat_atomic_cmpswap", E::Flat, 49, f!(ATOMIC | CMPSWAP), GCN11),
    ins("flat_atomic_cmpswap", E::Flat, 65, f!(ATOMIC | CMPSWAP), GCN12),
    ins("flat_atomic_add", E::Flat, 50, f!(ATOMIC), GCN11),
    ins("flat_atomic_add", E::Flat, 66, f!(ATOMIC), GCN12),
    ins("flat_atomic_sub", E::Flat, 51, f!(ATOMIC), GCN11),
    ins("flat_atomic_sub", E::Flat, 67, f!(ATOMIC), GCN12),
    ins("flat_atomic_and", E::Flat, 57, f!(ATOMIC), GCN11),
    ins("flat_atomic_and", E::Flat, 72, f!(ATOMIC), GCN12),
    ins("flat_atomic_or", E::Flat, 58, f!(ATOMIC), GCN11),
    ins("flat_atomic_or", E::Flat, 73, f!(ATOMIC), GCN12),
    ins("flat_atomic_inc", E::Flat, 60, f!(ATOMIC), GCN11),
    ins("flat_atomic_inc", E::Flat, 75, f!(ATOMIC), GCN12),
    ins("flat_atomic_dec", E::Flat, 61, f!(ATOMIC), GCN11),
    ins("flat_atomic_dec", E::Flat, 76, f!(ATOMIC), GCN12),
];

fn sorted_index() -> &'static [u32] {
    static INDEX: OnceLock<Vec<u32>> = OnceLock::new();
    INDEX.get_or_init(|| {
        let mut index: Vec<u32> = (0..GCN_INSTR_TABLE.len() as u32).collect();
        index.sort_by_key(|&i| GCN_INSTR_TABLE[i as usize].mnemonic);
        index
    })
}

/// Look a mnemonic up for the given architecture.
pub fn lookup(mnemonic: &str, arch: GpuArch) -> Result<&'static GcnInstruction, AsmError> {
    let index = sorted_index();
    let first = index.partition_point(|&i| GCN_INSTR_TABLE[i as usize].mnemonic < mnemonic);
    let mut found_any = false;
    for &i in &index[first..] {
        let row = &GCN_INSTR_TABLE[i as usize];
        if row.mnemonic != mnemonic {
            break;
        }
        found_any = true;
        if row.arch.intersects(arch) {
            return Ok(row);
        }
    }
    if found_any {
        Err(AsmError::UnsupportedOnArch {
            mnemonic: mnemonic.to_string(),
            arch: arch.name(),
        })
    } else {
        Err(AsmError::UnknownMnemonic(mnemonic.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_picks_the_arch_variant() {
        let si = lookup("s_mov_b32", GpuArch::GCN1_0).unwrap();
        assert_eq!(si.code, 3);
        let vi = lookup("s_mov_b32", GpuArch::GCN1_2).unwrap();
        assert_eq!(vi.code, 0);
    }

    #[test]
    fn smem_is_gated_by_arch() {
        let si = lookup("s_load_dword", GpuArch::GCN1_0).unwrap();
        assert_eq!(si.encoding, GcnEncoding::Smrd);
        let vi = lookup("s_load_dword", GpuArch::GCN1_2).unwrap();
        assert_eq!(vi.encoding, GcnEncoding::Smem);
        assert!(matches!(
            lookup("s_store_dword", GpuArch::GCN1_0),
            Err(AsmError::UnsupportedOnArch { .. })
        ));
    }

    #[test]
    fn unknown_mnemonic() {
        assert!(matches!(
            lookup("v_warp_drive", GpuArch::GCN1_0),
            Err(AsmError::UnknownMnemonic(_))
        ));
    }

    #[test]
    fn flat_needs_gcn11() {
        assert!(matches!(
            lookup("flat_load_dword", GpuArch::GCN1_0),
            Err(AsmError::UnsupportedOnArch { .. })
        ));
        assert!(lookup("flat_load_dword", GpuArch::GCN1_1).is_ok());
    }

    #[test]
    fn every_row_names_at_least_one_arch() {
        for row in GCN_INSTR_TABLE {
            assert!(!row.arch.is_empty(), "{} has empty arch mask", row.mnemonic);
        }
    }

    #[test]
    fn arch_variants_do_not_overlap() {
        use std::collections::HashMap;
        let mut seen: HashMap<&str, u8> = HashMap::new();
        for row in GCN_INSTR_TABLE {
            let mask = seen.entry(row.mnemonic).or_default();
            assert_eq!(
                *mask & row.arch.bits(),
                0,
                "{} has overlapping arch rows",
                row.mnemonic
            );
            *mask |= row.arch.bits();
        }
    }
}
