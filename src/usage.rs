//! Register-usage records.
//!
//! Every encoded instruction appends one entry per register operand, keyed
//! by the encoding field the range landed in. The log is append-only and
//! ordered by section offset by construction; the allocation/liveness pass
//! downstream rewinds and walks it sequentially.

use bitflags::bitflags;

use crate::regs::RegVarId;

/// Encoding field a register range was placed into.
///
/// Tags follow the concrete form chosen for the instruction: the same
/// source promoted from VOP2 to VOP3 moves from `VopSrc0` to `Vop3Src0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum RegField {
    /// Scalar destination of SOP1/SOP2/SOPK.
    SDst,
    /// First scalar source.
    Ssrc0,
    /// Second scalar source.
    Ssrc1,
    /// Scalar-memory destination (data on stores).
    SmrdSdst,
    /// Scalar-memory base pair/quad.
    SmrdSbase,
    /// Scalar-memory register offset.
    SmrdSoffset,
    /// VOP1/VOP2 vector destination.
    VopVdst,
    /// VOP2 scalar destination (`v_readlane_b32`).
    VopSdst,
    /// VOP1/VOP2/VOPC source 0.
    VopSrc0,
    /// VOP2/VOPC vector source 1.
    VopVsrc1,
    /// VOP2 scalar source 1 (lane selects).
    VopSsrc1,
    /// VOP3 vector destination.
    Vop3Vdst,
    /// VOP3 scalar destination (VOPC/readlane promoted).
    Vop3Sdst0,
    /// VOP3b second (carry) destination.
    Vop3Sdst1,
    /// VOP3 source 0.
    Vop3Src0,
    /// VOP3 source 1.
    Vop3Src1,
    /// VOP3 source 2.
    Vop3Src2,
    /// VOP3 scalar carry-in source.
    Vop3Ssrc,
    /// VINTRP destination.
    VintrpVdst,
    /// VINTRP vector source.
    VintrpVsrc,
    /// DS address register.
    DsAddr,
    /// DS first data operand.
    DsData0,
    /// DS second data operand.
    DsData1,
    /// DS destination.
    DsVdst,
    /// MUBUF/MTBUF address register(s).
    MubufVaddr,
    /// MUBUF/MTBUF data register(s).
    MubufVdata,
    /// MUBUF/MTBUF resource quad.
    MubufSrsrc,
    /// MUBUF/MTBUF scalar offset.
    MubufSoffset,
    /// MIMG address registers.
    MimgVaddr,
    /// MIMG data registers.
    MimgVdata,
    /// MIMG resource (4 or 8 registers).
    MimgSrsrc,
    /// MIMG sampler quad.
    MimgSsamp,
    /// EXP source 0.
    ExpVsrc0,
    /// EXP source 1.
    ExpVsrc1,
    /// EXP source 2.
    ExpVsrc2,
    /// EXP source 3.
    ExpVsrc3,
    /// FLAT address pair.
    FlatAddr,
    /// FLAT store data.
    FlatData,
    /// FLAT destination.
    FlatVdst,
}

bitflags! {
    /// Access direction of a usage entry.
    pub struct RwFlags: u8 {
        /// The field is read.
        const READ = 1;
        /// The field is written.
        const WRITE = 2;
    }
}

/// One register-usage entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegVarUsage {
    /// Section-relative offset of the instruction.
    pub offset: usize,
    /// Register variable, `None` for physical references.
    pub regvar: Option<RegVarId>,
    /// First register (variable-relative, or operand-encoding index).
    pub rstart: u16,
    /// One past the last register.
    pub rend: u16,
    /// Encoding field the range landed in.
    pub field: RegField,
    /// Access direction.
    pub rw: RwFlags,
    /// Allocation alignment the slot demands; 0 for physical references.
    pub align: u8,
}

/// Per-section append-only usage log.
#[derive(Debug, Default)]
pub struct UsageHandler {
    entries: Vec<RegVarUsage>,
    read_pos: usize,
}

impl UsageHandler {
    /// Fresh, empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Offsets must be non-decreasing, which holds by
    /// construction because instructions are encoded in source order.
    pub fn push(&mut self, usage: RegVarUsage) {
        debug_assert!(self
            .entries
            .last()
            .map_or(true, |last| last.offset <= usage.offset));
        self.entries.push(usage);
    }

    /// Restart sequential reading.
    pub fn rewind(&mut self) {
        self.read_pos = 0;
    }

    /// More entries remain after the read cursor.
    pub fn has_next(&self) -> bool {
        self.read_pos < self.entries.len()
    }

    /// Next entry in offset order.
    pub fn next_usage(&mut self) -> Option<RegVarUsage> {
        let entry = self.entries.get(self.read_pos).copied();
        if entry.is_some() {
            self.read_pos += 1;
        }
        entry
    }

    /// All entries, in offset order.
    pub fn entries(&self) -> &[RegVarUsage] {
        &self.entries
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
