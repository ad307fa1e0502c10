//! GPU device and architecture-family tables.
//!
//! Every encoding decision that varies across hardware generations is driven
//! from here: the instruction table is gated by [`GpuArch`] masks, and the
//! per-family [`ArchProps`] record carries the constants the operand parsers
//! and dispatchers consult (scalar-pool ceiling, SMEM vs SMRD, SDWA/DPP,
//! 16-bit inline constants).

use bitflags::bitflags;

bitflags! {
    /// Architecture-family mask, one bit per GCN generation.
    pub struct GpuArch: u8 {
        /// GCN 1.0, Southern Islands (Tahiti, Cape Verde, ...).
        const GCN1_0 = 1;
        /// GCN 1.1, Sea Islands (Bonaire, Hawaii, ...).
        const GCN1_1 = 2;
        /// GCN 1.2, Volcanic Islands (Tonga, Fiji, ...).
        const GCN1_2 = 4;
    }
}

impl GpuArch {
    /// Human name used by diagnostics.
    pub fn name(self) -> &'static str {
        if self.contains(GpuArch::GCN1_2) {
            "GCN 1.2"
        } else if self.contains(GpuArch::GCN1_1) {
            "GCN 1.1"
        } else {
            "GCN 1.0"
        }
    }
}

/// Concrete GPU device accepted by the `.gpu` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::EnumIter, strum::Display)]
#[strum(ascii_case_insensitive)]
pub enum GpuDeviceType {
    CapeVerde,
    Pitcairn,
    Tahiti,
    Oland,
    Hainan,
    Bonaire,
    Spectre,
    Spooky,
    Kalindi,
    Hawaii,
    Mullins,
    Iceland,
    Tonga,
    Carrizo,
    Fiji,
    Stoney,
}

impl GpuDeviceType {
    /// Architecture family of the device.
    pub fn arch(self) -> GpuArch {
        use GpuDeviceType::*;
        match self {
            CapeVerde | Pitcairn | Tahiti | Oland | Hainan => GpuArch::GCN1_0,
            Bonaire | Spectre | Spooky | Kalindi | Hawaii | Mullins => GpuArch::GCN1_1,
            Iceland | Tonga | Carrizo | Fiji | Stoney => GpuArch::GCN1_2,
        }
    }
}

/// Architecture constants consulted on every dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchProps {
    /// Number of addressable SGPRs; the highest legal index is one less.
    pub max_sgprs: u16,
    /// Scalar memory uses the 8-byte SMEM encoding instead of SMRD.
    pub has_smem: bool,
    /// SDWA and DPP vector-ALU extensions exist.
    pub has_sdwa_dpp: bool,
    /// The inline-constant set includes 16-bit float forms and 1/(2*pi).
    pub has_f16_consts: bool,
    /// FLAT memory instructions exist.
    pub has_flat: bool,
    /// Source-operand index of `flat_scratch_lo`, `None` when absent.
    pub flat_scratch: Option<u16>,
    /// Source-operand index of `xnack_mask_lo`, `None` when absent.
    pub xnack_mask: Option<u16>,
}

impl ArchProps {
    /// Properties of an architecture family.
    pub fn of(arch: GpuArch) -> Self {
        if arch.contains(GpuArch::GCN1_2) {
            // flat_scratch moved down to 102, taking two SGPR slots.
            ArchProps {
                max_sgprs: 102,
                has_smem: true,
                has_sdwa_dpp: true,
                has_f16_consts: true,
                has_flat: true,
                flat_scratch: Some(102),
                xnack_mask: Some(104),
            }
        } else if arch.contains(GpuArch::GCN1_1) {
            ArchProps {
                max_sgprs: 104,
                has_smem: false,
                has_sdwa_dpp: false,
                has_f16_consts: false,
                has_flat: true,
                flat_scratch: Some(104),
                xnack_mask: None,
            }
        } else {
            ArchProps {
                max_sgprs: 104,
                has_smem: false,
                has_sdwa_dpp: false,
                has_f16_consts: false,
                has_flat: false,
                flat_scratch: None,
                xnack_mask: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn device_names_parse_case_insensitively() {
        assert_eq!(GpuDeviceType::from_str("fiji").unwrap(), GpuDeviceType::Fiji);
        assert_eq!(
            GpuDeviceType::from_str("CAPEVERDE").unwrap(),
            GpuDeviceType::CapeVerde
        );
        assert!(GpuDeviceType::from_str("navi").is_err());
    }

    #[test]
    fn every_device_maps_to_one_family() {
        for dev in GpuDeviceType::iter() {
            assert_eq!(dev.arch().bits().count_ones(), 1);
        }
    }

    #[test]
    fn scalar_pool_shrinks_on_gcn12() {
        assert_eq!(ArchProps::of(GpuArch::GCN1_0).max_sgprs, 104);
        assert_eq!(ArchProps::of(GpuArch::GCN1_1).max_sgprs, 104);
        assert_eq!(ArchProps::of(GpuArch::GCN1_2).max_sgprs, 102);
    }

    #[test]
    fn smem_arrives_with_gcn12() {
        assert!(!ArchProps::of(GpuArch::GCN1_0).has_smem);
        assert!(ArchProps::of(GpuArch::GCN1_2).has_smem);
    }
}
