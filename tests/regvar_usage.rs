//! Register-usage log expectations, per encoding family.
//!
//! Each case assembles a small program and checks every usage entry:
//! offset, variable identity, register span, field tag, direction and
//! alignment.

use gcn_asm::{Assembler, GpuDeviceType, RegField, RwFlags};

const R: RwFlags = RwFlags::READ;
const W: RwFlags = RwFlags::WRITE;

struct ExpectedUsage {
    offset: usize,
    regvar: Option<&'static str>,
    rstart: u16,
    rend: u16,
    field: RegField,
    rw: RwFlags,
    align: u8,
}

macro_rules! usage {
    ($off:expr, $name:expr, $rs:expr, $re:expr, $field:ident, $rw:expr, $align:expr) => {
        ExpectedUsage {
            offset: $off,
            regvar: $name,
            rstart: $rs,
            rend: $re,
            field: RegField::$field,
            rw: $rw,
            align: $align,
        }
    };
}

fn check_usages(device: GpuDeviceType, source: &str, expected: &[ExpectedUsage]) {
    let mut asm = Assembler::new(device);
    let good = asm.assemble(source);
    assert!(good, "unexpected diagnostics: {:#?}", asm.diagnostics());
    let entries = asm.sections()[0].usage.entries().to_vec();
    assert_eq!(entries.len(), expected.len(), "usage entry count");
    for (i, (got, want)) in entries.iter().zip(expected).enumerate() {
        assert_eq!(got.offset, want.offset, "entry {i}: offset");
        let got_name = got.regvar.map(|id| asm.regvars().get(id).name.as_str());
        assert_eq!(got_name, want.regvar, "entry {i}: regvar");
        assert_eq!(got.rstart, want.rstart, "entry {i}: rstart");
        assert_eq!(got.rend, want.rend, "entry {i}: rend");
        assert_eq!(got.field, want.field, "entry {i}: field");
        assert_eq!(got.rw, want.rw, "entry {i}: rw");
        assert_eq!(got.align, want.align, "entry {i}: align");
    }
}

#[test]
fn sop1_with_space_directives() {
    check_usages(
        GpuDeviceType::CapeVerde,
        ".regvar rax:s, rbx:s\n\
         .regvar rax4:s:6, rbx5:s:8\n\
         s_mov_b32 rax,rbx\n\
         .space 12\n\
         s_mov_b32 rax4[2],rbx5[1]\n\
         .space 134\n\
         s_mov_b64 rax4[2:3],rbx5[1:2]\n",
        &[
            usage!(0, Some("rax"), 0, 1, SDst, W, 1),
            usage!(0, Some("rbx"), 0, 1, Ssrc0, R, 1),
            usage!(16, Some("rax4"), 2, 3, SDst, W, 1),
            usage!(16, Some("rbx5"), 1, 2, Ssrc0, R, 1),
            usage!(154, Some("rax4"), 2, 4, SDst, W, 2),
            usage!(154, Some("rbx5"), 1, 3, Ssrc0, R, 2),
        ],
    );
}

#[test]
fn sop1_forms() {
    check_usages(
        GpuDeviceType::CapeVerde,
        ".regvar rax:s, rbx:s\n\
         .regvar rax4:s:6, rbx5:s:8\n\
         s_mov_b32 rax,rbx\n\
         s_mov_b32 rax4[2],rbx5[1]\n\
         s_mov_b64 rax4[2:3],rbx5[1:2]\n\
         s_ff1_i32_b64 rbx, rbx5[1:2]\n\
         s_bitset0_b64 rbx5[3:4],rax\n\
         s_getpc_b64 rax4[0:1]\n\
         s_setpc_b64 rax4[2:3]\n\
         s_cbranch_join rax4[2]\n\
         s_movrels_b32 rax,rbx\n\
         s_mov_b32 s23,s31\n\
         s_mov_b64 s[24:25],s[42:43]\n",
        &[
            usage!(0, Some("rax"), 0, 1, SDst, W, 1),
            usage!(0, Some("rbx"), 0, 1, Ssrc0, R, 1),
            usage!(4, Some("rax4"), 2, 3, SDst, W, 1),
            usage!(4, Some("rbx5"), 1, 2, Ssrc0, R, 1),
            usage!(8, Some("rax4"), 2, 4, SDst, W, 2),
            usage!(8, Some("rbx5"), 1, 3, Ssrc0, R, 2),
            usage!(12, Some("rbx"), 0, 1, SDst, W, 1),
            usage!(12, Some("rbx5"), 1, 3, Ssrc0, R, 2),
            usage!(16, Some("rbx5"), 3, 5, SDst, W, 2),
            usage!(16, Some("rax"), 0, 1, Ssrc0, R, 1),
            usage!(20, Some("rax4"), 0, 2, SDst, W, 2),
            usage!(24, Some("rax4"), 2, 4, Ssrc0, R, 2),
            usage!(28, Some("rax4"), 2, 3, Ssrc0, R, 1),
            usage!(32, Some("rax"), 0, 1, SDst, W, 1),
            usage!(32, Some("rbx"), 0, 1, Ssrc0, R, 1),
            usage!(36, None, 23, 24, SDst, W, 0),
            usage!(36, None, 31, 32, Ssrc0, R, 0),
            usage!(40, None, 24, 26, SDst, W, 0),
            usage!(40, None, 42, 44, Ssrc0, R, 0),
        ],
    );
}

#[test]
fn sop2_forms() {
    check_usages(
        GpuDeviceType::CapeVerde,
        ".regvar rax:s, rbx:s, rdx:s\n\
         .regvar rax4:s:8, rbx5:s:8, rcx3:s:6\n\
         s_and_b32 rdx, rax, rbx\n\
         s_or_b32 rdx, s11, rbx\n\
         s_xor_b64 rcx3[4:5], rax4[0:1], rbx5[2:3]\n\
         s_cbranch_g_fork  rcx3[0:1], rax4[2:3]\n\
         s_and_b32 s46, s21, s62\n\
         s_xor_b64 s[26:27], s[38:39], s[12:13]\n",
        &[
            usage!(0, Some("rdx"), 0, 1, SDst, W, 1),
            usage!(0, Some("rax"), 0, 1, Ssrc0, R, 1),
            usage!(0, Some("rbx"), 0, 1, Ssrc1, R, 1),
            usage!(4, Some("rdx"), 0, 1, SDst, W, 1),
            usage!(4, None, 11, 12, Ssrc0, R, 0),
            usage!(4, Some("rbx"), 0, 1, Ssrc1, R, 1),
            usage!(8, Some("rcx3"), 4, 6, SDst, W, 2),
            usage!(8, Some("rax4"), 0, 2, Ssrc0, R, 2),
            usage!(8, Some("rbx5"), 2, 4, Ssrc1, R, 2),
            usage!(12, Some("rcx3"), 0, 2, Ssrc0, R, 2),
            usage!(12, Some("rax4"), 2, 4, Ssrc1, R, 2),
            usage!(16, None, 46, 47, SDst, W, 0),
            usage!(16, None, 21, 22, Ssrc0, R, 0),
            usage!(16, None, 62, 63, Ssrc1, R, 0),
            usage!(20, None, 26, 28, SDst, W, 0),
            usage!(20, None, 38, 40, Ssrc0, R, 0),
            usage!(20, None, 12, 14, Ssrc1, R, 0),
        ],
    );
}

#[test]
fn sopc_forms() {
    check_usages(
        GpuDeviceType::CapeVerde,
        ".regvar rax:s, rbx:s\n\
         .regvar rax4:s:4, rbx5:s:4\n\
         s_cmp_ge_i32  rax, rbx\n\
         s_bitcmp0_b64  rbx5[2:3], rax4[3]\n\
         s_setvskip  rax, rbx5[2]\n\
         s_cmp_ge_i32  s53, s9\n",
        &[
            usage!(0, Some("rax"), 0, 1, Ssrc0, R, 1),
            usage!(0, Some("rbx"), 0, 1, Ssrc1, R, 1),
            usage!(4, Some("rbx5"), 2, 4, Ssrc0, R, 2),
            usage!(4, Some("rax4"), 3, 4, Ssrc1, R, 1),
            usage!(8, Some("rax"), 0, 1, Ssrc0, R, 1),
            usage!(8, Some("rbx5"), 2, 3, Ssrc1, R, 1),
            usage!(12, None, 53, 54, Ssrc0, R, 0),
            usage!(12, None, 9, 10, Ssrc1, R, 0),
        ],
    );
}

#[test]
fn sopk_forms() {
    check_usages(
        GpuDeviceType::CapeVerde,
        ".regvar rax:s, rbx:s\n\
         .regvar rax4:s:4, rbx5:s:4\n\
         s_cmpk_eq_i32  rbx, 0xd3b9\n\
         s_addk_i32  rax, 0xd3b9\n\
         s_cbranch_i_fork rbx5[2:3], xxxx-8\nxxxx:\n\
         s_getreg_b32 rbx, hwreg(trapsts, 0, 1)\n\
         s_setreg_b32  hwreg(trapsts, 3, 10), rax\n\
         s_cmpk_eq_i32  s17, 0xd3b9\n",
        &[
            usage!(0, Some("rbx"), 0, 1, SDst, R, 1),
            usage!(4, Some("rax"), 0, 1, SDst, W, 1),
            usage!(8, Some("rbx5"), 2, 4, SDst, R, 2),
            usage!(12, Some("rbx"), 0, 1, SDst, W, 1),
            usage!(16, Some("rax"), 0, 1, SDst, R, 1),
            usage!(20, None, 17, 18, SDst, R, 0),
        ],
    );
}

#[test]
fn smrd_forms() {
    check_usages(
        GpuDeviceType::CapeVerde,
        ".regvar rax:s, rbx:s\n\
         .regvar rax4:s:20, rbx5:s:16\n\
         s_load_dword rbx, rbx5[2:3], 0x5b\n\
         s_load_dwordx2 rax4[0:1], rbx5[4:5], 0x5b\n\
         s_load_dwordx4 rax4[0:3], rbx5[6:7], 0x5b\n\
         s_load_dwordx8 rax4[0:7], rbx5[8:9], 0x5b\n\
         s_load_dwordx16 rax4[4:19], rbx5[10:11], 0x5b\n\
         s_load_dword rbx, rbx5[2:3], rbx5[6]\n\
         s_buffer_load_dwordx4 rax4[0:3], rbx5[8:11], 0x5b\n\
         s_memtime  rax4[2:3]\n\
         s_dcache_inv\n\
         s_load_dwordx2 s[28:29], s[36:37], 0x5b\n\
         s_buffer_load_dwordx4 s[44:47], s[12:15], 0x5b\n",
        &[
            usage!(0, Some("rbx"), 0, 1, SmrdSdst, W, 1),
            usage!(0, Some("rbx5"), 2, 4, SmrdSbase, R, 2),
            usage!(4, Some("rax4"), 0, 2, SmrdSdst, W, 2),
            usage!(4, Some("rbx5"), 4, 6, SmrdSbase, R, 2),
            usage!(8, Some("rax4"), 0, 4, SmrdSdst, W, 4),
            usage!(8, Some("rbx5"), 6, 8, SmrdSbase, R, 2),
            usage!(12, Some("rax4"), 0, 8, SmrdSdst, W, 4),
            usage!(12, Some("rbx5"), 8, 10, SmrdSbase, R, 2),
            usage!(16, Some("rax4"), 4, 20, SmrdSdst, W, 4),
            usage!(16, Some("rbx5"), 10, 12, SmrdSbase, R, 2),
            usage!(20, Some("rbx"), 0, 1, SmrdSdst, W, 1),
            usage!(20, Some("rbx5"), 2, 4, SmrdSbase, R, 2),
            usage!(20, Some("rbx5"), 6, 7, SmrdSoffset, R, 1),
            usage!(24, Some("rax4"), 0, 4, SmrdSdst, W, 4),
            usage!(24, Some("rbx5"), 8, 12, SmrdSbase, R, 4),
            usage!(28, Some("rax4"), 2, 4, SmrdSdst, W, 2),
            usage!(36, None, 28, 30, SmrdSdst, W, 0),
            usage!(36, None, 36, 38, SmrdSbase, R, 0),
            usage!(40, None, 44, 48, SmrdSdst, W, 0),
            usage!(40, None, 12, 16, SmrdSbase, R, 0),
        ],
    );
}

#[test]
fn smem_forms() {
    check_usages(
        GpuDeviceType::Fiji,
        ".regvar rax:s, rbx:s\n\
         .regvar rax4:s:20, rbx5:s:16\n\
         s_load_dword rbx, rbx5[2:3], 0x5b\n\
         s_load_dwordx2 rax4[0:1], rbx5[4:5], 0x5b\n\
         s_load_dwordx4 rax4[0:3], rbx5[6:7], 0x5b\n\
         s_load_dwordx8 rax4[0:7], rbx5[8:9], 0x5b\n\
         s_load_dwordx16 rax4[4:19], rbx5[10:11], 0x5b\n\
         s_load_dword rbx, rbx5[2:3], rbx5[6]\n\
         s_buffer_load_dwordx4 rax4[0:3], rbx5[8:11], 0x5b\n\
         s_memtime  rax4[2:3]\n\
         s_dcache_inv\n\
         s_store_dword rbx, rbx5[2:3], 0x5b\n\
         s_atc_probe  0x32, rax4[12:13], 0xfff5b\n\
         s_atc_probe_buffer  0x32, rax4[12:15], 0xfff5b\n\
         s_load_dwordx2 s[28:29], s[36:37], 0x5b\n\
         s_buffer_load_dwordx4 s[44:47], s[12:15], 0x5b\n",
        &[
            usage!(0, Some("rbx"), 0, 1, SmrdSdst, W, 1),
            usage!(0, Some("rbx5"), 2, 4, SmrdSbase, R, 2),
            usage!(8, Some("rax4"), 0, 2, SmrdSdst, W, 2),
            usage!(8, Some("rbx5"), 4, 6, SmrdSbase, R, 2),
            usage!(16, Some("rax4"), 0, 4, SmrdSdst, W, 4),
            usage!(16, Some("rbx5"), 6, 8, SmrdSbase, R, 2),
            usage!(24, Some("rax4"), 0, 8, SmrdSdst, W, 4),
            usage!(24, Some("rbx5"), 8, 10, SmrdSbase, R, 2),
            usage!(32, Some("rax4"), 4, 20, SmrdSdst, W, 4),
            usage!(32, Some("rbx5"), 10, 12, SmrdSbase, R, 2),
            usage!(40, Some("rbx"), 0, 1, SmrdSdst, W, 1),
            usage!(40, Some("rbx5"), 2, 4, SmrdSbase, R, 2),
            usage!(40, Some("rbx5"), 6, 7, SmrdSoffset, R, 1),
            usage!(48, Some("rax4"), 0, 4, SmrdSdst, W, 4),
            usage!(48, Some("rbx5"), 8, 12, SmrdSbase, R, 4),
            usage!(56, Some("rax4"), 2, 4, SmrdSdst, W, 2),
            usage!(72, Some("rbx"), 0, 1, SmrdSdst, R, 1),
            usage!(72, Some("rbx5"), 2, 4, SmrdSbase, R, 2),
            usage!(80, Some("rax4"), 12, 14, SmrdSbase, R, 2),
            usage!(88, Some("rax4"), 12, 16, SmrdSbase, R, 4),
            usage!(96, None, 28, 30, SmrdSdst, W, 0),
            usage!(96, None, 36, 38, SmrdSbase, R, 0),
            usage!(104, None, 44, 48, SmrdSdst, W, 0),
            usage!(104, None, 12, 16, SmrdSbase, R, 0),
        ],
    );
}

#[test]
fn vop2_forms() {
    check_usages(
        GpuDeviceType::CapeVerde,
        ".regvar rax:v, rbx:v, rex:v\n\
         .regvar rax2:v:8, rbx4:v:8, rex5:v:10\n\
         .regvar srex:s, srdx3:s:6, srbx:s\n\
         v_sub_f32  rex, rax, rbx\n\
         v_sub_f32  rex, srex, rbx\n\
         v_cndmask_b32 rex, rax, rbx, vcc\n\
         v_addc_u32  rex, vcc, rax, rbx, vcc\n\
         v_readlane_b32 srex, rax2[3], srdx3[4]\n\
         v_writelane_b32 rax, rax2[4], srdx3[3]\n\
         v_sub_f32  rex, rax, rbx vop3\n\
         v_readlane_b32 srex, rax2[3], srdx3[4] vop3\n\
         v_addc_u32  rex, srdx3[0:1], rax, rbx, srdx3[2:3]\n\
         v_sub_f32  rex, rax, srbx\n\
         v_sub_f32  v46, v42, v22\n\
         v_sub_f32  v46, s42, v22\n\
         v_addc_u32  v17, vcc, v53, v25, vcc\n\
         v_readlane_b32 s45, v37, s14\n\
         v_addc_u32  v67, s[4:5], v58, v13, s[18:19]\n\
         v_readlane_b32 s51, v26, s37 vop3\n",
        &[
            usage!(0, Some("rex"), 0, 1, VopVdst, W, 1),
            usage!(0, Some("rax"), 0, 1, VopSrc0, R, 1),
            usage!(0, Some("rbx"), 0, 1, VopVsrc1, R, 1),
            usage!(4, Some("rex"), 0, 1, VopVdst, W, 1),
            usage!(4, Some("srex"), 0, 1, VopSrc0, R, 1),
            usage!(4, Some("rbx"), 0, 1, VopVsrc1, R, 1),
            usage!(8, Some("rex"), 0, 1, VopVdst, W, 1),
            usage!(8, Some("rax"), 0, 1, VopSrc0, R, 1),
            usage!(8, Some("rbx"), 0, 1, VopVsrc1, R, 1),
            usage!(12, Some("rex"), 0, 1, VopVdst, W, 1),
            usage!(12, Some("rax"), 0, 1, VopSrc0, R, 1),
            usage!(12, Some("rbx"), 0, 1, VopVsrc1, R, 1),
            usage!(16, Some("srex"), 0, 1, VopSdst, W, 1),
            usage!(16, Some("rax2"), 3, 4, VopSrc0, R, 1),
            usage!(16, Some("srdx3"), 4, 5, VopSsrc1, R, 1),
            usage!(20, Some("rax"), 0, 1, VopVdst, W, 1),
            usage!(20, Some("rax2"), 4, 5, VopSrc0, R, 1),
            usage!(20, Some("srdx3"), 3, 4, VopSsrc1, R, 1),
            usage!(24, Some("rex"), 0, 1, Vop3Vdst, W, 1),
            usage!(24, Some("rax"), 0, 1, Vop3Src0, R, 1),
            usage!(24, Some("rbx"), 0, 1, Vop3Src1, R, 1),
            usage!(32, Some("srex"), 0, 1, Vop3Sdst0, W, 1),
            usage!(32, Some("rax2"), 3, 4, Vop3Src0, R, 1),
            usage!(32, Some("srdx3"), 4, 5, Vop3Src1, R, 1),
            usage!(40, Some("rex"), 0, 1, Vop3Vdst, W, 1),
            usage!(40, Some("srdx3"), 0, 2, Vop3Sdst1, W, 1),
            usage!(40, Some("rax"), 0, 1, Vop3Src0, R, 1),
            usage!(40, Some("rbx"), 0, 1, Vop3Src1, R, 1),
            usage!(40, Some("srdx3"), 2, 4, Vop3Ssrc, R, 1),
            usage!(48, Some("rex"), 0, 1, Vop3Vdst, W, 1),
            usage!(48, Some("rax"), 0, 1, Vop3Src0, R, 1),
            usage!(48, Some("srbx"), 0, 1, Vop3Src1, R, 1),
            usage!(56, None, 256 + 46, 256 + 47, VopVdst, W, 0),
            usage!(56, None, 256 + 42, 256 + 43, VopSrc0, R, 0),
            usage!(56, None, 256 + 22, 256 + 23, VopVsrc1, R, 0),
            usage!(60, None, 256 + 46, 256 + 47, VopVdst, W, 0),
            usage!(60, None, 42, 43, VopSrc0, R, 0),
            usage!(60, None, 256 + 22, 256 + 23, VopVsrc1, R, 0),
            usage!(64, None, 256 + 17, 256 + 18, VopVdst, W, 0),
            usage!(64, None, 256 + 53, 256 + 54, VopSrc0, R, 0),
            usage!(64, None, 256 + 25, 256 + 26, VopVsrc1, R, 0),
            usage!(68, None, 45, 46, VopSdst, W, 0),
            usage!(68, None, 256 + 37, 256 + 38, VopSrc0, R, 0),
            usage!(68, None, 14, 15, VopSsrc1, R, 0),
            usage!(72, None, 256 + 67, 256 + 68, Vop3Vdst, W, 0),
            usage!(72, None, 4, 6, Vop3Sdst1, W, 0),
            usage!(72, None, 256 + 58, 256 + 59, Vop3Src0, R, 0),
            usage!(72, None, 256 + 13, 256 + 14, Vop3Src1, R, 0),
            usage!(72, None, 18, 20, Vop3Ssrc, R, 0),
            usage!(80, None, 51, 52, Vop3Sdst0, W, 0),
            usage!(80, None, 256 + 26, 256 + 27, Vop3Src0, R, 0),
            usage!(80, None, 37, 38, Vop3Src1, R, 0),
        ],
    );
}

#[test]
fn vop1_forms() {
    check_usages(
        GpuDeviceType::CapeVerde,
        ".regvar rax:v, rbx:v, rex:v\n\
         .regvar rax2:v:8, rbx4:v:8, rex5:v:10\n\
         .regvar srex:s, srdx3:s:6, srbx:s\n\
         v_cvt_f32_i32 rex, rax\n\
         v_cvt_f32_i32 rex, srbx\n\
         v_rcp_f64 rax2[2:3], rbx4[5:6]\n\
         v_rcp_f64 rax2[2:3], srdx3[1:2]\n\
         v_readfirstlane_b32 srex, rbx\n\
         v_nop\n\
         v_cvt_i32_f64 rbx, rax2[3:4]\n\
         v_cvt_f32_i32 rex, rax vop3\n\
         v_cvt_f32_i32 rex, srbx vop3\n\
         v_rcp_f64 rax2[2:3], rbx4[5:6] vop3\n\
         v_rcp_f64 rax2[2:3], srdx3[1:2] vop3\n\
         v_readfirstlane_b32 srex, rbx vop3\n\
         v_cvt_f32_i32 v43, v147\n\
         v_cvt_f32_i32 v51, s19\n\
         v_rcp_f64 v[72:73], v[27:28]\n\
         v_rcp_f64 v[72:73], s[27:28]\n\
         v_readfirstlane_b32 s35, v91\n\
         v_rcp_f64 v[55:56], v[87:88] vop3\n\
         v_cvt_f32_i32 v43, v147 vop3\n",
        &[
            usage!(0, Some("rex"), 0, 1, VopVdst, W, 1),
            usage!(0, Some("rax"), 0, 1, VopSrc0, R, 1),
            usage!(4, Some("rex"), 0, 1, VopVdst, W, 1),
            usage!(4, Some("srbx"), 0, 1, VopSrc0, R, 1),
            usage!(8, Some("rax2"), 2, 4, VopVdst, W, 1),
            usage!(8, Some("rbx4"), 5, 7, VopSrc0, R, 1),
            usage!(12, Some("rax2"), 2, 4, VopVdst, W, 1),
            usage!(12, Some("srdx3"), 1, 3, VopSrc0, R, 1),
            usage!(16, Some("srex"), 0, 1, VopSdst, W, 1),
            usage!(16, Some("rbx"), 0, 1, VopSrc0, R, 1),
            usage!(24, Some("rbx"), 0, 1, VopVdst, W, 1),
            usage!(24, Some("rax2"), 3, 5, VopSrc0, R, 1),
            usage!(28, Some("rex"), 0, 1, Vop3Vdst, W, 1),
            usage!(28, Some("rax"), 0, 1, Vop3Src0, R, 1),
            usage!(36, Some("rex"), 0, 1, Vop3Vdst, W, 1),
            usage!(36, Some("srbx"), 0, 1, Vop3Src0, R, 1),
            usage!(44, Some("rax2"), 2, 4, Vop3Vdst, W, 1),
            usage!(44, Some("rbx4"), 5, 7, Vop3Src0, R, 1),
            usage!(52, Some("rax2"), 2, 4, Vop3Vdst, W, 1),
            usage!(52, Some("srdx3"), 1, 3, Vop3Src0, R, 1),
            usage!(60, Some("srex"), 0, 1, Vop3Sdst0, W, 1),
            usage!(60, Some("rbx"), 0, 1, Vop3Src0, R, 1),
            usage!(68, None, 256 + 43, 256 + 44, VopVdst, W, 0),
            usage!(68, None, 256 + 147, 256 + 148, VopSrc0, R, 0),
            usage!(72, None, 256 + 51, 256 + 52, VopVdst, W, 0),
            usage!(72, None, 19, 20, VopSrc0, R, 0),
            usage!(76, None, 256 + 72, 256 + 74, VopVdst, W, 0),
            usage!(76, None, 256 + 27, 256 + 29, VopSrc0, R, 0),
            usage!(80, None, 256 + 72, 256 + 74, VopVdst, W, 0),
            usage!(80, None, 27, 29, VopSrc0, R, 0),
            usage!(84, None, 35, 36, VopSdst, W, 0),
            usage!(84, None, 256 + 91, 256 + 92, VopSrc0, R, 0),
            usage!(88, None, 256 + 55, 256 + 57, Vop3Vdst, W, 0),
            usage!(88, None, 256 + 87, 256 + 89, Vop3Src0, R, 0),
            usage!(96, None, 256 + 43, 256 + 44, Vop3Vdst, W, 0),
            usage!(96, None, 256 + 147, 256 + 148, Vop3Src0, R, 0),
        ],
    );
}

#[test]
fn vopc_forms() {
    check_usages(
        GpuDeviceType::CapeVerde,
        ".regvar rax:v, rbx:v, rex:v\n\
         .regvar rax2:v:8, rbx4:v:8, rex5:v:10\n\
         .regvar srex:s, srdx3:s:6, srbx:s\n\
         v_cmp_gt_u32 vcc, rbx, rex\n\
         v_cmp_gt_u64 vcc, rax2[3:4], rbx4[6:7]\n\
         v_cmp_gt_u32 vcc, srbx, rex\n\
         v_cmp_gt_u32 srdx3[2:3], rbx, rex\n\
         v_cmp_gt_u32 vcc, rbx, srbx\n\
         v_cmp_gt_u64 vcc, srdx3[3:4], rbx4[6:7]\n\
         v_cmp_gt_u32 vcc, v72, v41\n\
         v_cmp_gt_u64 vcc, v[65:66], v[29:30]\n\
         v_cmp_gt_u64 s[46:47], v[65:66], v[29:30]\n\
         v_cmp_gt_u32 vcc, v72, s41\n",
        &[
            usage!(0, Some("rbx"), 0, 1, VopSrc0, R, 1),
            usage!(0, Some("rex"), 0, 1, VopVsrc1, R, 1),
            usage!(4, Some("rax2"), 3, 5, VopSrc0, R, 1),
            usage!(4, Some("rbx4"), 6, 8, VopVsrc1, R, 1),
            usage!(8, Some("srbx"), 0, 1, VopSrc0, R, 1),
            usage!(8, Some("rex"), 0, 1, VopVsrc1, R, 1),
            usage!(12, Some("srdx3"), 2, 4, Vop3Sdst0, W, 1),
            usage!(12, Some("rbx"), 0, 1, Vop3Src0, R, 1),
            usage!(12, Some("rex"), 0, 1, Vop3Src1, R, 1),
            usage!(20, Some("rbx"), 0, 1, Vop3Src0, R, 1),
            usage!(20, Some("srbx"), 0, 1, Vop3Src1, R, 1),
            usage!(28, Some("srdx3"), 3, 5, VopSrc0, R, 1),
            usage!(28, Some("rbx4"), 6, 8, VopVsrc1, R, 1),
            usage!(32, None, 256 + 72, 256 + 73, VopSrc0, R, 0),
            usage!(32, None, 256 + 41, 256 + 42, VopVsrc1, R, 0),
            usage!(36, None, 256 + 65, 256 + 67, VopSrc0, R, 0),
            usage!(36, None, 256 + 29, 256 + 31, VopVsrc1, R, 0),
            usage!(40, None, 46, 48, Vop3Sdst0, W, 0),
            usage!(40, None, 256 + 65, 256 + 67, Vop3Src0, R, 0),
            usage!(40, None, 256 + 29, 256 + 31, Vop3Src1, R, 0),
            usage!(48, None, 256 + 72, 256 + 73, Vop3Src0, R, 0),
            usage!(48, None, 41, 42, Vop3Src1, R, 0),
        ],
    );
}

#[test]
fn ds_and_flat_usage() {
    check_usages(
        GpuDeviceType::Fiji,
        ".regvar addr:v, val:v, val2:v:2, res:v, sum:v:2\n\
         ds_write_b32 addr, val offset:16\n\
         ds_read_b32 res, addr\n\
         ds_write2_b32 addr, val, res offset0:4 offset1:8\n\
         ds_read_b64 sum[0:1], addr\n\
         flat_load_dword res, val2[0:1]\n\
         flat_store_dword val2[0:1], val glc\n",
        &[
            usage!(0, Some("addr"), 0, 1, DsAddr, R, 1),
            usage!(0, Some("val"), 0, 1, DsData0, R, 1),
            usage!(8, Some("res"), 0, 1, DsVdst, W, 1),
            usage!(8, Some("addr"), 0, 1, DsAddr, R, 1),
            usage!(16, Some("addr"), 0, 1, DsAddr, R, 1),
            usage!(16, Some("val"), 0, 1, DsData0, R, 1),
            usage!(16, Some("res"), 0, 1, DsData1, R, 1),
            usage!(24, Some("sum"), 0, 2, DsVdst, W, 1),
            usage!(24, Some("addr"), 0, 1, DsAddr, R, 1),
            usage!(32, Some("res"), 0, 1, FlatVdst, W, 1),
            usage!(32, Some("val2"), 0, 2, FlatAddr, R, 1),
            usage!(40, Some("val2"), 0, 2, FlatAddr, R, 1),
            usage!(40, Some("val"), 0, 1, FlatData, R, 1),
        ],
    );
}

#[test]
fn buffer_and_image_usage() {
    check_usages(
        GpuDeviceType::CapeVerde,
        ".regvar data:v:4, addr:v, rsrc:s:4, samp:s:4, soff:s, img:s:8\n\
         buffer_load_dword data[0], addr, rsrc[0:3], soff offen\n\
         buffer_store_dwordx2 data[0:1], addr, rsrc[0:3], 0 idxen\n\
         image_sample data[0:3], addr, img[0:7], samp[0:3] dmask:15\n",
        &[
            usage!(0, Some("data"), 0, 1, MubufVdata, W, 1),
            usage!(0, Some("addr"), 0, 1, MubufVaddr, R, 1),
            usage!(0, Some("rsrc"), 0, 4, MubufSrsrc, R, 4),
            usage!(0, Some("soff"), 0, 1, MubufSoffset, R, 1),
            usage!(8, Some("data"), 0, 2, MubufVdata, R, 1),
            usage!(8, Some("addr"), 0, 1, MubufVaddr, R, 1),
            usage!(8, Some("rsrc"), 0, 4, MubufSrsrc, R, 4),
            usage!(16, Some("data"), 0, 4, MimgVdata, W, 1),
            usage!(16, Some("addr"), 0, 1, MimgVaddr, R, 1),
            usage!(16, Some("img"), 0, 8, MimgSrsrc, R, 4),
            usage!(16, Some("samp"), 0, 4, MimgSsamp, R, 4),
        ],
    );
}

#[test]
fn usage_log_is_ordered_and_rewindable() {
    let mut asm = Assembler::new(GpuDeviceType::CapeVerde);
    assert!(asm.assemble(
        ".regvar a:s, b:s\n\
         s_mov_b32 a, b\n\
         s_and_b32 a, a, b\n\
         v_sub_f32 v1, v2, v3\n"
    ));
    let section = &mut asm.sections_mut()[0];
    let offsets: Vec<usize> = section.usage.entries().iter().map(|u| u.offset).collect();
    let mut sorted = offsets.clone();
    sorted.sort_unstable();
    assert_eq!(offsets, sorted);

    section.usage.rewind();
    let mut count = 0;
    while section.usage.next_usage().is_some() {
        count += 1;
    }
    assert_eq!(count, offsets.len());
}
