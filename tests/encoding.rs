//! Byte-level encoding expectations and the size/architecture properties.

use gcn_asm::{Assembler, GpuDeviceType};

fn assemble(device: GpuDeviceType, source: &str) -> Vec<u8> {
    let mut asm = Assembler::new(device);
    let good = asm.assemble(source);
    assert!(good, "unexpected diagnostics: {:#?}", asm.diagnostics());
    asm.sections()[0].content.clone()
}

fn assemble_err(device: GpuDeviceType, source: &str) -> Vec<String> {
    let mut asm = Assembler::new(device);
    assert!(!asm.assemble(source), "expected diagnostics");
    asm.diagnostics().iter().map(|d| d.message.clone()).collect()
}

fn words(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks(4)
        .map(|c| u32::from_le_bytes(c.try_into().unwrap()))
        .collect()
}

#[test]
fn sop1_words() {
    let code = assemble(GpuDeviceType::CapeVerde, "s_mov_b32 s23, s31\n");
    assert_eq!(words(&code), [0xbe97_031f]);
    let code = assemble(GpuDeviceType::CapeVerde, "s_mov_b64 s[24:25], s[42:43]\n");
    assert_eq!(words(&code), [0xbe98_042a]);
}

#[test]
fn sop2_word() {
    let code = assemble(GpuDeviceType::CapeVerde, "s_and_b32 s46, s21, s62\n");
    assert_eq!(words(&code), [0x872e_3e15]);
}

#[test]
fn sop1_inline_constants() {
    let code = assemble(GpuDeviceType::CapeVerde, "s_mov_b32 s0, 64\n");
    assert_eq!(words(&code), [0xbe80_03c0]);
    let code = assemble(GpuDeviceType::CapeVerde, "s_mov_b32 s0, -16\n");
    assert_eq!(words(&code), [0xbe80_03d0]);
}

#[test]
fn sop1_literal_appends_word() {
    let code = assemble(GpuDeviceType::CapeVerde, "s_mov_b32 s0, 0x12345678\n");
    assert_eq!(words(&code), [0xbe80_03ff, 0x1234_5678]);
}

#[test]
fn one_shared_literal_is_fine_two_distinct_are_not() {
    let code = assemble(GpuDeviceType::CapeVerde, "s_and_b32 s0, 0x1234, 0x1234\n");
    assert_eq!(words(&code), [0x8700_ffff, 0x0000_1234]);
    let messages = assemble_err(GpuDeviceType::CapeVerde, "s_and_b32 s0, 0x1234, 0x5678\n");
    assert!(messages.iter().any(|m| m.contains("one literal")));
}

#[test]
fn vop2_short_word() {
    let code = assemble(GpuDeviceType::CapeVerde, "v_sub_f32 v46, v42, v22\n");
    assert_eq!(words(&code), [0x085c_2d2a]);
}

#[test]
fn vop2_float_inline_constant() {
    let code = assemble(GpuDeviceType::CapeVerde, "v_add_f32 v0, 1.0, v1\n");
    assert_eq!(words(&code), [0x0600_02f2]);
}

#[test]
fn forcing_vop3_grows_the_instruction() {
    let short = assemble(GpuDeviceType::CapeVerde, "v_sub_f32 v46, v42, v22\n");
    assert_eq!(short.len(), 4);
    let long = assemble(GpuDeviceType::CapeVerde, "v_sub_f32 v46, v42, v22 vop3\n");
    assert_eq!(long.len(), 8);
    assert_eq!(words(&long), [0xd208_002e, 0x0002_2d2a]);
}

#[test]
fn madmk_carries_its_literal() {
    let code = assemble(GpuDeviceType::CapeVerde, "v_madmk_f32 v0, v1, 1.5, v2\n");
    assert_eq!(words(&code), [0x4000_0501, 0x3fc0_0000]);
}

#[test]
fn smrd_versus_smem_size_depends_on_gpu() {
    let si = assemble(GpuDeviceType::CapeVerde, "s_load_dword s5, s[2:3], 0x5b\n");
    assert_eq!(words(&si), [0xc002_835b]);
    let vi = assemble(GpuDeviceType::Fiji, "s_load_dword s5, s[2:3], 0x5b\n");
    assert_eq!(words(&vi), [0xc002_0141, 0x0000_005b]);
    // Same line, different `.gpu`, different sizes.
    assert_eq!(si.len(), 4);
    assert_eq!(vi.len(), 8);
}

#[test]
fn sopp_words() {
    let code = assemble(GpuDeviceType::CapeVerde, "s_endpgm\n");
    assert_eq!(words(&code), [0xbf81_0000]);
    let code = assemble(GpuDeviceType::CapeVerde, "s_waitcnt vmcnt(0)\n");
    assert_eq!(words(&code), [0xbf8c_0f70]);
    let code = assemble(GpuDeviceType::CapeVerde, "top:\ns_branch top\n");
    assert_eq!(words(&code), [0xbf82_ffff]);
}

#[test]
fn ds_words() {
    let code = assemble(GpuDeviceType::CapeVerde, "ds_write_b32 v1, v2 offset:16\n");
    assert_eq!(words(&code), [0xd834_0010, 0x0000_0201]);
}

#[test]
fn exp_words() {
    let code = assemble(
        GpuDeviceType::CapeVerde,
        "exp mrt0, v0, v1, v2, v3 done vm\n",
    );
    assert_eq!(words(&code), [0xf800_180f, 0x0302_0100]);
}

#[test]
fn sdwa_and_dpp_append_their_dword() {
    let code = assemble(GpuDeviceType::Fiji, "v_add_f32 v1, v2, v3 dst_sel:word1\n");
    assert_eq!(words(&code), [0x0202_06f9, 0x0606_0502]);
    let code = assemble(GpuDeviceType::Fiji, "v_add_f32 v1, v2, v3 quad_perm:[0,1,2,3]\n");
    assert_eq!(words(&code), [0x0202_06fa, 0xff00_e402]);
}

#[test]
fn offsets_accumulate_instruction_sizes() {
    let mut asm = Assembler::new(GpuDeviceType::CapeVerde);
    assert!(asm.assemble(
        "s_mov_b32 s0, s1\n\
         v_sub_f32 v0, v1, v2 vop3\n\
         .space 6\n\
         s_mov_b32 s2, 0x12345678\n\
         s_endpgm\n"
    ));
    let section = &asm.sections()[0];
    // 4 + 8 + 6 + 8 + 4 bytes.
    assert_eq!(section.content.len(), 30);
    let offsets: Vec<usize> = section.usage.entries().iter().map(|u| u.offset).collect();
    assert_eq!(offsets, [0, 0, 4, 4, 4, 18]);
}

// ---- error paths ------------------------------------------------------

mod errors {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("s_mov_b64 s[25:26], s[42:43]\n", "unaligned")]
    #[case("s_mov_b64 s[24:26], s[42:43]\n", "expected 2 registers")]
    #[case("s_mov_b32 s105, s0\n", "out of pool")]
    #[case("s_mov_b32 s0, s[4:3]\n", "inverted")]
    #[case("s_mov_b32 rax, s0\n", "expected scalar register")]
    fn register_diagnostics(#[case] source: &str, #[case] needle: &str) {
        let messages = assemble_err(GpuDeviceType::CapeVerde, source);
        assert!(
            messages.iter().any(|m| m.contains(needle)),
            "wanted `{needle}` in {messages:?}"
        );
    }

    #[test]
    fn gcn12_scalar_pool_is_smaller() {
        assert!(assemble(GpuDeviceType::CapeVerde, "s_mov_b32 s103, s0\n").len() == 4);
        let messages = assemble_err(GpuDeviceType::Fiji, "s_mov_b32 s102, s0\n");
        assert!(messages.iter().any(|m| m.contains("out of pool")));
    }

    #[test]
    fn vop3_refuses_literals() {
        let messages =
            assemble_err(GpuDeviceType::CapeVerde, "v_mad_f32 v0, v1, v2, 0x12345678\n");
        assert!(messages.iter().any(|m| m.contains("literal is not allowed")));
        // A literal together with a VOP3-forcing operand shape.
        let messages = assemble_err(GpuDeviceType::CapeVerde, "v_sub_f32 v0, 0x12345678, s1\n");
        assert!(messages.iter().any(|m| m.contains("literal is not allowed")));
    }

    #[test]
    fn sdwa_and_dpp_are_mutually_exclusive() {
        let messages = assemble_err(
            GpuDeviceType::Fiji,
            "v_add_f32 v1, v2, v3 dst_sel:byte0 row_mirror\n",
        );
        assert!(messages.iter().any(|m| m.contains("SDWA and DPP")));
    }

    #[test]
    fn sdwa_needs_gcn12() {
        let messages = assemble_err(
            GpuDeviceType::CapeVerde,
            "v_add_f32 v1, v2, v3 dst_sel:byte0\n",
        );
        assert!(messages.iter().any(|m| m.contains("not available")));
    }

    #[test]
    fn arch_gating_names_the_mnemonic() {
        let messages = assemble_err(GpuDeviceType::CapeVerde, "s_store_dword s0, s[2:3], 0\n");
        assert!(messages
            .iter()
            .any(|m| m.contains("s_store_dword") && m.contains("not supported")));
        let messages = assemble_err(GpuDeviceType::CapeVerde, "flat_load_dword v0, v[2:3]\n");
        assert!(messages.iter().any(|m| m.contains("flat_load_dword")));
    }

    #[test]
    fn inline_only_slot_rejects_plain_literals() {
        // MUBUF soffset accepts inline constants only.
        let messages = assemble_err(
            GpuDeviceType::CapeVerde,
            "buffer_load_dword v0, v1, s[4:7], 0x1234 offen\n",
        );
        assert!(messages.iter().any(|m| m.contains("literal is not allowed")));
    }

    #[test]
    fn bad_lines_emit_nothing() {
        let mut asm = Assembler::new(GpuDeviceType::CapeVerde);
        assert!(!asm.assemble("s_and_b32 s0, 0x1234, 0x5678\n"));
        assert!(asm.sections()[0].content.is_empty());
        assert!(asm.sections()[0].usage.is_empty());
    }
}
