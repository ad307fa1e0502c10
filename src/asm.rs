//! Minimal assembly driver.
//!
//! Just enough of the outer assembler to feed the encoder: a line loop,
//! labels, the `.gpu`/`.regvar`/`.space` directives and end-of-pass fixup
//! resolution. Macro expansion, general expressions and binary containers
//! live outside this crate.

use std::collections::HashMap;
use std::str::FromStr;

use tracing::debug;

use crate::arch::{ArchProps, GpuArch, GpuDeviceType};
use crate::encoder::{encode_instruction, EncodeCtx};
use crate::error::{AsmError, Diagnostic};
use crate::insn;
use crate::parser::Cursor;
use crate::regs::{RegKind, RegVarTable};
use crate::section::Section;

/// One-pass assembler over GCN source text.
pub struct Assembler {
    device: GpuDeviceType,
    arch: GpuArch,
    props: ArchProps,
    sections: Vec<Section>,
    regvars: RegVarTable,
    symbols: HashMap<String, u64>,
    diagnostics: Vec<Diagnostic>,
}

impl Assembler {
    /// Assembler targeting `device`.
    pub fn new(device: GpuDeviceType) -> Self {
        let arch = device.arch();
        Self {
            device,
            arch,
            props: ArchProps::of(arch),
            sections: vec![Section::new()],
            regvars: RegVarTable::new(),
            symbols: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Run the pass over `source`; true when no diagnostics were raised.
    ///
    /// Bytes and usage records land on [`Assembler::sections`]; forward
    /// references are patched at the end of the pass.
    pub fn assemble(&mut self, source: &str) -> bool {
        debug!(device = %self.device, "assembly pass");
        for (index, raw) in source.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or("");
            self.assemble_line(index + 1, line);
        }
        for section in &mut self.sections {
            for error in section.resolve_fixups(&self.symbols) {
                self.diagnostics.push(Diagnostic::new(0, 0, &error));
            }
        }
        self.diagnostics.is_empty()
    }

    /// Sections produced so far (one code section per pass).
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Mutable access, for downstream passes that rewind the usage log.
    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    /// Diagnostics collected during the pass.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Declared register variables.
    pub fn regvars(&self) -> &RegVarTable {
        &self.regvars
    }

    /// Current target device.
    pub fn device(&self) -> GpuDeviceType {
        self.device
    }

    fn section(&mut self) -> &mut Section {
        self.sections.last_mut().expect("one section always exists")
    }

    fn report(&mut self, line: usize, column: usize, error: &AsmError) {
        self.diagnostics.push(Diagnostic::new(line, column, error));
    }

    fn assemble_line(&mut self, line_no: usize, text: &str) {
        let mut cursor = Cursor::new(text);
        cursor.skip_spaces();
        if cursor.at_end() {
            return;
        }

        // Leading labels.
        loop {
            let save = cursor.pos();
            match cursor.parse_name() {
                Some(name) if cursor.peek() == Some(b':') && !name.starts_with('.') => {
                    cursor.bump();
                    let offset = self.section().offset() as u64;
                    self.symbols.insert(name.to_string(), offset);
                    cursor.skip_spaces();
                }
                _ => {
                    cursor.set_pos(save);
                    break;
                }
            }
        }
        cursor.skip_spaces();
        if cursor.at_end() {
            return;
        }

        if cursor.peek() == Some(b'.') {
            self.assemble_directive(line_no, &mut cursor);
            return;
        }

        let mnemonic_pos = cursor.pos();
        let Some(mnemonic) = cursor.parse_name() else {
            self.report(line_no, mnemonic_pos, &AsmError::ExpectedToken("instruction"));
            return;
        };
        let insn = match insn::lookup(mnemonic, self.arch) {
            Ok(insn) => insn,
            Err(e) => {
                self.report(line_no, mnemonic_pos, &e);
                return;
            }
        };
        let ctx = EncodeCtx {
            arch: self.arch,
            props: self.props,
            vars: &self.regvars,
        };
        let section = self.sections.last_mut().expect("one section always exists");
        if let Err(diags) = encode_instruction(&ctx, insn, &mut cursor, section) {
            for (column, error) in diags {
                self.diagnostics.push(Diagnostic::new(line_no, column, &error));
            }
        }
    }

    fn assemble_directive(&mut self, line_no: usize, cursor: &mut Cursor) {
        let pos = cursor.pos();
        let Some(name) = cursor.parse_name() else {
            self.report(line_no, pos, &AsmError::ExpectedToken("directive"));
            return;
        };
        match name {
            ".gpu" => {
                cursor.skip_spaces();
                let dev_pos = cursor.pos();
                let Some(dev_name) = cursor.parse_name() else {
                    self.report(line_no, dev_pos, &AsmError::ExpectedToken("device name"));
                    return;
                };
                match GpuDeviceType::from_str(dev_name) {
                    Ok(device) => {
                        self.device = device;
                        self.arch = device.arch();
                        self.props = ArchProps::of(self.arch);
                    }
                    Err(_) => {
                        let e = AsmError::UnknownDevice(dev_name.to_string());
                        self.report(line_no, dev_pos, &e);
                    }
                }
            }
            ".regvar" => self.parse_regvar(line_no, cursor),
            ".space" => {
                cursor.skip_spaces();
                let count_pos = cursor.pos();
                match cursor.parse_digits() {
                    Some(count) => self.section().emit_space(count as usize),
                    None => self.report(line_no, count_pos, &AsmError::ExpectedToken("size")),
                }
            }
            other => {
                let e = AsmError::UnknownMnemonic(other.to_string());
                self.report(line_no, pos, &e);
            }
        }
    }

    /// `.regvar name:s[:size], name2:v:8, ...`
    fn parse_regvar(&mut self, line_no: usize, cursor: &mut Cursor) {
        loop {
            cursor.skip_spaces();
            let name_pos = cursor.pos();
            let Some(name) = cursor.parse_name() else {
                self.report(line_no, name_pos, &AsmError::ExpectedToken("variable name"));
                return;
            };
            if !cursor.try_consume(b':') {
                self.report(line_no, cursor.pos(), &AsmError::ExpectedToken("`:` and type"));
                return;
            }
            cursor.skip_spaces();
            let kind_pos = cursor.pos();
            let kind = match cursor.parse_name() {
                Some("s") => RegKind::Scalar,
                Some("v") => RegKind::Vector,
                _ => {
                    self.report(line_no, kind_pos, &AsmError::ExpectedToken("`s` or `v`"));
                    return;
                }
            };
            let size = if cursor.try_consume(b':') {
                cursor.skip_spaces();
                match cursor.parse_digits() {
                    Some(n) if n >= 1 && n <= 256 => n as u16,
                    _ => {
                        self.report(line_no, cursor.pos(), &AsmError::ExpectedToken("size"));
                        return;
                    }
                }
            } else {
                1
            };
            let name = name.to_string();
            if let Err(e) = self.regvars.declare(&name, kind, size) {
                self.report(line_no, name_pos, &e);
            }
            if !cursor.try_consume(b',') {
                cursor.skip_spaces();
                if !cursor.at_end() {
                    self.report(line_no, cursor.pos(), &AsmError::GarbageAtEnd);
                }
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_comment_lines_emit_nothing() {
        let mut asm = Assembler::new(GpuDeviceType::CapeVerde);
        assert!(asm.assemble("# just a comment\n\n   \n"));
        assert!(asm.sections()[0].content.is_empty());
    }

    #[test]
    fn space_directive_advances_offsets() {
        let mut asm = Assembler::new(GpuDeviceType::CapeVerde);
        assert!(asm.assemble(".space 12\ns_mov_b32 s0, s1\n"));
        let section = &asm.sections()[0];
        assert_eq!(section.content.len(), 16);
        assert_eq!(section.usage.entries()[0].offset, 12);
    }

    #[test]
    fn regvar_declarations() {
        let mut asm = Assembler::new(GpuDeviceType::CapeVerde);
        assert!(asm.assemble(".regvar rax:s, rbx:v:8\n"));
        assert!(asm.regvars().lookup("rax").is_some());
        assert!(asm.regvars().lookup("rbx").is_some());
        let mut asm = Assembler::new(GpuDeviceType::CapeVerde);
        assert!(!asm.assemble(".regvar rax:s\n.regvar rax:s\n"));
    }

    #[test]
    fn gpu_directive_switches_arch() {
        let mut asm = Assembler::new(GpuDeviceType::CapeVerde);
        assert!(asm.assemble(".gpu Fiji\ns_load_dword s5, s[2:3], 0x5b\n"));
        assert_eq!(asm.sections()[0].content.len(), 8);
    }

    #[test]
    fn bad_instruction_emits_no_bytes() {
        let mut asm = Assembler::new(GpuDeviceType::CapeVerde);
        assert!(!asm.assemble("s_mov_b32 s0\ns_mov_b32 s1, s2\n"));
        // The bad line contributed nothing; the good one is still encoded.
        assert_eq!(asm.sections()[0].content.len(), 4);
        assert!(!asm.diagnostics().is_empty());
    }

    #[test]
    fn forward_branch_is_patched() {
        let mut asm = Assembler::new(GpuDeviceType::CapeVerde);
        assert!(asm.assemble("s_branch skip\ns_nop 0\nskip:\ns_endpgm\n"));
        let content = &asm.sections()[0].content;
        // (8 - (0 + 4)) / 4 = 1 word forward.
        assert_eq!(&content[0..4], &0xbf82_0001u32.to_le_bytes());
    }
}
