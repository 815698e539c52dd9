use std::fs;
use std::path::Path;

use miette::{NamedSource, Result};

use crate::error;
use crate::runtime::MEMORY_SIZE;
use crate::span::Span;

/// A program image ready to be placed at address 0.
///
/// Source files are plain text. Every line starting with `0` or `1` holds one
/// byte as a binary literal, optionally followed by a `#` comment. All other
/// lines are ignored.
#[derive(Clone, Debug)]
pub struct Program {
    name: String,
    bytes: Vec<u8>,
}

impl Program {
    pub fn from_file(path: &Path) -> Result<Program> {
        let source = fs::read_to_string(path).map_err(|e| error::load_unreadable(path, e))?;
        Program::parse(path.display().to_string(), source)
    }

    pub fn parse(name: impl Into<String>, source: impl Into<String>) -> Result<Program> {
        let name = name.into();
        let source = source.into();
        let named = || NamedSource::new(name.clone(), source.clone());

        let mut literals = Vec::new();
        for line in source.lines() {
            if !line.starts_with(['0', '1']) {
                continue;
            }
            let literal = line.split('#').next().unwrap_or_default().trim();
            let span = Span::within(&source, literal);
            let byte = u8::from_str_radix(literal, 2)
                .map_err(|e| error::load_invalid_lit(span, named(), e))?;
            literals.push((span, byte));
        }

        if let Some((span, _)) = literals.get(MEMORY_SIZE) {
            return Err(error::load_too_long(*span, named(), literals.len()));
        }

        let bytes = literals.into_iter().map(|(_, byte)| byte).collect();
        Ok(Program { name, bytes })
    }

    pub fn from_bytes(bytes: &[u8]) -> Program {
        Program {
            name: String::from("<memory>"),
            bytes: bytes.to_vec(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
