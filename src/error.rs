use std::num::ParseIntError;
use std::path::Path;

use miette::{miette, LabeledSpan, NamedSource, Report, Severity};

use crate::span::Span;

// Loader errors

pub fn load_unreadable(path: &Path, e: std::io::Error) -> Report {
    miette!(
        severity = Severity::Error,
        code = "load::unreadable",
        help = "check that the path exists and points to a readable `.ls8` file",
        "Attempted to load an invalid file `{}`: {e}",
        path.display(),
    )
}

pub fn load_invalid_lit(span: Span, src: NamedSource<String>, e: ParseIntError) -> Report {
    miette!(
        severity = Severity::Error,
        code = "load::bad_lit",
        help = "each byte is written as up to eight binary digits, e.g. 10000010",
        labels = vec![LabeledSpan::at(span, "incorrect literal")],
        "Encountered an invalid binary literal: {e}",
    )
    .with_source_code(src)
}

pub fn load_too_long(span: Span, src: NamedSource<String>, len: usize) -> Report {
    miette!(
        severity = Severity::Error,
        code = "load::too_long",
        help = "the LS-8 address space holds 256 bytes",
        labels = vec![LabeledSpan::at(span, "does not fit in memory")],
        "Program is {len} bytes long and cannot fit in memory",
    )
    .with_source_code(src)
}
