use miette::SourceSpan;

/// Position relative to start of source.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Idx(pub u32);

/// Holds a view into a program source.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash, Debug)]
pub struct Span {
    start: Idx,
    len: u16,
}

impl Span {
    pub fn new(start: Idx, len: u16) -> Self {
        Span { start, len }
    }

    /// Span covering `text`, which must be a subslice of `source`.
    pub fn within(source: &str, text: &str) -> Self {
        let start = text.as_ptr() as usize - source.as_ptr() as usize;
        debug_assert!(start + text.len() <= source.len());
        Span::new(Idx(start as u32), text.len() as u16)
    }

    pub fn as_range(&self) -> std::ops::Range<usize> {
        let start = self.start.0 as usize;
        let end = start + self.len as usize;
        start..end
    }
}

impl From<Span> for SourceSpan {
    fn from(value: Span) -> Self {
        let range = value.as_range();
        SourceSpan::new(range.start.into(), range.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_within_source() {
        let source = "10000010 # LDI\n00000000\n";
        let line = source.lines().nth(1).unwrap();
        let span = Span::within(source, line);
        assert_eq!(span.as_range(), 15..23);
        assert_eq!(&source[span.as_range()], "00000000");
    }
}
