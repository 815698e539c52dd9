use std::io::{stdout, Write};

use colored::Colorize;

/// Receives everything the machine writes while running.
pub trait Console {
    /// Output of `PRN`.
    fn print_value(&mut self, value: u8);
    /// One line of execution trace, without trailing newline.
    fn trace(&mut self, line: &str);
}

/// Writes program output to stdout and trace lines to stderr.
#[derive(Clone, Copy, Debug, Default)]
pub struct Terminal {
    minimal: bool,
}

impl Terminal {
    pub fn new(minimal: bool) -> Self {
        Terminal { minimal }
    }
}

impl Console for Terminal {
    fn print_value(&mut self, value: u8) {
        let mut out = stdout().lock();
        // Broken pipe is not the machine's problem
        let _ = writeln!(out, "{value}");
    }

    fn trace(&mut self, line: &str) {
        if self.minimal {
            eprintln!("{line}");
        } else {
            eprintln!("{}", line.blue());
        }
    }
}

/// Keeps output in memory, for embedding the machine or inspecting it in tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Capture {
    pub values: Vec<u8>,
    pub traces: Vec<String>,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Printed values as they would appear on a terminal.
    pub fn text(&self) -> String {
        self.values.iter().map(|v| format!("{v}\n")).collect()
    }
}

impl Console for Capture {
    fn print_value(&mut self, value: u8) {
        self.values.push(value);
    }

    fn trace(&mut self, line: &str) {
        self.traces.push(line.to_string());
    }
}

impl<C: Console + ?Sized> Console for &mut C {
    fn print_value(&mut self, value: u8) {
        (**self).print_value(value)
    }

    fn trace(&mut self, line: &str) {
        (**self).trace(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_text() {
        let mut capture = Capture::new();
        capture.print_value(72);
        capture.print_value(0);
        capture.trace("TRACE: 00");
        assert_eq!(capture.text(), "72\n0\n");
        assert_eq!(capture.traces, ["TRACE: 00"]);
    }

    #[test]
    fn forwards_through_reference() {
        fn emit(mut console: impl Console) {
            console.print_value(255);
        }
        let mut capture = Capture::new();
        emit(&mut capture);
        assert_eq!(capture.values, [255]);
    }
}
