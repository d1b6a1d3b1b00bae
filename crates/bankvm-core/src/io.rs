//! Print sinks
//!
//! Destination for the text produced by `PRINT`, `PRINT_TOP` and
//! `PRINT_STR_LITERAL`. The engine hands each printed value over as one
//! line; the sink decides where it goes.

/// Receives printed output from a running VM.
pub trait PrintWriter {
    /// Called once per print instruction with the formatted text,
    /// without a trailing newline.
    fn write_line(&mut self, line: &str);
}

/// Default `PrintWriter` that writes to stdout.
#[derive(Debug, Default)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn write_line(&mut self, line: &str) {
        println!("{line}");
    }
}

/// A `PrintWriter` that collects all output into a string, one line per print.
#[derive(Debug, Default)]
pub struct CollectStringPrint(String);

impl CollectStringPrint {
    #[must_use]
    pub fn new() -> Self {
        Self(String::new())
    }

    /// Collected output
    #[must_use]
    pub fn output(&self) -> &str {
        self.0.as_str()
    }

    /// Collected output split into printed lines
    pub fn lines(&self) -> Vec<&str> {
        self.0.lines().collect()
    }

    #[must_use]
    pub fn into_output(self) -> String {
        self.0
    }
}

impl PrintWriter for CollectStringPrint {
    fn write_line(&mut self, line: &str) {
        self.0.push_str(line);
        self.0.push('\n');
    }
}

/// `PrintWriter` that discards everything.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintWriter for NoPrint {
    fn write_line(&mut self, _line: &str) {}
}
