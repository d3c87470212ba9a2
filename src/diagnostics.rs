//! Accumulates warnings/errors keyed by a source span and formats them on flush.
//!
//! Unlike the source this crate is grounded on, there is no process-wide
//! singleton here and no installed `atexit`/`SIGINT` teardown hook — those only
//! make sense for an out-of-scope CLI driver. A [`Log`] is an ordinary value the
//! embedder owns and threads through the lexer/parser; flushing is an explicit
//! call.

use bon::Builder;

/// A half-open `[begin, end)` range into the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(begin: usize, end: usize) -> Self {
        Span { begin, end }
    }

    pub const fn len(&self) -> usize {
        self.end - self.begin
    }

    pub const fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

/// The kind of a logged record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Error,
}

/// A single, fully-formatted diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub severity: Severity,
    pub span: Span,
    /// The pre-rendered three-line record: `"[b:e] <kind>: <message>\n\t<source>\n\t<caret underline>\n"`.
    pub rendered: String,
}

/// Configuration for a [`Log`]: output colouring, warning visibility and the
/// success/context framing around a flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct LogConfig {
    #[builder(default = false)]
    pub color: bool,
    #[builder(default = false)]
    pub hide_warnings: bool,
    #[builder(default = false)]
    pub silent_success: bool,
    /// Number of source characters of context to show around a span when
    /// rendering the caret-underline line; `0` means "show the whole source".
    #[builder(default = 0)]
    pub context_frame: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig::builder().build()
    }
}

/// An ordered, FIFO log of diagnostic records.
#[derive(Debug, Clone, Default)]
pub struct Log {
    config: LogConfig,
    records: Vec<Record>,
    warning_count: usize,
    error_count: usize,
}

impl Log {
    pub fn new(config: LogConfig) -> Self {
        Log {
            config,
            records: Vec::new(),
            warning_count: 0,
            error_count: 0,
        }
    }

    pub fn config(&self) -> LogConfig {
        self.config
    }

    pub fn set_config(&mut self, config: LogConfig) {
        self.config = config;
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Formats a three-line record and pushes it onto the log.
    pub fn report_warning(&mut self, source: &str, span: Span, message: &str) {
        let rendered = render_record(self.config.color, Severity::Warning, source, span, message);
        self.records.push(Record {
            severity: Severity::Warning,
            span,
            rendered,
        });
        self.warning_count += 1;
    }

    /// Formats a three-line record and pushes it onto the log.
    pub fn report_error(&mut self, source: &str, span: Span, message: &str) {
        let rendered = render_record(self.config.color, Severity::Error, source, span, message);
        self.records.push(Record {
            severity: Severity::Error,
            span,
            rendered,
        });
        self.error_count += 1;
    }

    /// Drains the log in FIFO order, writing each record's rendering to `sink`,
    /// respecting `hide_warnings` and `silent_success`.
    #[cfg(feature = "std")]
    pub fn flush(&mut self, mut sink: impl std::io::Write) -> std::io::Result<()> {
        if self.records.is_empty() {
            if !self.config.silent_success {
                sink.write_all(b"ok\n")?;
            }
            return Ok(());
        }
        for record in self.records.drain(..) {
            if self.config.hide_warnings && record.severity == Severity::Warning {
                continue;
            }
            sink.write_all(record.rendered.as_bytes())?;
        }
        self.warning_count = 0;
        self.error_count = 0;
        Ok(())
    }

    /// `std`-free equivalent of [`Log::flush`]: drains the log in FIFO order,
    /// invoking `sink` once per surviving record's rendered text.
    pub fn flush_with(&mut self, mut sink: impl FnMut(&str)) {
        if self.records.is_empty() {
            if !self.config.silent_success {
                sink("ok\n");
            }
            return;
        }
        for record in self.records.drain(..) {
            if self.config.hide_warnings && record.severity == Severity::Warning {
                continue;
            }
            sink(&record.rendered);
        }
        self.warning_count = 0;
        self.error_count = 0;
    }
}

fn render_record(color: bool, severity: Severity, source: &str, span: Span, message: &str) -> String {
    let kind = match (severity, color) {
        (Severity::Warning, true) => "\u{1b}[33mwarning\u{1b}[0m",
        (Severity::Warning, false) => "warning",
        (Severity::Error, true) => "\u{1b}[31merror\u{1b}[0m",
        (Severity::Error, false) => "error",
    };
    let end_inclusive = span.end.saturating_sub(1);
    let mut out = String::new();
    out.push_str(&format!("[{}:{}] {}: {}\n", span.begin, end_inclusive, kind, message));
    out.push('\t');
    out.push_str(source);
    out.push('\n');
    out.push('\t');
    for i in 0..span.end {
        if i >= span.begin && i < span.end {
            out.push('^');
        } else {
            out.push(' ');
        }
    }
    out.push('\n');
    out
}
