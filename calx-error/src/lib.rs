//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages, and the span-carrying [`Error`] type returned by every fallible operation in calx.
//!
//! Parsing, resolution, environment lookups, reduction and evaluation all report failures with
//! the same [`Error`] type, so callers compose them with [`Result::and_then`] and `?` without
//! converting between error types.

// lets `#[derive(ErrorKind)]` refer to `::calx_error` from inside this crate's own tests
extern crate self as calx_error;

use ariadne::{Color, Report};
use std::{any::Any, fmt::Debug, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send {
    /// Returns the error as [`Any`], so that callers can inspect the concrete kind.
    fn as_any(&self) -> &dyn Any;

    /// The message displayed at the top of the error.
    fn message(&self) -> String;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,

    /// Whether the error is fatal. The parser stops trying alternatives when it sees a fatal
    /// error, and the evaluator uses it to mark mismatches between the resolver and the
    /// environment.
    pub fatal: bool,
}

impl Error {
    /// Creates a new non-fatal error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind), fatal: false }
    }

    /// Creates a new fatal error with the given spans and kind.
    pub fn new_fatal(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind), fatal: true }
    }

    /// Returns the concrete error kind if it is of type `K`.
    pub fn downcast_kind<K: ErrorKind + 'static>(&self) -> Option<&K> {
        self.kind.as_any().downcast_ref::<K>()
    }

    /// Returns true if the error kind is of type `K`.
    pub fn is<K: ErrorKind + 'static>(&self) -> bool {
        self.downcast_kind::<K>().is_some()
    }

    /// The message displayed at the top of the error.
    pub fn message(&self) -> String {
        self.kind.message()
    }

    /// Returns the (1-based) line of the given source that this error starts on.
    pub fn line(&self, source: &str) -> usize {
        line_of(source, self.spans.first().map_or(0, |span| span.start))
    }

    /// Formats the error as a single line, prefixed with the line it occurred on.
    pub fn describe(&self, source: &str) -> String {
        format!("on line {}, {}", self.line(source), self.message())
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }
}

/// Returns the (1-based) line that the given byte offset falls on.
///
/// Offsets past the end of the source point at the last line.
pub fn line_of(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use ariadne::{Fmt, Source};
    use calx_attrs::ErrorKind;
    use super::*;

    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        message = format!("`{}` is not defined", name),
        labels = ["this name"],
        help = format!("define it with {}", "let".fg(EXPR)),
    )]
    struct Undefined {
        name: String,
    }

    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(message = "something went wrong")]
    struct Bare;

    fn render(error: &Error, source: &str) -> String {
        let mut buf = Vec::new();
        error.build_report("input")
            .write(("input", Source::from(source)), &mut buf)
            .unwrap();
        String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap()
    }

    #[test]
    fn line_lookup() {
        let source = "let a = 1\nlet b = 2\n\nb + c";
        assert_eq!(line_of(source, 0), 1);
        assert_eq!(line_of(source, 10), 2);
        assert_eq!(line_of(source, source.len() - 1), 4);
        assert_eq!(line_of(source, 1000), 4);
    }

    #[test]
    fn describe_uses_first_span() {
        let source = "let a = 1\nb + c";
        let error = Error::new(vec![14..15], Undefined { name: "c".to_string() });
        assert_eq!(error.describe(source), "on line 2, `c` is not defined");
    }

    #[test]
    fn downcast() {
        let error = Error::new_fatal(vec![0..1], Bare);
        assert!(error.fatal);
        assert!(error.is::<Bare>());
        assert!(!error.is::<Undefined>());
        assert_eq!(error.downcast_kind::<Bare>(), Some(&Bare));
    }

    #[test]
    fn report_contains_message_label_and_help() {
        let source = "x + y";
        let error = Error::new(vec![4..5], Undefined { name: "y".to_string() });
        let rendered = render(&error, source);
        assert!(rendered.contains("`y` is not defined"));
        assert!(rendered.contains("this name"));
        assert!(rendered.contains("define it with let"));
    }

    #[test]
    fn report_without_labels() {
        let error = Error::new(vec![0..1], Bare);
        let rendered = render(&error, "x");
        assert!(rendered.contains("something went wrong"));
    }
}
