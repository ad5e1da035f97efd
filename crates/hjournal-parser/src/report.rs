//! Error reporting with source context.
//!
//! Uses ariadne to print an error with the offending source line underlined.

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use std::io::Write;

use crate::Error;

/// Source name used by [`Error::render`].
const DEFAULT_NAME: &str = "journal";

impl Error {
    /// Write an annotated report of this error to `writer`.
    ///
    /// `name` labels the source in the report header, usually a file path.
    pub fn write_report<W: Write>(
        &self,
        name: &str,
        source: &str,
        writer: &mut W,
    ) -> std::io::Result<()> {
        let span = self.span();
        let end = span.end.min(source.len());
        let start = span.start.min(end);

        let mut report = Report::build(ReportKind::Error, (name, start..end))
            .with_code(format!("E{:04}", self.code()))
            .with_message(self.to_string())
            .with_label(
                Label::new((name, start..end))
                    .with_message(self.label())
                    .with_color(Color::Red),
            )
            .with_config(Config::default().with_compact(false).with_color(false));

        if let Self::Syntactic(err) = self {
            if let Some(hint) = &err.hint {
                report = report.with_help(hint);
            }
        }

        report.finish().write((name, Source::from(source)), writer)
    }

    /// Render an annotated report of this error as a string.
    pub fn render(&self, source: &str) -> String {
        let mut out = Vec::new();
        if let Err(e) = self.write_report(DEFAULT_NAME, source, &mut out) {
            tracing::warn!(error = %e, "failed to render error report");
            return self.to_string();
        }
        String::from_utf8_lossy(&out).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse_to_cooked_with, parse_to_cst, Options};

    #[test]
    fn test_render_parse_error() {
        let source = "2024-01-01 x\n  a  $\n";
        let err = parse_to_cst(source).unwrap_err();
        let report = err.render(source);
        assert!(report.contains("E0101"), "{report}");
        assert!(report.contains("unexpected token"), "{report}");
        assert!(report.contains("journal"), "{report}");
    }

    #[test]
    fn test_render_includes_hint() {
        let source = "; note\n  ; more\n";
        let err = parse_to_cst(source).unwrap_err();
        let report = err.render(source);
        assert!(report.contains("indented lines must follow"), "{report}");
    }

    #[test]
    fn test_render_semantic_error() {
        let source = "Y 2023\n02/29 leap\n";
        let err = parse_to_cooked_with(source, &Options::default()).unwrap_err();
        let report = err.render(source);
        assert!(report.contains("E0202"), "{report}");
        assert!(report.contains("invalid date"), "{report}");
    }

    #[test]
    fn test_render_lex_error() {
        let source = "2024-01-01 x\n a  1\n";
        let err = parse_to_cst(source).unwrap_err();
        assert_eq!(err.code(), 1);
        assert!(err.render(source).contains("E0001"));
    }
}
