// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Rendering primitives for the line-oriented text exposition format.
//!
//! A histogram family renders as
//!
//! ```text
//! # HELP latency h
//! # TYPE latency histogram
//! latency_bucket{method="GET",le="10"} 1
//! latency_bucket{method="GET",le="+Inf"} 2
//! latency_sum{method="GET"} 25
//! latency_count{method="GET"} 2
//! ```
//!
//! Lines are separated by `\n` with no trailing newline.

use std::borrow::Cow;
use std::fmt::{self, Write};

use crate::{Aggregate, Buckets, LabelSet, PermutationKey, Value};

/// How label values and help text are written out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Escaping {
    /// Write label values and help text exactly as configured.
    #[default]
    Verbatim,
    /// Escape `\`, `"` and newlines in label values, and `\` and newlines in
    /// help text.
    Strict,
}

/// Writes the `# HELP` and `# TYPE` lines of a family.
pub fn write_header<W: Write>(
    out: &mut W,
    name: &str,
    help: &str,
    kind: &str,
    escaping: Escaping,
) -> fmt::Result {
    let help = match escaping {
        Escaping::Verbatim => Cow::Borrowed(help),
        Escaping::Strict => escape(help, false),
    };

    write!(out, "# HELP {name} {help}\n# TYPE {name} {kind}")
}

/// Writes the bucket, sum and count lines of one series.
///
/// Every line is preceded by a newline, so a header followed by any number
/// of series yields newline-joined output.
pub fn write_series<W: Write>(
    out: &mut W,
    name: &str,
    labels: &LabelSet,
    key: &PermutationKey,
    layout: &Buckets,
    aggregate: &Aggregate,
    escaping: Escaping,
) -> fmt::Result {
    let labels = render_labels(labels, key, escaping);
    let separator = if labels.is_empty() { "" } else { "," };

    for (limit, count) in layout.iter().zip(aggregate.buckets()) {
        write!(
            out,
            "\n{name}_bucket{{{labels}{separator}le=\"{}\"}} {count}",
            limit.label()
        )?;
    }

    let count = aggregate.count();

    write!(
        out,
        "\n{name}_bucket{{{labels}{separator}le=\"+Inf\"}} {count}"
    )?;
    write!(out, "\n{name}_sum{{{labels}}} {}", Value(aggregate.sum()))?;
    write!(out, "\n{name}_count{{{labels}}} {count}")
}

/// The text between the braces of a `_sum` or `_count` line.
fn render_labels<'a>(labels: &LabelSet, key: &'a PermutationKey, escaping: Escaping) -> Cow<'a, str> {
    match escaping {
        Escaping::Verbatim => Cow::Borrowed(key.as_str()),
        Escaping::Strict => {
            let mut rendered = String::new();
            for (i, (name, value)) in labels.iter().enumerate() {
                if i > 0 {
                    rendered.push(',');
                }
                // writing into a String cannot fail
                let _ = write!(rendered, "{name}=\"{}\"", escape(value, true));
            }
            Cow::Owned(rendered)
        }
    }
}

fn escape(s: &str, quotes: bool) -> Cow<'_, str> {
    let needs_escape = |c: char| c == '\\' || c == '\n' || (quotes && c == '"');

    if !s.contains(needs_escape) {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '"' if quotes => escaped.push_str("\\\""),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(labels: &LabelSet, escaping: Escaping) -> String {
        let layout = Buckets::new([50.0, 10.0]).unwrap();
        let mut aggregate = Aggregate::new(&layout);
        aggregate.observe(&layout, 5.0);
        aggregate.observe(&layout, 20.0);

        let mut out = String::new();
        write_header(&mut out, "latency", "h", "histogram", escaping).unwrap();
        write_series(
            &mut out,
            "latency",
            labels,
            &labels.flatten(),
            &layout,
            &aggregate,
            escaping,
        )
        .unwrap();
        out
    }

    #[test]
    fn labelled_series() {
        let out = render(&LabelSet::new().with("method", "GET"), Escaping::Verbatim);
        assert_eq!(
            out,
            "# HELP latency h\n\
             # TYPE latency histogram\n\
             latency_bucket{method=\"GET\",le=\"10\"} 1\n\
             latency_bucket{method=\"GET\",le=\"50\"} 2\n\
             latency_bucket{method=\"GET\",le=\"+Inf\"} 2\n\
             latency_sum{method=\"GET\"} 25\n\
             latency_count{method=\"GET\"} 2"
        );
    }

    #[test]
    fn unlabelled_series() {
        let out = render(&LabelSet::new(), Escaping::Verbatim);
        assert!(out.contains("\nlatency_bucket{le=\"10\"} 1\n"));
        assert!(out.contains("\nlatency_bucket{le=\"+Inf\"} 2\n"));
        assert!(out.contains("\nlatency_sum{} 25\n"));
        assert!(out.ends_with("\nlatency_count{} 2"));
    }

    #[test]
    fn verbatim_does_not_escape() {
        let out = render(&LabelSet::new().with("path", "a\"b"), Escaping::Verbatim);
        assert!(out.contains("latency_count{path=\"a\"b\"} 2"));
    }

    #[test]
    fn strict_escapes_values() {
        let out = render(
            &LabelSet::new().with("path", "C:\\tmp\n\"x\""),
            Escaping::Strict,
        );
        assert!(out.contains(r#"latency_count{path="C:\\tmp\n\"x\""} 2"#));
    }

    #[test]
    fn strict_escapes_help() {
        let mut out = String::new();
        write_header(&mut out, "m", "a\\b\nc \"q\"", "histogram", Escaping::Strict).unwrap();
        assert_eq!(out, "# HELP m a\\\\b\\nc \"q\"\n# TYPE m histogram");
    }
}
