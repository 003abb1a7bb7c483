use std::fmt::{self, Write};
use std::sync::Arc;

use crate::*;

/// The content type of the text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// An ordered set of histograms rendered together as one scrape payload.
///
/// Each family is rendered with [`Histogram::write_report`], families are
/// separated by a newline and the payload ends with one trailing newline.
#[derive(Clone, Debug, Default)]
pub struct TextExposition {
    histograms: Vec<Arc<Histogram>>,
}

impl TextExposition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a histogram. Families render in the order they were added.
    pub fn register(&mut self, histogram: Arc<Histogram>) -> &mut Self {
        self.histograms.push(histogram);
        self
    }

    pub fn histograms(&self) -> &[Arc<Histogram>] {
        &self.histograms
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> fmt::Result {
        for histogram in &self.histograms {
            histogram.write_report(out)?;
            out.write_char('\n')?;
        }
        Ok(())
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TextExposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixedhist::NullSink;

    fn histogram(name: &str) -> Arc<Histogram> {
        Arc::new(
            Histogram::builder(name)
                .help(format!("{name} help"))
                .buckets([1.0])
                .diagnostics(NullSink)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn empty() {
        assert_eq!(TextExposition::new().render(), "");
    }

    #[test]
    fn families_in_registration_order() {
        let a = histogram("b_first");
        let b = histogram("a_second");
        a.observe(&LabelSet::new(), 0.5);

        let mut exposition = TextExposition::new();
        exposition.register(a.clone()).register(b.clone());

        let payload = exposition.render();
        assert_eq!(payload, format!("{}\n{}\n", a.report(), b.report()));
        assert!(payload.starts_with("# HELP b_first b_first help\n"));
        assert!(payload.contains("b_first_count{} 1\n# HELP a_second"));
    }
}
