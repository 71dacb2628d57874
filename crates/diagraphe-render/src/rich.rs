//! Processing hook for embedded HTML (rich-content regions).

/// Transforms a rich-content fragment before it is embedded in the output.
///
/// Implementations typically render a markup dialect (math, markdown) to HTML. The returned
/// string is embedded verbatim inside an XHTML `<div>`, so it must already be well-formed.
pub trait RichContentRenderer {
    fn render(&self, html: &str) -> String;
}

/// Embeds fragments unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRichContent;

impl RichContentRenderer for PassthroughRichContent {
    fn render(&self, html: &str) -> String {
        html.to_string()
    }
}

impl<F> RichContentRenderer for F
where
    F: Fn(&str) -> String,
{
    fn render(&self, html: &str) -> String {
        self(html)
    }
}
