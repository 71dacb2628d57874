//! Plain-text fallback for rich-content regions.
//!
//! resvg/usvg (and most other non-browser consumers) ignore `<foreignObject>`. Before handing
//! a scene to those, regions are swapped for `<text>` carrying the visible text of the HTML.

use super::{Baseline, Primitive, RichContentRegion, SceneNode, TextStyle};
use diagraphe_core::TextAnchor;
use regex::Regex;
use std::sync::OnceLock;

const FALLBACK_FONT_SIZE: f64 = 12.0;

/// Visible text of an HTML fragment: tags dropped, entities decoded, whitespace collapsed.
///
/// `<br>` and block-level closing tags become spaces so adjacent lines do not run together.
pub fn html_to_text(html: &str) -> String {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    let re = TAG_RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").unwrap());

    let stripped = re.replace_all(html, " ");
    let decoded = htmlize::unescape(stripped.as_ref()).into_owned();
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn fallback_text(region: &RichContentRegion, html: &str) -> Primitive {
    let (y, anchor) = if region.centered {
        (region.y, TextAnchor::Middle)
    } else {
        (region.y + region.height / 2.0, TextAnchor::Start)
    };
    Primitive::Text {
        x: region.x,
        y,
        content: html_to_text(html),
        style: TextStyle::new(FALLBACK_FONT_SIZE, anchor).with_baseline(Baseline::Middle),
    }
}

/// Replaces every rich-content region under `root` with a plain-text node.
///
/// Presentation attributes (classes, opacity) stay on the replacement.
/// Returns the number of replaced regions.
pub fn rich_content_as_text(root: &mut SceneNode) -> usize {
    let mut replaced = 0;
    root.walk_mut(&mut |node| {
        if let Primitive::RichContent { region, html } = &node.primitive {
            node.primitive = fallback_text(region, html);
            replaced += 1;
        }
    });
    replaced
}
