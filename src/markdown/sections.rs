use super::nav::NavigationTree;
use super::slug::slugify;
use regex::Regex;
use std::sync::LazyLock;

/// A bare first- or second-level heading on a single line. Closing tags are
/// not checked against the opening one.
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(h[12])>(.*?)</h[12]>").expect("heading pattern is valid"));

/// Split converted HTML into anchorable sections, one per `h1`/`h2`, and
/// collect the sidebar's navigation tree along the way.
///
/// Every heading is replaced by markup that closes the previous section,
/// opens a new one, repeats the heading with an `id` and a class, and opens
/// the section's content block. The caller's surrounding markup must open a
/// section before the body and close one after it.
///
/// A second-level heading seen before any first-level heading still becomes
/// a section in the page, but is left out of the navigation tree.
pub fn rewrite_headings(html: &str) -> (String, NavigationTree) {
    let mut out = String::with_capacity(html.len());
    let mut nav = NavigationTree::default();
    let mut last = 0;

    for caps in HEADING.captures_iter(html) {
        let (Some(whole), Some(tag), Some(text)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let (tag, text) = (tag.as_str(), text.as_str());
        let id = slugify(text);

        if tag == "h1" {
            nav.open_section(&id, text);
        } else if !nav.add_child(&id, text) {
            log::warn!("discarding `{text}` from navigation: no top-level heading precedes it");
        }
        log::debug!("{tag} heading `{id}`");

        out.push_str(&html[last..whole.start()]);
        out.push_str("</div></section><section class=\"doc-section\"><");
        out.push_str(tag);
        out.push_str(" class=\"section-title\" id=\"");
        out.push_str(&id);
        out.push_str("\">");
        out.push_str(text);
        out.push_str("</");
        out.push_str(tag);
        out.push_str("><div class=\"section-block\">");
        last = whole.end();
    }
    out.push_str(&html[last..]);

    (out, nav)
}
