mod nav;
mod sections;
mod slug;
mod tables;

pub use nav::NavigationTree;

use pulldown_cmark::{Options, Parser, html::push_html};

/// Convert Markdown to HTML. Heading attribute syntax stays off so headings
/// come out as bare `<h1>`/`<h2>` tags for the section pass to find.
pub fn to_html(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut html_buf = String::new();
    push_html(&mut html_buf, Parser::new_ext(source, options));
    html_buf
}

/// Render a Markdown document into the page body and its navigation tree.
pub fn render(source: &str, table_class: &str) -> (String, NavigationTree) {
    let html = to_html(source);
    let (body, nav) = sections::rewrite_headings(&html);
    (tables::add_table_classes(&body, table_class), nav)
}
