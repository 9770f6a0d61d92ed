/// Give every bare `<table>` tag the given class attribute. Tables that
/// already carry attributes are left alone.
pub fn add_table_classes(html: &str, class: &str) -> String {
    html.replace("<table>", &format!("<table class=\"{class}\">"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_table() {
        assert_eq!(
            add_table_classes("<table><tr></tr></table>", "table table-bordered"),
            "<table class=\"table table-bordered\"><tr></tr></table>"
        );
    }

    #[test]
    fn table_with_attributes() {
        let html = "<table id=\"t\"></table>";
        assert_eq!(add_table_classes(html, "table table-bordered"), html);
    }

    #[test]
    fn several_tables() {
        assert_eq!(
            add_table_classes("<table></table><p>x</p><table></table>", "t"),
            "<table class=\"t\"></table><p>x</p><table class=\"t\"></table>"
        );
    }

    #[test]
    fn no_tables() {
        assert_eq!(add_table_classes("<p>hi</p>", "t"), "<p>hi</p>");
    }
}
