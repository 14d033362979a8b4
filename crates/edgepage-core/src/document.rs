/// Element id of the container the rendered markup is placed into.
pub const CONTENT_ID: &str = "content";

const DOCUMENT_HEAD: &str = "<!doctype html>\n<html>\n  <body>\n    <div id=\"content\">";
const DOCUMENT_TAIL: &str = "</div>\n  </body>\n</html>\n";

/// Wrap rendered markup in the page document shell. The markup is inserted verbatim.
pub fn wrap(markup: &str) -> String {
    let mut html = String::with_capacity(DOCUMENT_HEAD.len() + markup.len() + DOCUMENT_TAIL.len());
    html.push_str(DOCUMENT_HEAD);
    html.push_str(markup);
    html.push_str(DOCUMENT_TAIL);
    html
}

/// Return the markup placed inside the content container of a document produced by [`wrap`].
pub fn extract_content(document: &str) -> Option<&str> {
    document
        .strip_prefix(DOCUMENT_HEAD)?
        .strip_suffix(DOCUMENT_TAIL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_markup_in_fixed_template() {
        let html = wrap("<p>Hello!</p>");
        assert_eq!(
            html,
            "<!doctype html>\n<html>\n  <body>\n    <div id=\"content\"><p>Hello!</p></div>\n  </body>\n</html>\n"
        );
    }

    #[test]
    fn empty_markup_leaves_empty_container() {
        assert!(wrap("").contains("<div id=\"content\"></div>"));
    }

    #[test]
    fn markup_is_not_escaped() {
        let html = wrap("<b>&amp;</b>");
        assert!(html.contains("<b>&amp;</b>"));
    }

    #[test]
    fn extract_content_inverts_wrap() {
        let html = wrap("<title>x</title>");
        assert_eq!(extract_content(&html), Some("<title>x</title>"));
        assert_eq!(extract_content("<html></html>"), None);
    }

    #[test]
    fn container_id_matches_template() {
        assert!(DOCUMENT_HEAD.contains(&format!("id=\"{}\"", CONTENT_ID)));
    }
}
