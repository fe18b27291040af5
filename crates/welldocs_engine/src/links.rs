use url::Url;

/// A document view link is recognized by a marker in its href.
pub fn is_document_link(href: &str, marker: &str) -> bool {
    !marker.is_empty() && href.contains(marker)
}

/// Resolves a table link against the site origin.
///
/// Absolute `http(s)` links are used as-is; anything else is joined onto `base_origin`.
pub fn resolve_link(base_origin: &Url, link: &str) -> Result<Url, url::ParseError> {
    let trimmed = link.trim();
    if trimmed.starts_with("http") {
        Url::parse(trimmed)
    } else {
        base_origin.join(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://sonlite.dnr.state.la.us").unwrap()
    }

    #[test]
    fn relative_links_join_the_origin() {
        let resolved = resolve_link(&origin(), "/pls/f?p=108&dDocname=ABC").unwrap();
        assert_eq!(
            resolved.as_str(),
            "https://sonlite.dnr.state.la.us/pls/f?p=108&dDocname=ABC"
        );
    }

    #[test]
    fn absolute_links_are_kept() {
        let resolved = resolve_link(&origin(), "http://other.example/doc?dDocname=1").unwrap();
        assert_eq!(resolved.as_str(), "http://other.example/doc?dDocname=1");
    }

    #[test]
    fn marker_must_be_present() {
        assert!(is_document_link("/x?dDocname=1", "dDocname"));
        assert!(!is_document_link("javascript:void(0)", "dDocname"));
        assert!(!is_document_link("/x", ""));
    }
}
