//! Text-level handling of the region image: rewriting the root `<svg>` tag so the
//! image fills its container, and scanning region elements without a DOM.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SvgError {
    #[error("document is empty")]
    Empty,
    #[error("document has no <svg> root element")]
    MissingRoot,
}

static SVG_OPEN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^<svg\b([^>]*)>").expect("valid regex"));

static SIZING_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s(?:width|height|preserveAspectRatio|style)\s*=\s*(?:"[^"]*"|'[^']*')"#)
        .expect("valid regex")
});

static ID_OR_NAME_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)(id|name)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});

const RESPONSIVE_ATTRS: &str = r#"preserveAspectRatio="xMidYMid meet" style="width:100%;height:100%""#;

/// Byte offset of the first element, past any BOM, XML declaration,
/// processing instructions, comments and doctype.
fn root_offset(markup: &str) -> usize {
    let mut at = 0;
    loop {
        let rest = &markup[at..];
        let trimmed = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
        at += rest.len() - trimmed.len();

        let skip_to = |open: &str, close: &str| {
            trimmed
                .strip_prefix(open)
                .map(|body| body.find(close).map_or(trimmed.len(), |i| open.len() + i + close.len()))
        };
        let skipped = skip_to("<?", "?>")
            .or_else(|| skip_to("<!--", "-->"))
            .or_else(|| {
                let doctype = trimmed.get(..9)?;
                doctype.eq_ignore_ascii_case("<!doctype").then(|| doctype_len(trimmed))
            });
        match skipped {
            Some(len) => at += len,
            None => return at,
        }
    }
}

/// Length of a `<!DOCTYPE ...>` declaration, including an internal subset.
fn doctype_len(decl: &str) -> usize {
    let mut in_subset = false;
    for (i, c) in decl.char_indices() {
        match c {
            '[' => in_subset = true,
            ']' => in_subset = false,
            '>' if !in_subset => return i + 1,
            _ => {}
        }
    }
    decl.len()
}

/// Strip fixed sizing from the root tag and make it fill its container.
///
/// Only the root `<svg>` tag is touched; nested `<svg>` elements keep their
/// own geometry, and a root element of any other kind is rejected.
pub fn make_responsive(markup: &str) -> Result<String, SvgError> {
    if markup.trim().is_empty() {
        return Err(SvgError::Empty);
    }
    let start = root_offset(markup);
    let caps = SVG_OPEN_TAG
        .captures(&markup[start..])
        .ok_or(SvgError::MissingRoot)?;
    let (Some(tag), Some(attrs)) = (caps.get(0), caps.get(1)) else {
        return Err(SvgError::MissingRoot);
    };
    let (tag_start, tag_end) = (start + tag.start(), start + tag.end());

    let raw = attrs.as_str();
    let (raw, self_closing) = match raw.trim_end().strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (raw, false),
    };
    let kept = SIZING_ATTR.replace_all(raw, "");
    let kept = kept.trim();

    let mut rewritten = String::with_capacity(markup.len() + RESPONSIVE_ATTRS.len());
    rewritten.push_str(&markup[..tag_start]);
    rewritten.push_str("<svg ");
    if !kept.is_empty() {
        rewritten.push_str(kept);
        rewritten.push(' ');
    }
    rewritten.push_str(RESPONSIVE_ATTRS);
    rewritten.push_str(if self_closing { "/>" } else { ">" });
    rewritten.push_str(&markup[tag_end..]);
    Ok(rewritten)
}

/// A region element found by [`scan_regions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedRegion {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// List `<tag>` elements in document order with their `id` / `name` attributes.
pub fn scan_regions(markup: &str, tag: &str) -> Vec<ScannedRegion> {
    let Ok(element) = Regex::new(&format!(r"(?i)<{}\b([^>]*)>", regex::escape(tag))) else {
        return Vec::new();
    };

    element
        .captures_iter(markup)
        .map(|caps| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let mut region = ScannedRegion {
                id: None,
                name: None,
            };
            for attr in ID_OR_NAME_ATTR.captures_iter(attrs) {
                let value = attr
                    .get(2)
                    .or_else(|| attr.get(3))
                    .map(|m| m.as_str().to_owned());
                match &attr[1] {
                    "id" => region.id = region.id.take().or(value),
                    _ => region.name = region.name.take().or(value),
                }
            }
            region
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fixed_sizing_and_adds_responsive_attrs() {
        let src = r#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" width="800" height='600' viewBox="0 0 800 600" style="background:red" preserveAspectRatio="none"><path id="A"/></svg>"#;
        let out = make_responsive(src).unwrap();
        assert_eq!(
            out,
            r#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 800 600" preserveAspectRatio="xMidYMid meet" style="width:100%;height:100%"><path id="A"/></svg>"#
        );
    }

    #[test]
    fn keeps_stroke_width_and_similar_attrs() {
        let out = make_responsive(r#"<svg stroke-width="2" data-height="3">"#).unwrap();
        assert!(out.contains(r#"stroke-width="2""#));
        assert!(out.contains(r#"data-height="3""#));
    }

    #[test]
    fn bare_svg_tag_gets_attrs() {
        let out = make_responsive("<SVG><g/></SVG>").unwrap();
        assert_eq!(
            out,
            r#"<svg preserveAspectRatio="xMidYMid meet" style="width:100%;height:100%"><g/></SVG>"#
        );
    }

    #[test]
    fn self_closing_root_stays_self_closing() {
        let out = make_responsive(r#"<svg width="1"/>"#).unwrap();
        assert!(out.ends_with("/>"));
        assert!(!out.contains("width=\"1\""));
    }

    #[test]
    fn only_the_root_tag_is_rewritten() {
        let out = make_responsive(r#"<svg width="1"><svg width="2"/></svg>"#).unwrap();
        assert!(out.contains(r#"<svg width="2"/>"#));
    }

    #[test]
    fn rejects_documents_without_root() {
        assert_eq!(make_responsive("   "), Err(SvgError::Empty));
        assert_eq!(
            make_responsive("<html><body>404</body></html>"),
            Err(SvgError::MissingRoot)
        );
    }

    #[test]
    fn prolog_before_root_is_left_alone() {
        let src = "\u{feff}<?xml version=\"1.0\"?>\n<!-- exported from <svg width=\"10\"> -->\n\
                   <!DOCTYPE svg [<!ENTITY w \"5\">]>\n<svg width=\"800\"><path id=\"A\"/></svg>";
        let out = make_responsive(src).unwrap();
        assert!(out.contains(r#"<!-- exported from <svg width="10"> -->"#));
        assert!(out.contains(r#"<!ENTITY w "5">"#));
        assert!(out.contains(
            r#"<svg preserveAspectRatio="xMidYMid meet" style="width:100%;height:100%"><path id="A"/>"#
        ));
        assert!(!out.contains(r#"width="800""#));
    }

    #[test]
    fn svg_nested_in_another_root_is_not_a_root() {
        assert_eq!(
            make_responsive(r#"<html><body><svg width="1"></svg></body></html>"#),
            Err(SvgError::MissingRoot)
        );
        assert_eq!(
            make_responsive("<!-- only a comment <svg> -->"),
            Err(SvgError::MissingRoot)
        );
    }

    #[test]
    fn scans_regions_in_document_order() {
        let src = r#"<svg><path id="A" name="Alpha" d="M0 0"/><path d='M1 1' id='B'/><path d="M2 2"/><circle id="X"/></svg>"#;
        let regions = scan_regions(src, "path");
        assert_eq!(
            regions,
            vec![
                ScannedRegion {
                    id: Some("A".into()),
                    name: Some("Alpha".into()),
                },
                ScannedRegion {
                    id: Some("B".into()),
                    name: None,
                },
                ScannedRegion {
                    id: None,
                    name: None,
                },
            ]
        );
    }

    #[test]
    fn scan_ignores_prefixed_attribute_names() {
        let regions = scan_regions(r#"<path data-id="nope" id="yes" aria-name="x"/>"#, "path");
        assert_eq!(regions[0].id.as_deref(), Some("yes"));
        assert_eq!(regions[0].name, None);
    }

    #[test]
    fn scan_does_not_match_longer_tag_names() {
        assert!(scan_regions(r#"<pathology id="A"/>"#, "path").is_empty());
    }
}
