//! JSX Element Scanning
//!
//! Walks a tree-sitter TSX tree and reports every named opening or
//! self-closing element together with its `id` attribute, if any.

use design_studio_core::{CoreError, CoreResult};
use std::ops::Range;

/// Attribute whose value is treated as the element identifier.
pub const ID_ATTRIBUTE: &str = "id";

/// The `id` attribute of one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdAttr {
    /// `id="value"` or `id='value'`
    Static { value: String, span: Range<usize> },
    /// `id=""`; treated as missing, the attribute is replaced
    Blank { span: Range<usize> },
    /// `id={expr}` or a bare `id`; never rewritten
    Dynamic,
}

/// A JSX element as found in the source, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsxElement {
    /// Tag name as written, e.g. `div` or `Card.Header`
    pub tag: String,
    /// Byte offset where a new attribute can be inserted
    pub insert_at: usize,
    pub id: Option<IdAttr>,
    /// Spans of any further `id` attributes, leading whitespace included
    pub extra_ids: Vec<Range<usize>>,
    /// Static values of those further attributes
    pub extra_values: Vec<String>,
}

pub(crate) fn tsx_parser() -> CoreResult<tree_sitter::Parser> {
    let lang: tree_sitter::Language = tree_sitter_typescript::LANGUAGE_TSX.into();
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&lang)
        .map_err(|e| CoreError::parse(format!("Failed to load TSX grammar: {}", e)))?;
    Ok(parser)
}

/// Parse `source` and list its elements in document order.
///
/// Syntax errors are tolerated; whatever tree-sitter recovers is scanned.
pub fn scan_elements(source: &str) -> CoreResult<Vec<JsxElement>> {
    let mut parser = tsx_parser()?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| CoreError::parse("TSX parse was cancelled"))?;

    let mut elements = Vec::new();
    collect(tree.root_node(), source, &mut elements);
    Ok(elements)
}

fn collect(node: tree_sitter::Node, source: &str, out: &mut Vec<JsxElement>) {
    if matches!(node.kind(), "jsx_opening_element" | "jsx_self_closing_element") {
        if let Some(element) = element_of(node, source) {
            out.push(element);
        }
    }
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            collect(child, source, out);
        }
    }
}

fn element_of(node: tree_sitter::Node, source: &str) -> Option<JsxElement> {
    // Fragments (`<>`) have no name.
    let name = node.child_by_field_name("name")?;

    let mut insert_at = name.end_byte();
    if let Some(type_args) = node.child_by_field_name("type_arguments") {
        insert_at = insert_at.max(type_args.end_byte());
    }

    let mut id = None;
    let mut extra_ids = Vec::new();
    let mut extra_values = Vec::new();
    let mut cursor = node.walk();
    for attr in node.children_by_field_name("attribute", &mut cursor) {
        insert_at = insert_at.max(attr.end_byte());
        if attr.kind() != "jsx_attribute" {
            continue;
        }
        let Some(found) = id_attr_of(attr, source) else {
            continue;
        };
        if id.is_none() {
            id = Some(found);
            continue;
        }
        if let IdAttr::Static { value, .. } = found {
            extra_values.push(value);
        }
        extra_ids.push(with_leading_space(source, attr.start_byte())..attr.end_byte());
    }

    Some(JsxElement {
        tag: node_text(name, source).to_string(),
        insert_at,
        id,
        extra_ids,
        extra_values,
    })
}

fn id_attr_of(attr: tree_sitter::Node, source: &str) -> Option<IdAttr> {
    let name = attr.named_child(0)?;
    if node_text(name, source) != ID_ATTRIBUTE {
        return None;
    }
    let value = match attr.named_child_count() {
        0 | 1 => return Some(IdAttr::Dynamic),
        n => attr.named_child(n - 1)?,
    };
    if value.kind() != "string" {
        return Some(IdAttr::Dynamic);
    }
    let span = attr.start_byte()..attr.end_byte();
    let value = unquote(node_text(value, source));
    if value.trim().is_empty() {
        return Some(IdAttr::Blank { span });
    }
    Some(IdAttr::Static {
        value: value.to_string(),
        span,
    })
}

fn with_leading_space(source: &str, mut start: usize) -> usize {
    let bytes = source.as_bytes();
    while start > 0 && bytes[start - 1].is_ascii_whitespace() {
        start -= 1;
    }
    start
}

fn unquote(text: &str) -> &str {
    let quoted = text.len() >= 2
        && ((text.starts_with('"') && text.ends_with('"'))
            || (text.starts_with('\'') && text.ends_with('\'')));
    if quoted {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

fn node_text<'a>(node: tree_sitter::Node, source: &'a str) -> &'a str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or("")
}

/// Static identifier values in document order, duplicates included.
pub fn collect_ids(source: &str) -> CoreResult<Vec<String>> {
    Ok(scan_elements(source)?
        .into_iter()
        .filter_map(|el| match el.id {
            Some(IdAttr::Static { value, .. }) => Some(value),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scans_both_forms_in_document_order() {
        let source = r#"export const A = () => (
  <section className="hero">
    <h1 id="title">Hi</h1>
    <img src="/a.png" />
    <>
      <Card.Header id={headerId} />
    </>
  </section>
);"#;
        let elements = scan_elements(source).unwrap();
        let tags: Vec<&str> = elements.iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["section", "h1", "img", "Card.Header"]);

        assert_eq!(elements[0].id, None);
        assert!(matches!(&elements[1].id, Some(IdAttr::Static { value, .. }) if value == "title"));
        assert_eq!(elements[3].id, Some(IdAttr::Dynamic));
    }

    #[test]
    fn test_insert_point_follows_last_attribute() {
        let source = r#"const x = <img src="/a.png" alt="a" />;"#;
        let elements = scan_elements(source).unwrap();
        let end = source.find(r#"alt="a""#).unwrap() + r#"alt="a""#.len();
        assert_eq!(elements[0].insert_at, end);

        let bare = "const y = <div>hi</div>;";
        let elements = scan_elements(bare).unwrap();
        assert_eq!(elements[0].insert_at, bare.find("<div").unwrap() + 4);
    }

    #[test]
    fn test_collect_ids_single_quotes() {
        let source = "const x = <div id='a'><span id=\"b\" /></div>;";
        assert_eq!(collect_ids(source).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_blank_and_repeated_ids() {
        let source = r#"const x = <div id="" className="a"><p id="a" id="b" /></div>;"#;
        let elements = scan_elements(source).unwrap();
        assert!(matches!(elements[0].id, Some(IdAttr::Blank { .. })));
        assert!(elements[0].extra_ids.is_empty());
        assert!(matches!(&elements[1].id, Some(IdAttr::Static { value, .. }) if value == "a"));
        assert_eq!(elements[1].extra_values, vec!["b"]);
        let span = elements[1].extra_ids[0].clone();
        assert_eq!(&source[span], r#" id="b""#);
        assert_eq!(collect_ids(source).unwrap(), vec!["a"]);
    }

    #[test]
    fn test_no_elements() {
        assert!(scan_elements("export const n = 1;").unwrap().is_empty());
    }
}
