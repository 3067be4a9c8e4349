// Navigation primitives over the parsed document.

use scraper::{ElementRef, Node, Selector};
use snafu::OptionExt;

use crate::model::*;

/// Inline runs that mark labels and elected candidates.
pub const EMPHASIS: &str = "strong, b";

/// Upper bound on the number of parents visited when walking up the tree.
pub const MAX_ANCESTOR_DEPTH: usize = 256;

/// The capabilities needed from a document node to locate the result tables.
pub trait TreeNode: Sized + Copy {
    fn parent_node(&self) -> Option<Self>;

    /// The first strict descendant, in document order, accepted by the predicate.
    fn find_descendant<P: FnMut(&Self) -> bool>(&self, predicate: P) -> Option<Self>;
}

impl<'a> TreeNode for ElementRef<'a> {
    fn parent_node(&self) -> Option<Self> {
        self.parent().and_then(ElementRef::wrap)
    }

    fn find_descendant<P: FnMut(&Self) -> bool>(&self, mut predicate: P) -> Option<Self> {
        self.descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|e| predicate(e))
    }
}

/// The closest strict ancestor accepted by the predicate.
///
/// The walk gives up after `MAX_ANCESTOR_DEPTH` parents.
pub fn find_ancestor<N: TreeNode>(start: N, mut predicate: impl FnMut(&N) -> bool) -> Option<N> {
    let mut current = start.parent_node();
    for _ in 0..MAX_ANCESTOR_DEPTH {
        let node = current?;
        if predicate(&node) {
            return Some(node);
        }
        current = node.parent_node();
    }
    None
}

/// The ancestor `levels` steps above the node.
pub fn nth_ancestor<N: TreeNode>(start: N, levels: usize) -> Option<N> {
    (0..levels.min(MAX_ANCESTOR_DEPTH)).try_fold(start, |node, _| node.parent_node())
}

pub fn is_tag(element: &ElementRef<'_>, name: &str) -> bool {
    element.value().name() == name
}

/// The closest enclosing element with the given tag name.
pub fn find_parent_tag<'a>(element: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    find_ancestor(element, |e| is_tag(e, name))
}

/// The nearest ancestor that also holds a table.
///
/// For a section heading, this is the element that groups the heading with its results.
pub fn find_container(heading: ElementRef<'_>) -> Option<ElementRef<'_>> {
    find_ancestor(heading, |e| e.find_descendant(|d| is_tag(d, "table")).is_some())
}

/// The first child of the element, if it is a text node.
pub fn first_text<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    let child = element.first_child()?;
    match child.value() {
        Node::Text(text) => Some(&*text.text),
        _ => None,
    }
}

/// The only string held by the element.
///
/// The element must have exactly one child: either a text node, or an element
/// that itself holds a single string.
pub fn single_string<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    let mut children = element.children();
    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }
    match only.value() {
        Node::Text(text) => Some(&*text.text),
        Node::Element(_) => ElementRef::wrap(only).and_then(single_string),
        _ => None,
    }
}

pub fn selector(css: &str) -> ExtractResult<Selector> {
    Selector::parse(css).ok().context(InvalidSelectorSnafu { css })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        doc.select(&selector(css).unwrap()).next().unwrap()
    }

    #[test]
    fn container_is_the_first_ancestor_with_a_table() {
        let doc = Html::parse_document(
            r#"<div id="outer"><div id="inner"><h2>Executive Board</h2></div>
               <table><tr><td>x</td></tr></table></div>"#,
        );
        let heading = first(&doc, "h2");
        let container = find_container(heading).unwrap();
        assert_eq!(container.value().attr("id"), Some("outer"));
    }

    #[test]
    fn container_missing_without_table() {
        let doc = Html::parse_document("<div><h2>Nothing here</h2></div>");
        assert!(find_container(first(&doc, "h2")).is_none());
    }

    #[test]
    fn ancestors() {
        let doc = Html::parse_document(
            "<table><tbody><tr><td><strong>Executive Board</strong></td></tr></tbody></table>",
        );
        let strong = first(&doc, "strong");
        let td = find_parent_tag(strong, "td").unwrap();
        assert!(is_tag(&td, "td"));
        let tbody = nth_ancestor(td, 2).unwrap();
        assert!(is_tag(&tbody, "tbody"));
        assert!(find_parent_tag(strong, "section").is_none());
    }

    #[test]
    fn text_helpers() {
        let doc = Html::parse_document(
            "<p id=a>Alice</p><p id=b><strong>Bob</strong></p><p id=c>Carl <em>D</em></p><p id=d></p>",
        );
        assert_eq!(first_text(first(&doc, "#a")), Some("Alice"));
        assert_eq!(first_text(first(&doc, "#b")), None);
        assert_eq!(first_text(first(&doc, "#c")), Some("Carl "));

        assert_eq!(single_string(first(&doc, "#a")), Some("Alice"));
        assert_eq!(single_string(first(&doc, "#b")), Some("Bob"));
        assert_eq!(single_string(first(&doc, "#c")), None);
        assert_eq!(single_string(first(&doc, "#d")), None);
    }
}
