//! Decoded document tree.

/// One element of the decoded document.
///
/// `text` is empty when the node carries no text content. Mixed content
/// (a scalar value on an element that also has children, as produced by the
/// nested-element and matrix value kinds) keeps the text here; document
/// order always places it before the children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    /// Element name, taken from the dictionary (or the configured root name).
    pub name: String,
    /// Text content; empty when absent.
    pub text: String,
    /// Child elements in declaration order.
    pub children: Vec<Node>,
}

impl Node {
    /// Create an empty node with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// First child with the given name, if any.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Whether the node carries both text and child elements.
    pub fn has_mixed_content(&self) -> bool {
        !self.text.is_empty() && !self.children.is_empty()
    }
}

/// Move stray leading text of mixed-content nodes into a `value` child.
///
/// The packed format happily stores a scalar on an element that also has
/// children, which plain XML tooling tends to mangle. The rewrite preserves
/// document order: the text was first, the synthetic child stays first.
pub(crate) fn wrap_unnamed_values(node: &mut Node) {
    if node.has_mixed_content() {
        let mut value = Node::new("value");
        value.text = std::mem::take(&mut node.text);
        node.children.insert(0, value);
    }
    for child in &mut node.children {
        wrap_unnamed_values(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, text: &str) -> Node {
        let mut node = Node::new(name);
        node.text = text.to_owned();
        node
    }

    #[test]
    fn test_child_lookup() {
        let mut root = Node::new("root");
        root.children.push(leaf("a", "1"));
        root.children.push(leaf("b", "2"));
        root.children.push(leaf("a", "3"));

        assert_eq!(root.child("a").unwrap().text, "1");
        assert_eq!(root.child("b").unwrap().text, "2");
        assert!(root.child("c").is_none());
    }

    #[test]
    fn test_wrap_unnamed_values() {
        let mut root = Node::new("root");
        root.text = "stray".to_owned();
        root.children.push(leaf("a", "1"));

        // Nested mixed content is rewritten too.
        let mut inner = leaf("b", "deep");
        inner.children.push(leaf("c", "2"));
        root.children.push(inner);

        wrap_unnamed_values(&mut root);

        assert!(root.text.is_empty());
        assert_eq!(root.children[0].name, "value");
        assert_eq!(root.children[0].text, "stray");
        assert_eq!(root.children[1].name, "a");

        let inner = &root.children[2];
        assert!(inner.text.is_empty());
        assert_eq!(inner.children[0].name, "value");
        assert_eq!(inner.children[0].text, "deep");
        assert_eq!(inner.children[1].name, "c");
    }

    #[test]
    fn test_wrap_leaves_plain_nodes_alone() {
        let mut root = Node::new("root");
        root.children.push(leaf("a", "1"));

        let before = root.clone();
        wrap_unnamed_values(&mut root);
        assert_eq!(root, before);
    }
}
