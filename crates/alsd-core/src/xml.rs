use roxmltree::Node;

pub const VALUE_ATTRIBUTE: &str = "Value";

// Paths are `/`-separated element names relative to a node; `*` matches any element.
fn matches_segment(node: &Node<'_, '_>, segment: &str) -> bool {
    node.is_element() && (segment == "*" || node.tag_name().name() == segment)
}

#[must_use]
pub fn find_all<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Vec<Node<'a, 'input>> {
    let mut current = vec![node];
    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        current = current
            .into_iter()
            .flat_map(|parent| parent.children())
            .filter(|child| matches_segment(child, segment))
            .collect();
    }
    current
}

#[must_use]
pub fn find<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
    find_segments(node, &segments)
}

fn find_segments<'a, 'input>(
    node: Node<'a, 'input>,
    segments: &[&str],
) -> Option<Node<'a, 'input>> {
    let Some((segment, rest)) = segments.split_first() else {
        return Some(node);
    };
    node.children()
        .filter(|child| matches_segment(child, segment))
        .find_map(|child| find_segments(child, rest))
}

pub fn elements<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(Node::is_element)
}

/// Elements named `name` anywhere below `node`, excluding `node` itself.
pub fn descendants_named<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.descendants()
        .skip(1)
        .filter(move |descendant| matches_segment(descendant, name))
}

#[must_use]
pub fn has_child(node: Node<'_, '_>, name: &str) -> bool {
    node.children().any(|child| matches_segment(&child, name))
}

#[must_use]
pub fn value_at<'a>(node: Node<'a, '_>, path: &str) -> Option<&'a str> {
    find(node, path).and_then(|element| element.attribute(VALUE_ATTRIBUTE))
}

#[must_use]
pub fn tag(node: Node<'_, '_>) -> String {
    node.tag_name().name().to_string()
}
