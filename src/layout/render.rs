//! Layout body serializer.

use std::fmt;

use super::node::Node;
use super::LayoutError;

/// Render a tree back into a layout body, the inverse of [`super::parse`].
///
/// Children are emitted in their current order.
pub fn render(node: &Node) -> Result<String, LayoutError> {
    let mut out = String::new();
    write_node(&mut out, node)?;
    Ok(out)
}

fn write_node(out: &mut String, node: &Node) -> Result<(), LayoutError> {
    let area = node.area();
    out.push_str(&format!(
        "{}x{},{},{}",
        area.width, area.height, area.x, area.y
    ));

    match node {
        Node::Pane(pane) => {
            out.push_str(&format!(",{}", pane.id));
        }
        Node::Split(split) => {
            if split.children.is_empty() {
                return Err(LayoutError::InvalidState(format!(
                    "split at {},{} has no children",
                    area.x, area.y
                )));
            }
            out.push(split.orientation.open());
            for (i, child) in split.children.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_node(out, child)?;
            }
            out.push(split.orientation.close());
        }
    }
    Ok(())
}

/// Writes the layout body.
///
/// Formatting fails on an empty split, which makes `to_string()` panic;
/// call [`render`] or [`super::encode`] when the tree may be invalid.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = render(self).map_err(|_| fmt::Error)?;
        f.write_str(&body)
    }
}
