//! Layout tree model.

use serde::{Deserialize, Serialize};

use super::LayoutError;

/// On-screen extent of a window or pane, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Origin as `(x, y)`.
    #[must_use]
    pub const fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    /// Extent as `(width, height)`.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Direction in which a split lays out its children.
///
/// `[...]` in a layout body is `Horizontal`, `{...}` is `Vertical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Bracket that opens a child list of this orientation.
    #[must_use]
    pub const fn open(self) -> char {
        match self {
            Self::Horizontal => '[',
            Self::Vertical => '{',
        }
    }

    /// Bracket that closes a child list of this orientation.
    #[must_use]
    pub const fn close(self) -> char {
        match self {
            Self::Horizontal => ']',
            Self::Vertical => '}',
        }
    }

    /// Orientation introduced by an opening bracket, if `c` is one.
    #[must_use]
    pub const fn from_open(c: u8) -> Option<Self> {
        match c {
            b'[' => Some(Self::Horizontal),
            b'{' => Some(Self::Vertical),
            _ => None,
        }
    }
}

/// A leaf of the layout: one pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pane {
    pub area: Rect,
    pub id: u32,
}

impl Pane {
    #[must_use]
    pub const fn new(area: Rect, id: u32) -> Self {
        Self { area, id }
    }
}

/// An internal node: a split holding one or more children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub area: Rect,
    pub orientation: Orientation,
    pub children: Vec<Node>,
}

impl Split {
    /// Build a split, refusing an empty child list.
    pub fn new(
        area: Rect,
        orientation: Orientation,
        children: Vec<Node>,
    ) -> Result<Self, LayoutError> {
        if children.is_empty() {
            return Err(LayoutError::InvalidState(format!(
                "split at {},{} has no children",
                area.x, area.y
            )));
        }
        Ok(Self {
            area,
            orientation,
            children,
        })
    }
}

/// A window or pane in the layout tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Pane(Pane),
    Split(Split),
}

impl Node {
    #[must_use]
    pub const fn area(&self) -> Rect {
        match self {
            Self::Pane(pane) => pane.area,
            Self::Split(split) => split.area,
        }
    }

    /// Pane id; `None` for splits.
    #[must_use]
    pub const fn id(&self) -> Option<u32> {
        match self {
            Self::Pane(pane) => Some(pane.id),
            Self::Split(_) => None,
        }
    }

    /// Split orientation; `None` for panes.
    #[must_use]
    pub const fn orientation(&self) -> Option<Orientation> {
        match self {
            Self::Pane(_) => None,
            Self::Split(split) => Some(split.orientation),
        }
    }

    /// Direct children, empty for panes.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Pane(_) => &[],
            Self::Split(split) => &split.children,
        }
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Pane(_))
    }

    /// Number of panes below this node (1 for a pane).
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// First node carrying `id`, searching pre-order, children left to right.
    #[must_use]
    pub fn find_by_id(&self, id: u32) -> Option<&Self> {
        self.nodes().find(|node| node.id() == Some(id))
    }

    /// Sort every child list by `(x, y)`, recursively.
    ///
    /// The sort is stable, so children sharing an origin keep their order.
    pub fn sort(&mut self) {
        if let Self::Split(split) = self {
            split.children.sort_by_key(|child| child.area().position());
            for child in &mut split.children {
                child.sort();
            }
        }
    }

    /// All nodes, pre-order, children left to right.
    #[must_use]
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes { stack: vec![self] }
    }

    /// All panes, left to right.
    #[must_use]
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            nodes: self.nodes(),
        }
    }
}

/// Pre-order iterator over a layout tree.
pub struct Nodes<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// Iterator over the panes of a layout tree.
pub struct Leaves<'a> {
    nodes: Nodes<'a>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Pane;

    fn next(&mut self) -> Option<Self::Item> {
        self.nodes.find_map(|node| match node {
            Node::Pane(pane) => Some(pane),
            Node::Split(_) => None,
        })
    }
}
