//! Recursive-descent parser for layout bodies.
//!
//! ```text
//! node       := dimensions ( ',' int | '[' node_list ']' | '{' node_list '}' )
//! dimensions := int 'x' int ',' int ',' int
//! node_list  := node ( ',' node )*
//! int        := '0' | [1-9] [0-9]*
//! ```

use super::node::{Node, Orientation, Pane, Rect, Split};
use super::LayoutError;

/// Parse a layout body (no checksum prefix) into a tree.
///
/// The whole input must be consumed.
pub fn parse(body: &str) -> Result<Node, LayoutError> {
    let mut cursor = Cursor::new(body);
    let node = cursor.node()?;
    if !cursor.at_end() {
        return Err(cursor.error("end of layout"));
    }
    Ok(node)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    const fn new(source: &'a str) -> Self {
        Self {
            bytes: source.as_bytes(),
            offset: 0,
        }
    }

    const fn at_end(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.offset).copied()
    }

    const fn error(&self, expected: &'static str) -> LayoutError {
        LayoutError::Syntax {
            offset: self.offset,
            expected,
        }
    }

    fn expect(&mut self, byte: u8, expected: &'static str) -> Result<(), LayoutError> {
        if self.peek() == Some(byte) {
            self.offset += 1;
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    fn node(&mut self) -> Result<Node, LayoutError> {
        let area = self.dimensions()?;

        match self.peek() {
            Some(b',') => {
                self.offset += 1;
                let id = self.int()?;
                Ok(Node::Pane(Pane::new(area, id)))
            }
            Some(c) => match Orientation::from_open(c) {
                Some(orientation) => {
                    self.offset += 1;
                    let children = self.node_list(orientation)?;
                    Split::new(area, orientation, children).map(Node::Split)
                }
                None => Err(self.error("',', '[' or '{'")),
            },
            None => Err(self.error("',', '[' or '{'")),
        }
    }

    /// Children up to and including the closing bracket.
    fn node_list(&mut self, orientation: Orientation) -> Result<Vec<Node>, LayoutError> {
        let mut children = vec![self.node()?];
        loop {
            match self.peek() {
                Some(b',') => {
                    self.offset += 1;
                    children.push(self.node()?);
                }
                Some(c) if char::from(c) == orientation.close() => {
                    self.offset += 1;
                    return Ok(children);
                }
                _ => {
                    return Err(self.error(match orientation {
                        Orientation::Horizontal => "',' or ']'",
                        Orientation::Vertical => "',' or '}'",
                    }));
                }
            }
        }
    }

    fn dimensions(&mut self) -> Result<Rect, LayoutError> {
        let width = self.int()?;
        self.expect(b'x', "'x'")?;
        let height = self.int()?;
        self.expect(b',', "','")?;
        let x = self.int()?;
        self.expect(b',', "','")?;
        let y = self.int()?;
        Ok(Rect::new(x, y, width, height))
    }

    fn int(&mut self) -> Result<u32, LayoutError> {
        let start = self.offset;
        let mut value: u32 = 0;
        while let Some(c) = self.peek().filter(u8::is_ascii_digit) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(c - b'0')))
                .ok_or_else(|| self.error("integer that fits in 32 bits"))?;
            self.offset += 1;
        }
        if self.offset == start {
            return Err(self.error("digit"));
        }
        // Leading zeros would not survive a render.
        if self.bytes[start] == b'0' && self.offset - start > 1 {
            return Err(LayoutError::Syntax {
                offset: start,
                expected: "integer without leading zeros",
            });
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syntax_offset(body: &str) -> usize {
        match parse(body) {
            Err(LayoutError::Syntax { offset, .. }) => offset,
            other => panic!("expected syntax error for {body:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_single_leaf() {
        let node = parse("80x24,0,0,5").expect("parse");
        assert_eq!(node, Node::Pane(Pane::new(Rect::new(0, 0, 80, 24), 5)));
    }

    #[test]
    fn test_braces_are_vertical() {
        let node = parse("80x24,0,0{40x24,0,0,1,40x24,40,0,2}").expect("parse");
        assert_eq!(node.orientation(), Some(Orientation::Vertical));
        assert_eq!(node.id(), None);
        let ids: Vec<Option<u32>> = node.children().iter().map(Node::id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
        assert_eq!(node.children()[1].area(), Rect::new(40, 0, 40, 24));
    }

    #[test]
    fn test_brackets_are_horizontal() {
        let node = parse("80x24,0,0[80x12,0,0,1,80x11,0,13,2]").expect("parse");
        assert_eq!(node.orientation(), Some(Orientation::Horizontal));
        assert_eq!(node.leaf_count(), 2);
    }

    #[test]
    fn test_nested() {
        let node = parse("80x24,0,0[80x12,0,0,1,80x11,0,13{40x11,0,13,2,39x11,41,13,3}]")
            .expect("parse");
        let inner = &node.children()[1];
        assert_eq!(inner.orientation(), Some(Orientation::Vertical));
        assert_eq!(inner.children().len(), 2);
        assert_eq!(node.find_by_id(3).map(Node::area), Some(Rect::new(41, 13, 39, 11)));
    }

    #[test]
    fn test_single_child_split() {
        let node = parse("10x10,0,0{10x10,0,0,4}").expect("parse");
        assert_eq!(node.children().len(), 1);
    }

    #[test]
    fn test_zero_extent_is_parseable() {
        let node = parse("0x0,0,0,0").expect("parse");
        assert_eq!(node.area(), Rect::default());
    }

    #[test]
    fn test_exclusivity_holds_for_parsed_nodes() {
        let node = parse("80x24,0,0[80x12,0,0,1,80x11,0,13{40x11,0,13,2,39x11,41,13,3}]")
            .expect("parse");
        for n in node.nodes() {
            let leaf = n.id().is_some();
            let internal = n.orientation().is_some() && !n.children().is_empty();
            assert!(leaf ^ internal, "node {n:?} is neither or both");
        }
    }

    #[test]
    fn test_unterminated_nest() {
        assert_eq!(syntax_offset("80x24,0,0["), 10);
        assert_eq!(syntax_offset("80x24,0,0{40x24,0,0,1"), 21);
    }

    #[test]
    fn test_mismatched_bracket() {
        assert_eq!(syntax_offset("80x24,0,0{40x24,0,0,1]"), 21);
    }

    #[test]
    fn test_empty_child_list() {
        assert_eq!(syntax_offset("80x24,0,0{}"), 10);
    }

    #[test]
    fn test_leaf_missing_id() {
        assert_eq!(syntax_offset("80x24,0,0"), 9);
        assert_eq!(syntax_offset("80x24,0,0,"), 10);
    }

    #[test]
    fn test_missing_separators() {
        assert_eq!(syntax_offset("80,24,0,0,1"), 2);
        assert_eq!(syntax_offset("80x24;0,0,1"), 5);
        assert_eq!(syntax_offset(""), 0);
        assert_eq!(syntax_offset("x24,0,0,1"), 0);
    }

    #[test]
    fn test_signs_rejected() {
        assert_eq!(syntax_offset("-80x24,0,0,1"), 0);
        assert_eq!(syntax_offset("80x24,+0,0,1"), 6);
    }

    #[test]
    fn test_trailing_input() {
        assert_eq!(syntax_offset("80x24,0,0,5,"), 11);
        assert_eq!(syntax_offset("80x24,0,0,5]"), 11);
        assert_eq!(syntax_offset("80x24,0,0{40x24,0,0,1}x"), 22);
    }

    #[test]
    fn test_leading_zeros_rejected() {
        assert_eq!(syntax_offset("080x24,0,0,5"), 0);
        assert_eq!(syntax_offset("80x24,0,00,5"), 8);
        assert!(parse("80x24,0,0,0").is_ok());
    }

    #[test]
    fn test_integer_overflow() {
        assert_eq!(syntax_offset("4294967296x24,0,0,1"), 9);
        assert!(parse("4294967295x24,0,0,1").is_ok());
    }
}
