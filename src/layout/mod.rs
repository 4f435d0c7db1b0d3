//! tmux window layout codec.
//!
//! A full layout string looks like `d463,159x48,0,0{79x48,0,0,0,79x48,80,0,1}`:
//! a 4-hex-digit checksum, a comma, and a body describing the pane tree.
//! [`decode`] validates the checksum and parses the body into a [`Node`];
//! [`encode`] renders a [`Node`] back and prefixes the fresh checksum.

mod checksum;
mod node;
mod parser;
mod render;

pub use checksum::checksum;
pub use node::{Leaves, Node, Nodes, Orientation, Pane, Rect, Split};
pub use parser::parse;
pub use render::render;

use thiserror::Error;

/// Width of the checksum prefix, excluding the separating comma.
const PREFIX_LEN: usize = 4;

/// Errors produced by the layout codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("syntax error at offset {offset}: expected {expected}")]
    Syntax {
        /// Byte offset of the offending character.
        offset: usize,
        /// What the grammar required at that offset.
        expected: &'static str,
    },

    #[error("checksum mismatch: layout declares {declared:04x}, body hashes to {computed:04x}")]
    ChecksumMismatch {
        /// Checksum carried by the layout prefix.
        declared: u16,
        /// Checksum computed over the body.
        computed: u16,
    },

    #[error("invalid layout node: {0}")]
    InvalidState(String),
}

impl LayoutError {
    /// Move a syntax error offset by `by` bytes.
    fn shifted(self, by: usize) -> Self {
        match self {
            Self::Syntax { offset, expected } => Self::Syntax {
                offset: offset + by,
                expected,
            },
            other => other,
        }
    }
}

/// Validate and parse a full layout string (`XXXX,<body>`).
///
/// The checksum is checked before the body is parsed. Syntax error
/// offsets refer to `layout`, not to the body.
pub fn decode(layout: &str) -> Result<Node, LayoutError> {
    let declared = declared_checksum(layout)?;
    let body = &layout[PREFIX_LEN + 1..];

    let computed = checksum(body);
    if declared != computed {
        return Err(LayoutError::ChecksumMismatch { declared, computed });
    }

    parse(body).map_err(|e| e.shifted(PREFIX_LEN + 1))
}

/// Render a node as a full layout string with a lowercase checksum prefix.
pub fn encode(node: &Node) -> Result<String, LayoutError> {
    let body = render(node)?;
    Ok(format!("{:04x},{body}", checksum(&body)))
}

/// Read the hex checksum prefix and check the separator that follows it.
fn declared_checksum(layout: &str) -> Result<u16, LayoutError> {
    let bytes = layout.as_bytes();

    if let Some(offset) = bytes
        .iter()
        .take(PREFIX_LEN)
        .position(|b| !b.is_ascii_hexdigit())
    {
        return Err(LayoutError::Syntax {
            offset,
            expected: "hex checksum digit",
        });
    }
    if bytes.len() < PREFIX_LEN {
        return Err(LayoutError::Syntax {
            offset: bytes.len(),
            expected: "hex checksum digit",
        });
    }
    if bytes.get(PREFIX_LEN) != Some(&b',') {
        return Err(LayoutError::Syntax {
            offset: PREFIX_LEN,
            expected: "',' after checksum",
        });
    }

    let mut raw = [0u8; 2];
    hex::decode_to_slice(&bytes[..PREFIX_LEN], &mut raw).map_err(|_| LayoutError::Syntax {
        offset: 0,
        expected: "hex checksum digit",
    })?;
    Ok(u16::from_be_bytes(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_two_pane_layout() {
        let node = decode("d463,159x48,0,0{79x48,0,0,0,79x48,80,0,1}").expect("decode");
        assert_eq!(node.orientation(), Some(Orientation::Vertical));
        assert_eq!(node.leaf_count(), 2);
        assert_eq!(node.area(), Rect::new(0, 0, 159, 48));
    }

    #[test]
    fn test_decode_checksum_mismatch() {
        let err = decode("f0a1,80x24,0,0,5").expect_err("mismatch");
        assert_eq!(
            err,
            LayoutError::ChecksumMismatch {
                declared: 0xf0a1,
                computed: 0xb262,
            }
        );
    }

    #[test]
    fn test_decode_does_not_parse_on_mismatch() {
        // The body is malformed too, but the checksum is reported first.
        let err = decode("0000,80x24,0,0[").expect_err("mismatch");
        assert!(matches!(err, LayoutError::ChecksumMismatch { declared: 0, .. }));
    }

    #[test]
    fn test_decode_accepts_uppercase_prefix() {
        let node = decode("B262,80x24,0,0,5").expect("decode");
        assert_eq!(node.id(), Some(5));
    }

    #[test]
    fn test_decode_syntax_offset_refers_to_full_layout() {
        let body = "80x24,0,0[";
        let layout = format!("{:04x},{body}", checksum(body));
        let err = decode(&layout).expect_err("unterminated");
        assert_eq!(
            err,
            LayoutError::Syntax {
                offset: 15,
                expected: "digit",
            }
        );
    }

    #[test]
    fn test_decode_bad_prefix() {
        assert!(matches!(
            decode("zz62,80x24,0,0,5"),
            Err(LayoutError::Syntax { offset: 0, .. })
        ));
        assert!(matches!(
            decode("b262;80x24,0,0,5"),
            Err(LayoutError::Syntax { offset: 4, .. })
        ));
        assert!(matches!(
            decode("b26"),
            Err(LayoutError::Syntax { offset: 3, .. })
        ));
        assert!(matches!(decode(""), Err(LayoutError::Syntax { offset: 0, .. })));
    }

    #[test]
    fn test_encode_zero_pads_lowercase() {
        let node = parse("80x24,0,0,5").expect("parse");
        assert_eq!(encode(&node).expect("encode"), "b262,80x24,0,0,5");

        let tiny = Node::Pane(Pane::new(Rect::new(0, 0, 0, 0), 0));
        let encoded = encode(&tiny).expect("encode");
        assert_eq!(&encoded[..5], &format!("{:04x},", checksum("0x0,0,0,0")));
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let node = parse("80x24,0,0[80x12,0,0,1,80x11,0,13{40x11,0,13,2,39x11,41,13,3}]")
            .expect("parse");
        let layout = encode(&node).expect("encode");
        assert!(layout.starts_with("f160,"));
        assert_eq!(decode(&layout).expect("decode"), node);
    }

    #[test]
    fn test_encode_invalid_state() {
        let node = Node::Split(Split {
            area: Rect::new(0, 0, 80, 24),
            orientation: Orientation::Horizontal,
            children: vec![],
        });
        assert!(matches!(encode(&node), Err(LayoutError::InvalidState(_))));
    }
}
