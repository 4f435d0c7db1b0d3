//! Saved sessions and the session description file.
//!
//! A session file stores each window as its root geometry plus a flat,
//! pre-order list of the panes below it. Every pane points back at its
//! immediate parent by position, size, and orientation, and records its
//! depth below the root so that splits sharing an ancestor's geometry are
//! not confused with it.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::layout::{self, LayoutError, Node, Orientation, Pane, Rect, Split};

/// Errors from loading or saving a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed session file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("invalid session record: {0}")]
    InvalidRecord(String),
}

/// One multiplexer window: a named layout tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub name: Option<String>,
    pub root: Node,
}

impl Window {
    #[must_use]
    pub const fn new(name: Option<String>, root: Node) -> Self {
        Self { name, root }
    }

    /// Full layout string (checksum prefix included) for this window.
    pub fn layout(&self) -> Result<String, LayoutError> {
        layout::encode(&self.root)
    }
}

/// A saved multiplexer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub name: String,
    pub windows: Vec<Window>,
}

impl Session {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            windows: Vec::new(),
        }
    }

    /// Normalize pane order in every window.
    pub fn sort(&mut self) {
        for window in &mut self.windows {
            window.root.sort();
        }
    }

    /// Total number of panes across all windows.
    #[must_use]
    pub fn pane_count(&self) -> usize {
        self.windows.iter().map(|w| w.root.leaf_count()).sum()
    }

    /// Read a session from a description file.
    pub fn load_from(path: &Path) -> Result<Self, SessionError> {
        let text = fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: SessionFile = serde_json::from_str(&text)?;
        let session = Self::try_from(file)?;
        debug!(
            path = %path.display(),
            windows = session.windows.len(),
            "loaded session"
        );
        Ok(session)
    }

    /// Write the session to a description file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&SessionFile::from(self))?;
        fs::write(path, json + "\n").map_err(io_err)?;
        info!(
            path = %path.display(),
            windows = self.windows.len(),
            panes = self.pane_count(),
            "saved session"
        );
        Ok(())
    }
}

/// `name:` followed by one indented line per window.
///
/// Formatting fails if a window holds an empty split, which makes
/// `to_string()` panic; use [`Window::layout`] when the trees may be invalid.
impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for window in &self.windows {
            let layout = window.layout().map_err(|_| fmt::Error)?;
            match &window.name {
                Some(name) => write!(f, "\n {name}: {layout}")?,
                None => write!(f, "\n {layout}")?,
            }
        }
        Ok(())
    }
}

/// On-disk form of a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFile {
    pub name: String,
    #[serde(default)]
    pub windows: Vec<WindowRecord>,
}

/// On-disk form of a [`Window`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub pos: (u32, u32),
    pub size: (u32, u32),
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Descendants of the window root, pre-order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub panes: Vec<PaneRecord>,
}

/// A pane or split below a window root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneRecord {
    pub pos: (u32, u32),
    pub size: (u32, u32),
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,
    /// Nesting depth below the window root (1 for the root's children).
    /// Files without it fall back to the nearest ancestor matching `parent`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,
}

/// Back-reference from a pane record to its immediate parent split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    pub pos: (u32, u32),
    pub size: (u32, u32),
    pub orientation: Orientation,
}

impl ParentRef {
    fn matches(&self, area: Rect, orientation: Orientation) -> bool {
        self.pos == area.position() && self.size == area.size() && self.orientation == orientation
    }
}

impl From<&Session> for SessionFile {
    fn from(session: &Session) -> Self {
        Self {
            name: session.name.clone(),
            windows: session.windows.iter().map(WindowRecord::from).collect(),
        }
    }
}

impl From<&Window> for WindowRecord {
    fn from(window: &Window) -> Self {
        let area = window.root.area();
        let mut panes = Vec::new();
        flatten_children(&window.root, 1, &mut panes);
        Self {
            name: window.name.clone(),
            pos: area.position(),
            size: area.size(),
            orientation: window.root.orientation(),
            id: window.root.id(),
            panes,
        }
    }
}

fn flatten_children(node: &Node, depth: usize, out: &mut Vec<PaneRecord>) {
    let Node::Split(split) = node else {
        return;
    };
    let parent = ParentRef {
        pos: split.area.position(),
        size: split.area.size(),
        orientation: split.orientation,
    };
    for child in &split.children {
        let area = child.area();
        out.push(PaneRecord {
            pos: area.position(),
            size: area.size(),
            orientation: child.orientation(),
            id: child.id(),
            parent: Some(parent),
            depth: Some(depth),
        });
        flatten_children(child, depth + 1, out);
    }
}

impl TryFrom<SessionFile> for Session {
    type Error = SessionError;

    fn try_from(file: SessionFile) -> Result<Self, Self::Error> {
        let windows = file
            .windows
            .into_iter()
            .map(Window::try_from)
            .collect::<Result<_, _>>()?;
        Ok(Self {
            name: file.name,
            windows,
        })
    }
}

/// A split whose children are still being collected.
struct OpenSplit {
    area: Rect,
    orientation: Orientation,
    children: Vec<Node>,
}

impl OpenSplit {
    fn close(self) -> Result<Node, LayoutError> {
        Split::new(self.area, self.orientation, self.children).map(Node::Split)
    }
}

impl TryFrom<WindowRecord> for Window {
    type Error = SessionError;

    fn try_from(record: WindowRecord) -> Result<Self, Self::Error> {
        let root_area = rect(record.pos, record.size);
        let orientation = match RecordKind::of(record.orientation, record.id, "window root")? {
            RecordKind::Split(orientation) => orientation,
            RecordKind::Pane(id) => {
                if !record.panes.is_empty() {
                    return Err(SessionError::InvalidRecord(
                        "window root is a pane but lists child panes".into(),
                    ));
                }
                return Ok(Self::new(record.name, Node::Pane(Pane::new(root_area, id))));
            }
        };

        // Ancestors of the next record, innermost last.
        let mut stack = vec![OpenSplit {
            area: root_area,
            orientation,
            children: Vec::new(),
        }];

        for pane in record.panes {
            let parent = pane.parent.ok_or_else(|| {
                SessionError::InvalidRecord(format!(
                    "pane at {},{} has no parent reference",
                    pane.pos.0, pane.pos.1
                ))
            })?;
            let unknown_parent = || {
                SessionError::InvalidRecord(format!(
                    "pane at {},{} refers to unknown parent at {},{}",
                    pane.pos.0, pane.pos.1, parent.pos.0, parent.pos.1
                ))
            };
            // Index of the parent on the stack; the root sits at 0.
            let index = match pane.depth {
                Some(depth) => depth
                    .checked_sub(1)
                    .filter(|&i| {
                        stack
                            .get(i)
                            .is_some_and(|open| parent.matches(open.area, open.orientation))
                    })
                    .ok_or_else(unknown_parent)?,
                None => stack
                    .iter()
                    .rposition(|open| parent.matches(open.area, open.orientation))
                    .ok_or_else(unknown_parent)?,
            };
            close_to(&mut stack, index + 1)?;

            let area = rect(pane.pos, pane.size);
            match RecordKind::of(pane.orientation, pane.id, "pane")? {
                RecordKind::Split(orientation) => stack.push(OpenSplit {
                    area,
                    orientation,
                    children: Vec::new(),
                }),
                RecordKind::Pane(id) => {
                    if let Some(open) = stack.last_mut() {
                        open.children.push(Node::Pane(Pane::new(area, id)));
                    }
                }
            }
        }

        close_to(&mut stack, 1)?;
        let root = stack
            .pop()
            .ok_or_else(|| SessionError::InvalidRecord("window has no root".into()))?
            .close()?;
        Ok(Self::new(record.name, root))
    }
}

/// Close open splits until `len` remain, attaching each to its parent.
fn close_to(stack: &mut Vec<OpenSplit>, len: usize) -> Result<(), LayoutError> {
    while stack.len() > len {
        if let Some(open) = stack.pop() {
            let node = open.close()?;
            if let Some(parent) = stack.last_mut() {
                parent.children.push(node);
            }
        }
    }
    Ok(())
}

/// What a record describes, decided by which of `id`/`orientation` it carries.
enum RecordKind {
    Pane(u32),
    Split(Orientation),
}

impl RecordKind {
    fn of(
        orientation: Option<Orientation>,
        id: Option<u32>,
        what: &str,
    ) -> Result<Self, SessionError> {
        match (orientation, id) {
            (None, Some(id)) => Ok(Self::Pane(id)),
            (Some(orientation), None) => Ok(Self::Split(orientation)),
            (Some(_), Some(_)) => Err(SessionError::InvalidRecord(format!(
                "{what} has both an id and an orientation"
            ))),
            (None, None) => Err(SessionError::InvalidRecord(format!(
                "{what} has neither an id nor an orientation"
            ))),
        }
    }
}

const fn rect(pos: (u32, u32), size: (u32, u32)) -> Rect {
    Rect::new(pos.0, pos.1, size.0, size.1)
}

/// Default location of the description file for a session.
#[must_use]
pub fn default_session_path(session: &str) -> PathBuf {
    let file = format!("{session}.json");
    dirs::data_dir().map_or_else(
        || PathBuf::from(&file),
        |dir| dir.join("muxsave").join(&file),
    )
}
