//! tmux integration.
//!
//! Queries a running tmux server for the current session and its window
//! layouts, and hands the raw layout strings to the codec.

use std::process::Command;

use tracing::{debug, warn};

use crate::layout::{self, LayoutError};
use crate::session::{Session, Window};

/// Errors that can occur while talking to tmux.
#[derive(Debug, thiserror::Error)]
pub enum TmuxError {
    #[error("tmux not found in PATH")]
    NotFound,

    #[error("tmux command failed: {0}")]
    Failed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("window {window:?} has an unusable layout: {source}")]
    Layout {
        window: String,
        #[source]
        source: LayoutError,
    },
}

/// One line of `list-windows` output, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawWindow {
    pub name: String,
    pub layout: String,
}

/// Format passed to `list-windows -F`: window name, tab, layout.
// The format string uses tmux's #{var} syntax, not Rust's
#[allow(clippy::literal_string_with_formatting_args)]
const LIST_WINDOWS_FORMAT: &str = "#{window_name}\t#{window_layout}";

/// Split `list-windows` output into windows.
///
/// Blank lines are skipped. Each line is split on its last tab, so window
/// names containing tabs survive; a line without a tab is taken to be a
/// bare layout with no name.
#[must_use]
pub fn parse_list_windows(output: &str) -> Vec<RawWindow> {
    output
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.rsplit_once('\t') {
            Some((name, layout)) => RawWindow {
                name: name.to_string(),
                layout: layout.trim().to_string(),
            },
            None => RawWindow {
                name: String::new(),
                layout: line.trim().to_string(),
            },
        })
        .collect()
}

/// Decode raw windows into a session.
///
/// With `strict`, the first undecodable window aborts; otherwise it is
/// logged and skipped.
pub fn build_session(
    name: &str,
    raw: Vec<RawWindow>,
    strict: bool,
) -> Result<Session, TmuxError> {
    let mut session = Session::new(name);
    for window in raw {
        match layout::decode(&window.layout) {
            Ok(root) => {
                debug!(window = %window.name, panes = root.leaf_count(), "decoded window");
                let name = (!window.name.is_empty()).then_some(window.name);
                session.windows.push(Window::new(name, root));
            }
            Err(source) if strict => {
                return Err(TmuxError::Layout {
                    window: window.name,
                    source,
                });
            }
            Err(e) => warn!(window = %window.name, error = %e, "skipping window"),
        }
    }
    Ok(session)
}

/// Handle on the tmux command-line client.
pub struct Tmux {
    program: String,
}

impl Default for Tmux {
    fn default() -> Self {
        Self::new("tmux")
    }
}

impl Tmux {
    /// Use `program` as the tmux executable.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run tmux with `args` and return its stdout.
    fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
        debug!(program = %self.program, ?args, "running tmux");
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => TmuxError::NotFound,
                _ => TmuxError::Io(e),
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(TmuxError::Failed(format!(
                "{} {}: {}",
                self.program,
                args.first().copied().unwrap_or_default(),
                stderr.trim()
            )))
        }
    }

    /// Name of the session tmux considers current.
    pub fn current_session(&self) -> Result<String, TmuxError> {
        // The format string uses tmux's #{var} syntax, not Rust's
        #[allow(clippy::literal_string_with_formatting_args)]
        let name = self.run(&["display-message", "-p", "#{session_name}"])?;
        Ok(name.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Raw layouts of every window in `session`.
    pub fn window_layouts(&self, session: &str) -> Result<Vec<RawWindow>, TmuxError> {
        let output = self.run(&["list-windows", "-t", session, "-F", LIST_WINDOWS_FORMAT])?;
        Ok(parse_list_windows(&output))
    }

    /// Snapshot a session (the current one when `session` is `None`).
    pub fn capture(&self, session: Option<&str>, strict: bool) -> Result<Session, TmuxError> {
        let name = match session {
            Some(name) => name.to_string(),
            None => self.current_session()?,
        };
        let raw = self.window_layouts(&name)?;
        build_session(&name, raw, strict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_windows() {
        let output = "editor\tb262,80x24,0,0,5\n\nbuild\tf8f9,80x24,0,0{40x24,0,0,1,40x24,40,0,2}\n";
        let windows = parse_list_windows(output);
        assert_eq!(
            windows,
            vec![
                RawWindow {
                    name: "editor".into(),
                    layout: "b262,80x24,0,0,5".into(),
                },
                RawWindow {
                    name: "build".into(),
                    layout: "f8f9,80x24,0,0{40x24,0,0,1,40x24,40,0,2}".into(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_list_windows_edge_cases() {
        let windows = parse_list_windows("a\tb\tb262,80x24,0,0,5\r\nb262,80x24,0,0,5\n  \n");
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].name, "a\tb");
        assert_eq!(windows[0].layout, "b262,80x24,0,0,5");
        assert_eq!(windows[1].name, "");
        assert!(parse_list_windows("").is_empty());
    }

    #[test]
    fn test_build_session_skips_bad_windows() {
        let raw = parse_list_windows("ok\tb262,80x24,0,0,5\nbad\tf0a1,80x24,0,0,5\n\tb263,80x24,0,0,6\n");
        let session = build_session("s", raw, false).expect("lenient");
        assert_eq!(session.windows.len(), 2);
        assert_eq!(session.windows[0].name.as_deref(), Some("ok"));
        assert_eq!(session.windows[1].name, None);
        assert_eq!(session.windows[1].root.id(), Some(6));
    }

    #[test]
    fn test_build_session_strict_aborts() {
        let raw = parse_list_windows("ok\tb262,80x24,0,0,5\nbad\tf0a1,80x24,0,0,5\n");
        let err = build_session("s", raw, true).expect_err("strict");
        match err {
            TmuxError::Layout { window, source } => {
                assert_eq!(window, "bad");
                assert!(matches!(source, LayoutError::ChecksumMismatch { .. }));
            }
            other => panic!("expected layout error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_binary_is_not_found() {
        let tmux = Tmux::new("/nonexistent/muxsave-tmux");
        assert!(matches!(tmux.current_session(), Err(TmuxError::NotFound)));
    }
}
