//! muxsave — tmux layout persistence
//!
//! Decodes tmux window layout strings into pane trees, re-encodes them
//! with a fresh checksum, and saves whole sessions to a description file.

// Error documentation is deferred - the errors are self-explanatory from types
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod layout;
pub mod session;
pub mod tmux;

pub use cli::{Cli, Command};
pub use layout::{decode, encode, LayoutError, Node, Orientation, Rect};
pub use session::{Session, SessionError, Window};
pub use tmux::{Tmux, TmuxError};
