//! muxsave — tmux layout save and inspection

use clap::Parser;
use muxsave::layout::{self, Node};
use muxsave::session::{default_session_path, Session};
use muxsave::{Cli, Command, Tmux};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("muxsave=debug")
    } else {
        EnvFilter::new("muxsave=warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.file, cli.command) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(file: Option<PathBuf>, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Save {
            session,
            strict,
            no_sort,
        } => {
            let tmux = Tmux::default();
            let mut captured = tmux.capture(session.as_deref(), strict)?;
            if !no_sort {
                captured.sort();
            }
            let path = file.unwrap_or_else(|| default_session_path(&captured.name));
            captured.save_to(&path)?;
            info!(session = %captured.name, "session saved");
            println!(
                "Saved {} ({} windows, {} panes) to {}",
                captured.name,
                captured.windows.len(),
                captured.pane_count(),
                path.display()
            );
        }
        Command::Show { session, json } => {
            let path = match (file, session) {
                (Some(path), _) => path,
                (None, Some(name)) => default_session_path(&name),
                (None, None) => default_session_path(&Tmux::default().current_session()?),
            };
            let loaded = Session::load_from(&path)?;
            if json {
                let file = muxsave::session::SessionFile::from(&loaded);
                println!("{}", serde_json::to_string_pretty(&file)?);
            } else {
                println!("{loaded}");
            }
        }
        Command::Decode { layout, json } => {
            let root = layout::decode(layout.trim())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&root)?);
            } else {
                let mut out = String::new();
                write_tree(&mut out, &root, 0);
                print!("{out}");
            }
        }
        Command::Encode { body } => {
            let root = layout::parse(body.trim())?;
            println!("{}", layout::encode(&root)?);
        }
        Command::Checksum { text } => {
            println!("{:04x}", layout::checksum(&text));
        }
    }
    Ok(())
}

/// Indented, one-node-per-line rendering of a tree.
fn write_tree(out: &mut String, node: &Node, depth: usize) {
    let area = node.area();
    let indent = "  ".repeat(depth);
    let geometry = format!("{}x{} at {},{}", area.width, area.height, area.x, area.y);
    match node {
        Node::Pane(pane) => {
            out.push_str(&format!("{indent}pane {} {geometry}\n", pane.id));
        }
        Node::Split(split) => {
            let orientation = match split.orientation {
                layout::Orientation::Horizontal => "horizontal",
                layout::Orientation::Vertical => "vertical",
            };
            out.push_str(&format!("{indent}{orientation} {geometry}\n"));
            for child in &split.children {
                write_tree(out, child, depth + 1);
            }
        }
    }
}
