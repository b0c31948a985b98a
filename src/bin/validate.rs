//! Offline tree checker
//!
//! Usage: `voxbot-validate [--root <id>] [path/to/tree.json]`. Without a path
//! the bundled tree is checked. Exits non-zero when any issue is found.

use clap::Parser;
use std::process::ExitCode;
use voxbot::tree::{validate, NodeStore, DEFAULT_ROOT};

#[derive(Parser, Debug)]
#[command(name = "voxbot-validate")]
#[command(about = "Check a decision tree for broken references and unreachable nodes", long_about = None)]
struct Args {
    /// Tree file to check; the bundled tree when omitted
    path: Option<String>,

    /// Id of the root node
    #[arg(long, default_value = DEFAULT_ROOT)]
    root: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let loaded = match &args.path {
        Some(path) => NodeStore::load(path, args.root.as_str()),
        None => NodeStore::bundled(args.root.as_str()),
    };
    let store = match loaded {
        Ok(store) => store,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    let issues = validate(&store);
    let source = args.path.as_deref().unwrap_or("bundled tree");
    if issues.is_empty() {
        println!("{source}: {} nodes, no issues", store.len());
        return ExitCode::SUCCESS;
    }

    for issue in &issues {
        println!("{issue}");
    }
    println!("{source}: {} nodes, {} issue(s)", store.len(), issues.len());
    ExitCode::FAILURE
}
