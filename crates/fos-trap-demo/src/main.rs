//! fOS Focus Trap Demo - Main Entry Point
//!
//! Usage: `fos-trap-demo [options.json]`, then type commands:
//! `tab`, `shift-tab`, `esc`, `key <name>`, `focus <id>`, `toggle <flag>`,
//! `add <selector>`, `remove <selector|index>`, `list`, `quit`.

mod command;
mod page;

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use fos_focus_trap::ScopeOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::command::Command;
use crate::page::Demo;

fn load_options(path: Option<String>) -> Result<ScopeOptions> {
    let Some(path) = path else {
        return Ok(ScopeOptions::default());
    };
    let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let options = ScopeOptions::from_json(&json).with_context(|| format!("parsing {path}"))?;
    info!("loaded scope options from {}", path);
    Ok(options)
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let options = load_options(std::env::args().nth(1))?;
    let mut demo = Demo::new(options)?;

    println!("{}", demo.status());

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                warn!("{}", err);
                continue;
            }
        };
        match demo.run(command) {
            Ok(true) => println!("{}", demo.status()),
            Ok(false) => break,
            Err(err) => warn!("{:#}", err),
        }
    }

    info!("bye");
    Ok(())
}
