#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Rewind in the terminal.

mod rules;
mod scene;
mod terminal;

use std::{
    fs,
    io::{self, BufRead, Cursor},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rewind_core::WELCOME_BANNER;
use rewind_rendering::{Presentation, RenderingBackend};
use rewind_system_session::Session;
use rewind_world::{query, State};

use crate::terminal::TerminalBackend;

/// Level played when no map file is provided.
const DEMO_MAP: &str = include_str!("../maps/demo.txt");

/// Command-line arguments accepted by the Rewind binary.
#[derive(Debug, Parser)]
#[command(author, version, about = "Turn-based dungeon crawl with a rewind key")]
struct CliArgs {
    /// Text map to play instead of the built-in level.
    #[arg(long, value_name = "FILE")]
    map: Option<PathBuf>,
    /// TOML file overriding the gameplay rules.
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,
    /// Seed for the combat damage rolls.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Whitespace-separated keys to play instead of reading stdin.
    #[arg(long, value_name = "KEYS")]
    script: Option<String>,
}

/// Entry point for the Rewind command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    let rules = rules::load(args.rules.as_deref())?;
    let map = match &args.map {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read map file {}", path.display()))?,
        None => DEMO_MAP.to_owned(),
    };
    let state = State::from_map(map.trim_end_matches(['\n', '\r']), &rules)
        .context("failed to load map")?;
    let (width, height) = query::dimensions(&state);
    info!("loaded {width}x{height} map, combat seed {}", args.seed);

    let mut session = Session::new(state, args.seed);
    let presentation = Presentation::new(WELCOME_BANNER, scene::capture(&session)?);

    let input: Box<dyn BufRead> = match args.script {
        Some(script) => Box::new(Cursor::new(
            script.split_whitespace().collect::<Vec<_>>().join("\n"),
        )),
        None => Box::new(io::stdin().lock()),
    };
    let backend = TerminalBackend::new(input, io::stdout().lock());

    backend.run(presentation, |input, scene| {
        let _ = session.handle(&input.key);
        *scene = scene::capture(&session)?;
        Ok(())
    })
}
