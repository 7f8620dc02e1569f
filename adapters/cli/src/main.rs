#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Signal Grid simulation.

mod config;
mod placement;
mod text_backend;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use log::{debug, info};
use signal_grid_core::Event;
use signal_grid_rendering::{palette, Presentation, RenderingBackend, Scene};
use signal_grid_session::{EditInput, Session};

use crate::{
    config::SimulationConfig,
    placement::{ArrowPlacement, ElementPlacement},
    text_backend::TextBackend,
};

/// Command-line arguments for the headless simulation.
#[derive(Debug, Parser)]
#[command(name = "signal-grid", about = "Runs the Signal Grid simulation headlessly")]
struct CliArgs {
    /// TOML file with simulation settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Overrides the number of grid columns.
    #[arg(long)]
    columns: Option<u32>,
    /// Overrides the number of grid rows.
    #[arg(long)]
    rows: Option<u32>,
    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = 20)]
    ticks: u32,
    /// Overrides the spawn seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Disables automatic spawning.
    #[arg(long)]
    no_spawn: bool,
    /// Arrow placed before the run, as `x,y,direction`.
    #[arg(long = "arrow", value_name = "X,Y,DIR")]
    arrows: Vec<ArrowPlacement>,
    /// Element placed before the run, as `x,y,tool`.
    #[arg(long = "element", value_name = "X,Y,TOOL")]
    elements: Vec<ElementPlacement>,
    /// Prints the final frame as text.
    #[arg(long)]
    frame: bool,
    /// Prints how the projected path from every column terminates.
    #[arg(long)]
    paths: bool,
}

/// Tallies of the events observed during a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct RunReport {
    ticks: u64,
    spawned: u32,
    completed: u32,
    exited: u32,
    converted: u32,
    parked: u32,
}

impl RunReport {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TimeAdvanced { tick } => self.ticks = *tick,
                Event::SignalQueued { .. } => self.spawned += 1,
                Event::SignalCompleted { .. } => self.completed += 1,
                Event::SignalExited { .. } => self.exited += 1,
                Event::SignalConverted { .. } => self.converted += 1,
                Event::SignalParked { .. } => self.parked += 1,
                _ => {}
            }
        }
    }
}

/// Entry point for the Signal Grid command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let config = resolve_config(&args)?;
    let mapper = config.mapper()?;

    let mut session = Session::new(config.session_config());
    let commands = config
        .arrows
        .iter()
        .map(ArrowPlacement::command)
        .chain(config.elements.iter().map(ElementPlacement::command));
    for command in commands {
        for event in session.apply(command) {
            if let Event::EditRejected { cell, error } = event {
                bail!(
                    "cannot edit cell ({}, {}): {error}",
                    cell.column(),
                    cell.row()
                );
            }
        }
    }

    info!(
        "running {} ticks on a {}x{} board",
        args.ticks, config.columns, config.rows
    );

    let scene = Scene::capture(
        session.board(),
        &session.signals(),
        &session.input_queue(),
        session.preview_paths(&mapper),
        &mapper,
    );
    let presentation = Presentation::new("Signal Grid", palette::BACKGROUND, scene);

    let mut report = RunReport::default();
    TextBackend::new(args.ticks, config.tick_interval(), args.frame).run(
        presentation,
        |dt, input, scene| {
            let edit = EditInput {
                cursor_cell: input.cursor_cell(&mapper),
                click: input.click,
                dropped_element: input.dropped_element,
                clear_element: false,
            };
            let edits = session.edit(edit);
            if !edits.is_empty() {
                debug!("frame input produced {} edit events", edits.len());
            }

            report.record(&session.advance(dt));
            *scene = Scene::capture(
                session.board(),
                &session.signals(),
                &session.input_queue(),
                session.preview_paths(&mapper),
                &mapper,
            );
        },
    )?;

    if args.paths {
        for column in 0..config.columns {
            let projection = session.projection(column);
            println!(
                "column {column}: {:?} after {} steps",
                projection.termination,
                projection.steps()
            );
        }
    }

    let active = session.signals().active().count();
    println!("ticks: {}", report.ticks);
    println!("spawned: {}", report.spawned);
    println!("completed: {}", report.completed);
    println!("exited: {}", report.exited);
    println!("converted: {}", report.converted);
    println!("parked: {}", report.parked);
    println!("active: {active}");
    println!("queued: {}", session.input_queue().len());
    Ok(())
}

fn resolve_config(args: &CliArgs) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    if let Some(columns) = args.columns {
        config.columns = columns;
    }
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.no_spawn {
        config.spawning = false;
    }
    config.arrows.extend(args.arrows.iter().copied());
    config.elements.extend(args.elements.iter().copied());
    config.validate()?;
    Ok(config)
}
