//! # minirelayd — minirelay daemon
//!
//! Composition root that wires the virtual relay board to the switch core.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Open the device configuration tree
//! - Create the board peripherals, outputs first, then inputs, then meters
//! - Compose the switches, subscribe observers, apply startup policies
//! - Run the stdin console until `quit`, end of input or Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod board;
mod config;
mod console;

use std::rc::Rc;
use std::time::Duration;

use minirelay_adapter_storage_json::JsonFileConfigStore;
use minirelay_adapter_virtual::{VirtualOutput, VirtualPowerMeter};
use minirelay_adapter_timer_tokio::TokioTimer;
use minirelay_app::bus::StateChangeBus;
use minirelay_app::composition::{Composition, compose};
use minirelay_app::ports::{ConfigStore, Output, StateObserver};
use minirelay_domain::switch::StateChange;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::task::LocalSet;
use tracing_subscriber::EnvFilter;

use crate::board::Board;
use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    LocalSet::new().run_until(run(config)).await
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    // Storage
    let store = Rc::new(JsonFileConfigStore::open(&config.storage.path)?);
    let device = store.load()?;
    tracing::info!(path = %store.path().display(), "configuration loaded");

    // Peripherals
    let (board, peripherals) = Board::build(&config.board, config.power_meter.enabled)?;

    // Switches
    let timer = Rc::new(TokioTimer::new());
    let composition = compose(&device, peripherals, store, timer)?;

    let bus = Rc::new(StateChangeBus::new(64));
    let log_changes: Rc<dyn StateObserver> = Rc::new(|change: &StateChange| {
        tracing::info!(
            switch_id = %change.switch_id,
            state = change.state,
            source = %change.source,
            "switch state changed"
        );
    });
    for switch in composition.switches() {
        switch.subscribe(log_changes.clone());
        switch.subscribe(bus.clone());
    }
    for accessory in composition.accessories() {
        let slots: Vec<_> = accessory.placements.iter().map(|p| p.slot.get()).collect();
        tracing::info!(aid = %accessory.aid, ?slots, "accessory");
    }

    composition.init_all();

    let printer = tokio::task::spawn_local(print_changes(bus.subscribe()));
    let sampler = config.power_meter.enabled.then(|| {
        tokio::task::spawn_local(sample_power(
            board_meters(&board),
            config.power_meter.load_w,
            config.power_meter.interval(),
        ))
    });

    tracing::info!("minirelayd ready, type a command");
    tokio::select! {
        result = console_loop(&composition, &board) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("interrupted"),
    }

    printer.abort();
    if let Some(sampler) = sampler {
        sampler.abort();
    }
    Ok(())
}

async fn console_loop(composition: &Composition, board: &Board) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let outcome = line
            .parse::<console::Command>()
            .and_then(|command| console::execute(command, composition, board));
        match outcome {
            Ok(Some(reply)) => println!("{reply}"),
            Ok(None) => break,
            Err(err) => println!("{}", serde_json::json!({ "error": err.to_string() })),
        }
    }
    Ok(())
}

async fn print_changes(mut rx: broadcast::Receiver<StateChange>) {
    loop {
        match rx.recv().await {
            Ok(change) => match serde_json::to_string(&change) {
                Ok(line) => println!("{line}"),
                Err(err) => tracing::warn!(error = %err, "failed to encode state change"),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "state change printer lagging");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

type MeterHandles = Vec<(Rc<VirtualOutput>, Rc<VirtualPowerMeter>)>;

fn board_meters(board: &Board) -> MeterHandles {
    board
        .meters()
        .filter_map(|(slot, meter)| Some((Rc::clone(board.output(slot)?), Rc::clone(meter))))
        .collect()
}

/// Feed every virtual meter with the simulated load of its relay.
async fn sample_power(meters: MeterHandles, load_w: f64, period: Duration) {
    let hours = period.as_secs_f64() / 3600.0;
    let mut ticker = tokio::time::interval(period);
    loop {
        ticker.tick().await;
        for (output, meter) in &meters {
            let power = if output.state() { load_w } else { 0.0 };
            meter.record(power, hours);
        }
    }
}
