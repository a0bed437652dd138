//! Random rollouts with the incremental legal-move index.
//!
//! Usage: rollout [--variant NAME] [--games N] [--seed S] [--check-every N]
//!
//! `--games 0` plays until Ctrl-C.

use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use polytile_core::{Registry, Variant};
use polytile_tools::rollout::{Rollout, RolloutConfig};
use polytile_tools::{flag_number, flag_value};

static REGISTRY: Registry = Registry::new();

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let variant: Variant = flag_value(&args, "--variant")?.unwrap_or("classic").parse()?;
    let config = RolloutConfig {
        variant,
        seed: flag_number(&args, "--seed", 1)?,
        games: flag_number(&args, "--games", 100)?,
        check_interval: flag_number(&args, "--check-every", 16)?,
        log_interval_secs: 5,
    };

    println!("Polytile Rollout");
    println!("================");
    println!("Variant: {}", variant);
    if config.games == 0 {
        println!("Games: until interrupted");
    } else {
        println!("Games: {}", config.games);
    }
    println!("Fresh check every {} plies\n", config.check_interval);

    // Set up SIGINT handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        println!("\n\nInterrupt received, finishing...");
        r.store(false, Ordering::SeqCst);
    })
    .context("Error setting Ctrl-C handler")?;

    let build_start = Instant::now();
    let bc = Arc::clone(REGISTRY.for_variant(variant));
    println!(
        "Built tables: {} moves in {:.2}s\n",
        bc.nu_moves() - 1,
        build_start.elapsed().as_secs_f64()
    );

    let mut rollout = Rollout::new(config, bc);
    let start = Instant::now();
    let completed = rollout.run(running);

    println!("\n================");
    println!("Rollout {}", if completed == config.games { "complete" } else { "stopped" });
    println!("================");
    println!("Time: {:.2}s", start.elapsed().as_secs_f64());
    println!();
    rollout.stats.print_summary();

    if rollout.stats.mismatches > 0 {
        bail!(
            "{} cross-checks found followup lists differing from fresh rebuilds",
            rollout.stats.mismatches
        );
    }
    Ok(())
}
