//! Polytile Move Tables
//!
//! Builds the static move tables of one or all variants, prints their sizes
//! and writes or checks a fingerprint manifest.
//!
//! Usage: tables [--variant NAME] [--json] [--save PATH] [--check PATH]

use std::env;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use polytile_core::{BoardConst, Registry};
use polytile_tools::manifest::{Drift, Manifest, ManifestEntry};
use polytile_tools::stats::{elapsed_prefix, format_bytes, resident_memory};
use polytile_tools::{flag_value, variants_from_args};

static REGISTRY: Registry = Registry::new();

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let json = args.iter().any(|a| a == "--json");
    let save_path = flag_value(&args, "--save")?;
    let check_path = flag_value(&args, "--check")?;
    let variants = variants_from_args(&args)?;

    if !json {
        println!("Polytile Move Tables");
        println!("====================");
        println!();
    }

    let start = Instant::now();
    let mut tables: Vec<Arc<BoardConst>> = Vec::new();
    for variant in variants {
        let bc = REGISTRY.for_variant(variant);
        if !tables.iter().any(|t| Arc::ptr_eq(t, bc)) {
            tables.push(Arc::clone(bc));
        }
        if json {
            let mut summary = serde_json::to_value(bc.summary())?;
            summary["variant"] = serde_json::Value::from(variant.to_string());
            println!("{}", summary);
        } else {
            let summary = bc.summary();
            println!(
                "{} variant={} moves={} pieces={} points={} precomp={}",
                elapsed_prefix(start),
                variant,
                summary.nu_moves - 1,
                summary.nu_pieces,
                summary.nu_points,
                summary.precomp_len,
            );
        }
    }

    let entries: Vec<ManifestEntry> =
        tables.iter().map(|bc| ManifestEntry::from_table(bc)).collect();

    if let Some(path) = save_path {
        let count = Manifest::save(Path::new(path), &entries)
            .with_context(|| format!("cannot write manifest {}", path))?;
        if !json {
            println!("\nSaved {} table fingerprints to {}", count, path);
        }
    }

    if let Some(path) = check_path {
        let stored = Manifest::load(Path::new(path))
            .with_context(|| format!("cannot read manifest {}", path))?;
        let drift = stored.compare(&entries);
        report_drift(&drift, json)?;
        if drift.iter().any(|d| matches!(d, Drift::Changed { .. })) {
            bail!("move table layout changed since {}", path);
        }
    }

    if !json {
        println!();
        println!("Tables built: {}", tables.len());
        println!("Time: {:.2}s", start.elapsed().as_secs_f64());
        if let Some(mem) = resident_memory() {
            println!("Memory: {}", format_bytes(mem));
        }
    }
    Ok(())
}

fn report_drift(drift: &[Drift], json: bool) -> Result<()> {
    if json {
        for d in drift {
            let value = match d {
                Drift::Changed { stored, current } => {
                    serde_json::json!({ "changed": { "stored": stored, "current": current } })
                }
                Drift::Added(e) => serde_json::json!({ "added": e }),
                Drift::Missing(e) => serde_json::json!({ "missing": e }),
            };
            println!("{}", value);
        }
        return Ok(());
    }
    if drift.is_empty() {
        println!("\nManifest check: all fingerprints match");
    }
    for d in drift {
        match d {
            Drift::Changed { stored, current } => println!(
                "Changed: {:?}/{:?} moves {} -> {} precomp {} -> {} fingerprint {:016x} -> {:016x}",
                current.board_type,
                current.piece_set,
                stored.nu_moves,
                current.nu_moves,
                stored.precomp_len,
                current.precomp_len,
                stored.fingerprint,
                current.fingerprint,
            ),
            Drift::Added(e) => println!("Not in manifest: {:?}/{:?}", e.board_type, e.piece_set),
            Drift::Missing(e) => println!("Not built: {:?}/{:?}", e.board_type, e.piece_set),
        }
    }
    Ok(())
}
