//! Print everything known about one move.
//!
//! Usage: move_info --variant NAME MOVE
//!
//! MOVE is either a move id or a comma-separated point list like "e10,f10".

use std::env;

use anyhow::{Context, Result};
use polytile_core::{Move, Registry, Variant};
use polytile_tools::flag_value;

static REGISTRY: Registry = Registry::new();

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let variant: Variant = flag_value(&args, "--variant")?.unwrap_or("duo").parse()?;
    let mut positional = Vec::new();
    let mut i = 1;
    while i < args.len() {
        if args[i].starts_with("--") {
            i += 2; // flag and its value
        } else {
            positional.push(args[i].as_str());
            i += 1;
        }
    }
    let text = *positional.first().context("usage: move_info --variant NAME MOVE")?;

    let bc = REGISTRY.for_variant(variant);
    let mv = match text.parse::<u16>() {
        Ok(id) if (id as usize) < bc.nu_moves() => Move(id),
        Ok(id) => anyhow::bail!("move id {} out of range (0..{})", id, bc.nu_moves()),
        Err(_) => bc.from_text(text)?,
    };
    if mv.is_null() {
        println!("null");
        return Ok(());
    }

    let record = bc.move_record(mv);
    println!("{}", serde_json::to_string_pretty(&record)?);
    if let Some(t) = bc.transform_of(mv) {
        println!("transform: {:?}", t);
    }
    Ok(())
}
