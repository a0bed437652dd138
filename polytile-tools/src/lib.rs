//! Shared pieces of the polytile command-line tools.

pub mod manifest;
pub mod movegen;
pub mod rollout;
pub mod stats;

use anyhow::{bail, Context, Result};
use polytile_core::Variant;

/// Value following `flag` in the argument list, if the flag is present.
pub fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    match args.iter().position(|a| a == flag) {
        Some(i) => match args.get(i + 1) {
            Some(v) if !v.starts_with("--") => Ok(Some(v.as_str())),
            _ => bail!("{} needs a value", flag),
        },
        None => Ok(None),
    }
}

/// Parse `--NAME N` as a number, with a default when absent.
pub fn flag_number(args: &[String], flag: &str, default: u64) -> Result<u64> {
    match flag_value(args, flag)? {
        Some(v) => v.parse().with_context(|| format!("invalid value for {}: {}", flag, v)),
        None => Ok(default),
    }
}

/// Variants named by `--variant`, or all variants.
pub fn variants_from_args(args: &[String]) -> Result<Vec<Variant>> {
    match flag_value(args, "--variant")? {
        Some(name) => Ok(vec![name.parse()?]),
        None => Ok(Variant::ALL.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_flags() {
        let a = args("tables --variant duo --games 12 --json");
        assert_eq!(flag_value(&a, "--variant").unwrap(), Some("duo"));
        assert_eq!(flag_number(&a, "--games", 1).unwrap(), 12);
        assert_eq!(flag_number(&a, "--seed", 7).unwrap(), 7);
        assert_eq!(variants_from_args(&a).unwrap(), vec![Variant::Duo]);
        assert!(flag_value(&args("tables --variant"), "--variant").is_err());
        assert!(variants_from_args(&args("x --variant chess")).is_err());
        assert_eq!(variants_from_args(&args("x")).unwrap().len(), 10);
    }
}
