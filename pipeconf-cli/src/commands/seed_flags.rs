//! Seed flags command implementation.
//!
//! This module implements the `seed-flags` command, which resolves a random
//! seed once and prints the flags that pin each tool's randomness to it.

use crate::error::CliError;
use crate::utils::{load_configuration, GlobalOptions};
use clap::Args;
use pipeconf::random_state::{seed_flags_for, RandomSeed, RandomStateConfig, ToolKind};
use pipeconf::ConfigValue;

/// Print the flags that pin a tool's randomness.
#[derive(Args)]
pub struct SeedFlagsCommand {
    /// Tool to print flags for (all tools when omitted)
    #[arg(value_name = "TOOL", value_parser = parse_tool)]
    pub tool: Option<ToolKind>,

    /// Seed to use: a positive integer or "random"
    #[arg(long, value_name = "SEED", value_parser = parse_seed, conflicts_with = "config")]
    pub seed: Option<RandomSeed>,

    /// Read the seed from this configuration (a file or a base name)
    #[arg(long, value_name = "CONFIG")]
    pub config: Option<String>,
}

impl SeedFlagsCommand {
    /// Execute the seed-flags command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Work out the configured seed
        let state = match (self.seed, self.config) {
            (Some(seed), _) => RandomStateConfig::new(Some(seed)),
            (None, Some(ref source)) => load_configuration(global, source)?.random_state()?,
            (None, None) => {
                return Err(CliError::InvalidArguments(
                    "give --seed <SEED> or --config <CONFIG>".to_string(),
                ))
            }
        };

        // 2. Resolve it once so every tool agrees on a drawn seed
        let seed = state.resolve();
        if seed.is_none() && !global.quiet {
            eprintln!("No random seed configured; tools keep their own randomness");
        }

        // 3. Print
        match self.tool {
            Some(tool) => {
                for flag in seed_flags_for(tool, seed) {
                    println!("{flag}");
                }
            }
            None => {
                for tool in ToolKind::ALL {
                    println!("{tool}: {}", seed_flags_for(tool, seed).join(" "));
                }
            }
        }

        Ok(())
    }
}

fn parse_tool(name: &str) -> Result<ToolKind, String> {
    ToolKind::parse(name).ok_or_else(|| {
        let known: Vec<String> = ToolKind::ALL.iter().map(ToString::to_string).collect();
        format!("unknown tool '{name}', expected one of: {}", known.join(", "))
    })
}

fn parse_seed(value: &str) -> Result<RandomSeed, String> {
    let parsed = match value.parse::<i64>() {
        Ok(number) => ConfigValue::from(number),
        Err(_) => ConfigValue::from(value),
    };
    match RandomSeed::from_value(&parsed) {
        Ok(Some(seed)) => Ok(seed),
        Ok(None) => Err("a seed is required".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tool() {
        assert_eq!(parse_tool("recon-all").unwrap(), ToolKind::ReconAll);
        assert!(parse_tool("spm").unwrap_err().contains("ants-ai"));
    }

    #[test]
    fn test_parse_seed() {
        assert_eq!(parse_seed("42").unwrap(), RandomSeed::Fixed(42));
        assert_eq!(parse_seed("random").unwrap(), RandomSeed::Random);
        assert!(parse_seed("0").is_err());
        assert!(parse_seed("2147483648").is_err());
        assert!(parse_seed("sometimes").is_err());
    }
}
