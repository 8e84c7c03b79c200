//! Build script for pipeconf-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("pipeconf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect, validate and diff pipeline configurations")
        .long_about(
            "Command-line tool for building layered pipeline configurations from a base \
             and overrides, and for comparing the results",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("preconfig-dir")
                .long("preconfig-dir")
                .help("Extra directory searched for pipeline_config_<name>.yml bases")
                .value_name("DIR")
                .global(true)
                .env("PIPECONF_PRECONFIG_DIR"),
        )
        .subcommands(vec![
            Command::new("show")
                .about("Build a configuration and print it")
                .long_about("Build a configuration from a file and/or a base and print the result"),
            Command::new("diff")
                .about("Show the structural differences between two configurations")
                .long_about("Build two configurations and print every key whose value differs"),
            Command::new("validate")
                .about("Check that a configuration file builds")
                .long_about("Load the base, merge and validate a configuration file"),
            Command::new("list-preconfigs")
                .about("List the available base configurations")
                .long_about("List packaged bases and those found in the preconfig directory"),
            Command::new("seed-flags")
                .about("Print the flags that pin a tool's randomness")
                .long_about("Resolve the random seed once and print per-tool seed flags"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    // Generate main pipeconf.1 man page
    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("pipeconf.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
