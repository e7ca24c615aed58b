//! Settings come from a TOML file, chosen by `--settings` or the build profile.

mod cli;
pub use clap::{Parser, Subcommand};
pub use cli::*;

mod settings;
pub use settings::*;
