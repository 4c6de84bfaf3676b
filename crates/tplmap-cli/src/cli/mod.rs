//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "tplmap",
    bin_name = "tplmap",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Trace generated template output back to its sources",
    long_about = "tplmap builds source maps for compiled templates and answers \
                  which template file and line produced a given output line.",
    after_help = "EXAMPLES:\n\
        \x20 tplmap build --content out.php --locations out.loc.json --root views --ext tpl --out out.map.json\n\
        \x20 tplmap stack out.map.json 42\n\
        \x20 tplmap paths --cached page/home\n\
        \x20 tplmap completions bash > /usr/share/bash-completion/completions/tplmap",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a source map from generated output and its location table.
    #[command(
        visible_alias = "b",
        about = "Build a source map",
        after_help = "EXAMPLES:\n\
            \x20 tplmap build --content out.php --locations out.loc.json --out out.map.json\n\
            \x20 tplmap build --content out.php --locations out.loc.json --root views --key page/home"
    )]
    Build(BuildArgs),

    /// Print the include stack behind an output line.
    #[command(
        visible_alias = "s",
        about = "Show the include stack for an output line",
        after_help = "EXAMPLES:\n\
            \x20 tplmap stack out.map.json 42\n\
            \x20 tplmap stack --cached page/home 42 --output-format json"
    )]
    Stack(StackArgs),

    /// Print the template files a map depends on.
    #[command(
        about = "List template files referenced by a map",
        after_help = "EXAMPLES:\n\
            \x20 tplmap paths out.map.json\n\
            \x20 tplmap paths --cached page/home"
    )]
    Paths(PathsArgs),

    /// Inspect the map cache directory.
    #[command(
        about = "Inspect cached source maps",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 tplmap cache list\n\
            \x20 tplmap cache status page/home\n\
            \x20 tplmap cache forget page/home"
    )]
    Cache(CacheCommands),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 tplmap completions bash > ~/.local/share/bash-completion/completions/tplmap\n\
            \x20 tplmap completions zsh  > ~/.zfunc/_tplmap\n\
            \x20 tplmap completions fish > ~/.config/fish/completions/tplmap.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the tplmap configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 tplmap config get templates.root\n\
            \x20 tplmap config list\n\
            \x20 tplmap config path"
    )]
    Config(ConfigCommands),
}

// ── build ─────────────────────────────────────────────────────────────────────

/// Arguments for `tplmap build`.
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Generated output the map describes.
    #[arg(long = "content", value_name = "FILE", help = "Generated output file")]
    pub content: PathBuf,

    /// JSON object of `"<byte offset>": Location` pairs.
    #[arg(
        long = "locations",
        value_name = "FILE",
        help = "Location table (JSON) emitted by the compiler"
    )]
    pub locations: PathBuf,

    /// Template root; defaults to `templates.root` from the config.
    #[arg(long = "root", value_name = "DIR", help = "Template root directory")]
    pub root: Option<PathBuf>,

    /// Default template extension; defaults to `templates.extension`.
    #[arg(
        long = "ext",
        value_name = "EXT",
        help = "Extension appended to template paths without one"
    )]
    pub extension: Option<String>,

    /// Write the map to a file instead of stdout.
    #[arg(
        short = 'o',
        long = "out",
        value_name = "FILE",
        conflicts_with = "key",
        help = "Write the map to FILE"
    )]
    pub out: Option<PathBuf>,

    /// Record the map in the cache directory under this key.
    #[arg(long = "key", value_name = "KEY", help = "Store the map in the cache")]
    pub key: Option<String>,
}

// ── stack / paths ─────────────────────────────────────────────────────────────

/// Which stored map a query reads.
#[derive(Debug, Args)]
pub struct MapTarget {
    /// Map file, or cache key with `--cached`.
    #[arg(value_name = "MAP", help = "Map file (or cache key with --cached)")]
    pub map: String,

    /// Treat MAP as a cache key.
    #[arg(long = "cached", help = "Read MAP from the cache directory")]
    pub cached: bool,
}

/// Arguments for `tplmap stack`.
#[derive(Debug, Args)]
pub struct StackArgs {
    #[command(flatten)]
    pub target: MapTarget,

    /// 1-based line of the generated output.
    #[arg(
        value_name = "LINE",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Output line (1-based)"
    )]
    pub line: u64,
}

/// Arguments for `tplmap paths`.
#[derive(Debug, Args)]
pub struct PathsArgs {
    #[command(flatten)]
    pub target: MapTarget,
}

// ── cache subcommands ─────────────────────────────────────────────────────────

/// Subcommands for `tplmap cache`.
#[derive(Debug, Subcommand)]
pub enum CacheCommands {
    /// List cached keys with their freshness.
    #[command(visible_alias = "ls")]
    List,
    /// Report whether a cached map is still fresh.
    Status {
        /// Cache key.
        key: String,
    },
    /// Remove a cached map.
    #[command(visible_alias = "rm")]
    Forget {
        /// Cache key.
        key: String,
    },
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `tplmap completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `tplmap config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `templates.root`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
