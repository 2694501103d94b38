/// CLI argument definitions via clap derive.
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::jmx::jolokia::{DEFAULT_AGENT_PATH, DEFAULT_TIMEOUT_SECS};

/// jkl — read JMX MBean attributes through a Jolokia agent.
///
/// With only HOST:PORT, lists every bean. With BEAN, lists its attributes.
/// With BEAN ATTRIBUTE [TYPE], prints the attribute's value(s).
#[derive(Debug, Parser)]
#[command(
    name = "jkl",
    about = "Read JMX MBean attributes from the command line",
    version
)]
pub struct Cli {
    /// Agent location, e.g. `localhost:8778`.
    #[arg(value_name = "HOST:PORT")]
    pub location: String,

    /// Bean object name, e.g. `java.lang:type=Memory`.
    pub bean: Option<String>,

    /// Attribute name, e.g. `HeapMemoryUsage`.
    pub attribute: Option<String>,

    /// Sub-key of a composite or array attribute, e.g. `max`.
    #[arg(value_name = "TYPE")]
    pub type_filter: Option<String>,

    /// "BEAN\tATTRIBUTE[\tTYPE][\tALIAS]". Repeatable.
    /// Lookup failures print an empty value instead of aborting.
    #[arg(short = 't', long = "target", value_name = "TARGET")]
    pub targets: Vec<String>,

    /// File with one target per line.
    #[arg(short = 'f', long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Only check that the agent answers.
    #[arg(short = 'p', long)]
    pub ping: bool,

    /// Print keys (headers) alongside values.
    #[arg(long)]
    pub show_keys: bool,

    /// Output format.
    #[arg(short = 'o', long, value_name = "FORMAT", default_value = "csv")]
    pub output: OutputFormat,

    /// Use a tab instead of a comma in csv output (disables quoting).
    #[arg(long)]
    pub use_tab: bool,

    /// Path of the Jolokia agent on the host.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_AGENT_PATH)]
    pub agent_path: String,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Log requests and phase timings to stderr.
    #[arg(long)]
    pub debug: bool,
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Delimited: an optional header line, then one value line.
    #[default]
    Csv,
    /// One value per line, optionally prefixed by its key and a tab.
    List,
    /// Aligned table (human-readable).
    Table,
}
