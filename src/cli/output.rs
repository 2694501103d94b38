/// Output formatting: csv, list, and table modes.
use std::borrow::Cow;
use std::io::Write;

use comfy_table::{Table, presets::UTF8_BORDERS_ONLY};
use tracing::debug;

use super::OutputFormat;
use crate::query::{EvaluatedTarget, Outcome, QueryError};

/// Output context passed to all formatters.
#[derive(Debug, Clone)]
pub struct OutputCtx {
    pub format: OutputFormat,
    /// Tab delimiter, no quoting.
    pub use_tab: bool,
    pub show_keys: bool,
    /// When true, phase timers log their elapsed time.
    pub debug: bool,
}

impl OutputCtx {
    #[must_use]
    pub fn new(format: OutputFormat, use_tab: bool, show_keys: bool, debug: bool) -> Self {
        Self {
            format,
            use_tab,
            show_keys,
            debug,
        }
    }

    /// Field delimiter for csv output.
    #[must_use]
    pub fn delimiter(&self) -> &'static str {
        if self.use_tab { "\t" } else { "," }
    }

    /// Start a named phase timer. Logs elapsed time on drop only when `--debug` is set.
    #[must_use]
    pub fn timer(&self, label: &'static str) -> DebugTimer {
        DebugTimer::new(label, self.debug)
    }

    /// Quote a csv field when it holds the delimiter, a quote, or a space.
    ///
    /// Embedded quotes are doubled. Tab mode never quotes.
    #[must_use]
    pub fn escape<'a>(&self, field: &'a str) -> Cow<'a, str> {
        if self.use_tab {
            return Cow::Borrowed(field);
        }
        if field.contains(self.delimiter()) || field.contains('"') || field.contains(' ') {
            Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
        } else {
            Cow::Borrowed(field)
        }
    }
}

/// One output cell: its label and its value (empty for placeholders).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub value: String,
}

/// Flatten evaluated targets into cells, in target order.
///
/// Header priority: the target's alias, then the record's own label, then
/// the empty string for placeholders.
#[must_use]
pub fn columns(evaluated: &[EvaluatedTarget]) -> Vec<Column> {
    let mut out = Vec::new();
    for entry in evaluated {
        let alias = entry.target.alias.as_deref();
        match &entry.outcome {
            Outcome::Records(records) => {
                out.extend(records.iter().map(|r| Column {
                    header: alias.map_or_else(|| r.header(), str::to_owned),
                    value: r.value.clone(),
                }));
            }
            Outcome::Absent => out.push(Column {
                header: alias.unwrap_or_default().to_owned(),
                value: String::new(),
            }),
        }
    }
    out
}

// --- Values ---

/// Render attribute values.
#[must_use]
pub fn render_values(evaluated: &[EvaluatedTarget], ctx: &OutputCtx) -> String {
    let cols = columns(evaluated);
    debug!(cells = cols.len(), format = ?ctx.format, "rendering values");
    match ctx.format {
        OutputFormat::Csv => {
            let mut out = String::new();
            if ctx.show_keys {
                out.push_str(&join_escaped(cols.iter().map(|c| c.header.as_str()), ctx));
                out.push('\n');
            }
            out.push_str(&join_escaped(cols.iter().map(|c| c.value.as_str()), ctx));
            out.push('\n');
            out
        }
        OutputFormat::List => cols
            .iter()
            .map(|c| {
                if ctx.show_keys {
                    format!("{}\t{}\n", c.header, c.value)
                } else {
                    format!("{}\n", c.value)
                }
            })
            .collect(),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            if ctx.show_keys {
                table.set_header(["KEY", "VALUE"]);
                for c in &cols {
                    table.add_row([c.header.as_str(), c.value.as_str()]);
                }
            } else {
                table.set_header(["VALUE"]);
                for c in &cols {
                    table.add_row([c.value.as_str()]);
                }
            }
            format!("{table}\n")
        }
    }
}

// --- Names ---

/// Render a bean or attribute name listing. Keys are never shown.
#[must_use]
pub fn render_names(names: &[String], escape: bool, ctx: &OutputCtx) -> String {
    match ctx.format {
        OutputFormat::Csv => {
            let line = if escape {
                join_escaped(names.iter().map(String::as_str), ctx)
            } else {
                names.join(ctx.delimiter())
            };
            format!("{line}\n")
        }
        OutputFormat::List => names.iter().map(|n| format!("{n}\n")).collect(),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(["NAME"]);
            for n in names {
                table.add_row([n.as_str()]);
            }
            format!("{table}\n")
        }
    }
}

fn join_escaped<'a>(fields: impl Iterator<Item = &'a str>, ctx: &OutputCtx) -> String {
    fields
        .map(|f| ctx.escape(f))
        .collect::<Vec<_>>()
        .join(ctx.delimiter())
}

// --- Error output ---

/// The single line written to stderr for a failed invocation.
#[must_use]
pub fn format_error(err: &QueryError) -> String {
    format!("Error: {err}")
}

/// Write an error message to stderr.
pub fn write_error(err: &QueryError) {
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    let _ = writeln!(out, "{}", format_error(err));
}

// --- Debug timer ---

/// A RAII timer that logs elapsed milliseconds at debug level on drop.
///
/// Created via [`OutputCtx::timer`]. Does nothing when `debug` is false.
pub struct DebugTimer {
    label: &'static str,
    start: std::time::Instant,
    active: bool,
}

impl DebugTimer {
    #[must_use]
    fn new(label: &'static str, active: bool) -> Self {
        Self {
            label,
            start: std::time::Instant::now(),
            active,
        }
    }
}

impl Drop for DebugTimer {
    fn drop(&mut self) {
        if self.active {
            let ms = self.start.elapsed().as_secs_f64() * 1000.0;
            debug!(phase = self.label, "{ms:.2}ms");
        }
    }
}
