/// Target specifications: `BEAN<TAB>ATTRIBUTE[<TAB>TYPE][<TAB>ALIAS]`.
use std::path::Path;

use tracing::warn;

use super::errors::QueryError;

/// Field separator inside a target string.
pub const FIELD_SEP: char = '\t';

/// Two-character stand-in for a tab, for shells that cannot pass one.
pub const ESCAPED_TAB: &str = "\\t";

/// Number of meaningful fields; anything past the alias is ignored.
const MAX_FIELDS: usize = 4;

/// One requested lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub bean: String,
    pub attribute: String,
    /// Sub-key to keep; never blank when present.
    pub type_filter: Option<String>,
    /// Column label override. An empty alias is still an alias.
    pub alias: Option<String>,
}

impl Target {
    #[must_use]
    pub fn new(bean: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            bean: bean.into(),
            attribute: attribute.into(),
            type_filter: None,
            alias: None,
        }
    }

    /// Set the type filter; blank filters are dropped.
    #[must_use]
    pub fn with_type_filter(mut self, type_filter: Option<String>) -> Self {
        self.type_filter = type_filter.filter(|t| !t.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_alias(mut self, alias: Option<String>) -> Self {
        self.alias = alias;
        self
    }
}

/// Parse one target string.
///
/// `\t` (backslash, `t`) is rewritten to a real tab before splitting.
///
/// # Errors
///
/// `QueryError::MalformedTarget` if the bean or attribute field is missing or empty.
pub fn parse_target(raw: &str) -> Result<Target, QueryError> {
    let rewritten = raw.replace(ESCAPED_TAB, "\t");
    let fields: Vec<&str> = rewritten.split(FIELD_SEP).collect();
    let malformed = || QueryError::MalformedTarget {
        raw: raw.to_owned(),
    };

    let (bean, attribute) = match fields.as_slice() {
        [bean, attribute, ..] if !bean.is_empty() && !attribute.is_empty() => (*bean, *attribute),
        _ => return Err(malformed()),
    };
    if fields.len() > MAX_FIELDS {
        warn!(target_spec = raw, extra = fields.len() - MAX_FIELDS, "ignoring extra target fields");
    }

    Ok(Target::new(bean, attribute)
        .with_type_filter(fields.get(2).map(|t| (*t).to_owned()))
        .with_alias(fields.get(3).map(|a| (*a).to_owned())))
}

/// Parse one target per line. Trailing blank lines are ignored.
///
/// # Errors
///
/// `QueryError::MalformedTarget` for the first line that does not parse.
pub fn parse_target_lines<I, S>(lines: I) -> Result<Vec<Target>, QueryError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lines: Vec<S> = lines.into_iter().collect();
    while lines.last().is_some_and(|l| l.as_ref().trim().is_empty()) {
        lines.pop();
    }
    lines
        .iter()
        .map(|line| parse_target(line.as_ref().trim_end_matches('\r')))
        .collect()
}

/// Read and parse a UTF-8 target file.
///
/// # Errors
///
/// `QueryError::TargetFile` if the file cannot be read, otherwise as
/// [`parse_target_lines`].
pub fn read_target_file(path: &Path) -> Result<Vec<Target>, QueryError> {
    let content = std::fs::read_to_string(path).map_err(|source| QueryError::TargetFile {
        path: path.to_owned(),
        source,
    })?;
    parse_target_lines(content.lines())
}
