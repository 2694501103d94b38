/// Batch evaluation of targets against a live connection.
///
/// Two failure policies, chosen explicitly by the caller:
///
/// - [`EvaluationMode::FailFast`]: the first failing target aborts the run.
/// - [`EvaluationMode::Tolerant`]: a failing target becomes an [`Outcome::Absent`]
///   placeholder and the remaining targets are still evaluated.
///
/// Targets are fetched one at a time, in declaration order.
use tracing::{debug, warn};

use super::errors::QueryError;
use super::normalize::{AttributeRecord, normalize};
use super::target::Target;
use crate::jmx::{JmxClient, Transport};

/// Failure policy for [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationMode {
    /// Explicit BEAN ATTRIBUTE [TYPE] arguments: any error aborts.
    FailFast,
    /// `--target` / `--file` batches: errors become placeholders.
    Tolerant,
}

/// What one target resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Flattened records, possibly empty.
    Records(Vec<AttributeRecord>),
    /// The lookup failed in tolerant mode; rendered as a single empty cell.
    Absent,
}

/// A target paired with its outcome. Order mirrors the input targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedTarget {
    pub target: Target,
    pub outcome: Outcome,
}

/// Fetch, flatten, and filter one target.
///
/// # Errors
///
/// - `QueryError::Jmx` if the bean or attribute cannot be fetched.
/// - `QueryError::TypeFilterEmpty` if the type filter keeps no record.
pub fn resolve<T: Transport>(
    client: &JmxClient<T>,
    target: &Target,
) -> Result<Vec<AttributeRecord>, QueryError> {
    let raw = client.fetch_raw_value(&target.bean, &target.attribute)?;
    let records = normalize(&target.bean, &target.attribute, &raw);

    let Some(type_filter) = target.type_filter.as_deref() else {
        return Ok(records);
    };
    let kept: Vec<AttributeRecord> = records
        .into_iter()
        .filter(|r| r.sub_key.as_deref() == Some(type_filter))
        .collect();
    if kept.is_empty() {
        return Err(QueryError::TypeFilterEmpty {
            bean: target.bean.clone(),
            attribute: target.attribute.clone(),
            type_filter: type_filter.to_owned(),
        });
    }
    Ok(kept)
}

/// Evaluate every target in order under `mode`.
///
/// # Errors
///
/// Only in [`EvaluationMode::FailFast`]: the first error from [`resolve`].
pub fn evaluate<T: Transport>(
    client: &JmxClient<T>,
    targets: &[Target],
    mode: EvaluationMode,
) -> Result<Vec<EvaluatedTarget>, QueryError> {
    let mut evaluated = Vec::with_capacity(targets.len());
    for target in targets {
        let outcome = match resolve(client, target) {
            Ok(records) => Outcome::Records(records),
            Err(err) if mode == EvaluationMode::FailFast => return Err(err),
            Err(err) => {
                warn!(bean = %target.bean, attribute = %target.attribute, error = %err, "substituting empty value");
                Outcome::Absent
            }
        };
        evaluated.push(EvaluatedTarget {
            target: target.clone(),
            outcome,
        });
    }
    debug!(targets = evaluated.len(), ?mode, "evaluated targets");
    Ok(evaluated)
}
