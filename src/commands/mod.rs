/// Command dispatch: decide what was asked for, connect, run it.
pub mod attributes;
pub mod beans;
pub mod ping;
pub mod values;

use std::time::Duration;

use tracing::debug;

use crate::cli::{Cli, OutputCtx};
use crate::jmx::{JmxClient, JolokiaOptions, Transport};
use crate::query::{EvaluationMode, QueryError, Target, parse_target, read_target_file};

/// What one invocation does, decided before any network access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Connect and stop.
    Ping,
    /// List every bean.
    Beans,
    /// List one bean's attribute names.
    Attributes { bean: String },
    /// Fetch values for targets under a failure policy.
    Values {
        targets: Vec<Target>,
        mode: EvaluationMode,
    },
}

/// Validate argument combinations and parse targets.
///
/// # Errors
///
/// - `QueryError::ConfigurationConflict` for mutually exclusive inputs.
/// - `QueryError::MalformedTarget` / `QueryError::TargetFile` for bad targets.
pub fn plan(cli: &Cli) -> Result<Invocation, QueryError> {
    if !cli.targets.is_empty() && cli.file.is_some() {
        return Err(QueryError::ConfigurationConflict(
            "Cannot specify '--target' option and '--file' option together.".to_owned(),
        ));
    }

    let batch: Vec<Target> = match &cli.file {
        Some(path) => read_target_file(path)?,
        None => cli
            .targets
            .iter()
            .map(String::as_str)
            .map(parse_target)
            .collect::<Result<_, _>>()?,
    };

    if cli.bean.is_some() && !batch.is_empty() {
        return Err(QueryError::ConfigurationConflict(
            "Cannot specify BEAN or ATTRIBUTE argument with '--target' or '--file' option.".to_owned(),
        ));
    }
    if cli.show_keys && cli.attribute.is_none() && batch.is_empty() {
        return Err(QueryError::ConfigurationConflict(
            "Cannot specify '--show-keys' without attribute or '--target' or '--file' option."
                .to_owned(),
        ));
    }

    if cli.ping {
        return Ok(Invocation::Ping);
    }

    Ok(match (&cli.bean, &cli.attribute) {
        (Some(bean), Some(attribute)) => Invocation::Values {
            targets: vec![Target::new(bean, attribute).with_type_filter(cli.type_filter.clone())],
            mode: EvaluationMode::FailFast,
        },
        (Some(bean), None) => Invocation::Attributes { bean: bean.clone() },
        (None, _) if !batch.is_empty() => Invocation::Values {
            targets: batch,
            mode: EvaluationMode::Tolerant,
        },
        (None, _) => Invocation::Beans,
    })
}

/// Run a planned invocation against an open connection and return its output.
///
/// # Errors
///
/// Returns `QueryError` on any lookup failure the invocation does not tolerate.
pub fn execute<T: Transport>(
    client: &JmxClient<T>,
    invocation: &Invocation,
    ctx: &OutputCtx,
) -> Result<String, QueryError> {
    match invocation {
        Invocation::Ping => ping::run(client, ctx),
        Invocation::Beans => beans::run(client, ctx),
        Invocation::Attributes { bean } => attributes::run(client, bean, ctx),
        Invocation::Values { targets, mode } => values::run(client, targets, *mode, ctx),
    }
}

/// Plan, connect, execute, print.
///
/// The connection is released on every path out of this function.
///
/// # Errors
///
/// Returns `QueryError` on any failure; nothing is printed to stdout then.
pub fn dispatch(cli: &Cli, ctx: &OutputCtx) -> Result<(), QueryError> {
    let invocation = plan(cli)?;
    debug!(?invocation, "planned");

    let opts = JolokiaOptions {
        agent_path: cli.agent_path.clone(),
        timeout: Duration::from_secs(cli.timeout),
    };

    let _t_connect = ctx.timer("connect");
    let client = JmxClient::connect(&cli.location, &opts)?;
    drop(_t_connect);

    let rendered = execute(&client, &invocation, ctx)?;
    client.close();

    print!("{rendered}");
    Ok(())
}
