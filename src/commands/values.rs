/// Value lookup: explicit `BEAN ATTRIBUTE [TYPE]` or `--target`/`--file` batches.
use crate::cli::OutputCtx;
use crate::cli::output::render_values;
use crate::jmx::{JmxClient, Transport};
use crate::query::{EvaluationMode, QueryError, Target, evaluate};

/// Evaluate `targets` under `mode` and render them.
///
/// # Errors
///
/// In fail-fast mode, the first lookup or type-filter failure.
pub fn run<T: Transport>(
    client: &JmxClient<T>,
    targets: &[Target],
    mode: EvaluationMode,
    ctx: &OutputCtx,
) -> Result<String, QueryError> {
    let _t_eval = ctx.timer("evaluate");
    let evaluated = evaluate(client, targets, mode)?;
    drop(_t_eval);

    let _t_render = ctx.timer("render");
    Ok(render_values(&evaluated, ctx))
}
