/// Bean listing: `jkl HOST:PORT`.
use crate::cli::OutputCtx;
use crate::cli::output::render_names;
use crate::jmx::{JmxClient, Transport};
use crate::query::QueryError;

/// List every bean, sorted, with csv escaping applied to each name.
///
/// # Errors
///
/// Returns `QueryError::Jmx` if the agent cannot list beans.
pub fn run<T: Transport>(client: &JmxClient<T>, ctx: &OutputCtx) -> Result<String, QueryError> {
    let _t = ctx.timer("list_beans");
    let beans = client.list_beans()?;
    Ok(render_names(&beans, true, ctx))
}
