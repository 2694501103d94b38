/// Attribute listing: `jkl HOST:PORT BEAN`.
use crate::cli::OutputCtx;
use crate::cli::output::render_names;
use crate::jmx::{JmxClient, Transport};
use crate::query::QueryError;

/// List `bean`'s attribute names in server order.
///
/// # Errors
///
/// Returns `QueryError::Jmx` if the bean does not exist.
pub fn run<T: Transport>(
    client: &JmxClient<T>,
    bean: &str,
    ctx: &OutputCtx,
) -> Result<String, QueryError> {
    let _t = ctx.timer("list_attributes");
    let names = client.list_attribute_names(bean)?;
    Ok(render_names(&names, false, ctx))
}
