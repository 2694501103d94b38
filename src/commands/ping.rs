/// `--ping`: the connection was made, nothing else to do.
use tracing::info;

use crate::cli::OutputCtx;
use crate::jmx::{JmxClient, Transport};
use crate::query::QueryError;

/// Run `jkl HOST:PORT --ping`.
///
/// # Errors
///
/// Cannot fail once connected; connection errors surface before this runs.
pub fn run<T: Transport>(client: &JmxClient<T>, _ctx: &OutputCtx) -> Result<String, QueryError> {
    info!(location = client.location(), "agent reachable");
    Ok(String::new())
}
