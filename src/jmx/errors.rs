/// Errors from the JMX transport layer.
use thiserror::Error;

/// Typed errors from talking to the remote management agent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JmxError {
    /// The location is malformed, the agent refused the connection, or the
    /// transport failed mid-call.
    #[error("{message}")]
    Connection {
        /// Human-readable description, including the location or call.
        message: String,
    },

    /// The bean or attribute name does not resolve on the server.
    #[error("{message}")]
    NotFound {
        /// Human-readable description naming the missing bean or attribute.
        message: String,
    },

    /// The agent answered with an error that is neither a lookup miss nor a
    /// transport failure.
    #[error("Remote error ({context}): {message}")]
    Remote {
        /// Which call failed, e.g. `java.lang:type=Memory::HeapMemoryUsage`.
        context: String,
        /// The agent's own error text.
        message: String,
    },
}

impl JmxError {
    pub(crate) fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub(crate) fn bean_not_found(bean: &str) -> Self {
        Self::NotFound {
            message: format!("Invalid mbean name specified ({bean})."),
        }
    }

    pub(crate) fn attribute_not_found(bean: &str, attribute: &str) -> Self {
        Self::NotFound {
            message: format!("Invalid attribute name specified ({bean}::{attribute})."),
        }
    }
}
