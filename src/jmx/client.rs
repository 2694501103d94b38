/// Connection adapter: one owned connection per invocation, released on drop.
use std::fmt;

use tracing::debug;

use super::errors::JmxError;
use super::jolokia::{JolokiaOptions, JolokiaTransport};
use super::value::RawValue;

/// The capability the adapter needs from a remote management agent.
///
/// Implemented by [`JolokiaTransport`] for real agents and by an in-memory
/// fake in tests.
pub trait Transport {
    /// All registered bean object names, in any order.
    ///
    /// # Errors
    ///
    /// `JmxError::Connection` if the agent cannot be reached.
    fn bean_names(&self) -> Result<Vec<String>, JmxError>;

    /// Attribute names of one bean, in server-declared order.
    ///
    /// # Errors
    ///
    /// `JmxError::NotFound` if the bean does not exist.
    fn attribute_names(&self, bean: &str) -> Result<Vec<String>, JmxError>;

    /// Current value of one attribute.
    ///
    /// # Errors
    ///
    /// `JmxError::NotFound` if the bean or attribute does not exist,
    /// `JmxError::Connection` on transport failure.
    fn attribute(&self, bean: &str, attribute: &str) -> Result<RawValue, JmxError>;

    /// Release transport resources. Called exactly once by [`JmxClient`].
    fn close(&mut self);
}

/// A validated `HOST:PORT` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub host: String,
    pub port: u16,
}

impl Location {
    /// Parse `HOST:PORT`.
    ///
    /// # Errors
    ///
    /// `JmxError::Connection` if the separator, host, or numeric port is missing.
    pub fn parse(raw: &str) -> Result<Self, JmxError> {
        let invalid = || JmxError::connection(format!("Invalid host or port specified ({raw})."));
        let (host, port) = raw.rsplit_once(':').ok_or_else(invalid)?;
        if host.is_empty() {
            return Err(invalid());
        }
        let port = port.parse::<u16>().map_err(|_| invalid())?;
        Ok(Self {
            host: host.to_owned(),
            port,
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Owns the single connection of an invocation.
///
/// The transport is closed exactly once: by [`JmxClient::close`] or, on any
/// early return, by `Drop`.
pub struct JmxClient<T: Transport> {
    location: String,
    transport: T,
    closed: bool,
}

impl JmxClient<JolokiaTransport> {
    /// Connect to the Jolokia agent at `location`.
    ///
    /// # Errors
    ///
    /// `JmxError::Connection` if the location is malformed or the agent
    /// refuses the connection.
    pub fn connect(location: &str, opts: &JolokiaOptions) -> Result<Self, JmxError> {
        debug!(location, "connecting");
        let parsed = Location::parse(location)?;
        let transport = JolokiaTransport::connect(&parsed, opts)?;
        debug!(location, "connected");
        Ok(Self::new(parsed.to_string(), transport))
    }
}

impl<T: Transport> JmxClient<T> {
    /// Wrap an already-connected transport.
    pub fn new(location: impl Into<String>, transport: T) -> Self {
        Self {
            location: location.into(),
            transport,
            closed: false,
        }
    }

    /// The `HOST:PORT` this client talks to.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Bean object names, sorted ascending.
    ///
    /// # Errors
    ///
    /// `JmxError::Connection` if the agent becomes unreachable.
    pub fn list_beans(&self) -> Result<Vec<String>, JmxError> {
        let mut names = self.transport.bean_names()?;
        names.sort();
        debug!(count = names.len(), "listed beans");
        Ok(names)
    }

    /// Attribute names of `bean` in server-declared order.
    ///
    /// # Errors
    ///
    /// `JmxError::NotFound` if the bean does not exist.
    pub fn list_attribute_names(&self, bean: &str) -> Result<Vec<String>, JmxError> {
        let names = self.transport.attribute_names(bean)?;
        debug!(bean, ?names, "listed attributes");
        Ok(names)
    }

    /// Raw (unflattened) value of `bean`'s `attribute`.
    ///
    /// # Errors
    ///
    /// `JmxError::NotFound` or `JmxError::Connection`, as reported by the transport.
    pub fn fetch_raw_value(&self, bean: &str, attribute: &str) -> Result<RawValue, JmxError> {
        let value = self.transport.attribute(bean, attribute)?;
        debug!(bean, attribute, ?value, "fetched value");
        Ok(value)
    }

    /// Close the connection now instead of at drop.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.closed {
            self.closed = true;
            self.transport.close();
            debug!(location = %self.location, "connection closed");
        }
    }
}

impl<T: Transport> Drop for JmxClient<T> {
    fn drop(&mut self) {
        self.release();
    }
}
