/// Transport layer: connection adapter and the Jolokia agent client.
pub mod client;
pub mod errors;
#[cfg(test)]
pub mod fake;
pub mod jolokia;
pub mod value;

pub use client::{JmxClient, Transport};
pub use errors::JmxError;
pub use jolokia::JolokiaOptions;
pub use value::RawValue;
