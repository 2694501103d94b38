/// Raw attribute values as returned by the agent, tagged by shape.
use serde_json::Value;

/// One attribute value before flattening.
///
/// The transport decides the shape once; everything downstream matches on the
/// variant instead of inspecting the payload again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// A plain value (number, string, boolean, `null`) already rendered as text.
    Scalar(String),
    /// A record with named sub-fields, in the order the agent sent them.
    Composite(Vec<(String, String)>),
    /// An ordered array of rendered elements.
    Sequence(Vec<String>),
}

impl RawValue {
    /// Classify a JSON payload from a `read` response.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::Composite(
                map.iter()
                    .map(|(key, field)| (key.clone(), render(field)))
                    .collect(),
            ),
            Value::Array(items) => Self::Sequence(items.iter().map(render).collect()),
            other => Self::Scalar(render(other)),
        }
    }
}

/// Render a JSON value as the text shown to the user.
///
/// Strings lose their quotes; nested structures stay compact JSON.
#[must_use]
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_owned(),
        other => other.to_string(),
    }
}
