/// Flatten raw attribute values into uniform records.
use crate::jmx::RawValue;

/// One flattened scalar extracted from an attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRecord {
    pub bean: String,
    pub attribute: String,
    /// Composite field name or array index; `None` for plain scalars.
    pub sub_key: Option<String>,
    pub value: String,
}

impl AttributeRecord {
    /// The record's own column label.
    ///
    /// Compound values are labelled by their sub-key, scalars by `BEAN::ATTRIBUTE`.
    #[must_use]
    pub fn header(&self) -> String {
        match &self.sub_key {
            Some(key) => key.clone(),
            None => format!("{}::{}", self.bean, self.attribute),
        }
    }
}

/// Flatten one raw value.
///
/// - Composite: one record per field, sorted by field name.
/// - Sequence: one record per element, keyed `"0"`, `"1"`, … in array order.
/// - Scalar: exactly one record without a sub-key.
#[must_use]
pub fn normalize(bean: &str, attribute: &str, raw: &RawValue) -> Vec<AttributeRecord> {
    let record = |sub_key: Option<String>, value: &str| AttributeRecord {
        bean: bean.to_owned(),
        attribute: attribute.to_owned(),
        sub_key,
        value: value.to_owned(),
    };

    match raw {
        RawValue::Composite(fields) => {
            let mut sorted: Vec<&(String, String)> = fields.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(&b.0));
            sorted
                .into_iter()
                .map(|(key, value)| record(Some(key.clone()), value.as_str()))
                .collect()
        }
        RawValue::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(index, value)| record(Some(index.to_string()), value.as_str()))
            .collect(),
        RawValue::Scalar(value) => vec![record(None, value.as_str())],
    }
}
