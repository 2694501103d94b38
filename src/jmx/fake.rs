/// In-memory transport for tests.
use std::cell::Cell;
use std::rc::Rc;

use super::client::Transport;
use super::errors::JmxError;
use super::value::RawValue;

/// A fixed set of beans, each with ordered attributes.
#[derive(Debug, Default)]
pub struct FakeTransport {
    beans: Vec<(String, Vec<(String, RawValue)>)>,
    closes: Rc<Cell<usize>>,
    fetches: Rc<Cell<usize>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bean(mut self, name: &str, attributes: &[(&str, RawValue)]) -> Self {
        self.beans.push((
            name.to_owned(),
            attributes
                .iter()
                .map(|(n, v)| ((*n).to_owned(), v.clone()))
                .collect(),
        ));
        self
    }

    /// The `app:type=Memory` bean used across tests.
    pub fn memory() -> Self {
        Self::new()
            .with_bean(
                "app:type=Memory",
                &[
                    (
                        "HeapMemoryUsage",
                        RawValue::Composite(vec![
                            ("used".to_owned(), "75".to_owned()),
                            ("max".to_owned(), "200".to_owned()),
                            ("committed".to_owned(), "100".to_owned()),
                            ("init".to_owned(), "50".to_owned()),
                        ]),
                    ),
                    ("Verbose", RawValue::Scalar("false".to_owned())),
                    (
                        "PoolNames",
                        RawValue::Sequence(vec!["Eden Space".to_owned(), "Old, Gen".to_owned()]),
                    ),
                ],
            )
            .with_bean(
                "app:type=GarbageCollector,name=Young",
                &[("CollectionCount", RawValue::Scalar("12".to_owned()))],
            )
    }

    pub fn close_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.closes)
    }

    pub fn fetch_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.fetches)
    }

    fn bean(&self, name: &str) -> Result<&[(String, RawValue)], JmxError> {
        self.beans
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, attrs)| attrs.as_slice())
            .ok_or_else(|| JmxError::bean_not_found(name))
    }
}

impl Transport for FakeTransport {
    fn bean_names(&self) -> Result<Vec<String>, JmxError> {
        Ok(self.beans.iter().map(|(n, _)| n.clone()).collect())
    }

    fn attribute_names(&self, bean: &str) -> Result<Vec<String>, JmxError> {
        Ok(self.bean(bean)?.iter().map(|(n, _)| n.clone()).collect())
    }

    fn attribute(&self, bean: &str, attribute: &str) -> Result<RawValue, JmxError> {
        self.fetches.set(self.fetches.get() + 1);
        self.bean(bean)?
            .iter()
            .find(|(n, _)| n == attribute)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| JmxError::attribute_not_found(bean, attribute))
    }

    fn close(&mut self) {
        self.closes.set(self.closes.get() + 1);
    }
}
