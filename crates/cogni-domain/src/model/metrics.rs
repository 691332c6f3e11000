//! Metrics - Opaque per-game measurements
//!
//! Each game decides which fields it reports. The session stores them as-is
//! and the report prints whatever is present.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Number(f64),
    Flag(bool),
    Text(String),
}

impl core::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MetricValue::Integer(v) => write!(f, "{}", v),
            MetricValue::Number(v) => write!(f, "{:.2}", v),
            MetricValue::Flag(v) => write!(f, "{}", if *v { "yes" } else { "no" }),
            MetricValue::Text(v) => write!(f, "{}", v),
        }
    }
}

/// A game's metrics record, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metrics(BTreeMap<String, MetricValue>);

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: MetricValue) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn with_count(self, key: impl Into<String>, value: u32) -> Self {
        self.with(key, MetricValue::Integer(i64::from(value)))
    }

    pub fn with_flag(self, key: impl Into<String>, value: bool) -> Self {
        self.with(key, MetricValue::Flag(value))
    }

    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
