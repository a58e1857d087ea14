//! Shape-tolerant extraction of gold/silver 999 rates from a provider payload.
//!
//! The provider has served two layouts over time:
//!
//! ```text
//! [{"RateName": "Gold 999", "Rates": "1,59,000"}, {"RateName": "Silver 999", "Rates": "2,65,000"}]
//! {"Gold 999 Rate": "1,60,000", "Silver 999 Rate": 270000}
//! ```
//!
//! Both are reduced to `(label, value)` entries and run through the same label matcher.

use std::borrow::Cow;
use serde_json::{Map, Value};
use crate::error::{Error, Result};
use crate::price_infra::RawRatePair;
use crate::types::metal::Metal;
use crate::types::price::Price;

const NAME_FIELDS: [&str; 2] = ["ratename", "name"];
const VALUE_FIELDS: [&str; 2] = ["rates", "rate"];

#[derive(Debug, Clone, PartialEq)]
pub enum RatePayload {
    Records(Vec<Map<String, Value>>),
    Flat(Map<String, Value>),
}

impl RatePayload {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(RatePayload::Records(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Object(map) => Some(map),
                        _ => None,
                    })
                    .collect(),
            )),
            Value::Object(map) => Ok(RatePayload::Flat(map)),
            _ => Err(Error::UnrecognizedShape),
        }
    }

    /// Labelled values in payload order. Flat keys keep document order (`preserve_order`).
    pub fn entries(&self) -> Vec<(Cow<'_, str>, &Value)> {
        match self {
            RatePayload::Records(records) => records
                .iter()
                .filter_map(|record| {
                    let label = record_label(record)?;
                    let value = field_ci(record, &VALUE_FIELDS)?;
                    Some((label, value))
                })
                .collect(),
            RatePayload::Flat(map) => map
                .iter()
                .map(|(k, v)| (Cow::Borrowed(k.as_str()), v))
                .collect(),
        }
    }

    pub fn extract(&self) -> Result<RawRatePair> {
        let mut gold = None;
        let mut silver = None;

        for (label, value) in self.entries() {
            let Some(metal) = Metal::from_rate_label(&label) else {
                continue;
            };
            let Some(price) = price_from_value(value) else {
                tracing::debug!("Skipping unparseable {} rate under {:?}: {}", metal, label, value);
                continue;
            };

            // Later entries overwrite earlier ones.
            match metal {
                Metal::Gold => gold = Some(price),
                Metal::Silver => silver = Some(price),
            }
        }

        let gold = gold.ok_or(Error::RateNotFound(Metal::Gold))?;
        let silver = silver.ok_or(Error::RateNotFound(Metal::Silver))?;
        RawRatePair::new(gold, silver)
    }
}

pub fn parse_rates(body: &str) -> Result<RawRatePair> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| Error::MalformedPayload(e.to_string()))?;
    RatePayload::from_value(value)?.extract()
}

/// First field whose key matches one of `candidates` case-insensitively, in candidate order.
fn field_ci<'a>(record: &'a Map<String, Value>, candidates: &[&str]) -> Option<&'a Value> {
    candidates.iter().find_map(|wanted| {
        record
            .iter()
            .find(|(key, value)| key.eq_ignore_ascii_case(wanted) && !value.is_null())
            .map(|(_, value)| value)
    })
}

/// A string name wins over a non-string one; a scalar name is stringified only as a last resort.
fn record_label(record: &Map<String, Value>) -> Option<Cow<'_, str>> {
    let names: Vec<&Value> = NAME_FIELDS
        .iter()
        .filter_map(|field| field_ci(record, &[*field]))
        .collect();

    names
        .iter()
        .copied()
        .find_map(|name| name.as_str().map(Cow::Borrowed))
        .or_else(|| {
            names.iter().copied().find_map(|name| match name {
                Value::Number(n) => Some(Cow::Owned(n.to_string())),
                Value::Bool(b) => Some(Cow::Owned(b.to_string())),
                _ => None,
            })
        })
}

fn price_from_value(value: &Value) -> Option<Price> {
    match value {
        Value::Number(n) => n.as_f64().map(Price::from_f64),
        Value::String(s) => Price::parse_grouped(s),
        _ => None,
    }
}
