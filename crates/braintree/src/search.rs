//! Search terms and criteria folding for advanced-search endpoints.
//!
//! Each field builder produces a [`SearchTerm`] (a field name plus its
//! parameter). [`build_criteria`] folds an ordered sequence of terms into the
//! `search` body. Terms that repeat a field name are merged rather than
//! overwritten, so `amount >= 1` and `amount <= 5` end up as one range.

use std::marker::PhantomData;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

/// Search body: field name to parameter.
pub type SearchCriteria = Map<String, Value>;

/// One criterion on one field.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTerm {
    name: String,
    param: Value,
}

impl SearchTerm {
    pub fn new(name: impl Into<String>, param: Value) -> Self {
        Self {
            name: name.into(),
            param,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn to_param(&self) -> &Value {
        &self.param
    }
}

/// Values accepted by multiple-value and range fields.
pub trait SearchValue {
    fn to_search_value(&self) -> Value;
}

impl SearchValue for String {
    fn to_search_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl SearchValue for NaiveDate {
    fn to_search_value(&self) -> Value {
        Value::String(self.format("%Y-%m-%d").to_string())
    }
}

impl SearchValue for DateTime<Utc> {
    fn to_search_value(&self) -> Value {
        Value::String(self.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

/// Free-text field: `is`, `is_not`, `starts_with`, `ends_with`, `contains`.
#[derive(Debug, Clone, Copy)]
pub struct TextField {
    name: &'static str,
}

impl TextField {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub fn is(&self, value: impl Into<String>) -> SearchTerm {
        self.term("is", value.into())
    }

    pub fn is_not(&self, value: impl Into<String>) -> SearchTerm {
        self.term("is_not", value.into())
    }

    pub fn starts_with(&self, value: impl Into<String>) -> SearchTerm {
        self.term("starts_with", value.into())
    }

    pub fn ends_with(&self, value: impl Into<String>) -> SearchTerm {
        self.term("ends_with", value.into())
    }

    pub fn contains(&self, value: impl Into<String>) -> SearchTerm {
        self.term("contains", value.into())
    }

    fn term(&self, operator: &str, value: String) -> SearchTerm {
        SearchTerm::new(self.name, json!({ operator: value }))
    }
}

/// Field matched against a list of allowed values. Encoded as a JSON array.
#[derive(Debug, Clone, Copy)]
pub struct MultipleValueField<V> {
    name: &'static str,
    _value: PhantomData<fn() -> V>,
}

impl<V: SearchValue> MultipleValueField<V> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    pub fn in_list<I>(&self, values: I) -> SearchTerm
    where
        I: IntoIterator,
        I::Item: Into<V>,
    {
        let list = values
            .into_iter()
            .map(|v| v.into().to_search_value())
            .collect();
        SearchTerm::new(self.name, Value::Array(list))
    }

    pub fn is(&self, value: impl Into<V>) -> SearchTerm {
        self.in_list([value.into()])
    }
}

/// Ordered field: exact match, lower bound, upper bound, or both.
#[derive(Debug, Clone, Copy)]
pub struct RangeField<V> {
    name: &'static str,
    _value: PhantomData<fn() -> V>,
}

impl<V: SearchValue> RangeField<V> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    pub fn is(&self, value: impl Into<V>) -> SearchTerm {
        SearchTerm::new(self.name, json!({ "is": value.into().to_search_value() }))
    }

    pub fn greater_than_or_equal_to(&self, min: impl Into<V>) -> SearchTerm {
        SearchTerm::new(self.name, json!({ "min": min.into().to_search_value() }))
    }

    pub fn less_than_or_equal_to(&self, max: impl Into<V>) -> SearchTerm {
        SearchTerm::new(self.name, json!({ "max": max.into().to_search_value() }))
    }

    pub fn between(&self, min: impl Into<V>, max: impl Into<V>) -> SearchTerm {
        SearchTerm::new(
            self.name,
            json!({
                "min": min.into().to_search_value(),
                "max": max.into().to_search_value(),
            }),
        )
    }
}

/// Fold terms into a criteria mapping, merging repeated field names.
pub fn build_criteria<I>(terms: I) -> SearchCriteria
where
    I: IntoIterator<Item = SearchTerm>,
{
    let mut criteria = SearchCriteria::new();
    for term in terms {
        match criteria.get_mut(&term.name) {
            Some(existing) => merge_param(existing, term.param),
            None => {
                criteria.insert(term.name, term.param);
            }
        }
    }
    criteria
}

// Objects merge key-wise (later term wins per key), arrays concatenate,
// anything else is replaced.
fn merge_param(existing: &mut Value, incoming: Value) {
    match (existing, incoming) {
        (Value::Object(current), Value::Object(next)) => {
            for (k, v) in next {
                current.insert(k, v);
            }
        }
        (Value::Array(current), Value::Array(next)) => {
            for v in next {
                if !current.contains(&v) {
                    current.push(v);
                }
            }
        }
        (slot, next) => *slot = next,
    }
}
