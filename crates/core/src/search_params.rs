//! Search template parameters and their normalization
//!
//! Callers hand over an open mapping of template parameters. Before the
//! mapping is sent to the backend a handful of fields are rewritten into the
//! shapes the stored properties template expects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// A single template parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Number(Number),
    /// Booleans, arrays, objects and null pass through untouched
    Other(Value),
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => ParamValue::Text(s),
            Value::Number(n) => ParamValue::Number(n),
            other => ParamValue::Other(other),
        }
    }
}

impl From<ParamValue> for Value {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Text(s) => Value::String(s),
            ParamValue::Number(n) => Value::Number(n),
            ParamValue::Other(v) => v,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(Number::from(value))
    }
}

/// Template parameter bindings keyed by parameter name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchParams(BTreeMap<String, ParamValue>);

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_map(map: Map<String, Value>) -> Self {
        Self(
            map.into_iter()
                .map(|(key, value)| (key, ParamValue::from(value)))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Zero-based result offset (`from`), defaulting to 0
    pub fn offset(&self) -> u64 {
        match self.get("from") {
            Some(ParamValue::Number(n)) => n
                .as_u64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                        .map(|f| f as u64)
                })
                .unwrap_or(0),
            Some(ParamValue::Text(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// Renders the bindings as the JSON object sent to the backend
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(key, value)| (key.clone(), Value::from(value.clone())))
                .collect(),
        )
    }

    /// Returns a normalized copy of these parameters.
    ///
    /// Steps, in order:
    /// 1. `query` is overwritten with the caller's full original query text.
    /// 2. When both `lat` and `lon` are present they are copied to
    ///    `latitude` / `longitude`; the originals stay.
    /// 3. `distance` gets an explicit unit (`miles` unless one is given).
    /// 4. A `home_price` range such as `"0-500000"` collapses to its upper bound.
    pub fn normalized(&self, original_query: &str) -> SearchParams {
        let mut params = self.clone();

        params.insert("query", ParamValue::Text(original_query.to_string()));

        if let (Some(lat), Some(lon)) = (self.get("lat").cloned(), self.get("lon").cloned()) {
            params.insert("latitude", lat);
            params.insert("longitude", lon);
        }

        if let Some(distance) = params.0.remove("distance") {
            params.insert("distance", normalize_distance(distance));
        }

        if let Some(price) = params.0.remove("home_price") {
            params.insert("home_price", normalize_home_price(price));
        }

        params
    }
}

fn normalize_distance(value: ParamValue) -> ParamValue {
    match value {
        ParamValue::Number(n) => ParamValue::Text(format!("{}miles", number_text(&n))),
        ParamValue::Text(text) => ParamValue::Text(distance_with_unit(text)),
        other => other,
    }
}

/// Whole-valued floats render without a fractional part
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

fn distance_with_unit(text: String) -> String {
    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        format!("{text}miles")
    } else if let Some(amount) = text.strip_suffix("mi") {
        format!("{amount}miles")
    } else if !text.contains("miles") && !text.contains("km") {
        format!("{text}miles")
    } else {
        text
    }
}

fn normalize_home_price(value: ParamValue) -> ParamValue {
    if let ParamValue::Text(text) = &value {
        if let Some((_, upper)) = text.rsplit_once('-') {
            if let Some(number) = parse_number(upper.trim()) {
                return ParamValue::Number(number);
            }
        }
    }
    value
}

fn parse_number(text: &str) -> Option<Number> {
    if text.is_empty() {
        return None;
    }
    text.parse::<i64>()
        .ok()
        .map(Number::from)
        .or_else(|| text.parse::<f64>().ok().and_then(Number::from_f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn params(value: Value) -> SearchParams {
        match value {
            Value::Object(map) => SearchParams::from_json_map(map),
            other => panic!("expected object, got {other}"),
        }
    }

    fn normalized_distance(value: Value) -> Value {
        let normalized = params(json!({ "distance": value })).normalized("q");
        Value::from(normalized.get("distance").cloned().unwrap())
    }

    #[test]
    fn test_distance_units() {
        assert_eq!(normalized_distance(json!(5)), json!("5miles"));
        assert_eq!(normalized_distance(json!("5")), json!("5miles"));
        assert_eq!(normalized_distance(json!("5mi")), json!("5miles"));
        assert_eq!(normalized_distance(json!("5km")), json!("5km"));
        assert_eq!(normalized_distance(json!("5miles")), json!("5miles"));
    }

    #[test]
    fn test_distance_without_known_unit_gets_miles() {
        assert_eq!(normalized_distance(json!("2.5")), json!("2.5miles"));
        assert_eq!(normalized_distance(json!("10 mi")), json!("10 miles"));
    }

    #[test]
    fn test_distance_fractional_number() {
        assert_eq!(normalized_distance(json!(2.5)), json!("2.5miles"));
    }

    #[test]
    fn test_distance_other_kinds_untouched() {
        assert_eq!(normalized_distance(json!(true)), json!(true));
    }

    #[test]
    fn test_home_price_range_takes_upper_bound() {
        let normalized = params(json!({ "home_price": "0-500000" })).normalized("q");
        assert_eq!(
            normalized.get("home_price"),
            Some(&ParamValue::Number(Number::from(500000)))
        );
    }

    #[test]
    fn test_home_price_number_unchanged() {
        let normalized = params(json!({ "home_price": 500000 })).normalized("q");
        assert_eq!(
            normalized.get("home_price"),
            Some(&ParamValue::Number(Number::from(500000)))
        );
    }

    #[test]
    fn test_home_price_non_numeric_upper_bound_unchanged() {
        let normalized = params(json!({ "home_price": "100000-max" })).normalized("q");
        assert_eq!(
            normalized.get("home_price"),
            Some(&ParamValue::Text("100000-max".to_string()))
        );

        let open_ended = params(json!({ "home_price": "300000-" })).normalized("q");
        assert_eq!(
            open_ended.get("home_price"),
            Some(&ParamValue::Text("300000-".to_string()))
        );
    }

    #[test]
    fn test_home_price_multiple_dashes_uses_last() {
        let normalized = params(json!({ "home_price": "a-b-750000" })).normalized("q");
        assert_eq!(
            normalized.get("home_price"),
            Some(&ParamValue::Number(Number::from(750000)))
        );
    }

    #[test]
    fn test_query_is_overwritten() {
        let normalized = params(json!({ "query": "pool" })).normalized("3 bed house with a pool");
        assert_eq!(
            normalized.get("query"),
            Some(&ParamValue::Text("3 bed house with a pool".to_string()))
        );
    }

    #[test]
    fn test_lat_lon_copied_to_latitude_longitude() {
        let normalized = params(json!({ "lat": 29.1, "lon": -95.1 })).normalized("q");
        assert_eq!(normalized.get("latitude"), normalized.get("lat"));
        assert_eq!(normalized.get("longitude"), normalized.get("lon"));
        assert!(normalized.contains_key("lat"));
        assert!(normalized.contains_key("lon"));
    }

    #[test]
    fn test_lat_without_lon_not_copied() {
        let normalized = params(json!({ "lat": 29.1 })).normalized("q");
        assert!(!normalized.contains_key("latitude"));
        assert!(!normalized.contains_key("longitude"));
    }

    #[test]
    fn test_normalization_leaves_original_untouched() {
        let original = params(json!({ "distance": 5, "query": "old" }));
        let _ = original.normalized("new");
        assert_eq!(
            original.get("distance"),
            Some(&ParamValue::Number(Number::from(5)))
        );
        assert_eq!(original.get("query"), Some(&ParamValue::from("old")));
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let normalized = params(json!({ "features": ["pool", "garage"], "bathrooms": 2 }))
            .normalized("q");
        assert_eq!(
            normalized.to_json(),
            json!({
                "bathrooms": 2,
                "features": ["pool", "garage"],
                "query": "q",
            })
        );
    }

    #[test]
    fn test_offset() {
        assert_eq!(params(json!({})).offset(), 0);
        assert_eq!(params(json!({ "from": 10 })).offset(), 10);
        assert_eq!(params(json!({ "from": "20" })).offset(), 20);
        assert_eq!(params(json!({ "from": -1 })).offset(), 0);
    }

    #[test]
    fn test_offset_accepts_whole_floats() {
        assert_eq!(params(json!({ "from": 10.0 })).offset(), 10);
        assert_eq!(params(json!({ "from": 10.5 })).offset(), 0);
        assert_eq!(params(json!({ "from": -2.0 })).offset(), 0);
    }

    #[test]
    fn test_distance_whole_float_has_no_fraction() {
        assert_eq!(normalized_distance(json!(5.0)), json!("5miles"));
    }
}
