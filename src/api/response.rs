//! Envelope handling for Robot webservice responses
//!
//! Every resource comes wrapped in an object keyed by the resource name,
//! e.g. `{"server": {...}}`; list endpoints return an array of such objects.

use serde::de::{DeserializeOwned, Error as _};
use serde_json::Value;

/// Decode a single enveloped resource
pub fn decode_one<T: DeserializeOwned>(text: &str, key: &str) -> Result<T, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    unwrap_envelope(value, key)
}

/// Decode a list of enveloped resources, keeping the server's order
pub fn decode_list<T: DeserializeOwned>(
    text: &str,
    key: &str,
) -> Result<Vec<T>, serde_json::Error> {
    let items: Option<Vec<Value>> = serde_json::from_str(text)?;

    items
        .unwrap_or_default()
        .into_iter()
        .map(|item| unwrap_envelope(item, key))
        .collect()
}

fn unwrap_envelope<T: DeserializeOwned>(mut value: Value, key: &str) -> Result<T, serde_json::Error> {
    match value.get_mut(key) {
        Some(inner) => serde_json::from_value(inner.take()),
        None => Err(serde_json::Error::custom(format!(
            "missing `{}` envelope",
            key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
    }

    #[test]
    fn list_unwraps_in_order() {
        let items: Vec<Item> =
            decode_list(r#"[{"item":{"id":3}},{"item":{"id":1}}]"#, "item").unwrap();
        assert_eq!(items, vec![Item { id: 3 }, Item { id: 1 }]);
    }

    #[test]
    fn null_list_is_empty() {
        let items: Vec<Item> = decode_list("null", "item").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn wrong_envelope_key_fails() {
        let err = decode_one::<Item>(r#"{"other":{"id":1}}"#, "item").unwrap_err();
        assert!(err.to_string().contains("missing `item` envelope"));
    }

    #[test]
    fn one_bad_element_fails_the_whole_list() {
        let result: Result<Vec<Item>, _> =
            decode_list(r#"[{"item":{"id":1}},{"item":{"id":"x"}}]"#, "item");
        assert!(result.is_err());
    }
}
