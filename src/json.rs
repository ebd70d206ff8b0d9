/**
 * JSON Deserialization Helpers
 *
 * Support for partial-update request bodies. A field declared as
 * `Option<Option<T>>` with `deserialize_with = "json::double_option"`
 * distinguishes three inputs: an absent key stays the outer `None`
 * (field untouched), an explicit `null` becomes `Some(None)` (clear the
 * field), and a value becomes `Some(Some(value))`.
 *
 * Plain `Option<Option<T>>` cannot do this on its own: serde's `Option`
 * deserializer maps JSON `null` to `None`, collapsing "null" and
 * "absent" into the same outer `None`.
 */

use serde::{Deserialize, Deserializer};

/// Deserializer for nullable partial-update fields
///
/// Only runs when the key is present, so pair it with
/// `#[serde(default)]` for the absent case.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    struct Body {
        #[serde(default, deserialize_with = "super::double_option")]
        note: Option<Option<String>>,
    }

    #[test]
    fn test_absent_key() {
        let body: Body = serde_json::from_str("{}").unwrap();
        assert_eq!(body.note, None);
    }

    #[test]
    fn test_explicit_null() {
        let body: Body = serde_json::from_str(r#"{"note": null}"#).unwrap();
        assert_eq!(body.note, Some(None));
    }

    #[test]
    fn test_value() {
        let body: Body = serde_json::from_str(r#"{"note": "hi"}"#).unwrap();
        assert_eq!(body.note, Some(Some("hi".to_string())));
    }
}
