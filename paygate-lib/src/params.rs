//! Parameter map shared by outbound requests and inbound responses.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Field name carrying the signature; never part of its own input.
pub const SIGN: &str = "sign";

/// String-keyed, string-valued field map.
///
/// Keys are case-sensitive and kept in lexicographic order, which is the
/// canonical order used for signing. Unknown keys are carried through
/// untouched so new gateway fields never need a client change.
///
/// # Example
///
/// ```
/// use paygate_lib::Params;
///
/// let mut params = Params::new();
/// params.insert("total_fee", "100");
/// params.insert("body", "order1");
///
/// assert_eq!(params.get("total_fee"), Some("100"));
/// assert_eq!(params.value("missing"), "");
/// assert_eq!(params.keys().collect::<Vec<_>>(), ["body", "total_fee"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    /// Create an empty map.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Get a field value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Get a field value, treating an absent field as empty.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// True when the field is absent or empty.
    pub fn is_blank(&self, key: &str) -> bool {
        self.value(key).is_empty()
    }

    /// Insert or overwrite a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Check whether a field is present (even if empty).
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the map holds no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate fields in canonical (ascending key) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate keys in canonical order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Copy of the map without the `sign` field.
    pub fn without_sign(&self) -> Self {
        let mut copy = self.clone();
        copy.remove(SIGN);
        copy
    }

    /// Consume into the underlying ordered map.
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for Params {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K, V> Extend<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (k, v) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", k, v)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_normalized() {
        let a: Params = [("b", "2"), ("a", "1"), ("c", "3")].into_iter().collect();
        let b: Params = [("c", "3"), ("b", "2"), ("a", "1")].into_iter().collect();

        assert_eq!(a, b);
        assert_eq!(a.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut params = Params::new();
        params.insert("Sign", "x");
        params.insert("sign", "y");

        assert_eq!(params.len(), 2);
        assert_eq!(params.without_sign().get("Sign"), Some("x"));
        assert!(!params.without_sign().contains_key("sign"));
    }

    #[test]
    fn test_blank_and_value() {
        let mut params = Params::new();
        params.insert("empty", "");

        assert!(params.is_blank("empty"));
        assert!(params.is_blank("absent"));
        assert!(params.contains_key("empty"));
        assert!(!params.contains_key("absent"));
    }

    #[test]
    fn test_display() {
        let params: Params = [("return_code", "SUCCESS"), ("appid", "A1")]
            .into_iter()
            .collect();
        assert_eq!(params.to_string(), "appid=A1 return_code=SUCCESS");
    }
}
