//! Convenience builder for HTTP query parameters.
//!
//! The API takes every parameter through the query string, so composite
//! inputs (lists, tri-state flags) are flattened to plain strings here.

use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Append a boolean flag, sending `"false"` when it is unset.
    pub fn push_flag(&mut self, key: &'static str, value: Option<bool>) {
        self.pairs.push((key, value.unwrap_or(false).to_string()));
    }

    /// Append a comma-joined list, skipping the key when the list is empty.
    pub fn push_joined<T>(&mut self, key: &'static str, values: &[T])
    where
        T: AsRef<str>,
    {
        if values.is_empty() {
            return;
        }
        let joined = values
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        self.pairs.push((key, joined));
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::QueryParams;

    #[test]
    fn push_opt_skips_none() {
        let mut params = QueryParams::new();
        params.push_opt("image", Option::<String>::None);
        assert!(params.is_empty());
    }

    #[test]
    fn push_flag_defaults_to_false() {
        let mut params = QueryParams::new();
        params.push_flag("backups", None);
        params.push_flag("ipv6", Some(true));
        params.push_flag("private_networking", Some(false));
        assert_eq!(
            params.into_pairs(),
            vec![
                ("backups", "false".to_string()),
                ("ipv6", "true".to_string()),
                ("private_networking", "false".to_string()),
            ]
        );
    }

    #[test]
    fn push_joined_keeps_order() {
        let mut params = QueryParams::new();
        params.push_joined("ssh_keys", &["12", "abc", "7"]);
        assert_eq!(params.into_pairs(), vec![("ssh_keys", "12,abc,7".to_string())]);
    }

    #[test]
    fn push_joined_skips_empty_list() {
        let mut params = QueryParams::new();
        params.push_joined::<String>("ssh_keys", &[]);
        assert!(params.is_empty());
    }
}
