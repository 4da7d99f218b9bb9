//! Fake configuration flags for share service unit tests
//!
//! A service's unit tests run against fake drivers and in-memory backends.
//! [`set_defaults`] installs those values on a [`FlagSet`] as *defaults*:
//! anything a test sets explicitly still wins.

use std::collections::HashMap;

/// A typed configuration flag value
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Str(String),
    Bool(bool),
    Int(i64),
}

impl FlagValue {
    /// String value, if this flag is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean value, if this flag is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FlagValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer value, if this flag is an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FlagValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        FlagValue::Str(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        FlagValue::Str(value)
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        FlagValue::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        FlagValue::Int(value)
    }
}

/// Two-layer flag store: explicit values shadow defaults.
///
/// `set` records an explicit value; `set_default` replaces only the
/// default layer, never an explicit value. This mirrors how service
/// configuration separates operator settings from built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct FlagSet {
    values: HashMap<String, FlagValue>,
    defaults: HashMap<String, FlagValue>,
}

impl FlagSet {
    /// Create an empty flag set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit value; wins over any default
    pub fn set(&mut self, key: &str, value: impl Into<FlagValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Replace the default for a flag; explicit values are untouched
    pub fn set_default(&mut self, key: &str, value: impl Into<FlagValue>) {
        self.defaults.insert(key.to_string(), value.into());
    }

    /// Look up a flag: the explicit value if set, else the default
    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        self.values.get(key).or_else(|| self.defaults.get(key))
    }

    /// String flag lookup
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FlagValue::as_str)
    }

    /// Boolean flag lookup
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(FlagValue::as_bool)
    }

    /// Integer flag lookup
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(FlagValue::as_int)
    }
}

/// Share type name the fake defaults install
pub const FAKE_SHARE_TYPE: &str = "fake_share_type";

/// Install the fake service configuration as defaults.
///
/// Points the service at fake drivers and in-memory backends so its unit
/// tests never touch real storage, messaging, or a database.
pub fn set_defaults(flags: &mut FlagSet) {
    flags.set_default("default_share_type", FAKE_SHARE_TYPE);
    flags.set_default("share_driver", "fake");
    flags.set_default("export_helper", "fake");
    flags.set_default("connection_type", "fake");
    flags.set_default("rpc_backend", "fake");
    flags.set_default("export_targets", 8i64);
    flags.set_default("verbose", true);
    flags.set_default("sql_connection", "sqlite://");
    flags.set_default("sqlite_synchronous", false);
    flags.set_default("policy_file", "tests/policy.json");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_installed() {
        let mut flags = FlagSet::new();
        set_defaults(&mut flags);

        assert_eq!(flags.get_str("share_driver"), Some("fake"));
        assert_eq!(flags.get_str("default_share_type"), Some(FAKE_SHARE_TYPE));
        assert_eq!(flags.get_str("sql_connection"), Some("sqlite://"));
        assert_eq!(flags.get_bool("sqlite_synchronous"), Some(false));
        assert_eq!(flags.get_bool("verbose"), Some(true));
        assert_eq!(flags.get_int("export_targets"), Some(8));
    }

    #[test]
    fn explicit_value_wins_over_default() {
        let mut flags = FlagSet::new();
        flags.set("share_driver", "lvm");
        set_defaults(&mut flags);

        assert_eq!(flags.get_str("share_driver"), Some("lvm"));
        // Untouched flags still get the fake default
        assert_eq!(flags.get_str("rpc_backend"), Some("fake"));
    }

    #[test]
    fn set_default_replaces_only_the_default_layer() {
        let mut flags = FlagSet::new();
        flags.set_default("verbose", false);
        flags.set_default("verbose", true);
        assert_eq!(flags.get_bool("verbose"), Some(true));

        flags.set("verbose", false);
        flags.set_default("verbose", true);
        assert_eq!(flags.get_bool("verbose"), Some(false));
    }

    #[test]
    fn typed_accessors_reject_other_types() {
        let mut flags = FlagSet::new();
        flags.set("export_targets", 8i64);
        assert_eq!(flags.get_str("export_targets"), None);
        assert_eq!(flags.get_bool("export_targets"), None);
        assert_eq!(flags.get_int("export_targets"), Some(8));
        assert!(flags.get("missing").is_none());
    }
}
