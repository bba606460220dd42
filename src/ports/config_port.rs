//! Configuration access port trait.

/// Sectioned key/value settings. Numeric lookups fall back to `default` when
/// the key is missing or unparsable; callers that must tell those apart read
/// the raw string.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
}
