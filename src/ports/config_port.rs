//! Configuration access port trait.
//!
//! Lookups are by INI-style section and key. Numeric settings are parsed and
//! range-checked by the domain, so the port only hands out strings plus the
//! integer getter used for the intel timeout.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
}
