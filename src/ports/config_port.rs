//! Configuration access port.

/// Lookups over sectioned key/value configuration. Blank values read as
/// absent; numeric parsing lives in `config_validation`.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
