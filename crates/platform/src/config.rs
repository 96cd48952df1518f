use std::collections::BTreeMap;

/// System configuration parameters (string key/value pairs).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigParams {
    params: BTreeMap<String, String>,
}

impl ConfigParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_param_returns_what_was_set() {
        let mut params = ConfigParams::new();
        params.set("sales.pricelist_setting", "percentage");
        assert_eq!(params.get_param("sales.pricelist_setting"), Some("percentage"));
        assert_eq!(params.get_param("other"), None);
    }
}
