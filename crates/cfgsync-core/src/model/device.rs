// ── Device and container domain types ──

use serde::{Deserialize, Serialize};

/// A provisioned network device.
///
/// Identified by its system MAC, which is also the id every provisioning
/// endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub serial_number: String,
    /// Key of the parent container.
    pub container_key: String,
    pub ip_address: String,
    pub fqdn: String,
    pub hostname: Option<String>,
    pub model: Option<String>,
    pub version: Option<String>,
}

impl Device {
    /// Best human-readable name: hostname, then FQDN, then serial.
    pub fn display_name(&self) -> &str {
        self.hostname
            .as_deref()
            .filter(|h| !h.is_empty())
            .or_else(|| Some(self.fqdn.as_str()).filter(|f| !f.is_empty()))
            .unwrap_or(&self.serial_number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub key: String,
    pub name: String,
    pub parent_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(hostname: Option<&str>, fqdn: &str) -> Device {
        Device {
            id: "00:1c:73:00:00:01".into(),
            serial_number: "SN1".into(),
            container_key: "c1".into(),
            ip_address: "10.0.0.1".into(),
            fqdn: fqdn.into(),
            hostname: hostname.map(Into::into),
            model: None,
            version: None,
        }
    }

    #[test]
    fn display_name_fallbacks() {
        assert_eq!(device(Some("leaf1"), "leaf1.lab").display_name(), "leaf1");
        assert_eq!(device(None, "leaf1.lab").display_name(), "leaf1.lab");
        assert_eq!(device(Some(""), "").display_name(), "SN1");
    }
}
