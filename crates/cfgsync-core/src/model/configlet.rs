// ── Configlet domain types ──

use serde::{Deserialize, Serialize};

/// Configlet type as far as reconciliation cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum ConfigletKind {
    /// A generator script that produces one configlet per device.
    Builder,
    /// Output of a builder for one device, named with a version suffix.
    Generated,
    /// Anything else: hand-written, reconciled, imported.
    Static,
}

impl ConfigletKind {
    /// Map the controller's `type` string. Unknown types are `Static`.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "Builder" => Self::Builder,
            "Generated" => Self::Generated,
            _ => Self::Static,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configlet {
    pub key: String,
    pub name: String,
    pub kind: ConfigletKind,
    /// Configuration body. Compared byte-for-byte, never parsed.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub config: String,
}

impl Configlet {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        kind: ConfigletKind,
        config: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            kind,
            config: config.into(),
        }
    }

    /// Name with the trailing `_<version>` segment removed.
    ///
    /// `mcast_leaf1_20240102` becomes `mcast_leaf1`. A name without `_` is
    /// returned whole.
    pub fn version_stripped_name(&self) -> &str {
        self.name
            .rfind('_')
            .map_or(self.name.as_str(), |idx| &self.name[..idx])
    }

    pub fn is_builder(&self) -> bool {
        self.kind == ConfigletKind::Builder
    }

    pub fn is_generated(&self) -> bool {
        self.kind == ConfigletKind::Generated
    }
}

/// A freshly generated configlet, tagged with the device it was built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedConfiglet {
    /// System MAC of the target device.
    pub device_id: String,
    pub configlet: Configlet,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Configlet {
        Configlet::new("k", name, ConfigletKind::Generated, "")
    }

    #[test]
    fn strips_last_segment_only() {
        assert_eq!(
            named("mcast_leaf1_20240102").version_stripped_name(),
            "mcast_leaf1"
        );
        assert_eq!(named("a_b").version_stripped_name(), "a");
    }

    #[test]
    fn name_without_underscore_is_its_own_prefix() {
        assert_eq!(named("standalone").version_stripped_name(), "standalone");
    }

    #[test]
    fn trailing_underscore_strips_to_base() {
        assert_eq!(named("mcast_").version_stripped_name(), "mcast");
    }

    #[test]
    fn wire_kinds() {
        assert_eq!(ConfigletKind::from_wire("Builder"), ConfigletKind::Builder);
        assert_eq!(
            ConfigletKind::from_wire("Generated"),
            ConfigletKind::Generated
        );
        assert_eq!(ConfigletKind::from_wire("Static"), ConfigletKind::Static);
        assert_eq!(ConfigletKind::from_wire("Reconciled"), ConfigletKind::Static);
        assert_eq!(ConfigletKind::from_wire(""), ConfigletKind::Static);
    }
}
