//! Closed enums for drift event classification.
//!
//! Every enum here has an exhaustive `as_str` and `label`, so adding a variant
//! is a compile error at each lookup table rather than a silent default.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{EnumIter, EnumString};

/// Coarse triage bucket for a drift event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Severity {
    /// Needs immediate attention.
    Critical,
    /// Worth reviewing.
    Risk,
    /// Benign churn.
    Noise,
}

impl Severity {
    /// All severities, most severe first.
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Risk, Severity::Noise];

    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Risk => "risk",
            Severity::Noise => "noise",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Risk => "Risk",
            Severity::Noise => "Noise",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of the changed artifact.
///
/// Deserialization is lenient: any string the engine sends that is not a
/// known category becomes [`AssetType::Unknown`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum AssetType {
    /// JavaScript bundle or script.
    #[strum(serialize = "js", serialize = "javascript")]
    Js,
    /// API surface.
    Api,
    /// Hosting, DNS, TLS, CDN.
    #[strum(serialize = "infrastructure", serialize = "infra")]
    Infrastructure,
    /// Third-party or exposed service.
    Service,
    /// Leaked credential or key.
    #[strum(serialize = "secret", serialize = "secrets")]
    Secret,
    /// Anything the engine could not classify.
    Unknown,
}

impl AssetType {
    /// All asset types in display order.
    pub const ALL: [AssetType; 6] = [
        AssetType::Js,
        AssetType::Api,
        AssetType::Infrastructure,
        AssetType::Service,
        AssetType::Secret,
        AssetType::Unknown,
    ];

    /// Asset types offered as filters (Unknown is not selectable).
    pub const FILTERABLE: [AssetType; 5] = [
        AssetType::Js,
        AssetType::Api,
        AssetType::Infrastructure,
        AssetType::Service,
        AssetType::Secret,
    ];

    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Js => "js",
            AssetType::Api => "api",
            AssetType::Infrastructure => "infrastructure",
            AssetType::Service => "service",
            AssetType::Secret => "secret",
            AssetType::Unknown => "unknown",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            AssetType::Js => "JavaScript",
            AssetType::Api => "API",
            AssetType::Infrastructure => "Infrastructure",
            AssetType::Service => "Service",
            AssetType::Secret => "Secret",
            AssetType::Unknown => "Unknown",
        }
    }

    /// Compact label for breakdown lines.
    pub fn short_label(&self) -> &'static str {
        match self {
            AssetType::Js => "JS",
            AssetType::Api => "API",
            AssetType::Infrastructure => "Infra",
            AssetType::Service => "Services",
            AssetType::Secret => "Secrets",
            AssetType::Unknown => "Other",
        }
    }
}

impl<'de> Deserialize<'de> for AssetType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(AssetType::from_str(&raw).unwrap_or(AssetType::Unknown))
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of change the engine detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ChangeType {
    AssetAdded,
    AssetModified,
    AssetRemoved,
    EndpointAdded,
    EndpointModified,
    SecretDetected,
    ServiceChange,
}

impl ChangeType {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::AssetAdded => "asset_added",
            ChangeType::AssetModified => "asset_modified",
            ChangeType::AssetRemoved => "asset_removed",
            ChangeType::EndpointAdded => "endpoint_added",
            ChangeType::EndpointModified => "endpoint_modified",
            ChangeType::SecretDetected => "secret_detected",
            ChangeType::ServiceChange => "service_change",
        }
    }

    /// Short label shown on collapsed event nodes.
    pub fn label(&self) -> &'static str {
        match self {
            ChangeType::AssetAdded => "Added",
            ChangeType::AssetModified => "Modified",
            ChangeType::AssetRemoved => "Removed",
            ChangeType::EndpointAdded => "New Endpoint",
            ChangeType::EndpointModified => "Endpoint Changed",
            ChangeType::SecretDetected => "Secret Exposed",
            ChangeType::ServiceChange => "Service Change",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
