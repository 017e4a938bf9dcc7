/// Device domain types
use super::{DeviceId, UserId};
use serde::{Deserialize, Serialize};

/// Device type indicating the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Web,
    Desktop,
    Mobile,
    Speaker,
}

impl DeviceType {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
            Self::Speaker => "speaker",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "web" => Some(Self::Web),
            "desktop" => Some(Self::Desktop),
            "mobile" => Some(Self::Mobile),
            "speaker" => Some(Self::Speaker),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An output device registered by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,

    /// Owner user ID
    pub user_id: UserId,

    /// Display name (e.g., "Kitchen speaker", "Desktop App")
    pub name: String,

    pub device_type: DeviceType,
}
