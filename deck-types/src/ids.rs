//! Identity types for swipedeck.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::SwipeError;

/// HTTP header carrying the anonymous device identity.
pub const DEVICE_ID_HEADER: &str = "X-Device-ID";

/// Maximum accepted device identifier length in bytes.
pub const MAX_DEVICE_ID_LEN: usize = 255;

/// Identifier of a person in the feed.
///
/// Assigned by the backend. Stable and totally ordered.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(i64);

impl PersonId {
    /// Create a PersonId from its numeric value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the numeric value of this PersonId.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PersonId({})", self.0)
    }
}

impl From<i64> for PersonId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A client-generated pseudo-identity used in place of authentication.
///
/// Scopes likes and dislikes. Any non-empty string up to
/// [`MAX_DEVICE_ID_LEN`] bytes is accepted; generated ids look like
/// `device-1718000000000-k3j9x0a1b`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceId(String);

impl DeviceId {
    /// Parse a device identifier, trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, SwipeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SwipeError::EmptyDeviceId);
        }
        if trimmed.len() > MAX_DEVICE_ID_LEN {
            return Err(SwipeError::DeviceIdTooLong {
                len: trimmed.len(),
                limit: MAX_DEVICE_ID_LEN,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Generate a fresh identifier: `device-<unix millis>-<9 base36 chars>`.
    ///
    /// Falls back to `default-device-<unix millis>` if the OS random source
    /// is unavailable.
    pub fn generate() -> Self {
        let millis = unix_millis();
        let mut bytes = [0u8; 9];
        match getrandom::getrandom(&mut bytes) {
            Ok(()) => {
                let suffix: String = bytes.iter().map(|b| base36_digit(*b)).collect();
                Self(format!("device-{}-{}", millis, suffix))
            }
            Err(_) => Self(format!("default-device-{}", millis)),
        }
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceId({})", self.0)
    }
}

impl TryFrom<String> for DeviceId {
    type Error = SwipeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

fn base36_digit(byte: u8) -> char {
    const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    ALPHABET[(byte % 36) as usize] as char
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_id_serializes_as_number() {
        let json = serde_json::to_string(&PersonId::new(42)).unwrap();
        assert_eq!(json, "42");
        let back: PersonId = serde_json::from_str("42").unwrap();
        assert_eq!(back, PersonId::new(42));
    }

    #[test]
    fn person_id_ordering() {
        assert!(PersonId::new(1) < PersonId::new(2));
    }

    #[test]
    fn generated_device_id_shape() {
        let id = DeviceId::generate();
        let parts: Vec<&str> = id.as_str().split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "device");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn generated_device_ids_differ() {
        assert_ne!(DeviceId::generate(), DeviceId::generate());
    }

    #[test]
    fn device_id_rejects_blank() {
        assert!(matches!(DeviceId::parse(""), Err(SwipeError::EmptyDeviceId)));
        assert!(matches!(
            DeviceId::parse("   "),
            Err(SwipeError::EmptyDeviceId)
        ));
    }

    #[test]
    fn device_id_rejects_oversized() {
        let long = "x".repeat(MAX_DEVICE_ID_LEN + 1);
        assert!(matches!(
            DeviceId::parse(&long),
            Err(SwipeError::DeviceIdTooLong { .. })
        ));
    }

    #[test]
    fn device_id_trims_whitespace() {
        let id = DeviceId::parse("  abc  ").unwrap();
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn device_id_deserialize_validates() {
        let ok: DeviceId = serde_json::from_str("\"device-1\"").unwrap();
        assert_eq!(ok.as_str(), "device-1");
        assert!(serde_json::from_str::<DeviceId>("\"\"").is_err());
    }
}
