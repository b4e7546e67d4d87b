//! User domain types.

use serde::{Deserialize, Serialize};

/// User permission level.
///
/// Stored in the database as the SCREAMING_SNAKE_CASE string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Standard,
    Administrator,
}

impl UserRole {
    /// Parse from the stored string value. Returns `None` for unknown values.
    pub fn from_str_value(v: &str) -> Option<Self> {
        match v {
            "STANDARD" => Some(Self::Standard),
            "ADMINISTRATOR" => Some(Self::Administrator),
            _ => None,
        }
    }

    /// Stored string value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::Administrator => "ADMINISTRATOR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_str_to_user_role() {
        assert_eq!(
            UserRole::from_str_value("STANDARD"),
            Some(UserRole::Standard)
        );
        assert_eq!(
            UserRole::from_str_value("ADMINISTRATOR"),
            Some(UserRole::Administrator)
        );
        assert_eq!(UserRole::from_str_value("ROOT"), None);
    }

    #[test]
    fn should_convert_user_role_to_str() {
        assert_eq!(UserRole::Standard.as_str(), "STANDARD");
        assert_eq!(UserRole::Administrator.as_str(), "ADMINISTRATOR");
    }

    #[test]
    fn should_round_trip_user_role_via_serde() {
        for role in [UserRole::Standard, UserRole::Administrator] {
            let json = serde_json::to_string(&role).unwrap();
            let parsed: UserRole = serde_json::from_str(&json).unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn should_serialize_as_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&UserRole::Administrator).unwrap(),
            "\"ADMINISTRATOR\""
        );
    }
}
