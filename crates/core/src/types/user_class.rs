//! User classes.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The class a session was issued for.
///
/// Fixed at login time; the only way to change it is to log in again with
/// credentials from the other table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserClass {
    /// Phone + OTP user.
    Regular,
    /// Email + password administrator.
    Admin,
}

impl UserClass {
    /// Wire name of the class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&UserClass::Regular).unwrap(), "\"regular\"");
        assert_eq!(serde_json::to_string(&UserClass::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<UserClass>("\"admin\"").unwrap(),
            UserClass::Admin
        );
        assert!(serde_json::from_str::<UserClass>("\"superuser\"").is_err());
    }
}
