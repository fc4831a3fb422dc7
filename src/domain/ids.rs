//! Domain identifier types with validation
//!
//! Newtype wrappers for DHIS2 and Go.Data identifiers. DHIS2 uses 11 character
//! UIDs and Go.Data uses UUIDs, but neither format is enforced here: the only
//! invariant is that an identifier is never blank.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, rejecting blank strings
            pub fn new(id: impl Into<String>) -> Result<Self, String> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(format!("{} cannot be empty", $label));
                }
                Ok(Self(id))
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes self and returns the inner String
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// DHIS2 organisation unit identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use casebridge::domain::ids::OrgUnitId;
    ///
    /// let id = OrgUnitId::new("ImspTQPwCqd").unwrap();
    /// assert_eq!(id.as_str(), "ImspTQPwCqd");
    /// assert!(OrgUnitId::new("  ").is_err());
    /// ```
    OrgUnitId,
    "Organisation unit ID"
);

define_id!(
    /// Go.Data outbreak identifier
    OutbreakId,
    "Outbreak ID"
);

define_id!(
    /// DHIS2 program identifier
    ProgramId,
    "Program ID"
);

define_id!(
    /// DHIS2 program stage identifier
    ProgramStageId,
    "Program stage ID"
);

define_id!(
    /// DHIS2 data element identifier
    DataElementId,
    "Data element ID"
);

define_id!(
    /// DHIS2 tracked entity attribute identifier
    AttributeId,
    "Attribute ID"
);

define_id!(
    /// DHIS2 tracked entity instance identifier
    TrackedEntityId,
    "Tracked entity ID"
);
