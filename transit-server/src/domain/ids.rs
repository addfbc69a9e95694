//! Opaque identifier types.
//!
//! Route, sub-route, schedule and stop identifiers are opaque strings
//! assigned by the store. The only validation is that they are non-empty
//! and carry no surrounding whitespace, so that ids typed into a URL and
//! ids read from a document compare equal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} id: {reason}")]
pub struct InvalidId {
    kind: &'static str,
    reason: &'static str,
}

fn check_id(kind: &'static str, s: &str) -> Result<(), InvalidId> {
    if s.is_empty() {
        return Err(InvalidId {
            kind,
            reason: "cannot be empty",
        });
    }
    if s.trim() != s {
        return Err(InvalidId {
            kind,
            reason: "cannot have leading or trailing whitespace",
        });
    }
    Ok(())
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse an identifier, rejecting empty or padded strings.
            pub fn parse(s: impl Into<String>) -> Result<Self, InvalidId> {
                let s = s.into();
                check_id($kind, &s)?;
                Ok(Self(s))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidId;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id!(
    /// Identifier of a [`Route`](super::Route).
    RouteId,
    "route"
);

opaque_id!(
    /// Identifier of a [`SubRoute`](super::SubRoute), unique within its route.
    SubRouteId,
    "sub-route"
);

opaque_id!(
    /// Identifier of a [`Schedule`](super::Schedule).
    ScheduleId,
    "schedule"
);

opaque_id!(
    /// Public identifier of a [`Stop`](super::Stop).
    StopId,
    "stop"
);

opaque_id!(
    /// Identifier of a route feature (a path segment or a stop).
    ///
    /// Stops are looked up either by their own id or by the id of the
    /// feature that carries them.
    FeatureId,
    "feature"
);
