//! Actor kinds.

use serde::{Deserialize, Serialize};

/// The kind of actor a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// A vendor managing their own store and products.
    #[default]
    Vendor,
    /// A shopper browsing the marketplace.
    Customer,
}

impl ActorKind {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vendor => "vendor",
            Self::Customer => "customer",
        }
    }
}

impl std::fmt::Display for ActorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        assert_eq!(serde_json::to_string(&ActorKind::Vendor).unwrap(), "\"vendor\"");
        let kind: ActorKind = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(kind, ActorKind::Customer);
    }
}
