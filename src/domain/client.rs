// ============================================================================
// Client Identity
// ============================================================================

use serde::{Deserialize, Serialize};

/// The beneficial owner of an order or quote: the member firm, plus the
/// firm's own client reference where the firm trades on behalf of one.
///
/// Two entries with equal `Client` values belong to the same beneficial
/// owner and must never trade against each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Client {
    pub firm_id: String,
    pub firm_client_id: Option<String>,
}

impl Client {
    pub fn new(firm_id: impl Into<String>, firm_client_id: Option<String>) -> Self {
        Self {
            firm_id: firm_id.into(),
            firm_client_id,
        }
    }
}

/// Client-assigned identity of a request.
///
/// `current` is the live request id; `original` points at the first request
/// of an amend chain; `parent` groups child requests under a containing
/// request (a quote leg's parent is its mass quote id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientRequestId {
    pub current: String,
    pub original: Option<String>,
    pub parent: Option<String>,
}

impl ClientRequestId {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            original: None,
            parent: None,
        }
    }

    pub fn with_parent(current: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            original: None,
            parent: Some(parent.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_client_means_same_owner() {
        let a = Client::new("firm1", Some("client1".into()));
        let b = Client::new("firm1", Some("client1".into()));
        assert_eq!(a, b);

        let c = Client::new("firm1", None);
        assert_ne!(a, c);
    }

    #[test]
    fn test_quote_leg_request_id_carries_parent() {
        let id = ClientRequestId::with_parent("entry1", "quote7");
        assert_eq!(id.current, "entry1");
        assert_eq!(id.parent.as_deref(), Some("quote7"));
        assert_eq!(id.original, None);
    }
}
