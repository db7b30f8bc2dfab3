//! Strongly-typed identifiers (avoid mixing strings/UUIDs arbitrarily).

use uuid::Uuid;

/// Invitation identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InvitationId(pub Uuid);

/// Reference record identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReferenceId(pub Uuid);

/// Requester identifier. Opaque to this system; the account service owns
/// its meaning.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RequesterId(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invitation_id_debug_and_equality() {
        let uuid = Uuid::now_v7();
        let a = InvitationId(uuid);
        let b = InvitationId(uuid);
        assert_eq!(a, b);
        assert!(format!("{:?}", a).contains(&uuid.to_string()));
    }

    #[test]
    fn test_requester_id_inner_access() {
        let id = RequesterId("acct_42".to_string());
        assert_eq!(id.0, "acct_42");
    }

    #[test]
    fn test_typed_ids_hash() {
        use std::collections::HashSet;

        let uuid = Uuid::now_v7();
        let mut set = HashSet::new();
        set.insert(ReferenceId(uuid));
        assert!(set.contains(&ReferenceId(uuid)));
    }
}
