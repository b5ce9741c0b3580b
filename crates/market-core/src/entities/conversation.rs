//! Conversation entity - a chat thread between a buyer and a seller

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Conversation between exactly two participants
///
/// Participants are kept sorted so the same pair always maps to the same row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: Uuid,
    participants: [Uuid; 2],
    pub listing_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new conversation for a pair of users
    pub fn new(id: Uuid, a: Uuid, b: Uuid, listing_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id,
            participants: Self::sorted_pair(a, b),
            listing_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild from storage
    pub fn from_parts(
        id: Uuid,
        participants: [Uuid; 2],
        listing_id: Option<Uuid>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            participants: Self::sorted_pair(participants[0], participants[1]),
            listing_id,
            created_at,
            updated_at,
        }
    }

    /// Canonical ordering of a participant pair
    pub fn sorted_pair(a: Uuid, b: Uuid) -> [Uuid; 2] {
        if a <= b {
            [a, b]
        } else {
            [b, a]
        }
    }

    #[inline]
    pub fn participants(&self) -> [Uuid; 2] {
        self.participants
    }

    #[inline]
    pub fn includes(&self, user_id: Uuid) -> bool {
        self.participants.contains(&user_id)
    }

    /// The participant that is not `user_id`
    pub fn other_participant(&self, user_id: Uuid) -> Option<Uuid> {
        match self.participants {
            [a, b] if a == user_id => Some(b),
            [a, b] if b == user_id => Some(a),
            _ => None,
        }
    }
}

/// When a user last read a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRead {
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub last_read_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participants_are_sorted() {
        let a = Uuid::from_u128(2);
        let b = Uuid::from_u128(1);
        let conv = Conversation::new(Uuid::new_v4(), a, b, None);
        assert_eq!(conv.participants(), [b, a]);
        assert_eq!(Conversation::sorted_pair(a, b), Conversation::sorted_pair(b, a));
    }

    #[test]
    fn test_other_participant() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let conv = Conversation::new(Uuid::new_v4(), a, b, None);

        assert!(conv.includes(a));
        assert_eq!(conv.other_participant(a), Some(b));
        assert_eq!(conv.other_participant(b), Some(a));
        assert_eq!(conv.other_participant(Uuid::from_u128(3)), None);
    }
}
