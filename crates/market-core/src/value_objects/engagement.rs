//! Listing engagement: who viewed a listing and how fast a seller answers

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Messages considered when computing a seller's response time
pub const RESPONSE_SAMPLE_LIMIT: i64 = 2000;

/// Replies slower than this are treated as outliers
pub const MAX_RESPONSE_DAYS: i64 = 7;

/// Identity a listing view is counted against
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Viewer {
    User(Uuid),
    /// Anonymous visitor tracked by a session cookie
    Session(String),
}

/// The parts of a message response-time analysis needs
#[derive(Debug, Clone)]
pub struct ThreadMessage {
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseTimeNote {
    Ok,
    Empty,
    NoReplies,
}

/// Average time between a buyer's first message and the seller's first reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTime {
    pub average_minutes: Option<i64>,
    pub samples: usize,
    pub note: ResponseTimeNote,
}

impl ResponseTime {
    pub fn empty() -> Self {
        Self {
            average_minutes: None,
            samples: 0,
            note: ResponseTimeNote::Empty,
        }
    }

    /// Compute from messages in the seller's conversations.
    ///
    /// Each conversation yields at most one sample: the first inbound message
    /// and the first seller message strictly after it.
    pub fn from_messages(seller_id: Uuid, messages: &[ThreadMessage]) -> Self {
        if messages.is_empty() {
            return Self::empty();
        }

        let mut threads: HashMap<Uuid, Vec<&ThreadMessage>> = HashMap::new();
        for message in messages {
            threads.entry(message.conversation_id).or_default().push(message);
        }

        let cap = Duration::days(MAX_RESPONSE_DAYS);
        let mut diffs: Vec<f64> = Vec::new();
        for thread in threads.values_mut() {
            thread.sort_by_key(|m| m.created_at);
            let Some(inbound) = thread.iter().find(|m| m.sender_id != seller_id) else {
                continue;
            };
            let Some(reply) = thread
                .iter()
                .find(|m| m.sender_id == seller_id && m.created_at > inbound.created_at)
            else {
                continue;
            };
            let elapsed = reply.created_at - inbound.created_at;
            if elapsed <= cap {
                diffs.push(elapsed.num_milliseconds() as f64 / 60_000.0);
            }
        }

        if diffs.is_empty() {
            return Self {
                average_minutes: None,
                samples: 0,
                note: ResponseTimeNote::NoReplies,
            };
        }

        let average = diffs.iter().sum::<f64>() / diffs.len() as f64;
        Self {
            average_minutes: Some(average.round() as i64),
            samples: diffs.len(),
            note: ResponseTimeNote::Ok,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn msg(conversation_id: Uuid, sender_id: Uuid, minutes: i64) -> ThreadMessage {
        ThreadMessage {
            conversation_id,
            sender_id,
            created_at: at(minutes),
        }
    }

    #[test]
    fn test_empty_input() {
        let rt = ResponseTime::from_messages(Uuid::new_v4(), &[]);
        assert_eq!(rt, ResponseTime::empty());
        assert_eq!(rt.note, ResponseTimeNote::Empty);
    }

    #[test]
    fn test_average_of_first_replies() {
        let seller = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let (buyer_a, buyer_b) = (Uuid::new_v4(), Uuid::new_v4());

        let messages = vec![
            msg(a, buyer_a, 0),
            msg(a, buyer_a, 5),
            msg(a, seller, 10),
            msg(a, seller, 500),
            msg(b, buyer_b, 100),
            msg(b, seller, 131),
        ];

        let rt = ResponseTime::from_messages(seller, &messages);
        assert_eq!(rt.samples, 2);
        // (10 + 31) / 2 = 20.5 rounds away from zero
        assert_eq!(rt.average_minutes, Some(21));
        assert_eq!(rt.note, ResponseTimeNote::Ok);
    }

    #[test]
    fn test_seller_opened_thread_waits_for_inbound() {
        let seller = Uuid::new_v4();
        let conv = Uuid::new_v4();
        let buyer = Uuid::new_v4();

        // Seller speaks first; only the reply after the buyer's message counts
        let messages = vec![msg(conv, seller, 0), msg(conv, buyer, 60), msg(conv, seller, 75)];
        let rt = ResponseTime::from_messages(seller, &messages);
        assert_eq!(rt.average_minutes, Some(15));
        assert_eq!(rt.samples, 1);
    }

    #[test]
    fn test_unanswered_and_slow_threads_are_skipped() {
        let seller = Uuid::new_v4();
        let buyer = Uuid::new_v4();
        let (quiet, slow) = (Uuid::new_v4(), Uuid::new_v4());

        let eight_days = 8 * 24 * 60;
        let messages = vec![
            msg(quiet, buyer, 0),
            msg(slow, buyer, 0),
            msg(slow, seller, eight_days),
        ];
        let rt = ResponseTime::from_messages(seller, &messages);
        assert_eq!(rt.average_minutes, None);
        assert_eq!(rt.samples, 0);
        assert_eq!(rt.note, ResponseTimeNote::NoReplies);
    }

    #[test]
    fn test_note_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ResponseTimeNote::NoReplies).unwrap(),
            "\"no-replies\""
        );
    }
}
