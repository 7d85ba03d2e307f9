use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::draft::ValidatedPollRequest;

/// Polls stay open for three days unless the config says otherwise.
pub const DEFAULT_POLL_LIFETIME_HOURS: i64 = 72;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub id: String,
    pub creator: CreatorRef,
    pub title: String,
    pub description: Option<String>,
    pub options: Vec<PollOption>,
    pub settings: PollSettings,
    pub total_votes: u64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub id: String,
    pub text: String,
    pub votes: u64,
}

/// Identifies the author of a poll without owning the user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSettings {
    pub is_public: bool,
    pub is_anonymous: bool,
    pub show_vote_count: bool,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            is_public: true,
            is_anonymous: false,
            show_vote_count: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter_id: String,
    pub poll_id: String,
    pub option_id: String,
    pub timestamp: DateTime<Utc>,
}

impl Poll {
    pub fn new(
        request: ValidatedPollRequest,
        creator: CreatorRef,
        created_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        let options = request
            .options
            .into_iter()
            .map(|text| PollOption {
                id: Uuid::new_v4().to_string(),
                text,
                votes: 0,
            })
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            creator,
            title: request.title,
            description: request.description,
            options,
            settings: request.settings,
            total_votes: 0,
            created_at,
            expires_at: created_at + lifetime,
        }
    }

    pub fn option(&self, option_id: &str) -> Option<&PollOption> {
        self.options.iter().find(|option| option.id == option_id)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whole hours left before the poll closes, never negative.
    pub fn hours_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_hours().max(0)
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.creator.id == user_id
    }
}

impl VoteRecord {
    pub fn new(poll_id: &str, voter_id: &str, option_id: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            voter_id: voter_id.to_string(),
            poll_id: poll_id.to_string(),
            option_id: option_id.to_string(),
            timestamp,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn new_poll_expires_after_lifetime() {
        let request = ValidatedPollRequest {
            title: "Lunch spot".to_string(),
            description: None,
            options: vec!["Tacos".to_string(), "Ramen".to_string()],
            settings: PollSettings::default(),
        };
        let poll = Poll::new(request, creator(), at(0), Duration::hours(72));

        assert_eq!(poll.expires_at - poll.created_at, Duration::hours(72));
        assert_eq!(poll.options.len(), 2);
        assert_ne!(poll.options[0].id, poll.options[1].id);
        assert!(poll.options.iter().all(|o| o.votes == 0));
        assert_eq!(poll.total_votes, 0);
    }

    #[test]
    fn hours_remaining_is_clamped_once_expired() {
        let poll = poll_with_votes(&[0, 0]);
        assert_eq!(poll.hours_remaining(at(1)), 71);
        assert_eq!(poll.hours_remaining(poll.expires_at + Duration::hours(5)), 0);
        assert!(poll.is_expired(poll.expires_at));
        assert!(!poll.is_expired(poll.expires_at - Duration::seconds(1)));
    }
}
