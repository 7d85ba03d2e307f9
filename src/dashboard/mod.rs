use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Poll, VoteRecord};
use crate::profile::UserProfile;

const ANONYMOUS_CREATOR: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedPollSummary {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub votes_count: u64,
    pub is_expired: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VotedPollSummary {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub voted_at: DateTime<Utc>,
    pub creator_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardStats {
    pub polls_created: usize,
    pub votes_received: u64,
    pub polls_voted: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub profile: Option<UserProfile>,
    pub created: Vec<CreatedPollSummary>,
    pub voted: Vec<VotedPollSummary>,
    pub stats: DashboardStats,
}

impl Dashboard {
    pub fn build(
        profile: Option<UserProfile>,
        created_polls: &[Poll],
        voted: &[(VoteRecord, Poll)],
        now: DateTime<Utc>,
    ) -> Self {
        let mut created: Vec<CreatedPollSummary> = created_polls
            .iter()
            .map(|poll| CreatedPollSummary {
                id: poll.id.clone(),
                title: poll.title.clone(),
                description: poll.description.clone(),
                is_public: poll.settings.is_public,
                created_at: poll.created_at,
                votes_count: poll.total_votes,
                is_expired: poll.is_expired(now),
            })
            .collect();
        created.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut voted: Vec<VotedPollSummary> = voted
            .iter()
            .map(|(vote, poll)| VotedPollSummary {
                id: poll.id.clone(),
                title: poll.title.clone(),
                description: poll.description.clone(),
                created_at: poll.created_at,
                voted_at: vote.timestamp,
                creator_name: if poll.settings.is_anonymous {
                    ANONYMOUS_CREATOR.to_string()
                } else {
                    poll.creator.name.clone()
                },
            })
            .collect();
        voted.sort_by(|a, b| b.voted_at.cmp(&a.voted_at));

        let stats = DashboardStats {
            polls_created: created.len(),
            votes_received: created.iter().map(|c| c.votes_count).sum(),
            polls_voted: voted.len(),
        };

        Self {
            profile,
            created,
            voted,
            stats,
        }
    }
}
