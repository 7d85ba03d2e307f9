mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Poll, VoteRecord};
use crate::profile::UserProfile;
use crate::voting::{VoteError, VoteOutcome};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Poll not found: {0}")]
    PollNotFound(String),
    #[error("A poll with id {0} already exists")]
    DuplicatePoll(String),
    #[error("User {user_id} may not modify poll {poll_id}")]
    Forbidden { poll_id: String, user_id: String },
    #[error(transparent)]
    Vote(#[from] VoteError),
    #[error("Backend error: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// The persistence and auth backend the polls live in.
///
/// `record_vote` is the one place the one-vote-per-viewer rule is authoritative:
/// implementations must check for an existing record and apply the vote as a
/// single atomic step.
#[async_trait]
pub trait PollStore: Send + Sync {
    async fn insert_poll(&self, poll: Poll) -> Result<(), StoreError>;

    async fn get_poll(&self, poll_id: &str) -> Result<Poll, StoreError>;

    async fn list_polls(&self) -> Result<Vec<Poll>, StoreError>;

    async fn list_polls_by_creator(&self, creator_id: &str) -> Result<Vec<Poll>, StoreError>;

    /// Removes a poll and every vote cast on it. Only the creator may do this.
    async fn delete_poll(&self, poll_id: &str, requester_id: &str) -> Result<(), StoreError>;

    async fn has_voted(&self, poll_id: &str, voter_id: &str) -> Result<bool, StoreError>;

    async fn get_vote(&self, poll_id: &str, voter_id: &str) -> Result<Option<VoteRecord>, StoreError>;

    async fn votes_by_voter(&self, voter_id: &str) -> Result<Vec<VoteRecord>, StoreError>;

    async fn record_vote(&self, vote: VoteRecord) -> Result<VoteOutcome, StoreError>;

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError>;

    async fn save_profile(&self, profile: UserProfile) -> Result<(), StoreError>;
}
