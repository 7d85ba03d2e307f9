use async_trait::async_trait;
use log::{debug, info};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{Poll, VoteRecord};
use crate::profile::UserProfile;
use crate::store::{PollStore, StoreError};
use crate::voting::{VoteOutcome, apply_vote};

#[derive(Default)]
struct State {
    polls: HashMap<String, Poll>,
    // keyed by (poll_id, voter_id), which makes the pair unique
    votes: HashMap<(String, String), VoteRecord>,
    profiles: HashMap<String, UserProfile>,
}

/// Process-local store. Every write happens under one lock, which is what
/// makes `record_vote` atomic.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn vote_key(poll_id: &str, voter_id: &str) -> (String, String) {
    (poll_id.to_string(), voter_id.to_string())
}

#[async_trait]
impl PollStore for MemoryStore {
    async fn insert_poll(&self, poll: Poll) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.polls.contains_key(&poll.id) {
            return Err(StoreError::DuplicatePoll(poll.id));
        }
        debug!("Inserting poll {} with {} options", poll.id, poll.options.len());
        state.polls.insert(poll.id.clone(), poll);
        Ok(())
    }

    async fn get_poll(&self, poll_id: &str) -> Result<Poll, StoreError> {
        let state = self.state.read().await;
        state
            .polls
            .get(poll_id)
            .cloned()
            .ok_or_else(|| StoreError::PollNotFound(poll_id.to_string()))
    }

    async fn list_polls(&self) -> Result<Vec<Poll>, StoreError> {
        let state = self.state.read().await;
        Ok(state.polls.values().cloned().collect())
    }

    async fn list_polls_by_creator(&self, creator_id: &str) -> Result<Vec<Poll>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .polls
            .values()
            .filter(|poll| poll.is_owned_by(creator_id))
            .cloned()
            .collect())
    }

    async fn delete_poll(&self, poll_id: &str, requester_id: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let poll = state
            .polls
            .get(poll_id)
            .ok_or_else(|| StoreError::PollNotFound(poll_id.to_string()))?;

        if !poll.is_owned_by(requester_id) {
            return Err(StoreError::Forbidden {
                poll_id: poll_id.to_string(),
                user_id: requester_id.to_string(),
            });
        }

        state.polls.remove(poll_id);
        let before = state.votes.len();
        state.votes.retain(|(voted_poll, _), _| voted_poll != poll_id);
        info!("Deleted poll {} and {} vote(s)", poll_id, before - state.votes.len());
        Ok(())
    }

    async fn has_voted(&self, poll_id: &str, voter_id: &str) -> Result<bool, StoreError> {
        let state = self.state.read().await;
        Ok(state.votes.contains_key(&vote_key(poll_id, voter_id)))
    }

    async fn get_vote(&self, poll_id: &str, voter_id: &str) -> Result<Option<VoteRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state.votes.get(&vote_key(poll_id, voter_id)).cloned())
    }

    async fn votes_by_voter(&self, voter_id: &str) -> Result<Vec<VoteRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .votes
            .values()
            .filter(|vote| vote.voter_id == voter_id)
            .cloned()
            .collect())
    }

    async fn record_vote(&self, vote: VoteRecord) -> Result<VoteOutcome, StoreError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let key = vote_key(&vote.poll_id, &vote.voter_id);

        let poll = state
            .polls
            .get_mut(&vote.poll_id)
            .ok_or_else(|| StoreError::PollNotFound(vote.poll_id.clone()))?;

        // Re-read under the write lock; this is the check that counts.
        let has_voted = state.votes.contains_key(&key);
        let outcome = apply_vote(poll, has_voted, &vote.option_id, vote.timestamp)?;

        state.votes.insert(key, vote);
        Ok(outcome)
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let state = self.state.read().await;
        Ok(state.profiles.get(user_id).cloned())
    }

    async fn save_profile(&self, profile: UserProfile) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.profiles.insert(profile.user_id.clone(), profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{at, poll_with_votes};
    use crate::voting::VoteError;
    use std::sync::Arc;

    #[tokio::test]
    async fn second_vote_from_same_viewer_is_rejected() {
        let store = MemoryStore::new();
        store.insert_poll(poll_with_votes(&[0, 0])).await.unwrap();

        let outcome = store
            .record_vote(VoteRecord::new("poll-1", "viewer", "a", at(1)))
            .await
            .unwrap();
        assert_eq!(outcome.total_votes, 1);

        let err = store
            .record_vote(VoteRecord::new("poll-1", "viewer", "b", at(2)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Vote(VoteError::AlreadyVoted)));

        let poll = store.get_poll("poll-1").await.unwrap();
        assert_eq!(poll.total_votes, 1);
        assert_eq!(poll.options[1].votes, 0);
        let kept = store.get_vote("poll-1", "viewer").await.unwrap().unwrap();
        assert_eq!(kept.option_id, "a");
    }

    #[tokio::test]
    async fn concurrent_double_submit_counts_once() {
        let store = Arc::new(MemoryStore::new());
        store.insert_poll(poll_with_votes(&[0, 0])).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .record_vote(VoteRecord::new("poll-1", "viewer", "a", at(1)))
                        .await
                        .is_ok()
                })
            })
            .collect();

        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 1);
        assert_eq!(store.get_poll("poll-1").await.unwrap().total_votes, 1);
    }

    #[tokio::test]
    async fn rejected_vote_does_not_create_a_record() {
        let store = MemoryStore::new();
        store.insert_poll(poll_with_votes(&[0, 0])).await.unwrap();

        let err = store
            .record_vote(VoteRecord::new("poll-1", "viewer", "nope", at(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Vote(VoteError::InvalidOption)));
        assert!(!store.has_voted("poll-1", "viewer").await.unwrap());
    }

    #[tokio::test]
    async fn only_creator_can_delete_and_votes_go_with_the_poll() {
        let store = MemoryStore::new();
        store.insert_poll(poll_with_votes(&[0, 0])).await.unwrap();
        store
            .record_vote(VoteRecord::new("poll-1", "viewer", "a", at(1)))
            .await
            .unwrap();

        let err = store.delete_poll("poll-1", "viewer").await.unwrap_err();
        assert!(matches!(err, StoreError::Forbidden { .. }));

        store.delete_poll("poll-1", "user-1").await.unwrap();
        assert!(matches!(
            store.get_poll("poll-1").await,
            Err(StoreError::PollNotFound(_))
        ));
        assert!(store.votes_by_voter("viewer").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_poll_ids_are_refused() {
        let store = MemoryStore::new();
        store.insert_poll(poll_with_votes(&[0, 0])).await.unwrap();
        let err = store.insert_poll(poll_with_votes(&[1, 1])).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicatePoll(id) if id == "poll-1"));
    }
}
