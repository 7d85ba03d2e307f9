use chrono::Utc;
use log::{error, info, warn};
use std::sync::Arc;
use thiserror::Error;

use crate::card::PollCardView;
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::discovery::{FeedQuery, discover};
use crate::draft::{FieldErrors, PollDraft};
use crate::models::{CreatorRef, Poll, VoteRecord};
use crate::profile::{ProfileErrors, UserProfile, validate_profile};
use crate::store::{PollStore, StoreError};
use crate::voting::{PollResults, VoteError, VoteOutcome, apply_vote, hidden_results, summarize};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] FieldErrors),
    #[error(transparent)]
    Profile(#[from] ProfileErrors),
    #[error(transparent)]
    Vote(#[from] VoteError),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Vote(vote) => ServiceError::Vote(vote),
            other => ServiceError::Store(other),
        }
    }
}

/// The operations the UI pages call, wired to a backend store.
pub struct PollService<S: PollStore> {
    store: Arc<S>,
    config: Config,
}

impl<S: PollStore> PollService<S> {
    pub fn new(store: Arc<S>, config: Config) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub async fn create_poll(&self, draft: &PollDraft, creator: CreatorRef) -> Result<Poll, ServiceError> {
        let request = draft.validate().map_err(|errors| {
            warn!("Rejected poll draft from {}: {}", creator.id, errors);
            errors
        })?;

        let poll = Poll::new(request, creator, Utc::now(), self.config.poll_lifetime);
        self.store.insert_poll(poll.clone()).await.map_err(|e| {
            error!("Failed to store poll {}: {}", poll.id, e);
            e
        })?;

        info!("Created poll {} by {} with {} options", poll.id, poll.creator.id, poll.options.len());
        Ok(poll)
    }

    /// Casts `voter_id`'s vote. The engine runs once on a copy with a freshly
    /// read `has_voted` flag, then the store repeats it as the authoritative write.
    pub async fn vote(&self, poll_id: &str, voter_id: &str, option_id: &str) -> Result<VoteOutcome, ServiceError> {
        let now = Utc::now();
        let mut preview = self.store.get_poll(poll_id).await?;
        let has_voted = self.store.has_voted(poll_id, voter_id).await?;

        if let Err(e) = apply_vote(&mut preview, has_voted, option_id, now) {
            warn!("Vote by {} on poll {} rejected: {}", voter_id, poll_id, e);
            return Err(e.into());
        }

        let outcome = self
            .store
            .record_vote(VoteRecord::new(poll_id, voter_id, option_id, now))
            .await
            .map_err(|e| {
                warn!("Store refused vote by {} on poll {}: {}", voter_id, poll_id, e);
                e
            })?;

        info!("Recorded vote: poll_id={}, voter={}, option_id={}", poll_id, voter_id, option_id);
        Ok(outcome)
    }

    pub async fn poll_card(&self, poll_id: &str, viewer_id: Option<&str>) -> Result<PollCardView, ServiceError> {
        let poll = self.store.get_poll(poll_id).await?;
        let vote = match viewer_id {
            Some(viewer) => self.store.get_vote(poll_id, viewer).await?,
            None => None,
        };
        Ok(PollCardView::build(&poll, vote.as_ref(), Utc::now()))
    }

    /// Home-page feed as cards for `viewer_id`, or for a signed-out visitor.
    pub async fn discover(&self, query: &FeedQuery, viewer_id: Option<&str>) -> Result<Vec<PollCardView>, ServiceError> {
        let now = Utc::now();
        let polls = self.store.list_polls().await?;
        let feed = discover(polls, query, now, self.config.feed_limit);

        let mut cards = Vec::with_capacity(feed.len());
        for poll in &feed {
            let vote = match viewer_id {
                Some(viewer) => self.store.get_vote(&poll.id, viewer).await?,
                None => None,
            };
            cards.push(PollCardView::build(poll, vote.as_ref(), now));
        }
        Ok(cards)
    }

    pub async fn dashboard(&self, user_id: &str) -> Result<Dashboard, ServiceError> {
        let profile = self.store.get_profile(user_id).await?;
        let created = self.store.list_polls_by_creator(user_id).await?;

        let mut voted = Vec::new();
        for vote in self.store.votes_by_voter(user_id).await? {
            match self.store.get_poll(&vote.poll_id).await {
                Ok(poll) => voted.push((vote, poll)),
                // deleted between the two reads
                Err(StoreError::PollNotFound(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(Dashboard::build(profile, &created, &voted, Utc::now()))
    }

    pub async fn delete_poll(&self, poll_id: &str, requester_id: &str) -> Result<(), ServiceError> {
        self.store.delete_poll(poll_id, requester_id).await.map_err(|e| {
            warn!("Delete of poll {} by {} failed: {}", poll_id, requester_id, e);
            e
        })?;
        info!("Poll {} deleted by {}", poll_id, requester_id);
        Ok(())
    }

    pub async fn update_profile(&self, profile: UserProfile) -> Result<UserProfile, ServiceError> {
        validate_profile(&profile, Utc::now().date_naive())?;
        self.store.save_profile(profile.clone()).await?;
        info!("Profile updated for {}", profile.user_id);
        Ok(profile)
    }

    /// Standings for `viewer_id`. Counts stay hidden from viewers who have not
    /// voted and from everyone when the creator turned the count off.
    pub async fn results(&self, poll_id: &str, viewer_id: Option<&str>) -> Result<PollResults, ServiceError> {
        let poll = self.store.get_poll(poll_id).await?;
        let has_voted = match viewer_id {
            Some(viewer) => self.store.has_voted(poll_id, viewer).await?,
            None => false,
        };

        if !poll.settings.show_vote_count || !has_voted {
            return Ok(hidden_results());
        }
        Ok(summarize(&poll))
    }
}
