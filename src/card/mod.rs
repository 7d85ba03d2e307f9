use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Poll, VoteRecord};
use crate::voting::{OptionTally, ViewerState, tally};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Visibility {
    Public,
    Private,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Byline {
    Creator { name: String, avatar: Option<String> },
    Anonymous,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BallotOption {
    pub option_id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardBody {
    /// The viewer can still pick an option.
    Ballot { options: Vec<BallotOption> },
    /// The viewer never voted and the poll is over.
    Closed,
    /// `tallies` and `total_votes` are `None` when the creator hid the count.
    Results {
        options: Vec<BallotOption>,
        user_vote: Option<String>,
        tallies: Option<Vec<OptionTally>>,
        total_votes: Option<u64>,
    },
}

/// Everything the voting card shows for one poll and one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollCardView {
    pub poll_id: String,
    pub title: String,
    pub description: Option<String>,
    pub visibility: Visibility,
    pub byline: Byline,
    pub hours_remaining: i64,
    pub is_expired: bool,
    pub viewer: ViewerState,
    pub body: CardBody,
}

impl PollCardView {
    pub fn build(poll: &Poll, viewer_vote: Option<&VoteRecord>, now: DateTime<Utc>) -> Self {
        let viewer = ViewerState::from(viewer_vote.is_some());
        let is_expired = poll.is_expired(now);

        let options: Vec<BallotOption> = poll
            .options
            .iter()
            .map(|o| BallotOption {
                option_id: o.id.clone(),
                text: o.text.clone(),
            })
            .collect();

        let body = match (viewer, is_expired) {
            (ViewerState::NotVoted, false) => CardBody::Ballot { options },
            (ViewerState::NotVoted, true) => CardBody::Closed,
            (ViewerState::Voted, _) => {
                let show = poll.settings.show_vote_count;
                CardBody::Results {
                    options,
                    user_vote: viewer_vote.map(|v| v.option_id.clone()),
                    tallies: show.then(|| tally(poll)),
                    total_votes: show.then_some(poll.total_votes),
                }
            }
        };

        let byline = if poll.settings.is_anonymous {
            Byline::Anonymous
        } else {
            Byline::Creator {
                name: poll.creator.name.clone(),
                avatar: poll.creator.avatar.clone(),
            }
        };

        Self {
            poll_id: poll.id.clone(),
            title: poll.title.clone(),
            description: poll.description.clone(),
            visibility: if poll.settings.is_public {
                Visibility::Public
            } else {
                Visibility::Private
            },
            byline,
            hours_remaining: poll.hours_remaining(now),
            is_expired,
            viewer,
            body,
        }
    }
}
