pub mod engine;
pub mod results;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use engine::apply_vote;
pub use results::{hidden_results, percentage, summarize, tally};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum VoteError {
    #[error("You have already voted in this poll")]
    AlreadyVoted,
    #[error("That option is not part of this poll")]
    InvalidOption,
    #[error("This poll has expired")]
    PollExpired,
}

/// Where a viewer stands on one poll. `Voted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerState {
    NotVoted,
    Voted,
}

impl ViewerState {
    pub fn has_voted(self) -> bool {
        self == ViewerState::Voted
    }
}

impl From<bool> for ViewerState {
    fn from(has_voted: bool) -> Self {
        if has_voted {
            ViewerState::Voted
        } else {
            ViewerState::NotVoted
        }
    }
}

// Per-option line of a result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTally {
    pub option_id: String,
    pub text: String,
    pub votes: u64,
    pub percentage: u32,
}

/// What a successful vote hands back to the card. Carries no creator identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub poll_id: String,
    pub chosen_option_id: String,
    pub tallies: Vec<OptionTally>,
    pub total_votes: u64,
    pub viewer: ViewerState,
}

// Text summary of a poll's standings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResults {
    pub leader: String,         // Text of the leading option, or a tie/no-votes marker
    pub leader_id: Option<String>,
    pub summary: String,        // One line per option
    pub raw_results: Vec<OptionTally>,
    pub hidden: bool,           // Set when the viewer may not see counts
}
