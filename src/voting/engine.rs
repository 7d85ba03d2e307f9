use chrono::{DateTime, Utc};

use crate::models::Poll;
use crate::voting::results::tally;
use crate::voting::{VoteError, VoteOutcome, ViewerState};

/// Records one vote on `poll`.
///
/// Checks run in a fixed order: already voted, unknown option, then expiry.
/// Nothing is written until all three pass, so a rejected vote leaves `poll`
/// exactly as it was. `voter_has_voted` must be read fresh by the caller; the
/// store repeats the check when it persists.
pub fn apply_vote(
    poll: &mut Poll,
    voter_has_voted: bool,
    chosen_option_id: &str,
    now: DateTime<Utc>,
) -> Result<VoteOutcome, VoteError> {
    if voter_has_voted {
        return Err(VoteError::AlreadyVoted);
    }

    let index = poll
        .options
        .iter()
        .position(|option| option.id == chosen_option_id)
        .ok_or(VoteError::InvalidOption)?;

    if poll.is_expired(now) {
        return Err(VoteError::PollExpired);
    }

    poll.options[index].votes += 1;
    poll.total_votes += 1;

    Ok(VoteOutcome {
        poll_id: poll.id.clone(),
        chosen_option_id: chosen_option_id.to_string(),
        tallies: tally(poll),
        total_votes: poll.total_votes,
        viewer: ViewerState::Voted,
    })
}
