use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::draft::PollDraft;
use crate::models::CreatorRef;
use crate::service::PollService;
use crate::store::PollStore;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedVote {
    pub voter_id: String,
    /// Position of the chosen option in the draft.
    pub option: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedPoll {
    pub creator: CreatorRef,
    pub draft: PollDraft,
    #[serde(default)]
    pub votes: Vec<SeedVote>,
}

pub fn load(path: &Path) -> Result<Vec<SeedPoll>, SeedError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Creates each seeded poll and casts its votes through the service, so seed
/// data goes through the same validation as user input. Entries that fail are
/// logged and skipped. Returns how many polls were created.
pub async fn apply<S: PollStore>(service: &PollService<S>, seeds: Vec<SeedPoll>) -> usize {
    let mut created = 0;
    for seed in seeds {
        let poll = match service.create_poll(&seed.draft, seed.creator).await {
            Ok(poll) => poll,
            Err(e) => {
                warn!("Skipping seed poll {:?}: {}", seed.draft.title, e);
                continue;
            }
        };
        created += 1;

        for vote in seed.votes {
            let Some(option) = poll.options.get(vote.option) else {
                warn!("Seed vote by {} points at missing option {}", vote.voter_id, vote.option);
                continue;
            };
            if let Err(e) = service.vote(&poll.id, &vote.voter_id, &option.id).await {
                warn!("Seed vote by {} on {} failed: {}", vote.voter_id, poll.id, e);
            }
        }
    }
    info!("Seeded {} poll(s)", created);
    created
}
