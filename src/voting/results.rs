use crate::models::Poll;
use crate::voting::{OptionTally, PollResults};

/// Share of `total` held by `votes`, rounded half-up to a whole percent.
/// Integer arithmetic keeps exact halves from drifting.
pub fn percentage(votes: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    let (votes, total) = (u128::from(votes), u128::from(total));
    ((votes * 200 + total) / (total * 2)) as u32
}

fn plural(count: u64) -> &'static str {
    if count == 1 { "vote" } else { "votes" }
}

/// Per-option counts and percentages in display order. Percentages are not
/// nudged to add up to 100.
pub fn tally(poll: &Poll) -> Vec<OptionTally> {
    poll.options
        .iter()
        .map(|option| OptionTally {
            option_id: option.id.clone(),
            text: option.text.clone(),
            votes: option.votes,
            percentage: percentage(option.votes, poll.total_votes),
        })
        .collect()
}

pub fn summarize(poll: &Poll) -> PollResults {
    let raw_results = tally(poll);

    // If no votes were cast
    if poll.total_votes == 0 {
        return PollResults {
            leader: "No votes were cast".to_string(),
            leader_id: None,
            summary: "No votes were cast in this poll.".to_string(),
            raw_results,
            hidden: false,
        };
    }

    let top = raw_results.iter().map(|t| t.votes).max().unwrap_or(0);
    let leaders: Vec<&OptionTally> = raw_results.iter().filter(|t| t.votes == top).collect();

    let (leader, leader_id) = match leaders.as_slice() {
        [only] => (only.text.clone(), Some(only.option_id.clone())),
        tied => (
            format!(
                "Tie between {}",
                tied.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(", ")
            ),
            None,
        ),
    };

    let mut summary = String::new();
    for line in &raw_results {
        summary.push_str(&format!(
            "{}: {} {} ({}%)\n",
            line.text,
            line.votes,
            plural(line.votes),
            line.percentage
        ));
    }
    summary.push_str(&format!("\n{} {} in total.", poll.total_votes, plural(poll.total_votes)));

    PollResults {
        leader,
        leader_id,
        summary,
        raw_results,
        hidden: false,
    }
}

/// Stand-in for a poll's results when the viewer may not see them.
pub fn hidden_results() -> PollResults {
    PollResults {
        leader: "Results are hidden".to_string(),
        leader_id: None,
        summary: "Results are hidden.".to_string(),
        raw_results: Vec::new(),
        hidden: true,
    }
}
