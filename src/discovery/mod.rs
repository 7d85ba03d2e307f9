use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::models::Poll;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("whitespace pattern is valid");
}

// Keeps brand-new polls from dominating the trending tab
const TRENDING_AGE_OFFSET_HOURS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedTab {
    #[default]
    Trending,
    Recent,
    #[serde(rename = "popular")]
    MostVoted,
}

impl FromStr for FeedTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trending" => Ok(FeedTab::Trending),
            "recent" => Ok(FeedTab::Recent),
            "popular" | "most_voted" => Ok(FeedTab::MostVoted),
            other => Err(format!("Unknown feed tab: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub tab: FeedTab,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Collapses runs of whitespace and lowercases, so "  Rust   vs  Go " matches
/// "rust vs go".
pub fn normalize(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").to_lowercase()
}

fn matches_search(poll: &Poll, needle: &str) -> bool {
    normalize(&poll.title).contains(needle)
        || poll
            .description
            .as_deref()
            .is_some_and(|d| normalize(d).contains(needle))
}

fn trending_score(poll: &Poll, now: DateTime<Utc>) -> f64 {
    let age_hours = (now - poll.created_at).num_minutes().max(0) as f64 / 60.0;
    poll.total_votes as f64 / (age_hours + TRENDING_AGE_OFFSET_HOURS)
}

/// Builds the home-page feed: open public polls, filtered and ordered per tab.
pub fn discover(polls: Vec<Poll>, query: &FeedQuery, now: DateTime<Utc>, default_limit: usize) -> Vec<Poll> {
    let needle = query.search.as_deref().map(normalize).unwrap_or_default();

    let mut feed: Vec<Poll> = polls
        .into_iter()
        .filter(|poll| poll.settings.is_public && !poll.is_expired(now))
        .filter(|poll| needle.is_empty() || matches_search(poll, &needle))
        .collect();

    let newest_first = |a: &Poll, b: &Poll| b.created_at.cmp(&a.created_at);
    match query.tab {
        FeedTab::Recent => feed.sort_by(newest_first),
        FeedTab::MostVoted => feed.sort_by(|a, b| {
            b.total_votes.cmp(&a.total_votes).then_with(|| newest_first(a, b))
        }),
        FeedTab::Trending => feed.sort_by(|a, b| {
            trending_score(b, now)
                .partial_cmp(&trending_score(a, now))
                .unwrap_or(Ordering::Equal)
                .then_with(|| newest_first(a, b))
        }),
    }

    feed.truncate(query.limit.unwrap_or(default_limit));
    feed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{at, poll_with_votes};
    use chrono::Duration;

    fn poll(id: &str, title: &str, votes: u64, created_hour: u32) -> Poll {
        let mut poll = poll_with_votes(&[votes, 0]);
        poll.id = id.to_string();
        poll.title = title.to_string();
        poll.created_at = at(created_hour);
        poll.expires_at = at(created_hour) + Duration::hours(72);
        poll
    }

    fn ids(feed: &[Poll]) -> Vec<&str> {
        feed.iter().map(|p| p.id.as_str()).collect()
    }

    fn sample() -> Vec<Poll> {
        vec![
            poll("old-popular", "Favourite programming language", 120, 0),
            poll("new-hot", "Which frontend framework?", 40, 10),
            poll("newest-quiet", "How often do you refactor?", 1, 11),
        ]
    }

    #[test]
    fn recent_tab_is_newest_first() {
        let query = FeedQuery { tab: FeedTab::Recent, ..Default::default() };
        let feed = discover(sample(), &query, at(12), 20);
        assert_eq!(ids(&feed), vec!["newest-quiet", "new-hot", "old-popular"]);
    }

    #[test]
    fn most_voted_tab_orders_by_total() {
        let query = FeedQuery { tab: FeedTab::MostVoted, ..Default::default() };
        let feed = discover(sample(), &query, at(12), 20);
        assert_eq!(ids(&feed), vec!["old-popular", "new-hot", "newest-quiet"]);
    }

    #[test]
    fn trending_favours_recent_activity() {
        // old-popular: 120 / 14h, new-hot: 40 / 4h, newest-quiet: 1 / 3h
        let feed = discover(sample(), &FeedQuery::default(), at(12), 20);
        assert_eq!(ids(&feed), vec!["new-hot", "old-popular", "newest-quiet"]);
    }

    #[test]
    fn private_and_expired_polls_are_left_out() {
        let mut polls = sample();
        polls[0].settings.is_public = false;
        polls[1].expires_at = at(5);
        let feed = discover(polls, &FeedQuery::default(), at(12), 20);
        assert_eq!(ids(&feed), vec!["newest-quiet"]);
    }

    #[test]
    fn search_is_case_and_whitespace_insensitive() {
        let query = FeedQuery {
            search: Some("  FRONTEND   framework ".to_string()),
            ..Default::default()
        };
        let feed = discover(sample(), &query, at(12), 20);
        assert_eq!(ids(&feed), vec!["new-hot"]);

        let blank = FeedQuery { search: Some("   ".to_string()), ..Default::default() };
        assert_eq!(discover(sample(), &blank, at(12), 20).len(), 3);
    }

    #[test]
    fn search_also_looks_at_description() {
        let mut polls = sample();
        polls[2].description = Some("Curious about coding   habits".to_string());
        let query = FeedQuery { search: Some("coding habits".to_string()), ..Default::default() };
        assert_eq!(ids(&discover(polls, &query, at(12), 20)), vec!["newest-quiet"]);
    }

    #[test]
    fn limit_truncates_feed() {
        let query = FeedQuery { tab: FeedTab::Recent, limit: Some(2), ..Default::default() };
        assert_eq!(discover(sample(), &query, at(12), 20).len(), 2);
        assert_eq!(discover(sample(), &FeedQuery::default(), at(12), 1).len(), 1);
    }

    #[test]
    fn tab_names_parse() {
        assert_eq!("popular".parse::<FeedTab>(), Ok(FeedTab::MostVoted));
        assert_eq!(" Recent ".parse::<FeedTab>(), Ok(FeedTab::Recent));
        assert!("hot".parse::<FeedTab>().is_err());
    }
}
