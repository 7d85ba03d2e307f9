mod rules;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::models::PollSettings;

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 5;
pub const MIN_TITLE_LEN: usize = 3;
pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_OPTION_LEN: usize = 100;

/// An in-progress poll as the creation form holds it.
///
/// Option texts sit behind the mutation methods so the form can never grow past
/// [`MAX_OPTIONS`] or shrink below [`MIN_OPTIONS`]. A draft deserialized from a
/// payload skips those guards, which is why [`PollDraft::validate`] checks the
/// count again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub is_anonymous: Option<bool>,
    #[serde(default)]
    pub show_vote_count: Option<bool>,
}

/// A draft that passed every rule, trimmed and ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedPollRequest {
    pub title: String,
    pub description: Option<String>,
    pub options: Vec<String>,
    pub settings: PollSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Maximum {MAX_OPTIONS} options allowed")]
    TooManyOptions,
    #[error("At least {MIN_OPTIONS} options are required")]
    TooFewOptions,
    #[error("There is no option at position {0}")]
    NoSuchOption(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Description,
    Options,
    Option(usize),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Title => write!(f, "title"),
            Field::Description => write!(f, "description"),
            Field::Options => write!(f, "options"),
            Field::Option(index) => write!(f, "options[{index}]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Every problem found in a draft. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("poll draft has {} invalid field(s)", .0.len())]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl Default for PollDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl PollDraft {
    /// A blank draft with the two empty option slots the form starts with.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            options: vec![String::new(); MIN_OPTIONS],
            is_public: None,
            is_anonymous: None,
            show_vote_count: None,
        }
    }

    /// Builds a draft from raw option texts without applying the mutation guards.
    pub fn with_options<I, T>(title: &str, options: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            title: title.to_string(),
            options: options.into_iter().map(Into::into).collect(),
            ..Self::new()
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn can_add_option(&self) -> bool {
        self.options.len() < MAX_OPTIONS
    }

    pub fn can_remove_option(&self) -> bool {
        self.options.len() > MIN_OPTIONS
    }

    /// Appends an empty option and returns its index.
    pub fn add_option(&mut self) -> Result<usize, DraftError> {
        if !self.can_add_option() {
            return Err(DraftError::TooManyOptions);
        }
        self.options.push(String::new());
        Ok(self.options.len() - 1)
    }

    pub fn remove_option(&mut self, index: usize) -> Result<String, DraftError> {
        if index >= self.options.len() {
            return Err(DraftError::NoSuchOption(index));
        }
        if !self.can_remove_option() {
            return Err(DraftError::TooFewOptions);
        }
        Ok(self.options.remove(index))
    }

    pub fn set_option(&mut self, index: usize, text: &str) -> Result<(), DraftError> {
        let slot = self
            .options
            .get_mut(index)
            .ok_or(DraftError::NoSuchOption(index))?;
        *slot = text.to_string();
        Ok(())
    }

    pub fn settings(&self) -> PollSettings {
        let defaults = PollSettings::default();
        PollSettings {
            is_public: self.is_public.unwrap_or(defaults.is_public),
            is_anonymous: self.is_anonymous.unwrap_or(defaults.is_anonymous),
            show_vote_count: self.show_vote_count.unwrap_or(defaults.show_vote_count),
        }
    }

    /// Runs every rule and either returns the trimmed request or all the field
    /// errors at once.
    pub fn validate(&self) -> Result<ValidatedPollRequest, FieldErrors> {
        let errors = rules::check_all(self);
        if !errors.is_empty() {
            return Err(FieldErrors(errors));
        }

        let description = self.description.trim();
        Ok(ValidatedPollRequest {
            title: self.title.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            options: self.options.iter().map(|o| o.trim().to_string()).collect(),
            settings: self.settings(),
        })
    }
}
