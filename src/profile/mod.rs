use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub marital_status: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("profile has {} invalid field(s)", .0.len())]
pub struct ProfileErrors(pub Vec<(&'static str, String)>);

impl ProfileErrors {
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }
}

fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

fn validate_optional(value: Option<&str>, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.unwrap_or_default().trim();
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

fn validate_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Some("Email is required".to_string());
    }
    if trimmed.len() > 254 {
        return Some("Email must be at most 254 characters".to_string());
    }
    if !trimmed.contains('@') || !trimmed.contains('.') {
        return Some("Email must be a valid address (contain '@' and '.')".to_string());
    }
    None
}

/// Checks every profile field and reports all problems together.
pub fn validate_profile(profile: &UserProfile, today: NaiveDate) -> Result<(), ProfileErrors> {
    let checks: [(&'static str, Option<String>); 5] = [
        ("name", validate_required(&profile.name, "Name", 100)),
        ("email", validate_email(&profile.email)),
        ("nationality", validate_optional(profile.nationality.as_deref(), "Nationality", 100)),
        ("occupation", validate_optional(profile.occupation.as_deref(), "Occupation", 100)),
        (
            "date_of_birth",
            profile
                .date_of_birth
                .filter(|dob| *dob > today)
                .map(|_| "Date of birth cannot be in the future".to_string()),
        ),
    ];

    let errors: Vec<(&'static str, String)> = checks
        .into_iter()
        .filter_map(|(field, error)| error.map(|message| (field, message)))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ProfileErrors(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn profile() -> UserProfile {
        UserProfile {
            user_id: "user-1".to_string(),
            name: "Jane Doe".to_string(),
            email: "jane.doe@example.com".to_string(),
            gender: Some("Female".to_string()),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1),
            nationality: Some("United States".to_string()),
            occupation: Some("Software Engineer".to_string()),
            marital_status: Some("Single".to_string()),
            avatar_url: None,
        }
    }

    #[test]
    fn complete_profile_is_valid() {
        assert_eq!(validate_profile(&profile(), today()), Ok(()));
    }

    #[test]
    fn all_problems_are_reported_together() {
        let mut p = profile();
        p.name = "   ".to_string();
        p.email = "not-an-email".to_string();
        p.date_of_birth = NaiveDate::from_ymd_opt(2030, 1, 1);

        let errors = validate_profile(&p, today()).unwrap_err();
        assert_eq!(errors.0.len(), 3);
        assert_eq!(errors.message_for("name"), Some("Name is required"));
        assert!(errors.message_for("email").is_some());
        assert!(errors.message_for("date_of_birth").is_some());
        assert_eq!(errors.message_for("occupation"), None);
    }

    #[test]
    fn email_length_limit() {
        let mut p = profile();
        // 242 + "@example.com" (12) = 254
        p.email = format!("{}@example.com", "a".repeat(242));
        assert_eq!(p.email.len(), 254);
        assert_eq!(validate_profile(&p, today()), Ok(()));

        p.email = format!("{}@example.com", "a".repeat(243));
        let errors = validate_profile(&p, today()).unwrap_err();
        assert_eq!(errors.0.len(), 1);
        assert_eq!(
            errors.message_for("email"),
            Some("Email must be at most 254 characters")
        );
    }

    #[test]
    fn optional_fields_have_length_limits() {
        let mut p = profile();
        p.occupation = Some("o".repeat(101));
        p.nationality = None;
        let errors = validate_profile(&p, today()).unwrap_err();
        assert_eq!(
            errors.message_for("occupation"),
            Some("Occupation must be at most 100 characters")
        );
    }
}
