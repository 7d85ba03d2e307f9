use super::{
    Field, FieldError, PollDraft, MAX_DESCRIPTION_LEN, MAX_OPTIONS, MAX_OPTION_LEN,
    MAX_TITLE_LEN, MIN_OPTIONS, MIN_TITLE_LEN,
};

type Rule = fn(&PollDraft, &mut Vec<FieldError>);

// Every rule runs; none of them stops the others.
const RULES: &[(&str, Rule)] = &[
    ("title", check_title),
    ("description", check_description),
    ("option_count", check_option_count),
    ("option_text", check_option_texts),
];

pub(super) fn check_all(draft: &PollDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for (name, rule) in RULES {
        let before = errors.len();
        rule(draft, &mut errors);
        if errors.len() > before {
            log::debug!("draft rule '{}' reported {} error(s)", name, errors.len() - before);
        }
    }
    errors
}

fn push(errors: &mut Vec<FieldError>, field: Field, message: String) {
    errors.push(FieldError { field, message });
}

fn trimmed_len(text: &str) -> usize {
    text.trim().chars().count()
}

fn check_title(draft: &PollDraft, errors: &mut Vec<FieldError>) {
    let len = trimmed_len(&draft.title);
    if len < MIN_TITLE_LEN {
        push(errors, Field::Title, format!("Title must be at least {MIN_TITLE_LEN} characters"));
    } else if len > MAX_TITLE_LEN {
        push(errors, Field::Title, format!("Title must be at most {MAX_TITLE_LEN} characters"));
    }
}

fn check_description(draft: &PollDraft, errors: &mut Vec<FieldError>) {
    if trimmed_len(&draft.description) > MAX_DESCRIPTION_LEN {
        push(
            errors,
            Field::Description,
            format!("Description must be at most {MAX_DESCRIPTION_LEN} characters"),
        );
    }
}

fn check_option_count(draft: &PollDraft, errors: &mut Vec<FieldError>) {
    let count = draft.options.len();
    if count < MIN_OPTIONS {
        push(errors, Field::Options, format!("At least {MIN_OPTIONS} options are required"));
    } else if count > MAX_OPTIONS {
        push(errors, Field::Options, format!("Maximum {MAX_OPTIONS} options allowed"));
    }
}

fn check_option_texts(draft: &PollDraft, errors: &mut Vec<FieldError>) {
    for (index, text) in draft.options.iter().enumerate() {
        let len = trimmed_len(text);
        if len == 0 {
            push(errors, Field::Option(index), "Option cannot be empty".to_string());
        } else if len > MAX_OPTION_LEN {
            push(
                errors,
                Field::Option(index),
                format!("Option must be at most {MAX_OPTION_LEN} characters"),
            );
        }
    }
}
