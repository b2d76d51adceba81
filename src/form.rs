//! The comment form shown under a dish, with live per-field error messages.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::data::{Comment, DEFAULT_RATING};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Author,
    Comment,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::Author, Field::Comment];

    pub fn name(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Comment => "comment",
        }
    }

    /// Each rule the field checks, with the message shown when it fails.
    fn rules(self) -> &'static [(Rule, &'static str)] {
        match self {
            Self::Author => &[
                (Rule::Required, "Author Name is required."),
                (Rule::MinLength(2), "Author Name must be at least 2 characters long."),
            ],
            Self::Comment => &[(Rule::Required, "Comment is required.")],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Required,
    MinLength(usize),
}

impl Rule {
    fn violated_by(self, value: &str) -> bool {
        match self {
            Self::Required => value.is_empty(),
            // an empty value is only reported by `Required`
            Self::MinLength(min) => !value.is_empty() && value.chars().count() < min,
        }
    }
}

fn violations(field: Field, value: &str) -> impl Iterator<Item = &'static str> + '_ {
    field
        .rules()
        .iter()
        .filter(move |(rule, _)| rule.violated_by(value))
        .map(|(_, message)| *message)
}

/// Accumulated error text per field. Empty means no visible error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    author: String,
    comment: String,
}

impl FormErrors {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Author => &self.author,
            Field::Comment => &self.comment,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Author => &mut self.author,
            Field::Comment => &mut self.comment,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.author.is_empty() && self.comment.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL
            .into_iter()
            .map(|field| (field, self.get(field)))
            .filter(|(_, text)| !text.is_empty())
    }
}

/// Raw form values. `Default` is the one canonical empty form, used both
/// for a fresh form and after a reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub author: String,
    pub comment: String,
    pub rating: u8,
}

impl Default for CommentDraft {
    fn default() -> Self {
        Self {
            author: String::new(),
            comment: String::new(),
            rating: DEFAULT_RATING,
        }
    }
}

impl CommentDraft {
    fn value(&self, field: Field) -> &str {
        match field {
            Field::Author => &self.author,
            Field::Comment => &self.comment,
        }
    }
}

#[derive(Debug, Default)]
pub struct CommentForm {
    draft: CommentDraft,
    dirty: HashSet<Field>,
    errors: FormErrors,
}

impl CommentForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.draft.author = author.into();
        self.touch(Field::Author);
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.draft.comment = comment.into();
        self.touch(Field::Comment);
    }

    /// Ratings are kept within 1..=5.
    pub fn set_rating(&mut self, rating: u8) {
        self.draft.rating = rating.clamp(1, 5);
        self.on_value_change();
    }

    fn touch(&mut self, field: Field) {
        self.dirty.insert(field);
        self.on_value_change();
    }

    /// Rebuild every field's error text from the current values.
    pub fn on_value_change(&mut self) {
        for field in Field::ALL {
            let slot = self.errors.slot(field);
            slot.clear();
            if !self.dirty.contains(&field) {
                continue;
            }
            let messages: Vec<_> = violations(field, self.draft.value(field)).collect();
            *slot = messages.join(" ");
        }
    }

    /// Show errors on untouched fields too, e.g. after a rejected submit.
    pub fn mark_all_dirty(&mut self) {
        self.dirty.extend(Field::ALL);
        self.on_value_change();
    }

    pub fn is_dirty(&self, field: Field) -> bool {
        self.dirty.contains(&field)
    }

    pub fn is_valid(&self) -> bool {
        Field::ALL
            .into_iter()
            .all(|field| violations(field, self.draft.value(field)).next().is_none())
            && (1..=5).contains(&self.draft.rating)
    }

    pub fn draft(&self) -> &CommentDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn reset(&mut self) {
        self.draft = CommentDraft::default();
        self.dirty.clear();
        self.on_value_change();
    }

    pub fn to_comment(&self, at: DateTime<Utc>) -> Comment {
        Comment {
            author: self.draft.author.clone(),
            comment: self.draft.comment.clone(),
            rating: self.draft.rating,
            date: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Check an already-built comment with the same rules the form uses.
pub fn validate_comment(comment: &Comment) -> Result<(), FormErrors> {
    let mut errors = FormErrors::default();
    for (field, value) in [(Field::Author, &comment.author), (Field::Comment, &comment.comment)] {
        let messages: Vec<_> = violations(field, value).collect();
        *errors.slot(field) = messages.join(" ");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_form_shows_nothing() {
        let mut form = CommentForm::new();
        form.on_value_change();
        assert!(form.errors().is_empty());
        assert!(!form.is_valid());
    }

    #[test]
    fn test_author_messages() {
        let mut form = CommentForm::new();

        form.set_author("");
        assert!(form.errors().get(Field::Author).contains("Author Name is required."));
        assert!(!form.errors().get(Field::Author).contains("at least 2"));

        form.set_author("x");
        assert_eq!(
            form.errors().get(Field::Author),
            "Author Name must be at least 2 characters long."
        );

        form.set_author("xy");
        assert_eq!(form.errors().get(Field::Author), "");
        // the comment field was never touched
        assert_eq!(form.errors().get(Field::Comment), "");
    }

    #[test]
    fn test_errors_do_not_accumulate() {
        let mut form = CommentForm::new();
        form.set_comment("");
        let first = form.errors().clone();
        form.on_value_change();
        form.on_value_change();
        assert_eq!(form.errors(), &first);
        assert_eq!(form.errors().get(Field::Comment), "Comment is required.");
    }

    #[test]
    fn test_mark_all_dirty_and_reset() {
        let mut form = CommentForm::new();
        form.mark_all_dirty();
        let fields: Vec<_> = form.errors().iter().map(|(field, _)| field.name()).collect();
        assert_eq!(fields, ["author", "comment"]);

        form.set_author("Alice");
        form.set_comment("Great!");
        form.set_rating(9);
        assert_eq!(form.draft().rating, 5);
        assert!(form.is_valid());

        form.reset();
        assert_eq!(form.draft(), &CommentDraft::default());
        assert!(!form.is_dirty(Field::Author));
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_to_comment_stamps_iso_date() {
        let mut form = CommentForm::new();
        form.set_author("Alice");
        form.set_comment("Great!");
        let at = DateTime::parse_from_rfc3339("2026-10-16T08:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let comment = form.to_comment(at);
        assert_eq!(comment.date, "2026-10-16T08:30:00.000Z");
        assert_eq!(comment.rating, DEFAULT_RATING);
    }

    #[test]
    fn test_validate_comment() {
        let mut comment = Comment {
            author: "A".to_string(),
            comment: String::new(),
            rating: 4,
            date: String::new(),
        };
        let errors = validate_comment(&comment).unwrap_err();
        assert!(!errors.get(Field::Author).is_empty());
        assert_eq!(errors.get(Field::Comment), "Comment is required.");

        comment.author = "Ann".to_string();
        comment.comment = "Tasty".to_string();
        assert!(validate_comment(&comment).is_ok());
    }

    #[test]
    fn test_every_rule_has_its_own_message() {
        for field in Field::ALL {
            let messages: Vec<_> = field.rules().iter().map(|(_, message)| *message).collect();
            assert!(!messages.is_empty());
            for (i, message) in messages.iter().enumerate() {
                assert!(!messages[i + 1..].contains(message), "{message}");
            }
        }

        let mut form = CommentForm::new();
        form.set_comment("x");
        assert_eq!(form.errors().get(Field::Comment), "");
    }
}
