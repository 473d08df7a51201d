//! Field-level validation rules.
//!
//! Rules are declared through a [`Validator`], which appends a message to a
//! [`ValidationErrors`] set for every rule that does not hold. The set keeps
//! insertion order so joined messages read in the order rules were declared.
//!
//! ```
//! use actionforge_common::ValidationErrors;
//!
//! let title = "  ";
//! let errors = ValidationErrors::check(|v| {
//!     v.presence("title", title).max_length("title", title, 80);
//! });
//! assert_eq!(errors.full_messages(), vec!["Title can't be blank"]);
//! ```

use std::fmt;

use regex::Regex;
use serde::Serialize;

/// Key used for errors that are not tied to a single field.
pub const BASE: &str = "base";

/// One message attached to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    /// The message prefixed with the humanized field name, or the bare
    /// message for [`BASE`] errors.
    pub fn full_message(&self) -> String {
        if self.field == BASE {
            self.message.clone()
        } else {
            format!("{} {}", humanize(&self.field), self.message)
        }
    }
}

/// Ordered set of validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    entries: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `rules` against a fresh error set and return it.
    pub fn check(rules: impl FnOnce(&mut Validator<'_>)) -> Self {
        let mut errors = Self::new();
        rules(&mut Validator::new(&mut errors));
        errors
    }

    /// Attach `message` to `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.entries.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Attach a message that is not about any single field.
    pub fn add_base(&mut self, message: impl Into<String>) {
        self.add(BASE, message);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether any message is attached to `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.entries.iter().any(|e| e.field == field)
    }

    /// Messages attached to `field`, in insertion order.
    pub fn get(&self, field: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.entries.iter()
    }

    /// Human-readable messages, e.g. `"Name can't be blank"`.
    pub fn full_messages(&self) -> Vec<String> {
        self.entries.iter().map(FieldError::full_message).collect()
    }

    /// All full messages joined with `", "`.
    pub fn full_message(&self) -> String {
        self.full_messages().join(", ")
    }

    /// Append every entry of `other`.
    pub fn merge(&mut self, other: ValidationErrors) {
        self.entries.extend(other.entries);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_message())
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Turn a field name into the form used in messages: `post_title` becomes
/// `Post title`, `user_id` becomes `User`.
fn humanize(field: &str) -> String {
    let trimmed = field.strip_suffix("_id").unwrap_or(field);
    let spaced = trimmed.replace('_', " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Values that can be "blank": empty or whitespace-only strings, `None`,
/// and empty collections.
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for str {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.as_str().is_blank()
    }
}

impl<T: Blank> Blank for Option<T> {
    fn is_blank(&self) -> bool {
        self.as_ref().map_or(true, Blank::is_blank)
    }
}

impl<T> Blank for [T] {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Blank for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Blank + ?Sized> Blank for &T {
    fn is_blank(&self) -> bool {
        (**self).is_blank()
    }
}

/// Declares rules against an error set.
///
/// Every rule method returns `&mut Self` so rules for one field can be
/// chained.
pub struct Validator<'e> {
    errors: &'e mut ValidationErrors,
}

impl<'e> Validator<'e> {
    pub fn new(errors: &'e mut ValidationErrors) -> Self {
        Self { errors }
    }

    /// The field must not be blank.
    pub fn presence<V: Blank + ?Sized>(&mut self, field: &str, value: &V) -> &mut Self {
        if value.is_blank() {
            self.errors.add(field, "can't be blank");
        }
        self
    }

    /// The field must be blank.
    pub fn absence<V: Blank + ?Sized>(&mut self, field: &str, value: &V) -> &mut Self {
        if !value.is_blank() {
            self.errors.add(field, "must be blank");
        }
        self
    }

    /// At least `min` characters. `None` is skipped.
    pub fn min_length<'v>(
        &mut self,
        field: &str,
        value: impl Into<Option<&'v str>>,
        min: usize,
    ) -> &mut Self {
        if let Some(value) = value.into() {
            if value.chars().count() < min {
                self.errors.add(
                    field,
                    format!("is too short (minimum is {min} characters)"),
                );
            }
        }
        self
    }

    /// At most `max` characters. `None` is skipped.
    pub fn max_length<'v>(
        &mut self,
        field: &str,
        value: impl Into<Option<&'v str>>,
        max: usize,
    ) -> &mut Self {
        if let Some(value) = value.into() {
            if value.chars().count() > max {
                self.errors
                    .add(field, format!("is too long (maximum is {max} characters)"));
            }
        }
        self
    }

    /// The value must match `pattern`. `None` is skipped.
    pub fn format<'v>(
        &mut self,
        field: &str,
        value: impl Into<Option<&'v str>>,
        pattern: &Regex,
    ) -> &mut Self {
        if let Some(value) = value.into() {
            if !pattern.is_match(value) {
                self.errors.add(field, "is invalid");
            }
        }
        self
    }

    /// The value must be one of `allowed`.
    pub fn inclusion<T: PartialEq>(&mut self, field: &str, value: &T, allowed: &[T]) -> &mut Self {
        if !allowed.contains(value) {
            self.errors.add(field, "is not included in the list");
        }
        self
    }

    /// The value must be greater than or equal to `min`.
    pub fn at_least<T>(&mut self, field: &str, value: T, min: T) -> &mut Self
    where
        T: PartialOrd + fmt::Display,
    {
        if value < min {
            self.errors
                .add(field, format!("must be greater than or equal to {min}"));
        }
        self
    }

    /// Record `message` on `field` unless `ok` holds.
    pub fn custom(&mut self, field: &str, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.add(field, message);
        }
        self
    }

    /// Record a message not tied to any field.
    pub fn base(&mut self, message: impl Into<String>) -> &mut Self {
        self.errors.add_base(message);
        self
    }

    pub fn errors(&self) -> &ValidationErrors {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("name"), "Name");
        assert_eq!(humanize("post_title"), "Post title");
        assert_eq!(humanize("user_id"), "User");
    }

    #[test]
    fn test_presence() {
        let missing: Option<String> = None;
        let blank = String::from("   ");
        let present = "foo";

        let errors = ValidationErrors::check(|v| {
            v.presence("a", &missing)
                .presence("b", &blank)
                .presence("c", present);
        });

        assert_eq!(errors.len(), 2);
        assert!(errors.contains("a"));
        assert!(errors.contains("b"));
        assert!(!errors.contains("c"));
    }

    #[test]
    fn test_blank_collections() {
        let empty: Vec<String> = Vec::new();
        assert!(empty.is_blank());
        assert!(!vec![1].is_blank());
        assert!(Some("").is_blank());
        assert!(!Some("x").is_blank());
    }

    #[test]
    fn test_absence() {
        let errors = ValidationErrors::check(|v| {
            v.absence("nickname", "bob");
        });
        assert_eq!(errors.full_message(), "Nickname must be blank");
    }

    #[test]
    fn test_length_rules() {
        let missing: Option<&str> = None;
        let errors = ValidationErrors::check(|v| {
            v.min_length("name", "ab", 3)
                .max_length("title", "abcdef", 5)
                .max_length("skipped", missing, 1)
                .max_length("unicode", "héllo", 5);
        });
        assert_eq!(
            errors.full_messages(),
            vec![
                "Name is too short (minimum is 3 characters)",
                "Title is too long (maximum is 5 characters)",
            ]
        );
    }

    #[test]
    fn test_format() {
        let slug = Regex::new(r"^[a-z0-9-]+$").unwrap();
        let errors = ValidationErrors::check(|v| {
            v.format("slug", "Not A Slug", &slug)
                .format("other", "fine-slug", &slug);
        });
        assert_eq!(errors.get("slug"), vec!["is invalid"]);
        assert!(!errors.contains("other"));
    }

    #[test]
    fn test_inclusion_and_at_least() {
        let errors = ValidationErrors::check(|v| {
            v.inclusion("role", &"root", &["admin", "user"])
                .at_least("posts_count", -1_i64, 0);
        });
        assert_eq!(
            errors.full_message(),
            "Role is not included in the list, Posts count must be greater than or equal to 0"
        );
    }

    #[test]
    fn test_base_and_custom() {
        let errors = ValidationErrors::check(|v| {
            v.custom("title", false, "is reserved")
                .custom("name", true, "never shown")
                .base("Something went wrong");
        });
        assert_eq!(
            errors.full_messages(),
            vec!["Title is reserved", "Something went wrong"]
        );
    }

    #[test]
    fn test_insertion_order_and_grouping() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "can't be blank");
        errors.add("title", "is invalid");
        errors.add("name", "is too short (minimum is 3 characters)");

        assert_eq!(
            errors.get("name"),
            vec!["can't be blank", "is too short (minimum is 3 characters)"]
        );
        assert_eq!(
            errors.to_string(),
            "Name can't be blank, Title is invalid, Name is too short (minimum is 3 characters)"
        );
    }

    #[test]
    fn test_clear_and_merge() {
        let mut errors = ValidationErrors::new();
        errors.add_base("first");
        errors.clear();
        assert!(errors.is_empty());

        let mut other = ValidationErrors::new();
        other.add("name", "can't be blank");
        errors.merge(other);
        assert_eq!(errors.len(), 1);
        assert_eq!((&errors).into_iter().count(), 1);
    }

    #[test]
    fn test_serialize() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "can't be blank");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "field": "name", "message": "can't be blank" }])
        );
    }
}
