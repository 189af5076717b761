//! Field validation for request payloads.
//!
//! Each check records at most one message per field; the first failing rule
//! for a field wins. Lengths are counted in characters, not bytes.

use std::collections::HashMap;

use chrono::NaiveDate;

pub type FieldErrors = HashMap<String, String>;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Collects per-field errors for a payload
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn required(&mut self, field: &str, value: &str) -> bool {
        if value.is_empty() {
            self.fail(field, "is required");
            return false;
        }
        true
    }

    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) {
        if !self.required(field, value) {
            return;
        }
        let len = value.chars().count();
        if len < min || len > max {
            self.fail(field, format!("must be between {} and {} characters", min, max));
        }
    }

    pub fn exact_length(&mut self, field: &str, value: &str, len: usize) {
        if self.required(field, value) && value.chars().count() != len {
            self.fail(field, format!("must be exactly {} characters", len));
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if self.required(field, value) && !is_email(value) {
            self.fail(field, "must be a valid email address");
        }
    }

    pub fn one_of(&mut self, field: &str, value: &str, allowed: &[&str]) {
        if self.required(field, value) && !allowed.contains(&value) {
            self.fail(field, format!("must be one of: {}", allowed.join(", ")));
        }
    }

    /// `YYYY-MM-DD`; returns the parsed date when valid
    pub fn date(&mut self, field: &str, value: &str) -> Option<NaiveDate> {
        if !self.required(field, value) {
            return None;
        }
        match NaiveDate::parse_from_str(value, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                self.fail(field, "must be a date in YYYY-MM-DD format");
                None
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Pragmatic address check: one `@`, non-empty local part, dotted domain
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_counts_characters() {
        let mut v = Validator::new();
        v.length("title", "Ümü", 3, 10);
        v.length("author", "ab", 3, 50);
        v.length("missing", "", 3, 50);
        let errors = v.finish().unwrap_err();
        assert!(!errors.contains_key("title"));
        assert_eq!(errors["author"], "must be between 3 and 50 characters");
        assert_eq!(errors["missing"], "is required");
    }

    #[test]
    fn first_failure_per_field_wins() {
        let mut v = Validator::new();
        v.required("email", "");
        v.email("email", "");
        assert_eq!(v.finish().unwrap_err()["email"], "is required");
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("admin@school.sch.id"));
        assert!(is_email("a.b+c@x.io"));
        assert!(!is_email("admin@localhost"));
        assert!(!is_email("@school.id"));
        assert!(!is_email("a@@school.id"));
        assert!(!is_email("a b@school.id"));
        assert!(!is_email("a@school..id"));
    }

    #[test]
    fn dates_and_enumerations() {
        let mut v = Validator::new();
        assert!(v.date("dob", "2010-02-28").is_some());
        assert!(v.date("bad", "28-02-2010").is_none());
        v.one_of("gender", "male", &["male", "female"]);
        v.one_of("student_type", "old", &["new", "transfer"]);
        v.exact_length("nisn", "123", 10);
        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains_key("bad"));
        assert!(errors.contains_key("student_type"));
        assert!(errors.contains_key("nisn"));
    }
}
