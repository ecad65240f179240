//! Request-body validation helpers.
//!
//! Validators collect every failing field instead of stopping at the first
//! one, so clients get the full list back in the `details` array of a 400
//! response.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email regex is valid")
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            value: None,
        }
    }

    pub fn with_value(field: &str, message: &str, value: Value) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            value: Some(value),
        }
    }
}

/// Accumulates field errors while a request body is being checked.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ok with `value` when nothing was recorded, otherwise every error.
    pub fn finish<T>(self, value: T) -> Result<T, Vec<FieldError>> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self.0)
        }
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }

    /// A string that is present and non-blank after trimming.
    pub fn required_string(
        &mut self,
        field: &str,
        value: Option<&Value>,
        message: &str,
    ) -> Option<String> {
        match value {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(other) if !other.is_null() && !other.is_string() => {
                self.push(FieldError::with_value(field, message, other.clone()));
                None
            }
            _ => {
                self.add(field, message);
                None
            }
        }
    }

    /// An optional string; `null` counts as absent.
    pub fn optional_string(
        &mut self,
        field: &str,
        value: Option<&Value>,
        message: &str,
    ) -> Option<String> {
        match value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                self.push(FieldError::with_value(field, message, other.clone()));
                None
            }
        }
    }

    /// An optional number; numeric strings such as `"499"` are accepted.
    pub fn optional_number(
        &mut self,
        field: &str,
        value: Option<&Value>,
        message: &str,
    ) -> Option<f64> {
        match value {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Some(n),
                _ => {
                    self.push(FieldError::with_value(field, message, Value::String(s.clone())));
                    None
                }
            },
            Some(other) => {
                self.push(FieldError::with_value(field, message, other.clone()));
                None
            }
        }
    }

    /// A required integer within `min..=max`. Integer strings and whole-number
    /// floats (`5.0`) are accepted.
    pub fn integer_in_range(
        &mut self,
        field: &str,
        value: Option<&Value>,
        min: i64,
        max: i64,
        message: &str,
    ) -> Option<i64> {
        let parsed = match value {
            Some(Value::Number(n)) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            }),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        };

        match parsed {
            Some(n) if (min..=max).contains(&n) => Some(n),
            _ => {
                match value {
                    Some(v) => self.push(FieldError::with_value(field, message, v.clone())),
                    None => self.add(field, message),
                }
                None
            }
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 255 && EMAIL_RE.is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// At least one uppercase letter, one lowercase letter and one digit.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_password_strength() {
        assert!(is_strong_password("Password1"));
        assert!(!is_strong_password("password1"));
        assert!(!is_strong_password("PASSWORD1"));
        assert!(!is_strong_password("Password"));
    }

    #[test]
    fn test_required_string_rejects_blank() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            errors.required_string("product", Some(&json!("  ")), "Product is required"),
            None
        );
        assert_eq!(errors.required_string("offer", None, "Offer is required"), None);
        let errors = errors.into_vec();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "product");
        assert_eq!(errors[1].message, "Offer is required");
    }

    #[test]
    fn test_optional_number_accepts_numeric_strings() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            errors.optional_number("mrp", Some(&json!("499")), "MRP must be a number"),
            Some(499.0)
        );
        assert_eq!(
            errors.optional_number("mrp", Some(&json!(12.5)), "MRP must be a number"),
            Some(12.5)
        );
        assert_eq!(errors.optional_number("mrp", Some(&json!(null)), "x"), None);
        assert!(errors.is_empty());

        assert_eq!(
            errors.optional_number("mrp", Some(&json!("cheap")), "MRP must be a number"),
            None
        );
        let errors = errors.into_vec();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].value, Some(json!("cheap")));
    }

    #[test]
    fn test_integer_in_range() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.integer_in_range("rating", Some(&json!(5)), 1, 5, "bad"), Some(5));
        assert_eq!(errors.integer_in_range("rating", Some(&json!("3")), 1, 5, "bad"), Some(3));
        assert_eq!(errors.integer_in_range("rating", Some(&json!(5.0)), 1, 5, "bad"), Some(5));
        assert!(errors.is_empty());

        assert_eq!(errors.integer_in_range("rating", Some(&json!(6)), 1, 5, "bad"), None);
        assert_eq!(errors.integer_in_range("rating", Some(&json!(2.5)), 1, 5, "bad"), None);
        assert_eq!(errors.integer_in_range("rating", Some(&json!(6.0)), 1, 5, "bad"), None);
        assert_eq!(errors.integer_in_range("rating", None, 1, 5, "bad"), None);
        assert_eq!(errors.into_vec().len(), 4);
    }
}
