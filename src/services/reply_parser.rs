//! Parsing of the completion model's free-text reply.
//!
//! [`parse_model_reply`] never substitutes anything; the generator decides
//! to fall back to [`fallback_notifications`] when it fails.

use crate::models::{GeneratedNotification, GeneratedNotifications};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Reply is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Reply has no \"generated\" array")]
    MissingGenerated,
}

#[derive(Debug, Deserialize)]
struct RawReply {
    generated: Option<Value>,
    #[serde(default)]
    suggestions: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawVariant {
    title: Option<Value>,
    description: Option<Value>,
    #[serde(rename = "estimatedCTR")]
    estimated_ctr: Option<Value>,
    confidence: Option<Value>,
    reasoning: Option<Value>,
}

/// Strips one surrounding markdown code fence such as
/// "```json\n{...}\n```" if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening line.
    match body.find('\n') {
        Some(newline) => body[newline + 1..].trim(),
        None => body.trim(),
    }
}

fn as_text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Missing, null, zero or non-numeric values all become 0.
fn as_number(value: Option<Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

pub fn parse_model_reply(text: &str) -> Result<GeneratedNotifications, ParseError> {
    let raw: RawReply = serde_json::from_str(strip_code_fence(text))?;

    let items = match raw.generated {
        Some(Value::Array(items)) => items,
        _ => return Err(ParseError::MissingGenerated),
    };

    let generated = items
        .into_iter()
        .map(|item| {
            let variant: RawVariant = serde_json::from_value(item).unwrap_or_default();
            GeneratedNotification {
                id: None,
                title: as_text(variant.title),
                description: as_text(variant.description),
                estimated_ctr: as_number(variant.estimated_ctr),
                confidence: as_number(variant.confidence),
                reasoning: as_text(variant.reasoning),
            }
        })
        .collect();

    let suggestions = match raw.suggestions {
        Some(Value::Array(values)) => values
            .into_iter()
            .map(|v| as_text(Some(v)))
            .collect(),
        _ => Vec::new(),
    };

    Ok(GeneratedNotifications {
        generated,
        suggestions,
    })
}

/// Returned to the caller whenever the model's reply cannot be parsed.
pub fn fallback_notifications() -> GeneratedNotifications {
    GeneratedNotifications {
        generated: vec![GeneratedNotification {
            id: None,
            title: "Limited Time Offer!".to_string(),
            description: "Don't miss out on this amazing deal".to_string(),
            estimated_ctr: 2.5,
            confidence: 0.7,
            reasoning: "Fallback notification due to parsing error".to_string(),
        }],
        suggestions: vec![
            "Try being more specific with your request".to_string(),
            "Consider testing different emotional triggers".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_VARIANTS: &str = r#"{
        "generated": [
            {"title": "🥥 30% OFF Coconut Oil", "description": "Pure, cold-pressed goodness for less.", "estimatedCTR": 4.2, "confidence": 0.8, "reasoning": "Discount first"},
            {"title": "Last chance ⏰", "description": "30% off ends tonight.", "estimatedCTR": 3.9, "confidence": 0.75, "reasoning": "Urgency"},
            {"title": "Glow naturally ✨", "description": "Organic care for hair and skin.", "estimatedCTR": 3.1, "confidence": 0.7, "reasoning": "Benefit"}
        ],
        "suggestions": ["Send in the evening", "A/B test emojis"]
    }"#;

    #[test]
    fn test_parses_well_formed_reply() {
        let parsed = parse_model_reply(THREE_VARIANTS).unwrap();
        assert_eq!(parsed.generated.len(), 3);
        assert_eq!(parsed.generated[0].estimated_ctr, 4.2);
        assert_eq!(parsed.generated[1].reasoning, "Urgency");
        assert_eq!(parsed.suggestions, vec!["Send in the evening", "A/B test emojis"]);
        assert!(parsed.generated.iter().all(|g| g.id.is_none()));
    }

    #[test]
    fn test_missing_numbers_default_to_zero() {
        let parsed =
            parse_model_reply(r#"{"generated": [{"title": "Hi", "description": "There"}]}"#)
                .unwrap();
        let variant = &parsed.generated[0];
        assert_eq!(variant.estimated_ctr, 0.0);
        assert_eq!(variant.confidence, 0.0);
        assert_eq!(variant.reasoning, "");
        assert!(parsed.suggestions.is_empty());
    }

    #[test]
    fn test_accepts_fenced_json() {
        let fenced = format!("```json\n{}\n```", THREE_VARIANTS);
        assert_eq!(parse_model_reply(&fenced).unwrap().generated.len(), 3);
    }

    #[test]
    fn test_prose_is_an_error() {
        let result = parse_model_reply("Here are three great notifications for you!");
        assert!(matches!(result, Err(ParseError::InvalidJson(_))));
    }

    #[test]
    fn test_generated_must_be_an_array() {
        assert!(matches!(
            parse_model_reply(r#"{"generated": "nope"}"#),
            Err(ParseError::MissingGenerated)
        ));
        assert!(matches!(
            parse_model_reply(r#"{"suggestions": []}"#),
            Err(ParseError::MissingGenerated)
        ));
    }

    #[test]
    fn test_fallback_content() {
        let fallback = fallback_notifications();
        assert_eq!(fallback.generated.len(), 1);
        assert_eq!(fallback.generated[0].title, "Limited Time Offer!");
        assert_eq!(fallback.generated[0].estimated_ctr, 2.5);
        assert_eq!(fallback.suggestions.len(), 2);
    }
}
