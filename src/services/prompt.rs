//! Prompt text for the notification generator.

use crate::models::{Analytics, GenerateRequest, Notification, UserPreferences};
use std::fmt::Write;

/// Everything known about a user's past performance. Any part may be empty.
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    pub top_notifications: Vec<Notification>,
    pub analytics: Option<Analytics>,
    pub preferences: Option<UserPreferences>,
}

const BASE_SYSTEM_PROMPT: &str = "You are an expert push notification copywriter specialized in creating high-converting mobile push notifications for e-commerce and retail apps.

Your task is to generate 3 push notification variations based on the user's product and offer details.

Guidelines:
1. Keep titles under 50 characters
2. Keep descriptions under 120 characters
3. Use action-oriented language
4. Include emojis strategically
5. Create urgency and FOMO when appropriate
6. Focus on benefits, not just features
7. Use power words that drive action";

const RESPONSE_FORMAT: &str = r#"

Response format should be a JSON object with:
{
  "generated": [
    {
      "title": "notification title",
      "description": "notification description",
      "estimatedCTR": number,
      "confidence": number,
      "reasoning": "why this approach should work"
    }
  ],
  "suggestions": ["tip 1", "tip 2", "tip 3"]
}"#;

fn or_unknown(value: Option<&str>) -> &str {
    value.unwrap_or("not specified")
}

pub fn build_system_prompt(context: &GenerationContext) -> String {
    let mut prompt = String::from(BASE_SYSTEM_PROMPT);

    if let Some(analytics) = &context.analytics {
        let length = analytics
            .best_performing_length
            .map(|l| l.to_string())
            .unwrap_or_else(|| "not specified".to_string());
        let _ = write!(
            prompt,
            "\n\nUSER'S HISTORICAL PERFORMANCE DATA:\n\
             - Average CTR: {}%\n\
             - Top performing words: {}\n\
             - Top performing emojis: {}\n\
             - Best performing tone: {}\n\
             - Best performing length: {} characters\n\
             - Best performing urgency level: {}",
            analytics.avg_ctr,
            analytics.top_performing_words.join(", "),
            analytics.top_performing_emojis.join(", "),
            or_unknown(analytics.best_performing_tone.as_deref()),
            length,
            or_unknown(analytics.best_performing_urgency.as_deref()),
        );
    }

    if let Some(preferences) = &context.preferences {
        let _ = write!(
            prompt,
            "\n\nUSER PREFERENCES:\n\
             - Preferred tone: {}\n\
             - Preferred length: {}\n\
             - Use emojis: {}\n\
             - Preferred urgency: {}",
            or_unknown(preferences.preferred_tone.as_deref()),
            or_unknown(preferences.preferred_length.as_deref()),
            if preferences.preferred_emojis { "Yes" } else { "No" },
            or_unknown(preferences.preferred_urgency.as_deref()),
        );
    }

    if !context.top_notifications.is_empty() {
        prompt.push_str("\n\nTOP PERFORMING NOTIFICATIONS:");
        for (index, notification) in context.top_notifications.iter().enumerate() {
            let _ = write!(
                prompt,
                "\n{}. \"{}\" - \"{}\" (CTR: {}%)",
                index + 1,
                notification.title,
                notification.description,
                notification.ctr
            );
        }
    }

    prompt.push_str(RESPONSE_FORMAT);
    prompt
}

pub fn build_user_prompt(request: &GenerateRequest) -> String {
    let mut prompt = format!(
        "Generate 3 push notification variations for:\n\nProduct: {}\nOffer: {}",
        request.product, request.offer
    );

    // A zero price counts as not given.
    if let (Some(price), Some(mrp)) = (
        request.discounted_price.filter(|p| *p != 0.0),
        request.mrp.filter(|m| *m != 0.0),
    ) {
        let _ = write!(prompt, "\nPrice: ₹{} (was ₹{})", price, mrp);
    }

    let optional_lines = [
        ("Brand", &request.brand),
        ("Category", &request.category),
        ("Desired emotion", &request.emotion),
        ("Urgency level", &request.urgency),
        ("Tone", &request.tone),
    ];
    for (label, value) in optional_lines {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            let _ = write!(prompt, "\n{}: {}", label, value);
        }
    }

    prompt.push_str(
        "\n\nPlease generate 3 different variations with different approaches \
         (e.g., discount-focused, urgency-focused, benefit-focused).",
    );
    prompt
}
