//! Message categorization — fixed pattern cascade, most specific first.

use crate::mail::{Category, EmailMessage};

const TRANSACTIONAL_PATTERNS: &[&str] = &[
    "receipt",
    "invoice",
    "order confirmation",
    "shipping",
    "delivery",
    "payment",
];

const NEWSLETTER_PATTERNS: &[&str] = &[
    "unsubscribe",
    "newsletter",
    "digest",
    "weekly update",
    "monthly update",
];

const PROMOTIONAL_PATTERNS: &[&str] = &[
    "sale",
    "discount",
    "offer",
    "deal",
    "promo",
    "limited time",
    "free shipping",
];

const SOCIAL_PATTERNS: &[&str] = &[
    "linkedin",
    "twitter",
    "facebook",
    "instagram",
    "notification",
    "mentioned you",
    "tagged you",
];

/// Categorize a message from its subject, snippet, and sender.
///
/// Pattern groups are checked in specificity order — a message matching
/// both a transactional and a promotional phrase is transactional. When
/// no pattern matches, provider category labels decide; the final
/// fallback is [`Category::Other`].
pub fn categorize(msg: &EmailMessage) -> Category {
    let text = format!("{} {} {}", msg.subject, msg.snippet, msg.sender).to_lowercase();

    if matches_any(&text, TRANSACTIONAL_PATTERNS) {
        return Category::Transactional;
    }
    if matches_any(&text, NEWSLETTER_PATTERNS) {
        return Category::Newsletter;
    }
    if matches_any(&text, PROMOTIONAL_PATTERNS) {
        return Category::Promotional;
    }
    if matches_any(&text, SOCIAL_PATTERNS) {
        return Category::Social;
    }

    // Fall back to the provider's own category labels.
    for label in &msg.labels {
        match label.to_lowercase().as_str() {
            "category_social" => return Category::Social,
            "category_promotions" => return Category::Promotional,
            "category_updates" => return Category::Newsletter,
            _ => {}
        }
    }

    Category::Other
}

fn matches_any(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| text.contains(p))
}
