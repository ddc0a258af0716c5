use crate::domain::models::{LeadData, LeadScore};

/// Service for classifying a submission by urgency
///
/// Rules are applied in order and a later rule overrides an earlier one:
/// 1. start at cold
/// 2. email and phone both present: warm
/// 3. message longer than the threshold: hot, whatever rule 2 decided
#[derive(Debug, Clone)]
pub struct LeadScorer {
    hot_message_threshold: usize,
}

impl Default for LeadScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LeadScorer {
    /// Messages longer than this many characters make a lead hot.
    pub const DEFAULT_HOT_MESSAGE_THRESHOLD: usize = 50;

    pub fn new() -> Self {
        Self {
            hot_message_threshold: Self::DEFAULT_HOT_MESSAGE_THRESHOLD,
        }
    }

    pub fn with_hot_message_threshold(hot_message_threshold: usize) -> Self {
        Self {
            hot_message_threshold,
        }
    }

    /// Score a submission.
    pub fn score(&self, data: &LeadData) -> LeadScore {
        let mut score = LeadScore::Cold;

        if data.has(LeadData::EMAIL) && data.has(LeadData::PHONE) {
            score = LeadScore::Warm;
        }

        if let Some(message) = data.message() {
            if message.chars().count() > self.hot_message_threshold {
                score = LeadScore::Hot;
            }
        }

        score
    }
}

/// Score a submission with the default policy.
pub fn score_lead(data: &LeadData) -> LeadScore {
    LeadScorer::new().score(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: serde_json::Value) -> LeadData {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_submission_is_cold() {
        assert_eq!(score_lead(&LeadData::default()), LeadScore::Cold);
    }

    #[test]
    fn test_email_only_is_cold() {
        assert_eq!(score_lead(&data(json!({"email": "a@b.com"}))), LeadScore::Cold);
        assert_eq!(score_lead(&data(json!({"phone": "555-0100"}))), LeadScore::Cold);
    }

    #[test]
    fn test_email_and_phone_is_warm() {
        let d = data(json!({"email": "a@b.com", "phone": "555-0100", "message": "hi"}));
        assert_eq!(score_lead(&d), LeadScore::Warm);
    }

    #[test]
    fn test_long_message_alone_is_hot() {
        let d = data(json!({"message": "x".repeat(61)}));
        assert_eq!(score_lead(&d), LeadScore::Hot);
    }

    #[test]
    fn test_long_message_overrides_warm() {
        let d = data(json!({
            "email": "a@b.com",
            "phone": "555-0100",
            "message": "I would like to book a consultation for next week, mornings preferred."
        }));
        assert_eq!(score_lead(&d), LeadScore::Hot);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let at_threshold = data(json!({"message": "x".repeat(50)}));
        let above = data(json!({"message": "x".repeat(51)}));
        assert_eq!(score_lead(&at_threshold), LeadScore::Cold);
        assert_eq!(score_lead(&above), LeadScore::Hot);
    }

    #[test]
    fn test_message_length_counts_characters_not_bytes() {
        // 30 characters, 60 bytes
        let d = data(json!({"message": "é".repeat(30)}));
        assert_eq!(score_lead(&d), LeadScore::Cold);
    }

    #[test]
    fn test_astral_characters_count_once() {
        // 50 characters, 100 UTF-16 units
        let d = data(json!({"message": "\u{1F600}".repeat(50)}));
        assert_eq!(score_lead(&d), LeadScore::Cold);

        let d = data(json!({"message": "\u{1F600}".repeat(51)}));
        assert_eq!(score_lead(&d), LeadScore::Hot);
    }

    #[test]
    fn test_blank_contact_values_do_not_count() {
        let d = data(json!({"email": "", "phone": "555-0100"}));
        assert_eq!(score_lead(&d), LeadScore::Cold);
    }

    #[test]
    fn test_custom_threshold() {
        let scorer = LeadScorer::with_hot_message_threshold(5);
        assert_eq!(scorer.score(&data(json!({"message": "hello!"}))), LeadScore::Hot);
    }
}
