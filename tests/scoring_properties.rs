use leadflow::domain::models::{LeadData, LeadScore};
use leadflow::services::score_lead;
use proptest::prelude::*;

fn contact_value() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-z0-9@.+-]{1,20}")
}

fn build(email: Option<String>, phone: Option<String>, message: Option<String>) -> LeadData {
    let mut data = LeadData::default();
    if let Some(email) = email {
        data = data.with_field("email", email);
    }
    if let Some(phone) = phone {
        data = data.with_field("phone", phone);
    }
    if let Some(message) = message {
        data = data.with_field("message", message);
    }
    data
}

proptest! {
    /// Property: a message longer than 50 characters is hot whatever else was submitted
    #[test]
    fn prop_long_message_is_hot(
        email in contact_value(),
        phone in contact_value(),
        message in "[a-zA-Z ]{51,200}",
    ) {
        prop_assert_eq!(score_lead(&build(email, phone, Some(message))), LeadScore::Hot);
    }

    /// Property: email and phone with at most 50 message characters is warm
    #[test]
    fn prop_full_contact_with_short_message_is_warm(
        email in "[a-z]{1,10}@[a-z]{1,10}\\.com",
        phone in "[0-9-]{7,12}",
        message in prop::option::of("[a-zA-Z ]{0,50}"),
    ) {
        prop_assert_eq!(
            score_lead(&build(Some(email), Some(phone), message)),
            LeadScore::Warm
        );
    }

    /// Property: missing email or phone with at most 50 message characters is cold
    #[test]
    fn prop_partial_contact_is_cold(
        contact in contact_value(),
        use_email in any::<bool>(),
        message in prop::option::of("[a-zA-Z ]{0,50}"),
    ) {
        let data = if use_email {
            build(contact, None, message)
        } else {
            build(None, contact, message)
        };
        prop_assert_eq!(score_lead(&data), LeadScore::Cold);
    }

    /// Property: message length counts characters, not bytes
    #[test]
    fn prop_multibyte_message_at_threshold_is_not_hot(len in 0usize..=50) {
        let message = "é".repeat(len);
        prop_assert_ne!(score_lead(&build(None, None, Some(message))), LeadScore::Hot);
    }
}

#[test]
fn test_exactly_fifty_characters_is_not_hot() {
    let data = build(None, None, Some("x".repeat(50)));
    assert_eq!(score_lead(&data), LeadScore::Cold);
}

#[test]
fn test_empty_strings_do_not_count_as_contact() {
    let data = build(Some(String::new()), Some("555-0100".to_string()), None);
    assert_eq!(score_lead(&data), LeadScore::Cold);
}
