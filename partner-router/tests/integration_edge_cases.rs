//! Edge-case coverage for text redaction and event id normalization.
//!
//! Redaction operates on Unicode scalar values, so multi-byte and combining
//! characters are masked one scalar at a time. Event id normalization has to
//! agree between configuration and events whatever the input looks like.

use partner_router::{
    normalize_event_id, CleaningPolicy, KeepConfig, MaskConfig, TextRedactionPolicy,
};

#[test]
fn test_single_character() {
    assert_eq!(TextRedactionPolicy::keep_last(4).apply_to("x"), "x");
    assert_eq!(TextRedactionPolicy::mask_first(1).apply_to("x"), "*");
}

#[test]
fn test_unicode_names() {
    // Devanagari name, each scalar value masked individually
    let name = "अनन्या";
    let policy = TextRedactionPolicy::keep_last(2);
    let redacted = policy.apply_to(name);
    assert_eq!(redacted.chars().count(), name.chars().count());
    assert!(redacted.ends_with("या"));
    assert!(redacted.starts_with("****"));
}

#[test]
fn test_unicode_emoji() {
    let policy = TextRedactionPolicy::keep_first(6);
    assert_eq!(policy.apply_to("secret🔒data"), "secret*****");

    let policy = TextRedactionPolicy::mask_last(4);
    assert_eq!(policy.apply_to("secret🔒data"), "secret🔒****");
}

#[test]
fn test_combining_characters() {
    // "é" written as e + combining acute accent is two scalar values
    let policy = TextRedactionPolicy::keep_first(4);
    assert_eq!(policy.apply_to("cafe\u{0301}"), "cafe*");
}

#[test]
fn test_keep_and_mask_both_boundaries() {
    let keep = TextRedactionPolicy::keep_with(KeepConfig::both(1, 1));
    assert_eq!(keep.apply_to("ab"), "ab");
    assert_eq!(keep.apply_to("abc"), "a*c");

    let mask = TextRedactionPolicy::mask_with(MaskConfig::both(1, 1));
    assert_eq!(mask.apply_to("ab"), "**");
    assert_eq!(mask.apply_to("abc"), "*b*");
}

#[test]
fn test_zero_width_spans() {
    assert_eq!(TextRedactionPolicy::keep_first(0).apply_to("abc"), "***");
    assert_eq!(TextRedactionPolicy::mask_first(0).apply_to("abc"), "abc");
}

#[test]
fn test_event_id_normalization_edges() {
    assert_eq!(normalize_event_id("\n\tme_feed \r"), "ME_FEED");
    assert_eq!(normalize_event_id("   "), "");
    assert_eq!(normalize_event_id("ge_straße"), "GE_STRASSE");
}

#[test]
fn test_policy_lookup_uses_the_same_normalization() {
    let policy = CleaningPolicy::new(["ge_straße"], ["  oe_end\t"]);
    assert!(policy.should_allow_event("GE_STRASSE"));
    assert!(policy.should_allow_event("Ge_Straße "));
    assert!(policy.should_skip_event("OE_END"));
    assert!(!policy.should_allow_event("OE_END"));
}
