//! Text redaction policies for string-valued payload fields.
//!
//! Policies are pure string transformations. They do not walk payloads or
//! decide which fields are sensitive; that is the job of field rules.
//!
//! Every policy either replaces the value with a constant or preserves its
//! length in Unicode scalar values, so applying a policy to its own output is
//! a no-op.

use std::borrow::Cow;

/// Default placeholder used for full redaction.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

const DEFAULT_MASK_CHAR: char = '*';

/// Replaces every scalar value for which `masked(index, total)` holds.
fn mask_chars(value: &str, mask_char: char, masked: impl Fn(usize, usize) -> bool) -> String {
    let total = value.chars().count();
    value
        .chars()
        .enumerate()
        .map(|(index, ch)| if masked(index, total) { mask_char } else { ch })
        .collect()
}

/// Keeps leading and trailing segments visible and masks everything between.
///
/// If the visible spans cover the whole value, it is returned unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeepConfig {
    visible_prefix: usize,
    visible_suffix: usize,
    mask_char: char,
}

impl KeepConfig {
    /// Keeps only the first `visible_prefix` scalar values.
    #[must_use]
    pub fn first(visible_prefix: usize) -> Self {
        Self::both(visible_prefix, 0)
    }

    /// Keeps only the last `visible_suffix` scalar values.
    #[must_use]
    pub fn last(visible_suffix: usize) -> Self {
        Self::both(0, visible_suffix)
    }

    /// Keeps `visible_prefix` leading and `visible_suffix` trailing scalar values.
    #[must_use]
    pub fn both(visible_prefix: usize, visible_suffix: usize) -> Self {
        Self {
            visible_prefix,
            visible_suffix,
            mask_char: DEFAULT_MASK_CHAR,
        }
    }

    /// Uses a specific masking character.
    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    fn apply_to(&self, value: &str) -> String {
        let (prefix, suffix) = (self.visible_prefix, self.visible_suffix);
        mask_chars(value, self.mask_char, |index, total| {
            prefix + suffix < total && index >= prefix && index < total - suffix
        })
    }
}

/// Masks leading and trailing segments and leaves the middle visible.
///
/// If the masked spans cover the whole value, every scalar value is masked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskConfig {
    masked_prefix: usize,
    masked_suffix: usize,
    mask_char: char,
}

impl MaskConfig {
    /// Masks only the first `masked_prefix` scalar values.
    #[must_use]
    pub fn first(masked_prefix: usize) -> Self {
        Self::both(masked_prefix, 0)
    }

    /// Masks only the last `masked_suffix` scalar values.
    #[must_use]
    pub fn last(masked_suffix: usize) -> Self {
        Self::both(0, masked_suffix)
    }

    /// Masks `masked_prefix` leading and `masked_suffix` trailing scalar values.
    #[must_use]
    pub fn both(masked_prefix: usize, masked_suffix: usize) -> Self {
        Self {
            masked_prefix,
            masked_suffix,
            mask_char: DEFAULT_MASK_CHAR,
        }
    }

    /// Uses a specific masking character.
    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    fn apply_to(&self, value: &str) -> String {
        let (prefix, suffix) = (self.masked_prefix, self.masked_suffix);
        mask_chars(value, self.mask_char, |index, total| {
            prefix + suffix >= total || index < prefix || index >= total - suffix
        })
    }
}

/// A redaction strategy for string values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextRedactionPolicy {
    /// Replace the entire value with a fixed placeholder.
    Full {
        /// The placeholder text to use.
        placeholder: Cow<'static, str>,
    },
    /// Keep configured segments visible while masking everything else.
    Keep(KeepConfig),
    /// Mask configured segments while leaving the remainder untouched.
    Mask(MaskConfig),
}

impl TextRedactionPolicy {
    /// Full redaction using [`REDACTED_PLACEHOLDER`].
    #[must_use]
    pub fn default_full() -> Self {
        Self::full_with(REDACTED_PLACEHOLDER)
    }

    /// Full redaction using a custom placeholder.
    #[must_use]
    pub fn full_with<P>(placeholder: P) -> Self
    where
        P: Into<Cow<'static, str>>,
    {
        Self::Full {
            placeholder: placeholder.into(),
        }
    }

    #[must_use]
    pub fn keep_with(config: KeepConfig) -> Self {
        Self::Keep(config)
    }

    /// Keeps only the first `visible_prefix` scalar values in clear text.
    #[must_use]
    pub fn keep_first(visible_prefix: usize) -> Self {
        Self::keep_with(KeepConfig::first(visible_prefix))
    }

    /// Keeps only the last `visible_suffix` scalar values in clear text.
    #[must_use]
    pub fn keep_last(visible_suffix: usize) -> Self {
        Self::keep_with(KeepConfig::last(visible_suffix))
    }

    #[must_use]
    pub fn mask_with(config: MaskConfig) -> Self {
        Self::Mask(config)
    }

    /// Masks the first `masked_prefix` scalar values.
    #[must_use]
    pub fn mask_first(masked_prefix: usize) -> Self {
        Self::mask_with(MaskConfig::first(masked_prefix))
    }

    /// Masks the last `masked_suffix` scalar values.
    #[must_use]
    pub fn mask_last(masked_suffix: usize) -> Self {
        Self::mask_with(MaskConfig::last(masked_suffix))
    }

    /// Applies the policy to `value`. Never fails.
    #[must_use]
    pub fn apply_to(&self, value: &str) -> String {
        match self {
            TextRedactionPolicy::Full { placeholder } => placeholder.to_string(),
            TextRedactionPolicy::Keep(config) => config.apply_to(value),
            TextRedactionPolicy::Mask(config) => config.apply_to(value),
        }
    }
}

impl Default for TextRedactionPolicy {
    fn default() -> Self {
        Self::default_full()
    }
}

#[cfg(test)]
mod tests {
    use super::{KeepConfig, MaskConfig, TextRedactionPolicy, REDACTED_PLACEHOLDER};

    #[test]
    fn keep_policy_allows_full_visibility() {
        let policy = TextRedactionPolicy::keep_with(KeepConfig::first(3));
        assert_eq!(policy.apply_to("ab"), "ab");
    }

    #[test]
    fn keep_policy_respects_mask_char() {
        let policy = TextRedactionPolicy::keep_with(KeepConfig::first(2).with_mask_char('#'));
        assert_eq!(policy.apply_to("abcdef"), "ab####");
    }

    #[test]
    fn full_policy_uses_placeholders() {
        assert_eq!(
            TextRedactionPolicy::default_full().apply_to("secret"),
            REDACTED_PLACEHOLDER
        );
        assert_eq!(
            TextRedactionPolicy::full_with("<gone>").apply_to("secret"),
            "<gone>"
        );
    }

    #[test]
    fn mask_policy_masks_first_and_last_segments() {
        assert_eq!(TextRedactionPolicy::mask_first(2).apply_to("abcdef"), "**cdef");
        assert_eq!(TextRedactionPolicy::mask_last(3).apply_to("abcdef"), "abc***");
    }

    #[test]
    fn mask_policy_respects_custom_mask_char() {
        let policy = TextRedactionPolicy::mask_with(MaskConfig::last(2).with_mask_char('#'));
        assert_eq!(policy.apply_to("abcd"), "ab##");
    }

    #[test]
    fn overlapping_spans() {
        let keep = TextRedactionPolicy::keep_with(KeepConfig::both(2, 2));
        assert_eq!(keep.apply_to("abcd"), "abcd");
        assert_eq!(keep.apply_to("abcdef"), "ab**ef");

        let mask = TextRedactionPolicy::mask_with(MaskConfig::both(2, 2));
        assert_eq!(mask.apply_to("abc"), "***");
        assert_eq!(mask.apply_to("abcdef"), "**cd**");
    }

    #[test]
    fn policies_are_idempotent() {
        let policies = [
            TextRedactionPolicy::default_full(),
            TextRedactionPolicy::keep_last(4),
            TextRedactionPolicy::keep_with(KeepConfig::both(1, 1)),
            TextRedactionPolicy::mask_first(3),
            TextRedactionPolicy::mask_with(MaskConfig::both(1, 2)),
        ];
        for policy in &policies {
            let once = policy.apply_to("session-0f3c9a");
            assert_eq!(policy.apply_to(&once), once, "{policy:?}");
        }
    }

    #[test]
    fn empty_string_returns_empty_for_keep_and_mask() {
        assert_eq!(TextRedactionPolicy::keep_first(4).apply_to(""), "");
        assert_eq!(TextRedactionPolicy::mask_first(4).apply_to(""), "");
        assert_eq!(
            TextRedactionPolicy::default_full().apply_to(""),
            REDACTED_PLACEHOLDER
        );
    }
}
