//! Small pure text helpers.

/// Keep up to `max_content` characters of `raw`, then append `suffix`.
///
/// The suffix does NOT count toward the budget. Counts `char`s, not bytes.
#[must_use]
pub(crate) fn truncate_preview(raw: &str, max_content: usize, suffix: &str) -> String {
    if raw.chars().count() <= max_content {
        return raw.to_string();
    }
    let head: String = raw.chars().take(max_content).collect();
    format!("{head}{suffix}")
}

/// Replace the first `{name}` placeholder for each pair.
///
/// Unknown placeholders are left untouched.
#[must_use]
pub fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut text = template.to_string();
    for (name, value) in values {
        let needle = format!("{{{name}}}");
        if let Some(pos) = text.find(&needle) {
            text.replace_range(pos..pos + needle.len(), value);
        }
    }
    text
}
