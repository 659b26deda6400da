//! Tag normalisation and order-preserving merging.

/// Return `tag` trimmed and prefixed with `@`.
///
/// # Examples
/// ```
/// use cukeplan_patterns::tags::normalise_tag;
/// assert_eq!(normalise_tag("smoke"), "@smoke");
/// assert_eq!(normalise_tag(" @smoke "), "@smoke");
/// ```
#[must_use]
pub fn normalise_tag(tag: &str) -> String {
    let trimmed = tag.trim();
    if trimmed.starts_with('@') {
        trimmed.to_owned()
    } else {
        format!("@{trimmed}")
    }
}

/// Merge two tag lists, normalising each tag and keeping the first
/// occurrence of duplicates.
///
/// # Examples
/// ```
/// use cukeplan_patterns::tags::merge_tag_sets;
/// let merged = merge_tag_sets(&["@fast".into(), "slow".into()], &["fast".into(), "@web".into()]);
/// assert_eq!(merged, vec!["@fast", "@slow", "@web"]);
/// ```
#[must_use]
pub fn merge_tag_sets(base: &[String], additions: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(base.len() + additions.len());
    for tag in base.iter().chain(additions) {
        let tag = normalise_tag(tag);
        if !merged.contains(&tag) {
            merged.push(tag);
        }
    }
    merged
}
