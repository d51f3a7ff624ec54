//! File names derived from event and union names

/// Lowercase `name` and replace every run of characters other than ASCII
/// letters and digits with a single `-`.
///
/// Returns `unnamed` when nothing usable is left.
pub fn file_safe_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "unnamed".to_string()
    } else {
        slug
    }
}
