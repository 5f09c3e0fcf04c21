/// Separator inserted between every level of an environment key
pub const SEPARATOR: char = '_';

/// Environment key for a field tagged `tag` under `prefix`
///
/// An empty prefix yields the bare tag rather than a leading separator.
pub fn derive_key(prefix: &str, tag: &str) -> String {
    if prefix.is_empty() {
        return tag.to_string();
    }
    let mut key = String::with_capacity(prefix.len() + 1 + tag.len());
    key.push_str(prefix);
    key.push(SEPARATOR);
    key.push_str(tag);
    key
}
