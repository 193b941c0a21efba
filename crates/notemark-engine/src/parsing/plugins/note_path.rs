use relative_path::{Component, RelativePath};

/// Folder holding the notes of the default category.
pub const BASE_CATEGORY: &str = ".BaseCategory";
/// Folder holding the notes of a category that are in no group.
pub const BASE_GROUP: &str = ".BaseGroup";

/// Parent folder of a note folder, with a trailing `/`.
///
/// `/Category/Group/Note/` gives `/Category/Group/`.
pub fn group_path(note_path: &str) -> String {
    let trimmed = note_path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(i) => trimmed[..=i].to_string(),
        None => "/".to_string(),
    }
}

/// Resolves the path written in a note link to a storage-relative note path.
///
/// - `name` is a note in the same group as the current note
/// - `category/name` is a note outside any group
/// - `category/group/name` is a full path
/// - `.` and `..` segments resolve against the current group
///
/// Returns `None` for anything that is not a note path: empty segments,
/// hidden segments, too many segments, or `..` climbing out of storage.
pub fn sanitize_note_path(raw: &str, note_path: &str, default_category: &str) -> Option<String> {
    let mut parts: Vec<&str> = raw.split('/').map(str::trim).collect();
    if parts.iter().skip(1).any(|p| p.is_empty()) {
        return None;
    }
    if parts.first() == Some(&"") {
        parts.remove(0);
    }
    if parts.is_empty() || parts.iter().any(|p| p.starts_with('.') && *p != "." && *p != "..") {
        return None;
    }
    if parts.len() > 1 && parts[0] == default_category {
        parts[0] = BASE_CATEGORY;
    }

    let group = group_path(note_path);
    if parts.iter().any(|p| *p == "." || *p == "..") {
        let resolved = RelativePath::new(group.trim_start_matches('/')).join_normalized(parts.join("/"));
        let escapes = resolved.components().next() == Some(Component::ParentDir);
        if escapes || resolved.as_str().is_empty() {
            return None;
        }
        return Some(format!("/{}", resolved.as_str()));
    }

    match parts.as_slice() {
        [name] => Some(format!("{group}{name}")),
        [category, name] => Some(format!("/{category}/{BASE_GROUP}/{name}")),
        [_, _, _] => Some(format!("/{}", parts.join("/"))),
        _ => None,
    }
}
