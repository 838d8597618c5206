use std::borrow::Cow;

pub const LABEL_MAX_CHARS: usize = 12;
const LABEL_KEEP_CHARS: usize = 10;

/// Caps a node label for drawing inside its circle.
pub fn truncate_label(label: &str) -> Cow<'_, str> {
    if label.chars().count() <= LABEL_MAX_CHARS {
        return Cow::Borrowed(label);
    }

    let mut short = label.chars().take(LABEL_KEEP_CHARS).collect::<String>();
    short.push_str("...");
    Cow::Owned(short)
}

/// Last path segment of an id such as `src/app/mod.rs` or `pkg::module::Type`.
pub fn short_name(id: &str) -> &str {
    id.rsplit(['/', '\\'])
        .next()
        .and_then(|tail| tail.rsplit("::").next())
        .filter(|tail| !tail.is_empty())
        .unwrap_or(id)
}

/// Case-insensitive path match.
///
/// A pattern without wildcards matches as a substring. `*` matches any run of
/// characters and `?` exactly one; a wildcard pattern must match the whole path.
pub fn matches_path_pattern(path: &str, pattern: &str) -> bool {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return true;
    }

    let path = path.to_lowercase();
    let pattern = pattern.to_lowercase();
    if !pattern.contains(['*', '?']) {
        return path.contains(&pattern);
    }

    let path = path.chars().collect::<Vec<_>>();
    let pattern = pattern.chars().collect::<Vec<_>>();
    wildcard_match(&path, &pattern)
}

fn wildcard_match(text: &[char], pattern: &[char]) -> bool {
    let (mut t, mut p) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = star {
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
