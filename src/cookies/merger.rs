//! Deduplication of cookie observations.
//!
//! A scan sees the same logical cookie many times: set by a response,
//! refreshed by a script, cleared again on logout. Rows are keyed by
//! (name, host), like a cookie store that ignores the path, and folded
//! into the first row seen for that key.

use crate::cookies::classify::MergedCookie;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Accumulates report rows, one per (name, host), in first-seen order.
#[derive(Debug, Default)]
pub struct CookieMerger {
    cookies: Vec<MergedCookie>,
    index: HashMap<(String, String), usize>,
}

impl CookieMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one row into the set.
    ///
    /// The first row for a key keeps its name, host and initiator; later
    /// sets of the same cookie are often only there to clear it. Later rows
    /// can only widen the result: the longest lifespan wins, the row stays a
    /// session cookie only if every observation was one, and the path
    /// shrinks to the common prefix.
    pub fn add(&mut self, cookie: MergedCookie) {
        match self.index.entry((cookie.name.clone(), cookie.host.clone())) {
            Entry::Occupied(entry) => {
                let existing = &mut self.cookies[*entry.get()];
                existing.life_span = existing.life_span.max(cookie.life_span);
                existing.is_session = existing.is_session && cookie.is_session;
                existing.path = common_path(&existing.path, &cookie.path);
            }
            Entry::Vacant(entry) => {
                entry.insert(self.cookies.len());
                self.cookies.push(cookie);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Finish the batch.
    pub fn finish(self) -> Vec<MergedCookie> {
        self.cookies
    }
}

/// Merge rows in arrival order. See [`CookieMerger::add`].
pub fn merge_cookies<I>(cookies: I) -> Vec<MergedCookie>
where
    I: IntoIterator<Item = MergedCookie>,
{
    let mut merger = CookieMerger::new();
    let mut observed = 0usize;
    for cookie in cookies {
        merger.add(cookie);
        observed += 1;
    }

    tracing::debug!(observed, merged = merger.len(), "merged cookies");
    merger.finish()
}

/// Split a path after its leading "/" into segments and "/" separators.
/// "/a/b/" becomes ["a", "/", "b", "/", ""].
fn path_tokens(path: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = path.strip_prefix('/').unwrap_or(path);

    while let Some(i) = rest.find('/') {
        tokens.push(&rest[..i]);
        tokens.push("/");
        rest = &rest[i + 1..];
    }
    tokens.push(rest);
    tokens
}

/// Longest shared leading path, cut on "/" boundaries only.
///
/// `common_path("/a/b", "/a/c") == "/a/"`, `common_path("/ab", "/abc") == "/"`.
pub fn common_path(a: &str, b: &str) -> String {
    let shared: String = path_tokens(a)
        .into_iter()
        .zip(path_tokens(b))
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x)
        .collect();
    format!("/{}", shared)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, host: &str, path: &str, session: bool, days: u64, initiator: &str) -> MergedCookie {
        MergedCookie {
            name: name.into(),
            host: host.into(),
            path: path.into(),
            is_session: session,
            is_third_party: false,
            life_span: days,
            initiator: initiator.into(),
        }
    }

    #[test]
    fn test_path_tokens() {
        assert_eq!(path_tokens("/a/b/"), vec!["a", "/", "b", "/", ""]);
        assert_eq!(path_tokens("/"), vec![""]);
    }

    #[test]
    fn test_common_path() {
        assert_eq!(common_path("/a/b", "/a/c"), "/a/");
        assert_eq!(common_path("/a/b", "/a/b"), "/a/b");
        assert_eq!(common_path("/a", "/a/b"), "/a");
        assert_eq!(common_path("/", "/a"), "/");
        assert_eq!(common_path("/ab", "/abc"), "/");
        assert_eq!(common_path("/a/", "/a/b"), "/a/");
    }

    #[test]
    fn test_first_observation_wins() {
        let merged = merge_cookies(vec![
            row("sid", "example.com", "/app/one", true, 0, "first"),
            row("other", "example.com", "/", true, 0, ""),
            row("sid", "example.com", "/app/two", false, 7, "second"),
            row("sid", "example.com", "/app/x", true, 3, "third"),
        ]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].name, "sid");
        assert_eq!(merged[0].initiator, "first");
        assert_eq!(merged[0].path, "/app/");
        assert!(!merged[0].is_session);
        assert_eq!(merged[0].life_span, 7);
        assert_eq!(merged[1].name, "other");
    }

    #[test]
    fn test_key_includes_host() {
        let merged = merge_cookies(vec![
            row("sid", "a.example.com", "/", true, 0, ""),
            row("sid", "b.example.com", "/", true, 0, ""),
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let once = merge_cookies(vec![
            row("a", "x.com", "/p/q", true, 1, ""),
            row("a", "x.com", "/p/r", false, 2, ""),
            row("b", "x.com", "/", true, 0, ""),
        ]);
        let twice = merge_cookies(once.clone());
        assert_eq!(once, twice);
    }
}
