// diffseek/src/search.rs
//! Ranking for the file picker.
//!
//! Two tiers:
//! 1. exact: some word of the title starts with the query (input order kept)
//! 2. fuzzy: everything else that the scorer matches, best score first
//!
//! Tier 1 always precedes tier 2 and the joined list is cut at the limit, so
//! a very common prefix can fill the whole result with exact hits.

use nucleo_matcher::{
    pattern::{AtomKind, CaseMatching, Normalization, Pattern},
    Config as MatcherConfig, Matcher, Utf32Str,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::config::MAX_RESULTS;

/* ============================== Items ============================== */

/// Anything the picker can rank.
pub trait Searchable {
    /// Identity. Two items with the same title but different ids are distinct.
    fn id(&self) -> &str;
    /// Primary label, e.g. a file name.
    fn title(&self) -> &str;
    /// Secondary text, e.g. title plus full path.
    fn search_text(&self) -> Cow<'_, str>;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SearchableItem {
    pub id: String,
    pub title: String,
    pub search_text: String,
}

impl SearchableItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, search_text: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), search_text: search_text.into() }
    }
}

impl Searchable for SearchableItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn search_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.search_text)
    }
}

/* ============================== Scoring ============================== */

/// Fuzzy scorer. Higher is better; `None` means the candidate does not match.
pub trait FuzzyScorer {
    fn score(&mut self, query: &str, candidate: &str) -> Option<u32>;
}

/// Default scorer backed by `nucleo-matcher`, tuned for paths.
/// Re-parses the pattern only when the query changes.
pub struct NucleoScorer {
    matcher: Matcher,
    buf: Vec<char>,
    pattern: Option<(String, Pattern)>,
}

impl Default for NucleoScorer {
    fn default() -> Self {
        Self {
            matcher: Matcher::new(MatcherConfig::DEFAULT.match_paths()),
            buf: Vec::new(),
            pattern: None,
        }
    }
}

impl FuzzyScorer for NucleoScorer {
    fn score(&mut self, query: &str, candidate: &str) -> Option<u32> {
        let stale = self.pattern.as_ref().map_or(true, |(q, _)| q != query);
        if stale {
            // AtomKind::Fuzzy: typed characters are never read as `^`/`$`/`!` syntax.
            let pattern = Pattern::new(query, CaseMatching::Ignore, Normalization::Smart, AtomKind::Fuzzy);
            self.pattern = Some((query.to_string(), pattern));
        }
        let (_, pattern) = self.pattern.as_ref()?;
        pattern.score(Utf32Str::new(candidate, &mut self.buf), &mut self.matcher)
    }
}

/* ============================== Tokens ============================== */

/// Drop one trailing `.ext` (dot followed by at least one non-dot,
/// non-slash character at the very end).
fn strip_extension(title: &str) -> &str {
    match title.rfind('.') {
        Some(i) => {
            let ext = &title[i + 1..];
            if ext.is_empty() || ext.contains('/') { title } else { &title[..i] }
        }
        None => title,
    }
}

/// Lower-cased words of a title: extension stripped, split on `-`, `_`, `.`
/// and whitespace.
pub fn title_tokens(title: &str) -> Vec<String> {
    strip_extension(title)
        .split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Tier-1 test. `query` must already be lower-cased.
pub fn is_exact_match(title: &str, query: &str) -> bool {
    title_tokens(title).iter().any(|t| t.starts_with(query))
}

/* ============================== Search ============================== */

/// Rank `items` for `query` with the default scorer and a cap of 20.
pub fn search<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    search_with(items, query, &mut NucleoScorer::default(), MAX_RESULTS)
}

/// Rank `items` for `query`. Empty (or whitespace-only) queries return the
/// first `limit` items unranked.
pub fn search_with<'a, T, F>(items: &'a [T], query: &str, scorer: &mut F, limit: usize) -> Vec<&'a T>
where
    T: Searchable,
    F: FuzzyScorer + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return items.iter().take(limit).collect();
    }
    let lowered = query.to_lowercase();

    let (mut exact, rest): (Vec<&T>, Vec<&T>) =
        items.iter().partition(|item| is_exact_match(item.title(), &lowered));

    if exact.len() >= limit {
        tracing::debug!(query, exact = exact.len(), limit, "exact matches fill the result");
        exact.truncate(limit);
        return exact;
    }
    let room = limit - exact.len();

    let mut fuzzy: Vec<(u32, &T)> = rest
        .into_iter()
        .filter_map(|item| {
            let by_title = scorer.score(query, item.title());
            let by_text = scorer.score(query, &item.search_text());
            by_title.max(by_text).map(|s| (s, item))
        })
        .collect();
    // Stable: equal scores keep input order.
    fuzzy.sort_by(|a, b| b.0.cmp(&a.0));

    tracing::debug!(query, exact = exact.len(), fuzzy = fuzzy.len(), room, "search ranked");

    exact.extend(fuzzy.into_iter().take(room).map(|(_, item)| item));
    exact
}

/* ================================== Tests ================================== */
