use std::cmp::Reverse;

use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use crate::topics::Topic;

/// Ranks registry topics against a partial query, best match first.
///
/// Ties keep registry order. An empty query matches every topic, in registry
/// order. The query is one fuzzy needle: whitespace is a literal character,
/// so a query containing it matches no topic.
pub fn rank_topics(query: &str) -> Vec<Topic> {
    if query.is_empty() {
        return Topic::all().collect();
    }

    let needle = Atom::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
        false,
    );
    let mut matcher = Matcher::new(Config::DEFAULT);
    let mut buf = Vec::new();

    let mut scored: Vec<(Topic, u16)> = Topic::all()
        .filter_map(|topic| {
            buf.clear();
            let haystack = Utf32Str::new(topic.as_str(), &mut buf);
            needle
                .score(haystack, &mut matcher)
                .map(|score| (topic, score))
        })
        .collect();

    // Stable sort keeps registry order for equal scores.
    scored.sort_by_key(|(_, score)| Reverse(*score));
    scored.into_iter().map(|(topic, _)| topic).collect()
}
