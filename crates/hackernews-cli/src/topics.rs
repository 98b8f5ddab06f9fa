use std::fmt;

/// Feed categories served by hnrss.org, in display order.
pub const TOPICS: [&str; 15] = [
    "active",
    "ask",
    "best",
    "bestcomments",
    "classic",
    "frontpage",
    "invited",
    "jobs",
    "launches",
    "newcomments",
    "newest",
    "polls",
    "pool",
    "show",
    "whoishiring",
];

/// A registry keyword. Only constructible from [`TOPICS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Topic(&'static str);

impl Topic {
    /// Case-insensitive exact lookup. No trimming, no partial matches.
    pub fn lookup(raw: &str) -> Option<Self> {
        let lowered = raw.to_lowercase();
        TOPICS
            .into_iter()
            .find(|topic| *topic == lowered)
            .map(Self)
    }

    pub fn all() -> impl Iterator<Item = Topic> {
        TOPICS.into_iter().map(Self)
    }

    pub fn as_str(self) -> &'static str {
        self.0
    }

    /// First letter upper-cased, for suggestion titles.
    pub fn display_name(self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
