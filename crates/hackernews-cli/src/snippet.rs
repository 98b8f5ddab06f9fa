use std::sync::LazyLock;

use regex::Regex;

static POINTS_PATTERN: LazyLock<Regex> = LazyLock::new(|| label_pattern("Points"));
static COMMENTS_PATTERN: LazyLock<Regex> = LazyLock::new(|| label_pattern("Comments"));

// Labels are fixed literals, so the pattern always compiles.
#[allow(clippy::expect_used)]
fn label_pattern(label: &str) -> Regex {
    Regex::new(&format!(r"{}:\s*(\d+)", regex::escape(label))).expect("valid label pattern")
}

/// First integer after `Points:`, as written in the snippet.
pub fn extract_points(snippet: Option<&str>) -> Option<String> {
    extract(&POINTS_PATTERN, snippet)
}

/// First integer after `Comments:`. `Comments URL:` does not count.
pub fn extract_comments(snippet: Option<&str>) -> Option<String> {
    extract(&COMMENTS_PATTERN, snippet)
}

/// Points as a ranking score, 0 when absent.
pub fn points_score(snippet: Option<&str>) -> i64 {
    extract_points(snippet)
        .and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(0)
}

fn extract(pattern: &Regex, snippet: Option<&str>) -> Option<String> {
    let captures = pattern.captures(snippet?)?;
    captures.get(1).map(|value| value.as_str().to_string())
}
