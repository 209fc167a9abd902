use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A tag is trending once its windowed count strictly exceeds this.
pub const TRENDING_THRESHOLD: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingTag {
    pub tag: String,
    pub count: i64,
    pub trending: bool,
}

impl TrendingTag {
    pub fn new(tag: String, count: i64) -> Self {
        Self {
            tag,
            count,
            trending: count > TRENDING_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendingWindow {
    pub days: i64,
    pub limit: usize,
}

impl Default for TrendingWindow {
    fn default() -> Self {
        Self { days: 7, limit: 20 }
    }
}

impl TrendingWindow {
    /// Posts created strictly after this instant are counted.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.days)
    }
}

/// Count every occurrence and order by count desc, then tag asc.
pub fn rank<I, S>(occurrences: I, limit: usize) -> Vec<TrendingTag>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: HashMap<String, i64> = HashMap::new();
    for tag in occurrences {
        *counts.entry(tag.as_ref().to_owned()).or_default() += 1;
    }

    let mut ranked: Vec<TrendingTag> = counts
        .into_iter()
        .map(|(tag, count)| TrendingTag::new(tag, count))
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_strict() {
        assert!(!TrendingTag::new("a".into(), 10).trending);
        assert!(TrendingTag::new("a".into(), 11).trending);
    }

    #[test]
    fn ranks_by_count_then_tag() {
        let tags = ["vibes", "AfroFest", "vibes", "accra", "AfroFest", "zed"];
        let ranked = rank(tags, 20);
        let order: Vec<(&str, i64)> = ranked.iter().map(|t| (t.tag.as_str(), t.count)).collect();
        assert_eq!(
            order,
            vec![("AfroFest", 2), ("vibes", 2), ("accra", 1), ("zed", 1)]
        );
    }

    #[test]
    fn truncates_to_limit() {
        let tags: Vec<String> = (0..30).map(|i| format!("t{i:02}")).collect();
        assert_eq!(rank(&tags, 20).len(), 20);
        assert!(rank(Vec::<String>::new(), 20).is_empty());
    }

    #[test]
    fn case_is_significant() {
        let ranked = rank(["Vibes", "vibes"], 20);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|t| t.count == 1));
    }

    #[test]
    fn window_cutoff() {
        let now = Utc::now();
        let w = TrendingWindow::default();
        assert_eq!(now - w.cutoff(now), Duration::days(7));
        assert_eq!(w.limit, 20);
    }
}
