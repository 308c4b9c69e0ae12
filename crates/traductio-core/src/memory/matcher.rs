//! Ranking of stored entries against a new source text.
//!
//! Matching is containment-based: an entry is relevant when its source equals
//! the query, or when one of the two contains the other and the contained
//! text is long enough to carry meaning on its own.

use serde::Serialize;

use super::entry::TranslationMemoryEntry;
use crate::config::Lang;
use crate::domain::Domain;

/// Contained text must be longer than this (in characters) to count as a
/// partial match. Shorter fragments are mostly boilerplate.
pub const PARTIAL_MATCH_MIN_CHARS: usize = 15;

/// Maximum number of matches returned
pub const MAX_MATCHES: usize = 3;

/// How a stored entry relates to the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    /// The stored source appears inside the query
    PartialSourceInQuery,
    /// The query appears inside the stored source
    PartialQueryInSource,
}

impl MatchKind {
    pub const fn score(self) -> u8 {
        match self {
            Self::Exact => 100,
            Self::PartialSourceInQuery => 85,
            Self::PartialQueryInSource => 75,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::PartialSourceInQuery => "partial_source_in_query",
            Self::PartialQueryInSource => "partial_query_in_source",
        }
    }
}

/// A stored entry with its relevance to a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TmMatch {
    #[serde(flatten)]
    pub entry: TranslationMemoryEntry,
    pub match_type: MatchKind,
    pub score: u8,
}

/// Classify a lowercased candidate against a trimmed, lowercased query.
///
/// Exact wins over partial; source-in-query wins over query-in-source.
pub fn classify(candidate: &str, query: &str) -> Option<MatchKind> {
    if candidate == query {
        return Some(MatchKind::Exact);
    }

    if candidate.chars().count() > PARTIAL_MATCH_MIN_CHARS && query.contains(candidate) {
        Some(MatchKind::PartialSourceInQuery)
    } else if query.chars().count() > PARTIAL_MATCH_MIN_CHARS && candidate.contains(query) {
        Some(MatchKind::PartialQueryInSource)
    } else {
        None
    }
}

/// Find up to [`MAX_MATCHES`] entries relevant to `query`.
///
/// Only entries with exactly this domain and language direction are
/// considered. Results are ordered by score, then by how often the entry has
/// been used; remaining ties keep collection order.
pub fn find_matches<'a>(
    entries: impl IntoIterator<Item = &'a TranslationMemoryEntry>,
    query: &str,
    domain: Domain,
    source_lang: &Lang,
    target_lang: &Lang,
) -> Vec<TmMatch> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<TmMatch> = entries
        .into_iter()
        .filter(|entry| {
            entry.domain == domain
                && entry.source_lang == *source_lang
                && entry.target_lang == *target_lang
        })
        .filter_map(|entry| {
            classify(&entry.source_text.to_lowercase(), &query).map(|kind| TmMatch {
                entry: entry.clone(),
                match_type: kind,
                score: kind.score(),
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.entry.used_count.cmp(&a.entry.used_count))
    });
    matches.truncate(MAX_MATCHES);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(
        id: &str,
        domain: Domain,
        src: &str,
        tgt: &str,
        text: &str,
        used: u32,
    ) -> TranslationMemoryEntry {
        let now = Utc::now();
        TranslationMemoryEntry {
            id: id.to_string(),
            source_lang: Lang::new(src),
            target_lang: Lang::new(tgt),
            domain,
            source_text: text.to_string(),
            translated_text: format!("<{text}>"),
            created_at: now,
            updated_at: now,
            used_count: used,
            confirmed: true,
        }
    }

    fn ro_en() -> (Lang, Lang) {
        (Lang::new("RO"), Lang::new("EN"))
    }

    #[test]
    fn test_blank_query_matches_nothing() {
        let entries = vec![entry("1", Domain::Medical, "RO", "EN", "diagnostic", 1)];
        let (src, tgt) = ro_en();
        assert!(find_matches(&entries, "   ", Domain::Medical, &src, &tgt).is_empty());
        assert!(find_matches(&entries, "", Domain::Medical, &src, &tgt).is_empty());
    }

    #[test]
    fn test_exact_match_ignores_case_and_padding() {
        let entries = vec![entry("1", Domain::Medical, "RO", "EN", "Diagnostic", 1)];
        let (src, tgt) = ro_en();

        let matches = find_matches(&entries, "  DIAGNOSTIC ", Domain::Medical, &src, &tgt);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_type, MatchKind::Exact);
        assert_eq!(matches[0].score, 100);
    }

    #[test]
    fn test_source_contained_in_query() {
        let entries = vec![entry(
            "1",
            Domain::Medical,
            "RO",
            "EN",
            "tensiune arteriala ridicata",
            1,
        )];
        let (src, tgt) = ro_en();

        let matches = find_matches(
            &entries,
            "pacientul are tensiune arteriala ridicata de cateva zile",
            Domain::Medical,
            &src,
            &tgt,
        );

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_type, MatchKind::PartialSourceInQuery);
        assert_eq!(matches[0].score, 85);
    }

    #[test]
    fn test_query_contained_in_source() {
        let entries = vec![entry(
            "1",
            Domain::Juridic,
            "RO",
            "EN",
            "Rezilierea contractului se face de drept",
            1,
        )];
        let (src, tgt) = ro_en();

        let matches =
            find_matches(&entries, "rezilierea contractului", Domain::Juridic, &src, &tgt);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_type, MatchKind::PartialQueryInSource);
        assert_eq!(matches[0].score, 75);
    }

    #[test]
    fn test_partial_threshold_boundary() {
        // 15 characters: too short to count as a fragment
        let fifteen = "abcdefghijklmno";
        // 16 characters: long enough
        let sixteen = "abcdefghijklmnop";
        assert_eq!(fifteen.chars().count(), 15);
        assert_eq!(sixteen.chars().count(), 16);

        let query = format!("prefix {sixteen} suffix");
        assert_eq!(classify(fifteen, &format!("prefix {fifteen} suffix")), None);
        assert_eq!(classify(sixteen, &query), Some(MatchKind::PartialSourceInQuery));

        assert_eq!(classify(&format!("x {fifteen} y"), fifteen), None);
        assert_eq!(
            classify(&format!("x {sixteen} y"), sixteen),
            Some(MatchKind::PartialQueryInSource)
        );
    }

    #[test]
    fn test_threshold_counts_characters_not_bytes() {
        // 15 characters but more than 15 bytes
        let short = "hotărâre judecă";
        assert_eq!(short.chars().count(), 15);
        assert!(short.len() > 15);
        assert_eq!(classify(short, "o hotărâre judecătorească"), None);
    }

    #[test]
    fn test_exact_takes_priority_over_partial() {
        let text = "a sufficiently long sentence";
        assert_eq!(classify(text, text), Some(MatchKind::Exact));
    }

    #[test]
    fn test_filters_domain_and_direction() {
        let entries = vec![
            entry("1", Domain::Juridic, "RO", "EN", "martor", 1),
            entry("2", Domain::Medical, "EN", "RO", "martor", 1),
            entry("3", Domain::Medical, "RO", "ES", "martor", 1),
            entry("4", Domain::Medical, "RO", "EN", "martor", 1),
        ];
        let (src, tgt) = ro_en();

        let matches = find_matches(&entries, "martor", Domain::Medical, &src, &tgt);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].entry.id, "4");
    }

    #[test]
    fn test_ordering_by_score_then_usage_and_cap() {
        let query = "the quick brown fox jumps over the lazy dog";
        let entries = vec![
            entry("partial-low", Domain::General, "RO", "EN", "the quick brown fox", 1),
            entry("partial-high", Domain::General, "RO", "EN", "over the lazy dog", 7),
            entry("exact", Domain::General, "RO", "EN", query, 1),
            entry("inside", Domain::General, "RO", "EN", &format!("{query} again"), 50),
            entry("partial-mid", Domain::General, "RO", "EN", "fox jumps over the", 3),
        ];
        let (src, tgt) = ro_en();

        let matches = find_matches(&entries, query, Domain::General, &src, &tgt);
        let ids: Vec<&str> = matches.iter().map(|m| m.entry.id.as_str()).collect();

        assert_eq!(ids, vec!["exact", "partial-high", "partial-mid"]);
        assert!(matches.windows(2).all(|w| {
            w[0].score > w[1].score
                || (w[0].score == w[1].score && w[0].entry.used_count >= w[1].entry.used_count)
        }));
    }

    #[test]
    fn test_repeated_lookup_is_stable() {
        let entries = vec![
            entry("a", Domain::General, "RO", "EN", "aceeasi propozitie lunga", 2),
            entry("b", Domain::General, "RO", "EN", "o alta propozitie destul de lunga", 2),
        ];
        let (src, tgt) = ro_en();
        let query = "aceeasi propozitie lunga si o alta propozitie destul de lunga";

        let first = find_matches(&entries, query, Domain::General, &src, &tgt);
        let second = find_matches(&entries, query, Domain::General, &src, &tgt);

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].entry.id, "a");
    }

    #[test]
    fn test_match_serializes_flat() {
        let (src, tgt) = ro_en();
        let entries = vec![entry("1", Domain::Medical, "RO", "EN", "diagnostic", 1)];
        let matches = find_matches(&entries, "diagnostic", Domain::Medical, &src, &tgt);

        let json = serde_json::to_value(&matches[0]).unwrap();
        assert_eq!(json["match_type"], "exact");
        assert_eq!(json["score"], 100);
        assert_eq!(json["source_text"], "diagnostic");
    }
}
