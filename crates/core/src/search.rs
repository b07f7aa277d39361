use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Fuzzy-match a search query against a trend title. Higher is better,
/// `None` means no match.
pub fn fuzzy_score(needle: &str, hay: &str) -> Option<i64> {
    let m = SkimMatcherV2::default();
    m.fuzzy_match(hay, needle)
}
