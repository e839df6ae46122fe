//! Fuzzy relevance scoring for command menu items

use std::cell::RefCell;
use std::collections::HashMap;

use nucleo_matcher::{Config, Matcher, Utf32Str};

const SCORE_CONTINUE_MATCH: f64 = 1.0;
const SCORE_SPACE_WORD_JUMP: f64 = 0.9;
const SCORE_NON_SPACE_WORD_JUMP: f64 = 0.8;
const SCORE_CHARACTER_JUMP: f64 = 0.17;
const SCORE_TRANSPOSITION: f64 = 0.1;

const PENALTY_SKIPPED: f64 = 0.999;
const PENALTY_CASE_MISMATCH: f64 = 0.9999;
const PENALTY_NOT_COMPLETE: f64 = 0.99;

/// Scores a candidate value against the current search.
///
/// Implementations must be pure: the same inputs always produce the same score,
/// and the score is always within `[0, 1]`. A score of `0` hides the item.
pub trait Filter {
    fn score(&self, value: &str, search: &str, keywords: &[String]) -> f64;
}

impl<F> Filter for F
where
    F: Fn(&str, &str, &[String]) -> f64,
{
    fn score(&self, value: &str, search: &str, keywords: &[String]) -> f64 {
        self(value, search, keywords)
    }
}

/// Default filter: [`command_score`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandScore;

impl Filter for CommandScore {
    fn score(&self, value: &str, search: &str, keywords: &[String]) -> f64 {
        command_score(value, search, keywords)
    }
}

/// Score `candidate` against the abbreviation `query`.
///
/// Consecutive matches score highest, matches right after a space or a dash
/// slightly less, matches after punctuation (`/`, `_`, `.`, ...) less again, and
/// matches in the middle of a word much less. Every skipped character applies a
/// small penalty, so earlier and tighter matches win.
///
/// Keywords are appended to the candidate and searched as if they were part of it.
///
/// Returns `0.0` for an empty candidate and `1.0` for an empty query.
pub fn command_score(candidate: &str, query: &str, keywords: &[String]) -> f64 {
    if candidate.is_empty() {
        return 0.0;
    }
    if query.is_empty() {
        return 1.0;
    }

    let full = if keywords.is_empty() {
        candidate.to_string()
    } else {
        format!("{} {}", candidate, keywords.join(" "))
    };

    let string: Vec<char> = full.chars().collect();
    let abbreviation: Vec<char> = query.chars().collect();
    let lower_string = normalize(&string);
    let lower_abbreviation = normalize(&abbreviation);

    let mut scorer = AbbreviationScorer {
        string: &string,
        abbreviation: &abbreviation,
        lower_string: &lower_string,
        lower_abbreviation: &lower_abbreviation,
        memo: HashMap::new(),
    };
    scorer.score(0, 0)
}

/// Lowercase char-by-char (keeping indices aligned) and fold spaces and dashes
fn normalize(chars: &[char]) -> Vec<char> {
    chars
        .iter()
        .map(|&c| {
            if is_space(c) {
                ' '
            } else {
                c.to_lowercase().next().unwrap_or(c)
            }
        })
        .collect()
}

fn is_gap(c: char) -> bool {
    matches!(
        c,
        '\\' | '/' | '_' | '+' | '.' | '#' | '"' | '@' | '[' | '(' | '{' | '&'
    )
}

fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '-'
}

fn find(haystack: &[char], needle: char, from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .iter()
        .position(|&c| c == needle)
        .map(|offset| offset + from)
}

struct AbbreviationScorer<'a> {
    string: &'a [char],
    abbreviation: &'a [char],
    lower_string: &'a [char],
    lower_abbreviation: &'a [char],
    memo: HashMap<(usize, usize), f64>,
}

impl AbbreviationScorer<'_> {
    fn score(&mut self, string_index: usize, abbreviation_index: usize) -> f64 {
        if abbreviation_index == self.abbreviation.len() {
            if string_index == self.string.len() {
                return SCORE_CONTINUE_MATCH;
            }
            return PENALTY_NOT_COMPLETE;
        }

        if let Some(&cached) = self.memo.get(&(string_index, abbreviation_index)) {
            return cached;
        }

        let abbreviation_char = self.lower_abbreviation[abbreviation_index];
        let next_abbreviation_char = self
            .lower_abbreviation
            .get(abbreviation_index + 1)
            .copied();

        let mut high_score = 0.0;
        let mut index = find(self.lower_string, abbreviation_char, string_index);

        while let Some(i) = index {
            let mut score = self.score(i + 1, abbreviation_index + 1);

            if score > high_score {
                if i == string_index {
                    score *= SCORE_CONTINUE_MATCH;
                } else if is_gap(self.string[i - 1]) {
                    score *= SCORE_NON_SPACE_WORD_JUMP;
                    let breaks = self.string[string_index..i - 1]
                        .iter()
                        .filter(|&&c| is_gap(c))
                        .count();
                    if breaks > 0 && string_index > 0 {
                        score *= PENALTY_SKIPPED.powi(breaks as i32);
                    }
                } else if is_space(self.string[i - 1]) {
                    score *= SCORE_SPACE_WORD_JUMP;
                    let breaks = self.string[string_index..i - 1]
                        .iter()
                        .filter(|&&c| is_space(c))
                        .count();
                    if breaks > 0 && string_index > 0 {
                        score *= PENALTY_SKIPPED.powi(breaks as i32);
                    }
                } else {
                    score *= SCORE_CHARACTER_JUMP;
                    if string_index > 0 {
                        score *= PENALTY_SKIPPED.powi((i - string_index) as i32);
                    }
                }

                if self.string[i] != self.abbreviation[abbreviation_index] {
                    score *= PENALTY_CASE_MISMATCH;
                }
            }

            // Transposed pair, e.g. "teh" for "the"
            if let Some(next) = next_abbreviation_char {
                let previous = i.checked_sub(1).map(|p| self.lower_string[p]);
                let swapped = score < SCORE_TRANSPOSITION && previous == Some(next);
                let doubled = next == abbreviation_char && previous != Some(abbreviation_char);
                if swapped || doubled {
                    let transposed = self.score(i + 1, abbreviation_index + 2);
                    if transposed * SCORE_TRANSPOSITION > score {
                        score = transposed * SCORE_TRANSPOSITION;
                    }
                }
            }

            if score > high_score {
                high_score = score;
            }

            index = find(self.lower_string, abbreviation_char, i + 1);
        }

        self.memo
            .insert((string_index, abbreviation_index), high_score);
        high_score
    }
}

/// Filter backed by nucleo-matcher's fuzzy matching algorithm (same as Helix/Zed).
///
/// Raw nucleo scores are unbounded, so they are normalized against the score the
/// query gets when matched against itself.
pub struct NucleoFilter {
    matcher: RefCell<Matcher>,
}

impl NucleoFilter {
    pub fn new() -> Self {
        Self {
            matcher: RefCell::new(Matcher::new(Config::DEFAULT)),
        }
    }
}

impl Default for NucleoFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NucleoFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NucleoFilter").finish_non_exhaustive()
    }
}

impl Filter for NucleoFilter {
    fn score(&self, value: &str, search: &str, keywords: &[String]) -> f64 {
        if value.is_empty() {
            return 0.0;
        }
        if search.is_empty() {
            return 1.0;
        }

        let haystack = if keywords.is_empty() {
            value.to_string()
        } else {
            format!("{} {}", value, keywords.join(" "))
        };
        if haystack.to_lowercase() == search.to_lowercase() {
            return 1.0;
        }

        let needle = search.to_lowercase();
        let Ok(mut matcher) = self.matcher.try_borrow_mut() else {
            return 0.0;
        };

        // Reusable buffers for UTF-32 conversion
        let mut haystack_buf = Vec::new();
        let mut needle_buf = Vec::new();
        let mut self_buf = Vec::new();

        let needle_str = Utf32Str::new(&needle, &mut needle_buf);
        let Some(score) =
            matcher.fuzzy_match(Utf32Str::new(&haystack, &mut haystack_buf), needle_str)
        else {
            return 0.0;
        };

        let best = matcher
            .fuzzy_match(Utf32Str::new(&needle, &mut self_buf), needle_str)
            .unwrap_or(score)
            .max(1);

        (f64::from(score) / f64::from(best)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(candidate: &str, query: &str) -> f64 {
        command_score(candidate, query, &[])
    }

    #[test]
    fn test_exact_match_scores_one() {
        assert_eq!(score("Apple", "Apple"), 1.0);
        assert_eq!(score("open file", "open file"), 1.0);
    }

    #[test]
    fn test_exact_match_is_maximal() {
        let exact = score("Save File", "Save File");
        for query in ["save", "sf", "file", "Save Fil", "s", "av"] {
            assert!(exact >= score("Save File", query), "query {query}");
        }
    }

    #[test]
    fn test_empty_candidate_scores_zero() {
        assert_eq!(score("", "anything"), 0.0);
        assert_eq!(score("", ""), 0.0);
        assert_eq!(command_score("", "a", &["alias".into()]), 0.0);
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert_eq!(score("Apple", ""), 1.0);
    }

    #[test]
    fn test_scores_are_pure_and_bounded() {
        let cases = [
            ("Apple", "ap"),
            ("Banana", "ap"),
            ("Grape", "ap"),
            ("src/lib/score.rs", "slr"),
            ("teh quick brown fox", "the"),
        ];
        for (candidate, query) in cases {
            let first = score(candidate, query);
            let second = score(candidate, query);
            assert_eq!(first, second);
            assert!((0.0..=1.0).contains(&first));
        }
    }

    #[test]
    fn test_prefix_beats_substring_beats_none() {
        let apple = score("Apple", "ap");
        let grape = score("Grape", "ap");
        let banana = score("Banana", "ap");

        assert!(apple > grape);
        assert!(grape > 0.0);
        assert_eq!(banana, 0.0);
    }

    #[test]
    fn test_word_start_beats_mid_word() {
        let word_start = score("open file", "f");
        let mid_word = score("profile", "f");
        assert!(word_start > mid_word);
    }

    #[test]
    fn test_space_jump_beats_punctuation_jump() {
        let space = score("go to", "gt");
        let gap = score("go/to", "gt");
        assert!(space > gap);
    }

    #[test]
    fn test_case_mismatch_is_slightly_penalized() {
        let same_case = score("apple", "apple");
        let other_case = score("Apple", "apple");
        assert!(same_case > other_case);
        assert!(other_case > 0.99);
    }

    #[test]
    fn test_keywords_are_searched() {
        let keywords = vec!["fruit".to_string(), "red".to_string()];
        assert_eq!(score("Apple", "fruit"), 0.0);
        assert!(command_score("Apple", "fruit", &keywords) > 0.0);
    }

    #[test]
    fn test_transposition_still_matches() {
        assert!(score("abc", "bac") > 0.0);
        assert!(score("abc", "bac") < score("abc", "abc"));
    }

    #[test]
    fn test_dash_treated_as_space() {
        let dashed = score("code-review", "code review");
        assert!(dashed > 0.999);
        assert!(dashed < 1.0);
    }

    #[test]
    fn test_closure_filter() {
        let prefix_only = |value: &str, search: &str, _: &[String]| {
            if value.to_lowercase().starts_with(&search.to_lowercase()) {
                1.0
            } else {
                0.0
            }
        };
        assert_eq!(prefix_only.score("Apple", "ap", &[]), 1.0);
        assert_eq!(prefix_only.score("Grape", "ap", &[]), 0.0);
    }

    #[test]
    fn test_nucleo_filter_normalized() {
        let filter = NucleoFilter::new();

        let apple = filter.score("Apple", "ap", &[]);
        assert!(apple > 0.0 && apple <= 1.0);
        assert_eq!(filter.score("Banana", "xyz", &[]), 0.0);
        assert_eq!(filter.score("Apple", "apple", &[]), 1.0);
        assert_eq!(filter.score("", "ap", &[]), 0.0);
    }
}
