//! String similarity primitives for fuzzy entity matching.
//!
//! Everything here is a pure function over its inputs: Levenshtein edit
//! distance, a normalized similarity score, fuzzy containment, best-match
//! search over candidate lists, multi-field object matching through the
//! [`FuzzyFields`] seam, a simplified phonetic code, and person-name matching
//! with first/last/initials special cases.

/// Classic dynamic-programming edit distance (insert/delete/substitute,
/// unit cost). Operates on Unicode scalar values, not bytes.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (len_a, len_b) = (a.len(), b.len());

    let mut matrix = vec![vec![0usize; len_b + 1]; len_a + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=len_b {
        matrix[0][j] = j;
    }

    for i in 1..=len_a {
        for j in 1..=len_b {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[len_a][len_b]
}

/// Normalized similarity in `[0, 1]`: `1 - distance / max_len` after
/// lowercasing and trimming both sides.
///
/// Identical strings (post-normalization) score exactly 1.0; if either side
/// is empty the score is exactly 0.0.
pub fn similarity_score(a: &str, b: &str) -> f32 {
    let a = a.to_lowercase();
    let a = a.trim();
    let b = b.to_lowercase();
    let b = b.trim();

    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let max_len = a.chars().count().max(b.chars().count());
    let distance = levenshtein_distance(a, b);
    1.0 - (distance as f32 / max_len as f32)
}

/// Whether `haystack` contains `needle`, tolerating typos.
///
/// Exact substring and prefix matches short-circuit; otherwise every needle
/// word must have some haystack word at or above `threshold` similarity.
pub fn fuzzy_contains(haystack: &str, needle: &str, threshold: f32) -> bool {
    let h = haystack.to_lowercase();
    let h = h.trim();
    let n = needle.to_lowercase();
    let n = n.trim();

    if h.contains(n) || h.starts_with(n) {
        return true;
    }

    let haystack_words: Vec<&str> = h.split_whitespace().collect();
    n.split_whitespace().all(|needle_word| {
        haystack_words
            .iter()
            .any(|hw| similarity_score(hw, needle_word) >= threshold)
    })
}

/// A best-match result from [`find_best_match`].
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch<'a> {
    pub value: &'a str,
    pub score: f32,
}

/// Find the best fuzzy match for `query` among `candidates`.
///
/// Exact matches score 1.0 and win immediately; substring containment scores
/// `0.9 + 0.1 * query_len / candidate_len`; everything else falls back to
/// [`similarity_score`]. A candidate qualifies only when its score is
/// strictly above `threshold`.
pub fn find_best_match<'a, S: AsRef<str>>(
    query: &str,
    candidates: &'a [S],
    threshold: f32,
) -> Option<BestMatch<'a>> {
    let q = query.to_lowercase();
    let q = q.trim();
    if q.is_empty() {
        return None;
    }

    let mut best: Option<&'a str> = None;
    let mut best_score = threshold;

    for candidate in candidates {
        let candidate = candidate.as_ref();
        let c = candidate.to_lowercase();
        let c = c.trim();

        if c == q {
            return Some(BestMatch {
                value: candidate,
                score: 1.0,
            });
        }

        if c.contains(q) {
            let score = substring_score(q, c);
            if score > best_score {
                best_score = score;
                best = Some(candidate);
            }
            continue;
        }

        let score = similarity_score(q, c);
        if score > best_score {
            best_score = score;
            best = Some(candidate);
        }
    }

    best.map(|value| BestMatch {
        value,
        score: best_score,
    })
}

/// Score for a candidate that contains the query as a substring: longer
/// coverage of the candidate ranks higher, but always above plain fuzzy hits.
fn substring_score(query: &str, candidate: &str) -> f32 {
    0.9 + 0.1 * (query.chars().count() as f32 / candidate.chars().count() as f32)
}

/// Seam for multi-field fuzzy matching: a candidate exposes its searchable
/// fields as `(field_name, value)` pairs, in priority order.
pub trait FuzzyFields {
    fn fuzzy_fields(&self) -> Vec<(&'static str, Option<&str>)>;
}

/// A scored candidate from [`fuzzy_match_objects`].
#[derive(Debug, Clone)]
pub struct ObjectMatch<'a, T> {
    pub item: &'a T,
    pub score: f32,
    pub matched_field: &'static str,
}

/// Match `query` against every field of every candidate, keeping candidates
/// whose best field score meets `threshold`, sorted by score descending.
///
/// Per field: exact match scores 1.0 (and stops scanning that candidate),
/// substring containment scores `0.9 + 0.1 * query_len / value_len`, and the
/// fallback is [`similarity_score`].
pub fn fuzzy_match_objects<'a, T: FuzzyFields>(
    query: &str,
    candidates: &'a [T],
    threshold: f32,
) -> Vec<ObjectMatch<'a, T>> {
    let q = query.to_lowercase();
    let q = q.trim();
    if q.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();

    for candidate in candidates {
        let mut best_score = 0.0_f32;
        let mut best_field = "";

        for (field, value) in candidate.fuzzy_fields() {
            let Some(value) = value else { continue };
            let v = value.to_lowercase();
            let v = v.trim();

            if v == q {
                best_score = 1.0;
                best_field = field;
                break;
            }

            if v.contains(q) {
                let score = substring_score(q, v);
                if score > best_score {
                    best_score = score;
                    best_field = field;
                }
                continue;
            }

            let score = similarity_score(q, v);
            if score > best_score {
                best_score = score;
                best_field = field;
            }
        }

        if best_score >= threshold {
            matches.push(ObjectMatch {
                item: candidate,
                score: best_score,
                matched_field: best_field,
            });
        }
    }

    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches
}

/// Lowercase, trim, and collapse runs of whitespace. With `remove_special`,
/// additionally strip everything outside `[a-z0-9 -]`.
pub fn normalize(s: &str, remove_special: bool) -> String {
    let mut normalized: String = s
        .to_lowercase()
        .trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if remove_special {
        normalized.retain(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' ' || c == '-');
    }

    normalized
}

/// Whether two strings share the same simplified phonetic code.
pub fn phonetically_similar(a: &str, b: &str) -> bool {
    phonetic_code(a) == phonetic_code(b)
}

/// Simplified Soundex-like code: first letter kept, later letters bucketed
/// by sound class, consecutive duplicates collapsed, capped at 6 chars.
pub fn phonetic_code(s: &str) -> String {
    let s = s.to_lowercase();
    let s = s.trim();
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut code = String::new();
    code.push(first);

    for c in chars {
        let bucket = match c {
            'a' | 'e' | 'i' | 'o' | 'u' => '0',
            'b' | 'p' | 'f' | 'v' => '1',
            'c' | 'g' | 'j' | 'k' | 'q' => '2',
            's' | 'x' | 'z' => '3',
            'd' | 't' => '4',
            'l' => '5',
            'm' | 'n' => '6',
            'r' => '7',
            other => other,
        };
        if code.chars().last() != Some(bucket) {
            code.push(bucket);
        }
    }

    code.chars().take(6).collect()
}

/// Uppercased first letter of every whitespace-separated word.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// Match a query against a person's full name.
///
/// Priority order: exact normalized match (1.0), full-name substring
/// containment (0.95), first-name similarity at or above `threshold`,
/// last-name similarity at or above `threshold`, initials equality with
/// optional periods (0.85), then whole-string similarity gated by
/// `threshold`. Returns `None` below threshold.
pub fn match_name(query: &str, full_name: &str, threshold: f32) -> Option<f32> {
    let q = normalize(query, false);
    let name = normalize(full_name, false);

    if name == q {
        return Some(1.0);
    }
    if !q.is_empty() && name.contains(&q) {
        return Some(0.95);
    }

    let parts: Vec<&str> = name.split_whitespace().collect();

    if let Some(first) = parts.first() {
        let score = similarity_score(&q, first);
        if score >= threshold {
            return Some(score);
        }
    }

    if parts.len() > 1 {
        if let Some(last) = parts.last() {
            let score = similarity_score(&q, last);
            if score >= threshold {
                return Some(score);
            }
        }
    }

    let initials = initials(full_name).to_lowercase();
    if !initials.is_empty() && (q == initials || q.replace('.', "") == initials) {
        return Some(0.85);
    }

    let score = similarity_score(&q, &name);
    (score >= threshold).then_some(score)
}

/// Remove every case-insensitive occurrence of `needle` from `haystack`.
///
/// Used by the entity extraction stages to consume matched entity names out
/// of the working query. Matching is on lowercase forms; removal preserves
/// the surrounding original text.
pub fn remove_case_insensitive(haystack: &str, needle: &str) -> String {
    if needle.is_empty() {
        return haystack.to_string();
    }

    let lower_haystack = haystack.to_lowercase();
    let lower_needle = needle.to_lowercase();

    // Byte offsets from the lowercase search are only safe to apply to the
    // original when both have the same length; lowercasing can change byte
    // length for some Unicode text, so fall back to returning the input.
    if lower_haystack.len() != haystack.len() {
        return haystack.to_string();
    }

    let mut result = String::with_capacity(haystack.len());
    let mut cursor = 0;
    while let Some(found) = lower_haystack[cursor..].find(&lower_needle) {
        let start = cursor + found;
        result.push_str(&haystack[cursor..start]);
        cursor = start + lower_needle.len();
    }
    result.push_str(&haystack[cursor..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_identity_is_zero() {
        for s in ["", "a", "portrait", "über", "two words"] {
            assert_eq!(levenshtein_distance(s, s), 0);
        }
    }

    #[test]
    fn distance_counts_edits() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("flaw", "lawn"), 2);
    }

    #[test]
    fn similarity_bounds() {
        assert_eq!(similarity_score("sunset", "sunset"), 1.0);
        assert_eq!(similarity_score("Sunset ", "sunset"), 1.0);
        assert_eq!(similarity_score("", "x"), 0.0);
        assert_eq!(similarity_score("x", ""), 0.0);
        let s = similarity_score("portrait", "portrai");
        assert!(s > 0.8 && s < 1.0);
    }

    #[test]
    fn fuzzy_contains_substring_and_words() {
        assert!(fuzzy_contains("summer wedding shoot", "wedding", 0.7));
        assert!(fuzzy_contains("summer wedding shoot", "weding shoot", 0.7));
        assert!(!fuzzy_contains("summer wedding shoot", "corporate", 0.7));
    }

    #[test]
    fn best_match_prefers_exact_then_substring() {
        let candidates = ["portrait", "portraiture", "landscape"];
        let hit = find_best_match("portrait", &candidates, 0.6).unwrap();
        assert_eq!(hit.value, "portrait");
        assert_eq!(hit.score, 1.0);

        let hit = find_best_match("portrai", &candidates, 0.6).unwrap();
        // "portrai" is a substring of both; coverage favors the shorter one.
        assert_eq!(hit.value, "portrait");
        assert!(hit.score > 0.9);
    }

    #[test]
    fn best_match_rejects_below_threshold() {
        let candidates = ["bridal", "editorial"];
        assert!(find_best_match("zzz", &candidates, 0.6).is_none());
    }

    #[test]
    fn phonetic_codes_match_similar_sounds() {
        assert!(phonetically_similar("smith", "smyth"));
        assert!(!phonetically_similar("smith", "jones"));
        assert_eq!(phonetic_code(""), "");
    }

    #[test]
    fn initials_from_name() {
        assert_eq!(initials("John Doe"), "JD");
        assert_eq!(initials("  ada  lovelace  king "), "ALK");
    }

    #[test]
    fn name_matching_priority() {
        assert_eq!(match_name("Alice Smith", "alice smith", 0.7), Some(1.0));
        assert_eq!(match_name("alice", "Alice Smith", 0.7), Some(0.95));
        assert_eq!(match_name("as", "Alice Smith", 0.7), Some(0.85));
        assert_eq!(match_name("a.s.", "Alice Smith", 0.7), Some(0.85));
        // First-name typo clears the threshold via token similarity.
        let score = match_name("alicia", "Alicja Smith", 0.7).unwrap();
        assert!(score >= 0.7);
        assert_eq!(match_name("bob", "Alice Smith", 0.7), None);
    }

    #[test]
    fn case_insensitive_removal() {
        assert_eq!(
            remove_case_insensitive("photos by Alice and alice", "alice"),
            "photos by  and "
        );
        assert_eq!(remove_case_insensitive("untouched", "zzz"), "untouched");
        assert_eq!(remove_case_insensitive("abc", ""), "abc");
    }

    #[test]
    fn object_matching_scores_fields() {
        struct Named {
            name: &'static str,
            display: &'static str,
        }
        impl FuzzyFields for Named {
            fn fuzzy_fields(&self) -> Vec<(&'static str, Option<&str>)> {
                vec![("name", Some(self.name)), ("display", Some(self.display))]
            }
        }

        let items = [
            Named { name: "sunset", display: "Sunset" },
            Named { name: "sunrise", display: "Sunrise" },
            Named { name: "studio", display: "Studio Light" },
        ];

        let matches = fuzzy_match_objects("sunset", &items, 0.6);
        assert_eq!(matches[0].item.name, "sunset");
        assert_eq!(matches[0].score, 1.0);
        assert_eq!(matches[0].matched_field, "name");

        let matches = fuzzy_match_objects("light", &items, 0.6);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].item.name, "studio");
        assert_eq!(matches[0].matched_field, "display");
    }
}
