//! The answer grading engine.
//!
//! Pure functions deciding whether a submitted answer matches the canonical
//! one: exact comparison for multiple choice, and a normalization +
//! numeric-extraction + fuzzy-similarity pipeline for short answers.
//! Nothing here does I/O or holds state, so every function is safe to call
//! concurrently.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Question, QuestionKind};

/// A short answer counts as correct when the normalized similarity
/// ratio exceeds this threshold.
const SIMILARITY_THRESHOLD: f64 = 0.6;

/// Phrases stripped from answers before fuzzy comparison, in removal order
/// ("tai yra" must run before "yra", "yra" before "is").
///
/// Removal is plain substring replacement, not word-boundary matching:
/// "is" is also removed from inside unrelated words (e.g. "paris" becomes
/// "par"). Both sides of the comparison are normalized the same way, so
/// in practice this still grades sensibly, and the behavior is kept for
/// compatibility with existing graded history.
const FILLER_PHRASES: &[&str] = &[
    "atsakymas:",
    "answer:",
    "tai yra",
    "yra",
    "is",
    "equals",
    "the answer is",
    "atsakymas yra",
];

/// Grading feedback for a single submitted answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    /// Whether the answer was accepted.
    pub is_correct: bool,
    /// The answer exactly as the user submitted it.
    pub user_answer: String,
    /// The canonical correct answer.
    pub correct_answer: String,
    /// Explanation carried over from the question, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Similarity percentage ("42.3%"), only for incorrect short answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<String>,
}

/// Check whether `user_answer` is an acceptable answer to `question`.
///
/// Empty or whitespace-only answers are always wrong, regardless of kind.
/// Questions of an unrecognized kind grade as incorrect rather than
/// erroring; producing well-formed questions is the generator's contract.
pub fn check_answer(question: &Question, user_answer: &str) -> bool {
    if user_answer.trim().is_empty() {
        return false;
    }

    match question.kind {
        QuestionKind::MultipleChoice => check_multiple_choice(&question.correct, user_answer),
        QuestionKind::Short => check_short_answer(&question.correct, user_answer),
        QuestionKind::Unknown => false,
    }
}

/// Multiple choice: exact letter match after trimming and uppercasing.
/// Accepts both "A" and "A)" style answers.
fn check_multiple_choice(correct: &str, user_answer: &str) -> bool {
    let correct = correct.trim().to_uppercase();
    let user = user_answer.trim().to_uppercase();

    let chars: Vec<char> = user.chars().collect();
    if chars.len() > 1 && chars[1] == ')' {
        return chars[0].to_string() == correct;
    }

    user == correct
}

/// Short answer: exact match, then normalized match, then numeric match,
/// then fuzzy similarity. First success wins.
fn check_short_answer(correct: &str, user_answer: &str) -> bool {
    let correct = correct.trim().to_lowercase();
    let user = user_answer.trim().to_lowercase();

    if correct == user {
        return true;
    }

    let correct_normalized = normalize_answer(&correct);
    let user_normalized = normalize_answer(&user);

    if correct_normalized == user_normalized {
        return true;
    }

    // Numeric answers: "x = 3", "x=3", and "3" should all agree.
    let correct_numbers = extract_numbers(&correct_normalized);
    let user_numbers = extract_numbers(&user_normalized);
    if !correct_numbers.is_empty() && !user_numbers.is_empty() && correct_numbers == user_numbers {
        return true;
    }

    similarity_ratio(&correct_normalized, &user_normalized) > SIMILARITY_THRESHOLD
}

/// Normalize an answer for fuzzy comparison: trim and lowercase, strip a
/// leading `x =` style variable assignment, remove filler phrases, and
/// collapse whitespace runs to single spaces.
///
/// Each phrase is removed in a single pass, in list order. A removal can
/// expose a new phrase ("yisra" loses "is" and becomes "yra"), which a
/// second call would then strip, so normalizing twice is not always the
/// same as normalizing once.
pub fn normalize_answer(text: &str) -> String {
    let mut text = strip_assignment_prefix(text.trim().to_lowercase().as_str()).to_string();

    for phrase in FILLER_PHRASES {
        text = text.replace(phrase, "");
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip a leading "single lowercase letter, optional spaces, `=`,
/// optional spaces" prefix, as in "x = 3" or "y=0.5".
fn strip_assignment_prefix(text: &str) -> &str {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return text,
    }

    let rest = chars.as_str().trim_start();
    match rest.strip_prefix('=') {
        Some(after) => after.trim_start(),
        None => text,
    }
}

/// Extract all numeric tokens (optionally signed, optionally decimal) in
/// order of appearance.
fn extract_numbers(text: &str) -> Vec<f64> {
    let chars: Vec<char> = text.chars().collect();
    let mut numbers = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let starts_number = chars[i].is_ascii_digit()
            || (chars[i] == '-' && i + 1 < chars.len() && chars[i + 1].is_ascii_digit());
        if !starts_number {
            i += 1;
            continue;
        }

        let start = i;
        if chars[i] == '-' {
            i += 1;
        }
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        // Fractional part only when a digit follows the dot.
        if i + 1 < chars.len() && chars[i] == '.' && chars[i + 1].is_ascii_digit() {
            i += 1;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
        }

        let token: String = chars[start..i].iter().collect();
        if let Ok(value) = token.parse::<f64>() {
            numbers.push(value);
        }
    }

    numbers
}

/// Case-insensitive similarity ratio between two strings, in `[0.0, 1.0]`.
///
/// Computes `2 * M / T` where `M` is the total length of matching blocks
/// found by recursively taking the longest matching block (the classic
/// sequence-matcher ratio, over Unicode scalar values, with no junk
/// heuristic), and `T` is the sum of both lengths. Two empty strings are
/// considered identical (ratio 1.0).
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_total(&a, &b) as f64 / total as f64
}

/// Total length of matching blocks between `a` and `b`: find the longest
/// matching block, then recurse into the pieces to its left and right.
fn matching_total(a: &[char], b: &[char]) -> usize {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate() {
        b2j.entry(c).or_default().push(j);
    }

    let mut total = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, size) = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if size > 0 {
            total += size;
            queue.push((alo, i, blo, j));
            queue.push((i + size, ahi, j + size, bhi));
        }
    }
    total
}

/// Find the longest block such that `a[i..i+size] == b[j..j+size]` with
/// `alo <= i < i+size <= ahi` and `blo <= j < j+size <= bhi`. Of all
/// maximal blocks, returns the one starting earliest in `a` (and of those,
/// earliest in `b`).
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best_i = alo;
    let mut best_j = blo;
    let mut best_size = 0;

    // j2len[j] = length of the longest match ending at a[i - 1], b[j].
    let mut j2len: HashMap<usize, usize> = HashMap::new();
    for (i, &c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut new_j2len = HashMap::new();
        if let Some(indices) = b2j.get(&c) {
            for &j in indices {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let size = if j > 0 {
                    j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                new_j2len.insert(j, size);
                if size > best_size {
                    best_i = i + 1 - size;
                    best_j = j + 1 - size;
                    best_size = size;
                }
            }
        }
        j2len = new_j2len;
    }

    (best_i, best_j, best_size)
}

/// Build the feedback record for a graded answer.
///
/// The similarity percentage is only reported for incorrect short answers,
/// and is computed on the raw strings (not the normalized forms), so the
/// user sees how close their literal input was.
pub fn feedback(question: &Question, user_answer: &str, is_correct: bool) -> Feedback {
    let similarity = if !is_correct && question.kind == QuestionKind::Short {
        let ratio = similarity_ratio(&question.correct, user_answer);
        Some(format!("{:.1}%", ratio * 100.0))
    } else {
        None
    };

    Feedback {
        is_correct,
        user_answer: user_answer.to_string(),
        correct_answer: question.correct.clone(),
        explanation: question.explanation.clone(),
        similarity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multiple_choice(correct: &str) -> Question {
        Question {
            question: "Kokia yra Lietuvos sostinė?".into(),
            kind: QuestionKind::MultipleChoice,
            options: vec![
                "A) Vilnius".into(),
                "B) Kaunas".into(),
                "C) Klaipėda".into(),
                "D) Šiauliai".into(),
            ],
            correct: correct.into(),
            explanation: None,
        }
    }

    fn short(correct: &str) -> Question {
        Question {
            question: "Kas yra mitochondrija?".into(),
            kind: QuestionKind::Short,
            options: vec![],
            correct: correct.into(),
            explanation: Some("Mitochondrija gamina ATP".into()),
        }
    }

    #[test]
    fn multiple_choice_letter_formats() {
        let q = multiple_choice("A");
        assert!(check_answer(&q, "A"));
        assert!(check_answer(&q, "a"));
        assert!(check_answer(&q, "A)"));
        assert!(check_answer(&q, "a) Vilnius"));
        assert!(!check_answer(&q, "B"));
        assert!(!check_answer(&q, "B)"));
        assert!(!check_answer(&q, ""));
    }

    #[test]
    fn multiple_choice_is_exact() {
        // No fuzziness for multiple choice, even near-misses.
        let q = multiple_choice("C");
        assert!(check_answer(&q, " c "));
        assert!(!check_answer(&q, "CC"));
        assert!(!check_answer(&q, "Vilnius"));
    }

    #[test]
    fn blank_answers_are_always_wrong() {
        for q in [multiple_choice("A"), short("bet koks atsakymas")] {
            assert!(!check_answer(&q, ""));
            assert!(!check_answer(&q, "   "));
            assert!(!check_answer(&q, "\t\n"));
        }
    }

    #[test]
    fn unknown_kind_grades_false() {
        let q = Question {
            question: "Q?".into(),
            kind: QuestionKind::Unknown,
            options: vec![],
            correct: "whatever".into(),
            explanation: None,
        };
        assert!(!check_answer(&q, "whatever"));
    }

    #[test]
    fn short_answer_exact_match() {
        let q = short("Energijos gamykla ląstelėje");
        assert!(check_answer(&q, "Energijos gamykla ląstelėje"));
        assert!(check_answer(&q, "  energijos gamykla ląstelėje  "));
    }

    #[test]
    fn short_answer_fuzzy_match() {
        let q = short("Energijos gamykla ląstelėje");
        assert!(check_answer(&q, "energijos gamykla"));
        assert!(!check_answer(&q, "branduolys"));
    }

    #[test]
    fn short_answer_numeric_equivalence() {
        let q = short("x = 3");
        assert!(check_answer(&q, "x = 3"));
        assert!(check_answer(&q, "x=3"));
        assert!(check_answer(&q, "3"));
        assert!(!check_answer(&q, "5"));
    }

    #[test]
    fn numeric_match_compares_full_sequences() {
        let q = short("3 ir 7");
        assert!(check_answer(&q, "3, 7"));
        assert!(!check_answer(&q, "7, 3"));

        let decimals = short("x = 0.5");
        assert!(check_answer(&decimals, "0.50"));
        assert!(check_answer(&decimals, "atsakymas: 0.5"));
    }

    #[test]
    fn check_answer_is_deterministic() {
        let q = short("Energijos gamykla ląstelėje");
        let first = check_answer(&q, "energijos gamykla");
        for _ in 0..10 {
            assert_eq!(check_answer(&q, "energijos gamykla"), first);
        }
    }

    #[test]
    fn normalize_strips_assignment_prefix() {
        assert_eq!(normalize_answer("x = 3"), "3");
        assert_eq!(normalize_answer("y=0.5"), "0.5");
        assert_eq!(normalize_answer("X = 3"), "3"); // lowercased first
        assert_eq!(normalize_answer("xy = 3"), "xy = 3");
        assert_eq!(normalize_answer("= 3"), "= 3");
    }

    #[test]
    fn normalize_removes_filler_phrases() {
        assert_eq!(normalize_answer("Atsakymas: Vilnius"), "vilnius");
        assert_eq!(normalize_answer("tai yra Vilnius"), "vilnius");
        // "is" runs before "the answer is" in the phrase list, so the
        // longer phrase never matches intact.
        assert_eq!(normalize_answer("the answer is Vilnius"), "the answer vilnius");
    }

    #[test]
    fn normalize_substring_removal_hits_embedded_words() {
        // "is" is stripped from inside words too; documented behavior.
        assert_eq!(normalize_answer("paris"), "par");
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_answer("  a   b \t c  "), "a b c");
    }

    #[test]
    fn normalize_is_idempotent_when_no_removal_exposes_a_phrase() {
        for s in [
            "x = 3",
            "Atsakymas: Vilnius",
            "the answer is   42",
            "Energijos gamykla ląstelėje",
            "paris",
            "",
            "   ",
        ] {
            let once = normalize_answer(s);
            assert_eq!(normalize_answer(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn normalize_second_pass_can_strip_an_exposed_phrase() {
        // Removing "is" from "yisra" leaves "yra", itself a filler
        // phrase, so a second normalization strips further.
        let once = normalize_answer("yisra = 5");
        assert_eq!(once, "yra = 5");
        assert_eq!(normalize_answer(&once), "= 5");
    }

    #[test]
    fn extract_numbers_tokens() {
        assert_eq!(extract_numbers("3"), vec![3.0]);
        assert_eq!(extract_numbers("x yra -2.5 ir 4"), vec![-2.5, 4.0]);
        assert_eq!(extract_numbers("3.5.6"), vec![3.5, 6.0]);
        assert_eq!(extract_numbers("2-3"), vec![2.0, -3.0]);
        assert_eq!(extract_numbers("5."), vec![5.0]);
        assert!(extract_numbers("jokio skaičiaus").is_empty());
    }

    #[test]
    fn similarity_identical_is_one() {
        assert_eq!(similarity_ratio("Vilnius", "vilnius"), 1.0);
        assert_eq!(similarity_ratio("", ""), 1.0);
    }

    #[test]
    fn similarity_disjoint_is_low() {
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
        assert!(similarity_ratio("aceg", "bdfh") < 0.2);
    }

    #[test]
    fn similarity_partial_overlap() {
        // "energijos gamykla" is a 17-char block of the 27-char answer:
        // 2 * 17 / (27 + 17) ≈ 0.773.
        let ratio = similarity_ratio("Energijos gamykla ląstelėje", "energijos gamykla");
        assert!(ratio > 0.6, "expected > 0.6, got {ratio}");
        assert!(ratio < 1.0);
    }

    #[test]
    fn similarity_is_symmetric_for_these_inputs() {
        // The matching-block algorithm is symmetric in practice; pin it
        // down for the strings we care about rather than assuming it.
        let pairs = [
            ("Energijos gamykla ląstelėje", "energijos gamykla"),
            ("abcdef", "cdefab"),
            ("Vilnius", "Kaunas"),
        ];
        for (a, b) in pairs {
            assert_eq!(similarity_ratio(a, b), similarity_ratio(b, a));
        }
    }

    #[test]
    fn similarity_in_unit_range() {
        for (a, b) in [("a", ""), ("", "b"), ("abc", "abcabc"), ("ąčę", "ąčę")] {
            let r = similarity_ratio(a, b);
            assert!((0.0..=1.0).contains(&r), "{a:?} vs {b:?} gave {r}");
        }
    }

    #[test]
    fn feedback_for_incorrect_short_answer() {
        let q = short("Energijos gamykla ląstelėje");
        let fb = feedback(&q, "branduolys", false);
        assert!(!fb.is_correct);
        assert_eq!(fb.user_answer, "branduolys");
        assert_eq!(fb.correct_answer, "Energijos gamykla ląstelėje");
        assert_eq!(fb.explanation.as_deref(), Some("Mitochondrija gamina ATP"));
        let similarity = fb.similarity.expect("incorrect short answers carry similarity");
        assert!(similarity.ends_with('%'));
    }

    #[test]
    fn feedback_omits_similarity_when_correct() {
        let q = short("Energijos gamykla ląstelėje");
        let fb = feedback(&q, "energijos gamykla", true);
        assert!(fb.similarity.is_none());
    }

    #[test]
    fn feedback_omits_similarity_for_multiple_choice() {
        let q = multiple_choice("A");
        let fb = feedback(&q, "B", false);
        assert!(fb.similarity.is_none());
        assert!(fb.explanation.is_none());
    }

    #[test]
    fn feedback_serializes_without_empty_fields() {
        let q = multiple_choice("A");
        let fb = feedback(&q, "A", true);
        let json = serde_json::to_string(&fb).unwrap();
        assert!(!json.contains("similarity"));
        assert!(!json.contains("explanation"));
        assert!(json.contains("\"is_correct\":true"));
    }
}
