//! # Tagging Metrics
//!
//! Token-level precision, recall and F1 over flattened label sequences.

use crate::error::{PosTagError, Result};

/// Precision, recall and F1 of a single label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Occurrences of the label in the gold sequences.
    pub support: usize,
}

/// Per-label scores for every label in `labels`, in that order.
///
/// Ratios with a zero denominator are reported as 0.
pub fn label_scores(
    y_true: &[Vec<String>],
    y_pred: &[Vec<String>],
    labels: &[String],
) -> Result<Vec<LabelScore>> {
    check_aligned(y_true, y_pred)?;

    let pairs: Vec<(&str, &str)> = y_true
        .iter()
        .flatten()
        .zip(y_pred.iter().flatten())
        .map(|(t, p)| (t.as_str(), p.as_str()))
        .collect();

    Ok(labels
        .iter()
        .map(|label| {
            let (mut tp, mut fp, mut fn_) = (0usize, 0usize, 0usize);
            for &(t, p) in &pairs {
                match (t == label, p == label) {
                    (true, true) => tp += 1,
                    (false, true) => fp += 1,
                    (true, false) => fn_ += 1,
                    (false, false) => {}
                }
            }
            let precision = ratio(tp, tp + fp);
            let recall = ratio(tp, tp + fn_);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            LabelScore {
                label: label.clone(),
                precision,
                recall,
                f1,
                support: tp + fn_,
            }
        })
        .collect())
}

/// Support-weighted mean F1 over `labels`.
///
/// Returns 0 when none of the labels occurs in `y_true`.
pub fn flat_f1_score(
    y_true: &[Vec<String>],
    y_pred: &[Vec<String>],
    labels: &[String],
) -> Result<f64> {
    let scores = label_scores(y_true, y_pred, labels)?;
    let total: usize = scores.iter().map(|s| s.support).sum();
    if total == 0 {
        return Ok(0.0);
    }
    let weighted: f64 = scores.iter().map(|s| s.f1 * s.support as f64).sum();
    Ok(weighted / total as f64)
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

fn check_aligned(y_true: &[Vec<String>], y_pred: &[Vec<String>]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(PosTagError::PredictionMismatch {
            index: y_true.len().min(y_pred.len()),
            expected: y_true.len(),
            found: y_pred.len(),
        });
    }
    match y_true
        .iter()
        .zip(y_pred)
        .position(|(t, p)| t.len() != p.len())
    {
        Some(index) => Err(PosTagError::PredictionMismatch {
            index,
            expected: y_true[index].len(),
            found: y_pred[index].len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seqs(rows: &[&str]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    fn labels(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn perfect_prediction_scores_one() {
        let y = seqs(&["DET NOUN VERB", "PRON VERB"]);
        let f1 = flat_f1_score(&y, &y, &labels("DET NOUN VERB PRON")).unwrap();
        assert!((f1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn weighted_f1_matches_hand_computation() {
        // A: tp=1 fp=1 fn=1 -> F1 0.5, support 2
        // B: tp=0 fp=1 fn=1 -> F1 0.0, support 1
        let y_true = seqs(&["A B A"]);
        let y_pred = seqs(&["A A B"]);
        let f1 = flat_f1_score(&y_true, &y_pred, &labels("A B")).unwrap();
        assert!((f1 - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn flattening_spans_sentences() {
        // NOUN: tp=2 fp=0 fn=1 -> P 1, R 2/3, F1 0.8, support 3
        // VERB: tp=1 fp=1 fn=0 -> P 0.5, R 1, F1 2/3, support 1
        let y_true = seqs(&["NOUN VERB", "NOUN NOUN"]);
        let y_pred = seqs(&["NOUN VERB", "VERB NOUN"]);
        let scores = label_scores(&y_true, &y_pred, &labels("NOUN VERB")).unwrap();
        assert_eq!(scores[0].support, 3);
        assert!((scores[0].f1 - 0.8).abs() < 1e-12);
        assert!((scores[1].precision - 0.5).abs() < 1e-12);

        let f1 = flat_f1_score(&y_true, &y_pred, &labels("NOUN VERB")).unwrap();
        let expected = (0.8 * 3.0 + 2.0 / 3.0) / 4.0;
        assert!((f1 - expected).abs() < 1e-12);
    }

    #[test]
    fn labels_outside_the_list_are_ignored() {
        let y_true = seqs(&["A X"]);
        let y_pred = seqs(&["A Y"]);
        let f1 = flat_f1_score(&y_true, &y_pred, &labels("A")).unwrap();
        assert!((f1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_support_gives_zero() {
        let y = seqs(&["A"]);
        assert_eq!(flat_f1_score(&y, &y, &labels("B")).unwrap(), 0.0);
        assert_eq!(flat_f1_score(&[], &[], &labels("A")).unwrap(), 0.0);
    }

    #[test]
    fn misaligned_input_is_an_error() {
        let y_true = seqs(&["A B"]);
        assert!(matches!(
            flat_f1_score(&y_true, &seqs(&["A"]), &labels("A B")),
            Err(PosTagError::PredictionMismatch {
                index: 0,
                expected: 2,
                found: 1
            })
        ));
        assert!(flat_f1_score(&y_true, &seqs(&["A B", "A"]), &labels("A")).is_err());
    }
}
