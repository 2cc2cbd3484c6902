//! Keyword scoring of queries against company areas.
//!
//! An area's score is the number of its keywords that occur, case-insensitively,
//! as substrings of the query. Keywords are counted per list entry, so a
//! keyword listed twice counts twice.

use crate::models::CompanyArea;

/// Score of one area for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaScore {
    /// Position of the area in the configuration
    pub index: usize,

    /// Number of matched keywords
    pub score: usize,

    /// The matched keywords, as written in the configuration
    pub matched_keywords: Vec<String>,
}

/// Score every area against `query`, keeping only areas with a non-zero score.
///
/// Results keep configuration order.
pub fn score_areas(areas: &[CompanyArea], query: &str) -> Vec<AreaScore> {
    let query_lower = query.to_lowercase();

    areas
        .iter()
        .enumerate()
        .filter_map(|(index, area)| {
            let matched_keywords: Vec<String> = area
                .keywords
                .iter()
                .filter(|keyword| query_lower.contains(&keyword.to_lowercase()))
                .cloned()
                .collect();

            if matched_keywords.is_empty() {
                return None;
            }

            tracing::debug!(
                "Area {} matched with score {}",
                area.area_name,
                matched_keywords.len()
            );
            tracing::debug!("Matched keywords: {:?}", matched_keywords);

            Some(AreaScore {
                index,
                score: matched_keywords.len(),
                matched_keywords,
            })
        })
        .collect()
}

/// Pick the highest score; on a tie the earliest area wins.
///
/// `Iterator::max_by_key` returns the last maximum, so this scans with a
/// strict comparison instead.
pub fn best_match(scores: &[AreaScore]) -> Option<&AreaScore> {
    let mut best: Option<&AreaScore> = None;
    for candidate in scores {
        if best.map_or(true, |current| candidate.score > current.score) {
            best = Some(candidate);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AreaContact;

    fn area(id: &str, keywords: &[&str]) -> CompanyArea {
        CompanyArea::new(
            id,
            id.to_uppercase(),
            keywords.iter().map(|k| k.to_string()).collect(),
            AreaContact::new(id, format!("{}@example.com", id), "000"),
            format!("{} area", id),
        )
    }

    #[test]
    fn test_scores_count_matching_keywords() {
        let areas = vec![
            area("billing", &["invoice", "payment", "refund"]),
            area("it", &["password", "login"]),
        ];

        let scores = score_areas(&areas, "My payment for the invoice failed");
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].index, 0);
        assert_eq!(scores[0].score, 2);
        assert_eq!(scores[0].matched_keywords, vec!["invoice", "payment"]);
    }

    #[test]
    fn test_scoring_is_case_insensitive() {
        let areas = vec![area("billing", &["Billing"])];
        assert_eq!(score_areas(&areas, "billing question")[0].score, 1);
        assert_eq!(score_areas(&areas, "BILLING QUESTION")[0].score, 1);
        assert_eq!(score_areas(&areas, "BiLLinG")[0].matched_keywords, vec!["Billing"]);
    }

    #[test]
    fn test_scoring_matches_substrings() {
        let areas = vec![area("it", &["log"])];
        assert_eq!(score_areas(&areas, "cannot login")[0].score, 1);
    }

    #[test]
    fn test_duplicate_keywords_count_twice() {
        let areas = vec![area("billing", &["invoice", "invoice"])];
        assert_eq!(score_areas(&areas, "invoice")[0].score, 2);
    }

    #[test]
    fn test_empty_keyword_matches_everything() {
        let areas = vec![area("catch_all", &[""])];
        assert_eq!(score_areas(&areas, "anything at all")[0].score, 1);
    }

    #[test]
    fn test_non_ascii_case_folding() {
        let areas = vec![area("facturacion", &["FACTURACIÓN"])];
        assert_eq!(score_areas(&areas, "duda sobre facturación")[0].score, 1);
    }

    #[test]
    fn test_no_match_yields_no_scores() {
        let areas = vec![area("billing", &["invoice"])];
        assert!(score_areas(&areas, "What time is it?").is_empty());
        assert!(score_areas(&[], "invoice").is_empty());
    }

    #[test]
    fn test_best_match_prefers_highest_score() {
        let areas = vec![
            area("billing", &["invoice"]),
            area("it", &["password", "login"]),
        ];
        let scores = score_areas(&areas, "login password invoice");
        assert_eq!(best_match(&scores).unwrap().index, 1);
    }

    #[test]
    fn test_best_match_tie_goes_to_first_area() {
        let areas = vec![
            area("first", &["account"]),
            area("second", &["account"]),
            area("third", &["account"]),
        ];
        let scores = score_areas(&areas, "account");
        assert_eq!(scores.len(), 3);
        for _ in 0..10 {
            assert_eq!(best_match(&scores).unwrap().index, 0);
        }
    }

    #[test]
    fn test_best_match_empty() {
        assert!(best_match(&[]).is_none());
    }
}
