//! Result Ranker: reorders recommended journals for display.
//!
//! The model returns acceptance rates and review times as free text ("18%", "6 weeks"),
//! so those keys go through tolerant extraction with a worst-case fallback.
//! Ranking never fails and never mutates its input.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::analysis::models::{Journal, ProbabilityBand};

/// Acceptance rate assumed when none can be read (sorts last).
pub const UNKNOWN_ACCEPTANCE_RATE: f64 = 0.0;
/// Review time in weeks assumed when none can be read (sorts last).
pub const UNKNOWN_REVIEW_WEEKS: u64 = 99;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    MatchScore,
    ImpactFactor,
    AcceptanceRate,
    ReviewTime,
}

/// A journal as shown on a result card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedJournal {
    #[serde(flatten)]
    pub journal: Journal,
    pub probability_band: ProbabilityBand,
}

/// Returns a stably sorted copy of `journals`; ties keep their input order.
pub fn rank_journals(journals: &[Journal], key: SortKey) -> Vec<Journal> {
    let mut ranked = journals.to_vec();
    match key {
        SortKey::MatchScore => ranked.sort_by(|a, b| descending(a.match_score, b.match_score)),
        SortKey::ImpactFactor => {
            ranked.sort_by(|a, b| descending(a.impact_factor, b.impact_factor))
        }
        SortKey::AcceptanceRate => ranked.sort_by_cached_key(|j| {
            std::cmp::Reverse(OrderedRate(parse_acceptance_rate(j.acceptance_rate.as_deref())))
        }),
        SortKey::ReviewTime => {
            ranked.sort_by_cached_key(|j| parse_review_weeks(j.review_time.as_deref()))
        }
    }
    ranked
}

/// `rank_journals` plus the per-card display fields.
pub fn rank_for_display(journals: &[Journal], key: SortKey) -> Vec<RankedJournal> {
    rank_journals(journals, key)
        .into_iter()
        .map(|journal| RankedJournal {
            probability_band: journal.probability_band(),
            journal,
        })
        .collect()
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// f64 wrapper with a total order, so it can be a sort key.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderedRate(f64);

impl Eq for OrderedRate {}

impl PartialOrd for OrderedRate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedRate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Keeps digits and decimal points, then parses the longest numeric prefix as a float.
/// "18%" → 18.0, "15.5% (est.)" → 15.5, "not available" → 0.0.
pub fn parse_acceptance_rate(raw: Option<&str>) -> f64 {
    let digits: String = raw
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    // Anything from the second decimal point on is trailing punctuation.
    let numeric = match digits.match_indices('.').nth(1) {
        Some((second_dot, _)) => &digits[..second_dot],
        None => digits.as_str(),
    };

    numeric
        .parse::<f64>()
        .ok()
        .filter(|rate| rate.is_finite())
        .unwrap_or(UNKNOWN_ACCEPTANCE_RATE)
}

/// Keeps digits only, then parses the rest as an integer week count.
/// "6 weeks" → 6, "unknown" → 99.
pub fn parse_review_weeks(raw: Option<&str>) -> u64 {
    let digits: String = raw
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();

    digits.parse::<u64>().unwrap_or(UNKNOWN_REVIEW_WEEKS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_journal(name: &str) -> Journal {
        Journal {
            name: name.to_string(),
            issn: None,
            publisher: "Example Press".to_string(),
            impact_factor: 1.0,
            acceptance_rate: None,
            review_time: None,
            is_oa: false,
            match_score: 50.0,
            acceptance_probability: 50.0,
            match_reason: "Fits".to_string(),
            scope: String::new(),
        }
    }

    fn names(journals: &[Journal]) -> Vec<&str> {
        journals.iter().map(|j| j.name.as_str()).collect()
    }

    #[test]
    fn test_match_score_descending() {
        let journals: Vec<Journal> = [("a", 10.0), ("b", 90.0), ("c", 50.0)]
            .into_iter()
            .map(|(name, score)| Journal {
                match_score: score,
                ..make_journal(name)
            })
            .collect();

        let ranked = rank_journals(&journals, SortKey::MatchScore);
        assert_eq!(names(&ranked), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_impact_factor_descending() {
        let journals: Vec<Journal> = [("a", 10.0), ("b", 90.0), ("c", 50.0)]
            .into_iter()
            .map(|(name, impact)| Journal {
                impact_factor: impact,
                ..make_journal(name)
            })
            .collect();

        let ranked = rank_journals(&journals, SortKey::ImpactFactor);
        assert_eq!(names(&ranked), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let journals: Vec<Journal> = [("first", 50.0), ("top", 80.0), ("second", 50.0)]
            .into_iter()
            .map(|(name, score)| Journal {
                match_score: score,
                ..make_journal(name)
            })
            .collect();

        let ranked = rank_journals(&journals, SortKey::MatchScore);
        assert_eq!(names(&ranked), vec!["top", "first", "second"]);

        // Reapplying the same key is a no-op.
        let again = rank_journals(&ranked, SortKey::MatchScore);
        assert_eq!(again, ranked);
    }

    #[test]
    fn test_acceptance_rate_malformed_sorts_last() {
        let journals: Vec<Journal> = [("five", "5%"), ("na", "not available"), ("forty-two", "42%")]
            .into_iter()
            .map(|(name, rate)| Journal {
                acceptance_rate: Some(rate.to_string()),
                ..make_journal(name)
            })
            .collect();

        let ranked = rank_journals(&journals, SortKey::AcceptanceRate);
        assert_eq!(names(&ranked), vec!["forty-two", "five", "na"]);
    }

    #[test]
    fn test_review_time_ascending_malformed_last() {
        let journals: Vec<Journal> = [("ten", "10 weeks"), ("two", "2 weeks"), ("unknown", "unknown")]
            .into_iter()
            .map(|(name, time)| Journal {
                review_time: Some(time.to_string()),
                ..make_journal(name)
            })
            .collect();

        let ranked = rank_journals(&journals, SortKey::ReviewTime);
        assert_eq!(names(&ranked), vec!["two", "ten", "unknown"]);
    }

    #[test]
    fn test_missing_free_text_fields_rank_as_worst() {
        let journals = vec![
            make_journal("missing"),
            Journal {
                acceptance_rate: Some("1%".to_string()),
                review_time: Some("52 weeks".to_string()),
                ..make_journal("present")
            },
        ];

        assert_eq!(
            names(&rank_journals(&journals, SortKey::AcceptanceRate)),
            vec!["present", "missing"]
        );
        assert_eq!(
            names(&rank_journals(&journals, SortKey::ReviewTime)),
            vec!["present", "missing"]
        );
    }

    #[test]
    fn test_input_is_not_mutated() {
        let journals: Vec<Journal> = [("a", 1.0), ("b", 2.0)]
            .into_iter()
            .map(|(name, score)| Journal {
                match_score: score,
                ..make_journal(name)
            })
            .collect();
        let before = journals.clone();

        let _ = rank_journals(&journals, SortKey::MatchScore);
        assert_eq!(journals, before);
    }

    #[test]
    fn test_out_of_range_and_non_finite_scores_do_not_panic() {
        let journals: Vec<Journal> = [("nan", f64::NAN), ("neg", -5.0), ("huge", 250.0)]
            .into_iter()
            .map(|(name, score)| Journal {
                match_score: score,
                ..make_journal(name)
            })
            .collect();

        let ranked = rank_journals(&journals, SortKey::MatchScore);
        assert_eq!(ranked.len(), 3);
        let position = |name: &str| ranked.iter().position(|j| j.name == name).unwrap();
        assert!(position("huge") < position("neg"));
    }

    #[test]
    fn test_parse_acceptance_rate() {
        assert_eq!(parse_acceptance_rate(Some("18%")), 18.0);
        assert_eq!(parse_acceptance_rate(Some("~12.5 %")), 12.5);
        assert_eq!(parse_acceptance_rate(Some("not available")), 0.0);
        assert_eq!(parse_acceptance_rate(Some(".")), 0.0);
        assert_eq!(parse_acceptance_rate(Some("1.2.3")), 1.2);
        assert_eq!(parse_acceptance_rate(Some("..5")), 0.0);
        assert_eq!(parse_acceptance_rate(None), 0.0);
    }

    #[test]
    fn test_parse_acceptance_rate_ignores_trailing_periods() {
        assert_eq!(parse_acceptance_rate(Some("15.5% (est.)")), 15.5);
        assert_eq!(parse_acceptance_rate(Some("approx. 18%.")), 0.18);
        assert_eq!(parse_acceptance_rate(Some("20%.")), 20.0);
    }

    #[test]
    fn test_estimated_rate_outranks_missing_rate() {
        let mut estimated = make_journal("estimated");
        estimated.acceptance_rate = Some("15.5% (est.)".to_string());
        let mut missing = make_journal("missing");
        missing.acceptance_rate = Some("not available".to_string());

        let ranked = rank_journals(&[missing, estimated], SortKey::AcceptanceRate);
        assert_eq!(ranked[0].name, "estimated");
    }

    #[test]
    fn test_parse_review_weeks() {
        assert_eq!(parse_review_weeks(Some("6 weeks")), 6);
        assert_eq!(parse_review_weeks(Some("approx. 12 wks")), 12);
        assert_eq!(parse_review_weeks(Some("unknown")), 99);
        assert_eq!(parse_review_weeks(Some("99999999999999999999999 weeks")), 99);
        assert_eq!(parse_review_weeks(None), 99);
    }

    #[test]
    fn test_sort_key_wire_names() {
        let key: SortKey = serde_json::from_str(r#""acceptanceRate""#).unwrap();
        assert_eq!(key, SortKey::AcceptanceRate);
        assert_eq!(SortKey::default(), SortKey::MatchScore);
    }

    #[test]
    fn test_display_ranking_attaches_probability_band() {
        let journals = vec![
            Journal {
                match_score: 10.0,
                acceptance_probability: 80.0,
                ..make_journal("likely")
            },
            Journal {
                match_score: 90.0,
                acceptance_probability: 20.0,
                ..make_journal("unlikely")
            },
        ];

        let ranked = rank_for_display(&journals, SortKey::MatchScore);
        assert_eq!(ranked[0].journal.name, "unlikely");
        assert_eq!(ranked[0].probability_band, ProbabilityBand::Low);
        assert_eq!(ranked[1].probability_band, ProbabilityBand::High);

        let value = serde_json::to_value(&ranked[1]).unwrap();
        assert_eq!(value["name"], "likely");
        assert_eq!(value["probabilityBand"], "high");
    }
}
