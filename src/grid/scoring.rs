//! Score computation for grid telemetry records
//!
//! Blends a sigmoid-shaped renewable-generation ratio with the battery state
//! of charge, plus a suffix preference derived from the pod's name.

use crate::grid::types::LocationRecord;

/// Lower bound of the score band expected by the scheduler
pub const MIN_NODE_SCORE: i64 = 0;
/// Upper bound of the score band expected by the scheduler
pub const MAX_NODE_SCORE: i64 = 100;
/// Score applied when telemetry is unavailable or unusable for a node
pub const FALLBACK_SCORE: i64 = 22;
/// Bonus applied to the preferred suffix outcome when the pod carries one
pub const SUFFIX_BONUS: i64 = 10;

/// Steepness of the logistic transform over the renewable ratio
const SIGMOID_STEEPNESS: f64 = 5.0;

/// Decimal digit ending `name`, if any.
///
/// Handles single-digit suffixes only; "pod12" yields 2. A non-digit suffix
/// is a supported outcome, not an error.
pub fn suffix_digit(name: &str) -> Option<u32> {
    name.chars().last().and_then(|c| c.to_digit(10))
}

/// Score one telemetry record into the scheduler's band.
///
/// A zero primary load makes the renewable ratio undefined; such records
/// score at the fallback instead of propagating NaN. Battery charge outside
/// [0, 100] is accepted as-is and absorbed by the final clamp.
pub fn score_record(record: &LocationRecord) -> i64 {
    if record.primary_load == 0.0 {
        return FALLBACK_SCORE;
    }

    let renew_diff = (record.renewable_output - record.primary_load) / record.primary_load;
    let renew_score = 100.0 / (1.0 + (-SIGMOID_STEEPNESS * renew_diff).exp());
    let raw = renew_score.round() * 0.5 + (record.battery_charge.round() - 20.0) * 0.5;

    if !raw.is_finite() {
        return FALLBACK_SCORE;
    }

    // Truncation toward zero, then clamp into the band
    clamp(raw as i64)
}

/// Clamp a raw score into the scheduler's band
pub fn clamp(score: i64) -> i64 {
    score.clamp(MIN_NODE_SCORE, MAX_NODE_SCORE)
}

/// Suffix preference term for one node.
///
/// With `reverse` false the bonus goes to nodes sharing the pod's suffix
/// digit; with `reverse` true it goes to the nodes that don't. Pods without
/// a suffix digit contribute nothing either way.
pub fn suffix_bonus(pod_suffix: Option<u32>, node_name: &str, reverse: bool) -> i64 {
    match pod_suffix {
        Some(digit) => {
            let matched = suffix_digit(node_name) == Some(digit);
            if matched != reverse {
                SUFFIX_BONUS
            } else {
                0
            }
        }
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(renewable_output: f64, primary_load: f64, battery_charge: f64) -> LocationRecord {
        LocationRecord {
            time: "2024-01-01 00:00".to_string(),
            battery_charge,
            renewable_output,
            primary_load,
            unmet_load: 0.0,
            location: "berlin".to_string(),
        }
    }

    // ── suffix extraction ──────────────────────────────────────────────────

    #[test]
    fn test_suffix_digit_all_digits() {
        for d in 0..10u32 {
            let name = format!("web-{d}");
            assert_eq!(suffix_digit(&name), Some(d));
        }
    }

    #[test]
    fn test_suffix_digit_absent() {
        assert_eq!(suffix_digit("web"), None);
        assert_eq!(suffix_digit("web-1a"), None);
        assert_eq!(suffix_digit(""), None);
        assert_eq!(suffix_digit("-"), None);
    }

    #[test]
    fn test_suffix_digit_multi_digit_uses_last() {
        assert_eq!(suffix_digit("pod12"), Some(2));
    }

    // ── score_record ───────────────────────────────────────────────────────

    #[test]
    fn test_score_record_reference_vector() {
        // renew_diff = 0.2, renew_score = 100/(1+e^-1) ≈ 73.106 → round 73,
        // combined = 73*0.5 + (80-20)*0.5 = 66.5, truncated to 66
        let score = score_record(&record(120.0, 100.0, 80.0));
        assert_eq!(score, 66);
    }

    #[test]
    fn test_score_record_deterministic() {
        let r = record(340.0, 295.0, 61.0);
        assert_eq!(score_record(&r), score_record(&r));
    }

    #[test]
    fn test_score_record_zero_load_is_fallback() {
        assert_eq!(score_record(&record(120.0, 0.0, 80.0)), FALLBACK_SCORE);
    }

    #[test]
    fn test_score_record_surplus_renewables() {
        // Large surplus saturates the sigmoid at 100; battery at full charge
        let score = score_record(&record(10_000.0, 100.0, 100.0));
        assert_eq!(score, 90);
    }

    #[test]
    fn test_score_record_deficit_clamped_at_zero() {
        // Deep renewable deficit and an empty battery would go negative
        let score = score_record(&record(0.0, 1_000.0, 0.0));
        assert_eq!(score, MIN_NODE_SCORE);
    }

    #[test]
    fn test_score_record_battery_overrange_clamped() {
        // Battery charge far outside [0,100] pushes the blend over the band
        let score = score_record(&record(10_000.0, 100.0, 900.0));
        assert_eq!(score, MAX_NODE_SCORE);
    }

    #[test]
    fn test_score_record_extreme_inputs_stay_in_band() {
        let extremes = [
            -1.0e12,
            -120.0,
            -1.0,
            1.0e-9,
            100.0,
            1.0e12,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NAN,
        ];

        for &ro in &extremes {
            for &pl in &extremes {
                for &bc in &extremes {
                    let score = score_record(&record(ro, pl, bc));
                    assert!(
                        (MIN_NODE_SCORE..=MAX_NODE_SCORE).contains(&score),
                        "score {score} out of band for ro={ro} pl={pl} bc={bc}"
                    );
                }
            }
        }
    }

    // ── suffix bonus ───────────────────────────────────────────────────────

    #[test]
    fn test_suffix_bonus_match() {
        assert_eq!(suffix_bonus(Some(3), "node-3", false), SUFFIX_BONUS);
        assert_eq!(suffix_bonus(Some(3), "node-4", false), 0);
    }

    #[test]
    fn test_suffix_bonus_reversed() {
        assert_eq!(suffix_bonus(Some(3), "node-3", true), 0);
        assert_eq!(suffix_bonus(Some(3), "node-4", true), SUFFIX_BONUS);
    }

    #[test]
    fn test_suffix_bonus_no_pod_feature() {
        assert_eq!(suffix_bonus(None, "node-3", false), 0);
        assert_eq!(suffix_bonus(None, "node-3", true), 0);
    }

    #[test]
    fn test_suffix_bonus_node_without_digit() {
        // A node without a digit suffix never matches, so it gets the bonus
        // only in reverse mode
        assert_eq!(suffix_bonus(Some(3), "node", false), 0);
        assert_eq!(suffix_bonus(Some(3), "node", true), SUFFIX_BONUS);
    }
}
