//! Per-cycle score orchestration
//!
//! One [`CycleState`] is built per pending pod: the pod's suffix feature plus
//! a single telemetry snapshot shared by every per-node score call of that
//! cycle. Scoring never fails a cycle; every failure mode degrades to the
//! fallback score.

use k8s_openapi::api::core::v1::Node;
use kube::ResourceExt;
use tracing::{debug, warn};

use crate::grid::scoring::{clamp, score_record, suffix_bonus, suffix_digit, FALLBACK_SCORE};
use crate::grid::types::{GridSchedulerConfig, GridSnapshot, LOCATION_LABEL};

/// Per-pod state for one scheduling cycle.
///
/// Written once before scoring starts, then read-only; safe to share across
/// concurrent per-node score calls.
#[derive(Clone, Debug, Default)]
pub struct CycleState {
    /// Digit suffix of the pod name, when present
    pub pod_suffix: Option<u32>,
    /// Telemetry snapshot for this cycle; `None` when the fetch failed
    pub grid: Option<GridSnapshot>,
}

impl CycleState {
    /// Build the cycle state for a pod.
    ///
    /// Deriving the suffix feature never fails: pods without a digit suffix
    /// simply carry no feature.
    pub fn pre_score(pod_name: &str, grid: Option<GridSnapshot>) -> Self {
        Self {
            pod_suffix: suffix_digit(pod_name),
            grid,
        }
    }
}

/// Score one candidate node.
///
/// Telemetry unavailability, a missing `location` label, and an unmatched
/// location all degrade to [`FALLBACK_SCORE`]; nothing here aborts the
/// scheduling cycle.
pub fn score_node(state: &CycleState, config: &GridSchedulerConfig, node: &Node) -> i64 {
    let node_name = node.name_any();

    let base = match &state.grid {
        Some(snapshot) => {
            let location = node
                .metadata
                .labels
                .as_ref()
                .and_then(|l| l.get(LOCATION_LABEL));

            match location {
                Some(loc) => match snapshot.find_location(loc) {
                    Some(record) => score_record(record),
                    None => {
                        warn!(
                            "No telemetry record for location {} (node {}), using fallback score",
                            loc, node_name
                        );
                        FALLBACK_SCORE
                    }
                },
                None => {
                    debug!(
                        "Node {} has no {} label, using fallback score",
                        node_name, LOCATION_LABEL
                    );
                    FALLBACK_SCORE
                }
            }
        }
        None => FALLBACK_SCORE,
    };

    clamp(base + suffix_bonus(state.pod_suffix, &node_name, config.reverse))
}
