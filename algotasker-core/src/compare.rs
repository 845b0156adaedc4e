//! Run every algorithm over the same task set and recommend one.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::algorithms::Scheduler;
use crate::metrics::{Metrics, round1};
use crate::schedule::{Algorithm, ScheduleResult, SchedulingOptions};
use crate::task::Task;

pub const NO_RECOMMENDATION: &str = "No recommendation available";

/// Result slot for one algorithm in a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComparisonOutcome {
    Scheduled(ScheduleResult),
    Failed { algorithm: Algorithm, error: String },
}

impl ComparisonOutcome {
    pub fn result(&self) -> Option<&ScheduleResult> {
        match self {
            ComparisonOutcome::Scheduled(r) => Some(r),
            ComparisonOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ComparisonOutcome::Failed { .. })
    }
}

/// Outcomes keyed by algorithm, iterated in SJF, RoundRobin, Priority order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Comparison {
    outcomes: BTreeMap<Algorithm, ComparisonOutcome>,
}

impl Comparison {
    pub fn get(&self, algorithm: Algorithm) -> Option<&ComparisonOutcome> {
        self.outcomes.get(&algorithm)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Algorithm, &ComparisonOutcome)> {
        self.outcomes.iter().map(|(a, o)| (*a, o))
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Run SJF, Round-Robin and Priority over the same tasks.
pub fn compare_algorithms(tasks: &[Task], options: &SchedulingOptions, now: DateTime<Utc>) -> Comparison {
    let schedulers: [&dyn Scheduler; 3] = [&Algorithm::Sjf, &Algorithm::RoundRobin, &Algorithm::Priority];
    compare_with(&schedulers, tasks, options, now)
}

/// Run each scheduler independently. A failing scheduler is recorded as
/// [`ComparisonOutcome::Failed`] and does not affect the others.
pub fn compare_with(
    schedulers: &[&dyn Scheduler],
    tasks: &[Task],
    options: &SchedulingOptions,
    now: DateTime<Utc>,
) -> Comparison {
    let mut outcomes = BTreeMap::new();

    for scheduler in schedulers {
        let algorithm = scheduler.algorithm();
        let outcome = match scheduler.schedule(tasks, options, now) {
            Ok(result) => ComparisonOutcome::Scheduled(result),
            Err(e) => {
                warn!(%algorithm, error = %e, "algorithm failed during comparison");
                ComparisonOutcome::Failed {
                    algorithm,
                    error: e.to_string(),
                }
            }
        };
        outcomes.insert(algorithm, outcome);
    }

    Comparison { outcomes }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub algorithm: Algorithm,
    /// Composite score, one decimal.
    pub score: f64,
    pub reason: String,
}

/// Pick the best-scoring algorithm that did not fail; ties go to the earlier
/// algorithm in SJF, RoundRobin, Priority order. `None` when every
/// algorithm failed.
pub fn recommend(comparison: &Comparison) -> Option<Recommendation> {
    let mut best: Option<(Algorithm, &Metrics, f64)> = None;

    for (algorithm, outcome) in comparison.iter() {
        let Some(result) = outcome.result() else { continue };
        let score = result.metrics.score();
        if best.is_none_or(|(_, _, b)| score > b) {
            best = Some((algorithm, &result.metrics, score));
        }
    }

    best.map(|(algorithm, metrics, score)| Recommendation {
        algorithm,
        score: round1(score),
        reason: reason(algorithm, metrics),
    })
}

fn reason(algorithm: Algorithm, metrics: &Metrics) -> String {
    match algorithm {
        Algorithm::Sjf => format!(
            "Best for minimizing average wait time ({} min) and completing short tasks quickly",
            metrics.average_wait_time
        ),
        Algorithm::RoundRobin => format!(
            "Best for fairness and balanced task execution with {:.1}% utilization rate",
            metrics.utilization_rate
        ),
        Algorithm::Priority => format!(
            "Best for deadline adherence with {:.1}% on-time completion rate",
            metrics.on_time_completion
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SchedulerError};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
    }

    fn tasks(now: DateTime<Utc>) -> Vec<Task> {
        vec![
            Task::new("A", "A", now + Duration::days(2)).with_duration(120).with_priority(3),
            Task::new("B", "B", now + Duration::days(1)).with_duration(30).with_priority(5),
            Task::new("C", "C", now + Duration::days(7)).with_duration(480).with_priority(1),
        ]
    }

    struct Broken;

    impl Scheduler for Broken {
        fn algorithm(&self) -> Algorithm {
            Algorithm::Priority
        }

        fn schedule(&self, _: &[Task], _: &SchedulingOptions, _: DateTime<Utc>) -> Result<ScheduleResult> {
            Err(SchedulerError::InvalidWorkingHours("broken".into()))
        }
    }

    #[test]
    fn empty_task_set_compares_cleanly() {
        let cmp = compare_algorithms(&[], &SchedulingOptions::default(), now());
        assert_eq!(cmp.len(), 3);
        for algorithm in Algorithm::ALL {
            let r = cmp.get(algorithm).and_then(|o| o.result()).unwrap();
            assert!(r.entries.is_empty());
            assert_eq!(r.metrics, Metrics::default());
        }

        // All tie at 30.0; SJF is first.
        let rec = recommend(&cmp).unwrap();
        assert_eq!(rec.algorithm, Algorithm::Sjf);
        assert_eq!(rec.score, 30.0);
        assert_eq!(
            rec.reason,
            "Best for minimizing average wait time (0 min) and completing short tasks quickly"
        );
    }

    #[test]
    fn invalid_quantum_only_fails_round_robin() {
        let opts = SchedulingOptions {
            time_quantum: 0,
            ..SchedulingOptions::default()
        };
        let cmp = compare_algorithms(&tasks(now()), &opts, now());

        assert!(cmp.get(Algorithm::RoundRobin).unwrap().is_failed());
        assert!(cmp.get(Algorithm::Sjf).unwrap().result().is_some());
        assert!(cmp.get(Algorithm::Priority).unwrap().result().is_some());

        let rec = recommend(&cmp).unwrap();
        assert_ne!(rec.algorithm, Algorithm::RoundRobin);
    }

    #[test]
    fn failing_scheduler_is_isolated() {
        let schedulers: [&dyn Scheduler; 2] = [&Algorithm::Sjf, &Broken];
        let cmp = compare_with(&schedulers, &tasks(now()), &SchedulingOptions::default(), now());

        let ComparisonOutcome::Failed { algorithm, error } = cmp.get(Algorithm::Priority).unwrap() else {
            panic!("expected failure");
        };
        assert_eq!(*algorithm, Algorithm::Priority);
        assert!(error.contains("broken"));
        assert_eq!(recommend(&cmp).unwrap().algorithm, Algorithm::Sjf);
    }

    #[test]
    fn all_failed_has_no_recommendation() {
        let schedulers: [&dyn Scheduler; 1] = [&Broken];
        let cmp = compare_with(&schedulers, &tasks(now()), &SchedulingOptions::default(), now());
        assert!(recommend(&cmp).is_none());
    }

    #[test]
    fn recommendation_is_the_highest_score() {
        let cmp = compare_algorithms(&tasks(now()), &SchedulingOptions::default(), now());
        let rec = recommend(&cmp).unwrap();

        let best = cmp
            .iter()
            .filter_map(|(_, o)| o.result())
            .map(|r| r.metrics.score())
            .fold(f64::MIN, f64::max);
        assert_eq!(rec.score, round1(best));
    }

    #[test]
    fn comparison_json_is_keyed_by_tag() {
        let opts = SchedulingOptions {
            time_quantum: 0,
            ..SchedulingOptions::default()
        };
        let cmp = compare_algorithms(&tasks(now()), &opts, now());
        let json = serde_json::to_value(&cmp).unwrap();

        assert!(json["SJF"]["entries"].is_array());
        assert!(json["Priority"]["metrics"].is_object());
        assert_eq!(json["RoundRobin"]["algorithm"], "RoundRobin");
        assert!(json["RoundRobin"]["error"].as_str().unwrap().contains("time quantum"));
    }
}
