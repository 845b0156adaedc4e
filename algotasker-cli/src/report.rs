//! Plain-text rendering of engine results.

use std::collections::BTreeMap;

use algotasker_core::{
    Comparison, ComparisonOutcome, EntryDetail, Metrics, NO_RECOMMENDATION, Recommendation,
    ScheduleResult, SchedulingAnalytics, Task,
};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

fn local(dt: DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz).format("%a %Y-%m-%d %H:%M").to_string()
}

pub fn print_schedule(result: &ScheduleResult, tz: Tz) {
    println!("# {} schedule\n", result.algorithm);

    if result.is_empty() {
        println!("No tasks to schedule.\n");
    }

    for entry in &result.entries {
        let extra = match &entry.detail {
            EntryDetail::Sequential => String::new(),
            EntryDetail::Slice {
                quantum,
                remaining_time,
                is_complete,
            } => {
                let state = if *is_complete { "done" } else { "continues" };
                format!(" | slice={quantum}m left={remaining_time}m {state}")
            }
            EntryDetail::Weighted { weight } => format!(
                " | priority={} urgency={} weight={:.1}",
                weight.priority, weight.urgency, weight.combined_weight
            ),
        };
        println!(
            "- {} -> {} | {} ({}m){}",
            local(entry.start_time, tz),
            local(entry.end_time, tz),
            entry.task.title,
            entry.task.estimated_duration,
            extra
        );
    }

    println!("\nTotal span: {} min", result.total_span_minutes);
    print_metrics(&result.metrics);
}

fn print_metrics(m: &Metrics) {
    println!(
        "Tasks: {} | entries: {} | avg wait: {} min | avg turnaround: {} min | on-time: {:.1}% | utilization: {:.1}%",
        m.total_tasks,
        m.scheduled_tasks,
        m.average_wait_time,
        m.average_turnaround_time,
        m.on_time_completion,
        m.utilization_rate
    );
}

pub fn print_comparison(comparison: &Comparison, recommendation: Option<&Recommendation>) {
    println!("# Algorithm comparison\n");

    for (algorithm, outcome) in comparison.iter() {
        match outcome {
            ComparisonOutcome::Scheduled(result) => {
                print!("[{algorithm}] score={:.1} | ", result.metrics.score());
                print_metrics(&result.metrics);
            }
            ComparisonOutcome::Failed { error, .. } => {
                println!("[{algorithm}] error: {error}");
            }
        }
    }

    println!("\n## Recommendation\n");
    match recommendation {
        Some(rec) => {
            println!("{} (score {:.1})", rec.algorithm, rec.score);
            println!("{}", rec.reason);
        }
        None => println!("{NO_RECOMMENDATION}"),
    }
}

pub fn print_agenda(days: &BTreeMap<NaiveDate, Vec<Task>>, tz: Tz) {
    println!("# Current schedule\n");

    if days.is_empty() {
        println!("Nothing scheduled. Run: algotasker schedule --apply");
        return;
    }

    for (day, tasks) in days {
        println!("## {day}\n");
        for task in tasks {
            if let Some(slot) = &task.scheduled {
                println!(
                    "- {} -> {} | {} [{}]",
                    local(slot.start_time, tz),
                    local(slot.end_time, tz),
                    task.title,
                    slot.algorithm
                );
            }
        }
        println!();
    }
}

pub fn print_analytics(analytics: &SchedulingAnalytics, days: i64) {
    println!("# Scheduling analytics (last {days} days)\n");
    println!("Completed tasks: {}", analytics.total_completed_tasks);
    println!("Average estimate accuracy: {:.1}%", analytics.average_accuracy);
    println!("On-time completion: {:.1}%", analytics.on_time_completion);

    if !analytics.algorithm_usage.is_empty() {
        println!("\n## Algorithm usage\n");
        for (algorithm, count) in &analytics.algorithm_usage {
            println!("- {algorithm}: {count}");
        }
    }

    if !analytics.time_variance.is_empty() {
        println!("\n## Estimate vs actual\n");
        for v in &analytics.time_variance {
            println!(
                "- {}: estimated {}m, actual {}m ({:+}m)",
                v.task_id, v.estimated, v.actual, v.variance
            );
        }
    }
}
