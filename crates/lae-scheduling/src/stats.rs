// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Worker utilization snapshots

use std::fmt;

use serde::Serialize;

/// Point-in-time counters of one worker
///
/// Fields are read one at a time without a common lock, so a snapshot taken
/// mid-batch may mix values from slightly different instants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerStats {
    pub id: usize,
    pub multiplier: f64,
    pub fatigue: f64,
    /// Cumulative busy time in nanoseconds
    pub time_used_ns: u64,
    /// Cumulative idle time in nanoseconds
    pub time_idle_ns: u64,
    pub tasks_completed: u64,
    pub tasks_panicked: u64,
}

impl fmt::Display for WorkerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id: {} Fatigue: {:.2} Time Used: {} Time Idle: {}",
            self.id, self.fatigue, self.time_used_ns, self.time_idle_ns
        )
    }
}

/// One line per worker, in the order given
pub fn format_report(stats: &[WorkerStats]) -> String {
    let mut report = String::new();
    for entry in stats {
        report.push_str(&entry.to_string());
        report.push('\n');
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(id: usize, fatigue: f64) -> WorkerStats {
        WorkerStats {
            id,
            multiplier: 1.0,
            fatigue,
            time_used_ns: 1500,
            time_idle_ns: 20,
            tasks_completed: 3,
            tasks_panicked: 0,
        }
    }

    #[test]
    fn test_report_line_format() {
        assert_eq!(
            stats(2, 1500.0).to_string(),
            "id: 2 Fatigue: 1500.00 Time Used: 1500 Time Idle: 20"
        );
    }

    #[test]
    fn test_report_has_one_line_per_worker() {
        let report = format_report(&[stats(0, 0.0), stats(1, 2.5)]);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("id: 0 "));
        assert!(lines[1].starts_with("id: 1 Fatigue: 2.50"));
    }
}
