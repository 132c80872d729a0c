//! Consecutive-day completion streaks, derived from each completed task's
//! `completed_at` day.

use crate::models::Task;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

/// Run of completion days ending today, or yesterday when nothing has been
/// completed yet today.
pub fn current_streak(tasks: &[Task], today: NaiveDate) -> u32 {
    let days = completion_days(tasks);
    let yesterday = today - Duration::days(1);

    let mut cursor = if days.contains(&today) {
        today
    } else if days.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

pub fn longest_streak(tasks: &[Task]) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for day in completion_days(tasks) {
        run = match previous {
            Some(prev) if day - prev == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}

fn completion_days(tasks: &[Task]) -> BTreeSet<NaiveDate> {
    tasks
        .iter()
        .filter(|task| task.is_completed())
        .filter_map(|task| task.completed_at)
        .collect()
}
