//! Read-side analytics over a task collection snapshot.
//!
//! Every function here is a pure reduction: it never mutates its input and
//! treats absent time fields as zero. Ratios with a zero denominator are 0.

use crate::models::{
    AppData, AnalyticsResponse, CategoryCount, EstimationInsight, EstimationSummary, Subtask,
    SubtaskProgress, Task, TaskPriority, TaskStatus, TimeAnalytics, TopTask,
};
use crate::streaks::{current_streak, longest_streak};
use chrono::{Local, NaiveDate};

pub const DEFAULT_TOP_TASKS: usize = 5;

pub fn build_analytics(data: &AppData, top_n: usize) -> AnalyticsResponse {
    build_analytics_at(Local::now().date_naive(), &data.tasks, top_n)
}

pub fn build_analytics_at(today: NaiveDate, tasks: &[Task], top_n: usize) -> AnalyticsResponse {
    let total_tasks = tasks.len();
    let completed_tasks = count_by_status(tasks, &TaskStatus::Completed);
    let time_analytics = time_analytics(tasks);

    AnalyticsResponse {
        date: today.to_string(),
        total_tasks,
        completed_tasks,
        active_tasks: count_by_status(tasks, &TaskStatus::Todo)
            + count_by_status(tasks, &TaskStatus::InProgress),
        completion_rate: completion_rate(tasks),
        current_streak: current_streak(tasks, today),
        longest_streak: longest_streak(tasks),
        status_breakdown: status_breakdown(tasks),
        priority_breakdown: priority_breakdown(tasks),
        time_analytics,
        estimation: estimation_summary(time_analytics.time_accuracy),
        top_tasks: top_tasks_by_time(tasks, top_n)
            .into_iter()
            .map(to_top_task)
            .collect(),
    }
}

/// Share of completed subtasks, rounded half-up to a whole percent.
pub fn completion_percentage(subtasks: &[Subtask]) -> u32 {
    let completed = subtasks.iter().filter(|sub| sub.is_completed).count();
    percent_of(completed, subtasks.len())
}

pub fn subtask_progress(subtasks: &[Subtask]) -> SubtaskProgress {
    SubtaskProgress {
        total: subtasks.len(),
        completed: subtasks.iter().filter(|sub| sub.is_completed).count(),
        percent: completion_percentage(subtasks),
    }
}

pub fn count_by_status(tasks: &[Task], status: &TaskStatus) -> usize {
    tasks.iter().filter(|task| &task.status == status).count()
}

pub fn count_by_priority(tasks: &[Task], priority: TaskPriority) -> usize {
    tasks.iter().filter(|task| task.priority == priority).count()
}

pub fn completion_rate(tasks: &[Task]) -> u32 {
    percent_of(count_by_status(tasks, &TaskStatus::Completed), tasks.len())
}

pub fn status_breakdown(tasks: &[Task]) -> Vec<CategoryCount> {
    TaskStatus::ALL
        .iter()
        .map(|status| {
            let count = count_by_status(tasks, status);
            CategoryCount {
                key: status.as_str().to_string(),
                label: status.label().to_string(),
                count,
                percent: percent_of(count, tasks.len()),
            }
        })
        .collect()
}

pub fn priority_breakdown(tasks: &[Task]) -> Vec<CategoryCount> {
    TaskPriority::ALL
        .iter()
        .map(|&priority| {
            let count = count_by_priority(tasks, priority);
            CategoryCount {
                key: priority.as_str().to_string(),
                label: priority.label().to_string(),
                count,
                percent: percent_of(count, tasks.len()),
            }
        })
        .collect()
}

pub fn time_analytics(tasks: &[Task]) -> TimeAnalytics {
    let total_time_spent = tasks
        .iter()
        .fold(0u64, |sum, task| sum.saturating_add(task.time_spent_secs()));
    let total_estimated_time = tasks
        .iter()
        .fold(0u64, |sum, task| sum.saturating_add(task.estimated_secs()));
    let tasks_with_time_count = tasks.iter().filter(|task| task.has_tracked_time()).count();

    let (completed_time, completed_count) = tasks
        .iter()
        .filter(|task| task.is_completed() && task.has_tracked_time())
        .fold((0u64, 0u64), |(sum, count), task| {
            (sum.saturating_add(task.time_spent_secs()), count + 1)
        });

    TimeAnalytics {
        total_time_spent,
        total_estimated_time,
        average_time_per_task: round_div(total_time_spent, tasks_with_time_count as u64),
        time_accuracy: round_div(total_time_spent.saturating_mul(100), total_estimated_time),
        average_completion_time: round_div(completed_time, completed_count),
        tasks_with_time_count,
    }
}

/// Accuracy stays unclamped; only the progress bar width is capped at 100.
pub fn estimation_summary(accuracy: u64) -> EstimationSummary {
    let insight = if accuracy > 100 {
        EstimationInsight::Underestimated
    } else if accuracy > 80 {
        EstimationInsight::Accurate
    } else {
        EstimationInsight::NeedsData
    };

    EstimationSummary {
        accuracy,
        bar_width: accuracy.min(100),
        insight,
    }
}

/// Tasks with recorded time, longest first. Ties keep collection order.
pub fn top_tasks_by_time(tasks: &[Task], n: usize) -> Vec<&Task> {
    let mut tracked: Vec<&Task> = tasks.iter().filter(|task| task.has_tracked_time()).collect();
    tracked.sort_by(|a, b| b.time_spent_secs().cmp(&a.time_spent_secs()));
    tracked.truncate(n);
    tracked
}

pub fn format_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m")
    } else {
        format!("{seconds}s")
    }
}

pub(crate) fn to_top_task(task: &Task) -> TopTask {
    TopTask {
        id: task.id.clone(),
        title: task.title.clone(),
        status: task.status.clone(),
        priority: task.priority,
        time_spent: task.time_spent_secs(),
        estimated_time: task.estimated_time.filter(|&minutes| minutes > 0),
        formatted_time: format_time(task.time_spent_secs()),
    }
}

fn percent_of(part: usize, total: usize) -> u32 {
    round_div((part as u64).saturating_mul(100), total as u64) as u32
}

/// Integer division rounding half-up; 0 when `den` is 0.
fn round_div(num: u64, den: u64) -> u64 {
    if den == 0 {
        return 0;
    }
    let (num, den) = (u128::from(num), u128::from(den));
    ((2 * num + den) / (2 * den)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subtask(done: bool) -> Subtask {
        Subtask {
            id: format!("s-{done}"),
            title: "step".into(),
            is_completed: done,
        }
    }

    fn task(id: &str, status: TaskStatus, spent: Option<u64>, estimated: Option<u64>) -> Task {
        let mut task = Task::new(id, format!("Task {id}"));
        task.status = status;
        task.time_spent = spent;
        task.estimated_time = estimated;
        task
    }

    #[test]
    fn completion_percentage_rounds_half_up() {
        assert_eq!(completion_percentage(&[]), 0);
        assert_eq!(
            completion_percentage(&[subtask(true), subtask(true), subtask(false)]),
            67
        );
        assert_eq!(completion_percentage(&[subtask(true), subtask(false)]), 50);
        assert_eq!(
            completion_percentage(&[subtask(true), subtask(false), subtask(false)]),
            33
        );
        // 1/8 = 12.5 rounds up
        let mut eighth = vec![subtask(true)];
        eighth.extend((0..7).map(|_| subtask(false)));
        assert_eq!(completion_percentage(&eighth), 13);
    }

    #[test]
    fn completion_percentage_is_100_only_when_all_done() {
        for len in 1..=12 {
            for done in 0..=len {
                let subtasks: Vec<Subtask> = (0..len).map(|i| subtask(i < done)).collect();
                let percent = completion_percentage(&subtasks);
                assert!(percent <= 100);
                assert_eq!(percent == 100, done == len, "{done}/{len}");
            }
        }
    }

    #[test]
    fn subtask_progress_counts() {
        let progress = subtask_progress(&[subtask(false), subtask(true)]);
        assert_eq!(progress.total, 2);
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.percent, 50);
    }

    #[test]
    fn status_counts_cover_every_task() {
        let tasks = vec![
            task("a", TaskStatus::Todo, None, None),
            task("b", TaskStatus::InProgress, None, None),
            task("c", TaskStatus::Completed, None, None),
            task("d", TaskStatus::Completed, None, None),
            task("e", TaskStatus::Todo, None, None),
            task("f", TaskStatus::Todo, None, None),
        ];
        let breakdown = status_breakdown(&tasks);
        let keys: Vec<&str> = breakdown.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["todo", "in-progress", "completed"]);
        assert_eq!(breakdown.iter().map(|c| c.count).sum::<usize>(), tasks.len());

        let percent_sum: u32 = breakdown.iter().map(|c| c.percent).sum();
        assert!((99..=101).contains(&percent_sum), "sum was {percent_sum}");
        assert_eq!(breakdown[2].percent, completion_rate(&tasks));
        assert_eq!(completion_rate(&tasks), 33);
    }

    #[test]
    fn unknown_status_sits_outside_every_bucket() {
        let tasks = vec![
            task("a", TaskStatus::Completed, Some(120), None),
            task("b", TaskStatus::Other("archived".into()), Some(60), None),
            task("c", TaskStatus::Todo, None, None),
        ];
        let breakdown = status_breakdown(&tasks);
        assert_eq!(breakdown.len(), 3);
        assert_eq!(breakdown.iter().map(|c| c.count).sum::<usize>(), 2);
        assert!(breakdown.iter().all(|c| c.key != "archived"));

        let analytics = build_analytics_at(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), &tasks, 5);
        assert_eq!(analytics.total_tasks, 3);
        assert_eq!(analytics.completed_tasks, 1);
        assert_eq!(analytics.active_tasks, 1);
        assert_eq!(analytics.completion_rate, 33);
        assert_eq!(analytics.time_analytics.total_time_spent, 180);
    }

    #[test]
    fn priority_breakdown_orders_high_first() {
        let mut urgent = task("a", TaskStatus::Todo, None, None);
        urgent.priority = TaskPriority::High;
        let mut minor = task("b", TaskStatus::Todo, None, None);
        minor.priority = TaskPriority::Low;

        let breakdown = priority_breakdown(&[urgent, minor]);
        assert_eq!(breakdown[0].key, "high");
        assert_eq!(breakdown[0].percent, 50);
        assert_eq!(breakdown[1].count, 0);
        assert_eq!(breakdown[2].label, "Low Priority");
    }

    #[test]
    fn mixed_collection_scenario() {
        let tasks = vec![
            task("a", TaskStatus::Completed, Some(120), Some(2)),
            task("b", TaskStatus::Todo, Some(0), Some(5)),
        ];
        assert_eq!(completion_rate(&tasks), 50);

        let time = time_analytics(&tasks);
        assert_eq!(time.total_time_spent, 120);
        assert_eq!(time.total_estimated_time, 420);
        assert_eq!(time.time_accuracy, 29);
        assert_eq!(time.tasks_with_time_count, 1);
        assert_eq!(time.average_time_per_task, 120);
        assert_eq!(time.average_completion_time, 120);
    }

    #[test]
    fn empty_collection_is_all_zero() {
        let analytics = build_analytics_at(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), &[], 5);
        assert_eq!(analytics.total_tasks, 0);
        assert_eq!(analytics.completion_rate, 0);
        assert_eq!(analytics.current_streak, 0);
        assert_eq!(analytics.longest_streak, 0);
        assert!(analytics.status_breakdown.iter().all(|c| c.count == 0 && c.percent == 0));
        assert!(analytics.priority_breakdown.iter().all(|c| c.percent == 0));
        assert_eq!(analytics.time_analytics, TimeAnalytics::default());
        assert!(analytics.top_tasks.is_empty());
    }

    #[test]
    fn accuracy_is_zero_without_estimates() {
        let tasks = vec![task("a", TaskStatus::Todo, Some(5000), None)];
        let time = time_analytics(&tasks);
        assert_eq!(time.total_estimated_time, 0);
        assert_eq!(time.time_accuracy, 0);
        assert_eq!(time.average_time_per_task, 5000);
    }

    #[test]
    fn accuracy_above_100_is_preserved() {
        let tasks = vec![task("a", TaskStatus::InProgress, Some(900), Some(10))];
        let time = time_analytics(&tasks);
        assert_eq!(time.time_accuracy, 150);

        let summary = estimation_summary(time.time_accuracy);
        assert_eq!(summary.accuracy, 150);
        assert_eq!(summary.bar_width, 100);
        assert_eq!(summary.insight, EstimationInsight::Underestimated);
        assert_eq!(estimation_summary(90).insight, EstimationInsight::Accurate);
        assert_eq!(estimation_summary(80).insight, EstimationInsight::NeedsData);
    }

    #[test]
    fn average_completion_time_ignores_open_tasks() {
        let tasks = vec![
            task("a", TaskStatus::Completed, Some(100), None),
            task("b", TaskStatus::Completed, Some(201), None),
            task("c", TaskStatus::InProgress, Some(10_000), None),
            task("d", TaskStatus::Completed, None, None),
        ];
        let time = time_analytics(&tasks);
        assert_eq!(time.average_completion_time, 151);
        assert_eq!(time.tasks_with_time_count, 3);
        assert_eq!(time.average_time_per_task, 3434);
    }

    #[test]
    fn top_tasks_sorted_and_stable() {
        let tasks = vec![
            task("a", TaskStatus::Todo, Some(60), None),
            task("b", TaskStatus::Todo, None, None),
            task("c", TaskStatus::Todo, Some(300), None),
            task("d", TaskStatus::Todo, Some(60), None),
            task("e", TaskStatus::Todo, Some(0), None),
            task("f", TaskStatus::Todo, Some(120), None),
        ];
        let ids: Vec<&str> = top_tasks_by_time(&tasks, 5)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, ["c", "f", "a", "d"]);

        let top_two = top_tasks_by_time(&tasks, 2);
        assert_eq!(top_two.len(), 2);
        assert!(top_two.windows(2).all(|w| w[0].time_spent_secs() >= w[1].time_spent_secs()));
        assert!(top_tasks_by_time(&tasks, 0).is_empty());
    }

    #[test]
    fn top_tasks_empty_without_tracked_time() {
        let tasks = vec![task("a", TaskStatus::Completed, None, Some(30))];
        assert!(top_tasks_by_time(&tasks, DEFAULT_TOP_TASKS).is_empty());
    }

    #[test]
    fn format_time_picks_largest_units() {
        assert_eq!(format_time(0), "0s");
        assert_eq!(format_time(59), "59s");
        assert_eq!(format_time(90), "1m");
        assert_eq!(format_time(3600), "1h 0m");
        assert_eq!(format_time(3661), "1h 1m");
        assert_eq!(format_time(26 * 3600 + 5 * 60), "26h 5m");
    }

    #[test]
    fn top_task_omits_zero_estimate() {
        let tasks = vec![
            task("a", TaskStatus::Todo, Some(90), Some(0)),
            task("b", TaskStatus::Todo, Some(30), Some(15)),
        ];
        let analytics = build_analytics_at(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), &tasks, 5);
        assert_eq!(analytics.top_tasks[0].formatted_time, "1m");
        assert_eq!(analytics.top_tasks[0].estimated_time, None);
        assert_eq!(analytics.top_tasks[1].estimated_time, Some(15));
        assert_eq!(analytics.active_tasks, 2);
    }
}
