use crate::models::{AnalyticsResponse, CategoryCount, EstimationInsight, Task, TopTask};
use crate::stats::{format_time, subtask_progress};
use std::fmt::Write;

pub fn render_index(analytics: &AnalyticsResponse, tasks: &[Task]) -> String {
    let time = &analytics.time_analytics;
    let estimation = &analytics.estimation;
    let insight_class = match estimation.insight {
        EstimationInsight::Underestimated => "over",
        EstimationInsight::Accurate => "good",
        EstimationInsight::NeedsData => "muted",
    };

    INDEX_HTML
        .replace("{{DATE}}", &analytics.date)
        .replace("{{TOTAL}}", &analytics.total_tasks.to_string())
        .replace("{{RATE}}", &analytics.completion_rate.to_string())
        .replace("{{STREAK}}", &analytics.current_streak.to_string())
        .replace("{{BEST}}", &analytics.longest_streak.to_string())
        .replace("{{TRACKED}}", &format_time(time.total_time_spent))
        .replace("{{AVG}}", &format_time(time.average_time_per_task))
        .replace("{{ACCURACY}}", &time.time_accuracy.to_string())
        .replace("{{TASKS_TRACKED}}", &time.tasks_with_time_count.to_string())
        .replace("{{STATUS_ROWS}}", &category_rows(&analytics.status_breakdown))
        .replace("{{PRIORITY_ROWS}}", &category_rows(&analytics.priority_breakdown))
        .replace("{{TOP_TASKS}}", &top_tasks(&analytics.top_tasks))
        .replace("{{BAR_WIDTH}}", &estimation.bar_width.to_string())
        .replace("{{INSIGHT_CLASS}}", insight_class)
        .replace("{{INSIGHT}}", estimation.insight.message())
        .replace("{{AVG_COMPLETION}}", &format_time(time.average_completion_time))
        .replace("{{ESTIMATED_VS_ACTUAL}}", &estimated_vs_actual(analytics))
        .replace("{{TASK_LIST}}", &task_list(tasks))
}

fn category_rows(rows: &[CategoryCount]) -> String {
    let mut html = String::new();
    for row in rows {
        let _ = write!(
            html,
            r#"<li class="row {key}"><span class="dot"></span><span class="name">{label}</span><span class="count">{count}</span><span class="badge">{percent}%</span></li>"#,
            key = row.key,
            label = row.label,
            count = row.count,
            percent = row.percent,
        );
    }
    html
}

fn top_tasks(tasks: &[TopTask]) -> String {
    if tasks.is_empty() {
        return r#"<div class="empty"><p>No time tracking data yet</p><p class="hint">Start tracking time on your tasks to see insights</p></div>"#.to_string();
    }

    let mut html = String::from("<ol class=\"top\">");
    for task in tasks {
        let estimate = task
            .estimated_time
            .map(|minutes| format!(r#"<span class="hint">Est: {minutes}m</span>"#))
            .unwrap_or_default();
        let _ = write!(
            html,
            r#"<li><span class="title">{title}</span><span class="badge">{status}</span><span class="badge {priority}">{priority}</span><span class="time">{time}</span>{estimate}</li>"#,
            title = escape_html(&task.title),
            status = escape_html(task.status.as_str()),
            priority = task.priority,
            time = task.formatted_time,
        );
    }
    html.push_str("</ol>");
    html
}

fn estimated_vs_actual(analytics: &AnalyticsResponse) -> String {
    let time = &analytics.time_analytics;
    if time.total_estimated_time == 0 {
        return String::new();
    }
    format!(
        r#"<div class="versus"><div><span class="label">Estimated</span><span>{}</span></div><div><span class="label">Actual</span><span>{}</span></div></div>"#,
        format_time(time.total_estimated_time),
        format_time(time.total_time_spent),
    )
}

fn task_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return r#"<p class="hint">No tasks yet.</p>"#.to_string();
    }

    let mut html = String::new();
    for task in tasks {
        let progress = subtask_progress(&task.subtasks);
        let _ = write!(
            html,
            r#"<details class="task"><summary><span class="title">{title}</span><span class="hint">Subtasks ({count})</span></summary>"#,
            title = escape_html(&task.title),
            count = progress.total,
        );
        if progress.total > 0 {
            let _ = write!(
                html,
                r#"<div class="progress"><div class="bar" style="width: {p}%"></div></div><span class="hint">{p}%</span><ul class="subtasks">"#,
                p = progress.percent,
            );
            for sub in &task.subtasks {
                let _ = write!(
                    html,
                    r#"<li class="{done}"><form method="post" action="/tasks/{task_id}/subtasks/{sub_id}/toggle"><button type="submit">{mark}</button></form><span>{title}</span><form class="remove" method="post" action="/tasks/{task_id}/subtasks/{sub_id}/delete" onsubmit="return confirm('Are you sure you want to delete this subtask?')"><button type="submit" title="Delete subtask">&#10005;</button></form></li>"#,
                    done = if sub.is_completed { "done" } else { "open" },
                    task_id = task.id,
                    sub_id = sub.id,
                    mark = if sub.is_completed { "&#10003;" } else { "&#9633;" },
                    title = escape_html(&sub.title),
                );
            }
            html.push_str("</ul>");
        }
        let _ = write!(
            html,
            r#"<form class="add" method="post" action="/tasks/{id}/subtasks"><input name="title" placeholder="Add a new subtask..." /><button type="submit">+</button></form></details>"#,
            id = task.id,
        );
    }
    html
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Task Analytics</title>
  <style>
    :root {
      --bg: #f6f4ef;
      --ink: #24262b;
      --muted: #7a766f;
      --accent: #3b6ea5;
      --success: #3f9a63;
      --warn: #d9822b;
      --danger: #c8553d;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(36, 38, 43, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 32px 18px 48px;
    }

    main {
      max-width: 1100px;
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: 2rem;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
      gap: 16px;
    }

    .card {
      background: var(--card);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 20px;
    }

    .label,
    .hint {
      color: var(--muted);
      font-size: 0.85rem;
    }

    .value {
      display: block;
      font-size: 1.6rem;
      font-weight: 600;
      margin-top: 6px;
    }

    ul,
    ol {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    .row {
      display: grid;
      grid-template-columns: 14px 1fr auto auto;
      gap: 10px;
      align-items: center;
    }

    .dot {
      width: 10px;
      height: 10px;
      border-radius: 50%;
      background: var(--muted);
    }

    .row.in-progress .dot { background: var(--accent); }
    .row.completed .dot,
    .row.low .dot { background: var(--success); }
    .row.medium .dot { background: var(--warn); }
    .row.high .dot { background: var(--danger); }

    .badge {
      background: #efede8;
      border-radius: 999px;
      padding: 2px 10px;
      font-size: 0.8rem;
    }

    .badge.high { background: #f6d8d1; }

    .top li {
      display: flex;
      gap: 8px;
      align-items: center;
    }

    .top .title { flex: 1; }
    .top .time { font-weight: 600; color: var(--accent); }

    .progress {
      height: 8px;
      border-radius: 999px;
      background: #efede8;
      overflow: hidden;
      margin: 10px 0 6px;
    }

    .bar {
      height: 100%;
      background: var(--success);
    }

    .over .bar,
    .insight.over { color: var(--warn); }
    .over .bar { background: var(--warn); }
    .insight.good { color: var(--success); }

    .versus {
      display: grid;
      grid-template-columns: 1fr 1fr;
      gap: 8px;
      margin-top: 12px;
      text-align: center;
    }

    .empty {
      text-align: center;
      color: var(--muted);
      padding: 24px 0;
    }

    .subtasks li {
      display: flex;
      gap: 8px;
      align-items: center;
    }

    .subtasks li.done span {
      text-decoration: line-through;
      color: var(--muted);
    }

    .task summary {
      display: flex;
      justify-content: space-between;
      cursor: pointer;
    }

    .add {
      display: flex;
      gap: 8px;
      margin-top: 12px;
    }

    .add input {
      flex: 1;
      padding: 6px 10px;
    }
  </style>
</head>
<body>
  <main>
    <header>
      <h1>Analytics</h1>
      <p class="hint">Detailed insights into your productivity and task management &middot; {{DATE}}</p>
    </header>

    <section class="grid">
      <div class="card"><span class="label">Total Tasks</span><span class="value">{{TOTAL}}</span></div>
      <div class="card"><span class="label">Completion Rate</span><span class="value">{{RATE}}%</span></div>
      <div class="card"><span class="label">Current Streak</span><span class="value">{{STREAK}}</span></div>
      <div class="card"><span class="label">Best Streak</span><span class="value">{{BEST}}</span></div>
    </section>

    <section class="grid">
      <div class="card"><span class="label">Total Time Tracked</span><span class="value">{{TRACKED}}</span></div>
      <div class="card"><span class="label">Avg Time/Task</span><span class="value">{{AVG}}</span></div>
      <div class="card"><span class="label">Time Accuracy</span><span class="value">{{ACCURACY}}%</span></div>
      <div class="card"><span class="label">Tasks Tracked</span><span class="value">{{TASKS_TRACKED}}</span></div>
    </section>

    <section class="grid">
      <div class="card">
        <h2>Task Status Breakdown</h2>
        <ul>{{STATUS_ROWS}}</ul>
      </div>
      <div class="card">
        <h2>Priority Distribution</h2>
        <ul>{{PRIORITY_ROWS}}</ul>
      </div>
    </section>

    <section class="grid">
      <div class="card">
        <h2>Top Time Consuming Tasks</h2>
        {{TOP_TASKS}}
      </div>
      <div class="card {{INSIGHT_CLASS}}">
        <h2>Time Estimation Insights</h2>
        <span class="label">Estimation Accuracy</span>
        <span class="value insight {{INSIGHT_CLASS}}">{{ACCURACY}}%</span>
        <div class="progress"><div class="bar" style="width: {{BAR_WIDTH}}%"></div></div>
        <p class="hint">{{INSIGHT}}</p>
        <div class="versus">
          <div><span class="label">Avg Completion Time</span><span class="value">{{AVG_COMPLETION}}</span></div>
          <div><span class="label">Tasks Tracked</span><span class="value">{{TASKS_TRACKED}}</span></div>
        </div>
        {{ESTIMATED_VS_ACTUAL}}
      </div>
    </section>

    <section class="card">
      <h2>Tasks</h2>
      {{TASK_LIST}}
    </section>
  </main>
</body>
</html>
"#;
