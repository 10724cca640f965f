use crate::Result;
use crate::activity::{ActivityError, ActivityReport, CommitReport, LifecycleReport};
use chrono::SecondsFormat;
use core::fmt::Write;
use serde_json::{Value, json};

pub fn generate<W: Write>(report: &ActivityReport, writer: &mut W) -> Result<()> {
    let output = json!({
        "repository": report.repository.url().as_str(),
        "branch": report.branch,
        "window": {
            "from": report.window.start().to_rfc3339_opts(SecondsFormat::Secs, true),
            "to": report.window.end().to_rfc3339_opts(SecondsFormat::Secs, true),
        },
        "commits": section(report.commits.as_ref(), commits_to_json),
        "pull_requests": section(report.pull_requests.as_ref(), lifecycle_to_json),
        "issues": section(report.issues.as_ref(), lifecycle_to_json),
    });

    write!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

fn section<T>(result: core::result::Result<&T, &ActivityError>, to_json: fn(&T) -> Value) -> Value {
    match result {
        Ok(data) => to_json(data),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

fn commits_to_json(commits: &CommitReport) -> Value {
    json!({
        "total_commits": commits.total_commits,
        "authors": commits.authors,
        "requests": commits.requests,
    })
}

fn lifecycle_to_json(lifecycle: &LifecycleReport) -> Value {
    json!({
        "open": lifecycle.counts.open,
        "closed": lifecycle.counts.closed,
        "stale": lifecycle.counts.stale,
        "stale_days": lifecycle.stale_days,
        "requests": lifecycle.requests,
    })
}
