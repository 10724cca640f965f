use crate::Result;
use crate::activity::{ActivityError, ActivityReport, CommitReport, EntityKind, LifecycleReport};
use core::fmt::Write;
use owo_colors::OwoColorize;

pub fn generate<W: Write>(report: &ActivityReport, use_colors: bool, writer: &mut W) -> Result<()> {
    writeln!(writer, "Repository : {}", report.repository)?;
    writeln!(writer, "Branch     : {}", report.branch)?;
    writeln!(writer, "Window     : {}", report.window)?;

    writeln!(writer)?;
    write_heading(writer, "Most active authors", use_colors)?;
    match &report.commits {
        Ok(commits) => write_authors(writer, commits)?,
        Err(e) => write_error(writer, e, use_colors)?,
    }

    for (kind, section) in [(EntityKind::PullRequest, &report.pull_requests), (EntityKind::Issue, &report.issues)] {
        writeln!(writer)?;
        match section {
            Ok(lifecycle) => {
                write_heading(writer, &format!("{kind} (stale after {} days)", lifecycle.stale_days), use_colors)?;
                write_lifecycle(writer, lifecycle)?;
            }
            Err(e) => {
                write_heading(writer, &kind.to_string(), use_colors)?;
                write_error(writer, e, use_colors)?;
            }
        }
    }

    Ok(())
}

fn write_heading<W: Write>(writer: &mut W, heading: &str, use_colors: bool) -> Result<()> {
    if use_colors {
        writeln!(writer, "{}", heading.bold())?;
    } else {
        writeln!(writer, "{heading}")?;
    }
    Ok(())
}

fn write_error<W: Write>(writer: &mut W, error: &ActivityError, use_colors: bool) -> Result<()> {
    let text = format!("report failed: {error}");
    if use_colors {
        writeln!(writer, "  {}", text.red())?;
    } else {
        writeln!(writer, "  {text}")?;
    }
    Ok(())
}

fn write_authors<W: Write>(writer: &mut W, commits: &CommitReport) -> Result<()> {
    if commits.authors.is_empty() {
        writeln!(writer, "  No commits in this window")?;
        return Ok(());
    }

    let rank_width = commits.authors.len().to_string().len().max("Rank".len());
    let login_width = commits.authors.iter().map(|a| a.login.len()).max().unwrap_or(0).max("Author".len());

    writeln!(writer, "  {:>rank_width$}  {:<login_width$}  Commits", "Rank", "Author")?;
    for (index, author) in commits.authors.iter().enumerate() {
        writeln!(writer, "  {:>rank_width$}  {:<login_width$}  {:>7}", index + 1, author.login, author.commits)?;
    }
    writeln!(writer, "  {} commit(s) in total, {} request(s)", commits.total_commits, commits.requests)?;
    Ok(())
}

fn write_lifecycle<W: Write>(writer: &mut W, lifecycle: &LifecycleReport) -> Result<()> {
    writeln!(writer, "  Open   : {}", lifecycle.counts.open)?;
    writeln!(writer, "  Closed : {}", lifecycle.counts.closed)?;
    writeln!(writer, "  Stale  : {}", lifecycle.counts.stale)?;
    writeln!(writer, "  {} request(s)", lifecycle.requests)?;
    Ok(())
}
