//! Human-readable rendering of tasks and statistics.
//!
//! # Responsibility
//! - Write the numbered task list and the statistics block to any writer.
//!
//! # Invariants
//! - Rendering never mutates its input.
//! - Display numbers are recomputed from position on every render.

use crate::model::task::Task;
use crate::service::task_registry::Statistics;
use std::io::{self, Write};

pub const EMPTY_LIST_NOTICE: &str = "Your task list is empty.";
pub const EMPTY_STATS_NOTICE: &str = "Start completing your tasks!";

const DONE_MARKER: &str = "[X]";
const PENDING_MARKER: &str = "[ ]";

/// Writes every task in display order, or a single notice when empty.
pub fn render_tasks<W: Write>(out: &mut W, tasks: &[Task]) -> io::Result<()> {
    if tasks.is_empty() {
        return writeln!(out, "{EMPTY_LIST_NOTICE}");
    }

    writeln!(out)?;
    writeln!(out, "=== YOUR TASKS ===")?;
    for (position, task) in tasks.iter().enumerate() {
        render_task(out, position + 1, task)?;
    }
    Ok(())
}

/// Writes total/completed/pending counts and the progress line.
pub fn render_statistics<W: Write>(out: &mut W, tasks: &[Task]) -> io::Result<()> {
    let stats = Statistics::from_tasks(tasks);

    writeln!(out)?;
    writeln!(out, "=== STATISTICS ===")?;
    writeln!(out, "Total: {}", stats.total)?;
    writeln!(out, "Completed: {}", stats.completed)?;
    writeln!(out, "Pending: {}", stats.pending)?;
    match stats.progress_percent {
        Some(percent) => writeln!(out, "Progress: {percent}%"),
        None => writeln!(out, "{EMPTY_STATS_NOTICE}"),
    }
}

fn render_task<W: Write>(out: &mut W, number: usize, task: &Task) -> io::Result<()> {
    let marker = if task.completed {
        DONE_MARKER
    } else {
        PENDING_MARKER
    };
    writeln!(out, "{number}.{marker} {}", task.title)?;
    if task.has_description() {
        writeln!(out, " Description: {}", task.description)?;
    }
    writeln!(out, " Created: {}", task.created_at)?;
    if let Some(completed_at) = &task.completed_at {
        writeln!(out, " Completed: {completed_at}")?;
    }
    writeln!(out, " ---")
}
