//! Menu-driven interaction loop.
//!
//! # Responsibility
//! - Load the collection once, then prompt, dispatch and persist until exit.
//! - Apply the degrade-and-report policy for store failures.
//!
//! # Invariants
//! - Each iteration completes, including any save, before the next prompt.
//! - The collection is saved after a mutation and never after a pure read.
//! - Store failures are reported and never end the loop.
//! - Only an I/O failure on the terminal streams ends the loop with `Err`.

use crate::present::{render_statistics, render_tasks};
use crate::repo::task_store::TaskStore;
use crate::service::task_registry::{
    CompleteOutcome, Confirmation, DeleteOutcome, RegistryError, TaskRegistry,
};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};

pub type SessionResult<T> = Result<T, SessionError>;

/// Unrecoverable interaction failure.
#[derive(Debug)]
pub enum SessionError {
    /// Reading the prompt answer or writing output failed.
    Io(io::Error),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "terminal i/o failed: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Stopped,
}

/// One of the six fixed menu options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    List,
    Add,
    Complete,
    Delete,
    Statistics,
    Exit,
}

impl MenuChoice {
    /// Maps `1`..`6` (surrounding whitespace ignored) to a choice.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::List),
            "2" => Some(Self::Add),
            "3" => Some(Self::Complete),
            "4" => Some(Self::Delete),
            "5" => Some(Self::Statistics),
            "6" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Interactive session over a store and a pair of text streams.
pub struct Session<S, R, W> {
    store: S,
    registry: TaskRegistry,
    input: R,
    output: W,
    state: SessionState,
}

impl<S: TaskStore, R: BufRead, W: Write> Session<S, R, W> {
    /// Greets the user and loads the collection once.
    ///
    /// A failed load is reported and the session starts with no tasks.
    pub fn start(store: S, input: R, mut output: W) -> SessionResult<Self> {
        writeln!(output, "Welcome!")?;

        let tasks = match store.load() {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(
                    "event=session_load module=session status=degraded error={}",
                    err
                );
                writeln!(output, "Failed to load tasks: {err}")?;
                Vec::new()
            }
        };
        info!(
            "event=session_start module=session status=ok count={}",
            tasks.len()
        );

        Ok(Self {
            store,
            registry: TaskRegistry::new(tasks),
            input,
            output,
            state: SessionState::Running,
        })
    }

    /// Runs iterations until the user exits or input ends.
    pub fn run(&mut self) -> SessionResult<()> {
        while self.state == SessionState::Running {
            self.step()?;
        }
        info!(
            "event=session_stop module=session status=ok count={}",
            self.registry.len()
        );
        Ok(())
    }

    /// Runs one menu iteration.
    pub fn step(&mut self) -> SessionResult<()> {
        self.show_menu()?;
        let Some(line) = self.prompt("Choose an action (1-6): ")? else {
            // Closed input can never produce another answer.
            writeln!(self.output)?;
            return self.exit();
        };

        let Some(choice) = MenuChoice::parse(&line) else {
            writeln!(self.output, "Please enter a number from 1 to 6.")?;
            return Ok(());
        };
        debug!("event=menu_choice module=session choice={:?}", choice);

        match choice {
            MenuChoice::List => render_tasks(&mut self.output, self.registry.tasks())?,
            MenuChoice::Add => self.add_task()?,
            MenuChoice::Complete => self.complete_task()?,
            MenuChoice::Delete => self.delete_task()?,
            MenuChoice::Statistics => render_statistics(&mut self.output, self.registry.tasks())?,
            MenuChoice::Exit => self.exit()?,
        }
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Consumes the session, returning the final registry and output stream.
    pub fn into_parts(self) -> (TaskRegistry, W) {
        (self.registry, self.output)
    }

    fn show_menu(&mut self) -> SessionResult<()> {
        writeln!(self.output)?;
        writeln!(self.output, "=== TASK MANAGER ===")?;
        writeln!(self.output, "1. Show tasks")?;
        writeln!(self.output, "2. Add task")?;
        writeln!(self.output, "3. Mark task completed")?;
        writeln!(self.output, "4. Delete task")?;
        writeln!(self.output, "5. Statistics")?;
        writeln!(self.output, "6. Exit")?;
        Ok(())
    }

    fn add_task(&mut self) -> SessionResult<()> {
        writeln!(self.output)?;
        writeln!(self.output, "=== NEW TASK ===")?;
        let title = self.prompt("Task title: ")?.unwrap_or_default();
        if title.trim().is_empty() {
            writeln!(self.output, "Task title cannot be empty!")?;
            return Ok(());
        }
        let description = self
            .prompt("Description (optional): ")?
            .unwrap_or_default();

        match self.registry.add(&title, &description) {
            Ok(task) => {
                writeln!(self.output, "Task \"{}\" added.", task.title)?;
                self.persist()
            }
            Err(err) => self.report_rejected(&err),
        }
    }

    fn complete_task(&mut self) -> SessionResult<()> {
        if self.registry.is_empty() {
            writeln!(self.output, "There are no tasks to complete.")?;
            return Ok(());
        }

        render_tasks(&mut self.output, self.registry.tasks())?;
        writeln!(self.output)?;
        writeln!(self.output, "=== COMPLETE TASK ===")?;
        let answer = self.prompt("Task number: ")?.unwrap_or_default();

        let outcome = match self
            .registry
            .resolve(&answer)
            .and_then(|id| self.registry.complete(&id))
        {
            Ok(outcome) => outcome,
            Err(err) => return self.report_rejected(&err),
        };

        match outcome {
            CompleteOutcome::Completed(task) => {
                writeln!(self.output, "Task \"{}\" marked as completed.", task.title)?;
                self.persist()
            }
            CompleteOutcome::AlreadyCompleted(_) => {
                writeln!(self.output, "This task is already completed!")?;
                Ok(())
            }
        }
    }

    fn delete_task(&mut self) -> SessionResult<()> {
        if self.registry.is_empty() {
            writeln!(self.output, "There are no tasks to delete.")?;
            return Ok(());
        }

        render_tasks(&mut self.output, self.registry.tasks())?;
        writeln!(self.output)?;
        writeln!(self.output, "=== DELETE TASK ===")?;
        let answer = self.prompt("Task number: ")?.unwrap_or_default();

        let id = match self.registry.resolve(&answer) {
            Ok(id) => id,
            Err(err) => return self.report_rejected(&err),
        };
        let title = self
            .registry
            .get(&id)
            .map(|task| task.title.clone())
            .unwrap_or_default();
        let reply = self
            .prompt(&format!("Delete \"{title}\"? (y/n): "))?
            .unwrap_or_default();

        match self.registry.delete(&id, Confirmation::from_answer(&reply)) {
            Ok(DeleteOutcome::Removed(_)) => {
                writeln!(self.output, "Task deleted.")?;
                self.persist()
            }
            Ok(DeleteOutcome::Declined) => {
                writeln!(self.output, "Deletion cancelled.")?;
                Ok(())
            }
            Err(err) => self.report_rejected(&err),
        }
    }

    fn exit(&mut self) -> SessionResult<()> {
        writeln!(self.output, "Goodbye!")?;
        self.state = SessionState::Stopped;
        Ok(())
    }

    fn persist(&mut self) -> SessionResult<()> {
        match self.store.save(self.registry.tasks()) {
            Ok(()) => writeln!(self.output, "Tasks saved.")?,
            Err(err) => {
                warn!(
                    "event=session_save module=session status=degraded error={}",
                    err
                );
                writeln!(self.output, "Failed to save tasks: {err}")?;
            }
        }
        Ok(())
    }

    fn report_rejected(&mut self, err: &RegistryError) -> SessionResult<()> {
        match err {
            RegistryError::Validation(inner) => writeln!(self.output, "Rejected: {inner}.")?,
            RegistryError::NonNumericIndex(_)
            | RegistryError::IndexOutOfRange { .. }
            | RegistryError::NotFound(_) => {
                writeln!(self.output, "Invalid task number! ({err})")?
            }
        }
        Ok(())
    }

    /// Writes `label` and reads one line; `None` once input is exhausted.
    fn prompt(&mut self, label: &str) -> SessionResult<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}
