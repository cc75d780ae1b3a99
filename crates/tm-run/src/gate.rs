//! Confirmation between migration steps

use crate::error::{RunError, RunResult};
use std::io::{BufRead, Write};
use std::sync::Mutex;
use tm_core::{Direction, Migration};

/// Decides whether the next migration may run.
pub trait StepGate: Send + Sync {
    /// `Ok(true)` to run `migration`, `Ok(false)` to stop the run.
    fn confirm(&self, migration: &Migration, direction: Direction) -> RunResult<bool>;
}

/// Never pauses
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPause;

impl StepGate for NoPause {
    fn confirm(&self, _migration: &Migration, _direction: Direction) -> RunResult<bool> {
        Ok(true)
    }
}

/// Asks on `output` and reads the answer from `input`.
///
/// An empty line continues; `q` (or end of input) stops.
pub struct PromptGate<R, W> {
    io: Mutex<(R, W)>,
}

impl<R, W> PromptGate<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            io: Mutex::new((input, output)),
        }
    }
}

impl PromptGate<std::io::BufReader<std::io::Stdin>, std::io::Stdout> {
    /// Prompt on the terminal
    pub fn stdio() -> Self {
        Self::new(std::io::BufReader::new(std::io::stdin()), std::io::stdout())
    }
}

impl<R, W> StepGate for PromptGate<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn confirm(&self, migration: &Migration, direction: Direction) -> RunResult<bool> {
        let mut io = self
            .io
            .lock()
            .map_err(|e| RunError::Prompt(std::io::Error::other(e.to_string())))?;
        let (input, output) = &mut *io;
        loop {
            write!(
                output,
                "* press <enter> to run {} ({direction}) or 'q' to quit: ",
                migration
            )?;
            output.flush()?;

            let mut answer = String::new();
            if input.read_line(&mut answer)? == 0 {
                return Ok(false);
            }
            match answer.trim() {
                "" => return Ok(true),
                a if a.eq_ignore_ascii_case("q") => return Ok(false),
                other => writeln!(output, "unrecognized answer '{other}'")?,
            }
        }
    }
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
