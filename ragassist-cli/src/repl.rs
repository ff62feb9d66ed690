//! The interactive question loop.

use std::collections::VecDeque;
use std::io::Write;

use anyhow::Result;
use async_trait::async_trait;
use ragassist_agent::RagAssistant;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{error, info};

use crate::config::ErrorPolicy;

/// Prompt shown before each question.
pub const PROMPT: &str = "You: ";

/// A source of user input lines.
pub trait LineSource {
    /// Read one line. `None` means the user closed the input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Terminal input with line editing and history.
pub struct TerminalInput {
    editor: DefaultEditor,
}

impl TerminalInput {
    pub fn new() -> Result<Self> {
        Ok(Self { editor: DefaultEditor::new()? })
    }
}

impl LineSource for TerminalInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Pre-recorded input, one line per entry.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { lines: lines.into_iter().map(Into::into).collect() }
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Something that answers questions.
#[async_trait]
pub trait Answerer: Send + Sync {
    async fn answer(&self, question: &str) -> Result<String>;
}

#[async_trait]
impl Answerer for RagAssistant {
    async fn answer(&self, question: &str) -> Result<String> {
        Ok(self.invoke(question).await?)
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user typed `exit` or `quit`.
    Exit,
    /// The input was closed.
    EndOfInput,
}

/// True for `exit` and `quit` in any letter case, ignoring surrounding spaces.
pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim();
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// Read questions and print answers until the user leaves.
///
/// Blank lines are skipped. With [`ErrorPolicy::Terminate`] a failed answer
/// ends the session and is returned for the caller to report; with
/// [`ErrorPolicy::Continue`] it is printed and the loop goes on.
pub async fn run_loop(
    input: &mut dyn LineSource,
    answerer: &dyn Answerer,
    policy: ErrorPolicy,
    out: &mut dyn Write,
) -> Result<SessionEnd> {
    let mut answered = 0usize;
    loop {
        let Some(line) = input.read_line(PROMPT)? else {
            info!(answered, "input closed");
            return Ok(SessionEnd::EndOfInput);
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if is_exit_command(question) {
            writeln!(out, "Goodbye!")?;
            info!(answered, "session ended by user");
            return Ok(SessionEnd::Exit);
        }

        match answerer.answer(question).await {
            Ok(answer) => {
                answered += 1;
                writeln!(out, "Assistant: {answer}")?;
            }
            Err(e) => {
                error!(error = %e, "failed to answer question");
                if policy == ErrorPolicy::Terminate {
                    return Err(e);
                }
                writeln!(out, "Error: {e:#}")?;
            }
        }
    }
}
