//! Operator I/O: showing a flagged task and reading one keystroke back.

use std::collections::VecDeque;
use std::io::{self, Write};

use colored::*;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::audit::ReviewItem;
use crate::error::Result;
use crate::review::command::Command;

/// The person at the keyboard.
pub trait Operator {
    /// Present the task at `position` (1-based) of `total`.
    fn show(&mut self, item: &ReviewItem, position: usize, total: usize);

    /// Block until one key is pressed.
    fn read_key(&mut self) -> Result<char>;

    /// Print a one-line status message.
    fn notify(&mut self, message: &str);
}

/// Interactive terminal operator. Keys are read in raw mode so no Enter is
/// needed; Esc and Ctrl+C count as quit.
#[derive(Debug, Default)]
pub struct TerminalOperator;

impl TerminalOperator {
    pub fn new() -> Self {
        Self
    }

    fn read_raw_key() -> io::Result<char> {
        enable_raw_mode()?;
        let key = loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break Ok(key),
                Ok(_) => continue,
                Err(e) => break Err(e),
            }
        };
        disable_raw_mode()?;

        let key = key?;
        Ok(key_to_char(key.code, key.modifiers))
    }
}

/// Map a key press to the character the command table reads.
///
/// Ctrl+C and Esc become `q`. Any other control chord and any non-character
/// key become `\0`, which matches no command.
fn key_to_char(code: KeyCode, modifiers: KeyModifiers) -> char {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => 'q',
        KeyCode::Char(_) if modifiers.contains(KeyModifiers::CONTROL) => '\0',
        KeyCode::Esc => 'q',
        KeyCode::Char(c) => c,
        _ => '\0',
    }
}

impl Operator for TerminalOperator {
    fn show(&mut self, item: &ReviewItem, position: usize, total: usize) {
        println!();
        println!(
            "{} {} {}",
            format!("[{}/{}]", position, total).dimmed(),
            item.task.monogram().cyan().bold(),
            item.task.title.bold()
        );
        println!("  {} {}", "uri:".dimmed(), item.task.uri);
        println!("  {} {}", "column:".dimmed(), item.column_name);
        println!("  {} {}", "flagged:".dimmed(), item.reason.to_string().yellow());
        println!("  {}", Command::legend().dimmed());
    }

    fn read_key(&mut self) -> Result<char> {
        print!("{} ", ">".green().bold());
        io::stdout().flush()?;
        let c = Self::read_raw_key()?;
        println!("{}", c);
        Ok(c)
    }

    fn notify(&mut self, message: &str) {
        println!("  {}", message);
    }
}

/// What a [`ScriptedOperator`] was shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shown {
    pub task_id: u64,
    pub title: String,
    pub column_name: String,
    pub reason: String,
    pub position: usize,
    pub total: usize,
}

/// Replays a fixed key sequence; records everything it was shown.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    keys: VecDeque<char>,
    pub shown: Vec<Shown>,
    pub notices: Vec<String>,
}

impl ScriptedOperator {
    pub fn new(keys: &str) -> Self {
        Self {
            keys: keys.chars().collect(),
            ..Default::default()
        }
    }

    /// Keys not yet consumed.
    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl Operator for ScriptedOperator {
    fn show(&mut self, item: &ReviewItem, position: usize, total: usize) {
        self.shown.push(Shown {
            task_id: item.task.id,
            title: item.task.title.clone(),
            column_name: item.column_name.clone(),
            reason: item.reason.to_string(),
            position,
            total,
        });
    }

    fn read_key(&mut self) -> Result<char> {
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "operator script exhausted").into())
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TriageError;

    #[test]
    fn test_key_to_char_quit_keys() {
        assert_eq!(key_to_char(KeyCode::Char('c'), KeyModifiers::CONTROL), 'q');
        assert_eq!(key_to_char(KeyCode::Esc, KeyModifiers::NONE), 'q');
    }

    #[test]
    fn test_key_to_char_plain_and_shifted() {
        assert_eq!(key_to_char(KeyCode::Char('h'), KeyModifiers::NONE), 'h');
        assert_eq!(key_to_char(KeyCode::Char('!'), KeyModifiers::SHIFT), '!');
    }

    #[test]
    fn test_key_to_char_ignores_other_control_chords() {
        for c in ['w', 'h', 'n', 'q', 's'] {
            let mapped = key_to_char(KeyCode::Char(c), KeyModifiers::CONTROL);
            assert_eq!(mapped, '\0', "ctrl+{}", c);
            assert_eq!(Command::from_key(mapped), None);
        }
        assert_eq!(key_to_char(KeyCode::Enter, KeyModifiers::NONE), '\0');
    }

    #[test]
    fn test_scripted_operator_replays_keys() {
        let mut op = ScriptedOperator::new("hq");
        assert_eq!(op.read_key().unwrap(), 'h');
        assert_eq!(op.remaining(), 1);
        assert_eq!(op.read_key().unwrap(), 'q');
    }

    #[test]
    fn test_scripted_operator_exhausted() {
        let mut op = ScriptedOperator::new("");
        let err = op.read_key().unwrap_err();
        assert!(matches!(err, TriageError::Io(_)));
    }

    #[test]
    fn test_scripted_operator_records_notices() {
        let mut op = ScriptedOperator::new("");
        op.notify("skipped");
        assert_eq!(op.notices, vec!["skipped".to_string()]);
    }
}
