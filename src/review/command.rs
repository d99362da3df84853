//! Operator commands, one keystroke each.

use crate::domain::Priority;

/// What the operator decided for the task on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Set the task to this priority
    SetPriority(Priority),
    /// Leave the task alone and move on
    Skip,
    /// Stop the whole run now
    Exit,
}

impl Command {
    /// Map a keystroke to a command. Letters are case-insensitive.
    pub fn from_key(key: char) -> Option<Command> {
        let command = match key.to_ascii_lowercase() {
            '!' | 'u' => Command::SetPriority(Priority::UNBREAK_NOW),
            't' => Command::SetPriority(Priority::NEEDS_TRIAGE),
            'h' => Command::SetPriority(Priority::HIGH),
            'n' => Command::SetPriority(Priority::NORMAL),
            'l' => Command::SetPriority(Priority::LOW),
            'w' => Command::SetPriority(Priority::WISHLIST),
            's' | ' ' => Command::Skip,
            'q' => Command::Exit,
            _ => return None,
        };
        Some(command)
    }

    /// One-line key legend shown with every prompt.
    pub fn legend() -> &'static str {
        "[u]nbreak  [t]riage  [h]igh  [n]ormal  [l]ow  [w]ishlist  [s]kip  [q]uit"
    }
}
