//! Yes/no confirmation gate driven by single keypresses.

use std::io;

/// A keypress as far as the gate is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Other,
}

/// Blocking source of keypresses.
pub trait KeySource {
    fn read_key(&mut self) -> io::Result<Key>;
}

/// Reads raw keypresses from the controlling terminal.
pub struct TerminalKeys {
    term: console::Term,
}

impl TerminalKeys {
    pub fn stdout() -> Self {
        Self {
            term: console::Term::stdout(),
        }
    }
}

impl KeySource for TerminalKeys {
    fn read_key(&mut self) -> io::Result<Key> {
        // A detached terminal reports Unknown forever; fail instead of spinning.
        if !self.term.is_term() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "not attached to a terminal",
            ));
        }
        Ok(match self.term.read_key()? {
            console::Key::Char(c) => Key::Char(c),
            console::Key::Enter => Key::Enter,
            _ => Key::Other,
        })
    }
}

/// What a single key means for a question with the given default.
/// `None` means the key is ignored.
pub fn decide(key: Key, default_yes: bool) -> Option<bool> {
    match key {
        Key::Char('Y') | Key::Char('y') => Some(true),
        Key::Char('N') | Key::Char('n') => Some(false),
        Key::Enter => Some(default_yes),
        _ => None,
    }
}

fn choices(default_yes: bool) -> &'static str {
    if default_yes {
        "[Yy(default)] [Nn]"
    } else {
        "[Yy] [Nn(default)]"
    }
}

/// Asks the operator yes/no questions, or answers yes for them when `always_yes` is set.
pub struct Gate<K> {
    keys: K,
    always_yes: bool,
}

impl<K: KeySource> Gate<K> {
    pub fn new(keys: K, always_yes: bool) -> Self {
        Self { keys, always_yes }
    }

    /// Ask `question` and block until a deciding key arrives.
    /// A read failure answers no.
    pub fn confirm(&mut self, question: &str, default_yes: bool) -> bool {
        if self.always_yes {
            return true;
        }
        println!("\n{}: {}", question, choices(default_yes));
        loop {
            match self.keys.read_key() {
                Ok(key) => {
                    if let Some(answer) = decide(key, default_yes) {
                        return answer;
                    }
                }
                Err(e) => {
                    tracing::warn!("get single key: {}", e);
                    return false;
                }
            }
        }
    }
}
