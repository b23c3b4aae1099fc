// Write confirmation for --noact / --confirm

use std::io::{self, BufRead, Write};

use super::config::WriteArgs;

/// Decides per file whether changes are written
pub struct Confirmer {
    noact: bool,
    prompt: bool,
    /// Set once the user answers "a"
    all: bool,
}

impl Confirmer {
    pub fn new(write: WriteArgs) -> Self {
        Self {
            noact: write.noact,
            prompt: write.confirm,
            all: false,
        }
    }

    /// Ask on stdin/stdout when prompting is enabled
    pub fn approve(&mut self) -> io::Result<bool> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        self.approve_with(&mut input, &mut io::stdout())
    }

    pub fn approve_with<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> io::Result<bool> {
        if self.noact {
            return Ok(false);
        }
        if !self.prompt || self.all {
            return Ok(true);
        }

        write!(output, "confirm changes? (y/a/[n]) ")?;
        output.flush()?;
        let mut answer = String::new();
        input.read_line(&mut answer)?;

        match answer.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('y') => Ok(true),
            Some('a') => {
                self.all = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
