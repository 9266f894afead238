//! Move suggestions from an external UCI engine subprocess.

use crate::config::UciConfig;
use chess_search::{MoveSuggester, SuggestError};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Maximum number of lines to read before giving up on a UCI response.
pub const MAX_UCI_LINES: usize = 1000;

/// A UCI engine asked for one move per position.
pub struct UciSuggester {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    depth: u32,
    name: String,
}

impl UciSuggester {
    /// Spawns the engine and performs the `uci`/`isready` handshake.
    pub fn spawn(config: &UciConfig) -> Result<Self, SuggestError> {
        let mut process = Command::new(&config.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let missing = || SuggestError::Engine("engine pipes unavailable".to_string());
        let stdin = process.stdin.take().ok_or_else(missing)?;
        let stdout = process.stdout.take().ok_or_else(missing)?;

        let mut engine = UciSuggester {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            depth: config.depth,
            name: String::new(),
        };
        engine.handshake()?;
        debug!(engine = %engine.name, "uci engine ready");
        Ok(engine)
    }

    /// Returns the engine's name as reported via `id name`.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn handshake(&mut self) -> Result<(), SuggestError> {
        self.send_command("uci")?;
        let mut name = String::new();
        self.read_until(|line| {
            if let Some(n) = line.strip_prefix("id name ") {
                name = n.to_string();
            }
            line == "uciok"
        })?;
        self.name = if name.is_empty() {
            "Unknown Engine".to_string()
        } else {
            name
        };

        self.send_command("isready")?;
        self.read_until(|line| line == "readyok")?;
        Ok(())
    }

    fn send_command(&mut self, command: &str) -> Result<(), SuggestError> {
        writeln!(self.stdin, "{}", command)?;
        self.stdin.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, SuggestError> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(SuggestError::Engine(
                "engine closed unexpectedly".to_string(),
            ));
        }
        Ok(line.trim().to_string())
    }

    /// Reads lines until `done` accepts one, returning that line.
    fn read_until<F>(&mut self, mut done: F) -> Result<String, SuggestError>
    where
        F: FnMut(&str) -> bool,
    {
        for _ in 0..MAX_UCI_LINES {
            let line = self.read_line()?;
            if done(&line) {
                return Ok(line);
            }
        }
        Err(SuggestError::Engine(format!(
            "no answer within {MAX_UCI_LINES} lines"
        )))
    }
}

/// Extracts the move from a `bestmove` line, keeping only its 4-character
/// origin/destination part.
pub fn parse_bestmove(line: &str) -> Result<String, SuggestError> {
    let mv = line
        .split_whitespace()
        .nth(1)
        .filter(|mv| *mv != "(none)" && *mv != "0000")
        .ok_or_else(|| SuggestError::Engine(format!("no move in '{line}'")))?;
    Ok(mv.chars().take(4).collect())
}

impl MoveSuggester for UciSuggester {
    fn best_move(&mut self, position: &str) -> Result<String, SuggestError> {
        self.send_command(&format!("position fen {}", position))?;
        self.send_command(&format!("go depth {}", self.depth))?;
        let line = self.read_until(|line| line.starts_with("bestmove"))?;
        parse_bestmove(&line)
    }
}

/// How long an engine gets to exit after `quit` before it is killed.
const QUIT_GRACE: Duration = Duration::from_millis(500);

/// Waits up to `grace` for `process` to exit, then kills and reaps it.
fn shut_down(process: &mut Child, grace: Duration) {
    let deadline = Instant::now() + grace;
    while Instant::now() < deadline {
        match process.try_wait() {
            Ok(Some(_)) => return,
            Ok(None) => thread::sleep(Duration::from_millis(10)),
            Err(_) => break,
        }
    }
    let _ = process.kill();
    let _ = process.wait();
}

impl Drop for UciSuggester {
    fn drop(&mut self) {
        let _ = self.send_command("quit");
        shut_down(&mut self.process, QUIT_GRACE);
    }
}
