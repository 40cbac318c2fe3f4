//! Line-oriented stdin console.
//!
//! Each line is one command. Machine commands are forwarded to the runner
//! over its `mpsc` channel; `status` and `help` are answered here. The task
//! ends on `quit`, at end of input, or when the runner goes away, and
//! dropping its sender lets the runner finish once the clock stops.

use std::num::ParseIntError;

use machine_core::runner::Command;
use machine_types::{Action, ActionParseError};
use tokio::io::{AsyncBufReadExt as _, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::render;

/// Text shown by `help`.
pub const HELP: &str = "\
commands:
  start                 start the clock
  stop                  stop the clock
  interval <ms>         change the tick period from the next cycle on
  buy-energy            spend tokens on energy
  repair-wear           spend tokens on repairs
  upgrade-<module>      buy the next level of a module
  reset                 start a new game
  status                show the machine
  help                  show this text
  quit                  end the session";

/// A parsed console line.
#[derive(Debug)]
pub enum ConsoleInput {
    /// Blank line.
    Empty,
    /// Print the command list.
    Help,
    /// Print the current snapshot.
    Status,
    /// Forward to the runner.
    Send(Command),
}

/// Errors for lines that are not commands.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// `interval` without a value.
    #[error("usage: interval <ms>")]
    MissingInterval,

    /// `interval` with something that is not a number of milliseconds.
    #[error("invalid interval {raw:?}: {source}")]
    InvalidInterval {
        /// The text given.
        raw: String,
        /// The underlying parse error.
        source: ParseIntError,
    },

    /// Anything else that is not a known action.
    #[error("{source} (try `help`)")]
    Action {
        /// The underlying action parse error.
        #[from]
        source: ActionParseError,
    },
}

/// Parse one console line.
///
/// # Errors
///
/// Returns [`ConsoleError`] for unknown commands and malformed intervals.
pub fn parse_line(line: &str) -> Result<ConsoleInput, ConsoleError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(ConsoleInput::Empty);
    };
    let input = match head.to_ascii_lowercase().as_str() {
        "help" | "?" => ConsoleInput::Help,
        "status" => ConsoleInput::Status,
        "start" => ConsoleInput::Send(Command::Start),
        "stop" => ConsoleInput::Send(Command::Stop),
        "reset" => ConsoleInput::Send(Command::Reset),
        "quit" | "exit" => ConsoleInput::Send(Command::Shutdown),
        "interval" => {
            let raw = words.next().ok_or(ConsoleError::MissingInterval)?;
            let ms = raw
                .parse::<u64>()
                .map_err(|source| ConsoleError::InvalidInterval {
                    raw: raw.to_owned(),
                    source,
                })?;
            ConsoleInput::Send(Command::SetInterval(ms))
        }
        _ => ConsoleInput::Send(Command::Execute(head.parse::<Action>()?)),
    };
    Ok(input)
}

/// Read commands from stdin until `quit`, end of input, or runner exit.
pub async fn run_console(commands: mpsc::Sender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    render::emit("type `help` for commands");

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("Console reached end of input");
                break;
            }
            Err(e) => {
                warn!(error = %e, "Console read failed");
                break;
            }
        };

        match parse_line(&line) {
            Ok(ConsoleInput::Empty) => {}
            Ok(ConsoleInput::Help) => render::emit(HELP),
            Ok(ConsoleInput::Status) => {
                let (reply, response) = oneshot::channel();
                if commands.send(Command::Status(reply)).await.is_err() {
                    break;
                }
                match response.await {
                    Ok(snapshot) => render::emit(&render::status_text(&snapshot)),
                    Err(_) => break,
                }
            }
            Ok(ConsoleInput::Send(command)) => {
                let quit = matches!(command, Command::Shutdown);
                if commands.send(command).await.is_err() || quit {
                    break;
                }
            }
            Err(e) => render::emit(&e.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use machine_types::ServiceAction;

    use super::*;

    #[test]
    fn blank_lines_are_ignored() {
        assert!(matches!(parse_line("").unwrap(), ConsoleInput::Empty));
        assert!(matches!(parse_line("   ").unwrap(), ConsoleInput::Empty));
    }

    #[test]
    fn clock_commands() {
        assert!(matches!(parse_line("start").unwrap(), ConsoleInput::Send(Command::Start)));
        assert!(matches!(parse_line(" STOP ").unwrap(), ConsoleInput::Send(Command::Stop)));
        assert!(matches!(
            parse_line("interval 3000").unwrap(),
            ConsoleInput::Send(Command::SetInterval(3000))
        ));
        assert!(matches!(parse_line("reset").unwrap(), ConsoleInput::Send(Command::Reset)));
        assert!(matches!(parse_line("quit").unwrap(), ConsoleInput::Send(Command::Shutdown)));
        assert!(matches!(parse_line("status").unwrap(), ConsoleInput::Status));
        assert!(matches!(parse_line("help").unwrap(), ConsoleInput::Help));
    }

    #[test]
    fn action_commands() {
        assert!(matches!(
            parse_line("repair-wear").unwrap(),
            ConsoleInput::Send(Command::Execute(Action::Service(ServiceAction::RepairWear)))
        ));
        assert!(matches!(
            parse_line("upgrade-press").unwrap(),
            ConsoleInput::Send(Command::Execute(Action::Upgrade(ref id))) if id.as_str() == "press"
        ));
    }

    #[test]
    fn malformed_lines_are_reported() {
        assert!(matches!(parse_line("interval").unwrap_err(), ConsoleError::MissingInterval));
        assert!(matches!(
            parse_line("interval soon").unwrap_err(),
            ConsoleError::InvalidInterval { .. }
        ));
        assert!(matches!(parse_line("dance").unwrap_err(), ConsoleError::Action { .. }));
        assert!(matches!(parse_line("upgrade-").unwrap_err(), ConsoleError::Action { .. }));
    }
}
