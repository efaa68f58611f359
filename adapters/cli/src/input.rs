//! Line-oriented keyboard commands read from stdin.
//!
//! ```text
//! f [x y] [health]             drop food, optionally at a cell and with a bite count
//! p                            toggle pause
//! + species [variant] [name]   add a fish; `-` skips the variant
//! q                            quit
//! ```

use std::{
    error::Error,
    fmt,
    io::BufRead,
    thread::{self, JoinHandle},
};

use crossbeam_channel::Sender;
use fishtank_core::{Command, FishRequest, Position};
use tracing::{debug, warn};

/// Bites a food particle survives when none are given.
pub(crate) const DEFAULT_FOOD_HEALTH: u32 = 3;
/// Placeholder accepted in place of a variant name.
const NO_VARIANT: &str = "-";

/// Turns typed lines into arena commands.
///
/// Pause is a toggle on the keyboard but an explicit flag on the command
/// surface, so the reader remembers what it last asked for.
#[derive(Debug, Default)]
pub(crate) struct InputReader {
    paused: bool,
}

impl InputReader {
    /// Interprets one line. Blank lines yield `Ok(None)`.
    pub(crate) fn interpret(&mut self, line: &str) -> Result<Option<Command>, InputError> {
        let mut words = line.split_whitespace();
        let Some(keyword) = words.next() else {
            return Ok(None);
        };
        let arguments: Vec<&str> = words.collect();

        let command = match keyword {
            "f" => parse_food(&arguments)?,
            "p" => {
                expect_no_arguments(keyword, &arguments)?;
                self.paused = !self.paused;
                Command::SetPaused {
                    paused: self.paused,
                }
            }
            "+" => parse_fish(&arguments)?,
            "q" => {
                expect_no_arguments(keyword, &arguments)?;
                Command::Shutdown
            }
            other => return Err(InputError::UnknownKeyword(other.to_owned())),
        };
        Ok(Some(command))
    }
}

fn parse_food(arguments: &[&str]) -> Result<Command, InputError> {
    let (position, health) = match arguments {
        [] => (None, DEFAULT_FOOD_HEALTH),
        [health] => (None, parse_number(health)?),
        [x, y] => (Some(parse_position(x, y)?), DEFAULT_FOOD_HEALTH),
        [x, y, health] => (Some(parse_position(x, y)?), parse_number(health)?),
        _ => return Err(InputError::TooManyArguments("f".to_owned())),
    };
    if health == 0 {
        return Err(InputError::InvalidNumber("0".to_owned()));
    }
    Ok(Command::AddFood { position, health })
}

fn parse_fish(arguments: &[&str]) -> Result<Command, InputError> {
    let (species, variant, name) = match arguments {
        [] => return Err(InputError::MissingSpecies),
        [species] => (*species, None, None),
        [species, variant] => (*species, Some(*variant), None),
        [species, variant, name] => (*species, Some(*variant), Some(*name)),
        _ => return Err(InputError::TooManyArguments("+".to_owned())),
    };

    let mut request = FishRequest::new(species);
    if let Some(variant) = variant.filter(|variant| *variant != NO_VARIANT) {
        request = request.with_variant(variant);
    }
    if let Some(name) = name {
        request = request.with_name(name);
    }
    Ok(Command::AddFish { request })
}

fn parse_position(x: &str, y: &str) -> Result<Position, InputError> {
    let x = x
        .parse::<i32>()
        .map_err(|_| InputError::InvalidNumber(x.to_owned()))?;
    let y = y
        .parse::<i32>()
        .map_err(|_| InputError::InvalidNumber(y.to_owned()))?;
    Ok(Position::new(x, y))
}

fn parse_number(value: &str) -> Result<u32, InputError> {
    value
        .parse::<u32>()
        .map_err(|_| InputError::InvalidNumber(value.to_owned()))
}

fn expect_no_arguments(keyword: &str, arguments: &[&str]) -> Result<(), InputError> {
    if arguments.is_empty() {
        Ok(())
    } else {
        Err(InputError::TooManyArguments(keyword.to_owned()))
    }
}

/// Errors that can occur while interpreting typed commands.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum InputError {
    /// The line started with a keyword the reader does not know.
    UnknownKeyword(String),
    /// `+` was given without a species.
    MissingSpecies,
    /// A coordinate or bite count could not be parsed.
    InvalidNumber(String),
    /// The keyword received more arguments than it accepts.
    TooManyArguments(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKeyword(keyword) => write!(f, "unknown command '{keyword}'"),
            Self::MissingSpecies => write!(f, "'+' needs a species name"),
            Self::InvalidNumber(value) => write!(f, "'{value}' is not a valid number"),
            Self::TooManyArguments(keyword) => {
                write!(f, "too many arguments for '{keyword}'")
            }
        }
    }
}

impl Error for InputError {}

/// Reads lines on a dedicated thread and forwards the resulting commands.
///
/// The thread ends after forwarding a shutdown, at end of input, or once the
/// receiving side hangs up. Dropping the sender on exit disconnects the
/// channel.
pub(crate) fn spawn_reader<R>(source: R, sender: Sender<Command>) -> std::io::Result<JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("stdin-reader".to_owned())
        .spawn(move || forward_lines(source, &sender))
}

fn forward_lines<R: BufRead>(source: R, sender: &Sender<Command>) {
    let mut reader = InputReader::default();
    for line in source.lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                warn!(%error, "failed to read input");
                return;
            }
        };

        let command = match reader.interpret(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(error) => {
                warn!(%error, line = %line.trim(), "ignoring input");
                continue;
            }
        };

        let quitting = command == Command::Shutdown;
        debug!(?command, "forwarding input command");
        if sender.send(command).is_err() || quitting {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn interpret(line: &str) -> Result<Option<Command>, InputError> {
        InputReader::default().interpret(line)
    }

    #[test]
    fn food_arguments_are_optional() {
        assert_eq!(
            interpret("f"),
            Ok(Some(Command::AddFood {
                position: None,
                health: DEFAULT_FOOD_HEALTH,
            }))
        );
        assert_eq!(
            interpret("f 7"),
            Ok(Some(Command::AddFood {
                position: None,
                health: 7,
            }))
        );
        assert_eq!(
            interpret("  f 12 4  "),
            Ok(Some(Command::AddFood {
                position: Some(Position::new(12, 4)),
                health: DEFAULT_FOOD_HEALTH,
            }))
        );
        assert_eq!(
            interpret("f 12 4 9"),
            Ok(Some(Command::AddFood {
                position: Some(Position::new(12, 4)),
                health: 9,
            }))
        );
    }

    #[test]
    fn malformed_food_is_rejected() {
        assert_eq!(
            interpret("f x 4"),
            Err(InputError::InvalidNumber("x".to_owned()))
        );
        assert_eq!(
            interpret("f 0"),
            Err(InputError::InvalidNumber("0".to_owned()))
        );
        assert_eq!(
            interpret("f 1 2 3 4"),
            Err(InputError::TooManyArguments("f".to_owned()))
        );
    }

    #[test]
    fn pause_toggles() {
        let mut reader = InputReader::default();
        assert_eq!(
            reader.interpret("p"),
            Ok(Some(Command::SetPaused { paused: true }))
        );
        assert_eq!(
            reader.interpret("p"),
            Ok(Some(Command::SetPaused { paused: false }))
        );
    }

    #[test]
    fn fish_requests_accept_variant_and_name() {
        assert_eq!(
            interpret("+ Molly"),
            Ok(Some(Command::AddFish {
                request: FishRequest::new("Molly"),
            }))
        );
        assert_eq!(
            interpret("+ Molly golden_panda"),
            Ok(Some(Command::AddFish {
                request: FishRequest::new("Molly").with_variant("golden_panda"),
            }))
        );
        assert_eq!(
            interpret("+ Molly - mjoofin"),
            Ok(Some(Command::AddFish {
                request: FishRequest::new("Molly").with_name("mjoofin"),
            }))
        );
        assert_eq!(interpret("+"), Err(InputError::MissingSpecies));
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(interpret("   "), Ok(None));
        assert_eq!(
            interpret("feed"),
            Err(InputError::UnknownKeyword("feed".to_owned()))
        );
        assert_eq!(
            interpret("q now").map_err(|error| error.to_string()),
            Err("too many arguments for 'q'".to_owned())
        );
    }

    #[test]
    fn reader_stops_after_quit() {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let source = Cursor::new("f\nbogus\np\nq\nf 3\n");
        forward_lines(source, &sender);
        drop(sender);

        let forwarded: Vec<Command> = receiver.iter().collect();
        assert_eq!(
            forwarded,
            vec![
                Command::AddFood {
                    position: None,
                    health: DEFAULT_FOOD_HEALTH,
                },
                Command::SetPaused { paused: true },
                Command::Shutdown,
            ]
        );
    }
}
