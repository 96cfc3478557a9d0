pub mod del;
pub mod executable;
pub mod get;
pub mod incr;
pub mod set;

use std::{str, vec};
use thiserror::Error as ThisError;

use crate::commands::executable::Executable;
use crate::frame::Frame;
use crate::store::Db;

use del::Del;
use get::Get;
use incr::Incr;
use set::Set;

/// A command applied to the store. Built by parsing one client line and consumed exactly once
/// by the store actor.
#[derive(Debug, PartialEq)]
pub enum Command {
    Del(Del),
    Get(Get),
    Incr(Incr),
    Set(Set),
}

impl Executable for Command {
    fn exec(self, db: &mut Db) -> Frame {
        match self {
            Command::Del(cmd) => cmd.exec(db),
            Command::Get(cmd) => cmd.exec(db),
            Command::Incr(cmd) => cmd.exec(db),
            Command::Set(cmd) => cmd.exec(db),
        }
    }
}

/// The outcome of parsing a request line: either a store command or a request to end the
/// session.
#[derive(Debug, PartialEq)]
pub enum Input {
    Command(Command),
    Quit,
}

impl TryFrom<&[u8]> for Input {
    type Error = CommandParserError;

    fn try_from(line: &[u8]) -> Result<Self, Self::Error> {
        // Lines that are not valid UTF-8 are rejected, never decoded lossily.
        let line = str::from_utf8(line)?;
        Input::try_from(line)
    }
}

impl TryFrom<&str> for Input {
    type Error = CommandParserError;

    fn try_from(line: &str) -> Result<Self, Self::Error> {
        // Fields are split on single spaces, so consecutive spaces produce empty tokens.
        let parts: Vec<String> = line.trim().split(' ').map(|part| part.to_string()).collect();

        let parser = &mut CommandParser {
            parts: parts.into_iter(),
        };

        let command_name = parser.parse_command_name()?;

        let res = match &command_name[..] {
            "STOP" | "QUIT" => return Ok(Input::Quit),
            "DEL" => Del::try_from(parser).map(Command::Del),
            "GET" => Get::try_from(parser).map(Command::Get),
            "INCR" => Incr::try_from(parser).map(Command::Incr),
            "SET" => Set::try_from(parser).map(Command::Set),
            _ => return Err(CommandParserError::UnknownCommand),
        };

        res.map(Input::Command).map_err(|err| match err {
            CommandParserError::EndOfStream => CommandParserError::WrongNumberOfArguments {
                command: command_name.to_lowercase(),
            },
            err => err,
        })
    }
}

pub struct CommandParser {
    parts: vec::IntoIter<String>,
}

impl CommandParser {
    fn parse_command_name(&mut self) -> Result<String, CommandParserError> {
        // Command names are case-sensitive.
        self.parts.next().ok_or(CommandParserError::UnknownCommand)
    }

    fn next_string(&mut self) -> Result<String, CommandParserError> {
        self.parts.next().ok_or(CommandParserError::EndOfStream)
    }
}

/// Errors raised while turning a line into a command. The `Display` output is the exact
/// message sent to the client after the `ERR` token.
#[derive(Debug, ThisError, PartialEq)]
pub enum CommandParserError {
    #[error("wrong number of arguments for '{command}' command")]
    WrongNumberOfArguments { command: String },
    #[error("unknown command")]
    UnknownCommand,
    #[error("protocol error; invalid UTF-8 string")]
    InvalidUTF8String(#[from] str::Utf8Error),
    #[error("attempting to extract an argument failed due to the line being fully consumed")]
    EndOfStream,
}

impl From<CommandParserError> for Frame {
    fn from(err: CommandParserError) -> Self {
        Frame::Error(err.to_string())
    }
}
