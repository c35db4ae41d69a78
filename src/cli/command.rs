//! Interactive session commands

use thiserror::Error;

use crate::domain::timeline::EntryId;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Record,
    Stop,
    Discard,
    /// Play the draft audio, or a committed entry
    Play(Option<EntryId>),
    Halt,
    Text(String),
    Clear,
    Send,
    List,
    Export,
    Status,
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for the list of commands")]
    Unknown(String),

    #[error("Invalid entry id '{0}'")]
    InvalidId(String),
}

impl Command {
    /// Parse a line. Only `text` keeps the rest of the line verbatim.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim_start();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest),
            None => (line.trim_end(), ""),
        };

        let command = match word.to_lowercase().as_str() {
            "" => Self::Empty,
            "record" | "rec" | "r" => Self::Record,
            "stop" | "s" => Self::Stop,
            "discard" | "d" => Self::Discard,
            "play" | "p" => match rest.trim() {
                "" => Self::Play(None),
                id => Self::Play(Some(
                    id.parse()
                        .map_err(|_| CommandError::InvalidId(id.to_string()))?,
                )),
            },
            "halt" | "h" => Self::Halt,
            "text" | "t" => Self::Text(rest.to_string()),
            "clear" => Self::Clear,
            "send" => Self::Send,
            "list" | "ls" => Self::List,
            "export" => Self::Export,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

/// Help text for the interactive session
pub const HELP: &str = "\
Commands:
  record         start recording from the microphone
  stop           stop recording and attach the audio to the draft
  discard        drop the recording and any attached audio
  play [id]      play the draft audio, or timeline entry <id>
  halt           stop playback
  text <words>   set the draft text
  clear          clear the draft text
  send           post the draft to the timeline
  list           show the timeline, newest first
  export         print the timeline as JSON
  status         show recorder, playback and draft state
  help           show this help
  quit           leave the session";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_commands() {
        assert_eq!(Command::parse("record").unwrap(), Command::Record);
        assert_eq!(Command::parse("  STOP  ").unwrap(), Command::Stop);
        assert_eq!(Command::parse("q").unwrap(), Command::Quit);
        assert_eq!(Command::parse("").unwrap(), Command::Empty);
        assert_eq!(Command::parse("   ").unwrap(), Command::Empty);
    }

    #[test]
    fn text_keeps_inner_spacing() {
        assert_eq!(
            Command::parse("text Olá  mundo ").unwrap(),
            Command::Text("Olá  mundo ".to_string())
        );
        assert_eq!(Command::parse("text").unwrap(), Command::Text(String::new()));
    }

    #[test]
    fn play_takes_optional_id() {
        assert_eq!(Command::parse("play").unwrap(), Command::Play(None));
        assert_eq!(
            Command::parse("play #3").unwrap(),
            Command::Play(Some(EntryId::new(3)))
        );
        assert!(matches!(
            Command::parse("play three"),
            Err(CommandError::InvalidId(_))
        ));
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert_eq!(
            Command::parse("dance"),
            Err(CommandError::Unknown("dance".to_string()))
        );
    }
}
