//! ui::prompts
//!
//! Interactive prompts.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode,
//! operations requiring user input must either have another source for the
//! value or fail with a clear error message.

use std::io::BufRead;

use thiserror::Error;

use crate::core::types::Resolution;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("not in interactive mode; {0}")]
    NotInteractive(String),

    #[error("no input received")]
    EndOfInput,

    #[error("IO error: {0}")]
    IoError(String),
}

/// Read one line from `reader`, without the trailing newline.
///
/// Returns `PromptError::EndOfInput` when the reader is exhausted.
pub fn read_line<R: BufRead>(reader: &mut R) -> Result<String, PromptError> {
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .map_err(|e| PromptError::IoError(e.to_string()))?;
    if read == 0 {
        return Err(PromptError::EndOfInput);
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Read a menu choice for conflict resolution.
///
/// `Ok(None)` means the line was read but is not a valid choice.
pub fn read_resolution<R: BufRead>(reader: &mut R) -> Result<Option<Resolution>, PromptError> {
    let line = read_line(reader)?;
    Ok(Resolution::parse_input(&line).ok())
}

/// Prompt for masked input (e.g., client secrets).
///
/// The input is not echoed to the terminal.
pub fn password(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive(format!(
            "cannot prompt for {}",
            message.trim_end_matches(": ")
        )));
    }
    rpassword::prompt_password(message).map_err(|e| PromptError::IoError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_line_strips_newline() {
        let mut input = Cursor::new("hello\r\nworld\n");
        assert_eq!(read_line(&mut input).unwrap(), "hello");
        assert_eq!(read_line(&mut input).unwrap(), "world");
        assert!(matches!(read_line(&mut input), Err(PromptError::EndOfInput)));
    }

    #[test]
    fn read_resolution_valid() {
        let mut input = Cursor::new("3\n");
        assert_eq!(
            read_resolution(&mut input).unwrap(),
            Some(Resolution::Both)
        );
    }

    #[test]
    fn read_resolution_invalid() {
        assert_eq!(read_resolution(&mut Cursor::new("4\n")).unwrap(), None);
        assert_eq!(read_resolution(&mut Cursor::new("two\n")).unwrap(), None);
        assert_eq!(read_resolution(&mut Cursor::new("\n")).unwrap(), None);
    }

    #[test]
    fn read_resolution_eof() {
        assert!(matches!(
            read_resolution(&mut Cursor::new("")),
            Err(PromptError::EndOfInput)
        ));
    }

    #[test]
    fn password_requires_interactive() {
        let result = password("Client secret: ", false);
        match result {
            Err(PromptError::NotInteractive(msg)) => assert!(msg.contains("Client secret")),
            other => panic!("expected NotInteractive, got {:?}", other),
        }
    }
}
