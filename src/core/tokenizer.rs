//! Line tokenizer for console input.
//!
//! Splits a trimmed line on the single space character. Runs of spaces are
//! not collapsed, so `"echo a  b"` yields the arguments `["a", "", "b"]`.

/// Result of tokenizing a console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedCommand<'a> {
    /// The command name (first token).
    pub command: &'a str,
    /// The arguments (remaining tokens, empty strings included).
    pub args: Vec<&'a str>,
    /// The raw input string.
    pub raw: &'a str,
}

/// Tokenize error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// Empty or whitespace-only input.
    EmptyInput,
}

impl std::fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenizeError::EmptyInput => write!(f, "empty input"),
        }
    }
}

impl std::error::Error for TokenizeError {}

/// Tokenize a line into a command name and arguments.
///
/// Surrounding whitespace is trimmed first; the remainder is split on `' '`.
///
/// # Examples
///
/// ```
/// use bevy_dev_console::core::tokenize;
///
/// let result = tokenize("echo hello world").unwrap();
/// assert_eq!(result.command, "echo");
/// assert_eq!(result.args, vec!["hello", "world"]);
///
/// // Consecutive spaces keep their empty arguments
/// let result = tokenize("  echo a  b ").unwrap();
/// assert_eq!(result.args, vec!["a", "", "b"]);
///
/// assert!(tokenize("   ").is_err());
/// ```
pub fn tokenize(input: &str) -> Result<TokenizedCommand<'_>, TokenizeError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(TokenizeError::EmptyInput);
    }

    let mut tokens = trimmed.split(' ');
    let command = tokens.next().ok_or(TokenizeError::EmptyInput)?;

    Ok(TokenizedCommand {
        command,
        args: tokens.collect(),
        raw: input,
    })
}
