//! Line commands of the interactive review loop. Row numbers are 1-based.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Show(usize),
    Standard(usize),
    NotStandard(usize),
    Unset(usize),
    Reason(usize, String),
    Save,
    Reload,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (type `help`)")]
    Unknown(String),
    #[error("`{0}` needs a row number")]
    MissingRow(&'static str),
    #[error("invalid row number `{0}`")]
    InvalidRow(String),
}

pub const HELP: &str = "\
list              show all rows
show <n>          show row n
s <n>             toggle Standard for row n
n <n>             toggle Not Standard for row n
u <n>             clear the label of row n
r <n> <text>      set the reason of row n (empty text clears it)
save              write labels back
reload            reload the dataset, keeping rows edited this session
help              this text
quit              leave (unsaved edits are lost)";

impl Command {
    /// 0-based row index the command targets, if any.
    pub fn row(&self) -> Option<usize> {
        match self {
            Command::Show(n)
            | Command::Standard(n)
            | Command::NotStandard(n)
            | Command::Unset(n)
            | Command::Reason(n, _) => Some(n - 1),
            _ => None,
        }
    }
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (line, ""),
    };

    match word {
        "list" | "l" => Ok(Command::List),
        "save" | "w" => Ok(Command::Save),
        "reload" => Ok(Command::Reload),
        "help" | "?" | "h" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        "show" => row_number("show", rest).map(|(n, _)| Command::Show(n)),
        "s" | "standard" => row_number("s", rest).map(|(n, _)| Command::Standard(n)),
        "n" | "not" => row_number("n", rest).map(|(n, _)| Command::NotStandard(n)),
        "u" | "unset" => row_number("u", rest).map(|(n, _)| Command::Unset(n)),
        "r" | "reason" => row_number("r", rest).map(|(n, text)| Command::Reason(n, text.to_string())),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// Leading 1-based row number and the remaining text.
fn row_number<'a>(command: &'static str, rest: &'a str) -> Result<(usize, &'a str), CommandError> {
    let (raw, tail) = match rest.split_once(char::is_whitespace) {
        Some((raw, tail)) => (raw, tail.trim()),
        None => (rest, ""),
    };
    if raw.is_empty() {
        return Err(CommandError::MissingRow(command));
    }
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok((n, tail)),
        _ => Err(CommandError::InvalidRow(raw.to_string())),
    }
}
