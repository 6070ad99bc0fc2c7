//! Command-line parsing for the REPL
//!
//! Splits one input line into words (double or single quotes group words
//! containing spaces or glob characters) and maps them onto a [`Command`].

pub const HELP: &str = "commands : cd, l=ls, mkdir, rm, up=upload, down=download, q=exit";

pub const CD_USAGE: &str = "usage: cd dir_name";
pub const LS_USAGE: &str = "usage: ls [long]";
pub const UP_USAGE: &str = "usage: up local_file [remote_name]";
pub const DOWN_USAGE: &str = "usage: down remote_file [local_name]";
pub const MKDIR_USAGE: &str = "usage: mkdir dir_name";
pub const RM_USAGE: &str = "usage: rm file_or_dir_name";

/// A parsed REPL command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank line
    Empty,
    Cd(String),
    List { long: bool },
    Upload { local: String, remote: Option<String> },
    Download { remote: String, local: Option<String> },
    Mkdir(String),
    Remove(String),
    /// `!cmd` runs a local shell command
    Shell(String),
    Help,
    Quit,
    /// Known command with the wrong arguments
    Usage(&'static str),
    /// Unrecognized input
    Unknown(String),
}

/// Split a line into words, honoring quotes
pub fn tokenize(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

/// Parse one input line
pub fn parse_line(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    if let Some(shell) = trimmed.strip_prefix('!') {
        return Command::Shell(shell.trim().to_string());
    }

    let words = tokenize(trimmed);
    let Some((name, args)) = words.split_first() else {
        return Command::Empty;
    };

    match (name.as_str(), args) {
        ("cd", [dir]) => Command::Cd(dir.clone()),
        ("cd", _) => Command::Usage(CD_USAGE),

        ("l" | "ls", []) => Command::List { long: false },
        ("l" | "ls", [flag]) if flag == "long" || flag == "-l" => Command::List { long: true },
        ("l" | "ls", _) => Command::Usage(LS_USAGE),

        ("up" | "upload", [local]) => Command::Upload {
            local: local.clone(),
            remote: None,
        },
        ("up" | "upload", [local, remote]) => Command::Upload {
            local: local.clone(),
            remote: Some(remote.clone()),
        },
        ("up" | "upload", _) => Command::Usage(UP_USAGE),

        ("down" | "download", [remote]) => Command::Download {
            remote: remote.clone(),
            local: None,
        },
        ("down" | "download", [remote, local]) => Command::Download {
            remote: remote.clone(),
            local: Some(local.clone()),
        },
        ("down" | "download", _) => Command::Usage(DOWN_USAGE),

        ("mkdir", [dir]) => Command::Mkdir(dir.clone()),
        ("mkdir", _) => Command::Usage(MKDIR_USAGE),

        ("rm", [target]) => Command::Remove(target.clone()),
        ("rm", _) => Command::Usage(RM_USAGE),

        ("q" | "quit" | "exit", _) => Command::Quit,
        ("help" | "?", _) => Command::Help,

        _ => Command::Unknown(trimmed.to_string()),
    }
}
