//! Bucket selection menu

use std::io::{BufRead, Write};

use crate::output::Formatter;

/// Pick a bucket by name, as given with `--bucket`
pub fn find_bucket(names: &[String], wanted: &str) -> Option<String> {
    names.iter().find(|name| *name == wanted).cloned()
}

/// Show a numbered menu and read a choice from `input`
///
/// Blank input or end of input returns `None`. Anything that is not an index
/// in range re-prompts.
pub fn choose_bucket<R: BufRead>(
    names: &[String],
    input: &mut R,
    formatter: &Formatter,
) -> std::io::Result<Option<String>> {
    for (index, name) in names.iter().enumerate() {
        formatter.println(&format!("  {} {name}", formatter.bold(&format!("{index:>3}"))));
    }

    let last = names.len().saturating_sub(1);
    loop {
        print!("select bucket(0-{last}): ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let choice = line.trim();
        if choice.is_empty() {
            return Ok(None);
        }
        match choice.parse::<usize>().ok().and_then(|i| names.get(i)) {
            Some(name) => return Ok(Some(name.clone())),
            None => formatter.warning(&format!("'{choice}' is not a number between 0 and {last}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::output::OutputConfig;

    fn names() -> Vec<String> {
        vec!["logs".to_string(), "media".to_string(), "backup".to_string()]
    }

    fn formatter() -> Formatter {
        Formatter::new(OutputConfig {
            no_color: true,
            no_progress: true,
        })
    }

    #[test]
    fn test_choose_by_index() {
        let mut input = Cursor::new("1\n");
        let chosen = choose_bucket(&names(), &mut input, &formatter()).unwrap();
        assert_eq!(chosen.as_deref(), Some("media"));
    }

    #[test]
    fn test_invalid_input_reprompts() {
        let mut input = Cursor::new("abc\n7\n 2 \n");
        let chosen = choose_bucket(&names(), &mut input, &formatter()).unwrap();
        assert_eq!(chosen.as_deref(), Some("backup"));
    }

    #[test]
    fn test_blank_or_eof_exits() {
        let mut blank = Cursor::new("\n");
        assert!(choose_bucket(&names(), &mut blank, &formatter()).unwrap().is_none());

        let mut eof = Cursor::new("");
        assert!(choose_bucket(&names(), &mut eof, &formatter()).unwrap().is_none());
    }

    #[test]
    fn test_find_bucket() {
        assert_eq!(find_bucket(&names(), "logs").as_deref(), Some("logs"));
        assert!(find_bucket(&names(), "nope").is_none());
    }
}
