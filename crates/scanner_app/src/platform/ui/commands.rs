use std::path::{Path, PathBuf};

use scanner_core::{Listing, ViewMode};
use thiserror::Error;

pub const HELP_TEXT: &str = "\
Commands:
  search <query>     search for media sources (alias: s)
  upload <file.csv>  import sources from a CSV file (alias: u)
  view <name|1-3>    show search, listings or upload (alias: v)
  tab <known|new>    switch the listings table
  refresh            reload both listings
  dismiss            hide the current notification (alias: d)
  help               show this text
  quit               exit (alias: q)";

/// One operator command read from the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Upload(PathBuf),
    View(ViewMode),
    Tab(Listing),
    Refresh,
    Dismiss,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command {0:?}; type `help` for a list")]
    UnknownCommand(String),
    #[error("`{command}` needs an argument")]
    MissingArgument { command: &'static str },
    #[error("unknown view {0:?}; expected search, listings or upload")]
    UnknownView(String),
    #[error("unknown tab {0:?}; expected known or new")]
    UnknownTab(String),
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        // The core drops blank queries, so an empty argument is passed through.
        "search" | "s" => Command::Search(rest.to_string()),
        "upload" | "u" => {
            if rest.is_empty() {
                return Err(InputError::MissingArgument { command: "upload" });
            }
            Command::Upload(PathBuf::from(rest.trim_matches(['"', '\''])))
        }
        "view" | "v" => Command::View(parse_view(rest)?),
        "tab" | "t" => Command::Tab(parse_tab(rest)?),
        "refresh" | "r" => Command::Refresh,
        "dismiss" | "d" => Command::Dismiss,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => return Err(InputError::UnknownCommand(verb.to_string())),
    };
    Ok(Some(command))
}

fn parse_view(arg: &str) -> Result<ViewMode, InputError> {
    if arg.is_empty() {
        return Err(InputError::MissingArgument { command: "view" });
    }
    if let Ok(number) = arg.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(ViewMode::from_index)
            .ok_or_else(|| InputError::UnknownView(arg.to_string()));
    }
    match arg.to_ascii_lowercase().as_str() {
        "search" => Ok(ViewMode::Search),
        "listings" | "sources" => Ok(ViewMode::Listings),
        "upload" | "import" => Ok(ViewMode::Upload),
        _ => Err(InputError::UnknownView(arg.to_string())),
    }
}

fn parse_tab(arg: &str) -> Result<Listing, InputError> {
    match arg.to_ascii_lowercase().as_str() {
        "" => Err(InputError::MissingArgument { command: "tab" }),
        "known" => Ok(Listing::Known),
        "new" => Ok(Listing::New),
        _ => Err(InputError::UnknownTab(arg.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileRejection {
    #[error("{0:?} is not a file")]
    NotAFile(PathBuf),
    #[error("{0:?} is not a CSV file")]
    NotCsv(PathBuf),
}

/// Accepts a single existing `.csv` file, the only kind the import view takes.
pub fn accept_upload_file(path: &Path) -> Result<(), FileRejection> {
    if !path.is_file() {
        return Err(FileRejection::NotAFile(path.to_path_buf()));
    }
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(FileRejection::NotCsv(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!(
            parse_command("  search  ukrainian news sites 2024 "),
            Ok(Some(Command::Search("ukrainian news sites 2024".to_string())))
        );
        assert_eq!(parse_command("s"), Ok(Some(Command::Search(String::new()))));
        assert_eq!(
            parse_command("u \"my sources.csv\""),
            Ok(Some(Command::Upload(PathBuf::from("my sources.csv"))))
        );
        assert_eq!(
            parse_command("view 2"),
            Ok(Some(Command::View(ViewMode::Listings)))
        );
        assert_eq!(
            parse_command("V Upload"),
            Ok(Some(Command::View(ViewMode::Upload)))
        );
        assert_eq!(parse_command("tab new"), Ok(Some(Command::Tab(Listing::New))));
        assert_eq!(parse_command("q"), Ok(Some(Command::Quit)));
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            parse_command("fly away"),
            Err(InputError::UnknownCommand("fly".to_string()))
        );
        assert_eq!(
            parse_command("upload"),
            Err(InputError::MissingArgument { command: "upload" })
        );
        assert_eq!(
            parse_command("view 4"),
            Err(InputError::UnknownView("4".to_string()))
        );
        assert_eq!(
            parse_command("view 0"),
            Err(InputError::UnknownView("0".to_string()))
        );
        assert_eq!(
            parse_command("tab old"),
            Err(InputError::UnknownTab("old".to_string()))
        );
    }

    #[test]
    fn upload_accepts_only_existing_csv_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let csv = dir.path().join("sources.CSV");
        let txt = dir.path().join("notes.txt");
        std::fs::write(&csv, "domain,name,url\n").expect("write csv");
        std::fs::write(&txt, "hello").expect("write txt");

        assert_eq!(accept_upload_file(&csv), Ok(()));
        assert_eq!(accept_upload_file(&txt), Err(FileRejection::NotCsv(txt.clone())));
        assert_eq!(
            accept_upload_file(dir.path()),
            Err(FileRejection::NotAFile(dir.path().to_path_buf()))
        );
    }
}
