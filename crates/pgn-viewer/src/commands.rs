//! Keyboard commands typed at the viewer prompt.

use std::str::FromStr;

use pgn_core::{BlockId, MoveId};

use crate::error::ViewerError;

pub const HELP: &str = "\
Navigation:   left | right | home | end | go <move number>
Move list:    click <move id> | toggle <variation id>
Exercises:    list | search [term] | select <n> | close
Other:        board | state | download | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Previous,
    Next,
    Reset,
    End,
    /// Zero-based mainline ply.
    GoToMove(usize),
    Click(MoveId),
    Toggle(BlockId),
    List,
    Search(String),
    /// One-based position in the current list.
    Select(usize),
    Close,
    Board,
    State,
    Download,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = ViewerError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((line, ""));
        let unknown = || ViewerError::UnknownCommand(line.to_string());
        let number = || rest.parse::<usize>().map_err(|_| unknown());

        let command = match word.to_ascii_lowercase().as_str() {
            "left" | "p" | "prev" => Command::Previous,
            "right" | "n" | "next" => Command::Next,
            "home" | "reset" => Command::Reset,
            "end" => Command::End,
            "go" => match number()? {
                0 => Command::Reset,
                n => Command::GoToMove(n - 1),
            },
            "click" => Command::Click(MoveId(number()?)),
            "toggle" => Command::Toggle(BlockId(number()?)),
            "list" | "ls" => Command::List,
            "search" | "/" => Command::Search(rest.to_string()),
            "select" => match number()? {
                0 => return Err(unknown()),
                n => Command::Select(n),
            },
            "close" => Command::Close,
            "board" => Command::Board,
            "state" => Command::State,
            "download" => Command::Download,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            _ => return Err(unknown()),
        };
        Ok(command)
    }
}
