use crate::core::{Board, Deadline, Mark, Move};
use crate::player::PlayerController;
use crossterm::style::Stylize;
use std::io::{self, BufRead, Write};

pub struct TerminalController {
    mark: Mark,
    name: String,
}

impl TerminalController {
    pub fn new(mark: Mark, name: &str) -> Self {
        Self {
            mark,
            name: name.to_string(),
        }
    }

    fn prompt(&self) -> io::Result<()> {
        let mut out = io::stdout();
        write!(
            out,
            "Player {} ({}), choose a cell number [q: resign]: ",
            self.mark.index() + 1,
            self.mark
        )?;
        out.flush()
    }
}

/// 入力行の解釈結果
#[derive(Debug, PartialEq, Eq)]
pub enum InputCommand {
    Cell(Move),
    Resign,
    Invalid(String),
}

pub fn parse_input(line: &str, legal_moves: &[Move]) -> InputCommand {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("q") {
        return InputCommand::Resign;
    }
    match trimmed.parse::<usize>() {
        Ok(cell) if legal_moves.contains(&Move(cell)) => InputCommand::Cell(Move(cell)),
        Ok(cell) => InputCommand::Invalid(format!(
            "Cell {} is occupied or off the board. Please try again.",
            cell
        )),
        Err(_) => InputCommand::Invalid("Invalid cell number. Please try again.".to_string()),
    }
}

impl PlayerController for TerminalController {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(
        &self,
        _board: &mut Board,
        legal_moves: &[Move],
        _deadline: &Deadline,
    ) -> Option<Move> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            if self.prompt().is_err() {
                return None;
            }
            // EOF も投了扱い
            let line = match lines.next() {
                Some(Ok(line)) => line,
                _ => return None,
            };
            match parse_input(&line, legal_moves) {
                InputCommand::Cell(mv) => return Some(mv),
                InputCommand::Resign => return None,
                InputCommand::Invalid(msg) => println!("{}", msg.red()),
            }
        }
    }

    fn is_local(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cells_and_commands() {
        let legal = vec![Move(1), Move(4), Move(9)];
        assert_eq!(parse_input(" 4\n", &legal), InputCommand::Cell(Move(4)));
        assert_eq!(parse_input("Q", &legal), InputCommand::Resign);
        assert!(matches!(parse_input("5", &legal), InputCommand::Invalid(_)));
        assert!(matches!(parse_input("10", &legal), InputCommand::Invalid(_)));
        assert!(matches!(parse_input("abc", &legal), InputCommand::Invalid(_)));
    }
}
