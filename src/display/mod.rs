use crate::core::{Board, Mark, Move, Position};
use crate::game::SessionStats;
use crossterm::{cursor, execute, style::Stylize, terminal};
use std::io::{self, stdout, Write};
use std::time::Duration;

const INDENT: usize = 10;

pub struct DisplayState {
    pub names: [String; 2],
    pub status_msg: Option<String>,
    pub last_move: Option<Move>,
    /// 描画前に画面をクリアするか
    pub clear_screen: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            names: ["Player 1".to_string(), "Player 2".to_string()],
            status_msg: None,
            last_move: None,
            clear_screen: true,
        }
    }
}

impl DisplayState {
    pub fn new(names: [String; 2]) -> Self {
        Self {
            names,
            ..Self::default()
        }
    }
}

/// セル番号の最大桁数 + 1
pub fn cell_width(rows: usize, cols: usize) -> usize {
    let total = rows * cols;
    total.to_string().len() + 1
}

pub fn render_board(board: &Board, state: &DisplayState) -> io::Result<()> {
    let mut out = stdout();
    if state.clear_screen {
        execute!(
            out,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
    }
    write_board(&mut out, board, state)?;
    out.flush()
}

pub fn write_board<W: Write>(out: &mut W, board: &Board, state: &DisplayState) -> io::Result<()> {
    writeln!(out, "=== Tic-Tac-Toe ===")?;
    write_names(out, &state.names)?;
    match &state.status_msg {
        Some(msg) => writeln!(out, "{}", msg.clone().bold().yellow())?,
        None => writeln!(out)?,
    }
    writeln!(out, "\nSelect a number to place your marks!\n")?;

    let width = cell_width(board.rows, board.cols);
    let pad = " ".repeat(INDENT);

    for row in 0..board.rows {
        write!(out, "{}", pad)?;
        for col in 0..board.cols {
            let pos = Position::new(row, col);
            let mv = Move::from_position(pos, board.cols);
            let is_last = state.last_move == Some(mv);

            match board.get(pos) {
                None => write!(out, "{:>width$}", mv.cell(), width = width)?,
                Some(mark) => {
                    let text = format!("{:>width$}", mark.display_char(), width = width);
                    let styled = match mark {
                        Mark::X => text.cyan(),
                        Mark::O => text.magenta(),
                    };
                    if is_last {
                        write!(out, "{}", styled.bold())?;
                    } else {
                        write!(out, "{}", styled)?;
                    }
                }
            }

            if col < board.cols - 1 {
                write!(out, " | ")?;
            }
        }
        writeln!(out)?;
        if row < board.rows - 1 {
            writeln!(out, "{}{}", pad, "-".repeat(board.cols * (width + 3) - 1))?;
        }
    }
    writeln!(out)
}

fn write_names<W: Write>(out: &mut W, names: &[String; 2]) -> io::Result<()> {
    writeln!(out)?;
    for (i, name) in names.iter().enumerate() {
        writeln!(out, "Player {}: {}", i + 1, name)?;
    }
    Ok(())
}

pub fn write_statistics<W: Write>(
    out: &mut W,
    stats: &SessionStats,
    elapsed: Duration,
) -> io::Result<()> {
    writeln!(out, "Game duration: {:.6} seconds", elapsed.as_secs_f64())?;
    writeln!(out, "Game Count: {}", stats.games_played)?;
    writeln!(out, "Draw Count: {}", stats.draws)?;
    for (i, wins) in stats.wins.iter().enumerate() {
        writeln!(out, "Player {} Win Count: {}", i + 1, wins)?;
    }
    Ok(())
}

pub fn render_statistics(stats: &SessionStats, elapsed: Duration) -> io::Result<()> {
    let mut out = stdout();
    write_statistics(&mut out, stats, elapsed)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::GameOutcome;

    #[test]
    fn width_grows_with_cell_count() {
        assert_eq!(cell_width(3, 3), 2);
        assert_eq!(cell_width(4, 4), 3);
        assert_eq!(cell_width(10, 10), 4);
        assert_eq!(cell_width(100, 100), 6);
    }

    #[test]
    fn empty_cells_show_their_numbers() {
        let board = Board::from_rows(&["X . .", ". O .", ". . ."]).unwrap();
        let mut buf = Vec::new();
        write_board(&mut buf, &board, &DisplayState::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Player 1: Player 1"));
        assert!(text.contains(" 2 |  3"));
        assert!(text.contains(" 9"));
        assert!(!text.contains(" 5 "));
        assert!(text.contains(&"-".repeat(14)));
    }

    #[test]
    fn statistics_list_every_player() {
        let mut stats = SessionStats::default();
        stats.record(GameOutcome::Win(Mark::O), 7);
        stats.record(GameOutcome::Draw, 9);
        let mut buf = Vec::new();
        write_statistics(&mut buf, &stats, Duration::from_millis(1500)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Game Count: 2"));
        assert!(text.contains("Draw Count: 1"));
        assert!(text.contains("Player 2 Win Count: 1"));
        assert!(text.contains("Game duration: 1.500000 seconds"));
    }
}
