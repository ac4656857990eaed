//! Writing solved grids next to their puzzle files.
//!
//! A solved puzzle `name.bff` produces `name_answer.txt` in the same
//! directory: one line per coarse row, symbols joined by tabs.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::board::Board;

/// The answer-file path for a puzzle file.
pub fn answer_path(puzzle: &Path) -> PathBuf {
    let stem = puzzle
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("puzzle");
    puzzle.with_file_name(format!("{stem}_answer.txt"))
}

/// Writes the solved grid beside the puzzle file, returning the path.
pub fn save_answer(puzzle: &Path, grid: &Board) -> std::io::Result<PathBuf> {
    let path = answer_path(puzzle);
    let mut file = File::create(&path)?;
    for row in 0..grid.rows() {
        let symbols: Vec<String> = grid
            .row(row)
            .iter()
            .map(|cell| cell.symbol().to_string())
            .collect();
        writeln!(file, "{}", symbols.join("\t"))?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BlockKind, Cell};

    #[test]
    fn test_answer_path_replaces_extension() {
        assert_eq!(
            answer_path(Path::new("puzzles/yarn_5.bff")),
            Path::new("puzzles/yarn_5_answer.txt")
        );
    }

    #[test]
    fn test_save_answer_writes_tab_joined_rows() {
        let dir = tempfile::tempdir().unwrap();
        let puzzle = dir.path().join("tiny.bff");
        let grid = Board::new(
            2,
            2,
            vec![
                Cell::Open,
                Cell::Block(BlockKind::Reflect),
                Cell::Blocked,
                Cell::Block(BlockKind::Opaque),
            ],
        );

        let path = save_answer(&puzzle, &grid).unwrap();
        assert_eq!(path, dir.path().join("tiny_answer.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "o\tA\nx\tB\n");
    }
}
