//! Legal move generation.
//!
//! Generates the set of legal landing cells for the current board, plus the
//! orderings search relies on: center-out for alpha-beta, and a proximity
//! filter that keeps candidate counts manageable on large free-placement
//! boards.

use crate::board::{Board, Move};

/// Returns every legal landing cell, in deterministic row-major order.
///
/// Gravity mode yields at most one cell per column (the drop row); free
/// placement yields every empty cell.
pub fn legal_cells(board: &Board) -> Vec<(usize, usize)> {
    if board.gravity() {
        (0..board.cols())
            .filter_map(|col| board.drop_row(col).map(|row| (row, col)))
            .collect()
    } else {
        let mut cells = Vec::new();
        for row in 0..board.rows() {
            for col in 0..board.cols() {
                if board.cell(row, col).is_none() {
                    cells.push((row, col));
                }
            }
        }
        cells
    }
}

/// Converts a landing cell into the caller-facing move for this board's mode.
pub fn cell_to_move(board: &Board, row: usize, col: usize) -> Move {
    if board.gravity() {
        Move::Drop { col }
    } else {
        Move::Place { row, col }
    }
}

/// Orders cells center-out, ties broken by row-major index.
///
/// Central cells touch the most potential lines, so trying them first gives
/// alpha-beta its cutoffs early.
pub fn order_center_out(board: &Board, cells: &mut [(usize, usize)]) {
    let rows = board.rows();
    let cols = board.cols();
    // Doubled coordinates keep the center exact on even-sized boards.
    cells.sort_by_key(|&(r, c)| {
        let dr = (2 * r) as isize - (rows - 1) as isize;
        let dc = (2 * c) as isize - (cols - 1) as isize;
        (dr * dr + dc * dc, r * cols + c)
    });
}

/// Legal cells restricted to the neighborhood of existing stones.
///
/// On a 15x15 free-placement board most empty cells are tactically inert;
/// search only considers cells within `radius` of a stone. Falls back to the
/// single center cell on an empty board, and to the full legal set in
/// gravity mode (at most one cell per column already).
pub fn candidate_cells(board: &Board, radius: usize) -> Vec<(usize, usize)> {
    if board.gravity() {
        return legal_cells(board);
    }
    if board.stone_count() == 0 {
        return vec![(board.rows() / 2, board.cols() / 2)];
    }

    let r = radius as isize;
    let mut cells = Vec::new();
    for row in 0..board.rows() {
        for col in 0..board.cols() {
            if board.cell(row, col).is_some() {
                continue;
            }
            let mut near_stone = false;
            'scan: for dr in -r..=r {
                for dc in -r..=r {
                    let nr = row as isize + dr;
                    let nc = col as isize + dc;
                    if nr < 0 || nc < 0 {
                        continue;
                    }
                    let (nr, nc) = (nr as usize, nc as usize);
                    if board.in_bounds(nr, nc) && board.cell(nr, nc).is_some() {
                        near_stone = true;
                        break 'scan;
                    }
                }
            }
            if near_stone {
                cells.push((row, col));
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Player;

    #[test]
    fn gravity_legal_cells_are_drop_rows() {
        let mut board = Board::new(6, 7, true).unwrap();
        board.set(5, 3, Some(Player::A)).unwrap();
        let cells = legal_cells(&board);
        assert_eq!(cells.len(), 7);
        assert!(cells.contains(&(5, 0)));
        assert!(cells.contains(&(4, 3)));
    }

    #[test]
    fn gravity_skips_full_columns() {
        let mut board = Board::new(6, 7, true).unwrap();
        for r in 0..6 {
            board.set(r, 0, Some(Player::B)).unwrap();
        }
        let cells = legal_cells(&board);
        assert_eq!(cells.len(), 6);
        assert!(cells.iter().all(|&(_, c)| c != 0));
    }

    #[test]
    fn free_placement_legal_cells_are_all_empties() {
        let mut board = Board::new(3, 3, false).unwrap();
        board.set(1, 1, Some(Player::A)).unwrap();
        assert_eq!(legal_cells(&board).len(), 8);
    }

    #[test]
    fn center_out_puts_middle_column_first() {
        let board = Board::new(6, 7, true).unwrap();
        let mut cells = legal_cells(&board);
        order_center_out(&board, &mut cells);
        assert_eq!(cells[0].1, 3);
    }

    #[test]
    fn candidates_on_empty_board_is_center() {
        let board = Board::new(15, 15, false).unwrap();
        assert_eq!(candidate_cells(&board, 2), vec![(7, 7)]);
    }

    #[test]
    fn candidates_cluster_around_stones() {
        let mut board = Board::new(15, 15, false).unwrap();
        board.set(7, 7, Some(Player::A)).unwrap();
        let cells = candidate_cells(&board, 1);
        assert_eq!(cells.len(), 8);
        assert!(cells
            .iter()
            .all(|&(r, c)| r.abs_diff(7) <= 1 && c.abs_diff(7) <= 1));
    }

    #[test]
    fn cell_to_move_respects_mode() {
        let gravity = Board::new(6, 7, true).unwrap();
        let free = Board::new(15, 15, false).unwrap();
        assert_eq!(cell_to_move(&gravity, 5, 3), Move::Drop { col: 3 });
        assert_eq!(cell_to_move(&free, 7, 7), Move::Place { row: 7, col: 7 });
    }
}
