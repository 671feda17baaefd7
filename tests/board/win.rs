use connect_four::board::{Color, GameOutcome};
use connect_four::controller::TurnController;
use connect_four::grid::Grid;
use connect_four::win::check_win;

/// Play `columns` from an empty 7-column grid, the game must be undecided until the last move.
fn play_out(columns: &[usize]) -> TurnController {
    let mut controller = TurnController::new(Grid::with_columns(7).unwrap());
    let (last, rest) = columns.split_last().unwrap();

    for &column in rest {
        let result = controller.submit_move(column);
        assert!(result.applied, "column {} rejected", column);
        assert_eq!(GameOutcome::InProgress, result.outcome, "decided early at column {}", column);
    }
    controller.submit_move(*last);
    controller
}

fn mirror(columns: &[usize]) -> Vec<usize> {
    columns.iter().map(|&c| 6 - c).collect()
}

const DIAGONAL: [usize; 11] = [0, 1, 1, 2, 2, 3, 2, 3, 3, 6, 3];

#[test]
fn vertical() {
    let controller = play_out(&[3, 4, 3, 4, 3, 4, 3]);
    assert_eq!(GameOutcome::Win(Color::Yellow), controller.outcome());
}

#[test]
fn horizontal_second_player() {
    let controller = play_out(&[0, 2, 0, 3, 6, 4, 6, 5]);
    assert_eq!(GameOutcome::Win(Color::Red), controller.outcome());
}

#[test]
fn diagonal_rising() {
    let controller = play_out(&DIAGONAL);
    assert_eq!(GameOutcome::Win(Color::Yellow), controller.outcome());

    let grid = controller.grid();
    for i in 0..4 {
        assert_eq!(Some(Color::Yellow), grid.cell(5 - i, i));
    }
}

#[test]
fn diagonal_falling() {
    let controller = play_out(&mirror(&DIAGONAL));
    assert_eq!(GameOutcome::Win(Color::Yellow), controller.outcome());

    let grid = controller.grid();
    for i in 0..4 {
        assert_eq!(Some(Color::Yellow), grid.cell(5 - i, 6 - i));
    }
}

#[test]
fn every_cell_of_the_line_wins() {
    let controller = play_out(&DIAGONAL);
    let grid = controller.grid();

    for i in 0..4 {
        assert!(check_win(grid, 5 - i, i, Color::Yellow));
    }
    // the red bottom row has only three in a row
    assert!(!check_win(grid, 5, 2, Color::Red));
}

#[test]
fn three_is_not_enough() {
    let controller = play_out(&[0, 0, 1, 1, 2]);
    assert_eq!(GameOutcome::InProgress, controller.outcome());
    assert!(check_win(controller.grid(), 5, 3, Color::Yellow));
    assert!(!check_win(controller.grid(), 4, 3, Color::Yellow));
}
