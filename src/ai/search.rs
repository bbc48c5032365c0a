use std::time::Duration;

use tracing::info;
use web_time::Instant;

use crate::ai::weights::{DEFAULT_WEIGHTS, WeightTable};
use crate::board::Board;
use crate::game::{GameInstance, MoveSelector};
use crate::types::{Color, Position};

/// Result of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    /// `None` when the root side has no legal move or `depth` is zero.
    pub best: Option<Position>,
    /// Minimax value from the searching color's perspective.
    pub value: i32,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Depth-bounded minimax with alpha-beta pruning.
///
/// Every node owns a cloned [`GameInstance`]; the caller's board is never
/// touched. Moves are tried in playable-cell order and ties keep the first
/// move found, so the result is deterministic.
pub struct Searcher<'a> {
    weights: &'a WeightTable,
    color: Color,
    nodes: u64,
}

impl<'a> Searcher<'a> {
    pub fn new(weights: &'a WeightTable) -> Self {
        Self {
            weights,
            color: Color::White,
            nodes: 0,
        }
    }

    /// Searches the best move for `color` on `board`, `depth` plies deep.
    pub fn search(&mut self, board: &Board, color: Color, depth: u8) -> SearchReport {
        let start_time = Instant::now();
        self.color = color;
        self.nodes = 0;

        let root = GameInstance::from_board(*board, color);
        let (value, best) = self.alphabeta(&root, depth, None);

        let report = SearchReport {
            best,
            value,
            nodes: self.nodes,
            elapsed: start_time.elapsed(),
        };
        info!(
            ?color,
            depth,
            nodes = report.nodes,
            value = report.value,
            best = ?report.best,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "search finished"
        );
        report
    }

    /// Returns the node value and, for nodes with moves, the move reaching it.
    ///
    /// `bound` is the best value the parent has already secured. A maximizing
    /// node stops once its best reaches the bound; a minimizing node once its
    /// best drops to it.
    fn alphabeta(
        &mut self,
        node: &GameInstance,
        depth: u8,
        bound: Option<i32>,
    ) -> (i32, Option<Position>) {
        self.nodes += 1;

        if depth == 0 || node.is_over() {
            return (self.weights.evaluate(node.board(), self.color), None);
        }

        if node.playable_cells().is_empty() {
            let mut passed = node.clone();
            if passed.skip_turn().is_err() {
                return (self.weights.evaluate(node.board(), self.color), None);
            }
            let (value, _) = self.alphabeta(&passed, depth, None);
            return (value, None);
        }

        let to_move = node.to_move();
        // Polarity follows the side to move, so a forced pass keeps it.
        let maximizing = to_move == self.color;
        let mut best_value = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_move: Option<Position> = None;

        for &mv in node.playable_cells() {
            let mut child = node.clone();
            if child.advance(mv.col as i32, mv.row as i32, to_move).is_err() {
                continue;
            }

            // A forced pass leaves the child on our side; our bound does not apply to it.
            let child_bound = match best_move {
                Some(_) if child.to_move() != to_move => Some(best_value),
                _ => None,
            };
            let (value, _) = self.alphabeta(&child, depth - 1, child_bound);

            if best_move.is_none() || is_better_value(value, best_value, maximizing) {
                best_value = value;
                best_move = Some(mv);

                if let Some(bound) = bound
                    && reaches_bound(best_value, bound, maximizing)
                {
                    break;
                }
            }
        }

        (best_value, best_move)
    }
}

fn is_better_value(value: i32, best_value: i32, maximizing: bool) -> bool {
    if maximizing {
        value > best_value
    } else {
        value < best_value
    }
}

fn reaches_bound(best_value: i32, bound: i32, maximizing: bool) -> bool {
    if maximizing {
        best_value >= bound
    } else {
        best_value <= bound
    }
}

/// Best move for `color` with the default weights, `None` when there is none.
pub fn select_move(board: &Board, depth: u8, color: Color) -> Option<Position> {
    Searcher::new(&DEFAULT_WEIGHTS).search(board, color, depth).best
}

/// [`MoveSelector`] backed by [`Searcher`].
#[derive(Debug, Clone, Default)]
pub struct AlphaBetaSelector {
    weights: WeightTable,
}

impl AlphaBetaSelector {
    pub fn with_weights(weights: WeightTable) -> Self {
        Self { weights }
    }
}

impl MoveSelector for AlphaBetaSelector {
    fn select_move(&self, board: &Board, color: Color, depth: u8) -> Option<Position> {
        Searcher::new(&self.weights).search(board, color, depth).best
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Level, Metadata, Subscriber};

    use super::*;
    use crate::types::{COLUMNS, Cell, ROWS};

    #[derive(Default)]
    struct LevelCounts {
        info: AtomicUsize,
        debug: AtomicUsize,
    }

    impl LevelCounts {
        fn get(&self) -> (usize, usize) {
            (self.info.load(Ordering::SeqCst), self.debug.load(Ordering::SeqCst))
        }
    }

    /// Counts INFO and DEBUG events emitted on the current thread.
    struct CountingSubscriber(Arc<LevelCounts>);

    impl Subscriber for CountingSubscriber {
        fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _span: &Attributes<'_>) -> Id {
            Id::from_u64(1)
        }

        fn record(&self, _span: &Id, _values: &Record<'_>) {}

        fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

        fn event(&self, event: &Event<'_>) {
            let level = *event.metadata().level();
            if level == Level::INFO {
                self.0.info.fetch_add(1, Ordering::SeqCst);
            } else if level == Level::DEBUG {
                self.0.debug.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn enter(&self, _span: &Id) {}

        fn exit(&self, _span: &Id) {}
    }

    fn count_events(f: impl FnOnce()) -> (usize, usize) {
        let counts = Arc::new(LevelCounts::default());
        tracing::subscriber::with_default(CountingSubscriber(counts.clone()), f);
        counts.get()
    }

    fn p(col: u8, row: u8) -> Position {
        Position { col, row }
    }

    fn board_with(white: &[(u8, u8)], black: &[(u8, u8)]) -> Board {
        let mut cells = [[Cell::Empty; ROWS]; COLUMNS];
        for &(col, row) in white {
            cells[col as usize][row as usize] = Cell::White;
        }
        for &(col, row) in black {
            cells[col as usize][row as usize] = Cell::Black;
        }
        Board::from_cells(cells)
    }

    /// Plain minimax without pruning, same pass and tie rules.
    fn minimax(
        weights: &WeightTable,
        node: &GameInstance,
        depth: u8,
        color: Color,
        nodes: &mut u64,
    ) -> (i32, Option<Position>) {
        *nodes += 1;
        if depth == 0 || node.is_over() {
            return (weights.evaluate(node.board(), color), None);
        }
        if node.playable_cells().is_empty() {
            let mut passed = node.clone();
            passed.pass().unwrap();
            return (minimax(weights, &passed, depth, color, nodes).0, None);
        }

        let maximizing = node.to_move() == color;
        let mut best: Option<(i32, Position)> = None;
        for &mv in node.playable_cells() {
            let mut child = node.clone();
            child
                .play_move(mv.col as i32, mv.row as i32, node.to_move())
                .unwrap();
            let (value, _) = minimax(weights, &child, depth - 1, color, nodes);
            let better = match best {
                None => true,
                Some((best_value, _)) => is_better_value(value, best_value, maximizing),
            };
            if better {
                best = Some((value, mv));
            }
        }
        let (value, mv) = best.unwrap();
        (value, Some(mv))
    }

    fn played_out(moves: &[(i32, i32)]) -> GameInstance {
        let mut game = GameInstance::new();
        for &(col, row) in moves {
            let color = game.to_move();
            game.play_move(col, row, color).unwrap();
        }
        game
    }

    #[test]
    fn depth_one_picks_the_highest_immediate_evaluation() {
        let report = Searcher::new(&DEFAULT_WEIGHTS).search(&Board::new(), Color::White, 1);

        // (2,4)=49, (3,5)=48, (4,2)=50, (5,3)=51.
        assert_eq!(report.best, Some(p(5, 3)));
        assert_eq!(report.value, 51);
        assert_eq!(report.nodes, 5);
    }

    #[test]
    fn equal_evaluations_keep_the_first_move_in_cell_order() {
        let flat = WeightTable::from_matrix([[1; ROWS]; COLUMNS]);

        let report = Searcher::new(&flat).search(&Board::new(), Color::White, 1);

        assert_eq!(report.best, Some(p(2, 4)));
        assert_eq!(report.value, 4);
    }

    #[test]
    fn corner_is_preferred_even_when_enumerated_last() {
        let board = board_with(&[(3, 3), (6, 4)], &[(2, 3), (7, 5)]);
        assert_eq!(board.playable_cells(Color::White), vec![p(1, 3), p(8, 6)]);

        assert_eq!(select_move(&board, 1, Color::White), Some(p(8, 6)));
    }

    #[test]
    fn zero_depth_returns_static_evaluation_without_a_move() {
        let report = Searcher::new(&DEFAULT_WEIGHTS).search(&Board::new(), Color::White, 0);

        assert_eq!(report.best, None);
        assert_eq!(report.value, 25);
        assert_eq!(report.nodes, 1);
    }

    #[test]
    fn root_without_legal_move_yields_no_move() {
        // White is to move but only black can play.
        let board = board_with(&[(1, 2), (2, 3), (7, 6)], &[(0, 2), (8, 6)]);
        assert!(board.playable_cells(Color::White).is_empty());

        let best = select_move(&board, 3, Color::White);

        assert_eq!(best, None);
        assert_eq!(Position::to_pair(best), (-1, -1));
    }

    #[test]
    fn finished_position_yields_no_move() {
        let board = board_with(&[(0, 0)], &[(8, 6)]);

        let report = Searcher::new(&DEFAULT_WEIGHTS).search(&board, Color::White, 4);

        assert_eq!(report.best, None);
        assert_eq!(report.value, 100);
    }

    #[test]
    fn search_is_deterministic() {
        let board = *played_out(&[(5, 3), (5, 4)]).board();

        let first = select_move(&board, 4, Color::White);
        let second = select_move(&board, 4, Color::White);

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn search_leaves_the_callers_board_untouched() {
        let game = played_out(&[(5, 3)]);
        let before = game.clone();

        let best = select_move(game.board(), 3, Color::Black);

        assert_eq!(game, before);
        let mv = best.unwrap();
        assert!(game.is_playable(mv.col as i32, mv.row as i32, Color::Black));
    }

    #[test]
    fn pruning_matches_plain_minimax() {
        let positions = [
            played_out(&[]),
            played_out(&[(5, 3)]),
            played_out(&[(5, 3), (5, 4), (4, 5)]),
            GameInstance::from_board(
                board_with(&[(1, 2), (2, 3), (7, 6)], &[(0, 2), (8, 6)]),
                Color::Black,
            ),
        ];

        for game in &positions {
            let color = game.to_move();
            for depth in 1..=4 {
                let mut plain_nodes = 0;
                let expected = minimax(&DEFAULT_WEIGHTS, game, depth, color, &mut plain_nodes);

                let report = Searcher::new(&DEFAULT_WEIGHTS).search(game.board(), color, depth);

                assert_eq!((report.value, report.best), expected, "depth {depth}");
                assert!(report.nodes <= plain_nodes);
            }
        }
    }

    #[test]
    fn alpha_beta_selector_uses_its_own_weights() {
        // Weights that favour (1,3) over the corner flip the choice.
        let mut matrix = [[0; ROWS]; COLUMNS];
        matrix[1][3] = 50;
        let selector = AlphaBetaSelector::with_weights(WeightTable::from_matrix(matrix));
        let board = board_with(&[(3, 3), (6, 4)], &[(2, 3), (7, 5)]);

        assert_eq!(selector.select_move(&board, Color::White, 1), Some(p(1, 3)));
        assert_eq!(
            AlphaBetaSelector::default().select_move(&board, Color::White, 1),
            Some(p(8, 6))
        );
    }

    #[test]
    fn search_logs_only_its_summary() {
        let game = played_out(&[(5, 3)]);
        let (info, debug) = count_events(|| {
            select_move(game.board(), 3, Color::Black);
        });
        assert_eq!((info, debug), (1, 0));

        // Every line of this search ends the game.
        let ending = board_with(&[(1, 0)], &[(0, 0)]);
        let (info, debug) = count_events(|| {
            select_move(&ending, 3, Color::Black);
        });
        assert_eq!((info, debug), (1, 0));

        // Stuck root: the search passes for white without logging it.
        let stuck = board_with(&[(1, 2), (2, 3), (7, 6)], &[(0, 2), (8, 6)]);
        let (info, debug) = count_events(|| {
            select_move(&stuck, 2, Color::White);
        });
        assert_eq!((info, debug), (1, 0));
    }

    #[test]
    fn live_moves_still_log_transitions() {
        let mut game = GameInstance::from_board(board_with(&[(1, 0)], &[(0, 0)]), Color::Black);

        let (info, debug) = count_events(|| {
            game.play_move(2, 0, Color::Black).unwrap();
        });

        // "move played" and "game over".
        assert_eq!((info, debug), (1, 1));
    }
}
