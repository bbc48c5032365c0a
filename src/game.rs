use tracing::{debug, info};

use crate::ai::search::AlphaBetaSelector;
use crate::board::Board;
use crate::config::EngineConfig;
use crate::error::{ConfigError, MoveError, SnapshotError};
use crate::types::{Color, GameResult, GameSnapshot, MoveOutcome, Position};

pub trait MoveSelector: Send + Sync {
    fn select_move(&self, board: &Board, color: Color, depth: u8) -> Option<Position>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalMoveSelector;

impl MoveSelector for FirstLegalMoveSelector {
    fn select_move(&self, board: &Board, color: Color, _depth: u8) -> Option<Position> {
        board.playable_cells(color).first().copied()
    }
}

/// Live game: grid, side to move, playable cells, scores and terminal flag.
///
/// Every successful mutation recomputes the playable cells and the scores
/// before returning. Cloning yields a fully independent game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInstance {
    board: Board,
    to_move: Color,
    playable: Vec<Position>,
    is_over: bool,
    white_score: u8,
    black_score: u8,
}

impl GameInstance {
    /// Starting position, white to move.
    pub fn new() -> Self {
        Self::from_board(Board::new(), Color::White)
    }

    /// Resets to the starting position.
    pub fn new_game(&mut self) {
        *self = Self::new();
    }

    /// Builds an independent game from a grid and the side to move.
    ///
    /// The side to move is kept even when it has no legal move; call
    /// [`GameInstance::pass`] in that case. The game is over when neither
    /// side can move.
    pub fn from_board(board: Board, to_move: Color) -> Self {
        let playable = board.playable_cells(to_move);
        let is_over = playable.is_empty() && board.playable_cells(to_move.opponent()).is_empty();
        let mut game = Self {
            board,
            to_move,
            playable,
            is_over,
            white_score: 0,
            black_score: 0,
        };
        game.update_scores();
        game
    }

    /// Restores a saved game, checking the stored derived values against the grid.
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Result<Self, SnapshotError> {
        let game = Self::from_board(
            Board::from_cells(snapshot.cells),
            Color::from_is_white(snapshot.white_turn),
        );

        for (color, stored) in [
            (Color::White, snapshot.white_score),
            (Color::Black, snapshot.black_score),
        ] {
            let actual = game.score(color);
            if stored != actual {
                return Err(SnapshotError::ScoreMismatch {
                    color,
                    stored,
                    actual,
                });
            }
        }
        if snapshot.is_over != game.is_over {
            return Err(SnapshotError::TerminalFlagMismatch {
                stored: snapshot.is_over,
                actual: game.is_over,
            });
        }

        Ok(game)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            cells: *self.board.cells(),
            white_turn: self.to_move.is_white(),
            white_score: self.white_score,
            black_score: self.black_score,
            is_over: self.is_over,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn white_turn(&self) -> bool {
        self.to_move.is_white()
    }

    /// Legal cells for the side to move, column-major then row-minor.
    pub fn playable_cells(&self) -> &[Position] {
        &self.playable
    }

    pub fn is_over(&self) -> bool {
        self.is_over
    }

    pub fn score(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white_score,
            Color::Black => self.black_score,
        }
    }

    /// Returns `false` for out-of-range cells.
    pub fn is_empty(&self, col: i32, row: i32) -> bool {
        Position::new(col, row).is_some_and(|pos| self.board.is_empty(pos))
    }

    /// Legality is scoped to the current turn: the wrong color is never playable.
    pub fn is_playable(&self, col: i32, row: i32, color: Color) -> bool {
        !self.is_over
            && color == self.to_move
            && Position::new(col, row).is_some_and(|pos| self.playable.contains(&pos))
    }

    /// Plays `color` at `(col, row)`, flips, and hands the turn over.
    ///
    /// When the opponent then has no legal move, `color` plays again (a
    /// forced pass); when neither side can move the game is over.
    pub fn play_move(
        &mut self,
        col: i32,
        row: i32,
        color: Color,
    ) -> Result<MoveOutcome, MoveError> {
        let outcome = self.advance(col, row, color)?;

        debug!(
            ?color,
            col = outcome.played.col,
            row = outcome.played.row,
            flipped = outcome.flipped.len(),
            "move played"
        );
        if outcome.opponent_passed {
            debug!(passed = ?color.opponent(), "forced pass");
        }
        if outcome.is_over {
            info!(
                white = outcome.white_score,
                black = outcome.black_score,
                "game over"
            );
        }
        Ok(outcome)
    }

    /// [`GameInstance::play_move`] without logging, for search nodes.
    pub(crate) fn advance(
        &mut self,
        col: i32,
        row: i32,
        color: Color,
    ) -> Result<MoveOutcome, MoveError> {
        let pos = Position::new(col, row).ok_or(MoveError::OutOfBounds { col, row })?;
        if self.is_over {
            return Err(MoveError::GameOver);
        }
        if color != self.to_move {
            return Err(MoveError::WrongTurn(color));
        }
        if !self.playable.contains(&pos) {
            return Err(MoveError::NotPlayable {
                col: pos.col,
                row: pos.row,
            });
        }

        let flipped = self.board.place(pos, color);

        let opponent = color.opponent();
        self.to_move = opponent;
        self.playable = self.board.playable_cells(opponent);

        let mut opponent_passed = false;
        if self.playable.is_empty() {
            self.playable = self.board.playable_cells(color);
            if self.playable.is_empty() {
                self.is_over = true;
            } else {
                self.to_move = color;
                opponent_passed = true;
            }
        }

        self.update_scores();

        Ok(MoveOutcome {
            played: pos,
            color,
            flipped,
            opponent_passed,
            white_turn: self.to_move.is_white(),
            white_score: self.white_score,
            black_score: self.black_score,
            is_over: self.is_over,
        })
    }

    /// Hands the turn over without placing a disk. Only allowed when the side
    /// to move has no legal move, which after [`GameInstance::play_move`] only
    /// happens in positions built with [`GameInstance::from_board`].
    pub fn pass(&mut self) -> Result<(), MoveError> {
        let passed = self.to_move;
        self.skip_turn()?;
        debug!(?passed, "pass");
        Ok(())
    }

    /// [`GameInstance::pass`] without logging.
    pub(crate) fn skip_turn(&mut self) -> Result<(), MoveError> {
        if self.is_over {
            return Err(MoveError::GameOver);
        }
        if !self.playable.is_empty() {
            return Err(MoveError::CannotPass);
        }

        self.to_move = self.to_move.opponent();
        self.playable = self.board.playable_cells(self.to_move);
        if self.playable.is_empty() {
            self.is_over = true;
        }
        Ok(())
    }

    pub fn to_game_result(&self) -> GameResult {
        let winner = if self.white_score > self.black_score {
            Some(Color::White)
        } else if self.black_score > self.white_score {
            Some(Color::Black)
        } else {
            None
        };
        GameResult {
            winner,
            white_score: self.white_score,
            black_score: self.black_score,
        }
    }

    fn update_scores(&mut self) {
        self.white_score = self.board.count(Color::White);
        self.black_score = self.board.count(Color::Black);
    }
}

impl Default for GameInstance {
    fn default() -> Self {
        Self::new()
    }
}

/// Human-versus-engine game: the shell forwards clicks to
/// [`Match::play_human`] and lets the engine answer with
/// [`Match::play_engine_turns`].
pub struct Match {
    game: GameInstance,
    config: EngineConfig,
    selector: Box<dyn MoveSelector>,
}

impl Match {
    pub fn new(
        config: EngineConfig,
        selector: Box<dyn MoveSelector>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            game: GameInstance::new(),
            config,
            selector,
        })
    }

    pub fn new_with_default_selector(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::new(config, Box::new(AlphaBetaSelector::default()))
    }

    pub fn game(&self) -> &GameInstance {
        &self.game
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn new_game(&mut self) {
        self.game.new_game();
    }

    /// Replaces the running game with a saved one.
    pub fn restore(&mut self, snapshot: &GameSnapshot) -> Result<(), SnapshotError> {
        self.game = GameInstance::from_snapshot(snapshot)?;
        Ok(())
    }

    pub fn is_engine_turn(&self) -> bool {
        !self.game.is_over() && self.game.to_move() == self.config.engine_color
    }

    /// Plays any color; shells with two human players use this directly.
    pub fn play_move(
        &mut self,
        col: i32,
        row: i32,
        color: Color,
    ) -> Result<MoveOutcome, MoveError> {
        self.game.play_move(col, row, color)
    }

    pub fn play_human(&mut self, col: i32, row: i32) -> Result<MoveOutcome, MoveError> {
        self.play_move(col, row, self.config.human_color())
    }

    /// Passes for the side to move. Only a restored game can leave a side
    /// stuck without a move, since forced passes are otherwise automatic.
    pub fn pass(&mut self) -> Result<(), MoveError> {
        self.game.pass()
    }

    /// Plays one engine move.
    pub fn do_engine_move(&mut self) -> Result<MoveOutcome, MoveError> {
        if self.game.is_over() {
            return Err(MoveError::GameOver);
        }
        let color = self.config.engine_color;
        if self.game.to_move() != color {
            return Err(MoveError::WrongTurn(color));
        }

        let selected = self
            .selector
            .select_move(self.game.board(), color, self.config.depth)
            .ok_or(MoveError::NoLegalMove(color))?;

        self.game
            .play_move(selected.col as i32, selected.row as i32, color)
    }

    /// Plays engine moves until the human is to move or the game ends.
    /// Several moves are played in a row when the human is forced to pass.
    pub fn play_engine_turns(&mut self) -> Result<Vec<MoveOutcome>, MoveError> {
        let mut outcomes = Vec::new();
        while self.is_engine_turn() {
            outcomes.push(self.do_engine_move()?);
        }
        Ok(outcomes)
    }
}
