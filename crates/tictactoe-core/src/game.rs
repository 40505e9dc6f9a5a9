//! Core game state machine.
//!
//! This module contains [`GameController`], which owns the board for one
//! session, sequences the human and computer turns, and reports outcomes.

use crate::actions::{GameEvent, GameInput};
use crate::board::{Board, Cell, Player};
use crate::opponent::{Difficulty, Opponent, RandomOpponent};
use crate::win::{self, Outcome};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the human to pick Cross or Circle
    ChoosingShape,

    /// Game running; `turn` is the mark expected to move next
    InProgress { turn: Player },

    /// Game is over
    Finished { outcome: Outcome },
}

/// Which mark each side plays. Bound once when the shape is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seats {
    pub human: Player,
    pub opponent: Player,
}

impl Seats {
    pub fn for_human(human: Player) -> Self {
        Self {
            human,
            opponent: human.other(),
        }
    }
}

/// Errors that can occur when applying inputs
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Cell index {0} is out of range (expected 0-8)")]
    IndexOutOfRange(usize),

    #[error("Cell {0} is already occupied")]
    CellOccupied(usize),

    #[error("Opponent has no legal moves")]
    NoLegalMoves,

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Invalid input for current phase")]
    InvalidPhase,

    #[error("Game is over")]
    GameOver,

    #[error("Difficulty '{0}' is not implemented")]
    UnsupportedDifficulty(Difficulty),
}

/// Everything a front end needs to draw the current frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub seats: Option<Seats>,
    pub cells: Vec<Cell>,
    /// Cells of the completed line once someone has won
    pub winning_line: Option<[usize; 3]>,
}

/// Owns one game session: the board, the phase and the computer opponent.
///
/// Inputs are processed one at a time to completion. A human move and the
/// opponent's reply happen inside the same [`GameController::handle`] call.
#[derive(Debug)]
pub struct GameController {
    board: Board,
    phase: GamePhase,
    seats: Option<Seats>,
    opponent: Box<dyn Opponent>,
}

impl GameController {
    /// New session against an unseeded random opponent
    pub fn new() -> Self {
        Self::with_opponent(Box::new(RandomOpponent::new()))
    }

    /// New session against a random opponent with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self::with_opponent(Box::new(RandomOpponent::with_seed(seed)))
    }

    /// New session for a difficulty level
    pub fn with_difficulty(difficulty: Difficulty, seed: Option<u64>) -> Result<Self, GameError> {
        Ok(Self::with_opponent(difficulty.opponent(seed)?))
    }

    /// New session against any opponent strategy
    pub fn with_opponent(opponent: Box<dyn Opponent>) -> Self {
        Self {
            board: Board::new(),
            phase: GamePhase::ChoosingShape,
            seats: None,
            opponent,
        }
    }

    /// Discard the current board and go back to shape selection.
    /// The opponent strategy is kept.
    pub fn restart(&mut self) {
        self.board = Board::new();
        self.phase = GamePhase::ChoosingShape;
        self.seats = None;
        info!("new game session");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Mark bindings, once a shape has been chosen
    pub fn seats(&self) -> Option<Seats> {
        self.seats
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Finished { .. })
    }

    /// Get the outcome if the game is finished
    pub fn outcome(&self) -> Option<Outcome> {
        if let GamePhase::Finished { outcome } = self.phase {
            Some(outcome)
        } else {
            None
        }
    }

    /// Serializable view of the whole game for polling front ends
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            seats: self.seats,
            cells: self.board.cells().to_vec(),
            winning_line: win::winning_line(&self.board).map(|(_, line)| line),
        }
    }

    /// Apply an input from the presentation layer.
    ///
    /// On error nothing has changed; callers may treat `CellOccupied`,
    /// `NotYourTurn` and `GameOver` as silent no-ops.
    pub fn handle(&mut self, input: GameInput) -> Result<Vec<GameEvent>, GameError> {
        let result = match input {
            GameInput::ChooseShape(player) => self.choose_shape(player),
            GameInput::SelectCell(index) => self.select_cell(index),
            GameInput::HoverCell(index) => self.hover_cell(index).map(|_| Vec::new()),
        };

        if let Err(e) = &result {
            warn!(?input, error = %e, "input rejected");
        }
        result
    }

    /// Bind the human to `player` and start the game.
    ///
    /// Cross always moves first, so if the human picked Circle the opponent
    /// opens before this returns.
    pub fn choose_shape(&mut self, player: Player) -> Result<Vec<GameEvent>, GameError> {
        match self.phase {
            GamePhase::ChoosingShape => {}
            GamePhase::InProgress { .. } => return Err(GameError::InvalidPhase),
            GamePhase::Finished { .. } => return Err(GameError::GameOver),
        }

        let seats = Seats::for_human(player);
        self.seats = Some(seats);
        self.phase = GamePhase::InProgress {
            turn: Player::Cross,
        };
        info!(human = %seats.human, opponent = %seats.opponent, "shape chosen");

        let mut events = vec![GameEvent::ShapeChosen {
            human: seats.human,
            opponent: seats.opponent,
        }];

        if seats.opponent == Player::Cross {
            if let Err(e) = self.opponent_turn(seats, &mut events) {
                self.board = Board::new();
                self.phase = GamePhase::ChoosingShape;
                self.seats = None;
                return Err(e);
            }
        }

        Ok(events)
    }

    /// Place the human's mark, then let the opponent reply
    pub fn select_cell(&mut self, index: usize) -> Result<Vec<GameEvent>, GameError> {
        let seats = self.human_turn()?;

        if !self.board.cell_at(index)?.is_empty() {
            return Err(GameError::CellOccupied(index));
        }

        let saved = (self.board.clone(), self.phase);
        let mut events = Vec::new();

        let result = match self.place(index, seats.human, &mut events) {
            Ok(true) => Ok(()),
            Ok(false) => self.opponent_turn(seats, &mut events),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => Ok(events),
            Err(e) => {
                // The opponent failed after the human's mark went down
                (self.board, self.phase) = saved;
                Err(e)
            }
        }
    }

    /// Move the hover preview to `index`, or clear it with `None`.
    ///
    /// Only the human's turn shows a preview; in other phases the input is
    /// validated and otherwise ignored. Never changes an occupant.
    pub fn hover_cell(&mut self, index: Option<usize>) -> Result<(), GameError> {
        if let Some(index) = index {
            self.board.cell_at(index)?;
        }

        let human_to_move = matches!(
            (self.phase, self.seats),
            (GamePhase::InProgress { turn }, Some(seats)) if turn == seats.human
        );
        if !human_to_move {
            return Ok(());
        }

        if self.board.previewed_cell() == index {
            return Ok(());
        }

        self.board.clear_previews();
        if let Some(index) = index {
            if self.board.set_preview(index, true)? {
                debug!(index, "preview shown");
            }
        }
        Ok(())
    }

    /// Seats if it is currently the human's move
    fn human_turn(&self) -> Result<Seats, GameError> {
        match (self.phase, self.seats) {
            (GamePhase::Finished { .. }, _) => Err(GameError::GameOver),
            (GamePhase::InProgress { turn }, Some(seats)) => {
                if turn == seats.human {
                    Ok(seats)
                } else {
                    Err(GameError::NotYourTurn)
                }
            }
            _ => Err(GameError::InvalidPhase),
        }
    }

    /// Ask the opponent for a cell and play it. Leaves the turn with the
    /// human unless the game ended.
    fn opponent_turn(&mut self, seats: Seats, events: &mut Vec<GameEvent>) -> Result<(), GameError> {
        let index = self.opponent.choose_move(&self.board)?;
        debug!(index, "opponent chose cell");

        if !self.place(index, seats.opponent, events)? {
            self.phase = GamePhase::InProgress { turn: seats.human };
        }
        Ok(())
    }

    /// Place a mark and check for a terminal state. Returns true if the game
    /// finished.
    fn place(
        &mut self,
        index: usize,
        player: Player,
        events: &mut Vec<GameEvent>,
    ) -> Result<bool, GameError> {
        self.board.place(index, player)?;
        events.push(GameEvent::CellMarked { index, player });

        match win::outcome(&self.board) {
            Some(outcome) => {
                self.finish(outcome, events);
                Ok(true)
            }
            None => {
                self.phase = GamePhase::InProgress {
                    turn: player.other(),
                };
                Ok(false)
            }
        }
    }

    fn finish(&mut self, outcome: Outcome, events: &mut Vec<GameEvent>) {
        self.board.clear_previews();
        self.phase = GamePhase::Finished { outcome };
        info!(?outcome, "game finished");
        events.push(GameEvent::GameEnded { outcome });
    }
}

impl Default for GameController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Plays a fixed list of cells in order
    #[derive(Debug)]
    struct Scripted(Vec<usize>);

    impl Opponent for Scripted {
        fn choose_move(&mut self, _board: &Board) -> Result<usize, GameError> {
            if self.0.is_empty() {
                return Err(GameError::NoLegalMoves);
            }
            Ok(self.0.remove(0))
        }
    }

    fn scripted(moves: &[usize]) -> GameController {
        GameController::with_opponent(Box::new(Scripted(moves.to_vec())))
    }

    #[test]
    fn test_new_game_starts_choosing_shape() {
        let game = GameController::with_seed(1);
        assert_eq!(game.phase(), GamePhase::ChoosingShape);
        assert_eq!(game.seats(), None);
        assert_eq!(game.board().marked_count(), 0);
    }

    #[test]
    fn test_choose_cross_waits_for_human() {
        let mut game = GameController::with_seed(1);
        let events = game.choose_shape(Player::Cross).unwrap();

        assert_eq!(
            events,
            vec![GameEvent::ShapeChosen {
                human: Player::Cross,
                opponent: Player::Circle
            }]
        );
        assert_eq!(game.phase(), GamePhase::InProgress { turn: Player::Cross });
        assert_eq!(game.board().marked_count(), 0);
    }

    #[test]
    fn test_choose_circle_lets_opponent_open() {
        let mut game = scripted(&[4]);
        let events = game.choose_shape(Player::Circle).unwrap();

        assert_eq!(
            events,
            vec![
                GameEvent::ShapeChosen {
                    human: Player::Circle,
                    opponent: Player::Cross
                },
                GameEvent::CellMarked {
                    index: 4,
                    player: Player::Cross
                },
            ]
        );
        assert_eq!(game.phase(), GamePhase::InProgress { turn: Player::Circle });
    }

    #[test]
    fn test_shape_cannot_be_chosen_twice() {
        let mut game = GameController::with_seed(1);
        game.choose_shape(Player::Cross).unwrap();

        assert!(matches!(
            game.choose_shape(Player::Circle),
            Err(GameError::InvalidPhase)
        ));
        assert_eq!(game.seats(), Some(Seats::for_human(Player::Cross)));
    }

    #[test]
    fn test_select_before_shape_is_rejected() {
        let mut game = GameController::with_seed(1);
        assert!(matches!(game.select_cell(0), Err(GameError::InvalidPhase)));
        assert_eq!(game.board().marked_count(), 0);
    }

    #[test]
    fn test_select_cell_applies_human_and_opponent_moves() {
        let mut game = scripted(&[8]);
        game.choose_shape(Player::Cross).unwrap();

        let events = game.select_cell(0).unwrap();
        assert_eq!(
            events,
            vec![
                GameEvent::CellMarked {
                    index: 0,
                    player: Player::Cross
                },
                GameEvent::CellMarked {
                    index: 8,
                    player: Player::Circle
                },
            ]
        );
        assert_eq!(game.phase(), GamePhase::InProgress { turn: Player::Cross });
    }

    #[test]
    fn test_select_occupied_cell_is_noop() {
        let mut game = scripted(&[8]);
        game.choose_shape(Player::Cross).unwrap();
        game.select_cell(0).unwrap();

        let before = game.board().clone();
        assert!(matches!(game.select_cell(8), Err(GameError::CellOccupied(8))));
        assert!(matches!(game.select_cell(0), Err(GameError::CellOccupied(0))));
        assert_eq!(game.board(), &before);
    }

    #[test]
    fn test_select_out_of_range_is_rejected() {
        let mut game = GameController::with_seed(1);
        game.choose_shape(Player::Cross).unwrap();
        assert!(matches!(
            game.select_cell(9),
            Err(GameError::IndexOutOfRange(9))
        ));
    }

    #[test]
    fn test_human_win_skips_opponent_reply() {
        // Human X: 0, 1, 2. Opponent O: 3, 4.
        let mut game = scripted(&[3, 4, 5]);
        game.choose_shape(Player::Cross).unwrap();
        game.select_cell(0).unwrap();
        game.select_cell(1).unwrap();

        let events = game.select_cell(2).unwrap();
        assert_eq!(
            events,
            vec![
                GameEvent::CellMarked {
                    index: 2,
                    player: Player::Cross
                },
                GameEvent::GameEnded {
                    outcome: Outcome::Win(Player::Cross)
                },
            ]
        );
        assert_eq!(game.outcome(), Some(Outcome::Win(Player::Cross)));
        assert_eq!(game.board().marked_count(), 5);
        assert_eq!(game.snapshot().winning_line, Some([0, 1, 2]));
    }

    #[test]
    fn test_opponent_win_ends_game() {
        // Opponent X: 0, 1, 2. Human O: 3, 4.
        let mut game = scripted(&[0, 1, 2]);
        game.choose_shape(Player::Circle).unwrap();
        game.select_cell(3).unwrap();

        let events = game.select_cell(4).unwrap();
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameEnded {
                outcome: Outcome::Win(Player::Cross)
            })
        );
        assert!(game.is_finished());
    }

    #[test]
    fn test_draw_reported() {
        // X O X
        // X O O
        // O X X
        let mut game = scripted(&[1, 4, 5, 6]);
        game.choose_shape(Player::Cross).unwrap();
        for index in [0, 2, 3, 7] {
            game.select_cell(index).unwrap();
        }

        let events = game.select_cell(8).unwrap();
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameEnded {
                outcome: Outcome::Draw
            })
        );
        assert_eq!(game.outcome(), Some(Outcome::Draw));
    }

    #[test]
    fn test_finished_game_ignores_input() {
        let mut game = scripted(&[3, 4]);
        game.choose_shape(Player::Cross).unwrap();
        for index in [0, 1, 2] {
            game.select_cell(index).unwrap();
        }
        let before = game.board().clone();

        assert!(matches!(game.select_cell(8), Err(GameError::GameOver)));
        assert!(matches!(
            game.choose_shape(Player::Circle),
            Err(GameError::GameOver)
        ));
        game.hover_cell(Some(8)).unwrap();
        assert_eq!(game.board(), &before);
    }

    #[test]
    fn test_failing_opponent_rolls_back_human_move() {
        let mut game = scripted(&[]);
        game.choose_shape(Player::Cross).unwrap();

        assert!(matches!(game.select_cell(0), Err(GameError::NoLegalMoves)));
        assert_eq!(game.board().marked_count(), 0);
        assert_eq!(game.phase(), GamePhase::InProgress { turn: Player::Cross });
    }

    #[test]
    fn test_failing_opening_move_returns_to_shape_choice() {
        let mut game = scripted(&[]);

        assert!(matches!(
            game.choose_shape(Player::Circle),
            Err(GameError::NoLegalMoves)
        ));
        assert_eq!(game.phase(), GamePhase::ChoosingShape);
        assert_eq!(game.seats(), None);
        assert_eq!(game.board(), &Board::new());
    }

    #[test]
    fn test_opponent_choosing_occupied_cell_is_rejected() {
        let mut game = scripted(&[0]);
        game.choose_shape(Player::Cross).unwrap();

        assert!(matches!(game.select_cell(0), Err(GameError::CellOccupied(0))));
        assert_eq!(game.board().marked_count(), 0);
    }

    #[test]
    fn test_hover_moves_preview() {
        let mut game = scripted(&[8]);
        game.choose_shape(Player::Cross).unwrap();

        game.hover_cell(Some(2)).unwrap();
        assert_eq!(game.board().previewed_cell(), Some(2));

        game.hover_cell(Some(5)).unwrap();
        assert_eq!(game.board().previewed_cell(), Some(5));
        assert!(!game.board().cell_at(2).unwrap().is_previewed());

        game.hover_cell(None).unwrap();
        assert_eq!(game.board().previewed_cell(), None);
        assert_eq!(game.board().marked_count(), 0);
    }

    #[test]
    fn test_hover_on_marked_cell_shows_nothing() {
        let mut game = scripted(&[8]);
        game.choose_shape(Player::Cross).unwrap();
        game.select_cell(0).unwrap();

        game.hover_cell(Some(0)).unwrap();
        assert_eq!(game.board().previewed_cell(), None);
        assert_eq!(game.board().cell_at(0).unwrap().mark(), Some(Player::Cross));
    }

    #[test]
    fn test_selecting_previewed_cell_clears_preview() {
        let mut game = scripted(&[8]);
        game.choose_shape(Player::Cross).unwrap();
        game.hover_cell(Some(4)).unwrap();

        game.select_cell(4).unwrap();
        assert_eq!(game.board().previewed_cell(), None);
    }

    #[test]
    fn test_hover_before_shape_is_ignored() {
        let mut game = GameController::with_seed(1);
        game.hover_cell(Some(3)).unwrap();
        assert_eq!(game.board().previewed_cell(), None);
        assert!(matches!(
            game.hover_cell(Some(12)),
            Err(GameError::IndexOutOfRange(12))
        ));
    }

    #[test]
    fn test_handle_dispatches_inputs() {
        let mut game = scripted(&[4]);
        let events = game.handle(GameInput::ChooseShape(Player::Cross)).unwrap();
        assert_eq!(events.len(), 1);

        assert!(game.handle(GameInput::HoverCell(Some(0))).unwrap().is_empty());
        assert_eq!(game.board().previewed_cell(), Some(0));

        let events = game.handle(GameInput::SelectCell(0)).unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut game = scripted(&[8, 7]);
        game.choose_shape(Player::Cross).unwrap();
        game.select_cell(0).unwrap();

        game.restart();
        assert_eq!(game.phase(), GamePhase::ChoosingShape);
        assert_eq!(game.seats(), None);
        assert_eq!(game.board(), &Board::new());

        game.choose_shape(Player::Cross).unwrap();
        game.select_cell(0).unwrap();
        assert_eq!(game.board().cell_at(7).unwrap().mark(), Some(Player::Circle));
    }

    #[test]
    fn test_with_difficulty() {
        assert!(GameController::with_difficulty(Difficulty::Easy, Some(5)).is_ok());
        assert!(matches!(
            GameController::with_difficulty(Difficulty::Hard, None),
            Err(GameError::UnsupportedDifficulty(Difficulty::Hard))
        ));
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut game = scripted(&[4]);
        game.choose_shape(Player::Circle).unwrap();

        let json = serde_json::to_value(game.snapshot()).unwrap();
        assert_eq!(json["seats"]["human"], "Circle");
        assert_eq!(json["cells"][4]["occupant"]["Mark"], "Cross");
        assert_eq!(json["cells"][0]["occupant"], "Empty");
        assert_eq!(json["cells"].as_array().unwrap().len(), 9);
    }
}
