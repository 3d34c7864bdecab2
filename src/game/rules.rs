use serde::{Deserialize, Serialize};

use super::state::{Cell, GameState, Mark, ScoreTally, BOARD_CELLS};

/// 8 条固定获胜连线：先三行，再三列，最后两条对角线。
/// 判定按此顺序扫描，首条成立的连线即为高亮目标。
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// 终局判定结果。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Verdict {
    Win { winner: Mark, line: [usize; 3] },
    Draw,
}

/// 单次落子的结果。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum PlaceOutcome {
    /// 无效输入（越界、格子已占用或对局已结束），状态没有任何变化。
    Ignored,
    Continue { next_player: Mark },
    Win { winner: Mark, line: [usize; 3] },
    Draw,
}

/// 按固定顺序扫描连线；无人获胜且满盘时判和，否则对局继续。
pub fn evaluate(board: &[Cell; BOARD_CELLS]) -> Option<Verdict> {
    for line in WIN_LINES {
        let [a, b, c] = line;
        if let Some(winner) = board[a].mark() {
            if board[a] == board[b] && board[b] == board[c] {
                return Some(Verdict::Win { winner, line });
            }
        }
    }
    if board.iter().all(|cell| !cell.is_empty()) {
        return Some(Verdict::Draw);
    }
    None
}

/// 纯逻辑游戏引擎：持有对局状态与累计比分，不做任何 I/O。
/// 持久化由调用方在每次变更后自行触发。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameEngine {
    state: GameState,
    scores: ScoreTally,
}

impl GameEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用已恢复的状态与比分构建引擎（如从存档加载后）。
    pub fn from_parts(state: GameState, scores: ScoreTally) -> Self {
        Self { state, scores }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn set_state(&mut self, state: GameState) {
        self.state = state;
    }

    pub fn scores(&self) -> ScoreTally {
        self.scores
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.state.cell(index)
    }

    pub fn current_player(&self) -> Mark {
        self.state.current_player
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// 当前棋盘上成立的获胜连线（用于高亮），对局未分胜负时为 None。
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        match evaluate(&self.state.board) {
            Some(Verdict::Win { line, .. }) => Some(line),
            _ => None,
        }
    }

    /// 在指定格子落下当前玩家的标记，并立即判定终局。
    ///
    /// 对局已结束、索引越界或格子已占用时不报错，直接返回
    /// [`PlaceOutcome::Ignored`] 且不改动任何状态。
    pub fn place_mark(&mut self, index: usize) -> PlaceOutcome {
        if !self.state.running || index >= BOARD_CELLS || !self.state.board[index].is_empty() {
            return PlaceOutcome::Ignored;
        }

        self.state.board[index] = Cell::from(self.state.current_player);

        match evaluate(&self.state.board) {
            Some(Verdict::Win { winner, line }) => {
                self.state.finish();
                self.scores.record_win(winner);
                PlaceOutcome::Win { winner, line }
            }
            Some(Verdict::Draw) => {
                self.state.finish();
                self.scores.record_draw();
                PlaceOutcome::Draw
            }
            None => {
                self.state.switch_player();
                PlaceOutcome::Continue {
                    next_player: self.state.current_player,
                }
            }
        }
    }

    /// 开新一局但保留比分。
    pub fn restart(&mut self) {
        self.state.reset();
    }

    /// 比分清零并开新一局。
    pub fn reset_all(&mut self) {
        self.scores.reset();
        self.state.reset();
    }

    /// 状态栏文案，与页面展示的提示一致。
    pub fn status_text(&self) -> String {
        if self.state.running {
            return format!("{}'s turn", self.state.current_player.as_str());
        }
        match evaluate(&self.state.board) {
            Some(Verdict::Win { winner, .. }) => format!("{} wins!", winner.as_str()),
            Some(Verdict::Draw) => "Draw!".to_string(),
            // 只会出现在异常存档里：已停止但棋盘未终局。
            None => format!("{}'s turn", self.state.current_player.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play_all(engine: &mut GameEngine, moves: &[usize]) -> PlaceOutcome {
        let mut last = PlaceOutcome::Ignored;
        for &index in moves {
            last = engine.place_mark(index);
        }
        last
    }

    #[test]
    fn diagonal_win_reports_line_and_updates_tally() {
        let mut engine = GameEngine::new();

        // X: 0, 4, 8; O: 1, 2 之间穿插
        let outcome = play_all(&mut engine, &[0, 1, 4, 2, 8]);

        assert_eq!(
            outcome,
            PlaceOutcome::Win {
                winner: Mark::X,
                line: [0, 4, 8],
            },
            "third diagonal move should win for X"
        );
        assert!(!engine.is_running(), "game should stop after a win");
        assert_eq!(engine.winning_line(), Some([0, 4, 8]));
        assert_eq!(engine.scores().wins_x, 1, "X tally should increment");
        assert_eq!(engine.scores().wins_o, 0);
        assert_eq!(engine.scores().draws, 0);
    }

    #[test]
    fn full_board_without_line_is_a_draw() {
        let mut engine = GameEngine::new();

        // 终盘 X O X / X O O / O X X，无任何连线
        let outcome = play_all(&mut engine, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);

        assert_eq!(outcome, PlaceOutcome::Draw);
        assert!(!engine.is_running());
        assert_eq!(engine.winning_line(), None);
        assert_eq!(engine.scores().draws, 1, "draw tally should increment");
        assert_eq!(engine.scores().wins_x, 0);
        assert_eq!(engine.scores().wins_o, 0);
    }

    #[test]
    fn occupied_cell_is_a_silent_no_op() {
        let mut engine = GameEngine::new();
        assert_eq!(
            engine.place_mark(4),
            PlaceOutcome::Continue {
                next_player: Mark::O
            }
        );

        let before = engine.clone();
        assert_eq!(engine.place_mark(4), PlaceOutcome::Ignored);
        assert_eq!(engine, before, "occupied-cell move should change nothing");
    }

    #[test]
    fn out_of_range_index_is_a_silent_no_op() {
        let mut engine = GameEngine::new();
        let before = engine.clone();

        assert_eq!(engine.place_mark(9), PlaceOutcome::Ignored);
        assert_eq!(engine.place_mark(usize::MAX), PlaceOutcome::Ignored);
        assert_eq!(engine, before);
    }

    #[test]
    fn moves_after_game_end_are_ignored() {
        let mut engine = GameEngine::new();
        play_all(&mut engine, &[0, 3, 1, 4, 2]); // X 连成第一行

        let before = engine.clone();
        assert_eq!(engine.place_mark(5), PlaceOutcome::Ignored);
        assert_eq!(engine, before, "ended game should reject further moves");
    }

    #[test]
    fn players_alternate_and_never_overwrite() {
        let mut engine = GameEngine::new();

        assert_eq!(engine.current_player(), Mark::X);
        engine.place_mark(0);
        assert_eq!(engine.current_player(), Mark::O);
        engine.place_mark(1);
        assert_eq!(engine.current_player(), Mark::X);

        assert_eq!(engine.cell(0), Some(Cell::X));
        assert_eq!(engine.cell(1), Some(Cell::O));

        let filled = engine
            .state()
            .board
            .iter()
            .filter(|cell| !cell.is_empty())
            .count();
        assert_eq!(filled, 2, "board should hold exactly one cell per move");
    }

    #[test]
    fn evaluate_scans_rows_before_columns() {
        let mut board = [Cell::Empty; BOARD_CELLS];
        // 人为构造同时成立的行与列（正常对局不会出现）
        for index in [0, 1, 2, 3, 6] {
            board[index] = Cell::X;
        }

        assert_eq!(
            evaluate(&board),
            Some(Verdict::Win {
                winner: Mark::X,
                line: [0, 1, 2],
            }),
            "row line should be reported before the column line"
        );
    }

    #[test]
    fn evaluate_on_open_board_is_none() {
        let mut board = [Cell::Empty; BOARD_CELLS];
        assert_eq!(evaluate(&board), None);

        board[0] = Cell::X;
        board[4] = Cell::O;
        assert_eq!(evaluate(&board), None);
    }

    #[test]
    fn restart_clears_board_but_keeps_tally() {
        let mut engine = GameEngine::new();
        play_all(&mut engine, &[0, 3, 1, 4, 2]);
        assert_eq!(engine.scores().wins_x, 1);

        engine.restart();

        assert_eq!(engine.state(), &GameState::new());
        assert_eq!(engine.current_player(), Mark::X);
        assert!(engine.is_running());
        assert_eq!(engine.scores().wins_x, 1, "restart must not touch scores");
    }

    #[test]
    fn reset_all_zeroes_tally_and_restarts_mid_game() {
        let scores = ScoreTally {
            wins_x: 3,
            wins_o: 2,
            draws: 1,
        };
        let mut engine = GameEngine::from_parts(GameState::new(), scores);
        engine.place_mark(0);
        engine.place_mark(4);

        engine.reset_all();

        assert_eq!(engine.scores(), ScoreTally::default());
        assert_eq!(engine.state(), &GameState::new());
        assert_eq!(engine.current_player(), Mark::X);
        assert!(engine.is_running());
    }

    #[test]
    fn status_text_tracks_turn_and_endings() {
        let mut engine = GameEngine::new();
        assert_eq!(engine.status_text(), "X's turn");

        engine.place_mark(0);
        assert_eq!(engine.status_text(), "O's turn");

        play_all(&mut engine, &[3, 1, 4, 2]); // X 补完第一行
        assert_eq!(engine.status_text(), "X wins!");

        engine.restart();
        play_all(&mut engine, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert_eq!(engine.status_text(), "Draw!");
    }

    #[test]
    fn column_and_anti_diagonal_wins_are_detected() {
        let mut engine = GameEngine::new();
        // O 连成中列：X 0,2,3；O 1,4,7
        let outcome = play_all(&mut engine, &[0, 1, 2, 4, 3, 7]);
        assert_eq!(
            outcome,
            PlaceOutcome::Win {
                winner: Mark::O,
                line: [1, 4, 7],
            }
        );
        assert_eq!(engine.scores().wins_o, 1);

        engine.restart();
        // X 连成副对角线 2,4,6
        let outcome = play_all(&mut engine, &[2, 0, 4, 1, 6]);
        assert_eq!(
            outcome,
            PlaceOutcome::Win {
                winner: Mark::X,
                line: [2, 4, 6],
            }
        );
    }
}
