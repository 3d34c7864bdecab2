use serde::{Deserialize, Serialize};

/// 棋盘格子数量（3x3，按行优先 0..9 编号）。
pub const BOARD_CELLS: usize = 9;

/// 玩家标记。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mark {
    X,
    O,
}

impl Default for Mark {
    fn default() -> Self {
        Mark::X
    }
}

impl Mark {
    pub fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

/// 单个格子的内容。空格子序列化为空字符串，与存档格式保持一致。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Cell {
    #[serde(rename = "")]
    Empty,
    X,
    O,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Mark::X),
            Cell::O => Some(Mark::O),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Cell::Empty => "",
            Cell::X => "X",
            Cell::O => "O",
        }
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }
}

/// 对局整体状态。`running` 为 false 时棋盘处于终局。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameState {
    pub board: [Cell; BOARD_CELLS],
    #[serde(rename = "currentPlayer")]
    pub current_player: Mark,
    pub running: bool,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            board: [Cell::Empty; BOARD_CELLS],
            current_player: Mark::X,
            running: true,
        }
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.board.get(index).copied()
    }

    pub fn is_full(&self) -> bool {
        self.board.iter().all(|cell| !cell.is_empty())
    }

    pub fn switch_player(&mut self) {
        self.current_player = self.current_player.other();
    }

    pub fn finish(&mut self) {
        self.running = false;
    }

    /// 清空棋盘并回到 X 先手的运行状态。
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// 跨对局累计的比分，随存档长期保留。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreTally {
    #[serde(rename = "X")]
    pub wins_x: u32,
    #[serde(rename = "O")]
    pub wins_o: u32,
    #[serde(rename = "D")]
    pub draws: u32,
}

impl ScoreTally {
    pub fn record_win(&mut self, winner: Mark) {
        match winner {
            Mark::X => self.wins_x += 1,
            Mark::O => self.wins_o += 1,
        }
    }

    pub fn record_draw(&mut self) {
        self.draws += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
