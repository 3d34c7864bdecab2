//! 游戏核心逻辑模块（状态机、胜负判定等）。

pub mod rules;
pub mod state;

pub use rules::{evaluate, GameEngine, PlaceOutcome, Verdict, WIN_LINES};
pub use state::{Cell, GameState, Mark, ScoreTally, BOARD_CELLS};
