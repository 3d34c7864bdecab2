pub mod game;
pub mod storage;

use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

pub use game::{
    evaluate, Cell, GameEngine, GameState, Mark, PlaceOutcome, ScoreTally, Verdict, BOARD_CELLS,
    WIN_LINES,
};
pub use storage::{decode_scores, decode_state, encode_scores, encode_state, DecodeError};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
}

fn to_js_error(error: DecodeError) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// 无状态落子的返回值：更新后的状态、比分与本次结果。
#[derive(Serialize)]
struct PlaceResolution {
    state: GameState,
    scores: ScoreTally,
    outcome: PlaceOutcome,
}

/// 浏览器端对局句柄：包装纯逻辑引擎，并负责 localStorage 的加载与保存。
#[wasm_bindgen]
pub struct TicTacToe {
    engine: GameEngine,
}

#[wasm_bindgen]
impl TicTacToe {
    /// 创建句柄并从 localStorage 恢复对局与比分；
    /// 存档缺失或损坏时退回默认值（空棋盘、X 先手、比分全零）。
    #[wasm_bindgen(constructor)]
    pub fn new() -> TicTacToe {
        let state = storage::load_state().unwrap_or_default();
        let scores = storage::load_scores();
        TicTacToe {
            engine: GameEngine::from_parts(state, scores),
        }
    }

    /// 在指定格子落子并返回结果 JSON。状态有变更时立即持久化，
    /// 终局时连比分一起保存。
    #[wasm_bindgen(js_name = "placeMark")]
    pub fn place_mark(&mut self, index: usize) -> Result<String, JsValue> {
        let outcome = self.engine.place_mark(index);
        match outcome {
            PlaceOutcome::Ignored => {}
            PlaceOutcome::Continue { .. } => {
                storage::save_state(self.engine.state());
            }
            PlaceOutcome::Win { .. } | PlaceOutcome::Draw => {
                storage::save_state(self.engine.state());
                storage::save_scores(&self.engine.scores());
            }
        }
        serde_json::to_string(&outcome).map_err(serde_to_js_error)
    }

    /// 开新一局（保留比分）并保存新状态。
    pub fn restart(&mut self) {
        self.engine.restart();
        storage::save_state(self.engine.state());
    }

    /// 比分清零并开新一局。先保存零比分，再删除旧的状态记录，
    /// 最后写入全新状态，确保残局不会在重置后复活。
    #[wasm_bindgen(js_name = "resetAll")]
    pub fn reset_all(&mut self) {
        self.engine.reset_all();
        storage::save_scores(&self.engine.scores());
        storage::clear_state();
        storage::save_state(self.engine.state());
    }

    #[wasm_bindgen(js_name = "cellValue")]
    pub fn cell_value(&self, index: usize) -> String {
        self.engine
            .cell(index)
            .unwrap_or(Cell::Empty)
            .as_str()
            .to_string()
    }

    #[wasm_bindgen(js_name = "currentPlayer")]
    pub fn current_player(&self) -> String {
        self.engine.current_player().as_str().to_string()
    }

    #[wasm_bindgen(js_name = "isRunning")]
    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    /// 当前成立的获胜连线（3 个格子索引的数组），未分胜负时为空值。
    #[wasm_bindgen(js_name = "winningLine")]
    pub fn winning_line(&self) -> Result<JsValue, JsValue> {
        to_value(&self.engine.winning_line()).map_err(JsValue::from)
    }

    /// 状态栏文案："X's turn"、"O wins!"、"Draw!" 等。
    #[wasm_bindgen(js_name = "statusText")]
    pub fn status_text(&self) -> String {
        self.engine.status_text()
    }

    #[wasm_bindgen(js_name = "scoresJson")]
    pub fn scores_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.engine.scores()).map_err(serde_to_js_error)
    }

    #[wasm_bindgen(js_name = "stateJson")]
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.engine.state()).map_err(serde_to_js_error)
    }

    /// 用给定的状态记录替换当前对局（存档格式，解码失败则报错）。
    #[wasm_bindgen(js_name = "setStateJson")]
    pub fn set_state_json(&mut self, json: &str) -> Result<(), JsValue> {
        let state = storage::decode_state(json).map_err(to_js_error)?;
        self.engine.set_state(state);
        Ok(())
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

/// 返回一局全新的对局状态，方便前端初始化或调试。
#[wasm_bindgen(js_name = "createGameState")]
pub fn create_game_state() -> Result<JsValue, JsValue> {
    to_value(&GameState::new()).map_err(JsValue::from)
}

/// 判定给定棋盘：返回获胜方与连线、和棋，或 null（对局继续）。
#[wasm_bindgen(js_name = "evaluateBoard")]
pub fn evaluate_board(state: JsValue) -> Result<JsValue, JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    to_value(&evaluate(&state.board)).map_err(JsValue::from)
}

/// 无状态落子：输入状态与比分，返回更新后的整体结果。
#[wasm_bindgen(js_name = "placeMark")]
pub fn place_mark(state: JsValue, scores: JsValue, index: usize) -> Result<JsValue, JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    let scores: ScoreTally = from_value(scores).map_err(JsValue::from)?;

    let mut engine = GameEngine::from_parts(state, scores);
    let outcome = engine.place_mark(index);
    let resolution = PlaceResolution {
        state: engine.state().clone(),
        scores: engine.scores(),
        outcome,
    };
    to_value(&resolution).map_err(JsValue::from)
}

/// 解码持久化的对局记录；损坏时返回默认新局（与运行时加载策略一致）。
#[wasm_bindgen(js_name = "decodeSavedState")]
pub fn decode_saved_state(raw: &str) -> Result<JsValue, JsValue> {
    let state = storage::decode_state(raw).unwrap_or_default();
    to_value(&state).map_err(JsValue::from)
}

/// 解码持久化的比分记录；任何损坏字段都按 0 处理。
#[wasm_bindgen(js_name = "decodeSavedScores")]
pub fn decode_saved_scores(raw: &str) -> Result<JsValue, JsValue> {
    to_value(&storage::decode_scores(raw)).map_err(JsValue::from)
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}
