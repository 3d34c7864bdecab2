//! 持久化层：对局状态与比分两条记录的编解码，以及 localStorage 读写。
//!
//! 编码失败与存储不可用都按"尽力而为"处理：写入失败不重试、不报错，
//! 内存中的对局照常进行。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::game::{Cell, GameState, Mark, ScoreTally, BOARD_CELLS};

/// localStorage 中对局状态记录的键名。
pub const STATE_KEY: &str = "ttt_state_v1";
/// localStorage 中比分记录的键名。
pub const SCORE_KEY: &str = "ttt_scores_v1";

/// 存档解码失败的原因。由调用方决定回退策略（通常替换为默认新局）。
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum DecodeError {
    Malformed { message: String },
    InvalidBoard { len: usize },
}

fn mark_or_default<'de, D>(deserializer: D) -> Result<Mark, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn bool_or_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_bool().unwrap_or(true))
}

fn count_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_u64()
        .and_then(|count| u32::try_from(count).ok())
        .unwrap_or(0))
}

fn default_running() -> bool {
    true
}

/// 宽松解码用的中间结构：单个字段非法时退回默认值，棋盘本身必须有效。
#[derive(Deserialize)]
struct RawState {
    board: Vec<Cell>,
    #[serde(
        default,
        rename = "currentPlayer",
        deserialize_with = "mark_or_default"
    )]
    current_player: Mark,
    #[serde(default = "default_running", deserialize_with = "bool_or_true")]
    running: bool,
}

#[derive(Default, Deserialize)]
struct RawScores {
    #[serde(default, rename = "X", deserialize_with = "count_or_zero")]
    wins_x: u32,
    #[serde(default, rename = "O", deserialize_with = "count_or_zero")]
    wins_o: u32,
    #[serde(default, rename = "D", deserialize_with = "count_or_zero")]
    draws: u32,
}

pub fn encode_state(state: &GameState) -> serde_json::Result<String> {
    serde_json::to_string(state)
}

/// 解码对局状态记录。棋盘必须恰好 9 格，否则整条记录作废；
/// `currentPlayer` 缺失或非法时退回 X，`running` 缺失或非布尔时退回 true。
pub fn decode_state(raw: &str) -> Result<GameState, DecodeError> {
    let raw_state: RawState = serde_json::from_str(raw).map_err(|error| DecodeError::Malformed {
        message: error.to_string(),
    })?;
    let board: [Cell; BOARD_CELLS] = raw_state
        .board
        .try_into()
        .map_err(|cells: Vec<Cell>| DecodeError::InvalidBoard { len: cells.len() })?;
    Ok(GameState {
        board,
        current_player: raw_state.current_player,
        running: raw_state.running,
    })
}

pub fn encode_scores(scores: &ScoreTally) -> serde_json::Result<String> {
    serde_json::to_string(scores)
}

/// 解码比分记录。任何缺失或非数字的计数都按 0 处理，
/// 整条记录损坏时退回全零，绝不向上传播错误。
pub fn decode_scores(raw: &str) -> ScoreTally {
    let raw_scores: RawScores = serde_json::from_str(raw).unwrap_or_default();
    ScoreTally {
        wins_x: raw_scores.wins_x,
        wins_o: raw_scores.wins_o,
        draws: raw_scores.draws,
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// 从 localStorage 恢复对局状态；记录缺失、存储不可用或解码失败时返回 None。
pub fn load_state() -> Option<GameState> {
    let raw = local_storage()?.get_item(STATE_KEY).ok().flatten()?;
    match decode_state(&raw) {
        Ok(state) => Some(state),
        Err(error) => {
            web_sys::console::warn_1(&format!("忽略损坏的对局存档: {error:?}").into());
            None
        }
    }
}

pub fn save_state(state: &GameState) {
    if let Ok(encoded) = encode_state(state) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(STATE_KEY, &encoded);
        }
    }
}

/// 删除持久化的对局状态记录（全量重置时使用，避免残局复活）。
pub fn clear_state() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(STATE_KEY);
    }
}

pub fn load_scores() -> ScoreTally {
    match local_storage().and_then(|storage| storage.get_item(SCORE_KEY).ok().flatten()) {
        Some(raw) => decode_scores(&raw),
        None => ScoreTally::default(),
    }
}

pub fn save_scores(scores: &ScoreTally) {
    if let Ok(encoded) = encode_scores(scores) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(SCORE_KEY, &encoded);
        }
    }
}
