//! 浏览器内的绑定层冒烟测试（`wasm-pack test --headless --chrome`）。

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use wasm_tictactoe::TicTacToe;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn play_and_reload_round_trip() {
    let mut game = TicTacToe::new();
    game.reset_all();

    assert_eq!(game.status_text(), "X's turn");
    game.place_mark(4).expect("move should serialize");
    assert_eq!(game.cell_value(4), "X");
    assert_eq!(game.current_player(), "O");

    // 新句柄应从 localStorage 恢复同一局
    let reloaded = TicTacToe::new();
    assert_eq!(reloaded.cell_value(4), "X");
    assert_eq!(reloaded.current_player(), "O");
    assert!(reloaded.is_running());
}

#[wasm_bindgen_test]
fn reset_all_clears_saved_game_and_scores() {
    let mut game = TicTacToe::new();
    game.reset_all();

    // X 连成第一行
    for index in [0, 6, 1, 7, 2] {
        game.place_mark(index).expect("move should serialize");
    }
    assert!(!game.is_running());
    assert_eq!(game.status_text(), "X wins!");

    game.reset_all();
    let reloaded = TicTacToe::new();
    assert!(reloaded.is_running());
    assert_eq!(reloaded.cell_value(0), "");
    assert_eq!(
        reloaded.scores_json().expect("scores should serialize"),
        r#"{"X":0,"O":0,"D":0}"#
    );
}
