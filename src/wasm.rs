//! JavaScript bindings.
//!
//! Boards cross the boundary as 64 cell codes (0=empty, 1=black, 2=white),
//! players as indices (0=black, 1=white). Callbacks are plain JS functions.

use js_sys::{Array, Function, Uint8Array};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::board::Board;
use crate::config::GameConfig;
use crate::error::{Error, Result};
use crate::game::{Decision, GameLoop, Policy, Renderer, RewardCollector};
use crate::score;
use crate::types::{Action, Player, Position, TrajectoryEntry};
use crate::validator;

type JsResult<T> = std::result::Result<T, JsError>;

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

#[wasm_bindgen(js_name = initialBoard)]
pub fn initial_board() -> Vec<u8> {
    Board::new().to_array().to_vec()
}

/// Returns `[{row, col}, ...]` in row-major order.
#[wasm_bindgen(js_name = legalMoves)]
pub fn legal_moves(cells: &[u8], player: u8) -> JsResult<JsValue> {
    let board = Board::from_cells(cells)?;
    let player = Player::from_index(player)?;
    to_js(&validator::legal_moves(&board, player))
}

/// Returns `[{d_row, d_col}, ...]`; empty when the placement is illegal.
#[wasm_bindgen(js_name = capturingDirections)]
pub fn capturing_directions(cells: &[u8], player: u8, row: i32, col: i32) -> JsResult<JsValue> {
    let board = Board::from_cells(cells)?;
    let player = Player::from_index(player)?;
    let position = Action::new(row, col).position()?;
    to_js(&validator::find_capturing_directions(&board, player, position))
}

#[wasm_bindgen(js_name = evaluateScore)]
pub fn evaluate_score(cells: &[u8]) -> JsResult<i32> {
    Ok(score::evaluate(&Board::from_cells(cells)?))
}

/// Plays a full game from the initial position.
///
/// Contract:
/// - `policies`: exactly 2 functions `(cells, player, previousInvalid)`
///   returning `{row, col}` or `{pass: true}`.
/// - `rewards`: exactly 2 functions `(trajectory, score)`.
/// - `renderers`: any number of functions `({row, col}, player)`.
/// - `config`: optional `{verbose, max_invalid_attempts}`.
#[wasm_bindgen(js_name = playGame)]
pub fn play_game(
    policies: Array,
    rewards: Array,
    renderers: Array,
    config: JsValue,
) -> JsResult<JsValue> {
    let config = if config.is_undefined() || config.is_null() {
        GameConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config).map_err(|err| Error::Configuration(err.to_string()))?
    };

    let [black_policy, white_policy] = pair(&policies, "policies")?;
    let [black_reward, white_reward] = pair(&rewards, "rewards")?;
    let renderers = functions(&renderers, "renderers")?
        .into_iter()
        .map(|func| Box::new(JsRenderer { func }) as Box<dyn Renderer>)
        .collect();

    let mut game = GameLoop::new(
        [
            Box::new(JsPolicy { func: black_policy }),
            Box::new(JsPolicy { func: white_policy }),
        ],
        [
            Box::new(JsReward {
                func: black_reward,
                player: Player::Black,
            }),
            Box::new(JsReward {
                func: white_reward,
                player: Player::White,
            }),
        ],
        renderers,
        config,
    );

    let result = game.play()?;
    to_js(&result)
}

struct JsPolicy {
    func: Function,
}

/// Shape a JS policy must answer with.
#[derive(Deserialize)]
struct JsDecision {
    row: Option<i32>,
    col: Option<i32>,
    #[serde(default)]
    pass: bool,
}

impl Policy for JsPolicy {
    fn decide(&mut self, board: &Board, player: Player, previous_invalid: bool) -> Result<Decision> {
        let cells = Uint8Array::from(&board.to_array()[..]);
        let reply = self
            .func
            .call3(
                &JsValue::NULL,
                &cells,
                &JsValue::from(player.index() as u32),
                &JsValue::from_bool(previous_invalid),
            )
            .map_err(|err| callback_error(player, err))?;

        let reply: JsDecision = serde_wasm_bindgen::from_value(reply)
            .map_err(|err| Error::InvalidActionType(err.to_string()))?;
        match reply {
            JsDecision { pass: true, .. } => Ok(Decision::Pass),
            JsDecision {
                row: Some(row),
                col: Some(col),
                ..
            } => Ok(Decision::Place(Action::new(row, col))),
            _ => Err(Error::InvalidActionType(
                "expected {row, col} or {pass: true}".to_string(),
            )),
        }
    }
}

struct JsReward {
    func: Function,
    player: Player,
}

impl RewardCollector for JsReward {
    fn collect(&mut self, trajectory: &[TrajectoryEntry], score: i32) -> Result<()> {
        let trajectory = serialize(trajectory, self.player)?;
        self.func
            .call2(&JsValue::NULL, &trajectory, &JsValue::from(score))
            .map_err(|err| callback_error(self.player, err))?;
        Ok(())
    }
}

struct JsRenderer {
    func: Function,
}

impl Renderer for JsRenderer {
    fn render(&mut self, action: Position, player: Player) -> Result<()> {
        let action = serialize(&action, player)?;
        self.func
            .call2(&JsValue::NULL, &action, &JsValue::from(player.index() as u32))
            .map_err(|err| callback_error(player, err))?;
        Ok(())
    }
}

fn functions(array: &Array, what: &str) -> Result<Vec<Function>> {
    array
        .iter()
        .map(|value| {
            value
                .dyn_into::<Function>()
                .map_err(|_| Error::Configuration(format!("{what} must be functions")))
        })
        .collect()
}

fn pair(array: &Array, what: &str) -> Result<[Function; 2]> {
    functions(array, what)?.try_into().map_err(|funcs: Vec<Function>| {
        Error::Configuration(format!("expected 2 {what}, got {}", funcs.len()))
    })
}

fn callback_error(player: Player, err: JsValue) -> Error {
    let message = err
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    Error::Callback { player, message }
}

fn serialize<T: Serialize + ?Sized>(value: &T, player: Player) -> Result<JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| Error::Callback {
        player,
        message: err.to_string(),
    })
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsResult<JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsError::new(&err.to_string()))
}
