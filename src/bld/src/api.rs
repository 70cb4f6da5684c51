//! Entry points for callers outside Rust. Every function reports failure
//! through `success` and `error` instead of returning a `Result`, and never
//! panics on bad input.

use cube_core::{CORNER_COUNT, CubeState, EDGE_COUNT, NotationError, ParseError, expand, parse, scramble_to_state};
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    explore::find_wrong_operations,
    moveset::{Moveset, default_moveset},
    operation::{CornerOperation, EdgeOperation, Operation},
    solver::{SolveError, solve},
    translate::{MoveSequence, TranslateError, translate_solution},
};

/// Everything that can go wrong between a caller's input and a solution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BldError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error(transparent)]
    Translate(#[from] TranslateError),
    #[error("`{name}` must have {expected} entries but has {actual}")]
    InvalidLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedScramble {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moves: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateData {
    pub cp: Vec<u8>,
    pub co: Vec<u8>,
    pub ep: Vec<u8>,
    pub eo: Vec<u8>,
}

impl From<&CubeState> for StateData {
    fn from(state: &CubeState) -> Self {
        StateData {
            cp: state.cp().to_vec(),
            co: state.co().to_vec(),
            ep: state.ep().to_vec(),
            eo: state.eo().to_vec(),
        }
    }
}

impl TryFrom<&StateData> for CubeState {
    type Error = BldError;

    fn try_from(data: &StateData) -> Result<Self, Self::Error> {
        Ok(CubeState::new(
            fixed_length("cp", &data.cp)?,
            fixed_length("co", &data.co)?,
            fixed_length("ep", &data.ep)?,
            fixed_length("eo", &data.eo)?,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrambleResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<StateData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BldSolutionData {
    pub corner_operations: Vec<CornerOperation>,
    pub edge_operations: Vec<EdgeOperation>,
    pub move_sequences: Vec<MoveSequence>,
    pub all_operations: Vec<Operation>,
    pub formatted_solution: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BldSolutionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<BldSolutionData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MistakeData {
    /// Zero based index into the solution's operations.
    pub step: usize,
    pub intended: Operation,
    /// `None` when the operation was skipped.
    pub performed: Option<Operation>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MistakeResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mistakes: Option<Vec<MistakeData>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn fixed_length<const N: usize>(name: &'static str, values: &[u8]) -> Result<[u8; N], BldError> {
    values.try_into().map_err(|_| BldError::InvalidLength {
        name,
        expected: N,
        actual: values.len(),
    })
}

fn report<T>(result: Result<T, BldError>) -> (Option<T>, Option<String>) {
    match result {
        Ok(value) => (Some(value), None),
        Err(err) => {
            warn!("{err}");
            (None, Some(err.to_string()))
        }
    }
}

#[must_use]
pub fn parse_scramble(text: &str) -> ParsedScramble {
    let result = parse(text)
        .map(|moves| moves.iter().map(ToString::to_string).collect())
        .map_err(BldError::from);
    let (moves, error) = report(result);
    ParsedScramble {
        success: error.is_none(),
        moves,
        error,
    }
}

/// Like [`parse_scramble`], but also accepts `A: B` conjugates, `A, B`
/// commutators and `m/B` insertions, written out move by move.
#[must_use]
pub fn expand_notation(text: &str) -> ParsedScramble {
    let result = expand(text)
        .map(|moves| moves.iter().map(ToString::to_string).collect())
        .map_err(BldError::from);
    let (moves, error) = report(result);
    ParsedScramble {
        success: error.is_none(),
        moves,
        error,
    }
}

/// Performs `text` on a solved cube.
#[must_use]
pub fn apply_scramble_to_state(text: &str) -> ScrambleResult {
    let result = scramble_to_state(text)
        .map(|state| StateData::from(&state))
        .map_err(BldError::from);
    let (state, error) = report(result);
    ScrambleResult {
        success: error.is_none(),
        state,
        error,
    }
}

/// Solves a state given as raw arrays and translates the solution with
/// `moveset`.
///
/// # Errors
///
/// Fails if an array has the wrong length, if the state is not reachable, or
/// if `moveset` lacks an operation the solution needs.
pub fn solve_state(
    cp: &[u8],
    co: &[u8],
    ep: &[u8],
    eo: &[u8],
    moveset: &Moveset,
) -> Result<BldSolutionData, BldError> {
    let state = CubeState::new(
        fixed_length::<CORNER_COUNT>("cp", cp)?,
        fixed_length::<CORNER_COUNT>("co", co)?,
        fixed_length::<EDGE_COUNT>("ep", ep)?,
        fixed_length::<EDGE_COUNT>("eo", eo)?,
    );
    let solution = solve(&state)?;
    let translated = translate_solution(&solution, moveset)?;
    Ok(BldSolutionData {
        corner_operations: solution.corner_operations,
        edge_operations: solution.edge_operations,
        move_sequences: translated.move_sequences,
        all_operations: translated.all_operations,
        formatted_solution: translated.formatted_solution,
    })
}

#[must_use]
pub fn solve_bld(cp: &[u8], co: &[u8], ep: &[u8], eo: &[u8], moveset: &Moveset) -> BldSolutionResult {
    let (solution, error) = report(solve_state(cp, co, ep, eo, moveset));
    BldSolutionResult {
        success: error.is_none(),
        solution,
        error,
    }
}

#[must_use]
pub fn solve_bld_with_default_moveset(cp: &[u8], co: &[u8], ep: &[u8], eo: &[u8]) -> BldSolutionResult {
    solve_bld(cp, co, ep, eo, default_moveset())
}

/// # Errors
///
/// Fails if either state has arrays of the wrong length or is not reachable.
pub fn wrong_operations(before: &StateData, after: &StateData) -> Result<Vec<MistakeData>, BldError> {
    let before = CubeState::try_from(before)?;
    let after = CubeState::try_from(after)?;
    Ok(find_wrong_operations(&before, &after)?
        .into_iter()
        .map(|variant| MistakeData {
            step: variant.step,
            intended: variant.intended,
            performed: variant.replacement,
            description: variant.to_string(),
        })
        .collect())
}

/// Solves `before` and finds the single operation of that solution which,
/// performed wrongly or skipped, leaves the cube at `after`. An empty list
/// means no single mistake explains `after`.
#[must_use]
pub fn detect_wrong_operations(before: &StateData, after: &StateData) -> MistakeResult {
    let (mistakes, error) = report(wrong_operations(before, after));
    MistakeResult {
        success: error.is_none(),
        mistakes,
        error,
    }
}
