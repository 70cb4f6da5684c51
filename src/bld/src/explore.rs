//! Finding the one step that went wrong when a sequence was performed and
//! the cube ended up somewhere else.
//!
//! Every variant of a sequence that changes a single step is performed on
//! the starting state, and the variants that reach the observed state are
//! the candidate mistakes. Both face turns and solver operations can be
//! explored this way.

use std::{fmt, iter};

use cube_core::{CubeState, Move, Turn};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    operation::{CornerOperation, EdgeOperation, Operation},
    solver::{SolveError, solve},
    working,
};

/// A step of a sequence, together with the steps it is easily confused with.
pub trait Performable: Copy + Eq + fmt::Display {
    /// What performing this step does to a solved cube.
    fn effect(&self) -> CubeState;

    /// The steps that could have been performed by mistake instead of this
    /// one.
    fn alternatives(&self) -> Vec<Self>;
}

impl Performable for Move {
    fn effect(&self) -> CubeState {
        *self.transform()
    }

    /// The other turns of the same face.
    fn alternatives(&self) -> Vec<Self> {
        Turn::ALL
            .into_iter()
            .filter(|&turn| turn != self.turn)
            .map(|turn| Move::new(self.face, turn))
            .collect()
    }
}

impl Performable for Operation {
    /// Operations the solver never emits have no algorithm and do nothing.
    fn effect(&self) -> CubeState {
        self.expected_effect().unwrap_or_else(CubeState::solved)
    }

    /// Every other operation of the same kind, so a swap can be mistaken for
    /// any other swap of the same orbit but never for a twist.
    fn alternatives(&self) -> Vec<Self> {
        Operation::all_reachable()
            .into_iter()
            .filter(|other| other != self && same_kind(self, other))
            .collect()
    }
}

fn same_kind(a: &Operation, b: &Operation) -> bool {
    matches!(
        (a, b),
        (
            Operation::Corner(CornerOperation::Swap { .. }),
            Operation::Corner(CornerOperation::Swap { .. })
        ) | (
            Operation::Corner(CornerOperation::Twist { .. }),
            Operation::Corner(CornerOperation::Twist { .. })
        ) | (
            Operation::Edge(EdgeOperation::Swap { .. }),
            Operation::Edge(EdgeOperation::Swap { .. })
        ) | (
            Operation::Edge(EdgeOperation::Flip { .. }),
            Operation::Edge(EdgeOperation::Flip { .. })
        )
    )
}

/// A sequence that differs from the intended one in a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant<T> {
    /// Zero based index of the changed step.
    pub step: usize,
    pub intended: T,
    /// What was performed instead, or `None` if the step was skipped.
    pub replacement: Option<T>,
    /// The state the whole variant leads to.
    pub state: CubeState,
}

impl<T: fmt::Display> fmt::Display for Variant<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.replacement {
            Some(replacement) => write!(f, "Step {}: {replacement} instead of {}", self.step + 1, self.intended),
            None => write!(f, "Step {}: {} was skipped", self.step + 1, self.intended),
        }
    }
}

/// Performs every single step variant of `sequence` on `start`.
///
/// Each step is replaced by each of its [`Performable::alternatives`] and
/// then left out entirely, in that order, scanning steps from the first.
#[must_use]
pub fn nearby_sequences<T: Performable>(start: &CubeState, sequence: &[T]) -> Vec<Variant<T>> {
    // prefixes[i] is `start` after the first i steps and suffixes[i] is the
    // combined effect of steps i onwards
    let prefixes = iter::once(*start)
        .chain(sequence.iter().scan(*start, |state, step| {
            *state = state.compose(&step.effect());
            Some(*state)
        }))
        .collect::<Vec<_>>();
    let mut suffixes = vec![CubeState::solved(); sequence.len() + 1];
    for (i, step) in sequence.iter().enumerate().rev() {
        suffixes[i] = step.effect().compose(&suffixes[i + 1]);
    }

    let mut variants = Vec::new();
    for (i, &intended) in sequence.iter().enumerate() {
        let replacements = intended.alternatives().into_iter().map(Some).chain([None]);
        for replacement in replacements {
            let mut state = prefixes[i];
            if let Some(replacement) = replacement {
                state = state.compose(&replacement.effect());
            }
            variants.push(Variant {
                step: i,
                intended,
                replacement,
                state: state.compose(&suffixes[i + 1]),
            });
        }
    }

    debug!(
        working!("Explored {} variants of a {} step sequence"),
        variants.len(),
        sequence.len()
    );
    variants
}

/// The single step mistakes that turn performing `sequence` on `start` into
/// reaching `reached`.
#[must_use]
pub fn find_mistakes<T: Performable>(start: &CubeState, sequence: &[T], reached: &CubeState) -> Vec<Variant<T>> {
    nearby_sequences(start, sequence)
        .into_iter()
        .filter(|variant| variant.state == *reached)
        .collect()
}

/// Solves `start` and finds the wrongly performed operations of that solution
/// that lead to `reached` instead of the solved cube.
///
/// # Errors
///
/// Fails if either state is not reachable by face turns.
pub fn find_wrong_operations(start: &CubeState, reached: &CubeState) -> Result<Vec<Variant<Operation>>, SolveError> {
    reached.validate()?;
    let solution = solve(start)?;
    Ok(find_mistakes(start, &solution.all_operations(), reached))
}
