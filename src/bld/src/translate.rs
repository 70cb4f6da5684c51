use cube_core::format_moves;
use itertools::Itertools;
use log::trace;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{moveset::Moveset, operation::Operation, solver::BldSolution};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("No algorithm for {operation}")]
    NoAlgorithm { operation: Operation },
}

/// One operation and the moves that perform it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSequence {
    pub description: String,
    pub sequence: String,
}

/// A solution ready to be executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedSolution {
    pub move_sequences: Vec<MoveSequence>,
    /// Corner operations followed by edge operations.
    pub all_operations: Vec<Operation>,
    /// Every sequence in order, separated by single spaces.
    pub formatted_solution: String,
}

/// Looks up the algorithm for each operation in `moveset`.
///
/// # Errors
///
/// Returns [`TranslateError::NoAlgorithm`] for the first operation
/// `moveset` has no entry for.
pub fn translate(operations: &[Operation], moveset: &Moveset) -> Result<Vec<MoveSequence>, TranslateError> {
    operations
        .iter()
        .map(|&operation| {
            let algorithm = moveset
                .get(&operation)
                .ok_or(TranslateError::NoAlgorithm { operation })?;
            let sequence = MoveSequence {
                description: operation.to_string(),
                sequence: format_moves(algorithm),
            };
            trace!("{}: {}", sequence.description, sequence.sequence);
            Ok(sequence)
        })
        .collect()
}

/// Translates every operation of `solution` and joins the results into one
/// executable move string.
///
/// # Errors
///
/// Fails if `moveset` is missing an operation the solution uses.
pub fn translate_solution(solution: &BldSolution, moveset: &Moveset) -> Result<TranslatedSolution, TranslateError> {
    let all_operations = solution.all_operations();
    let move_sequences = translate(&all_operations, moveset)?;
    let formatted_solution = move_sequences
        .iter()
        .map(|move_sequence| move_sequence.sequence.as_str())
        .filter(|sequence| !sequence.is_empty())
        .join(" ");

    Ok(TranslatedSolution {
        move_sequences,
        all_operations,
        formatted_solution,
    })
}
