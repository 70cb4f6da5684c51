#![warn(clippy::pedantic)]

//! Blindfolded solving for the 3x3x3 cube: cycle decomposition of a cube
//! state into buffer operations, and translation of those operations into
//! concrete algorithms.

pub mod api;
pub mod explore;
pub mod moveset;
pub mod operation;
pub mod solver;
pub mod translate;

pub use explore::{Performable, Variant, find_mistakes, find_wrong_operations, nearby_sequences};
pub use moveset::{Moveset, MovesetError, default_moveset};
pub use operation::{CornerOperation, EdgeOperation, Operation};
pub use solver::{BldSolution, SolveError, solve};
pub use translate::{MoveSequence, TranslateError, TranslatedSolution, translate, translate_solution};

#[macro_export]
macro_rules! start {
    ($msg:expr) => {
        concat!("⏳ ", $msg)
    };
}

#[macro_export]
macro_rules! working {
    ($msg:expr) => {
        concat!("🛠  ", $msg)
    };
}

#[macro_export]
macro_rules! success {
    ($msg:expr) => {
        concat!("✅ ", $msg)
    };
}
