#![warn(clippy::pedantic)]

//! The 3x3x3 cube as a permutation and orientation state, together with the
//! face-turn notation used to move it around.

pub mod moves;
pub mod scramble;
pub mod state;

pub use moves::{Face, Move, Turn, apply, apply_all};
pub use scramble::{
    NotationError, ParseError, UnknownMove, expand, format_moves, invert, parse, scramble_to_state, simplify,
};
pub use state::{CORNER_COUNT, CubeState, EDGE_COUNT, InvariantViolation, Parity};
