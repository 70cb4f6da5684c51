use std::str::FromStr;

use itertools::Itertools;
use log::trace;
use thiserror::Error;

use crate::{
    moves::{Face, Move, Turn, apply_all},
    state::CubeState,
};

/// A single token that is not a face turn.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown move `{0}`")]
pub struct UnknownMove(pub String);

/// A scramble token that could not be read. `position` counts tokens from
/// zero.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid move `{token}` at position {position}")]
pub struct ParseError {
    pub token: String,
    pub position: usize,
}

/// An algorithm in commutator notation that could not be expanded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("`{0}` has nothing before the `:`")]
    MissingSetup(String),
}

impl FromStr for Move {
    type Err = UnknownMove;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let face = chars
            .next()
            .and_then(Face::from_letter)
            .ok_or_else(|| UnknownMove(s.to_owned()))?;
        let turn = match chars.as_str() {
            "" => Turn::Clockwise,
            "'" => Turn::CounterClockwise,
            "2" => Turn::Half,
            _ => return Err(UnknownMove(s.to_owned())),
        };
        Ok(Move::new(face, turn))
    }
}

/// Reads whitespace separated face turns. The moves come back exactly as
/// written; nothing is merged or cancelled.
///
/// # Errors
///
/// Fails on the first token that is not a face letter optionally followed by
/// `'` or `2`.
pub fn parse(text: &str) -> Result<Vec<Move>, ParseError> {
    let moves = text
        .split_whitespace()
        .enumerate()
        .map(|(position, token)| {
            token.parse::<Move>().map_err(|_| ParseError {
                token: token.to_owned(),
                position,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    trace!("Parsed {} moves from {text:?}", moves.len());
    Ok(moves)
}

/// Expands the shorthand that algorithms are usually written in:
///
/// - `A: B` is the conjugate `A B A'`
/// - `A, B` is the commutator `A B A' B'`
/// - `m/B` is `m B m2 B' m` for a single move `m`
///
/// Both sides are expanded again, so `U R U': D, R' U' R` is a commutator
/// inside a conjugate. The first `:` is split on before any `/`, and a `/`
/// before any `,`. Text with none of them is read by [`parse`]. The result
/// is not simplified.
///
/// # Errors
///
/// Fails if a conjugate has no setup or if a plain part does not parse, in
/// which case the position counts tokens within that part.
pub fn expand(text: &str) -> Result<Vec<Move>, NotationError> {
    let text = text.trim();

    if let Some((setup, body)) = text.split_once(':') {
        if setup.trim().is_empty() {
            return Err(NotationError::MissingSetup(text.to_owned()));
        }
        let setup = expand(setup)?;
        let body = expand(body)?;
        return Ok([setup.as_slice(), body.as_slice(), invert(&setup).as_slice()].concat());
    }

    if let Some((pivot, body)) = text.split_once('/') {
        if let Ok(pivot) = pivot.trim().parse::<Move>() {
            let body = expand(body)?;
            let mut moves = vec![pivot];
            moves.extend(&body);
            moves.push(Move::new(pivot.face, Turn::Half));
            moves.extend(invert(&body));
            moves.push(pivot);
            return Ok(moves);
        }
    }

    if let Some((a, b)) = text.split_once(',') {
        let a = expand(a)?;
        let b = expand(b)?;
        return Ok([a.as_slice(), b.as_slice(), invert(&a).as_slice(), invert(&b).as_slice()].concat());
    }

    Ok(parse(text)?)
}

/// The cube state reached by performing `text` on a solved cube.
///
/// # Errors
///
/// Fails if `text` does not parse.
pub fn scramble_to_state(text: &str) -> Result<CubeState, ParseError> {
    Ok(apply_all(CubeState::solved(), parse(text)?))
}

#[must_use]
pub fn format_moves(moves: &[Move]) -> String {
    moves.iter().join(" ")
}

/// The sequence that undoes `moves`.
#[must_use]
pub fn invert(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().copied().map(Move::inverse).collect()
}

/// Merges runs of turns of the same face, dropping the ones that cancel out
/// completely. `R R` becomes `R2` and `U R R' U'` becomes nothing.
#[must_use]
pub fn simplify(moves: &[Move]) -> Vec<Move> {
    let mut simplified: Vec<Move> = Vec::with_capacity(moves.len());
    for &move_ in moves {
        match simplified.last() {
            Some(last) if last.face == move_.face => {
                let quarter_turns = last.turn.quarter_turns() + move_.turn.quarter_turns();
                simplified.pop();
                if let Some(turn) = Turn::from_quarter_turns(quarter_turns) {
                    simplified.push(Move::new(move_.face, turn));
                }
            }
            _ => simplified.push(move_),
        }
    }
    simplified
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(moves: &[Move]) -> Vec<String> {
        moves.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_every_modifier() {
        let moves = parse("R U' F2 D L' B").unwrap();
        assert_eq!(strings(&moves), ["R", "U'", "F2", "D", "L'", "B"]);
        assert_eq!(moves[1], Move::new(Face::U, Turn::CounterClockwise));
        assert_eq!(moves[2], Move::new(Face::F, Turn::Half));
    }

    #[test]
    fn empty_and_blank_input() {
        assert_eq!(parse(""), Ok(vec![]));
        assert_eq!(parse("   \n\t "), Ok(vec![]));
    }

    #[test]
    fn keeps_moves_verbatim() {
        let moves = parse("  R   R R'\tU2 U2 ").unwrap();
        assert_eq!(strings(&moves), ["R", "R", "R'", "U2", "U2"]);
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert_eq!(
            parse("R U X"),
            Err(ParseError {
                token: "X".to_owned(),
                position: 2
            })
        );
        for bad in ["r", "R3", "R''", "R2'", "Rw", "x", "'", "M"] {
            let err = parse(&format!("U {bad} D")).unwrap_err();
            assert_eq!(err.token, bad);
            assert_eq!(err.position, 1);
        }
    }

    #[test]
    fn error_mentions_token() {
        let err = parse("R U X").unwrap_err();
        assert!(err.to_string().contains("`X`"));
    }

    #[test]
    fn display_round_trips() {
        for move_ in Move::ALL {
            assert_eq!(move_.to_string().parse::<Move>(), Ok(move_));
        }
    }

    #[test]
    fn invert_reverses_and_inverts() {
        let moves = parse("R U R' U'").unwrap();
        assert_eq!(format_moves(&invert(&moves)), "U R U' R'");
        assert_eq!(format_moves(&invert(&parse("F2 B'").unwrap())), "B F2");
    }

    #[test]
    fn inverse_sequence_returns_to_solved() {
        let state = scramble_to_state("R U R' U'").unwrap();
        assert!(!state.is_solved());
        let state = apply_all(state, parse("U R U' R'").unwrap());
        assert!(state.is_solved());
    }

    #[test]
    fn expands_commutators() {
        let expand_str = |s: &str| format_moves(&expand(s).unwrap());
        assert_eq!(expand_str("U, R D R'"), "U R D R' U' R D' R'");
        assert_eq!(expand_str("R' D': U"), "R' D' U D R");
        assert_eq!(expand_str("D/R' U' R"), "D R' U' R D2 R' U R D");
        assert_eq!(expand_str("R U R' U'"), "R U R' U'");
        assert_eq!(expand_str(""), "");
    }

    #[test]
    fn expands_nested_notation() {
        let expand_str = |s: &str| format_moves(&expand(s).unwrap());
        assert_eq!(expand_str("R' D': U/R D R'"), "R' D' U R D R' U2 R D' R' U D R");
        assert_eq!(expand_str("U R U': D, R' U' R"), "U R U' D R' U' R D' R' U R U R' U'");
    }

    #[test]
    fn expanded_commutator_matches_written_out_moves() {
        let expanded = expand("R U R': D").unwrap();
        let written = parse("R U R' D R U' R'").unwrap();
        assert_eq!(
            apply_all(CubeState::solved(), expanded),
            apply_all(CubeState::solved(), written)
        );
    }

    #[test]
    fn expand_errors() {
        assert_eq!(expand(" : R"), Err(NotationError::MissingSetup(": R".to_owned())));
        assert_eq!(
            expand("R U, D Q"),
            Err(NotationError::Parse(ParseError {
                token: "Q".to_owned(),
                position: 1
            }))
        );
        // Only a single move can come before a `/`
        assert!(matches!(expand("R U/D"), Err(NotationError::Parse(_))));
    }

    #[test]
    fn simplify_merges_same_face() {
        let simplify_str = |s: &str| format_moves(&simplify(&parse(s).unwrap()));
        assert_eq!(simplify_str("R R"), "R2");
        assert_eq!(simplify_str("R R2"), "R'");
        assert_eq!(simplify_str("U R R' U'"), "");
        assert_eq!(simplify_str("F R U' U' R"), "F R U2 R");
        assert_eq!(simplify_str("R L R"), "R L R");
    }
}
