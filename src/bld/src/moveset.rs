use std::{
    collections::{BTreeMap, btree_map::Entry},
    sync::LazyLock,
    time::Instant,
};

use cube_core::{CubeState, Move, NotationError, ParseError, apply_all, expand, format_moves, parse, simplify};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    operation::{CORNER_BUFFER, CornerOperation, EDGE_BUFFER, EdgeOperation, Operation},
    start, success,
};

mod conjugate_search;

use conjugate_search::{BaseAlgorithm, MoveMaps};

/// Permutation algorithms that exchange two corners and two edges, in the
/// order they are tried when building the default moveset.
const BASE_ALGORITHMS: [&str; 3] = [
    // T permutation
    "R U R' U' R' F R2 U' R' U' R U R' F'",
    // Jb permutation
    "R U R' F' R U R' U' R' F R2 U' R' U'",
    // Y permutation
    "F R U' R' U' R U R' F' R U R' U' R' F R F'",
];

#[derive(Error, Debug)]
pub enum MovesetError {
    #[error("Could not read the moveset: {0}")]
    Json(#[from] serde_json::Error),
    #[error("The algorithm for {operation} does not parse: {source}")]
    InvalidAlgorithm { operation: Operation, source: NotationError },
    #[error("The base algorithm `{notation}` does not parse: {source}")]
    InvalidBaseAlgorithm { notation: String, source: ParseError },
    #[error("{operation} is never emitted by the solver")]
    UnreachableOperation { operation: Operation },
    #[error("The moveset has more than one algorithm for {operation}")]
    DuplicateEntry { operation: Operation },
    #[error("The algorithm `{algorithm}` does not perform {operation}")]
    IncorrectAlgorithm { operation: Operation, algorithm: String },
    #[error("The moveset is missing algorithms for {} operations, starting with {}", .missing.len(), .missing[0])]
    Incomplete { missing: Vec<Operation> },
}

/// A table from every operation shape to an algorithm that performs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MovesetRepr", into = "MovesetRepr")]
pub struct Moveset {
    name: String,
    algorithms: BTreeMap<Operation, Vec<Move>>,
}

#[derive(Serialize, Deserialize)]
struct MovesetRepr {
    name: String,
    entries: Vec<MovesetEntry>,
}

#[derive(Serialize, Deserialize)]
struct MovesetEntry {
    operation: Operation,
    algorithm: String,
}

impl TryFrom<MovesetRepr> for Moveset {
    type Error = MovesetError;

    fn try_from(repr: MovesetRepr) -> Result<Self, Self::Error> {
        let mut moveset = Moveset::new(repr.name);
        for MovesetEntry { operation, algorithm } in repr.entries {
            if operation.expected_effect().is_none() {
                return Err(MovesetError::UnreachableOperation { operation });
            }
            let algorithm =
                expand(&algorithm).map_err(|source| MovesetError::InvalidAlgorithm { operation, source })?;
            if moveset.insert(operation, algorithm).is_some() {
                return Err(MovesetError::DuplicateEntry { operation });
            }
        }
        Ok(moveset)
    }
}

impl From<Moveset> for MovesetRepr {
    fn from(moveset: Moveset) -> Self {
        MovesetRepr {
            name: moveset.name,
            entries: moveset
                .algorithms
                .into_iter()
                .map(|(operation, algorithm)| MovesetEntry {
                    operation,
                    algorithm: format_moves(&algorithm),
                })
                .collect(),
        }
    }
}

impl Moveset {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Moveset {
            name: name.into(),
            algorithms: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the algorithm for `operation`, returning the one it replaces.
    pub fn insert(&mut self, operation: Operation, algorithm: Vec<Move>) -> Option<Vec<Move>> {
        self.algorithms.insert(operation, algorithm)
    }

    #[must_use]
    pub fn get(&self, operation: &Operation) -> Option<&[Move]> {
        self.algorithms.get(operation).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Operation, &[Move])> {
        self.algorithms
            .iter()
            .map(|(operation, algorithm)| (operation, algorithm.as_slice()))
    }

    /// Operations the solver can emit that have no algorithm here.
    #[must_use]
    pub fn missing_operations(&self) -> Vec<Operation> {
        Operation::all_reachable()
            .into_iter()
            .filter(|operation| !self.algorithms.contains_key(operation))
            .collect()
    }

    /// Checks that every algorithm performs exactly the change its operation
    /// describes, parity side effects included.
    ///
    /// # Errors
    ///
    /// Returns the first operation whose algorithm does something else.
    pub fn verify(&self) -> Result<(), MovesetError> {
        for (&operation, algorithm) in &self.algorithms {
            let effect = apply_all(CubeState::solved(), algorithm.iter().copied());
            if operation.expected_effect() != Some(effect) {
                return Err(MovesetError::IncorrectAlgorithm {
                    operation,
                    algorithm: format_moves(algorithm),
                });
            }
        }
        Ok(())
    }

    /// Reads a moveset in the format written by [`Moveset::to_json`].
    /// Algorithms may use the commutator shorthand that [`expand`] reads.
    ///
    /// # Errors
    ///
    /// Fails if the document is malformed, if an algorithm does not parse, or
    /// if an operation is listed twice or can never be emitted.
    pub fn from_json(json: &str) -> Result<Self, MovesetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Fails only if serialization itself fails.
    pub fn to_json(&self) -> Result<String, MovesetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds a complete moveset by conjugating [`BASE_ALGORITHMS`].
    ///
    /// Every swap gets the shortest `setup' base setup` found by a breadth
    /// first search over setups. Twists and flips are the swap with
    /// orientation 0 followed by the swap with the wanted orientation, which
    /// cancels the parity side effect and leaves only the reorientation.
    ///
    /// # Errors
    ///
    /// Fails if a base algorithm does not parse or if the base algorithms do
    /// not cover every operation.
    pub fn generate() -> Result<Self, MovesetError> {
        info!(start!("Generating the default moveset"));
        let now = Instant::now();

        let maps = MoveMaps::new();
        let mut swaps = BTreeMap::<Operation, Vec<Move>>::new();
        for notation in BASE_ALGORITHMS {
            let moves = parse(notation).map_err(|source| MovesetError::InvalidBaseAlgorithm {
                notation: notation.to_owned(),
                source,
            })?;
            let Some(base) = BaseAlgorithm::new(moves) else {
                debug!("Skipping `{notation}`, it is not a swap of two corners and two edges");
                continue;
            };

            for (operation, algorithm) in base.conjugates(&maps) {
                match swaps.entry(operation) {
                    Entry::Vacant(entry) => {
                        entry.insert(algorithm);
                    }
                    Entry::Occupied(mut entry) if algorithm.len() < entry.get().len() => {
                        entry.insert(algorithm);
                    }
                    Entry::Occupied(_) => {}
                }
            }
        }

        let mut moveset = Moveset::new("default");
        for (&operation, algorithm) in &swaps {
            moveset.insert(operation, algorithm.clone());
        }

        for operation in Operation::all_reachable() {
            let (first, second) = match operation {
                Operation::Corner(CornerOperation::Twist { target, orientation }) => (
                    corner_swap(target, 0),
                    corner_swap(target, orientation),
                ),
                Operation::Edge(EdgeOperation::Flip { target }) => (edge_swap(target, 0), edge_swap(target, 1)),
                _ => continue,
            };
            let (Some(first), Some(second)) = (swaps.get(&first), swaps.get(&second)) else {
                continue;
            };
            let algorithm = simplify(&[first.as_slice(), second.as_slice()].concat());
            moveset.insert(operation, algorithm);
        }

        let missing = moveset.missing_operations();
        if !missing.is_empty() {
            return Err(MovesetError::Incomplete { missing });
        }

        info!(success!("Generated the default moveset in {:.2?}"), now.elapsed());
        Ok(moveset)
    }
}

fn corner_swap(target: usize, orientation: u8) -> Operation {
    Operation::Corner(CornerOperation::Swap {
        target1: CORNER_BUFFER,
        target2: target,
        orientation,
    })
}

fn edge_swap(target: usize, orientation: u8) -> Operation {
    Operation::Edge(EdgeOperation::Swap {
        target1: EDGE_BUFFER,
        target2: target,
        orientation,
    })
}

static DEFAULT_MOVESET: LazyLock<Moveset> = LazyLock::new(|| {
    // The base algorithms are constants, so this can only fail if they are
    // edited into something that is not a two corner two edge swap
    Moveset::generate().expect("the base algorithms generate a complete moveset")
});

/// The moveset used when none is given. It is generated on first use and
/// shared afterwards.
#[must_use]
pub fn default_moveset() -> &'static Moveset {
    &DEFAULT_MOVESET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn default_moveset_is_complete() {
        let moveset = default_moveset();
        assert_eq!(moveset.missing_operations(), []);
        assert_eq!(moveset.len(), Operation::all_reachable().len());
        assert_eq!(moveset.name(), "default");
    }

    #[test_log::test]
    fn default_moveset_is_correct() {
        default_moveset().verify().unwrap();
    }

    #[test_log::test]
    fn corner_swap_conjugates_the_t_permutation() {
        // U2 turns the T permutation's UBR and UFR swap into UBL and UFL
        let expected = parse(&format!("U2 {} U2", BASE_ALGORITHMS[0])).unwrap();
        assert_eq!(default_moveset().get(&corner_swap(3, 0)), Some(expected.as_slice()));
    }

    #[test_log::test]
    fn algorithms_stay_short() {
        for (operation, algorithm) in default_moveset().iter() {
            assert!(algorithm.len() <= 48, "{operation}: {}", format_moves(algorithm));
        }
    }

    #[test_log::test]
    fn json_round_trip() {
        let json = default_moveset().to_json().unwrap();
        let loaded = Moveset::from_json(&json).unwrap();
        assert_eq!(&loaded, default_moveset());
    }

    #[test_log::test]
    fn loads_partial_moveset() {
        let json = r#"{
            "name": "one swap",
            "entries": [
                {
                    "operation": { "corner": { "swap": { "target1": 0, "target2": 3, "orientation": 0 } } },
                    "algorithm": "U2: R U R' U' R' F R2 U' R' U' R U R' F'"
                }
            ]
        }"#;
        let moveset = Moveset::from_json(json).unwrap();
        assert_eq!(moveset.name(), "one swap");
        assert_eq!(moveset.get(&corner_swap(3, 0)), default_moveset().get(&corner_swap(3, 0)));
        assert_eq!(moveset.len(), 1);
        moveset.verify().unwrap();
        assert_eq!(moveset.missing_operations().len(), Operation::all_reachable().len() - 1);
    }

    #[test_log::test]
    fn rejects_bad_entries() {
        let bad_algorithm = r#"{ "name": "x", "entries": [
            { "operation": { "edge": { "flip": { "target": 3 } } }, "algorithm": "R Q" }
        ] }"#;
        let err = Moveset::from_json(bad_algorithm).unwrap_err();
        assert!(err.to_string().contains("`Q`"), "{err}");

        let no_setup = r#"{ "name": "x", "entries": [
            { "operation": { "edge": { "flip": { "target": 3 } } }, "algorithm": ": R" }
        ] }"#;
        let err = Moveset::from_json(no_setup).unwrap_err();
        assert!(err.to_string().contains("nothing before the `:`"), "{err}");

        let unreachable = r#"{ "name": "x", "entries": [
            { "operation": { "edge": { "flip": { "target": 0 } } }, "algorithm": "R" }
        ] }"#;
        assert!(Moveset::from_json(unreachable).is_err());

        let duplicate = r#"{ "name": "x", "entries": [
            { "operation": { "edge": { "flip": { "target": 3 } } }, "algorithm": "R" },
            { "operation": { "edge": { "flip": { "target": 3 } } }, "algorithm": "U" }
        ] }"#;
        assert!(Moveset::from_json(duplicate).is_err());

        assert!(matches!(Moveset::from_json("[]"), Err(MovesetError::Json(_))));
    }

    #[test_log::test]
    fn verify_catches_wrong_algorithm() {
        let mut moveset = Moveset::new("wrong");
        moveset.insert(corner_swap(3, 0), parse("R U R' U'").unwrap());
        assert!(matches!(
            moveset.verify(),
            Err(MovesetError::IncorrectAlgorithm { .. })
        ));
    }
}
