//! Breadth first search for setup moves that turn one base swap algorithm
//! into every swap the solver can emit.
//!
//! A conjugate `setup' base setup` moves exactly the pieces that `setup`
//! carries the base algorithm's pieces to, so the search only needs to follow
//! the two corners and two edges the base algorithm exchanges. Each of the
//! four is stored as `slot * orientations + orientation`, which is below 24
//! for both corners and edges.

use std::collections::{BTreeMap, VecDeque};

use cube_core::{CORNER_COUNT, CubeState, EDGE_COUNT, Move, apply_all, format_moves, invert, simplify};
use log::debug;

use crate::{
    operation::{CORNER_BUFFER, CornerOperation, EDGE_BUFFER, EdgeOperation, Operation, PARITY_CORNERS, PARITY_EDGES},
    working,
};

const PIECE_STATES: u32 = 24;
const STATE_COUNT: usize = 24 * 24 * 24 * 24;
const UNVISITED: u32 = u32::MAX;

/// Where every slot's piece goes under each move, and the orientation it
/// gains on the way.
pub(super) struct MoveMaps {
    corners: [[(u8, u8); CORNER_COUNT]; 18],
    edges: [[(u8, u8); EDGE_COUNT]; 18],
}

impl MoveMaps {
    #[allow(clippy::cast_possible_truncation)]
    pub(super) fn new() -> Self {
        let mut corners = [[(0, 0); CORNER_COUNT]; 18];
        let mut edges = [[(0, 0); EDGE_COUNT]; 18];
        for move_ in Move::ALL {
            let transform = move_.transform();
            for (slot, &from) in transform.cp().iter().enumerate() {
                corners[move_.index()][from as usize] = (slot as u8, transform.co()[slot]);
            }
            for (slot, &from) in transform.ep().iter().enumerate() {
                edges[move_.index()][from as usize] = (slot as u8, transform.eo()[slot]);
            }
        }
        MoveMaps { corners, edges }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    slot: u8,
    orientation: u8,
}

/// The two tracked corners followed by the two tracked edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tracked([Placement; 4]);

impl Tracked {
    fn encode(&self) -> u32 {
        self.0.iter().enumerate().fold(0, |key, (i, placement)| {
            let orientations = if i < 2 { 3 } else { 2 };
            key * PIECE_STATES + u32::from(placement.slot) * orientations + u32::from(placement.orientation)
        })
    }

    #[allow(clippy::cast_possible_truncation)]
    fn decode(mut key: u32) -> Self {
        let mut placements = [Placement {
            slot: 0,
            orientation: 0,
        }; 4];
        for (i, placement) in placements.iter_mut().enumerate().rev() {
            let orientations = if i < 2 { 3 } else { 2 };
            let digit = key % PIECE_STATES;
            key /= PIECE_STATES;
            *placement = Placement {
                slot: (digit / orientations) as u8,
                orientation: (digit % orientations) as u8,
            };
        }
        Tracked(placements)
    }

    fn step(&self, maps: &MoveMaps, move_: Move) -> Self {
        let mut next = self.0;
        for (i, placement) in next.iter_mut().enumerate() {
            let (map, orientations) = if i < 2 {
                (&maps.corners[move_.index()][..], 3)
            } else {
                (&maps.edges[move_.index()][..], 2)
            };
            let (slot, twist) = map[placement.slot as usize];
            *placement = Placement {
                slot,
                orientation: (placement.orientation + twist) % orientations,
            };
        }
        Tracked(next)
    }

    fn corner_slots(&self) -> [usize; 2] {
        [self.0[0].slot as usize, self.0[1].slot as usize]
    }

    fn edge_slots(&self) -> [usize; 2] {
        [self.0[2].slot as usize, self.0[3].slot as usize]
    }

    /// Whether the conjugate through this placement can be a buffer swap with
    /// the right parity side effect.
    fn is_candidate(&self) -> bool {
        let corners = self.corner_slots();
        let edges = self.edge_slots();
        let corner_swap = corners.contains(&CORNER_BUFFER) && same_pair(edges, PARITY_EDGES);
        let edge_swap = edges.contains(&EDGE_BUFFER) && same_pair(corners, PARITY_CORNERS);
        corner_swap || edge_swap
    }
}

fn same_pair(a: [usize; 2], b: [usize; 2]) -> bool {
    a == b || a == [b[1], b[0]]
}

/// The solver swap that `effect` performs exactly, if any. The parity pairs
/// avoid both buffers, so no effect is a corner swap and an edge swap at once.
fn classify(effect: &CubeState) -> Option<Operation> {
    let corner = Operation::Corner(CornerOperation::Swap {
        target1: CORNER_BUFFER,
        target2: effect.cp()[CORNER_BUFFER] as usize,
        orientation: effect.co()[CORNER_BUFFER],
    });
    let edge = Operation::Edge(EdgeOperation::Swap {
        target1: EDGE_BUFFER,
        target2: effect.ep()[EDGE_BUFFER] as usize,
        orientation: effect.eo()[EDGE_BUFFER],
    });
    [corner, edge]
        .into_iter()
        .find(|operation| operation.expected_effect().as_ref() == Some(effect))
}

/// An algorithm that exchanges exactly two corners and two edges.
pub(super) struct BaseAlgorithm {
    moves: Vec<Move>,
    start: Tracked,
}

impl BaseAlgorithm {
    /// Returns `None` unless `moves` swaps two corners and two edges and
    /// leaves every other piece alone.
    #[allow(clippy::cast_possible_truncation)]
    pub(super) fn new(moves: Vec<Move>) -> Option<Self> {
        let effect = apply_all(CubeState::solved(), moves.iter().copied());

        let moved_corners = (0..CORNER_COUNT)
            .filter(|&slot| effect.cp()[slot] as usize != slot || effect.co()[slot] != 0)
            .collect::<Vec<_>>();
        let moved_edges = (0..EDGE_COUNT)
            .filter(|&slot| effect.ep()[slot] as usize != slot || effect.eo()[slot] != 0)
            .collect::<Vec<_>>();
        let ([c1, c2], [e1, e2]) = (moved_corners.as_slice(), moved_edges.as_slice()) else {
            return None;
        };
        let is_swap = effect.cp()[*c1] as usize == *c2
            && effect.cp()[*c2] as usize == *c1
            && effect.ep()[*e1] as usize == *e2
            && effect.ep()[*e2] as usize == *e1;
        if !is_swap {
            return None;
        }

        let placement = |slot: usize| Placement {
            slot: slot as u8,
            orientation: 0,
        };
        Some(BaseAlgorithm {
            moves,
            start: Tracked([placement(*c1), placement(*c2), placement(*e1), placement(*e2)]),
        })
    }

    /// Finds the shortest conjugate of this algorithm for every swap shape,
    /// stopping once all of them are found.
    #[allow(clippy::cast_possible_truncation)]
    pub(super) fn conjugates(&self, maps: &MoveMaps) -> BTreeMap<Operation, Vec<Move>> {
        let wanted = Operation::all_reachable()
            .into_iter()
            .filter(|operation| {
                matches!(
                    operation,
                    Operation::Corner(CornerOperation::Swap { .. }) | Operation::Edge(EdgeOperation::Swap { .. })
                )
            })
            .count();

        let mut found = BTreeMap::new();
        let mut parents = vec![UNVISITED; STATE_COUNT];
        let mut via = vec![0_u8; STATE_COUNT];
        let mut queue = VecDeque::new();

        let start = self.start.encode();
        parents[start as usize] = start;
        queue.push_back(start);

        while let Some(key) = queue.pop_front() {
            let tracked = Tracked::decode(key);

            if tracked.is_candidate() {
                let setup = setup_moves(&parents, &via, key);
                let algorithm = simplify(&[invert(&setup), self.moves.clone(), setup].concat());
                let effect = apply_all(CubeState::solved(), algorithm.iter().copied());
                if let Some(operation) = classify(&effect) {
                    found.entry(operation).or_insert(algorithm);
                }
                if found.len() == wanted {
                    break;
                }
            }

            for move_ in Move::ALL {
                let next = tracked.step(maps, move_).encode();
                if parents[next as usize] == UNVISITED {
                    parents[next as usize] = key;
                    via[next as usize] = move_.index() as u8;
                    queue.push_back(next);
                }
            }
        }

        debug!(
            working!("Found {} of {} swaps by conjugating `{}`"),
            found.len(),
            wanted,
            format_moves(&self.moves)
        );
        found
    }
}

/// Walks the search tree back from `key` to the start.
fn setup_moves(parents: &[u32], via: &[u8], mut key: u32) -> Vec<Move> {
    let mut setup = Vec::new();
    while parents[key as usize] != key {
        setup.push(Move::ALL[via[key as usize] as usize]);
        key = parents[key as usize];
    }
    setup.reverse();
    setup
}

#[cfg(test)]
mod tests {
    use cube_core::parse;

    use super::*;

    const T_PERM: &str = "R U R' U' R' F R2 U' R' U' R U R' F'";

    #[test]
    fn encoding_round_trips() {
        let tracked = Tracked([
            Placement {
                slot: 7,
                orientation: 2,
            },
            Placement {
                slot: 0,
                orientation: 1,
            },
            Placement {
                slot: 11,
                orientation: 1,
            },
            Placement {
                slot: 4,
                orientation: 0,
            },
        ]);
        let key = tracked.encode();
        assert!((key as usize) < STATE_COUNT);
        assert_eq!(Tracked::decode(key), tracked);
    }

    #[test]
    fn step_follows_move_engine() {
        let maps = MoveMaps::new();
        let moves = parse("R U F' D2 L B").unwrap();
        let state = apply_all(CubeState::solved(), moves.iter().copied());

        let mut tracked = Tracked([
            Placement {
                slot: 0,
                orientation: 0,
            },
            Placement {
                slot: 5,
                orientation: 0,
            },
            Placement {
                slot: 1,
                orientation: 0,
            },
            Placement {
                slot: 9,
                orientation: 0,
            },
        ]);
        for &move_ in &moves {
            tracked = tracked.step(&maps, move_);
        }

        for (i, &piece) in [0_u8, 5].iter().enumerate() {
            let slot = state.cp().iter().position(|&p| p == piece).unwrap();
            assert_eq!(tracked.0[i].slot as usize, slot);
            assert_eq!(tracked.0[i].orientation, state.co()[slot]);
        }
        for (i, &piece) in [1_u8, 9].iter().enumerate() {
            let slot = state.ep().iter().position(|&p| p == piece).unwrap();
            assert_eq!(tracked.0[i + 2].slot as usize, slot);
            assert_eq!(tracked.0[i + 2].orientation, state.eo()[slot]);
        }
    }

    #[test]
    fn t_permutation_is_a_base() {
        let moves = parse(T_PERM).unwrap();
        let base = BaseAlgorithm::new(moves).unwrap();
        assert_eq!(base.start.corner_slots(), [1, 2]);
        assert_eq!(base.start.edge_slots(), [5, 7]);
    }

    #[test]
    fn rejects_non_swaps() {
        assert!(BaseAlgorithm::new(parse("R U R' U'").unwrap()).is_none());
        assert!(BaseAlgorithm::new(parse("R").unwrap()).is_none());
        assert!(BaseAlgorithm::new(Vec::new()).is_none());
    }

    #[test]
    fn classifies_exact_swaps_only() {
        let effect_of = |notation: &str| apply_all(CubeState::solved(), parse(notation).unwrap());

        // U2 carries UBR and UFR to UFL and UBL while keeping UR and UL a pair
        assert_eq!(
            classify(&effect_of(&format!("U2 {T_PERM} U2"))),
            Some(Operation::Corner(CornerOperation::Swap {
                target1: 0,
                target2: 3,
                orientation: 0
            }))
        );
        assert_eq!(
            classify(&effect_of(&format!("L {T_PERM} L'"))),
            Some(Operation::Edge(EdgeOperation::Swap {
                target1: 0,
                target2: 5,
                orientation: 0
            }))
        );

        // The T permutation itself leaves both buffers alone
        assert_eq!(classify(&effect_of(T_PERM)), None);
        assert_eq!(classify(&CubeState::solved()), None);
        assert_eq!(classify(&effect_of("R")), None);
        assert_eq!(classify(&effect_of("F R U' R' U' R U R' F' R U R' U' R' F R F'")), None);
    }
}
