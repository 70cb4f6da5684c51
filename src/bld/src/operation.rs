use std::fmt;

use cube_core::{CORNER_COUNT, CubeState, EDGE_COUNT};
use serde::{Deserialize, Serialize};

/// The corner every corner swap goes through (UBL).
pub const CORNER_BUFFER: usize = 0;
/// The edge every edge swap goes through (BL).
pub const EDGE_BUFFER: usize = 0;

/// The edges (UR and UL) that every corner swap algorithm also exchanges,
/// since a lone corner swap is an odd permutation.
pub const PARITY_EDGES: [usize; 2] = [5, 7];
/// The corners (UBR and UFR) that every edge swap algorithm also exchanges.
pub const PARITY_CORNERS: [usize; 2] = [1, 2];

const CORNER_TWISTS: u8 = 3;
const EDGE_FLIPS: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerOperation {
    /// Exchange the buffer with `target2`. `orientation` is the twist of the
    /// buffer piece before the exchange.
    Swap {
        target1: usize,
        target2: usize,
        orientation: u8,
    },
    /// Untwist `target` in place by `orientation`, moving that twist onto the
    /// buffer.
    Twist { target: usize, orientation: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOperation {
    /// Exchange the buffer with `target2`. `orientation` is the flip of the
    /// buffer piece before the exchange.
    Swap {
        target1: usize,
        target2: usize,
        orientation: u8,
    },
    /// Flip `target` together with the buffer.
    Flip { target: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Corner(CornerOperation),
    Edge(EdgeOperation),
}

impl From<CornerOperation> for Operation {
    fn from(operation: CornerOperation) -> Self {
        Operation::Corner(operation)
    }
}

impl From<EdgeOperation> for Operation {
    fn from(operation: EdgeOperation) -> Self {
        Operation::Edge(operation)
    }
}

impl CornerOperation {
    #[must_use]
    pub fn is_swap(&self) -> bool {
        matches!(self, CornerOperation::Swap { .. })
    }
}

impl EdgeOperation {
    #[must_use]
    pub fn is_swap(&self) -> bool {
        matches!(self, EdgeOperation::Swap { .. })
    }
}

impl Operation {
    /// Every operation the solver can emit, corners first.
    #[must_use]
    pub fn all_reachable() -> Vec<Operation> {
        let corner_targets = (0..CORNER_COUNT).filter(|&target| target != CORNER_BUFFER);
        let edge_targets = (0..EDGE_COUNT).filter(|&target| target != EDGE_BUFFER);

        let mut operations = Vec::new();
        for target in corner_targets.clone() {
            for orientation in 0..CORNER_TWISTS {
                operations.push(Operation::Corner(CornerOperation::Swap {
                    target1: CORNER_BUFFER,
                    target2: target,
                    orientation,
                }));
            }
        }
        for target in corner_targets {
            for orientation in 1..CORNER_TWISTS {
                operations.push(Operation::Corner(CornerOperation::Twist { target, orientation }));
            }
        }
        for target in edge_targets.clone() {
            for orientation in 0..EDGE_FLIPS {
                operations.push(Operation::Edge(EdgeOperation::Swap {
                    target1: EDGE_BUFFER,
                    target2: target,
                    orientation,
                }));
            }
        }
        for target in edge_targets {
            operations.push(Operation::Edge(EdgeOperation::Flip { target }));
        }
        operations
    }

    /// The exact change an algorithm for this operation makes to a solved
    /// cube, including the parity side effect of swaps. Returns `None` for
    /// operations the solver never emits.
    #[must_use]
    pub fn expected_effect(&self) -> Option<CubeState> {
        let solved = CubeState::solved();
        let mut cp = *solved.cp();
        let mut co = *solved.co();
        let mut ep = *solved.ep();
        let mut eo = *solved.eo();

        match *self {
            Operation::Corner(CornerOperation::Swap {
                target1,
                target2,
                orientation,
            }) => {
                if target1 != CORNER_BUFFER
                    || target2 == CORNER_BUFFER
                    || target2 >= CORNER_COUNT
                    || orientation >= CORNER_TWISTS
                {
                    return None;
                }
                cp.swap(target1, target2);
                co[target1] = orientation;
                co[target2] = (CORNER_TWISTS - orientation) % CORNER_TWISTS;
                ep.swap(PARITY_EDGES[0], PARITY_EDGES[1]);
            }
            Operation::Corner(CornerOperation::Twist { target, orientation }) => {
                if target == CORNER_BUFFER || target >= CORNER_COUNT || orientation == 0 || orientation >= CORNER_TWISTS
                {
                    return None;
                }
                co[target] = CORNER_TWISTS - orientation;
                co[CORNER_BUFFER] = orientation;
            }
            Operation::Edge(EdgeOperation::Swap {
                target1,
                target2,
                orientation,
            }) => {
                if target1 != EDGE_BUFFER || target2 == EDGE_BUFFER || target2 >= EDGE_COUNT || orientation >= EDGE_FLIPS {
                    return None;
                }
                ep.swap(target1, target2);
                eo[target1] = orientation;
                eo[target2] = orientation;
                cp.swap(PARITY_CORNERS[0], PARITY_CORNERS[1]);
            }
            Operation::Edge(EdgeOperation::Flip { target }) => {
                if target == EDGE_BUFFER || target >= EDGE_COUNT {
                    return None;
                }
                eo[target] = 1;
                eo[EDGE_BUFFER] = 1;
            }
        }

        Some(CubeState::new(cp, co, ep, eo))
    }
}

impl fmt::Display for CornerOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CornerOperation::Swap {
                target1,
                target2,
                orientation,
            } => write!(f, "Corner swap: slot {target1} ↔ slot {target2} (orientation {orientation})"),
            CornerOperation::Twist { target, orientation } => {
                write!(f, "Corner twist: slot {target} (orientation {orientation})")
            }
        }
    }
}

impl fmt::Display for EdgeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeOperation::Swap {
                target1,
                target2,
                orientation,
            } => write!(f, "Edge swap: slot {target1} ↔ slot {target2} (orientation {orientation})"),
            EdgeOperation::Flip { target } => write!(f, "Edge flip: slot {target}"),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Corner(operation) => write!(f, "{operation}"),
            Operation::Edge(operation) => write!(f, "{operation}"),
        }
    }
}
