use cube_core::{CORNER_COUNT, CubeState, EDGE_COUNT, InvariantViolation};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    operation::{CORNER_BUFFER, CornerOperation, EDGE_BUFFER, EdgeOperation, Operation, PARITY_EDGES},
    working,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("Invalid cube state: {0}")]
    InvalidState(#[from] InvariantViolation),
}

/// The operations that solve a cube, in the order they are performed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BldSolution {
    pub corner_operations: Vec<CornerOperation>,
    pub edge_operations: Vec<EdgeOperation>,
}

impl BldSolution {
    /// Corner operations followed by edge operations.
    #[must_use]
    pub fn all_operations(&self) -> Vec<Operation> {
        self.corner_operations
            .iter()
            .copied()
            .map(Operation::Corner)
            .chain(self.edge_operations.iter().copied().map(Operation::Edge))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.corner_operations.is_empty() && self.edge_operations.is_empty()
    }
}

/// One step of a cycle decomposition, before it is tagged as a corner or
/// edge operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Swap { target: usize, orientation: u8 },
    Reorient { target: usize, orientation: u8 },
}

/// Pieces and orientations of one orbit, reduced to the solved state one
/// buffer swap at a time.
struct Orbit<const N: usize> {
    perm: [u8; N],
    ori: [u8; N],
    modulus: u8,
    buffer: usize,
}

impl<const N: usize> Orbit<N> {
    /// Exchanges the buffer with `target`, mirroring what the algorithm for
    /// the emitted swap does to the cube.
    fn swap(&mut self, target: usize) -> Step {
        let orientation = self.ori[self.buffer];
        self.perm.swap(self.buffer, target);
        self.ori[self.buffer] = (self.ori[target] + orientation) % self.modulus;
        self.ori[target] = 0;
        Step::Swap { target, orientation }
    }

    fn first_unsolved(&self) -> Option<usize> {
        (0..N).find(|&slot| slot != self.buffer && self.perm[slot] as usize != slot)
    }

    fn decompose(mut self) -> Vec<Step> {
        let mut steps = Vec::new();

        loop {
            // Follow the cycle through the buffer until the buffer piece is home
            while self.perm[self.buffer] as usize != self.buffer {
                let target = self.perm[self.buffer] as usize;
                steps.push(self.swap(target));
            }

            let Some(target) = self.first_unsolved() else {
                break;
            };
            trace!("Breaking into a new cycle at slot {target}");
            steps.push(self.swap(target));
        }

        for target in (0..N).filter(|&slot| slot != self.buffer) {
            let orientation = self.ori[target];
            if orientation != 0 {
                steps.push(Step::Reorient { target, orientation });
                self.ori[self.buffer] = (self.ori[self.buffer] + orientation) % self.modulus;
                self.ori[target] = 0;
            }
        }

        debug_assert_eq!(self.ori[self.buffer], 0);
        steps
    }
}

fn solve_corners(cp: [u8; CORNER_COUNT], co: [u8; CORNER_COUNT]) -> Vec<CornerOperation> {
    let orbit = Orbit {
        perm: cp,
        ori: co,
        modulus: 3,
        buffer: CORNER_BUFFER,
    };
    orbit
        .decompose()
        .into_iter()
        .map(|step| match step {
            Step::Swap { target, orientation } => CornerOperation::Swap {
                target1: CORNER_BUFFER,
                target2: target,
                orientation,
            },
            Step::Reorient { target, orientation } => CornerOperation::Twist { target, orientation },
        })
        .collect()
}

fn solve_edges(ep: [u8; EDGE_COUNT], eo: [u8; EDGE_COUNT]) -> Vec<EdgeOperation> {
    let orbit = Orbit {
        perm: ep,
        ori: eo,
        modulus: 2,
        buffer: EDGE_BUFFER,
    };
    orbit
        .decompose()
        .into_iter()
        .map(|step| match step {
            Step::Swap { target, orientation } => EdgeOperation::Swap {
                target1: EDGE_BUFFER,
                target2: target,
                orientation,
            },
            Step::Reorient { target, .. } => EdgeOperation::Flip { target },
        })
        .collect()
}

/// Decomposes `state` into buffer swaps and in-place reorientations, corners
/// first.
///
/// Cycles are followed through the buffer until the buffer piece is home,
/// then the lowest unsolved slot starts the next cycle. Twists and flips are
/// emitted last, in slot order, for every misoriented non-buffer piece.
///
/// Every corner swap algorithm also exchanges the edges in
/// [`PARITY_EDGES`], so after an odd number of corner swaps the edges are
/// solved from the state with those two edges exchanged.
///
/// # Errors
///
/// Returns [`SolveError::InvalidState`] if `state` is not reachable by face
/// turns.
pub fn solve(state: &CubeState) -> Result<BldSolution, SolveError> {
    state.validate()?;

    debug!(working!("Decomposing corners"));
    let corner_operations = solve_corners(*state.cp(), *state.co());

    let mut ep = *state.ep();
    let mut eo = *state.eo();
    let corner_swaps = corner_operations.iter().filter(|operation| operation.is_swap()).count();
    if corner_swaps % 2 == 1 {
        debug!("Odd number of corner swaps ({corner_swaps}), exchanging edges {PARITY_EDGES:?}");
        ep.swap(PARITY_EDGES[0], PARITY_EDGES[1]);
        eo.swap(PARITY_EDGES[0], PARITY_EDGES[1]);
    }

    debug!(working!("Decomposing edges"));
    let edge_operations = solve_edges(ep, eo);

    debug!(
        "Found {} corner operations and {} edge operations",
        corner_operations.len(),
        edge_operations.len()
    );

    Ok(BldSolution {
        corner_operations,
        edge_operations,
    })
}
