use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CORNER_COUNT: usize = 8;
pub const EDGE_COUNT: usize = 12;

const CORNER_TWISTS: u8 = 3;
const EDGE_FLIPS: u8 = 2;

/// The state of a 3x3x3 cube, stored as the piece and orientation held by
/// every corner and edge slot.
///
/// Corner slots are numbered UBL, UBR, UFR, UFL, DBL, DBR, DFR, DFL and edge
/// slots BL, BR, FR, FL, UB, UR, UF, UL, DB, DR, DF, DL. `cp[i]` is the corner
/// that currently sits in slot `i` and `co[i]` is its twist away from the
/// U/D axis; `ep` and `eo` are the same for edges, which flip on F and B
/// quarter turns.
///
/// A `CubeState` doubles as a transform: composing a state with another
/// state applies the second one as a move (see [`CubeState::compose`]).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CubeState {
    cp: [u8; CORNER_COUNT],
    co: [u8; CORNER_COUNT],
    ep: [u8; EDGE_COUNT],
    eo: [u8; EDGE_COUNT],
}

/// Whether a permutation is made of an even or an odd number of swaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parity {
    Even,
    Odd,
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::Even => f.write_str("even"),
            Parity::Odd => f.write_str("odd"),
        }
    }
}

/// The first invariant a [`CubeState`] breaks, as found by
/// [`CubeState::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Corner permutation {0:?} is not a permutation of 0..8")]
    CornerPermutation([u8; CORNER_COUNT]),
    #[error("Edge permutation {0:?} is not a permutation of 0..12")]
    EdgePermutation([u8; EDGE_COUNT]),
    #[error("Corner orientation {value} in slot {slot} is out of range (expected 0 to 2)")]
    CornerOrientationOutOfRange { slot: usize, value: u8 },
    #[error("Edge orientation {value} in slot {slot} is out of range (expected 0 or 1)")]
    EdgeOrientationOutOfRange { slot: usize, value: u8 },
    #[error("Corner orientations sum to {sum}, which is not a multiple of 3")]
    CornerTwist { sum: u32 },
    #[error("Edge orientations sum to {sum}, which is not a multiple of 2")]
    EdgeFlip { sum: u32 },
    #[error("Corner permutation is {corners} but edge permutation is {edges}")]
    PermutationParity { corners: Parity, edges: Parity },
}

#[allow(clippy::cast_possible_truncation)]
const fn identity<const N: usize>() -> [u8; N] {
    let mut perm = [0; N];
    let mut i = 0;
    while i < N {
        perm[i] = i as u8;
        i += 1;
    }
    perm
}

fn is_permutation<const N: usize>(perm: &[u8; N]) -> bool {
    let mut seen = [false; N];
    for &piece in perm {
        let Some(seen) = seen.get_mut(piece as usize) else {
            return false;
        };
        if *seen {
            return false;
        }
        *seen = true;
    }
    true
}

/// The parity of a permutation, counted through its cycle decomposition.
/// `perm` must already be a permutation.
fn parity<const N: usize>(perm: &[u8; N]) -> Parity {
    let mut seen = [false; N];
    let mut cycles = 0;
    for start in 0..N {
        if seen[start] {
            continue;
        }
        cycles += 1;
        let mut slot = start;
        while !seen[slot] {
            seen[slot] = true;
            slot = perm[slot] as usize;
        }
    }
    if (N - cycles) % 2 == 0 {
        Parity::Even
    } else {
        Parity::Odd
    }
}

fn compose_orbit<const N: usize>(
    perm: &[u8; N],
    ori: &[u8; N],
    transform_perm: &[u8; N],
    transform_ori: &[u8; N],
    modulus: u8,
) -> ([u8; N], [u8; N]) {
    let mut new_perm = [0; N];
    let mut new_ori = [0; N];
    for (i, &from) in transform_perm.iter().enumerate() {
        new_perm[i] = perm[from as usize];
        new_ori[i] = (ori[from as usize] + transform_ori[i]) % modulus;
    }
    (new_perm, new_ori)
}

#[allow(clippy::cast_possible_truncation)]
fn invert_orbit<const N: usize>(perm: &[u8; N], ori: &[u8; N], modulus: u8) -> ([u8; N], [u8; N]) {
    let mut new_perm = [0; N];
    let mut new_ori = [0; N];
    for (i, &to) in perm.iter().enumerate() {
        new_perm[to as usize] = i as u8;
        new_ori[to as usize] = (modulus - ori[i]) % modulus;
    }
    (new_perm, new_ori)
}

impl CubeState {
    /// Creates a state from raw arrays without checking any invariant. Use
    /// [`CubeState::validate`] before relying on the result being reachable.
    #[must_use]
    pub const fn new(
        cp: [u8; CORNER_COUNT],
        co: [u8; CORNER_COUNT],
        ep: [u8; EDGE_COUNT],
        eo: [u8; EDGE_COUNT],
    ) -> Self {
        CubeState { cp, co, ep, eo }
    }

    #[must_use]
    pub const fn solved() -> Self {
        CubeState {
            cp: identity(),
            co: [0; CORNER_COUNT],
            ep: identity(),
            eo: [0; EDGE_COUNT],
        }
    }

    #[must_use]
    pub fn cp(&self) -> &[u8; CORNER_COUNT] {
        &self.cp
    }

    #[must_use]
    pub fn co(&self) -> &[u8; CORNER_COUNT] {
        &self.co
    }

    #[must_use]
    pub fn ep(&self) -> &[u8; EDGE_COUNT] {
        &self.ep
    }

    #[must_use]
    pub fn eo(&self) -> &[u8; EDGE_COUNT] {
        &self.eo
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        *self == Self::solved()
    }

    /// Applies `transform` on top of this state and returns the result.
    ///
    /// The piece that ends up in slot `i` is the one that was in slot
    /// `transform.cp[i]`, twisted further by `transform.co[i]`. Composing
    /// with the solved state is the identity.
    ///
    /// # Panics
    ///
    /// Panics if either state holds a permutation value out of range.
    #[must_use]
    pub fn compose(&self, transform: &CubeState) -> CubeState {
        let (cp, co) = compose_orbit(&self.cp, &self.co, &transform.cp, &transform.co, CORNER_TWISTS);
        let (ep, eo) = compose_orbit(&self.ep, &self.eo, &transform.ep, &transform.eo, EDGE_FLIPS);
        CubeState { cp, co, ep, eo }
    }

    /// The transform that undoes this one, so that
    /// `state.compose(&state.inverse())` is solved.
    #[must_use]
    pub fn inverse(&self) -> CubeState {
        let (cp, co) = invert_orbit(&self.cp, &self.co, CORNER_TWISTS);
        let (ep, eo) = invert_orbit(&self.ep, &self.eo, EDGE_FLIPS);
        CubeState { cp, co, ep, eo }
    }

    /// Checks that this state can be reached from the solved cube by face
    /// turns.
    ///
    /// # Errors
    ///
    /// Returns the first invariant that does not hold. Permutations are
    /// checked before orientations, and parity last since it is only defined
    /// on real permutations.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        if !is_permutation(&self.cp) {
            return Err(InvariantViolation::CornerPermutation(self.cp));
        }
        if !is_permutation(&self.ep) {
            return Err(InvariantViolation::EdgePermutation(self.ep));
        }

        if let Some((slot, &value)) = self.co.iter().find_position(|&&v| v >= CORNER_TWISTS) {
            return Err(InvariantViolation::CornerOrientationOutOfRange { slot, value });
        }
        if let Some((slot, &value)) = self.eo.iter().find_position(|&&v| v >= EDGE_FLIPS) {
            return Err(InvariantViolation::EdgeOrientationOutOfRange { slot, value });
        }

        let sum = self.co.iter().map(|&v| u32::from(v)).sum::<u32>();
        if sum % u32::from(CORNER_TWISTS) != 0 {
            return Err(InvariantViolation::CornerTwist { sum });
        }
        let sum = self.eo.iter().map(|&v| u32::from(v)).sum::<u32>();
        if sum % u32::from(EDGE_FLIPS) != 0 {
            return Err(InvariantViolation::EdgeFlip { sum });
        }

        let corners = self.corner_parity();
        let edges = self.edge_parity();
        if corners != edges {
            return Err(InvariantViolation::PermutationParity { corners, edges });
        }

        Ok(())
    }

    /// # Panics
    ///
    /// Panics if `cp` is not a permutation.
    #[must_use]
    pub fn corner_parity(&self) -> Parity {
        parity(&self.cp)
    }

    /// # Panics
    ///
    /// Panics if `ep` is not a permutation.
    #[must_use]
    pub fn edge_parity(&self) -> Parity {
        parity(&self.ep)
    }
}

impl Default for CubeState {
    fn default() -> Self {
        Self::solved()
    }
}

impl fmt::Debug for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "cp: [{}]", self.cp.iter().join(", "))?;
        writeln!(f, "co: [{}]", self.co.iter().join(", "))?;
        writeln!(f, "ep: [{}]", self.ep.iter().join(", "))?;
        write!(f, "eo: [{}]", self.eo.iter().join(", "))
    }
}
