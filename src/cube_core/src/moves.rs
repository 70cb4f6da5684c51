use std::{fmt, sync::LazyLock};

use serde::{Deserialize, Serialize};

use crate::state::CubeState;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Face {
    U,
    D,
    L,
    R,
    F,
    B,
}

impl Face {
    pub const ALL: [Self; 6] = {
        use Face::*;
        let v = [U, D, L, R, F, B];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'U' => Some(Face::U),
            'D' => Some(Face::D),
            'L' => Some(Face::L),
            'R' => Some(Face::R),
            'F' => Some(Face::F),
            'B' => Some(Face::B),
            _ => None,
        }
    }

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Face::U => 'U',
            Face::D => 'D',
            Face::L => 'L',
            Face::R => 'R',
            Face::F => 'F',
            Face::B => 'B',
        }
    }
}

/// How far a face is turned, looking at it from outside the cube.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Turn {
    Clockwise,
    Half,
    CounterClockwise,
}

impl Turn {
    pub const ALL: [Self; 3] = [Turn::Clockwise, Turn::Half, Turn::CounterClockwise];

    #[must_use]
    pub fn quarter_turns(self) -> u8 {
        match self {
            Turn::Clockwise => 1,
            Turn::Half => 2,
            Turn::CounterClockwise => 3,
        }
    }

    /// The turn equivalent to `quarter_turns` clockwise quarter turns, or
    /// `None` when they add up to a full rotation.
    #[must_use]
    pub fn from_quarter_turns(quarter_turns: u8) -> Option<Self> {
        match quarter_turns % 4 {
            1 => Some(Turn::Clockwise),
            2 => Some(Turn::Half),
            3 => Some(Turn::CounterClockwise),
            _ => None,
        }
    }

    #[must_use]
    pub fn inverse(self) -> Self {
        match self {
            Turn::Clockwise => Turn::CounterClockwise,
            Turn::Half => Turn::Half,
            Turn::CounterClockwise => Turn::Clockwise,
        }
    }

    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Turn::Clockwise => "",
            Turn::Half => "2",
            Turn::CounterClockwise => "'",
        }
    }
}

/// A single face turn such as `R`, `U'` or `F2`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    pub face: Face,
    pub turn: Turn,
}

impl Move {
    /// Every face turn, grouped by face in [`Face::ALL`] order and then by
    /// turn in [`Turn::ALL`] order.
    pub const ALL: [Self; 18] = {
        let mut moves = [Move {
            face: Face::U,
            turn: Turn::Clockwise,
        }; 18];

        let mut i = 0;
        while i < moves.len() {
            moves[i] = Move {
                face: Face::ALL[i / 3],
                turn: Turn::ALL[i % 3],
            };
            i += 1;
        }

        moves
    };

    #[must_use]
    pub fn new(face: Face, turn: Turn) -> Self {
        Move { face, turn }
    }

    #[must_use]
    pub fn inverse(self) -> Self {
        Move {
            face: self.face,
            turn: self.turn.inverse(),
        }
    }

    /// The position of this move in [`Move::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self.face as usize * 3 + self.turn as usize
    }

    /// The permutation and orientation change this move performs on the
    /// solved cube.
    #[must_use]
    pub fn transform(self) -> &'static CubeState {
        &MOVE_TRANSFORMS[self.index()]
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face.letter(), self.turn.suffix())
    }
}

/// Clockwise quarter turns of each face in [`Face::ALL`] order.
const QUARTER_TURNS: [CubeState; 6] = [
    // U
    CubeState::new(
        [3, 0, 1, 2, 4, 5, 6, 7],
        [0, 0, 0, 0, 0, 0, 0, 0],
        [0, 1, 2, 3, 7, 4, 5, 6, 8, 9, 10, 11],
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    ),
    // D
    CubeState::new(
        [0, 1, 2, 3, 5, 6, 7, 4],
        [0, 0, 0, 0, 0, 0, 0, 0],
        [0, 1, 2, 3, 4, 5, 6, 7, 9, 10, 11, 8],
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    ),
    // L
    CubeState::new(
        [4, 1, 2, 0, 7, 5, 6, 3],
        [2, 0, 0, 1, 1, 0, 0, 2],
        [11, 1, 2, 7, 4, 5, 6, 0, 8, 9, 10, 3],
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    ),
    // R
    CubeState::new(
        [0, 2, 6, 3, 4, 1, 5, 7],
        [0, 1, 2, 0, 0, 2, 1, 0],
        [0, 5, 9, 3, 4, 2, 6, 7, 8, 1, 10, 11],
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    ),
    // F
    CubeState::new(
        [0, 1, 3, 7, 4, 5, 2, 6],
        [0, 0, 1, 2, 0, 0, 2, 1],
        [0, 1, 6, 10, 4, 5, 3, 7, 8, 9, 2, 11],
        [0, 0, 1, 1, 0, 0, 1, 0, 0, 0, 1, 0],
    ),
    // B
    CubeState::new(
        [1, 5, 2, 3, 0, 4, 6, 7],
        [1, 2, 0, 0, 2, 1, 0, 0],
        [4, 8, 2, 3, 1, 5, 6, 7, 0, 9, 10, 11],
        [1, 1, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0],
    ),
];

/// Half and counter-clockwise turns are the quarter turn repeated.
static MOVE_TRANSFORMS: LazyLock<[CubeState; 18]> = LazyLock::new(|| {
    Move::ALL.map(|move_| {
        let quarter = &QUARTER_TURNS[move_.face as usize];
        (0..move_.turn.quarter_turns()).fold(CubeState::solved(), |acc, _| acc.compose(quarter))
    })
});

/// Turns one face of `state`.
#[must_use]
pub fn apply(state: CubeState, move_: Move) -> CubeState {
    state.compose(move_.transform())
}

/// Performs `moves` on `state` in order.
#[must_use]
pub fn apply_all(state: CubeState, moves: impl IntoIterator<Item = Move>) -> CubeState {
    moves.into_iter().fold(state, apply)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_moves(face: Face) -> [Move; 3] {
        Turn::ALL.map(|turn| Move::new(face, turn))
    }

    #[test]
    fn quarter_turns_are_valid() {
        for (face, quarter) in Face::ALL.iter().zip(&QUARTER_TURNS) {
            assert_eq!(quarter.validate(), Ok(()), "{face:?}");
        }
    }

    #[test]
    fn four_quarter_turns_are_identity() {
        for face in Face::ALL {
            let quarter = Move::new(face, Turn::Clockwise);
            let state = apply_all(CubeState::solved(), [quarter; 4]);
            assert!(state.is_solved(), "{face:?}");
        }
    }

    #[test]
    fn counter_clockwise_is_the_inverse_table() {
        for face in Face::ALL {
            let [clockwise, half, counter_clockwise] = face_moves(face);
            assert_eq!(*counter_clockwise.transform(), clockwise.transform().inverse());
            assert_eq!(*half.transform(), clockwise.transform().compose(clockwise.transform()));
            assert_eq!(*half.transform(), half.transform().inverse());
        }
    }

    #[test]
    fn all_is_indexed() {
        for (i, move_) in Move::ALL.iter().enumerate() {
            assert_eq!(move_.index(), i);
        }
        assert_eq!(Move::ALL[10], Move::new(Face::R, Turn::Half));
    }

    #[test]
    fn opposite_faces_commute() {
        let r = Move::new(Face::R, Turn::Clockwise);
        let l = Move::new(Face::L, Turn::Clockwise);
        let u = Move::new(Face::U, Turn::Clockwise);
        let d = Move::new(Face::D, Turn::CounterClockwise);
        assert_eq!(apply_all(CubeState::solved(), [r, l]), apply_all(CubeState::solved(), [l, r]));
        assert_eq!(apply_all(CubeState::solved(), [u, d]), apply_all(CubeState::solved(), [d, u]));
        assert_ne!(apply_all(CubeState::solved(), [r, u]), apply_all(CubeState::solved(), [u, r]));
    }

    #[test]
    fn sexy_move_has_order_six() {
        let r = Move::new(Face::R, Turn::Clockwise);
        let u = Move::new(Face::U, Turn::Clockwise);
        let sexy = [r, u, r.inverse(), u.inverse()];

        let mut state = CubeState::solved();
        for i in 1..=6 {
            state = apply_all(state, sexy);
            assert_eq!(state.is_solved(), i == 6);
        }
    }

    #[test]
    fn r_f_has_order_105() {
        let r = Move::new(Face::R, Turn::Clockwise);
        let f = Move::new(Face::F, Turn::Clockwise);

        let mut state = CubeState::solved();
        for i in 1..=105 {
            state = apply_all(state, [r, f]);
            assert_eq!(state.is_solved(), i == 105);
        }
    }

    #[test]
    fn r_twists_corners() {
        let state = apply(CubeState::solved(), Move::new(Face::R, Turn::Clockwise));
        assert_eq!(state.cp(), &[0, 2, 6, 3, 4, 1, 5, 7]);
        assert_eq!(state.co(), &[0, 1, 2, 0, 0, 2, 1, 0]);
        assert_eq!(state.ep(), &[0, 5, 9, 3, 4, 2, 6, 7, 8, 1, 10, 11]);
        assert!(state.eo().iter().all(|&eo| eo == 0));

        let state = apply(CubeState::solved(), Move::new(Face::F, Turn::Half));
        assert!(state.co().iter().all(|&co| co == 0));
        assert!(state.eo().iter().all(|&eo| eo == 0));
    }
}
