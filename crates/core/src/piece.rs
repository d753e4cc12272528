//! Piece module - tetromino shapes, rotation states and SRS wall kicks
//!
//! A [`Piece`] is a kind plus a rotation state. Its shape is exposed both as a 4x4
//! occupancy matrix and as the four occupied offsets inside that box.
//! Reference: https://tetris.wiki/SRS

use crate::types::{PieceKind, RotateDirection, Rotation};

/// Offset of a single block relative to the piece anchor
pub type MinoOffset = (i8, i8);

/// The four block offsets of one orientation
pub type Minos = [MinoOffset; 4];

/// Side of the square bounding box every orientation fits in
pub const SHAPE_SIZE: usize = 4;

/// Occupancy pattern, `[row][column]`, 1 = occupied
pub type ShapeMatrix = [[u8; SHAPE_SIZE]; SHAPE_SIZE];

/// A tetromino and its current orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    rotation: Rotation,
}

impl Piece {
    /// A piece in spawn orientation
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Current orientation as a 4x4 occupancy matrix
    pub fn shape(&self) -> ShapeMatrix {
        let mut matrix = [[0u8; SHAPE_SIZE]; SHAPE_SIZE];
        for (dx, dy) in self.minos() {
            matrix[dy as usize][dx as usize] = 1;
        }
        matrix
    }

    /// Occupied offsets of the current orientation
    pub fn minos(&self) -> Minos {
        minos_for(self.kind, self.rotation)
    }

    /// Advance one rotation step. Collision checks are the caller's job.
    pub fn rotate(&mut self, direction: RotateDirection) {
        self.rotation = self.rotation.rotate(direction);
    }
}

/// Block offsets for a kind and rotation
pub fn minos_for(kind: PieceKind, rotation: Rotation) -> Minos {
    match kind {
        PieceKind::I => match rotation {
            Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
            Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
            Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
            Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
        },
        // O is the same in every orientation
        PieceKind::O => [(1, 0), (2, 0), (1, 1), (2, 1)],
        PieceKind::T => match rotation {
            Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
            Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
            Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
            Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
        },
        PieceKind::S => match rotation {
            Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
            Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
            Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
            Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
        },
        PieceKind::Z => match rotation {
            Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
            Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
            Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
            Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
        },
        PieceKind::J => match rotation {
            Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
            Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
            Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
            Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
        },
        PieceKind::L => match rotation {
            Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
            Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
            Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
            Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
        },
    }
}

/// Candidate anchor offsets for one rotation transition; the first is always (0, 0).
pub type Kicks = [(i8, i8); 5];

/// Kick table indexed by [`kick_index`]
type KickTable = [Kicks; 8];

const NO_KICKS: KickTable = [[(0, 0); 5]; 8];

/// JLSTZ kick table (y grows downwards)
const JLSTZ_KICKS: KickTable = [
    // N->E
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // N->W
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // E->N
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // E->S
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // S->E
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // S->W
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // W->S
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // W->N
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
];

/// I kick table (y grows downwards)
const I_KICKS: KickTable = [
    // N->E
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    // N->W
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    // E->N
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    // E->S
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    // S->E
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    // S->W
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    // W->S
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    // W->N
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
];

fn kick_index(from: Rotation, direction: RotateDirection) -> usize {
    use RotateDirection::{Clockwise as Cw, CounterClockwise as Ccw};
    match (from, direction) {
        (Rotation::North, Cw) => 0,
        (Rotation::North, Ccw) => 1,
        (Rotation::East, Ccw) => 2,
        (Rotation::East, Cw) => 3,
        (Rotation::South, Ccw) => 4,
        (Rotation::South, Cw) => 5,
        (Rotation::West, Ccw) => 6,
        (Rotation::West, Cw) => 7,
    }
}

/// SRS offsets to try when rotating `kind` out of `from` in `direction`
pub fn kick_offsets(kind: PieceKind, from: Rotation, direction: RotateDirection) -> &'static Kicks {
    let table = match kind {
        PieceKind::O => &NO_KICKS,
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    };
    &table[kick_index(from, direction)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_orientation_has_four_cells_in_the_box() {
        for kind in PieceKind::ALL {
            let mut piece = Piece::new(kind);
            for _ in 0..4 {
                let shape = piece.shape();
                let occupied: u32 = shape.iter().flatten().map(|&c| c as u32).sum();
                assert_eq!(occupied, 4, "{:?} {:?}", kind, piece.rotation());
                piece.rotate(RotateDirection::Clockwise);
            }
        }
    }

    #[test]
    fn four_clockwise_rotations_restore_shape() {
        for kind in PieceKind::ALL {
            let mut piece = Piece::new(kind);
            let original = piece.shape();
            for _ in 0..4 {
                piece.rotate(RotateDirection::Clockwise);
            }
            assert_eq!(piece.shape(), original);
            assert_eq!(piece.rotation(), Rotation::North);
        }
    }

    #[test]
    fn cw_then_ccw_is_identity() {
        let mut piece = Piece::new(PieceKind::L);
        piece.rotate(RotateDirection::Clockwise);
        piece.rotate(RotateDirection::CounterClockwise);
        assert_eq!(piece, Piece::new(PieceKind::L));
    }

    #[test]
    fn t_shape_matrix() {
        let piece = Piece::new(PieceKind::T);
        assert_eq!(
            piece.shape(),
            [[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]
        );
    }

    #[test]
    fn i_shape_matrix_east() {
        let mut piece = Piece::new(PieceKind::I);
        piece.rotate(RotateDirection::Clockwise);
        assert_eq!(
            piece.shape(),
            [[0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0]]
        );
    }

    #[test]
    fn kicks_start_with_identity() {
        for kind in PieceKind::ALL {
            for from in [Rotation::North, Rotation::East, Rotation::South, Rotation::West] {
                for dir in [RotateDirection::Clockwise, RotateDirection::CounterClockwise] {
                    assert_eq!(kick_offsets(kind, from, dir)[0], (0, 0));
                }
            }
        }
    }

    #[test]
    fn o_piece_never_kicks() {
        let kicks = kick_offsets(PieceKind::O, Rotation::East, RotateDirection::Clockwise);
        assert!(kicks.iter().all(|&k| k == (0, 0)));
    }
}
