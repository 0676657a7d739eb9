//! Pieces module - tetromino shapes, rotation and wall kicks
//!
//! Shapes are given as (row, col) offsets inside a per-piece bounding box;
//! a placement anchors the box's top-left corner on the field. Rotation
//! follows SRS-style kick tables: on a rotate, candidate translations are
//! tried in order and the first collision-free one wins.
//! Reference: https://tetris.wiki/SRS

use crate::types::{PieceKind, COLS};

use super::field::Field;

/// Offset of a single cell relative to the bounding-box top-left.
pub type CellOffset = (i8, i8);

/// Shape of a piece: 4 cell offsets.
pub type PieceShape = [CellOffset; 4];

/// A kick candidate: (dx, dy) with y pointing up, so applying it moves the
/// anchor to (row - dy, col + dx).
pub type Kick = (i8, i8);

/// Position and orientation of a piece on the field.
///
/// `rotation` is kept as a free-running signed counter so repeated
/// counter-clockwise rotations never underflow; it is normalized to 0..4
/// whenever a shape or kick table is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: i8,
    pub col: i8,
    pub rotation: i32,
}

/// Map a free-running rotation counter onto its 0..4 equivalence class.
#[inline]
pub fn normalize_rotation(rotation: i32) -> usize {
    rotation.rem_euclid(4) as usize
}

/// Get the shape for a piece kind at a rotation.
pub fn shape(kind: PieceKind, rotation: i32) -> PieceShape {
    let r = normalize_rotation(rotation);
    match kind {
        PieceKind::I => I_SHAPES[r],
        PieceKind::O => O_SHAPE,
        PieceKind::T => T_SHAPES[r],
        PieceKind::S => S_SHAPES[r],
        PieceKind::Z => Z_SHAPES[r],
        PieceKind::J => J_SHAPES[r],
        PieceKind::L => L_SHAPES[r],
    }
}

const I_SHAPES: [PieceShape; 4] = [
    [(1, 0), (1, 1), (1, 2), (1, 3)],
    [(0, 2), (1, 2), (2, 2), (3, 2)],
    [(2, 0), (2, 1), (2, 2), (2, 3)],
    [(0, 1), (1, 1), (2, 1), (3, 1)],
];

// O never rotates.
const O_SHAPE: PieceShape = [(0, 1), (0, 2), (1, 1), (1, 2)];

const T_SHAPES: [PieceShape; 4] = [
    [(0, 1), (1, 0), (1, 1), (1, 2)],
    [(0, 1), (1, 1), (1, 2), (2, 1)],
    [(1, 0), (1, 1), (1, 2), (2, 1)],
    [(0, 1), (1, 0), (1, 1), (2, 1)],
];

const S_SHAPES: [PieceShape; 4] = [
    [(0, 1), (0, 2), (1, 0), (1, 1)],
    [(0, 1), (1, 1), (1, 2), (2, 2)],
    [(1, 1), (1, 2), (2, 0), (2, 1)],
    [(0, 0), (1, 0), (1, 1), (2, 1)],
];

const Z_SHAPES: [PieceShape; 4] = [
    [(0, 0), (0, 1), (1, 1), (1, 2)],
    [(0, 2), (1, 1), (1, 2), (2, 1)],
    [(1, 0), (1, 1), (2, 1), (2, 2)],
    [(0, 1), (1, 0), (1, 1), (2, 0)],
];

const J_SHAPES: [PieceShape; 4] = [
    [(0, 0), (1, 0), (1, 1), (1, 2)],
    [(0, 1), (0, 2), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (1, 2), (2, 2)],
    [(0, 1), (1, 1), (2, 0), (2, 1)],
];

const L_SHAPES: [PieceShape; 4] = [
    [(0, 2), (1, 0), (1, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (2, 2)],
    [(1, 0), (1, 1), (1, 2), (2, 0)],
    [(0, 0), (0, 1), (1, 1), (2, 1)],
];

/// Kick tables indexed by [from_rotation][direction], direction 0 for
/// clockwise and 1 for counter-clockwise. Entries are (dx, dy) with y up.
type KickTable = [[[Kick; 5]; 2]; 4];

/// Kicks shared by J, L, S, T and Z.
static KICKS_JLSTZ: KickTable = [
    [
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    ],
    [
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    ],
    [
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    ],
    [
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    ],
];

/// Kicks for the I piece.
static KICKS_I: KickTable = [
    [
        [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
        [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    ],
    [
        [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
        [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    ],
    [
        [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
        [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    ],
    [
        [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
        [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    ],
];

/// Kick candidates for rotating `kind` from `rotation` in the given
/// direction. O has a single identity kick so rotating it is a no-op move.
pub fn kicks(kind: PieceKind, rotation: i32, clockwise: bool) -> &'static [Kick] {
    static KICK_O: [Kick; 1] = [(0, 0)];
    if kind == PieceKind::O {
        return &KICK_O;
    }
    let from = normalize_rotation(rotation);
    let dir = if clockwise { 0 } else { 1 };
    match kind {
        PieceKind::I => &KICKS_I[from][dir],
        _ => &KICKS_JLSTZ[from][dir],
    }
}

/// Width of a piece's bounding box (the box the shape offsets live in).
pub fn bounding_width(kind: PieceKind) -> i8 {
    match kind {
        PieceKind::I | PieceKind::O => 4,
        _ => 3,
    }
}

/// Placement a fresh piece spawns at: row 1 (the lower hidden row), with the
/// bounding box centered horizontally.
pub fn spawn_placement(kind: PieceKind) -> Placement {
    let w = bounding_width(kind) as i32;
    let center = COLS as i32 / 2;
    let col = center - (w + 1) / 2;
    Placement {
        row: 1,
        col: col as i8,
        rotation: 0,
    }
}

/// Absolute field cells covered by a piece at a placement.
pub fn cells(kind: PieceKind, placement: Placement) -> [(i8, i8); 4] {
    let shape = shape(kind, placement.rotation);
    let mut out = [(0i8, 0i8); 4];
    for (i, &(dr, dc)) in shape.iter().enumerate() {
        out[i] = (placement.row + dr, placement.col + dc);
    }
    out
}

/// Whether a piece at a placement overlaps a wall, the floor or a locked
/// cell.
pub fn collides(field: &Field, kind: PieceKind, placement: Placement) -> bool {
    cells(kind, placement)
        .iter()
        .any(|&(row, col)| !field.is_open(row, col))
}

/// Translate a placement by whole rows/cols, returns `None` on collision.
pub fn step(field: &Field, kind: PieceKind, placement: Placement, dr: i8, dc: i8) -> Option<Placement> {
    let moved = Placement {
        row: placement.row + dr,
        col: placement.col + dc,
        ..placement
    };
    if collides(field, kind, moved) {
        None
    } else {
        Some(moved)
    }
}

/// Rotate a placement, trying each kick in table order. Returns the first
/// collision-free placement, or `None` when every kick is blocked.
pub fn rotate(field: &Field, kind: PieceKind, placement: Placement, clockwise: bool) -> Option<Placement> {
    let delta = if clockwise { 1 } else { -1 };
    let rotated = placement.rotation + delta;
    for &(dx, dy) in kicks(kind, placement.rotation, clockwise) {
        let candidate = Placement {
            row: placement.row - dy,
            col: placement.col + dx,
            rotation: rotated,
        };
        if !collides(field, kind, candidate) {
            return Some(candidate);
        }
    }
    None
}

/// The placement a piece ends at after falling straight down as far as it
/// can. Returns the input placement when the piece is already grounded.
pub fn hard_drop_target(field: &Field, kind: PieceKind, placement: Placement) -> Placement {
    let mut current = placement;
    while let Some(next) = step(field, kind, current, 1, 0) {
        current = next;
    }
    current
}

/// The four diagonal corners of the T piece's 3x3 box at a placement,
/// used for spin detection.
pub fn t_corners(placement: Placement) -> [(i8, i8); 4] {
    let Placement { row, col, .. } = placement;
    [
        (row, col),
        (row, col + 2),
        (row + 2, col),
        (row + 2, col + 2),
    ]
}

/// How many of the T piece's corner cells hold locked blocks. Corners
/// outside the grid are skipped, not counted as occupied.
pub fn t_spin_corners(field: &Field, placement: Placement) -> usize {
    t_corners(placement)
        .iter()
        .filter(|&&(row, col)| field.is_occupied(row, col))
        .count()
}
