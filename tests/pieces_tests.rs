//! Pieces module tests - shapes, kicks and geometry through the public API

use tetris_engine::core::pieces::{
    cells, collides, hard_drop_target, kicks, rotate, shape, spawn_placement, step, Placement,
};
use tetris_engine::core::Field;
use tetris_engine::types::PieceKind;

// ============== Shape Tests ==============

#[test]
fn test_i_piece_shapes() {
    assert_eq!(shape(PieceKind::I, 0), [(1, 0), (1, 1), (1, 2), (1, 3)]);
    assert_eq!(shape(PieceKind::I, 1), [(0, 2), (1, 2), (2, 2), (3, 2)]);
    assert_eq!(shape(PieceKind::I, 2), [(2, 0), (2, 1), (2, 2), (2, 3)]);
    assert_eq!(shape(PieceKind::I, 3), [(0, 1), (1, 1), (2, 1), (3, 1)]);
}

#[test]
fn test_o_piece_same_for_all_rotations() {
    let base = shape(PieceKind::O, 0);
    assert_eq!(base, [(0, 1), (0, 2), (1, 1), (1, 2)]);
    for rotation in 1..4 {
        assert_eq!(shape(PieceKind::O, rotation), base);
    }
}

#[test]
fn test_t_piece_shapes() {
    assert_eq!(shape(PieceKind::T, 0), [(0, 1), (1, 0), (1, 1), (1, 2)]);
    assert_eq!(shape(PieceKind::T, 1), [(0, 1), (1, 1), (1, 2), (2, 1)]);
    assert_eq!(shape(PieceKind::T, 2), [(1, 0), (1, 1), (1, 2), (2, 1)]);
    assert_eq!(shape(PieceKind::T, 3), [(0, 1), (1, 0), (1, 1), (2, 1)]);
}

#[test]
fn test_negative_rotation_wraps() {
    // Counter-clockwise from 0 must resolve to the rotation-3 shape.
    assert_eq!(shape(PieceKind::J, -1), shape(PieceKind::J, 3));
    assert_eq!(shape(PieceKind::S, -5), shape(PieceKind::S, 3));
    assert_eq!(shape(PieceKind::L, 7), shape(PieceKind::L, 3));
}

// ============== Kick Table Tests ==============

#[test]
fn test_kick_tables_start_with_identity() {
    for kind in PieceKind::ALL {
        for rotation in 0..4 {
            for clockwise in [true, false] {
                assert_eq!(kicks(kind, rotation, clockwise)[0], (0, 0));
            }
        }
    }
}

#[test]
fn test_o_piece_has_no_kicks() {
    assert_eq!(kicks(PieceKind::O, 0, true).len(), 1);
}

#[test]
fn test_jlstz_kick_row_zero_clockwise() {
    // The shared table, 0 -> 1.
    assert_eq!(
        kicks(PieceKind::T, 0, true),
        &[(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)]
    );
}

#[test]
fn test_i_kick_row_zero_clockwise() {
    assert_eq!(
        kicks(PieceKind::I, 0, true),
        &[(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)]
    );
}

#[test]
fn test_rotation_takes_first_viable_kick() {
    // On an empty field every kick is viable; the identity entry must win,
    // so the anchor never moves on a free rotation.
    let field = Field::new();
    for kind in PieceKind::ALL {
        let p = Placement { row: 10, col: 3, rotation: 0 };
        let rotated = rotate(&field, kind, p, true).unwrap();
        assert_eq!((rotated.row, rotated.col), (10, 3), "{kind:?} drifted");
    }
}

// ============== Geometry Tests ==============

#[test]
fn test_cells_translate_with_anchor() {
    let p = Placement { row: 4, col: 2, rotation: 0 };
    assert_eq!(
        cells(PieceKind::O, p),
        [(4, 3), (4, 4), (5, 3), (5, 4)]
    );
}

#[test]
fn test_collides_out_of_bounds_any_side() {
    let field = Field::new();
    assert!(collides(&field, PieceKind::O, Placement { row: -1, col: 3, rotation: 0 }));
    assert!(collides(&field, PieceKind::O, Placement { row: 21, col: 3, rotation: 0 }));
    assert!(collides(&field, PieceKind::O, Placement { row: 5, col: -2, rotation: 0 }));
    assert!(collides(&field, PieceKind::O, Placement { row: 5, col: 8, rotation: 0 }));
    assert!(!collides(&field, PieceKind::O, Placement { row: 5, col: 3, rotation: 0 }));
}

#[test]
fn test_hard_drop_idempotent() {
    let mut field = Field::new();
    field.set(21, 4, Some(PieceKind::Z));
    for kind in PieceKind::ALL {
        let p = spawn_placement(kind);
        let first = hard_drop_target(&field, kind, p);
        let second = hard_drop_target(&field, kind, first);
        assert_eq!(first, second, "{kind:?} landing not stable");
    }
}

#[test]
fn test_hard_drop_uses_shallowest_column() {
    let mut field = Field::new();
    // A tall pillar under one column of a horizontal I stops the whole
    // piece at the pillar's height.
    for row in 15..22 {
        field.set(row, 5, Some(PieceKind::J));
    }
    let p = spawn_placement(PieceKind::I);
    let landed = hard_drop_target(&field, PieceKind::I, p);
    // I occupies shape row 1; it rests on top of the pillar at row 15.
    assert_eq!(landed.row, 13);
}

#[test]
fn test_step_down_into_occupied_cell_rejected() {
    let mut field = Field::new();
    field.set(3, 4, Some(PieceKind::L));
    let p = Placement { row: 1, col: 3, rotation: 0 };
    // O sits at rows 1-2, cols 4-5; one more row down hits (3, 4).
    assert!(step(&field, PieceKind::O, p, 1, 0).is_none());
    assert!(step(&field, PieceKind::O, p, 0, 1).is_some());
}
