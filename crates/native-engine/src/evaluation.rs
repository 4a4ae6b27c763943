//! Material evaluation

use shakmaty::{Board, Color, Role};

/// Centipawn value of each role; kings are not counted
pub fn role_value(role: Role) -> i32 {
    match role {
        Role::Pawn => 100,
        Role::Knight => 300,
        Role::Bishop => 300,
        Role::Rook => 500,
        Role::Queen => 900,
        Role::King => 0,
    }
}

fn side_material(board: &Board, color: Color) -> i32 {
    let ours = board.by_color(color);
    [Role::Pawn, Role::Knight, Role::Bishop, Role::Rook, Role::Queen]
        .into_iter()
        .map(|role| (board.by_role(role) & ours).count() as i32 * role_value(role))
        .sum()
}

/// Material balance from white's point of view
pub fn material_eval(board: &Board) -> i32 {
    side_material(board, Color::White) - side_material(board, Color::Black)
}
