//! Wall conditions for the outer ring of cells.

use crate::Field2;

/// Which walls negate the value they copy from the interior.
///
/// A velocity component normal to a wall is reflected so nothing flows
/// through it; scalars and tangential components are copied unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reflect {
    /// Scalars: density, pressure, divergence.
    None,
    /// The x-velocity, normal to the left and right walls.
    LeftRight,
    /// The y-velocity, normal to the top and bottom walls.
    TopBottom,
}

/// Rewrites every wall cell from its interior neighbour.
///
/// Edges take the adjacent interior value (negated on reflecting walls);
/// each corner then takes the mean of its two edge neighbours.
pub fn enforce_boundary(field: &mut Field2, reflect: Reflect) {
    let grid = field.grid();
    let w = grid.width();
    let h = grid.height();
    let lr = if reflect == Reflect::LeftRight { -1.0 } else { 1.0 };
    let tb = if reflect == Reflect::TopBottom { -1.0 } else { 1.0 };

    for y in 1..h - 1 {
        field.set(0, y, lr * field.get(1, y));
        field.set(w - 1, y, lr * field.get(w - 2, y));
    }
    for x in 1..w - 1 {
        field.set(x, 0, tb * field.get(x, 1));
        field.set(x, h - 1, tb * field.get(x, h - 2));
    }

    field.set(0, 0, 0.5 * (field.get(1, 0) + field.get(0, 1)));
    field.set(0, h - 1, 0.5 * (field.get(1, h - 1) + field.get(0, h - 2)));
    field.set(w - 1, 0, 0.5 * (field.get(w - 2, 0) + field.get(w - 1, 1)));
    field.set(
        w - 1,
        h - 1,
        0.5 * (field.get(w - 2, h - 1) + field.get(w - 1, h - 2)),
    );
}
