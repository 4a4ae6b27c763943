//! Pointer geometry
//!
//! Maps pointer coordinates on a square board surface to [`Square`]s. The
//! origin is the top-left corner, white plays up the screen:
//! rank 8 is the top row and the a-file the left column.

use crate::game::types::Square;

/// Size of the surface the board is drawn on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGeometry {
    pub size: f32,
}

impl BoardGeometry {
    pub fn new(size: f32) -> Self {
        Self { size }
    }

    fn square_size(&self) -> f32 {
        self.size / 8.0
    }

    /// Square under the point `(x, y)`, `None` outside the board
    pub fn square_at(&self, x: f32, y: f32) -> Option<Square> {
        if !(x.is_finite() && y.is_finite()) || x < 0.0 || y < 0.0 {
            return None;
        }
        let file = (x / self.square_size()).floor();
        let row = (y / self.square_size()).floor();
        if file >= 8.0 || row >= 8.0 {
            return None;
        }
        Square::from_coords(file as u8, 7 - row as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners() {
        let geometry = BoardGeometry::new(800.0);
        assert_eq!(geometry.square_at(0.0, 0.0), "a8".parse().ok());
        assert_eq!(geometry.square_at(799.0, 799.0), "h1".parse().ok());
        assert_eq!(geometry.square_at(450.0, 450.0), "e4".parse().ok());
    }

    #[test]
    fn test_outside_board() {
        let geometry = BoardGeometry::new(800.0);
        assert_eq!(geometry.square_at(800.0, 10.0), None);
        assert_eq!(geometry.square_at(-1.0, 10.0), None);
        assert_eq!(geometry.square_at(f32::NAN, 10.0), None);
    }
}
