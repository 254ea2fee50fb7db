use itertools::Itertools;

use super::grid::GridPos;

/// One of the 8 symmetries of a square grid.
///
/// The view described by an orientation is `rotate_cw^rotation(mirror^mirrored(base))`,
/// where mirroring reverses the column order. Nothing is ever rewritten: positions in
/// the view are mapped back onto the base grid on every read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Orientation {
    rotation: u8,
    mirrored: bool,
}

impl Orientation {
    pub const IDENTITY: Orientation = Orientation {
        rotation: 0,
        mirrored: false,
    };

    pub fn new(rotation: u8, mirrored: bool) -> Self {
        Orientation {
            rotation: rotation % 4,
            mirrored,
        }
    }

    /// Search order used everywhere: the 4 rotations, then mirror and the 4 rotations again.
    pub fn all() -> impl Iterator<Item = Orientation> {
        (0..2u8)
            .cartesian_product(0..4u8)
            .map(|(mirrored, rotation)| Orientation::new(rotation, mirrored == 1))
    }

    /// One more clockwise quarter turn on top of the current view.
    pub fn rotated(self) -> Self {
        Orientation::new(self.rotation + 1, self.mirrored)
    }

    /// Mirror of the current view. Mirroring after `k` rotations equals
    /// mirroring first and then rotating `-k` times.
    pub fn flipped(self) -> Self {
        Orientation::new(4 - self.rotation, !self.mirrored)
    }

    pub fn dims(&self, base_dims: (usize, usize)) -> (usize, usize) {
        if self.rotation % 2 == 1 {
            (base_dims.1, base_dims.0)
        } else {
            base_dims
        }
    }

    /*
    Clockwise rotation of an R x C grid:
    new[r][c] = old[R - 1 - c][r]
    so walking back one rotation maps (r, c) -> (R - 1 - c, r), where R is the
    row count of the grid before that rotation.
    */
    pub fn source_pos(&self, pos: GridPos, base_dims: (usize, usize)) -> GridPos {
        let (base_rows, base_cols) = base_dims;
        let (mut r, mut c) = pos;
        for step in (0..self.rotation).rev() {
            let pre_rows = if step % 2 == 0 { base_rows } else { base_cols };
            let prev = (pre_rows - 1 - c, r);
            r = prev.0;
            c = prev.1;
        }
        if self.mirrored {
            c = base_cols - 1 - c;
        }
        (r, c)
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.mirrored {
            write!(f, "mirrored, rotated {}°", self.rotation as u16 * 90)
        } else {
            write!(f, "rotated {}°", self.rotation as u16 * 90)
        }
    }
}
