use itertools::Itertools;
use std::str::FromStr;

use super::orientation::Orientation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    g: Vec<T>,
}
pub type GridPos = (usize, usize);

pub struct GridPosIter<'a, T> {
    grid: &'a Grid<T>,
    next_index: Option<usize>,
}

impl<T> std::ops::Index<GridPos> for Grid<T> {
    type Output = T;
    fn index(&self, index: GridPos) -> &Self::Output {
        let i = self.cols * index.0 + index.1;
        &self.g[i]
    }
}

impl<T> std::ops::IndexMut<GridPos> for Grid<T> {
    fn index_mut(&mut self, index: GridPos) -> &mut Self::Output {
        let i = self.cols * index.0 + index.1;
        &mut self.g[i]
    }
}

impl<T> FromStr for Grid<T>
where
    T: FromStr,
    anyhow::Error: From<T::Err>,
{
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let cols = s
            .lines()
            .next()
            .map(|l| l.trim_end().chars().count())
            .ok_or_else(|| anyhow::anyhow!("Grid has no rows"))?;
        if let Some((r, l)) = s
            .lines()
            .map(str::trim_end)
            .find_position(|l| l.chars().count() != cols)
        {
            anyhow::bail!("Row {} has {} cells, expected {}", r, l.chars().count(), cols);
        }
        let g = s
            .lines()
            .flat_map(|l| l.trim_end().chars().map(|c| c.to_string().parse::<T>()))
            .try_collect()?;
        let rows = s.lines().count();
        Ok(Grid { rows, cols, g })
    }
}

impl<T> std::fmt::Display for Grid<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for r in 0..self.rows {
            for c in 0..self.cols {
                write!(f, "{}", self[(r, c)])?;
            }
            if r != self.rows - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl<T> std::iter::Iterator for GridPosIter<'_, T> {
    type Item = GridPos;
    fn next(&mut self) -> Option<Self::Item> {
        self.next_index
            .and_then(|i| if i < self.grid.g.len() { Some(i) } else { None })
            .map(|i| {
                let current_index = i;
                self.next_index = Some(i + 1);
                let r = current_index / self.grid.cols;
                let c = current_index % self.grid.cols;
                (r, c)
            })
    }
}

impl<T> Grid<T> {
    pub fn new(rows: usize, cols: usize, g: Vec<T>) -> Self {
        assert_eq!(rows * cols, g.len(), "Grid storage doesn't match its dimensions");
        Grid { rows, cols, g }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.g.iter()
    }

    pub fn pos_iter(&self) -> GridPosIter<T> {
        GridPosIter {
            grid: self,
            next_index: Some(0),
        }
    }

    pub fn get(&self, pos: GridPos) -> Option<&T> {
        let r = pos.0;
        let c = pos.1;
        if r >= self.rows || c >= self.cols {
            return None;
        };
        Some(&self[pos])
    }

    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut T> {
        let r = pos.0;
        let c = pos.1;
        if r >= self.rows || c >= self.cols {
            return None;
        };
        Some(&mut self[pos])
    }

    /// Reads `pos` as if the grid had been transformed by `orientation`.
    pub fn get_oriented(&self, pos: GridPos, orientation: Orientation) -> Option<&T> {
        let (rows, cols) = orientation.dims(self.dims());
        if pos.0 >= rows || pos.1 >= cols {
            return None;
        }
        self.get(orientation.source_pos(pos, self.dims()))
    }
}

impl<T: Clone> Grid<T> {
    pub fn reoriented(&self, orientation: Orientation) -> Grid<T> {
        let (rows, cols) = orientation.dims(self.dims());
        let g = (0..rows)
            .cartesian_product(0..cols)
            .map(|pos| self[orientation.source_pos(pos, self.dims())].clone())
            .collect();
        Grid { rows, cols, g }
    }

    /// Drops `margin` cells from every side.
    pub fn cropped(&self, margin: usize) -> Grid<T> {
        let rows = self.rows.saturating_sub(2 * margin);
        let cols = self.cols.saturating_sub(2 * margin);
        let g = (0..rows)
            .cartesian_product(0..cols)
            .map(|(r, c)| self[(r + margin, c + margin)].clone())
            .collect();
        Grid { rows, cols, g }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters() -> Grid<char> {
        Grid::new(2, 3, "abcdef".chars().collect())
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        assert!("ab\nabc".parse::<Grid<char>>().is_err());
        let g = "ab\ncd".parse::<Grid<char>>().unwrap();
        assert_eq!(g.dims(), (2, 2));
        assert_eq!(g[(1, 0)], 'c');
    }

    #[test]
    fn test_reoriented() {
        let g = letters();
        let rotated = g.reoriented(Orientation::IDENTITY.rotated());
        assert_eq!(format!("{}", rotated), "da\neb\nfc");
        assert_eq!(
            rotated.get((2, 1)),
            g.get_oriented((2, 1), Orientation::IDENTITY.rotated())
        );
        assert_eq!(g.get_oriented((2, 0), Orientation::IDENTITY), None);

        let mirrored = g.reoriented(Orientation::IDENTITY.flipped());
        assert_eq!(format!("{}", mirrored), "cba\nfed");
    }

    #[test]
    fn test_cropped() {
        let g = "abcd\nefgh\nijkl\nmnop".parse::<Grid<char>>().unwrap();
        assert_eq!(format!("{}", g.cropped(1)), "fg\njk");
        assert_eq!(g.cropped(2).dims(), (0, 0));
    }

    #[test]
    fn test_pos_iter() {
        let g = letters();
        let positions = g.pos_iter().collect_vec();
        assert_eq!(positions.len(), 6);
        assert_eq!(positions[4], (1, 1));
    }
}
