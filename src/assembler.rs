use crate::adjacency::AdjacencyGraph;
use crate::anchor::{find_top_left, TileSet};
use crate::error::{malformed, JigsawError, Result};
use crate::tile::{Pixel, Pixels, Side, Tile, TileId};
use itertools::Itertools;
use std::collections::HashSet;

/// Every tile in its final place and orientation, row by row.
#[derive(Debug, Clone)]
pub struct Assembly {
    layout: Vec<Vec<Tile>>,
}

pub struct AssemblyDisplayIds<'a> {
    assembly: &'a Assembly,
}

impl std::fmt::Display for AssemblyDisplayIds<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (r, row) in self.assembly.layout.iter().enumerate() {
            for tile in row {
                write!(f, "{:5}", tile.id())?;
            }
            if r != self.assembly.layout.len() - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl Assembly {
    pub fn rows(&self) -> usize {
        self.layout.len()
    }

    pub fn cols(&self) -> usize {
        self.layout.first().map_or(0, Vec::len)
    }

    pub fn tile(&self, pos: (usize, usize)) -> Option<&Tile> {
        self.layout.get(pos.0).and_then(|row| row.get(pos.1))
    }

    pub fn corner_ids(&self) -> Vec<TileId> {
        let (last_r, last_c) = (self.rows() - 1, self.cols() - 1);
        [(0, 0), (0, last_c), (last_r, 0), (last_r, last_c)]
            .iter()
            .filter_map(|pos| self.tile(*pos).map(Tile::id))
            .unique()
            .collect()
    }

    pub fn display_ids(&self) -> AssemblyDisplayIds<'_> {
        AssemblyDisplayIds { assembly: self }
    }

    /// Strips every tile's border and stitches the interiors into one grid.
    pub fn to_pixels(&self) -> Pixels {
        let tile_side_size = self.tile((0, 0)).map_or(0, |tile| tile.size() - 2);
        let rows = self.rows() * tile_side_size;
        let cols = self.cols() * tile_side_size;
        let mut image = Pixels::new(rows, cols, vec![Pixel::Unset; rows * cols]);

        for (r, row) in self.layout.iter().enumerate() {
            for (c, tile) in row.iter().enumerate() {
                let inner = tile.without_borders();
                let tile_shifting_r = r * tile_side_size;
                let tile_shifting_c = c * tile_side_size;
                for (tile_r, tile_c) in inner.pos_iter() {
                    image[(tile_r + tile_shifting_r, tile_c + tile_shifting_c)] =
                        inner[(tile_r, tile_c)];
                }
            }
        }
        image
    }
}

// Finds the single unplaced neighbour of `current_id` that continues its `side` border,
// and turns that neighbour so the two borders line up.
fn connect_borders(
    tiles: &mut TileSet,
    graph: &AdjacencyGraph,
    placed: &HashSet<TileId>,
    current_id: TileId,
    side: Side,
) -> Result<Option<TileId>> {
    let edge = tiles
        .get(&current_id)
        .ok_or_else(|| JigsawError::MalformedInput(format!("Unknown tile {}", current_id)))?
        .border(side);
    let candidates = graph
        .neighbors(current_id)
        .filter(|id| {
            tiles
                .get(id)
                .map_or(false, |tile| tile.border_signatures().contains(&edge))
        })
        .collect_vec();

    let next_id = match candidates.as_slice() {
        [] => return Ok(None),
        [next_id] => *next_id,
        _ => {
            return malformed(format!(
                "Tiles {:?} all continue the {} border of tile {}",
                candidates, side, current_id
            ))
        }
    };
    if placed.contains(&next_id) {
        return malformed(format!(
            "Tile {} would be placed twice, next to the {} border of tile {}",
            next_id, side, current_id
        ));
    }
    if let Some(next) = tiles.get_mut(&next_id) {
        next.adapt(&edge, side.opposite())?;
    }
    Ok(Some(next_id))
}

/// Places every tile, starting from a corner turned into the top-left position.
///
/// Works on a private copy of `tiles`, the caller's tiles keep their orientation.
pub fn assemble(
    tiles: &[Tile],
    graph: &AdjacencyGraph,
    corners: &[TileId],
) -> Result<Assembly> {
    let mut working: TileSet = tiles.iter().map(|t| (t.id(), t.clone())).collect();
    let anchor = find_top_left(&mut working, graph, corners)?;

    let mut placed = HashSet::new();
    placed.insert(anchor);
    let mut layout_ids: Vec<Vec<TileId>> = Vec::new();
    let mut row_start = Some(anchor);
    while let Some(start) = row_start {
        let mut row = vec![start];
        let mut current = start;
        while let Some(next) =
            connect_borders(&mut working, graph, &placed, current, Side::Right)?
        {
            placed.insert(next);
            row.push(next);
            current = next;
        }
        log::trace!("Row {}: {:?}", layout_ids.len(), row);
        layout_ids.push(row);

        row_start = connect_borders(&mut working, graph, &placed, start, Side::Bottom)?;
        if let Some(next) = row_start {
            placed.insert(next);
        }
    }

    let cols = layout_ids[0].len();
    if let Some(row) = layout_ids.iter().find(|row| row.len() != cols) {
        return malformed(format!(
            "Assembled rows differ in length: {} and {} tiles",
            cols,
            row.len()
        ));
    }
    if placed.len() != tiles.len() {
        return malformed(format!(
            "Only {} of {} tiles could be placed",
            placed.len(),
            tiles.len()
        ));
    }

    let layout = layout_ids
        .iter()
        .map(|row| {
            row.iter()
                .map(|id| {
                    working.remove(id).ok_or_else(|| {
                        JigsawError::MalformedInput(format!("Tile {} went missing", id))
                    })
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let assembly = Assembly { layout };
    log::debug!(
        "Assembled {}x{} tiles:\n{}",
        assembly.rows(),
        assembly.cols(),
        assembly.display_ids()
    );
    Ok(assembly)
}

pub fn assemble_image(
    tiles: &[Tile],
    graph: &AdjacencyGraph,
    corners: &[TileId],
) -> Result<Pixels> {
    Ok(assemble(tiles, graph, corners)?.to_pixels())
}
