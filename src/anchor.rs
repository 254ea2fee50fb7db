use crate::adjacency::AdjacencyGraph;
use crate::error::{malformed, JigsawError, Result};
use crate::helpers::orientation::Orientation;
use crate::tile::{BorderSignatures, Side, Tile, TileId};
use itertools::Itertools;
use std::collections::HashMap;

pub type TileSet = HashMap<TileId, Tile>;

fn fits_top_left(tile: &Tile, first: &BorderSignatures, second: &BorderSignatures) -> bool {
    let right = tile.border(Side::Right);
    let bottom = tile.border(Side::Bottom);
    (first.contains(&right) && second.contains(&bottom))
        || (second.contains(&right) && first.contains(&bottom))
}

/// Turns a corner tile so that its two neighbours sit to its right and below it.
pub fn orient_top_left(tile: &mut Tile, first: &Tile, second: &Tile) -> Result<()> {
    let first_signatures = first.border_signatures();
    let second_signatures = second.border_signatures();
    let original = tile.orientation();

    let found = Orientation::all().find(|orientation| {
        tile.set_orientation(*orientation);
        fits_top_left(tile, &first_signatures, &second_signatures)
    });
    match found {
        Some(orientation) => {
            tile.set_orientation(orientation);
            Ok(())
        }
        None => {
            tile.set_orientation(original);
            Err(JigsawError::NoOrientationMatch {
                tile: tile.id(),
                wanted: format!(
                    "tiles {} and {} to the right and below",
                    first.id(),
                    second.id()
                ),
            })
        }
    }
}

/// Picks the first corner that can be turned into the top-left tile and turns it.
pub fn find_top_left(
    tiles: &mut TileSet,
    graph: &AdjacencyGraph,
    corners: &[TileId],
) -> Result<TileId> {
    if corners.is_empty() {
        return match tiles.keys().exactly_one() {
            Ok(id) => Ok(*id),
            Err(_) => malformed("No corner tiles found"),
        };
    }

    let mut last_error = None;
    for &id in corners {
        let neighbors = graph.neighbors(id).collect_vec();
        let (first_id, second_id) = match neighbors.as_slice() {
            [first, second] => (*first, *second),
            _ => {
                return malformed(format!(
                    "Corner tile {} has {} neighbours",
                    id,
                    neighbors.len()
                ))
            }
        };

        let mut corner = tiles
            .remove(&id)
            .ok_or_else(|| JigsawError::MalformedInput(format!("Unknown corner tile {}", id)))?;
        let outcome = match (tiles.get(&first_id), tiles.get(&second_id)) {
            (Some(first), Some(second)) => orient_top_left(&mut corner, first, second),
            _ => malformed(format!("Neighbours of corner tile {} are missing", id)),
        };
        tiles.insert(id, corner);

        match outcome {
            Ok(()) => {
                log::debug!("Tile {} anchors the top-left corner", id);
                return Ok(id);
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(last_error.unwrap_or_else(|| JigsawError::MalformedInput("No corner tiles".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::{build_adjacency, find_corners};
    use crate::helpers;
    use crate::tile::parse_tiles;

    fn sample() -> (TileSet, AdjacencyGraph, Vec<TileId>) {
        let input = helpers::get_data_from_file_res("d20_sample").unwrap();
        let tiles = parse_tiles(&input).unwrap();
        let graph = build_adjacency(&tiles).unwrap();
        let corners = find_corners(&graph);
        let tiles = tiles.into_iter().map(|t| (t.id(), t)).collect();
        (tiles, graph, corners)
    }

    #[test]
    fn test_every_corner_can_anchor() {
        let (tiles, graph, corners) = sample();
        for &id in &corners {
            let mut tiles = tiles.clone();
            let anchor = find_top_left(&mut tiles, &graph, &[id]).unwrap();
            assert_eq!(anchor, id);

            let corner = &tiles[&id];
            let neighbors = graph.neighbors(id).map(|n| &tiles[&n]).collect_vec();
            let right = corner.border(Side::Right);
            let bottom = corner.border(Side::Bottom);
            assert!(neighbors
                .iter()
                .any(|n| n.border_signatures().contains(&right)));
            assert!(neighbors
                .iter()
                .any(|n| n.border_signatures().contains(&bottom)));
        }
    }

    #[test]
    fn test_first_corner_wins() {
        let (mut tiles, graph, corners) = sample();
        assert_eq!(find_top_left(&mut tiles, &graph, &corners).unwrap(), 1951);
    }

    #[test]
    fn test_non_neighbours_never_fit() {
        let (tiles, _, _) = sample();
        let mut corner = tiles[&1951].clone();
        corner.rotate();
        let before = corner.orientation();
        // 1171 and 3079 are the far corners, nowhere near 1951.
        let err = orient_top_left(&mut corner, &tiles[&1171], &tiles[&3079]).unwrap_err();
        assert!(matches!(
            err,
            JigsawError::NoOrientationMatch { tile: 1951, .. }
        ));
        assert_eq!(corner.orientation(), before);
    }

    #[test]
    fn test_no_corners() {
        let (mut tiles, graph, _) = sample();
        assert!(matches!(
            find_top_left(&mut tiles, &graph, &[]),
            Err(JigsawError::MalformedInput(_))
        ));
    }
}
