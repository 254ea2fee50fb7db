use crate::error::{malformed, Result};
use crate::tile::{Border, BorderSignatures, Pixel, Tile, TileId};
use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;
use std::collections::{HashMap, HashSet};

type TileGraph = UnGraphMap<TileId, ()>;
pub type AdjacencyMap = HashMap<TileId, Vec<TileId>>;

/// Which tiles share a border, regardless of how either tile is turned.
///
/// Built once from the parsed tiles and never modified afterwards.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph {
    graph: TileGraph,
}

impl AdjacencyGraph {
    pub fn neighbors(&self, id: TileId) -> impl Iterator<Item = TileId> + '_ {
        self.graph.neighbors(id)
    }

    pub fn neighbor_count(&self, id: TileId) -> usize {
        self.graph.neighbors(id).count()
    }

    pub fn are_neighbors(&self, a: TileId, b: TileId) -> bool {
        self.graph.contains_edge(a, b)
    }

    /// Tile ids in the order the tiles were given.
    pub fn tile_ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.graph.nodes()
    }

    pub fn shared_border_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn to_map(&self) -> AdjacencyMap {
        self.tile_ids()
            .map(|id| (id, self.neighbors(id).collect_vec()))
            .collect()
    }
}

// An edge and its reversal collapse onto the same key.
fn canonical(border: &[Pixel]) -> Border {
    let reversed = border.iter().rev().copied().collect_vec();
    if reversed.as_slice() < border {
        reversed
    } else {
        border.to_vec()
    }
}

fn shared_edges(a: &BorderSignatures, b: &BorderSignatures) -> HashSet<Border> {
    a.intersection(b).map(|border| canonical(border)).collect()
}

/// Pairs up every two tiles whose border signatures intersect.
///
/// A pair of tiles may share at most one edge, and an edge of a tile may be matched by
/// at most one other tile. Anything else makes the placement ambiguous and is rejected.
pub fn build_adjacency(tiles: &[Tile]) -> Result<AdjacencyGraph> {
    let mut graph = TileGraph::with_capacity(tiles.len(), tiles.len() * 2);
    for tile in tiles {
        if graph.contains_node(tile.id()) {
            return malformed(format!("Tile id {} appears more than once", tile.id()));
        }
        graph.add_node(tile.id());
    }

    let signatures = tiles
        .iter()
        .map(|tile| (tile.id(), tile.border_signatures()))
        .collect_vec();

    let mut claimed_edges = HashMap::<(TileId, Border), TileId>::new();
    for ((id_1, signatures_1), (id_2, signatures_2)) in signatures.iter().tuple_combinations() {
        let shared = shared_edges(signatures_1, signatures_2);
        if shared.len() > 1 {
            return malformed(format!(
                "Tiles {} and {} share {} different borders",
                id_1,
                id_2,
                shared.len()
            ));
        }
        let edge = match shared.into_iter().next() {
            Some(edge) => edge,
            None => continue,
        };
        for (owner, other) in [(*id_1, *id_2), (*id_2, *id_1)].iter() {
            if let Some(previous) = claimed_edges.insert((*owner, edge.clone()), *other) {
                return malformed(format!(
                    "A border of tile {} matches both tile {} and tile {}",
                    owner, previous, other
                ));
            }
        }
        log::trace!("tiles {} and {} share a border", id_1, id_2);
        graph.add_edge(*id_1, *id_2, ());
    }

    log::debug!(
        "Adjacency graph: {} tiles, {} shared borders",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(AdjacencyGraph { graph })
}

/// Tiles with exactly two neighbours, in input order.
pub fn find_corners(graph: &AdjacencyGraph) -> Vec<TileId> {
    graph
        .tile_ids()
        .filter(|id| graph.neighbor_count(*id) == 2)
        .collect()
}

/// Product of the corner ids, an error when it doesn't fit in a `u64`.
pub fn corner_product(corners: &[TileId]) -> Result<u64> {
    corners.iter().try_fold(1u64, |product, id| match product.checked_mul(*id) {
        Some(product) => Ok(product),
        None => malformed(format!("Product of corner tile ids {:?} overflows", corners)),
    })
}
