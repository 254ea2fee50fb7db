use crate::error::{malformed, JigsawError, Result};
use crate::helpers::grid::Grid;
use crate::helpers::orientation::Orientation;
use derive_more::Display;
use itertools::Itertools;
use nom::{
    bytes::complete::tag,
    character::complete::{char as nom_char, digit1, space0, space1},
    combinator::{all_consuming, map_res},
    error::{context, convert_error, VerboseError},
    sequence::{delimited, pair},
    IResult,
};
use std::collections::HashSet;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pixel {
    #[display(fmt = ".")]
    Unset,
    #[display(fmt = "#")]
    Set,
    #[display(fmt = "O")]
    Marked,
}

pub type TileId = u64;
pub type Pixels = Grid<Pixel>;
pub type Border = Vec<Pixel>;
pub type BorderSignatures = HashSet<Border>;

#[derive(Debug, Clone, Copy, Display, PartialEq, Eq, Hash)]
pub enum Side {
    #[display(fmt = "top")]
    Top,
    #[display(fmt = "right")]
    Right,
    #[display(fmt = "bottom")]
    Bottom,
    #[display(fmt = "left")]
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn opposite(&self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }
}

/// A square tile with its pixels stored as parsed and an orientation applied on read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    pixels: Pixels,
    orientation: Orientation,
}

impl FromStr for Pixel {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.chars().next() {
            None => anyhow::bail!("No pixel character"),
            Some('.') => Ok(Pixel::Unset),
            Some('#') => Ok(Pixel::Set),
            Some(c) => anyhow::bail!("Invalid pixel '{}'", c),
        }
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile {}:\n{}", self.id, self.pixels())
    }
}

fn tile_header(i: &str) -> IResult<&str, TileId, VerboseError<&str>> {
    all_consuming(delimited(
        pair(tag("Tile"), space1),
        context("tile id", map_res(digit1, |id: &str| id.parse::<TileId>())),
        pair(nom_char(':'), space0),
    ))(i)
}

impl FromStr for Tile {
    type Err = JigsawError;
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut lines = s.splitn(2, '\n');
        let header = lines
            .next()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .ok_or_else(|| JigsawError::MalformedInput("Empty tile block".to_string()))?;
        let id = match tile_header(header) {
            Ok((_, id)) => id,
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                return malformed(format!(
                    "Invalid tile header:\n{}",
                    convert_error(header, e)
                ))
            }
            Err(nom::Err::Incomplete(_)) => {
                return malformed(format!("Incomplete tile header '{}'", header))
            }
        };
        let pixels = lines
            .next()
            .ok_or_else(|| JigsawError::MalformedInput(format!("Tile {} has no pixels", id)))?
            .parse::<Pixels>()
            .map_err(|e| JigsawError::MalformedInput(format!("Tile {}: {}", id, e)))?;

        Tile::new(id, pixels)
    }
}

impl Tile {
    pub fn new(id: TileId, pixels: Pixels) -> Result<Self> {
        if pixels.rows() != pixels.cols() {
            return malformed(format!(
                "Tile {} is {}x{}, tiles must be square",
                id,
                pixels.rows(),
                pixels.cols()
            ));
        }
        if pixels.rows() < 3 {
            return malformed(format!("Tile {} is too small to strip its borders", id));
        }
        Ok(Tile {
            id,
            pixels,
            orientation: Orientation::IDENTITY,
        })
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn size(&self) -> usize {
        self.pixels.rows()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub fn rotate(&mut self) {
        self.orientation = self.orientation.rotated();
    }

    pub fn flip(&mut self) {
        self.orientation = self.orientation.flipped();
    }

    /// Top and bottom read left to right, left and right read top to bottom.
    pub fn border(&self, side: Side) -> Border {
        let last = self.size() - 1;
        (0..self.size())
            .map(|i| {
                let pos = match side {
                    Side::Top => (0, i),
                    Side::Right => (i, last),
                    Side::Bottom => (last, i),
                    Side::Left => (i, 0),
                };
                self.pixels[self.orientation.source_pos(pos, self.pixels.dims())]
            })
            .collect()
    }

    /// The four borders plus their reversals. Every orientation yields the same set.
    pub fn border_signatures(&self) -> BorderSignatures {
        Side::ALL
            .iter()
            .flat_map(|side| {
                let border = self.border(*side);
                let reversed = border.iter().rev().copied().collect_vec();
                vec![border, reversed]
            })
            .collect()
    }

    pub fn shares_border(&self, other: &Tile) -> bool {
        self.id != other.id
            && !self
                .border_signatures()
                .is_disjoint(&other.border_signatures())
    }

    /// Turns the tile until its `side` border reads exactly `target`.
    /// The orientation is left untouched when no orientation fits.
    pub fn adapt(&mut self, target: &[Pixel], side: Side) -> Result<()> {
        let original = self.orientation;
        for orientation in Orientation::all() {
            self.orientation = orientation;
            if self.border(side).as_slice() == target {
                log::trace!("tile {} {}: {} border aligned", self.id, orientation, side);
                return Ok(());
            }
        }
        self.orientation = original;
        Err(JigsawError::NoOrientationMatch {
            tile: self.id,
            wanted: format!(
                "{} border equal to {}",
                side,
                target.iter().map(Pixel::to_string).join("")
            ),
        })
    }

    pub fn pixels(&self) -> Pixels {
        self.pixels.reoriented(self.orientation)
    }

    pub fn without_borders(&self) -> Pixels {
        self.pixels().cropped(1)
    }
}

pub fn build_tiles<S: AsRef<str>>(raw_blocks: &[S]) -> Result<Vec<Tile>> {
    let tiles = raw_blocks
        .iter()
        .map(|block| block.as_ref())
        .filter(|block| !block.trim().is_empty())
        .map(str::parse::<Tile>)
        .collect::<Result<Vec<_>>>()?;

    let size = match tiles.first() {
        Some(tile) => tile.size(),
        None => return malformed("No tiles found"),
    };
    if let Some(tile) = tiles.iter().find(|t| t.size() != size) {
        return malformed(format!(
            "Tile {} has size {}, expected {} like tile {}",
            tile.id,
            tile.size(),
            size,
            tiles[0].id
        ));
    }
    let mut seen = HashSet::new();
    if let Some(tile) = tiles.iter().find(|t| !seen.insert(t.id)) {
        return malformed(format!("Tile id {} appears more than once", tile.id));
    }
    Ok(tiles)
}

pub fn parse_tiles(s: &str) -> Result<Vec<Tile>> {
    let s = s.replace("\r\n", "\n");
    let blocks = s.split("\n\n").collect_vec();
    build_tiles(&blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE_2311: &str = "
Tile 2311:
..##.#..#.
##..#.....
#...##..#.
####.#...#
##.##.###.
##...#.###
.#.#.#..##
..#....#..
###...#.#.
..###..###";

    const TILE_1951: &str = "
Tile 1951:
#.##...##.
#.####...#
.....#..##
#...######
.##.#....#
.###.#####
###.##.##.
.###....#.
..#.#..#.#
#...##.#..";

    fn border_str(tile: &Tile, side: Side) -> String {
        tile.border(side).iter().map(|p| format!("{}", p)).collect()
    }

    #[test]
    fn test_basic_ops() {
        let tile = TILE_2311.parse::<Tile>().unwrap();
        assert_eq!(tile.id(), 2311);
        assert_eq!(tile.size(), 10);
        let mut tile_2 = tile.clone();

        for _ in 0..4 {
            tile_2.rotate();
        }
        assert_eq!(tile.pixels(), tile_2.pixels());

        tile_2.flip();
        assert_ne!(tile.pixels(), tile_2.pixels());
        tile_2.flip();
        assert_eq!(tile.pixels(), tile_2.pixels());

        assert_eq!(border_str(&tile, Side::Top), "..##.#..#.");
        assert_eq!(border_str(&tile, Side::Right), "...#.##..#");
        assert_eq!(border_str(&tile, Side::Bottom), "..###..###");
        assert_eq!(border_str(&tile, Side::Left), ".#####..#.");
    }

    #[test]
    fn test_rotate_and_flip_move_borders() {
        let mut tile = TILE_2311.parse::<Tile>().unwrap();
        tile.rotate();
        assert_eq!(border_str(&tile, Side::Top), ".#..#####.");
        assert_eq!(border_str(&tile, Side::Right), "..##.#..#.");
        assert_eq!(tile.pixels().get((0, 9)), Some(&Pixel::Unset));
        assert_eq!(tile.pixels().get((0, 10)), None);

        let mut tile = TILE_2311.parse::<Tile>().unwrap();
        tile.flip();
        assert_eq!(border_str(&tile, Side::Top), ".#..#.##..");
        assert_eq!(border_str(&tile, Side::Left), "...#.##..#");
    }

    #[test]
    fn test_signatures_ignore_orientation() {
        let mut tile = TILE_2311.parse::<Tile>().unwrap();
        let signatures = tile.border_signatures();
        assert_eq!(signatures.len(), 8);
        for orientation in Orientation::all() {
            tile.set_orientation(orientation);
            assert_eq!(tile.border_signatures(), signatures);
        }
    }

    #[test]
    fn test_adapt() {
        let tile_1 = TILE_1951.parse::<Tile>().unwrap();
        let mut tile_2 = TILE_2311.parse::<Tile>().unwrap();
        assert!(tile_1.shares_border(&tile_2));
        assert!(tile_2.shares_border(&tile_1));
        assert!(!tile_1.shares_border(&tile_1));

        let edge = tile_1.border(Side::Right);
        tile_2.adapt(&edge, Side::Left).unwrap();
        assert_eq!(tile_2.orientation(), Orientation::IDENTITY);

        tile_2.rotate();
        tile_2.flip();
        tile_2.adapt(&edge, Side::Left).unwrap();
        assert_eq!(tile_2.border(Side::Left), edge);

        // The same edge read the other way round can sit on top after a turn.
        let reversed = edge.iter().rev().copied().collect_vec();
        tile_2.adapt(&reversed, Side::Top).unwrap();
        assert_eq!(tile_2.border(Side::Top), reversed);
    }

    #[test]
    fn test_adapt_failure_keeps_orientation() {
        let mut tile = TILE_2311.parse::<Tile>().unwrap();
        tile.rotate();
        let before = tile.orientation();
        let err = tile.adapt(&[Pixel::Set; 10], Side::Top).unwrap_err();
        assert!(matches!(
            err,
            JigsawError::NoOrientationMatch { tile: 2311, .. }
        ));
        assert_eq!(tile.orientation(), before);
    }

    #[test]
    fn test_without_borders() {
        let tile = TILE_2311.parse::<Tile>().unwrap();
        let inner = tile.without_borders();
        assert_eq!(inner.dims(), (8, 8));
        assert_eq!(format!("{}", inner).lines().next(), Some("#..#...."));
        assert!(format!("{}", tile).starts_with("Tile 2311:\n..##.#..#."));
    }

    #[test]
    fn test_malformed_tiles() {
        macro_rules! malformed {
            ($expr: expr) => {
                assert!(matches!(
                    $expr.parse::<Tile>(),
                    Err(JigsawError::MalformedInput(_))
                ))
            };
        }

        malformed!("");
        malformed!("Tile 12:");
        malformed!("Tile:\n#.#\n...\n#.#");
        malformed!("Tile abc:\n#.#\n...\n#.#");
        malformed!("Tile 12\n#.#\n...\n#.#");
        malformed!("Tile 12:\n#.#\n...");
        malformed!("Tile 12:\n#.#\n.x.\n#.#");
        malformed!("Tile 12:\n#.\n..");
        assert!("Tile 12:\n#.#\n...\n#.#".parse::<Tile>().is_ok());
    }

    #[test]
    fn test_build_tiles() {
        let tiles = build_tiles(&[TILE_2311, TILE_1951, "\n"]).unwrap();
        assert_eq!(tiles.iter().map(Tile::id).collect_vec(), vec![2311, 1951]);

        let small = "Tile 12:\n#.#\n...\n#.#";
        assert!(matches!(
            build_tiles(&[TILE_2311, small]),
            Err(JigsawError::MalformedInput(_))
        ));
        assert!(matches!(
            build_tiles(&[TILE_2311, TILE_2311]),
            Err(JigsawError::MalformedInput(_))
        ));
        assert!(matches!(
            build_tiles::<&str>(&[]),
            Err(JigsawError::MalformedInput(_))
        ));
    }
}
