use crate::error::{JigsawError, Result};
use crate::helpers::grid::GridPos;
use crate::helpers::orientation::Orientation;
use crate::tile::{Pixel, Pixels};
use boolinator::Boolinator;
use itertools::Itertools;
use once_cell::sync::Lazy;
use std::str::FromStr;

pub type Offset = (isize, isize);

/// A shape given as offsets from an anchor cell. Every offset has to land on a set pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    offsets: Vec<Offset>,
}

/// Where a pattern was found: the image orientation it shows up in and every anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatches {
    pub orientation: Orientation,
    pub anchors: Vec<GridPos>,
}

const SEA_MONSTER_STR: &str = r"                  #
#    ##    ##    ###
 #  #  #  #  #  #   ";

impl FromStr for Pattern {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let offsets = s
            .lines()
            .enumerate()
            .flat_map(|(r, line)| line.chars().enumerate().map(move |(c, ch)| (r, c, ch)))
            .filter_map(|(r, c, ch)| match ch {
                '#' => Some(Ok((r as isize, c as isize))),
                ' ' | '.' => None,
                _ => Some(Err(anyhow::anyhow!("Invalid pattern character '{}'", ch))),
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        if offsets.is_empty() {
            anyhow::bail!("Pattern has no set cells");
        }
        Ok(Pattern::new(offsets))
    }
}

impl Pattern {
    pub fn new(offsets: Vec<Offset>) -> Self {
        Pattern { offsets }
    }

    pub fn sea_monster() -> &'static Pattern {
        static INSTANCE: Lazy<Pattern> =
            Lazy::new(|| SEA_MONSTER_STR.parse().expect("Invalid sea monster"));
        &INSTANCE
    }

    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    fn cells(&self, anchor: GridPos) -> impl Iterator<Item = Option<GridPos>> + '_ {
        self.offsets.iter().map(move |(dr, dc)| {
            let r = anchor.0 as isize + dr;
            let c = anchor.1 as isize + dc;
            (r >= 0 && c >= 0).as_some((r as usize, c as usize))
        })
    }

    pub fn matches_at(&self, image: &Pixels, orientation: Orientation, anchor: GridPos) -> bool {
        self.cells(anchor).all(|pos| {
            pos.and_then(|pos| image.get_oriented(pos, orientation))
                .map_or(false, |pixel| *pixel == Pixel::Set)
        })
    }
}

pub fn count_set_pixels(image: &Pixels) -> usize {
    image.iter().filter(|pixel| **pixel == Pixel::Set).count()
}

/// Tries the 8 orientations of `image` in turn and stops at the first one with a match.
pub fn find_pattern(image: &Pixels, pattern: &Pattern) -> Option<PatternMatches> {
    Orientation::all().find_map(|orientation| {
        let (rows, cols) = orientation.dims(image.dims());
        let anchors = (0..rows)
            .cartesian_product(0..cols)
            .filter(|anchor| pattern.matches_at(image, orientation, *anchor))
            .collect_vec();
        log::trace!("{}: {} matches", orientation, anchors.len());
        (!anchors.is_empty()).as_some(PatternMatches {
            orientation,
            anchors,
        })
    })
}

/// Set pixels of `image` minus the pixels claimed by pattern occurrences.
pub fn count_unmatched_set_pixels(image: &Pixels, pattern: &Pattern) -> Result<usize> {
    let matches = find_pattern(image, pattern).ok_or(JigsawError::PatternNotFound)?;
    log::debug!(
        "Found {} pattern occurrences ({})",
        matches.anchors.len(),
        matches.orientation
    );
    Ok(count_set_pixels(image).saturating_sub(matches.anchors.len() * pattern.len()))
}

/// The image in the orientation the matches were found in, with matched pixels marked.
pub fn mark_pattern(image: &Pixels, pattern: &Pattern, matches: &PatternMatches) -> Pixels {
    let mut marked = image.reoriented(matches.orientation);
    for anchor in &matches.anchors {
        for pos in pattern.cells(*anchor).flatten() {
            if let Some(pixel) = marked.get_mut(pos) {
                if *pixel == Pixel::Set {
                    *pixel = Pixel::Marked;
                }
            }
        }
    }
    marked
}
