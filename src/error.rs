use crate::tile::TileId;

/// Everything that can go wrong between raw tile blocks and the pattern scan.
///
/// All of these point at invalid input. The search is deterministic and exhaustive,
/// so none of them are worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JigsawError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("No orientation of tile {tile} satisfies: {wanted}")]
    NoOrientationMatch { tile: TileId, wanted: String },
    #[error("Pattern not found in any orientation of the image")]
    PatternNotFound,
}

pub type Result<T, E = JigsawError> = std::result::Result<T, E>;

pub(crate) fn malformed<T>(msg: impl Into<String>) -> Result<T> {
    Err(JigsawError::MalformedInput(msg.into()))
}
