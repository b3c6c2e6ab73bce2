//! Renderer-independent description of the pieces to draw.
//!
//! Coordinate conventions:
//! - Piece positions are taken verbatim from the backend (centered on the
//!   origin, one unit per cell).
//! - Each piece is a black cube slightly under one unit so gaps show between
//!   neighbours; stickers are thin slabs flush with its sides.

use kiss3d::prelude::{Quat, Vec3};

use crate::cube::{CubePiece, Side, StickerColor};
use crate::geometry::{orientation, sticker_placement, STICKER_REFERENCE_NORMAL};

/// Edge length of a piece body.
pub const PIECE_SIZE: f32 = 0.99;

/// Edge length of a sticker.
pub const STICKER_SIZE: f32 = 0.9;

/// Thickness of a sticker slab along its normal.
pub const STICKER_DEPTH: f32 = 0.01;

/// Color of a piece body.
pub const PIECE_RGB: [f32; 3] = [0.02, 0.02, 0.02];

/// A sticker relative to its piece's center and orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickerModel {
    pub side: Side,
    pub offset: Vec3,
    pub rotation: Quat,
    pub color: StickerColor,
}

/// A piece ready to be turned into scene nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceModel {
    pub position: Vec3,
    pub rotation: Quat,
    pub stickers: Vec<StickerModel>,
}

impl PieceModel {
    pub fn from_piece(piece: &CubePiece) -> Self {
        let stickers = piece
            .faces
            .iter()
            .map(|face| {
                let placement = sticker_placement(face.initial_side_direction);
                StickerModel {
                    side: face.initial_side_direction,
                    offset: placement.offset,
                    rotation: placement.rotation,
                    color: face.color,
                }
            })
            .collect();

        Self {
            position: piece.position(),
            rotation: orientation(&piece.rotation),
            stickers,
        }
    }

    /// World-space direction the given sticker faces.
    pub fn sticker_normal(&self, sticker: &StickerModel) -> Vec3 {
        self.sticker_rotation(sticker) * STICKER_REFERENCE_NORMAL
    }

    /// World-space orientation of the given sticker.
    pub fn sticker_rotation(&self, sticker: &StickerModel) -> Quat {
        self.rotation * sticker.rotation
    }

    /// World-space center of the given sticker.
    pub fn sticker_center(&self, sticker: &StickerModel) -> Vec3 {
        self.position + self.rotation * sticker.offset
    }

    /// Whether two models carry the same stickers, ignoring their transforms.
    pub fn same_stickers(&self, other: &PieceModel) -> bool {
        self.stickers.len() == other.stickers.len()
            && self
                .stickers
                .iter()
                .zip(&other.stickers)
                .all(|(a, b)| a.side == b.side && a.color == b.color)
    }
}

/// Builds the models for every piece; an empty list yields an empty scene.
pub fn compose(pieces: &[CubePiece]) -> Vec<PieceModel> {
    pieces.iter().map(PieceModel::from_piece).collect()
}
