//! Cube state as reported by the backend, and the moves it accepts.
//!
//! Everything here mirrors the backend's JSON body. The client never derives
//! one state from another; each response replaces the previous one.

use std::fmt;
use std::str::FromStr;

use kiss3d::prelude::Vec3;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{CubeViewError, Result};

/// Number of rows and columns on one face of the cube.
pub const FACE_DIM: usize = 3;

/// Number of faces in a complete face list.
pub const FACE_COUNT: usize = 6;

/// Color of a single sticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StickerColor {
    White,
    Yellow,
    Orange,
    Red,
    Green,
    Blue,
}

impl StickerColor {
    pub const ALL: [StickerColor; 6] = [
        StickerColor::White,
        StickerColor::Yellow,
        StickerColor::Orange,
        StickerColor::Red,
        StickerColor::Green,
        StickerColor::Blue,
    ];

    /// Single-letter code used by the text net.
    pub fn letter(self) -> char {
        match self {
            StickerColor::White => 'W',
            StickerColor::Yellow => 'Y',
            StickerColor::Orange => 'O',
            StickerColor::Red => 'R',
            StickerColor::Green => 'G',
            StickerColor::Blue => 'B',
        }
    }

    /// Linear RGB used for sticker materials.
    pub fn rgb(self) -> [f32; 3] {
        match self {
            StickerColor::White => [0.95, 0.95, 0.95],
            StickerColor::Yellow => [1.0, 0.85, 0.1],
            StickerColor::Orange => [1.0, 0.45, 0.05],
            StickerColor::Red => [0.8, 0.05, 0.05],
            StickerColor::Green => [0.05, 0.65, 0.2],
            StickerColor::Blue => [0.05, 0.25, 0.85],
        }
    }
}

/// One of the six sides of a piece (or of the whole cube).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Up,
    Down,
    Left,
    Right,
    Front,
    Back,
}

impl Side {
    pub const ALL: [Side; 6] = [
        Side::Up,
        Side::Down,
        Side::Left,
        Side::Right,
        Side::Front,
        Side::Back,
    ];

    /// Outward unit normal of this side in the backend's coordinate frame.
    pub fn normal(self) -> Vec3 {
        match self {
            Side::Up => Vec3::new(0.0, 1.0, 0.0),
            Side::Down => Vec3::new(0.0, -1.0, 0.0),
            Side::Left => Vec3::new(-1.0, 0.0, 0.0),
            Side::Right => Vec3::new(1.0, 0.0, 0.0),
            Side::Front => Vec3::new(0.0, 0.0, 1.0),
            Side::Back => Vec3::new(0.0, 0.0, -1.0),
        }
    }

    fn letter(self) -> char {
        match self {
            Side::Up => 'U',
            Side::Down => 'D',
            Side::Left => 'L',
            Side::Right => 'R',
            Side::Front => 'F',
            Side::Back => 'B',
        }
    }
}

/// How far a face is turned by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Clockwise,
    CounterClockwise,
    Double,
}

/// One of the 18 face turns the backend understands.
///
/// `Display` and `FromStr` use the exact path segment of
/// `POST /apply_move/{move}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeMove {
    U,
    UPrime,
    U2,
    D,
    DPrime,
    D2,
    L,
    LPrime,
    L2,
    R,
    RPrime,
    R2,
    F,
    FPrime,
    F2,
    B,
    BPrime,
    B2,
}

impl CubeMove {
    /// All moves, in toolbar order.
    pub const ALL: [CubeMove; 18] = [
        CubeMove::U,
        CubeMove::UPrime,
        CubeMove::U2,
        CubeMove::D,
        CubeMove::DPrime,
        CubeMove::D2,
        CubeMove::L,
        CubeMove::LPrime,
        CubeMove::L2,
        CubeMove::R,
        CubeMove::RPrime,
        CubeMove::R2,
        CubeMove::F,
        CubeMove::FPrime,
        CubeMove::F2,
        CubeMove::B,
        CubeMove::BPrime,
        CubeMove::B2,
    ];

    /// Builds the move turning `side` by `turn`.
    pub fn new(side: Side, turn: Turn) -> Self {
        use CubeMove::*;
        match (side, turn) {
            (Side::Up, Turn::Clockwise) => U,
            (Side::Up, Turn::CounterClockwise) => UPrime,
            (Side::Up, Turn::Double) => U2,
            (Side::Down, Turn::Clockwise) => D,
            (Side::Down, Turn::CounterClockwise) => DPrime,
            (Side::Down, Turn::Double) => D2,
            (Side::Left, Turn::Clockwise) => L,
            (Side::Left, Turn::CounterClockwise) => LPrime,
            (Side::Left, Turn::Double) => L2,
            (Side::Right, Turn::Clockwise) => R,
            (Side::Right, Turn::CounterClockwise) => RPrime,
            (Side::Right, Turn::Double) => R2,
            (Side::Front, Turn::Clockwise) => F,
            (Side::Front, Turn::CounterClockwise) => FPrime,
            (Side::Front, Turn::Double) => F2,
            (Side::Back, Turn::Clockwise) => B,
            (Side::Back, Turn::CounterClockwise) => BPrime,
            (Side::Back, Turn::Double) => B2,
        }
    }

    /// The face this move turns.
    pub fn side(self) -> Side {
        use CubeMove::*;
        match self {
            U | UPrime | U2 => Side::Up,
            D | DPrime | D2 => Side::Down,
            L | LPrime | L2 => Side::Left,
            R | RPrime | R2 => Side::Right,
            F | FPrime | F2 => Side::Front,
            B | BPrime | B2 => Side::Back,
        }
    }

    pub fn turn(self) -> Turn {
        use CubeMove::*;
        match self {
            U | D | L | R | F | B => Turn::Clockwise,
            UPrime | DPrime | LPrime | RPrime | FPrime | BPrime => Turn::CounterClockwise,
            U2 | D2 | L2 | R2 | F2 | B2 => Turn::Double,
        }
    }
}

impl fmt::Display for CubeMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.turn() {
            Turn::Clockwise => "",
            Turn::CounterClockwise => "Prime",
            Turn::Double => "2",
        };
        write!(f, "{}{}", self.side().letter(), suffix)
    }
}

impl FromStr for CubeMove {
    type Err = CubeViewError;

    fn from_str(name: &str) -> Result<Self> {
        CubeMove::ALL
            .into_iter()
            .find(|cube_move| cube_move.to_string() == name)
            .ok_or_else(|| CubeViewError::UnknownMove(name.to_string()))
    }
}

/// Orientation of a piece, exactly as the backend sends it.
///
/// The nine values are in column-major order: `0..3` is the first column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RotationMatrix(pub [f32; 9]);

impl RotationMatrix {
    pub const IDENTITY: Self = Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    /// Builds a matrix whose columns are the images of the X, Y and Z axes.
    pub fn from_columns(x: Vec3, y: Vec3, z: Vec3) -> Self {
        Self([x.x, x.y, x.z, y.x, y.y, y.z, z.x, z.y, z.z])
    }

    /// Element at `row`, `col` of the rotation the backend means.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.0[col * 3 + row]
    }
}

impl Default for RotationMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A sticker on one side of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StickerFace {
    /// The side of the piece carrying the sticker, before any rotation.
    pub initial_side_direction: Side,
    pub color: StickerColor,
}

/// One physical sub-cube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubePiece {
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: RotationMatrix,
    #[serde(default)]
    pub faces: Vec<StickerFace>,
}

impl CubePiece {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Rows of sticker colors on one face.
pub type FaceGrid = Vec<Vec<StickerColor>>;

/// Every piece at one instant of a move.
pub type AnimationFrame = Vec<CubePiece>;

/// Body of both `GET /get_cube` and `POST /apply_move/{move}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeResponse {
    /// Faces in the order Up, Left, Front, Right, Back, Down.
    pub faces: Vec<FaceGrid>,
    pub pieces: Vec<CubePiece>,
    /// Intermediate snapshots, excluding the final state.
    #[serde(default)]
    pub animation: Vec<AnimationFrame>,
}

impl CubeResponse {
    /// Checks the structural invariants serde cannot express.
    ///
    /// An empty face list is accepted (nothing to show yet); otherwise all six
    /// faces must be complete 3x3 grids.
    pub fn validate(&self) -> Result<()> {
        if self.faces.is_empty() {
            return Ok(());
        }
        if self.faces.len() != FACE_COUNT {
            return Err(CubeViewError::Malformed(format!(
                "expected {FACE_COUNT} faces, got {}",
                self.faces.len()
            )));
        }
        for (face_index, face) in self.faces.iter().enumerate() {
            let complete =
                face.len() == FACE_DIM && face.iter().all(|row| row.len() == FACE_DIM);
            if !complete {
                return Err(CubeViewError::Malformed(format!(
                    "face {face_index} is not a complete {FACE_DIM}x{FACE_DIM} grid"
                )));
            }
        }
        Ok(())
    }

    /// Splits the response into the authoritative state and its animation.
    pub fn into_parts(self) -> (CubeState, Vec<AnimationFrame>) {
        let state = CubeState {
            faces: self.faces,
            pieces: self.pieces,
        };
        (state, self.animation)
    }
}

/// Decodes and validates a response body.
pub fn decode_response(body: &str) -> Result<CubeResponse> {
    let response: CubeResponse = serde_json::from_str(body)?;
    response.validate()?;
    Ok(response)
}

/// The faces and pieces of one backend response, shown together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CubeState {
    pub faces: Vec<FaceGrid>,
    pub pieces: Vec<CubePiece>,
}

/// Counts stickers of each color across all pieces.
///
/// A complete cube has nine of every color.
pub fn sticker_tally(pieces: &[CubePiece]) -> FxHashMap<StickerColor, usize> {
    let mut tally = FxHashMap::default();
    for sticker in pieces.iter().flat_map(|piece| &piece.faces) {
        *tally.entry(sticker.color).or_insert(0) += 1;
    }
    tally
}
