//! Rotation and placement utilities for pieces and stickers.
//!
//! Two conventions live here and nowhere else:
//! - piece orientations arrive as column-major matrices and leave as
//!   rotation vectors (axis scaled by angle) or quaternions;
//! - a sticker is modelled facing +Z and is turned to face outward.

use std::f32::consts::PI;

use kiss3d::prelude::{Quat, Vec3};

use crate::cube::{RotationMatrix, Side};

/// Below this `sin(angle / 2)` the rotation axis is considered undefined.
const AXIS_EPSILON: f32 = 0.001;

/// Tolerance on `cos(angle)` for treating two normals as parallel.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Distance from a piece's center to its sides.
pub const HALF_PIECE: f32 = 0.5;

/// Direction a sticker faces before it is placed.
pub const STICKER_REFERENCE_NORMAL: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Fallback axis used when the rotation is (nearly) the identity.
const DEFAULT_AXIS: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// Quaternion components `(x, y, z, w)` extracted from a 3x3 matrix.
///
/// Reads the nine wire values row by row, the way the renderer reads a
/// matrix, so the result is the quaternion of the transposed (inverse)
/// rotation. `rotation_vector` compensates for this with a negated angle.
fn renderer_quaternion(matrix: &RotationMatrix) -> [f32; 4] {
    let m = &matrix.0;
    let (m11, m12, m13) = (m[0], m[1], m[2]);
    let (m21, m22, m23) = (m[3], m[4], m[5]);
    let (m31, m32, m33) = (m[6], m[7], m[8]);

    let trace = m11 + m22 + m33;
    if trace > 0.0 {
        let s = 0.5 / (trace + 1.0).sqrt();
        [(m32 - m23) * s, (m13 - m31) * s, (m21 - m12) * s, 0.25 / s]
    } else if m11 > m22 && m11 > m33 {
        let s = 2.0 * (1.0 + m11 - m22 - m33).sqrt();
        [0.25 * s, (m12 + m21) / s, (m13 + m31) / s, (m32 - m23) / s]
    } else if m22 > m33 {
        let s = 2.0 * (1.0 + m22 - m11 - m33).sqrt();
        [(m12 + m21) / s, 0.25 * s, (m23 + m32) / s, (m13 - m31) / s]
    } else {
        let s = 2.0 * (1.0 + m33 - m11 - m22).sqrt();
        [(m13 + m31) / s, (m23 + m32) / s, 0.25 * s, (m21 - m12) / s]
    }
}

/// Converts a piece orientation into a rotation vector.
///
/// The result is the rotation axis scaled by the rotation angle in radians,
/// expressed in the same frame as piece positions. Matrices that drifted
/// slightly off orthonormal are tolerated.
pub fn rotation_vector(matrix: &RotationMatrix) -> Vec3 {
    let [x, y, z, w] = renderer_quaternion(matrix);

    let w = w.clamp(-1.0, 1.0);
    let angle = 2.0 * w.acos();

    let s = (1.0 - w * w).max(0.0).sqrt();
    let axis = if s < AXIS_EPSILON {
        DEFAULT_AXIS
    } else {
        Vec3::new(x / s, y / s, z / s)
    };

    axis * -angle
}

/// Converts a piece orientation into a quaternion for scene nodes.
pub fn orientation(matrix: &RotationMatrix) -> Quat {
    Quat::from_scaled_axis(rotation_vector(matrix))
}

/// Where and how a sticker sits on a piece, relative to the piece's center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickerPlacement {
    /// Offset from the piece center to the middle of the side.
    pub offset: Vec3,
    /// Turns [`STICKER_REFERENCE_NORMAL`] onto the side's outward normal.
    pub rotation: Quat,
}

impl StickerPlacement {
    /// Direction the visible face of the sticker points.
    pub fn normal(&self) -> Vec3 {
        self.rotation * STICKER_REFERENCE_NORMAL
    }
}

/// Places a sticker flush on `side` of a unit piece, facing outward.
pub fn sticker_placement(side: Side) -> StickerPlacement {
    let normal = side.normal();
    StickerPlacement {
        offset: normal * HALF_PIECE,
        rotation: rotation_arc(STICKER_REFERENCE_NORMAL, normal),
    }
}

/// Shortest rotation taking unit vector `from` onto unit vector `to`.
///
/// The cross product vanishes for both parallel and opposite vectors: the
/// former needs no rotation, the latter a half turn about any perpendicular.
pub fn rotation_arc(from: Vec3, to: Vec3) -> Quat {
    let dot = from.dot(to).clamp(-1.0, 1.0);
    if dot >= 1.0 - PARALLEL_EPSILON {
        Quat::IDENTITY
    } else if dot <= -1.0 + PARALLEL_EPSILON {
        Quat::from_axis_angle(any_perpendicular(from), PI)
    } else {
        let axis = from.cross(to).normalize();
        Quat::from_axis_angle(axis, dot.acos())
    }
}

/// Some unit vector perpendicular to `v`.
fn any_perpendicular(v: Vec3) -> Vec3 {
    // cross with the basis axis least aligned with v
    let helper = if v.x.abs() < 0.9 {
        Vec3::new(1.0, 0.0, 0.0)
    } else {
        Vec3::new(0.0, 1.0, 0.0)
    };
    helper.cross(v).normalize()
}
