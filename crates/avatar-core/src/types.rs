//! Core types shared by the mesh, animation and transform code

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// A vertex position `[x, y, z]`
pub type Position = [f32; 3];

/// A vertex normal `[nx, ny, nz]`
pub type Normal = [f32; 3];

/// A texture coordinate `[u, v]`
pub type TexCoord = [f32; 2];

/// Wrap an angle in degrees into `[0, 360)`. Non-finite input maps to `0.0`.
pub fn wrap_degrees(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// A coordinate axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    /// Component index of this axis in a `[f32; 3]`
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Orientation as three Euler angles in degrees.
///
/// Angles are applied x first, then y, then z, i.e. the combined matrix is
/// `Rz * Ry * Rx`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerAngles {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl EulerAngles {
    pub const ZERO: EulerAngles = EulerAngles {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a new set of angles, wrapping each into `[0, 360)`
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }.wrapped()
    }

    /// Return a copy with every angle wrapped into `[0, 360)`
    pub fn wrapped(self) -> Self {
        Self {
            x: wrap_degrees(self.x),
            y: wrap_degrees(self.y),
            z: wrap_degrees(self.z),
        }
    }

    /// The angles in radians as `(x, y, z)`
    pub fn to_radians(self) -> Vec3 {
        Vec3::new(self.x.to_radians(), self.y.to_radians(), self.z.to_radians())
    }

    /// Build the rotation matrix `Rz * Ry * Rx`
    pub fn rotation_matrix(self) -> Mat3 {
        let r = self.to_radians();
        Mat3::from_rotation_z(r.z) * Mat3::from_rotation_y(r.y) * Mat3::from_rotation_x(r.x)
    }
}
