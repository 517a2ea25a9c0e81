//! Elliptical sky region.
//!
//! The API takes a full ellipse, but membership is a circle of radius
//! `major_axis_deg` around the center: minor axis and rotation are validated
//! and stored, never used geometrically.

use serde::{Deserialize, Serialize};

use catsel_core::error::{Error, Result};

/// Smallest accepted axis, in degrees.
pub const MIN_AXIS_DEG: f64 = 1.0e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center_ra_deg: f64,
    pub center_dec_deg: f64,
    pub major_axis_deg: f64,
    pub minor_axis_deg: f64,
    #[serde(default)]
    pub rotation_deg: f64,
}

impl Ellipse {
    pub fn circle(center_ra_deg: f64, center_dec_deg: f64, radius_deg: f64) -> Self {
        Self {
            center_ra_deg,
            center_dec_deg,
            major_axis_deg: radius_deg,
            minor_axis_deg: radius_deg,
            rotation_deg: 0.0,
        }
    }

    /// Reject impossible positions, rotations, and axis sizes.
    pub fn validate(&self) -> Result<()> {
        let ra = self.center_ra_deg;
        let dec = self.center_dec_deg;
        let rot = self.rotation_deg;
        if !(0.0..360.0).contains(&ra) {
            return Err(Error::InvalidRegionGeometry(format!(
                "center RA {} outside [0, 360)",
                ra
            )));
        }
        if !(-90.0..=90.0).contains(&dec) {
            return Err(Error::InvalidRegionGeometry(format!(
                "center Dec {} outside [-90, 90]",
                dec
            )));
        }
        if !(0.0..180.0).contains(&rot) {
            return Err(Error::InvalidRegionGeometry(format!(
                "rotation {} outside [0, 180)",
                rot
            )));
        }
        for (label, axis) in [("major", self.major_axis_deg), ("minor", self.minor_axis_deg)] {
            if !(MIN_AXIS_DEG..=90.0).contains(&axis) {
                return Err(Error::InvalidRegionGeometry(format!(
                    "{} axis {} outside [{:e}, 90]",
                    label, axis, MIN_AXIS_DEG
                )));
            }
        }
        Ok(())
    }

    /// Whether the minor axis differs noticeably from the major one.
    pub fn is_elongated(&self) -> bool {
        (self.major_axis_deg / self.minor_axis_deg - 1.0).abs() > 1.0e-6
    }

    pub fn geometry(&self) -> RegionGeometry {
        RegionGeometry::new(self)
    }
}

/// Precomputed center unit vector and radius cosine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionGeometry {
    center: [f64; 3],
    cos_radius: f64,
}

impl RegionGeometry {
    pub fn new(ellipse: &Ellipse) -> Self {
        Self {
            center: unit_vector(ellipse.center_ra_deg, ellipse.center_dec_deg),
            cos_radius: ellipse.major_axis_deg.to_radians().cos(),
        }
    }

    /// Inside iff the angular distance to the center is at most the radius.
    /// NaN coordinates never land inside.
    pub fn contains(&self, ra_deg: f64, dec_deg: f64) -> bool {
        let p = unit_vector(ra_deg, dec_deg);
        let dot = p[0] * self.center[0] + p[1] * self.center[1] + p[2] * self.center[2];
        dot >= self.cos_radius
    }
}

/// Unit vector for (RA, Dec) in degrees: x = cos dec cos ra, y = cos dec sin ra, z = sin dec.
pub fn unit_vector(ra_deg: f64, dec_deg: f64) -> [f64; 3] {
    let (phi, theta) = (ra_deg.to_radians(), dec_deg.to_radians());
    [theta.cos() * phi.cos(), theta.cos() * phi.sin(), theta.sin()]
}

/// Region verdict for one row, honoring the RA/Dec quantities' NaN policy.
pub fn evaluate_region(
    ra_deg: f64,
    dec_deg: f64,
    geometry: &RegionGeometry,
    reject_ra_nan: bool,
    reject_dec_nan: bool,
) -> bool {
    if (ra_deg.is_nan() && reject_ra_nan) || (dec_deg.is_nan() && reject_dec_nan) {
        return false;
    }
    geometry.contains(ra_deg, dec_deg)
}
