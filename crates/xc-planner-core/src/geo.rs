// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Great-circle helpers on a spherical Earth.
//!
//! All distances are nautical miles and all angles are degrees. Bearings are
//! measured clockwise from true north and normalised to `[0, 360)`.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True if latitude is within [-90, 90] and longitude within [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Arithmetic mean of two positions.
    ///
    /// Not a geodesic midpoint: the region builder relies on this exact
    /// approximation, so do not replace it with the spherical formula.
    pub fn naive_midpoint(&self, other: &Position) -> Position {
        Position {
            lat: (self.lat + other.lat) / 2.0,
            lon: (self.lon + other.lon) / 2.0,
        }
    }
}

/// Haversine distance between two positions.
pub fn distance_nm(a: &Position, b: &Position) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1.0 for near-antipodal points.
    let h = h.clamp(0.0, 1.0);
    EARTH_RADIUS_NM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial great-circle bearing from `a` to `b`.
///
/// `bearing_deg(a, a)` returns 0.0.
pub fn bearing_deg(a: &Position, b: &Position) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let x = d_lon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    normalize_bearing(x.atan2(y).to_degrees())
}

/// Forward projection: the point reached by travelling `distance_nm` from
/// `origin` along the great circle starting at `bearing_deg`.
pub fn destination_point(origin: &Position, bearing_deg: f64, distance_nm: f64) -> Position {
    let delta = distance_nm / EARTH_RADIUS_NM;
    let theta = bearing_deg.to_radians();
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();

    let sin_lat2 = lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * sin_lat2);

    Position {
        lat: lat2.to_degrees(),
        lon: normalize_longitude(lon2.to_degrees()),
    }
}

/// Wraps a bearing into `[0, 360)`.
pub fn normalize_bearing(deg: f64) -> f64 {
    let b = deg.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if b >= 360.0 {
        0.0
    } else {
        b
    }
}

/// Wraps a longitude into `[-180, 180]`.
pub fn normalize_longitude(deg: f64) -> f64 {
    if (-180.0..=180.0).contains(&deg) {
        return deg;
    }
    (deg + 540.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const KBOS: Position = Position {
        lat: 42.3656,
        lon: -71.0096,
    };
    const KJFK: Position = Position {
        lat: 40.6413,
        lon: -73.7781,
    };
    const EGLL: Position = Position {
        lat: 51.4700,
        lon: -0.4543,
    };

    #[test]
    fn test_distance_known_pair() {
        // KBOS-KJFK is roughly 162 NM great circle
        let d = distance_nm(&KBOS, &KJFK);
        assert!((d - 162.0).abs() < 2.0, "got {}", d);
    }

    #[test]
    fn test_distance_symmetric_and_zero() {
        assert_eq!(distance_nm(&KBOS, &EGLL), distance_nm(&EGLL, &KBOS));
        assert_eq!(distance_nm(&KJFK, &KJFK), 0.0);
    }

    #[test]
    fn test_triangle_inequality() {
        let ab = distance_nm(&KBOS, &EGLL);
        let ac = distance_nm(&KBOS, &KJFK);
        let cb = distance_nm(&KJFK, &EGLL);
        assert!(ab <= ac + cb + 1e-9);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = Position::new(0.0, 0.0);
        assert!((bearing_deg(&origin, &Position::new(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((bearing_deg(&origin, &Position::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((bearing_deg(&origin, &Position::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((bearing_deg(&origin, &Position::new(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_to_self_is_zero() {
        assert_eq!(bearing_deg(&KBOS, &KBOS), 0.0);
    }

    #[test]
    fn test_destination_point_round_trip() {
        for target in [KJFK, EGLL] {
            let b = bearing_deg(&KBOS, &target);
            let d = distance_nm(&KBOS, &target);
            let p = destination_point(&KBOS, b, d);
            assert!((p.lat - target.lat).abs() < 1e-6, "lat {} vs {}", p.lat, target.lat);
            assert!((p.lon - target.lon).abs() < 1e-6, "lon {} vs {}", p.lon, target.lon);
        }
    }

    #[test]
    fn test_destination_point_wraps_dateline() {
        let p = destination_point(&Position::new(0.0, 179.5), 90.0, 60.0);
        assert!(p.lon < -179.0 && p.lon >= -180.0, "lon {}", p.lon);
    }

    #[test]
    fn test_normalize_helpers() {
        assert_eq!(normalize_bearing(-90.0), 270.0);
        assert_eq!(normalize_bearing(360.0), 0.0);
        assert!((normalize_longitude(190.0) - (-170.0)).abs() < 1e-9);
        assert!((normalize_longitude(-190.0) - 170.0).abs() < 1e-9);
        assert_eq!(normalize_longitude(180.0), 180.0);
    }

    #[test]
    fn test_naive_midpoint() {
        let m = Position::new(40.0, -75.0).naive_midpoint(&Position::new(42.0, -71.0));
        assert_eq!(m, Position::new(41.0, -73.0));
    }
}
