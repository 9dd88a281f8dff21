// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Boundary polygons for map overlays: the ellipses bounding feasible
//! second-leg airports, and the circles/annuli around a single airport.
//!
//! The ellipse is built in a local plane around the arithmetic midpoint of
//! the foci, with the focal half-distance taken from the great-circle
//! distance, then projected back onto the sphere point by point. This is an
//! approximation that is good while legs are small next to the Earth's
//! radius; it degrades on long-range trips and has not been checked there.
//!
//! An infeasible request returns an empty ring rather than an error.

use serde::Serialize;
use std::f64::consts::PI;

use crate::filter::DistanceBand;
use crate::geo::{bearing_deg, destination_point, distance_nm, normalize_bearing, Position};

/// Vertices per ring unless the caller asks otherwise.
pub const DEFAULT_BOUNDARY_POINTS: usize = 180;

/// Closed ring (`numPoints + 1` vertices, first == last) of the points whose
/// summed distance to `focus_a` and `focus_b` is `2 * semi_major_nm`.
///
/// Empty when `semi_major_nm` is negative, non-finite or shorter than half
/// the focal distance, or when `num_points` is 0.
pub fn ellipse_boundary(
    focus_a: &Position,
    focus_b: &Position,
    semi_major_nm: f64,
    num_points: usize,
) -> Vec<Position> {
    if num_points == 0 || !semi_major_nm.is_finite() || semi_major_nm < 0.0 {
        return Vec::new();
    }

    let c = distance_nm(focus_a, focus_b) / 2.0;
    if semi_major_nm < c {
        log::warn!(
            "Ellipse infeasible — semi_major={:.1} focal_half_distance={:.1}",
            semi_major_nm,
            c
        );
        return Vec::new();
    }
    let semi_minor_nm = (semi_major_nm.powi(2) - c.powi(2)).sqrt();

    let center = focus_a.naive_midpoint(focus_b);
    let orientation = bearing_deg(focus_a, focus_b).to_radians();
    // Unit vectors (east, north) along the major and minor axes.
    let major = (orientation.sin(), orientation.cos());
    let minor = (orientation.cos(), -orientation.sin());

    (0..=num_points)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / num_points as f64;
            let x = semi_major_nm * theta.cos();
            let y = semi_minor_nm * theta.sin();
            let east = x * major.0 + y * minor.0;
            let north = x * major.1 + y * minor.1;
            project_offset(&center, east, north)
        })
        .collect()
}

/// Closed ring of `num_points + 1` vertices at `radius_nm` from `center`.
/// Empty for a non-positive radius or `num_points == 0`.
pub fn circle_boundary(center: &Position, radius_nm: f64, num_points: usize) -> Vec<Position> {
    if num_points == 0 || !radius_nm.is_finite() || radius_nm <= 0.0 {
        return Vec::new();
    }
    (0..=num_points)
        .map(|i| {
            let bearing = 360.0 * i as f64 / num_points as f64;
            destination_point(center, bearing, radius_nm)
        })
        .collect()
}

fn project_offset(center: &Position, east_nm: f64, north_nm: f64) -> Position {
    let dist = east_nm.hypot(north_nm);
    if dist == 0.0 {
        return *center;
    }
    let bearing = normalize_bearing(east_nm.atan2(north_nm).to_degrees());
    destination_point(center, bearing, dist)
}

/// Inner and outer rings of a distance band around one point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annulus {
    pub center: Position,
    pub inner: Vec<Position>,
    pub outer: Vec<Position>,
}

/// Rings at the band's min and max distance around `center`, e.g. the
/// first-leg search area around home.
pub fn annulus(center: &Position, band: &DistanceBand, num_points: usize) -> Annulus {
    Annulus {
        center: *center,
        inner: circle_boundary(center, band.min_nm, num_points),
        outer: circle_boundary(center, band.max_nm, num_points),
    }
}

/// Overlays for a chosen first leg of a triangle trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondLegRegion {
    pub leg1_nm: f64,
    /// Ellipse for the total maximum; empty when infeasible.
    pub outer: Vec<Position>,
    /// Ellipse for the total minimum; empty when infeasible.
    pub inner: Vec<Position>,
    /// Distance still available after the first leg, drawn around the
    /// first-leg airport.
    pub remaining: Annulus,
}

/// Second-leg airports lie between the two ellipses with foci `home` and
/// `first`: legs 2 and 3 together must cover `total - leg1`.
pub fn second_leg_region(
    home: &Position,
    first: &Position,
    total_band: &DistanceBand,
    num_points: usize,
) -> SecondLegRegion {
    let leg1 = distance_nm(home, first);
    let outer = ellipse_boundary(home, first, (total_band.max_nm - leg1) / 2.0, num_points);
    let inner = ellipse_boundary(home, first, (total_band.min_nm - leg1) / 2.0, num_points);

    let remaining_band = DistanceBand::new(
        (total_band.min_nm - leg1).max(0.0),
        (total_band.max_nm - leg1).max(0.0),
    );

    log::debug!(
        "Second leg region — leg1={:.1} outer_points={} inner_points={}",
        leg1,
        outer.len(),
        inner.len()
    );

    SecondLegRegion {
        leg1_nm: leg1,
        outer,
        inner,
        remaining: annulus(first, &remaining_band, num_points),
    }
}
