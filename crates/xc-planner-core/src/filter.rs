// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Airport eligibility: runway, airspace and instrument approach criteria.
//!
//! The three predicates are AND-combined. Each one is internally an OR over
//! the user's selections. Distance is not part of eligibility.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::category::{AirspaceClass, ApproachCategory, SurfaceCategory, SurfaceSelector};
use crate::directory::Airport;
use crate::ValidationError;

/// Lower bound for any triangle trip total, in NM.
pub const MIN_TOTAL_TRIP_NM: f64 = 100.0;

/// Inclusive `[min_nm, max_nm]` distance range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceBand {
    pub min_nm: f64,
    pub max_nm: f64,
}

impl DistanceBand {
    pub fn new(min_nm: f64, max_nm: f64) -> Self {
        Self { min_nm, max_nm }
    }

    pub fn contains(&self, distance_nm: f64) -> bool {
        distance_nm >= self.min_nm && distance_nm <= self.max_nm
    }

    /// Rejects NaN/infinite bounds, negative bounds and inverted bands.
    /// `band` names the band in the error message.
    pub fn validate(&self, band: &str) -> Result<(), ValidationError> {
        if !self.min_nm.is_finite() || !self.max_nm.is_finite() {
            return Err(ValidationError::NonFiniteBand {
                band: band.to_string(),
            });
        }
        if self.min_nm < 0.0 || self.max_nm < 0.0 {
            return Err(ValidationError::NegativeBand {
                band: band.to_string(),
            });
        }
        if self.min_nm > self.max_nm {
            return Err(ValidationError::InvertedBand {
                band: band.to_string(),
                min: self.min_nm,
                max: self.max_nm,
            });
        }
        Ok(())
    }

    /// Smallest allowed triangle total for a given first-leg minimum:
    /// `max(100, 2 * first_leg_min)`.
    pub fn required_total_min(first_leg_min_nm: f64) -> f64 {
        MIN_TOTAL_TRIP_NM.max(2.0 * first_leg_min_nm)
    }

    /// Raise both bounds of a total band to the required minimum for
    /// `first_leg`. Callers apply this before invoking a triangle search.
    pub fn clamp_total_for(&self, first_leg: &DistanceBand) -> DistanceBand {
        let floor = Self::required_total_min(first_leg.min_nm);
        DistanceBand {
            min_nm: self.min_nm.max(floor),
            max_nm: self.max_nm.max(floor),
        }
    }
}

/// User-supplied filter and distance settings for one search.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSet {
    pub surfaces: BTreeSet<SurfaceSelector>,
    pub airspaces: BTreeSet<AirspaceClass>,
    /// Empty disables the approach filter.
    pub approaches: BTreeSet<ApproachCategory>,
    pub min_runway_length_ft: u32,
    pub first_leg: DistanceBand,
    /// Required for triangle trips.
    pub total: Option<DistanceBand>,
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self {
            surfaces: [
                SurfaceSelector::Exact(SurfaceCategory::Asphalt),
                SurfaceSelector::Exact(SurfaceCategory::Concrete),
                SurfaceSelector::Exact(SurfaceCategory::Turf),
                SurfaceSelector::AnyOther,
            ]
            .into_iter()
            .collect(),
            airspaces: AirspaceClass::STANDARD.into_iter().collect(),
            approaches: BTreeSet::new(),
            min_runway_length_ft: 0,
            first_leg: DistanceBand::new(0.0, 100.0),
            total: None,
        }
    }
}

impl ConstraintSet {
    /// At least one runway long enough with a selected surface.
    /// An airport without runways never passes.
    pub fn runway_ok(&self, airport: &Airport) -> bool {
        airport.runways.iter().any(|rwy| {
            rwy.length_ft >= self.min_runway_length_ft
                && self.surfaces.iter().any(|sel| sel.matches(&rwy.surface))
        })
    }

    pub fn airspace_ok(&self, airport: &Airport) -> bool {
        self.airspaces.contains(&airport.airspace)
    }

    pub fn approach_ok(&self, airport: &Airport) -> bool {
        if self.approaches.is_empty() {
            return true;
        }
        if airport.approaches.is_empty() {
            return self.approaches.contains(&ApproachCategory::None);
        }
        airport.approaches.iter().any(|approach| {
            self.approaches
                .iter()
                .any(|category| category.matches_name(&approach.name))
        })
    }
}

/// True if `airport` passes every active predicate of `constraints`.
pub fn is_eligible(airport: &Airport, constraints: &ConstraintSet) -> bool {
    constraints.airspace_ok(airport)
        && constraints.runway_ok(airport)
        && constraints.approach_ok(airport)
}
