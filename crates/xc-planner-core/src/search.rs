// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! First- and second-leg candidate search.
//!
//! Both searches are pure functions of their arguments and walk the whole
//! directory on every call. Candidates come back in directory (code) order;
//! reordering is left to [`crate::ranking`].

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::category::AirspaceClass;
use crate::directory::{Airport, Directory};
use crate::filter::{is_eligible, ConstraintSet, DistanceBand};
use crate::geo::distance_nm;
use crate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    /// Out and back to a single destination.
    #[default]
    Single,
    /// home -> first -> second -> home.
    Triangle,
}

impl FromStr for TripType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" | "round" | "one" => Ok(TripType::Single),
            "triangle" | "two" => Ok(TripType::Triangle),
            other => Err(format!("unknown trip type '{}'", other)),
        }
    }
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripType::Single => f.write_str("single"),
            TripType::Triangle => f.write_str("triangle"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LegDistances {
    /// First-leg result: one-way distance from home.
    Outbound { leg_nm: f64 },
    /// Second-leg result: first -> candidate, candidate -> home, and the
    /// whole triangle.
    Closing {
        leg2_nm: f64,
        leg3_nm: f64,
        total_nm: f64,
    },
}

impl LegDistances {
    /// The distance flown to reach this candidate.
    pub fn leg_nm(&self) -> f64 {
        match *self {
            LegDistances::Outbound { leg_nm } => leg_nm,
            LegDistances::Closing { leg2_nm, .. } => leg2_nm,
        }
    }

    /// Whole trip: out and back for a first leg, the triangle for a second.
    pub fn total_nm(&self) -> f64 {
        match *self {
            LegDistances::Outbound { leg_nm } => leg_nm * 2.0,
            LegDistances::Closing { total_nm, .. } => total_nm,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub code: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub airspace: AirspaceClass,
    pub lat: f64,
    pub lon: f64,
    pub max_runway_ft: u32,
    pub distances: LegDistances,
}

impl Candidate {
    fn new(airport: &Airport, distances: LegDistances) -> Self {
        Self {
            code: airport.code.clone(),
            name: airport.name.clone(),
            city: airport.city.clone(),
            state: airport.state.clone(),
            airspace: airport.airspace.clone(),
            lat: airport.lat,
            lon: airport.lon,
            max_runway_ft: airport.max_runway_length(),
            distances,
        }
    }
}

/// Eligible airports whose distance from `home_code` lies in the first-leg
/// band. For triangle trips an airport is also dropped when flying there
/// and straight back would already exceed the total maximum.
pub fn find_first_leg(
    directory: &Directory,
    home_code: &str,
    constraints: &ConstraintSet,
    trip: TripType,
) -> Result<Vec<Candidate>, ValidationError> {
    let home = directory.require(home_code)?;
    constraints.first_leg.validate("first leg")?;

    let total_max = match trip {
        TripType::Single => None,
        TripType::Triangle => {
            let total = constraints.total.ok_or(ValidationError::MissingTotalBand)?;
            total.validate("total")?;
            Some(total.max_nm)
        }
    };

    let home_pos = home.position();
    let band = constraints.first_leg;

    let results: Vec<Candidate> = directory
        .airports()
        .par_iter()
        .filter_map(|airport| {
            if airport.code == home.code || !is_eligible(airport, constraints) {
                return None;
            }
            let d = distance_nm(&home_pos, &airport.position());
            if !band.contains(d) {
                return None;
            }
            if let Some(max) = total_max {
                if d * 2.0 > max {
                    return None;
                }
            }
            Some(Candidate::new(airport, LegDistances::Outbound { leg_nm: d }))
        })
        .collect();

    log::debug!(
        "First leg search — home={} trip={} band={}-{} candidates={}",
        home.code,
        trip,
        band.min_nm,
        band.max_nm,
        results.len()
    );

    Ok(results)
}

/// Eligible airports that close the triangle home -> first -> candidate ->
/// home with a total inside `total_band`.
pub fn find_second_leg(
    directory: &Directory,
    home_code: &str,
    first_code: Option<&str>,
    constraints: &ConstraintSet,
    total_band: &DistanceBand,
) -> Result<Vec<Candidate>, ValidationError> {
    let first_code = first_code.ok_or(ValidationError::MissingFirstLeg)?;
    let home = directory.require(home_code)?;
    let first = directory.require(first_code)?;
    if first.code == home.code {
        return Err(ValidationError::FirstLegIsHome(first.code.clone()));
    }
    total_band.validate("total")?;

    let home_pos = home.position();
    let first_pos = first.position();
    let leg1 = distance_nm(&home_pos, &first_pos);

    let results: Vec<Candidate> = directory
        .airports()
        .par_iter()
        .filter_map(|airport| {
            if airport.code == home.code || airport.code == first.code {
                return None;
            }
            if !is_eligible(airport, constraints) {
                return None;
            }
            let pos = airport.position();
            let leg2 = distance_nm(&first_pos, &pos);
            let leg3 = distance_nm(&pos, &home_pos);
            let total = leg1 + leg2 + leg3;
            if !total_band.contains(total) {
                return None;
            }
            Some(Candidate::new(
                airport,
                LegDistances::Closing {
                    leg2_nm: leg2,
                    leg3_nm: leg3,
                    total_nm: total,
                },
            ))
        })
        .collect();

    log::debug!(
        "Second leg search — home={} first={} leg1={:.1} band={}-{} candidates={}",
        home.code,
        first.code,
        leg1,
        total_band.min_nm,
        total_band.max_nm,
        results.len()
    );

    Ok(results)
}
