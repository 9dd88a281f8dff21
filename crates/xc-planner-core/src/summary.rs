// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Leg-by-leg breakdown of a planned trip.

use serde::Serialize;
use std::fmt;

use crate::directory::{Airport, Directory};
use crate::geo::distance_nm;
use crate::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegSummary {
    pub from: String,
    pub to: String,
    pub distance_nm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSummary {
    pub legs: Vec<LegSummary>,
    pub total_nm: f64,
}

impl TripSummary {
    /// home -> destination -> home.
    pub fn round_trip(
        directory: &Directory,
        home_code: &str,
        destination_code: &str,
    ) -> Result<Self, ValidationError> {
        let home = directory.require(home_code)?;
        let dest = directory.require(destination_code)?;
        if dest.code == home.code {
            return Err(ValidationError::FirstLegIsHome(dest.code.clone()));
        }
        Ok(Self::from_route(&[home, dest, home]))
    }

    /// home -> first -> second -> home.
    pub fn triangle(
        directory: &Directory,
        home_code: &str,
        first_code: &str,
        second_code: &str,
    ) -> Result<Self, ValidationError> {
        let home = directory.require(home_code)?;
        let first = directory.require(first_code)?;
        let second = directory.require(second_code)?;
        if first.code == home.code {
            return Err(ValidationError::FirstLegIsHome(first.code.clone()));
        }
        if second.code == home.code || second.code == first.code {
            return Err(ValidationError::RepeatedStop(second.code.clone()));
        }
        Ok(Self::from_route(&[home, first, second, home]))
    }

    fn from_route(stops: &[&Airport]) -> Self {
        let legs: Vec<LegSummary> = stops
            .windows(2)
            .map(|pair| LegSummary {
                from: pair[0].code.clone(),
                to: pair[1].code.clone(),
                distance_nm: distance_nm(&pair[0].position(), &pair[1].position()),
            })
            .collect();
        let total_nm = legs.iter().map(|l| l.distance_nm).sum();
        Self { legs, total_nm }
    }
}

impl fmt::Display for TripSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, leg) in self.legs.iter().enumerate() {
            writeln!(
                f,
                "Leg {}: {} -> {}  {:.1} NM",
                i + 1,
                leg.from,
                leg.to,
                leg.distance_nm
            )?;
        }
        write!(f, "Total: {:.1} NM", self.total_nm)
    }
}
