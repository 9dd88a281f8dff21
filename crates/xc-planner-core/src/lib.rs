// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod category;
pub mod directory;
pub mod filter;
pub mod geo;
pub mod nasr;
pub mod ranking;
pub mod region;
pub mod search;
pub mod settings;
pub mod summary;

use std::path::PathBuf;
use thiserror::Error;

pub use category::{AirspaceClass, ApproachCategory, SurfaceCategory, SurfaceSelector};
pub use directory::{Airport, DataError, Directory};
pub use filter::{ConstraintSet, DistanceBand};
pub use geo::Position;
pub use ranking::{sort_candidates, Selection, SortKey};
pub use search::{find_first_leg, find_second_leg, Candidate, LegDistances, TripType};

/// A search or geometry call was made with arguments the engine refuses.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unknown airport code '{0}'")]
    UnknownAirport(String),
    #[error("{band} band is inverted: min {min} > max {max}")]
    InvertedBand { band: String, min: f64, max: f64 },
    #[error("{band} band has a non-numeric bound")]
    NonFiniteBand { band: String },
    #[error("{band} band has a negative bound")]
    NegativeBand { band: String },
    #[error("Triangle trip requires a total distance band")]
    MissingTotalBand,
    #[error("Second leg search requires a chosen first leg airport")]
    MissingFirstLeg,
    #[error("First leg airport '{0}' is the home airport")]
    FirstLegIsHome(String),
    #[error("Airport '{0}' appears twice in the trip")]
    RepeatedStop(String),
    #[error("Unknown sort key '{0}' (expected leg_distance, alphabetical or total_distance)")]
    UnknownSortKey(String),
    #[error("Unknown approach category '{0}' (expected RNAV, ILS/LOC, VOR/NDB or None)")]
    UnknownApproachCategory(String),
    #[error("Unknown surface '{0}'")]
    UnknownSurface(String),
}

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "XC_PLANNER_CONFIG_DIR";

/// Per-user configuration directory.
pub fn get_config_root() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    directories::ProjectDirs::from("org", "xc-planner", "XC-Planner")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".xc-planner"))
}
