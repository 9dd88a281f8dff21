// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::search::Candidate;
use crate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    LegDistance,
    Alphabetical,
    TotalDistance,
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "leg_distance" | "leg" | "distance" => Ok(SortKey::LegDistance),
            "alphabetical" | "code" => Ok(SortKey::Alphabetical),
            "total_distance" | "total" => Ok(SortKey::TotalDistance),
            _ => Err(ValidationError::UnknownSortKey(s.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::LegDistance => "leg_distance",
            SortKey::Alphabetical => "alphabetical",
            SortKey::TotalDistance => "total_distance",
        };
        f.write_str(s)
    }
}

/// Stable sort; equal keys keep their incoming (directory) order.
pub fn sort_candidates(mut list: Vec<Candidate>, key: SortKey) -> Vec<Candidate> {
    match key {
        SortKey::LegDistance => list.sort_by(|a, b| {
            a.distances
                .leg_nm()
                .total_cmp(&b.distances.leg_nm())
        }),
        SortKey::Alphabetical => list.sort_by(|a, b| a.code.cmp(&b.code)),
        SortKey::TotalDistance => list.sort_by(|a, b| {
            a.distances
                .total_nm()
                .total_cmp(&b.distances.total_nm())
        }),
    }
    list
}

/// The caller's chosen candidate, remembered by airport code so it
/// survives re-sorting and re-running a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    code: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, code: &str) {
        self.code = Some(code.to_string());
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Index of the selected candidate in `list`, if present.
    pub fn index_in(&self, list: &[Candidate]) -> Option<usize> {
        let code = self.code.as_deref()?;
        list.iter().position(|c| c.code == code)
    }

    pub fn resolve<'a>(&self, list: &'a [Candidate]) -> Option<&'a Candidate> {
        self.index_in(list).map(|i| &list[i])
    }

    /// Drop the selection if a fresh result list no longer contains it.
    /// Returns whether a selection is still held.
    pub fn reconcile(&mut self, list: &[Candidate]) -> bool {
        if self.code.is_some() && self.index_in(list).is_none() {
            self.code = None;
        }
        self.code.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::AirspaceClass;
    use crate::search::LegDistances;

    fn cand(code: &str, leg: f64, total: f64) -> Candidate {
        Candidate {
            code: code.to_string(),
            name: format!("{} FIELD", code),
            city: String::new(),
            state: "PA".to_string(),
            airspace: AirspaceClass::G,
            lat: 40.0,
            lon: -75.0,
            max_runway_ft: 3000,
            distances: LegDistances::Closing {
                leg2_nm: leg,
                leg3_nm: total - leg - 100.0,
                total_nm: total,
            },
        }
    }

    fn codes(list: &[Candidate]) -> Vec<&str> {
        list.iter().map(|c| c.code.as_str()).collect()
    }

    #[test]
    fn test_sort_keys() {
        let list = vec![
            cand("KCCC", 50.0, 240.0),
            cand("KAAA", 70.0, 230.0),
            cand("KBBB", 60.0, 250.0),
        ];
        assert_eq!(
            codes(&sort_candidates(list.clone(), SortKey::LegDistance)),
            vec!["KCCC", "KBBB", "KAAA"]
        );
        assert_eq!(
            codes(&sort_candidates(list.clone(), SortKey::Alphabetical)),
            vec!["KAAA", "KBBB", "KCCC"]
        );
        assert_eq!(
            codes(&sort_candidates(list, SortKey::TotalDistance)),
            vec!["KAAA", "KCCC", "KBBB"]
        );
    }

    #[test]
    fn test_sort_is_stable() {
        let list = vec![
            cand("KZZZ", 50.0, 240.0),
            cand("KAAA", 50.0, 240.0),
            cand("KMMM", 50.0, 240.0),
        ];
        let sorted = sort_candidates(list, SortKey::LegDistance);
        assert_eq!(codes(&sorted), vec!["KZZZ", "KAAA", "KMMM"]);
    }

    #[test]
    fn test_outbound_total_is_round_trip() {
        let mut c = cand("KAAA", 0.0, 0.0);
        c.distances = LegDistances::Outbound { leg_nm: 42.0 };
        assert_eq!(c.distances.total_nm(), 84.0);
    }

    #[test]
    fn test_selection_survives_resort() {
        let list = vec![
            cand("KCCC", 50.0, 240.0),
            cand("KAAA", 70.0, 230.0),
            cand("KBBB", 60.0, 250.0),
        ];
        let mut sel = Selection::new();
        sel.select("KBBB");
        assert_eq!(sel.index_in(&list), Some(2));

        let resorted = sort_candidates(list, SortKey::Alphabetical);
        assert_eq!(sel.index_in(&resorted), Some(1));
        assert_eq!(sel.resolve(&resorted).unwrap().code, "KBBB");
        assert!(sel.reconcile(&resorted));
    }

    #[test]
    fn test_selection_cleared_when_missing() {
        let mut sel = Selection::new();
        sel.select("KXXX");
        assert!(!sel.reconcile(&[cand("KAAA", 1.0, 200.0)]));
        assert_eq!(sel.code(), None);
    }

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!("leg_distance".parse::<SortKey>().unwrap(), SortKey::LegDistance);
        assert_eq!("total-distance".parse::<SortKey>().unwrap(), SortKey::TotalDistance);
        assert_eq!("Alphabetical".parse::<SortKey>().unwrap(), SortKey::Alphabetical);
        assert!(matches!(
            "random".parse::<SortKey>(),
            Err(ValidationError::UnknownSortKey(_))
        ));
    }
}
