// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Airport directory loaded from the code-keyed JSON document produced by
//! the NASR exporter.
//!
//! Every record is validated up front; one bad record fails the whole load.
//! After loading the directory is read-only. Airports are kept sorted by
//! code so every pass over them happens in the same order.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

use crate::category::{AirspaceClass, SurfaceCategory};
use crate::geo::Position;
use crate::ValidationError;

/// Label used when a record carries no country or state.
pub const UNKNOWN_REGION: &str = "Unknown";

#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed airport document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Airport document must be an object mapping airport code to record")]
    NotAMapping,
    #[error("Airport record with an empty code")]
    EmptyCode,
    #[error("Duplicate airport code '{0}'")]
    DuplicateCode(String),
    #[error("Invalid airport record '{code}': {reason}")]
    InvalidRecord { code: String, reason: String },
    #[error("Airport '{code}' has coordinates out of range ({lat}, {lon})")]
    CoordinateOutOfRange { code: String, lat: f64, lon: f64 },
}

// --- Wire records -------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayRecord {
    #[serde(default, deserialize_with = "de_text")]
    pub rwy_id: String,
    #[serde(default, deserialize_with = "de_feet")]
    pub length: Option<u32>,
    #[serde(default, deserialize_with = "de_feet")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "de_text")]
    pub surface: String,
    #[serde(default, deserialize_with = "de_text")]
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproachRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// One value of the airport document, keyed by airport code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_no: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, deserialize_with = "de_text")]
    pub city: String,
    #[serde(default, deserialize_with = "de_text")]
    pub state: String,
    #[serde(default, deserialize_with = "de_text", skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(default, alias = "name", deserialize_with = "de_text")]
    pub airport_name: String,
    pub runways: Vec<RunwayRecord>,
    #[serde(default)]
    pub airspace: AirspaceClass,
    #[serde(default, deserialize_with = "de_text", skip_serializing_if = "String::is_empty")]
    pub remarks: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub approaches: Vec<ApproachRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

/// Accepts a number, a numeric string or null.
fn de_feet<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value: Option<Numeric> = Option::deserialize(deserializer)?;
    Ok(value.and_then(|n| match n {
        Numeric::Number(f) if f.is_finite() && f >= 0.0 => Some(f as u32),
        Numeric::Number(_) => None,
        Numeric::Text(s) => parse_leading_int(&s),
    }))
}

/// Accepts a string or null (null becomes empty).
fn de_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.map(|s| s.trim().to_string()).unwrap_or_default())
}

/// Leading decimal digits of `s`, so "3500" and "3500.0" both give 3500.
pub(crate) fn parse_leading_int(s: &str) -> Option<u32> {
    let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

// --- Domain types -------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Runway {
    pub id: String,
    /// Missing or unparsable lengths count as 0 ft.
    pub length_ft: u32,
    pub width_ft: Option<u32>,
    pub surface: SurfaceCategory,
    pub raw_surface: String,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Approach {
    pub name: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Airport {
    pub code: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub airspace: AirspaceClass,
    pub runways: Vec<Runway>,
    pub approaches: Vec<Approach>,
    pub remarks: String,
}

impl Airport {
    pub fn position(&self) -> Position {
        Position::new(self.lat, self.lon)
    }

    /// First of the longest runways, if any.
    pub fn longest_runway(&self) -> Option<&Runway> {
        self.runways
            .iter()
            .reduce(|best, r| if r.length_ft > best.length_ft { r } else { best })
    }

    /// Longest runway in feet, 0 when the airport has none.
    pub fn max_runway_length(&self) -> u32 {
        self.longest_runway().map_or(0, |r| r.length_ft)
    }

    fn from_record(code: &str, record: AirportRecord) -> Result<Self, DataError> {
        let position = Position::new(record.lat, record.lon);
        if !position.is_valid() {
            return Err(DataError::CoordinateOutOfRange {
                code: code.to_string(),
                lat: record.lat,
                lon: record.lon,
            });
        }

        let runways = record
            .runways
            .into_iter()
            .map(|r| Runway {
                id: r.rwy_id,
                length_ft: r.length.unwrap_or(0),
                width_ft: r.width,
                surface: SurfaceCategory::parse(&r.surface),
                raw_surface: r.surface,
                condition: r.condition,
            })
            .collect();

        let approaches = record
            .approaches
            .into_iter()
            .map(|a| Approach {
                name: a.name,
                link: a.link,
            })
            .collect();

        Ok(Airport {
            code: code.to_string(),
            name: record.airport_name,
            city: record.city,
            state: or_unknown(record.state),
            country: or_unknown(record.country),
            lat: record.lat,
            lon: record.lon,
            airspace: record.airspace,
            runways,
            approaches,
            remarks: record.remarks,
        })
    }
}

fn or_unknown(s: String) -> String {
    if s.is_empty() {
        UNKNOWN_REGION.to_string()
    } else {
        s
    }
}

/// Code and name, as listed in the state picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AirportRef {
    pub code: String,
    pub name: String,
}

// --- Directory ----------------------------------------------------------

#[derive(Debug, Default)]
pub struct Directory {
    /// Sorted by code.
    airports: Vec<Airport>,
    by_code: HashMap<String, usize>,
    states_by_country: BTreeMap<String, BTreeSet<String>>,
    airports_by_state: HashMap<(String, String), Vec<AirportRef>>,
}

impl Directory {
    /// Load from a file holding the airport JSON document.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let value: serde_json::Value = serde_json::from_reader(reader)?;
        Self::from_json_value(value)
    }

    pub fn from_json_str(s: &str) -> Result<Self, DataError> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, DataError> {
        let serde_json::Value::Object(map) = value else {
            return Err(DataError::NotAMapping);
        };

        let mut records = BTreeMap::new();
        for (code, raw) in map {
            let record: AirportRecord =
                serde_json::from_value(raw).map_err(|e| DataError::InvalidRecord {
                    code: code.clone(),
                    reason: e.to_string(),
                })?;
            records.insert(code, record);
        }

        Self::from_records(records)
    }

    /// Validate typed records and build the derived indices.
    pub fn from_records(records: BTreeMap<String, AirportRecord>) -> Result<Self, DataError> {
        let mut airports = Vec::with_capacity(records.len());
        for (code, record) in records {
            let code = code.trim().to_uppercase();
            if code.is_empty() {
                return Err(DataError::EmptyCode);
            }
            airports.push(Airport::from_record(&code, record)?);
        }
        // Normalising may have reordered keys.
        airports.sort_by(|a, b| a.code.cmp(&b.code));

        let mut by_code = HashMap::with_capacity(airports.len());
        let mut states_by_country: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut airports_by_state: HashMap<(String, String), Vec<AirportRef>> = HashMap::new();

        for (i, airport) in airports.iter().enumerate() {
            if by_code.insert(airport.code.clone(), i).is_some() {
                return Err(DataError::DuplicateCode(airport.code.clone()));
            }
            states_by_country
                .entry(airport.country.clone())
                .or_default()
                .insert(airport.state.clone());
            // Pushed in code order, so each list is already sorted.
            airports_by_state
                .entry((airport.country.clone(), airport.state.clone()))
                .or_default()
                .push(AirportRef {
                    code: airport.code.clone(),
                    name: airport.name.clone(),
                });
        }

        log::info!("Loaded airport directory — airports={}", airports.len());

        Ok(Self {
            airports,
            by_code,
            states_by_country,
            airports_by_state,
        })
    }

    /// Look up an airport by code, ignoring case and surrounding spaces.
    pub fn get(&self, code: &str) -> Option<&Airport> {
        self.by_code
            .get(&code.trim().to_uppercase())
            .map(|&i| &self.airports[i])
    }

    /// Like [`Directory::get`] but unknown codes are a validation error.
    pub fn require(&self, code: &str) -> Result<&Airport, ValidationError> {
        self.get(code)
            .ok_or_else(|| ValidationError::UnknownAirport(code.to_string()))
    }

    /// All airports in code order.
    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    /// Sorted country names.
    pub fn countries(&self) -> Vec<&str> {
        self.states_by_country.keys().map(String::as_str).collect()
    }

    /// Sorted state names for a country (empty if the country is unknown).
    pub fn states_of(&self, country: &str) -> Vec<&str> {
        self.states_by_country
            .get(country)
            .map(|states| states.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Airports of a state, sorted by code.
    pub fn airports_of(&self, country: &str, state: &str) -> &[AirportRef] {
        self.airports_by_state
            .get(&(country.to_string(), state.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "KBOS": {
            "lat": 42.3656, "lon": -71.0096,
            "city": "BOSTON", "state": "MA", "country": "US",
            "airport_name": "GENERAL EDWARD LAWRENCE LOGAN INTL",
            "airspace": "B",
            "runways": [
                {"rwy_id": "04R/22L", "length": "10005", "width": "150", "surface": "ASPH-G", "condition": "GOOD"},
                {"rwy_id": "15L/33R", "length": 2557, "width": 100, "surface": "ASPH", "condition": "FAIR"}
            ],
            "approaches": [{"name": "ILS OR LOC RWY 04R", "link": "https://example.invalid/04r.pdf"}]
        },
        "1B9": {
            "lat": 42.0978, "lon": -71.1842,
            "city": "MANSFIELD", "state": "MA",
            "airport_name": "MANSFIELD MUNI",
            "runways": [{"rwy_id": "14/32", "length": null, "surface": "turf", "condition": null}]
        },
        "KPVD": {
            "lat": 41.7240, "lon": -71.4283,
            "city": "PROVIDENCE", "state": "RI", "country": "US",
            "airport_name": "RHODE ISLAND TF GREEN INTL",
            "airspace": "C",
            "runways": []
        }
    }"#;

    #[test]
    fn test_load_sample() {
        let dir = Directory::from_json_str(SAMPLE).unwrap();
        assert_eq!(dir.len(), 3);

        let codes: Vec<&str> = dir.airports().iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["1B9", "KBOS", "KPVD"]);

        let kbos = dir.get("KBOS").unwrap();
        assert_eq!(kbos.airspace, AirspaceClass::B);
        assert_eq!(kbos.runways[0].length_ft, 10005);
        assert_eq!(kbos.runways[0].width_ft, Some(150));
        assert_eq!(kbos.runways[0].surface, SurfaceCategory::Asphalt);
        assert_eq!(kbos.runways[0].raw_surface, "ASPH-G");
        assert_eq!(kbos.max_runway_length(), 10005);
        assert_eq!(kbos.longest_runway().unwrap().id, "04R/22L");
        assert_eq!(kbos.longest_runway().unwrap().surface.display_name(), "Asphalt");
        assert_eq!(kbos.approaches.len(), 1);
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let dir = Directory::from_json_str(SAMPLE).unwrap();
        let mansfield = dir.get("1B9").unwrap();
        assert_eq!(mansfield.country, UNKNOWN_REGION);
        assert_eq!(mansfield.airspace, AirspaceClass::G);
        assert_eq!(mansfield.runways[0].length_ft, 0);
        assert_eq!(mansfield.runways[0].surface, SurfaceCategory::Turf);
        assert!(mansfield.approaches.is_empty());
        assert_eq!(dir.get("KPVD").unwrap().max_runway_length(), 0);
        assert!(dir.get("KPVD").unwrap().longest_runway().is_none());
        assert_eq!(
            mansfield.longest_runway().unwrap().surface.display_name(),
            "Grass"
        );
    }

    #[test]
    fn test_null_airspace_defaults_to_g() {
        let doc = r#"{"KAAA": {"lat": 1.0, "lon": 1.0, "airspace": null, "runways": []}}"#;
        let dir = Directory::from_json_str(doc).unwrap();
        assert_eq!(dir.get("KAAA").unwrap().airspace, AirspaceClass::G);
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let dir = Directory::from_json_str(SAMPLE).unwrap();
        assert!(dir.get("kbos").is_some());
        assert!(dir.get(" KPVD ").is_some());
        assert!(matches!(
            dir.require("KXYZ"),
            Err(ValidationError::UnknownAirport(_))
        ));
    }

    #[test]
    fn test_derived_views() {
        let dir = Directory::from_json_str(SAMPLE).unwrap();
        assert_eq!(dir.countries(), vec!["US", UNKNOWN_REGION]);
        assert_eq!(dir.states_of("US"), vec!["MA", "RI"]);
        assert!(dir.states_of("FR").is_empty());

        let ma = dir.airports_of("US", "MA");
        assert_eq!(ma.len(), 1);
        assert_eq!(ma[0].code, "KBOS");
        assert!(dir.airports_of("US", "NH").is_empty());
    }

    #[test]
    fn test_lowercase_keys_are_upper_cased() {
        let doc = r#"{"kaaa": {"lat": 1.0, "lon": 1.0, "runways": []}}"#;
        let dir = Directory::from_json_str(doc).unwrap();
        assert_eq!(dir.get("KAAA").unwrap().code, "KAAA");
        assert!(dir.get("kaaa").is_some());
    }

    #[test]
    fn test_keys_differing_only_in_case_rejected() {
        let doc = r#"{
            "KAAA": {"lat": 1.0, "lon": 1.0, "runways": []},
            "kaaa": {"lat": 2.0, "lon": 2.0, "runways": []}
        }"#;
        assert!(matches!(
            Directory::from_json_str(doc),
            Err(DataError::DuplicateCode(code)) if code == "KAAA"
        ));
    }

    #[test]
    fn test_not_a_mapping() {
        let err = Directory::from_json_str("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, DataError::NotAMapping));
    }

    #[test]
    fn test_missing_runways_fails_whole_load() {
        let doc = r#"{
            "KAAA": {"lat": 1.0, "lon": 1.0, "runways": []},
            "KBBB": {"lat": 1.0, "lon": 1.0}
        }"#;
        match Directory::from_json_str(doc) {
            Err(DataError::InvalidRecord { code, reason }) => {
                assert_eq!(code, "KBBB");
                assert!(reason.contains("runways"), "reason: {}", reason);
            }
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_position_fails() {
        let doc = r#"{"KAAA": {"lon": 1.0, "runways": []}}"#;
        assert!(matches!(
            Directory::from_json_str(doc),
            Err(DataError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let doc = r#"{"KAAA": {"lat": 91.0, "lon": 1.0, "runways": []}}"#;
        assert!(matches!(
            Directory::from_json_str(doc),
            Err(DataError::CoordinateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_empty_code_rejected() {
        let doc = r#"{" ": {"lat": 1.0, "lon": 1.0, "runways": []}}"#;
        assert!(matches!(Directory::from_json_str(doc), Err(DataError::EmptyCode)));
    }

    #[test]
    fn test_duplicate_after_trim_rejected() {
        let doc = r#"{
            "KAAA": {"lat": 1.0, "lon": 1.0, "runways": []},
            "KAAA ": {"lat": 2.0, "lon": 2.0, "runways": []}
        }"#;
        assert!(matches!(
            Directory::from_json_str(doc),
            Err(DataError::DuplicateCode(code)) if code == "KAAA"
        ));
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(
            Directory::from_json_str("{not json"),
            Err(DataError::Json(_))
        ));
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("3500"), Some(3500));
        assert_eq!(parse_leading_int(" 3500.0 "), Some(3500));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
    }
}
