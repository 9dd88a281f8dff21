// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Closed vocabularies used by the eligibility filter: runway surface,
//! airspace class and instrument approach type.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::ValidationError;

/// Surface category of a runway.
///
/// Parsed from the raw NASR surface code: upper-cased, then cut at the
/// first `-` ("ASPH-G" becomes ASPH, "turf-dirt" becomes TURF).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SurfaceCategory {
    Asphalt,
    Concrete,
    Turf,
    /// Any other code (GRVL, DIRT, WATER, ...), stored upper-cased.
    Other(String),
}

impl SurfaceCategory {
    pub fn parse(raw: &str) -> Self {
        let upper = raw.trim().to_uppercase();
        let head = upper.split('-').next().unwrap_or("");
        match head {
            "ASPH" => SurfaceCategory::Asphalt,
            "CONC" => SurfaceCategory::Concrete,
            "TURF" => SurfaceCategory::Turf,
            other => SurfaceCategory::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            SurfaceCategory::Asphalt => "ASPH",
            SurfaceCategory::Concrete => "CONC",
            SurfaceCategory::Turf => "TURF",
            SurfaceCategory::Other(code) => code,
        }
    }

    /// Asphalt, concrete and turf; everything else falls under "OTHER".
    pub fn is_standard(&self) -> bool {
        !matches!(self, SurfaceCategory::Other(_))
    }

    /// Human readable name for summaries.
    pub fn display_name(&self) -> &str {
        match self {
            SurfaceCategory::Asphalt => "Asphalt",
            SurfaceCategory::Concrete => "Concrete",
            SurfaceCategory::Turf => "Grass",
            SurfaceCategory::Other(code) => match code.as_str() {
                "GRVL" => "Gravel",
                "DIRT" => "Dirt",
                "WATER" => "Water",
                "OTHER" => "Other",
                _ => code,
            },
        }
    }
}

impl fmt::Display for SurfaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One entry of the user's surface selection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SurfaceSelector {
    Exact(SurfaceCategory),
    /// The synthetic "OTHER" choice: any surface outside ASPH/CONC/TURF.
    AnyOther,
}

impl SurfaceSelector {
    pub fn matches(&self, surface: &SurfaceCategory) -> bool {
        match self {
            SurfaceSelector::Exact(category) => category == surface,
            SurfaceSelector::AnyOther => !surface.is_standard(),
        }
    }
}

impl FromStr for SurfaceSelector {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::UnknownSurface(s.to_string()));
        }
        if trimmed.eq_ignore_ascii_case("OTHER") {
            return Ok(SurfaceSelector::AnyOther);
        }
        Ok(SurfaceSelector::Exact(SurfaceCategory::parse(trimmed)))
    }
}

/// Highest airspace class at the airport.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum AirspaceClass {
    B,
    C,
    D,
    E,
    #[default]
    G,
    Other(String),
}

impl AirspaceClass {
    pub const STANDARD: [AirspaceClass; 5] = [
        AirspaceClass::B,
        AirspaceClass::C,
        AirspaceClass::D,
        AirspaceClass::E,
        AirspaceClass::G,
    ];

    pub fn parse(raw: &str) -> Self {
        let upper = raw.trim().to_uppercase();
        match upper.as_str() {
            "B" => AirspaceClass::B,
            "C" => AirspaceClass::C,
            "D" => AirspaceClass::D,
            "E" => AirspaceClass::E,
            "G" => AirspaceClass::G,
            _ => AirspaceClass::Other(upper),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AirspaceClass::B => "B",
            AirspaceClass::C => "C",
            AirspaceClass::D => "D",
            AirspaceClass::E => "E",
            AirspaceClass::G => "G",
            AirspaceClass::Other(s) => s,
        }
    }
}

impl fmt::Display for AirspaceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AirspaceClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AirspaceClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // null and "" mean no class was recorded
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(match raw.as_deref().map(str::trim) {
            None | Some("") => AirspaceClass::default(),
            Some(s) => AirspaceClass::parse(s),
        })
    }
}

/// Instrument approach filter category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApproachCategory {
    Rnav,
    IlsLoc,
    VorNdb,
    /// Matches airports with no published approaches.
    None,
}

impl ApproachCategory {
    /// Name tokens that identify this category (matched case-insensitively).
    pub fn tokens(&self) -> &'static [&'static str] {
        match self {
            ApproachCategory::Rnav => &["RNAV"],
            ApproachCategory::IlsLoc => &["ILS", "LOC"],
            ApproachCategory::VorNdb => &["VOR", "NDB"],
            ApproachCategory::None => &[],
        }
    }

    /// True if the approach name carries one of this category's tokens.
    pub fn matches_name(&self, name: &str) -> bool {
        let upper = name.to_uppercase();
        self.tokens().iter().any(|t| upper.contains(t))
    }
}

impl FromStr for ApproachCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "RNAV" => Ok(ApproachCategory::Rnav),
            "ILS" | "LOC" | "ILS/LOC" | "ILS_LOC" => Ok(ApproachCategory::IlsLoc),
            "VOR" | "NDB" | "VOR/NDB" | "VOR_NDB" => Ok(ApproachCategory::VorNdb),
            "NONE" => Ok(ApproachCategory::None),
            _ => Err(ValidationError::UnknownApproachCategory(s.to_string())),
        }
    }
}

impl fmt::Display for ApproachCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApproachCategory::Rnav => "RNAV",
            ApproachCategory::IlsLoc => "ILS/LOC",
            ApproachCategory::VorNdb => "VOR/NDB",
            ApproachCategory::None => "None",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_parse_rule() {
        assert_eq!(SurfaceCategory::parse("ASPH-G"), SurfaceCategory::Asphalt);
        assert_eq!(SurfaceCategory::parse("conc"), SurfaceCategory::Concrete);
        assert_eq!(SurfaceCategory::parse("turf-dirt"), SurfaceCategory::Turf);
        assert_eq!(
            SurfaceCategory::parse("GRVL"),
            SurfaceCategory::Other("GRVL".to_string())
        );
        assert_eq!(SurfaceCategory::parse(""), SurfaceCategory::Other(String::new()));
    }

    #[test]
    fn test_surface_selector_other() {
        let other: SurfaceSelector = "OTHER".parse().unwrap();
        assert_eq!(other, SurfaceSelector::AnyOther);
        assert!(other.matches(&SurfaceCategory::parse("GRVL")));
        assert!(other.matches(&SurfaceCategory::parse("WATER")));
        assert!(!other.matches(&SurfaceCategory::Asphalt));
        assert!(!other.matches(&SurfaceCategory::Turf));

        let asph: SurfaceSelector = "asph".parse().unwrap();
        assert!(asph.matches(&SurfaceCategory::parse("ASPH-TRTD")));
        assert!(!asph.matches(&SurfaceCategory::Concrete));
        assert!("  ".parse::<SurfaceSelector>().is_err());
    }

    #[test]
    fn test_surface_display_names() {
        assert_eq!(SurfaceCategory::Turf.display_name(), "Grass");
        assert_eq!(SurfaceCategory::parse("GRVL").display_name(), "Gravel");
        assert_eq!(SurfaceCategory::parse("MATS").display_name(), "MATS");
    }

    #[test]
    fn test_airspace_parse_and_serde() {
        assert_eq!(AirspaceClass::parse("d"), AirspaceClass::D);
        assert_eq!(AirspaceClass::parse("A"), AirspaceClass::Other("A".to_string()));
        let c: AirspaceClass = serde_json::from_str("\"C\"").unwrap();
        assert_eq!(c, AirspaceClass::C);
        assert_eq!(serde_json::to_string(&AirspaceClass::E).unwrap(), "\"E\"");
    }

    #[test]
    fn test_airspace_null_or_blank_is_class_g() {
        let null: AirspaceClass = serde_json::from_str("null").unwrap();
        assert_eq!(null, AirspaceClass::G);
        let blank: AirspaceClass = serde_json::from_str("\" \"").unwrap();
        assert_eq!(blank, AirspaceClass::G);
    }

    #[test]
    fn test_approach_tokens() {
        assert!(ApproachCategory::Rnav.matches_name("RNAV (GPS) RWY 18"));
        assert!(ApproachCategory::IlsLoc.matches_name("loc rwy 27"));
        assert!(ApproachCategory::IlsLoc.matches_name("ILS OR LOC RWY 9"));
        assert!(ApproachCategory::VorNdb.matches_name("VOR-A"));
        assert!(!ApproachCategory::VorNdb.matches_name("RNAV (GPS) RWY 18"));
        assert!(!ApproachCategory::None.matches_name("anything"));
    }

    #[test]
    fn test_approach_category_from_str() {
        assert_eq!("rnav".parse::<ApproachCategory>().unwrap(), ApproachCategory::Rnav);
        assert_eq!("ILS/LOC".parse::<ApproachCategory>().unwrap(), ApproachCategory::IlsLoc);
        assert_eq!("NDB".parse::<ApproachCategory>().unwrap(), ApproachCategory::VorNdb);
        assert_eq!("None".parse::<ApproachCategory>().unwrap(), ApproachCategory::None);
        assert!(matches!(
            "TACAN".parse::<ApproachCategory>(),
            Err(ValidationError::UnknownApproachCategory(_))
        ));
    }
}
