// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Builds the airport JSON document from the FAA NASR 28-day subscription
//! CSV extracts (`APT_BASE.csv`, `APT_RWY.csv`, `CLS_ARSP.csv`).

use log::{debug, info, warn};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::category::AirspaceClass;
use crate::directory::{parse_leading_int, AirportRecord, RunwayRecord};

pub const APT_BASE_FILE: &str = "APT_BASE.csv";
pub const APT_RWY_FILE: &str = "APT_RWY.csv";
pub const CLS_ARSP_FILE: &str = "CLS_ARSP.csv";

#[derive(Error, Debug)]
pub enum NasrError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("NASR file not found: {0}")]
    MissingFile(PathBuf),
}

#[derive(Debug, Deserialize)]
struct BaseRow {
    #[serde(rename = "SITE_NO", default)]
    site_no: String,
    #[serde(rename = "SITE_TYPE_CODE", default)]
    site_type_code: String,
    #[serde(rename = "ICAO_ID", default)]
    icao_id: String,
    #[serde(rename = "ARPT_ID", default)]
    arpt_id: String,
    #[serde(rename = "ARPT_NAME", default)]
    arpt_name: String,
    #[serde(rename = "CITY", default)]
    city: String,
    #[serde(rename = "STATE_CODE", default)]
    state_code: String,
    #[serde(rename = "LAT_DECIMAL", default)]
    lat_decimal: String,
    #[serde(rename = "LONG_DECIMAL", default)]
    long_decimal: String,
}

#[derive(Debug, Deserialize)]
struct RunwayRow {
    #[serde(rename = "SITE_NO", default)]
    site_no: String,
    #[serde(rename = "RWY_ID", default)]
    rwy_id: String,
    #[serde(rename = "RWY_LEN", default)]
    rwy_len: String,
    #[serde(rename = "RWY_WIDTH", default)]
    rwy_width: String,
    #[serde(rename = "SURFACE_TYPE_CODE", default)]
    surface_type_code: String,
    #[serde(rename = "COND", default)]
    cond: String,
}

#[derive(Debug, Deserialize)]
struct AirspaceRow {
    #[serde(rename = "SITE_NO", default)]
    site_no: String,
    #[serde(rename = "CLASS_B_AIRSPACE", default)]
    class_b: String,
    #[serde(rename = "CLASS_C_AIRSPACE", default)]
    class_c: String,
    #[serde(rename = "CLASS_D_AIRSPACE", default)]
    class_d: String,
    #[serde(rename = "CLASS_E_AIRSPACE", default)]
    class_e: String,
    #[serde(rename = "REMARK", default)]
    remark: String,
}

impl AirspaceRow {
    fn class(&self) -> AirspaceClass {
        let yes = |flag: &str| flag.eq_ignore_ascii_case("Y");
        if yes(&self.class_b) {
            AirspaceClass::B
        } else if yes(&self.class_c) {
            AirspaceClass::C
        } else if yes(&self.class_d) {
            AirspaceClass::D
        } else if yes(&self.class_e) {
            AirspaceClass::E
        } else {
            AirspaceClass::G
        }
    }
}

/// Most restrictive first: B outranks C outranks D outranks E outranks G.
fn airspace_rank(class: &AirspaceClass) -> u8 {
    match class {
        AirspaceClass::B => 4,
        AirspaceClass::C => 3,
        AirspaceClass::D => 2,
        AirspaceClass::E => 1,
        _ => 0,
    }
}

#[derive(Debug, Default)]
struct SiteAirspace {
    class: AirspaceClass,
    remarks: String,
}

fn open_csv(path: &Path) -> Result<csv::Reader<File>, NasrError> {
    if !path.exists() {
        return Err(NasrError::MissingFile(path.to_path_buf()));
    }
    Ok(csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?)
}

fn read_runways(path: &Path) -> Result<HashMap<String, Vec<RunwayRecord>>, NasrError> {
    let mut rdr = open_csv(path)?;
    let mut by_site: HashMap<String, Vec<RunwayRecord>> = HashMap::new();
    let mut skipped = 0usize;

    for result in rdr.deserialize::<RunwayRow>() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("Skipping runway row — error={}", e);
                skipped += 1;
                continue;
            }
        };
        by_site.entry(row.site_no).or_default().push(RunwayRecord {
            rwy_id: row.rwy_id,
            length: parse_leading_int(&row.rwy_len),
            width: parse_leading_int(&row.rwy_width),
            surface: row.surface_type_code,
            condition: row.cond,
        });
    }

    if skipped > 0 {
        warn!("Dropped malformed runway rows — count={}", skipped);
    }
    Ok(by_site)
}

fn read_airspace(path: &Path) -> Result<HashMap<String, SiteAirspace>, NasrError> {
    let mut rdr = open_csv(path)?;
    let mut by_site: HashMap<String, SiteAirspace> = HashMap::new();

    for result in rdr.deserialize::<AirspaceRow>() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("Skipping airspace row — error={}", e);
                continue;
            }
        };
        let class = row.class();
        let entry = by_site.entry(row.site_no.clone()).or_default();
        if airspace_rank(&class) > airspace_rank(&entry.class) {
            entry.class = class;
        }
        // Last row of the site wins.
        entry.remarks = row.remark;
    }

    Ok(by_site)
}

/// Import the three NASR extracts found in `dir`.
pub fn import_dir<P: AsRef<Path>>(dir: P) -> Result<BTreeMap<String, AirportRecord>, NasrError> {
    let dir = dir.as_ref();
    import_files(
        &dir.join(APT_BASE_FILE),
        &dir.join(APT_RWY_FILE),
        &dir.join(CLS_ARSP_FILE),
    )
}

/// Combine base, runway and airspace extracts into code-keyed airport
/// records. Only `SITE_TYPE_CODE == "A"` rows are kept; rows without a code,
/// site number or numeric position are dropped.
pub fn import_files(
    base_csv: &Path,
    runway_csv: &Path,
    airspace_csv: &Path,
) -> Result<BTreeMap<String, AirportRecord>, NasrError> {
    let mut runways = read_runways(runway_csv)?;
    let airspace = read_airspace(airspace_csv)?;

    let mut rdr = open_csv(base_csv)?;
    let mut airports = BTreeMap::new();
    let mut dropped = 0usize;

    for result in rdr.deserialize::<BaseRow>() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("Skipping base row — error={}", e);
                dropped += 1;
                continue;
            }
        };
        if !row.site_type_code.eq_ignore_ascii_case("A") {
            continue;
        }

        let icao = row.icao_id.to_uppercase();
        let code = if icao.is_empty() {
            row.arpt_id.to_uppercase()
        } else {
            icao
        };
        let lat = row.lat_decimal.parse::<f64>().ok().filter(|v| v.is_finite());
        let lon = row.long_decimal.parse::<f64>().ok().filter(|v| v.is_finite());

        let (Some(lat), Some(lon)) = (lat, lon) else {
            debug!("Dropping airport without position — site_no={}", row.site_no);
            dropped += 1;
            continue;
        };
        if code.is_empty() || row.site_no.is_empty() {
            debug!("Dropping airport without identifier — site_no={}", row.site_no);
            dropped += 1;
            continue;
        }

        let site = airspace.get(&row.site_no);
        let record = AirportRecord {
            site_no: Some(row.site_no.clone()),
            lat,
            lon,
            city: row.city,
            state: row.state_code,
            country: String::new(),
            airport_name: row.arpt_name,
            runways: runways.remove(&row.site_no).unwrap_or_default(),
            airspace: site.map(|s| s.class.clone()).unwrap_or_default(),
            remarks: site.map(|s| s.remarks.clone()).unwrap_or_default(),
            approaches: Vec::new(),
        };

        if airports.insert(code.clone(), record).is_some() {
            warn!("Duplicate airport code in NASR base, keeping last — code={}", code);
        }
    }

    if dropped > 0 {
        warn!("Dropped NASR airport rows — count={}", dropped);
    }
    info!("Imported NASR airports — airports={}", airports.len());

    Ok(airports)
}

/// Write the document as JSON, indented or minified.
pub fn write_json<P: AsRef<Path>>(
    airports: &BTreeMap<String, AirportRecord>,
    path: P,
    pretty: bool,
) -> Result<(), NasrError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(path)?);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, airports)?;
    } else {
        serde_json::to_writer(&mut writer, airports)?;
    }
    writer.flush()?;
    Ok(())
}
