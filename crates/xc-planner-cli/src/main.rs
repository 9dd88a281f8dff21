// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::collections::BTreeSet;
use std::path::PathBuf;
use xc_planner_core::nasr;
use xc_planner_core::region::{annulus, second_leg_region};
use xc_planner_core::settings::{PlannerSettings, SettingsManager};
use xc_planner_core::summary::TripSummary;
use xc_planner_core::{
    find_first_leg, find_second_leg, sort_candidates, Airport, AirspaceClass, ApproachCategory,
    Candidate, ConstraintSet, Directory, DistanceBand, Selection, SortKey, SurfaceSelector, TripType,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Airport JSON document (falls back to the stored data path)
    #[arg(short, long, env = "XC_AIRPORT_DATA")]
    data: Option<PathBuf>,

    /// Shorthand for --log-level debug
    #[arg(short, long)]
    verbose: bool,

    #[arg(long, env = "XC_LOG", default_value = "warn")]
    log_level: LevelFilter,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List countries present in the directory
    Countries,
    /// List states of a country
    States { country: String },
    /// List airports of a state
    Airports { country: String, state: String },
    /// Find first-leg destinations from home
    FirstLeg {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value = "single")]
        trip: TripType,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Find airports that close a triangle through the chosen first leg
    SecondLeg {
        /// Chosen first-leg airport
        #[arg(long)]
        first: String,
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Boundary rings for a map overlay
    Region {
        #[arg(long)]
        home: Option<String>,
        /// Chosen first-leg airport; without it the first-leg annulus is drawn
        #[arg(long)]
        first: Option<String>,
        #[command(flatten)]
        bands: BandArgs,
        /// Vertices per ring
        #[arg(long)]
        points: Option<usize>,
    },
    /// Leg-by-leg distances of a planned trip
    Summary {
        #[arg(long)]
        home: Option<String>,
        /// Destination, or first leg of a triangle
        first: String,
        /// Second leg of a triangle
        second: Option<String>,
    },
    /// Manage the stored home base
    Home {
        #[command(subcommand)]
        action: HomeAction,
    },
    /// Build the airport JSON document from NASR CSV extracts
    ImportNasr {
        /// Directory holding APT_BASE.csv, APT_RWY.csv and CLS_ARSP.csv
        csv_dir: PathBuf,
        /// Output file
        #[arg(short, long, default_value = "json_data/airports.json")]
        out: PathBuf,
        /// Also write a minified copy here
        #[arg(long)]
        mini: Option<PathBuf>,
        /// Remember the output as the default data path
        #[arg(long)]
        remember: bool,
    },
}

#[derive(Subcommand)]
enum HomeAction {
    Set { code: String },
    Show,
    Clear,
}

#[derive(Args, Clone)]
struct BandArgs {
    #[arg(long, default_value_t = 0.0)]
    first_min: f64,
    #[arg(long, default_value_t = 100.0)]
    first_max: f64,
    #[arg(long)]
    total_min: Option<f64>,
    #[arg(long)]
    total_max: Option<f64>,
}

impl BandArgs {
    fn first_leg(&self) -> DistanceBand {
        DistanceBand::new(self.first_min, self.first_max)
    }

    /// Total band raised to the floor the first-leg band requires.
    fn total(&self) -> Result<Option<DistanceBand>> {
        let first = self.first_leg();
        match (self.total_min, self.total_max) {
            (None, None) => Ok(None),
            (min, Some(max)) => {
                let min = min.unwrap_or_else(|| DistanceBand::required_total_min(first.min_nm));
                let raw = DistanceBand::new(min, max);
                let clamped = raw.clamp_total_for(&first);
                if clamped != raw {
                    log::info!(
                        "Raised total band — from={}-{} to={}-{}",
                        raw.min_nm,
                        raw.max_nm,
                        clamped.min_nm,
                        clamped.max_nm
                    );
                }
                Ok(Some(clamped))
            }
            (Some(_), None) => bail!("--total-min needs --total-max"),
        }
    }
}

#[derive(Args)]
struct FilterArgs {
    /// Home airport (falls back to the stored home base)
    #[arg(long)]
    home: Option<String>,
    /// Runway surfaces: ASPH, CONC, TURF, OTHER
    #[arg(long, value_delimiter = ',')]
    surface: Vec<String>,
    /// Airspace classes: B, C, D, E, G
    #[arg(long, value_delimiter = ',')]
    airspace: Vec<String>,
    /// Approach types: RNAV, ILS/LOC, VOR/NDB, None
    #[arg(long, value_delimiter = ',')]
    approach: Vec<String>,
    /// Minimum runway length in feet (falls back to the stored setting)
    #[arg(long)]
    min_runway: Option<u32>,
    #[command(flatten)]
    bands: BandArgs,
}

impl FilterArgs {
    fn constraints(&self, settings: &PlannerSettings) -> Result<ConstraintSet> {
        let mut set = ConstraintSet {
            min_runway_length_ft: self.min_runway.unwrap_or(settings.min_runway_length_ft),
            first_leg: self.bands.first_leg(),
            total: self.bands.total()?,
            ..ConstraintSet::default()
        };
        if !self.surface.is_empty() {
            set.surfaces = self
                .surface
                .iter()
                .map(|s| s.parse::<SurfaceSelector>())
                .collect::<Result<BTreeSet<_>, _>>()?;
        }
        if !self.airspace.is_empty() {
            set.airspaces = self.airspace.iter().map(|s| AirspaceClass::parse(s)).collect();
        }
        if !self.approach.is_empty() {
            set.approaches = self
                .approach
                .iter()
                .map(|s| s.parse::<ApproachCategory>())
                .collect::<Result<BTreeSet<_>, _>>()?;
        }
        Ok(set)
    }
}

#[derive(Args)]
struct OutputArgs {
    #[arg(long, default_value = "leg_distance")]
    sort: String,
    /// Keep this airport highlighted if it is still in the results
    #[arg(long)]
    select: Option<String>,
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        cli.log_level
    };
    // A logger may already be installed when embedded; ignore that.
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn load_directory(cli: &Cli, settings: &PlannerSettings) -> Result<Directory> {
    let path = cli
        .data
        .clone()
        .or_else(|| settings.data_path.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("No airport data. Pass --data, set XC_AIRPORT_DATA, or run import-nasr --remember.")
        })?;
    Directory::from_path(&path)
        .with_context(|| format!("Failed to load airport data from {}", path.display()))
}

fn resolve_home(explicit: Option<&str>, settings: &PlannerSettings) -> Result<String> {
    explicit
        .map(str::to_string)
        .or_else(|| settings.home_base.clone())
        .ok_or_else(|| anyhow::anyhow!("No home airport. Pass --home or run `home set <CODE>`."))
}

fn print_candidates(list: &[Candidate], selection: &Selection, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(list)?);
        return Ok(());
    }
    if list.is_empty() {
        println!("No airports match.");
        return Ok(());
    }
    let selected = selection.index_in(list);
    for (i, c) in list.iter().enumerate() {
        let mark = if selected == Some(i) { "*" } else { " " };
        println!(
            "{} {:<6} {:<40} {:<8} {:<2} {:>6} ft {:>7.1} NM  (total {:.1})",
            mark,
            c.code,
            c.name,
            c.state,
            c.airspace,
            c.max_runway_ft,
            c.distances.leg_nm(),
            c.distances.total_nm()
        );
    }
    println!("{} airports", list.len());
    Ok(())
}

/// "5000 ft Asphalt", or "no runways".
fn runway_label(airport: &Airport) -> String {
    match airport.longest_runway() {
        Some(rwy) => format!("{} ft {}", rwy.length_ft, rwy.surface.display_name()),
        None => "no runways".to_string(),
    }
}

fn finish_list(
    dir: &Directory,
    list: Vec<Candidate>,
    output: &OutputArgs,
    json: bool,
) -> Result<()> {
    let key: SortKey = output.sort.parse()?;
    let list = sort_candidates(list, key);

    let mut selection = Selection::new();
    if let Some(code) = &output.select {
        selection.select(&code.trim().to_uppercase());
        if !selection.reconcile(&list) {
            log::warn!("Selected airport is no longer in the results — code={}", code);
        }
    }
    print_candidates(&list, &selection, json)?;

    if !json {
        if let Some(chosen) = selection.resolve(&list) {
            let longest = dir
                .get(&chosen.code)
                .map(runway_label)
                .unwrap_or_default();
            println!(
                "Selected: {} {} ({}, {})",
                chosen.code, chosen.name, chosen.city, longest
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let settings_mgr = SettingsManager::new();
    let settings = settings_mgr.load()?;

    match &cli.command {
        Commands::Countries => {
            let dir = load_directory(&cli, &settings)?;
            let countries = dir.countries();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&countries)?);
            } else {
                countries.iter().for_each(|c| println!("{}", c));
            }
        }
        Commands::States { country } => {
            let dir = load_directory(&cli, &settings)?;
            let states = dir.states_of(country);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&states)?);
            } else {
                states.iter().for_each(|s| println!("{}", s));
            }
        }
        Commands::Airports { country, state } => {
            let dir = load_directory(&cli, &settings)?;
            let airports = dir.airports_of(country, state);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(airports)?);
            } else {
                for a in airports {
                    let longest = dir.get(&a.code).map(runway_label).unwrap_or_default();
                    println!("{:<6} {:<40} {}", a.code, a.name, longest);
                }
            }
        }
        Commands::FirstLeg {
            filters,
            trip,
            output,
        } => {
            let dir = load_directory(&cli, &settings)?;
            let home = resolve_home(filters.home.as_deref(), &settings)?;
            let constraints = filters.constraints(&settings)?;
            let list = find_first_leg(&dir, &home, &constraints, *trip)?;
            finish_list(&dir, list, output, cli.json)?;
        }
        Commands::SecondLeg {
            first,
            filters,
            output,
        } => {
            let dir = load_directory(&cli, &settings)?;
            let home = resolve_home(filters.home.as_deref(), &settings)?;
            let constraints = filters.constraints(&settings)?;
            let total = constraints
                .total
                .context("Second leg search needs --total-max")?;
            let list = find_second_leg(&dir, &home, Some(first.as_str()), &constraints, &total)?;
            finish_list(&dir, list, output, cli.json)?;
        }
        Commands::Region {
            home,
            first,
            bands,
            points,
        } => {
            let dir = load_directory(&cli, &settings)?;
            let home_code = resolve_home(home.as_deref(), &settings)?;
            let home_pos = dir.require(&home_code)?.position();
            let n = points.unwrap_or(settings.boundary_points);

            match first {
                None => {
                    let first_leg = bands.first_leg();
                    first_leg.validate("first leg")?;
                    let ring = annulus(&home_pos, &first_leg, n);
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&ring)?);
                    } else {
                        println!("inner: {} points, outer: {} points", ring.inner.len(), ring.outer.len());
                        for p in &ring.outer {
                            println!("{:.6},{:.6}", p.lat, p.lon);
                        }
                    }
                }
                Some(first_code) => {
                    let first_pos = dir.require(first_code)?.position();
                    let total = bands.total()?.context("Region around a first leg needs --total-max")?;
                    total.validate("total")?;
                    let region = second_leg_region(&home_pos, &first_pos, &total, n);
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&region)?);
                    } else {
                        println!(
                            "leg1: {:.1} NM, outer: {} points, inner: {} points",
                            region.leg1_nm,
                            region.outer.len(),
                            region.inner.len()
                        );
                        for p in &region.outer {
                            println!("{:.6},{:.6}", p.lat, p.lon);
                        }
                    }
                }
            }
        }
        Commands::Summary {
            home,
            first,
            second,
        } => {
            let dir = load_directory(&cli, &settings)?;
            let home_code = resolve_home(home.as_deref(), &settings)?;
            let summary = match second {
                Some(second) => TripSummary::triangle(&dir, &home_code, first, second)?,
                None => TripSummary::round_trip(&dir, &home_code, first)?,
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary);
            }
        }
        Commands::Home { action } => match action {
            HomeAction::Set { code } => {
                if cli.data.is_some() || settings.data_path.is_some() {
                    let dir = load_directory(&cli, &settings)?;
                    dir.require(code)?;
                }
                let saved = settings_mgr.set_home_base(code)?;
                println!("Home base: {}", saved.home_base.unwrap_or_default());
            }
            HomeAction::Show => match &settings.home_base {
                Some(code) => println!("{}", code),
                None => println!("No home base set."),
            },
            HomeAction::Clear => {
                settings_mgr.clear_home_base()?;
                println!("Home base cleared.");
            }
        },
        Commands::ImportNasr {
            csv_dir,
            out,
            mini,
            remember,
        } => {
            let airports = nasr::import_dir(csv_dir)
                .with_context(|| format!("Failed to import NASR data from {}", csv_dir.display()))?;
            nasr::write_json(&airports, out, true)?;
            if let Some(mini) = mini {
                nasr::write_json(&airports, mini, false)?;
            }
            println!("Wrote {} airports to {}", airports.len(), out.display());

            if *remember {
                let mut updated = settings.clone();
                updated.data_path = Some(out.canonicalize().unwrap_or_else(|_| out.clone()));
                settings_mgr.save(&updated)?;
            }
        }
    }

    Ok(())
}
