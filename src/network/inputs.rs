//! Facility and route table decoding
//!
//! Both tables are plain CSV with a header row. Decoding is lenient: a missing or
//! malformed numeric cell becomes "absent" (no capability, no cost) rather than an
//! error. Only structural CSV failures are reported.

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use std::io::Read;
use std::str::FromStr;
use strum::EnumCount;

use crate::domain::{Capability, FacilityKind, Period};
use crate::error::Result;

// Facility table column layout
const COL_NAME: usize = 0;
const COL_LATITUDE: usize = 1;
const COL_LONGITUDE: usize = 2;
const COL_KIND: usize = 3;
const COL_WET_STORAGE: usize = 4;
const COL_WET_STORAGE_COST: usize = 5;
const COL_WET_STORAGE_CAPACITY: usize = 6;
const COL_OFFSHORE_FOUNDATION: usize = 7;
/// First (cost, capacity, spare) triple; one triple per capability
const COL_CAPABILITY_BASE: usize = 9;
const COL_STEEL_SUPPLY: usize = 29;
const COL_TURBINE_DEMAND: usize = 30;
const COL_INSTALL_FROM: usize = 31;

// Route table column layout
const COL_ROUTE_SOURCE: usize = 0;
const COL_ROUTE_TARGET: usize = 1;
const COL_ROUTE_DISTANCE: usize = 3;
const COL_ROUTE_VESSEL_CAPACITY: usize = 4;

/// Nominal monthly terms for one capability as given in the facility table
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CapabilityCells {
    pub unit_cost: Option<f64>,
    /// May be fractional (e.g. an annual figure spread over twelve months)
    pub capacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityRow {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub kind: FacilityKind,
    pub wet_storage: bool,
    pub wet_storage_cost: Option<f64>,
    pub wet_storage_capacity: Option<f64>,
    pub offshore_foundation: bool,
    pub capabilities: [CapabilityCells; Capability::COUNT],
    pub steel_supply: u32,
    pub turbine_demand: u32,
    /// Earliest period in which turbines can be installed; `None` means no restriction
    pub install_from: Option<Period>,
}

impl FacilityRow {
    pub fn cells(&self, capability: Capability) -> CapabilityCells {
        self.capabilities[capability.index()]
    }

    pub fn from_record(record: &StringRecord) -> Self {
        let capabilities = std::array::from_fn(|i| {
            let cost_col = COL_CAPABILITY_BASE + 3 * i;
            CapabilityCells {
                unit_cost: number(record, cost_col),
                capacity: number(record, cost_col + 1),
            }
        });

        let kind_label = text(record, COL_KIND);
        let kind = FacilityKind::from_str(kind_label).unwrap_or_else(|_| {
            if !kind_label.is_empty() {
                tracing::debug!(kind = kind_label, "unknown facility kind, treating as unclassified");
            }
            FacilityKind::Unclassified
        });

        Self {
            name: text(record, COL_NAME).to_string(),
            latitude: number(record, COL_LATITUDE).unwrap_or(0.0),
            longitude: number(record, COL_LONGITUDE).unwrap_or(0.0),
            kind,
            wet_storage: flag(record, COL_WET_STORAGE),
            wet_storage_cost: number(record, COL_WET_STORAGE_COST),
            wet_storage_capacity: number(record, COL_WET_STORAGE_CAPACITY),
            offshore_foundation: flag(record, COL_OFFSHORE_FOUNDATION),
            capabilities,
            steel_supply: count(record, COL_STEEL_SUPPLY),
            turbine_demand: count(record, COL_TURBINE_DEMAND),
            install_from: month(record, COL_INSTALL_FROM),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRow {
    pub source: String,
    pub target: String,
    /// One-way distance in km
    pub distance_km: f64,
    pub vessel_capacity: f64,
}

impl RouteRow {
    pub fn from_record(record: &StringRecord) -> Self {
        Self {
            source: text(record, COL_ROUTE_SOURCE).to_string(),
            target: text(record, COL_ROUTE_TARGET).to_string(),
            distance_km: number(record, COL_ROUTE_DISTANCE).unwrap_or(0.0),
            vessel_capacity: number(record, COL_ROUTE_VESSEL_CAPACITY).unwrap_or(0.0),
        }
    }
}

pub fn read_facilities<R: Read>(reader: R) -> Result<Vec<FacilityRow>> {
    read_rows(reader, FacilityRow::from_record)
}

pub fn read_routes<R: Read>(reader: R) -> Result<Vec<RouteRow>> {
    read_rows(reader, RouteRow::from_record)
}

fn read_rows<R: Read, T>(reader: R, decode: impl Fn(&StringRecord) -> T) -> Result<Vec<T>> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        if text(&record, 0).is_empty() {
            continue;
        }
        rows.push(decode(&record));
    }
    Ok(rows)
}

fn text(record: &StringRecord, col: usize) -> &str {
    record
        .get(col)
        .map(|s| s.trim().trim_start_matches('\u{feff}'))
        .unwrap_or("")
}

fn number(record: &StringRecord, col: usize) -> Option<f64> {
    let cell = text(record, col);
    if cell.is_empty() {
        return None;
    }
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            tracing::debug!(column = col, cell, "unparseable numeric cell, treating as absent");
            None
        }
    }
}

fn count(record: &StringRecord, col: usize) -> u32 {
    number(record, col)
        .map(|v| v.max(0.0).trunc() as u32)
        .unwrap_or(0)
}

fn flag(record: &StringRecord, col: usize) -> bool {
    let cell = text(record, col);
    cell.eq_ignore_ascii_case("true") || cell == "1"
}

/// Month number 1-12, optionally followed by the 月 marker
fn month(record: &StringRecord, col: usize) -> Option<Period> {
    let cell = text(record, col).trim_end_matches('月');
    cell.parse::<u8>().ok().and_then(Period::from_month_number)
}
