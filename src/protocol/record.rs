//! Typed measurement and control records plus their builders.
//!
//! A [`Record`] is the immutable result of successfully parsing one frame.
//! Every field holds the raw token text exactly as it appeared on the wire;
//! interpreting the values (numeric range checks, unit conversion) is left to
//! whatever consumes the record downstream.

use serde::{Deserialize, Serialize};

/// The six-field environment snapshot the controller sends periodically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryMeasurement {
    pub humidity: String,
    pub lux: String,
    pub temp_up: String,
    pub temp_middle: String,
    pub temp_down: String,
    pub soil_moisture: String,
}

/// A pH reading. Exactly one side is populated, selected by the wire verb
/// (`PHW` for the water reservoir probe, `PHS` for the soil probe).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhMeasurement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph_water: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph_soil: Option<String>,
}

/// One parsed frame, tagged by command.
///
/// The `Sl`/`St`/`Sf`/`Cp`/`Si` variants carry the controller's settings
/// readback frames positionally, named after their wire verbs. `Reset` and
/// `DefaultSettings` are bare notifications (`R` and `DEF SETT` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Record {
    PrimaryMeasurement(PrimaryMeasurement),
    PhMeasurement(PhMeasurement),
    Sl(String, String, String),
    St(String, String),
    Sf(String, String),
    Cp(String),
    Si(String, String, String),
    Reset,
    DefaultSettings,
}

impl Record {
    /// Short stable tag used for log lines and storage routing.
    pub fn kind(&self) -> &'static str {
        match self {
            Record::PrimaryMeasurement(_) => "primarymeas",
            Record::PhMeasurement(_) => "ph",
            Record::Sl(..) => "sl",
            Record::St(..) => "st",
            Record::Sf(..) => "sf",
            Record::Cp(..) => "cp",
            Record::Si(..) => "si",
            Record::Reset => "reset",
            Record::DefaultSettings => "defsett",
        }
    }
}

// Builder functions referenced by the command table. Each receives exactly the
// field span the dispatcher validated, so positional indexing is safe here.

pub(crate) fn primary_measurement(fields: &[String]) -> Record {
    Record::PrimaryMeasurement(PrimaryMeasurement {
        humidity: fields[0].clone(),
        lux: fields[1].clone(),
        temp_up: fields[2].clone(),
        temp_middle: fields[3].clone(),
        temp_down: fields[4].clone(),
        soil_moisture: fields[5].clone(),
    })
}

pub(crate) fn ph_water(fields: &[String]) -> Record {
    Record::PhMeasurement(PhMeasurement {
        ph_water: Some(fields[0].clone()),
        ph_soil: None,
    })
}

pub(crate) fn ph_soil(fields: &[String]) -> Record {
    Record::PhMeasurement(PhMeasurement {
        ph_water: None,
        ph_soil: Some(fields[0].clone()),
    })
}

pub(crate) fn sl(fields: &[String]) -> Record {
    Record::Sl(fields[0].clone(), fields[1].clone(), fields[2].clone())
}

pub(crate) fn st(fields: &[String]) -> Record {
    Record::St(fields[0].clone(), fields[1].clone())
}

pub(crate) fn sf(fields: &[String]) -> Record {
    Record::Sf(fields[0].clone(), fields[1].clone())
}

pub(crate) fn cp(fields: &[String]) -> Record {
    Record::Cp(fields[0].clone())
}

pub(crate) fn si(fields: &[String]) -> Record {
    Record::Si(fields[0].clone(), fields[1].clone(), fields[2].clone())
}

pub(crate) fn reset(_fields: &[String]) -> Record {
    Record::Reset
}

pub(crate) fn default_settings(_fields: &[String]) -> Record {
    Record::DefaultSettings
}
