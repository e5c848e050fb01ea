use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter};

/// Directory component used for banner files whose vehicle kind
/// is not recognized, eg: rows created by older system versions
pub const UNKNOWN_KIND_DIR: &str = "outro";

/// All the vehicle categories of the municipal registry
///
/// also the tag stored on the `vehicle_kind` column of banner rows,
/// so changing a serialized value here is a breaking change for
/// existing databases
#[derive(Eq, Copy, Clone, Debug, Display, EnumIter, Serialize, PartialEq, Deserialize, Hash)]
pub enum VehicleKind {
    #[strum(serialize = "taxi")]
    #[serde(rename = "taxi")]
    Taxi,

    #[strum(serialize = "mototaxi")]
    #[serde(rename = "mototaxi")]
    Mototaxi,

    #[strum(serialize = "transporte_municipal")]
    #[serde(rename = "transporte_municipal")]
    MunicipalTransport,
}

impl VehicleKind {
    /// the subdirectory banner files for this kind are stored under
    pub const fn dir_component(self) -> &'static str {
        match self {
            Self::Taxi => "taxi",
            Self::Mototaxi => "mototaxi",
            Self::MunicipalTransport => "transporte_municipal",
        }
    }
}

impl FromStr for VehicleKind {
    type Err = ();

    fn from_str(input: &str) -> Result<VehicleKind, Self::Err> {
        match input {
            "taxi" => Ok(VehicleKind::Taxi),
            "mototaxi" => Ok(VehicleKind::Mototaxi),
            "transporte_municipal" => Ok(VehicleKind::MunicipalTransport),
            _ => Err(()),
        }
    }
}

/// Maps a stored kind tag to the directory component for its banner
/// files, falling back to [`UNKNOWN_KIND_DIR`] for unrecognized tags
pub fn dir_component_for_tag(tag: &str) -> &'static str {
    VehicleKind::from_str(tag)
        .map(VehicleKind::dir_component)
        .unwrap_or(UNKNOWN_KIND_DIR)
}
