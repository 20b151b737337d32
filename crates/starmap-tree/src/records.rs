//! Observation records handed to the engine.
//!
//! Records arrive already parsed by the acquisition layer. Every type here
//! derives serde so collaborators can pass JSON straight through.

use serde::{Deserialize, Serialize};

use crate::types::{BodyHint, BodyId, Provenance, SystemAddress};

/// A record identifying a body, with optional scan detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyRecord {
    pub system_address: SystemAddress,
    pub system_name: String,
    pub full_name: String,
    #[serde(default)]
    pub body_id: Option<BodyId>,
    /// Catalog designator, when the caller knows it differs from the name.
    #[serde(default)]
    pub designation: Option<String>,
    pub hint: BodyHint,
    #[serde(default)]
    pub provenance: Provenance,
    #[serde(default)]
    pub detail: Option<ScanDetail>,
}

impl BodyRecord {
    pub fn new(
        system_address: SystemAddress,
        system_name: impl Into<String>,
        full_name: impl Into<String>,
        hint: BodyHint,
    ) -> Self {
        Self {
            system_address,
            system_name: system_name.into(),
            full_name: full_name.into(),
            body_id: None,
            designation: None,
            hint,
            provenance: Provenance::Observed,
            detail: None,
        }
    }

    pub fn with_body_id(mut self, id: u32) -> Self {
        self.body_id = Some(BodyId(id));
        self
    }

    pub fn with_designation(mut self, designation: impl Into<String>) -> Self {
        self.designation = Some(designation.into());
        self
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    pub fn with_detail(mut self, detail: ScanDetail) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Full scan payload of a body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanDetail {
    /// Unix milliseconds.
    pub timestamp: u64,
    pub body_type: Option<String>,
    pub distance_from_arrival_ls: Option<f64>,
    pub radius_m: Option<f64>,
    pub mass: Option<f64>,
    pub surface_gravity: Option<f64>,
    pub landable: Option<bool>,
    pub terraform_state: Option<String>,
    pub rings: Vec<RingData>,
    /// Ancestry path, nearest parent first.
    pub parents: Vec<ParentLink>,
}

/// Physical data of a belt or ring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RingData {
    pub name: String,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub mass_mt: Option<f64>,
    #[serde(default)]
    pub inner_radius_m: Option<f64>,
    #[serde(default)]
    pub outer_radius_m: Option<f64>,
}

/// Kind of an ancestry entry. `Null` entries are barycentres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParentKind {
    Null,
    Star,
    Planet,
    Ring,
}

/// One step of a body's ancestry path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentLink {
    pub kind: ParentKind,
    pub body_id: BodyId,
    /// Filled in once the barycentre has been observed.
    #[serde(default)]
    pub barycentre: Option<BarycentreObservation>,
}

impl ParentLink {
    pub fn new(kind: ParentKind, body_id: u32) -> Self {
        Self {
            kind,
            body_id: BodyId(body_id),
            barycentre: None,
        }
    }
}

/// Orbital data of a barycentre.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarycentreObservation {
    pub timestamp: u64,
    pub semi_major_axis_m: Option<f64>,
    pub eccentricity: Option<f64>,
    pub orbital_inclination_deg: Option<f64>,
    pub periapsis_deg: Option<f64>,
    pub orbital_period_s: Option<f64>,
    pub ascending_node_deg: Option<f64>,
    pub mean_anomaly_deg: Option<f64>,
}

/// Which record produced a surface feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    ApproachSettlement,
    Touchdown,
    Docking,
}

/// A ground location on a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceFeature {
    pub kind: FeatureKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Unix milliseconds.
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default)]
    pub body_id: Option<BodyId>,
    #[serde(default)]
    pub body_name: Option<String>,
    #[serde(default)]
    pub market_id: Option<u64>,
    #[serde(default)]
    pub station_type: Option<String>,
}

impl SurfaceFeature {
    fn bare(kind: FeatureKind, timestamp: u64) -> Self {
        Self {
            kind,
            name: None,
            latitude: None,
            longitude: None,
            timestamp,
            body_id: None,
            body_name: None,
            market_id: None,
            station_type: None,
        }
    }

    /// Approach to a named settlement at known coordinates.
    pub fn approach(name: impl Into<String>, latitude: f64, longitude: f64, timestamp: u64) -> Self {
        Self {
            name: Some(name.into()),
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Self::bare(FeatureKind::ApproachSettlement, timestamp)
        }
    }

    /// Touchdown at coordinates, possibly near a named destination.
    pub fn touchdown(latitude: f64, longitude: f64, timestamp: u64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Self::bare(FeatureKind::Touchdown, timestamp)
        }
    }

    /// Docking at a named station; coordinates come from the earlier report.
    pub fn docking(name: impl Into<String>, timestamp: u64) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::bare(FeatureKind::Docking, timestamp)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn on_body(mut self, body_id: u32) -> Self {
        self.body_id = Some(BodyId(body_id));
        self
    }

    pub fn with_body_name(mut self, body_name: impl Into<String>) -> Self {
        self.body_name = Some(body_name.into());
        self
    }

    pub fn with_market(mut self, market_id: u64, station_type: impl Into<String>) -> Self {
        self.market_id = Some(market_id);
        self.station_type = Some(station_type.into());
        self
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    pub(crate) fn set_coordinates(&mut self, (latitude, longitude): (f64, f64)) {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
    }

    /// Both features carry the same name.
    pub fn same_name(&self, other: &Self) -> bool {
        matches!((&self.name, &other.name), (Some(a), Some(b)) if a == b)
    }

    /// Both features carry coordinates within `tolerance` degrees.
    pub fn is_near(&self, other: &Self, tolerance: f64) -> bool {
        match (self.coordinates(), other.coordinates()) {
            (Some(a), Some(b)) => within(a, b, tolerance),
            _ => false,
        }
    }

    /// Take location and body metadata this record lacks from `existing`.
    pub(crate) fn inherit_from(&mut self, existing: &SurfaceFeature) {
        if self.coordinates().is_none() {
            self.latitude = existing.latitude;
            self.longitude = existing.longitude;
        }
        self.body_id = self.body_id.or(existing.body_id);
        if self.body_name.is_none() {
            self.body_name = existing.body_name.clone();
        }
        self.market_id = self.market_id.or(existing.market_id);
        if self.station_type.is_none() {
            self.station_type = existing.station_type.clone();
        }
    }
}

pub(crate) fn within(a: (f64, f64), b: (f64, f64), tolerance: f64) -> bool {
    (a.0 - b.0).abs() < tolerance && (a.1 - b.1).abs() < tolerance
}

/// A catalog (codex) discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodexEntry {
    pub timestamp: u64,
    pub entry_id: u64,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    pub system_name: String,
    /// Raw address as recorded, validated before use.
    pub system_address: u64,
    #[serde(default)]
    pub body_id: Option<BodyId>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub is_new_discovery: bool,
}

/// A signal source detected remotely in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSignal {
    pub timestamp: u64,
    pub signal_name: String,
    #[serde(default)]
    pub signal_type: Option<String>,
    #[serde(default)]
    pub uss_type: Option<String>,
    #[serde(default)]
    pub spawning_faction: Option<String>,
    #[serde(default)]
    pub time_remaining_s: Option<f64>,
    #[serde(default)]
    pub is_station: bool,
}

/// Count of one signal type detected on a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodySignal {
    pub signal_type: String,
    pub count: u32,
}

/// Biological genus known to be present on a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genus {
    pub genus: String,
    #[serde(default)]
    pub localised: Option<String>,
}

/// One step of an organic sampling sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganicScan {
    pub timestamp: u64,
    pub body_id: BodyId,
    pub scan_type: String,
    pub genus: String,
    pub species: String,
    #[serde(default)]
    pub variant: Option<String>,
}
