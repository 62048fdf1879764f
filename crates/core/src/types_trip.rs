use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a trip was made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransportMode {
    Walking,
    Cycling,
    PublicTransport,
    RideShare,
    OwnVehicle,
    #[default]
    Unknown,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Cycling => "cycling",
            Self::PublicTransport => "publicTransport",
            Self::RideShare => "rideShare",
            Self::OwnVehicle => "ownVehicle",
            Self::Unknown => "unknown",
        }
    }
}

impl From<String> for TransportMode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "walking" => Self::Walking,
            "cycling" => Self::Cycling,
            "publicTransport" => Self::PublicTransport,
            "rideShare" => Self::RideShare,
            "ownVehicle" => Self::OwnVehicle,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A recorded commute. Trips are written by an external client and never
/// mutated by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "startLocation")]
    pub start_location: Option<GeoPoint>,
    #[serde(rename = "endLocation")]
    pub end_location: Option<GeoPoint>,
    #[serde(rename = "startAddress")]
    pub start_address: Option<String>,
    #[serde(rename = "endAddress")]
    pub end_address: Option<String>,
    #[serde(rename = "startTime")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(rename = "endTime")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(rename = "tripDate")]
    pub trip_date: DateTime<Utc>,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
    #[serde(rename = "transportMode")]
    pub transport_mode: TransportMode,
    #[serde(rename = "carbonCredits")]
    pub carbon_credits: f64,
    #[serde(rename = "isWorkFromHome")]
    pub is_work_from_home: bool,
}

/// Trip creation data, used by ingestion clients and fixtures.
#[derive(Debug, Clone)]
pub struct CreateTrip {
    pub id: Option<String>,
    pub user_id: String,
    pub start_location: Option<GeoPoint>,
    pub end_location: Option<GeoPoint>,
    pub start_address: Option<String>,
    pub end_address: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub trip_date: DateTime<Utc>,
    pub distance_km: f64,
    pub transport_mode: TransportMode,
    pub carbon_credits: f64,
    pub is_work_from_home: bool,
}

impl CreateTrip {
    pub fn new(user_id: impl Into<String>, trip_date: DateTime<Utc>, carbon_credits: f64) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            start_location: None,
            end_location: None,
            start_address: None,
            end_address: None,
            start_time: None,
            end_time: None,
            trip_date,
            distance_km: 0.0,
            transport_mode: TransportMode::Unknown,
            carbon_credits,
            is_work_from_home: false,
        }
    }

    pub fn with_mode(mut self, mode: TransportMode) -> Self {
        self.transport_mode = mode;
        self
    }

    pub fn with_distance_km(mut self, distance_km: f64) -> Self {
        self.distance_km = distance_km;
        self
    }

    pub fn work_from_home(mut self) -> Self {
        self.is_work_from_home = true;
        self
    }

    pub fn with_route(
        mut self,
        start: (GeoPoint, impl Into<String>),
        end: (GeoPoint, impl Into<String>),
    ) -> Self {
        self.start_location = Some(start.0);
        self.start_address = Some(start.1.into());
        self.end_location = Some(end.0);
        self.end_address = Some(end.1.into());
        self
    }
}
