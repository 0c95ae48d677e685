use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::Display;

/// Coarse traffic-density indicator reported per junction.
///
/// The upstream feed is free-form about this field, so anything that is not
/// `High` or `Medium` deserializes to `Low`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum CongestionLevel {
    High,
    Medium,
    #[default]
    #[serde(other)]
    Low,
}

impl CongestionLevel {
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Same tolerance as the serde path, for labels that arrive as plain
    /// strings: unrecognized values collapse to `Low`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "High" => Self::High,
            "Medium" => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// Signal color reported by one lane controller. Amber exists in the upstream
/// enumeration but never drives a lane in the simulated phase plan.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum SignalState {
    Green,
    Amber,
    #[default]
    #[serde(other)]
    Red,
}

/// One simulated sensor-controller tied to a single traffic lane.
///
/// The two feed revisions disagree on which numeric fields are present: the
/// bundled dataset carries the countdown timer, the live endpoint carries the
/// per-lane vehicle count. Both default to zero when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IotDevice {
    pub iot_id: String,
    #[serde(default)]
    pub current_signal: SignalState,
    #[serde(default)]
    pub current_signal_timer: u32,
    #[serde(default)]
    pub vehicle_count: u32,
}

/// A road intersection: the primary mapped entity, one marker on the map and
/// one detail page. Replaced wholesale on every poll tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Junction {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub congestion: CongestionLevel,
    #[serde(default)]
    pub vehicle_count: u32,
    #[serde(default)]
    pub iot: Vec<IotDevice>,
}

// The bundled dataset uses numeric ids, the live endpoint uses strings.
// Routing and lookups compare ids as strings either way.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
