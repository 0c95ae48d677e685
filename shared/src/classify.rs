use crate::types::CongestionLevel;
use strum_macros::Display;

/// The three marker hues the dashboard knows how to draw. One fixed handle
/// per congestion level, resolved at compile time; there is no dynamic
/// asset lookup anywhere.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum MarkerColor {
    Green,
    Amber,
    Red,
}

/// Display treatment for a congestion level: marker hue, accent hue for
/// headings and tooltips, and which lamp of the three-lamp legend is lit.
/// All three facets carry the same hue; the map view uses the marker, the
/// detail view uses the accent and the lamp.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Treatment {
    pub marker: MarkerColor,
    pub accent: MarkerColor,
    pub lit_lamp: MarkerColor,
}

impl Treatment {
    const fn uniform(color: MarkerColor) -> Self {
        Self { marker: color, accent: color, lit_lamp: color }
    }
}

const HIGH: Treatment = Treatment::uniform(MarkerColor::Red);
const MEDIUM: Treatment = Treatment::uniform(MarkerColor::Amber);
const LOW: Treatment = Treatment::uniform(MarkerColor::Green);

/// Total over all levels; never fails. Anything outside High/Medium gets the
/// low-severity treatment.
#[must_use]
pub const fn classify(level: CongestionLevel) -> Treatment {
    match level {
        CongestionLevel::High => HIGH,
        CongestionLevel::Medium => MEDIUM,
        CongestionLevel::Low => LOW,
    }
}

/// Classification straight off a raw label, with the same fallback rule the
/// deserializer applies.
#[must_use]
pub fn classify_label(label: &str) -> Treatment {
    classify(CongestionLevel::from_label(label))
}
