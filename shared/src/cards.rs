use crate::lanes::{Direction, LaneTable, Movement};
use crate::types::{Junction, SignalState};
use tracing::debug;

/// Signal and vehicle count for one lane of a signal card. A `None` count
/// renders as "N/A" (the right-turn placeholder); a resolved-but-silent lane
/// reads zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneReading {
    pub signal: SignalState,
    pub vehicle_count: Option<u32>,
}

impl LaneReading {
    /// Default for a lane the table knows but the device list does not
    /// report: no vehicles, held at red.
    pub const SILENT: Self = Self { signal: SignalState::Red, vehicle_count: Some(0) };

    /// The fixed right-turn placeholder: no lane exists, count reads "N/A".
    pub const UNAVAILABLE: Self = Self { signal: SignalState::Red, vehicle_count: None };
}

/// One compass direction's summary on the junction detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalCard {
    pub direction: Direction,
    pub left: LaneReading,
    pub straight: LaneReading,
    pub right: LaneReading,
}

impl SignalCard {
    /// Aggregate vehicle count for the direction: left plus straight. The
    /// right placeholder contributes nothing.
    #[must_use]
    pub fn total_vehicles(&self) -> u32 {
        self.left.vehicle_count.unwrap_or(0) + self.straight.vehicle_count.unwrap_or(0)
    }
}

/// Builds the four signal cards for a junction by cross-referencing its
/// device list against the lane table, in fixed North, South, East, West
/// order.
#[must_use]
pub fn assemble(junction: &Junction, lanes: &LaneTable) -> [SignalCard; 4] {
    for device in &junction.iot {
        if lanes.resolve(&device.iot_id).is_none() {
            debug!(
                junction = %junction.id,
                lane = %device.iot_id,
                "device has no lane-table entry and will not appear on a signal card"
            );
        }
    }

    Direction::ALL.map(|direction| SignalCard {
        direction,
        left: read_lane(junction, lanes, direction, Movement::Left),
        straight: read_lane(junction, lanes, direction, Movement::Straight),
        right: LaneReading::UNAVAILABLE,
    })
}

fn read_lane(
    junction: &Junction,
    lanes: &LaneTable,
    direction: Direction,
    movement: Movement,
) -> LaneReading {
    let Some(lane_id) = lanes.lane_for(direction, movement) else {
        return LaneReading::SILENT;
    };

    junction
        .iot
        .iter()
        .find(|device| device.iot_id == lane_id)
        .map(|device| LaneReading {
            signal: device.current_signal,
            vehicle_count: Some(device.vehicle_count),
        })
        .unwrap_or(LaneReading::SILENT)
}
