use std::collections::HashMap;
use strum_macros::Display;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Fixed render order of the four signal cards.
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum Movement {
    Straight,
    Left,
    Right,
}

/// Maps a lane id (the `iot_id` of the live feed) to the compass direction
/// and turning movement it controls.
///
/// This is supplied configuration, not derived data: a lane id missing from
/// the table is undiscoverable in the detail view, so any deployment against
/// a differently-wired intersection must hand in its own table.
#[derive(Debug, Clone)]
pub struct LaneTable {
    entries: HashMap<String, (Direction, Movement)>,
}

impl LaneTable {
    #[must_use]
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Direction, Movement)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(id, direction, movement)| (id.into(), (direction, movement)))
                .collect(),
        }
    }

    #[must_use]
    pub fn resolve(&self, lane_id: &str) -> Option<(Direction, Movement)> {
        self.entries.get(lane_id).copied()
    }

    /// Reverse lookup: the lane id controlling `movement` out of `direction`,
    /// if the table wires one up. Right turns have no lane anywhere in the
    /// standard layout.
    #[must_use]
    pub fn lane_for(&self, direction: Direction, movement: Movement) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, &(d, m))| d == direction && m == movement)
            .map(|(id, _)| id.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LaneTable {
    /// The eight-lane layout of the simulated intersection: per compass
    /// direction, the `_0` lane takes the left turn and the `_1` lane goes
    /// straight.
    fn default() -> Self {
        use Direction::*;
        use Movement::*;

        Self::from_entries([
            ("n_t_0", North, Left),
            ("n_t_1", North, Straight),
            ("s_t_0", South, Left),
            ("s_t_1", South, Straight),
            ("e_t_0", East, Left),
            ("e_t_1", East, Straight),
            ("w_t_0", West, Left),
            ("w_t_1", West, Straight),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_covers_all_eight_lanes() {
        let table = LaneTable::default();
        assert_eq!(table.len(), 8);
        assert_eq!(table.resolve("n_t_0"), Some((Direction::North, Movement::Left)));
        assert_eq!(table.resolve("n_t_1"), Some((Direction::North, Movement::Straight)));
        assert_eq!(table.resolve("w_t_1"), Some((Direction::West, Movement::Straight)));
    }

    #[test]
    fn unknown_lane_resolves_to_none() {
        let table = LaneTable::default();
        assert_eq!(table.resolve("n_t_2"), None);
        assert_eq!(table.resolve(""), None);
    }

    #[test]
    fn no_direction_has_a_right_turn_lane() {
        let table = LaneTable::default();
        for direction in Direction::ALL {
            assert_eq!(table.lane_for(direction, Movement::Right), None);
            assert!(table.lane_for(direction, Movement::Left).is_some());
            assert!(table.lane_for(direction, Movement::Straight).is_some());
        }
    }
}
