pub mod alerts;
pub mod cards;
pub mod classify;
pub mod constants;
pub mod feed;
pub mod lanes;
pub mod types;

pub use alerts::*;
pub use cards::*;
pub use classify::*;
pub use feed::*;
pub use lanes::*;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_dataset_parses_and_is_mappable() {
        let junctions = bundled_junctions().unwrap();
        assert!(!junctions.is_empty());
        for junction in &junctions {
            assert!(!junction.id.is_empty());
            assert!(!junction.name.is_empty());
            // Everything in the bundle sits inside the initial viewport's
            // general area.
            assert!((junction.lat - constants::MAP_CENTER_LAT).abs() < 1.0);
            assert!((junction.lng - constants::MAP_CENTER_LNG).abs() < 1.0);
        }
    }
}
