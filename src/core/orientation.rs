use serde::Deserialize;
use std::fmt::{Display, Formatter};

/// Tilt of the module plane from horizontal, in degrees (0 = horizontal, 90 = vertical).
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Slope {
    pub value: f64,
    #[serde(default)]
    pub optimal: bool,
}

impl Slope {
    pub const HORIZONTAL: Slope = Slope::new(0.);
    pub const VERTICAL: Slope = Slope::new(90.);

    pub const fn new(value: f64) -> Self {
        Self {
            value,
            optimal: false,
        }
    }
}

/// Direction the module plane faces, in degrees, using the PVGIS convention
/// (0 = south, -90 = east, 90 = west, 180 = north).
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Azimuth {
    pub value: f64,
    #[serde(default)]
    pub optimal: bool,
}

impl Azimuth {
    pub const SOUTH: Azimuth = Azimuth::new(0.);
    pub const EAST: Azimuth = Azimuth::new(-90.);
    pub const WEST: Azimuth = Azimuth::new(90.);
    pub const NORTH: Azimuth = Azimuth::new(180.);

    pub const fn new(value: f64) -> Self {
        Self {
            value,
            optimal: false,
        }
    }
}

/// Mounting geometry of a module group or of an irradiance data set.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Orientation {
    pub slope: Slope,
    pub azimuth: Azimuth,
}

impl Orientation {
    pub const fn new(slope: Slope, azimuth: Azimuth) -> Self {
        Self { slope, azimuth }
    }

    /// Whether two orientations describe the same geometry. The `optimal` flags are not compared.
    ///
    /// With no tolerance the slope and azimuth values must be identical, which is only reliable
    /// when both sides come from the same fixed set of values (e.g. the constants above).
    pub fn matches(&self, other: &Orientation, tolerance: Option<f64>) -> bool {
        match tolerance {
            None => {
                self.slope.value == other.slope.value && self.azimuth.value == other.azimuth.value
            }
            Some(abs_tol) => {
                is_close!(self.slope.value, other.slope.value, abs_tol = abs_tol)
                    && is_close!(self.azimuth.value, other.azimuth.value, abs_tol = abs_tol)
            }
        }
    }

    /// Sum of the slope and azimuth differences, in degrees.
    pub fn distance(&self, other: &Orientation) -> f64 {
        (self.slope.value - other.slope.value).abs()
            + (self.azimuth.value - other.azimuth.value).abs()
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "slope {}°, azimuth {}°",
            self.slope.value, self.azimuth.value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use serde_json::json;

    #[rstest]
    fn test_named_azimuths() {
        assert_eq!(Azimuth::SOUTH.value, 0.);
        assert_eq!(Azimuth::EAST.value, -90.);
        assert_eq!(Azimuth::WEST.value, 90.);
        assert_eq!(Azimuth::NORTH.value, 180.);
        assert!(!Azimuth::EAST.optimal);
    }

    #[rstest]
    fn test_exact_match_ignores_optimal_flag() {
        let module = Orientation::new(Slope::VERTICAL, Azimuth::EAST);
        let data_set = Orientation::new(
            Slope {
                value: 90.,
                optimal: true,
            },
            Azimuth::new(-90.),
        );
        assert!(module.matches(&data_set, None));
    }

    #[rstest]
    fn test_exact_match_rejects_near_values() {
        let module = Orientation::new(Slope::new(45.), Azimuth::new(10.));
        let data_set = Orientation::new(Slope::new(45.000001), Azimuth::new(10.));
        assert!(!module.matches(&data_set, None));
        assert!(module.matches(&data_set, Some(1e-3)));
    }

    #[rstest]
    fn test_tolerance_match_rejects_other_orientations() {
        let module = Orientation::new(Slope::new(45.), Azimuth::new(10.));
        let data_set = Orientation::new(Slope::VERTICAL, Azimuth::new(10.));
        assert!(!module.matches(&data_set, Some(1.)));
    }

    #[rstest]
    fn test_distance() {
        let module = Orientation::new(Slope::new(45.), Azimuth::new(10.));
        assert_eq!(module.distance(&module), 0.);
        assert_eq!(
            module.distance(&Orientation::new(Slope::VERTICAL, Azimuth::EAST)),
            145.
        );
    }

    #[rstest]
    fn test_deserialize_without_optimal_flag() {
        let orientation: Orientation = serde_json::from_value(json!({
            "slope": {"value": 35.0},
            "azimuth": {"value": 0.0, "optimal": true}
        }))
        .unwrap();
        assert_eq!(orientation.slope, Slope::new(35.));
        assert!(orientation.azimuth.optimal);
        assert_eq!(orientation.to_string(), "slope 35°, azimuth 0°");
    }
}
