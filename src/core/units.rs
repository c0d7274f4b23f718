pub const WATTS_PER_KILOWATT: u32 = 1_000;
/// Irradiance at which module peak power is rated (standard test conditions), in W/m2.
pub const REFERENCE_IRRADIANCE: f64 = 1_000.;

pub(crate) fn watt_hours_to_kilowatt_hours(energy: f64) -> f64 {
    energy / WATTS_PER_KILOWATT as f64
}
