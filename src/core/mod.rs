pub mod consumption;
pub mod energy_supply;
pub mod orientation;
pub mod units;
