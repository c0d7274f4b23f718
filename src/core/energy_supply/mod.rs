pub mod elec_battery;
pub mod pv;
pub mod tariff;
