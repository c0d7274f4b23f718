pub mod heat_pump;
pub mod household;
