pub mod presets;
pub mod result;
pub mod state;
pub mod test_config;
pub mod timer;
