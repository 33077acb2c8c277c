//! Input handling: file detection, profile/job loading and field helpers

pub mod fields;
pub mod file_detector;
pub mod manager;

pub use manager::InputManager;
