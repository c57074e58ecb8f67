//! Paths and user settings

pub mod paths;
pub mod settings;

pub use paths::TallyPaths;
pub use settings::Settings;
