//! Application services for enforcement settings.

mod settings;

pub use settings::CachedEnforcementSettings;
