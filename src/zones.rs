//! Named rectangular regions of interest and their configuration source.

mod config_file;
mod registry;
mod zone;

pub use config_file::{ZoneConfigFile, ZoneEntry};
pub use registry::{DEFAULT_MIN_ZONE_SIZE, ZoneRegistry};
pub use zone::{Zone, ZoneKind};
