//! TOML-backed configuration
//!
//! Schemas are declared with [`config_struct!`](crate::config_struct) and
//! loaded into a process-wide instance by [`load_config_from_path`].

pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::{CacheSection, Config, StressSection};
pub use utils::{
    get_config_clone, load_config_from_path, parse_config_file, reload_config_from_path,
    with_config, CONFIG, CONFIG_FILE_PATH,
};
