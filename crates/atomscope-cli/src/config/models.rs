use atomscope::core::models::type_map::TypeMapRow;
use atomscope::engine::config::ViewerConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub input_path: PathBuf,
    pub viewer: ViewerConfig,
    /// Rows from `--type`, `--type-map` and the `[type-map]` table, in that precedence.
    pub type_map_rows: Vec<TypeMapRow>,
}
