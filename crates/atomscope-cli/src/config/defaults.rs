use atomscope::engine::config as core_config;

pub struct DefaultsConfig {
    pub bond_factor: f64,
    pub sort_by_id: bool,
    pub atom_scale: f64,
    pub bond_radius: f64,
    pub fps: f64,
    pub looping: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            bond_factor: core_config::DEFAULT_BOND_FACTOR,
            sort_by_id: true,
            atom_scale: core_config::DEFAULT_ATOM_SCALE,
            bond_radius: core_config::DEFAULT_BOND_RADIUS,
            fps: core_config::DEFAULT_FPS,
            looping: true,
        }
    }
}
