pub mod bonds;
pub mod convert;
pub mod info;
pub mod play;
pub mod type_map;

use crate::config::AppConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use atomscope::engine::backend::HostBackend;
use atomscope::engine::progress::ProgressReporter;
use atomscope::workflows::session::{LoadOutcome, Session};
use tracing::info;

/// Builds a session over the in-memory backend and loads the configured input.
///
/// Configured type-map rows are confirmed before the load so they seed
/// the resolver.
pub fn open_session(app: &AppConfig, show_progress: bool) -> Result<(Session<HostBackend>, LoadOutcome)> {
    let mut session = Session::new(HostBackend::new(), app.viewer.clone())?;
    if !app.type_map_rows.is_empty() {
        session.refresh_type_map(&app.type_map_rows)?;
    }

    let handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(handler.get_callback());

    info!("Loading structure from {:?}", &app.input_path);
    let outcome = session.load_path(&app.input_path, &reporter)?;
    Ok((session, outcome))
}
