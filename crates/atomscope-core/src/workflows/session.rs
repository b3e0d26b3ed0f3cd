use crate::core::io::error::ParseError;
use crate::core::io::format::FileFormat;
use crate::core::io::parse_structure;
use crate::core::io::traits::ParseOptions;
use crate::core::models::type_map::TypeMapRow;
use crate::core::typemap;
use crate::engine::backend::InstanceBackend;
use crate::engine::batch::BatchView;
use crate::engine::config::{ConfigError, ViewerConfig};
use crate::engine::error::RuntimeError;
use crate::engine::playback::PlaybackClock;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::runtime::{ModelRuntime, ViewFit};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Summary of the last load attempt, for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseInfo {
    pub file_name: String,
    pub format: Option<FileFormat>,
    pub atom_count: usize,
    pub frame_count: usize,
    pub success: bool,
    pub error_msg: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub frame_count: usize,
    pub has_animation: bool,
    /// Some detected type id is still mapped to the placeholder element.
    pub needs_type_mapping: bool,
    pub view: Option<ViewFit>,
}

/// The caller-facing entry point: load files, edit the type map, drive playback.
///
/// A failed load never disturbs the model that is currently shown.
pub struct Session<B: InstanceBackend> {
    config: ViewerConfig,
    runtime: ModelRuntime<B>,
    playback: PlaybackClock,
    confirmed_type_map: Vec<TypeMapRow>,
    active_type_map: Vec<TypeMapRow>,
    detected_type_ids: BTreeSet<u32>,
    element_defaults: BTreeMap<u32, String>,
    parse_info: Option<ParseInfo>,
}

impl<B: InstanceBackend> Session<B> {
    pub fn new(backend: B, config: ViewerConfig) -> Result<Self, SessionError> {
        let playback = PlaybackClock::new(&config.playback)?;
        Ok(Self {
            runtime: ModelRuntime::new(backend, config.clone()),
            config,
            playback,
            confirmed_type_map: Vec::new(),
            active_type_map: Vec::new(),
            detected_type_ids: BTreeSet::new(),
            element_defaults: BTreeMap::new(),
            parse_info: None,
        })
    }

    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            format: self.config.parsing.format,
            type_overrides: self.config.parsing.type_overrides.clone(),
            sort_by_id: self.config.parsing.sort_by_id,
        }
    }

    /// User-supplied rows: confirmed edits first, then up-front overrides.
    fn user_rows(&self) -> Vec<TypeMapRow> {
        let overrides = self
            .config
            .parsing
            .type_overrides
            .iter()
            .map(|(&id, element)| TypeMapRow::new(id, element))
            .filter(|row| !row.is_unresolved());
        let rows: Vec<TypeMapRow> = self.confirmed_type_map.iter().cloned().chain(overrides).collect();
        typemap::normalize(&rows)
    }

    /// Parses `text`, resolves its type ids and renders it.
    ///
    /// # Errors
    ///
    /// Returns the parse or render failure. In both cases the previous model
    /// stays loaded and [`parse_info`](Self::parse_info) records the error.
    #[instrument(skip_all, name = "session_load", fields(filename = filename))]
    pub fn load(
        &mut self,
        text: &str,
        filename: &str,
        reporter: &ProgressReporter,
    ) -> Result<LoadOutcome, SessionError> {
        let options = self.parse_options();
        let format = FileFormat::detect(filename, text, options.format).ok();

        let model = match reporter.phase("Parsing", || parse_structure(text, filename, &options)) {
            Ok(model) => model,
            Err(e) => {
                self.record_failure(filename, format, &e.to_string());
                return Err(e.into());
            }
        };
        let format = model.source.as_ref().map(|s| s.format).or(format);
        let atom_count = model.atom_count();
        let frame_count = model.frame_count();

        let (detected, defaults, rows) = reporter.phase("Resolving types", || {
            let detected = if model.has_any_type_id() {
                typemap::detect_type_ids(model.primary())
            } else {
                BTreeSet::new()
            };
            let defaults = model.element_defaults.clone();
            let rows = if detected.is_empty() {
                Vec::new()
            } else {
                typemap::merge(&self.user_rows(), &detected, &defaults)
            };
            (detected, defaults, rows)
        });

        let summary = match reporter.phase("Building visuals", || {
            self.runtime.render_model(model.into_frames(), &rows)
        }) {
            Ok(summary) => summary,
            Err(e) => {
                self.record_failure(filename, format, &e.to_string());
                return Err(e.into());
            }
        };

        let needs_type_mapping = typemap::has_unresolved(&rows, &detected);
        if needs_type_mapping {
            let unresolved = typemap::unresolved_ids(&rows, &detected);
            warn!(?unresolved, "Some type ids are not mapped to an element yet.");
            reporter.report(Progress::Message(format!(
                "{} type id(s) need an element assignment",
                unresolved.len()
            )));
        }

        self.detected_type_ids = detected;
        self.element_defaults = defaults;
        self.active_type_map = rows;
        self.playback.pause();
        self.parse_info = Some(ParseInfo {
            file_name: filename.to_string(),
            format,
            atom_count,
            frame_count,
            success: true,
            error_msg: None,
        });
        info!(atoms = atom_count, frames = frame_count, "Structure loaded.");

        Ok(LoadOutcome {
            frame_count: summary.frame_count,
            has_animation: summary.has_animation,
            needs_type_mapping,
            view: summary.view,
        })
    }

    /// Reads `path` and loads it under its file name.
    pub fn load_path(&mut self, path: &Path, reporter: &ProgressReporter) -> Result<LoadOutcome, SessionError> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                self.record_failure(&filename, FileFormat::from_filename(&filename), &e.to_string());
                return Err(SessionError::Io {
                    path: path.to_string_lossy().to_string(),
                    source: e,
                });
            }
        };
        self.load(&text, &filename, reporter)
    }

    fn record_failure(&mut self, filename: &str, format: Option<FileFormat>, message: &str) {
        warn!(filename, error = message, "Load failed; keeping the previous model.");
        self.parse_info = Some(ParseInfo {
            file_name: filename.to_string(),
            format,
            atom_count: 0,
            frame_count: 0,
            success: false,
            error_msg: Some(message.to_string()),
        });
    }

    /// Stores `rows` as the confirmed mapping and rebuilds the visuals.
    ///
    /// Detected type ids missing from `rows` are mapped to the placeholder.
    /// Returns whether any detected type id is still unresolved.
    pub fn refresh_type_map(&mut self, rows: &[TypeMapRow]) -> Result<bool, SessionError> {
        let confirmed = typemap::normalize(rows);
        let active = typemap::merge(&confirmed, &self.detected_type_ids, &BTreeMap::new());
        self.runtime.on_type_map_changed(&active)?;
        self.confirmed_type_map = confirmed;
        self.active_type_map = active;
        Ok(self.has_unresolved_types())
    }

    /// Advances playback; applies and returns the new frame if it changed.
    pub fn tick(&mut self, now: Duration) -> Option<usize> {
        let target = self
            .playback
            .tick(now, self.runtime.current_frame(), self.runtime.frame_count())?;
        self.runtime.apply_frame(target);
        Some(target)
    }

    /// Starts playback. Without looping, playing from the last frame
    /// rewinds to the first.
    pub fn play(&mut self) {
        let frame_count = self.runtime.frame_count();
        if frame_count < 2 {
            return;
        }
        if !self.playback.is_looping() && self.runtime.current_frame() + 1 == frame_count {
            self.seek(0);
        }
        self.playback.play();
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    /// Jumps to `frame` (clamped), returning the frame shown.
    pub fn seek(&mut self, frame: usize) -> Option<usize> {
        let target = self.playback.seek(frame, self.runtime.frame_count())?;
        self.runtime.apply_frame(target);
        Some(target)
    }

    pub fn parse_info(&self) -> Option<&ParseInfo> {
        self.parse_info.as_ref()
    }

    pub fn has_any_type_id(&self) -> bool {
        self.runtime.has_any_type_id()
    }

    pub fn frame_count(&self) -> usize {
        self.runtime.frame_count()
    }

    pub fn current_frame(&self) -> usize {
        self.runtime.current_frame()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn visible_batches(&self) -> Vec<BatchView<'_, B::Buffer>> {
        self.runtime.visible_batches()
    }

    pub fn active_type_map_rows(&self) -> &[TypeMapRow] {
        &self.active_type_map
    }

    pub fn detected_type_ids(&self) -> &BTreeSet<u32> {
        &self.detected_type_ids
    }

    /// Element labels declared by the last loaded file.
    pub fn element_defaults(&self) -> &BTreeMap<u32, String> {
        &self.element_defaults
    }

    pub fn has_unresolved_types(&self) -> bool {
        typemap::has_unresolved(&self.active_type_map, &self.detected_type_ids)
    }

    pub fn unresolved_type_ids(&self) -> Vec<u32> {
        typemap::unresolved_ids(&self.active_type_map, &self.detected_type_ids)
    }

    pub fn runtime(&self) -> &ModelRuntime<B> {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut ModelRuntime<B> {
        &mut self.runtime
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }
}
