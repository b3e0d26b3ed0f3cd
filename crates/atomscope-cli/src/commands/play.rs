use crate::cli::PlayArgs;
use crate::commands::open_session;
use crate::config::build_config;
use crate::error::Result;
use atomscope::core::utils::geometry;
use atomscope::engine::backend::InstanceBackend;
use atomscope::workflows::session::Session;
use nalgebra::Point3;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub fn run(args: PlayArgs, config_path: Option<&Path>, set_values: &[String], quiet: bool) -> Result<()> {
    let app = build_config(&args.input, config_path, set_values, Some(&args.playback))?;
    let (mut session, outcome) = open_session(&app, !quiet)?;

    if !outcome.has_animation {
        println!("Single-frame structure; nothing to play.");
        return Ok(());
    }

    info!(
        ticks = args.ticks,
        interval_ms = args.interval_ms,
        fps = app.viewer.playback.fps,
        "Starting headless playback."
    );
    for (tick, frame, centroid) in simulate(&mut session, args.ticks, Duration::from_millis(args.interval_ms)) {
        println!(
            "tick {:>4}  frame {:>4}  centroid ({:.4}, {:.4}, {:.4})",
            tick, frame, centroid.x, centroid.y, centroid.z
        );
    }
    Ok(())
}

/// Drives `ticks` clock ticks `interval` apart and records the shown frame
/// and the centroid of the displayed positions after each one.
pub fn simulate<B: InstanceBackend>(
    session: &mut Session<B>,
    ticks: usize,
    interval: Duration,
) -> Vec<(usize, usize, Point3<f64>)> {
    session.play();
    let mut samples = Vec::with_capacity(ticks);
    for tick in 0..ticks {
        session.tick(interval * tick as u32);
        let centroid = geometry::centroid(session.runtime().positions()).unwrap_or_else(Point3::origin);
        samples.push((tick, session.current_frame(), centroid));
    }
    session.pause();
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::*;

    #[test]
    fn playback_keeps_the_centroid_at_the_reference() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_for(write_input(dir.path(), "dump.run", TWO_FRAME_DUMP), vec![]);
        let (mut session, _) = open_session(&app, false).unwrap();

        let samples = simulate(&mut session, 4, Duration::from_millis(100));
        let frames: Vec<usize> = samples.iter().map(|s| s.1).collect();
        assert_eq!(frames, vec![0, 1, 0, 1]);

        let reference = session.runtime().reference_center().unwrap();
        for (_, _, centroid) in samples {
            assert!((centroid - reference).norm() < 1e-9);
        }
    }
}
