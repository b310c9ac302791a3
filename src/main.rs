//! Avatar - speaking, auto-rotating 3D avatar runtime
//!
//! Loads the avatar mesh, speaks a line of text with a matching mouth
//! animation, and runs the tick loop headless until both are done.
//!
//! Usage: `avatar [MESH_PATH] [TEXT...]`

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use avatar::{AppEvent, AppSettings, AvatarApp};
use avatar_assets::MeshLoader;
use avatar_speech::engine_from_config;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_GREETING: &str = "Merhaba! Size nasıl yardımcı olabilirim?";

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting avatar runtime...");

    let settings = AppSettings::load();

    let mut args = std::env::args().skip(1);
    let mesh_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.model.default_path.clone());
    let text = {
        let rest: Vec<String> = args.collect();
        if rest.is_empty() {
            DEFAULT_GREETING.to_string()
        } else {
            rest.join(" ")
        }
    };

    // Mesh loading happens once, before the tick loop starts
    let mesh = MeshLoader::load_or_empty(&mesh_path);
    if !mesh.is_loaded() {
        warn!("No 3D model loaded from {:?}, continuing without one", mesh_path);
    }

    let engine = engine_from_config(&settings.speech);
    let mut app =
        AvatarApp::new(&settings, mesh, engine).context("Failed to start speech worker")?;

    app.say(&text).context("Failed to queue speech")?;

    let tick = Duration::from_millis(settings.viewer.tick_interval_ms.max(1));
    let mut last_frame = Instant::now();

    // Tick loop
    loop {
        thread::sleep(tick);
        let now = Instant::now();
        let delta = now.duration_since(last_frame);
        last_frame = now;

        for event in app.update(delta) {
            match event {
                AppEvent::SpeechStarted(_) => info!("Speech started"),
                AppEvent::SpeechFinished { outcome, .. } => {
                    info!("Speech finished: {:?}", outcome)
                }
                AppEvent::FrameChanged(index) => {
                    debug!(
                        "Frame {} ({:.0}%)",
                        index,
                        app.player().progress() * 100.0
                    )
                }
                AppEvent::AnimationCompleted => info!("Mouth animation completed"),
            }
        }

        if !app.is_speaking() && !app.player().is_playing() {
            break;
        }
    }

    let state = app.rotation().state();
    info!(
        "Done - orientation ({:.1}, {:.1}, {:.1}) deg, scale {:.2}, {} vertices on display",
        state.angles.x,
        state.angles.y,
        state.angles.z,
        state.scale,
        app.displayed_vertices().len()
    );

    Ok(())
}
