// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! framebound entry point
//!
//! Opens a window and runs the frame loop, or with `--headless N` runs N
//! ticks against in-memory collaborators and reports the final state.

use clap::Parser;
use framebound::core::audio::{MemoryQueue, CHANNELS};
use framebound::core::frame_loop::{FrameLoop, LoopState};
use framebound::core::surface::MemoryPresenter;
use framebound::core::{FrameError, LoopConfig, Result};
use framebound::frontend::Application;
use std::path::PathBuf;
use winit::event_loop::EventLoop;

/// Environment variable naming the config file when `--config` is absent
const CONFIG_ENV: &str = "FRAMEBOUND_CONFIG";

#[derive(Parser)]
#[command(name = "framebound")]
#[command(about = "Frame-paced gradient renderer with a synthesized tone", long_about = None)]
struct Cli {
    /// TOML configuration file (falls back to $FRAMEBOUND_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Initial window height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Base tone frequency in Hz
    #[arg(long)]
    tone: Option<f32>,

    /// Disable audio output
    #[arg(long)]
    mute: bool,

    /// Run this many ticks without a window or audio device
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,
}

impl Cli {
    /// Build the session configuration: file, then flag overrides
    fn loop_config(&self) -> Result<LoopConfig> {
        let path = self
            .config
            .clone()
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                LoopConfig::load(&path)?
            }
            None => LoopConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(tone) = self.tone {
            config.tone_hz = tone;
        }
        if self.mute {
            config.audio_enabled = false;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Run `ticks` ticks with in-memory presentation and audio
///
/// The queue is drained by one tick's worth of audio after every tick, as a
/// device playing in real time would.
fn run_headless(config: LoopConfig, ticks: u64) -> Result<()> {
    let per_tick = (config.sample_rate / config.target_fps) as usize * CHANNELS;
    let queue = config
        .audio_enabled
        .then(|| MemoryQueue::new(config.sample_rate as usize * CHANNELS));

    let mut frame_loop = FrameLoop::new(config, MemoryPresenter::new(), queue)?;
    frame_loop.start();

    for _ in 0..ticks {
        if frame_loop.tick(&[]) == LoopState::Terminated {
            break;
        }
        if let Some(queue) = frame_loop.audio_queue_mut() {
            queue.drain(per_tick);
        }
    }

    let control = frame_loop.control();
    log::info!(
        "Headless run done: {} ticks presented, {} skipped, offsets ({}, {}), phase {:.4}, {} samples",
        frame_loop.surface().backend().presented_frames(),
        frame_loop.skipped_presents(),
        control.x_offset(),
        control.y_offset(),
        frame_loop.oscillator().phase(),
        frame_loop.oscillator().running_sample_index()
    );
    Ok(())
}

fn run_windowed(config: LoopConfig) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|e| {
        FrameError::SubsystemInitFailure(format!("Failed to create event loop: {}", e))
    })?;

    let mut app = Application::new(config);

    log::info!("Running event loop...");
    event_loop
        .run_app(&mut app)
        .map_err(|e| FrameError::SubsystemInitFailure(format!("Event loop failed: {}", e)))?;

    match app.init_error() {
        Some(e) => Err(FrameError::SubsystemInitFailure(e.to_string())),
        None => Ok(()),
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.loop_config()?;
    match cli.headless {
        Some(ticks) => run_headless(config, ticks),
        None => run_windowed(config),
    }
}

fn main() {
    // .env may set RUST_LOG and FRAMEBOUND_CONFIG
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load .env: {}", e);
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting framebound...");

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
