//! Interactive tone session.

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Args;
use crossbeam_channel::{Receiver, select, tick, unbounded};
use tonegen_config::{AudioSection, ToneConfig};
use tonegen_engine::{ScopeFrame, ScopeLoop, ToneEngine, ToneSettings};
use tonegen_io::{BackendStreamConfig, CpalBackend, ScopeReader, ToneOutput, open_output};

use crate::display::{preview_sparkline, sparkline};
use crate::session::{HELP, Session, Step};

/// Width of the live scope line in characters.
const SCOPE_COLUMNS: usize = 64;

#[derive(Args)]
pub struct PlayArgs {
    /// Output device name (partial match)
    #[arg(short, long)]
    device: Option<String>,

    /// Sample rate (overrides the config file)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Buffer size in frames (overrides the config file)
    #[arg(long)]
    buffer_size: Option<u32>,

    /// Start sounding immediately
    #[arg(long)]
    autoplay: bool,
}

fn stream_config(audio: &AudioSection) -> BackendStreamConfig {
    BackendStreamConfig {
        sample_rate: audio.sample_rate,
        buffer_size: audio.buffer_size,
        channels: audio.channels,
        device_name: audio.device.clone(),
    }
}

/// Read stdin on its own thread so the main loop can keep ticking.
fn spawn_line_reader() -> Receiver<String> {
    let (tx, rx) = unbounded();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

struct Audio {
    backend: CpalBackend,
    stream: BackendStreamConfig,
    history: usize,
    frame_size: usize,
    preview_width: usize,
}

impl Audio {
    /// Open the output and attach `engine` to it.
    ///
    /// On failure the error is logged and the engine is left detached.
    fn connect(&self, engine: &mut ToneEngine) -> Option<ToneOutput> {
        match open_output(&self.backend, &self.stream, self.history) {
            Ok(output) => {
                output.attach(engine);
                Some(output)
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    device = ?self.stream.device_name,
                    "audio output unavailable"
                );
                None
            }
        }
    }

    fn scope(&self, output: Option<&ToneOutput>) -> ScopeLoop<Option<ScopeReader>> {
        ScopeLoop::new(
            output.map(ToneOutput::scope),
            self.frame_size,
            self.preview_width,
        )
    }
}

pub fn run(args: PlayArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = ToneConfig::load_or_default(config_path)?;
    if args.device.is_some() {
        config.audio.device = args.device;
    }
    if let Some(rate) = args.sample_rate {
        config.audio.sample_rate = rate;
    }
    if let Some(size) = args.buffer_size {
        config.audio.buffer_size = size;
    }
    config.validate()?;

    let audio = Audio {
        backend: CpalBackend::new(),
        stream: stream_config(&config.audio),
        history: config.scope.history,
        frame_size: config.scope.frame_size,
        preview_width: config.scope.preview_width,
    };

    let mut engine = ToneEngine::new(ToneSettings::default(), config.timing());
    let mut output = audio.connect(&mut engine);
    if output.is_none() {
        println!("No audio output; settings are recorded until 'reinit' succeeds.");
    }
    let mut session = Session::new(engine, audio.scope(output.as_ref()));

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    println!("tonegen - empty line toggles, Ctrl+C quits.\n{HELP}\n");
    if args.autoplay
        && let Step::Reply(text) = session.handle_line("play")
    {
        print_reply(&text);
    }

    let lines = spawn_line_reader();
    let ticker = tick(Duration::from_secs_f64(1.0 / f64::from(config.scope.refresh_hz)));

    while running.load(Ordering::SeqCst) {
        select! {
            recv(lines) -> line => {
                let Ok(line) = line else { break };
                match session.handle_line(&line) {
                    Step::Reply(text) => print_reply(&text),
                    Step::Quit => break,
                    Step::Reinit => {
                        session.engine_mut().detach();
                        drop(output.take());
                        output = audio.connect(session.engine_mut());
                        session.replace_scope(audio.scope(output.as_ref()));
                        if output.is_some() {
                            println!("audio output reopened");
                        } else {
                            println!("error: audio output unavailable");
                        }
                    }
                }
            }
            recv(ticker) -> _ => {
                if output.as_ref().is_some_and(ToneOutput::has_failed) {
                    session.engine_mut().detach();
                    output = None;
                    println!("\naudio output failed; type 'reinit' to retry");
                }
                // the idle preview is always drawn; live lines only with scope on
                let frame = session.tick();
                if session.show_scope() || !matches!(frame, Some(ScopeFrame::Live(_))) {
                    draw_frame(frame);
                }
            }
        }
    }

    fade_out(&mut session, output.as_ref());
    println!();
    Ok(())
}

fn print_reply(text: &str) {
    if !text.is_empty() {
        println!("{text}");
    }
}

fn draw_frame(frame: Option<ScopeFrame>) {
    match frame {
        Some(ScopeFrame::Live(bytes)) => {
            print!("\r{}", sparkline(&bytes, SCOPE_COLUMNS));
            std::io::stdout().flush().ok();
        }
        Some(ScopeFrame::Preview(points)) => println!("\r{}", preview_sparkline(&points)),
        None => {}
    }
}

/// Stop and give the release time to play out before the stream is dropped.
fn fade_out(session: &mut Session<Option<ScopeReader>>, output: Option<&ToneOutput>) {
    session.engine_mut().stop();
    let Some(output) = output else {
        return;
    };
    let engine = session.engine();
    let settings = engine.settings();
    #[allow(clippy::cast_precision_loss)]
    let lookahead = output.lookahead_frames() as f64 / f64::from(output.sample_rate());
    let wait = f64::from(settings.release_ms()) / 1000.0
        + engine.timing().release_guard
        + lookahead;
    std::thread::sleep(Duration::from_secs_f64(wait.min(2.0)));
    tracing::debug!(wait, "session ended");
}
