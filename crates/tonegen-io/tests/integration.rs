//! Integration tests for the output path, driven by an in-memory backend
//! that stands in for the audio thread.

use std::sync::{Arc, Mutex};

use tonegen_engine::{EngineState, Slot, ToneEngine};
use tonegen_io::{
    AudioBackend, AudioDevice, BackendStreamConfig, Error, ErrorCallback, OutputCallback,
    Result, StreamHandle, open_output,
};

/// Callbacks captured by [`ManualBackend`].
#[derive(Default)]
struct Captured {
    output: Option<OutputCallback>,
    error: Option<ErrorCallback>,
}

#[derive(Clone, Default)]
struct ManualBackend {
    captured: Arc<Mutex<Captured>>,
    refuse: bool,
}

impl ManualBackend {
    /// Pull one buffer the way the audio thread would.
    fn pull(&self, buffer: &mut [f32]) {
        let mut captured = self.captured.lock().unwrap();
        (captured.output.as_mut().unwrap())(buffer);
    }

    fn fail(&self, message: &str) {
        let mut captured = self.captured.lock().unwrap();
        (captured.error.as_mut().unwrap())(message);
    }
}

impl AudioBackend for ManualBackend {
    fn name(&self) -> &str {
        "manual"
    }

    fn list_devices(&self) -> Result<Vec<AudioDevice>> {
        Ok(vec![AudioDevice {
            name: "Manual Output".into(),
            default_sample_rate: 48000,
            channels: 2,
            is_default: true,
        }])
    }

    fn default_output_device(&self) -> Result<Option<AudioDevice>> {
        Ok(self.list_devices()?.into_iter().next())
    }

    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        callback: OutputCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle> {
        if self.refuse {
            return Err(Error::DeviceNotFound(format!(
                "no output device matching '{}'",
                config.device_name.as_deref().unwrap_or("default")
            )));
        }
        let mut captured = self.captured.lock().unwrap();
        captured.output = Some(callback);
        captured.error = Some(error_callback);
        Ok(StreamHandle::new(()))
    }
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}

// ---------------------------------------------------------------------------
// Stream wiring
// ---------------------------------------------------------------------------

#[test]
fn engine_plays_through_backend_callback() {
    let backend = ManualBackend::default();
    let output = open_output(&backend, &BackendStreamConfig::default(), 1024).unwrap();
    let mut engine = ToneEngine::default();
    output.attach(&mut engine);
    engine.play();

    // 2 channels x 2400 frames = 50 ms
    let mut buffer = vec![0.0f32; 4800];
    backend.pull(&mut buffer);
    let level = peak(&buffer[2400..]);
    assert!(
        (level - 0.5).abs() < 0.01,
        "Expected ~0.5 after attack, got {level}"
    );
    // interleaved channels carry the same mono mix
    assert_eq!(buffer[1000], buffer[1001]);
    assert!(engine.now().unwrap() > 0.049);
}

#[test]
fn scope_sees_rendered_audio() {
    let backend = ManualBackend::default();
    let output = open_output(&backend, &BackendStreamConfig::default(), 512).unwrap();
    let mut engine = ToneEngine::default();
    output.attach(&mut engine);
    engine.play();

    let mut buffer = vec![0.0f32; 2048];
    backend.pull(&mut buffer);
    assert_eq!(output.scope().samples_written(), 1024);
}

#[test]
fn stream_error_marks_output_failed_once() {
    let backend = ManualBackend::default();
    let output = open_output(&backend, &BackendStreamConfig::default(), 64).unwrap();
    assert!(!output.has_failed());
    backend.fail("device unplugged");
    backend.fail("device unplugged");
    assert!(output.has_failed());
}

#[test]
fn reopen_after_failure_resets_engine() {
    let backend = ManualBackend::default();
    let config = BackendStreamConfig::default();
    let first = open_output(&backend, &config, 64).unwrap();
    let mut engine = ToneEngine::default();
    first.attach(&mut engine);
    engine.play();
    backend.fail("xrun");
    assert!(first.has_failed());

    engine.detach();
    drop(first);
    let second = open_output(&backend, &config, 64).unwrap();
    second.attach(&mut engine);
    assert_eq!(engine.state(), EngineState::Idle);
    engine.play();
    assert!(engine.is_playing());
}

#[test]
fn build_failure_is_reported() {
    let backend = ManualBackend {
        refuse: true,
        ..ManualBackend::default()
    };
    let config = BackendStreamConfig {
        device_name: Some("usb".into()),
        ..BackendStreamConfig::default()
    };
    let err = open_output(&backend, &config, 64).unwrap_err();
    assert!(matches!(err, Error::DeviceNotFound(_)));
    assert!(err.to_string().contains("usb"));
}

#[test]
fn mono_config_renders_one_channel() {
    let backend = ManualBackend::default();
    let config = BackendStreamConfig {
        channels: 1,
        ..BackendStreamConfig::default()
    };
    let output = open_output(&backend, &config, 64).unwrap();
    assert_eq!(output.channels(), 1);
    assert_eq!(output.sample_rate(), 48000);
}

#[test]
fn lookahead_covers_largest_buffer() {
    let backend = ManualBackend::default();
    let output = open_output(&backend, &BackendStreamConfig::default(), 64).unwrap();
    assert_eq!(output.lookahead_frames(), 512);

    // 2 channels x 2048 frames
    let mut buffer = vec![0.0f32; 4096];
    backend.pull(&mut buffer);
    assert_eq!(output.lookahead_frames(), 2048);

    let mut engine = ToneEngine::default();
    output.attach(&mut engine);
    engine.play();
    let voice = engine.voice(Slot::Primary).unwrap();
    // the attack starts at frame 2048 + 2048 and lasts 480 frames
    let at_anchor = voice.gain_at(4096.0 / 48000.0);
    let mid_attack = voice.gain_at(4336.0 / 48000.0);
    assert!(
        at_anchor.abs() < 1e-6,
        "Expected silence at the anchor, got {at_anchor}"
    );
    assert!(
        (mid_attack - 0.5).abs() < 0.01,
        "Expected half attack 240 frames later, got {mid_attack}"
    );
}
