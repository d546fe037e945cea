//! Output device discovery via cpal.

use crate::Result;
use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host};

/// Fallback when a device cannot report its default config.
const FALLBACK_SAMPLE_RATE: u32 = 48000;

/// Extract device name via `description()` (cpal 0.17+).
pub(crate) fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Output device information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
    /// Default output channel count.
    pub channels: u16,
    /// Whether this is the host's default output.
    pub is_default: bool,
}

fn describe(device: &Device, is_default: bool) -> Option<AudioDevice> {
    let name = device_name(device).ok()?;
    let (default_sample_rate, channels) = device
        .default_output_config()
        .map(|c| (c.sample_rate(), c.channels()))
        .unwrap_or((FALLBACK_SAMPLE_RATE, 2));
    Some(AudioDevice {
        name,
        default_sample_rate,
        channels,
        is_default,
    })
}

pub(crate) fn default_output(host: &Host) -> Option<AudioDevice> {
    host.default_output_device()
        .and_then(|d| describe(&d, true))
}

pub(crate) fn output_devices(host: &Host) -> Vec<AudioDevice> {
    let default_name = host
        .default_output_device()
        .and_then(|d| device_name(&d).ok());
    let Ok(devices) = host.output_devices() else {
        tracing::warn!("output device enumeration failed");
        return Vec::new();
    };
    devices
        .filter_map(|d| {
            let is_default = device_name(&d).ok() == default_name;
            describe(&d, is_default)
        })
        .collect()
}

/// List output devices on the default host.
pub fn list_output_devices() -> Result<Vec<AudioDevice>> {
    Ok(output_devices(&cpal::default_host()))
}

/// The default host's default output device, if any.
pub fn default_output_device() -> Result<Option<AudioDevice>> {
    Ok(default_output(&cpal::default_host()))
}
