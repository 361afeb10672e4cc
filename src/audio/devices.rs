//! Contains the [`AudioDevice`] struct and the [`output_or_silent`] function.
//! Used at startup to pick the output device.

use std::{collections::VecDeque, sync::Arc};

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Device, Stream,
};
use parking_lot::Mutex;
use tracing::{error, info, warn};

use crate::{
    error::{Error, Result},
    misc::Similarity,
};

use super::player::{Output, SilentOutput};

/// An open output stream.
/// The stream pulls samples from a shared queue that [`DeviceQueue`] handles push into.
/// Dropping the device stops the stream.
pub struct AudioDevice {
    name: String,
    queue: DeviceQueue,
    _stream: Stream,
}

/// Cheap handle to the sample queue of an [`AudioDevice`].
/// Unlike the device itself it can be moved to other threads.
#[derive(Clone)]
pub struct DeviceQueue {
    samples: Arc<Mutex<VecDeque<f32>>>,
    sample_rate: u32,
}

impl AudioDevice {
    /// Opens the default output device, or the one whose name is most similar to `wanted`.
    /// Note: names are compared with the dice coefficient, so `wanted` does not need to be exact.
    pub fn open(wanted: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();
        let device = match wanted.map(str::to_lowercase) {
            Some(wanted) if wanted != "default" => pick_device(&host, &wanted)?,
            _ => host
                .default_output_device()
                .ok_or_else(|| Error::audio("no default output device"))?,
        };

        let name = device.name().unwrap_or_else(|_| "unknown".to_owned());
        let supported = device.default_output_config().map_err(Error::audio)?;
        let channels = supported.channels() as usize;
        let queue = DeviceQueue {
            samples: Arc::new(Mutex::new(VecDeque::new())),
            sample_rate: supported.sample_rate().0,
        };

        let stream = {
            let samples = queue.samples.clone();
            device
                .build_output_stream(
                    &supported.config(),
                    move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                        // Same sample on every channel of a frame
                        let mut samples = samples.lock();
                        let mut last = 0.0;
                        for (i, e) in data.iter_mut().enumerate() {
                            if i % channels == 0 {
                                last = samples.pop_front().unwrap_or(0.0);
                            }

                            *e = last;
                        }
                    },
                    move |err| error!("output stream error: {err}"),
                    None,
                )
                .map_err(Error::audio)?
        };
        stream.play().map_err(Error::audio)?;

        info!(
            device = %name,
            sample_rate = queue.sample_rate,
            channels,
            "output hooked into device"
        );

        Ok(Self {
            name,
            queue,
            _stream: stream,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn queue(&self) -> DeviceQueue {
        self.queue.clone()
    }
}

impl Output for DeviceQueue {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn play(&mut self, samples: &[i16]) {
        let scale = i16::MAX as f32;
        self.samples
            .lock()
            .extend(samples.iter().map(|&x| x as f32 / scale));
    }
}

fn pick_device(host: &cpal::Host, wanted: &str) -> Result<Device> {
    let wanted = wanted.to_owned();
    host.output_devices()
        .map_err(Error::audio)?
        .filter_map(|x| Some((x.name().ok()?.to_lowercase().similarity(&wanted), x)))
        .reduce(|a, b| if a.0 > b.0 { a } else { b })
        .map(|x| x.1)
        .ok_or_else(|| Error::audio(format!("no output device like `{wanted}`")))
}

/// Opens an output device, falling back to silent playback if that fails.
/// The device (if any) has to be kept alive for as long as the returned output is used.
pub fn output_or_silent(wanted: Option<&str>) -> (Option<AudioDevice>, Box<dyn Output>) {
    match AudioDevice::open(wanted) {
        Ok(device) => {
            let queue = device.queue();
            (Some(device), Box::new(queue))
        }
        Err(err) => {
            warn!("{err}; continuing with silent timing");
            (None, Box::new(SilentOutput::new()))
        }
    }
}
