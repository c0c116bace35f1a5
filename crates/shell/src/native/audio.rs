//! Audio output through cpal. Without the `audio` feature the subsystem
//! reports no drivers and refuses to initialize.

use crate::{AudioSpec, Error, Result};

#[cfg(feature = "audio")]
pub use self::cpal_backend::{AudioHost, NativeAudioDevice};

#[cfg(not(feature = "audio"))]
pub use self::disabled::{AudioHost, NativeAudioDevice};

#[cfg(feature = "audio")]
mod cpal_backend {
    use rodio::cpal::{
        self,
        traits::{DeviceTrait, HostTrait, StreamTrait},
    };

    use super::{AudioSpec, Error, Result};
    use crate::AudioFormat;

    /// An open output stream. The stream stops when this is dropped.
    pub struct NativeAudioDevice {
        _stream: cpal::Stream,
    }

    #[derive(Default)]
    pub struct AudioHost {
        host: Option<cpal::Host>,
    }

    impl AudioHost {
        pub fn drivers() -> Vec<String> {
            cpal::available_hosts()
                .iter()
                .map(|id| String::from(id.name()))
                .collect()
        }

        pub fn init(&mut self, driver: Option<&str>) -> Result<()> {
            let host = match driver {
                Some(name) => {
                    let id = cpal::available_hosts()
                        .into_iter()
                        .find(|id| id.name().eq_ignore_ascii_case(name))
                        .ok_or_else(|| Error::NoSuchDriver {
                            kind: "audio",
                            name: String::from(name),
                        })?;
                    cpal::host_from_id(id).map_err(|err| Error::Audio(err.to_string()))?
                }
                None => cpal::default_host(),
            };

            tracing::debug!("audio host: {}", host.id().name());
            self.host = Some(host);
            Ok(())
        }

        pub fn current(&self) -> Option<String> {
            self.host.as_ref().map(|host| String::from(host.id().name()))
        }

        pub fn open(&mut self, spec: &AudioSpec) -> Result<NativeAudioDevice> {
            let host = self.host.as_ref().ok_or(Error::NotInitialized("audio"))?;
            let device = host
                .default_output_device()
                .ok_or_else(|| Error::Audio(String::from("no output device")))?;

            let config = cpal::StreamConfig {
                channels: spec.channels,
                sample_rate: cpal::SampleRate(spec.frequency),
                buffer_size: cpal::BufferSize::Fixed(spec.samples),
            };
            let format = spec.format;

            let stream = device
                .build_output_stream_raw(
                    &config,
                    sample_format(format),
                    move |data: &mut cpal::Data, _: &cpal::OutputCallbackInfo| {
                        fill_silence(format, data.bytes_mut());
                    },
                    |err| tracing::error!("audio stream error: {err}"),
                    None,
                )
                .map_err(|err| Error::Audio(err.to_string()))?;

            stream.play().map_err(|err| Error::Audio(err.to_string()))?;
            tracing::debug!(
                "audio stream open: {} Hz, {:?}, {} channels, {} byte buffer",
                spec.frequency,
                spec.format,
                spec.channels,
                spec.buffer_size()
            );

            Ok(NativeAudioDevice { _stream: stream })
        }

        pub fn quit(&mut self) {
            self.host = None;
        }
    }

    fn sample_format(format: AudioFormat) -> cpal::SampleFormat {
        match format {
            AudioFormat::U8 => cpal::SampleFormat::U8,
            AudioFormat::S8 => cpal::SampleFormat::I8,
            AudioFormat::U16 => cpal::SampleFormat::U16,
            AudioFormat::S16 => cpal::SampleFormat::I16,
            AudioFormat::S32 => cpal::SampleFormat::I32,
            AudioFormat::F32 => cpal::SampleFormat::F32,
        }
    }

    /// Writes the zero level for `format`. Unsigned formats are centered on
    /// half their range.
    fn fill_silence(format: AudioFormat, bytes: &mut [u8]) {
        match format {
            AudioFormat::U8 => bytes.fill(0x80),
            AudioFormat::U16 => {
                for sample in bytes.chunks_exact_mut(2) {
                    sample.copy_from_slice(&0x8000_u16.to_le_bytes());
                }
            }
            _ => bytes.fill(0),
        }
    }

}

#[cfg(not(feature = "audio"))]
mod disabled {
    use super::{AudioSpec, Error, Result};

    pub enum NativeAudioDevice {}

    #[derive(Default)]
    pub struct AudioHost;

    impl AudioHost {
        pub fn drivers() -> Vec<String> {
            Vec::new()
        }

        #[allow(clippy::unused_self)]
        pub fn init(&mut self, _driver: Option<&str>) -> Result<()> {
            Err(Error::Unsupported("audio"))
        }

        #[allow(clippy::unused_self)]
        pub fn current(&self) -> Option<String> {
            None
        }

        #[allow(clippy::unused_self)]
        pub fn open(&mut self, _spec: &AudioSpec) -> Result<NativeAudioDevice> {
            Err(Error::Unsupported("audio"))
        }

        pub fn quit(&mut self) {}
    }
}
