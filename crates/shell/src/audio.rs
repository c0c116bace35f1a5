/// Sample encodings an audio device can be opened with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    U8,
    S8,
    U16,
    #[default]
    S16,
    S32,
    F32,
}

impl AudioFormat {
    #[must_use]
    pub fn bytes_per_sample(self) -> usize {
        match self {
            Self::U8 | Self::S8 => 1,
            Self::U16 | Self::S16 => 2,
            Self::S32 | Self::F32 => 4,
        }
    }
}

/// The stream format requested when opening an audio device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioSpec {
    /// Samples per second, per channel.
    pub frequency: u32,
    pub format: AudioFormat,
    pub channels: u16,
    /// Buffer size in sample frames.
    pub samples: u32,
}

impl Default for AudioSpec {
    fn default() -> Self {
        Self {
            frequency: 22050,
            format: AudioFormat::S16,
            channels: 2,
            samples: 2048,
        }
    }
}

impl AudioSpec {
    /// Size of one device buffer in bytes.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.samples as usize * usize::from(self.channels) * self.format.bytes_per_sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_buffer_size() {
        // 2048 frames of stereo 16-bit audio.
        assert_eq!(AudioSpec::default().buffer_size(), 8192);
    }
}
