//! rodio-backed audio service.
//!
//! Constructed once at startup and passed to whoever needs to make noise.
//! Each clip is read into memory and decoded once to validate it; playback
//! decodes the cached bytes again from the start, so replaying a clip that is
//! still sounding restarts it instead of layering a second copy.

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use rodio::decoder::DecoderError;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::{AudioSink, Sound};

struct Clip {
    bytes: Arc<[u8]>,
    sink: Option<Sink>,
}

pub struct AudioService {
    // The stream must outlive every sink created from its handle.
    output: Option<(OutputStream, OutputStreamHandle)>,
    clips: HashMap<Sound, Clip>,
}

impl AudioService {
    /// Open the default output device. Without one the service still loads
    /// clips but plays nothing.
    pub fn new() -> Self {
        let output = match OutputStream::try_default() {
            Ok(pair) => Some(pair),
            Err(err) => {
                log::warn!("No audio output device ({err}); sound disabled.");
                None
            }
        };
        Self {
            output,
            clips: HashMap::new(),
        }
    }

    /// Service with no output device at all.
    pub fn silent() -> Self {
        Self {
            output: None,
            clips: HashMap::new(),
        }
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    /// Read and validate the clip for `sound`. A failed load leaves any
    /// previously loaded clip for that cue untouched.
    pub fn load(&mut self, sound: Sound, path: &Path) -> Result<(), String> {
        if !path.exists() {
            return Err(format!(
                "{} sound file not found: {}",
                sound,
                path.display()
            ));
        }
        let raw = fs::read(path)
            .map_err(|e| format!("Failed to read {} sound {}: {e}", sound, path.display()))?;
        let bytes: Arc<[u8]> = Arc::from(raw);

        Decoder::new(Cursor::new(bytes.clone())).map_err(|e| match e {
            DecoderError::UnrecognizedFormat => format!(
                "Audio format not supported for {} (try WAV, OGG, FLAC or MP3)",
                path.display()
            ),
            other => format!("Failed to decode {} sound {}: {other}", sound, path.display()),
        })?;

        self.clips.insert(sound, Clip { bytes, sink: None });
        log::info!("{} sound loaded from {}", sound, path.display());
        Ok(())
    }

    /// `load`, logging instead of returning the error. A missing or broken
    /// clip only means that cue stays silent.
    pub fn load_or_warn(&mut self, sound: Sound, path: &Path) {
        if let Err(err) = self.load(sound, path) {
            log::warn!("{err}");
        }
    }

    pub fn is_loaded(&self, sound: Sound) -> bool {
        self.clips.contains_key(&sound)
    }

    /// Stop all playback and release every clip and the output device.
    pub fn dispose(&mut self) {
        for clip in self.clips.values_mut() {
            if let Some(sink) = clip.sink.take() {
                sink.stop();
            }
        }
        self.clips.clear();
        self.output = None;
    }
}

impl Default for AudioService {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for AudioService {
    fn play(&mut self, sound: Sound) {
        let Some((_, handle)) = &self.output else {
            return;
        };
        let Some(clip) = self.clips.get_mut(&sound) else {
            return;
        };

        if let Some(previous) = clip.sink.take() {
            previous.stop();
        }

        let source = match Decoder::new(Cursor::new(clip.bytes.clone())) {
            Ok(source) => source,
            Err(err) => {
                log::warn!("Error playing {} sound: {err}", sound);
                return;
            }
        };
        match Sink::try_new(handle) {
            Ok(sink) => {
                sink.append(source);
                clip.sink = Some(sink);
            }
            Err(err) => log::warn!("Error playing {} sound: {err}", sound),
        }
    }
}

impl Drop for AudioService {
    fn drop(&mut self) {
        self.dispose();
    }
}
