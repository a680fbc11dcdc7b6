// src/engine_lib/audio.rs

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    Device(String),
    #[error("failed to open audio file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode audio: {0}")]
    Decode(String),
}

/// A looping background track. Playback stops when this is dropped.
pub struct BackgroundMusic {
    // The stream must outlive the sink.
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
}

impl BackgroundMusic {
    pub fn play_looping(path: &Path) -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| AudioError::Device(e.to_string()))?;
        let sink = Sink::try_new(&handle)
            .map_err(|e| AudioError::Device(e.to_string()))?;

        let file = File::open(path)
            .map_err(|source| AudioError::Open { path: path.to_path_buf(), source })?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| AudioError::Decode(e.to_string()))?;

        sink.append(source.repeat_infinite());
        log::info!("Playing background track {}", path.display());

        Ok(Self { _stream: stream, _handle: handle, sink })
    }

    pub fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }

    pub fn toggle_pause(&self) {
        if self.sink.is_paused() {
            self.sink.play();
        } else {
            self.sink.pause();
        }
    }
}
