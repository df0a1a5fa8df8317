//! Real audio output through the default device.
//!
//! The output stream is not `Send`, so it lives on a dedicated thread for the
//! lifetime of the backend. Sinks are created from the stream handle.

use std::io::Cursor;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::{AudioBackend, AudioError, AudioOutput, SourceFetcher};
use crate::catalog::Lesson;

pub struct RodioBackend {
    fetcher: SourceFetcher,
    handle: OutputStreamHandle,
    // Dropping the sender closes the device thread
    _shutdown: mpsc::Sender<()>,
}

impl RodioBackend {
    pub fn start(fetcher: SourceFetcher) -> Result<Self, AudioError> {
        let (handle_tx, handle_rx) = mpsc::sync_channel(1);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || match OutputStream::try_default() {
                Ok((_stream, handle)) => {
                    if handle_tx.send(Ok(handle)).is_ok() {
                        let _ = shutdown_rx.recv();
                    }
                    tracing::debug!("Audio output stream closed");
                }
                Err(e) => {
                    let _ = handle_tx.send(Err(e.to_string()));
                }
            })
            .map_err(|e| AudioError::Device(e.to_string()))?;

        let handle = handle_rx
            .recv()
            .map_err(|e| AudioError::Device(e.to_string()))?
            .map_err(AudioError::Device)?;

        tracing::info!("Audio output device opened");
        Ok(Self {
            fetcher,
            handle,
            _shutdown: shutdown_tx,
        })
    }
}

#[async_trait]
impl AudioBackend for RodioBackend {
    async fn open(&self, lesson: &Lesson) -> Result<Box<dyn AudioOutput>, AudioError> {
        let bytes = self.fetcher.fetch(lesson).await?;
        let handle = self.handle.clone();

        let output = tokio::task::spawn_blocking(move || -> Result<RodioOutput, AudioError> {
            let decoder =
                Decoder::new(Cursor::new(bytes)).map_err(|e| AudioError::Decode(e.to_string()))?;
            let duration = decoder.total_duration();
            let sink = Sink::try_new(&handle).map_err(|e| AudioError::Device(e.to_string()))?;
            sink.pause();
            sink.append(decoder);
            Ok(RodioOutput { sink, duration })
        })
        .await
        .map_err(|e| AudioError::Device(e.to_string()))??;

        tracing::debug!(lesson_id = %lesson.id, duration = ?output.duration, "Decoder ready");
        Ok(Box::new(output))
    }

    fn name(&self) -> &'static str {
        "rodio"
    }
}

struct RodioOutput {
    sink: Sink,
    duration: Option<Duration>,
}

impl AudioOutput for RodioOutput {
    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn seek(&mut self, position: Duration) -> Result<(), AudioError> {
        self.sink
            .try_seek(position)
            .map_err(|e| AudioError::Seek(e.to_string()))
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        self.sink.stop();
    }
}
