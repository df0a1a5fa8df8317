//! Backend that validates sources without rendering them.

use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use lofty::prelude::*;
use lofty::probe::Probe;

use super::{AudioBackend, AudioError, AudioOutput, SourceFetcher};
use crate::catalog::{Lesson, LessonId};

pub struct SilentBackend {
    fetcher: SourceFetcher,
}

impl SilentBackend {
    pub fn new(fetcher: SourceFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl AudioBackend for SilentBackend {
    async fn open(&self, lesson: &Lesson) -> Result<Box<dyn AudioOutput>, AudioError> {
        let bytes = self.fetcher.fetch(lesson).await?;
        if bytes.is_empty() {
            return Err(AudioError::Decode("empty audio source".to_string()));
        }
        let duration = header_duration(&bytes);
        tracing::debug!(
            lesson_id = %lesson.id,
            bytes = bytes.len(),
            duration = ?duration,
            "Silent output prepared"
        );
        Ok(Box::new(SilentOutput {
            lesson_id: lesson.id.clone(),
            playing: false,
            duration,
        }))
    }

    fn name(&self) -> &'static str {
        "silent"
    }
}

/// Length read from the container header, so silent playback of a lesson
/// without a catalog length still reaches its end.
fn header_duration(bytes: &[u8]) -> Option<Duration> {
    let detected = Probe::new(Cursor::new(bytes)).guess_file_type().ok()?;
    match detected.read() {
        Ok(file) => Some(file.properties().duration()).filter(|d| !d.is_zero()),
        Err(e) => {
            tracing::debug!(error = %e, "No readable audio header");
            None
        }
    }
}

struct SilentOutput {
    lesson_id: LessonId,
    playing: bool,
    duration: Option<Duration>,
}

impl AudioOutput for SilentOutput {
    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, _position: Duration) -> Result<(), AudioError> {
        Ok(())
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_finished(&self) -> bool {
        false
    }
}

impl Drop for SilentOutput {
    fn drop(&mut self) {
        tracing::trace!(lesson_id = %self.lesson_id, was_playing = self.playing, "Silent output released");
    }
}
