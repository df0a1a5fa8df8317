//! Audio backend - turns a lesson's audio source into a playable output
//!
//! Backends hand out outputs that are prepared but paused; the playback session
//! decides whether an output is ever started. Dropping an output releases it.
//!
//! - `silent`: fetches the source but renders nothing (no audio device needed)
//! - `device`: real output through the default device via rodio (`audio` feature)

mod silent;
#[cfg(feature = "audio")]
mod device;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::{AudioSource, Lesson};

pub use silent::SilentBackend;
#[cfg(feature = "audio")]
pub use device::RodioBackend;

#[derive(Debug, Error)]
#[cfg_attr(not(feature = "audio"), allow(dead_code))]
pub enum AudioError {
    #[error("lesson has no audio source")]
    MissingSource,
    #[error("audio request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("audio server answered HTTP {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: url::Url,
    },
    #[error("could not read {path}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("could not decode audio: {0}")]
    Decode(String),
    #[error("audio device unavailable: {0}")]
    Device(String),
    #[error("seek failed: {0}")]
    Seek(String),
}

/// A loaded, exclusive audio stream for one lesson.
pub trait AudioOutput: Send {
    fn play(&mut self);

    fn pause(&mut self);

    fn seek(&mut self, position: Duration) -> Result<(), AudioError>;

    /// Length reported by the decoder, if it knows one.
    fn duration(&self) -> Option<Duration>;

    /// True once every sample has been rendered.
    fn is_finished(&self) -> bool;
}

#[async_trait]
pub trait AudioBackend: Send + Sync {
    /// Resolve and open the lesson's source. The returned output is paused.
    async fn open(&self, lesson: &Lesson) -> Result<Box<dyn AudioOutput>, AudioError>;

    fn name(&self) -> &'static str;
}

/// Fetches raw source bytes for both backends.
#[derive(Clone)]
pub struct SourceFetcher {
    client: reqwest::Client,
}

impl SourceFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, lesson: &Lesson) -> Result<Vec<u8>, AudioError> {
        let source = lesson.audio.as_ref().ok_or(AudioError::MissingSource)?;
        tracing::debug!(lesson_id = %lesson.id, source = %source, "Fetching audio source");

        match source {
            AudioSource::Remote(url) => {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(AudioError::Status {
                        status,
                        url: url.clone(),
                    });
                }
                Ok(response.bytes().await?.to_vec())
            }
            AudioSource::Local(path) => tokio::fs::read(path).await.map_err(|error| AudioError::Io {
                path: path.clone(),
                error,
            }),
        }
    }
}
