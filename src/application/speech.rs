//! Speech collaborators
//!
//! Speech-to-text, translation and synthesis are external request/response
//! services. The switchboard never calls them; [`TranslationRelay`] runs
//! them first and only then hands the resulting text to the switchboard, so
//! no service call ever happens while the store is locked.

use crate::application::switchboard::Switchboard;
use crate::domain::shared::value_objects::{CallId, ConnectionId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Translation failed: {0}")]
    Translation(String),

    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    #[error("No synthesizer configured")]
    SynthesisUnavailable,

    #[error("Call {0} is not routable from this connection")]
    NotRouted(CallId),
}

/// Raw audio in, text out
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>, mime_type: String) -> Result<String, SpeechError>;
}

/// `{text, target_language}` in, translated text out
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: String, target_language: String)
        -> Result<String, SpeechError>;
}

/// `{text, voice}` in, audio bytes out
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: String, voice: String) -> Result<Vec<u8>, SpeechError>;
}

/// One utterance after transcription and translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub original: String,
    pub translated: String,
}

/// Turns a party's audio into translated text on the call's routing group
pub struct TranslationRelay {
    switchboard: Switchboard,
    transcriber: Arc<dyn Transcriber>,
    translator: Arc<dyn Translator>,
    synthesizer: Option<Arc<dyn Synthesizer>>,
}

impl TranslationRelay {
    pub fn new(
        switchboard: Switchboard,
        transcriber: Arc<dyn Transcriber>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            switchboard,
            transcriber,
            translator,
            synthesizer: None,
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Transcribe `audio` from `from`, translate it into `target_language`
    /// and relay it to the other party of `call_id`.
    ///
    /// Silence (an empty transcript) relays nothing and returns `Ok(None)`.
    /// Translation is skipped when both languages match.
    pub async fn relay_speech(
        &self,
        from: ConnectionId,
        call_id: CallId,
        audio: Vec<u8>,
        mime_type: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<Option<Utterance>, SpeechError> {
        let original = self
            .transcriber
            .transcribe(audio, mime_type.to_string())
            .await?;
        let original = original.trim().to_string();
        if original.is_empty() {
            debug!("Empty transcript on call {}", call_id);
            return Ok(None);
        }

        let translated = if source_language.eq_ignore_ascii_case(target_language) {
            original.clone()
        } else {
            self.translator
                .translate(original.clone(), target_language.to_string())
                .await?
        };

        let delivered = self
            .switchboard
            .relay_transcript(
                from,
                call_id,
                translated.clone(),
                Some(target_language.to_string()),
            )
            .await;
        if !delivered {
            warn!("Transcript for call {} from {} not delivered", call_id, from);
            return Err(SpeechError::NotRouted(call_id));
        }

        Ok(Some(Utterance {
            original,
            translated,
        }))
    }

    /// Render text as audio for local playback
    pub async fn speak(&self, text: &str, voice: &str) -> Result<Vec<u8>, SpeechError> {
        let synthesizer = self
            .synthesizer
            .as_ref()
            .ok_or(SpeechError::SynthesisUnavailable)?;
        synthesizer
            .synthesize(text.to_string(), voice.to_string())
            .await
    }
}
