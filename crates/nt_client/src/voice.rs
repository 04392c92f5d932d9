//! Voice control for the avatar page.
//!
//! The speech engine itself lives outside this crate. It is reached through
//! [`SpeechRecognizer`] and may be missing entirely, in which case the session
//! reports [`SpeechCapability::Unsupported`] and ignores toggles.

use thiserror::Error;
use tracing::{debug, info};

pub const UNSUPPORTED_MESSAGE: &str = "Speech recognition is not supported in your browser.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoiceError {
    #[error("Speech recognition is not supported in your browser.")]
    Unsupported,
}

/// Options handed to the engine when a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognitionOptions {
    pub continuous: bool,
    pub interim_results: bool,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            continuous: true,
            interim_results: true,
        }
    }
}

pub trait SpeechRecognizer: Send {
    fn start(&mut self, options: RecognitionOptions);

    fn stop(&mut self);
}

pub enum SpeechCapability {
    Available(Box<dyn SpeechRecognizer>),
    Unsupported,
}

impl SpeechCapability {
    pub fn is_available(&self) -> bool {
        matches!(self, SpeechCapability::Available(_))
    }
}

/// One entry of the engine's result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    pub transcript: String,
    pub is_final: bool,
}

impl RecognitionResult {
    pub fn interim(transcript: impl Into<String>) -> Self {
        Self { transcript: transcript.into(), is_final: false }
    }

    pub fn final_text(transcript: impl Into<String>) -> Self {
        Self { transcript: transcript.into(), is_final: true }
    }
}

/// Folds engine result batches into the transcript shown to the user.
#[derive(Debug, Clone, Default)]
pub struct TranscriptAssembler {
    transcript: String,
}

impl TranscriptAssembler {
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn reset(&mut self) {
        self.transcript.clear();
    }

    /// Consume `results[result_index..]`. Final pieces take precedence over
    /// interim ones for display; the final text, if any, is returned.
    pub fn apply(&mut self, result_index: usize, results: &[RecognitionResult]) -> Option<String> {
        let mut interim = String::new();
        let mut finished = String::new();
        for result in results.iter().skip(result_index) {
            if result.is_final {
                finished.push_str(&result.transcript);
            } else {
                interim.push_str(&result.transcript);
            }
        }

        if finished.is_empty() {
            self.transcript = interim;
            None
        } else {
            self.transcript = finished.clone();
            Some(finished)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expression {
    Happy,
    Sad,
    Angry,
    Surprised,
}

impl Expression {
    pub fn as_str(&self) -> &'static str {
        match self {
            Expression::Happy => "happy",
            Expression::Sad => "sad",
            Expression::Angry => "angry",
            Expression::Surprised => "surprised",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarAction {
    Wave,
    Nod,
    Shake,
    Dance,
}

impl AvatarAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvatarAction::Wave => "wave",
            AvatarAction::Nod => "nod",
            AvatarAction::Shake => "shake",
            AvatarAction::Dance => "dance",
        }
    }
}

const EXPRESSION_KEYWORDS: [(&[&str], Expression); 4] = [
    (&["happy", "smile"], Expression::Happy),
    (&["sad"], Expression::Sad),
    (&["angry"], Expression::Angry),
    (&["surprised", "shock"], Expression::Surprised),
];

const ACTION_KEYWORDS: [(&str, AvatarAction); 4] = [
    ("wave", AvatarAction::Wave),
    ("nod", AvatarAction::Nod),
    ("shake", AvatarAction::Shake),
    ("dance", AvatarAction::Dance),
];

/// Expression and action spoken in one utterance. At most one of each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvatarCommand {
    pub expression: Option<Expression>,
    pub action: Option<AvatarAction>,
}

impl AvatarCommand {
    /// Case-insensitive substring match; earlier keywords take priority.
    pub fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();
        let expression = EXPRESSION_KEYWORDS
            .iter()
            .find(|(words, _)| words.iter().any(|w| lower.contains(w)))
            .map(|(_, e)| *e);
        let action = ACTION_KEYWORDS
            .iter()
            .find(|(word, _)| lower.contains(word))
            .map(|(_, a)| *a);
        Self { expression, action }
    }

    pub fn is_empty(&self) -> bool {
        self.expression.is_none() && self.action.is_none()
    }
}

/// Final speech input together with the avatar command it triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub command: AvatarCommand,
}

pub struct VoiceSession {
    capability: SpeechCapability,
    listening: bool,
    assembler: TranscriptAssembler,
    options: RecognitionOptions,
}

impl VoiceSession {
    pub fn new(capability: SpeechCapability) -> Self {
        Self {
            capability,
            listening: false,
            assembler: TranscriptAssembler::default(),
            options: RecognitionOptions::default(),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.capability.is_available()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn transcript(&self) -> &str {
        self.assembler.transcript()
    }

    /// Start or stop listening. Returns the new listening flag.
    pub fn toggle(&mut self) -> Result<bool, VoiceError> {
        let SpeechCapability::Available(recognizer) = &mut self.capability else {
            return Err(VoiceError::Unsupported);
        };

        if self.listening {
            recognizer.stop();
            self.listening = false;
            info!("🎙️ Stopped listening");
        } else {
            self.assembler.reset();
            recognizer.start(self.options);
            self.listening = true;
            info!("🎙️ Listening");
        }
        Ok(self.listening)
    }

    /// Feed a result batch from the engine. Returns the utterance once a
    /// final result arrives.
    pub fn on_results(&mut self, result_index: usize, results: &[RecognitionResult]) -> Option<Utterance> {
        let text = self.assembler.apply(result_index, results)?;
        let command = AvatarCommand::detect(&text);
        debug!("Speech input {:?} -> {:?}", text, command);
        Some(Utterance { text, command })
    }
}

impl Drop for VoiceSession {
    fn drop(&mut self) {
        if let (true, SpeechCapability::Available(recognizer)) = (self.listening, &mut self.capability) {
            recognizer.stop();
        }
    }
}
