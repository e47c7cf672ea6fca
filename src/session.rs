//! Per-user session state
//!
//! A [`Session`] owns everything a color-picking UI mutates: the accepted
//! colors, the text in the input field, whether an image has been imported
//! and the phase of the current extraction. It is an ordinary value; run as
//! many as needed side by side.
//!
//! ## Extraction phases
//!
//! [`Session::import_image`] publishes its progress on a watch channel:
//! `Started` when decoding begins, then `Succeeded` or `Failed`. UIs
//! subscribe with [`Session::subscribe`] to disable uploads while a phase is
//! `Started`. The method takes `&mut self`, so a second import on the same
//! session cannot begin before the first finishes.

use serde::Serialize;
use tokio::sync::watch;

use crate::collection::{ColorCollection, EntryId};
use crate::color::{parser, ColorValue};
use crate::config::ExtractionConfig;
use crate::dedup::Deduplicator;
use crate::error::{PaletteError, Result};
use crate::export::{self, ColorFormats, ExportKind};
use crate::extraction;

/// User-facing notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    InvalidColor { input: String },
    DuplicateColor { color: String },
    ExtractionFailed { message: String },
    ExtractionSucceeded { count: usize },
}

/// Observable phase of image extraction
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExtractionPhase {
    #[default]
    Idle,
    Started,
    Succeeded { added: usize },
    Failed { message: String },
}

/// Result of an image import
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// No file was chosen; nothing happened
    NoSelection,
    Extracted {
        /// Colors produced by quantization
        candidates: usize,
        /// Entries that survived deduplication, in insertion order
        added: Vec<EntryId>,
    },
}

impl ImportOutcome {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            ImportOutcome::NoSelection => None,
            ImportOutcome::Extracted { added, .. } => Some(Notice::ExtractionSucceeded {
                count: added.len(),
            }),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    collection: ColorCollection,
    current_input: String,
    has_image: bool,
    config: ExtractionConfig,
    phase: watch::Sender<ExtractionPhase>,
}

impl Default for Session {
    fn default() -> Self {
        Self::build(ExtractionConfig::default())
    }
}

impl Session {
    /// Create an empty session with default extraction settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session with custom extraction settings
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::InvalidParameter`] if the config is invalid.
    pub fn with_config(config: ExtractionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ExtractionConfig) -> Self {
        let (phase, _) = watch::channel(ExtractionPhase::Idle);
        Self {
            collection: ColorCollection::new(),
            current_input: String::new(),
            has_image: false,
            config,
            phase,
        }
    }

    pub fn colors(&self) -> &ColorCollection {
        &self.collection
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn current_input(&self) -> &str {
        &self.current_input
    }

    pub fn set_current_input(&mut self, input: impl Into<String>) {
        self.current_input = input.into();
    }

    pub fn has_image(&self) -> bool {
        self.has_image
    }

    /// Receiver for extraction phase changes
    pub fn subscribe(&self) -> watch::Receiver<ExtractionPhase> {
        self.phase.subscribe()
    }

    pub fn phase(&self) -> ExtractionPhase {
        self.phase.borrow().clone()
    }

    pub fn is_extracting(&self) -> bool {
        matches!(*self.phase.borrow(), ExtractionPhase::Started)
    }

    /// Parse free-form input and append it
    ///
    /// On success the current input is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::InvalidColorInput`] or
    /// [`PaletteError::DuplicateColor`]; the session is unchanged.
    pub fn add_color(&mut self, input: &str) -> Result<EntryId> {
        let parsed = parser::parse(input)?;
        let id = self.collection.insert(parsed.normalized, parsed.value)?;
        self.current_input.clear();
        Ok(id)
    }

    /// Add whatever is in the input field
    ///
    /// # Errors
    ///
    /// Same as [`Session::add_color`].
    pub fn add_current_input(&mut self) -> Result<EntryId> {
        let input = self.current_input.clone();
        self.add_color(&input)
    }

    /// # Errors
    ///
    /// Returns [`PaletteError::IndexOutOfRange`] for an invalid index.
    pub fn remove_color(&mut self, index: usize) -> Result<()> {
        self.collection.remove(index).map(|_| ())
    }

    /// # Errors
    ///
    /// Returns [`PaletteError::IndexOutOfRange`] for an invalid index.
    pub fn rename_color(&mut self, index: usize, name: &str) -> Result<()> {
        self.collection.rename(index, name).map(|_| ())
    }

    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.collection.name_of(index)
    }

    /// Discard every color and the imported image
    pub fn clear_all(&mut self) {
        self.collection.clear();
        self.has_image = false;
    }

    /// Format table for the color at `index`
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::IndexOutOfRange`] for an invalid index.
    pub fn formats(&self, index: usize) -> Result<ColorFormats> {
        self.collection
            .get(index)
            .map(|entry| ColorFormats::of(&entry.value))
            .ok_or(PaletteError::IndexOutOfRange {
                index,
                len: self.collection.len(),
            })
    }

    /// Export artifact for the whole collection
    pub fn export(&self, kind: ExportKind) -> String {
        export::export(kind, self.collection.values())
    }

    /// Extract a palette from an uploaded file and add the new colors
    ///
    /// `None` models an empty file selection and is a no-op. Candidates are
    /// filtered by the perceptual tier against the collection before being
    /// inserted in palette order under their hex notation.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::ImageDecodeFailure`] or
    /// [`PaletteError::ExtractionFailed`]; the collection is unchanged and the
    /// session accepts another import.
    pub async fn import_image(&mut self, file: Option<Vec<u8>>) -> Result<ImportOutcome> {
        let Some(bytes) = file else {
            return Ok(ImportOutcome::NoSelection);
        };

        self.phase.send_replace(ExtractionPhase::Started);
        tracing::info!(bytes = bytes.len(), "extracting colors");

        let palette = match extraction::extract_palette_async(bytes, self.config.clone()).await {
            Ok(palette) => palette,
            Err(err) => {
                tracing::warn!(error = %err, "error extracting colors");
                self.phase.send_replace(ExtractionPhase::Failed {
                    message: err.user_message(),
                });
                return Err(err);
            }
        };

        let candidates: Vec<ColorValue> = palette.into_iter().map(ColorValue::from_rgb).collect();
        let dedup = Deduplicator::new(self.config.dedup_threshold, self.config.dedup_policy);
        let survivors = dedup.filter_batch(&candidates, &self.collection);

        let mut added = Vec::with_capacity(survivors.len());
        for value in survivors {
            if let Ok(id) = self.collection.insert(value.to_hex(), value) {
                added.push(id);
            }
        }

        self.has_image = true;
        self.phase.send_replace(ExtractionPhase::Succeeded { added: added.len() });
        tracing::info!(
            candidates = candidates.len(),
            added = added.len(),
            "extracted colors from image"
        );

        Ok(ImportOutcome::Extracted {
            candidates: candidates.len(),
            added,
        })
    }

    /// Clear the session, then import a new image
    ///
    /// # Errors
    ///
    /// Same as [`Session::import_image`]; the session stays cleared.
    pub async fn replace_image(&mut self, file: Vec<u8>) -> Result<ImportOutcome> {
        self.clear_all();
        self.import_image(Some(file)).await
    }
}
