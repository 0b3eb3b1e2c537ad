//! Editing session: the loaded image, its processed copy and one backup.
//!
//! Keeps the single-level undo the interactive tool offers. The original
//! is never modified; every edit works on `processed`.

use log::info;

use crate::composite::flatten_onto;
use crate::error::Result;
use crate::image::PixelBuffer;
use crate::selection::apply::apply;
use crate::selection::color::Rgb;
use crate::selection::state::SelectionState;

/// Counts reported after a selection is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyReport {
    pub removed: usize,
    pub kept: usize,
    pub already_transparent: usize,
}

impl ApplyReport {
    /// Nothing became transparent: the selection probably needs inverting.
    pub fn nothing_removed(&self) -> bool {
        self.removed == 0
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    original: PixelBuffer,
    processed: PixelBuffer,
    backup: Option<PixelBuffer>,
}

impl Session {
    pub fn new(image: PixelBuffer) -> Self {
        Self {
            processed: image.clone(),
            original: image,
            backup: None,
        }
    }

    pub fn original(&self) -> &PixelBuffer {
        &self.original
    }

    /// Image all selection tools operate on.
    pub fn processed(&self) -> &PixelBuffer {
        &self.processed
    }

    pub fn can_undo(&self) -> bool {
        self.backup.is_some()
    }

    /// Apply the current selection to the processed image.
    ///
    /// The processed image is backed up first. On success `state` is reset
    /// to an empty selection; on error both the image and `state` are left
    /// as they were.
    pub fn apply_selection<F>(&mut self, state: &mut SelectionState, to_image: F) -> Result<ApplyReport>
    where
        F: Fn((f64, f64)) -> (i64, i64),
    {
        let mask = state.resolve_mask(self.processed.width(), self.processed.height(), to_image)?;
        let applied = apply(self.processed.clone(), mask)?;

        self.backup = Some(std::mem::replace(&mut self.processed, applied.image));
        *state = SelectionState::default();

        Ok(ApplyReport {
            removed: applied.removed,
            kept: applied.kept,
            already_transparent: applied.already_transparent,
        })
    }

    /// Replace transparency with a solid background colour.
    ///
    /// Only backs up when no backup exists yet, so undo after a background
    /// change returns to the state before the selection was applied.
    pub fn flatten_background(&mut self, color: Rgb) {
        if !self.processed.has_alpha() {
            return;
        }
        let flat = flatten_onto(&self.processed, color);
        let previous = std::mem::replace(&mut self.processed, flat);
        if self.backup.is_none() {
            self.backup = Some(previous);
        }
        info!("background flattened onto {color:?}");
    }

    /// Restore the backup. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.backup.take() {
            Some(previous) => {
                self.processed = previous;
                true
            }
            None => false,
        }
    }

    /// Discard all edits.
    pub fn reset(&mut self) {
        self.processed = self.original.clone();
        self.backup = None;
    }
}
