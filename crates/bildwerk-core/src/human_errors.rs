// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the presentation layer.
//
// Every technical error is mapped to a plain sentence plus a suggestion. The
// front end decides how to surface it (dialog, status line, stderr).

use crate::error::BildwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Disk hiccup or locked file; trying again may work.
    Transient,
    /// User must do something first (open an image, pick a valid value).
    ActionRequired,
    /// The file itself is unusable in the requested way.
    Permanent,
}

/// A human-readable error with message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain summary (shown as a heading).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Drives icon/colour in the UI.
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Convert a `BildwerkError` into a `HumanError`.
pub fn humanize_error(err: &BildwerkError) -> HumanError {
    match err {
        BildwerkError::Format(detail) => HumanError {
            message: "This file is not a valid image of the expected type.".into(),
            suggestion: format!("Check that the file was saved by this editor or try another file. ({detail})"),
            severity: Severity::Permanent,
        },

        BildwerkError::TruncatedData { expected, available } => HumanError {
            message: "The image file is incomplete.".into(),
            suggestion: format!(
                "The file promises {expected} bytes of pixels but only {available} are there. It was probably cut off while copying."
            ),
            severity: Severity::Permanent,
        },

        BildwerkError::Encode(detail) => HumanError {
            message: "The image could not be saved in this format.".into(),
            suggestion: format!("Try saving as PNG or PSA instead. ({detail})"),
            severity: Severity::ActionRequired,
        },

        BildwerkError::Decode(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as PNG or BMP first.".into(),
            severity: Severity::Permanent,
        },

        BildwerkError::UnsupportedFormat(detail) => HumanError {
            message: "This type of file isn't supported.".into(),
            suggestion: format!("Use a .bmp, .png, .jpg or .psa file. ({detail})"),
            severity: Severity::ActionRequired,
        },

        BildwerkError::InvalidArgument(detail) => HumanError {
            message: "That value is out of range.".into(),
            suggestion: format!("Please enter a value within the allowed range. ({detail})"),
            severity: Severity::ActionRequired,
        },

        BildwerkError::NoImage => HumanError {
            message: "No image is open.".into(),
            suggestion: "Open an image first, then try again.".into(),
            severity: Severity::ActionRequired,
        },

        BildwerkError::NoPath => HumanError {
            message: "The image's file location is unknown.".into(),
            suggestion: "Use \"save as\" to pick where the image should go.".into(),
            severity: Severity::ActionRequired,
        },

        BildwerkError::Io(io) => HumanError {
            message: "The file could not be read or written.".into(),
            suggestion: format!("Check the path and that you have permission to use it. ({io})"),
            severity: Severity::Transient,
        },

        BildwerkError::Serialization(_) => HumanError {
            message: "The settings file is damaged.".into(),
            suggestion: "Fix the JSON in the settings file or delete it to use the defaults.".into(),
            severity: Severity::ActionRequired,
        },
    }
}
