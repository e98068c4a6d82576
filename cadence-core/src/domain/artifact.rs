//! Artifact domain types
//!
//! Output locations produced by a finished encoding. Everything a dependent
//! job needs to know about an artifact is carried in explicit fields set
//! when the artifact was created; nothing is inferred from path text.

use serde::{Deserialize, Serialize};

/// What an artifact contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactRole {
    Video,
    Audio,
    Subtitle,
    Thumbnail,
}

/// Which track an audio artifact belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackRole {
    Main,
    Commentary,
    Description,
}

/// One output written by a finished encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputLocation {
    pub muxing_id: String,
    pub stream_id: String,
    /// Full output path, including the encoding's output base path
    pub output_path: String,
    pub role: ArtifactRole,
    #[serde(default)]
    pub track: Option<TrackRole>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub bitrate: Option<u64>,
    /// Per-title template streams are placeholders, never referenced by manifests
    #[serde(default)]
    pub is_template: bool,
}

impl OutputLocation {
    pub fn new(
        muxing_id: impl Into<String>,
        stream_id: impl Into<String>,
        output_path: impl Into<String>,
        role: ArtifactRole,
    ) -> Self {
        Self {
            muxing_id: muxing_id.into(),
            stream_id: stream_id.into(),
            output_path: output_path.into(),
            role,
            track: None,
            language: None,
            bitrate: None,
            is_template: false,
        }
    }

    pub fn with_bitrate(mut self, bitrate: u64) -> Self {
        self.bitrate = Some(bitrate);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_track(mut self, track: TrackRole) -> Self {
        self.track = Some(track);
        self
    }

    pub fn template(mut self) -> Self {
        self.is_template = true;
        self
    }
}

/// Strip the output base path from an artifact path
///
/// Manifests reference segments relative to the manifest location, which is
/// the base path. Paths outside the base are returned unchanged.
pub fn relative_segment_path<'a>(output_path: &'a str, base_path: &str) -> &'a str {
    if base_path.is_empty() {
        return output_path;
    }
    output_path.strip_prefix(base_path).unwrap_or(output_path)
}
