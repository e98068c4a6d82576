//! Manifest plan domain types
//!
//! A manifest plan is the request body of a manifest-generation job: which
//! renditions of a finished encoding to reference and where. The manifest
//! text itself is rendered by the remote service.

use serde::{Deserialize, Serialize};

use crate::domain::artifact::{ArtifactRole, OutputLocation, TrackRole, relative_segment_path};
use crate::domain::job::{JobId, JobKind};

/// Streaming manifest format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestFormat {
    Hls,
    Dash,
}

impl ManifestFormat {
    /// Job kind that generates manifests of this format
    pub fn job_kind(&self) -> JobKind {
        match self {
            ManifestFormat::Hls => JobKind::HlsManifest,
            ManifestFormat::Dash => JobKind::DashManifest,
        }
    }

    pub fn default_manifest_name(&self) -> &'static str {
        match self {
            ManifestFormat::Hls => "stream.m3u8",
            ManifestFormat::Dash => "stream.mpd",
        }
    }
}

/// One rendition referenced by a manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rendition {
    pub muxing_id: String,
    pub stream_id: String,
    pub role: ArtifactRole,
    pub track: Option<TrackRole>,
    pub language: Option<String>,
    /// Segment location relative to the manifest
    pub segment_path: String,
    /// HLS rendition group, or DASH adaptation set key
    pub group: String,
    /// HLS media playlist name; DASH renditions have none
    pub uri: Option<String>,
}

/// Request body for a manifest-generation job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestPlan {
    pub format: ManifestFormat,
    pub encoding_id: JobId,
    pub manifest_name: String,
    pub output_path: String,
    pub renditions: Vec<Rendition>,
}

impl ManifestPlan {
    /// Build a plan from the outputs of a finished encoding
    ///
    /// Template streams and thumbnails are skipped. Segment paths are made
    /// relative to `output_path`, where the manifest is written.
    pub fn from_outputs(
        format: ManifestFormat,
        encoding_id: JobId,
        output_path: impl Into<String>,
        outputs: &[OutputLocation],
    ) -> Self {
        let output_path = output_path.into();

        let renditions = outputs
            .iter()
            .filter(|o| !o.is_template && o.role != ArtifactRole::Thumbnail)
            .map(|o| Rendition {
                muxing_id: o.muxing_id.clone(),
                stream_id: o.stream_id.clone(),
                role: o.role,
                track: o.track,
                language: o.language.clone(),
                segment_path: relative_segment_path(&o.output_path, &output_path).to_string(),
                group: rendition_group(format, o),
                uri: match format {
                    ManifestFormat::Hls => Some(hls_playlist_name(o)),
                    ManifestFormat::Dash => None,
                },
            })
            .collect();

        Self {
            format,
            encoding_id,
            manifest_name: format.default_manifest_name().to_string(),
            output_path,
            renditions,
        }
    }

    pub fn with_manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = name.into();
        self
    }
}

fn track_suffix(track: Option<TrackRole>) -> Option<&'static str> {
    match track {
        None => None,
        Some(TrackRole::Main) => Some("main"),
        Some(TrackRole::Commentary) => Some("commentary"),
        Some(TrackRole::Description) => Some("description"),
    }
}

fn rendition_group(format: ManifestFormat, output: &OutputLocation) -> String {
    match (format, output.role) {
        (_, ArtifactRole::Video) => "video".to_string(),
        (ManifestFormat::Hls, ArtifactRole::Audio) => "audio".to_string(),
        (ManifestFormat::Hls, ArtifactRole::Subtitle) => "subs".to_string(),
        (ManifestFormat::Dash, ArtifactRole::Audio) => match track_suffix(output.track) {
            Some(suffix) => format!("audio_{}", suffix),
            None => "audio".to_string(),
        },
        (ManifestFormat::Dash, ArtifactRole::Subtitle) => match &output.language {
            Some(lang) => format!("subtitles_{}", lang),
            None => "subtitles".to_string(),
        },
        (_, ArtifactRole::Thumbnail) => "thumbnails".to_string(),
    }
}

fn hls_playlist_name(output: &OutputLocation) -> String {
    let bitrate = output
        .bitrate
        .map(|b| b.to_string())
        .unwrap_or_else(|| output.muxing_id.clone());

    match output.role {
        ArtifactRole::Video => format!("video_{}.m3u8", bitrate),
        ArtifactRole::Audio => match track_suffix(output.track) {
            Some(suffix) => format!("audio_{}_{}.m3u8", suffix, bitrate),
            None => format!("audio_{}.m3u8", bitrate),
        },
        ArtifactRole::Subtitle => format!(
            "subtitles_{}.m3u8",
            output.language.as_deref().unwrap_or("und")
        ),
        ArtifactRole::Thumbnail => format!("thumbnails_{}.m3u8", bitrate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outputs() -> Vec<OutputLocation> {
        vec![
            OutputLocation::new("m-v1", "s-v1", "out/vod/video/1080p", ArtifactRole::Video)
                .with_bitrate(6_000_000),
            OutputLocation::new("m-tpl", "s-tpl", "out/vod/video/{bitrate}", ArtifactRole::Video)
                .template(),
            OutputLocation::new("m-a1", "s-a1", "out/vod/audio/main/128000", ArtifactRole::Audio)
                .with_bitrate(128_000)
                .with_track(TrackRole::Main),
            OutputLocation::new(
                "m-a2",
                "s-a2",
                "out/vod/audio/commentary/64000",
                ArtifactRole::Audio,
            )
            .with_bitrate(64_000)
            .with_track(TrackRole::Commentary),
            OutputLocation::new("m-t", "s-t", "out/vod/thumbs", ArtifactRole::Thumbnail),
        ]
    }

    #[test]
    fn test_hls_plan_skips_templates_and_thumbnails() {
        let plan =
            ManifestPlan::from_outputs(ManifestFormat::Hls, JobId::new("enc"), "out/vod/", &outputs());

        assert_eq!(plan.manifest_name, "stream.m3u8");
        let ids: Vec<_> = plan.renditions.iter().map(|r| r.muxing_id.as_str()).collect();
        assert_eq!(ids, vec!["m-v1", "m-a1", "m-a2"]);
    }

    #[test]
    fn test_hls_plan_names_playlists_by_role_and_track() {
        let plan =
            ManifestPlan::from_outputs(ManifestFormat::Hls, JobId::new("enc"), "out/vod/", &outputs());

        let uris: Vec<_> = plan
            .renditions
            .iter()
            .map(|r| r.uri.clone().unwrap())
            .collect();
        assert_eq!(
            uris,
            vec![
                "video_6000000.m3u8",
                "audio_main_128000.m3u8",
                "audio_commentary_64000.m3u8"
            ]
        );
        assert!(plan.renditions[1..].iter().all(|r| r.group == "audio"));
        assert_eq!(plan.renditions[0].segment_path, "video/1080p");
    }

    #[test]
    fn test_dash_plan_groups_audio_tracks_separately() {
        let plan = ManifestPlan::from_outputs(
            ManifestFormat::Dash,
            JobId::new("enc"),
            "out/vod/",
            &outputs(),
        )
        .with_manifest_name("movie.mpd");

        assert_eq!(plan.manifest_name, "movie.mpd");
        let groups: Vec<_> = plan.renditions.iter().map(|r| r.group.as_str()).collect();
        assert_eq!(groups, vec!["video", "audio_main", "audio_commentary"]);
        assert!(plan.renditions.iter().all(|r| r.uri.is_none()));
    }

    #[test]
    fn test_untagged_audio_has_no_track_suffix() {
        let outputs = vec![
            OutputLocation::new("m-a", "s-a", "out/vod/audio/96000", ArtifactRole::Audio)
                .with_bitrate(96_000),
        ];

        let hls =
            ManifestPlan::from_outputs(ManifestFormat::Hls, JobId::new("enc"), "out/vod/", &outputs);
        assert_eq!(hls.renditions[0].uri.as_deref(), Some("audio_96000.m3u8"));

        let dash =
            ManifestPlan::from_outputs(ManifestFormat::Dash, JobId::new("enc"), "out/vod/", &outputs);
        assert_eq!(dash.renditions[0].group, "audio");
    }

    #[test]
    fn test_format_job_kind() {
        assert_eq!(ManifestFormat::Hls.job_kind(), JobKind::HlsManifest);
        assert_eq!(ManifestFormat::Dash.job_kind(), JobKind::DashManifest);
    }
}
