//! Live session domain types

use serde::{Deserialize, Serialize};

/// Ingest details of a running live encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveDetails {
    /// Address of the encoder accepting the ingest stream
    pub encoder_ip: String,
    pub stream_key: String,
    /// Ingest application name (RTMP), absent for SRT
    #[serde(default)]
    pub application: Option<String>,
}

impl LiveDetails {
    /// SRT ingest URL for the given listener port
    pub fn srt_url(&self, port: u16) -> String {
        format!("srt://{}:{}", self.encoder_ip, port)
    }

    /// RTMP ingest URL, using the `live` application when none was reported
    pub fn rtmp_url(&self) -> String {
        format!(
            "rtmp://{}/{}",
            self.encoder_ip,
            self.application.as_deref().unwrap_or("live")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_urls() {
        let details = LiveDetails {
            encoder_ip: "10.0.0.5".to_string(),
            stream_key: "abc".to_string(),
            application: None,
        };
        assert_eq!(details.srt_url(2088), "srt://10.0.0.5:2088");
        assert_eq!(details.rtmp_url(), "rtmp://10.0.0.5/live");
    }
}
