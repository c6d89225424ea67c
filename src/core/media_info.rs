//! Media metadata structures

use crate::error::TtError;
use crate::utils::build_filename;
use serde::{Deserialize, Serialize};

/// Envelope returned by the metadata endpoint.
///
/// `data` stays untyped until `code` is known to be zero; failed lookups
/// send an empty array there.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    /// Zero on success
    pub code: i64,
    /// Human-readable status message
    #[serde(default)]
    pub msg: String,
    /// Server-side processing time in seconds
    #[serde(default)]
    pub processed_time: f64,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ApiResponse {
    /// Parse a raw response body
    pub fn from_slice(body: &[u8]) -> Result<Self, TtError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Turn the envelope into the media record it carries
    pub fn into_record(self) -> Result<MediaRecord, TtError> {
        if self.code != 0 {
            return Err(TtError::Api(self.msg));
        }
        if self.data.is_null() {
            return Ok(MediaRecord::default());
        }
        Ok(serde_json::from_value(self.data)?)
    }
}

/// Media described by a successful lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaRecord {
    /// Platform media ID
    pub id: String,
    /// Standard quality play URL
    pub play: String,
    /// High definition play URL
    pub hdplay: String,
    /// Creation time in seconds since the epoch
    pub create_time: i64,
    pub author: Author,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    /// Author handle
    pub unique_id: String,
}

/// Rendition chosen for download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Hd,
    Standard,
}

impl MediaRecord {
    /// Pick the download URL, preferring the HD rendition
    pub fn select_source(&self) -> Result<(&str, Quality), TtError> {
        if !self.hdplay.is_empty() {
            Ok((&self.hdplay, Quality::Hd))
        } else if !self.play.is_empty() {
            Ok((&self.play, Quality::Standard))
        } else {
            Err(TtError::NoDownloadLink)
        }
    }

    /// Local filename for this media
    pub fn filename(&self) -> String {
        build_filename(&self.author.unique_id, self.create_time, &self.id)
    }
}

/// Everything needed to fetch one link
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadPlan {
    pub url: String,
    pub filename: String,
    pub quality: Quality,
}

impl DownloadPlan {
    /// Build a plan from a resolved record
    pub fn from_record(record: &MediaRecord) -> Result<Self, TtError> {
        let (url, quality) = record.select_source()?;
        Ok(Self {
            url: url.to_string(),
            filename: record.filename(),
            quality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(play: &str, hdplay: &str) -> MediaRecord {
        MediaRecord {
            id: "7133412834960018730".to_string(),
            play: play.to_string(),
            hdplay: hdplay.to_string(),
            create_time: 1_642_204_800,
            author: Author {
                unique_id: "shrimpydimpy".to_string(),
            },
        }
    }

    #[test]
    fn test_envelope_decode() {
        let body = br#"{"code":0,"msg":"success","data":{"id":"X","hdplay":"http://a","create_time":1,"author":{"unique_id":"u"}}}"#;
        let record = ApiResponse::from_slice(body).unwrap().into_record().unwrap();
        assert_eq!(record.id, "X");
        assert_eq!(record.hdplay, "http://a");
        assert_eq!(record.play, "");
        assert_eq!(record.create_time, 1);
        assert_eq!(record.author.unique_id, "u");
    }

    #[test]
    fn test_envelope_ignores_extra_fields() {
        let body = br#"{"code":0,"msg":"success","processed_time":0.21,"data":{"id":"1","title":"t","play":"http://p","wmplay":"http://w","size":10,"author":{"id":"9","unique_id":"u","nickname":"n"}}}"#;
        let response = ApiResponse::from_slice(body).unwrap();
        assert_eq!(response.processed_time, 0.21);
        let record = response.into_record().unwrap();
        assert_eq!(record.play, "http://p");
        assert_eq!(record.author.unique_id, "u");
    }

    #[test]
    fn test_envelope_error_code() {
        let body = br#"{"code":-1,"msg":"boom"}"#;
        let err = ApiResponse::from_slice(body).unwrap().into_record().unwrap_err();
        assert!(matches!(err, TtError::Api(ref msg) if msg == "boom"));
    }

    #[test]
    fn test_envelope_error_code_with_array_data() {
        let body = br#"{"code":-1,"msg":"Url parsing is failed! Please check url.","processed_time":0.03,"data":[]}"#;
        let err = ApiResponse::from_slice(body).unwrap().into_record().unwrap_err();
        assert_eq!(err.to_string(), "Url parsing is failed! Please check url.");
    }

    #[test]
    fn test_envelope_invalid_json() {
        let err = ApiResponse::from_slice(b"<html>502</html>").unwrap_err();
        assert!(matches!(err, TtError::Decode(_)));

        let err = ApiResponse::from_slice(br#"{"msg":"no code"}"#).unwrap_err();
        assert!(matches!(err, TtError::Decode(_)));
    }

    #[test]
    fn test_envelope_mistyped_data() {
        let body = br#"{"code":0,"msg":"success","data":{"create_time":"yesterday"}}"#;
        let err = ApiResponse::from_slice(body).unwrap().into_record().unwrap_err();
        assert!(matches!(err, TtError::Decode(_)));
    }

    #[test]
    fn test_envelope_missing_data() {
        let body = br#"{"code":0,"msg":"success"}"#;
        let record = ApiResponse::from_slice(body).unwrap().into_record().unwrap();
        assert_eq!(record, MediaRecord::default());
        assert!(matches!(record.select_source(), Err(TtError::NoDownloadLink)));
    }

    #[test]
    fn test_select_source_prefers_hd() {
        let r = record("http://sd", "http://hd");
        assert_eq!(r.select_source().unwrap(), ("http://hd", Quality::Hd));

        let r = record("", "http://hd");
        assert_eq!(r.select_source().unwrap(), ("http://hd", Quality::Hd));
    }

    #[test]
    fn test_select_source_falls_back_to_standard() {
        let r = record("http://sd", "");
        assert_eq!(r.select_source().unwrap(), ("http://sd", Quality::Standard));
    }

    #[test]
    fn test_select_source_no_links() {
        let r = record("", "");
        assert!(matches!(r.select_source(), Err(TtError::NoDownloadLink)));
        assert!(DownloadPlan::from_record(&r).is_err());
    }

    #[test]
    fn test_download_plan() {
        let plan = DownloadPlan::from_record(&record("http://sd", "http://hd")).unwrap();
        assert_eq!(plan.url, "http://hd");
        assert_eq!(plan.quality, Quality::Hd);
        assert_eq!(plan.filename, "shrimpydimpy_2022-01-15_7133412834960018730.mp4");
    }
}
