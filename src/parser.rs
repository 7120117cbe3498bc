use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{ProbeError, Result};

/// Coarse stream classification reported by ffprobe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecType {
    Video,
    Audio,
}

impl CodecType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodecType::Video => "video",
            CodecType::Audio => "audio",
        }
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The codec types present in a source, at most `video` and `audio`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecTypeSet {
    video: bool,
    audio: bool,
}

impl CodecTypeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, codec_type: CodecType) {
        match codec_type {
            CodecType::Video => self.video = true,
            CodecType::Audio => self.audio = true,
        }
    }

    pub fn contains(&self, codec_type: CodecType) -> bool {
        match codec_type {
            CodecType::Video => self.video,
            CodecType::Audio => self.audio,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.video && !self.audio
    }

    pub fn len(&self) -> usize {
        usize::from(self.video) + usize::from(self.audio)
    }

    /// Any video stream makes the source a video
    pub fn is_video(&self) -> bool {
        self.video
    }

    /// Audio streams and no video stream at all, even a silent one
    pub fn is_audio(&self) -> bool {
        self.audio && !self.video
    }

    /// Members in `video`, `audio` order
    pub fn iter(&self) -> impl Iterator<Item = CodecType> + '_ {
        [CodecType::Video, CodecType::Audio]
            .into_iter()
            .filter(move |t| self.contains(*t))
    }
}

impl FromIterator<CodecType> for CodecTypeSet {
    fn from_iter<I: IntoIterator<Item = CodecType>>(iter: I) -> Self {
        let mut set = CodecTypeSet::new();
        for codec_type in iter {
            set.insert(codec_type);
        }
        set
    }
}

impl Serialize for CodecTypeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Duration split into floating-point units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationUnits {
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl DurationUnits {
    pub fn total_seconds(&self) -> f64 {
        self.hours * 3600.0 + self.minutes * 60.0 + self.seconds
    }
}

/// Full ffprobe output: format and stream sections, kept verbatim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    #[serde(default)]
    pub streams: Vec<Map<String, Value>>,
    #[serde(default)]
    pub format: Map<String, Value>,
}

impl MediaInfo {
    /// Streams whose `codec_type` matches
    pub fn streams_of(&self, codec_type: CodecType) -> impl Iterator<Item = &Map<String, Value>> + '_ {
        self.streams.iter().filter(move |stream| {
            stream.get("codec_type").and_then(Value::as_str) == Some(codec_type.as_str())
        })
    }

    pub fn format_name(&self) -> Option<&str> {
        self.format.get("format_name").and_then(Value::as_str)
    }

    /// ffprobe prints `format.duration` as a decimal string
    pub fn format_duration_seconds(&self) -> Option<f64> {
        match self.format.get("duration")? {
            Value::String(s) => s.trim().parse().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

/// Scan `codec_type=...` lines; lines mentioning neither type are ignored.
pub fn parse_codec_types(stdout: &str) -> CodecTypeSet {
    let mut types = CodecTypeSet::new();
    for line in stdout.lines() {
        if line.contains("audio") {
            types.insert(CodecType::Audio);
        }
        if line.contains("video") {
            types.insert(CodecType::Video);
        }
    }
    types
}

pub fn parse_duration_string(stdout: &str) -> String {
    stdout.trim().to_string()
}

/// Split `HH:MM:SS.ffffff` into units.
///
/// Seconds are read from the first five characters of the last segment, so
/// at most two fractional digits survive.
pub fn parse_duration_units(duration: &str) -> Result<DurationUnits> {
    let malformed = || ProbeError::MalformedDuration(duration.to_string());

    let parts: Vec<&str> = duration.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(malformed());
    }

    let seconds_field: String = parts[2].chars().take(5).collect();

    // `f64::from_str` accepts "NaN" and "inf", which are not durations
    let segment = |text: &str| match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(malformed()),
    };

    let hours = segment(parts[0])?;
    let minutes = segment(parts[1])?;
    let seconds = segment(seconds_field.as_str())?;

    Ok(DurationUnits { hours, minutes, seconds })
}

pub fn parse_duration_seconds(duration: &str) -> Result<f64> {
    parse_duration_units(duration).map(|units| units.total_seconds())
}

pub fn parse_info(stdout: &str) -> Result<MediaInfo> {
    Ok(serde_json::from_str(stdout.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codec_types_audio_only() {
        let types = parse_codec_types("codec_type=audio\ncodec_type=audio\n");
        assert!(types.contains(CodecType::Audio));
        assert!(!types.contains(CodecType::Video));
        assert!(types.is_audio());
        assert!(!types.is_video());
        assert_eq!(types.len(), 1);
    }

    #[test]
    fn test_parse_codec_types_mixed_and_noise() {
        let types = parse_codec_types("codec_type=video\r\ncodec_type=audio\r\ncodec_type=subtitle\r\n\r\n");
        assert!(types.is_video());
        assert!(!types.is_audio());
        assert_eq!(types.iter().collect::<Vec<_>>(), vec![CodecType::Video, CodecType::Audio]);
    }

    #[test]
    fn test_parse_codec_types_nothing_recognized() {
        let types = parse_codec_types("codec_type=data\n");
        assert!(types.is_empty());
        assert!(!types.is_audio());
        assert!(!types.is_video());
    }

    #[test]
    fn test_codec_type_set_serializes_as_list() {
        let types: CodecTypeSet = [CodecType::Audio, CodecType::Video].into_iter().collect();
        assert_eq!(serde_json::to_string(&types).unwrap(), r#"["video","audio"]"#);
    }

    #[test]
    fn test_parse_duration_units() {
        let units = parse_duration_units("01:02:03.450000").unwrap();
        assert_eq!(units.hours, 1.0);
        assert_eq!(units.minutes, 2.0);
        assert!((units.seconds - 3.45).abs() < 1e-9);
    }

    #[test]
    fn test_parse_duration_seconds() {
        let seconds = parse_duration_seconds("01:02:03.450000").unwrap();
        assert!((seconds - 3723.45).abs() < 1e-9);

        let seconds = parse_duration_seconds(" 0:00:09.999999\n").unwrap();
        assert!((seconds - 9.99).abs() < 1e-9);
    }

    #[test]
    fn test_parse_duration_wrong_segment_count() {
        for input in ["03.450000", "02:03.450000", "1:2:3:4", "", "N/A"] {
            match parse_duration_units(input) {
                Err(ProbeError::MalformedDuration(text)) => assert_eq!(text, input),
                other => panic!("expected MalformedDuration for {:?}, got {:?}", input, other),
            }
            assert!(matches!(parse_duration_seconds(input), Err(ProbeError::MalformedDuration(_))));
        }
    }

    #[test]
    fn test_parse_duration_non_numeric_segment() {
        for duration in ["aa:02:03.45", "NaN:00:01.00", "inf:00:01.00", "0:infinity:01.00", "0:00:-inf"] {
            assert!(
                matches!(parse_duration_units(duration), Err(ProbeError::MalformedDuration(_))),
                "{duration} should be malformed"
            );
        }
        assert!(matches!(
            parse_duration_seconds("inf:00:01.00"),
            Err(ProbeError::MalformedDuration(_))
        ));
    }

    #[test]
    fn test_parse_info_keeps_key_order() {
        let stdout = r#"{"streams":[{"index":0,"codec_name":"h264","codec_type":"video"}],"format":{"filename":"a.mp4","duration":"1.0"}}"#;
        let info = parse_info(stdout).unwrap();
        assert_eq!(
            serde_json::to_string(&info.streams[0]).unwrap(),
            r#"{"index":0,"codec_name":"h264","codec_type":"video"}"#
        );
        assert_eq!(
            serde_json::to_string(&info.format).unwrap(),
            r#"{"filename":"a.mp4","duration":"1.0"}"#
        );
    }

    #[test]
    fn test_parse_info_empty_document() {
        let info = parse_info(r#"{"streams":[],"format":{}}"#).unwrap();
        assert!(info.streams.is_empty());
        assert!(info.format.is_empty());
    }

    #[test]
    fn test_parse_info_keeps_fields_verbatim() {
        let stdout = r#"{
            "streams": [
                {"index": 0, "codec_name": "h264", "codec_type": "video", "width": 1920},
                {"index": 1, "codec_name": "aac", "codec_type": "audio", "channels": 2}
            ],
            "format": {"format_name": "mov,mp4,m4a,3gp,3g2,mj2", "duration": "12.500000"}
        }"#;
        let info = parse_info(stdout).unwrap();

        assert_eq!(info.streams.len(), 2);
        assert_eq!(info.streams[0]["width"], serde_json::json!(1920));
        assert_eq!(info.streams_of(CodecType::Audio).count(), 1);
        assert_eq!(info.format_name(), Some("mov,mp4,m4a,3gp,3g2,mj2"));
        assert_eq!(info.format_duration_seconds(), Some(12.5));
    }

    #[test]
    fn test_parse_info_invalid_json() {
        assert!(matches!(parse_info("not json"), Err(ProbeError::MalformedJson(_))));
        assert!(matches!(parse_info(""), Err(ProbeError::MalformedJson(_))));
    }
}
