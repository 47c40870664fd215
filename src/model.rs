use chrono::{DateTime, Utc};

/// First token of every voice frame line.
pub const VOICE_FRAME_MARKER: &str = "VOC:";
/// Bursts shorter than this carry no usable voice payload.
pub const MIN_VOICE_SYMBOLS: u32 = 179;
/// Raw character column the LCW is read from (not a token index).
pub const LCW_COLUMN: usize = 8;
/// Token index of the voice payload on VOC lines.
pub const VOICE_PAYLOAD_TOKEN: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkDirection {
    Uplink,
    Downlink,
    NoDirection,
}

impl LinkDirection {
    pub fn from_marker(tok: &str) -> Self {
        match tok {
            "DL" => LinkDirection::Downlink,
            "UL" => LinkDirection::Uplink,
            _ => LinkDirection::NoDirection,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkDirection::Uplink => "UL",
            LinkDirection::Downlink => "DL",
            LinkDirection::NoDirection => "none",
        }
    }
}

/// Frame classes emitted by iridium-parser. Anything unrecognised keeps its label.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrameType {
    Voice,
    RingAlert,
    Broadcast,
    Messaging,
    Data,
    Sync,
    Other(String),
}

impl FrameType {
    pub fn from_label(label: &str) -> Self {
        match label {
            "VOC" => FrameType::Voice,
            "IRA" => FrameType::RingAlert,
            "IBC" => FrameType::Broadcast,
            "MSG" => FrameType::Messaging,
            "IDA" => FrameType::Data,
            "ISY" => FrameType::Sync,
            other => FrameType::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FrameType::Voice => "VOC",
            FrameType::RingAlert => "IRA",
            FrameType::Broadcast => "IBC",
            FrameType::Messaging => "MSG",
            FrameType::Data => "IDA",
            FrameType::Sync => "ISY",
            FrameType::Other(s) => s,
        }
    }
}

/// One parsed frame description line. Built only by [`crate::frame_line::parse_record`].
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub(crate) raw_line: String,
    pub(crate) frame_type: FrameType,
    pub(crate) timestamp: i64,
    pub(crate) frequency: u64,
    pub(crate) confidence: i32,
    pub(crate) level: f64,
    pub(crate) symbols: u32,
    pub(crate) link_direction: LinkDirection,
}

impl Record {
    pub fn raw_line(&self) -> &str { &self.raw_line }

    pub fn frame_type(&self) -> &str { self.frame_type.label() }

    pub fn kind(&self) -> &FrameType { &self.frame_type }

    /// Seconds since the epoch.
    pub fn timestamp(&self) -> i64 { self.timestamp }

    pub fn datetime(&self) -> DateTime<Utc> {
        // parse_record rejects timestamps chrono cannot represent
        DateTime::from_timestamp(self.timestamp, 0).unwrap_or_default()
    }

    pub fn frequency(&self) -> u64 { self.frequency }

    pub fn confidence(&self) -> i32 { self.confidence }

    pub fn level(&self) -> f64 { self.level }

    pub fn symbols(&self) -> u32 { self.symbols }

    pub fn link_direction(&self) -> LinkDirection { self.link_direction }

    pub fn is_uplink(&self) -> bool { self.link_direction == LinkDirection::Uplink }

    pub fn is_downlink(&self) -> bool { self.link_direction == LinkDirection::Downlink }
}

/// A VOC frame: the generic record plus the LCW column and, for long enough
/// bursts, the still-encoded voice payload.
#[derive(Clone, Debug, PartialEq)]
pub struct VoiceRecord {
    pub(crate) record: Record,
    pub(crate) lcw: char,
    pub(crate) voice_payload: Option<String>,
}

impl VoiceRecord {
    pub fn record(&self) -> &Record { &self.record }

    pub fn lcw(&self) -> char { self.lcw }

    pub fn voice_payload(&self) -> Option<&str> { self.voice_payload.as_deref() }
}

impl AsRef<Record> for VoiceRecord {
    fn as_ref(&self) -> &Record { &self.record }
}
