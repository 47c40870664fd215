//! Parsing of iridium-parser frame lines and reconstruction of VOC voice payloads
//! into a raw DFS byte stream for an AMBE decoder.

pub mod channels;
pub mod csv_out;
pub mod dfs;
pub mod errors;
pub mod filter;
pub mod frame_line;
pub mod frame_stats;
pub mod line_source;
pub mod model;
pub mod voc_line;
pub mod voice_bits;

pub use dfs::{bits_to_dfs, convert, ConversionReport, ConvertOptions};
pub use errors::{AppError, ParseCause};
pub use frame_line::parse_record;
pub use model::{FrameType, LinkDirection, Record, VoiceRecord};
pub use voc_line::parse_voice_record;
