//! Whitespace grammar shared by every iridium-parser frame line.
//!
//! ```text
//! VOC: i-1526039037-t1 000065686 1620359296 100%   0.003 179 DL LCW(...) ...
//! ^0   ^1              ^2        ^3         ^4     ^5    ^6  ^7
//! type time base       offset    freq (Hz)  conf   level sym direction
//! ```
//!
//! The time base token comes in two historical layouts, `i-<epoch>.<fraction>-t<id>`
//! and `i-<epoch>-t<id>`. Only the integer epoch part is used.

use crate::errors::{AppError, ParseCause};
use crate::model::{FrameType, LinkDirection, Record};
use chrono::DateTime;
use log::{error, trace};
use std::str::FromStr;

/// Only present on raw iridium-extractor output.
pub const RAW_STAGE_MARKER: &str = "A:OK";
/// iridium-parser passes undecodable raw frames through with this annotation.
pub const UNPARSEABLE_MARKER: &str = "Message: Couldn't parse:";

/// Reject lines that still come from the raw extractor stage.
pub fn ensure_parsed_stage(line: &str) -> Result<(), AppError> {
    if line.contains(RAW_STAGE_MARKER) && !line.contains(UNPARSEABLE_MARKER) {
        return Err(AppError::PipelineMismatch { line: line.to_string() });
    }
    Ok(())
}

/// Parse one already-stripped frame line. Either every field converts or the
/// whole line is rejected with the raw text attached.
pub fn parse_record(line: &str) -> Result<Record, AppError> {
    parse_fields(line).map_err(|cause| {
        error!("Failed to parse line \"{}\"", line);
        AppError::parse(line, cause)
    })
}

/// `time_base + floor(time_offset / 1000)`. The result must be a non-negative
/// second count chrono can represent.
pub fn derive_timestamp(time_base: u64, time_offset: i64) -> Result<i64, ParseCause> {
    let ts = i64::try_from(time_base)
        .ok()
        .and_then(|base| base.checked_add(time_offset.div_euclid(1000)))
        .filter(|ts| *ts >= 0)
        .ok_or(ParseCause::TimestampOverflow)?;
    if DateTime::from_timestamp(ts, 0).is_none() {
        return Err(ParseCause::TimestampOverflow);
    }
    Ok(ts)
}

fn parse_fields(line: &str) -> Result<Record, ParseCause> {
    let toks: Vec<&str> = line.split_whitespace().collect();
    let tok = |i: usize, name: &'static str| toks.get(i).copied().ok_or(ParseCause::MissingToken(name));

    let frame_type = FrameType::from_label(drop_last_char(tok(0, "frame type")?));
    let time_base = parse_time_base(tok(1, "time base")?)?;
    let time_offset = parse_int::<i64>(tok(2, "time offset")?, "time offset")?;
    let timestamp = derive_timestamp(time_base, time_offset)?;
    let frequency = parse_int::<u64>(tok(3, "frequency")?, "frequency")?;
    let confidence = parse_int::<i32>(drop_last_char(tok(4, "confidence")?), "confidence")?;
    let level = tok(5, "level")?
        .parse::<f64>()
        .map_err(|source| ParseCause::InvalidFloat { field: "level", source })?;
    let symbols = parse_int::<u32>(tok(6, "symbols")?, "symbols")?;
    let link_direction = LinkDirection::from_marker(tok(7, "direction")?);

    trace!(
        "frame {} ts={} freq={} conf={} level={} sym={} dir={:?}",
        frame_type.label(), timestamp, frequency, confidence, level, symbols, link_direction
    );

    Ok(Record {
        raw_line: line.to_string(),
        frame_type,
        timestamp,
        frequency,
        confidence,
        level,
        symbols,
        link_direction,
    })
}

/// Integer between `i-` and the next `.` or `-`.
fn parse_time_base(tok: &str) -> Result<u64, ParseCause> {
    let epoch = tok
        .split('-')
        .nth(1)
        .ok_or(ParseCause::MissingToken("time base epoch"))?;
    let whole = epoch.split('.').next().unwrap_or(epoch);
    parse_int::<u64>(whole, "time base")
}

#[inline]
fn parse_int<T>(s: &str, field: &'static str) -> Result<T, ParseCause>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    s.parse::<T>().map_err(|source| ParseCause::InvalidInt { field, source })
}

/// Strips the trailing marker (`:` on frame types, `%` on confidence).
#[inline]
fn drop_last_char(s: &str) -> &str {
    let mut chars = s.chars();
    chars.next_back();
    chars.as_str()
}
