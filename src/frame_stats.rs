use crate::channels::nearest_channel;
use crate::errors::AppError;
use crate::filter::TimeWindow;
use crate::frame_line::{ensure_parsed_stage, parse_record};
use crate::model::Record;
use chrono::{DateTime, Utc};
use log::{info, trace};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// iridium-parser error lines; they never follow the frame grammar.
pub const ERROR_FRAME_PREFIX: &str = "ERR: ";

/// Parsed records from a line stream, restricted to `window`.
///
/// Blank and `ERR: ` lines are skipped; raw extractor lines and unparseable frames are
/// yielded as errors, which callers treat as fatal.
pub fn records<I, S>(lines: I, window: &TimeWindow) -> impl Iterator<Item = Result<Record, AppError>>
where
    I: IntoIterator<Item = Result<S, AppError>>,
    S: AsRef<str>,
{
    lines.into_iter().filter_map(move |line| {
        let line = match line {
            Ok(l) => l,
            Err(e) => return Some(Err(e)),
        };
        let line = line.as_ref().trim();
        if let Err(e) = ensure_parsed_stage(line) {
            return Some(Err(e));
        }
        if line.is_empty() || line.starts_with(ERROR_FRAME_PREFIX) {
            trace!("skip {:?}", line);
            return None;
        }
        match parse_record(line) {
            Ok(r) if window.accept(&r) => Some(Ok(r)),
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        }
    })
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct FrameStats {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_direction: BTreeMap<&'static str, usize>,
    /// Keyed by catalog channel name, `off-plan` when no channel is near.
    pub by_channel: BTreeMap<&'static str, usize>,
    pub first: Option<DateTime<Utc>>,
    pub last: Option<DateTime<Utc>>,
}

impl FrameStats {
    pub fn add(&mut self, r: &Record) {
        self.total += 1;
        *self.by_type.entry(r.frame_type().to_string()).or_default() += 1;
        *self.by_direction.entry(r.link_direction().as_str()).or_default() += 1;
        let channel = nearest_channel(r.frequency()).map_or("off-plan", |c| c.description.as_str());
        *self.by_channel.entry(channel).or_default() += 1;

        let dt = r.datetime();
        self.first = Some(self.first.map_or(dt, |f| f.min(dt)));
        self.last = Some(self.last.map_or(dt, |l| l.max(dt)));
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Read {} lines from input", self.total);
        for (frame_type, n) in &self.by_type {
            let _ = writeln!(out, " - Read {}\t{} lines from input", n, frame_type);
        }
        for (dir, n) in &self.by_direction {
            let _ = writeln!(out, " - {}\t{}", dir, n);
        }
        for (channel, n) in &self.by_channel {
            let _ = writeln!(out, " - {}\t{}", channel, n);
        }
        if let (Some(first), Some(last)) = (self.first, self.last) {
            let _ = writeln!(out, "From {} to {}", first.to_rfc3339(), last.to_rfc3339());
        }
        out
    }
}

pub fn collect_stats<I, S>(lines: I, window: &TimeWindow) -> Result<FrameStats, AppError>
where
    I: IntoIterator<Item = Result<S, AppError>>,
    S: AsRef<str>,
{
    let mut stats = FrameStats::default();
    for rec in records(lines, window) {
        stats.add(&rec?);
    }
    info!("Read {} lines from input", stats.total);
    for (frame_type, n) in &stats.by_type {
        info!(" - Read {}\t{} lines from input", n, frame_type);
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(lines: &[&'static str]) -> Vec<Result<&'static str, AppError>> {
        lines.iter().copied().map(Ok).collect()
    }

    const VOC: &str = "VOC: i-1526039037-t1 000065686 1620359296 100%   0.003 179 DL LCW(0,T:maint) [df.ff]";
    const IRA: &str = "IRA: i-1526300857-t1 000159537 1626270833 100%   0.003 130 DL sat:80 beam:30";
    const IRA_UL: &str = "IRA: i-1526300000-t1 000000000 1626270833 90%   0.003 130 UL sat:80 beam:30";
    const ERR: &str = "ERR: i-1526300857-t1 000159537 1626299264 A:OK ERR:Message: Couldn't parse: RAW";

    #[test]
    fn counts_by_type_direction_and_channel() {
        let stats = collect_stats(ok(&[VOC, "", IRA, ERR, IRA_UL]), &TimeWindow::default()).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_type.get("IRA"), Some(&2));
        assert_eq!(stats.by_type.get("VOC"), Some(&1));
        assert_eq!(stats.by_direction.get("DL"), Some(&2));
        assert_eq!(stats.by_direction.get("UL"), Some(&1));
        assert_eq!(stats.by_channel.get("Ring Alert"), Some(&2));
        assert_eq!(stats.first.unwrap().timestamp(), 1526039102);
        assert_eq!(stats.last.unwrap().timestamp(), 1526301016);

        let text = stats.render_text();
        assert!(text.contains(" - Read 2\tIRA lines from input"));
    }

    #[test]
    fn duplex_channels_are_counted_separately() {
        let lines = [
            "VOC: i-1526039037-t1 000000000 1616020833 100% 0.003 90 DL LCW(0,x E0)",
            "VOC: i-1526039037-t1 000000000 1616062499 100% 0.003 90 DL LCW(0,x E0)",
            "VOC: i-1526039037-t1 000000000 1616062500 100% 0.003 90 UL LCW(0,x E0)",
            "VOC: i-1526039037-t1 000000000 1500000000 100% 0.003 90 UL LCW(0,x E0)",
        ];
        let stats = collect_stats(ok(&lines), &TimeWindow::default()).unwrap();
        assert_eq!(stats.by_channel.get("Channel 1"), Some(&1));
        assert_eq!(stats.by_channel.get("Channel 2"), Some(&2));
        assert_eq!(stats.by_channel.get("off-plan"), Some(&1));
        assert_eq!(stats.by_channel.len(), 3);
    }

    #[test]
    fn parse_failure_is_fatal() {
        let res = collect_stats(ok(&[IRA, "IRA: garbage", VOC]), &TimeWindow::default());
        assert!(matches!(res, Err(AppError::Parse { .. })));
    }

    #[test]
    fn raw_data_is_rejected() {
        let raw = "RAW: i-1525892321-t1 0001338 1623702528 A:OK I:00000000027  79% 0.001 179 0011";
        let res = collect_stats(ok(&[IRA, raw]), &TimeWindow::default());
        assert!(matches!(res, Err(AppError::PipelineMismatch { .. })));
    }

    #[test]
    fn serialises_to_json() {
        let stats = collect_stats(ok(&[IRA]), &TimeWindow::default()).unwrap();
        let v = serde_json::to_value(&stats).unwrap();
        assert_eq!(v["total"], 1);
        assert_eq!(v["by_type"]["IRA"], 1);
    }
}
