//! VOC lines -> DFS byte stream for `ir77_ambe_decode`.
//!
//! Every decoded payload is appended to the sink back to back, in input order, with no
//! header or per-frame framing. Any parse or decode failure aborts the whole run; bytes
//! already written stay in the sink.

use crate::errors::AppError;
use crate::filter::TimeWindow;
use crate::frame_line::ensure_parsed_stage;
use crate::model::VOICE_FRAME_MARKER;
use crate::voc_line::parse_voice_record;
use log::{debug, info, trace, warn};
use std::io::Write;

/// LCW field value of frames that carry no useful voice.
pub const CORRUPT_LCW_PATTERN: &str = "LCW(0,001111,100000000000000000000";

#[derive(Clone, Debug)]
pub struct ConvertOptions {
    pub window: TimeWindow,
    /// Exact substring; lines containing it are skipped.
    pub corrupt_lcw_pattern: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            window: TimeWindow::default(),
            corrupt_lcw_pattern: CORRUPT_LCW_PATTERN.into(),
        }
    }
}

impl ConvertOptions {
    /// An empty pattern would match every line and silently drop all voice frames.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.corrupt_lcw_pattern.is_empty() {
            return Err(AppError::Config("corrupt LCW pattern must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub lines_read: usize,
    pub voice_frames: usize,
    pub corrupt_skipped: usize,
    pub short_frames: usize,
    pub out_of_window: usize,
    pub frames_written: usize,
    pub bytes_written: usize,
}

/// Convert with default options: no time window, standard corrupt-LCW pattern.
pub fn bits_to_dfs<I, S, W>(lines: I, sink: &mut W) -> Result<ConversionReport, AppError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    W: Write,
{
    convert(lines.into_iter().map(Ok::<S, AppError>), sink, &ConvertOptions::default())
}

/// Drive the converter over a fallible line source (see [`crate::line_source`]).
pub fn convert<I, S, W>(lines: I, sink: &mut W, opts: &ConvertOptions) -> Result<ConversionReport, AppError>
where
    I: IntoIterator<Item = Result<S, AppError>>,
    S: AsRef<str>,
    W: Write,
{
    opts.validate()?;
    let mut report = ConversionReport::default();

    for line in lines {
        let line = line?;
        let line = line.as_ref().trim();
        report.lines_read += 1;

        ensure_parsed_stage(line)?;

        if line.split_whitespace().next() != Some(VOICE_FRAME_MARKER) {
            trace!("skip non-VOC line {}", report.lines_read);
            continue;
        }
        report.voice_frames += 1;

        if line.contains(opts.corrupt_lcw_pattern.as_str()) {
            trace!("skip corrupt LCW line {}", report.lines_read);
            report.corrupt_skipped += 1;
            continue;
        }

        let voc = parse_voice_record(line)?;
        if !opts.window.accept(voc.record()) {
            report.out_of_window += 1;
            continue;
        }

        match voc.voice_bits()? {
            Some(bytes) => {
                sink.write_all(&bytes)?;
                debug!(
                    "VOC ts={} freq={} -> {} bytes",
                    voc.record().timestamp(),
                    voc.record().frequency(),
                    bytes.len()
                );
                report.frames_written += 1;
                report.bytes_written += bytes.len();
            }
            None => report.short_frames += 1,
        }
    }

    sink.flush()?;

    if report.bytes_written == 0 {
        warn!("no voice data written from {} lines", report.lines_read);
    }
    info!(
        "DFS wrote {} bytes from {} of {} VOC frames ({} corrupt, {} short, {} outside window)",
        report.bytes_written,
        report.frames_written,
        report.voice_frames,
        report.corrupt_skipped,
        report.short_frames,
        report.out_of_window
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const A: &str = "VOC: i-1526039037-t1 000065686 1620359296 100%   0.003 179 DL LCW(0,T:maint,C:maint[2][lqi:3,power:0,f_dtoa:0,f_dfoa:127](3),786686 E0)   [01.02]";
    const B: &str = "VOC: i-1526039137-t1 000065686 1620359296 100%   0.003 200 UL LCW(0,T:maint,C:maint[2][lqi:3,power:0,f_dtoa:0,f_dfoa:127](3),786686 E0)   11000000";

    #[test]
    fn report_counts_each_outcome() {
        let corrupt = "VOC: i-1526039037-t1 000065686 1620359296 100% 0.003 179 L:no LCW(0,001111,100000000000000000000 E1) 1111";
        let short = A.replace(" 179 ", " 100 ");
        let lines = vec![A, "IRA: whatever", corrupt, short.as_str(), B];

        let mut out = Vec::new();
        let report = bits_to_dfs(lines, &mut out).unwrap();

        assert_eq!(out, vec![0x01, 0x02, 0x03]);
        assert_eq!(
            report,
            ConversionReport {
                lines_read: 5,
                voice_frames: 4,
                corrupt_skipped: 1,
                short_frames: 1,
                out_of_window: 0,
                frames_written: 2,
                bytes_written: 3,
            }
        );
    }

    #[test]
    fn window_drops_frames_outside_range() {
        let opts = ConvertOptions {
            window: TimeWindow {
                start: Some(Utc.timestamp_opt(1526039150, 0).unwrap()),
                end: None,
            },
            ..ConvertOptions::default()
        };
        let mut out = Vec::new();
        let lines = [A, B].into_iter().map(Ok::<_, AppError>);
        let report = convert(lines, &mut out, &opts).unwrap();

        assert_eq!(out, vec![0x03]);
        assert_eq!(report.out_of_window, 1);
    }

    #[test]
    fn custom_corrupt_pattern() {
        let opts = ConvertOptions { corrupt_lcw_pattern: "786686 E0".into(), ..ConvertOptions::default() };
        let mut out = Vec::new();
        let report = convert([A, B].into_iter().map(Ok::<_, AppError>), &mut out, &opts).unwrap();
        assert!(out.is_empty());
        assert_eq!(report.corrupt_skipped, 2);
    }

    #[test]
    fn empty_corrupt_pattern_is_refused() {
        let opts = ConvertOptions { corrupt_lcw_pattern: String::new(), ..ConvertOptions::default() };
        let mut out = Vec::new();
        let err = convert([A, B].into_iter().map(Ok::<_, AppError>), &mut out, &opts).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(out.is_empty());
        assert!(ConvertOptions::default().validate().is_ok());
    }

    #[test]
    fn source_errors_abort() {
        let lines: Vec<Result<&str, AppError>> = vec![Ok(A), Err(AppError::IO("disk gone".into())), Ok(B)];
        let mut out = Vec::new();
        let err = convert(lines, &mut out, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, AppError::IO(_)));
        assert_eq!(out, vec![0x01, 0x02]);
    }
}
