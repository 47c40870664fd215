use crate::channels::nearest_channel;
use crate::errors::AppError;
use crate::model::Record;
use csv::Writer;
use log::info;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct FrameRow<'a> {
    frame_type: &'a str,
    timestamp: i64,
    datetime: String,
    frequency: u64,
    channel: &'a str,
    confidence: i32,
    level: f64,
    symbols: u32,
    direction: &'static str,
}

impl<'a> FrameRow<'a> {
    fn from_record(r: &'a Record) -> Self {
        FrameRow {
            frame_type: r.frame_type(),
            timestamp: r.timestamp(),
            datetime: r.datetime().format("%Y-%m-%d %H:%M:%S").to_string(),
            frequency: r.frequency(),
            channel: nearest_channel(r.frequency()).map_or("", |c| c.description.as_str()),
            confidence: r.confidence(),
            level: r.level(),
            symbols: r.symbols(),
            direction: r.link_direction().as_str(),
        }
    }
}

/// One CSV row per record, header first. Stops at the first failing record.
pub fn write_csv<I, W>(records: I, out: W) -> Result<usize, AppError>
where
    I: IntoIterator<Item = Result<Record, AppError>>,
    W: Write,
{
    let mut wtr = Writer::from_writer(out);
    let mut count: usize = 0;

    for r in records {
        let r = r?;
        wtr.serialize(FrameRow::from_record(&r))
            .map_err(|e| AppError::IO(format!("csv write row: {}", e)))?;
        count += 1;
    }

    // with no rows serialize never ran, so emit the header by hand
    if count == 0 {
        wtr.write_record([
            "frame_type", "timestamp", "datetime", "frequency", "channel",
            "confidence", "level", "symbols", "direction",
        ])
        .map_err(|e| AppError::IO(format!("csv write header: {}", e)))?;
    }

    wtr.flush().map_err(|e| AppError::IO(format!("csv flush: {}", e)))?;
    info!("CSV wrote {} rows", count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::TimeWindow;
    use crate::frame_stats::records;

    #[test]
    fn rows_follow_records() {
        let lines = [
            "IRA: i-1526300857-t1 000159537 1626270833 100%   0.003 130 DL sat:80 beam:30",
            "VOC: i-1526039037-t1 000065686 1500000000 81%   0.027 90 UL LCW(0,T:maint) 0101",
        ];
        let mut out = Vec::new();
        let n = write_csv(records(lines.map(Ok::<_, AppError>), &TimeWindow::default()), &mut out).unwrap();
        assert_eq!(n, 2);

        let text = String::from_utf8(out).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows[0], "frame_type,timestamp,datetime,frequency,channel,confidence,level,symbols,direction");
        assert_eq!(rows[1], "IRA,1526301016,2018-05-14 12:30:16,1626270833,Ring Alert,100,0.003,130,DL");
        assert_eq!(rows[2], "VOC,1526039102,2018-05-11 11:45:02,1500000000,,81,0.027,90,UL");
    }

    #[test]
    fn empty_input_still_has_header() {
        let mut out = Vec::new();
        let n = write_csv(std::iter::empty(), &mut out).unwrap();
        assert_eq!(n, 0);
        assert!(String::from_utf8(out).unwrap().starts_with("frame_type,timestamp"));
    }
}
