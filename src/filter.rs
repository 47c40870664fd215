use crate::errors::AppError;
use crate::model::Record;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Inclusive time range; an unset bound does not filter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn accept(&self, r: &Record) -> bool {
        let dt = r.datetime();
        if let Some(start) = self.start {
            if dt < start { return false; }
        }
        if let Some(end) = self.end {
            if dt > end { return false; }
        }
        true
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

pub fn parse_tz(name: &str) -> Result<Tz, AppError> {
    name.parse::<Tz>()
        .map_err(|e| AppError::Config(format!("timezone {:?}: {}", name, e)))
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD` or
/// `@<unix seconds>`. Naive forms are read in `tz`, or UTC when none is given.
pub fn parse_datetime_arg(s: &str, tz: Option<Tz>) -> Result<DateTime<Utc>, AppError> {
    let s = s.trim();
    let bad = || AppError::Config(format!("unrecognised datetime {:?}", s));

    if let Some(secs) = s.strip_prefix('@') {
        let secs = secs.parse::<i64>().map_err(|_| bad())?;
        return DateTime::from_timestamp(secs, 0).ok_or_else(bad);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(bad)?;

    apply_tz(naive, tz)
}

#[inline]
fn apply_tz(naive: NaiveDateTime, tz: Option<Tz>) -> Result<DateTime<Utc>, AppError> {
    match tz {
        Some(tz) => tz
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| AppError::Config("ambiguous/invalid local datetime for provided timezone".into()))
            .map(|dt| dt.with_timezone(&Utc)),
        None => Ok(Utc.from_utc_datetime(&naive)),
    }
}
