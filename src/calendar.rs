use chrono::{Datelike, Months, NaiveDate};

use crate::errors::{DuesError, Result};

/// shift a date by whole months, clamping to the last day of shorter months
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| DuesError::InvalidDate {
            message: format!("{} plus {} months is out of range", date, months),
        })
}

/// shift a date back by whole months, clamping like `add_months`
pub fn sub_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_sub_months(Months::new(months))
        .ok_or_else(|| DuesError::InvalidDate {
            message: format!("{} minus {} months is out of range", date, months),
        })
}

/// calendar months between `start` and `as_of`, counting a started month as a whole one
///
/// The whole-month part is the largest `n` such that `start + n months <= as_of`; any
/// leftover days round the count up by one. An `as_of` before `start` yields zero or a
/// negative count and is never rounded up.
pub fn months_elapsed(start: NaiveDate, as_of: NaiveDate) -> Result<i64> {
    let raw = (as_of.year() as i64 - start.year() as i64) * 12
        + (as_of.month() as i64 - start.month() as i64);

    if as_of >= start {
        let mut months = raw.max(0) as u32;
        let mut anchor = add_months(start, months)?;
        if anchor > as_of {
            months -= 1;
            anchor = add_months(start, months)?;
        }
        let leftover_days = (as_of - anchor).num_days();
        let rounded = if leftover_days > 0 { months + 1 } else { months };
        Ok(rounded as i64)
    } else {
        let mut months = (-raw).max(0) as u32;
        let anchor = sub_months(start, months)?;
        if anchor < as_of && months > 0 {
            months -= 1;
        }
        Ok(-(months as i64))
    }
}

/// same year and month as `date`, with the day pinned to `day` (clamped to the month's length)
pub fn with_day_clamped(date: NaiveDate, day: u32) -> Result<NaiveDate> {
    let first = date.with_day(1).ok_or_else(|| DuesError::InvalidDate {
        message: format!("cannot take first day of month for {}", date),
    })?;
    let last_day = add_months(first, 1)?.pred_opt().map(|d| d.day()).unwrap_or(28);
    let clamped = day.clamp(1, last_day);
    first.with_day(clamped).ok_or_else(|| DuesError::InvalidDate {
        message: format!("day {} does not exist in {}-{:02}", day, date.year(), date.month()),
    })
}
