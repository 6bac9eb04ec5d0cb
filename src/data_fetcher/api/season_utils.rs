//! Season label derivation and validation

use chrono::{Datelike, Local, NaiveDate};

use crate::constants::SEASON_ROLLOVER_MONTH;
use crate::error::AppError;

/// Returns the label of the season in progress, e.g. `2024-25`.
pub fn current_season() -> String {
    season_for_date(Local::now().date_naive())
}

/// Season label for a date. A new season starts in October: dates from
/// October to December of year Y belong to `Y-(Y+1)`, dates from January to
/// September to `(Y-1)-Y`, with the end year as two digits.
pub fn season_for_date(date: NaiveDate) -> String {
    let start_year = if date.month() < SEASON_ROLLOVER_MONTH {
        date.year() - 1
    } else {
        date.year()
    };
    season_label(start_year)
}

/// Formats the label of the season starting in `start_year`.
pub fn season_label(start_year: i32) -> String {
    format!("{start_year}-{:02}", (start_year + 1).rem_euclid(100))
}

/// Validates a user-supplied season label such as `2023-24` and returns its
/// start year.
pub fn parse_season_label(label: &str) -> Result<i32, AppError> {
    let label = label.trim();
    let (start, end) = label
        .split_once('-')
        .ok_or_else(|| AppError::invalid_season(label, "expected the form YYYY-YY"))?;

    if start.len() != 4 || end.len() != 2 {
        return Err(AppError::invalid_season(label, "expected the form YYYY-YY"));
    }
    let start_year: i32 = start
        .parse()
        .map_err(|_| AppError::invalid_season(label, "start year is not a number"))?;
    let end_year: i32 = end
        .parse()
        .map_err(|_| AppError::invalid_season(label, "end year is not a number"))?;

    if (start_year + 1).rem_euclid(100) != end_year {
        return Err(AppError::invalid_season(
            label,
            "end year must directly follow the start year",
        ));
    }
    Ok(start_year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_october_to_december_starts_new_season() {
        for month in 10..=12 {
            assert_eq!(season_for_date(date(2023, month, 1)), "2023-24");
            assert_eq!(season_for_date(date(2023, month, 28)), "2023-24");
        }
    }

    #[test]
    fn test_january_to_september_belongs_to_previous_start_year() {
        for month in 1..=9 {
            assert_eq!(season_for_date(date(2024, month, 15)), "2023-24");
        }
    }

    #[test]
    fn test_century_rollover_pads_end_year() {
        assert_eq!(season_for_date(date(1999, 11, 2)), "1999-00");
        assert_eq!(season_for_date(date(2008, 10, 30)), "2008-09");
    }

    #[test]
    fn test_parse_season_label() {
        assert_eq!(parse_season_label("2023-24").unwrap(), 2023);
        assert_eq!(parse_season_label(" 1999-00 ").unwrap(), 1999);
        assert!(parse_season_label("2023-25").is_err());
        assert!(parse_season_label("2023").is_err());
        assert!(parse_season_label("23-24").is_err());
        assert!(parse_season_label("abcd-24").is_err());
    }

    #[test]
    fn test_current_season_is_well_formed() {
        let season = current_season();
        assert!(parse_season_label(&season).is_ok());
    }
}
