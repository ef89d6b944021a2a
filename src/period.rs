//! The calendar month that aggregates and resets are scoped to.

use time::{Date, Month, OffsetDateTime};

use crate::{Error, timezone::get_local_offset};

/// A calendar month in a specific year, e.g. March 2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    /// The month number, 1-12.
    pub month: u8,
    /// The four digit year.
    pub year: i32,
}

impl Period {
    /// The period containing `date`.
    pub fn containing(date: Date) -> Self {
        Self {
            month: date.month() as u8,
            year: date.year(),
        }
    }

    /// The current period in the timezone `local_timezone`, a canonical
    /// timezone name such as "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if `local_timezone` is not a known
    /// canonical timezone name.
    pub fn current(local_timezone: &str) -> Result<Self, Error> {
        let local_offset = get_local_offset(local_timezone).ok_or_else(|| {
            tracing::error!("Invalid timezone {}", local_timezone);
            Error::InvalidTimezone(local_timezone.to_owned())
        })?;

        let today = OffsetDateTime::now_utc().to_offset(local_offset).date();

        Ok(Self::containing(today))
    }

    /// The first day of this period.
    pub fn first_day(&self) -> Date {
        Date::from_calendar_date(self.year, month_from_number(self.month), 1)
            .expect("a period always holds a valid month and year")
    }

    /// The first day of the following period.
    ///
    /// Together with [Period::first_day] this gives the half-open date range
    /// covering exactly this calendar month.
    pub fn first_day_of_next(&self) -> Date {
        let (year, month) = match self.month {
            12 => (self.year + 1, 1),
            month => (self.year, month + 1),
        };

        Date::from_calendar_date(year, month_from_number(month), 1)
            .expect("a period always holds a valid month and year")
    }
}

fn month_from_number(month: u8) -> Month {
    Month::try_from(month).expect("a period always holds a month number between 1 and 12")
}

#[cfg(test)]
mod period_tests {
    use time::macros::date;

    use super::Period;

    #[test]
    fn containing_takes_month_and_year_from_date() {
        let period = Period::containing(date!(2024 - 03 - 15));

        assert_eq!(period, Period {
            month: 3,
            year: 2024
        });
    }

    #[test]
    fn date_range_covers_whole_month() {
        let period = Period {
            month: 3,
            year: 2024,
        };

        assert_eq!(period.first_day(), date!(2024 - 03 - 01));
        assert_eq!(period.first_day_of_next(), date!(2024 - 04 - 01));
    }

    #[test]
    fn december_rolls_over_to_next_year() {
        let period = Period {
            month: 12,
            year: 2024,
        };

        assert_eq!(period.first_day_of_next(), date!(2025 - 01 - 01));
    }

    #[test]
    fn current_fails_on_unknown_timezone() {
        let result = Period::current("Atlantis/Mu");

        assert!(matches!(
            result,
            Err(crate::Error::InvalidTimezone(name)) if name == "Atlantis/Mu"
        ));
    }

    #[test]
    fn current_succeeds_on_utc() {
        Period::current("Etc/UTC").expect("Etc/UTC should be a valid timezone");
    }
}
