//! Remaining-lifetime calculation.
//!
//! # Responsibility
//! - Compute whole hours left until `birth_date + lifespan_years`.
//! - Load the primary user's settings for the dashboard.
//!
//! # Invariants
//! - The calculation is pure; `now` is always supplied by the caller.
//! - Results are floored to whole hours and never clamped at zero.
//! - A missing user yields `None`, which is distinct from an expired clock.

use crate::model::user::UserProfile;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;
use chrono::{DateTime, Months, NaiveDate, NaiveTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: i64 = 3_600;

/// Output of the pure calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remaining {
    /// Negative once the computed death date has passed.
    pub hours_left: i64,
}

/// Dashboard projection of the death clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathClock {
    pub birth_date: NaiveDate,
    pub lifespan_years: u32,
    pub purpose_label: String,
    pub hours_left: i64,
}

/// Returns midnight UTC of the date `lifespan_years` calendar years after
/// `birth_date`. Feb 29 birthdays land on Feb 28 in non-leap years.
pub fn death_instant(birth_date: NaiveDate, lifespan_years: u32) -> DateTime<Utc> {
    let death_date = birth_date
        .checked_add_months(Months::new(lifespan_years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MAX);
    death_date.and_time(NaiveTime::default()).and_utc()
}

/// Computes `floor((death_instant - now) / 1h)`.
pub fn compute_remaining(
    birth_date: NaiveDate,
    lifespan_years: u32,
    now: DateTime<Utc>,
) -> Remaining {
    let death = death_instant(birth_date, lifespan_years);
    // The death instant has no sub-second part, so any fractional second in
    // `now` borrows one whole second before flooring.
    let borrow = i64::from(now.timestamp_subsec_nanos() > 0);
    let whole_seconds = death.timestamp() - now.timestamp() - borrow;
    Remaining {
        hours_left: whole_seconds.div_euclid(SECONDS_PER_HOUR),
    }
}

impl DeathClock {
    pub fn for_user(user: &UserProfile, now: DateTime<Utc>) -> Self {
        let remaining = compute_remaining(user.birth_date, user.lifespan_years, now);
        Self {
            birth_date: user.birth_date,
            lifespan_years: user.lifespan_years,
            purpose_label: user.purpose_label.clone(),
            hours_left: remaining.hours_left,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.hours_left < 0
    }
}

/// Reads the primary user and projects the death clock.
pub struct DeathClockService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> DeathClockService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Death clock evaluated at the current instant.
    pub fn get_death_clock(&self) -> RepoResult<Option<DeathClock>> {
        self.get_death_clock_at(Utc::now())
    }

    /// Death clock evaluated at `now`.
    pub fn get_death_clock_at(&self, now: DateTime<Utc>) -> RepoResult<Option<DeathClock>> {
        let Some(user) = self.repo.primary_user()? else {
            debug!("event=death_clock_read module=death_clock status=absent");
            return Ok(None);
        };
        Ok(Some(DeathClock::for_user(&user, now)))
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_remaining, death_instant};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn leap_day_birthday_clamps_to_feb_28() {
        let death = death_instant(date(2000, 2, 29), 1);
        assert_eq!(death.date_naive(), date(2001, 2, 28));
    }

    #[test]
    fn value_drops_only_at_hour_boundaries() {
        let birth = date(2000, 1, 1);
        let on_the_hour = Utc.with_ymd_and_hms(2000, 12, 31, 22, 0, 0).unwrap();
        let just_after = on_the_hour + chrono::Duration::nanoseconds(1);
        let late_in_hour = Utc.with_ymd_and_hms(2000, 12, 31, 22, 59, 59).unwrap();

        assert_eq!(compute_remaining(birth, 1, on_the_hour).hours_left, 2);
        assert_eq!(compute_remaining(birth, 1, just_after).hours_left, 1);
        assert_eq!(compute_remaining(birth, 1, late_in_hour).hours_left, 1);
    }

    #[test]
    fn past_death_instant_floors_toward_negative_infinity() {
        let birth = date(2000, 1, 1);
        let half_hour_late = Utc.with_ymd_and_hms(2001, 1, 1, 0, 30, 0).unwrap();
        assert_eq!(compute_remaining(birth, 1, half_hour_late).hours_left, -1);

        let exactly = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(compute_remaining(birth, 1, exactly).hours_left, 0);
    }
}
