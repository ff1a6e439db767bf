//! Cache staleness policy.

use chrono::NaiveDate;

/// Default maximum cache age: roughly six months.
pub const DEFAULT_MAX_AGE_DAYS: u32 = 180;

/// Freshness date of a cache that has never been filled.
pub const NEVER_REFRESHED: NaiveDate = NaiveDate::MIN;

/// Whether a cache last refreshed on `last_refreshed_on` is due a refresh.
///
/// Stale means strictly more than `max_age_days` whole days have passed, so
/// a cache exactly `max_age_days` old is still fresh. A cache that was never
/// refreshed is always stale; one stamped in the future never is.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use library_finder::freshness::{NEVER_REFRESHED, is_stale};
///
/// let today = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
/// let refreshed = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(); // 180 days earlier
///
/// assert!(!is_stale(refreshed, 180, today));
/// assert!(is_stale(refreshed.pred_opt().unwrap(), 180, today));
/// assert!(is_stale(NEVER_REFRESHED, 180, today));
/// ```
pub fn is_stale(last_refreshed_on: NaiveDate, max_age_days: u32, today: NaiveDate) -> bool {
    if last_refreshed_on == NEVER_REFRESHED {
        return true;
    }

    let age_days = today.signed_duration_since(last_refreshed_on).num_days();
    age_days > i64::from(max_age_days)
}
