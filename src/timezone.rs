//! Converts the configured timezone name into offsets and local times.

use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// The current UTC offset of `canonical_timezone`, e.g. "Asia/Kolkata".
///
/// Returns `None` if the name is not a known timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The wall-clock time now in `canonical_timezone`, to the minute.
pub fn local_now(canonical_timezone: &str) -> Option<PrimitiveDateTime> {
    let offset = get_local_offset(canonical_timezone)?;
    let now = OffsetDateTime::now_utc().to_offset(offset);
    let now = PrimitiveDateTime::new(now.date(), now.time());

    now.replace_second(0)
        .and_then(|now| now.replace_nanosecond(0))
        .ok()
}

#[cfg(test)]
mod timezone_tests {
    use time::UtcOffset;

    use super::{get_local_offset, local_now};

    #[test]
    fn kolkata_has_fixed_offset() {
        assert_eq!(
            get_local_offset("Asia/Kolkata"),
            UtcOffset::from_hms(5, 30, 0).ok()
        );
    }

    #[test]
    fn unknown_timezone_has_no_offset() {
        assert_eq!(get_local_offset("Not/AZone"), None);
        assert_eq!(local_now("Not/AZone"), None);
    }

    #[test]
    fn local_now_is_truncated_to_the_minute() {
        let now = local_now("Etc/UTC").unwrap();

        assert_eq!(now.second(), 0);
        assert_eq!(now.nanosecond(), 0);
    }
}
