use time::OffsetDateTime;
use time_tz::{timezones, OffsetDateTimeExt};

/// Day buckets are anchored to Pacific civil time no matter where the server
/// or client physically run, so "today" flips at midnight Los Angeles.
pub fn current_date_string() -> String {
    date_string_at(OffsetDateTime::now_utc())
}

pub fn date_string_at(instant: OffsetDateTime) -> String {
    let local = instant.to_timezone(timezones::db::america::LOS_ANGELES);
    let date = local.date();
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn stable_for_a_fixed_instant() {
        let instant = datetime!(2024-06-15 18:30 UTC);
        assert_eq!(date_string_at(instant), date_string_at(instant));
        assert_eq!(date_string_at(instant), "2024-06-15");
    }

    #[test]
    fn midnight_boundary_follows_pacific_offset() {
        // Winter offset is UTC-8: 07:59 UTC is still the previous civil day.
        assert_eq!(date_string_at(datetime!(2024-01-20 07:59 UTC)), "2024-01-19");
        assert_eq!(date_string_at(datetime!(2024-01-20 08:01 UTC)), "2024-01-20");
    }

    #[test]
    fn spring_forward_transition() {
        // DST began 2024-03-10 02:00 PST (10:00 UTC).
        assert_eq!(date_string_at(datetime!(2024-03-10 07:59 UTC)), "2024-03-09");
        assert_eq!(date_string_at(datetime!(2024-03-10 08:01 UTC)), "2024-03-10");
        assert_eq!(date_string_at(datetime!(2024-03-10 10:30 UTC)), "2024-03-10");
        // The next midnight arrives at UTC-7.
        assert_eq!(date_string_at(datetime!(2024-03-11 06:59 UTC)), "2024-03-10");
        assert_eq!(date_string_at(datetime!(2024-03-11 07:01 UTC)), "2024-03-11");
    }

    #[test]
    fn fall_back_transition() {
        // DST ended 2024-11-03 02:00 PDT (09:00 UTC).
        assert_eq!(date_string_at(datetime!(2024-11-03 06:59 UTC)), "2024-11-02");
        assert_eq!(date_string_at(datetime!(2024-11-03 07:01 UTC)), "2024-11-03");
        // Back on UTC-8 the following midnight.
        assert_eq!(date_string_at(datetime!(2024-11-04 07:59 UTC)), "2024-11-03");
        assert_eq!(date_string_at(datetime!(2024-11-04 08:01 UTC)), "2024-11-04");
    }
}
