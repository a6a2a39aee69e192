//! market_hours.rs
//!
//! Market session clock. Given an instant and a trading calendar, works out whether the exchange
//! is open and how long until it opens or closes. Everything is evaluated in the calendar's
//! exchange time zone, never in the caller's local zone.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

// https://www.nyse.com/markets/hours-calendars
pub static MARKET_OPEN_TIME: Lazy<NaiveTime> = Lazy::new(|| NaiveTime::from_hms_opt(9, 30, 0).unwrap()); // 9:30am Eastern
pub static MARKET_CLOSE_TIME: Lazy<NaiveTime> = Lazy::new(|| NaiveTime::from_hms_opt(16, 0, 0).unwrap()); // 4pm

pub const DEFAULT_EXCHANGE_TZ: Tz = chrono_tz::America::New_York;

pub const MESSAGE_OPEN: &str = "Markets are open";
pub const MESSAGE_CLOSED: &str = "Markets are closed";

const MILLIS_PER_MINUTE: i64 = 60_000;
const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Fixed trading-hours calendar for one exchange. No holidays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingCalendar {
    pub timezone: Tz,
    pub open: NaiveTime,
    pub close: NaiveTime,
    pub trading_days: Vec<Weekday>,
}

impl Default for TradingCalendar {
    /// NYSE regular session, Monday to Friday
    fn default() -> Self {
        TradingCalendar {
            timezone: DEFAULT_EXCHANGE_TZ,
            open: *MARKET_OPEN_TIME,
            close: *MARKET_CLOSE_TIME,
            trading_days: vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
        }
    }
}

impl TradingCalendar {
    pub fn is_trading_day(&self, weekday: Weekday) -> bool {
        self.trading_days.contains(&weekday)
    }

    /// opening bell on the given exchange-local date
    pub fn open_on(&self, date: NaiveDate) -> DateTime<Tz> {
        self.localize(date.and_time(self.open))
    }

    /// closing bell on the given exchange-local date
    pub fn close_on(&self, date: NaiveDate) -> DateTime<Tz> {
        self.localize(date.and_time(self.close))
    }

    /// Opening bell of the first trading day strictly after `date`.
    ///
    /// Searches one week ahead at most; a calendar without trading days gets the open time a week
    /// out so the clock still has something to count down to.
    pub fn next_open_after(&self, date: NaiveDate) -> DateTime<Tz> {
        let mut day = date;
        for _ in 0..7 {
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
            if self.is_trading_day(day.weekday()) {
                return self.open_on(day);
            }
        }
        self.open_on(day)
    }

    /// Wall-clock time to instant. Ambiguous times (fall back) take the earlier mapping, times
    /// inside a spring-forward gap are pushed forward by an hour.
    fn localize(&self, naive: NaiveDateTime) -> DateTime<Tz> {
        match self.timezone.from_local_datetime(&naive).earliest() {
            Some(local) => local,
            None => self
                .timezone
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
                .unwrap_or_else(|| self.timezone.from_utc_datetime(&naive)),
        }
    }
}

/// Snapshot of the market state at one instant. Recompute it, don't cache it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStatus {
    pub is_open: bool,
    pub message: String,
    pub time_until_change: String,
}

impl MarketStatus {
    fn open(until_close: String) -> MarketStatus {
        MarketStatus {
            is_open: true,
            message: MESSAGE_OPEN.to_string(),
            time_until_change: format!("Closes {}", until_close),
        }
    }

    fn closed(until_open: String) -> MarketStatus {
        MarketStatus {
            is_open: false,
            message: MESSAGE_CLOSED.to_string(),
            time_until_change: format!("Opens {}", until_open),
        }
    }
}

/// Evaluate the calendar at `now`.
///
/// The open and close instants themselves count as closed. After the close the countdown targets
/// the next trading day's open, so a Friday evening counts down to Monday rather than Saturday.
pub fn compute_status(now: DateTime<Utc>, calendar: &TradingCalendar) -> MarketStatus {
    let local = now.with_timezone(&calendar.timezone);
    let today = local.date_naive();

    if !calendar.is_trading_day(local.weekday()) {
        let next_open = calendar.next_open_after(today);
        return MarketStatus::closed(format_duration(&local, &next_open));
    }

    let open = calendar.open_on(today);
    let close = calendar.close_on(today);

    if local > open && local < close {
        MarketStatus::open(format_duration(&local, &close))
    } else if local <= open {
        MarketStatus::closed(format_duration(&local, &open))
    } else {
        let next_open = calendar.next_open_after(today);
        MarketStatus::closed(format_duration(&local, &next_open))
    }
}

/// Compact countdown between two instants: "in 5m", "in 2h 30m", "in 1d 3h".
///
/// Everything truncates. Minutes are dropped once the gap is over a day. `to` earlier than `from`
/// gives a meaningless string, it does not panic.
pub fn format_duration<A: TimeZone, B: TimeZone>(from: &DateTime<A>, to: &DateTime<B>) -> String {
    let diff = to.timestamp_millis() - from.timestamp_millis();
    let hours = diff / MILLIS_PER_HOUR;
    let minutes = (diff % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;

    if hours > 24 {
        let days = hours / 24;
        let remaining_hours = hours % 24;
        if remaining_hours == 0 {
            format!("in {}d", days)
        } else {
            format!("in {}d {}h", days, remaining_hours)
        }
    } else if hours > 0 {
        if minutes == 0 {
            format!("in {}h", hours)
        } else {
            format!("in {}h {}m", hours, minutes)
        }
    } else {
        format!("in {}m", minutes)
    }
}

/// the exchange-local calendar date of an instant
pub fn exchange_date(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

pub struct MarketHours {}

impl MarketHours {
    /// status right now
    pub fn status(calendar: &TradingCalendar) -> MarketStatus {
        let now = Utc::now();
        let status = compute_status(now, calendar);
        tracing::debug!("[status] now: {}; {:?}", &now.with_timezone(&calendar.timezone), &status);
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// exchange wall-clock time in New York as a UTC instant
    fn ny(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        DEFAULT_EXCHANGE_TZ
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    // 2024-06-10 is a Monday
    #[test]
    fn test_monday_before_open() {
        let status = compute_status(ny(2024, 6, 10, 9, 15), &TradingCalendar::default());
        assert!(!status.is_open);
        assert_eq!(status.message, MESSAGE_CLOSED);
        assert_eq!(status.time_until_change, "Opens in 15m");
    }

    #[test]
    fn test_wednesday_midday_open() {
        let status = compute_status(ny(2024, 6, 12, 12, 0), &TradingCalendar::default());
        assert!(status.is_open);
        assert_eq!(status.message, MESSAGE_OPEN);
        assert_eq!(status.time_until_change, "Closes in 4h");
    }

    #[test]
    fn test_friday_after_close_targets_monday() {
        // Fri 16:01 -> Mon 09:30 is 65h 29m
        let status = compute_status(ny(2024, 6, 14, 16, 1), &TradingCalendar::default());
        assert!(!status.is_open);
        assert_eq!(status.message, MESSAGE_CLOSED);
        assert_eq!(status.time_until_change, "Opens in 2d 17h");
    }

    #[test]
    fn test_saturday_targets_monday() {
        // Sat 10:00 -> Mon 09:30 is 47h 30m
        let status = compute_status(ny(2024, 6, 15, 10, 0), &TradingCalendar::default());
        assert!(!status.is_open);
        assert_eq!(status.time_until_change, "Opens in 1d 23h");
    }

    #[test]
    fn test_sunday_targets_monday() {
        let status = compute_status(ny(2024, 6, 16, 10, 0), &TradingCalendar::default());
        assert!(!status.is_open);
        assert_eq!(status.time_until_change, "Opens in 23h 30m");
    }

    #[test]
    fn test_thursday_evening_targets_friday() {
        let status = compute_status(ny(2024, 6, 13, 20, 0), &TradingCalendar::default());
        assert!(!status.is_open);
        assert_eq!(status.time_until_change, "Opens in 13h 30m");
    }

    #[test]
    fn test_bells_are_closed() {
        let calendar = TradingCalendar::default();

        let at_open = compute_status(ny(2024, 6, 11, 9, 30), &calendar);
        assert!(!at_open.is_open);
        assert_eq!(at_open.time_until_change, "Opens in 0m");

        let at_close = compute_status(ny(2024, 6, 11, 16, 0), &calendar);
        assert!(!at_close.is_open);
        assert_eq!(at_close.time_until_change, "Opens in 17h 30m");

        let just_after_open = compute_status(ny(2024, 6, 11, 9, 31), &calendar);
        assert!(just_after_open.is_open);
        assert_eq!(just_after_open.time_until_change, "Closes in 6h 29m");
    }

    #[test]
    fn test_evaluated_in_exchange_zone() {
        // Thursday 02:00 UTC is still Wednesday 22:00 in New York
        let now = Utc.with_ymd_and_hms(2024, 6, 13, 2, 0, 0).unwrap();
        let status = compute_status(now, &TradingCalendar::default());
        assert!(!status.is_open);
        assert_eq!(status.time_until_change, "Opens in 11h 30m");

        // 14:00 UTC is 10:00 EDT
        let now = Utc.with_ymd_and_hms(2024, 6, 12, 14, 0, 0).unwrap();
        let status = compute_status(now, &TradingCalendar::default());
        assert!(status.is_open);
        assert_eq!(status.time_until_change, "Closes in 6h");
    }

    #[test]
    fn test_weekend_across_dst_start() {
        // clocks spring forward on Sunday 2024-03-10, so Sat 10:00 EST -> Mon 09:30 EDT is 46h 30m
        let status = compute_status(ny(2024, 3, 9, 10, 0), &TradingCalendar::default());
        assert_eq!(status.time_until_change, "Opens in 1d 22h");
    }

    fn every_day(open: (u32, u32), close: (u32, u32)) -> TradingCalendar {
        TradingCalendar {
            open: NaiveTime::from_hms_opt(open.0, open.1, 0).unwrap(),
            close: NaiveTime::from_hms_opt(close.0, close.1, 0).unwrap(),
            trading_days: vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri, Weekday::Sat, Weekday::Sun],
            ..TradingCalendar::default()
        }
    }

    #[test]
    fn test_open_inside_spring_forward_gap() {
        // 02:30 doesn't exist on 2024-03-10 in New York; the open moves to 03:30 EDT (07:30 UTC)
        let calendar = every_day((2, 30), (16, 0));
        let now = ny(2024, 3, 10, 1, 0);
        let status = compute_status(now, &calendar);
        assert!(!status.is_open);
        assert_eq!(status.time_until_change, "Opens in 1h 30m");
        assert_eq!(calendar.open_on(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()).with_timezone(&Utc), Utc.with_ymd_and_hms(2024, 3, 10, 7, 30, 0).unwrap());
    }

    #[test]
    fn test_open_inside_repeated_fall_back_hour() {
        // 01:30 happens twice on 2024-11-03; the open takes the first one (01:30 EDT, 05:30 UTC).
        // 06:45 UTC is the second 01:45, so the session is running until 03:00 EST (08:00 UTC).
        let calendar = TradingCalendar {
            trading_days: vec![Weekday::Sun],
            ..every_day((1, 30), (3, 0))
        };
        let now = Utc.with_ymd_and_hms(2024, 11, 3, 6, 45, 0).unwrap();
        let status = compute_status(now, &calendar);
        assert!(status.is_open);
        assert_eq!(status.time_until_change, "Closes in 1h 15m");
        assert_eq!(calendar.open_on(NaiveDate::from_ymd_opt(2024, 11, 3).unwrap()).with_timezone(&Utc), Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap());
    }

    #[test]
    fn test_synthetic_calendar() {
        let calendar = TradingCalendar {
            timezone: chrono_tz::UTC,
            open: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            close: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            trading_days: vec![Weekday::Sat],
        };
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        let status = compute_status(now, &calendar);
        assert!(status.is_open);
        assert_eq!(status.time_until_change, "Closes in 30m");

        // after close the next Saturday is a week away: 6d 23h
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 11, 0, 0).unwrap();
        let status = compute_status(now, &calendar);
        assert!(!status.is_open);
        assert_eq!(status.time_until_change, "Opens in 6d 23h");
    }

    #[test]
    fn test_calendar_without_trading_days() {
        let calendar = TradingCalendar {
            trading_days: vec![],
            ..TradingCalendar::default()
        };
        let status = compute_status(ny(2024, 6, 12, 12, 0), &calendar);
        assert!(!status.is_open);
        assert_eq!(status.message, MESSAGE_CLOSED);
    }

    #[test]
    fn test_close_before_open_never_opens() {
        let calendar = TradingCalendar {
            open: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            close: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            ..TradingCalendar::default()
        };
        for hour in 0..24 {
            assert!(!compute_status(ny(2024, 6, 12, hour, 15), &calendar).is_open);
        }
    }

    #[test]
    fn test_next_open_after_skips_weekend() {
        let calendar = TradingCalendar::default();
        let friday = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        let next = calendar.next_open_after(friday);
        assert_eq!(next.date_naive(), NaiveDate::from_ymd_opt(2024, 6, 17).unwrap());
        assert_eq!(next.time(), *MARKET_OPEN_TIME);
    }

    #[test]
    fn test_format_duration() {
        let nine = ny(2024, 6, 12, 9, 0);
        assert_eq!(format_duration(&nine, &ny(2024, 6, 12, 9, 5)), "in 5m");
        assert_eq!(format_duration(&nine, &ny(2024, 6, 12, 11, 30)), "in 2h 30m");
        assert_eq!(format_duration(&nine, &ny(2024, 6, 13, 12, 0)), "in 1d 3h");
        assert_eq!(format_duration(&nine, &ny(2024, 6, 12, 13, 0)), "in 4h");
        assert_eq!(format_duration(&nine, &ny(2024, 6, 14, 9, 0)), "in 2d");
        // exactly a day is still hours
        assert_eq!(format_duration(&nine, &ny(2024, 6, 13, 9, 0)), "in 24h");
        // minutes are dropped past a day
        assert_eq!(format_duration(&nine, &ny(2024, 6, 13, 10, 59)), "in 1d 1h");
    }

    #[test]
    fn test_format_duration_truncates() {
        let from = ny(2024, 6, 12, 9, 0);
        assert_eq!(format_duration(&from, &(from + Duration::seconds(30))), "in 0m");
        assert_eq!(format_duration(&from, &(from + Duration::seconds(119))), "in 1m");
        assert_eq!(format_duration(&from, &(from + Duration::minutes(59) + Duration::seconds(59))), "in 59m");
    }

    #[test]
    fn test_format_duration_reversed_does_not_panic() {
        let from = ny(2024, 6, 12, 9, 0);
        let earlier = from - Duration::minutes(90);
        assert!(format_duration(&from, &earlier).starts_with("in "));
    }

    #[test]
    fn test_exchange_date() {
        let now = Utc.with_ymd_and_hms(2024, 6, 13, 2, 0, 0).unwrap();
        assert_eq!(exchange_date(now, DEFAULT_EXCHANGE_TZ), NaiveDate::from_ymd_opt(2024, 6, 12).unwrap());
    }

    #[test]
    fn test_status_serializes_to_contract_names() {
        let status = compute_status(ny(2024, 6, 12, 12, 0), &TradingCalendar::default());
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["isOpen"], true);
        assert_eq!(json["message"], MESSAGE_OPEN);
        assert_eq!(json["timeUntilChange"], "Closes in 4h");
    }

    proptest! {
        // 2000-01-01 .. 2099-12-31
        #[test]
        fn prop_open_only_inside_trading_window(secs in 946_684_800i64..4_102_444_800i64) {
            let calendar = TradingCalendar::default();
            let now = Utc.timestamp_opt(secs, 0).unwrap();
            let local = now.with_timezone(&calendar.timezone);
            let status = compute_status(now, &calendar);

            if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
                prop_assert!(!status.is_open);
                prop_assert_eq!(status.message.as_str(), MESSAGE_CLOSED);
                prop_assert!(status.time_until_change.starts_with("Opens in "));
            } else {
                let inside = local.time() > calendar.open && local.time() < calendar.close;
                prop_assert_eq!(status.is_open, inside);
            }
        }
    }
}
