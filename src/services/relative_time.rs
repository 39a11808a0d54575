//! Relative timestamps
//!
//! Formats a timestamp relative to "now" the way date-fns `formatRelative`
//! does: the calendar-day distance picks a phrase ("hoje às 14:05",
//! "ontem às 09:30", "sexta-feira às 18:00"), and anything a week or more
//! away falls back to a plain date.
//!
//! Calendar days are counted in a fixed UTC offset so results do not depend
//! on the host's timezone.

use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc};

use crate::config::{Locale, LocaleConfig};

const PT_BR_WEEKDAYS: [&str; 7] = [
    "domingo",
    "segunda-feira",
    "terça-feira",
    "quarta-feira",
    "quinta-feira",
    "sexta-feira",
    "sábado",
];

const EN_US_WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Which phrase a calendar-day distance maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    LastWeek,
    Yesterday,
    Today,
    Tomorrow,
    NextWeek,
    Other,
}

impl Relation {
    fn from_day_diff(diff: i64) -> Self {
        match diff {
            d if d < -6 => Self::Other,
            d if d < -1 => Self::LastWeek,
            d if d < 0 => Self::Yesterday,
            d if d < 1 => Self::Today,
            d if d < 2 => Self::Tomorrow,
            d if d < 7 => Self::NextWeek,
            _ => Self::Other,
        }
    }
}

/// Formats timestamps relative to a base instant in one locale
#[derive(Debug, Clone, Copy)]
pub struct RelativeTimeFormatter {
    locale: Locale,
    offset: FixedOffset,
}

impl RelativeTimeFormatter {
    /// Create a formatter. Offsets outside ±24h fall back to UTC.
    pub fn new(locale: Locale, utc_offset_minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix());
        Self { locale, offset }
    }

    pub fn from_config(config: &LocaleConfig) -> Self {
        Self::new(config.name, config.utc_offset_minutes)
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Format `date` relative to the current time
    pub fn format_from_now(&self, date: DateTime<Utc>) -> String {
        self.format(date, Utc::now())
    }

    /// Format `date` relative to `base`
    pub fn format(&self, date: DateTime<Utc>, base: DateTime<Utc>) -> String {
        let local = date.with_timezone(&self.offset);
        let base_local = base.with_timezone(&self.offset);
        let diff = (local.date_naive() - base_local.date_naive()).num_days();

        let time = self.short_time(&local);
        let weekday = local.weekday().num_days_from_sunday() as usize;

        match (self.locale, Relation::from_day_diff(diff)) {
            (_, Relation::Other) => self.short_date(&local),

            (Locale::PtBr, Relation::LastWeek) => {
                // Saturday and Sunday are masculine in Portuguese.
                let last = if weekday == 0 || weekday == 6 { "último" } else { "última" };
                format!("{} {} às {}", last, PT_BR_WEEKDAYS[weekday], time)
            }
            (Locale::PtBr, Relation::Yesterday) => format!("ontem às {}", time),
            (Locale::PtBr, Relation::Today) => format!("hoje às {}", time),
            (Locale::PtBr, Relation::Tomorrow) => format!("amanhã às {}", time),
            (Locale::PtBr, Relation::NextWeek) => format!("{} às {}", PT_BR_WEEKDAYS[weekday], time),

            (Locale::EnUs, Relation::LastWeek) => format!("last {} at {}", EN_US_WEEKDAYS[weekday], time),
            (Locale::EnUs, Relation::Yesterday) => format!("yesterday at {}", time),
            (Locale::EnUs, Relation::Today) => format!("today at {}", time),
            (Locale::EnUs, Relation::Tomorrow) => format!("tomorrow at {}", time),
            (Locale::EnUs, Relation::NextWeek) => format!("{} at {}", EN_US_WEEKDAYS[weekday], time),
        }
    }

    fn short_date(&self, date: &DateTime<FixedOffset>) -> String {
        match self.locale {
            Locale::PtBr => date.format("%d/%m/%Y").to_string(),
            Locale::EnUs => date.format("%m/%d/%Y").to_string(),
        }
    }

    fn short_time(&self, date: &DateTime<FixedOffset>) -> String {
        match self.locale {
            Locale::PtBr => date.format("%H:%M").to_string(),
            Locale::EnUs => date.format("%-I:%M %p").to_string(),
        }
    }
}

impl Default for RelativeTimeFormatter {
    fn default() -> Self {
        Self::from_config(&LocaleConfig::default())
    }
}
