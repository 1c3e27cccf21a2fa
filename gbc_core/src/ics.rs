//! iCalendar export of the extracted bin schedules.

use bitmask_enum::bitmask;
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use ical::{
    generator::{IcalCalendar, IcalCalendarBuilder, IcalEvent, IcalEventBuilder, Property},
    ical_property,
    parser::ical::component::{
        IcalAlarm, IcalTimeZone, IcalTimeZoneTransition, IcalTimeZoneTransitionType,
    },
};
use regex::Regex;

use crate::{bins_client::BinSchedule, schedule_view::parse_collection_date};

static PROD_ID: &str = "-//cjber.dev//Bin Collection Calendar//EN";
static TIMEZONE: &str = "Europe/London";
static FORMAT: &str = "%Y%m%d";
static STAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";
static UID_DOMAIN: &str = "bins.cjber.dev";

#[bitmask]
#[bitmask_config(inverted_flags)]
pub enum BinTypeBitmask {
    General,
    Recycling,
    FoodGarden,
    Glass,
}

/// Build the export calendar from extracted bin schedules.
///
/// `generated_at` becomes the DTSTAMP of every event, so callers can pin
/// it and regenerate byte-identical output from identical schedules.
pub fn generate(
    bins: &[BinSchedule],
    year: i32,
    generated_at: DateTime<Utc>,
    excluded_bin_types: BinTypeBitmask,
) -> IcalCalendar {
    let stamp = generated_at.format(STAMP_FORMAT).to_string();
    let mut calendar = IcalCalendarBuilder::version("2.0")
        .gregorian()
        .prodid(PROD_ID)
        .build();
    calendar.properties.push(ical_property!("METHOD", "PUBLISH"));
    calendar
        .properties
        .push(ical_property!("X-WR-CALNAME", "Glasgow Bin Collections"));
    calendar
        .properties
        .push(ical_property!("X-WR-TIMEZONE", TIMEZONE));
    calendar.properties.push(ical_property!(
        "X-WR-CALDESC",
        format!("Bin collection schedule for {}", crate::bins_client::ADDRESS)
    ));
    calendar.timezones.push(timezone(year));
    for bin in bins {
        if bin_bitmask(bin).is_some_and(|mask| excluded_bin_types.contains(mask)) {
            continue;
        }
        if let Some(event) = get_event(bin, &stamp) {
            calendar.events.push(event);
        }
    }
    calendar
}

fn bin_bitmask(bin: &BinSchedule) -> Option<BinTypeBitmask> {
    match bin.color.as_str() {
        "green" => Some(BinTypeBitmask::General),
        "blue" => Some(BinTypeBitmask::Recycling),
        "amber" => Some(BinTypeBitmask::FoodGarden),
        "purple" => Some(BinTypeBitmask::Glass),
        _ => None,
    }
}

/// Build one recurring all-day event for a bin, anchored on its first
/// parsable date. Bins without one get no event.
fn get_event(bin: &BinSchedule, stamp: &str) -> Option<IcalEvent> {
    let anchor = bin
        .dates
        .iter()
        .find_map(|raw| parse_collection_date(raw))?;
    let summary_label = bin.purpose.as_deref().unwrap_or(&bin.bin_type);
    let mut event = IcalEventBuilder::tzid(TIMEZONE)
        .uid(uid(&bin.bin_type, &anchor))
        .changed(stamp)
        .one_day(anchor.format(FORMAT).to_string())
        .set(ical_property!(
            "SUMMARY",
            format!("🗑️ {summary_label} Collection")
        ))
        .set(ical_property!(
            "DESCRIPTION",
            format!(
                "{}\\n{}\\nPut out the night before collection day.",
                bin.bin_type,
                bin.description.as_deref().unwrap_or("")
            )
        ))
        .set(ical_property!(
            "LOCATION",
            format!("{}, Glasgow", crate::bins_client::ADDRESS)
        ))
        .build();
    if let Some(rule) = recurrence_rule(&bin.frequency) {
        event.properties.push(ical_property!("RRULE", rule));
    }
    event.alarms.push(reminder(bin, summary_label));
    Some(event)
}

/// Map a frequency description to a recurrence rule. The counts
/// approximate one year of collections at each cadence.
fn recurrence_rule(frequency: &str) -> Option<&'static str> {
    if frequency.contains("2 weeks") {
        Some("FREQ=WEEKLY;INTERVAL=2;COUNT=26")
    } else if frequency.contains("3 weeks") {
        Some("FREQ=WEEKLY;INTERVAL=3;COUNT=18")
    } else if frequency.contains("8 weeks") {
        Some("FREQ=WEEKLY;INTERVAL=8;COUNT=7")
    } else {
        None
    }
}

/// Display alarm firing 14 hours before the nominal start of the
/// collection day.
fn reminder(bin: &BinSchedule, summary_label: &str) -> IcalAlarm {
    IcalAlarm {
        properties: vec![
            ical_property!("TRIGGER", "-PT14H"),
            ical_property!("ACTION", "DISPLAY"),
            ical_property!(
                "DESCRIPTION",
                format!(
                    "Reminder: {summary_label} collection tomorrow! Put your {} out tonight.",
                    bin.bin_type.to_lowercase()
                )
            ),
        ],
    }
}

/// UK clock changes: forward on the last Sunday of March, back on the
/// last Sunday of October.
fn timezone(year: i32) -> IcalTimeZone {
    let mut transitions = vec![];
    if let Some(date) = last_sunday(year, 3) {
        transitions.push(transition(
            IcalTimeZoneTransitionType::DAYLIGHT,
            &[
                ("TZOFFSETFROM", "+0000"),
                ("TZOFFSETTO", "+0100"),
                ("TZNAME", "BST"),
            ],
            format!("{}T010000", date.format(FORMAT)),
            "FREQ=YEARLY;BYMONTH=3;BYDAY=-1SU",
        ));
    }
    if let Some(date) = last_sunday(year, 10) {
        transitions.push(transition(
            IcalTimeZoneTransitionType::STANDARD,
            &[
                ("TZOFFSETFROM", "+0100"),
                ("TZOFFSETTO", "+0000"),
                ("TZNAME", "GMT"),
            ],
            format!("{}T020000", date.format(FORMAT)),
            "FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU",
        ));
    }
    IcalTimeZone {
        properties: vec![ical_property!("TZID", TIMEZONE)],
        transitions,
    }
}

fn transition(
    transition: IcalTimeZoneTransitionType,
    offsets: &[(&str, &str)],
    start: String,
    rule: &str,
) -> IcalTimeZoneTransition {
    let mut properties: Vec<Property> = offsets
        .iter()
        .map(|(name, value)| Property {
            name: String::from(*name),
            value: Some((*value).into()),
            params: None,
        })
        .collect();
    properties.push(ical_property!("DTSTART", start));
    properties.push(ical_property!("RRULE", rule));
    IcalTimeZoneTransition {
        transition,
        properties,
    }
}

fn last_sunday(year: i32, month: u32) -> Option<NaiveDate> {
    let next_month_first = match month {
        12 => NaiveDate::from_ymd_opt(year + 1, 1, 1),
        _ => NaiveDate::from_ymd_opt(year, month + 1, 1),
    }?;
    let last_day = next_month_first.pred_opt()?;
    last_day.checked_sub_days(Days::new(u64::from(
        last_day.weekday().num_days_from_sunday(),
    )))
}

/// Deterministic event id so a regenerated calendar keeps the same UID.
///
/// Changing this function is a breaking change!
fn uid(bin_type: &str, anchor: &NaiveDate) -> String {
    let whitespace_regex = Regex::new(r"\s+").unwrap();
    let bin_type = whitespace_regex.replace_all(bin_type, "-");
    format!("{bin_type}-{}@{UID_DOMAIN}", anchor.format(FORMAT))
}
