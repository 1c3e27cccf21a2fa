//! This client fetches the council's printable calendar and parses it into
//! bin collection schedules.

use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

static URL: &str =
    "https://onlineservices.glasgow.gov.uk/forms/refuseandrecyclingcalendar/PrintCalendar.aspx";
static UPRN: &str = "906700147767";
pub(crate) static ADDRESS: &str = "38 CIRCUS DRIVE, FLAT 1";

static USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

static MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The four bins Glasgow collects at this address. The marker is the
/// lowercased `alt` text of the icon the print calendar puts under a day.
struct BinDefinition {
    label: &'static str,
    marker: &'static str,
    color: &'static str,
    frequency: &'static str,
    purpose: &'static str,
    description: &'static str,
}

static BIN_DEFINITIONS: [BinDefinition; 4] = [
    BinDefinition {
        label: "Green Bin",
        marker: "green bin",
        color: "green",
        frequency: "Every 3 weeks",
        purpose: "General Waste",
        description: "Non-recyclable household waste",
    },
    BinDefinition {
        label: "Blue Bin",
        marker: "blue bin",
        color: "blue",
        frequency: "Every 2 weeks",
        purpose: "Mixed Recycling",
        description: "Paper, cardboard, plastics, cans",
    },
    BinDefinition {
        label: "Brown Bin",
        marker: "brown bin",
        color: "amber",
        frequency: "Every 2 weeks",
        purpose: "Food & Garden Waste",
        description: "Food scraps and garden waste",
    },
    BinDefinition {
        label: "Purple Bin",
        marker: "purple bin",
        color: "purple",
        frequency: "Every 8 weeks",
        purpose: "Glass",
        description: "Glass bottles and jars",
    },
];

/// One bin type's schedule as served to clients.
///
/// Dates are kept in the council's "March 2025 3" notation; consumers parse
/// them defensively and skip entries that do not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinSchedule {
    #[serde(rename = "type")]
    pub bin_type: String,
    pub color: String,
    pub frequency: String,
    pub dates: Vec<String>,
    pub purpose: Option<String>,
    pub description: Option<String>,
}

/// Response body of the schedule endpoint, built fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePayload {
    pub bins: Vec<BinSchedule>,
    pub year: i32,
    pub address: String,
}

/// The only hard failure of an extraction call. Parse misses are not
/// errors, they just leave dates out of the result.
#[derive(thiserror::Error, Debug)]
pub enum ScheduleError {
    /// The request to the council site could not be completed.
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The council site answered with a non-success status.
    #[error("upstream returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Get the bin schedules for a specific year.
pub async fn get(year: i32) -> Result<SchedulePayload, ScheduleError> {
    let client = reqwest::Client::new();
    let response = client
        .get(URL)
        .query(&[("UPRN", UPRN), ("Year", &year.to_string())])
        .header("User-Agent", USER_AGENT)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        )
        .header("Accept-Language", "en-GB,en;q=0.5")
        .header("Cache-Control", "no-cache")
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ScheduleError::Status(status));
    }
    let bins = parse(&response.text().await?, year);
    for bin in &bins {
        tracing::debug!("extracted {} dates for {}", bin.dates.len(), bin.bin_type);
    }
    Ok(SchedulePayload {
        bins,
        year,
        address: String::from(ADDRESS),
    })
}

/// Parse the print calendar HTML into one schedule per known bin type.
///
/// Every bin is present in the output even when the document yields no
/// dates for it.
fn parse(html: &str, year: i32) -> Vec<BinSchedule> {
    let dom = Html::parse_document(html);
    let mut month_sections: Vec<(u32, &str, String)> = vec![];
    for (index, month) in MONTHS.iter().enumerate() {
        let month_selector = Selector::parse(&format!("#{month}_Calendar")).unwrap();
        let Some(section) = dom.select(&month_selector).next() else {
            continue;
        };
        month_sections.push((index as u32 + 1, *month, section.inner_html()));
    }
    // A day cell is a bare 1-2 digit <td> closing its row, immediately
    // followed by the row holding that day's collection icons.
    let day_cell_regex =
        Regex::new(r"(?is)<td[^>]*>(?P<day>\d{1,2})</td>\s*</tr>\s*<tr>\s*<td>.*?</tr>").unwrap();
    BIN_DEFINITIONS
        .iter()
        .map(|definition| BinSchedule {
            bin_type: String::from(definition.label),
            color: String::from(definition.color),
            frequency: String::from(definition.frequency),
            dates: extract_dates(&month_sections, &day_cell_regex, definition.marker, year),
            purpose: Some(String::from(definition.purpose)),
            description: Some(String::from(definition.description)),
        })
        .collect()
}

/// Collect every day in the month sections whose icon row carries the
/// marker for one bin. Days that do not form a real calendar date are
/// skipped.
fn extract_dates(
    month_sections: &[(u32, &str, String)],
    day_cell_regex: &Regex,
    marker: &str,
    year: i32,
) -> Vec<String> {
    let needle = format!(r#"alt="{marker}""#);
    let mut dates = vec![];
    for (month_number, month_name, section_html) in month_sections {
        for captures in day_cell_regex.captures_iter(section_html) {
            if !captures[0].to_lowercase().contains(&needle) {
                continue;
            }
            let Ok(day) = captures["day"].parse::<u32>() else {
                continue;
            };
            if NaiveDate::from_ymd_opt(year, *month_number, day).is_none() {
                continue;
            }
            dates.push(format!("{month_name} {year} {day}"));
        }
    }
    dates
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    use crate::bins_client::{get, parse, BinSchedule};

    fn expected_bins() -> Vec<BinSchedule> {
        vec![
            BinSchedule {
                bin_type: String::from("Green Bin"),
                color: String::from("green"),
                frequency: String::from("Every 3 weeks"),
                dates: vec![
                    String::from("January 2025 2"),
                    String::from("January 2025 16"),
                    String::from("February 2025 6"),
                    String::from("February 2025 27"),
                ],
                purpose: Some(String::from("General Waste")),
                description: Some(String::from("Non-recyclable household waste")),
            },
            BinSchedule {
                bin_type: String::from("Blue Bin"),
                color: String::from("blue"),
                frequency: String::from("Every 2 weeks"),
                dates: vec![
                    String::from("January 2025 9"),
                    String::from("January 2025 23"),
                    String::from("February 2025 13"),
                ],
                purpose: Some(String::from("Mixed Recycling")),
                description: Some(String::from("Paper, cardboard, plastics, cans")),
            },
            BinSchedule {
                bin_type: String::from("Brown Bin"),
                color: String::from("amber"),
                frequency: String::from("Every 2 weeks"),
                dates: vec![
                    String::from("January 2025 9"),
                    String::from("January 2025 23"),
                    String::from("February 2025 13"),
                ],
                purpose: Some(String::from("Food & Garden Waste")),
                description: Some(String::from("Food scraps and garden waste")),
            },
            BinSchedule {
                bin_type: String::from("Purple Bin"),
                color: String::from("purple"),
                frequency: String::from("Every 8 weeks"),
                dates: vec![String::from("January 2025 30")],
                purpose: Some(String::from("Glass")),
                description: Some(String::from("Glass bottles and jars")),
            },
        ]
    }

    /// Test whether the council site can be fetched and parsed.
    ///
    /// This is an online test!
    #[tokio::test]
    #[ignore = "requires network access to the council site"]
    async fn test_get() {
        let year = chrono::Local::now().year();
        let payload = get(year).await.unwrap();
        assert_eq!(payload.bins.len(), 4);
        assert_eq!(payload.year, year);
    }

    /// Test whether the HTML is parsed correctly.
    ///
    /// This test is offline. The fixture carries an impossible day (32)
    /// tagged with a green bin icon which must be skipped.
    #[test]
    fn test_parse() {
        let html = include_str!("bins_client/tests/print_calendar.html");
        let parsed = parse(html, 2025);
        assert_eq!(parsed, expected_bins());
    }

    /// A document without any recognizable month section yields empty date
    /// lists for every bin, never an error.
    #[test]
    fn test_parse_unrecognizable_document() {
        let parsed = parse("<html><body><p>Service unavailable</p></body></html>", 2025);
        assert_eq!(parsed.len(), 4);
        for bin in parsed {
            assert!(bin.dates.is_empty());
        }
    }

    /// The wire format uses `type` as the key for the bin name.
    #[test]
    fn test_bin_schedule_wire_shape() {
        let bins = expected_bins();
        let json = serde_json::to_value(&bins[0]).unwrap();
        assert_eq!(json["type"], "Green Bin");
        assert_eq!(json["color"], "green");
        assert_eq!(json["dates"][0], "January 2025 2");
    }
}
