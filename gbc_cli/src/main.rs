//! Command line export of the bin collection calendar.
//!
//! Writes `bin-collections-<year>.ics` to the working directory and
//! prints the upcoming collections sorted by urgency.

use std::{env::current_dir, fs::write};

use anyhow::Result;
use chrono::{Datelike, Local, Utc};
use clap::Parser;
use gbc_core::{
    bins_client,
    ical::generator::Emitter,
    ics,
    ics::BinTypeBitmask,
    schedule_view::{format_localized, sort_by_urgency, BinView},
};

#[derive(Debug, Parser)]
pub struct Arguments {
    /// the schedule year, defaults to the current year
    #[arg(long)]
    pub year: Option<i32>,
    /// exclude general waste collection events
    #[arg(long)]
    pub exclude_general: bool,
    /// exclude mixed recycling collection events
    #[arg(long)]
    pub exclude_recycling: bool,
    /// exclude food and garden waste collection events
    #[arg(long)]
    pub exclude_food_garden: bool,
    /// exclude glass collection events
    #[arg(long)]
    pub exclude_glass: bool,
}

impl From<&Arguments> for BinTypeBitmask {
    fn from(value: &Arguments) -> Self {
        let mut bin_type_bitmask = BinTypeBitmask::none();
        if value.exclude_general {
            bin_type_bitmask |= BinTypeBitmask::General;
        }
        if value.exclude_recycling {
            bin_type_bitmask |= BinTypeBitmask::Recycling;
        }
        if value.exclude_food_garden {
            bin_type_bitmask |= BinTypeBitmask::FoodGarden;
        }
        if value.exclude_glass {
            bin_type_bitmask |= BinTypeBitmask::Glass;
        }
        bin_type_bitmask
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Arguments::parse();
    let year = args.year.unwrap_or_else(|| Local::now().year());
    let payload = bins_client::get(year).await?;
    let calendar = ics::generate(
        &payload.bins,
        payload.year,
        Utc::now(),
        BinTypeBitmask::from(&args),
    );
    let mut path = current_dir()?;
    path.push(format!("bin-collections-{year}.ics"));
    write(&path, calendar.generate())?;
    println!("wrote {}", path.display());

    let today = Local::now().date_naive();
    let mut views: Vec<BinView> = payload
        .bins
        .into_iter()
        .map(|bin| BinView::derive(bin, today))
        .collect();
    sort_by_urgency(&mut views);
    for view in views {
        match (view.next_date, view.days_until) {
            (Some(date), Some(days)) => {
                let when = match days {
                    0 => String::from("today"),
                    1 => String::from("tomorrow"),
                    days => format!("in {days} days"),
                };
                println!(
                    "{}: {} ({when})",
                    view.schedule.bin_type,
                    format_localized(date)
                );
            }
            _ => println!(
                "{}: no collections left this year",
                view.schedule.bin_type
            ),
        }
    }
    Ok(())
}
