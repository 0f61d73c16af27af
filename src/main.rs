extern crate structopt;

use chrono::NaiveDate;
use log::{debug, error, info};
use prettytable::{format, Cell, Row, Table};
use std::fs;
use std::path::PathBuf;
use structopt::StructOpt;

mod consolidate;
mod date;
mod fares;
mod render;
mod trains;
use consolidate::ConsolidatedTable;
use fares::Filter;
use trains::Route;

/// Minimal Sapsan fares Moscow → Saint Petersburg per departure time and weekday
#[derive(StructOpt, Debug)]
#[structopt(name = "sapsanfares")]
struct Opt {
    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,

    /// First date to fetch
    #[structopt(short, long, value_name = "DD.MM.YYYY", parse(try_from_str = date::parse_date_from_str), default_value = "today")]
    start_date: NaiveDate,

    /// Number of days to fetch, starting from start date
    #[structopt(short, long, parse(try_from_str = date::parse_days_from_str), default_value = "7")]
    days: u32,

    /// Where the HTML table is written
    #[structopt(short, long, parse(from_os_str), default_value = "sapsan_table.html")]
    output: PathBuf,

    /// Also print the table to the terminal
    #[structopt(short, long)]
    print: bool,
}

#[tokio::main]
async fn main() {
    let opt = Opt::from_args();
    setup_logging(opt.verbose);

    debug!("Parsed opts: {:#?}", opt);

    let route = Route::default();
    let filter = Filter::default();
    let dates = date::get_query_dates(opt.start_date, opt.days);

    let client = match trains::build_client(&route) {
        Ok(res) => res,
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    };

    let days = trains::get_day_results(&client, &route, &filter, &dates).await;
    let quotes = consolidate::consolidate(&days);
    info!(
        "Collected {} departure times from {} of {} days.",
        quotes.len(),
        days.len(),
        dates.len()
    );

    if opt.print {
        format_results(&quotes).printstd();
    }

    if let Err(err) = fs::write(&opt.output, render::build_table(&quotes)) {
        error!("Could not write {}: {}", opt.output.display(), err);
        std::process::exit(1);
    }

    let saved = fs::canonicalize(&opt.output).unwrap_or(opt.output);
    println!("Saved table to {}", saved.display());
}

fn format_results(quotes: &ConsolidatedTable) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

    let mut titles = vec![Cell::new("Departure")];
    titles.extend(
        render::WEEKDAYS
            .iter()
            .map(|(weekday, _)| Cell::new(&weekday.to_string())),
    );
    table.set_titles(Row::new(titles));

    for (departure, cells) in quotes.iter() {
        let mut row = vec![Cell::new(
            &departure.format(render::DEPARTURE_FORMAT).to_string(),
        )];
        row.extend(render::WEEKDAYS.iter().map(|(weekday, _)| {
            match cells.get(weekday) {
                Some(quote) => Cell::new(&render::format_price(quote.price)),
                None => Cell::new(render::PLACEHOLDER),
            }
        }));
        table.add_row(Row::new(row));
    }
    table
}

fn setup_logging(level: usize) {
    stderrlog::new()
        .module(module_path!())
        .verbosity(level)
        .timestamp(stderrlog::Timestamp::Off)
        .init()
        .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fares::FareQuote;
    use chrono::NaiveTime;
    use std::collections::HashMap;

    #[test]
    fn test_opt_defaults() {
        let opt = Opt::from_iter(vec!["sapsanfares"]);

        assert_eq!(opt.start_date, chrono::Local::now().date_naive());
        assert_eq!(opt.days, 7);
        assert_eq!(opt.output, PathBuf::from("sapsan_table.html"));
        assert!(!opt.print);
    }

    #[test]
    fn test_opt_parsing() {
        let opt = Opt::from_iter(vec![
            "sapsanfares",
            "--start-date",
            "05.10.2026",
            "--days",
            "14",
            "-o",
            "week.html",
            "-vv",
        ]);

        assert_eq!(opt.start_date, NaiveDate::from_ymd_opt(2026, 10, 5).unwrap());
        assert_eq!(opt.days, 14);
        assert_eq!(opt.output, PathBuf::from("week.html"));
        assert_eq!(opt.verbose, 2);
    }

    #[test]
    fn test_opt_invalid_values() {
        assert!(Opt::from_iter_safe(vec!["sapsanfares", "--start-date", "2026-10-05"]).is_err());
        assert!(Opt::from_iter_safe(vec!["sapsanfares", "--days", "0"]).is_err());
    }

    #[test]
    fn test_format_results() {
        let departure = NaiveDate::from_ymd_opt(2026, 10, 5)
            .unwrap()
            .and_hms_opt(5, 30, 0)
            .unwrap();
        let quote = FareQuote::new(departure, 12345.0);
        let mut quotes = ConsolidatedTable::new();
        quotes.insert(
            NaiveTime::from_hms_opt(5, 30, 0).unwrap(),
            vec![(quote.weekday, quote)].into_iter().collect::<HashMap<_, _>>(),
        );

        let table = format_results(&quotes);

        assert_eq!(table.len(), 1);
        let row = table.get_row(0).unwrap();
        assert_eq!(row.get_cell(0).unwrap().get_content(), "05:30");
        assert_eq!(row.get_cell(1).unwrap().get_content(), "12 345 ₽");
        assert_eq!(row.get_cell(2).unwrap().get_content(), "—");
    }
}
