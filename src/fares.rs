use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use log::trace;
use phf::phf_set;
use std::collections::BTreeMap;

use crate::date;
use crate::trains::{Car, Listing, Loose, ResponseJson, Segment};

pub static ALLOWED_FARE_NAMES: phf::Set<&'static str> = phf_set! {
    "эконом",
    "эконом+",
    "базовый",
    "вагон-бистро",
};
static FARE_LABEL_FIELDS: [&str; 5] = ["service", "type", "tariffType", "typeLoc", "category"];
static TARIFF_FIELDS: [&str; 3] = ["tariff", "tariffValue", "tariffFull"];

/// Cheapest allowed fare of a single departure.
#[derive(Debug, Clone, PartialEq)]
pub struct FareQuote {
    pub departure: NaiveDateTime,
    pub weekday: Weekday,
    pub price: f64,
}

impl FareQuote {
    pub fn new(departure: NaiveDateTime, price: f64) -> FareQuote {
        FareQuote {
            departure,
            weekday: departure.weekday(),
            price,
        }
    }
}

/// Quotes of one calendar date keyed by departure time of day.
#[derive(Debug, PartialEq)]
pub struct DayResult {
    pub date: NaiveDate,
    pub quotes: BTreeMap<NaiveTime, FareQuote>,
}

pub struct Filter {
    /// Trains numbered at or below this are another category.
    pub min_train_number: u64,
    pub max_travel_time: Duration,
    pub fare_names: &'static phf::Set<&'static str>,
}

impl Default for Filter {
    fn default() -> Filter {
        Filter {
            min_train_number: 700,
            max_travel_time: Duration::minutes(4 * 60 + 30),
            fare_names: &ALLOWED_FARE_NAMES,
        }
    }
}

pub fn get_day_result(json: ResponseJson, date: NaiveDate, filter: &Filter) -> DayResult {
    let mut quotes = BTreeMap::new();

    for mut segment in json.tp.unwrap_or_default() {
        for entry in segment.list.take().unwrap_or_default() {
            let listing: Listing = match serde_json::from_value(entry) {
                Ok(listing) => listing,
                Err(err) => {
                    trace!("Skipping malformed listing: {}", err);
                    continue;
                }
            };
            match get_quote(&listing, &segment, filter) {
                // Later listings at the same time of day replace earlier ones.
                Some(quote) => {
                    quotes.insert(quote.departure.time(), quote);
                }
                None => trace!("Skipping listing {:?}", listing),
            }
        }
    }
    DayResult { date, quotes }
}

pub fn get_quote(listing: &Listing, segment: &Segment, filter: &Filter) -> Option<FareQuote> {
    let number = listing.number.as_ref().and_then(train_number)?;
    if number <= filter.min_train_number {
        return None;
    }

    let travel_time = first_present(&[&listing.time_in_way, &listing.time_in_way_min])
        .and_then(travel_time)?;
    if travel_time > filter.max_travel_time {
        return None;
    }

    let departure_date = first_present(&[&listing.date0, &segment.date0])?.as_text()?;
    let departure_time = listing.time0.as_ref()?.as_text()?;
    let departure = date::combine_date_time(&departure_date, &departure_time)?;

    let price = get_min_price(listing.cars.as_deref().unwrap_or_default(), filter)?;
    Some(FareQuote::new(departure, price))
}

/// Minimum tariff among cars whose label is in the allow-set.
pub fn get_min_price(cars: &[Car], filter: &Filter) -> Option<f64> {
    cars.iter()
        .filter(|car| is_allowed(car, filter))
        .filter_map(tariff)
        .fold(None, |min, price| match min {
            Some(min) if min <= price => Some(min),
            _ => Some(price),
        })
}

fn is_allowed(car: &Car, filter: &Filter) -> bool {
    FARE_LABEL_FIELDS
        .iter()
        .filter_map(|field| car.fields.get(*field))
        .filter_map(Loose::as_text)
        .any(|label| filter.fare_names.contains(label.trim().to_lowercase().as_str()))
}

fn tariff(car: &Car) -> Option<f64> {
    TARIFF_FIELDS
        .iter()
        .filter_map(|field| car.fields.get(*field))
        .find_map(Loose::as_price)
}

/// Numeric part of a train number, e.g. `752А` is 752. Numbers too long for
/// `u64` saturate.
fn train_number(number: &Loose) -> Option<u64> {
    let digits: String = number
        .as_text()?
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Some(0);
    }
    Some(significant.parse().unwrap_or(u64::MAX))
}

fn travel_time(raw: &Loose) -> Option<Duration> {
    match raw {
        Loose::Number(minutes) if minutes.is_finite() && *minutes < i64::MAX as f64 => {
            date::travel_minutes(*minutes as i64)
        }
        Loose::Text(text) => date::parse_travel_time(text),
        _ => None,
    }
}

fn first_present<'a>(fields: &[&'a Option<Loose>]) -> Option<&'a Loose> {
    fields
        .iter()
        .filter_map(|field| Option::as_ref(*field))
        .find(|value| value.is_present())
}
