use chrono::{NaiveTime, Weekday};
use std::collections::{BTreeMap, HashMap};

use crate::fares::{DayResult, FareQuote};

/// Cheapest quote per departure time of day and weekday.
pub type ConsolidatedTable = BTreeMap<NaiveTime, HashMap<Weekday, FareQuote>>;

/// Merges per-date results into one table. Dates falling on the same weekday
/// compete for the same cell; the lower price wins and ties keep the earlier
/// date.
pub fn consolidate(days: &[DayResult]) -> ConsolidatedTable {
    let mut table = ConsolidatedTable::new();

    for day in days.iter() {
        for (time, quote) in day.quotes.iter() {
            let cells = table.entry(*time).or_insert_with(HashMap::new);
            let cheaper = cells
                .get(&quote.weekday)
                .map_or(true, |existing| quote.price < existing.price);
            if cheaper {
                cells.insert(quote.weekday, quote.clone());
            }
        }
    }
    table
}
