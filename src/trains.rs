use chrono::NaiveDate;
use log::{debug, error, info};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::date;
use crate::fares::{self, DayResult, Filter};

static RZD_URL: &str = "https://pass.rzd.ru/timetable/public/ru";
static MOSCOW_CODE: &str = "2000000";
static SAINT_P_CODE: &str = "2004000";

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("{0}")]
    JsonParseError(String),
    #[error("{0}")]
    ServerError(String),
    #[error("{0}")]
    InternalError(String),
}

/// Fixed query parameters of the timetable endpoint.
#[derive(Debug, Clone)]
pub struct Route {
    pub url: String,
    pub layer_id: String,
    pub direction: String,
    pub from: String,
    pub to: String,
    pub timeout: Duration,
}

impl Default for Route {
    fn default() -> Route {
        Route {
            url: RZD_URL.to_string(),
            layer_id: "5827".to_string(),
            direction: "0".to_string(),
            from: MOSCOW_CODE.to_string(),
            to: SAINT_P_CODE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// A JSON scalar the timetable sends either quoted or bare.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Loose {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Loose {
    pub fn as_text(&self) -> Option<String> {
        match self {
            Loose::Number(number) => Some(number.to_string()),
            Loose::Text(text) => Some(text.clone()),
            Loose::Other(_) => None,
        }
    }

    /// Non-negative amount, if this value holds one.
    pub fn as_price(&self) -> Option<f64> {
        let price = match self {
            Loose::Number(number) => *number,
            Loose::Text(text) => text.trim().parse::<f64>().ok()?,
            Loose::Other(_) => return None,
        };
        if price.is_finite() && price >= 0.0 {
            Some(price)
        } else {
            None
        }
    }

    /// False for blanks and zeroes, which the timetable uses for "unknown".
    pub fn is_present(&self) -> bool {
        match self {
            Loose::Number(number) => *number != 0.0,
            Loose::Text(text) => !text.is_empty(),
            Loose::Other(value) => !value.is_null(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Car {
    #[serde(flatten)]
    pub fields: HashMap<String, Loose>,
}

#[derive(Deserialize, Debug)]
pub struct Listing {
    pub number: Option<Loose>,
    #[serde(rename = "timeInWay")]
    pub time_in_way: Option<Loose>,
    #[serde(rename = "timeInWayMin")]
    pub time_in_way_min: Option<Loose>,
    pub date0: Option<Loose>,
    pub time0: Option<Loose>,
    pub cars: Option<Vec<Car>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Segment {
    pub date0: Option<Loose>,
    /// Kept raw so that a malformed listing only loses itself.
    pub list: Option<Vec<serde_json::Value>>,
}

#[derive(Deserialize, Debug)]
pub struct ResponseJson {
    pub tp: Option<Vec<Segment>>,
}

pub fn build_client(route: &Route) -> Result<Client, QueryError> {
    Ok(Client::builder().timeout(route.timeout).build()?)
}

/// Fetches every date one after another. A date whose request fails is
/// logged and left out.
pub async fn get_day_results(
    client: &Client,
    route: &Route,
    filter: &Filter,
    dates: &[NaiveDate],
) -> Vec<DayResult> {
    let mut results = Vec::new();

    for day in dates.iter() {
        match get_timetable(client, route, *day).await {
            Ok(json) => {
                let result = fares::get_day_result(json, *day, filter);
                info!(
                    "Found {} departures on {}",
                    result.quotes.len(),
                    date::format_date(result.date)
                );
                results.push(result);
            }
            Err(err) => error!(
                "Failed to fetch data for {}: {}",
                date::format_date(*day),
                err
            ),
        }
    }
    results
}

pub async fn get_timetable(
    client: &Client,
    route: &Route,
    day: NaiveDate,
) -> Result<ResponseJson, QueryError> {
    let response = do_request(
        client,
        &route.url,
        &[
            ("layer_id", route.layer_id.clone()),
            ("dir", route.direction.clone()),
            ("tfl", "3".to_string()),
            ("checkSeats", "1".to_string()),
            ("code0", route.from.clone()),
            ("code1", route.to.clone()),
            ("dt0", date::format_date(day)),
        ],
    )
    .await?;

    parse_response(response).await
}

async fn do_request(
    client: &Client,
    url: &str,
    query_params: &[(&str, String)],
) -> Result<Response, QueryError> {
    let request = client.get(url).query(query_params);

    debug!("Prepared request: {:?}", request);

    let response = request.send().await?;

    let status = response.status();

    if status.is_client_error() {
        return Err(QueryError::InternalError(format!(
            "Got {} response: {}",
            status,
            response.text().await.unwrap_or_default(),
        )));
    } else if status.is_server_error() {
        return Err(QueryError::ServerError(format!(
            "Got {} response: {}",
            status,
            response.text().await.unwrap_or_default(),
        )));
    } else {
        debug!("Got {} response", status);
    }
    Ok(response)
}

async fn parse_response(response: Response) -> Result<ResponseJson, QueryError> {
    let text = response.text().await?;

    match serde_json::from_str(&text) {
        Ok(res) => Ok(res),
        Err(err) => {
            debug!("Invalid JSON: {}", text);
            Err(QueryError::JsonParseError(format!(
                "Error while parsing JSON: {:?}",
                err
            )))
        }
    }
}
