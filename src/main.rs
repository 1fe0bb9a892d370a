//! # rest
//!
//! Issues a single request through a [`RestClient`] and prints the outcome.
//!
//! ```text,no_run
//! $ rest https://api.example.com GET /items -q page=2
//! {
//!   "data": [ ... ],
//!   "success": true,
//!   "statusCode": 200,
//!   "headers": { ... }
//! }
//! ```
//!
//! `GET` is always normalized. `POST`, `PUT` and `DELETE` print the raw
//! response (see `--response-output-format`) unless `--normalize-all` is
//! given.

use anyhow::{anyhow, bail, Context, Result};
use clap::{App, Arg, ArgMatches};
use rest_client::output::{parse_format, FormattedOutputter, RawResponse};
use rest_client::{
    ClientConfig, Normalization, Rejection, RequestOptions, RestClient, RestResponse,
};
use serde_json::Value;
use std::io::{stdout, Write};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    let matches = App::new("rest")
        .version(VERSION)
        .about("Sends one request through a normalizing REST client")
        .arg(Arg::with_name("BASE_URL").required(true).index(1))
        .arg(
            Arg::with_name("METHOD")
                .required(true)
                .index(2)
                .possible_values(&["GET", "POST", "PUT", "DELETE"])
                .case_insensitive(true),
        )
        .arg(Arg::with_name("PATH").default_value("/").index(3))
        .arg(
            Arg::with_name("DATA")
                .short("d")
                .long("data")
                .takes_value(true)
                .help("JSON request body for POST and PUT"),
        )
        .arg(
            Arg::with_name("HEADER")
                .short("H")
                .long("header")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("Extra request header as NAME:VALUE"),
        )
        .arg(
            Arg::with_name("QUERY")
                .short("q")
                .long("query")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("Query parameter as KEY=VALUE"),
        )
        .arg(
            Arg::with_name("TIMEOUT")
                .short("t")
                .long("timeout")
                .takes_value(true)
                .validator(is_valid_timeout)
                .help("Request timeout in milliseconds [default: 15000]"),
        )
        .arg(
            Arg::with_name("CONFIG_FILE")
                .short("c")
                .long("config")
                .takes_value(true)
                .help("A file containing a JSON object that describes the client configuration"),
        )
        .arg(
            Arg::with_name("NORMALIZE_ALL")
                .long("normalize-all")
                .help("Normalize POST, PUT and DELETE outcomes as well"),
        )
        .arg(
            Arg::with_name("RESPONSE_OUTPUT_FORMAT")
                .long("response-output-format")
                .short("s")
                .default_value("%R\n%H\n%B\n")
                .hide_default_value(true)
                .help("Define the format for printing raw responses, possible options %R status line, %H headers, %B body \n[default: %R\\n%H\\n%B\\n]"),
        )
        .arg(
            Arg::with_name("VERBOSE")
                .short("v")
                .long("verbose")
                .help("Log requests and responses to stderr"),
        )
        .usage("rest [OPTIONS] <BASE_URL> <METHOD> [PATH]")
        .get_matches();

    init_tracing(matches.is_present("VERBOSE"));

    let client = RestClient::with_config(client_config(&matches)?)?;
    let path = matches.value_of("PATH").unwrap_or("/");
    let options = request_options(&matches)?;
    let body: Value = match matches.value_of("DATA") {
        Some(data) => serde_json::from_str(data).context("--data is not valid JSON")?,
        None => Value::Null,
    };
    let response_format = parse_format(matches.value_of("RESPONSE_OUTPUT_FORMAT").unwrap_or(""))?;

    let method = matches.value_of("METHOD").unwrap_or("GET").to_ascii_uppercase();
    let outcome = match method.as_str() {
        "GET" => match client.get(path, options).await {
            Ok(response) => Ok(RestResponse::Normalized(response)),
            Err(error) => Err(Rejection::Normalized(error)),
        },
        "POST" => client.post(path, &body, options).await,
        "PUT" => client.put(path, &body, options).await,
        "DELETE" => client.delete(path, options).await,
        other => bail!("Unsupported method '{}'", other),
    };

    let mut stdout = stdout();
    let result = print_outcome(
        FormattedOutputter::new(&mut stdout, response_format),
        outcome,
    )
    .await;
    stdout.flush()?;
    result
}

async fn print_outcome<W: Write>(
    mut outputter: FormattedOutputter<'_, W>,
    outcome: Result<RestResponse, Rejection>,
) -> Result<()> {
    match outcome {
        Ok(RestResponse::Normalized(response)) => outputter.normalized(&response),
        Ok(RestResponse::Raw(response)) => outputter.raw(&RawResponse::read(response).await?),
        Err(Rejection::Normalized(error)) => {
            outputter.normalized(&error)?;
            Err(anyhow!(error))
        }
        Err(Rejection::Status(response)) => {
            let status = response.status();
            outputter.raw(&RawResponse::read(response).await?)?;
            Err(anyhow!("Request failed with status code {}", status.as_u16()))
        }
        Err(Rejection::Raw(error)) => Err(anyhow!(error)),
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("warn,rest_client=debug,rest=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn client_config(matches: &ArgMatches) -> Result<ClientConfig> {
    let base_url = matches.value_of("BASE_URL").unwrap_or_default();
    let mut config = match matches.value_of("CONFIG_FILE") {
        Some(file) => ClientConfig::from_json_file(Path::new(file))?.with_base_url(base_url),
        None => ClientConfig::new(base_url),
    };
    if let Some(timeout) = matches.value_of("TIMEOUT") {
        config = config.with_timeout(Duration::from_millis(timeout.parse()?));
    }
    if matches.is_present("NORMALIZE_ALL") {
        config = config.with_normalization(Normalization::AllVerbs);
    }
    Ok(config)
}

fn request_options(matches: &ArgMatches) -> Result<Option<RequestOptions>> {
    let mut options = RequestOptions::new();
    for header in matches.values_of("HEADER").into_iter().flatten() {
        let (name, value) = split_pair(header, ':')
            .with_context(|| format!("Header '{}' is not NAME:VALUE", header))?;
        options = options.header(name, value);
    }
    for query in matches.values_of("QUERY").into_iter().flatten() {
        let (key, value) = split_pair(query, '=')
            .with_context(|| format!("Query '{}' is not KEY=VALUE", query))?;
        options = options.query(key, value);
    }
    if options == RequestOptions::default() {
        Ok(None)
    } else {
        Ok(Some(options))
    }
}

fn split_pair(pair: &str, separator: char) -> Option<(&str, &str)> {
    let mut parts = pair.splitn(2, separator);
    match (parts.next(), parts.next()) {
        (Some(key), Some(value)) if !key.trim().is_empty() => Some((key.trim(), value.trim())),
        _ => None,
    }
}

fn is_valid_timeout(val: String) -> Result<(), String> {
    match val.parse::<u64>() {
        Ok(timeout) if timeout > 0 => Ok(()),
        _ => Err(String::from("Timeout is not a positive integer")),
    }
}
