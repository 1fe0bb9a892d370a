//! Rendering of request outcomes for the `rest` binary.

use anyhow::{anyhow, Result};
use reqwest::Response;
use serde::Serialize;
use std::io::Write;


#[derive(Debug, Eq, PartialEq, Clone)]
pub enum FormatItem {
    FirstLine,
    Headers,
    Body,
    Chars(String),
}

/// Parses a format string such as `%R\n%H\n%B\n`. `%%` is a literal `%`.
pub fn parse_format(format: &str) -> Result<Vec<FormatItem>> {
    let mut items = Vec::new();
    let mut chars = String::new();
    let mut escaped = false;
    for ch in format.chars() {
        if !escaped {
            match ch {
                '%' => escaped = true,
                ch => chars.push(ch),
            }
            continue;
        }
        escaped = false;
        let item = match ch {
            '%' => {
                chars.push('%');
                continue;
            }
            'R' => FormatItem::FirstLine,
            'H' => FormatItem::Headers,
            'B' => FormatItem::Body,
            _ => return Err(anyhow!("Invalid formatting character '{}'", ch)),
        };
        if !chars.is_empty() {
            items.push(FormatItem::Chars(std::mem::take(&mut chars)));
        }
        items.push(item);
    }
    if !chars.is_empty() {
        items.push(FormatItem::Chars(chars));
    }
    Ok(items)
}

/// Pretty-prints JSON object and array bodies, anything else is returned as is.
pub fn prettify_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) if value.is_object() || value.is_array() => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| String::from(body))
        }
        _ => String::from(body),
    }
}

/// A raw response read to completion so it can be printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RawResponse {
    pub async fn read(response: Response) -> Result<RawResponse> {
        let status_line = format!("{:?} {}", response.version(), response.status());
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await?;
        Ok(RawResponse {
            status_line,
            headers,
            body,
        })
    }
}

pub struct FormattedOutputter<'a, W: Write> {
    writer: &'a mut W,
    response_format: Vec<FormatItem>,
}

impl<'a, W: Write> FormattedOutputter<'a, W> {
    pub fn new(writer: &'a mut W, response_format: Vec<FormatItem>) -> FormattedOutputter<'a, W> {
        FormattedOutputter {
            writer,
            response_format,
        }
    }

    pub fn normalized<T: Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut *self.writer, value)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn raw(&mut self, response: &RawResponse) -> Result<()> {
        for item in &self.response_format {
            let to_write = match item {
                FormatItem::FirstLine => response.status_line.clone(),
                FormatItem::Headers => response
                    .headers
                    .iter()
                    .map(|(name, value)| format!("{}: {}\n", name, value))
                    .collect(),
                FormatItem::Body => prettify_body(&response.body),
                FormatItem::Chars(chars) => chars.clone(),
            };
            self.writer.write_all(to_write.as_bytes())?;
        }
        Ok(())
    }
}
