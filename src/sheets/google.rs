use super::{Rows, SheetStore};
use crate::auth::TokenProvider;
use crate::error::{check_response, Error, Result};
use crate::schema::CellRange;
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets/";

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl ValueRange {
    fn into_rows(self) -> Rows {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueUpdate<'a> {
    range: String,
    major_dimension: &'static str,
    values: &'a Rows,
}

/// Sheets API v4 client for one spreadsheet.
pub struct GoogleSheets {
    http: reqwest::Client,
    spreadsheet_id: String,
    auth: Option<TokenProvider>,
}

impl GoogleSheets {
    pub fn new(http: reqwest::Client, spreadsheet_id: String, auth: Option<TokenProvider>) -> Self {
        GoogleSheets {
            http,
            spreadsheet_id,
            auth,
        }
    }

    async fn access_token(&self) -> Result<String> {
        if self.spreadsheet_id.is_empty() {
            return Err(Error::NotConfigured("SHEET_ID is not set"));
        }
        match &self.auth {
            Some(auth) => auth.access_token().await,
            None => Err(Error::NotConfigured("no service account credentials")),
        }
    }

    fn values_url(&self, range: &CellRange) -> Result<Url> {
        let mut url = Url::parse(SHEETS_API)?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend([self.spreadsheet_id.as_str(), "values", &range.to_string()]);
        }
        Ok(url)
    }

    fn get_request(&self, token: &str, range: &CellRange) -> Result<RequestBuilder> {
        Ok(self.http.get(self.values_url(range)?).bearer_auth(token))
    }

    fn update_request(&self, token: &str, range: &CellRange, values: &Rows) -> Result<RequestBuilder> {
        let body = ValueUpdate {
            range: range.to_string(),
            major_dimension: "ROWS",
            values,
        };

        Ok(self
            .http
            .put(self.values_url(range)?)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(token)
            .json(&body))
    }
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[rocket::async_trait]
impl SheetStore for GoogleSheets {
    async fn get_values(&self, range: &CellRange) -> Result<Rows> {
        let token = self.access_token().await?;

        let response = self.get_request(&token, range)?.send().await?;
        let body: ValueRange = check_response(response).await?.json().await?;

        Ok(body.into_rows())
    }

    async fn update_values(&self, range: &CellRange, values: Rows) -> Result<()> {
        let token = self.access_token().await?;

        let response = self.update_request(&token, range, &values)?.send().await?;
        check_response(response).await?;

        Ok(())
    }
}
