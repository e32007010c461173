//! Fetches the feature collection for a view as text, decoding is left to the view controller.

use seed::fetch;
use std::fmt;

pub async fn fetch_text(url: &'static str) -> Result<String, FetchError> {
    let response = fetch::fetch(url).await?.check_status()?;
    Ok(response.text().await?)
}

#[derive(Debug)]
pub struct FetchError(fetch::FetchError);

impl From<fetch::FetchError> for FetchError {
    fn from(error: fetch::FetchError) -> Self {
        Self(error)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            fetch::FetchError::StatusError(status) => {
                write!(f, "server responded {} {}", status.code, status.text)
            }
            other => write!(f, "{:?}", other),
        }
    }
}
