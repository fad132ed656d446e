//! Remote search service: wire types, the service trait and its HTTP client

use crate::config::Config;
use crate::error::ServiceError;
use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub type RecordId = u64;

/// Full data of a single record, keyed by attribute name.
pub type DetailRecord = BTreeMap<String, String>;

/// A single candidate returned by the search service for a query.
///
/// Ranking is owned by the service; the controller keeps the order it is given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Match {
    /// Indexed term that matched the query
    pub term: String,
    /// Attribute (column) the term was found in
    pub attribute: String,
    /// Full attribute value, used as the display label
    pub original_entry: String,
    pub attribute_index: usize,
    /// Offset of the term within the attribute value
    pub position: usize,
    /// Backend record this match belongs to, needed to fetch its details
    #[serde(rename = "dictionary_index", skip_serializing_if = "Option::is_none")]
    pub record_id: Option<RecordId>,
}

impl Match {
    pub fn new(original_entry: impl Into<String>) -> Self {
        Self {
            original_entry: original_entry.into(),
            ..Default::default()
        }
    }

    pub fn with_record_id(mut self, id: RecordId) -> Self {
        self.record_id = Some(id);
        self
    }
}

/// Request/response access to the remote search backend.
///
/// Implementations block; they are only ever called from worker threads.
pub trait SearchService: Send + Sync {
    fn search(&self, term: &str) -> Result<Vec<Match>, ServiceError>;

    fn fetch_detail(&self, id: RecordId) -> Result<DetailRecord, ServiceError>;
}

#[derive(Deserialize)]
struct SearchResponseBody {
    results: Vec<Match>,
}

/// Search service reached over HTTP (`/search?term=` and `/get?id=`).
pub struct HttpSearchService {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpSearchService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        Self::new(&config.api_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get<T>(
        &self,
        path: &str,
        params: &[(&str, String)],
        decode: fn(&str) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }

        let body = response.text().map_err(|e| self.transport_error(e))?;
        decode(&body)
    }

    fn transport_error(&self, err: reqwest::Error) -> ServiceError {
        if err.is_timeout() {
            ServiceError::Timeout(self.timeout)
        } else {
            ServiceError::Network(err.to_string())
        }
    }
}

impl SearchService for HttpSearchService {
    fn search(&self, term: &str) -> Result<Vec<Match>, ServiceError> {
        self.get("search", &[("term", term.to_string())], decode_search)
    }

    fn fetch_detail(&self, id: RecordId) -> Result<DetailRecord, ServiceError> {
        let record = self.get("get", &[("id", id.to_string())], decode_detail)?;
        // The backend answers an unknown id with an empty object or null
        if record.is_empty() {
            return Err(ServiceError::NotFound(id));
        }
        Ok(record)
    }
}

/// Parse a `/search` response body.
pub fn decode_search(body: &str) -> Result<Vec<Match>, ServiceError> {
    let parsed: SearchResponseBody =
        serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))?;
    Ok(parsed.results)
}

/// Parse a `/get` response body. Non-string values are kept in their JSON form
/// and a `null` body reads as an empty record.
pub fn decode_detail(body: &str) -> Result<DetailRecord, ServiceError> {
    let parsed: Option<BTreeMap<String, serde_json::Value>> =
        serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))?;

    Ok(parsed
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_search() {
        let body = r#"{"results":[
            {"term":"harry","attribute":"Title","original_entry":"Harry Potter",
             "attribute_index":0,"position":0,"dictionary_index":17},
            {"term":"harry","attribute":"Authors","original_entry":"Harry Turtledove",
             "attribute_index":1,"position":0,"dictionary_index":3}
        ]}"#;

        let results = decode_search(body).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].original_entry, "Harry Potter");
        assert_eq!(results[0].record_id, Some(17));
        assert_eq!(results[1].attribute, "Authors");
        assert_eq!(results[1].attribute_index, 1);
    }

    #[test]
    fn test_decode_search_partial_match() {
        let results = decode_search(r#"{"results":[{"original_entry":"Harry Potter"}]}"#).unwrap();
        assert_eq!(results, vec![Match::new("Harry Potter")]);
    }

    #[test]
    fn test_decode_search_errors() {
        assert!(matches!(
            decode_search("not json"),
            Err(ServiceError::Decode(_))
        ));
        assert!(matches!(
            decode_search(r#"{"matches":[]}"#),
            Err(ServiceError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_detail() {
        let record =
            decode_detail(r#"{"Title":"Dune","Authors":"Frank Herbert","Price":9.99,"Notes":null}"#)
                .unwrap();
        assert_eq!(record["Title"], "Dune");
        assert_eq!(record["Authors"], "Frank Herbert");
        assert_eq!(record["Price"], "9.99");
        assert_eq!(record["Notes"], "");
        assert!(decode_detail("[]").is_err());
    }

    #[test]
    fn test_decode_detail_null_is_empty() {
        assert_eq!(decode_detail("null").unwrap(), DetailRecord::new());
        assert_eq!(decode_detail("{}").unwrap(), DetailRecord::new());
    }

    /// Serve a single HTTP response with `body`, then hang up.
    fn serve_once(body: &'static str) -> String {
        use std::io::{BufRead, BufReader, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            )
            .unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_fetch_detail_null_body_is_not_found() {
        let service = HttpSearchService::new(&serve_once("null"), Duration::from_secs(5)).unwrap();
        assert_eq!(service.fetch_detail(3), Err(ServiceError::NotFound(3)));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let service =
            HttpSearchService::new("http://127.0.0.1:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(service.base_url(), "http://127.0.0.1:8080");
    }
}
