/*! HTTP sentiment client.

Talks to a translation + sentiment service over HTTP.
Each text is POSTed as JSON:

```json
{"text": "qué buen video", "source": "es", "target": "en"}
```

and the service answers with the detected language and the sentiment of the (translated) text:

```json
{"language": "es", "polarity": 0.7, "subjectivity": 0.6}
```

The service is expected to skip translation when the text is already in the target language.
!*/
use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::Serialize;

use super::client::{Analyze, Sentiment};
use crate::error::Error;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
    source: &'a str,
    target: &'a str,
}

/// Blocking HTTP client for the sentiment service.
///
/// The inner [Client] pools connections and is shared by every worker thread.
#[derive(Debug, Clone)]
pub struct HttpAnalyzer {
    client: Client,
    endpoint: reqwest::Url,
    source: String,
    target: String,
}

impl HttpAnalyzer {
    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

impl Analyze for HttpAnalyzer {
    fn analyze(&self, text: &str) -> Result<Sentiment, Error> {
        let request = AnalyzeRequest {
            text,
            source: &self.source,
            target: &self.target,
        };

        let transient = |e: reqwest::Error| Error::TransientService(e.to_string());
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .map_err(transient)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            debug!("service answered {}: {}", status, body);
            return Err(Error::TransientService(format!(
                "service answered {status}"
            )));
        }

        let sentiment: Sentiment = response.json().map_err(transient)?;
        sentiment.validate()
    }
}

/// [HttpAnalyzer] builder.
pub struct HttpAnalyzerBuilder {
    endpoint: Option<String>,
    timeout: Duration,
    source: String,
    target: String,
}

impl Default for HttpAnalyzerBuilder {
    /// Defaults are:
    /// - no endpoint (has to be set)
    /// - 30 seconds timeout
    /// - translation from spanish to english
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
            source: "es".to_string(),
            target: "en".to_string(),
        }
    }
}

impl HttpAnalyzerBuilder {
    pub fn endpoint(&mut self, endpoint: &str) -> &mut Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    pub fn source(&mut self, lang: &str) -> &mut Self {
        self.source = lang.to_string();
        self
    }

    pub fn target(&mut self, lang: &str) -> &mut Self {
        self.target = lang.to_string();
        self
    }

    pub fn build(&self) -> Result<HttpAnalyzer, Error> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| Error::Custom("No endpoint provided".to_string()))?;
        let endpoint = reqwest::Url::parse(endpoint)
            .map_err(|e| Error::Custom(format!("invalid endpoint {endpoint:?}: {e}")))?;

        let client = Client::builder().timeout(self.timeout).build()?;

        Ok(HttpAnalyzer {
            client,
            endpoint,
            source: self.source.clone(),
            target: self.target.clone(),
        })
    }
}
