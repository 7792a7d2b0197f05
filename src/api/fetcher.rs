use reqwest::blocking::Client;

use super::{FetchError, FetchResult, SearchQuery};
use crate::config::EndpointConfig;

/// Anything that can turn a search query into places
pub trait PlaceFetcher {
    fn fetch(&self, query: &SearchQuery) -> FetchResult;
}

/// Issues one HTTP GET per query against the configured endpoint.
///
/// No retries and no timeout beyond the HTTP client's default. A failed
/// request is reported once; searching again is up to the user.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    endpoint: EndpointConfig,
}

impl HttpFetcher {
    pub fn new(endpoint: EndpointConfig) -> Result<Self, FetchError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: Client, endpoint: EndpointConfig) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }
}

impl PlaceFetcher for HttpFetcher {
    fn fetch(&self, query: &SearchQuery) -> FetchResult {
        let schema = self.endpoint.schema;
        let (header, value) = schema.identity_header(&self.endpoint);

        log::debug!(
            "User location: lat={}, lon={}",
            query.origin.latitude,
            query.origin.longitude
        );

        let request = self
            .client
            .get(&self.endpoint.url)
            .query(&schema.query_params(&self.endpoint, query))
            .header(header, value)
            .build()?;

        log::debug!("URL: {}", request.url());

        let response = self.client.execute(request).map_err(|e| {
            log::error!("Request to {} failed: {}", self.endpoint.url, e);
            FetchError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Error: response code {}", status.as_u16());
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        let places = schema.parse(&body, query.origin)?;
        log::debug!("Parsed {} places for {:?}", places.len(), query.term);
        Ok(places)
    }
}
