use super::{FlickrError, FlickrResult};
use url::Url;

/// Public REST endpoint for Flickr API methods.
pub const DEFAULT_ENDPOINT: &str = "https://www.flickr.com/services/rest/";

const API_KEY_ENV: &str = "TOURIST_FLICKR_API_KEY";
const ENDPOINT_ENV: &str = "TOURIST_FLICKR_ENDPOINT";

/// Static settings for the search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlickrConfig {
    pub endpoint: Url,
    pub api_key: String,
}

impl FlickrConfig {
    /// Uses the public endpoint with the given API key.
    pub fn new(api_key: impl Into<String>) -> FlickrResult<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT, api_key)
    }

    pub fn with_endpoint(endpoint: &str, api_key: impl Into<String>) -> FlickrResult<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(FlickrError::Config("api key cannot be empty".to_string()));
        }
        let endpoint = Url::parse(endpoint.trim())
            .map_err(|err| FlickrError::Config(format!("invalid endpoint `{endpoint}`: {err}")))?;
        Ok(Self { endpoint, api_key })
    }

    /// Reads `TOURIST_FLICKR_API_KEY` and the optional
    /// `TOURIST_FLICKR_ENDPOINT` override.
    pub fn from_env() -> FlickrResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| FlickrError::Config(format!("{API_KEY_ENV} is not set")))?;
        match std::env::var(ENDPOINT_ENV) {
            Ok(endpoint) if !endpoint.trim().is_empty() => Self::with_endpoint(&endpoint, api_key),
            _ => Self::new(api_key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FlickrConfig, DEFAULT_ENDPOINT};

    #[test]
    fn new_uses_public_endpoint_and_trims_key() {
        let config = FlickrConfig::new("  abc123 ").unwrap();
        assert_eq!(config.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(config.api_key, "abc123");
    }

    #[test]
    fn rejects_blank_key_and_bad_endpoint() {
        assert!(FlickrConfig::new("   ").is_err());
        assert!(FlickrConfig::with_endpoint("not a url", "key").is_err());
    }
}
