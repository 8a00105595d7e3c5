//! Where sections read resolved banners from.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use crate::domain::ResolvedBanners;
use crate::error::GatewayError;
use crate::service::BannerService;

/// Path of the read endpoint, relative to the service base URL.
pub const BY_LOCATION_PATH: &str = "api/promotional-banners/by-location";

/// A read-only supplier of resolved banners.
#[async_trait]
pub trait BannerSource: Send + Sync + std::fmt::Debug {
    /// Fetches the grouped banners for `location`.
    async fn fetch(&self, location: &str) -> Result<ResolvedBanners, GatewayError>;
}

/// Reads banners from a remote gateway over HTTP.
///
/// Any non-2xx status, transport error, or body that does not match the
/// [`ResolvedBanners`] schema is reported as [`GatewayError::Upstream`].
#[derive(Debug, Clone)]
pub struct HttpBannerSource {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpBannerSource {
    /// Creates a source for the gateway at `base_url`
    /// (e.g. `http://localhost:3000` or `https://shop.example.com/banners`).
    /// A path prefix on the base URL is kept.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the URL does not parse,
    /// or [`GatewayError::Upstream`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let endpoint = Url::parse(base_url)
            .and_then(|mut base| {
                if !base.path().ends_with('/') {
                    let dir = format!("{}/", base.path());
                    base.set_path(&dir);
                }
                base.join(BY_LOCATION_PATH)
            })
            .map_err(|e| GatewayError::InvalidRequest(format!("invalid base url: {e}")))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    /// The fully qualified read endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl BannerSource for HttpBannerSource {
    async fn fetch(&self, location: &str) -> Result<ResolvedBanners, GatewayError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("location", location);

        let resolved = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<ResolvedBanners>()
            .await?;
        Ok(resolved)
    }
}

/// Reads banners in-process through a [`BannerService`], sharing its
/// server-side cache.
#[derive(Debug, Clone)]
pub struct ServiceBannerSource {
    service: BannerService,
}

impl ServiceBannerSource {
    /// Wraps `service`.
    #[must_use]
    pub fn new(service: BannerService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl BannerSource for ServiceBannerSource {
    async fn fetch(&self, location: &str) -> Result<ResolvedBanners, GatewayError> {
        let resolved = self.service.banners_for_location(Some(location)).await?;
        Ok(ResolvedBanners::clone(&resolved))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url() {
        let Ok(source) = HttpBannerSource::new("http://localhost:3000", Duration::from_secs(5))
        else {
            panic!("valid base url");
        };
        assert_eq!(
            source.endpoint().as_str(),
            "http://localhost:3000/api/promotional-banners/by-location"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        for base in ["http://shop.example.com/banners", "http://shop.example.com/banners/"] {
            let Ok(source) = HttpBannerSource::new(base, Duration::from_secs(5)) else {
                panic!("valid base url");
            };
            assert_eq!(
                source.endpoint().as_str(),
                "http://shop.example.com/banners/api/promotional-banners/by-location"
            );
        }
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = HttpBannerSource::new("not a url", Duration::from_secs(5));
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn unreachable_gateway_is_an_upstream_error() {
        let Ok(source) = HttpBannerSource::new("http://127.0.0.1:9", Duration::from_millis(500))
        else {
            panic!("valid base url");
        };
        let result = source.fetch("home").await;
        assert!(matches!(result, Err(GatewayError::Upstream(_))));
    }
}
