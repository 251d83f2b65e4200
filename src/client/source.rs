//! Media transports.
//!
//! Every attachment link is fetched through a [`MediaSource`]. Plain links go
//! over HTTP(S); `ipfs://` links are resolved through a list of gateways.
//! [`MediaRouter`] picks the transport per link.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::client::http::HttpClient;
use crate::client::ipfs::{gateway_url, is_ipfs_url};
use crate::error::{Error, Result};

/// Bytes of a fetched attachment and the content type the server reported.
#[derive(Debug, Clone)]
pub struct FetchedMedia {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// A transport able to retrieve a media link.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Fetch one link. Any failure is reported as [`Error::Attachment`].
    async fn fetch(&self, url: &str) -> Result<FetchedMedia>;
}

/// Standard HTTP(S) transport.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: HttpClient,
}

impl HttpSource {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MediaSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<FetchedMedia> {
        let response = self
            .client
            .get(url)
            .await
            .map_err(|e| Error::attachment(url, e))?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::attachment(url, e))?;

        Ok(FetchedMedia {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

/// IPFS transport trying each gateway in order until one succeeds.
#[derive(Debug, Clone)]
pub struct IpfsSource {
    http: HttpSource,
    gateways: Vec<String>,
}

impl IpfsSource {
    pub fn new(client: HttpClient, gateways: Vec<String>) -> Self {
        Self {
            http: HttpSource::new(client),
            gateways,
        }
    }
}

#[async_trait]
impl MediaSource for IpfsSource {
    async fn fetch(&self, url: &str) -> Result<FetchedMedia> {
        let mut last_error = None;

        for gateway in &self.gateways {
            let Some(resolved) = gateway_url(url, gateway) else {
                return Err(Error::attachment(url, "not an IPFS address"));
            };

            match self.http.fetch(&resolved).await {
                Ok(media) => return Ok(media),
                Err(e) => {
                    tracing::debug!("Gateway {} failed for {}: {}", gateway, url, e);
                    last_error = Some(e);
                }
            }
        }

        Err(match last_error {
            Some(Error::Attachment { message, .. }) => Error::attachment(url, message),
            Some(other) => Error::attachment(url, other),
            None => Error::attachment(url, "no IPFS gateways configured"),
        })
    }
}

/// Dispatches each link to the transport matching its addressing scheme.
#[derive(Debug, Clone)]
pub struct MediaRouter {
    http: HttpSource,
    ipfs: IpfsSource,
}

impl MediaRouter {
    pub fn new(client: HttpClient, gateways: Vec<String>) -> Self {
        Self {
            http: HttpSource::new(client.clone()),
            ipfs: IpfsSource::new(client, gateways),
        }
    }
}

#[async_trait]
impl MediaSource for MediaRouter {
    async fn fetch(&self, url: &str) -> Result<FetchedMedia> {
        if is_ipfs_url(url) {
            self.ipfs.fetch(url).await
        } else {
            self.http.fetch(url).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> HttpClient {
        HttpClient::new("xlog-export-test").unwrap()
    }

    #[tokio::test]
    async fn test_http_source_reports_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img/cat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/webp")
                    .set_body_bytes(vec![1u8, 2, 3]),
            )
            .mount(&server)
            .await;

        let media = HttpSource::new(client())
            .fetch(&format!("{}/img/cat", server.uri()))
            .await
            .unwrap();

        assert_eq!(media.bytes, vec![1, 2, 3]);
        assert_eq!(media.content_type.as_deref(), Some("image/webp"));
    }

    #[tokio::test]
    async fn test_http_source_non_success_is_attachment_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = HttpSource::new(client())
            .fetch(&format!("{}/missing.png", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Attachment { .. }));
    }

    #[tokio::test]
    async fn test_ipfs_source_falls_through_gateways() {
        let broken = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .expect(1)
            .mount(&broken)
            .await;

        let working = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ipfs/bafkreiabc"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png".to_vec()))
            .expect(1)
            .mount(&working)
            .await;

        let router = MediaRouter::new(
            client(),
            vec![
                format!("{}/ipfs/", broken.uri()),
                format!("{}/ipfs/", working.uri()),
            ],
        );

        let media = router.fetch("ipfs://bafkreiabc").await.unwrap();
        assert_eq!(media.bytes, b"png".to_vec());
    }
}
