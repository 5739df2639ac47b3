//! 目录服务客户端：对 winget.run v2 只读 API 的封装

pub mod types;

pub use types::PackageRecord;

use crate::config::Config;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use types::{PackageResponse, PackagesResponse, TotalResponse};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("search query is empty")]
    EmptyQuery,
    #[error("invalid catalog url `{0}`")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("catalog returned status {0}")]
    Status(StatusCode),
    #[error("failed to decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let mut builder = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("winget-store/", env!("CARGO_PKG_VERSION")));

        if let Some(proxy) = config.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.api_url.clone(),
        })
    }

    /// 全文搜索；空查询不会发出请求
    pub async fn search(&self, query: &str) -> Result<Vec<PackageRecord>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CatalogError::EmptyQuery);
        }

        let url = self.endpoint(&["v2", "packages"])?;
        log::debug!("搜索: {}", query);
        let request = self.client.get(url).query(&[("query", query)]);
        let response: PackagesResponse = self.fetch_json(request).await?;
        log::info!("搜索 \"{}\" 返回 {} 个包", query, response.packages.len());
        Ok(response.packages)
    }

    /// 按 ID 获取单个包，不存在时返回 None
    pub async fn get_by_id(&self, id: &str) -> Result<Option<PackageRecord>, CatalogError> {
        let url = self.endpoint(&["v2", "packages", id])?;
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            log::info!("包不存在: {}", id);
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status()));
        }

        let body = response.text().await?;
        let parsed: PackageResponse = serde_json::from_str(&body)?;
        Ok(parsed.package)
    }

    /// 目录中的包总数
    pub async fn get_total_count(&self) -> Result<u64, CatalogError> {
        let url = self.endpoint(&["v2", "packages"])?;
        let request = self.client.get(url).query(&[("take", "1")]);
        let response: TotalResponse = self.fetch_json(request).await?;
        Ok(response.total)
    }

    /// 推荐包列表
    pub async fn get_featured(&self) -> Result<Vec<PackageRecord>, CatalogError> {
        let url = self.endpoint(&["v2", "featured"])?;
        let response: PackagesResponse = self.fetch_json(self.client.get(url)).await?;
        Ok(response.packages)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let invalid = || CatalogError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, CatalogError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> CatalogClient {
        let config = Config {
            api_url: server.base_url(),
            ..Config::default()
        };
        CatalogClient::new(&config).unwrap()
    }

    fn package_json(id: &str, name: &str) -> serde_json::Value {
        json!({
            "Id": id,
            "Versions": ["2.0.0", "1.0.0"],
            "Latest": { "Name": name, "Publisher": "Acme", "Tags": ["tool"] },
            "Featured": false,
            "UpdatedAt": "2024-01-02T03:04:05Z",
            "CreatedAt": "2023-01-02T03:04:05Z"
        })
    }

    #[tokio::test]
    async fn search_sends_query_and_decodes_packages() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v2/packages")
                    .query_param("query", "visual studio");
                then.status(200).json_body(json!({
                    "Packages": [
                        package_json("Microsoft.VisualStudioCode", "Visual Studio Code"),
                        package_json("Microsoft.VisualStudio.2022.Community", "Visual Studio Community")
                    ],
                    "Total": 2
                }));
            })
            .await;

        let packages = client_for(&server).search("  visual studio ").await.unwrap();
        mock.assert_async().await;
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].id, "Microsoft.VisualStudioCode");
    }

    #[tokio::test]
    async fn blank_search_issues_no_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).json_body(json!({ "Packages": [] }));
            })
            .await;

        let result = client_for(&server).search("   ").await;
        assert!(matches!(result, Err(CatalogError::EmptyQuery)));
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn get_by_id_returns_package() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/packages/Git.Git");
                then.status(200)
                    .json_body(json!({ "Package": package_json("Git.Git", "Git") }));
            })
            .await;

        let pkg = client_for(&server).get_by_id("Git.Git").await.unwrap();
        assert_eq!(pkg.map(|p| p.latest.name), Some("Git".to_string()));
    }

    #[tokio::test]
    async fn get_by_id_maps_404_to_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/packages/Missing.Package");
                then.status(404).body("not found");
            })
            .await;

        let pkg = client_for(&server).get_by_id("Missing.Package").await.unwrap();
        assert!(pkg.is_none());
    }

    #[tokio::test]
    async fn total_count_uses_take_probe() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/packages").query_param("take", "1");
                then.status(200).json_body(json!({ "Packages": [], "Total": 4321 }));
            })
            .await;

        assert_eq!(client_for(&server).get_total_count().await.unwrap(), 4321);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn featured_packages_are_decoded() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/featured");
                then.status(200)
                    .json_body(json!({ "Packages": [package_json("Mozilla.Firefox", "Firefox")] }));
            })
            .await;

        let featured = client_for(&server).get_featured().await.unwrap();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].name(), "Firefox");
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/featured");
                then.status(500);
            })
            .await;

        let err = client_for(&server).get_featured().await.unwrap_err();
        assert!(matches!(err, CatalogError::Status(s) if s == StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/packages");
                then.status(200).body("<html>oops</html>");
            })
            .await;

        let err = client_for(&server).search("chrome").await.unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[tokio::test]
    async fn slow_catalog_hits_configured_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/featured");
                then.status(200)
                    .delay(std::time::Duration::from_secs(3))
                    .json_body(json!({ "Packages": [] }));
            })
            .await;

        let config = Config {
            api_url: server.base_url(),
            timeout_secs: 1,
            ..Config::default()
        };
        let client = CatalogClient::new(&config).unwrap();

        let started = std::time::Instant::now();
        let err = client.get_featured().await.unwrap_err();
        assert!(matches!(err, CatalogError::Http(ref e) if e.is_timeout()), "{err}");
        assert!(started.elapsed() < std::time::Duration::from_millis(2500));
    }

    #[test]
    fn endpoint_handles_trailing_slash() {
        let config = Config {
            api_url: "https://api.example.com/".to_string(),
            ..Config::default()
        };
        let client = CatalogClient::new(&config).unwrap();
        let url = client.endpoint(&["v2", "packages", "Foo.Bar"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v2/packages/Foo.Bar");
    }
}
