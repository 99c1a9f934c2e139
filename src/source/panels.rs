// panels.rs — Panels 壁纸目录的异步客户端
// 目录是放在对象存储上的一个静态 JSON 文件，一次 GET 拿到全部条目

use super::WallpaperSource;
use crate::catalog::Catalog;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt; // 提供 write_all() / flush()

/// 默认目录地址
pub const DEFAULT_CATALOG_URL: &str =
    "https://storage.googleapis.com/panels-api/data/20240916/media-1a-i-p~s";

/// Panels API 客户端
///
/// 封装了 reqwest::Client 和目录地址。不设置超时、不重试、不缓存。
pub struct PanelsClient {
    /// HTTP 客户端（内部有连接池，目录和图片请求共用）
    client: reqwest::Client,

    /// 目录 JSON 的地址，由配置注入
    catalog_url: Url,
}

impl PanelsClient {
    /// 创建客户端；URL 不合法时返回配置错误
    pub fn new(catalog_url: &str) -> Result<Self, AppError> {
        let catalog_url = Url::parse(catalog_url)
            .map_err(|e| AppError::Config(format!("invalid catalog url `{}`: {}", catalog_url, e)))?;

        Ok(Self {
            client: reqwest::Client::new(),
            catalog_url,
        })
    }

    pub fn catalog_url(&self) -> &Url {
        &self.catalog_url
    }
}

#[async_trait]
impl WallpaperSource for PanelsClient {
    async fn fetch_catalog(&self) -> Result<Catalog, AppError> {
        tracing::info!(url = %self.catalog_url, "fetching catalog");

        let response = self
            .client
            .get(self.catalog_url.clone())
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("error fetching wallpaper data: {}", e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::Fetch(format!(
                "failed to fetch wallpaper data: {}",
                status
            )));
        }

        // 先完整读出响应体，再解析
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Fetch(format!("error reading response body: {}", e)))?;

        let catalog = Catalog::from_slice(&body)?;
        if catalog.is_empty() {
            tracing::warn!(url = %self.catalog_url, "catalog has no entries");
        }
        tracing::info!(
            version = catalog.version,
            entries = catalog.len(),
            "catalog decoded"
        );
        Ok(catalog)
    }

    async fn download_to(&self, url: &str, file: &mut File, path: &Path) -> Result<u64, AppError> {
        tracing::debug!(%url, path = %path.display(), "downloading image");

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("error fetching {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch(format!("error fetching {}: {}", url, status)));
        }

        // 边收边写，不把整张图片读进内存
        let mut written: u64 = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| AppError::Fetch(format!("error reading {}: {}", url, e)))?
        {
            file.write_all(&chunk).await.map_err(|source| AppError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            written += chunk.len() as u64;
        }

        file.flush().await.map_err(|source| AppError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_url() {
        let err = PanelsClient::new("not a url").err().unwrap();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_default_url_parses() {
        let client = PanelsClient::new(DEFAULT_CATALOG_URL).unwrap();
        assert_eq!(client.catalog_url().host_str(), Some("storage.googleapis.com"));
    }

    #[tokio::test]
    async fn test_fetch_catalog_ok() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/catalog")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"version":7,"data":{"abc123":{"dhd":"http://x/img.jpg"}}}"#)
            .create_async()
            .await;

        let client = PanelsClient::new(&format!("{}/catalog", server.url())).unwrap();
        let catalog = client.fetch_catalog().await.unwrap();

        mock.assert_async().await;
        assert_eq!(catalog.version, 7);
        assert!(catalog.data.get("abc123").is_some());
    }

    #[tokio::test]
    async fn test_fetch_catalog_non_200_is_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/catalog")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = PanelsClient::new(&format!("{}/catalog", server.url())).unwrap();
        let err = client.fetch_catalog().await.unwrap_err();

        match err {
            AppError::Fetch(msg) => assert!(msg.contains("500 Internal Server Error"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_catalog_bad_json_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/catalog")
            .with_status(200)
            .with_body("{\"data\": [1, 2")
            .create_async()
            .await;

        let client = PanelsClient::new(&format!("{}/catalog", server.url())).unwrap();
        let err = client.fetch_catalog().await.unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_catalog_connection_refused() {
        // 1 号端口上没有服务在监听
        let client = PanelsClient::new("http://127.0.0.1:1/catalog").unwrap();
        let err = client.fetch_catalog().await.unwrap_err();
        assert!(matches!(err, AppError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_download_to_streams_exact_bytes() {
        let image: Vec<u8> = (0..=255u8).cycle().take(64 * 1024 + 17).collect();

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/img.jpg")
            .with_status(200)
            .with_header("content-type", "image/jpeg")
            .with_body(&image)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let mut file = File::create(&path).await.unwrap();

        let client = PanelsClient::new(&server.url()).unwrap();
        let written = client
            .download_to(&format!("{}/img.jpg", server.url()), &mut file, &path)
            .await
            .unwrap();
        drop(file);

        assert_eq!(written, image.len() as u64);
        assert_eq!(std::fs::read(&path).unwrap(), image);
    }

    #[tokio::test]
    async fn test_download_to_404_is_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing.jpg")
            .with_status(404)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let mut file = File::create(&path).await.unwrap();

        let client = PanelsClient::new(&server.url()).unwrap();
        let err = client
            .download_to(&format!("{}/missing.jpg", server.url()), &mut file, &path)
            .await
            .unwrap_err();

        match err {
            AppError::Fetch(msg) => assert!(msg.contains("404"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
