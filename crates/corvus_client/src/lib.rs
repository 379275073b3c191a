//! # Corvus Package Client
//!
//! Scrapes the distribution store page for the current client package and
//! streams the XAPK artifact to disk.
//!
//! The store does not offer an API; the package version comes out of the
//! page's detail banner and the download URL is assembled from the
//! `data-dt-*` attributes of the download anchor.

use futures_util::StreamExt;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Store page listing the EN client package.
pub const DEFAULT_PAGE_URL: &str = "https://apkpure.com/azur-lane-apk/com.YoStarEN.AzurLane";

/// Store package id, used as a scrape fallback and for artifact naming.
pub const DEFAULT_PACKAGE_ID: &str = "com.YoStarEN.AzurLane";

/// Base of the store's direct-download endpoint.
const DOWNLOAD_BASE: &str = "https://d.apkpure.com/b/XAPK/";

/// Print a download progress line roughly every this many bytes.
const PROGRESS_STEP: u64 = 32 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Store returned error {0} for {1}")]
    Server(reqwest::StatusCode, String),

    #[error("Store page scrape failed: {0}")]
    Scrape(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// The package version and download location scraped from the store page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageDescriptor {
    pub version: String,
    pub download_url: String,
}

/// Scraping/download client for one store-listed package.
#[derive(Clone)]
pub struct PackageClient {
    client: reqwest::Client,
    page_url: String,
    package_id: String,
}

impl PackageClient {
    pub fn new(page_url: impl Into<String>, package_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            page_url: page_url.into(),
            package_id: package_id.into(),
        }
    }

    /// Fetch and scrape the store page for the current package descriptor.
    pub async fn fetch_descriptor(&self) -> Result<PackageDescriptor> {
        debug!(url = %self.page_url, "fetching store page");
        let response = self.client.get(&self.page_url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Server(response.status(), self.page_url.clone()));
        }

        let body = response.text().await?;
        parse_store_page(&body, &self.package_id)
    }

    /// Stream the package artifact into `dest_dir`, returning its path.
    ///
    /// The artifact is named `<Name>-<version>.xapk` from the final segment
    /// of the package id and the descriptor version.
    pub async fn download(&self, package: &PackageDescriptor, dest_dir: &Path) -> Result<PathBuf> {
        let response = self.client.get(&package.download_url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Server(
                response.status(),
                package.download_url.clone(),
            ));
        }

        let length = response.content_length().unwrap_or(0);
        let filename = format!(
            "{}-{}.xapk",
            short_name(&self.package_id),
            package.version
        );
        let path = dest_dir.join(&filename);
        println!("Downloading: {filename} ({length} bytes)");

        let mut file = File::create(&path).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;
        let mut last_report: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            if downloaded - last_report >= PROGRESS_STEP {
                last_report = downloaded;
                println!("  {} / {} MiB", downloaded >> 20, length >> 20);
            }
        }
        file.flush().await?;

        info!(path = %path.display(), bytes = downloaded, "download complete");
        println!("Downloaded: {}", path.display());
        Ok(path)
    }
}

/// Last dot-separated segment of the package id, used to name artifacts.
fn short_name(package_id: &str) -> &str {
    package_id.rsplit('.').next().unwrap_or(package_id)
}

/// Pull the version and download link out of the store page markup.
fn parse_store_page(html: &str, package_id: &str) -> Result<PackageDescriptor> {
    let document = Html::parse_document(html);
    let banner_sel = selector("div.detail_banner")?;
    let sdk_sel = selector("p.details_sdk")?;
    let anchor_sel = selector("a.download_apk_news")?;

    let banner = document
        .select(&banner_sel)
        .next()
        .ok_or_else(|| ClientError::Scrape("detail banner not found".into()))?;

    let sdk = banner
        .select(&sdk_sel)
        .next()
        .ok_or_else(|| ClientError::Scrape("version block not found".into()))?;
    let version = sdk
        .text()
        .map(str::trim)
        .find(|text| !text.is_empty())
        .ok_or_else(|| ClientError::Scrape("version text is empty".into()))?
        .to_string();

    let anchor = banner
        .select(&anchor_sel)
        .next()
        .ok_or_else(|| ClientError::Scrape("download anchor not found".into()))?;
    let name = anchor
        .value()
        .attr("data-dt-package_name")
        .unwrap_or(package_id);
    let code = anchor.value().attr("data-dt-version_code").unwrap_or("");
    let download_url = format!("{DOWNLOAD_BASE}{name}?versionCode={code}");

    Ok(PackageDescriptor {
        version,
        download_url,
    })
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ClientError::Scrape(format!("bad selector {css}: {e}")))
}
