//! 目录服务返回的数据类型定义

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// 最新版本的描述信息
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LatestInfo {
    pub name: String,
    pub publisher: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub license_url: Option<String>,
}

/// 目录中的一个包
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageRecord {
    pub id: String,
    /// 版本号，最新在前
    #[serde(default)]
    pub versions: Vec<String>,
    pub latest: LatestInfo,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

pub const NO_DESCRIPTION: &str = "No description available";

impl PackageRecord {
    pub fn name(&self) -> &str {
        &self.latest.name
    }

    pub fn publisher(&self) -> &str {
        &self.latest.publisher
    }

    /// 描述，缺失或为空时返回占位文本
    pub fn description_or_default(&self) -> &str {
        match self.latest.description.as_deref() {
            Some(desc) if !desc.trim().is_empty() => desc,
            _ => NO_DESCRIPTION,
        }
    }

    pub fn latest_version(&self) -> Option<&str> {
        self.versions.first().map(String::as_str)
    }

    /// 是否有可展示的许可证信息
    pub fn has_license_info(&self) -> bool {
        self.latest.license.is_some() || self.latest.license_url.is_some()
    }
}

/// `GET /v2/packages` 与 `GET /v2/featured` 的响应
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct PackagesResponse {
    #[serde(default)]
    pub packages: Vec<PackageRecord>,
}

/// `GET /v2/packages?take=1` 的计数响应
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct TotalResponse {
    pub total: u64,
}

/// `GET /v2/packages/{id}` 的响应
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct PackageResponse {
    #[serde(default)]
    pub package: Option<PackageRecord>,
}
