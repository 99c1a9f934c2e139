// catalog.rs — 壁纸目录的数据模型
// 远端返回的 JSON 形如：
//   {"version": 1, "data": {"<id>": {"dhd": "...", "dsd": "...", "s": "...", "wfs": "..."}}}
// 所有字段都可缺省，多余字段由 serde 自动忽略

use crate::error::AppError;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 图片清晰度档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Dhd,
    Dsd,
    S,
    Wfs,
}

impl Tier {
    /// 固定的下载顺序
    pub const ALL: [Tier; 4] = [Tier::Dhd, Tier::Dsd, Tier::S, Tier::Wfs];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Dhd => "dhd",
            Tier::Dsd => "dsd",
            Tier::S => "s",
            Tier::Wfs => "wfs",
        }
    }

    pub fn parse(s: &str) -> Option<Tier> {
        Tier::ALL.into_iter().find(|t| t.as_str() == s.trim())
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个壁纸条目：每个档位一个可选 URL
///
/// 缺失、`null` 和空字符串都视为"没有该档位"。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub dhd: Option<String>,
    #[serde(default)]
    pub dsd: Option<String>,
    #[serde(default)]
    pub s: Option<String>,
    #[serde(default)]
    pub wfs: Option<String>,
}

impl CatalogEntry {
    /// 返回某个档位的 URL，空字符串当作不存在
    pub fn url(&self, tier: Tier) -> Option<&str> {
        let field = match tier {
            Tier::Dhd => &self.dhd,
            Tier::Dsd => &self.dsd,
            Tier::S => &self.s,
            Tier::Wfs => &self.wfs,
        };
        field.as_deref().filter(|u| !u.is_empty())
    }

    /// 按固定顺序列出所有存在的档位
    pub fn tiers(&self) -> impl Iterator<Item = (Tier, &str)> + '_ {
        Tier::ALL
            .into_iter()
            .filter_map(move |tier| self.url(tier).map(|url| (tier, url)))
    }
}

/// 整个目录
///
/// `data` 用 BTreeMap 保存，遍历顺序按 ID 升序，模糊匹配因此是确定性的。
#[derive(Debug, Default, Deserialize)]
pub struct Catalog {
    /// 目录版本号，只用于日志
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: i64,
    /// `null` 条目解析为没有任何档位的空条目
    #[serde(default, deserialize_with = "entries_allowing_null")]
    pub data: BTreeMap<String, CatalogEntry>,
}

// JSON 里的 null 与字段缺失等价
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn entries_allowing_null<'de, D>(deserializer: D) -> Result<BTreeMap<String, CatalogEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<CatalogEntry>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(id, entry)| (id, entry.unwrap_or_default()))
        .collect())
}

impl Catalog {
    /// 从完整缓冲的响应体解析目录
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AppError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
