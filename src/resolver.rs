// resolver.rs — 在目录中查找壁纸条目
// 两种模式：按 ID 精确查找，或按名称片段在 dhd URL 中做不区分大小写的子串匹配

use crate::catalog::{Catalog, CatalogEntry, Tier};
use crate::error::AppError;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 查找模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResolveMode {
    /// 把查询当作目录 key
    #[default]
    Id,
    /// 把查询当作名称片段，匹配 dhd URL
    Name,
}

impl ResolveMode {
    pub fn parse(s: &str) -> Option<ResolveMode> {
        match s.trim() {
            "id" => Some(ResolveMode::Id),
            "name" => Some(ResolveMode::Name),
            _ => None,
        }
    }
}

impl fmt::Display for ResolveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveMode::Id => f.write_str("id"),
            ResolveMode::Name => f.write_str("name"),
        }
    }
}

/// 查找结果：ID 与对应条目，借用自目录
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub id: &'a str,
    pub entry: &'a CatalogEntry,
}

pub fn resolve<'a>(
    catalog: &'a Catalog,
    query: &str,
    mode: ResolveMode,
) -> Result<Resolved<'a>, AppError> {
    let found = match mode {
        ResolveMode::Id => catalog.data.get_key_value(query),
        ResolveMode::Name => {
            let needle = query.to_lowercase();
            // BTreeMap 按 ID 升序遍历，多个命中时取 ID 最小的那个
            catalog.data.iter().find(|(_, entry)| {
                entry
                    .url(Tier::Dhd)
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(&needle)
            })
        }
    };

    let (id, entry) = found.ok_or_else(|| AppError::NotFound {
        query: query.to_string(),
        mode,
    })?;

    tracing::debug!(%id, %mode, "resolved catalog entry");
    Ok(Resolved {
        id: id.as_str(),
        entry,
    })
}
