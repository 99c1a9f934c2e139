// downloader.rs — 把一个目录条目的各档位图片保存到本地
// 每个档位是独立的一次"建目录 → 建文件 → GET → 写入"，一个档位失败不影响其它档位

use crate::catalog::{CatalogEntry, Tier};
use crate::error::AppError;
use crate::source::WallpaperSource;
use rust_i18n::t;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};

/// 一次待执行的下载
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub id: String,
    pub tier: Tier,
    pub url: String,
    /// `<dir>/<id>_<tier>.jpg`
    pub path: PathBuf,
}

/// 单个档位的下载结果；成功时为写入的字节数
#[derive(Debug)]
pub struct SaveResult {
    pub target: DownloadTarget,
    pub outcome: Result<u64, AppError>,
}

impl SaveResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

pub fn file_name(id: &str, tier: Tier) -> String {
    format!("{}_{}.jpg", id, tier)
}

/// 列出需要下载的档位
///
/// 只保留 `tiers` 中选中、且条目里 URL 非空的档位，顺序固定为 dhd, dsd, s, wfs。
/// `tiers` 为空表示全部档位。
pub fn plan(id: &str, entry: &CatalogEntry, tiers: &[Tier], dir: &Path) -> Vec<DownloadTarget> {
    entry
        .tiers()
        .filter(|(tier, _)| tiers.is_empty() || tiers.contains(tier))
        .map(|(tier, url)| DownloadTarget {
            id: id.to_string(),
            tier,
            url: url.to_string(),
            path: dir.join(file_name(id, tier)),
        })
        .collect()
}

/// 依次保存所有档位，每个档位的结果都会打印并返回
pub async fn save_all(
    source: &(dyn WallpaperSource + Sync),
    id: &str,
    entry: &CatalogEntry,
    tiers: &[Tier],
    dir: &Path,
) -> Vec<SaveResult> {
    let targets = plan(id, entry, tiers, dir);
    if targets.is_empty() {
        tracing::warn!(%id, "entry has no downloadable tiers");
        println!("{}", t!("no_tiers", id => id));
        return Vec::new();
    }

    let mut results = Vec::with_capacity(targets.len());
    for target in targets {
        let outcome = save_one(source, &target, dir).await;
        match &outcome {
            Ok(bytes) => {
                tracing::info!(id = %target.id, tier = %target.tier, bytes, "saved");
                println!(
                    "{}",
                    t!(
                        "saved",
                        id => target.id,
                        tier => target.tier,
                        path => target.path.display()
                    )
                );
            }
            Err(e) => {
                tracing::warn!(id = %target.id, tier = %target.tier, error = %e, "tier failed");
                println!(
                    "{}",
                    t!("save_failed", id => target.id, tier => target.tier, error => e)
                );
            }
        }
        results.push(SaveResult { target, outcome });
    }
    results
}

/// ID 来自远端目录，只能作为保存目录下的单个文件名使用
fn is_plain_file_stem(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\'])
}

// 文件句柄在函数返回时关闭，无论成功与否；失败时不清理已写入的部分
async fn save_one(
    client: &(dyn WallpaperSource + Sync),
    target: &DownloadTarget,
    dir: &Path,
) -> Result<u64, AppError> {
    if !is_plain_file_stem(&target.id) {
        return Err(AppError::FileCreate {
            path: target.path.clone(),
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("wallpaper id `{}` is not a plain file name", target.id),
            ),
        });
    }

    fs::create_dir_all(dir)
        .await
        .map_err(|source| AppError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;

    let mut file = File::create(&target.path)
        .await
        .map_err(|source| AppError::FileCreate {
            path: target.path.clone(),
            source,
        })?;

    client.download_to(&target.url, &mut file, &target.path).await
}
