// source/mod.rs — 壁纸源模块入口
pub mod panels;

// 壁纸源抽象接口：拉取目录、把某个图片 URL 写进已打开的文件

use crate::catalog::Catalog;
use crate::error::AppError;
use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;

/// 壁纸源的抽象 Trait
///
/// 下载器只依赖这个接口，测试里可以换成不走网络的实现。
#[async_trait]
pub trait WallpaperSource {
    /// 拉取并解析整个目录
    async fn fetch_catalog(&self) -> Result<Catalog, AppError>;

    /// GET `url`，把响应体逐块写入 `file`，返回写入的字节数
    ///
    /// `path` 只用于错误信息。
    async fn download_to(&self, url: &str, file: &mut File, path: &Path) -> Result<u64, AppError>;
}
