// config.rs — 配置管理模块
// 遵循 Unix 风格：优先从 ~/.config/panelsdl/config.toml 读取配置
// 优先级：命令行参数 > 环境变量 > 配置文件 > 内置默认值

use crate::catalog::Tier;
use crate::error::AppError;
use crate::resolver::ResolveMode;
use crate::source::panels::DEFAULT_CATALOG_URL;
use schemars::JsonSchema; // 引入用于生成 JSON Schema 的 trait
use serde::{Deserialize, Serialize}; // 引入序列化与反序列化 trait
use shellexpand::tilde; // 用于展开 ~ 和环境变量
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 覆盖目录地址的环境变量
pub const ENV_CATALOG_URL: &str = "PANELSDL_CATALOG_URL";
/// 覆盖保存目录的环境变量
pub const ENV_OUTPUT_DIR: &str = "PANELSDL_OUTPUT_DIR";

const DEFAULT_OUTPUT_DIR: &str = "wallpapers";

/// 展开路径中的 ~ 和 $HOME
/// 相对路径保持不变，即相对于当前工作目录
fn expand_path(path_str: &str) -> PathBuf {
    PathBuf::from(tilde(path_str).into_owned())
}

/// 映射 config.toml 文件内容的嵌套结构体
#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
struct ConfigFile {
    #[serde(default)]
    catalog: CatalogConfig,
    #[serde(default)]
    download: DownloadConfig,
}

#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
struct CatalogConfig {
    /// 壁纸目录 JSON 的地址
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
struct DownloadConfig {
    /// 图片保存目录 (支持 ~、$HOME，相对路径则相对于当前目录)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output_dir: Option<String>,
    /// 默认查找模式 (id / name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mode: Option<ResolveMode>,
    /// 要下载的档位，留空表示全部 (dhd, dsd, s, wfs)
    #[serde(default)]
    tiers: Vec<Tier>,
}

/// 生效的应用配置
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// 目录地址
    pub catalog_url: String,
    /// 图片保存目录
    pub output_dir: PathBuf,
    /// 查找模式
    pub mode: ResolveMode,
    /// 选中的档位，空表示全部
    pub tiers: Vec<Tier>,
    /// 配置文件所在路径；没有 $HOME 时为 None
    pub config_path: Option<PathBuf>,
}

impl AppConfig {
    /// 读取配置文件和环境变量
    pub fn load() -> Result<Self, AppError> {
        let config_path = env::var("HOME").ok().map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("panelsdl")
                .join("config.toml")
        });

        let file = match &config_path {
            Some(path) => load_config_from_file(path)?,
            None => ConfigFile::default(),
        };

        let mut config = Self::from_file(file, config_path);

        // 环境变量 > 配置文件内容
        if let Ok(url) = env::var(ENV_CATALOG_URL) {
            config.catalog_url = url;
        }
        if let Ok(dir) = env::var(ENV_OUTPUT_DIR) {
            config.output_dir = expand_path(&dir);
        }

        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    fn from_file(file: ConfigFile, config_path: Option<PathBuf>) -> Self {
        Self {
            catalog_url: file
                .catalog
                .url
                .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string()),
            output_dir: expand_path(
                file.download
                    .output_dir
                    .as_deref()
                    .unwrap_or(DEFAULT_OUTPUT_DIR),
            ),
            mode: file.download.mode.unwrap_or_default(),
            tiers: file.download.tiers,
            config_path,
        }
    }

    /// 命令行参数覆盖配置
    pub fn apply_overrides(
        &mut self,
        catalog_url: Option<&str>,
        output: Option<&str>,
        mode: Option<ResolveMode>,
        tiers: &[Tier],
    ) {
        if let Some(url) = catalog_url {
            self.catalog_url = url.to_string();
        }
        if let Some(dir) = output {
            self.output_dir = expand_path(dir);
        }
        if let Some(mode) = mode {
            self.mode = mode;
        }
        if !tiers.is_empty() {
            self.tiers = tiers.to_vec();
        }
    }

    /// 实际要下载的档位
    pub fn effective_tiers(&self) -> Vec<Tier> {
        if self.tiers.is_empty() {
            Tier::ALL.to_vec()
        } else {
            Tier::ALL
                .into_iter()
                .filter(|t| self.tiers.contains(t))
                .collect()
        }
    }

    /// 修改单个配置项 (支持: url, output, mode, tiers)
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        match key {
            "url" | "catalog_url" => self.catalog_url = value.to_string(),
            "output" | "output_dir" => self.output_dir = expand_path(value),
            "mode" => {
                self.mode = ResolveMode::parse(value)
                    .ok_or_else(|| AppError::Config(format!("unknown mode `{}`", value)))?
            }
            "tiers" => {
                self.tiers = value
                    .split(',')
                    .filter(|s| !s.trim().is_empty())
                    .map(|s| {
                        Tier::parse(s).ok_or_else(|| AppError::Config(format!("unknown tier `{}`", s)))
                    })
                    .collect::<Result<_, _>>()?
            }
            _ => return Err(AppError::Config(format!("unknown key `{}`", key))),
        }
        Ok(())
    }

    /// 将配置保存回文件
    pub fn save(&self) -> Result<(), AppError> {
        let path = self
            .config_path
            .as_ref()
            .ok_or_else(|| AppError::Config("$HOME is not set".to_string()))?;

        let write = || -> io::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, self.to_toml())
        };
        write().map_err(|e| AppError::Config(format!("cannot write {}: {}", path.display(), e)))?;

        tracing::info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// 获取配置文件的 JSON Schema
    pub fn get_schema() -> String {
        let schema = schemars::schema_for!(ConfigFile);
        serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
    }

    /// 将当前配置转换为 TOML 字符串
    pub fn to_toml(&self) -> String {
        let config_file = ConfigFile {
            catalog: CatalogConfig {
                url: Some(self.catalog_url.clone()),
            },
            download: DownloadConfig {
                output_dir: Some(self.output_dir.to_string_lossy().to_string()),
                mode: Some(self.mode),
                tiers: self.tiers.clone(),
            },
        };

        toml::to_string_pretty(&config_file)
            .unwrap_or_else(|_| "# Error serializing config".to_string())
    }
}

/// 辅助函数：解析 TOML 配置文件
/// 文件不存在时使用默认值；存在但读不了或格式错误时报错
fn load_config_from_file(path: &Path) -> Result<ConfigFile, AppError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ConfigFile::default()),
        Err(e) => {
            return Err(AppError::Config(format!(
                "cannot read {}: {}",
                path.display(),
                e
            )));
        }
    };

    toml::from_str(&content)
        .map_err(|e| AppError::Config(format!("invalid {}: {}", path.display(), e)))
}
