// error.rs — 错误类型定义
// 所有失败路径都归到 AppError，每种错误对应一个独立的进程退出码

use crate::resolver::ResolveMode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// 配置文件无法读取/解析，或注入的 URL 不合法
    #[error("config error: {0}")]
    Config(String),

    /// 网络请求失败，或状态码不是 200
    #[error("{0}")]
    Fetch(String),

    /// 目录 JSON 结构不符合预期
    #[error("invalid catalog JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no wallpaper matches `{query}` (mode: {mode})")]
    NotFound { query: String, mode: ResolveMode },

    #[error("cannot create directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create file {}: {source}", path.display())]
    FileCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AppError {
    /// 进程退出码；0 保留给成功，2 与 clap 的用法错误一致
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 2,
            AppError::Fetch(_) => 3,
            AppError::Decode(_) => 4,
            AppError::NotFound { .. } => 5,
            AppError::Directory { .. } => 6,
            AppError::FileCreate { .. } => 7,
            AppError::Write { .. } => 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_err() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "denied")
    }

    #[test]
    fn test_exit_codes_are_distinct_and_nonzero() {
        let decode = serde_json::from_str::<u32>("nope").unwrap_err();
        let errors = vec![
            AppError::Config("bad".into()),
            AppError::Fetch("down".into()),
            AppError::Decode(decode),
            AppError::NotFound {
                query: "x".into(),
                mode: ResolveMode::Id,
            },
            AppError::Directory {
                path: "a".into(),
                source: io_err(),
            },
            AppError::FileCreate {
                path: "a".into(),
                source: io_err(),
            },
            AppError::Write {
                path: "a".into(),
                source: io_err(),
            },
        ];

        let mut codes: Vec<u8> = errors.iter().map(AppError::exit_code).collect();
        assert!(codes.iter().all(|c| *c != 0));
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_messages_name_the_path() {
        let err = AppError::FileCreate {
            path: PathBuf::from("wallpapers/abc_dhd.jpg"),
            source: io_err(),
        };
        let msg = err.to_string();
        assert!(msg.contains("wallpapers/abc_dhd.jpg"));
        assert!(msg.contains("denied"));

        let err = AppError::NotFound {
            query: "Moon".into(),
            mode: ResolveMode::Name,
        };
        assert_eq!(err.to_string(), "no wallpaper matches `Moon` (mode: name)");
    }
}
