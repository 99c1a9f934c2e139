// cli.rs — 命令行接口定义模块
// 使用 clap 的 derive 模式定义参数和子命令

use crate::catalog::Tier;
use crate::resolver::ResolveMode;
use clap::{Parser, Subcommand};
use clap_complete::Shell; // Shell 枚举：Bash, Zsh, Fish, Elvish, PowerShell

/// Panels 壁纸下载工具
///
/// 拉取 Panels 壁纸目录，按 ID 或名称片段找到壁纸，
/// 把各清晰度档位的图片保存到本地目录。
#[derive(Parser, Debug)]
#[command(name = "panelsdl")]
#[command(version)] // 自动从 Cargo.toml 读取 version 字段
#[command(author)]
#[command(about = "Downloads wallpapers from the Panels catalog")]
#[command(args_conflicts_with_subcommands = true)]
#[command(
    after_help = "Queries named `config` or `completions` must follow `--`, e.g. `panelsdl -- config`."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 壁纸 ID（--mode id）或名称片段（--mode name）
    ///
    /// 用法示例:
    ///   panelsdl abc123
    ///   panelsdl --mode name moon -t dhd
    pub query: Option<String>,

    /// 查找模式，默认读取配置，否则为 id
    #[arg(short, long, value_enum)]
    pub mode: Option<ResolveMode>,

    /// 只下载指定档位，可重复
    #[arg(short = 't', long = "tier", value_enum, value_name = "TIER")]
    pub tiers: Vec<Tier>,

    /// 保存目录（默认 ./wallpapers）
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<String>,

    /// 覆盖目录 JSON 地址
    #[arg(long, value_name = "URL")]
    pub catalog_url: Option<String>,

    /// 输出更多日志到 stderr（-v, -vv）
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 生成 shell 补全脚本（支持 bash, zsh, fish, elvish, powershell）
    ///
    /// 用法示例：
    ///   panelsdl completions zsh > ~/.zsh/completions/_panelsdl
    Completions {
        /// 目标 shell 类型
        shell: Shell,
    },

    /// 配置管理操作
    ///
    /// 用法示例:
    ///   panelsdl config show
    ///   panelsdl config set mode name
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// 配置管理操作
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// 查看当前生效的配置
    Show,
    /// 生成配置文件对应的 JSON Schema
    Schema,
    /// 以 TOML 格式打印当前完整配置内容
    Dump,
    /// 设置配置项 (支持: url, output, mode, tiers)
    Set {
        /// 要设置的键
        key: String,
        /// 要设置的值；tiers 用逗号分隔
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_query_with_flags() {
        let cli = Cli::parse_from(["panelsdl", "-m", "name", "-t", "dhd", "-t", "wfs", "Moon"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.query.as_deref(), Some("Moon"));
        assert_eq!(cli.mode, Some(ResolveMode::Name));
        assert_eq!(cli.tiers, vec![Tier::Dhd, Tier::Wfs]);
    }

    #[test]
    fn test_config_subcommand() {
        let cli = Cli::parse_from(["panelsdl", "config", "set", "mode", "name"]);
        match cli.command {
            Some(Commands::Config {
                action: ConfigAction::Set { key, value },
            }) => {
                assert_eq!(key, "mode");
                assert_eq!(value, "name");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_tier() {
        assert!(Cli::try_parse_from(["panelsdl", "-t", "4k", "abc"]).is_err());
    }

    #[test]
    fn test_subcommand_name_as_query_after_separator() {
        let cli = Cli::parse_from(["panelsdl", "-m", "name", "--", "config"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.query.as_deref(), Some("config"));
        assert_eq!(cli.mode, Some(ResolveMode::Name));

        let help = Cli::command().render_help().to_string();
        assert!(help.contains("panelsdl -- config"));
    }
}
