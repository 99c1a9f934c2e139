// main.rs — 程序入口
// 负责初始化语言与日志、解析命令行参数、分发子命令，并把错误映射为退出码

mod catalog;
mod cli; // 声明 cli 模块，对应 src/cli.rs
mod config; // 声明 config 模块，对应 src/config.rs
mod downloader;
mod error;
mod logging;
mod resolver;
mod source;

// 初始化多语言支持，嵌入 locales 目录下的所有翻译
rust_i18n::i18n!("locales", fallback = "en");

use clap::{CommandFactory, Parser}; // CommandFactory 用于生成补全脚本和帮助
use clap_complete::generate; // 引入补全脚本生成函数
use cli::{Cli, Commands, ConfigAction};
use config::AppConfig;
use error::AppError;
use resolver::ResolveMode;
use rust_i18n::t; // 引入翻译宏
use source::WallpaperSource;
use source::panels::PanelsClient;
use std::process::ExitCode;

/// 没有查询参数也没有子命令时的退出码，与 clap 的用法错误一致
const USAGE_EXIT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    // 自动检测系统语言并设置
    let locale = std::env::var("LANG").unwrap_or_else(|_| "en".to_string());
    if locale.starts_with("zh") {
        rust_i18n::set_locale("zh-CN");
    } else {
        rust_i18n::set_locale("en");
    }

    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!(error = %e, code = e.exit_code(), "run failed");
            report(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<u8, AppError> {
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(
                *shell,
                &mut Cli::command(),
                "panelsdl",
                &mut std::io::stdout(),
            );
            Ok(0)
        }
        Some(Commands::Config { action }) => {
            let mut config = AppConfig::load()?;
            handle_config(&mut config, action)?;
            Ok(0)
        }
        None => {
            let Some(query) = cli.query.as_deref() else {
                let _ = Cli::command().print_help();
                return Ok(USAGE_EXIT);
            };

            let mut config = AppConfig::load()?;
            config.apply_overrides(
                cli.catalog_url.as_deref(),
                cli.output.as_deref(),
                cli.mode,
                &cli.tiers,
            );
            handle_download(&config, query).await
        }
    }
}

/// 拉取目录 → 查找条目 → 逐个档位下载
///
/// 返回退出码：全部成功为 0，否则为第一个失败档位的错误码。
async fn handle_download(config: &AppConfig, query: &str) -> Result<u8, AppError> {
    let client = PanelsClient::new(&config.catalog_url)?;
    tracing::debug!(url = %client.catalog_url(), mode = %config.mode, %query, "starting download");
    download_from(&client, config, query).await
}

async fn download_from(
    client: &(dyn WallpaperSource + Sync),
    config: &AppConfig,
    query: &str,
) -> Result<u8, AppError> {
    println!("{}", t!("fetching_catalog"));
    let catalog = client.fetch_catalog().await?;

    let found = resolver::resolve(&catalog, query, config.mode)?;
    println!("{}", t!("found", id => found.id));

    let results = downloader::save_all(
        client,
        found.id,
        found.entry,
        &config.effective_tiers(),
        &config.output_dir,
    )
    .await;

    let saved = results.iter().filter(|r| r.is_ok()).count();
    if !results.is_empty() {
        println!(
            "{}",
            t!("download_done", saved => saved, total => results.len())
        );
    }

    match results.iter().find(|r| !r.is_ok()) {
        Some(failed) => {
            tracing::debug!(tier = %failed.target.tier, "first failed tier decides the exit code");
            Ok(failed
                .outcome
                .as_ref()
                .err()
                .map_or(0, AppError::exit_code))
        }
        None => Ok(0),
    }
}

/// 处理 config 子命令：查看或修改配置
fn handle_config(config: &mut AppConfig, action: &ConfigAction) -> Result<(), AppError> {
    match action {
        ConfigAction::Show => {
            println!("{}", t!("config_title"));
            let path = config
                .config_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("{}", t!("config_path", path => path));
            println!("{}", t!("config_url", url => config.catalog_url));
            println!(
                "{}",
                t!("config_output_dir", path => config.output_dir.display())
            );
            println!("{}", t!("config_mode", mode => config.mode));
            let tiers: Vec<&str> = config.effective_tiers().iter().map(|t| t.as_str()).collect();
            println!("{}", t!("config_tiers", tiers => tiers.join(", ")));
        }
        ConfigAction::Schema => {
            println!("{}", AppConfig::get_schema());
        }
        ConfigAction::Dump => {
            println!("{}", config.to_toml());
        }
        ConfigAction::Set { key, value } => {
            config.set(key, value)?;
            config.save()?;
            println!("{}", t!("config_updated", key => key, value => value));
        }
    }
    Ok(())
}

/// 把错误打印到标准输出
fn report(e: &AppError) {
    match e {
        AppError::NotFound {
            query,
            mode: ResolveMode::Name,
        } => println!("{}", t!("not_found_name", name => query)),
        AppError::NotFound {
            query,
            mode: ResolveMode::Id,
        } => println!("{}", t!("not_found_id", id => query)),
        other => println!("{}", t!("error", error => other)),
    }
}
