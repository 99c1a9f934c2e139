// logging.rs — 日志初始化
// tracing 事件写到 stderr，stdout 只留给面向用户的输出

use tracing_subscriber::EnvFilter;

/// 初始化日志：设置了 RUST_LOG 时以它为准，否则按 `-v` 的个数决定级别
pub fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "warn,panelsdl=info",
        _ => "info,panelsdl=debug",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // 全局订阅者只能设置一次，重复初始化时忽略
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
