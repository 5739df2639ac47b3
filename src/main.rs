mod catalog;
mod config;
mod export;
mod script;
mod selection;
mod tui;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = match config::Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("错误: 配置无效: {:#}", e);
            eprintln!("请检查 {}", config::Config::config_path().display());
            std::process::exit(1);
        }
    };
    log::info!("目录服务: {}", config.api_url);

    tui::run(config).await?;

    Ok(())
}
