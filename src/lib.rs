pub mod cli;
pub mod core;
pub mod providers;
pub mod service;

use crate::core::config::AppConfig;
use crate::core::{AmountMode, CurrencyCode, RateCache};
use crate::service::LiveRateService;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Rate {
        from: CurrencyCode,
        to: CurrencyCode,
        json: bool,
    },
    Quote {
        give: CurrencyCode,
        get: CurrencyCode,
        amount: String,
        mode: AmountMode,
        json: bool,
    },
    Order(cli::order::OrderArgs),
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    config.validate()?;
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xrate starting...");

    let config = load_config(config_path)?;
    let cache = Arc::new(RateCache::new());
    let service = LiveRateService::from_config(&config, cache);

    match command {
        AppCommand::Rate { from, to, json } => cli::rate::run(&service, from, to, json).await,
        AppCommand::Quote {
            give,
            get,
            amount,
            mode,
            json,
        } => cli::quote::run(&service, give, get, &amount, mode, json).await,
        AppCommand::Order(args) => cli::order::run(&service, &args).await,
    }
}
