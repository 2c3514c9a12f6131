use std::path::Path;

use application::error::{AppError, AppResult};
use application::infrastructure_config::Config;
use figment::providers::{Env, Format, Json, Serialized, Toml};
use figment::Figment;

pub fn load_config() -> AppResult<Config> {
    let default_config = Config::default();
    let mut figment = Figment::from(Serialized::defaults(default_config));

    if Path::new("config.toml").exists() {
        figment = figment.merge(Toml::file("config.toml"));
    }

    if Path::new("config.json").exists() {
        figment = figment.merge(Json::file("config.json"));
    }

    let config: Config = figment
        .merge(Env::prefixed("PAINTBOARD_").split("__"))
        .extract()
        .map_err(|e| AppError::ConfigError {
            message: format!("failed to load configuration: {e}"),
        })?;

    config.validate()?;
    Ok(config)
}
