use std::time::Duration;

use reqwest::Url;
use serde::{
    de::{DeserializeOwned, Error},
    Deserialize, Deserializer,
};
use tracing::error;

pub fn deserialize_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Url::parse(&s).map_err(Error::custom)
}

pub fn deserialize_duration_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let millis: u64 = Deserialize::deserialize(deserializer)?;
    match millis {
        0 => Err(Error::custom("duration must be greater than zero")),
        millis => Ok(Duration::from_millis(millis)),
    }
}

/// Counts and limits where zero would silently disable a feature.
pub fn deserialize_non_zero<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let n: usize = Deserialize::deserialize(deserializer)?;
    match n {
        0 => Err(Error::custom("value must be greater than zero")),
        n => Ok(n),
    }
}

pub fn get_app_config<T: DeserializeOwned>() -> T {
    match envy::from_env::<T>() {
        Ok(config) => config,
        Err(err) => {
            error!("failed to parse config: {}", err);
            std::process::exit(1);
        }
    }
}
