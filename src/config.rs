use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    #[validate(nested)]
    pub vessel: VesselConfig,
    #[validate(nested)]
    pub network: NetworkConfig,
    #[validate(nested)]
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

/// Charter rates and transit speeds used to price vessel usage on a route
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct VesselConfig {
    /// Day rate of the installation vessel (base port -> installation site)
    #[validate(range(min = 0.0))]
    pub install_day_rate: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub install_speed_knots: f64,
    /// Day rate for all other routes (two standard vessels)
    #[validate(range(min = 0.0))]
    pub transport_day_rate: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub transport_speed_knots: f64,
    /// Kilometres per nautical mile
    #[validate(range(exclusive_min = 0.0))]
    pub km_per_nautical_mile: f64,
}

impl Default for VesselConfig {
    fn default() -> Self {
        Self {
            install_day_rate: 10_100_000.0,
            install_speed_knots: 10.0,
            transport_day_rate: 2.0 * 1_487_000.0,
            transport_speed_knots: 5.0,
            km_per_nautical_mile: 1.852,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NetworkConfig {
    /// Per-product capacity of shipping routes for non-vessel products
    #[validate(range(min = 0.0))]
    pub route_capacity: f64,
    /// Per-product capacity of site -> aggregate collection routes
    #[validate(range(min = 0.0))]
    pub collection_capacity: f64,
    /// Installation sites whose collection routes draw no vessel capacity
    pub vessel_exempt_sites: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            route_capacity: 1000.0,
            collection_capacity: 10000.0,
            vessel_exempt_sites: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ReportConfig {
    /// Flows below this are treated as integer-rounding noise
    #[validate(range(min = 0.0))]
    pub materiality_threshold: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            materiality_threshold: 0.1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
}

impl Config {
    /// Built-in defaults, then `config/default.toml` when present, then `WINDLOG__*` env vars
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config/default.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("WINDLOG__").split("__"));
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}
