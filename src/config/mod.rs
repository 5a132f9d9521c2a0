use chrono::NaiveDate;

use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::backend::ImageFilter;

pub mod error;
pub use error::ConfigError;

const MAX_RETRY_BOUND: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    site: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    collection: String,
    max_sample_retries: u32,
}

// This function deserializes a Config object from a deserializer, ensuring
// the dates are valid and in order, the site code has the NEON shape, and the
// retry count is within an acceptable range.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ConfigHelper {
            site: String,
            start_date: String,
            end_date: String,
            collection: String,
            max_sample_retries: Option<u32>,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let start_date = NaiveDate::parse_from_str(&helper.start_date, "%Y-%m-%d")
            .map_err(|e| D::Error::custom(format!("Invalid start_date format: {}", e)))?;

        let end_date = NaiveDate::parse_from_str(&helper.end_date, "%Y-%m-%d")
            .map_err(|e| D::Error::custom(format!("Invalid end_date format: {}", e)))?;

        if start_date > end_date {
            return Err(D::Error::custom(ConfigError::DateOrder));
        }

        // NEON site codes are four uppercase ASCII letters (SOAP, SJER, ...)
        if helper.site.len() != 4 || !helper.site.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(D::Error::custom(ConfigError::SiteCode(helper.site)));
        }

        let max_sample_retries = helper.max_sample_retries.unwrap_or(0);
        if max_sample_retries > MAX_RETRY_BOUND {
            return Err(D::Error::custom(ConfigError::RetryBound(max_sample_retries)));
        }

        Ok(Config {
            site: helper.site,
            start_date,
            end_date,
            collection: helper.collection,
            max_sample_retries,
        })
    }
}

impl Config {
    pub fn new(
        site: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            site: site.into(),
            start_date,
            end_date,
            collection: collection.into(),
            max_sample_retries: 0,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn max_sample_retries(&self) -> u32 {
        self.max_sample_retries
    }

    pub fn filter(&self) -> ImageFilter {
        ImageFilter {
            site: self.site.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}
