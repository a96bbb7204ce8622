use chrono::Offset;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str =
    "https://detect.roboflow.com/infer/workflows/aayuvu/classify-and-conditionally-detect";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub request_timeout: Duration,
    pub recent_images_path: PathBuf,
    pub recent_images_key: String,
    pub recent_images_capacity: usize,
    pub visible_results: usize,
    pub settle_timeout: Duration,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            request_timeout: Duration::from_secs(30),
            recent_images_path: default_recent_images_path(),
            recent_images_key: "recentImages".to_string(),
            recent_images_capacity: 3,
            visible_results: 3,
            settle_timeout: Duration::from_secs(60),
            logger_timezone: chrono::Utc.fix(),
        }
    }
}

fn default_recent_images_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("leaf-identifier")
        .join("recent_images.json")
}
