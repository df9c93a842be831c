//! 构建期配置
//!
//! 所有取值在编译时通过环境变量注入（`option_env!`），未设置时使用默认值：
//!
//! | 变量 | 默认值 |
//! |---|---|
//! | `PODTRACK_API_URL` | `http://localhost:5000/api` |
//! | `PODTRACK_GOOGLE_MAPS_KEY` | 空 |
//! | `PODTRACK_MAP_PROVIDER` | 有 key 时为 `google`，否则 `leaflet` |
//! | `PODTRACK_REFRESH_SECS` | `30` |

use leptos::prelude::*;
use podtrack_shared::DEFAULT_REFRESH_SECS;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapProvider {
    Leaflet,
    Google,
}

impl MapProvider {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "leaflet" | "osm" => Some(MapProvider::Leaflet),
            "google" => Some(MapProvider::Google),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    pub google_maps_key: Option<String>,
    pub map_provider: MapProvider,
    pub refresh_secs: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::resolve(
            option_env!("PODTRACK_API_URL"),
            option_env!("PODTRACK_GOOGLE_MAPS_KEY"),
            option_env!("PODTRACK_MAP_PROVIDER"),
            option_env!("PODTRACK_REFRESH_SECS"),
        )
    }

    fn resolve(
        api_url: Option<&str>,
        maps_key: Option<&str>,
        provider: Option<&str>,
        refresh: Option<&str>,
    ) -> Self {
        let api_url = api_url
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .to_string();

        let google_maps_key = maps_key
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let map_provider = match provider.and_then(MapProvider::parse) {
            // 没有 key 时无法加载 Google 地图
            Some(MapProvider::Google) if google_maps_key.is_none() => MapProvider::Leaflet,
            Some(p) => p,
            None if google_maps_key.is_some() => MapProvider::Google,
            None => MapProvider::Leaflet,
        };

        let refresh_secs = refresh
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_REFRESH_SECS);

        Self {
            api_url,
            google_maps_key,
            map_provider,
            refresh_secs,
        }
    }
}

pub fn provide_config() -> StoredValue<AppConfig> {
    let config = AppConfig::from_env();
    log::info!(
        "api: {}, maps: {:?}, refresh: {}s",
        config.api_url,
        config.map_provider,
        config.refresh_secs
    );
    let stored = StoredValue::new(config);
    provide_context(stored);
    stored
}

pub fn use_config() -> AppConfig {
    use_context::<StoredValue<AppConfig>>()
        .map(|c| c.get_value())
        .unwrap_or_else(AppConfig::from_env)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::resolve(None, None, None, None);
        assert_eq!(config.api_url, "http://localhost:5000/api");
        assert_eq!(config.google_maps_key, None);
        assert_eq!(config.map_provider, MapProvider::Leaflet);
        assert_eq!(config.refresh_secs, 30);
    }

    #[test]
    fn test_google_selected_when_key_present() {
        let config = AppConfig::resolve(Some("https://pod.example.com/api"), Some("AIza-test"), None, Some("15"));
        assert_eq!(config.map_provider, MapProvider::Google);
        assert_eq!(config.refresh_secs, 15);
    }

    #[test]
    fn test_google_without_key_falls_back() {
        let config = AppConfig::resolve(None, Some("  "), Some("google"), Some("0"));
        assert_eq!(config.map_provider, MapProvider::Leaflet);
        assert_eq!(config.refresh_secs, 30);
    }
}
