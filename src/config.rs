use crate::errors::ToggleError;
use std::{env, path::PathBuf, time::Duration};

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub like_path: String,
    pub subscribe_path: String,
    pub like_icon: String,
    pub unlike_icon: String,
    pub subscribe_label: String,
    pub unsubscribe_label: String,
    pub subscribed_marker: String,
    /// Suppress clicks on a control while its previous request is outstanding.
    pub guard_in_flight: bool,
    pub request_timeout: Duration,
    pub csrf_token: Option<String>,
    pub session_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            like_path: "/blog/like/".to_string(),
            subscribe_path: "/accounts/subscribe/".to_string(),
            like_icon: "/static/assets/like.svg".to_string(),
            unlike_icon: "/static/assets/unlike.svg".to_string(),
            subscribe_label: "Подписаться".to_string(),
            unsubscribe_label: "Отписаться".to_string(),
            subscribed_marker: "Вы подписаны".to_string(),
            guard_in_flight: true,
            request_timeout: Duration::from_secs(30),
            csrf_token: None,
            session_id: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ToggleError> {
        let mut config = Self::default();

        if let Ok(url) = env::var("BLOG_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        config.csrf_token = non_empty_var("BLOG_CSRF_TOKEN");
        config.session_id = non_empty_var("BLOG_SESSION_ID");

        if let Some(value) = non_empty_var("TOGGLE_GUARD_IN_FLIGHT") {
            config.guard_in_flight = parse_flag(&value).ok_or_else(|| {
                ToggleError::Config(format!(
                    "TOGGLE_GUARD_IN_FLIGHT must be true or false, got {value:?}"
                ))
            })?;
        }

        if let Some(value) = non_empty_var("TOGGLE_TIMEOUT_SECS") {
            let secs = value.parse::<u64>().map_err(|_| {
                ToggleError::Config(format!("TOGGLE_TIMEOUT_SECS must be a number, got {value:?}"))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub fn resolve_page_path() -> PathBuf {
    match env::var("APP_PAGE_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) => PathBuf::from("data/page.json"),
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn url_joins_base_and_path() {
        let config = Config {
            base_url: "http://blog.test".to_string(),
            ..Config::default()
        };
        assert_eq!(config.url(&config.like_path), "http://blog.test/blog/like/");
    }
}
