//! Runtime configuration loaded from the environment.

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const DEFAULT_COMPLETIONS_PATH: &str = "/chat/completions";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub completions_path: String,
    pub model: String,
    pub temperature: f64,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let temperature = match std::env::var("GEMINI_TEMPERATURE") {
            Ok(raw) => raw.parse::<f64>().map_err(|_| {
                crate::Error::Config(format!("GEMINI_TEMPERATURE is not a number: {}", raw))
            })?,
            Err(_) => DEFAULT_TEMPERATURE,
        };

        Ok(Self {
            api_key: std::env::var("GEMINI_API_KEY")
                .map_err(|_| crate::Error::Config("GEMINI_API_KEY not set".to_string()))?,
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            completions_path: std::env::var("GEMINI_COMPLETIONS_PATH")
                .unwrap_or_else(|_| DEFAULT_COMPLETIONS_PATH.to_string()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            temperature,
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}
