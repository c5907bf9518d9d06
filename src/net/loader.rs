use super::http::HttpClient;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fetches stylesheet text and image bytes for imports, linked sheets,
/// and background images. Callers in the style path swallow every error;
/// an unreachable source just contributes no rules.
pub struct Loader {
    http_client: HttpClient,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            http_client: HttpClient::new(),
        }
    }

    pub fn fetch(&self, url: &Url) -> Result<String, LoadError> {
        match url.scheme() {
            "http" | "https" => self.http_client.get(url),
            "file" => self.fetch_file(url),
            "data" => self.fetch_data(url),
            scheme => Err(LoadError::UnsupportedScheme(scheme.to_string())),
        }
    }

    pub fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, LoadError> {
        match url.scheme() {
            "http" | "https" => self.http_client.get_bytes(url),
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| LoadError::InvalidUrl("Cannot convert to file path".to_string()))?;
                Ok(std::fs::read(path)?)
            }
            "data" => decode_data_url(url.as_str()),
            scheme => Err(LoadError::UnsupportedScheme(scheme.to_string())),
        }
    }

    fn fetch_file(&self, url: &Url) -> Result<String, LoadError> {
        let path = url
            .to_file_path()
            .map_err(|_| LoadError::InvalidUrl("Cannot convert to file path".to_string()))?;
        Ok(std::fs::read_to_string(path)?)
    }

    fn fetch_data(&self, url: &Url) -> Result<String, LoadError> {
        let bytes = decode_data_url(url.as_str())?;
        String::from_utf8(bytes).map_err(|e| LoadError::InvalidUrl(format!("Invalid UTF-8: {}", e)))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes a `data:[<mediatype>][;base64],<data>` URL into raw bytes.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, LoadError> {
    let data = data_url
        .strip_prefix("data:")
        .ok_or_else(|| LoadError::InvalidUrl("Invalid data URL".to_string()))?;
    let (header, content) = data
        .split_once(',')
        .ok_or_else(|| LoadError::InvalidUrl("Invalid data URL format".to_string()))?;

    if header.ends_with(";base64") {
        STANDARD
            .decode(content)
            .map_err(|e| LoadError::InvalidUrl(format!("Invalid base64: {}", e)))
    } else {
        Ok(urlencoding::decode_binary(content.as_bytes()).into_owned())
    }
}
