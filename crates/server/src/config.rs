use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub assets_dir: PathBuf,
    pub dist_dir: PathBuf,
    /// Base URL `/search` and `/download_proxy` are relayed to.
    pub search_backend_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = match get("BIND_ADDR") {
            Some(v) => v
                .parse()
                .with_context(|| format!("BIND_ADDR is not an IP address: {v}"))?,
            None => IpAddr::from([0, 0, 0, 0]),
        };
        let port = match get("PORT") {
            Some(v) => v
                .parse()
                .with_context(|| format!("PORT is not a valid port: {v}"))?,
            None => 3000,
        };
        let assets_dir = PathBuf::from(get("ASSETS_DIR").unwrap_or_else(|| "assets".to_string()));
        let dist_dir = PathBuf::from(get("DIST_DIR").unwrap_or_else(|| "dist".to_string()));

        let search_backend_url = get("SEARCH_BACKEND_URL").filter(|v| !v.trim().is_empty());
        if let Some(url) = &search_backend_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("SEARCH_BACKEND_URL must start with http:// or https://");
            }
        }

        Ok(Self {
            bind_addr,
            port,
            assets_dir,
            dist_dir,
            search_backend_url,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}
