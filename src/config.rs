use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8085;

/// Web server settings, read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub addr: SocketAddr,
    pub static_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let port = match var("PORT") {
            Some(port) => port.parse().map_err(|_| ConfigError::Port(port))?,
            None => DEFAULT_PORT,
        };
        let ip = match var("BIND_ADDR") {
            Some(ip) => ip.parse().map_err(|_| ConfigError::BindAddr(ip))?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };
        Ok(Config {
            addr: SocketAddr::new(ip, port),
            static_dir: var("STATIC_DIR")
                .unwrap_or_else(|| "seed-frontend".to_owned())
                .into(),
            data_dir: var("DATA_DIR").unwrap_or_else(|| "data".to_owned()).into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Port(String),
    BindAddr(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Port(port) => write!(f, "PORT should be a port number, got {:?}", port),
            ConfigError::BindAddr(ip) => {
                write!(f, "BIND_ADDR should be an IP address, got {:?}", ip)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
