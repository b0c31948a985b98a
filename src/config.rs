//! Environment configuration

use crate::navigation::DEFAULT_PAGE_SIZE;
use crate::tree::{NodeStore, TreeResult, DEFAULT_ROOT};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Server settings, read once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// Tree file on disk; the bundled tree is used when unset
    pub tree_path: Option<PathBuf>,
    pub root_node: String,
    pub page_size: usize,
    pub card_image_base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            tree_path: None,
            root_node: DEFAULT_ROOT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            card_image_base_url: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let port = match var("VOXBOT_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "VOXBOT_PORT",
                value,
                expected: "a TCP port",
            })?,
            None => defaults.port,
        };

        let page_size = match var("VOXBOT_PAGE_SIZE") {
            Some(value) => match value.parse::<usize>() {
                Ok(size) if size >= 1 => size,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "VOXBOT_PAGE_SIZE",
                        value,
                        expected: "a positive integer",
                    })
                }
            },
            None => defaults.page_size,
        };

        Ok(Self {
            port,
            tree_path: var("VOXBOT_TREE_PATH").map(PathBuf::from),
            root_node: var("VOXBOT_ROOT_NODE").unwrap_or(defaults.root_node),
            page_size,
            card_image_base_url: var("VOXBOT_CARD_IMAGE_BASE_URL"),
        })
    }

    /// Load the configured tree, falling back to the bundled one
    pub fn load_tree(&self) -> TreeResult<NodeStore> {
        match &self.tree_path {
            Some(path) => NodeStore::load(path, self.root_node.as_str()),
            None => NodeStore::bundled(self.root_node.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.port, 8000);
        assert_eq!(config.root_node, "0");
        assert_eq!(config.page_size, 5);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("VOXBOT_PORT", "9090"),
            ("VOXBOT_TREE_PATH", "/srv/tree.json"),
            ("VOXBOT_ROOT_NODE", "start"),
            ("VOXBOT_PAGE_SIZE", " 3 "),
            ("VOXBOT_CARD_IMAGE_BASE_URL", "https://img.example"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.tree_path, Some(PathBuf::from("/srv/tree.json")));
        assert_eq!(config.root_node, "start");
        assert_eq!(config.page_size, 3);
        assert_eq!(
            config.card_image_base_url.as_deref(),
            Some("https://img.example")
        );
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = Config::from_lookup(lookup(&[("VOXBOT_TREE_PATH", "  ")])).unwrap();
        assert_eq!(config.tree_path, None);
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup(&[("VOXBOT_PAGE_SIZE", "0")])).unwrap_err();
        assert!(err.to_string().contains("VOXBOT_PAGE_SIZE"));

        let err = Config::from_lookup(lookup(&[("VOXBOT_PORT", "eighty")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "VOXBOT_PORT",
                value: "eighty".to_string(),
                expected: "a TCP port",
            }
        );
    }

    #[test]
    fn test_load_tree() {
        let bundled = Config::default().load_tree().unwrap();
        assert_eq!(bundled.root().as_str(), "0");

        let config = Config {
            tree_path: Some(PathBuf::from("/nonexistent/tree.json")),
            ..Config::default()
        };
        assert!(config.load_tree().is_err());
    }
}
