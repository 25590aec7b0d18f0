use serde::Deserialize;
use std::collections::{hash_map::Entry, HashMap};
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::plaid_api::AccessToken;

const CONFIG_FILE_NAME: &str = "config.yaml";
const HOME_CONFIG_DIR: &str = ".hledger-exporter";

const ENV_CLIENT_ID: &str = "PLAID_CLIENT_ID";
const ENV_SECRET: &str = "PLAID_SECRET";
const ENV_PUBLIC_KEY: &str = "PLAID_PUBLIC_KEY";
const ENV_ACCESS_TOKEN: &str = "PLAID_ACCESS_TOKEN";

/// Layout of the config file. Every plaid value can also come from the environment.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub accounts: HashMap<String, String>,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
    pub plaid_client_id: Option<String>,
    pub plaid_secret: Option<String>,
    pub plaid_public_key: Option<String>,
    pub plaid_access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RuleConfig {
    #[serde(rename = "if")]
    pub pattern: String,
    pub then: RuleTarget,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RuleTarget {
    pub account2: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub accounts: AccountMap,
    pub rules: Vec<RuleConfig>,
    pub plaid: PlaidCredentials,
}

#[derive(Clone)]
pub struct PlaidCredentials {
    pub client_id: String,
    pub secret: String,
    pub public_key: Option<String>,
    pub access_token: AccessToken,
}

impl Debug for PlaidCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaidCredentials")
            .field("client_id", &self.client_id)
            .field("secret", &"***")
            .field("public_key", &self.public_key.as_ref().map(|_| "***"))
            .field("access_token", &self.access_token)
            .finish()
    }
}

/// Maps plaid account ids to ledger account names. Plaid account ids are compared case insensitively.
#[derive(Debug, Clone, Default)]
pub struct AccountMap {
    accounts: HashMap<String, String>,
}

impl AccountMap {
    pub fn new(accounts: HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut normalized = HashMap::with_capacity(accounts.len());
        for (account_id, ledger_account) in accounts {
            match normalized.entry(account_id.to_lowercase()) {
                Entry::Occupied(_) => {
                    return Err(ConfigError::DuplicateAccount { account_id });
                }
                Entry::Vacant(entry) => {
                    entry.insert(ledger_account);
                }
            }
        }
        Ok(Self {
            accounts: normalized,
        })
    }

    pub fn lookup(&self, account_id: &str) -> Option<&str> {
        self.accounts
            .get(&account_id.to_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Config {
    /// Load the config from `path`, or from the default locations if no path is given,
    /// and apply overrides from the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => find_config_file(&default_search_paths())?,
        };
        log::info!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_yaml(&content, |key| std::env::var(key).ok())
    }

    pub fn from_yaml(
        content: &str,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        Self::from_file(file, env)
    }

    fn from_file(
        file: ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        // Empty environment variables count as unset
        let lookup = |key: &'static str, file_value: Option<String>| {
            env(key).filter(|value| !value.is_empty()).or(file_value)
        };
        let required = |key: &'static str, file_value: Option<String>| {
            lookup(key, file_value)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing { key })
        };

        let plaid = PlaidCredentials {
            client_id: required(ENV_CLIENT_ID, file.plaid_client_id)?,
            secret: required(ENV_SECRET, file.plaid_secret)?,
            public_key: lookup(ENV_PUBLIC_KEY, file.plaid_public_key),
            access_token: AccessToken::new(required(ENV_ACCESS_TOKEN, file.plaid_access_token)?),
        };
        if plaid.public_key.is_some() {
            log::warn!("{ENV_PUBLIC_KEY} is set but Plaid no longer uses public keys, ignoring it");
        }

        Ok(Self {
            accounts: AccountMap::new(file.accounts)?,
            rules: file.rules,
            plaid,
        })
    }
}

fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = std::env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(HOME_CONFIG_DIR).join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from(".").join(CONFIG_FILE_NAME));
    paths
}

fn find_config_file(candidates: &[PathBuf]) -> Result<PathBuf, ConfigError> {
    candidates
        .iter()
        .find(|path| path.is_file())
        .cloned()
        .ok_or_else(|| ConfigError::NotFound {
            searched: candidates.to_vec(),
        })
}
