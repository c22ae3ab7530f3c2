/*
[INPUT]:  Optional YAML file, WALLET_AUTH_DEMO__* environment, legacy REACT_APP_* keys
[OUTPUT]: Parsed application configuration and derived provider options
[POS]:    Configuration layer - startup settings
[UPDATE]: When adding new configuration options
*/

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use wallet_auth_adapter::{
    ChainConfig, ClientConfig, DEFAULT_SESSION_SECONDS, LocalWalletSettings, ModalConfig, UiConfig,
    UserProfile, Web3AuthNetwork, Web3AuthOptions,
};

/// Prefix for environment overrides, e.g. `WALLET_AUTH_DEMO__CHAIN__PRESET=amoy`
pub const ENV_PREFIX: &str = "WALLET_AUTH_DEMO";
/// Keys the React build of the demo read its secrets from
pub const LEGACY_CLIENT_ID_KEY: &str = "REACT_APP_WEB3AUTH_CLIENT_ID";
pub const LEGACY_INFURA_KEY: &str = "REACT_APP_INFURA_API_KEY";

const REDACTED: &str = "<redacted>";

/// Top-level configuration for the demo
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Auth provider client identifier; empty when unset
    pub client_id: String,
    /// API key for Infura-hosted chains; empty when unset
    pub infura_api_key: String,
    pub network: Web3AuthNetwork,
    pub chain: ChainSettings,
    pub ui: UiConfig,
    pub modal: ModalConfig,
    pub local_wallet: LocalWalletConfig,
    pub rpc: RpcSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            infura_api_key: String::new(),
            network: Web3AuthNetwork::SapphireDevnet,
            chain: ChainSettings::default(),
            ui: UiConfig::default(),
            modal: ModalConfig::openlogin_without_reddit(),
            local_wallet: LocalWalletConfig::default(),
            rpc: RpcSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainPreset {
    #[default]
    Polygon,
    Amoy,
}

/// Chain selection; explicit fields override the preset
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainSettings {
    pub preset: ChainPreset,
    pub chain_id: Option<String>,
    pub rpc_target: Option<String>,
    pub display_name: Option<String>,
    pub ticker: Option<String>,
}

/// Development wallet used by the local auth provider
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocalWalletConfig {
    pub private_key: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
    pub auto_connect: bool,
    pub session_seconds: u64,
}

impl Default for LocalWalletConfig {
    fn default() -> Self {
        Self {
            private_key: String::new(),
            name: None,
            email: None,
            picture: None,
            auto_connect: false,
            session_seconds: DEFAULT_SESSION_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcSettings {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl AppConfig {
    /// Load from `path` (or the default location) and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env: HashMap<String, String> = std::env::vars().collect();
        match path {
            Some(path) => Self::load_with_env(Some(path), env),
            None => {
                let default_path = Self::default_path().filter(|p| p.exists());
                Self::load_with_env(default_path.as_deref(), env)
            }
        }
    }

    /// Layering, lowest first: defaults, legacy keys, file, prefixed env
    pub fn load_with_env(
        path: Option<&Path>,
        env: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(client_id) = env.get(LEGACY_CLIENT_ID_KEY) {
            builder = builder.set_default("client_id", client_id.clone())?;
        }
        if let Some(api_key) = env.get(LEGACY_INFURA_KEY) {
            builder = builder.set_default("infura_api_key", api_key.clone())?;
        }

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(Some(env)),
        );

        builder.build()?.try_deserialize()
    }

    /// `$CONFIG_DIR/wallet-auth-demo/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wallet-auth-demo").join("config.yaml"))
    }

    pub fn chain_config(&self) -> ChainConfig {
        let mut chain = match self.chain.preset {
            ChainPreset::Polygon => ChainConfig::polygon_mainnet(),
            ChainPreset::Amoy => ChainConfig::polygon_amoy(&self.infura_api_key),
        };
        if let Some(chain_id) = &self.chain.chain_id {
            chain.chain_id = chain_id.clone();
        }
        if let Some(rpc_target) = &self.chain.rpc_target {
            chain.rpc_target = rpc_target.clone();
        }
        if let Some(display_name) = &self.chain.display_name {
            chain.display_name = display_name.clone();
        }
        if let Some(ticker) = &self.chain.ticker {
            chain.ticker = ticker.clone();
        }
        chain
    }

    pub fn auth_options(&self) -> Web3AuthOptions {
        Web3AuthOptions {
            client_id: self.client_id.clone(),
            chain_config: self.chain_config(),
            ui_config: self.ui.clone(),
            web3auth_network: self.network,
        }
    }

    pub fn rpc_client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.rpc.timeout_secs),
            connect_timeout: Duration::from_secs(self.rpc.connect_timeout_secs),
        }
    }

    pub fn local_wallet_settings(&self) -> LocalWalletSettings {
        let wallet = &self.local_wallet;
        LocalWalletSettings {
            private_key: wallet.private_key.clone(),
            profile: UserProfile {
                name: wallet.name.clone(),
                email: wallet.email.clone(),
                picture: wallet.picture.clone(),
                ..UserProfile::default()
            },
            auto_connect: wallet.auto_connect,
            session_seconds: wallet.session_seconds,
        }
    }

    /// Copy with secrets masked, for printing
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.local_wallet.private_key.is_empty() {
            copy.local_wallet.private_key = REDACTED.to_string();
        }
        if !copy.infura_api_key.is_empty() {
            copy.infura_api_key = REDACTED.to_string();
        }
        copy
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
