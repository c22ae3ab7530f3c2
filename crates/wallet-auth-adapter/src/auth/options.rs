/*
[INPUT]:  Client id, chain parameters, UI preferences, modal overrides
[OUTPUT]: Typed construction options for auth providers
[POS]:    Auth layer - provider construction options
[UPDATE]: When provider options or chain presets change
*/

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AdapterError, Result};

/// Modal adapter key for the built-in social/email login adapter
pub const AUTH_ADAPTER: &str = "auth";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainNamespace {
    #[default]
    Eip155,
    Solana,
    Other,
}

/// Chain the provider connects to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_namespace: ChainNamespace,
    /// Hex chain id, e.g. `0x89`
    pub chain_id: String,
    pub rpc_target: String,
    pub display_name: String,
    pub ticker: String,
    pub ticker_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_explorer_url: Option<String>,
}

impl ChainConfig {
    /// Polygon PoS mainnet over the public Ankr endpoint
    pub fn polygon_mainnet() -> Self {
        Self {
            chain_namespace: ChainNamespace::Eip155,
            chain_id: "0x89".to_string(),
            rpc_target: "https://rpc.ankr.com/polygon".to_string(),
            display_name: "Polygon Mainnet".to_string(),
            ticker: "POL".to_string(),
            ticker_name: "Polygon Ecosystem Token".to_string(),
            block_explorer_url: Some("https://polygonscan.com".to_string()),
        }
    }

    /// Polygon Amoy testnet through Infura
    pub fn polygon_amoy(infura_api_key: &str) -> Self {
        Self {
            chain_namespace: ChainNamespace::Eip155,
            chain_id: "0x13882".to_string(),
            rpc_target: format!("https://polygon-amoy.infura.io/v3/{infura_api_key}"),
            display_name: "Polygon Amoy Testnet".to_string(),
            ticker: "POL".to_string(),
            ticker_name: "Polygon Ecosystem Token".to_string(),
            block_explorer_url: Some("https://amoy.polygonscan.com".to_string()),
        }
    }

    /// Parse the hex chain id into a number
    pub fn chain_id_u64(&self) -> Result<u64> {
        let raw = self.chain_id.trim();
        let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
            Some(digits) => u64::from_str_radix(digits, 16),
            None => raw.parse::<u64>(),
        };
        parsed.map_err(|e| AdapterError::Config(format!("Invalid chain id '{raw}': {e}")))
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::polygon_mainnet()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiMode {
    #[default]
    Light,
    Dark,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrimaryButton {
    #[default]
    ExternalLogin,
    SocialLogin,
    EmailLogin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UxMode {
    Popup,
    #[default]
    Redirect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Web3AuthNetwork {
    SapphireMainnet,
    #[default]
    SapphireDevnet,
    Mainnet,
    Testnet,
    Cyan,
    Aqua,
}

/// Login surface preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub app_name: String,
    pub mode: UiMode,
    pub logo_light: String,
    pub logo_dark: String,
    /// One of en, de, ja, ko, zh, es, fr, pt, nl
    pub default_language: String,
    /// 2 or 3
    pub login_grid_col: u8,
    pub primary_button: PrimaryButton,
    pub ux_mode: UxMode,
    pub login_methods_order: Vec<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            app_name: "Web3Auth Demo".to_string(),
            mode: UiMode::Light,
            logo_light: "https://web3auth.io/images/web3authlog.png".to_string(),
            logo_dark: "https://web3auth.io/images/web3authlogodark.png".to_string(),
            default_language: "ja".to_string(),
            login_grid_col: 3,
            primary_button: PrimaryButton::ExternalLogin,
            ux_mode: UxMode::Redirect,
            login_methods_order: Vec::new(),
        }
    }
}

impl UiConfig {
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.login_grid_col, 2 | 3) {
            return Err(AdapterError::Config(format!(
                "login_grid_col must be 2 or 3, got {}",
                self.login_grid_col
            )));
        }
        Ok(())
    }
}

/// Everything needed to construct an auth client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Web3AuthOptions {
    /// Passed through as-is; the provider decides whether it is valid
    pub client_id: String,
    pub chain_config: ChainConfig,
    pub ui_config: UiConfig,
    pub web3auth_network: Web3AuthNetwork,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginMethodConfig {
    pub name: String,
    #[serde(default = "default_true")]
    pub show_on_modal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterModalConfig {
    pub label: String,
    #[serde(default = "default_true")]
    pub show_on_modal: bool,
    #[serde(default)]
    pub login_methods: BTreeMap<String, LoginMethodConfig>,
}

/// Per-adapter overrides handed to `init_modal`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModalConfig {
    #[serde(default)]
    pub adapters: BTreeMap<String, AdapterModalConfig>,
}

impl ModalConfig {
    /// Modal with the auth adapter labelled `openlogin` and reddit hidden
    pub fn openlogin_without_reddit() -> Self {
        let mut login_methods = BTreeMap::new();
        login_methods.insert(
            "reddit".to_string(),
            LoginMethodConfig {
                name: "reddit".to_string(),
                show_on_modal: false,
            },
        );

        let mut adapters = BTreeMap::new();
        adapters.insert(
            AUTH_ADAPTER.to_string(),
            AdapterModalConfig {
                label: "openlogin".to_string(),
                show_on_modal: true,
                login_methods,
            },
        );

        Self { adapters }
    }

    pub fn is_adapter_visible(&self, adapter: &str) -> bool {
        self.adapters
            .get(adapter)
            .map(|config| config.show_on_modal)
            .unwrap_or(true)
    }

    /// Methods are visible unless their adapter or the method itself is hidden
    pub fn is_login_method_visible(&self, adapter: &str, method: &str) -> bool {
        match self.adapters.get(adapter) {
            Some(config) if !config.show_on_modal => false,
            Some(config) => config
                .login_methods
                .get(method)
                .map(|m| m.show_on_modal)
                .unwrap_or(true),
            None => true,
        }
    }
}

fn default_true() -> bool {
    true
}
