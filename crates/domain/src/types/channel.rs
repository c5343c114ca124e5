//! Marketplace channels and sync targets

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::OrderSyncError;

/// A supported marketplace integration.
///
/// Each channel carries two identifiers: the one the credential registry
/// stores and the one the channel adapter endpoint expects. The mapping
/// between them is fixed and total over the supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Naver smart-store.
    #[serde(rename = "naver_smartstore", alias = "smartstore")]
    SmartStore,
    /// Cafe24 storefront platform.
    #[serde(rename = "cafe24")]
    Cafe24,
    /// Coupang marketplace.
    #[serde(rename = "coupang")]
    Coupang,
}

impl Channel {
    /// Every supported channel, in registry order.
    pub const ALL: [Channel; 3] = [Channel::SmartStore, Channel::Cafe24, Channel::Coupang];

    /// Identifier used by the credential registry.
    pub const fn registry_id(self) -> &'static str {
        match self {
            Self::SmartStore => "naver_smartstore",
            Self::Cafe24 => "cafe24",
            Self::Coupang => "coupang",
        }
    }

    /// Identifier expected by the channel adapter boundary.
    pub const fn adapter_id(self) -> &'static str {
        match self {
            Self::SmartStore => "smartstore",
            Self::Cafe24 => "cafe24",
            Self::Coupang => "coupang",
        }
    }

    /// Registry identifiers of all supported channels.
    pub fn registry_ids() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.registry_id()).collect()
    }

    /// Resolve a registry row's channel value.
    pub fn from_registry_id(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.registry_id() == value)
    }

    /// Resolve an adapter channel value.
    pub fn from_adapter_id(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.adapter_id() == value)
    }

    /// Translate a registry identifier into the adapter identifier.
    pub fn adapter_id_for(registry_id: &str) -> Option<&'static str> {
        Self::from_registry_id(registry_id).map(Self::adapter_id)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.registry_id())
    }
}

/// Accepts either identifier so config values can use whichever is handy.
impl FromStr for Channel {
    type Err = OrderSyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        Self::from_registry_id(&value)
            .or_else(|| Self::from_adapter_id(&value))
            .ok_or_else(|| OrderSyncError::InvalidInput(format!("unsupported channel: {s}")))
    }
}

/// One sync unit: a channel plus an optional sub-account.
///
/// `sub_account_id == None` addresses the channel's default account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelTarget {
    pub channel: Channel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_account_id: Option<String>,
}

impl ChannelTarget {
    pub fn new(channel: Channel, sub_account_id: Option<String>) -> Self {
        Self { channel, sub_account_id }
    }

    /// Target for the channel's default account.
    pub fn default_account(channel: Channel) -> Self {
        Self { channel, sub_account_id: None }
    }
}

impl fmt::Display for ChannelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sub_account_id {
            Some(sub) => write!(f, "{}/{}", self.channel, sub),
            None => write!(f, "{}", self.channel),
        }
    }
}

/// Raw credential row as read from the registry.
///
/// `channel` is kept as the stored string so unsupported values can be
/// reported instead of failing the read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRow {
    pub channel: String,
    pub sub_account_id: Option<String>,
    pub is_active: bool,
}

impl CredentialRow {
    /// Convert into a sync target when the row is active and supported.
    pub fn to_target(&self) -> Option<ChannelTarget> {
        if !self.is_active {
            return None;
        }
        let channel = Channel::from_registry_id(&self.channel)?;
        Some(ChannelTarget::new(channel, self.sub_account_id.clone()))
    }
}
