use serde::{Deserialize, Serialize};
use std::fmt;

use crate::values::{Address, TokenId};

/// A minted token as shown in the marketplace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nft {
    pub token_id: TokenId,
    pub owner: Address,
    /// Raw token URI as returned by `tokenURI` (usually `ipfs://...`)
    pub token_uri: String,
    /// Image to show; the metadata image when known, otherwise the token URI
    pub image_url: String,
    pub is_in_auction: bool,
    /// `None` when the metadata document could not be fetched or parsed
    pub metadata: Option<NftMetadata>,
}

impl Nft {
    pub fn display_name(&self) -> String {
        self.metadata
            .as_ref()
            .map(|m| m.name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("NFT #{}", self.token_id))
    }

    pub fn description(&self) -> &str {
        self.metadata
            .as_ref()
            .map(|m| m.description.as_str())
            .filter(|d| !d.is_empty())
            .unwrap_or("No description")
    }
}

/// Off-chain metadata document referenced by the token URI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NftMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<NftAttribute>,
}

impl NftMetadata {
    /// The image link, if the document carries a non-empty one
    pub fn image(&self) -> Option<&str> {
        let image = self.image.trim();
        (!image.is_empty()).then_some(image)
    }
}

/// One `{ "trait_type": ..., "value": ... }` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftAttribute {
    pub trait_type: String,
    pub value: AttributeValue,
}

/// Attribute values are either text or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Number(n) => write!(f, "{}", n),
            AttributeValue::Text(s) => f.write_str(s),
        }
    }
}
