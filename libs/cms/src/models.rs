use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumString};

use crate::error::ContentError;

/// Identity of a content item, optionally pinned to a specific version.
///
/// Rendered as `"{id}"` or `"{id}_{work_id}"`. The empty reference
/// (`id == 0`) addresses nothing and is used as the unsaved placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct ContentReference {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_id: Option<i64>,
}

impl ContentReference {
    pub const EMPTY: ContentReference = ContentReference { id: 0, work_id: None };

    pub fn new(id: i64) -> Self {
        Self { id, work_id: None }
    }

    pub fn with_version(id: i64, work_id: i64) -> Self {
        Self {
            id,
            work_id: Some(work_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id == 0
    }

    /// The same item without a version pin
    pub fn to_unversioned(self) -> Self {
        Self::new(self.id)
    }
}

impl fmt::Display for ContentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.work_id {
            Some(work_id) => write!(f, "{}_{}", self.id, work_id),
            None => write!(f, "{}", self.id),
        }
    }
}

impl FromStr for ContentReference {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ContentError::InvalidReference(s.to_string());
        let (id, work_id) = match s.split_once('_') {
            Some((id, work)) => (id, Some(work.parse::<i64>().map_err(|_| invalid())?)),
            None => (s, None),
        };
        let id = id.parse::<i64>().map_err(|_| invalid())?;
        if id < 0 {
            return Err(invalid());
        }
        Ok(Self { id, work_id })
    }
}

/// What a save does to the version lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SaveAction {
    /// Store a draft version
    Save,
    /// Store a version that is ready for publishing
    CheckIn,
    /// Store and make the version the live one
    Publish,
}

/// Access level the caller asserts for a write.
///
/// `NoAccess` tells the repository to skip its access checks, which is what
/// the product catalog does for all of its writes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AccessLevel {
    NoAccess,
    Read,
    Edit,
    Publish,
    FullAccess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum VersionStatus {
    Draft,
    CheckedIn,
    Published,
    PreviouslyPublished,
}

/// Typed content page holding one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Reference of this page; empty until the page is first saved
    pub content_link: ContentReference,
    /// Container page under which the product lives
    pub parent_link: ContentReference,
    /// Display name of the page itself
    pub page_name: String,
    pub product_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default = "default_status")]
    pub status: VersionStatus,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

fn default_status() -> VersionStatus {
    VersionStatus::Draft
}

impl ProductPage {
    /// Fresh, unsaved page with default field values under `parent`
    pub fn new_default(parent: ContentReference) -> Self {
        Self {
            content_link: ContentReference::EMPTY,
            parent_link: parent,
            page_name: String::new(),
            product_name: String::new(),
            description: None,
            price: Decimal::ZERO,
            status: VersionStatus::Draft,
            saved_at: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.content_link.is_empty()
    }
}
