//! Paginated list envelope returned by every list endpoint.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BackofficeError, Result};

/// Keys tried when the entity-specific items key is absent.
const FALLBACK_ITEM_KEYS: &[&str] = &["content", "items"];

/// Page metadata, kept separately from the rows so it can be cloned cheaply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// 0-based, as reported by the server.
    pub page_no: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    #[serde(rename = "first", alias = "isFirst", default)]
    pub is_first: bool,
    #[serde(rename = "last", alias = "isLast", default)]
    pub is_last: bool,
}

impl PageMeta {
    /// Build metadata for `total_elements` rows split into pages of
    /// `page_size`, positioned at 0-based `page_no`.
    pub fn compute(page_no: u32, page_size: u32, total_elements: u64) -> Self {
        let size = u64::from(page_size.max(1));
        let total_pages = u32::try_from(total_elements.div_ceil(size)).unwrap_or(u32::MAX);
        Self {
            page_no,
            page_size,
            total_elements,
            total_pages,
            is_first: page_no == 0,
            is_last: page_no.saturating_add(1) >= total_pages,
        }
    }

    /// Highest valid 1-based page number; at least 1 even for an empty list.
    pub fn max_page(&self) -> u32 {
        self.total_pages.max(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageEnvelope<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T: DeserializeOwned> PageEnvelope<T> {
    /// Decode a list response whose rows live under `items_key`
    /// (`customers`, `subCategories`, ...).
    pub fn from_value(mut value: Value, items_key: &str) -> Result<Self> {
        let object = value
            .as_object_mut()
            .ok_or_else(|| BackofficeError::Decode("list response is not an object".into()))?;

        let rows = std::iter::once(items_key)
            .chain(FALLBACK_ITEM_KEYS.iter().copied())
            .find_map(|key| object.remove(key))
            .ok_or_else(|| {
                BackofficeError::Decode(format!("list response has no `{items_key}` array"))
            })?;

        let items: Vec<T> = serde_json::from_value(rows)
            .map_err(|e| BackofficeError::Decode(format!("`{items_key}` rows: {e}")))?;
        let meta: PageMeta = serde_json::from_value(value)
            .map_err(|e| BackofficeError::Decode(format!("page metadata: {e}")))?;

        Ok(Self { items, meta })
    }
}
