// darkroom/src/models/asset.rs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// How the customer shot the photos. Bracketed modes deliver one edited image
/// per group of exposures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhotoType {
  #[serde(rename = "handheld")]
  Handheld,
  #[serde(rename = "camera")]
  Camera,
  #[serde(rename = "bracketed-3")]
  Bracketed3,
  #[serde(rename = "bracketed-5")]
  Bracketed5,
}

impl PhotoType {
  /// Exposures per deliverable for bracketed modes, `None` otherwise.
  pub fn group_size(self) -> Option<usize> {
    match self {
      PhotoType::Bracketed3 => Some(3),
      PhotoType::Bracketed5 => Some(5),
      PhotoType::Handheld | PhotoType::Camera => None,
    }
  }

  pub fn is_bracketed(self) -> bool {
    self.group_size().is_some()
  }

  pub fn label(self) -> &'static str {
    match self {
      PhotoType::Handheld => "Handheld",
      PhotoType::Camera => "Camera",
      PhotoType::Bracketed3 => "Bracketed (3 exposures)",
      PhotoType::Bracketed5 => "Bracketed (5 exposures)",
    }
  }
}

/// A file the customer staged for upload. The bytes stay at `path` until the
/// submission's upload phase reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
  pub name: String,
  pub size_bytes: u64,
  pub mime_type: String,
  pub path: PathBuf,
}

impl AssetRef {
  pub fn new(name: impl Into<String>, size_bytes: u64, mime_type: impl Into<String>, path: impl Into<PathBuf>) -> Self {
    Self {
      name: name.into(),
      size_bytes,
      mime_type: mime_type.into(),
      path: path.into(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
  Photo,
  Watermark,
}

/// Metadata recorded after an asset reached blob storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedAsset {
  pub id: Uuid,
  pub order_id: Uuid,
  pub kind: AssetKind,
  pub name: String,
  pub size_bytes: u64,
  pub mime_type: String,
  pub storage_key: String,
}
