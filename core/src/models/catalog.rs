// darkroom/src/models/catalog.rs

//! Packages, extras and the catalog that prices them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The editing package a customer books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageTier {
  Basic,
  Premium,
}

impl PackageTier {
  /// Catalog id of the package.
  pub fn id(self) -> &'static str {
    match self {
      PackageTier::Basic => "basic",
      PackageTier::Premium => "premium",
    }
  }
}

impl fmt::Display for PackageTier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.id())
  }
}

/// Independent add-on flags. Ordering is stable so that extras sets iterate
/// identically regardless of selection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Extra {
  Express,
  SoftRetouch,
  Watermark,
}

impl Extra {
  pub const ALL: [Extra; 3] = [Extra::Express, Extra::SoftRetouch, Extra::Watermark];

  pub fn id(self) -> &'static str {
    match self {
      Extra::Express => "express",
      Extra::SoftRetouch => "soft-retouch",
      Extra::Watermark => "watermark",
    }
  }
}

impl fmt::Display for Extra {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.id())
  }
}

/// What a catalog lookup returns: a display name and a per-unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
  pub name: String,
  /// Price per billable unit in cents.
  pub unit_price_cents: u64,
}

impl CatalogEntry {
  pub fn new(name: impl Into<String>, unit_price_cents: u64) -> Self {
    Self {
      name: name.into(),
      unit_price_cents,
    }
  }
}

/// Package and add-on lookup.
pub trait Catalog: Send + Sync {
  fn package(&self, tier: PackageTier) -> Option<CatalogEntry>;
  fn add_on(&self, extra: Extra) -> Option<CatalogEntry>;
}

/// A catalog held in memory, typically built once at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
  packages: HashMap<PackageTier, CatalogEntry>,
  add_ons: HashMap<Extra, CatalogEntry>,
}

impl StaticCatalog {
  /// An empty catalog. Every lookup misses until entries are added.
  pub fn empty() -> Self {
    Self::default()
  }

  /// The standard price list.
  pub fn standard() -> Self {
    Self::empty()
      .with_package(PackageTier::Basic, CatalogEntry::new("Basic Edit", 1_500))
      .with_package(PackageTier::Premium, CatalogEntry::new("Premium Edit", 2_900))
      .with_add_on(Extra::Express, CatalogEntry::new("Express Delivery", 900))
      .with_add_on(Extra::SoftRetouch, CatalogEntry::new("Soft Retouch", 500))
      .with_add_on(Extra::Watermark, CatalogEntry::new("Watermark", 200))
  }

  pub fn with_package(mut self, tier: PackageTier, entry: CatalogEntry) -> Self {
    self.packages.insert(tier, entry);
    self
  }

  pub fn with_add_on(mut self, extra: Extra, entry: CatalogEntry) -> Self {
    self.add_ons.insert(extra, entry);
    self
  }

  pub fn without_package(mut self, tier: PackageTier) -> Self {
    self.packages.remove(&tier);
    self
  }
}

impl Catalog for StaticCatalog {
  fn package(&self, tier: PackageTier) -> Option<CatalogEntry> {
    self.packages.get(&tier).cloned()
  }

  fn add_on(&self, extra: Extra) -> Option<CatalogEntry> {
    self.add_ons.get(&extra).cloned()
  }
}
