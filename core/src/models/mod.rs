// darkroom/src/models/mod.rs

//! Data structures shared by the draft, the submission pipeline and the stores.

pub mod asset;
pub mod catalog;
pub mod order;

pub use asset::{AssetKind, AssetRef, PhotoType, UploadedAsset};
pub use catalog::{Catalog, CatalogEntry, Extra, PackageTier, StaticCatalog};
pub use order::{
  BracketingInfo, Order, OrderAddOn, OrderRecord, OrderStatus, PaymentFlowStatus, PaymentStatus, SettlementMethod,
};
