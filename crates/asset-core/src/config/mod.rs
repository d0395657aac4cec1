//! Asset declarations
//!
//! An asset configuration lists the external repositories a project pulls
//! into its tree. It is loaded through [`asset_fs::ConfigStore`], so TOML,
//! JSON and YAML documents are all accepted:
//!
//! ```toml
//! generator = ["make", "-C", "build"]
//!
//! [[assets]]
//! repository = "https://example.com/docs.git"
//! branch = "main"
//! path = "assets/docs"
//! commit = "4f2a9c1"
//! generate = ["html"]
//! ```
//!
//! Declarations are validated as a whole at load time; nothing downstream
//! re-checks them.

mod asset;

pub use asset::{AssetConfig, AssetSpec};
