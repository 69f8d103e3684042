//! Startup maintenance: legacy value repair and first-run data.
//!
//! Both routines are safe to run on every start. The server runs them when
//! `patch_schema_on_startup` / `seed_on_startup` are set, and `pcd-admin`
//! exposes them as subcommands.

pub mod data_initializer;
pub mod schema_patch;

pub use data_initializer::{seed, SeedReport};
pub use schema_patch::{apply as patch_schema, PatchReport};
