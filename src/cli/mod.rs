//! # CLI Module
//!
//! Command-line interface of the `metablock-gen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Generate the product metafields block:
//!
//! ```bash
//! SHOPIFY_ADMIN_TOKEN=shpat_... metablock-gen generate
//! ```
//!
//! Options:
//! - `--token <TOKEN>` - Admin API token (env: `SHOPIFY_ADMIN_TOKEN`)
//! - `--shop <DOMAIN>` - Shop domain
//! - `--api-version <VERSION>` - Admin API version
//! - `--endpoint <URL>` - Full GraphQL endpoint, overrides shop and version
//! - `--output <FILE>` - Block file (default: `blocks/product-metafields.liquid`)
//! - `--config <FILE>` - Configuration file (default: `./metablock.toml` if present)
//! - `--dry-run` - Print the block instead of writing it
//!
//! ### `object-block`
//!
//! Generate a standalone block for one metaobject type:
//!
//! ```bash
//! metablock-gen object-block --type fin_characteristics
//! ```
//!
//! Takes the same options as `generate`; the output defaults to
//! `blocks/<type>.liquid` with underscores replaced by dashes.
//!
//! ### `print-config`
//!
//! Print the effective configuration as TOML, a starting point for
//! `metablock.toml`.
//!
//! ## Exit status
//!
//! A run without a token, or against a store without definitions, is
//! skipped and exits 0 so it can sit in a theme build unconditionally.
//! Any fetch, render or write failure exits 1 and leaves the existing
//! block untouched.

mod commands;


pub use commands::{run_cli, Cli, Commands, RunArgs};
