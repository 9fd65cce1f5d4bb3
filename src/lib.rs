//! # metablock
//!
//! **metablock** generates Shopify theme blocks from a store's own metafield
//! definitions. It asks the Admin GraphQL API which product metafields and
//! metaobjects exist and writes a Liquid block that renders them, so the
//! theme never lists fields by hand.
//!
//! ## Overview
//!
//! One run is one linear pipeline:
//!
//! ```text
//! fetch → partition & classify → render → write
//! ```
//!
//! - Flat metafields (text, URLs, anything else in an allowed namespace)
//!   become a label/value list
//! - Metaobject references become chart sections: integer fields are drawn
//!   as a marker on a labelled bar, text fields as short descriptions
//! - Every item in the block is guarded by a `!= blank` check, so products
//!   only show what they have
//!
//! ## Architecture
//!
//! - **[`schema`]** - Field, metaobject and bounds descriptors
//! - **[`fetch`]** - Admin GraphQL client behind the [`fetch::SchemaSource`] trait
//! - **[`generator`]** - Classification, Askama rendering and the block writer
//! - **[`config`]** - `metablock.toml` loading and built-in defaults
//! - **[`cli`]** - The `metablock-gen` command line
//! - **[`logging`]** - `tracing` subscriber setup
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use metablock::config::GeneratorConfig;
//! use metablock::fetch::AdminClient;
//! use metablock::generator::{generate_product_block, RunOptions};
//!
//! let config = GeneratorConfig::default();
//! let client = AdminClient::new(config.endpoint_url()?, token, timeout)?;
//! let outcome = generate_product_block(&client, &config, &RunOptions::new(&config.output))?;
//! ```
//!
//! ## Failure model
//!
//! There is no partial output. Any fetch, render or write error ends the
//! run with the previous block left in place. A missing token or an empty
//! store is a skip, not an error.

pub mod cli;
pub mod config;
pub mod fetch;
pub mod generator;
pub mod logging;
pub mod schema;
