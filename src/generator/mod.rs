//! # Generator Module
//!
//! Turns fetched definitions into a Liquid theme block and writes it to disk.
//!
//! ## Architecture
//!
//! ```text
//! SchemaSource → partition/classify → Askama templates → write_block
//! ```
//!
//! 1. **Partition** - flat metafields vs. metaobject references, filtered by
//!    the namespace allow-list (both) and key deny-list (flat only)
//! 2. **Classify** - metaobject fields become bars (`number_integer`) or
//!    descriptions (text); anything else is dropped
//! 3. **Render** - Askama templates under `templates/` produce the block.
//!    They use their own delimiters (`{= =}`, `{@ @}`) since the output is
//!    itself Liquid
//! 4. **Write** - the block file is overwritten in place
//!
//! ## Generated block
//!
//! ```text
//! {% comment %} provenance header {% endcomment %}
//! {% liquid %}  resolve the current product
//! <div>         heading, chart sections, <dl> of metafields
//! {% stylesheet %}
//! {% schema %}  theme editor settings
//! ```
//!
//! Every chart section, bar, description and list item is wrapped in a
//! `!= blank` guard, so the block only shows what a given product has.
//!
//! Rendering is deterministic: the same definitions and timestamp produce
//! byte-identical output.

mod classify;
mod project;
mod templates;
mod writer;

pub use classify::*;
pub use project::*;
pub use templates::*;
pub use writer::*;
