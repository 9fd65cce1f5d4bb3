use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::classify::{classify_object, partition, title_case, ObjectSection};
use super::templates::{render_object_block, render_product_block, ObjectBlock, ProductBlock};
use super::writer::write_block;
use crate::config::GeneratorConfig;
use crate::fetch::{ObjectTarget, SchemaSource};
use crate::schema::{FieldDescriptor, ObjectTypeDefinition};

/// Why a run finished without generating anything
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No Admin API access token was provided
    MissingCredential,
    /// The store has no product metafield definitions
    NoDefinitions,
    /// The requested metaobject type does not exist
    ObjectTypeNotFound(String),
    /// The metaobject type has no integer or text fields to draw
    NothingToVisualize(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingCredential => write!(f, "No SHOPIFY_ADMIN_TOKEN set, skipping"),
            SkipReason::NoDefinitions => write!(f, "No metafield definitions found"),
            SkipReason::ObjectTypeNotFound(type_name) => {
                write!(f, "{type_name} metaobject definition not found, skipping")
            }
            SkipReason::NothingToVisualize(type_name) => {
                write!(f, "{type_name} metaobject has no fields to visualize, skipping")
            }
        }
    }
}

/// Result of a successful run
///
/// Every variant maps to exit code 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped(SkipReason),
    Written { path: PathBuf, bytes: usize },
    /// `--dry-run`: the block went to stdout
    Printed,
}

/// Per-run options
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Block file to overwrite
    pub output: PathBuf,
    /// Print instead of writing
    pub dry_run: bool,
    /// Timestamp written into the provenance header
    pub generated_at: DateTime<Utc>,
}

impl RunOptions {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            dry_run: false,
            generated_at: Utc::now(),
        }
    }
}

/// Fetch and classify everything the product block renders
///
/// Returns `Ok(None)` when the store has no metafield definitions at all.
/// Each distinct metaobject definition is fetched once, even when several
/// reference fields point at it.
///
/// # Errors
///
/// Returns an error if any Admin API query fails.
pub fn collect_product_block(
    source: &dyn SchemaSource,
    config: &GeneratorConfig,
) -> anyhow::Result<Option<ProductBlock>> {
    let fields = source
        .field_definitions()
        .context("Failed to fetch metafield definitions")?;
    if fields.is_empty() {
        return Ok(None);
    }

    let partition = partition(fields, &config.filter());
    info!(
        flat = partition.flat.len(),
        references = partition.references.len(),
        "found metafield definitions to include"
    );

    let sections = collect_sections(source, &partition.references, config)?;
    for section in &sections {
        info!(
            object_type = %section.type_name,
            bars = section.bars.len(),
            descriptions = section.texts.len(),
            "metaobject section included"
        );
    }

    Ok(Some(ProductBlock {
        items: partition.flat,
        sections,
        namespaces: config.include_namespaces.clone(),
        settings: config.block.clone(),
    }))
}

fn collect_sections(
    source: &dyn SchemaSource,
    references: &[FieldDescriptor],
    config: &GeneratorConfig,
) -> anyhow::Result<Vec<ObjectSection>> {
    let mut definitions: HashMap<ObjectTarget, Option<ObjectTypeDefinition>> = HashMap::new();
    let mut sections = Vec::new();
    for reference in references {
        let target = ObjectTarget::for_field(reference);
        if !definitions.contains_key(&target) {
            let definition = target.fetch(source).with_context(|| {
                format!(
                    "Failed to fetch metaobject definition for {}.{}",
                    reference.namespace, reference.key
                )
            })?;
            definitions.insert(target.clone(), definition);
        }
        let Some(Some(definition)) = definitions.get(&target) else {
            warn!(
                namespace = %reference.namespace,
                key = %reference.key,
                "referenced metaobject definition not found"
            );
            continue;
        };
        let section = classify_object(reference, definition, &config.objects);
        if section.is_empty() {
            info!(object_type = %section.type_name, "no visualizable fields; section omitted");
            continue;
        }
        sections.push(section);
    }
    Ok(sections)
}

/// Fetch, classify, render and write the product metafields block
///
/// # Errors
///
/// Returns an error if fetching, rendering or writing fails. In that case
/// the output file is left untouched.
pub fn generate_product_block(
    source: &dyn SchemaSource,
    config: &GeneratorConfig,
    options: &RunOptions,
) -> anyhow::Result<Outcome> {
    let Some(block) = collect_product_block(source, config)? else {
        return Ok(Outcome::Skipped(SkipReason::NoDefinitions));
    };
    let rendered = render_product_block(&block, options.generated_at)?;
    emit(options, &rendered)
}

/// Fetch, classify, render and write a standalone block for one metaobject type
///
/// The block reads the metaobject from the product metafield
/// `<object_block.namespace>.<object_type>`.
///
/// A type with no drawable fields is skipped and any existing block is left
/// as it is.
///
/// # Errors
///
/// Returns an error if fetching, rendering or writing fails.
pub fn generate_object_block(
    source: &dyn SchemaSource,
    config: &GeneratorConfig,
    object_type: &str,
    options: &RunOptions,
) -> anyhow::Result<Outcome> {
    let definition = source
        .object_definition(object_type)
        .with_context(|| format!("Failed to fetch {object_type} metaobject definition"))?;
    let Some(definition) = definition else {
        return Ok(Outcome::Skipped(SkipReason::ObjectTypeNotFound(
            object_type.to_string(),
        )));
    };
    info!(
        object_type = %definition.type_name,
        fields = definition.sub_fields.len(),
        "found metaobject definition"
    );

    let reference = FieldDescriptor::new(
        config.object_block.namespace.as_str(),
        object_type,
        definition.display_name.as_str(),
        "metaobject_reference",
    );
    let section = classify_object(&reference, &definition, &config.objects);
    if section.is_empty() {
        info!(object_type, "no integer or text fields, nothing to generate");
        return Ok(Outcome::Skipped(SkipReason::NothingToVisualize(
            object_type.to_string(),
        )));
    }
    let name = if definition.display_name.trim().is_empty() {
        title_case(&object_type.replace('_', " "))
    } else {
        definition.display_name.clone()
    };
    let block = ObjectBlock {
        name,
        heading: config.object_block.heading.clone(),
        field_count: definition.sub_fields.len(),
        section,
    };
    let rendered = render_object_block(&block, options.generated_at)?;
    emit(options, &rendered)
}

fn emit(options: &RunOptions, rendered: &str) -> anyhow::Result<Outcome> {
    if options.dry_run {
        print!("{rendered}");
        return Ok(Outcome::Printed);
    }
    let bytes = write_block(&options.output, rendered)?;
    Ok(Outcome::Written {
        path: options.output.clone(),
        bytes,
    })
}
