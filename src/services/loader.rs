use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{BreedProfile, Catalog, FillPolicy, OrdinalScale, TraitDescription};
use crate::services::images;
use crate::services::table::{parse_table, Row, Table};

const BREED_TABLE: &str = "breed traits";
const DESCRIPTION_TABLE: &str = "trait descriptions";

/// Errors that can occur while loading the catalog tables
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{table} table has no header row")]
    EmptyTable { table: String },

    #[error("{table} table, line {line}: {reason}")]
    Malformed {
        table: String,
        line: usize,
        reason: String,
    },

    #[error("{table} table, line {line}: expected {expected} fields, found {found}")]
    RowLength {
        table: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("{table} table declares column '{column}' more than once")]
    DuplicateColumn { table: String, column: String },

    #[error("Invalid ordinal scale [{min}, {max}]")]
    InvalidScale { min: u8, max: u8 },

    #[error("Breed table declares no trait columns")]
    NoTraits,

    #[error("Line {line}: breed name is empty")]
    EmptyBreedName { line: usize },

    #[error("Line {line}: duplicate breed '{breed}'")]
    DuplicateBreed { line: usize, breed: String },

    #[error("Line {line}: duplicate trait '{trait_name}'")]
    DuplicateTrait { line: usize, trait_name: String },

    #[error("Trait column '{trait_name}' has no entry in the description table")]
    UndescribedTrait { trait_name: String },

    #[error("Line {line}: '{breed}' has non-numeric value '{value}' for '{trait_name}'")]
    NotANumber {
        line: usize,
        breed: String,
        trait_name: String,
        value: String,
    },

    #[error("Line {line}: '{breed}' has {trait_name} = {value}, outside [{min}, {max}]")]
    ValueOutOfRange {
        line: usize,
        breed: String,
        trait_name: String,
        value: u64,
        min: u8,
        max: u8,
    },

    #[error("Line {line}: '{breed}' has no value for '{trait_name}'")]
    MissingValue {
        line: usize,
        breed: String,
        trait_name: String,
    },
}

/// How the two tables are laid out
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    pub delimiter: char,
    /// Column holding the breed name
    pub breed_column: String,
    /// Column holding an image reference; derived from the name when absent
    pub image_column: Option<String>,
    /// Breed-table columns that are not ordinal traits
    pub skip_columns: Vec<String>,
    /// Treatment of empty trait cells
    pub missing_values: FillPolicy,
    pub scale: OrdinalScale,
    /// Root of the image dataset used for derived image references
    pub image_base_url: String,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            breed_column: "Breed".to_string(),
            image_column: Some("Image".to_string()),
            skip_columns: vec!["Coat Type".to_string(), "Coat Length".to_string()],
            missing_values: FillPolicy::Midpoint,
            scale: OrdinalScale::default(),
            image_base_url: images::DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }
}

impl Catalog {
    /// Load the catalog from the breed trait and trait description files
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Io` if either file cannot be read, or any other
    /// `SchemaError` if the tables are malformed or inconsistent.
    pub fn load_from_files(
        breed_traits: &Path,
        trait_descriptions: &Path,
        options: &LoaderOptions,
    ) -> Result<Self, SchemaError> {
        let read = |path: &Path| {
            std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
                path: path.to_path_buf(),
                source,
            })
        };

        let breed_text = read(breed_traits)?;
        let description_text = read(trait_descriptions)?;

        tracing::debug!(
            "Read {} and {}",
            breed_traits.display(),
            trait_descriptions.display()
        );

        Self::from_tables(&breed_text, &description_text, options)
    }

    /// Build the catalog from in-memory table text
    pub fn from_tables(
        breed_text: &str,
        description_text: &str,
        options: &LoaderOptions,
    ) -> Result<Self, SchemaError> {
        if !options.scale.is_valid() {
            return Err(SchemaError::InvalidScale {
                min: options.scale.min,
                max: options.scale.max,
            });
        }

        let description_table = parse_table(DESCRIPTION_TABLE, description_text, options.delimiter)?;
        let descriptions = read_descriptions(&description_table, options.scale)?;

        let breed_table = parse_table(BREED_TABLE, breed_text, options.delimiter)?;
        let layout = BreedLayout::new(&breed_table, options)?;

        if let Some(undescribed) = layout
            .traits
            .iter()
            .find(|(_, name)| !descriptions.contains_key(name))
        {
            return Err(SchemaError::UndescribedTrait {
                trait_name: undescribed.1.clone(),
            });
        }

        for extra in descriptions.keys().filter(|t| !layout.traits.iter().any(|(_, n)| n == *t)) {
            tracing::debug!("Described trait '{}' is not a breed table column", extra);
        }

        let mut breeds = BTreeMap::new();
        for row in &breed_table.rows {
            let breed = read_breed(row, &layout, options)?;
            if breeds.contains_key(&breed.name) {
                return Err(SchemaError::DuplicateBreed {
                    line: row.line,
                    breed: breed.name,
                });
            }
            breeds.insert(breed.name.clone(), breed);
        }

        if breeds.is_empty() {
            tracing::warn!("Breed table has no rows; every recommendation will fail");
        }

        let catalog = Catalog {
            traits: layout.traits.into_iter().map(|(_, name)| name).collect(),
            breeds,
            descriptions,
            scale: options.scale,
        };

        tracing::info!(
            "Loaded {} breeds across {} traits",
            catalog.len(),
            catalog.traits().len()
        );

        Ok(catalog)
    }
}

/// Column positions of the breed table
struct BreedLayout {
    name: usize,
    image: Option<usize>,
    traits: Vec<(usize, String)>,
}

impl BreedLayout {
    fn new(table: &Table, options: &LoaderOptions) -> Result<Self, SchemaError> {
        let name = table.require_column(BREED_TABLE, &options.breed_column)?;
        let image = options.image_column.as_deref().and_then(|c| table.column(c));

        let traits: Vec<(usize, String)> = table
            .headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != name && Some(*i) != image)
            .filter(|(_, h)| !options.skip_columns.iter().any(|s| s.eq_ignore_ascii_case(h)))
            .map(|(i, h)| (i, h.clone()))
            .collect();

        if traits.is_empty() {
            return Err(SchemaError::NoTraits);
        }

        for (pos, (_, header)) in traits.iter().enumerate() {
            if traits[..pos].iter().any(|(_, seen)| seen.eq_ignore_ascii_case(header)) {
                return Err(SchemaError::DuplicateColumn {
                    table: BREED_TABLE.to_string(),
                    column: header.clone(),
                });
            }
        }

        Ok(Self { name, image, traits })
    }
}

fn read_breed(row: &Row, layout: &BreedLayout, options: &LoaderOptions) -> Result<BreedProfile, SchemaError> {
    let name = row.fields[layout.name].clone();
    if name.is_empty() {
        return Err(SchemaError::EmptyBreedName { line: row.line });
    }

    let mut traits = BTreeMap::new();
    for (column, trait_name) in &layout.traits {
        let cell = &row.fields[*column];

        let value = if cell.is_empty() {
            match options.missing_values {
                FillPolicy::Midpoint => options.scale.midpoint(),
                FillPolicy::Reject => {
                    return Err(SchemaError::MissingValue {
                        line: row.line,
                        breed: name,
                        trait_name: trait_name.clone(),
                    });
                }
            }
        } else {
            parse_ordinal(cell, options.scale).map_err(|kind| match kind {
                OrdinalError::NotANumber => SchemaError::NotANumber {
                    line: row.line,
                    breed: name.clone(),
                    trait_name: trait_name.clone(),
                    value: cell.clone(),
                },
                OrdinalError::OutOfRange(value) => SchemaError::ValueOutOfRange {
                    line: row.line,
                    breed: name.clone(),
                    trait_name: trait_name.clone(),
                    value,
                    min: options.scale.min,
                    max: options.scale.max,
                },
            })?
        };

        traits.insert(trait_name.clone(), value);
    }

    let image = layout
        .image
        .map(|i| row.fields[i].clone())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| images::image_url(&options.image_base_url, &name));

    Ok(BreedProfile { name, traits, image })
}

enum OrdinalError {
    NotANumber,
    OutOfRange(u64),
}

/// Read the leading integer of a cell ("5 - High" reads as 5) and range-check it
fn parse_ordinal(cell: &str, scale: OrdinalScale) -> Result<u8, OrdinalError> {
    let digits: String = cell.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(OrdinalError::NotANumber);
    }

    // Anything too long for u64 is far outside any u8 scale
    let value: u64 = digits.parse().unwrap_or(u64::MAX);

    u8::try_from(value)
        .ok()
        .filter(|v| scale.contains(*v))
        .ok_or(OrdinalError::OutOfRange(value))
}

fn read_descriptions(
    table: &Table,
    scale: OrdinalScale,
) -> Result<BTreeMap<String, TraitDescription>, SchemaError> {
    let trait_col = table.require_column(DESCRIPTION_TABLE, "Trait")?;
    let text_col = table.require_column(DESCRIPTION_TABLE, "Description")?;
    let low_col = table.column(&format!("Trait_{}", scale.min));
    let high_col = table.column(&format!("Trait_{}", scale.max));

    let label = |row: &Row, col: Option<usize>| {
        col.map(|c| row.fields[c].clone()).filter(|s| !s.is_empty())
    };

    let mut descriptions = BTreeMap::new();
    for row in &table.rows {
        let trait_name = row.fields[trait_col].clone();
        if trait_name.is_empty() {
            return Err(SchemaError::Malformed {
                table: DESCRIPTION_TABLE.to_string(),
                line: row.line,
                reason: "trait name is empty".to_string(),
            });
        }

        if descriptions.contains_key(&trait_name) {
            return Err(SchemaError::DuplicateTrait {
                line: row.line,
                trait_name,
            });
        }

        if row.fields[text_col].is_empty() {
            tracing::warn!("Trait '{}' has an empty description", trait_name);
        }

        descriptions.insert(
            trait_name.clone(),
            TraitDescription {
                trait_name,
                description: row.fields[text_col].clone(),
                low_label: label(row, low_col),
                high_label: label(row, high_col),
            },
        );
    }

    Ok(descriptions)
}
