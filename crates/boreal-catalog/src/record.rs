//! Fixed-shape response types for the record lookup.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use boreal_core::CellValue;
use boreal_core::Row;

use crate::error::LookupError;
use crate::normalize::decode_plugins;
use crate::normalize::plugins_text;

/// One normalized metadata record.
///
/// The key set is closed: every response carries these 37 fields, in this
/// order, regardless of the input. Fields hold whatever JSON value the
/// engine row produced (absent scalars arrive as the text `N/A`, failed
/// JSON casts as null), except `plugins`, which is unescaped and decoded
/// before it lands here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataRecord {
    pub id: Value,
    pub coordinates: Value,
    pub title_en: Value,
    pub title_fr: Value,
    pub description: Value,
    pub published: Value,
    pub keywords: Value,
    pub options: Value,
    pub contact: Value,
    #[serde(rename = "topicCategory")]
    pub topic_category: Value,
    pub created: Value,
    #[serde(rename = "spatialRepresentation")]
    pub spatial_representation: Value,
    #[serde(rename = "type")]
    pub record_type: Value,
    #[serde(rename = "temporalExtent")]
    pub temporal_extent: Value,
    #[serde(rename = "refSys")]
    pub ref_sys: Value,
    #[serde(rename = "refSys_version")]
    pub ref_sys_version: Value,
    pub status: Value,
    pub maintenance: Value,
    #[serde(rename = "metadataStandard")]
    pub metadata_standard: Value,
    #[serde(rename = "metadataStandardVersion")]
    pub metadata_standard_version: Value,
    #[serde(rename = "graphicOverview")]
    pub graphic_overview: Value,
    #[serde(rename = "distributionFormat_name")]
    pub distribution_format_name: Value,
    #[serde(rename = "distributionFormat_format")]
    pub distribution_format_format: Value,
    #[serde(rename = "useLimits")]
    pub use_limits: Value,
    #[serde(rename = "accessConstraints")]
    pub access_constraints: Value,
    #[serde(rename = "otherConstraints")]
    pub other_constraints: Value,
    #[serde(rename = "dateStamp")]
    pub date_stamp: Value,
    #[serde(rename = "dataSetURI")]
    pub data_set_uri: Value,
    pub locale: Value,
    pub language: Value,
    #[serde(rename = "characterSet")]
    pub character_set: Value,
    #[serde(rename = "environmentDescription")]
    pub environment_description: Value,
    #[serde(rename = "supplementalInformation")]
    pub supplemental_information: Value,
    pub credits: Value,
    pub distributor: Value,
    pub plugins: Value,
    pub source_system_name: Value,
}

impl MetadataRecord {
    /// Assemble a record from one engine result row.
    ///
    /// Every projected column must be present in the row. All cells pass
    /// through as the JSON value they already carry, except `plugins`,
    /// which goes through the unescape-and-decode chain; its failure
    /// fails the whole assembly.
    pub fn from_row(row: &Row<'_>) -> Result<Self, LookupError> {
        let plugins = decode_plugins(plugins_text(require(row, "plugins")?)?)?;

        Ok(Self {
            id: passthrough(row, "id")?,
            coordinates: passthrough(row, "coordinates")?,
            title_en: passthrough(row, "title_en")?,
            title_fr: passthrough(row, "title_fr")?,
            description: passthrough(row, "description")?,
            published: passthrough(row, "published")?,
            keywords: passthrough(row, "keywords")?,
            options: passthrough(row, "options")?,
            contact: passthrough(row, "contact")?,
            topic_category: passthrough(row, "topicCategory")?,
            created: passthrough(row, "created")?,
            spatial_representation: passthrough(row, "spatialRepresentation")?,
            record_type: passthrough(row, "type")?,
            temporal_extent: passthrough(row, "temporalExtent")?,
            ref_sys: passthrough(row, "refSys")?,
            ref_sys_version: passthrough(row, "refSys_version")?,
            status: passthrough(row, "status")?,
            maintenance: passthrough(row, "maintenance")?,
            metadata_standard: passthrough(row, "metadataStandard")?,
            metadata_standard_version: passthrough(row, "metadataStandardVersion")?,
            graphic_overview: passthrough(row, "graphicOverview")?,
            distribution_format_name: passthrough(row, "distributionFormat_name")?,
            distribution_format_format: passthrough(row, "distributionFormat_format")?,
            use_limits: passthrough(row, "useLimits")?,
            access_constraints: passthrough(row, "accessConstraints")?,
            other_constraints: passthrough(row, "otherConstraints")?,
            date_stamp: passthrough(row, "dateStamp")?,
            data_set_uri: passthrough(row, "dataSetURI")?,
            locale: passthrough(row, "locale")?,
            language: passthrough(row, "language")?,
            character_set: passthrough(row, "characterSet")?,
            environment_description: passthrough(row, "environmentDescription")?,
            supplemental_information: passthrough(row, "supplementalInformation")?,
            credits: passthrough(row, "credits")?,
            distributor: passthrough(row, "distributor")?,
            plugins,
            source_system_name: passthrough(row, "source_system_name")?,
        })
    }
}

/// Invocation output: the matching record under the `Items` key.
///
/// The envelope always holds exactly one record; a miss is an error, not
/// an empty list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LookupResponse {
    #[serde(rename = "Items")]
    pub items: Vec<MetadataRecord>,
}

fn require<'a>(row: &Row<'a>, name: &str) -> Result<&'a CellValue, LookupError> {
    row.value(name).ok_or_else(|| LookupError::MissingColumn {
        name: name.to_string(),
    })
}

fn passthrough(row: &Row<'_>, name: &str) -> Result<Value, LookupError> {
    Ok(require(row, name)?.clone().into_json())
}
