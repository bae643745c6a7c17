//! Fixed projection of the `metadata` table and the record-lookup query.
//!
//! Every response field maps to exactly one source-column expression, in a
//! fixed order. Three fields (`description`, `keywords`, `useLimits`) read
//! a language-suffixed source column chosen by the request; the output
//! field names themselves never vary. Three others (`metadataStandard`,
//! `otherConstraints`, `supplementalInformation`) are pinned to the `_en`
//! source column for every language, matching the deployed feed.

/// Logical table holding one row per metadata record.
pub const METADATA_TABLE: &str = "metadata";

/// Source column the record-lookup WHERE clause filters on.
pub const ID_COLUMN: &str = "features_properties_id";

/// Number of fields projected into every response record.
pub const RESPONSE_FIELD_COUNT: usize = 37;

/// Response localization selected from the request's `lang` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Default when `lang` is absent or unrecognized.
    #[default]
    English,
    /// Selected by `lang == "fr"` only.
    French,
}

impl Language {
    /// Map a raw request `lang` value onto a language.
    ///
    /// `"fr"` selects French; every other value, the empty string
    /// included, selects English. No normalization is applied, so
    /// `"FR"` and `"fr-CA"` both fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        if tag == "fr" {
            Language::French
        } else {
            Language::English
        }
    }

    /// Column-name suffix for the language-dependent source columns.
    fn suffix(self) -> &'static str {
        match self {
            Language::English => "_en",
            Language::French => "_fr",
        }
    }
}

/// How one output field is derived from source columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnExpr {
    /// `COALESCE(column, 'N/A')`: scalar with the textual default.
    Coalesce(&'static str),
    /// `COALESCE(column<suffix>, 'N/A')` where the suffix follows the
    /// requested language.
    CoalesceLocalized(&'static str),
    /// `TRY(CAST(column AS JSON))`: JSON-encoded source column; a failed
    /// cast becomes a null instead of failing the query.
    TryCastJson(&'static str),
    /// `MAP_FROM_ENTRIES(ARRAY[...])` assembling a fixed-key map from
    /// several source columns.
    MapFromEntries(&'static [(&'static str, &'static str)]),
    /// Bare column reference, no default.
    Passthrough(&'static str),
}

impl ColumnExpr {
    /// Render the SQL for this expression under the given language.
    fn render(self, language: Language) -> String {
        match self {
            ColumnExpr::Coalesce(column) => format!("COALESCE({column}, 'N/A')"),
            ColumnExpr::CoalesceLocalized(column) => {
                format!("COALESCE({column}{}, 'N/A')", language.suffix())
            }
            ColumnExpr::TryCastJson(column) => format!("TRY(CAST({column} AS JSON))"),
            ColumnExpr::MapFromEntries(entries) => {
                let pairs = entries
                    .iter()
                    .map(|(key, column)| format!("('{key}', {column})"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("MAP_FROM_ENTRIES(ARRAY[{pairs}])")
            }
            ColumnExpr::Passthrough(column) => column.to_string(),
        }
    }
}

/// One entry of the projection: output name plus derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ProjectedField {
    name: &'static str,
    expr: ColumnExpr,
}

/// The fixed projection, in SELECT-list order.
static PROJECTION: [ProjectedField; RESPONSE_FIELD_COUNT] = [
    ProjectedField {
        name: "id",
        expr: ColumnExpr::Coalesce("features_properties_id"),
    },
    ProjectedField {
        name: "coordinates",
        expr: ColumnExpr::Passthrough("features_geometry_coordinates"),
    },
    ProjectedField {
        name: "title_en",
        expr: ColumnExpr::Coalesce("features_properties_title_en"),
    },
    ProjectedField {
        name: "title_fr",
        expr: ColumnExpr::Coalesce("features_properties_title_fr"),
    },
    ProjectedField {
        name: "description",
        expr: ColumnExpr::CoalesceLocalized("features_properties_description"),
    },
    ProjectedField {
        name: "published",
        expr: ColumnExpr::Coalesce("features_properties_date_published_date"),
    },
    ProjectedField {
        name: "keywords",
        expr: ColumnExpr::CoalesceLocalized("features_properties_keywords"),
    },
    ProjectedField {
        name: "options",
        expr: ColumnExpr::TryCastJson("features_properties_options"),
    },
    ProjectedField {
        name: "contact",
        expr: ColumnExpr::TryCastJson("features_properties_contact"),
    },
    ProjectedField {
        name: "topicCategory",
        expr: ColumnExpr::Coalesce("features_properties_topicCategory"),
    },
    ProjectedField {
        name: "created",
        expr: ColumnExpr::Coalesce("features_properties_date_created_date"),
    },
    ProjectedField {
        name: "spatialRepresentation",
        expr: ColumnExpr::Coalesce("features_properties_spatialRepresentation"),
    },
    ProjectedField {
        name: "type",
        expr: ColumnExpr::Coalesce("features_properties_type"),
    },
    ProjectedField {
        name: "temporalExtent",
        expr: ColumnExpr::MapFromEntries(&[
            ("begin", "features_properties_temporalExtent_begin"),
            ("end", "features_properties_temporalExtent_end"),
        ]),
    },
    ProjectedField {
        name: "refSys",
        expr: ColumnExpr::Coalesce("features_properties_refSys"),
    },
    ProjectedField {
        name: "refSys_version",
        expr: ColumnExpr::Coalesce("features_properties_refSys_version"),
    },
    ProjectedField {
        name: "status",
        expr: ColumnExpr::Coalesce("features_properties_status"),
    },
    ProjectedField {
        name: "maintenance",
        expr: ColumnExpr::Coalesce("features_properties_maintenance"),
    },
    ProjectedField {
        name: "metadataStandard",
        expr: ColumnExpr::Coalesce("features_properties_metadataStandard_en"),
    },
    ProjectedField {
        name: "metadataStandardVersion",
        expr: ColumnExpr::Coalesce("features_properties_metadataStandardVersion"),
    },
    ProjectedField {
        name: "graphicOverview",
        expr: ColumnExpr::Passthrough("features_properties_graphicOverview"),
    },
    ProjectedField {
        name: "distributionFormat_name",
        expr: ColumnExpr::Coalesce("features_properties_distributionFormat_name"),
    },
    ProjectedField {
        name: "distributionFormat_format",
        expr: ColumnExpr::Coalesce("features_properties_distributionFormat_format"),
    },
    ProjectedField {
        name: "useLimits",
        expr: ColumnExpr::CoalesceLocalized("features_properties_useLimits"),
    },
    ProjectedField {
        name: "accessConstraints",
        expr: ColumnExpr::Coalesce("features_properties_accessConstraints"),
    },
    ProjectedField {
        name: "otherConstraints",
        expr: ColumnExpr::Coalesce("features_properties_otherConstraints_en"),
    },
    ProjectedField {
        name: "dateStamp",
        expr: ColumnExpr::Coalesce("features_properties_dateStamp"),
    },
    ProjectedField {
        name: "dataSetURI",
        expr: ColumnExpr::Coalesce("features_properties_dataSetURI"),
    },
    ProjectedField {
        name: "locale",
        expr: ColumnExpr::MapFromEntries(&[
            ("language", "features_properties_locale_language"),
            ("country", "features_properties_locale_country"),
            ("encoding", "features_properties_locale_encoding"),
        ]),
    },
    ProjectedField {
        name: "language",
        expr: ColumnExpr::Coalesce("features_properties_language"),
    },
    ProjectedField {
        name: "characterSet",
        expr: ColumnExpr::Coalesce("features_properties_characterSet"),
    },
    ProjectedField {
        name: "environmentDescription",
        expr: ColumnExpr::Coalesce("features_properties_environmentDescription"),
    },
    ProjectedField {
        name: "supplementalInformation",
        expr: ColumnExpr::Coalesce("features_properties_supplementalInformation_en"),
    },
    ProjectedField {
        name: "credits",
        expr: ColumnExpr::TryCastJson("features_properties_credits"),
    },
    ProjectedField {
        name: "distributor",
        expr: ColumnExpr::TryCastJson("features_properties_distributor"),
    },
    ProjectedField {
        name: "source_system_name",
        expr: ColumnExpr::Coalesce("features_properties_sourcesystemname"),
    },
    ProjectedField {
        name: "plugins",
        expr: ColumnExpr::TryCastJson("features_properties_plugins"),
    },
];

/// Output column names in SELECT-list order.
pub fn projected_field_names() -> impl Iterator<Item = &'static str> {
    PROJECTION.iter().map(|field| field.name)
}

/// Render the full SELECT field list for the given language.
fn select_list(language: Language) -> String {
    PROJECTION
        .iter()
        .map(|field| format!("{} AS {}", field.expr.render(language), field.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the single-record lookup statement.
///
/// The identifier is embedded verbatim inside a single-quoted SQL literal,
/// with no escaping or parameter binding, preserving the deployed query
/// shape byte for byte. Callers must not pass untrusted input here; a
/// bound rewrite would move the value into the request's parameter vector
/// instead.
pub fn build_record_query(id: &str, language: Language) -> String {
    format!(
        "SELECT {} FROM {METADATA_TABLE} WHERE {ID_COLUMN} = '{id}'",
        select_list(language)
    )
}
