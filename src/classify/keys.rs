//! Key lists used by the classifier

/// Core set of basic Tika metadata properties that parsers attempt to supply,
/// together with Dublin Core namespace markers and custom fields that match a
/// core field.
///
/// `FORMAT` and `TYPE` are left out: as substrings they match far too many
/// unrelated keys. `AUTHOR` is included.
pub const CORE_KEYS: &[&str] = &[
    "AUTHOR",
    "ALTITUDE",
    "COMMENTS",
    "CONTRIBUTOR",
    "COVERAGE",
    "CREATED",
    "CREATOR",
    "CREATOR_TOOL",
    "DATE",
    "DC:",
    "DC.",
    "DC_",
    "DCTERMS:",
    "DCTM:",
    "DESCRIPTION",
    "EMBEDDED_RELATIONSHIP_ID",
    "EMBEDDED_RESOURCE_PATH",
    "EMBEDDED_RESOURCE_TYPE",
    "HAS_SIGNATURE",
    "IDENTIFIER",
    "LANGUAGE",
    "LATITUDE",
    "LONGITUDE",
    "METADATA_DATE",
    "MODIFIED",
    "MODIFIER",
    "ORIGINAL_RESOURCE_NAME",
    "PRINT_DATE",
    "PROTECTED",
    "PUBLISHER",
    "RATING",
    "RELATION",
    "RESOURCE_NAME_KEY",
    "REVISION",
    "RIGHTS",
    "SOURCE",
    "SOURCE_PATH",
    "SUBJECT",
    "TITLE",
];

/// Keys containing any of these are dropped from the output
pub const IGNORE_KEYS: &[&str] = &["UNKNOWN"];
