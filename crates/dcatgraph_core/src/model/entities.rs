//! DCAT entity records.
//!
//! Attribute names match the vertex attributes of the published graph
//! (`accessURL`, `endpoint_description`, ...), so JSON documents and stored
//! vertices share one vocabulary.

use crate::model::attribute::document_timestamp;
use chrono::NaiveDateTime;

entity_record! {
    /// A curated collection of metadata about datasets and data services.
    pub struct Catalog in Catalog {
        title: String => "title",
        description: String => "description",
        #[serde(with = "document_timestamp")]
        issued: NaiveDateTime => "issued",
        #[serde(with = "document_timestamp")]
        modified: NaiveDateTime => "modified",
        language: String => "language",
        homepage: String => "homepage",
        license: String => "license",
    }
}

entity_record! {
    /// A collection of data published by a single agent.
    pub struct Dataset in Dataset {
        title: String => "title",
        description: String => "description",
        #[serde(with = "document_timestamp")]
        issued: NaiveDateTime => "issued",
        #[serde(with = "document_timestamp")]
        modified: NaiveDateTime => "modified",
        language: String => "language",
        /// Ordered; duplicates are kept as given.
        keywords: Vec<String> => "keywords",
        license: String => "license",
    }
}

entity_record! {
    /// One accessible form of a dataset (file, feed, API endpoint).
    pub struct Distribution in Distribution {
        title: String => "title",
        description: String => "description",
        access_url: String => "accessURL",
        download_url: String => "downloadURL",
        format: String => "format",
    }
}

entity_record! {
    /// An operation giving access to datasets or processing functions.
    pub struct DataService in DataService {
        endpoint_description: String => "endpoint_description",
        endpoint_url: String => "endpointURL",
        keywords: Vec<String> => "keywords",
        landing_page: String => "landing_page",
        title: String => "title",
        description: String => "description",
        #[serde(with = "document_timestamp")]
        issued: NaiveDateTime => "issued",
        #[serde(with = "document_timestamp")]
        modified: NaiveDateTime => "modified",
        language: String => "language",
        license: String => "license",
    }
}
