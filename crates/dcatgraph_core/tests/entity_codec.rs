use chrono::{NaiveDate, NaiveDateTime};
use dcatgraph_core::{
    decode, defaults, encode, AttrValue, AttributeMap, Catalog, DataService, Dataset,
    DecodingError, Distribution, Entity, FieldKind,
};

fn at(year: i32, month: u32, day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

fn epoch() -> NaiveDateTime {
    at(1970, 1, 1, 0, 0, 0)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn sample_catalog() -> Catalog {
    Catalog {
        id: "cat-1".to_string(),
        title: "Open Data Portal".to_string(),
        description: "Everything the city publishes".to_string(),
        issued: at(2019, 4, 1, 9, 0, 0),
        modified: at(2024, 1, 15, 17, 45, 12),
        language: "en".to_string(),
        homepage: "https://data.example.org".to_string(),
        license: "CC-BY-4.0".to_string(),
    }
}

fn sample_dataset() -> Dataset {
    Dataset {
        id: "ds-1".to_string(),
        title: "Census".to_string(),
        description: "Population by district".to_string(),
        issued: at(2021, 6, 30, 0, 0, 0),
        modified: at(2023, 12, 31, 23, 59, 59),
        language: "de".to_string(),
        keywords: strings(&["gov", "stats"]),
        license: "ODbL".to_string(),
    }
}

fn sample_distribution() -> Distribution {
    Distribution {
        id: "dist-1".to_string(),
        title: "Census CSV".to_string(),
        description: "Comma separated export".to_string(),
        access_url: "https://data.example.org/census".to_string(),
        download_url: "https://data.example.org/census.csv".to_string(),
        format: "text/csv".to_string(),
    }
}

fn sample_service() -> DataService {
    DataService {
        id: "svc-1".to_string(),
        endpoint_description: "https://api.example.org/openapi.json".to_string(),
        endpoint_url: "https://api.example.org".to_string(),
        keywords: strings(&["api", "census", "api"]),
        landing_page: "https://example.org/api".to_string(),
        title: "Census API".to_string(),
        description: "Query census tables".to_string(),
        issued: at(2022, 2, 2, 2, 2, 2),
        modified: at(2022, 3, 3, 3, 3, 3),
        language: "en".to_string(),
        license: "MIT".to_string(),
    }
}

fn assert_roundtrip<E: Entity + PartialEq + std::fmt::Debug>(record: E) {
    let attributes = encode(&record).unwrap();
    let decoded: E = decode(record.id(), &attributes).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn every_kind_roundtrips_through_attributes() {
    assert_roundtrip(sample_catalog());
    assert_roundtrip(sample_dataset());
    assert_roundtrip(sample_distribution());
    assert_roundtrip(sample_service());
}

#[test]
fn default_records_roundtrip() {
    assert_roundtrip(Catalog::new("c"));
    assert_roundtrip(Dataset::new("d"));
    assert_roundtrip(Distribution::new("x"));
    assert_roundtrip(DataService::new("s"));
}

#[test]
fn decode_of_empty_map_fills_schema_defaults() {
    let dataset: Dataset = defaults("d1").unwrap();
    assert_eq!(dataset, Dataset::new("d1"));
    assert_eq!(dataset.title, "");
    assert!(dataset.keywords.is_empty());
    assert_eq!(dataset.issued, epoch());
    assert_eq!(dataset.modified, epoch());

    let service: DataService = decode("s1", &AttributeMap::new()).unwrap();
    assert_eq!(service, DataService::new("s1"));
    assert_eq!(service.issued, epoch());
}

#[test]
fn encode_never_contains_identifier() {
    let catalog = encode(&sample_catalog()).unwrap();
    let dataset = encode(&sample_dataset()).unwrap();
    let distribution = encode(&sample_distribution()).unwrap();
    let service = encode(&sample_service()).unwrap();

    for attributes in [catalog, dataset, distribution, service] {
        assert!(!attributes.contains_key("id"));
    }
}

#[test]
fn encode_formats_timestamps_as_storage_literal() {
    let attributes = encode(&sample_catalog()).unwrap();
    assert_eq!(
        attributes.get("issued").and_then(AttrValue::as_str),
        Some("2019-04-01 09:00:00")
    );
    assert_eq!(
        attributes.get("modified").and_then(AttrValue::as_str),
        Some("2024-01-15 17:45:12")
    );
    assert_eq!(
        attributes.get("homepage"),
        Some(&AttrValue::Text("https://data.example.org".to_string()))
    );
}

#[test]
fn encode_uses_store_attribute_names() {
    let distribution = encode(&sample_distribution()).unwrap();
    assert!(distribution.contains_key("accessURL"));
    assert!(distribution.contains_key("downloadURL"));

    let service = encode(&sample_service()).unwrap();
    assert!(service.contains_key("endpointURL"));
    assert!(service.contains_key("endpoint_description"));
    assert!(service.contains_key("landing_page"));
    assert_eq!(service.len(), DataService::SCHEMA.fields.len());
}

#[test]
fn encode_is_deterministic() {
    let record = sample_service();
    assert_eq!(encode(&record).unwrap(), encode(&record).unwrap());
}

#[test]
fn keywords_keep_order_and_duplicates() {
    let mut dataset = Dataset::new("d-dup");
    dataset.keywords = strings(&["a", "b", "a"]);

    let attributes = encode(&dataset).unwrap();
    assert_eq!(
        attributes.get("keywords"),
        Some(&AttrValue::List(strings(&["a", "b", "a"])))
    );

    let decoded: Dataset = decode("d-dup", &attributes).unwrap();
    assert_eq!(decoded.keywords, strings(&["a", "b", "a"]));
}

#[test]
fn malformed_timestamp_is_rejected_not_defaulted() {
    let mut attributes = AttributeMap::new();
    attributes.insert("title".to_string(), AttrValue::from("Census"));
    attributes.insert("issued".to_string(), AttrValue::from("not-a-date"));

    let err = decode::<Dataset>("d1", &attributes).unwrap_err();
    match &err {
        DecodingError::MalformedTimestamp {
            id, field, value, ..
        } => {
            assert_eq!(id, "d1");
            assert_eq!(*field, "issued");
            assert_eq!(value, "not-a-date");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.id(), "d1");
    assert!(err.to_string().contains("not-a-date"));
}

#[test]
fn iso_timestamp_is_not_accepted_from_store() {
    let mut attributes = AttributeMap::new();
    attributes.insert("modified".to_string(), AttrValue::from("2024-01-15T17:45:12"));

    let err = decode::<Catalog>("c1", &attributes).unwrap_err();
    assert!(matches!(
        err,
        DecodingError::MalformedTimestamp { field: "modified", .. }
    ));
}

#[test]
fn loosely_written_timestamps_are_not_normalized() {
    for value in [
        "2024-02-2923:59:58",
        " 2024-02-29 23:59:58",
        "2024-2-9 3:4:5",
        "2024-02-29   23:59:58",
        "+2024-02-29 23:59:58",
    ] {
        let mut attributes = AttributeMap::new();
        attributes.insert("issued".to_string(), AttrValue::from(value));

        let err = decode::<Dataset>("d1", &attributes).unwrap_err();
        match err {
            DecodingError::MalformedTimestamp {
                field,
                value: stored,
                ..
            } => {
                assert_eq!(field, "issued");
                assert_eq!(stored, value);
            }
            other => panic!("unexpected error for {value:?}: {other}"),
        }
    }
}

#[test]
fn list_where_text_expected_is_rejected() {
    let mut attributes = AttributeMap::new();
    attributes.insert("title".to_string(), AttrValue::List(strings(&["x"])));

    let err = decode::<Catalog>("c1", &attributes).unwrap_err();
    assert!(matches!(
        err,
        DecodingError::UnexpectedType {
            field: "title",
            expected: FieldKind::Text,
            found: "list",
            ..
        }
    ));
}

#[test]
fn text_where_list_expected_is_rejected() {
    let mut attributes = AttributeMap::new();
    attributes.insert("keywords".to_string(), AttrValue::from("gov,stats"));

    let err = decode::<Dataset>("d1", &attributes).unwrap_err();
    assert!(matches!(
        err,
        DecodingError::UnexpectedType {
            field: "keywords",
            expected: FieldKind::TextList,
            ..
        }
    ));
}

#[test]
fn unknown_attributes_are_ignored() {
    let mut attributes = encode(&sample_distribution()).unwrap();
    attributes.insert("byteSize".to_string(), AttrValue::from("1024"));
    attributes.insert("id".to_string(), AttrValue::from("spoofed"));

    let decoded: Distribution = decode("dist-1", &attributes).unwrap();
    assert_eq!(decoded, sample_distribution());
}

#[test]
fn partial_map_defaults_only_missing_fields() {
    let mut attributes = AttributeMap::new();
    attributes.insert("title".to_string(), AttrValue::from("Census"));
    attributes.insert("issued".to_string(), AttrValue::from("2020-05-05 05:05:05"));

    let decoded: Dataset = decode("d1", &attributes).unwrap();
    assert_eq!(decoded.title, "Census");
    assert_eq!(decoded.issued, at(2020, 5, 5, 5, 5, 5));
    assert_eq!(decoded.modified, epoch());
    assert_eq!(decoded.description, "");
}

#[test]
fn sub_second_precision_is_truncated() {
    let mut catalog = Catalog::new("c-ms");
    catalog.issued = NaiveDate::from_ymd_opt(2024, 7, 1)
        .unwrap()
        .and_hms_milli_opt(10, 20, 30, 999)
        .unwrap();

    let decoded: Catalog = decode("c-ms", &encode(&catalog).unwrap()).unwrap();
    assert_eq!(decoded.issued, at(2024, 7, 1, 10, 20, 30));
    assert_ne!(decoded, catalog);
}
