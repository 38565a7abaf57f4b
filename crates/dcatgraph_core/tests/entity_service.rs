use chrono::NaiveDate;
use dcatgraph_core::{
    encode, AttrValue, AttributeMap, Catalog, DataService, Dataset, DecodingError, Distribution,
    EntityService, MemoryVertexRepository, RepoCall, SchemaViolation, ServiceError, StoreError,
    VertexKind,
};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn census() -> Dataset {
    Dataset {
        title: "Census".to_string(),
        keywords: strings(&["gov", "stats"]),
        ..Dataset::new("d1")
    }
}

#[test]
fn create_then_list_returns_the_dataset_with_epoch_defaults() {
    let repo = MemoryVertexRepository::new();
    let service = EntityService::new(&repo);

    let ack = service.create_or_update(&census()).unwrap();
    assert_eq!(ack.kind, VertexKind::Dataset);
    assert_eq!(ack.id, "d1");
    assert_eq!(ack.accepted_vertices, 1);

    let listing = service.list_all::<Dataset>().unwrap();
    assert!(listing.is_complete());
    assert_eq!(listing.records.len(), 1);

    let dataset = &listing.records[0];
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(dataset.id, "d1");
    assert_eq!(dataset.title, "Census");
    assert_eq!(dataset.keywords, strings(&["gov", "stats"]));
    assert_eq!(dataset.issued, epoch);
    assert_eq!(dataset.modified, epoch);
}

#[test]
fn repeated_upsert_leaves_same_state() {
    let once = MemoryVertexRepository::new();
    EntityService::new(&once)
        .create_or_update(&census())
        .unwrap();

    let twice = MemoryVertexRepository::new();
    let service = EntityService::new(&twice);
    service.create_or_update(&census()).unwrap();
    service.create_or_update(&census()).unwrap();

    assert_eq!(twice.vertex_count(VertexKind::Dataset), 1);
    assert_eq!(
        twice.vertex(VertexKind::Dataset, "d1"),
        once.vertex(VertexKind::Dataset, "d1")
    );

    let calls = twice.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
    assert_eq!(
        service.list_all::<Dataset>().unwrap().records,
        EntityService::new(&once).list_all::<Dataset>().unwrap().records
    );
}

#[test]
fn upsert_sends_encoded_attributes_without_identifier() {
    let repo = MemoryVertexRepository::new();
    let service = EntityService::new(&repo);
    service.create_or_update(&census()).unwrap();

    match &repo.calls()[0] {
        RepoCall::Upsert {
            kind,
            id,
            attributes,
        } => {
            assert_eq!(*kind, VertexKind::Dataset);
            assert_eq!(id, "d1");
            assert!(!attributes.contains_key("id"));
            assert_eq!(attributes, &encode(&census()).unwrap());
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

#[test]
fn second_write_replaces_attributes() {
    let repo = MemoryVertexRepository::new();
    let service = EntityService::new(&repo);

    service.create_or_update(&census()).unwrap();
    let mut revised = census();
    revised.title = "Census 2024".to_string();
    revised.keywords.clear();
    service.create_or_update(&revised).unwrap();

    let listing = service.list_all::<Dataset>().unwrap();
    assert_eq!(listing.records, vec![revised]);
}

#[test]
fn missing_identifier_is_rejected_before_any_store_call() {
    let repo = MemoryVertexRepository::new();
    let service = EntityService::new(&repo);

    let err = service.create_or_update(&Catalog::new("   ")).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::SchemaViolation(SchemaViolation::MissingIdentifier {
            kind: VertexKind::Catalog,
            field: "id",
        })
    ));
    assert!(repo.calls().is_empty());
}

#[test]
fn store_unavailable_is_propagated_for_writes_and_reads() {
    let repo = MemoryVertexRepository::new();
    repo.set_unavailable(Some("token rejected"));
    let service = EntityService::new(&repo);

    let err = service
        .create_or_update(&Distribution::new("dist-1"))
        .unwrap_err();
    match err {
        ServiceError::StoreUnavailable(StoreError::Unavailable(reason)) => {
            assert_eq!(reason, "token rejected");
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = service.list_all::<Distribution>().unwrap_err();
    assert!(matches!(
        err,
        ServiceError::StoreUnavailable(StoreError::Unavailable(_))
    ));

    // One call each; nothing is retried.
    assert_eq!(repo.calls().len(), 2);

    repo.set_unavailable(None);
    service
        .create_or_update(&Distribution::new("dist-1"))
        .unwrap();
}

#[test]
fn corrupt_row_is_flagged_without_hiding_others() {
    let repo = MemoryVertexRepository::new();
    let service = EntityService::new(&repo);
    service.create_or_update(&DataService::new("svc-ok")).unwrap();

    let mut corrupt = AttributeMap::new();
    corrupt.insert("title".to_string(), AttrValue::from("Broken"));
    corrupt.insert("issued".to_string(), AttrValue::from("not-a-date"));
    repo.insert_raw(VertexKind::DataService, "svc-bad", corrupt);

    let listing = service.list_all::<DataService>().unwrap();
    assert!(!listing.is_complete());
    assert_eq!(listing.records, vec![DataService::new("svc-ok")]);
    assert_eq!(listing.rejected.len(), 1);
    assert_eq!(listing.rejected[0].id(), "svc-bad");
    assert!(matches!(
        listing.rejected[0],
        DecodingError::MalformedTimestamp { field: "issued", .. }
    ));
}

#[test]
fn strict_listing_fails_on_corrupt_row() {
    let repo = MemoryVertexRepository::new();
    let service = EntityService::new(&repo);
    service.create_or_update(&census()).unwrap();

    let mut corrupt = AttributeMap::new();
    corrupt.insert("keywords".to_string(), AttrValue::from("gov"));
    repo.insert_raw(VertexKind::Dataset, "d-bad", corrupt);

    let err = service.list_all_strict::<Dataset>().unwrap_err();
    match err {
        ServiceError::Decoding { kind, rejected } => {
            assert_eq!(kind, VertexKind::Dataset);
            assert_eq!(rejected.len(), 1);
            assert_eq!(rejected[0].id(), "d-bad");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn strict_listing_returns_records_when_all_decode() {
    let repo = MemoryVertexRepository::new();
    let service = EntityService::new(&repo);
    service.create_or_update(&Catalog::new("c1")).unwrap();
    service.create_or_update(&Catalog::new("c2")).unwrap();

    let mut ids: Vec<String> = service
        .list_all_strict::<Catalog>()
        .unwrap()
        .into_iter()
        .map(|catalog| catalog.id)
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["c1".to_string(), "c2".to_string()]);
}

#[test]
fn kinds_do_not_share_identifiers() {
    let repo = MemoryVertexRepository::new();
    let service = EntityService::new(&repo);
    service.create_or_update(&Catalog::new("same")).unwrap();
    service.create_or_update(&Dataset::new("same")).unwrap();

    assert_eq!(service.list_all::<Catalog>().unwrap().records.len(), 1);
    assert_eq!(service.list_all::<Dataset>().unwrap().records.len(), 1);
    assert!(service.list_all::<Distribution>().unwrap().records.is_empty());
}

#[test]
fn unreadable_row_is_rejected_without_failing_the_listing() {
    let repo = MemoryVertexRepository::new();
    let service = EntityService::new(&repo);
    service.create_or_update(&Catalog::new("c-ok")).unwrap();
    repo.insert_unreadable(VertexKind::Catalog, "c-bad", "title holds a number");

    let listing = service.list_all::<Catalog>().unwrap();
    assert_eq!(listing.records, vec![Catalog::new("c-ok")]);
    assert_eq!(
        listing.rejected,
        vec![DecodingError::InvalidAttributes {
            kind: VertexKind::Catalog,
            id: "c-bad".to_string(),
            reason: "title holds a number".to_string(),
        }]
    );
    assert!(listing.rejected[0].to_string().contains("c-bad"));

    let err = service.list_all_strict::<Catalog>().unwrap_err();
    assert!(matches!(err, ServiceError::Decoding { .. }));
}
