use atlas_scout::core::errors::CoreError;
use atlas_scout::core::pipeline_compiler::compile;
use atlas_scout::core::search_request::{SearchRequest, SortDirection};
use bson::{doc, Bson, Document};
use rstest::rstest;

use crate::support::assert_same_stages;

fn should_clauses(query: &str) -> Vec<Bson> {
    vec![
        Bson::Document(doc! {
            "text": {
                "query": query,
                "path": { "wildcard": "*" },
                "fuzzy": { "maxEdits": 2 },
                "score": { "boost": { "value": 5 } },
            }
        }),
        Bson::Document(doc! {
            "wildcard": {
                "query": format!("{}*", query),
                "path": { "wildcard": "*" },
                "allowAnalyzedField": true,
            }
        }),
    ]
}

fn count_stage() -> Document {
    doc! { "$addFields": { "__count": "$$SEARCH_META.count.lowerBound" } }
}

fn search_stage(compound: Document) -> Document {
    doc! {
        "$search": {
            "index": "scout",
            "compound": compound,
            "count": { "type": "lowerBound" },
        }
    }
}

fn compound_of(pipeline: &[Document]) -> Document {
    pipeline[0]
        .get_document("$search")
        .unwrap()
        .get_document("compound")
        .unwrap()
        .clone()
}

#[test]
fn simple_query_compiles_to_default_pipeline() {
    let pipeline = compile(&SearchRequest::new("lar")).unwrap();

    let expected = vec![
        search_stage(doc! { "should": should_clauses("lar"), "minimumShouldMatch": 1 }),
        count_stage(),
    ];
    assert_same_stages(pipeline.stages(), &expected);
}

#[test]
fn ordered_query_matches_golden_pipeline() {
    let request = SearchRequest::new("lar")
        .order_by("name", SortDirection::Desc)
        .order_by("age", SortDirection::Asc);

    let pipeline = compile(&request).unwrap();

    let expected = vec![
        doc! {
            "$search": {
                "index": "scout",
                "compound": { "should": should_clauses("lar"), "minimumShouldMatch": 1 },
                "count": { "type": "lowerBound" },
                "sort": { "name": -1, "age": 1 },
            }
        },
        count_stage(),
    ];
    assert_same_stages(pipeline.stages(), &expected);
}

#[test]
fn equality_and_in_filters_keep_caller_order() {
    let request = SearchRequest::new("lar")
        .where_eq("foo", "bar")
        .where_eq("bar", "baz")
        .where_in("qux", [1, 2])
        .where_in("quux", [1, 2]);

    let pipeline = compile(&request).unwrap();

    let expected = vec![
        search_stage(doc! {
            "should": should_clauses("lar"),
            "minimumShouldMatch": 1,
            "filter": [
                { "equals": { "path": "foo", "value": "bar" } },
                { "equals": { "path": "bar", "value": "baz" } },
                { "in": { "path": "qux", "value": [1, 2] } },
                { "in": { "path": "quux", "value": [1, 2] } },
            ],
        }),
        count_stage(),
    ];
    assert_same_stages(pipeline.stages(), &expected);
}

#[test]
fn not_in_filters_become_must_not() {
    let request = SearchRequest::new("lar")
        .where_in("qux", [1, 2])
        .where_not_in("eaea", [3]);

    let pipeline = compile(&request).unwrap();

    let expected = vec![
        search_stage(doc! {
            "should": should_clauses("lar"),
            "minimumShouldMatch": 1,
            "filter": [
                { "in": { "path": "qux", "value": [1, 2] } },
            ],
            "mustNot": [
                { "in": { "path": "eaea", "value": [3] } },
            ],
        }),
        count_stage(),
    ];
    assert_same_stages(pipeline.stages(), &expected);
}

#[rstest]
#[case::no_filters(SearchRequest::new("lar"), false)]
#[case::equality_only(SearchRequest::new("lar").where_eq("foo", "bar"), false)]
#[case::in_only(SearchRequest::new("lar").where_in("qux", [1]), false)]
#[case::not_in(SearchRequest::new("lar").where_not_in("qux", [1]), true)]
#[case::not_in_without_query(SearchRequest::new("").where_not_in("qux", [1, 2]), true)]
fn must_not_present_only_with_not_in_filters(#[case] request: SearchRequest, #[case] expected: bool) {
    let pipeline = compile(&request).unwrap();
    let search = pipeline.stages()[0].get_document("$search").unwrap();
    let has_must_not = search
        .get_document("compound")
        .map(|compound| compound.contains_key("mustNot"))
        .unwrap_or(false);

    assert_eq!(has_must_not, expected);
}

#[rstest]
#[case::exclude_deleted(SearchRequest::new("lar").exclude_trashed(), false)]
#[case::only_deleted(SearchRequest::new("lar").only_trashed(), true)]
fn soft_delete_filter_is_appended_alone(#[case] request: SearchRequest, #[case] deleted: bool) {
    let pipeline = compile(&request).unwrap();

    let expected = vec![
        search_stage(doc! {
            "should": should_clauses("lar"),
            "minimumShouldMatch": 1,
            "filter": [
                { "equals": { "path": "__soft_deleted", "value": deleted } },
            ],
        }),
        count_stage(),
    ];
    assert_same_stages(pipeline.stages(), &expected);
}

#[rstest]
#[case::exclude_deleted(false)]
#[case::only_deleted(true)]
fn soft_delete_filter_comes_after_caller_filters(#[case] deleted: bool) {
    let base = SearchRequest::new("lar")
        .where_in("qux", [1, 2])
        .where_eq("foo", "bar");
    let request = if deleted {
        base.only_trashed()
    } else {
        base.exclude_trashed()
    };

    let pipeline = compile(&request).unwrap();
    let filter = compound_of(pipeline.stages())
        .get_array("filter")
        .unwrap()
        .clone();

    assert_eq!(filter.len(), 3);
    assert_eq!(
        filter[0],
        Bson::Document(doc! { "equals": { "path": "foo", "value": "bar" } })
    );
    assert_eq!(
        filter[1],
        Bson::Document(doc! { "in": { "path": "qux", "value": [1, 2] } })
    );
    assert_eq!(
        filter[2],
        Bson::Document(doc! { "equals": { "path": "__soft_deleted", "value": deleted } })
    );
}

#[rstest]
#[case::none(None, None, vec![])]
#[case::offset_only(Some(10), None, vec![doc! { "$skip": 10_i64 }])]
#[case::limit_only(None, Some(5), vec![doc! { "$limit": 5_i64 }])]
#[case::both(Some(10), Some(5), vec![doc! { "$skip": 10_i64 }, doc! { "$limit": 5_i64 }])]
#[case::zero_offset(Some(0), Some(1), vec![doc! { "$skip": 0_i64 }, doc! { "$limit": 1_i64 }])]
fn pagination_stages_follow_count_stage(
    #[case] offset: Option<u64>,
    #[case] limit: Option<u64>,
    #[case] tail: Vec<Document>,
) {
    let mut request = SearchRequest::new("lar");
    request.offset = offset;
    request.limit = limit;

    let pipeline = compile(&request).unwrap();

    assert_eq!(pipeline.len(), 2 + tail.len());
    assert!(pipeline.stages()[0].contains_key("$search"));
    assert_eq!(pipeline.stages()[1], count_stage());
    assert_same_stages(&pipeline.stages()[2..], &tail);
}

#[test]
fn custom_index_name_is_used() {
    let pipeline = compile(&SearchRequest::new("lar").within("people")).unwrap();
    let search = pipeline.stages()[0].get_document("$search").unwrap();

    assert_eq!(search.get_str("index").unwrap(), "people");
}

#[test]
fn empty_query_without_filters_emits_minimal_pipeline() {
    let pipeline = compile(&SearchRequest::new("")).unwrap();

    let expected = vec![
        doc! { "$search": { "index": "scout", "count": { "type": "lowerBound" } } },
        count_stage(),
    ];
    assert_same_stages(pipeline.stages(), &expected);
}

#[test]
fn empty_query_with_filters_keeps_filter_only_compound() {
    let pipeline = compile(&SearchRequest::new("").where_eq("foo", "bar")).unwrap();

    let expected = vec![
        search_stage(doc! {
            "filter": [ { "equals": { "path": "foo", "value": "bar" } } ],
        }),
        count_stage(),
    ];
    assert_same_stages(pipeline.stages(), &expected);
}

#[test]
fn compile_is_deterministic() {
    let request = SearchRequest::new("mustang")
        .where_eq("brand", "ford")
        .where_not_in("color", ["red", "blue"])
        .order_by("year", SortDirection::Desc)
        .exclude_trashed()
        .skip(20)
        .take(10);

    let first = compile(&request).unwrap();
    let second = compile(&request).unwrap();

    assert_same_stages(first.stages(), second.stages());
}

#[rstest]
#[case::document_value(SearchRequest::new("lar").where_eq("foo", doc! { "nested": 1 }), "foo")]
#[case::array_value(SearchRequest::new("lar").where_eq("tags", vec![Bson::from(1)]), "tags")]
#[case::empty_in_set(SearchRequest::new("lar").where_in("qux", Vec::<i32>::new()), "qux")]
#[case::non_scalar_not_in(SearchRequest::new("lar").where_not_in("qux", [doc! { "a": 1 }]), "qux")]
#[case::empty_path(SearchRequest::new("lar").where_eq("", 1), "")]
fn malformed_filters_are_rejected_with_path(#[case] request: SearchRequest, #[case] path: &str) {
    match compile(&request) {
        Err(CoreError::InvalidFilter { path: actual, .. }) => assert_eq!(actual, path),
        other => panic!("expected InvalidFilter, got {:?}", other),
    }
}

#[rstest]
#[case::zero_limit(SearchRequest::new("lar").take(0))]
#[case::duplicate_sort(
    SearchRequest::new("lar")
        .order_by("name", SortDirection::Asc)
        .order_by("name", SortDirection::Desc)
)]
#[case::blank_index(SearchRequest::new("lar").within(" "))]
fn invalid_requests_are_rejected(#[case] request: SearchRequest) {
    assert!(matches!(compile(&request), Err(CoreError::InvalidInput(_))));
}

#[test]
fn request_deserializes_from_json_with_defaults() {
    let request: SearchRequest = serde_json::from_str(
        r#"{
            "query": "lar",
            "sort": [{ "path": "name", "direction": "desc" }],
            "soft_delete": "exclude_deleted",
            "limit": 10
        }"#,
    )
    .unwrap();

    assert_eq!(request.index_name, None);
    assert_eq!(request.resolved_index_name(), "scout");
    assert_eq!(request.sort[0].direction, SortDirection::Desc);
    assert_eq!(request.limit, Some(10));
    assert!(request.equality_filters.is_empty());

    let pipeline = compile(&request).unwrap();
    assert_eq!(pipeline.stages()[2], doc! { "$limit": 10_i64 });
}
