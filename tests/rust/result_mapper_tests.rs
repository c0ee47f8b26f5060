use std::cell::Cell;

use atlas_scout::core::errors::{CoreError, CoreResult};
use atlas_scout::core::result_mapper::{
    lazy_map, map, map_ids, parse_results, total_count, ResultRecord, SearchKey,
};
use bson::doc;
use rstest::{fixture, rstest};

#[derive(Debug, Clone, PartialEq)]
struct User {
    id: i64,
    name: String,
}

fn user(id: i64) -> User {
    User {
        id,
        name: format!("user-{}", id),
    }
}

fn key_of(user: &User) -> SearchKey {
    SearchKey::Int(user.id)
}

fn results(keys: &[i64]) -> Vec<ResultRecord> {
    keys.iter()
        .map(|key| ResultRecord::new(*key, keys.len() as i64))
        .collect()
}

fn ids(users: &[User]) -> Vec<i64> {
    users.iter().map(|user| user.id).collect()
}

#[fixture]
fn natural_order() -> Vec<User> {
    vec![user(1), user(2), user(3), user(4)]
}

#[rstest]
fn map_follows_result_order(natural_order: Vec<User>) {
    let mapped = map(&results(&[2, 4, 1, 3]), |_| Ok(natural_order), key_of).unwrap();

    assert_eq!(ids(&mapped), vec![2, 4, 1, 3]);
}

#[test]
fn map_skips_keys_missing_from_hydration() {
    let mapped = map(&results(&[1, 2, 3]), |_| Ok(vec![user(3), user(1)]), key_of).unwrap();

    assert_eq!(mapped.len(), 2);
    assert_eq!(ids(&mapped), vec![1, 3]);
}

#[rstest]
#[case(1)]
#[case(4)]
#[case(250)]
fn map_hydrates_exactly_once(#[case] size: i64) {
    let calls = Cell::new(0);
    let keys = (1..=size).rev().collect::<Vec<_>>();

    let mapped = map(
        &results(&keys),
        |requested| {
            calls.set(calls.get() + 1);
            assert_eq!(requested.len(), size as usize);
            Ok((1..=size).map(user).collect())
        },
        key_of,
    )
    .unwrap();

    assert_eq!(calls.get(), 1);
    assert_eq!(ids(&mapped), keys);
}

#[test]
fn map_passes_unique_keys_in_result_order() {
    let mut seen = Vec::new();
    let raw = vec![
        ResultRecord::new(3, 3),
        ResultRecord::new(1, 3),
        ResultRecord::new(3, 3),
    ];

    let _ = map(
        &raw,
        |requested| {
            seen = requested;
            Ok(Vec::<User>::new())
        },
        key_of,
    )
    .unwrap();

    assert_eq!(seen, vec![SearchKey::Int(3), SearchKey::Int(1)]);
}

#[test]
fn map_ignores_records_not_requested() {
    let mapped = map(&results(&[2]), |_| Ok(vec![user(9), user(2)]), key_of).unwrap();

    assert_eq!(ids(&mapped), vec![2]);
}

#[test]
fn map_propagates_hydration_failure() {
    let outcome: CoreResult<Vec<User>> = map(
        &results(&[1, 2]),
        |_| Err(CoreError::Hydration("connection reset".to_string())),
        key_of,
    );

    assert!(matches!(outcome, Err(CoreError::Hydration(_))));
}

#[test]
fn map_with_no_results_does_not_hydrate() {
    let calls = Cell::new(0);

    let mapped = map(
        &[],
        |_| {
            calls.set(calls.get() + 1);
            Ok(vec![user(1)])
        },
        key_of,
    )
    .unwrap();

    assert!(mapped.is_empty());
    assert_eq!(calls.get(), 0);
}

#[test]
fn map_supports_string_search_keys() {
    #[derive(Debug)]
    struct Doc {
        scout_key: String,
    }

    let raw = vec![ResultRecord::new("key_2", 2), ResultRecord::new("key_1", 2)];
    let mapped = map(
        &raw,
        |_| {
            Ok(vec![
                Doc { scout_key: "key_1".to_string() },
                Doc { scout_key: "key_2".to_string() },
            ])
        },
        |doc: &Doc| SearchKey::from(doc.scout_key.clone()),
    )
    .unwrap();

    let keys = mapped.iter().map(|doc| doc.scout_key.as_str()).collect::<Vec<_>>();
    assert_eq!(keys, vec!["key_2", "key_1"]);
}

#[rstest]
fn lazy_map_follows_result_order(natural_order: Vec<User>) {
    let mapped = lazy_map(
        &results(&[2, 4, 1, 3]),
        |_| Ok(natural_order.into_iter().map(Ok)),
        key_of,
    )
    .collect::<CoreResult<Vec<_>>>()
    .unwrap();

    assert_eq!(ids(&mapped), vec![2, 4, 1, 3]);
}

#[test]
fn lazy_map_defers_hydration_until_consumed() {
    let calls = Cell::new(0);
    let raw = results(&[1, 2, 3]);

    let mut mapped = lazy_map(
        &raw,
        |_| {
            calls.set(calls.get() + 1);
            Ok(vec![user(3), user(1)].into_iter().map(Ok))
        },
        key_of,
    );
    assert_eq!(calls.get(), 0);

    assert_eq!(mapped.next().unwrap().unwrap().id, 1);
    assert_eq!(mapped.next().unwrap().unwrap().id, 3);
    assert!(mapped.next().is_none());
    assert!(mapped.next().is_none());
    assert_eq!(calls.get(), 1);
}

#[test]
fn lazy_map_yields_source_error_once() {
    let mut mapped = lazy_map(
        &results(&[1, 2]),
        |_| {
            Ok(vec![
                Ok(user(1)),
                Err(CoreError::Hydration("cursor closed".to_string())),
            ])
        },
        key_of,
    );

    assert!(matches!(mapped.next(), Some(Err(CoreError::Hydration(_)))));
    assert!(mapped.next().is_none());
}

#[test]
fn lazy_map_propagates_hydration_call_failure() {
    let mut mapped = lazy_map(
        &results(&[1]),
        |_| -> CoreResult<Vec<CoreResult<User>>> { Err(CoreError::Db("timeout".to_string())) },
        key_of,
    );

    assert!(matches!(mapped.next(), Some(Err(CoreError::Db(_)))));
    assert!(mapped.next().is_none());
}

#[test]
fn parse_results_reads_key_and_count() {
    let documents = vec![
        doc! { "_id": "key_1", "__count": 15 },
        doc! { "_id": 2_i64, "__count": 15_i64 },
        doc! { "_id": 3, "__count": 15.0 },
    ];

    let parsed = parse_results(&documents).unwrap();

    assert_eq!(
        parsed,
        vec![
            ResultRecord::new("key_1", 15),
            ResultRecord::new(2_i64, 15),
            ResultRecord::new(3_i64, 15),
        ]
    );
    assert_eq!(total_count(&parsed), 15);
    assert_eq!(
        map_ids(&parsed),
        vec![SearchKey::from("key_1"), SearchKey::Int(2), SearchKey::Int(3)]
    );
}

#[rstest]
#[case::missing_id(doc! { "__count": 1 }, 1)]
#[case::missing_count(doc! { "_id": "key" }, 1)]
#[case::non_scalar_id(doc! { "_id": { "a": 1 }, "__count": 1 }, 1)]
#[case::string_count(doc! { "_id": "key", "__count": "many" }, 1)]
fn parse_results_reports_position(#[case] broken: bson::Document, #[case] position: usize) {
    let documents = vec![doc! { "_id": "ok", "__count": 2 }, broken];

    match parse_results(&documents) {
        Err(CoreError::InvalidResult { position: actual, .. }) => assert_eq!(actual, position),
        other => panic!("expected InvalidResult, got {:?}", other),
    }
}

#[test]
fn total_count_of_empty_results_is_zero() {
    assert_eq!(total_count(&[]), 0);
}
