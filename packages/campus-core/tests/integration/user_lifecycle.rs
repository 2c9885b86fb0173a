//! Create / read / update / delete sequences against `UserStore`.

use std::collections::HashSet;

use campus_core::config::IdPolicy;
use campus_core::store::{seed_users, UserStore};
use campus_core::{NewUser, UserPatch};
use serde_json::json;

fn new_user(n: usize) -> NewUser {
    NewUser {
        name: format!("User {}", n),
        email: format!("user{}@example.com", n),
        age: Some(20 + n as i64),
    }
}

#[test]
fn test_created_ids_are_unique() {
    for policy in [IdPolicy::MaxPlusOne, IdPolicy::Monotonic] {
        let store = UserStore::seeded(policy);
        let mut seen: HashSet<i64> = seed_users().iter().map(|u| u.id).collect();
        for n in 0..20 {
            let user = store.insert(new_user(n));
            assert!(seen.insert(user.id), "id {} handed out twice", user.id);
        }
    }
}

#[test]
fn test_deleted_user_is_not_found() {
    let store = UserStore::seeded(IdPolicy::MaxPlusOne);
    let user = store.insert(new_user(1));
    assert_eq!(store.remove(user.id), Some(user.clone()));
    assert_eq!(store.get(user.id), None);
    assert_eq!(store.update(user.id, UserPatch::default()), None);
}

#[test]
fn test_list_counts_inserts_minus_deletes() {
    let store = UserStore::new(IdPolicy::Monotonic);
    let created: Vec<_> = (0..10).map(|n| store.insert(new_user(n))).collect();
    for user in created.iter().step_by(3) {
        assert!(store.remove(user.id).is_some());
    }
    assert_eq!(store.list().len(), 10 - 4);
}

#[test]
fn test_update_from_body_preserves_unsupplied_fields() {
    let store = UserStore::seeded(IdPolicy::MaxPlusOne);
    let before = store.get(2).unwrap();

    let body = json!({"name": "Renamed", "email": ""});
    let patch = UserPatch::from_body(body.as_object().unwrap());
    let after = store.update(2, patch).unwrap();

    assert_eq!(after.name, "Renamed");
    assert_eq!(after.email, before.email);
    assert_eq!(after.age, before.age);
}

#[test]
fn test_seed_scenario() {
    let store = UserStore::default();
    let body = json!({"name": "A", "email": "a@x.com", "age": 20});
    let user = store.insert(NewUser::from_body(body.as_object().unwrap()).unwrap());
    assert_eq!(user.id, 4);
    assert_eq!(store.get(4), Some(user.clone()));
    assert_eq!(store.remove(4), Some(user));
    assert_eq!(store.get(4), None);
}
