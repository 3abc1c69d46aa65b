//! Tests for the stored record encoding

use pairing_pears::record::new_id;
use pairing_pears::{Developer, Group, PearsError, Record};

use super::{reopen, setup_temp_db};

#[test]
fn test_developer_json_shape() {
    let dev = Developer {
        id: "d1".to_string(),
        name: "Ada".to_string(),
    };

    let json: serde_json::Value = serde_json::from_slice(&dev.encode().unwrap()).unwrap();

    assert_eq!(json, serde_json::json!({"id": "d1", "name": "Ada"}));
}

#[test]
fn test_group_json_shape() {
    let group = Group {
        id: "g1".to_string(),
        name: "Team".to_string(),
        members: vec!["d1".to_string()],
    };

    let json: serde_json::Value = serde_json::from_slice(&group.encode().unwrap()).unwrap();

    assert_eq!(
        json,
        serde_json::json!({"id": "g1", "name": "Team", "members": ["d1"]})
    );
}

#[test]
fn test_group_null_or_missing_members_decode_empty() {
    let null = Group::decode(br#"{"id":"g","name":"n","members":null}"#).unwrap();
    let missing = Group::decode(br#"{"id":"g","name":"n"}"#).unwrap();

    assert!(null.members.is_empty());
    assert!(missing.members.is_empty());
}

#[test]
fn test_unknown_field_is_rejected() {
    let result = Developer::decode(br#"{"id":"d","name":"n","age":3}"#);

    assert!(matches!(result, Err(PearsError::Serialization(_))));
}

#[test]
fn test_garbage_value_surfaces_as_error() {
    let (_temp, path, db) = setup_temp_db();
    db.add_group("fine").unwrap();
    db.store()
        .update(|tx| tx.put(Group::BUCKET, b"broken", b"not json".to_vec()))
        .unwrap();

    assert!(matches!(
        db.get_all_groups(),
        Err(PearsError::Serialization(_))
    ));

    // Other buckets are unaffected, also after a restart
    let db = reopen(db, &path);
    assert!(db.get_all_developers().unwrap().is_empty());
}

#[test]
fn test_new_id_is_uuid_v4() {
    let id = new_id();
    let parsed = uuid::Uuid::parse_str(&id).unwrap();

    assert_eq!(id.len(), 36);
    assert_eq!(parsed.get_version_num(), 4);
    assert_ne!(new_id(), id);
}
