use hydrator::{Dto, DtoFactory, FieldFlags, HydrateError, Payload};
use serde_json::json;

fn payload(value: serde_json::Value) -> Payload {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected an object payload, got {other}"),
    }
}

fn default_zip() -> String {
    "00000".to_string()
}

#[derive(Debug, PartialEq, Dto)]
struct Address {
    street: String,
    #[dto(default = "default_zip")]
    zip: String,
}

#[derive(Debug, PartialEq, Dto)]
struct User {
    name: String,
    #[dto(nested)]
    address: Address,
}

// ============================================================================
// Scalar assignment, defaults, nullability
// ============================================================================

#[test]
fn present_values_are_assigned_verbatim() {
    let factory = DtoFactory::new();
    let address: Address = factory
        .make(&payload(json!({"street": "Main St", "zip": "12345"})))
        .unwrap();
    assert_eq!(address.street, "Main St");
    assert_eq!(address.zip, "12345");
}

#[test]
fn absent_field_with_default_gets_the_default() {
    let factory = DtoFactory::new();
    let address: Address = factory
        .make(&payload(json!({"street": "Main St"})))
        .unwrap();
    assert_eq!(address.street, "Main St");
    assert_eq!(address.zip, "00000");
}

#[derive(Debug, PartialEq, Dto)]
struct Profile {
    id: u64,
    nickname: Option<String>,
    #[dto(default)]
    scores: Vec<u32>,
}

#[test]
fn absent_nullable_field_is_none() {
    let factory = DtoFactory::new();
    let profile: Profile = factory.make(&payload(json!({"id": 9}))).unwrap();
    assert_eq!(profile.nickname, None);
    assert_eq!(profile.scores, Vec::<u32>::new());
}

#[test]
fn null_value_hydrates_nullable_field_to_none() {
    let factory = DtoFactory::new();
    let profile: Profile = factory
        .make(&payload(json!({"id": 9, "nickname": null})))
        .unwrap();
    assert_eq!(profile.nickname, None);
}

#[test]
fn absent_required_field_is_an_error() {
    let factory = DtoFactory::new();
    let err = factory
        .make::<Profile>(&payload(json!({"nickname": "kim"})))
        .unwrap_err();
    match err {
        HydrateError::MissingField { dto, field } => {
            assert_eq!(dto, "Profile");
            assert_eq!(field, "id");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn mistyped_value_reports_the_field() {
    let factory = DtoFactory::new();
    let err = factory
        .make::<Profile>(&payload(json!({"id": "not a number"})))
        .unwrap_err();
    match err {
        HydrateError::Field { dto, field, .. } => {
            assert_eq!(dto, "Profile");
            assert_eq!(field, "id");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// Nested DTO fields
// ============================================================================

#[test]
fn nested_dto_field_is_hydrated_recursively() {
    let factory = DtoFactory::new();
    let user: User = factory
        .make(&payload(
            json!({"name": "A", "address": {"street": "Main St"}}),
        ))
        .unwrap();
    assert_eq!(user.name, "A");
    assert_eq!(
        user.address,
        Address {
            street: "Main St".to_string(),
            zip: "00000".to_string(),
        }
    );
}

#[test]
fn nested_hydration_goes_through_custom_factories() {
    let mut factory = DtoFactory::new();
    factory.add_factory::<Address, _>(|_payload| {
        Ok(Address {
            street: "Override Rd".to_string(),
            zip: "99999".to_string(),
        })
    });

    let user: User = factory
        .make(&payload(
            json!({"name": "A", "address": {"street": "Main St"}}),
        ))
        .unwrap();
    assert_eq!(user.address.street, "Override Rd");
}

#[test]
fn nested_field_rejects_non_object_values() {
    let factory = DtoFactory::new();
    let err = factory
        .make::<User>(&payload(json!({"name": "A", "address": "Main St"})))
        .unwrap_err();
    match err {
        HydrateError::Field { dto, field, .. } => {
            assert_eq!(dto, "User");
            assert_eq!(field, "address");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[derive(Debug, PartialEq, Dto)]
struct Shipment {
    id: u64,
    #[dto(nested)]
    destination: Option<Address>,
}

#[test]
fn optional_nested_field_accepts_null_absent_and_object() {
    let factory = DtoFactory::new();

    let s: Shipment = factory.make(&payload(json!({"id": 1}))).unwrap();
    assert_eq!(s.destination, None);

    let s: Shipment = factory
        .make(&payload(json!({"id": 1, "destination": null})))
        .unwrap();
    assert_eq!(s.destination, None);

    let s: Shipment = factory
        .make(&payload(json!({"id": 1, "destination": {"street": "Pier 4"}})))
        .unwrap();
    assert_eq!(
        s.destination,
        Some(Address {
            street: "Pier 4".to_string(),
            zip: "00000".to_string(),
        })
    );
}

// A plain deserializable struct, not a DTO: without `#[dto(nested)]` it is
// deserialized wholesale and never goes through the factory.
#[derive(Debug, PartialEq, serde::Deserialize)]
struct GeoPoint {
    lat: f64,
    lon: f64,
}

#[derive(Debug, PartialEq, Dto)]
struct Venue {
    name: String,
    location: GeoPoint,
}

#[test]
fn non_nested_struct_values_are_deserialized_directly() {
    let factory = DtoFactory::new();
    let venue: Venue = factory
        .make(&payload(json!({
            "name": "Docks",
            "location": {"lat": 57.7, "lon": 11.9},
        })))
        .unwrap();
    assert_eq!(venue.location, GeoPoint { lat: 57.7, lon: 11.9 });
}

// ============================================================================
// Exclusion and renaming
// ============================================================================

#[derive(Debug, PartialEq, Dto)]
struct Account {
    #[dto(rename = "userName")]
    name: String,
    #[dto(skip)]
    password: Option<String>,
    #[dto(skip, default = "locked_default")]
    locked: bool,
}

fn locked_default() -> bool {
    true
}

#[test]
fn renamed_field_reads_the_payload_key() {
    let factory = DtoFactory::new();
    let account: Account = factory
        .make(&payload(json!({"userName": "kim"})))
        .unwrap();
    assert_eq!(account.name, "kim");
}

#[test]
fn excluded_field_ignores_payload_values() {
    let factory = DtoFactory::new();
    let account: Account = factory
        .make(&payload(json!({
            "userName": "kim",
            "password": "hunter2",
            "locked": false,
        })))
        .unwrap();
    // Payload values for excluded fields are discarded; fallbacks still apply.
    assert_eq!(account.password, None);
    assert!(account.locked);
}

// ============================================================================
// Descriptor metadata
// ============================================================================

#[test]
fn descriptor_table_records_field_traits() {
    let names: Vec<&str> = Account::FIELDS.iter().map(|f| f.name).collect();
    assert_eq!(names, ["userName", "password", "locked"]);

    assert_eq!(Account::FIELDS[0].flags, FieldFlags::empty());
    assert_eq!(
        Account::FIELDS[1].flags,
        FieldFlags::EXCLUDED | FieldFlags::NULLABLE
    );
    assert_eq!(
        Account::FIELDS[2].flags,
        FieldFlags::EXCLUDED | FieldFlags::HAS_DEFAULT
    );

    assert!(User::FIELDS[1].flags.contains(FieldFlags::NESTED));
    assert_eq!(User::NAME, "User");
}
