use parcel_core::{Parcel, ParcelStatus};
use std::str::FromStr;

#[test]
fn parcel_new_starts_registered_and_unsaved() {
    let parcel = Parcel::new(1000, "Main street 1");

    assert_eq!(parcel.number, 0);
    assert!(!parcel.is_persisted());
    assert_eq!(parcel.client, 1000);
    assert_eq!(parcel.status, ParcelStatus::Registered);
    assert_eq!(parcel.address, "Main street 1");
    assert!(parcel.created_at.ends_with('Z'));
    assert_eq!(&parcel.created_at[10..11], "T");
}

#[test]
fn status_lifecycle_moves_forward_and_stops() {
    assert_eq!(ParcelStatus::Registered.next(), Some(ParcelStatus::Sent));
    assert_eq!(ParcelStatus::Sent.next(), Some(ParcelStatus::Delivered));
    assert_eq!(ParcelStatus::Delivered.next(), None);
}

#[test]
fn status_text_matches_storage_spelling() {
    for status in [
        ParcelStatus::Registered,
        ParcelStatus::Sent,
        ParcelStatus::Delivered,
    ] {
        assert_eq!(ParcelStatus::from_str(status.as_str()).unwrap(), status);
        assert_eq!(status.to_string(), status.as_str());
    }

    let err = ParcelStatus::from_str("Sent").unwrap_err();
    assert!(err.to_string().contains("`Sent`"));
}

#[test]
fn parcel_serialization_uses_expected_wire_fields() {
    let parcel = Parcel {
        number: 17,
        client: 1000,
        status: ParcelStatus::Delivered,
        address: "test".to_string(),
        created_at: "2026-10-16T09:30:00Z".to_string(),
    };

    let json = serde_json::to_value(&parcel).unwrap();
    assert_eq!(json["number"], 17);
    assert_eq!(json["client"], 1000);
    assert_eq!(json["status"], "delivered");
    assert_eq!(json["address"], "test");
    assert_eq!(json["created_at"], "2026-10-16T09:30:00Z");

    let decoded: Parcel = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, parcel);
}
