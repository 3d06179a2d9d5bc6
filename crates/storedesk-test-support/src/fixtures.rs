//! Wire-shaped sample records.
//!
//! Fixtures mix camelCase and snake_case keys on purpose so tests exercise the
//! same normalization paths the live backend does.

use serde_json::{Value, json};

/// Admin as the backend sends it.
#[must_use]
pub fn admin(id: &str, name: &str, status: &str) -> Value {
    json!({
        "id": id,
        "fullName": name,
        "email": format!("{}@storedesk.test", name.to_lowercase()),
        "role": "admin",
        "status": status,
        "createdAt": "2024-03-01T09:00:00Z"
    })
}

/// Five admins with statuses `active, active, disabled, active, disabled`.
#[must_use]
pub fn five_admins() -> Value {
    json!([
        admin("1", "Ada", "active"),
        admin("2", "Grace", "active"),
        admin("3", "Linus", "disabled"),
        admin("4", "Barbara", "active"),
        admin("5", "Edsger", "disabled"),
    ])
}

/// Vendor using the numeric id and `isBlocked` flag variant.
#[must_use]
pub fn vendor(id: u64, business_name: &str, blocked: bool) -> Value {
    json!({
        "id": id,
        "businessName": business_name,
        "owner_name": "Owner",
        "email": "owner@vendor.test",
        "isBlocked": blocked,
        "approval_status": "approved"
    })
}

/// Support ticket.
#[must_use]
pub fn ticket(id: &str, subject: &str, status: &str) -> Value {
    json!({
        "id": id,
        "reference": format!("T-{id}"),
        "subject": subject,
        "customerName": "Customer",
        "priority": "high",
        "status": status
    })
}

/// Wrap records the way most list endpoints do: `{ "<plural>": [...] }`.
#[must_use]
pub fn wrapped(plural: &str, records: Value) -> Value {
    let mut data = serde_json::Map::new();
    data.insert(plural.to_string(), records);
    Value::Object(data)
}
