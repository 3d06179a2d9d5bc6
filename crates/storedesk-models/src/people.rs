//! Account-like resources: admins, vendors, riders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::draft::{
    Draft, optional_text, password_field, required_text, unknown_field, value_field,
};
use crate::error::NormalizeError;
use crate::patch::FieldPatch;
use crate::status::{AccountStatus, ApprovalStatus, VendorStatus, resolve_status};
use crate::wire;

const MIN_PASSWORD_LEN: usize = 8;

fn check_password(input: &str, creating: bool) -> Result<(), String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        if creating {
            return Err("password is required for new accounts".to_string());
        }
        return Ok(());
    }
    if trimmed.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    Ok(())
}

fn check_email(input: &str) -> Result<(), String> {
    let trimmed = input.trim();
    match trimmed.split_once('@') {
        Some((user, domain)) if !user.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(format!("'{trimmed}' is not a valid email address")),
    }
}

/// Back-office administrator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AdminWire")]
pub struct Admin {
    /// Opaque identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Role slug (`super_admin`, `admin`, `support`, ...).
    pub role: String,
    /// Whether the account may sign in.
    pub status: AccountStatus,
    /// Contact number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Account creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Most recent successful sign-in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct AdminWire {
    #[serde(deserialize_with = "wire::id", alias = "_id")]
    id: String,
    #[serde(default, alias = "fullName", alias = "full_name")]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, alias = "isActive")]
    is_active: Option<bool>,
    #[serde(default, alias = "phoneNumber", alias = "phone_number")]
    phone: Option<String>,
    #[serde(default, alias = "createdAt")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "lastLoginAt", alias = "last_login")]
    last_login_at: Option<DateTime<Utc>>,
}

impl TryFrom<AdminWire> for Admin {
    type Error = NormalizeError;

    fn try_from(value: AdminWire) -> Result<Self, Self::Error> {
        let status = resolve_status(
            value.is_active,
            |active| {
                if active {
                    AccountStatus::Active
                } else {
                    AccountStatus::Disabled
                }
            },
            value.status.as_deref(),
            AccountStatus::parse,
            AccountStatus::Active,
        )?;
        Ok(Self {
            id: wire::required("id", value.id)?,
            name: value.name,
            email: value.email,
            role: wire::non_blank(value.role).unwrap_or_else(|| "admin".to_string()),
            status,
            phone: wire::non_blank(value.phone),
            created_at: value.created_at,
            last_login_at: value.last_login_at,
        })
    }
}

/// Create/edit form for [`Admin`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdminDraft {
    /// Record being edited; `None` when creating.
    pub id: Option<String>,
    /// Display name input.
    pub name: String,
    /// Email input.
    pub email: String,
    /// Role input.
    pub role: String,
    /// Phone input.
    pub phone: String,
    /// New password; blank keeps the current one.
    pub password: String,
}

impl Draft for AdminDraft {
    type Record = Admin;

    fn from_record(record: &Admin) -> Self {
        Self {
            id: Some(record.id.clone()),
            name: record.name.clone(),
            email: record.email.clone(),
            role: record.role.clone(),
            phone: record.phone.clone().unwrap_or_default(),
            password: String::new(),
        }
    }

    fn target_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_field(&mut self, key: &str, value: String) -> Result<(), String> {
        match key {
            "name" | "full_name" => self.name = value,
            "email" => self.email = value,
            "role" => self.role = value,
            "phone" => self.phone = value,
            "password" => self.password = value,
            _ => return Err(unknown_field(key)),
        }
        Ok(())
    }

    fn to_patch(&self, original: Option<&Admin>) -> Result<FieldPatch, String> {
        let mut patch = FieldPatch::new();
        required_text(
            &mut patch,
            "name",
            "name",
            &self.name,
            original.map(|admin| admin.name.as_str()),
        )?;
        check_email(&self.email)?;
        required_text(
            &mut patch,
            "email",
            "email",
            &self.email,
            original.map(|admin| admin.email.as_str()),
        )?;
        optional_text(
            &mut patch,
            "role",
            &self.role,
            original.map(|admin| admin.role.as_str()),
        );
        optional_text(
            &mut patch,
            "phone",
            &self.phone,
            original.and_then(|admin| admin.phone.as_deref()),
        );
        check_password(&self.password, original.is_none())?;
        password_field(&mut patch, &self.password);
        Ok(patch)
    }
}

/// Marketplace seller (pharmacy or store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VendorWire")]
pub struct Vendor {
    /// Opaque identifier.
    pub id: String,
    /// Storefront name.
    pub business_name: String,
    /// Owner contact name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    /// Contact email.
    pub email: String,
    /// Contact number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Blocked/active state.
    pub status: VendorStatus,
    /// Onboarding review state.
    pub approval_status: ApprovalStatus,
    /// Registration time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct VendorWire {
    #[serde(deserialize_with = "wire::id", alias = "_id")]
    id: String,
    #[serde(
        default,
        alias = "businessName",
        alias = "store_name",
        alias = "storeName",
        alias = "name"
    )]
    business_name: String,
    #[serde(default, alias = "ownerName")]
    owner_name: Option<String>,
    #[serde(default)]
    email: String,
    #[serde(default, alias = "phoneNumber", alias = "phone_number")]
    phone: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, alias = "isBlocked")]
    is_blocked: Option<bool>,
    #[serde(default, alias = "approvalStatus")]
    approval_status: Option<String>,
    #[serde(default, alias = "createdAt")]
    created_at: Option<DateTime<Utc>>,
}

impl TryFrom<VendorWire> for Vendor {
    type Error = NormalizeError;

    fn try_from(value: VendorWire) -> Result<Self, Self::Error> {
        let status = resolve_status(
            value.is_blocked,
            VendorStatus::from_blocked,
            value.status.as_deref(),
            VendorStatus::parse,
            VendorStatus::Active,
        )?;
        let approval_status = match wire::non_blank(value.approval_status) {
            Some(raw) => ApprovalStatus::parse(&raw)?,
            None => ApprovalStatus::Pending,
        };
        Ok(Self {
            id: wire::required("id", value.id)?,
            business_name: value.business_name,
            owner_name: wire::non_blank(value.owner_name),
            email: value.email,
            phone: wire::non_blank(value.phone),
            status,
            approval_status,
            created_at: value.created_at,
        })
    }
}

/// Create/edit form for [`Vendor`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VendorDraft {
    /// Record being edited; `None` when creating.
    pub id: Option<String>,
    /// Storefront name input.
    pub business_name: String,
    /// Owner name input.
    pub owner_name: String,
    /// Email input.
    pub email: String,
    /// Phone input.
    pub phone: String,
    /// Review decision input (`pending`, `approved`, `rejected`); blank keeps current.
    pub approval_status: String,
}

impl Draft for VendorDraft {
    type Record = Vendor;

    fn from_record(record: &Vendor) -> Self {
        Self {
            id: Some(record.id.clone()),
            business_name: record.business_name.clone(),
            owner_name: record.owner_name.clone().unwrap_or_default(),
            email: record.email.clone(),
            phone: record.phone.clone().unwrap_or_default(),
            approval_status: record.approval_status.as_str().to_string(),
        }
    }

    fn target_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_field(&mut self, key: &str, value: String) -> Result<(), String> {
        match key {
            "business_name" | "name" => self.business_name = value,
            "owner_name" => self.owner_name = value,
            "email" => self.email = value,
            "phone" => self.phone = value,
            "approval_status" => self.approval_status = value,
            _ => return Err(unknown_field(key)),
        }
        Ok(())
    }

    fn to_patch(&self, original: Option<&Vendor>) -> Result<FieldPatch, String> {
        let mut patch = FieldPatch::new();
        required_text(
            &mut patch,
            "business_name",
            "business name",
            &self.business_name,
            original.map(|vendor| vendor.business_name.as_str()),
        )?;
        optional_text(
            &mut patch,
            "owner_name",
            &self.owner_name,
            original.and_then(|vendor| vendor.owner_name.as_deref()),
        );
        check_email(&self.email)?;
        required_text(
            &mut patch,
            "email",
            "email",
            &self.email,
            original.map(|vendor| vendor.email.as_str()),
        )?;
        optional_text(
            &mut patch,
            "phone",
            &self.phone,
            original.and_then(|vendor| vendor.phone.as_deref()),
        );
        if !self.approval_status.trim().is_empty() {
            let approval =
                ApprovalStatus::parse(&self.approval_status).map_err(|err| err.to_string())?;
            value_field(
                &mut patch,
                "approval_status",
                Some(approval),
                original.map(|vendor| vendor.approval_status),
            );
        }
        Ok(patch)
    }
}

/// Delivery rider account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RiderWire")]
pub struct Rider {
    /// Opaque identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact number.
    pub phone: String,
    /// Login email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Vehicle description (`bike`, `car`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    /// Whether the rider may take deliveries.
    pub status: AccountStatus,
    /// Registration time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RiderWire {
    #[serde(deserialize_with = "wire::id", alias = "_id")]
    id: String,
    #[serde(default, alias = "fullName", alias = "full_name")]
    name: String,
    #[serde(default, alias = "phoneNumber", alias = "phone_number")]
    phone: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default, alias = "vehicleType", alias = "vehicle")]
    vehicle_type: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, alias = "isActive")]
    is_active: Option<bool>,
    #[serde(default, alias = "createdAt")]
    created_at: Option<DateTime<Utc>>,
}

impl TryFrom<RiderWire> for Rider {
    type Error = NormalizeError;

    fn try_from(value: RiderWire) -> Result<Self, Self::Error> {
        let status = resolve_status(
            value.is_active,
            |active| {
                if active {
                    AccountStatus::Active
                } else {
                    AccountStatus::Disabled
                }
            },
            value.status.as_deref(),
            AccountStatus::parse,
            AccountStatus::Active,
        )?;
        Ok(Self {
            id: wire::required("id", value.id)?,
            name: value.name,
            phone: value.phone,
            email: wire::non_blank(value.email),
            vehicle_type: wire::non_blank(value.vehicle_type),
            status,
            created_at: value.created_at,
        })
    }
}

/// Create/edit form for [`Rider`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RiderDraft {
    /// Record being edited; `None` when creating.
    pub id: Option<String>,
    /// Display name input.
    pub name: String,
    /// Phone input.
    pub phone: String,
    /// Email input.
    pub email: String,
    /// Vehicle input.
    pub vehicle_type: String,
    /// New password; blank keeps the current one.
    pub password: String,
}

impl Draft for RiderDraft {
    type Record = Rider;

    fn from_record(record: &Rider) -> Self {
        Self {
            id: Some(record.id.clone()),
            name: record.name.clone(),
            phone: record.phone.clone(),
            email: record.email.clone().unwrap_or_default(),
            vehicle_type: record.vehicle_type.clone().unwrap_or_default(),
            password: String::new(),
        }
    }

    fn target_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_field(&mut self, key: &str, value: String) -> Result<(), String> {
        match key {
            "name" | "full_name" => self.name = value,
            "phone" => self.phone = value,
            "email" => self.email = value,
            "vehicle_type" | "vehicle" => self.vehicle_type = value,
            "password" => self.password = value,
            _ => return Err(unknown_field(key)),
        }
        Ok(())
    }

    fn to_patch(&self, original: Option<&Rider>) -> Result<FieldPatch, String> {
        let mut patch = FieldPatch::new();
        required_text(
            &mut patch,
            "name",
            "name",
            &self.name,
            original.map(|rider| rider.name.as_str()),
        )?;
        required_text(
            &mut patch,
            "phone",
            "phone",
            &self.phone,
            original.map(|rider| rider.phone.as_str()),
        )?;
        if !self.email.trim().is_empty() {
            check_email(&self.email)?;
        }
        optional_text(
            &mut patch,
            "email",
            &self.email,
            original.and_then(|rider| rider.email.as_deref()),
        );
        optional_text(
            &mut patch,
            "vehicle_type",
            &self.vehicle_type,
            original.and_then(|rider| rider.vehicle_type.as_deref()),
        );
        check_password(&self.password, original.is_none())?;
        password_field(&mut patch, &self.password);
        Ok(patch)
    }
}
