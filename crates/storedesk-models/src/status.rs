//! Normalized status enums.
//!
//! # Design
//! - Wire values are matched case-insensitively and accept the aliases seen
//!   across backend resources (`inactive` vs `disabled`, `in-progress` vs
//!   `in_progress`).
//! - Serialization always emits the canonical snake_case value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NormalizeError;

macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $canon:literal $(| $alias:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $canon)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Canonical wire value.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $canon,)+
                }
            }

            /// Parse a wire value, accepting known aliases.
            ///
            /// # Errors
            /// Returns [`NormalizeError::UnknownValue`] for values outside the known set.
            pub fn parse(value: &str) -> Result<Self, NormalizeError> {
                let lowered = value.trim().to_ascii_lowercase();
                match lowered.as_str() {
                    $($canon $(| $alias)* => Ok(Self::$variant),)+
                    _ => Err(NormalizeError::UnknownValue {
                        field: $field,
                        value: value.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str(self.as_str())
            }
        }
    };
}

status_enum! {
    /// Login-capable account state (admins, riders).
    AccountStatus, field = "status" {
        /// Account may sign in.
        Active => "active" | "enabled",
        /// Account is switched off.
        Disabled => "disabled" | "inactive" | "suspended",
    }
}

status_enum! {
    /// Vendor storefront state, sourced from `is_blocked` or `status`.
    VendorStatus, field = "status" {
        /// Storefront is trading.
        Active => "active" | "unblocked",
        /// Storefront is blocked by an admin.
        Blocked => "blocked" | "suspended",
    }
}

status_enum! {
    /// Vendor onboarding review outcome.
    ApprovalStatus, field = "approval_status" {
        /// Awaiting review.
        Pending => "pending",
        /// Approved to trade.
        Approved => "approved",
        /// Application declined.
        Rejected => "rejected" | "declined",
    }
}

status_enum! {
    /// Catalog and promotion visibility, sourced from `is_active` or `status`.
    Visibility, field = "status" {
        /// Shown to customers.
        Active => "active" | "enabled",
        /// Hidden from customers.
        Inactive => "inactive" | "disabled" | "hidden",
    }
}

status_enum! {
    /// CMS publication state, sourced from `is_published` or `status`.
    Publication, field = "status" {
        /// Live on the storefront.
        Published => "published" | "live",
        /// Saved but not shown.
        Draft => "draft" | "unpublished",
    }
}

status_enum! {
    /// Customer-service ticket lifecycle.
    TicketStatus, field = "status" {
        /// Newly opened.
        Open => "open" | "new",
        /// Assigned and being worked.
        InProgress => "in_progress" | "in-progress" | "inprogress",
        /// Answered, awaiting customer.
        Resolved => "resolved",
        /// Closed out.
        Closed => "closed",
    }
}

status_enum! {
    /// Customer-service ticket urgency.
    TicketPriority, field = "priority" {
        /// Low urgency.
        Low => "low",
        /// Default urgency.
        Medium => "medium" | "normal",
        /// High urgency.
        High => "high",
        /// Needs immediate attention.
        Urgent => "urgent" | "critical",
    }
}

impl AccountStatus {
    /// Opposite state, used by status toggles.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Disabled,
            Self::Disabled => Self::Active,
        }
    }
}

impl VendorStatus {
    /// Opposite state, used by block toggles.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Blocked,
            Self::Blocked => Self::Active,
        }
    }

    /// Map the `is_blocked` wire flag.
    #[must_use]
    pub const fn from_blocked(blocked: bool) -> Self {
        if blocked { Self::Blocked } else { Self::Active }
    }
}

impl Visibility {
    /// Opposite state, used by activation toggles.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }

    /// Map the `is_active` wire flag.
    #[must_use]
    pub const fn from_active(active: bool) -> Self {
        if active { Self::Active } else { Self::Inactive }
    }

    /// Whether the entry is shown.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl Publication {
    /// Opposite state, used by publish toggles.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Published => Self::Draft,
            Self::Draft => Self::Published,
        }
    }

    /// Map the `is_published` wire flag.
    #[must_use]
    pub const fn from_published(published: bool) -> Self {
        if published {
            Self::Published
        } else {
            Self::Draft
        }
    }

    /// Whether the entry is live.
    #[must_use]
    pub const fn is_published(self) -> bool {
        matches!(self, Self::Published)
    }
}

impl TicketStatus {
    /// Close an open ticket or reopen a closed one.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Closed => Self::Open,
            Self::Open | Self::InProgress | Self::Resolved => Self::Closed,
        }
    }
}

/// Resolve a status from an explicit boolean flag or a status string.
///
/// The boolean flag wins when both are present.
pub(crate) fn resolve_status<T>(
    flag: Option<bool>,
    from_flag: impl FnOnce(bool) -> T,
    status: Option<&str>,
    parse: impl FnOnce(&str) -> Result<T, NormalizeError>,
    default: T,
) -> Result<T, NormalizeError> {
    if let Some(flag) = flag {
        return Ok(from_flag(flag));
    }
    match status.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse(value),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_aliases_case_insensitively() {
        assert_eq!(AccountStatus::parse("Inactive"), Ok(AccountStatus::Disabled));
        assert_eq!(TicketStatus::parse("inProgress"), Ok(TicketStatus::InProgress));
        assert_eq!(TicketPriority::parse(" NORMAL "), Ok(TicketPriority::Medium));
    }

    #[test]
    fn parse_rejects_unknown_values() {
        let err = ApprovalStatus::parse("maybe").expect_err("unknown value");
        assert_eq!(
            err,
            NormalizeError::UnknownValue {
                field: "approval_status",
                value: "maybe".into(),
            }
        );
    }

    #[test]
    fn flag_wins_over_status_string() {
        let resolved = resolve_status(
            Some(true),
            VendorStatus::from_blocked,
            Some("active"),
            VendorStatus::parse,
            VendorStatus::Active,
        );
        assert_eq!(resolved, Ok(VendorStatus::Blocked));
    }

    #[test]
    fn ticket_toggle_closes_or_reopens() {
        assert_eq!(TicketStatus::InProgress.toggled(), TicketStatus::Closed);
        assert_eq!(TicketStatus::Closed.toggled(), TicketStatus::Open);
    }

    #[test]
    fn serializes_canonical_value() {
        assert_eq!(
            serde_json::to_value(TicketStatus::InProgress).expect("serialize"),
            serde_json::json!("in_progress")
        );
    }
}
