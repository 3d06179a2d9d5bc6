//! Promotion resources: coupons and homepage banners.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::draft::{
    Draft, option_to_string, optional_text, parse_optional_f64, parse_optional_i32,
    parse_optional_u32, required_text, unknown_field, value_field,
};
use crate::error::NormalizeError;
use crate::patch::FieldPatch;
use crate::status::{Visibility, resolve_status};
use crate::wire;

/// How a coupon's value is applied to an order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Percentage off the order subtotal.
    Percentage,
    /// Fixed amount off the order subtotal.
    Fixed,
}

impl DiscountType {
    /// Canonical wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }

    /// Parse a wire value, accepting known aliases.
    ///
    /// # Errors
    /// Returns [`NormalizeError::UnknownValue`] for values outside the known set.
    pub fn parse(value: &str) -> Result<Self, NormalizeError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "percentage" | "percent" | "%" => Ok(Self::Percentage),
            "fixed" | "flat" | "amount" => Ok(Self::Fixed),
            _ => Err(NormalizeError::UnknownValue {
                field: "discount_type",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Checkout discount code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CouponWire")]
pub struct Coupon {
    /// Opaque identifier.
    pub id: String,
    /// Code customers type at checkout (uppercase).
    pub code: String,
    /// Percentage or fixed discount.
    pub discount_type: DiscountType,
    /// Percent (0-100) or currency amount depending on `discount_type`.
    pub discount_value: f64,
    /// Minimum subtotal for the code to apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_amount: Option<f64>,
    /// Maximum redemptions; unlimited when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    /// Redemptions so far.
    pub used_count: u32,
    /// Expiry time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Enabled/disabled state.
    pub status: Visibility,
}

impl Coupon {
    /// Whether the coupon has passed its expiry time at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now)
    }

    /// Whether the usage limit has been reached.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.usage_limit.is_some_and(|limit| self.used_count >= limit)
    }
}

#[derive(Deserialize)]
struct CouponWire {
    #[serde(deserialize_with = "wire::id", alias = "_id")]
    id: String,
    #[serde(default, alias = "couponCode", alias = "coupon_code")]
    code: String,
    #[serde(default, alias = "discountType", alias = "type")]
    discount_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "wire::amount",
        alias = "discountValue",
        alias = "value",
        alias = "amount"
    )]
    discount_value: f64,
    #[serde(default, alias = "minOrderAmount", alias = "min_order")]
    min_order_amount: Option<f64>,
    #[serde(default, alias = "usageLimit", alias = "max_uses")]
    usage_limit: Option<u32>,
    #[serde(default, alias = "usedCount", alias = "times_used")]
    used_count: u32,
    #[serde(default, alias = "expiresAt", alias = "expiry_date", alias = "expiryDate")]
    expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, alias = "isActive")]
    is_active: Option<bool>,
}

impl TryFrom<CouponWire> for Coupon {
    type Error = NormalizeError;

    fn try_from(value: CouponWire) -> Result<Self, Self::Error> {
        let status = resolve_status(
            value.is_active,
            Visibility::from_active,
            value.status.as_deref(),
            Visibility::parse,
            Visibility::Active,
        )?;
        let discount_type = match wire::non_blank(value.discount_type) {
            Some(raw) => DiscountType::parse(&raw)?,
            None => DiscountType::Percentage,
        };
        Ok(Self {
            id: wire::required("id", value.id)?,
            code: wire::required("code", value.code)?.to_ascii_uppercase(),
            discount_type,
            discount_value: value.discount_value,
            min_order_amount: value.min_order_amount,
            usage_limit: value.usage_limit,
            used_count: value.used_count,
            expires_at: value.expires_at,
            status,
        })
    }
}

/// Accept RFC 3339 timestamps or plain `YYYY-MM-DD` dates (end of day, UTC).
fn parse_expiry(value: &str) -> Result<Option<DateTime<Utc>>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| "expiry must be a date (YYYY-MM-DD) or RFC 3339 timestamp".to_string())
}

/// Create/edit form for [`Coupon`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CouponDraft {
    /// Record being edited; `None` when creating.
    pub id: Option<String>,
    /// Code input.
    pub code: String,
    /// Discount type input (`percentage`/`fixed`).
    pub discount_type: String,
    /// Discount value input.
    pub discount_value: String,
    /// Minimum order input.
    pub min_order_amount: String,
    /// Usage limit input.
    pub usage_limit: String,
    /// Expiry input.
    pub expires_at: String,
}

impl Draft for CouponDraft {
    type Record = Coupon;

    fn from_record(record: &Coupon) -> Self {
        Self {
            id: Some(record.id.clone()),
            code: record.code.clone(),
            discount_type: record.discount_type.as_str().to_string(),
            discount_value: record.discount_value.to_string(),
            min_order_amount: option_to_string(record.min_order_amount),
            usage_limit: option_to_string(record.usage_limit),
            expires_at: record
                .expires_at
                .map(|expires| expires.to_rfc3339())
                .unwrap_or_default(),
        }
    }

    fn target_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_field(&mut self, key: &str, value: String) -> Result<(), String> {
        match key {
            "code" => self.code = value,
            "discount_type" | "type" => self.discount_type = value,
            "discount_value" | "value" => self.discount_value = value,
            "min_order_amount" => self.min_order_amount = value,
            "usage_limit" => self.usage_limit = value,
            "expires_at" | "expiry" => self.expires_at = value,
            _ => return Err(unknown_field(key)),
        }
        Ok(())
    }

    fn to_patch(&self, original: Option<&Coupon>) -> Result<FieldPatch, String> {
        let mut patch = FieldPatch::new();
        let code = self.code.trim().to_ascii_uppercase();
        if code.chars().any(char::is_whitespace) {
            return Err("code must not contain spaces".to_string());
        }
        required_text(
            &mut patch,
            "code",
            "code",
            &code,
            original.map(|coupon| coupon.code.as_str()),
        )?;
        let discount_type = if self.discount_type.trim().is_empty() {
            original.map_or(DiscountType::Percentage, |coupon| coupon.discount_type)
        } else {
            DiscountType::parse(&self.discount_type).map_err(|err| err.to_string())?
        };
        value_field(
            &mut patch,
            "discount_type",
            Some(discount_type),
            original.map(|coupon| coupon.discount_type),
        );
        let discount_value = parse_optional_f64("discount value", &self.discount_value)?
            .ok_or_else(|| "discount value is required".to_string())?;
        if discount_type == DiscountType::Percentage && discount_value > 100.0 {
            return Err("percentage discounts cannot exceed 100".to_string());
        }
        value_field(
            &mut patch,
            "discount_value",
            Some(discount_value),
            original.map(|coupon| coupon.discount_value),
        );
        value_field(
            &mut patch,
            "min_order_amount",
            parse_optional_f64("minimum order amount", &self.min_order_amount)?,
            original.and_then(|coupon| coupon.min_order_amount),
        );
        value_field(
            &mut patch,
            "usage_limit",
            parse_optional_u32("usage limit", &self.usage_limit)?,
            original.and_then(|coupon| coupon.usage_limit),
        );
        value_field(
            &mut patch,
            "expires_at",
            parse_expiry(&self.expires_at)?,
            original.and_then(|coupon| coupon.expires_at),
        );
        Ok(patch)
    }
}

/// Homepage or category banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BannerWire")]
pub struct Banner {
    /// Opaque identifier.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Artwork location.
    pub image_url: String,
    /// Click-through target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    /// Carousel order, ascending.
    pub position: i32,
    /// Shown/hidden state.
    pub status: Visibility,
}

#[derive(Deserialize)]
struct BannerWire {
    #[serde(deserialize_with = "wire::id", alias = "_id")]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default, alias = "imageUrl", alias = "image")]
    image_url: String,
    #[serde(
        default,
        alias = "linkUrl",
        alias = "link",
        alias = "redirect_url",
        alias = "redirectUrl"
    )]
    link_url: Option<String>,
    #[serde(
        default,
        alias = "sort_order",
        alias = "sortOrder",
        alias = "display_order",
        alias = "displayOrder"
    )]
    position: i32,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, alias = "isActive")]
    is_active: Option<bool>,
}

impl TryFrom<BannerWire> for Banner {
    type Error = NormalizeError;

    fn try_from(value: BannerWire) -> Result<Self, Self::Error> {
        let status = resolve_status(
            value.is_active,
            Visibility::from_active,
            value.status.as_deref(),
            Visibility::parse,
            Visibility::Active,
        )?;
        Ok(Self {
            id: wire::required("id", value.id)?,
            title: value.title,
            image_url: value.image_url,
            link_url: wire::non_blank(value.link_url),
            position: value.position,
            status,
        })
    }
}

fn check_url(field: &str, value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || trimmed.starts_with("https://")
        || trimmed.starts_with("http://")
        || trimmed.starts_with('/')
    {
        Ok(())
    } else {
        Err(format!("{field} must be an http(s) URL or an absolute path"))
    }
}

/// Create/edit form for [`Banner`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BannerDraft {
    /// Record being edited; `None` when creating.
    pub id: Option<String>,
    /// Title input.
    pub title: String,
    /// Image URL input.
    pub image_url: String,
    /// Link URL input.
    pub link_url: String,
    /// Position input.
    pub position: String,
}

impl Draft for BannerDraft {
    type Record = Banner;

    fn from_record(record: &Banner) -> Self {
        Self {
            id: Some(record.id.clone()),
            title: record.title.clone(),
            image_url: record.image_url.clone(),
            link_url: record.link_url.clone().unwrap_or_default(),
            position: record.position.to_string(),
        }
    }

    fn target_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_field(&mut self, key: &str, value: String) -> Result<(), String> {
        match key {
            "title" => self.title = value,
            "image_url" | "image" => self.image_url = value,
            "link_url" | "link" => self.link_url = value,
            "position" => self.position = value,
            _ => return Err(unknown_field(key)),
        }
        Ok(())
    }

    fn to_patch(&self, original: Option<&Banner>) -> Result<FieldPatch, String> {
        let mut patch = FieldPatch::new();
        required_text(
            &mut patch,
            "title",
            "title",
            &self.title,
            original.map(|banner| banner.title.as_str()),
        )?;
        check_url("image URL", &self.image_url)?;
        required_text(
            &mut patch,
            "image_url",
            "image URL",
            &self.image_url,
            original.map(|banner| banner.image_url.as_str()),
        )?;
        check_url("link URL", &self.link_url)?;
        optional_text(
            &mut patch,
            "link_url",
            &self.link_url,
            original.and_then(|banner| banner.link_url.as_deref()),
        );
        let position = parse_optional_i32("position", &self.position)?.unwrap_or(0);
        value_field(
            &mut patch,
            "position",
            Some(position),
            original.map(|banner| banner.position),
        );
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn coupon_normalizes_code_and_type_aliases() {
        let coupon: Coupon = serde_json::from_value(json!({
            "id": "k1",
            "couponCode": "welcome10",
            "type": "percent",
            "value": "10",
            "usageLimit": 5,
            "usedCount": 5,
            "isActive": true
        }))
        .expect("coupon");
        assert_eq!(coupon.code, "WELCOME10");
        assert_eq!(coupon.discount_type, DiscountType::Percentage);
        assert!(coupon.is_exhausted());
    }

    #[test]
    fn coupon_expiry_compares_against_now() {
        let coupon: Coupon = serde_json::from_value(json!({
            "id": "k1",
            "code": "X",
            "expires_at": "2024-01-01T00:00:00Z"
        }))
        .expect("coupon");
        let later = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single().expect("time");
        assert!(coupon.is_expired(later));
    }

    #[test]
    fn coupon_draft_rejects_large_percentages() {
        let draft = CouponDraft {
            code: "big".into(),
            discount_type: "percentage".into(),
            discount_value: "150".into(),
            ..CouponDraft::default()
        };
        let err = draft.to_patch(None).expect_err("over 100");
        assert!(err.contains("cannot exceed 100"));
    }

    #[test]
    fn coupon_draft_accepts_plain_dates() {
        let draft = CouponDraft {
            code: "summer".into(),
            discount_type: "fixed".into(),
            discount_value: "5".into(),
            expires_at: "2030-08-31".into(),
            ..CouponDraft::default()
        };
        let patch = draft.to_patch(None).expect("patch");
        assert_eq!(patch.get("code"), Some(&json!("SUMMER")));
        assert_eq!(patch.get("expires_at"), Some(&json!("2030-08-31T23:59:59Z")));
    }

    #[test]
    fn banner_accepts_display_order_alias() {
        let banner: Banner = serde_json::from_value(json!({
            "id": "b1",
            "title": "Flu season",
            "imageUrl": "https://cdn.example.com/flu.png",
            "displayOrder": 3,
            "is_active": false
        }))
        .expect("banner");
        assert_eq!(banner.position, 3);
        assert_eq!(banner.status, Visibility::Inactive);
    }

    #[test]
    fn banner_draft_rejects_relative_urls() {
        let draft = BannerDraft {
            title: "Promo".into(),
            image_url: "promo.png".into(),
            ..BannerDraft::default()
        };
        assert!(draft.to_patch(None).is_err());
    }
}
