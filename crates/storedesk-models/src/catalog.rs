//! Catalog resources: categories and products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::draft::{
    Draft, optional_text, parse_bool, parse_optional_f64, parse_optional_u32,
    required_text, unknown_field, value_field,
};
use crate::error::NormalizeError;
use crate::patch::FieldPatch;
use crate::status::{Visibility, resolve_status};
use crate::wire;

/// Product category shown in the storefront navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CategoryWire")]
pub struct Category {
    /// Opaque identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Short description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parent category for nested trees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Number of products filed under the category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_count: Option<u32>,
    /// Shown/hidden state.
    pub status: Visibility,
}

#[derive(Deserialize)]
struct CategoryWire {
    #[serde(deserialize_with = "wire::id", alias = "_id")]
    id: String,
    #[serde(default, alias = "categoryName", alias = "category_name")]
    name: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_id", alias = "parentId")]
    parent_id: Option<String>,
    #[serde(default, alias = "productCount", alias = "products_count")]
    product_count: Option<u32>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, alias = "isActive")]
    is_active: Option<bool>,
}

impl TryFrom<CategoryWire> for Category {
    type Error = NormalizeError;

    fn try_from(value: CategoryWire) -> Result<Self, Self::Error> {
        let status = resolve_status(
            value.is_active,
            Visibility::from_active,
            value.status.as_deref(),
            Visibility::parse,
            Visibility::Active,
        )?;
        Ok(Self {
            id: wire::required("id", value.id)?,
            name: value.name,
            slug: wire::non_blank(value.slug),
            description: wire::non_blank(value.description),
            parent_id: wire::non_blank(value.parent_id),
            product_count: value.product_count,
            status,
        })
    }
}

/// Create/edit form for [`Category`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    /// Record being edited; `None` when creating.
    pub id: Option<String>,
    /// Name input.
    pub name: String,
    /// Slug input; derived from the name on create when blank.
    pub slug: String,
    /// Description input.
    pub description: String,
    /// Parent category id input.
    pub parent_id: String,
}

/// Lowercase, dash-separated slug derived from a display name.
#[must_use]
pub(crate) fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

impl Draft for CategoryDraft {
    type Record = Category;

    fn from_record(record: &Category) -> Self {
        Self {
            id: Some(record.id.clone()),
            name: record.name.clone(),
            slug: record.slug.clone().unwrap_or_default(),
            description: record.description.clone().unwrap_or_default(),
            parent_id: record.parent_id.clone().unwrap_or_default(),
        }
    }

    fn target_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_field(&mut self, key: &str, value: String) -> Result<(), String> {
        match key {
            "name" => self.name = value,
            "slug" => self.slug = value,
            "description" => self.description = value,
            "parent_id" | "parent" => self.parent_id = value,
            _ => return Err(unknown_field(key)),
        }
        Ok(())
    }

    fn to_patch(&self, original: Option<&Category>) -> Result<FieldPatch, String> {
        let mut patch = FieldPatch::new();
        required_text(
            &mut patch,
            "name",
            "name",
            &self.name,
            original.map(|category| category.name.as_str()),
        )?;
        let slug = if self.slug.trim().is_empty() && original.is_none() {
            slugify(&self.name)
        } else {
            self.slug.clone()
        };
        optional_text(
            &mut patch,
            "slug",
            &slug,
            original.and_then(|category| category.slug.as_deref()),
        );
        optional_text(
            &mut patch,
            "description",
            &self.description,
            original.and_then(|category| category.description.as_deref()),
        );
        if let Some(original) = original
            && self.parent_id.trim() == original.id
        {
            return Err("a category cannot be its own parent".to_string());
        }
        optional_text(
            &mut patch,
            "parent_id",
            &self.parent_id,
            original.and_then(|category| category.parent_id.as_deref()),
        );
        Ok(patch)
    }
}

/// Sellable catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductWire")]
pub struct Product {
    /// Opaque identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Stock keeping unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Owning vendor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    /// Owning vendor's display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    /// Category display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Unit price.
    pub price: f64,
    /// Units on hand.
    pub stock: u32,
    /// Whether dispensing requires a prescription.
    pub requires_prescription: bool,
    /// Listed/unlisted state.
    pub status: Visibility,
    /// Listing time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct ProductWire {
    #[serde(deserialize_with = "wire::id", alias = "_id")]
    id: String,
    #[serde(default, alias = "productName", alias = "product_name")]
    name: String,
    #[serde(default)]
    sku: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_id", alias = "vendorId")]
    vendor_id: Option<String>,
    #[serde(default, alias = "vendorName")]
    vendor_name: Option<String>,
    #[serde(default, alias = "categoryName", alias = "category_name")]
    category: Option<String>,
    #[serde(default, deserialize_with = "wire::amount")]
    price: f64,
    #[serde(
        default,
        alias = "stockQuantity",
        alias = "stock_quantity",
        alias = "quantity"
    )]
    stock: u32,
    #[serde(default, alias = "requiresPrescription")]
    requires_prescription: bool,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, alias = "isActive")]
    is_active: Option<bool>,
    #[serde(default, alias = "createdAt")]
    created_at: Option<DateTime<Utc>>,
}

impl TryFrom<ProductWire> for Product {
    type Error = NormalizeError;

    fn try_from(value: ProductWire) -> Result<Self, Self::Error> {
        let status = resolve_status(
            value.is_active,
            Visibility::from_active,
            value.status.as_deref(),
            Visibility::parse,
            Visibility::Active,
        )?;
        Ok(Self {
            id: wire::required("id", value.id)?,
            name: value.name,
            sku: wire::non_blank(value.sku),
            vendor_id: wire::non_blank(value.vendor_id),
            vendor_name: wire::non_blank(value.vendor_name),
            category: wire::non_blank(value.category),
            price: value.price,
            stock: value.stock,
            requires_prescription: value.requires_prescription,
            status,
            created_at: value.created_at,
        })
    }
}

/// Create/edit form for [`Product`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductDraft {
    /// Record being edited; `None` when creating.
    pub id: Option<String>,
    /// Name input.
    pub name: String,
    /// SKU input.
    pub sku: String,
    /// Vendor id input.
    pub vendor_id: String,
    /// Category input.
    pub category: String,
    /// Price input.
    pub price: String,
    /// Stock input.
    pub stock: String,
    /// Prescription flag input.
    pub requires_prescription: String,
}

impl Draft for ProductDraft {
    type Record = Product;

    fn from_record(record: &Product) -> Self {
        Self {
            id: Some(record.id.clone()),
            name: record.name.clone(),
            sku: record.sku.clone().unwrap_or_default(),
            vendor_id: record.vendor_id.clone().unwrap_or_default(),
            category: record.category.clone().unwrap_or_default(),
            price: record.price.to_string(),
            stock: record.stock.to_string(),
            requires_prescription: record.requires_prescription.to_string(),
        }
    }

    fn target_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_field(&mut self, key: &str, value: String) -> Result<(), String> {
        match key {
            "name" => self.name = value,
            "sku" => self.sku = value,
            "vendor_id" | "vendor" => self.vendor_id = value,
            "category" => self.category = value,
            "price" => self.price = value,
            "stock" => self.stock = value,
            "requires_prescription" | "prescription" => self.requires_prescription = value,
            _ => return Err(unknown_field(key)),
        }
        Ok(())
    }

    fn to_patch(&self, original: Option<&Product>) -> Result<FieldPatch, String> {
        let mut patch = FieldPatch::new();
        required_text(
            &mut patch,
            "name",
            "name",
            &self.name,
            original.map(|product| product.name.as_str()),
        )?;
        optional_text(
            &mut patch,
            "sku",
            &self.sku,
            original.and_then(|product| product.sku.as_deref()),
        );
        optional_text(
            &mut patch,
            "vendor_id",
            &self.vendor_id,
            original.and_then(|product| product.vendor_id.as_deref()),
        );
        optional_text(
            &mut patch,
            "category",
            &self.category,
            original.and_then(|product| product.category.as_deref()),
        );
        let price = parse_optional_f64("price", &self.price)?
            .ok_or_else(|| "price is required".to_string())?;
        value_field(
            &mut patch,
            "price",
            Some(price),
            original.map(|product| product.price),
        );
        let stock = parse_optional_u32("stock", &self.stock)?.unwrap_or(0);
        value_field(
            &mut patch,
            "stock",
            Some(stock),
            original.map(|product| product.stock),
        );
        let prescription = parse_bool("requires_prescription", &self.requires_prescription)?;
        value_field(
            &mut patch,
            "requires_prescription",
            Some(prescription),
            original.map(|product| product.requires_prescription),
        );
        Ok(patch)
    }
}
