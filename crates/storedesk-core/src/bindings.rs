//! [`Resource`] bindings for the marketplace record types.

use std::cmp::Ordering;

use storedesk_models::{
    AccountStatus, Admin, AdminDraft, ApprovalStatus, Banner, BannerDraft, Category,
    CategoryDraft, Coupon, CouponDraft, Faq, FaqDraft, FieldPatch, Product, ProductDraft,
    Publication, Rider, RiderDraft, Ticket, TicketDraft, TicketStatus, Vendor, VendorDraft,
    VendorStatus, Visibility,
};

use crate::resource::{ReconcilePolicy, Resource};

fn text(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase())
}

fn optional_text(left: Option<&str>, right: Option<&str>) -> Ordering {
    text(left.unwrap_or_default(), right.unwrap_or_default())
}

fn push_some<'a>(fields: &mut Vec<&'a str>, value: Option<&'a String>) {
    if let Some(value) = value {
        fields.push(value);
    }
}

impl Resource for Admin {
    const COLLECTION_PATH: &'static str = "/admins";
    const PLURAL_KEY: &'static str = "admins";
    const LABEL: &'static str = "admin";

    type Draft = AdminDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn status_key(&self) -> &str {
        self.status.as_str()
    }

    fn canonical_status(filter: &str) -> Option<&'static str> {
        AccountStatus::parse(filter).ok().map(AccountStatus::as_str)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.email.as_str()];
        push_some(&mut fields, self.phone.as_ref());
        fields
    }

    fn sort_keys() -> &'static [&'static str] {
        &["name", "email", "role", "status", "created_at", "last_login_at"]
    }

    fn compare(&self, other: &Self, key: &str) -> Option<Ordering> {
        Some(match key {
            "name" => text(&self.name, &other.name),
            "email" => text(&self.email, &other.email),
            "role" => text(&self.role, &other.role),
            "status" => self.status.as_str().cmp(other.status.as_str()),
            "created_at" => self.created_at.cmp(&other.created_at),
            "last_login_at" => self.last_login_at.cmp(&other.last_login_at),
            _ => return None,
        })
    }

    fn toggle_patch(&self) -> FieldPatch {
        FieldPatch::single("status", self.toggled_status())
    }

    fn toggled_status(&self) -> &'static str {
        self.status.toggled().as_str()
    }
}

impl Resource for Vendor {
    const COLLECTION_PATH: &'static str = "/vendors";
    const PLURAL_KEY: &'static str = "vendors";
    const LABEL: &'static str = "vendor";

    type Draft = VendorDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.business_name
    }

    fn status_key(&self) -> &str {
        self.status.as_str()
    }

    fn canonical_status(filter: &str) -> Option<&'static str> {
        VendorStatus::parse(filter).ok().map(VendorStatus::as_str)
    }

    /// Vendors filter on either the block flag or the approval workflow.
    fn matches_status(&self, filter: &str) -> bool {
        let blocked = Self::canonical_status(filter).unwrap_or(filter);
        let approval = ApprovalStatus::parse(filter).map_or(filter, |status| status.as_str());
        self.status.as_str().eq_ignore_ascii_case(blocked)
            || self.approval_status.as_str().eq_ignore_ascii_case(approval)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.business_name.as_str(), self.email.as_str()];
        push_some(&mut fields, self.owner_name.as_ref());
        push_some(&mut fields, self.phone.as_ref());
        fields
    }

    fn sort_keys() -> &'static [&'static str] {
        &["business_name", "email", "status", "approval_status", "created_at"]
    }

    fn compare(&self, other: &Self, key: &str) -> Option<Ordering> {
        Some(match key {
            "business_name" => text(&self.business_name, &other.business_name),
            "email" => text(&self.email, &other.email),
            "status" => self.status.as_str().cmp(other.status.as_str()),
            "approval_status" => self
                .approval_status
                .as_str()
                .cmp(other.approval_status.as_str()),
            "created_at" => self.created_at.cmp(&other.created_at),
            _ => return None,
        })
    }

    fn toggle_patch(&self) -> FieldPatch {
        FieldPatch::single("is_blocked", self.status == VendorStatus::Active)
    }

    fn toggled_status(&self) -> &'static str {
        self.status.toggled().as_str()
    }
}

impl Resource for Rider {
    const COLLECTION_PATH: &'static str = "/riders";
    const PLURAL_KEY: &'static str = "riders";
    const LABEL: &'static str = "rider";

    type Draft = RiderDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn status_key(&self) -> &str {
        self.status.as_str()
    }

    fn canonical_status(filter: &str) -> Option<&'static str> {
        AccountStatus::parse(filter).ok().map(AccountStatus::as_str)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.phone.as_str()];
        push_some(&mut fields, self.email.as_ref());
        push_some(&mut fields, self.vehicle_type.as_ref());
        fields
    }

    fn sort_keys() -> &'static [&'static str] {
        &["name", "phone", "vehicle_type", "status", "created_at"]
    }

    fn compare(&self, other: &Self, key: &str) -> Option<Ordering> {
        Some(match key {
            "name" => text(&self.name, &other.name),
            "phone" => self.phone.cmp(&other.phone),
            "vehicle_type" => {
                optional_text(self.vehicle_type.as_deref(), other.vehicle_type.as_deref())
            }
            "status" => self.status.as_str().cmp(other.status.as_str()),
            "created_at" => self.created_at.cmp(&other.created_at),
            _ => return None,
        })
    }

    fn toggle_patch(&self) -> FieldPatch {
        FieldPatch::single("status", self.toggled_status())
    }

    fn toggled_status(&self) -> &'static str {
        self.status.toggled().as_str()
    }
}

impl Resource for Category {
    const COLLECTION_PATH: &'static str = "/categories";
    const PLURAL_KEY: &'static str = "categories";
    const LABEL: &'static str = "category";

    type Draft = CategoryDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn status_key(&self) -> &str {
        self.status.as_str()
    }

    fn canonical_status(filter: &str) -> Option<&'static str> {
        Visibility::parse(filter).ok().map(Visibility::as_str)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        push_some(&mut fields, self.slug.as_ref());
        push_some(&mut fields, self.description.as_ref());
        fields
    }

    fn sort_keys() -> &'static [&'static str] {
        &["name", "product_count", "status"]
    }

    fn compare(&self, other: &Self, key: &str) -> Option<Ordering> {
        Some(match key {
            "name" => text(&self.name, &other.name),
            "product_count" => self.product_count.cmp(&other.product_count),
            "status" => self.status.as_str().cmp(other.status.as_str()),
            _ => return None,
        })
    }

    fn toggle_patch(&self) -> FieldPatch {
        FieldPatch::single("is_active", !self.status.is_active())
    }

    fn toggled_status(&self) -> &'static str {
        self.status.toggled().as_str()
    }
}

impl Resource for Product {
    const COLLECTION_PATH: &'static str = "/products";
    const PLURAL_KEY: &'static str = "products";
    const LABEL: &'static str = "product";

    type Draft = ProductDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn status_key(&self) -> &str {
        self.status.as_str()
    }

    fn canonical_status(filter: &str) -> Option<&'static str> {
        Visibility::parse(filter).ok().map(Visibility::as_str)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        push_some(&mut fields, self.sku.as_ref());
        push_some(&mut fields, self.vendor_name.as_ref());
        push_some(&mut fields, self.category.as_ref());
        fields
    }

    fn sort_keys() -> &'static [&'static str] {
        &["name", "price", "stock", "category", "status", "created_at"]
    }

    fn compare(&self, other: &Self, key: &str) -> Option<Ordering> {
        Some(match key {
            "name" => text(&self.name, &other.name),
            "price" => self.price.total_cmp(&other.price),
            "stock" => self.stock.cmp(&other.stock),
            "category" => optional_text(self.category.as_deref(), other.category.as_deref()),
            "status" => self.status.as_str().cmp(other.status.as_str()),
            "created_at" => self.created_at.cmp(&other.created_at),
            _ => return None,
        })
    }

    fn toggle_patch(&self) -> FieldPatch {
        FieldPatch::single("is_active", !self.status.is_active())
    }

    fn toggled_status(&self) -> &'static str {
        self.status.toggled().as_str()
    }
}

impl Resource for Coupon {
    const COLLECTION_PATH: &'static str = "/coupons";
    const PLURAL_KEY: &'static str = "coupons";
    const LABEL: &'static str = "coupon";

    type Draft = CouponDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.code
    }

    fn status_key(&self) -> &str {
        self.status.as_str()
    }

    fn canonical_status(filter: &str) -> Option<&'static str> {
        Visibility::parse(filter).ok().map(Visibility::as_str)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.discount_type.as_str()]
    }

    fn sort_keys() -> &'static [&'static str] {
        &["code", "discount_value", "used_count", "expires_at", "status"]
    }

    fn compare(&self, other: &Self, key: &str) -> Option<Ordering> {
        Some(match key {
            "code" => self.code.cmp(&other.code),
            "discount_value" => self.discount_value.total_cmp(&other.discount_value),
            "used_count" => self.used_count.cmp(&other.used_count),
            "expires_at" => self.expires_at.cmp(&other.expires_at),
            "status" => self.status.as_str().cmp(other.status.as_str()),
            _ => return None,
        })
    }

    fn toggle_patch(&self) -> FieldPatch {
        FieldPatch::single("is_active", !self.status.is_active())
    }

    fn toggled_status(&self) -> &'static str {
        self.status.toggled().as_str()
    }
}

impl Resource for Banner {
    const COLLECTION_PATH: &'static str = "/banners";
    const PLURAL_KEY: &'static str = "banners";
    const LABEL: &'static str = "banner";

    type Draft = BannerDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn status_key(&self) -> &str {
        self.status.as_str()
    }

    fn canonical_status(filter: &str) -> Option<&'static str> {
        Visibility::parse(filter).ok().map(Visibility::as_str)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        push_some(&mut fields, self.link_url.as_ref());
        fields
    }

    fn sort_keys() -> &'static [&'static str] {
        &["title", "position", "status"]
    }

    fn compare(&self, other: &Self, key: &str) -> Option<Ordering> {
        Some(match key {
            "title" => text(&self.title, &other.title),
            "position" => self.position.cmp(&other.position),
            "status" => self.status.as_str().cmp(other.status.as_str()),
            _ => return None,
        })
    }

    fn toggle_patch(&self) -> FieldPatch {
        FieldPatch::single("is_active", !self.status.is_active())
    }

    fn toggled_status(&self) -> &'static str {
        self.status.toggled().as_str()
    }
}

impl Resource for Faq {
    const COLLECTION_PATH: &'static str = "/faqs";
    const PLURAL_KEY: &'static str = "faqs";
    const LABEL: &'static str = "faq";

    type Draft = FaqDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.question
    }

    fn status_key(&self) -> &str {
        self.status.as_str()
    }

    fn canonical_status(filter: &str) -> Option<&'static str> {
        Publication::parse(filter).ok().map(Publication::as_str)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.question.as_str(), self.answer.as_str()];
        push_some(&mut fields, self.category.as_ref());
        fields
    }

    fn sort_keys() -> &'static [&'static str] {
        &["question", "category", "position", "status"]
    }

    fn compare(&self, other: &Self, key: &str) -> Option<Ordering> {
        Some(match key {
            "question" => text(&self.question, &other.question),
            "category" => optional_text(self.category.as_deref(), other.category.as_deref()),
            "position" => self.position.cmp(&other.position),
            "status" => self.status.as_str().cmp(other.status.as_str()),
            _ => return None,
        })
    }

    fn toggle_patch(&self) -> FieldPatch {
        FieldPatch::single("is_published", !self.status.is_published())
    }

    fn toggled_status(&self) -> &'static str {
        self.status.toggled().as_str()
    }
}

impl Resource for Ticket {
    const COLLECTION_PATH: &'static str = "/tickets";
    const PLURAL_KEY: &'static str = "tickets";
    const LABEL: &'static str = "ticket";
    // The server stamps `updated_at` and may reassign on status changes.
    const RECONCILE: ReconcilePolicy = ReconcilePolicy::Reload;

    type Draft = TicketDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        self.reference.as_deref().unwrap_or(&self.subject)
    }

    fn status_key(&self) -> &str {
        self.status.as_str()
    }

    fn canonical_status(filter: &str) -> Option<&'static str> {
        TicketStatus::parse(filter).ok().map(TicketStatus::as_str)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.subject.as_str()];
        push_some(&mut fields, self.reference.as_ref());
        push_some(&mut fields, self.customer_name.as_ref());
        push_some(&mut fields, self.customer_email.as_ref());
        push_some(&mut fields, self.assigned_to.as_ref());
        fields
    }

    fn sort_keys() -> &'static [&'static str] {
        &["subject", "priority", "status", "created_at", "updated_at"]
    }

    fn compare(&self, other: &Self, key: &str) -> Option<Ordering> {
        Some(match key {
            "subject" => text(&self.subject, &other.subject),
            "priority" => self.priority.cmp(&other.priority),
            "status" => self.status.as_str().cmp(other.status.as_str()),
            "created_at" => self.created_at.cmp(&other.created_at),
            "updated_at" => self.updated_at.cmp(&other.updated_at),
            _ => return None,
        })
    }

    fn toggle_patch(&self) -> FieldPatch {
        FieldPatch::single("status", self.toggled_status())
    }

    fn toggled_status(&self) -> &'static str {
        self.status.toggled().as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn vendor_toggle_flips_block_flag() {
        let vendor = Vendor::normalize(json!({
            "id": 3, "businessName": "Acme Pharma", "email": "ops@acme.test", "isBlocked": false
        }))
        .expect("vendor");
        assert_eq!(vendor.toggle_patch(), FieldPatch::single("is_blocked", true));
        assert_eq!(vendor.toggled_status(), "blocked");
    }

    #[test]
    fn vendor_status_filter_matches_approval_workflow() {
        let vendor = Vendor::normalize(json!({
            "id": "v1", "business_name": "Acme", "email": "a@x.io", "approval_status": "pending"
        }))
        .expect("vendor");
        assert!(vendor.matches_status("pending"));
        assert!(vendor.matches_status("ACTIVE"));
        assert!(!vendor.matches_status("blocked"));
    }

    #[test]
    fn status_filter_accepts_wire_aliases() {
        let admin = Admin::normalize(json!({
            "id": "a1", "name": "Ada", "email": "ada@x.io", "status": "disabled"
        }))
        .expect("admin");
        assert!(admin.matches_status("inactive"));
        assert!(admin.matches_status("Suspended"));
        assert!(!admin.matches_status("enabled"));

        let vendor = Vendor::normalize(json!({
            "id": "v2", "business_name": "Acme", "email": "a@x.io",
            "is_blocked": true, "approval_status": "rejected"
        }))
        .expect("vendor");
        assert!(vendor.matches_status("suspended"));
        assert!(vendor.matches_status("declined"));
        assert!(!vendor.matches_status("unblocked"));

        let ticket = Ticket::normalize(json!({
            "id": "t1", "subject": "Late", "status": "in_progress"
        }))
        .expect("ticket");
        assert!(ticket.matches_status("in-progress"));
    }

    #[test]
    fn flag_based_toggles_use_their_own_fields() {
        let category = Category::normalize(json!({"id": 1, "name": "Vitamins", "is_active": true}))
            .expect("category");
        assert_eq!(category.status, Visibility::Active);
        assert_eq!(category.toggle_patch(), FieldPatch::single("is_active", false));

        let faq = Faq::normalize(json!({
            "id": 2, "question": "Refunds?", "answer": "Within 30 days", "isPublished": false
        }))
        .expect("faq");
        assert_eq!(faq.status, Publication::Draft);
        assert_eq!(faq.toggle_patch(), FieldPatch::single("is_published", true));
    }

    #[test]
    fn ticket_toggle_closes_and_reopens() {
        let ticket = Ticket::normalize(json!({
            "id": 9, "subject": "Late delivery", "status": "in-progress"
        }))
        .expect("ticket");
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert_eq!(ticket.toggle_patch(), FieldPatch::single("status", "closed"));
        assert_eq!(ticket.display_name(), "Late delivery");
    }

    #[test]
    fn every_sort_key_is_comparable() {
        let admin = Admin::normalize(json!({"id": 1, "name": "Ada", "email": "a@x.io"}))
            .expect("admin");
        for key in Admin::sort_keys() {
            assert!(admin.compare(&admin, key).is_some(), "{key}");
        }
        assert!(admin.compare(&admin, "nope").is_none());
    }

    #[test]
    fn delete_prompt_names_the_record() {
        let banner = Banner::normalize(json!({
            "id": 4, "title": "Summer sale", "imageUrl": "https://cdn.test/s.png"
        }))
        .expect("banner");
        let prompt = banner.confirm_prompt(crate::MutationKind::Delete);
        assert_eq!(prompt.target_id, "4");
        assert_eq!(prompt.title, "Delete banner");
        assert!(prompt.message.contains("'Summer sale'"));
    }
}
