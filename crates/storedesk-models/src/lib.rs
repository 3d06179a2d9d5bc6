#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(
    missing_docs,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]
//! Shared HTTP DTOs for the Storedesk admin API.
//!
//! The backend is inconsistent about envelope shapes, field casing, and status
//! flags. Every record type here is deserialized through a private wire DTO
//! that tolerates those variations and normalizes them into a single
//! component-facing shape. Records serialize back to canonical snake_case.

pub mod draft;
pub mod envelope;
pub mod error;
pub mod patch;
pub mod status;

mod catalog;
mod people;
mod promotions;
mod support;
mod wire;

pub use catalog::{Category, CategoryDraft, Product, ProductDraft};
pub use draft::Draft;
pub use envelope::Envelope;
pub use error::NormalizeError;
pub use patch::FieldPatch;
pub use people::{Admin, AdminDraft, Rider, RiderDraft, Vendor, VendorDraft};
pub use promotions::{Banner, BannerDraft, Coupon, CouponDraft, DiscountType};
pub use status::{
    AccountStatus, ApprovalStatus, Publication, TicketPriority, TicketStatus, VendorStatus,
    Visibility,
};
pub use support::{Faq, FaqDraft, Ticket, TicketDraft};
