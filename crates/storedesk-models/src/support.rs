//! Customer-service resources: FAQ entries and support tickets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::draft::{
    Draft, optional_text, parse_optional_i32, required_text, unknown_field, value_field,
};
use crate::error::NormalizeError;
use crate::patch::FieldPatch;
use crate::status::{Publication, TicketPriority, TicketStatus, resolve_status};
use crate::wire;

/// Help-centre question and answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FaqWire")]
pub struct Faq {
    /// Opaque identifier.
    pub id: String,
    /// Question text.
    pub question: String,
    /// Answer body (may contain markup).
    pub answer: String,
    /// Help-centre section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Order within the section, ascending.
    pub position: i32,
    /// Live/draft state.
    pub status: Publication,
}

#[derive(Deserialize)]
struct FaqWire {
    #[serde(deserialize_with = "wire::id", alias = "_id")]
    id: String,
    #[serde(default, alias = "title")]
    question: String,
    #[serde(default, alias = "body", alias = "content")]
    answer: String,
    #[serde(default, alias = "section")]
    category: Option<String>,
    #[serde(default, alias = "sort_order", alias = "sortOrder", alias = "order")]
    position: i32,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, alias = "isPublished", alias = "published")]
    is_published: Option<bool>,
}

impl TryFrom<FaqWire> for Faq {
    type Error = NormalizeError;

    fn try_from(value: FaqWire) -> Result<Self, Self::Error> {
        let status = resolve_status(
            value.is_published,
            Publication::from_published,
            value.status.as_deref(),
            Publication::parse,
            Publication::Draft,
        )?;
        Ok(Self {
            id: wire::required("id", value.id)?,
            question: value.question,
            answer: value.answer,
            category: wire::non_blank(value.category),
            position: value.position,
            status,
        })
    }
}

/// Create/edit form for [`Faq`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaqDraft {
    /// Record being edited; `None` when creating.
    pub id: Option<String>,
    /// Question input.
    pub question: String,
    /// Answer input.
    pub answer: String,
    /// Section input.
    pub category: String,
    /// Position input.
    pub position: String,
}

impl Draft for FaqDraft {
    type Record = Faq;

    fn from_record(record: &Faq) -> Self {
        Self {
            id: Some(record.id.clone()),
            question: record.question.clone(),
            answer: record.answer.clone(),
            category: record.category.clone().unwrap_or_default(),
            position: record.position.to_string(),
        }
    }

    fn target_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_field(&mut self, key: &str, value: String) -> Result<(), String> {
        match key {
            "question" => self.question = value,
            "answer" => self.answer = value,
            "category" => self.category = value,
            "position" => self.position = value,
            _ => return Err(unknown_field(key)),
        }
        Ok(())
    }

    fn to_patch(&self, original: Option<&Faq>) -> Result<FieldPatch, String> {
        let mut patch = FieldPatch::new();
        required_text(
            &mut patch,
            "question",
            "question",
            &self.question,
            original.map(|faq| faq.question.as_str()),
        )?;
        required_text(
            &mut patch,
            "answer",
            "answer",
            &self.answer,
            original.map(|faq| faq.answer.as_str()),
        )?;
        optional_text(
            &mut patch,
            "category",
            &self.category,
            original.and_then(|faq| faq.category.as_deref()),
        );
        let position = parse_optional_i32("position", &self.position)?.unwrap_or(0);
        value_field(
            &mut patch,
            "position",
            Some(position),
            original.map(|faq| faq.position),
        );
        Ok(patch)
    }
}

/// Customer-service ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TicketWire")]
pub struct Ticket {
    /// Opaque identifier.
    pub id: String,
    /// Human-facing reference (`TCK-1042`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Subject line.
    pub subject: String,
    /// Reporting customer's name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Reporting customer's email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    /// Urgency.
    pub priority: TicketPriority,
    /// Lifecycle state.
    pub status: TicketStatus,
    /// Agent currently handling the ticket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last activity time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct TicketWire {
    #[serde(deserialize_with = "wire::id", alias = "_id")]
    id: String,
    #[serde(
        default,
        alias = "ticketNumber",
        alias = "ticket_number",
        alias = "ticketId"
    )]
    reference: Option<String>,
    #[serde(default, alias = "title")]
    subject: String,
    #[serde(default, alias = "customerName", alias = "user_name", alias = "userName")]
    customer_name: Option<String>,
    #[serde(default, alias = "customerEmail", alias = "user_email", alias = "userEmail")]
    customer_email: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, alias = "assignedTo", alias = "assignee")]
    assigned_to: Option<String>,
    #[serde(default, alias = "createdAt")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt")]
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<TicketWire> for Ticket {
    type Error = NormalizeError;

    fn try_from(value: TicketWire) -> Result<Self, Self::Error> {
        let priority = match wire::non_blank(value.priority) {
            Some(raw) => TicketPriority::parse(&raw)?,
            None => TicketPriority::Medium,
        };
        let status = match wire::non_blank(value.status) {
            Some(raw) => TicketStatus::parse(&raw)?,
            None => TicketStatus::Open,
        };
        Ok(Self {
            id: wire::required("id", value.id)?,
            reference: wire::non_blank(value.reference),
            subject: value.subject,
            customer_name: wire::non_blank(value.customer_name),
            customer_email: wire::non_blank(value.customer_email),
            priority,
            status,
            assigned_to: wire::non_blank(value.assigned_to),
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

/// Create/edit form for [`Ticket`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TicketDraft {
    /// Record being edited; `None` when creating.
    pub id: Option<String>,
    /// Subject input.
    pub subject: String,
    /// Customer email input.
    pub customer_email: String,
    /// Priority input; blank keeps current (or `medium` on create).
    pub priority: String,
    /// Status input; blank keeps current (or `open` on create).
    pub status: String,
    /// Assignee input.
    pub assigned_to: String,
}

impl Draft for TicketDraft {
    type Record = Ticket;

    fn from_record(record: &Ticket) -> Self {
        Self {
            id: Some(record.id.clone()),
            subject: record.subject.clone(),
            customer_email: record.customer_email.clone().unwrap_or_default(),
            priority: record.priority.as_str().to_string(),
            status: record.status.as_str().to_string(),
            assigned_to: record.assigned_to.clone().unwrap_or_default(),
        }
    }

    fn target_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_field(&mut self, key: &str, value: String) -> Result<(), String> {
        match key {
            "subject" => self.subject = value,
            "customer_email" | "email" => self.customer_email = value,
            "priority" => self.priority = value,
            "status" => self.status = value,
            "assigned_to" | "assignee" => self.assigned_to = value,
            _ => return Err(unknown_field(key)),
        }
        Ok(())
    }

    fn to_patch(&self, original: Option<&Ticket>) -> Result<FieldPatch, String> {
        let mut patch = FieldPatch::new();
        required_text(
            &mut patch,
            "subject",
            "subject",
            &self.subject,
            original.map(|ticket| ticket.subject.as_str()),
        )?;
        optional_text(
            &mut patch,
            "customer_email",
            &self.customer_email,
            original.and_then(|ticket| ticket.customer_email.as_deref()),
        );
        let priority = if self.priority.trim().is_empty() {
            original.map_or(TicketPriority::Medium, |ticket| ticket.priority)
        } else {
            TicketPriority::parse(&self.priority).map_err(|err| err.to_string())?
        };
        value_field(
            &mut patch,
            "priority",
            Some(priority),
            original.map(|ticket| ticket.priority),
        );
        let status = if self.status.trim().is_empty() {
            original.map_or(TicketStatus::Open, |ticket| ticket.status)
        } else {
            TicketStatus::parse(&self.status).map_err(|err| err.to_string())?
        };
        value_field(
            &mut patch,
            "status",
            Some(status),
            original.map(|ticket| ticket.status),
        );
        optional_text(
            &mut patch,
            "assigned_to",
            &self.assigned_to,
            original.and_then(|ticket| ticket.assigned_to.as_deref()),
        );
        Ok(patch)
    }
}
