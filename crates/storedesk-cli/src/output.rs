//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use serde_json::json;
use storedesk_core::{DerivedView, Resource};
use storedesk_models::{Admin, Banner, Category, Coupon, Faq, Product, Rider, Ticket, Vendor};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

/// Column layout for one record type in table output.
pub(crate) trait Tabular: Resource {
    fn headers() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

pub(crate) fn render_view<R: Tabular>(view: &DerivedView<R>, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let body = json!({
                "rows": view.rows,
                "total_count": view.total_count,
                "total_pages": view.total_pages,
                "page": view.page,
            });
            print_json(&body)?;
        }
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = view.rows.iter().map(Tabular::row).collect();
            print!("{}", format_table(R::headers(), &rows));
            println!(
                "page {}/{} ({} matching)",
                view.page, view.total_pages, view.total_count
            );
        }
    }
    Ok(())
}

pub(crate) fn render_record<R: Tabular>(record: &R, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(record),
        OutputFormat::Table => {
            print!("{}", format_table(R::headers(), &[record.row()]));
            Ok(())
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

/// Left-aligned columns padded to the widest cell; the last column is not padded.
pub(crate) fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|header| (*header).to_string()).collect();
    push_line(&mut out, &widths, &header_cells);
    for row in rows {
        push_line(&mut out, &widths, row);
    }
    out
}

fn push_line(out: &mut String, widths: &[usize], cells: &[String]) {
    let last = cells.len().saturating_sub(1);
    for (index, cell) in cells.iter().enumerate() {
        if index == last {
            out.push_str(cell);
        } else {
            let width = widths.get(index).copied().unwrap_or_default();
            out.push_str(&format!("{cell:<width$}  "));
        }
    }
    out.push('\n');
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

impl Tabular for Admin {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "EMAIL", "ROLE", "STATUS"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.email.clone(),
            self.role.clone(),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Vendor {
    fn headers() -> &'static [&'static str] {
        &["ID", "BUSINESS", "OWNER", "EMAIL", "STATUS", "APPROVAL"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.business_name.clone(),
            or_dash(self.owner_name.as_deref()),
            self.email.clone(),
            self.status.to_string(),
            self.approval_status.to_string(),
        ]
    }
}

impl Tabular for Rider {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "PHONE", "VEHICLE", "STATUS"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.phone.clone(),
            or_dash(self.vehicle_type.as_deref()),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Category {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "SLUG", "PRODUCTS", "STATUS"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            or_dash(self.slug.as_deref()),
            self.product_count
                .map_or_else(|| "-".to_string(), |count| count.to_string()),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Product {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "SKU", "PRICE", "STOCK", "STATUS"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            or_dash(self.sku.as_deref()),
            money(self.price),
            self.stock.to_string(),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Coupon {
    fn headers() -> &'static [&'static str] {
        &["ID", "CODE", "DISCOUNT", "USED", "EXPIRES", "STATUS"]
    }

    fn row(&self) -> Vec<String> {
        let used = self.usage_limit.map_or_else(
            || self.used_count.to_string(),
            |limit| format!("{}/{limit}", self.used_count),
        );
        vec![
            self.id.clone(),
            self.code.clone(),
            format!("{} {}", money(self.discount_value), self.discount_type),
            used,
            self.expires_at
                .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d").to_string()),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Banner {
    fn headers() -> &'static [&'static str] {
        &["ID", "TITLE", "POSITION", "STATUS"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.position.to_string(),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Faq {
    fn headers() -> &'static [&'static str] {
        &["ID", "QUESTION", "CATEGORY", "POSITION", "STATUS"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.question.clone(),
            or_dash(self.category.as_deref()),
            self.position.to_string(),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Ticket {
    fn headers() -> &'static [&'static str] {
        &["ID", "REF", "SUBJECT", "PRIORITY", "STATUS", "ASSIGNEE"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            or_dash(self.reference.as_deref()),
            self.subject.clone(),
            self.priority.to_string(),
            self.status.to_string(),
            or_dash(self.assigned_to.as_deref()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_all_but_last_column() {
        let rows = vec![
            vec!["1".to_string(), "Ada".to_string(), "active".to_string()],
            vec!["22".to_string(), "Grace".to_string(), "disabled".to_string()],
        ];
        let table = format_table(&["ID", "NAME", "STATUS"], &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID  NAME   STATUS");
        assert_eq!(lines[1], "1   Ada    active");
        assert_eq!(lines[2], "22  Grace  disabled");
    }

    #[test]
    fn empty_table_still_has_headers() {
        assert_eq!(format_table(&["ID", "NAME"], &[]), "ID  NAME\n");
    }

    #[test]
    fn admin_row_uses_status_wire_value() {
        let admin = Admin::normalize(storedesk_test_support::fixtures::admin("7", "Ada", "inactive"))
            .expect("fixture normalizes");
        let row = admin.row();
        assert_eq!(row.len(), Admin::headers().len());
        assert_eq!(row[4], "disabled");
    }
}
