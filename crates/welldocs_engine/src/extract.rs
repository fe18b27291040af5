use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use welldocs_core::{PageSnapshot, RowRecord, UNKNOWN};

use crate::filename::sanitize_document_type;
use crate::links::is_document_link;
use crate::Locator;

/// Column keys and selectors of the results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub table_class: String,
    /// `headers` attribute of the document type cell.
    pub document_type_key: String,
    pub content_id_key: String,
    pub document_view_key: String,
    /// Substring that marks a document view link.
    pub document_marker: String,
    pub next_control: String,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            table_class: "a-IRR-table".to_string(),
            document_type_key: "C278166632217359383".to_string(),
            content_id_key: "docname".to_string(),
            document_view_key: "docview".to_string(),
            document_marker: "dDocname".to_string(),
            next_control: r#"div.a-IRR-paginationWrap button.a-IRR-button--pagination[title="Next"]"#
                .to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub rows: Vec<RowRecord>,
    /// The primary table was absent and the first generic table was used.
    pub used_fallback: bool,
}

pub trait TableExtractor: Send + Sync {
    /// Rows of the results table, or `None` when the markup has no table at all.
    fn extract(&self, html: &str, external_id: &str) -> Option<ExtractedPage>;

    /// Content ids of the primary table only; `None` without one.
    fn primary_snapshot(&self, html: &str) -> Option<PageSnapshot>;

    /// What to wait for before reading the page.
    fn table_locator(&self) -> Locator;

    fn next_control_selector(&self) -> &str;
}

/// Extractor for Oracle APEX interactive report tables.
#[derive(Debug)]
pub struct ApexTableExtractor {
    layout: TableLayout,
    primary: Selector,
    any_table: Selector,
    row: Selector,
    document_type_cell: Selector,
    content_id_cell: Selector,
    document_view_cell: Selector,
    anchor: Selector,
}

impl ApexTableExtractor {
    pub fn new(layout: TableLayout) -> Result<Self, ExtractError> {
        Ok(Self {
            primary: parse_selector(&format!("table.{}", layout.table_class))?,
            any_table: parse_selector("table")?,
            row: parse_selector("tr")?,
            document_type_cell: header_cell(&layout.document_type_key)?,
            content_id_cell: header_cell(&layout.content_id_key)?,
            document_view_cell: header_cell(&layout.document_view_key)?,
            anchor: parse_selector("a")?,
            layout,
        })
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    fn parse_row(&self, row: ElementRef<'_>, external_id: &str) -> RowRecord {
        let document_type = row
            .select(&self.document_type_cell)
            .next()
            .map(|cell| sanitize_document_type(&cell_text(cell)))
            .unwrap_or_else(|| UNKNOWN.to_string());

        let content_id = row
            .select(&self.content_id_cell)
            .next()
            .map(cell_text)
            .unwrap_or_else(|| UNKNOWN.to_string());

        let link = row
            .select(&self.document_view_cell)
            .next()
            .and_then(|cell| cell.select(&self.anchor).next())
            .and_then(|a| a.value().attr("href"))
            .filter(|href| is_document_link(href, &self.layout.document_marker))
            .map(str::to_string);

        RowRecord {
            external_id: external_id.to_string(),
            document_type,
            content_id,
            link,
        }
    }
}

impl TableExtractor for ApexTableExtractor {
    fn extract(&self, html: &str, external_id: &str) -> Option<ExtractedPage> {
        let doc = Html::parse_document(html);
        let (table, used_fallback) = match doc.select(&self.primary).next() {
            Some(table) => (table, false),
            None => (doc.select(&self.any_table).next()?, true),
        };

        // First row is the header.
        let rows = table
            .select(&self.row)
            .skip(1)
            .map(|row| self.parse_row(row, external_id))
            .collect();

        Some(ExtractedPage {
            rows,
            used_fallback,
        })
    }

    fn primary_snapshot(&self, html: &str) -> Option<PageSnapshot> {
        let doc = Html::parse_document(html);
        let table = doc.select(&self.primary).next()?;
        Some(
            table
                .select(&self.row)
                .skip(1)
                .filter_map(|row| row.select(&self.content_id_cell).next())
                .map(cell_text)
                .collect(),
        )
    }

    fn table_locator(&self) -> Locator {
        Locator::class(self.layout.table_class.clone())
    }

    fn next_control_selector(&self) -> &str {
        &self.layout.next_control
    }
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn header_cell(key: &str) -> Result<Selector, ExtractError> {
    parse_selector(&format!(r#"td[headers="{key}"]"#))
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|err| ExtractError::Selector {
        selector: selector.to_string(),
        reason: format!("{err:?}"),
    })
}
