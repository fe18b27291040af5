use std::collections::BTreeSet;

/// Placeholder used for document type and content id when a row lacks the cell.
pub const UNKNOWN: &str = "unknown";

/// One input row: the listing URL and the well it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    pub source_url: String,
    pub external_id: String,
}

impl InputRecord {
    pub fn new(source_url: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            external_id: external_id.into(),
        }
    }
}

/// A single data row of the results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    pub external_id: String,
    pub document_type: String,
    pub content_id: String,
    pub link: Option<String>,
}

impl RowRecord {
    pub fn has_known_content_id(&self) -> bool {
        self.content_id != UNKNOWN
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub external_id: String,
    pub document_type: String,
    pub content_id: String,
    pub link: String,
}

impl DownloadTask {
    /// Returns `None` for rows without a document link.
    pub fn from_row(row: &RowRecord) -> Option<Self> {
        let link = row.link.clone()?;
        Some(Self {
            external_id: row.external_id.clone(),
            document_type: row.document_type.clone(),
            content_id: row.content_id.clone(),
            link,
        })
    }

    pub fn bucket(&self) -> DocumentBucket {
        DocumentBucket::classify(&self.document_type, &self.external_id)
    }
}

/// Content ids seen on one rendered page. Only compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageSnapshot {
    ids: BTreeSet<String>,
}

impl PageSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, content_id: impl Into<String>) {
        self.ids.insert(content_id.into());
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, content_id: &str) -> bool {
        self.ids.contains(content_id)
    }
}

impl<S: Into<String>> FromIterator<S> for PageSnapshot {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Download folder a document is routed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentBucket {
    WellLog,
    WellFileHistoric,
    Other { external_id: String },
}

impl DocumentBucket {
    const WELL_LOG_MARKER: &'static str = "WELL_LOG";
    const HISTORIC_MARKER: &'static str = "WELL_FILE_HISTORIC";

    pub fn classify(document_type: &str, external_id: &str) -> Self {
        let upper = document_type.to_ascii_uppercase();
        if upper.contains(Self::WELL_LOG_MARKER) {
            DocumentBucket::WellLog
        } else if upper.contains(Self::HISTORIC_MARKER) {
            DocumentBucket::WellFileHistoric
        } else {
            DocumentBucket::Other {
                external_id: external_id.to_string(),
            }
        }
    }
}
