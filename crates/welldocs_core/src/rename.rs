use std::collections::HashMap;

/// Hands out per-document-type sequence numbers for one well, starting at 1.
///
/// A number is only consumed by [`RenameSequencer::commit`], so a skipped or
/// failed rename does not leave a gap.
#[derive(Debug, Clone, Default)]
pub struct RenameSequencer {
    next: HashMap<String, u32>,
}

impl RenameSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peek(&self, document_type: &str) -> u32 {
        self.next.get(document_type).copied().unwrap_or(1)
    }

    pub fn commit(&mut self, document_type: &str) -> u32 {
        let slot = self.next.entry(document_type.to_string()).or_insert(1);
        let used = *slot;
        *slot += 1;
        used
    }
}
