// ==========================================
// Offshore Logistics - Conflict Handler
// ==========================================
// Scope: repeated rows inside one batch (same business key)
// Policy: keep the LAST occurrence in source order; earlier
// occurrences are dropped and reported
// Records without a business key are never de-duplicated
// ==========================================

use crate::domain::records::{
    BulkActionRecord, CostAllocationRecord, ManifestRecord, RigScheduleRecord, VoyageEventRecord,
};
use std::collections::HashMap;

/// Records that may carry a batch-level identity.
pub trait BusinessKeyed {
    fn business_key(&self) -> Option<String>;
    fn row_number(&self) -> usize;
}

/// A dropped row and the row that superseded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupersededRow {
    pub row_number: usize,
    pub kept_row: usize,
    pub key: String,
}

pub struct ConflictHandler;

impl ConflictHandler {
    /// Earlier occurrences of every repeated key, in source order.
    pub fn detect_duplicates<T: BusinessKeyed>(&self, records: &[T]) -> Vec<SupersededRow> {
        let mut last_row: HashMap<String, usize> = HashMap::new();
        for record in records {
            if let Some(key) = record.business_key() {
                last_row.insert(key, record.row_number());
            }
        }

        records
            .iter()
            .filter_map(|record| {
                let key = record.business_key()?;
                let kept_row = *last_row.get(&key)?;
                (kept_row != record.row_number()).then(|| SupersededRow {
                    row_number: record.row_number(),
                    kept_row,
                    key,
                })
            })
            .collect()
    }

    /// Drop superseded rows; survivors keep their source order.
    pub fn keep_last<T: BusinessKeyed>(&self, records: Vec<T>) -> (Vec<T>, Vec<SupersededRow>) {
        let superseded = self.detect_duplicates(&records);
        if superseded.is_empty() {
            return (records, superseded);
        }
        let dropped: std::collections::HashSet<usize> =
            superseded.iter().map(|s| s.row_number).collect();
        let kept = records
            .into_iter()
            .filter(|r| !dropped.contains(&r.row_number()))
            .collect();
        (kept, superseded)
    }
}

impl BusinessKeyed for VoyageEventRecord {
    fn business_key(&self) -> Option<String> {
        VoyageEventRecord::business_key(self)
    }
    fn row_number(&self) -> usize {
        self.row_number
    }
}

impl BusinessKeyed for ManifestRecord {
    fn business_key(&self) -> Option<String> {
        ManifestRecord::business_key(self)
    }
    fn row_number(&self) -> usize {
        self.row_number
    }
}

impl BusinessKeyed for BulkActionRecord {
    fn business_key(&self) -> Option<String> {
        BulkActionRecord::business_key(self)
    }
    fn row_number(&self) -> usize {
        self.row_number
    }
}

// cost lines and schedule entries are additive; no batch identity
impl BusinessKeyed for CostAllocationRecord {
    fn business_key(&self) -> Option<String> {
        None
    }
    fn row_number(&self) -> usize {
        self.row_number
    }
}

impl BusinessKeyed for RigScheduleRecord {
    fn business_key(&self) -> Option<String> {
        None
    }
    fn row_number(&self) -> usize {
        self.row_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Keyed {
        key: Option<&'static str>,
        row: usize,
    }

    impl BusinessKeyed for Keyed {
        fn business_key(&self) -> Option<String> {
            self.key.map(str::to_string)
        }
        fn row_number(&self) -> usize {
            self.row
        }
    }

    fn keyed(key: Option<&'static str>, row: usize) -> Keyed {
        Keyed { key, row }
    }

    #[test]
    fn test_no_duplicates() {
        let handler = ConflictHandler;
        let records = vec![keyed(Some("A"), 1), keyed(Some("B"), 2)];
        assert!(handler.detect_duplicates(&records).is_empty());
    }

    #[test]
    fn test_keep_last_occurrence() {
        let handler = ConflictHandler;
        let records = vec![
            keyed(Some("A"), 1),
            keyed(Some("B"), 2),
            keyed(Some("A"), 3),
            keyed(Some("A"), 4),
        ];
        let (kept, dropped) = handler.keep_last(records);
        assert_eq!(kept, vec![keyed(Some("B"), 2), keyed(Some("A"), 4)]);
        assert_eq!(dropped.len(), 2);
        assert_eq!(dropped[0].row_number, 1);
        assert_eq!(dropped[0].kept_row, 4);
        assert_eq!(dropped[1].row_number, 3);
    }

    #[test]
    fn test_keyless_records_never_dropped() {
        let handler = ConflictHandler;
        let records = vec![keyed(None, 1), keyed(None, 2)];
        let (kept, dropped) = handler.keep_last(records);
        assert_eq!(kept.len(), 2);
        assert!(dropped.is_empty());
    }
}
