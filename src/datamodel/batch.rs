use super::TypedRecord;
use std::sync::Arc;
use uuid::Uuid;

/// Records written to storage in a single insert.
#[derive(Debug, Clone)]
pub struct RecordBatch {
    pub folder_id: Uuid,
    pub records: Arc<Vec<TypedRecord>>,
}

impl RecordBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Splits records into batches of at most `batch_size` records, in order.
pub fn into_batches(
    folder_id: Uuid,
    records: Vec<TypedRecord>,
    batch_size: usize,
) -> Vec<RecordBatch> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::with_capacity(records.len().div_ceil(batch_size));
    let mut records = records.into_iter().peekable();
    while records.peek().is_some() {
        let chunk: Vec<TypedRecord> = records.by_ref().take(batch_size).collect();
        batches.push(RecordBatch {
            folder_id,
            records: Arc::new(chunk),
        });
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn records(count: usize) -> Vec<TypedRecord> {
        (1..=count)
            .map(|row_number| TypedRecord {
                data: BTreeMap::new(),
                row_number,
            })
            .collect()
    }

    #[test]
    fn test_into_batches() {
        let folder_id = Uuid::new_v4();
        let batches = into_batches(folder_id, records(2500), 1000);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 1000);
        assert_eq!(batches[1].len(), 1000);
        assert_eq!(batches[2].len(), 500);
        assert_eq!(batches[1].records[0].row_number, 1001);
        assert!(batches.iter().all(|batch| batch.folder_id == folder_id));
    }

    #[test]
    fn test_into_batches_exact_and_empty() {
        assert_eq!(into_batches(Uuid::nil(), records(1000), 1000).len(), 1);
        assert!(into_batches(Uuid::nil(), vec![], 1000).is_empty());
        // A zero batch size still makes progress
        assert_eq!(into_batches(Uuid::nil(), records(3), 0).len(), 3);
    }
}
