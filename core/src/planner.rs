//! Splits validated records into output files.
//!
//! RULE: One chunk keeps the bare base name; several chunks are named
//! `{base}_{i}of{N}`. Every file after the first points at the first.

use crate::types::{EntityId, FileFormat};
use uuid::Uuid;

/// One planned output file and the records it will carry.
#[derive(Debug, Clone)]
pub struct PaymentFileAssoc<T> {
    pub file_id: EntityId,
    pub file_name: String,
    /// 1-based position within the batch.
    pub sequence_number: i64,
    pub total_file_count: i64,
    pub parent_file_id: Option<EntityId>,
    pub records: Vec<T>,
}

pub fn plan_files<T>(
    records: Vec<T>,
    max_per_file: i64,
    base_name: &str,
    format: FileFormat,
) -> Vec<PaymentFileAssoc<T>> {
    if records.is_empty() {
        return Vec::new();
    }

    let chunk_size = if max_per_file <= 0 {
        records.len()
    } else {
        max_per_file as usize
    };

    let mut chunks: Vec<Vec<T>> = Vec::new();
    let mut current = Vec::with_capacity(chunk_size.min(records.len()));
    for record in records {
        current.push(record);
        if current.len() == chunk_size {
            chunks.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    let total = chunks.len();
    let ext = format.extension();
    let mut parent: Option<EntityId> = None;

    chunks
        .into_iter()
        .enumerate()
        .map(|(i, records)| {
            let sequence = i + 1;
            let file_name = if total == 1 {
                format!("{base_name}.{ext}")
            } else {
                format!("{base_name}_{sequence}of{total}.{ext}")
            };
            let file_id = Uuid::new_v4().to_string();
            let parent_file_id = parent.clone();
            if parent.is_none() {
                parent = Some(file_id.clone());
            }
            PaymentFileAssoc {
                file_id,
                file_name,
                sequence_number: sequence as i64,
                total_file_count: total as i64,
                parent_file_id,
                records,
            }
        })
        .collect()
}
