//! Decoding a saved index.

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};
use log::debug;

use crate::error::{BooldexErrorKind, BooldexResult};
use crate::index::{BooleanIndex, DocId, TermEntry};

/// Smallest possible encoded entry: term length, frequency and posting count.
const MIN_ENTRY_SIZE: u64 = 12;

/// An `IndexFileReader` does a single linear pass over an index file from
/// beginning to end, in the layout described on
/// [`IndexFileWriter`](crate::write::IndexFileWriter).
///
/// The reader knows how many bytes are left and checks every length and
/// count against that before acting on it, so a corrupt or truncated file is
/// reported as an error instead of triggering a huge allocation.
pub struct IndexFileReader<R: Read> {
    reader: R,
    remaining: u64,
}

impl<R: Read> IndexFileReader<R> {
    /// Read from `reader`, which holds exactly `len` more bytes.
    pub fn new(reader: R, len: u64) -> IndexFileReader<R> {
        IndexFileReader {
            reader,
            remaining: len,
        }
    }

    /// Fail unless `needed` more bytes are available.
    fn ensure(&self, field: &'static str, needed: u64) -> BooldexResult<()> {
        if needed > self.remaining {
            return Err(BooldexErrorKind::Truncated {
                field,
                needed,
                remaining: self.remaining,
            }
            .into());
        }
        Ok(())
    }

    fn take(&mut self, field: &'static str, needed: u64) -> BooldexResult<()> {
        self.ensure(field, needed)?;
        self.remaining -= needed;
        Ok(())
    }

    /// Read an i32 that must not be negative.
    fn read_count(&mut self, field: &'static str) -> BooldexResult<u32> {
        self.take(field, 4)?;
        let value = self.reader.read_i32::<LittleEndian>()?;
        u32::try_from(value).map_err(|_| BooldexErrorKind::NegativeField { field, value }.into())
    }

    /// Read the table size and document count.
    pub fn read_header(&mut self) -> BooldexResult<(usize, u32)> {
        self.take("table_size", 8)?;
        let table_size = self.reader.read_u64::<LittleEndian>()?;
        if table_size == 0 {
            return Err(BooldexErrorKind::EmptyTable.into());
        }
        let total_docs = self.read_count("total_docs")?;

        // Every bucket needs at least its entry count.
        self.ensure("buckets", table_size.saturating_mul(4))?;
        let table_size = usize::try_from(table_size).map_err(|_| {
            BooldexErrorKind::FieldOverflow {
                field: "table_size",
                value: table_size,
            }
        })?;
        Ok((table_size, total_docs))
    }

    /// Read one bucket: its length, then its entries.
    pub fn read_bucket(&mut self) -> BooldexResult<Vec<TermEntry>> {
        let count = self.read_count("bucket_entry_count")?;
        self.ensure("bucket_entries", u64::from(count) * MIN_ENTRY_SIZE)?;

        let mut bucket = Vec::with_capacity(count as usize);
        for _ in 0..count {
            bucket.push(self.read_entry()?);
        }
        Ok(bucket)
    }

    fn read_entry(&mut self) -> BooldexResult<TermEntry> {
        let term_len = self.read_count("term_length")?;
        self.take("term_bytes", u64::from(term_len))?;
        let mut bytes = vec![0; term_len as usize];
        self.reader.read_exact(&mut bytes)?;
        let term =
            String::from_utf8(bytes).map_err(|source| BooldexErrorKind::InvalidTerm { source })?;

        let collection_tf = self.read_count("collection_term_frequency")?;

        let posting_count = self.read_count("posting_count")?;
        self.take("posting_ids", u64::from(posting_count) * 4)?;
        let mut postings: Vec<DocId> = Vec::with_capacity(posting_count as usize);
        for _ in 0..posting_count {
            let value = self.reader.read_i32::<LittleEndian>()?;
            let doc_id = u32::try_from(value).map_err(|_| BooldexErrorKind::NegativeField {
                field: "posting_id",
                value,
            })?;
            postings.push(doc_id);
        }

        Ok(TermEntry {
            term,
            collection_tf,
            postings,
        })
    }

    /// Read a complete index.
    pub fn read_index(mut self) -> BooldexResult<BooleanIndex> {
        let (table_size, total_docs) = self.read_header()?;
        let mut table = Vec::with_capacity(table_size);
        for _ in 0..table_size {
            table.push(self.read_bucket()?);
        }
        if self.remaining > 0 {
            debug!("ignoring {} bytes after the last bucket", self.remaining);
        }
        Ok(BooleanIndex::from_parts(table, total_docs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::IndexFileWriter;

    fn encode(index: &BooleanIndex) -> Vec<u8> {
        let mut buf = vec![];
        let mut writer = IndexFileWriter::new(&mut buf);
        writer.write_index(index).unwrap();
        writer.finish().unwrap();
        buf
    }

    fn decode(bytes: &[u8]) -> BooldexResult<BooleanIndex> {
        IndexFileReader::new(bytes, bytes.len() as u64).read_index()
    }

    fn sample() -> BooleanIndex {
        let mut index = BooleanIndex::with_table_size(7);
        index.add_document(0, &["alpha", "beta", "alpha"]);
        index.add_document(1, &["beta", "gamma"]);
        index.add_document(4, &["привет"]);
        index
    }

    #[test]
    fn decodes_what_was_encoded() {
        let index = sample();
        let loaded = decode(&encode(&index)).unwrap();
        assert_eq!(loaded.table_size(), 7);
        assert_eq!(loaded.total_docs(), 5);
        assert_eq!(loaded.buckets(), index.buckets());
        assert_eq!(loaded.get_postings("beta"), Some(&[0, 1][..]));
        assert_eq!(loaded.get_collection_term_frequency("alpha"), 2);
        assert_eq!(loaded.get_postings("привет"), Some(&[4][..]));
    }

    #[test]
    fn every_truncation_is_an_error() {
        let bytes = encode(&sample());
        for cut in 0..bytes.len() {
            let err = decode(&bytes[..cut]).unwrap_err();
            assert!(err.is_corrupt_data(), "cut at {cut}: {err}");
        }
    }

    #[test]
    fn absurd_table_size_fails_before_allocating() {
        let mut bytes = vec![];
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        bytes.extend_from_slice(&0i32.to_le_bytes());
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(
            err.into_inner(),
            BooldexErrorKind::Truncated { field: "buckets", .. }
        ));
    }

    #[test]
    fn zero_table_size_is_rejected() {
        let mut bytes = vec![];
        bytes.extend_from_slice(&0u64.to_le_bytes());
        bytes.extend_from_slice(&0i32.to_le_bytes());
        assert!(matches!(
            decode(&bytes).unwrap_err().into_inner(),
            BooldexErrorKind::EmptyTable
        ));
    }

    #[test]
    fn negative_counts_are_rejected() {
        let mut bytes = vec![];
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.extend_from_slice(&0i32.to_le_bytes());
        bytes.extend_from_slice(&(-1i32).to_le_bytes());
        assert!(matches!(
            decode(&bytes).unwrap_err().into_inner(),
            BooldexErrorKind::NegativeField {
                field: "bucket_entry_count",
                value: -1
            }
        ));
    }

    #[test]
    fn non_utf8_terms_are_rejected() {
        let mut bytes = vec![];
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.push(0xFF);
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(&0i32.to_le_bytes());
        assert!(matches!(
            decode(&bytes).unwrap_err().into_inner(),
            BooldexErrorKind::InvalidTerm { .. }
        ));
    }
}
