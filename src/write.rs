//! Encoding an index for [`BooleanIndex::save`](crate::BooleanIndex::save).

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{BooldexErrorKind, BooldexResult};
use crate::index::{BooleanIndex, TermEntry};

/// Writer for saving an index in its binary form.
///
/// All integers are little-endian. The file starts with the table size as a
/// u64 and the document count as an i32. Then, for every bucket in order, an
/// i32 entry count followed by that many entries, each laid out as
///
/// ```text
/// term_length: i32, term bytes, collection_term_frequency: i32,
/// posting_count: i32, posting_count × doc id: i32
/// ```
///
/// Nothing is padded or aligned, and there is no trailer.
pub struct IndexFileWriter<W: Write> {
    /// The number of bytes written so far.
    offset: u64,

    /// Where the bytes go.
    writer: W,
}

impl<W: Write> IndexFileWriter<W> {
    /// Wrap `writer`. Nothing is written until the first call.
    pub fn new(writer: W) -> IndexFileWriter<W> {
        IndexFileWriter { offset: 0, writer }
    }

    fn write_i32(&mut self, field: &'static str, value: u64) -> BooldexResult<()> {
        let value =
            i32::try_from(value).map_err(|_| BooldexErrorKind::FieldOverflow { field, value })?;
        self.writer.write_i32::<LittleEndian>(value)?;
        self.offset += 4;
        Ok(())
    }

    /// Write the table size and document count.
    pub fn write_header(&mut self, table_size: u64, total_docs: u32) -> BooldexResult<()> {
        self.writer.write_u64::<LittleEndian>(table_size)?;
        self.offset += 8;
        self.write_i32("total_docs", u64::from(total_docs))
    }

    /// Write one bucket: its length, then its entries.
    pub fn write_bucket(&mut self, bucket: &[TermEntry]) -> BooldexResult<()> {
        self.write_i32("bucket_entry_count", bucket.len() as u64)?;
        for entry in bucket {
            self.write_entry(entry)?;
        }
        Ok(())
    }

    fn write_entry(&mut self, entry: &TermEntry) -> BooldexResult<()> {
        let bytes = entry.term.as_bytes();
        self.write_i32("term_length", bytes.len() as u64)?;
        self.writer.write_all(bytes)?;
        self.offset += bytes.len() as u64;

        self.write_i32("collection_term_frequency", u64::from(entry.collection_tf))?;
        self.write_i32("posting_count", entry.postings.len() as u64)?;
        for &doc_id in &entry.postings {
            self.write_i32("posting_id", u64::from(doc_id))?;
        }
        Ok(())
    }

    /// Write a complete index: header, then every bucket.
    pub fn write_index(&mut self, index: &BooleanIndex) -> BooldexResult<()> {
        self.write_header(index.table_size() as u64, index.total_docs())?;
        for bucket in index.buckets() {
            self.write_bucket(bucket)?;
        }
        Ok(())
    }

    /// Flush and return the total number of bytes written.
    pub fn finish(mut self) -> BooldexResult<u64> {
        self.writer.flush()?;
        Ok(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_of_a_tiny_index() {
        let mut index = BooleanIndex::with_table_size(1);
        index.add_document(0, &["hi", "hi"]);
        index.add_document(2, &["hi"]);

        let mut buf = vec![];
        let mut writer = IndexFileWriter::new(&mut buf);
        writer.write_index(&index).unwrap();
        let nbytes = writer.finish().unwrap();

        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            1, 0, 0, 0, 0, 0, 0, 0, // table_size
            3, 0, 0, 0,             // total_docs
            1, 0, 0, 0,             // bucket 0: one entry
            2, 0, 0, 0, b'h', b'i', // term
            3, 0, 0, 0,             // collection frequency
            2, 0, 0, 0,             // posting count
            0, 0, 0, 0,
            2, 0, 0, 0,
        ];
        assert_eq!(buf, expected);
        assert_eq!(nbytes, expected.len() as u64);
    }

    #[test]
    fn ids_beyond_i32_are_refused() {
        let mut index = BooleanIndex::with_table_size(1);
        index.add_document(u32::MAX - 1, &["big"]);

        let mut buf = vec![];
        let err = IndexFileWriter::new(&mut buf).write_index(&index).unwrap_err();
        assert!(matches!(
            err.into_inner(),
            BooldexErrorKind::FieldOverflow { field: "total_docs", .. }
        ));
    }
}
