//! Chunked CSV reading: fixed-size byte partitions, newline-aligned.
//!
//! Large files are read in blocks (default 64 MiB) so peak memory stays
//! bounded. Each block is extended to the next newline so records never
//! split across partitions. The header line is read once up front and
//! attached to every partition; this path decodes UTF-8 only.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::IngestError;
use crate::raw_table::{RawTable, normalize_cell, normalize_header, pad_row};

/// Iterator over newline-aligned partitions of a CSV file.
///
/// Yields one [`RawTable`] per partition, all sharing the header row.
/// Partitions must be consumed strictly in order: the caller writes the
/// first in replace mode and the rest in append mode.
pub struct CsvPartitions {
    path: PathBuf,
    reader: BufReader<File>,
    headers: Vec<String>,
    chunk_bytes: usize,
    partitions_read: usize,
    finished: bool,
}

impl CsvPartitions {
    /// Open a CSV file for partitioned reading.
    pub fn open(path: &Path, chunk_bytes: usize) -> Result<Self, IngestError> {
        let file = File::open(path).map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = BufReader::new(file);

        let mut header_line = Vec::new();
        reader
            .read_until(b'\n', &mut header_line)
            .map_err(|source| IngestError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        let header_text = decode_utf8(path, &header_line)?;
        let headers = parse_header_line(path, header_text.trim_end_matches(['\r', '\n']))?;

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            finished: headers.is_empty(),
            headers,
            chunk_bytes: chunk_bytes.max(1),
            partitions_read: 0,
        })
    }

    /// Header row shared by all partitions.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of partitions yielded so far.
    pub fn partitions_read(&self) -> usize {
        self.partitions_read
    }

    fn read_block(&mut self) -> Result<Option<Vec<u8>>, IngestError> {
        let mut buf = Vec::with_capacity(self.chunk_bytes.min(1 << 20));
        let read = (&mut self.reader)
            .take(self.chunk_bytes as u64)
            .read_to_end(&mut buf)
            .map_err(|source| IngestError::FileRead {
                path: self.path.clone(),
                source,
            })?;
        if read == 0 {
            return Ok(None);
        }
        // Extend to the next newline so no record straddles partitions.
        if buf.last() != Some(&b'\n') {
            self.reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| IngestError::FileRead {
                    path: self.path.clone(),
                    source,
                })?;
        }
        Ok(Some(buf))
    }

    fn parse_block(&self, block: &[u8]) -> Result<RawTable, IngestError> {
        let text = decode_utf8(&self.path, block)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|error| IngestError::Parse {
                path: self.path.clone(),
                message: error.to_string(),
            })?;
            let cells: Vec<String> = record.iter().map(normalize_cell).collect();
            rows.push(pad_row(&cells, self.headers.len()));
        }
        Ok(RawTable::new(self.headers.clone(), rows))
    }
}

impl Iterator for CsvPartitions {
    type Item = Result<RawTable, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let block = match self.read_block() {
            Ok(Some(block)) => block,
            Ok(None) => {
                self.finished = true;
                return None;
            }
            Err(error) => {
                self.finished = true;
                return Some(Err(error));
            }
        };
        let result = self.parse_block(&block);
        if result.is_err() {
            self.finished = true;
        } else {
            self.partitions_read += 1;
            debug!(
                path = %self.path.display(),
                partition = self.partitions_read,
                bytes = block.len(),
                "partition parsed"
            );
        }
        Some(result)
    }
}

fn decode_utf8(path: &Path, bytes: &[u8]) -> Result<String, IngestError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| IngestError::Decode {
        path: path.to_path_buf(),
        tried: vec!["utf-8".to_string()],
    })
}

fn parse_header_line(path: &Path, line: &str) -> Result<Vec<String>, IngestError> {
    if line.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let Some(record) = reader.records().next() else {
        return Ok(Vec::new());
    };
    let record = record.map_err(|error| IngestError::Parse {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;
    Ok(record.iter().map(normalize_header).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn single_partition_for_small_chunk() {
        let file = write_temp("a,b\n1,2\n3,4\n");
        let parts: Vec<_> = CsvPartitions::open(file.path(), 1 << 20)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].rows, vec![vec!["1", "2"], vec!["3", "4"]]);
    }

    #[test]
    fn tiny_chunks_split_on_record_boundaries() {
        let file = write_temp("a,b\n1,2\n3,4\n5,6\n");
        let parts: Vec<_> = CsvPartitions::open(file.path(), 2)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert!(parts.len() > 1);
        let all_rows: Vec<Vec<String>> = parts.into_iter().flat_map(|p| p.rows).collect();
        assert_eq!(all_rows, vec![vec!["1", "2"], vec!["3", "4"], vec!["5", "6"]]);
    }

    #[test]
    fn header_is_shared_across_partitions() {
        let file = write_temp("x,y\n1,2\n3,4\n");
        let mut parts = CsvPartitions::open(file.path(), 4).unwrap();
        assert_eq!(parts.headers(), ["x", "y"]);
        for part in parts.by_ref() {
            assert_eq!(part.unwrap().headers, vec!["x", "y"]);
        }
    }

    #[test]
    fn empty_file_yields_no_partitions() {
        let file = write_temp("");
        let mut parts = CsvPartitions::open(file.path(), 64).unwrap();
        assert!(parts.next().is_none());
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"a,b\n\xFF\xFE,2\n").unwrap();
        file.flush().unwrap();
        let mut parts = CsvPartitions::open(file.path(), 64).unwrap();
        let err = parts.next().unwrap().unwrap_err();
        assert!(matches!(err, IngestError::Decode { .. }));
    }
}
