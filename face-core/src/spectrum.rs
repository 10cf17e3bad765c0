//! # Spectrum Module
//!
//! Frequency/power series, the flat table they are persisted in, and the
//! grouping step that recovers per-sequence spectra from such a table.
//!
//! ## Table Format
//! A CSV file with a header row and the columns `freq` and `power`,
//! optionally preceded by `sid`. Sequences are concatenated in corpus
//! order, each one restarting at frequency 0.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::error::TableError;

/// The frequency/power series of one score sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    freq: Vec<f64>,
    power: Vec<f64>,
}

impl Spectrum {
    /// Builds a spectrum from parallel frequency and power columns.
    ///
    /// # Panics
    /// * If the two columns differ in length
    pub fn new(freq: Vec<f64>, power: Vec<f64>) -> Self {
        assert_eq!(
            freq.len(),
            power.len(),
            "frequency and power columns must have equal length"
        );
        Self { freq, power }
    }

    pub fn freq(&self) -> &[f64] {
        &self.freq
    }

    pub fn power(&self) -> &[f64] {
        &self.power
    }

    pub fn len(&self) -> usize {
        self.freq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freq.is_empty()
    }

    /// Frequency of the bin with the largest power, ignoring NaN bins.
    pub fn peak_frequency(&self) -> Option<f64> {
        self.freq
            .iter()
            .zip(&self.power)
            .filter(|(_, p)| !p.is_nan())
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(f, _)| *f)
    }
}

/// Spectra indexed by sequence-id, in corpus order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectrumCollection {
    spectra: Vec<Spectrum>,
}

impl SpectrumCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, spectrum: Spectrum) {
        self.spectra.push(spectrum);
    }

    pub fn get(&self, sid: usize) -> Option<&Spectrum> {
        self.spectra.get(sid)
    }

    pub fn len(&self) -> usize {
        self.spectra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spectra.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Spectrum> {
        self.spectra.iter()
    }

    /// Reads a persisted table and groups it into spectra.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        Ok(SpectrumTable::load(path)?.group())
    }
}

impl From<Vec<Spectrum>> for SpectrumCollection {
    fn from(spectra: Vec<Spectrum>) -> Self {
        Self { spectra }
    }
}

impl FromIterator<Spectrum> for SpectrumCollection {
    fn from_iter<I: IntoIterator<Item = Spectrum>>(iter: I) -> Self {
        Self {
            spectra: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SpectrumCollection {
    type Item = &'a Spectrum;
    type IntoIter = std::slice::Iter<'a, Spectrum>;

    fn into_iter(self) -> Self::IntoIter {
        self.spectra.iter()
    }
}

/// Running group id for a flat frequency column.
///
/// A new group starts wherever the frequency drops below the previous
/// entry. Equal consecutive frequencies stay in the same group.
pub fn segment_ids(freqs: &[f64]) -> Vec<usize> {
    let mut group = 0;
    let mut ids = Vec::with_capacity(freqs.len());
    for (i, &f) in freqs.iter().enumerate() {
        if i > 0 && freqs[i - 1] > f {
            group += 1;
        }
        ids.push(group);
    }
    ids
}

/// Flat, column-oriented frequency/power table with one row per
/// (sequence, frequency bin).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectrumTable {
    pub sid: Option<Vec<usize>>,
    pub freq: Vec<f64>,
    pub power: Vec<f64>,
}

impl SpectrumTable {
    /// Creates an empty table, with or without the `sid` column.
    pub fn new(with_sid: bool) -> Self {
        Self {
            sid: with_sid.then(Vec::new),
            freq: Vec::new(),
            power: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.freq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freq.is_empty()
    }

    /// Appends all rows of `spectrum`, tagging them with `sid` when the
    /// table carries that column.
    pub fn push_spectrum(&mut self, sid: usize, spectrum: &Spectrum) {
        if let Some(ids) = self.sid.as_mut() {
            ids.extend(std::iter::repeat_n(sid, spectrum.len()));
        }
        self.freq.extend_from_slice(spectrum.freq());
        self.power.extend_from_slice(spectrum.power());
    }

    /// Recovers per-sequence spectra from the flat rows.
    ///
    /// A new group starts wherever the frequency drops. The `sid` column is
    /// carried for reference only and never decides the split.
    pub fn group(&self) -> SpectrumCollection {
        let ids = segment_ids(&self.freq);

        let mut collection = SpectrumCollection::new();
        let mut start = 0;
        for end in 1..=ids.len() {
            if end == ids.len() || ids[end] != ids[end - 1] {
                collection.push(Spectrum::new(
                    self.freq[start..end].to_vec(),
                    self.power[start..end].to_vec(),
                ));
                start = end;
            }
        }
        collection
    }

    /// Writes the table as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut out = WriterBuilder::new().from_writer(writer);
        let context = "write spectrum table";
        match &self.sid {
            Some(ids) => {
                out.write_record(["sid", "freq", "power"])
                    .map_err(|e| TableError::csv(context, e))?;
                for ((sid, f), p) in ids.iter().zip(&self.freq).zip(&self.power) {
                    out.write_record([sid.to_string(), f.to_string(), p.to_string()])
                        .map_err(|e| TableError::csv(context, e))?;
                }
            }
            None => {
                out.write_record(["freq", "power"])
                    .map_err(|e| TableError::csv(context, e))?;
                for (f, p) in self.freq.iter().zip(&self.power) {
                    out.write_record([f.to_string(), p.to_string()])
                        .map_err(|e| TableError::csv(context, e))?;
                }
            }
        }
        out.flush().map_err(|e| TableError::io(context, e))
    }

    /// Reads a CSV table, locating `freq`, `power` and the optional `sid`
    /// column by header name.
    pub fn read_csv<R: Read>(reader: R) -> Result<Self, TableError> {
        let context = "read spectrum table";
        let mut input = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = input
            .headers()
            .map_err(|e| TableError::csv(context, e))?
            .clone();
        let freq_col = column_index(&headers, "freq")?;
        let power_col = column_index(&headers, "power")?;
        let sid_col = headers.iter().position(|h| h == "sid");

        let mut table = Self::new(sid_col.is_some());
        for (row, record) in input.records().enumerate() {
            let record = record.map_err(|e| TableError::csv(context, e))?;
            // header is line 1
            let line = row + 2;
            table.freq.push(parse_field(&record, freq_col, line)?);
            table.power.push(parse_field(&record, power_col, line)?);
            if let (Some(col), Some(ids)) = (sid_col, table.sid.as_mut()) {
                let raw = record.get(col).unwrap_or_default();
                let sid = raw.parse::<usize>().map_err(|_| TableError::Parse {
                    line,
                    token: raw.to_string(),
                })?;
                ids.push(sid);
            }
        }
        Ok(table)
    }

    pub fn save(&self, path: &Path) -> Result<(), TableError> {
        let file = File::create(path).map_err(|e| TableError::io("create spectrum table", e))?;
        self.write_csv(BufWriter::new(file))
    }

    pub fn load(path: &Path) -> Result<Self, TableError> {
        let file = File::open(path).map_err(|e| TableError::io("open spectrum table", e))?;
        Self::read_csv(BufReader::new(file))
    }
}

fn column_index(
    headers: &StringRecord,
    name: &'static str,
) -> Result<usize, TableError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(TableError::MissingColumn(name))
}

fn parse_field(
    record: &StringRecord,
    col: usize,
    line: usize,
) -> Result<f64, TableError> {
    let raw = record.get(col).unwrap_or_default();
    raw.parse::<f64>().map_err(|_| TableError::Parse {
        line,
        token: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_spectra() -> Vec<Spectrum> {
        vec![
            Spectrum::new(vec![0.0, 0.25], vec![3.0, 1.0]),
            Spectrum::new(vec![0.0, 0.2, 0.4], vec![5.0, 0.5, 2.0]),
        ]
    }

    #[test]
    fn segment_ids_break_on_frequency_drop() {
        let freqs = [0.0, 0.1, 0.2, 0.0, 0.3, 0.1, 0.1];
        assert_eq!(segment_ids(&freqs), vec![0, 0, 0, 1, 1, 2, 2]);
    }

    #[test]
    fn grouping_without_sid_recovers_spectra() {
        let mut table = SpectrumTable::new(false);
        for (i, s) in two_spectra().iter().enumerate() {
            table.push_spectrum(i, s);
        }
        assert!(table.sid.is_none());
        assert_eq!(table.len(), 5);
        let grouped = table.group();
        assert_eq!(grouped, SpectrumCollection::from(two_spectra()));
    }

    #[test]
    fn grouping_ignores_sid_column() {
        // The single zero-frequency bin of the second sequence has no drop
        // before the third, so the two merge.
        let spectra = vec![
            Spectrum::new(vec![0.0, 0.5], vec![1.0, 2.0]),
            Spectrum::new(vec![0.0], vec![7.0]),
            Spectrum::new(vec![0.0, 0.5], vec![3.0, 4.0]),
        ];
        let mut with_sid = SpectrumTable::new(true);
        let mut without_sid = SpectrumTable::new(false);
        for (i, s) in spectra.iter().enumerate() {
            with_sid.push_spectrum(i, s);
            without_sid.push_spectrum(i, s);
        }
        assert_eq!(with_sid.sid.as_deref(), Some(&[0, 0, 1, 2, 2][..]));

        let grouped = with_sid.group();
        assert_eq!(grouped, without_sid.group());
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.get(1).unwrap().freq(), &[0.0, 0.0, 0.5]);
        assert_eq!(grouped.get(1).unwrap().power(), &[7.0, 3.0, 4.0]);
    }

    #[test]
    fn csv_round_trip_keeps_columns() {
        let mut table = SpectrumTable::new(true);
        for (i, s) in two_spectra().iter().enumerate() {
            table.push_spectrum(i, s);
        }
        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("sid,freq,power\n0,0,3\n"));

        let back = SpectrumTable::read_csv(buf.as_slice()).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn read_locates_columns_by_name() {
        let text = "power,freq\n2.5,0\n1.5,0.25\n";
        let table = SpectrumTable::read_csv(text.as_bytes()).unwrap();
        assert_eq!(table.freq, vec![0.0, 0.25]);
        assert_eq!(table.power, vec![2.5, 1.5]);
        assert!(table.sid.is_none());
    }

    #[test]
    fn read_reports_missing_column_and_bad_number() {
        let err = SpectrumTable::read_csv("freq\n0.1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn("power")));

        let err = SpectrumTable::read_csv("freq,power\n0.1,abc\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::Parse { line: 2, .. }));
    }

    #[test]
    fn peak_frequency_skips_nan() {
        let s = Spectrum::new(vec![0.0, 0.1, 0.2], vec![1.0, f64::NAN, 3.0]);
        assert_eq!(s.peak_frequency(), Some(0.2));
    }
}
