use crate::codec::{Cells, GtfsRecord, ParseMode, ParseWarning};
use crate::objects::*;
use crate::schema::{ColumnMap, RecordKind};
use crate::subset::{filter_table, subset, KeySets, Stage, SubsetOptions};
use crate::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// All the records of a feed, one sequence per file
///
/// Every sequence keeps the row order of the file it was read from. Records are only ever
/// appended by the loading functions; a subset is built as a new [Feed].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Feed {
    /// All agencies
    pub agencies: Vec<Agency>,
    /// All calendar dates
    pub calendar_dates: Vec<CalendarDate>,
    /// All routes
    pub routes: Vec<Route>,
    /// All shape points
    pub shapes: Vec<Shape>,
    /// All stop times
    pub stop_times: Vec<StopTime>,
    /// All stops
    pub stops: Vec<Stop>,
    /// All transfers
    pub transfers: Vec<Transfer>,
    /// All trips
    pub trips: Vec<Trip>,
}

type LoadFn = fn(&mut Feed, &mut dyn Read, &str, ParseMode) -> Result<Vec<ParseWarning>, Error>;
type WriteFn = fn(&Feed, &mut dyn Write, &str) -> Result<(), Error>;
type ValuesFn = for<'a> fn(&'a Feed, &str) -> Vec<&'a str>;
type SubsetFn = fn(&Feed, &mut Feed, &Stage, &mut KeySets, &SubsetOptions);

/// How to read, write and inspect the sequence of one record kind
struct Table {
    kind: RecordKind,
    load: LoadFn,
    write: WriteFn,
    values: ValuesFn,
    len: fn(&Feed) -> usize,
    subset: SubsetFn,
}

macro_rules! table {
    ($record:ty) => {
        Table {
            kind: <$record as GtfsRecord>::KIND,
            load: load_table::<$record>,
            write: write_table::<$record>,
            values: table_values::<$record>,
            len: table_len::<$record>,
            subset: filter_table::<$record>,
        }
    };
}

// Same order as RecordKind::ALL, so a kind's discriminant is its index
static TABLES: [Table; 8] = [
    table!(Agency),
    table!(CalendarDate),
    table!(Route),
    table!(Shape),
    table!(StopTime),
    table!(Stop),
    table!(Transfer),
    table!(Trip),
];

fn table(kind: RecordKind) -> &'static Table {
    &TABLES[kind as usize]
}

fn load_table<R: GtfsRecord>(
    feed: &mut Feed,
    mut reader: &mut dyn Read,
    file_name: &str,
    mode: ParseMode,
) -> Result<Vec<ParseWarning>, Error> {
    let mut head = Vec::with_capacity(3);
    (&mut reader)
        .take(3)
        .read_to_end(&mut head)
        .map_err(|e| Error::NamedFileIO {
            file_name: file_name.to_owned(),
            source: Box::new(e),
        })?;
    let skip = if head == [0xefu8, 0xbbu8, 0xbfu8] { 3 } else { 0 };
    let chained = head[skip..].chain(reader);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(chained);
    let headers = reader
        .headers()
        .map_err(|e| Error::CSVError {
            file_name: file_name.to_owned(),
            source: e,
            line_in_error: None,
        })?
        .clone();
    // Blank lines are skipped, so no header means no row at all
    if headers.is_empty() {
        debug!("{file_name} is empty, no {} read", R::KIND);
        return Ok(Vec::new());
    }
    let columns = ColumnMap::from_headers(R::KIND, headers.iter(), file_name)?;
    let missing = columns.missing_columns();
    if !missing.is_empty() {
        debug!("{file_name} has no {missing:?} columns, they are read as empty");
    }

    let mut warnings = Vec::new();
    let mut rec = csv::StringRecord::new();
    let mut line = 0;
    loop {
        match reader.read_record(&mut rec) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                return Err(Error::CSVError {
                    file_name: file_name.to_owned(),
                    source: e,
                    line_in_error: Some(crate::error::LineError {
                        headers: headers.iter().map(String::from).collect(),
                        values: rec.iter().map(String::from).collect(),
                    }),
                })
            }
        }
        line += 1;
        let mut cells = Cells::new(&rec, &columns, mode, file_name, line, &mut warnings);
        let obj = R::decode(&mut cells)?;
        R::table_mut(feed).push(obj);
    }
    Ok(warnings)
}

fn write_table<R: GtfsRecord>(
    feed: &Feed,
    writer: &mut dyn Write,
    file_name: &str,
) -> Result<(), Error> {
    let csv_error = |e| Error::CSVError {
        file_name: file_name.to_owned(),
        source: e,
        line_in_error: None,
    };
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);
    writer.write_record(R::KIND.columns()).map_err(csv_error)?;
    for obj in R::table(feed) {
        writer.write_record(obj.encode()).map_err(csv_error)?;
    }
    writer.flush().map_err(|e| Error::NamedFileIO {
        file_name: file_name.to_owned(),
        source: Box::new(e),
    })
}

fn table_values<'a, R: GtfsRecord>(feed: &'a Feed, column: &str) -> Vec<&'a str> {
    R::table(feed)
        .iter()
        .map(|obj| obj.reference(column).unwrap_or(""))
        .collect()
}

fn table_len<R: GtfsRecord>(feed: &Feed) -> usize {
    R::table(feed).len()
}

impl Feed {
    /// Appends the records of `kind` read from a CSV file
    ///
    /// Columns are matched by the names of the file's header row. Returns the cells that were
    /// replaced by zero in [ParseMode::Lenient].
    pub fn load_file<P: AsRef<Path>>(
        &mut self,
        kind: RecordKind,
        path: P,
        mode: ParseMode,
    ) -> Result<Vec<ParseWarning>, Error> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("invalid_file_name")
            .to_string();
        let file = File::open(path).map_err(|e| Error::NamedFileIO {
            file_name: file_name.clone(),
            source: Box::new(e),
        })?;
        self.load_reader(kind, BufReader::new(file), &file_name, mode)
    }

    /// Appends the records of `kind` read from any reader
    ///
    /// `file_name` is only used in diagnostics.
    pub fn load_reader<T: Read>(
        &mut self,
        kind: RecordKind,
        mut reader: T,
        file_name: &str,
        mode: ParseMode,
    ) -> Result<Vec<ParseWarning>, Error> {
        let before = self.len(kind);
        let warnings = (table(kind).load)(self, &mut reader, file_name, mode)?;
        debug!("{file_name}: {} records", self.len(kind) - before);
        Ok(warnings)
    }

    /// Writes the eight files into `dir`, creating it if needed
    ///
    /// Existing files are overwritten. Every file starts with a header row, even when the
    /// sequence is empty.
    pub fn dump<P: AsRef<Path>>(&self, dir: P) -> Result<(), Error> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        for table in &TABLES {
            let file_name = table.kind.file_name();
            let file = File::create(dir.join(file_name)).map_err(|e| Error::NamedFileIO {
                file_name: file_name.to_owned(),
                source: Box::new(e),
            })?;
            let mut writer = BufWriter::new(file);
            (table.write)(self, &mut writer, file_name)?;
        }
        Ok(())
    }

    /// Number of records of a kind
    pub fn len(&self, kind: RecordKind) -> usize {
        (table(kind).len)(self)
    }

    /// True when all eight sequences are empty
    pub fn is_empty(&self) -> bool {
        RecordKind::ALL.iter().all(|kind| self.len(*kind) == 0)
    }

    /// Values of an identifier column for every record of a kind, in row order
    ///
    /// A column that is not an identifier of `kind` yields empty strings.
    pub fn column_values(&self, kind: RecordKind, column: &str) -> Vec<&str> {
        (table(kind).values)(self, column)
    }

    /// Only keeps what belongs to one agency. See [crate::subset::subset]
    pub fn extract_agency(&self, agency_id: &str, options: &SubsetOptions) -> Feed {
        subset(self, agency_id, options)
    }

    /// Runs one subsetting stage, filling the matching sequence of `target`
    pub(crate) fn filter_into(
        &self,
        stage: &Stage,
        target: &mut Feed,
        keys: &mut KeySets,
        options: &SubsetOptions,
    ) {
        (table(stage.kind).subset)(self, target, stage, keys, options)
    }

    /// Logs the number of records of each kind. Mostly to be sure that everything was read
    pub fn print_stats(&self) {
        info!("GTFS data:");
        for kind in RecordKind::ALL {
            info!("  {}: {} records", kind, self.len(kind));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_follow_kind_order() {
        for (i, kind) in RecordKind::ALL.iter().enumerate() {
            assert_eq!(*kind, TABLES[i].kind);
            assert_eq!(i, *kind as usize);
        }
    }

    #[test]
    fn load_skips_header_and_bom() {
        let data = "\u{feff}agency_id,agency_name,agency_url,agency_timezone\nA1,Arriva,http://arriva.nl,Europe/Amsterdam\n";
        let mut feed = Feed::default();
        let warnings = feed
            .load_reader(RecordKind::Agency, data.as_bytes(), "agency.txt", ParseMode::Strict)
            .unwrap();
        assert!(warnings.is_empty());
        assert_eq!(1, feed.agencies.len());
        assert_eq!("A1", feed.agencies[0].id);
        assert_eq!("Arriva", feed.agencies[0].name);
        assert_eq!("", feed.agencies[0].phone);
    }

    #[test]
    fn load_appends() {
        let mut feed = Feed::default();
        for data in ["stop_id\nST1\nST2\n", "stop_id,stop_name\nST3,\"Dam, Amsterdam\"\n"] {
            feed.load_reader(RecordKind::Stop, data.as_bytes(), "stops.txt", ParseMode::Strict)
                .unwrap();
        }
        let ids: Vec<&str> = feed.stops.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(vec!["ST1", "ST2", "ST3"], ids);
        assert_eq!("Dam, Amsterdam", feed.stops[2].name);
        assert_eq!(3, feed.len(RecordKind::Stop));
        assert_eq!(vec!["ST1", "ST2", "ST3"], feed.column_values(RecordKind::Stop, "stop_id"));
    }

    #[test]
    fn header_only_file() {
        let mut feed = Feed::default();
        feed.load_reader(
            RecordKind::Transfer,
            "from_stop_id,to_stop_id,transfer_type\n".as_bytes(),
            "transfers.txt",
            ParseMode::Strict,
        )
        .unwrap();
        assert!(feed.is_empty());
    }

    #[test]
    fn empty_file_is_an_empty_sequence() {
        let mut feed = Feed::default();
        for data in ["", "\u{feff}", "\n\n"] {
            let warnings = feed
                .load_reader(RecordKind::Transfer, data.as_bytes(), "transfers.txt", ParseMode::Strict)
                .unwrap();
            assert!(warnings.is_empty());
        }
        assert!(feed.is_empty());
    }

    #[test]
    fn blank_header_is_a_schema_mismatch() {
        let mut feed = Feed::default();
        let err = feed
            .load_reader(RecordKind::Trip, ",\nR1,S1\n".as_bytes(), "trips.txt", ParseMode::Lenient)
            .unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { column: "route_id", .. }));
    }

    #[test]
    fn write_quotes_cells_with_commas() {
        let feed = Feed {
            agencies: vec![Agency {
                id: "A1".to_owned(),
                name: "Bus, Tram & Boot".to_owned(),
                ..Agency::default()
            }],
            ..Feed::default()
        };
        let mut out = Vec::new();
        (table(RecordKind::Agency).write)(&feed, &mut out, "agency.txt").unwrap();
        assert_eq!(
            "agency_id,agency_name,agency_url,agency_timezone,agency_phone\nA1,\"Bus, Tram & Boot\",,,\n",
            String::from_utf8(out).unwrap()
        );
    }
}
