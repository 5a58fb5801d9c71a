//! Conversion between one CSV row and one typed record
//!
//! Cells are looked up through a [ColumnMap], never by a fixed position. Text columns are passed
//! through untouched. Numeric columns are parsed without any locale; how an unparsable cell is
//! handled depends on the [ParseMode].
use crate::objects::*;
use crate::schema::{ColumnMap, RecordKind};
use crate::{Error, Feed};
use std::fmt;
use std::str::FromStr;

/// What to do with a numeric cell that cannot be parsed
///
/// Empty cells are always read as zero, in both modes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// The value becomes zero and a [ParseWarning] is reported
    #[default]
    Lenient,
    /// Reading fails with [Error::MalformedCell]
    Strict,
}

/// A numeric cell that was replaced by zero while reading in [ParseMode::Lenient]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// File containing the cell
    pub file_name: String,
    /// 1-based data row, the header not counted
    pub line: usize,
    /// Canonical column of the cell
    pub column: &'static str,
    /// Raw cell content
    pub value: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} line {}: '{}' is not a valid {}, read as 0",
            self.file_name, self.line, self.value, self.column
        )
    }
}

/// Read access to the cells of one data row
pub struct Cells<'r> {
    record: &'r csv::StringRecord,
    columns: &'r ColumnMap,
    mode: ParseMode,
    file_name: &'r str,
    line: usize,
    warnings: &'r mut Vec<ParseWarning>,
}

impl<'r> Cells<'r> {
    /// Wraps a row; `line` is the 1-based data row used in diagnostics
    pub fn new(
        record: &'r csv::StringRecord,
        columns: &'r ColumnMap,
        mode: ParseMode,
        file_name: &'r str,
        line: usize,
        warnings: &'r mut Vec<ParseWarning>,
    ) -> Self {
        Self {
            record,
            columns,
            mode,
            file_name,
            line,
            warnings,
        }
    }

    /// Raw content of a column; empty when the file lacks the column or the row is short
    pub fn raw(&self, column: &str) -> &'r str {
        self.columns
            .position(column)
            .and_then(|i| self.record.get(i))
            .unwrap_or("")
    }

    /// A text column, unmodified
    pub fn text(&self, column: &str) -> String {
        self.raw(column).to_owned()
    }

    /// A numeric column
    pub fn number<T>(&mut self, column: &'static str) -> Result<T, Error>
    where
        T: FromStr + Default,
    {
        let raw = self.raw(column);
        if raw.is_empty() {
            return Ok(T::default());
        }
        match raw.parse() {
            Ok(value) => Ok(value),
            Err(_) => match self.mode {
                ParseMode::Strict => Err(Error::MalformedCell {
                    file_name: self.file_name.to_owned(),
                    line: self.line,
                    column,
                    value: raw.to_owned(),
                }),
                ParseMode::Lenient => {
                    self.warnings.push(ParseWarning {
                        file_name: self.file_name.to_owned(),
                        line: self.line,
                        column,
                        value: raw.to_owned(),
                    });
                    Ok(T::default())
                }
            },
        }
    }
}

/// A record type stored in one file of a feed
pub trait GtfsRecord: Sized + Clone + 'static {
    /// The file this record type is stored in
    const KIND: RecordKind;

    /// Builds a record from one data row
    fn decode(cells: &mut Cells<'_>) -> Result<Self, Error>;

    /// Cells of the record, in the canonical column order of [Self::KIND]
    fn encode(&self) -> Vec<String>;

    /// Value of an identifier column, `None` if `column` is not one of this type's identifiers
    fn reference(&self, column: &str) -> Option<&str>;

    /// The sequence of this type inside a feed
    fn table(feed: &Feed) -> &Vec<Self>;

    /// Mutable access to the sequence of this type inside a feed
    fn table_mut(feed: &mut Feed) -> &mut Vec<Self>;
}

fn int<T: ToString>(value: T) -> String {
    value.to_string()
}

// `Display` for f64 gives the shortest representation that parses back to the same value
fn float(value: f64) -> String {
    value.to_string()
}

impl GtfsRecord for Agency {
    const KIND: RecordKind = RecordKind::Agency;

    fn decode(cells: &mut Cells<'_>) -> Result<Self, Error> {
        Ok(Self {
            id: cells.text("agency_id"),
            name: cells.text("agency_name"),
            url: cells.text("agency_url"),
            timezone: cells.text("agency_timezone"),
            phone: cells.text("agency_phone"),
        })
    }

    fn encode(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.url.clone(),
            self.timezone.clone(),
            self.phone.clone(),
        ]
    }

    fn reference(&self, column: &str) -> Option<&str> {
        match column {
            "agency_id" => Some(&self.id),
            _ => None,
        }
    }

    fn table(feed: &Feed) -> &Vec<Self> {
        &feed.agencies
    }

    fn table_mut(feed: &mut Feed) -> &mut Vec<Self> {
        &mut feed.agencies
    }
}

impl GtfsRecord for CalendarDate {
    const KIND: RecordKind = RecordKind::CalendarDate;

    fn decode(cells: &mut Cells<'_>) -> Result<Self, Error> {
        Ok(Self {
            service_id: cells.text("service_id"),
            date: cells.text("date"),
            exception_type: cells.number("exception_type")?,
        })
    }

    fn encode(&self) -> Vec<String> {
        vec![
            self.service_id.clone(),
            self.date.clone(),
            int(self.exception_type),
        ]
    }

    fn reference(&self, column: &str) -> Option<&str> {
        match column {
            "service_id" => Some(&self.service_id),
            _ => None,
        }
    }

    fn table(feed: &Feed) -> &Vec<Self> {
        &feed.calendar_dates
    }

    fn table_mut(feed: &mut Feed) -> &mut Vec<Self> {
        &mut feed.calendar_dates
    }
}

impl GtfsRecord for Route {
    const KIND: RecordKind = RecordKind::Route;

    fn decode(cells: &mut Cells<'_>) -> Result<Self, Error> {
        Ok(Self {
            id: cells.text("route_id"),
            agency_id: cells.text("agency_id"),
            external_code: cells.text("external_code"),
            short_name: cells.text("route_short_name"),
            long_name: cells.text("route_long_name"),
            desc: cells.text("route_desc"),
            route_type: cells.text("route_type"),
            color: cells.text("route_color"),
            text_color: cells.text("route_text_color"),
            url: cells.text("route_url"),
        })
    }

    fn encode(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.agency_id.clone(),
            self.external_code.clone(),
            self.short_name.clone(),
            self.long_name.clone(),
            self.desc.clone(),
            self.route_type.clone(),
            self.color.clone(),
            self.text_color.clone(),
            self.url.clone(),
        ]
    }

    fn reference(&self, column: &str) -> Option<&str> {
        match column {
            "route_id" => Some(&self.id),
            "agency_id" => Some(&self.agency_id),
            _ => None,
        }
    }

    fn table(feed: &Feed) -> &Vec<Self> {
        &feed.routes
    }

    fn table_mut(feed: &mut Feed) -> &mut Vec<Self> {
        &mut feed.routes
    }
}

impl GtfsRecord for Shape {
    const KIND: RecordKind = RecordKind::Shape;

    fn decode(cells: &mut Cells<'_>) -> Result<Self, Error> {
        Ok(Self {
            id: cells.text("shape_id"),
            sequence: cells.number("shape_pt_sequence")?,
            latitude: cells.number("shape_pt_lat")?,
            longitude: cells.number("shape_pt_lon")?,
            dist_traveled: cells.number("shape_dist_traveled")?,
        })
    }

    fn encode(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            int(self.sequence),
            float(self.latitude),
            float(self.longitude),
            float(self.dist_traveled),
        ]
    }

    fn reference(&self, column: &str) -> Option<&str> {
        match column {
            "shape_id" => Some(&self.id),
            _ => None,
        }
    }

    fn table(feed: &Feed) -> &Vec<Self> {
        &feed.shapes
    }

    fn table_mut(feed: &mut Feed) -> &mut Vec<Self> {
        &mut feed.shapes
    }
}

impl GtfsRecord for StopTime {
    const KIND: RecordKind = RecordKind::StopTime;

    fn decode(cells: &mut Cells<'_>) -> Result<Self, Error> {
        Ok(Self {
            trip_id: cells.text("trip_id"),
            stop_sequence: cells.number("stop_sequence")?,
            stop_id: cells.text("stop_id"),
            stop_headsign: cells.text("stop_headsign"),
            arrival_time: cells.text("arrival_time"),
            departure_time: cells.text("departure_time"),
            pickup_type: cells.number("pickup_type")?,
            drop_off_type: cells.number("drop_off_type")?,
            timepoint: cells.number("timepoint")?,
            shape_dist_traveled: cells.number("shape_dist_traveled")?,
            fare_units_traveled: cells.number("fare_units_traveled")?,
        })
    }

    fn encode(&self) -> Vec<String> {
        vec![
            self.trip_id.clone(),
            int(self.stop_sequence),
            self.stop_id.clone(),
            self.stop_headsign.clone(),
            self.arrival_time.clone(),
            self.departure_time.clone(),
            int(self.pickup_type),
            int(self.drop_off_type),
            int(self.timepoint),
            float(self.shape_dist_traveled),
            int(self.fare_units_traveled),
        ]
    }

    fn reference(&self, column: &str) -> Option<&str> {
        match column {
            "trip_id" => Some(&self.trip_id),
            "stop_id" => Some(&self.stop_id),
            _ => None,
        }
    }

    fn table(feed: &Feed) -> &Vec<Self> {
        &feed.stop_times
    }

    fn table_mut(feed: &mut Feed) -> &mut Vec<Self> {
        &mut feed.stop_times
    }
}

impl GtfsRecord for Stop {
    const KIND: RecordKind = RecordKind::Stop;

    fn decode(cells: &mut Cells<'_>) -> Result<Self, Error> {
        Ok(Self {
            id: cells.text("stop_id"),
            code: cells.text("stop_code"),
            name: cells.text("stop_name"),
            latitude: cells.number("stop_lat")?,
            longitude: cells.number("stop_lon")?,
            location_type: cells.number("location_type")?,
            parent_station: cells.text("parent_station"),
            timezone: cells.text("stop_timezone"),
            wheelchair_boarding: cells.number("wheelchair_boarding")?,
            platform_code: cells.text("platform_code"),
            zone_id: cells.text("zone_id"),
        })
    }

    fn encode(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.code.clone(),
            self.name.clone(),
            float(self.latitude),
            float(self.longitude),
            int(self.location_type),
            self.parent_station.clone(),
            self.timezone.clone(),
            int(self.wheelchair_boarding),
            self.platform_code.clone(),
            self.zone_id.clone(),
        ]
    }

    fn reference(&self, column: &str) -> Option<&str> {
        match column {
            "stop_id" => Some(&self.id),
            "parent_station" => Some(&self.parent_station),
            _ => None,
        }
    }

    fn table(feed: &Feed) -> &Vec<Self> {
        &feed.stops
    }

    fn table_mut(feed: &mut Feed) -> &mut Vec<Self> {
        &mut feed.stops
    }
}

impl GtfsRecord for Transfer {
    const KIND: RecordKind = RecordKind::Transfer;

    fn decode(cells: &mut Cells<'_>) -> Result<Self, Error> {
        Ok(Self {
            from_stop_id: cells.text("from_stop_id"),
            to_stop_id: cells.text("to_stop_id"),
            from_route_id: cells.text("from_route_id"),
            to_route_id: cells.text("to_route_id"),
            from_trip_id: cells.text("from_trip_id"),
            to_trip_id: cells.text("to_trip_id"),
            transfer_type: cells.number("transfer_type")?,
        })
    }

    fn encode(&self) -> Vec<String> {
        vec![
            self.from_stop_id.clone(),
            self.to_stop_id.clone(),
            self.from_route_id.clone(),
            self.to_route_id.clone(),
            self.from_trip_id.clone(),
            self.to_trip_id.clone(),
            int(self.transfer_type),
        ]
    }

    fn reference(&self, column: &str) -> Option<&str> {
        match column {
            "from_stop_id" => Some(&self.from_stop_id),
            "to_stop_id" => Some(&self.to_stop_id),
            "from_route_id" => Some(&self.from_route_id),
            "to_route_id" => Some(&self.to_route_id),
            "from_trip_id" => Some(&self.from_trip_id),
            "to_trip_id" => Some(&self.to_trip_id),
            _ => None,
        }
    }

    fn table(feed: &Feed) -> &Vec<Self> {
        &feed.transfers
    }

    fn table_mut(feed: &mut Feed) -> &mut Vec<Self> {
        &mut feed.transfers
    }
}

impl GtfsRecord for Trip {
    const KIND: RecordKind = RecordKind::Trip;

    fn decode(cells: &mut Cells<'_>) -> Result<Self, Error> {
        Ok(Self {
            route_id: cells.text("route_id"),
            service_id: cells.text("service_id"),
            id: cells.text("trip_id"),
            realtime_trip_id: cells.text("realtime_trip_id"),
            trip_headsign: cells.text("trip_headsign"),
            trip_short_name: cells.text("trip_short_name"),
            trip_long_name: cells.text("trip_long_name"),
            direction_id: cells.number("direction_id")?,
            block_id: cells.text("block_id"),
            shape_id: cells.text("shape_id"),
            wheelchair_accessible: cells.number("wheelchair_accessible")?,
            bikes_allowed: cells.number("bikes_allowed")?,
        })
    }

    fn encode(&self) -> Vec<String> {
        vec![
            self.route_id.clone(),
            self.service_id.clone(),
            self.id.clone(),
            self.realtime_trip_id.clone(),
            self.trip_headsign.clone(),
            self.trip_short_name.clone(),
            self.trip_long_name.clone(),
            int(self.direction_id),
            self.block_id.clone(),
            self.shape_id.clone(),
            int(self.wheelchair_accessible),
            int(self.bikes_allowed),
        ]
    }

    fn reference(&self, column: &str) -> Option<&str> {
        match column {
            "route_id" => Some(&self.route_id),
            "service_id" => Some(&self.service_id),
            "trip_id" => Some(&self.id),
            "shape_id" => Some(&self.shape_id),
            _ => None,
        }
    }

    fn table(feed: &Feed) -> &Vec<Self> {
        &feed.trips
    }

    fn table_mut(feed: &mut Feed) -> &mut Vec<Self> {
        &mut feed.trips
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode<R: GtfsRecord>(
        headers: &[&str],
        row: &[&str],
        mode: ParseMode,
    ) -> (Result<R, Error>, Vec<ParseWarning>) {
        let columns =
            ColumnMap::from_headers(R::KIND, headers.iter().copied(), R::KIND.file_name()).unwrap();
        let record = csv::StringRecord::from(row.to_vec());
        let mut warnings = Vec::new();
        let mut cells = Cells::new(
            &record,
            &columns,
            mode,
            R::KIND.file_name(),
            1,
            &mut warnings,
        );
        let decoded = R::decode(&mut cells);
        (decoded, warnings)
    }

    fn reencode<R: GtfsRecord>(record: &R) -> R {
        let columns = ColumnMap::canonical(R::KIND);
        let row = csv::StringRecord::from(record.encode());
        let mut warnings = Vec::new();
        let mut cells = Cells::new(&row, &columns, ParseMode::Strict, "", 1, &mut warnings);
        let decoded = R::decode(&mut cells).unwrap();
        assert!(warnings.is_empty());
        decoded
    }

    #[test]
    fn stop_by_name() {
        let (stop, warnings) = decode::<Stop>(
            &["stop_name", "stop_lon", "stop_id", "stop_lat", "parent_station"],
            &["Centraal, perron 3", "4.9003", "ST1", "52.3789", "STATION"],
            ParseMode::Strict,
        );
        let stop = stop.unwrap();
        assert!(warnings.is_empty());
        assert_eq!("ST1", stop.id);
        assert_eq!("Centraal, perron 3", stop.name);
        assert_eq!(52.3789, stop.latitude);
        assert_eq!(4.9003, stop.longitude);
        assert_eq!("STATION", stop.parent_station);
        assert_eq!("", stop.zone_id);
        assert_eq!(0, stop.location_type);
    }

    #[test]
    fn identifiers_are_not_normalized() {
        let (route, _) = decode::<Route>(
            &["route_id", "agency_id"],
            &[" R1 ", "arr"],
            ParseMode::Strict,
        );
        let route = route.unwrap();
        assert_eq!(" R1 ", route.id);
        assert_eq!("arr", route.agency_id);
    }

    #[test]
    fn short_row_reads_empty_cells() {
        let (trip, warnings) = decode::<Trip>(
            &["route_id", "service_id", "trip_id", "direction_id", "shape_id"],
            &["R1", "S1", "T1"],
            ParseMode::Strict,
        );
        let trip = trip.unwrap();
        assert!(warnings.is_empty());
        assert_eq!(0, trip.direction_id);
        assert_eq!("", trip.shape_id);
    }

    #[test]
    fn lenient_mode_reports_coerced_cells() {
        let (stop_time, warnings) = decode::<StopTime>(
            &["trip_id", "stop_sequence", "stop_id", "pickup_type", "drop_off_type"],
            &["T1", "first", "ST1", "", "1"],
            ParseMode::Lenient,
        );
        let stop_time = stop_time.unwrap();
        assert_eq!(0, stop_time.stop_sequence);
        assert_eq!(0, stop_time.pickup_type);
        assert_eq!(1, stop_time.drop_off_type);
        // The empty cell is not a warning, only the unparsable one
        assert_eq!(
            vec![ParseWarning {
                file_name: "stop_times.txt".to_owned(),
                line: 1,
                column: "stop_sequence",
                value: "first".to_owned(),
            }],
            warnings
        );
    }

    #[test]
    fn dates_are_kept_as_written() {
        for mode in [ParseMode::Lenient, ParseMode::Strict] {
            let (date, warnings) = decode::<CalendarDate>(
                &["service_id", "date", "exception_type"],
                &["S1", "2024-01-01", "1"],
                mode,
            );
            let date = date.unwrap();
            assert!(warnings.is_empty());
            assert_eq!("2024-01-01", date.date);
            assert_eq!(vec!["S1", "2024-01-01", "1"], date.encode());
        }
    }

    #[test]
    fn strict_mode_rejects_malformed_cells() {
        let (shape, warnings) = decode::<Shape>(
            &["shape_id", "shape_pt_sequence", "shape_pt_lat", "shape_pt_lon"],
            &["SH1", "1", "north", "4.9"],
            ParseMode::Strict,
        );
        assert!(warnings.is_empty());
        match shape {
            Err(Error::MalformedCell { column, value, .. }) => {
                assert_eq!("shape_pt_lat", column);
                assert_eq!("north", value);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn encode_in_canonical_order() {
        let transfer = Transfer {
            from_stop_id: "ST1".to_owned(),
            to_stop_id: "ST2".to_owned(),
            from_trip_id: "T1".to_owned(),
            transfer_type: 2,
            ..Transfer::default()
        };
        assert_eq!(
            vec!["ST1", "ST2", "", "", "T1", "", "2"],
            transfer.encode()
        );
        assert_eq!(RecordKind::Transfer.columns().len(), transfer.encode().len());
    }

    #[test]
    fn numbers_are_written_in_shortest_form() {
        let shape = Shape {
            id: "SH1".to_owned(),
            sequence: 7,
            latitude: 52.0,
            longitude: 4.9003,
            dist_traveled: 0.1,
        };
        assert_eq!(
            vec!["SH1", "7", "52", "4.9003", "0.1"],
            shape.encode()
        );
    }

    #[test]
    fn reencoding_is_idempotent() {
        let stop_time = StopTime {
            trip_id: "T1".to_owned(),
            stop_sequence: 3,
            stop_id: "ST1".to_owned(),
            stop_headsign: "Utrecht, Centraal".to_owned(),
            arrival_time: "25:01:00".to_owned(),
            departure_time: "25:02:00".to_owned(),
            pickup_type: 1,
            drop_off_type: 0,
            timepoint: 1,
            shape_dist_traveled: 1234.5,
            fare_units_traveled: 12,
        };
        assert_eq!(stop_time, reencode(&stop_time));

        let stop = Stop {
            id: "ST1".to_owned(),
            latitude: -33.868820,
            longitude: 151.209296,
            location_type: 1,
            ..Stop::default()
        };
        assert_eq!(stop, reencode(&stop));
    }

    #[test]
    fn references() {
        let trip = Trip {
            route_id: "R1".to_owned(),
            id: "T1".to_owned(),
            shape_id: "SH1".to_owned(),
            ..Trip::default()
        };
        assert_eq!(Some("T1"), trip.reference("trip_id"));
        assert_eq!(Some("SH1"), trip.reference("shape_id"));
        assert_eq!(None, trip.reference("trip_headsign"));
    }
}
