//! Column layout of every GTFS file handled by this crate
//!
//! Each [RecordKind] owns a canonical column order. It is the order used when writing a file,
//! while reading resolves every column by name from the header row actually present, so a feed
//! can list its columns in any order and carry extra ones.
use crate::Error;
use std::fmt;

/// The eight record types of a feed, one per file
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    /// [crate::Agency] <https://gtfs.org/reference/static/#agencytxt>
    Agency,
    /// [crate::CalendarDate] <https://gtfs.org/reference/static/#calendar_datestxt>
    CalendarDate,
    /// [crate::Route] <https://gtfs.org/reference/static/#routestxt>
    Route,
    /// [crate::Shape] <https://gtfs.org/reference/static/#shapestxt>
    Shape,
    /// [crate::StopTime] <https://gtfs.org/reference/static/#stop_timestxt>
    StopTime,
    /// [crate::Stop] <https://gtfs.org/reference/static/#stopstxt>
    Stop,
    /// [crate::Transfer] <https://gtfs.org/reference/static/#transferstxt>
    Transfer,
    /// [crate::Trip] <https://gtfs.org/reference/static/#tripstxt>
    Trip,
}

const AGENCY_COLUMNS: &[&str] = &[
    "agency_id",
    "agency_name",
    "agency_url",
    "agency_timezone",
    "agency_phone",
];

const CALENDAR_DATE_COLUMNS: &[&str] = &["service_id", "date", "exception_type"];

const ROUTE_COLUMNS: &[&str] = &[
    "route_id",
    "agency_id",
    "external_code",
    "route_short_name",
    "route_long_name",
    "route_desc",
    "route_type",
    "route_color",
    "route_text_color",
    "route_url",
];

const SHAPE_COLUMNS: &[&str] = &[
    "shape_id",
    "shape_pt_sequence",
    "shape_pt_lat",
    "shape_pt_lon",
    "shape_dist_traveled",
];

const STOP_TIME_COLUMNS: &[&str] = &[
    "trip_id",
    "stop_sequence",
    "stop_id",
    "stop_headsign",
    "arrival_time",
    "departure_time",
    "pickup_type",
    "drop_off_type",
    "timepoint",
    "shape_dist_traveled",
    "fare_units_traveled",
];

const STOP_COLUMNS: &[&str] = &[
    "stop_id",
    "stop_code",
    "stop_name",
    "stop_lat",
    "stop_lon",
    "location_type",
    "parent_station",
    "stop_timezone",
    "wheelchair_boarding",
    "platform_code",
    "zone_id",
];

const TRANSFER_COLUMNS: &[&str] = &[
    "from_stop_id",
    "to_stop_id",
    "from_route_id",
    "to_route_id",
    "from_trip_id",
    "to_trip_id",
    "transfer_type",
];

const TRIP_COLUMNS: &[&str] = &[
    "route_id",
    "service_id",
    "trip_id",
    "realtime_trip_id",
    "trip_headsign",
    "trip_short_name",
    "trip_long_name",
    "direction_id",
    "block_id",
    "shape_id",
    "wheelchair_accessible",
    "bikes_allowed",
];

impl RecordKind {
    /// Every kind, in the order files are loaded and written
    pub const ALL: [RecordKind; 8] = [
        RecordKind::Agency,
        RecordKind::CalendarDate,
        RecordKind::Route,
        RecordKind::Shape,
        RecordKind::StopTime,
        RecordKind::Stop,
        RecordKind::Transfer,
        RecordKind::Trip,
    ];

    /// Name of the file holding this kind of record inside a feed
    pub fn file_name(self) -> &'static str {
        match self {
            RecordKind::Agency => "agency.txt",
            RecordKind::CalendarDate => "calendar_dates.txt",
            RecordKind::Route => "routes.txt",
            RecordKind::Shape => "shapes.txt",
            RecordKind::StopTime => "stop_times.txt",
            RecordKind::Stop => "stops.txt",
            RecordKind::Transfer => "transfers.txt",
            RecordKind::Trip => "trips.txt",
        }
    }

    /// Canonical column names, in the order they are written
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            RecordKind::Agency => AGENCY_COLUMNS,
            RecordKind::CalendarDate => CALENDAR_DATE_COLUMNS,
            RecordKind::Route => ROUTE_COLUMNS,
            RecordKind::Shape => SHAPE_COLUMNS,
            RecordKind::StopTime => STOP_TIME_COLUMNS,
            RecordKind::Stop => STOP_COLUMNS,
            RecordKind::Transfer => TRANSFER_COLUMNS,
            RecordKind::Trip => TRIP_COLUMNS,
        }
    }

    /// Columns that must be present in the header row
    ///
    /// Those are the keys and references the subsetting relies on. Any other column may be
    /// omitted by a feed and is then read as an empty cell.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            RecordKind::Agency => &["agency_id"],
            RecordKind::CalendarDate => CALENDAR_DATE_COLUMNS,
            RecordKind::Route => &["route_id", "agency_id"],
            RecordKind::Shape => &["shape_id", "shape_pt_sequence", "shape_pt_lat", "shape_pt_lon"],
            RecordKind::StopTime => &["trip_id", "stop_sequence", "stop_id"],
            RecordKind::Stop => &["stop_id"],
            RecordKind::Transfer => &["from_stop_id", "to_stop_id"],
            RecordKind::Trip => &["route_id", "service_id", "trip_id"],
        }
    }

    /// Is the file mandatory in a feed
    ///
    /// Calendar dates, shapes and transfers are optional in GTFS; an absent file is an empty table.
    pub fn is_mandatory(self) -> bool {
        !matches!(
            self,
            RecordKind::CalendarDate | RecordKind::Shape | RecordKind::Transfer
        )
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/// Position of `field` in the canonical column order of `kind`, `None` if the kind has no such column
pub fn resolve(kind: RecordKind, field: &str) -> Option<usize> {
    kind.columns().iter().position(|c| *c == field)
}

/// Where each canonical column of a kind sits in the rows of one particular file
#[derive(Debug, Clone)]
pub struct ColumnMap {
    kind: RecordKind,
    // Indexed by canonical position
    positions: Vec<Option<usize>>,
}

impl ColumnMap {
    /// Identity mapping: the file uses exactly the canonical order
    pub fn canonical(kind: RecordKind) -> Self {
        Self {
            kind,
            positions: (0..kind.columns().len()).map(Some).collect(),
        }
    }

    /// Resolves every canonical column against a header row
    ///
    /// Unknown header columns are ignored. Fails with [Error::SchemaMismatch] when a required
    /// column is absent.
    pub fn from_headers<'a, I>(kind: RecordKind, headers: I, file_name: &str) -> Result<Self, Error>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let headers: Vec<&str> = headers.into_iter().collect();
        let positions: Vec<Option<usize>> = kind
            .columns()
            .iter()
            .map(|column| headers.iter().position(|h| h == column))
            .collect();

        for column in kind.required_columns() {
            let canonical = resolve(kind, column).unwrap_or(usize::MAX);
            if positions.get(canonical).copied().flatten().is_none() {
                return Err(Error::SchemaMismatch {
                    file_name: file_name.to_owned(),
                    column,
                });
            }
        }
        Ok(Self { kind, positions })
    }

    /// Record kind this map was built for
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Index of `field` in the file's rows, `None` if the file lacks it
    pub fn position(&self, field: &str) -> Option<usize> {
        resolve(self.kind, field).and_then(|i| self.positions[i])
    }

    /// Canonical columns the file does not provide
    pub fn missing_columns(&self) -> Vec<&'static str> {
        self.kind
            .columns()
            .iter()
            .zip(&self.positions)
            .filter(|(_, position)| position.is_none())
            .map(|(column, _)| *column)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_canonical_positions() {
        assert_eq!(Some(0), resolve(RecordKind::Stop, "stop_id"));
        assert_eq!(Some(6), resolve(RecordKind::Stop, "parent_station"));
        assert_eq!(Some(10), resolve(RecordKind::Stop, "zone_id"));
        assert_eq!(Some(9), resolve(RecordKind::Trip, "shape_id"));
        assert_eq!(None, resolve(RecordKind::Stop, "stop_desc"));
        assert_eq!(None, resolve(RecordKind::Agency, "route_id"));
    }

    #[test]
    fn every_required_column_is_canonical() {
        for kind in RecordKind::ALL {
            for column in kind.required_columns() {
                assert!(resolve(kind, column).is_some(), "{kind}: {column}");
            }
        }
    }

    #[test]
    fn map_follows_header_order() {
        let headers = ["stop_name", "extra", "stop_id", "stop_lat"];
        let map = ColumnMap::from_headers(RecordKind::Stop, headers, "stops.txt").unwrap();
        assert_eq!(Some(2), map.position("stop_id"));
        assert_eq!(Some(0), map.position("stop_name"));
        assert_eq!(Some(3), map.position("stop_lat"));
        assert_eq!(None, map.position("stop_lon"));
        assert_eq!(None, map.position("extra"));
        assert!(map.missing_columns().contains(&"parent_station"));
    }

    #[test]
    fn missing_required_column() {
        let headers = ["route_id", "route_short_name"];
        match ColumnMap::from_headers(RecordKind::Route, headers, "routes.txt") {
            Err(Error::SchemaMismatch { file_name, column }) => {
                assert_eq!("routes.txt", file_name);
                assert_eq!("agency_id", column);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn canonical_map() {
        let map = ColumnMap::canonical(RecordKind::Transfer);
        assert_eq!(Some(6), map.position("transfer_type"));
        assert!(map.missing_columns().is_empty());
    }
}
