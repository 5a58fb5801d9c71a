//! Checks that the identifiers referenced by a feed exist in that same feed
//!
//! Reading never looks at references, a feed with dangling ones loads fine. This is a separate
//! pass, typically run on the result of a subset.
use crate::schema::RecordKind;
use crate::Feed;
use rustc_hash::FxHashSet;
use std::fmt;

/// A foreign key: `column` of `kind` points to `target_column` of `target`
struct Reference {
    kind: RecordKind,
    column: &'static str,
    target: RecordKind,
    target_column: &'static str,
}

const fn reference(
    kind: RecordKind,
    column: &'static str,
    target: RecordKind,
    target_column: &'static str,
) -> Reference {
    Reference {
        kind,
        column,
        target,
        target_column,
    }
}

// Services can also be defined in calendar.txt, which is not read; a trip whose service only has
// weekly patterns is reported.
const REFERENCES: &[Reference] = &[
    reference(RecordKind::Route, "agency_id", RecordKind::Agency, "agency_id"),
    reference(RecordKind::Trip, "route_id", RecordKind::Route, "route_id"),
    reference(RecordKind::Trip, "service_id", RecordKind::CalendarDate, "service_id"),
    reference(RecordKind::Trip, "shape_id", RecordKind::Shape, "shape_id"),
    reference(RecordKind::StopTime, "trip_id", RecordKind::Trip, "trip_id"),
    reference(RecordKind::StopTime, "stop_id", RecordKind::Stop, "stop_id"),
    reference(RecordKind::Stop, "parent_station", RecordKind::Stop, "stop_id"),
    reference(RecordKind::Transfer, "from_stop_id", RecordKind::Stop, "stop_id"),
    reference(RecordKind::Transfer, "to_stop_id", RecordKind::Stop, "stop_id"),
    reference(RecordKind::Transfer, "from_route_id", RecordKind::Route, "route_id"),
    reference(RecordKind::Transfer, "to_route_id", RecordKind::Route, "route_id"),
    reference(RecordKind::Transfer, "from_trip_id", RecordKind::Trip, "trip_id"),
    reference(RecordKind::Transfer, "to_trip_id", RecordKind::Trip, "trip_id"),
];

/// A non-empty reference that matches no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Kind of the record holding the reference
    pub kind: RecordKind,
    /// 1-based position of the record in its sequence
    pub line: usize,
    /// Column of the reference
    pub column: &'static str,
    /// The identifier that could not be found
    pub value: String,
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} line {}: {} '{}' does not exist",
            self.kind, self.line, self.column, self.value
        )
    }
}

/// Lists every reference of the feed that does not resolve, grouped by reference then by line
pub fn dangling_references(feed: &Feed) -> Vec<DanglingReference> {
    let mut dangling = Vec::new();
    for reference in REFERENCES {
        let known: FxHashSet<&str> = feed
            .column_values(reference.target, reference.target_column)
            .into_iter()
            .collect();
        for (i, value) in feed
            .column_values(reference.kind, reference.column)
            .into_iter()
            .enumerate()
        {
            if !value.is_empty() && !known.contains(value) {
                dangling.push(DanglingReference {
                    kind: reference.kind,
                    line: i + 1,
                    column: reference.column,
                    value: value.to_owned(),
                });
            }
        }
    }
    dangling
}
