//! Keeping only the records that belong to one agency
//!
//! The references between files are declared once in [GRAPH]. Each [Stage] filters one record
//! kind against the identifiers emitted by the stages before it, then emits the identifiers of
//! the records it kept. Stages run in the order of the graph, so a reference can only point to a
//! kind that was already filtered.
use crate::codec::GtfsRecord;
use crate::schema::RecordKind;
use crate::Feed;
use rustc_hash::{FxHashMap, FxHashSet};

/// A set of identifiers flowing between stages
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum KeySpace {
    /// The agency asked for
    Target,
    /// Ids of the retained agencies
    Agency,
    /// Ids of the retained routes
    Route,
    /// Ids of the retained trips
    Trip,
    /// Services used by the retained trips
    Service,
    /// Shapes used by the retained trips
    Shape,
    /// Stops used by the retained stop times
    StopRef,
    /// Ids of the retained stops
    Stop,
}

/// What happens to `transfers.txt`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TransferPolicy {
    /// Every transfer of the source is kept, whatever it references
    #[default]
    KeepAll,
    /// A transfer is kept only if each of its non-empty stop, route and trip references is retained
    Resolved,
}

/// Tuning of the subsetting. The default keeps every transfer and does not follow parent stations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubsetOptions {
    /// See [TransferPolicy]
    pub transfers: TransferPolicy,
    /// Also keep the parent stations of the retained stops, up to the top of the hierarchy
    pub parent_stations: bool,
}

/// Which records of a kind a stage keeps
#[derive(Debug, Copy, Clone)]
pub enum Rule {
    /// Records whose column value is in the key space
    Member(&'static str, KeySpace),
    /// Records whose non-empty columns are all in their key spaces
    ///
    /// Only enforced with [TransferPolicy::Resolved]; with [TransferPolicy::KeepAll] every record is kept.
    Resolved(&'static [(&'static str, KeySpace)]),
}

/// A self reference of a kind, followed until no new identifier appears
#[derive(Debug, Copy, Clone)]
pub struct Closure {
    /// Column holding the identifier of the record
    pub key: &'static str,
    /// Column referencing another record of the same kind
    pub parent: &'static str,
    /// Key space extended with the parents
    pub space: KeySpace,
}

/// Filtering of one record kind
#[derive(Debug, Copy, Clone)]
pub struct Stage {
    /// Kind of records filtered
    pub kind: RecordKind,
    /// Which records are kept
    pub rule: Rule,
    /// Followed before filtering when [SubsetOptions::parent_stations] is set
    pub closure: Option<Closure>,
    /// Columns of the kept records seeding the later stages
    pub emits: &'static [(&'static str, KeySpace)],
}

/// The references between files, in the order they are resolved
pub const GRAPH: &[Stage] = &[
    Stage {
        kind: RecordKind::Agency,
        rule: Rule::Member("agency_id", KeySpace::Target),
        closure: None,
        emits: &[("agency_id", KeySpace::Agency)],
    },
    Stage {
        kind: RecordKind::Route,
        rule: Rule::Member("agency_id", KeySpace::Agency),
        closure: None,
        emits: &[("route_id", KeySpace::Route)],
    },
    Stage {
        kind: RecordKind::Trip,
        rule: Rule::Member("route_id", KeySpace::Route),
        closure: None,
        emits: &[
            ("trip_id", KeySpace::Trip),
            ("service_id", KeySpace::Service),
            ("shape_id", KeySpace::Shape),
        ],
    },
    Stage {
        kind: RecordKind::CalendarDate,
        rule: Rule::Member("service_id", KeySpace::Service),
        closure: None,
        emits: &[],
    },
    Stage {
        kind: RecordKind::StopTime,
        rule: Rule::Member("trip_id", KeySpace::Trip),
        closure: None,
        emits: &[("stop_id", KeySpace::StopRef)],
    },
    Stage {
        kind: RecordKind::Stop,
        rule: Rule::Member("stop_id", KeySpace::StopRef),
        closure: Some(Closure {
            key: "stop_id",
            parent: "parent_station",
            space: KeySpace::StopRef,
        }),
        emits: &[("stop_id", KeySpace::Stop)],
    },
    Stage {
        kind: RecordKind::Shape,
        rule: Rule::Member("shape_id", KeySpace::Shape),
        closure: None,
        emits: &[],
    },
    Stage {
        kind: RecordKind::Transfer,
        rule: Rule::Resolved(&[
            ("from_stop_id", KeySpace::Stop),
            ("to_stop_id", KeySpace::Stop),
            ("from_route_id", KeySpace::Route),
            ("to_route_id", KeySpace::Route),
            ("from_trip_id", KeySpace::Trip),
            ("to_trip_id", KeySpace::Trip),
        ]),
        closure: None,
        emits: &[],
    },
];

/// Identifiers emitted so far, per key space
#[derive(Debug, Default)]
pub(crate) struct KeySets(FxHashMap<KeySpace, FxHashSet<String>>);

impl KeySets {
    fn insert(&mut self, space: KeySpace, value: &str) -> bool {
        let set = self.0.entry(space).or_default();
        !set.contains(value) && set.insert(value.to_owned())
    }

    fn contains(&self, space: KeySpace, value: &str) -> bool {
        self.0.get(&space).map_or(false, |set| set.contains(value))
    }

    fn values(&self, space: KeySpace) -> Vec<String> {
        self.0
            .get(&space)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Rule {
    fn accepts<R: GtfsRecord>(&self, record: &R, keys: &KeySets, options: &SubsetOptions) -> bool {
        match self {
            Rule::Member(column, space) => record
                .reference(column)
                .map_or(false, |value| keys.contains(*space, value)),
            Rule::Resolved(columns) => {
                options.transfers == TransferPolicy::KeepAll
                    || columns.iter().all(|(column, space)| match record.reference(column) {
                        None | Some("") => true,
                        Some(value) => keys.contains(*space, value),
                    })
            }
        }
    }
}

fn close_over<R: GtfsRecord>(records: &[R], closure: &Closure, keys: &mut KeySets) {
    let mut parents: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for record in records {
        if let (Some(key), Some(parent)) = (
            record.reference(closure.key),
            record.reference(closure.parent),
        ) {
            if !parent.is_empty() {
                parents.entry(key).or_default().push(parent);
            }
        }
    }

    let mut pending = keys.values(closure.space);
    while let Some(id) = pending.pop() {
        for parent in parents.get(id.as_str()).into_iter().flatten() {
            if keys.insert(closure.space, parent) {
                pending.push(parent.to_string());
            }
        }
    }
}

/// Runs one stage for the records of type `R`
pub(crate) fn filter_table<R: GtfsRecord>(
    source: &Feed,
    target: &mut Feed,
    stage: &Stage,
    keys: &mut KeySets,
    options: &SubsetOptions,
) {
    let records = R::table(source);
    if let Some(closure) = stage.closure.filter(|_| options.parent_stations) {
        close_over(records, &closure, keys);
    }

    let kept: Vec<R> = records
        .iter()
        .filter(|record| stage.rule.accepts(*record, keys, options))
        .cloned()
        .collect();
    for record in &kept {
        for (column, space) in stage.emits {
            match record.reference(column) {
                Some(value) if !value.is_empty() => {
                    keys.insert(*space, value);
                }
                _ => {}
            }
        }
    }
    debug!("{}: kept {} of {}", stage.kind, kept.len(), records.len());
    *R::table_mut(target) = kept;
}

/// Builds a new feed with only what is reachable from the agency `agency_id`
///
/// Routes of the agency are kept, then their trips, the calendar dates and shapes of those
/// trips, their stop times and the stops served. The agency id is compared exactly. An id that
/// matches no agency gives an empty feed. The source feed is left untouched.
pub fn subset(feed: &Feed, agency_id: &str, options: &SubsetOptions) -> Feed {
    let mut keys = KeySets::default();
    keys.insert(KeySpace::Target, agency_id);
    let mut result = Feed::default();
    for stage in GRAPH {
        feed.filter_into(stage, &mut result, &mut keys, options);
    }
    result
}
