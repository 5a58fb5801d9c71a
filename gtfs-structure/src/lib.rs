/*! The [General Transit Feed Specification](https://gtfs.org/) (GTFS) is a commonly used model to represent public transit data.

This crate reads the eight GTFS files needed to describe who runs which trips where, keeps only
what belongs to one agency, and writes the result back as a feed.

To get started, see [FeedReader] and [subset].

## What is GTFS

A Gtfs feed is a collection of CSV files (often bundled as a zip file).
Each file represents a collection of one type (stops, lines, etc.) that have relationships through unique identifiers.

## Design decisions

### Flat tables

A [Feed] holds one `Vec` per file, in file order, as close as possible to the CSV rows. Nothing
is re-organized, so a feed written back contains the same records in the same order.

### Columns by name

Columns are resolved through the header row of each file (see [ColumnMap]). Extra columns are
ignored, missing optional columns read as empty, and a missing key column is an
[Error::SchemaMismatch].

### Identifiers

Every identifier is kept as the exact string of the feed. `"007"` and `"7"` are two different
stops and no whitespace is trimmed.

### Renaming

We strip the object type from field names (`route_short_name` is [Route::short_name]) but the
serde names and the written headers are the GTFS ones.

*/
#![warn(missing_docs)]

#[macro_use]
extern crate derivative;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod codec;
pub mod error;
mod feed;
mod feed_reader;
pub(crate) mod objects;
pub mod schema;
pub mod subset;
pub mod validate;


pub use codec::{Cells, GtfsRecord, ParseMode, ParseWarning};
pub use error::Error;
pub use feed::Feed;
pub use feed_reader::FeedReader;
pub use objects::*;
pub use schema::{ColumnMap, RecordKind};
pub use subset::{subset, SubsetOptions, TransferPolicy};
pub use validate::{dangling_references, DanglingReference};
