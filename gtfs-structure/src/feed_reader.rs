use crate::codec::{ParseMode, ParseWarning};
use crate::schema::RecordKind;
use crate::{Error, Feed};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

/// Allows to parameterize how a feed is read
///
/// ```
///let (feed, warnings) = gtfs_structure::FeedReader::default()
///    .parse_mode(gtfs_structure::ParseMode::Strict) // Fails on the first malformed number
///    .read_from_path("fixtures/basic")?;
///assert_eq!(2, feed.agencies.len());
///assert!(warnings.is_empty());
/// # Ok::<(), gtfs_structure::error::Error>(())
///```
#[derive(Derivative, Debug, Clone)]
#[derivative(Default)]
pub struct FeedReader {
    /// How numeric cells that cannot be parsed are handled
    #[derivative(Default(value = "ParseMode::Lenient"))]
    pub parse_mode: ParseMode,
    /// Fail with [Error::MissingFile] when an optional file is absent
    #[derivative(Default(value = "false"))]
    pub require_all_files: bool,
}

impl FeedReader {
    /// Configures how malformed numeric cells are handled (default: [ParseMode::Lenient])
    ///
    /// Returns Self and can be chained
    pub fn parse_mode(mut self, parse_mode: ParseMode) -> Self {
        self.parse_mode = parse_mode;
        self
    }

    /// Should `calendar_dates.txt`, `shapes.txt` and `transfers.txt` be mandatory (default: false)
    ///
    /// When false, an absent optional file is read as an empty table.
    /// Returns Self and can be chained
    pub fn require_all_files(mut self, require_all_files: bool) -> Self {
        self.require_all_files = require_all_files;
        self
    }

    fn is_required(&self, kind: RecordKind) -> bool {
        self.require_all_files || kind.is_mandatory()
    }

    /// Reads a feed from a local zip archive or local directory
    ///
    /// Also returns the numeric cells that were replaced by zero, always empty in
    /// [ParseMode::Strict].
    pub fn read_from_path<P: AsRef<Path>>(&self, path: P) -> Result<(Feed, Vec<ParseWarning>), Error> {
        let p = path.as_ref();
        if p.is_file() {
            let reader = File::open(p).map_err(|e| Error::NamedFileIO {
                file_name: p.display().to_string(),
                source: Box::new(e),
            })?;
            self.read_from_reader(reader)
        } else if p.is_dir() {
            self.read_from_directory(p)
        } else {
            Err(Error::InputNotFound(format!("{}", p.display())))
        }
    }

    fn read_from_directory(&self, p: &Path) -> Result<(Feed, Vec<ParseWarning>), Error> {
        let now = Instant::now();
        let mut feed = Feed::default();
        let mut warnings = Vec::new();
        for kind in RecordKind::ALL {
            let path = p.join(kind.file_name());
            if path.exists() {
                info!("[Import] Importing {}", path.display());
                warnings.extend(feed.load_file(kind, &path, self.parse_mode)?);
            } else {
                self.absent(kind)?;
            }
        }
        debug!("Feed read in {}ms", now.elapsed().as_millis());
        Ok((feed, warnings))
    }

    /// Reads a feed from a zip archive
    ///
    /// Files are matched by their base name, so an archive whose files sit in a sub-directory is
    /// read as well.
    pub fn read_from_reader<T: std::io::Read + std::io::Seek>(
        &self,
        reader: T,
    ) -> Result<(Feed, Vec<ParseWarning>), Error> {
        let now = Instant::now();
        let mut archive = zip::ZipArchive::new(std::io::BufReader::new(reader))?;
        let mut file_mapping = HashMap::new();

        for i in 0..archive.len() {
            let archive_file = archive.by_index(i)?;
            for kind in RecordKind::ALL {
                let path = Path::new(archive_file.name());
                if path.file_name() == Some(std::ffi::OsStr::new(kind.file_name())) {
                    file_mapping.insert(kind, i);
                    break;
                }
            }
        }

        let mut feed = Feed::default();
        let mut warnings = Vec::new();
        for kind in RecordKind::ALL {
            let file_name = kind.file_name();
            match file_mapping.get(&kind) {
                Some(i) => {
                    info!("[Import] Importing {} from archive", file_name);
                    let file = archive.by_index(*i).map_err(|e| Error::NamedFileIO {
                        file_name: file_name.to_owned(),
                        source: Box::new(e),
                    })?;
                    warnings.extend(feed.load_reader(kind, file, file_name, self.parse_mode)?);
                }
                None => self.absent(kind)?,
            }
        }
        debug!("Feed read in {}ms", now.elapsed().as_millis());
        Ok((feed, warnings))
    }

    fn absent(&self, kind: RecordKind) -> Result<(), Error> {
        if self.is_required(kind) {
            Err(Error::MissingFile(kind.file_name().to_owned()))
        } else {
            info!("[Import] {} not present, left empty", kind.file_name());
            Ok(())
        }
    }
}
