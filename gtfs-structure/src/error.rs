//! Module for the error management
use thiserror::Error;

/// Specific line from a CSV file that could not be read
#[derive(Debug)]
pub struct LineError {
    /// Headers of the CSV file
    pub headers: Vec<String>,
    /// Values of the line that could not be parsed
    pub values: Vec<String>,
}

/// An error that can occur when loading or writing GTFS data.
#[derive(Error, Debug)]
pub enum Error {
    /// A mandatory file is not present in the feed
    #[error("Could not find file {0}")]
    MissingFile(String),
    /// The given input path is neither a file nor a directory
    #[error("Could not read GTFS: {0} is neither a file nor a directory")]
    InputNotFound(String),
    /// A column the record type cannot do without is absent from the header row
    #[error("'{file_name}' has no '{column}' column")]
    SchemaMismatch {
        /// File whose header is incomplete
        file_name: String,
        /// Canonical name of the missing column
        column: &'static str,
    },
    /// A numeric cell could not be parsed while reading in strict mode
    #[error("'{file_name}' line {line}: '{value}' is not a valid {column}")]
    MalformedCell {
        /// File containing the cell
        file_name: String,
        /// 1-based data row, the header not counted
        line: usize,
        /// Canonical column of the cell
        column: &'static str,
        /// Raw cell content
        value: String,
    },
    /// Generic Input/Output error while reading or writing a file
    #[error("impossible to access file")]
    IO(#[from] std::io::Error),
    /// Impossible to read or write a named file
    #[error("impossible to access '{file_name}'")]
    NamedFileIO {
        /// The file name that could not be accessed
        file_name: String,
        /// The inital error that caused the failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Impossible to read or write a CSV file
    #[error("impossible to process csv file '{file_name}'")]
    CSVError {
        /// File name that could not be handled as CSV
        file_name: String,
        /// The initial error by the csv library
        #[source]
        source: csv::Error,
        /// The line that could not be parsed by the csv library
        line_in_error: Option<LineError>,
    },
    /// Error when trying to unzip the GTFS archive
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}
