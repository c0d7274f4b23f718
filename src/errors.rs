use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnergyFlowError {
    #[error("Request was considered invalid due to error: {0}")]
    InvalidRequest(#[from] anyhow::Error),
    #[error("Error identified during energy flow calculation: {0}")]
    FailureInCalculation(#[from] ConfigurationError),
    #[error("Error while writing results: {0}")]
    ErrorInOutput(OutputError),
}

#[derive(Debug, Error)]
#[error(transparent)]
pub struct OutputError {
    error: anyhow::Error,
}

impl OutputError {
    pub(crate) fn new(error: anyhow::Error) -> Self {
        Self { error }
    }
}

/// A precondition of the simulation was not met by the given inputs. These are never retried:
/// the run is aborted and no partial results are produced.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("No irradiance data sets were provided")]
    NoIrradianceData,
    #[error("No matching solar radiation data found for module with slope {slope} and azimuth {azimuth}")]
    NoMatchingOrientation { slope: f64, azimuth: f64 },
    #[error("Length of solar data sets do not match: expected {expected} entries, got {actual}")]
    MismatchedSeriesLength { expected: usize, actual: usize },
    #[error("Times of solar data sets do not match at entry {index}")]
    MismatchedTimestamps { index: usize },
    #[error("Expected {expected} entries, but got {actual}")]
    UnexpectedEntryCount { expected: usize, actual: usize },
    #[error("Production and consumption series must be of the same length (production: {production}, consumption: {consumption})")]
    MismatchedFlowLengths {
        production: usize,
        consumption: usize,
    },
    #[error("Battery needs a capacity of at least 0 and an efficiency above 0 and at most 1 (capacity: {capacity}, efficiency: {efficiency})")]
    InvalidStorage { capacity: f64, efficiency: f64 },
}

/// A timestamp string did not have the form `YYYYMMDD:HHMM`.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("Invalid time format: {0}")]
pub struct InvalidTimestampError(String);

impl InvalidTimestampError {
    pub(crate) fn new(raw: &str) -> Self {
        InvalidTimestampError(raw.to_string())
    }
}
