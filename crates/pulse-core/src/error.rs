// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error contracts shared across the sampling facility.

use std::error::Error;
use std::fmt::Display;

/// A specialized `Result` type for sampling operations.
pub type SamplingResult<T> = Result<T, SamplingError>;

/// An error that can occur within the sampling facility.
#[derive(Debug)]
pub enum SamplingError {
    /// The underlying measurement could not be produced.
    SourceFailure(Box<dyn Error + Send + Sync>),
    /// Reading a named metric failed; wraps the original source failure.
    ReadFailure {
        /// Name of the metric whose read failed.
        metric: String,
        /// The original failure reported by the source.
        cause: Box<dyn Error + Send + Sync>,
    },
    /// An operation was attempted in a lifecycle state that forbids it.
    IllegalState(String),
    /// A construction-time contract was violated.
    InvalidConfiguration(String),
}

impl SamplingError {
    /// Wraps an arbitrary failure as a [`SamplingError::SourceFailure`].
    ///
    /// This is the constructor metric sources use to report a reading that
    /// could not be produced.
    pub fn source_failure(cause: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        SamplingError::SourceFailure(cause.into())
    }
}

impl Display for SamplingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplingError::SourceFailure(cause) => {
                write!(f, "measurement could not be produced: {cause}")
            }
            SamplingError::ReadFailure { metric, cause } => {
                write!(f, "failed to read metric `{metric}`: {cause}")
            }
            SamplingError::IllegalState(msg) => write!(f, "illegal lifecycle state: {msg}"),
            SamplingError::InvalidConfiguration(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl Error for SamplingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SamplingError::SourceFailure(cause) => Some(cause.as_ref()),
            SamplingError::ReadFailure { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_failure_formatting() {
        let err = SamplingError::source_failure("sensor offline");
        assert_eq!(
            err.to_string(),
            "measurement could not be produced: sensor offline"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_read_failure_carries_metric_and_cause() {
        let err = SamplingError::ReadFailure {
            metric: "cache:hit_ratio".to_string(),
            cause: "sensor offline".into(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("cache:hit_ratio"));
        assert!(rendered.contains("sensor offline"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_lifecycle_and_configuration_have_no_cause() {
        let illegal = SamplingError::IllegalState("already shut down".to_string());
        assert!(illegal.source().is_none());
        assert!(illegal.to_string().contains("already shut down"));

        let invalid = SamplingError::InvalidConfiguration("capacity must be at least 1".to_string());
        assert!(invalid.source().is_none());
        assert!(invalid.to_string().starts_with("invalid configuration"));
    }
}
