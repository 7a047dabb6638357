//! The five operations the client performs against the features resource.

use std::fmt;
use tracing::error;

use crate::error::{FeatureError, RequestFailure};

/// Operation identifier, used for error messages and log context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListFeatures,
    GetFeature,
    CreateFeature,
    UpdateFeature,
    DeleteFeature,
}

impl Operation {
    /// Message carried by the error a failed call returns
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::ListFeatures => "Failed to fetch features",
            Operation::GetFeature => "Failed to fetch feature",
            Operation::CreateFeature => "Failed to create feature",
            Operation::UpdateFeature => "Failed to update feature",
            Operation::DeleteFeature => "Failed to delete feature",
        }
    }

    /// Context prefixed to the logged cause
    fn log_context(self) -> &'static str {
        match self {
            Operation::ListFeatures => "Error fetching features",
            Operation::GetFeature => "Error fetching feature",
            Operation::CreateFeature => "Error creating feature",
            Operation::UpdateFeature => "Error updating feature",
            Operation::DeleteFeature => "Error deleting feature",
        }
    }

    /// Log the cause and wrap it into a request error
    pub(crate) fn fail(self, cause: RequestFailure) -> FeatureError {
        error!(operation = %self, "{}: {}", self.log_context(), cause);
        FeatureError::request(self.failure_message(), cause)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::ListFeatures => "list_features",
            Operation::GetFeature => "get_feature",
            Operation::CreateFeature => "create_feature",
            Operation::UpdateFeature => "update_feature",
            Operation::DeleteFeature => "delete_feature",
        };
        f.write_str(name)
    }
}
