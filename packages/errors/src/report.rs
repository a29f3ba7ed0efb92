//! Serializable view of an error for reporting collaborators

use crate::error::Error;
use crate::frame::StackFrame;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One error as a delivery payload would embed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionReport {
    /// Type name of the original failure value
    pub error_class: String,
    /// Error message
    pub message: String,
    /// Frames, innermost first
    pub stacktrace: Vec<StackFrame>,
    /// Hash shared by errors of the same type raised on the same path
    pub grouping_hash: String,
}

impl Error {
    /// Snapshot this error for a reporting collaborator
    #[must_use]
    pub fn report(&self) -> ExceptionReport {
        ExceptionReport {
            error_class: self.type_name().to_string(),
            message: self.message().to_string(),
            stacktrace: self.stack_frames().to_vec(),
            grouping_hash: self.fingerprint(),
        }
    }

    /// Hex SHA-256 over the type name and each frame's function and file.
    ///
    /// Line numbers are left out so edits elsewhere in a file keep the hash.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.type_name().as_bytes());
        for frame in self.stack_frames() {
            hasher.update(b"\n");
            hasher.update(frame.package.as_bytes());
            hasher.update(b"::");
            hasher.update(frame.name.as_bytes());
            hasher.update(b"@");
            hasher.update(frame.file.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}
