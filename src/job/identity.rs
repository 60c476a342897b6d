// src/job/identity.rs

use std::fmt;

use blake3::Hasher;

/// Content-addressed identifier of a job.
///
/// Two invocations with byte-identical argument vectors always map to the
/// same id, on any machine. Changing, adding, reordering or re-quoting a
/// single argument yields a different id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    /// Hash the canonical serialization of `argv`.
    pub fn from_argv(argv: &[String]) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(canonical_label(argv).as_bytes());
        JobId(hasher.finalize().to_hex().to_string())
    }

    /// Lowercase hex digest (64 characters).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unambiguous textual form of an argument vector.
///
/// Every argument is quoted and escaped, so `["a b"]` and `["a", "b"]` can
/// never collide. This string is both the hash input and the content of the
/// human-readable `command` label file.
pub fn canonical_label(argv: &[String]) -> String {
    format!("{:?}", argv)
}
