use serde::Serialize;

/// Outcome code returned by the write procedures.
///
/// Conflicts are reported through this value, not through an error, so
/// callers must branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SaveStatus {
    Created,
    DuplicateIdentityDocument,
    DuplicateTaxId,
    Failed(i32),
}

impl SaveStatus {
    pub const OK: i32 = 1;
    pub const IDENTITY_DOCUMENT_EXISTS: i32 = 2;
    pub const TAX_ID_EXISTS: i32 = 3;

    pub fn from_code(code: i32) -> Self {
        match code {
            Self::OK => SaveStatus::Created,
            Self::IDENTITY_DOCUMENT_EXISTS => SaveStatus::DuplicateIdentityDocument,
            Self::TAX_ID_EXISTS => SaveStatus::DuplicateTaxId,
            other => SaveStatus::Failed(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            SaveStatus::Created => Self::OK,
            SaveStatus::DuplicateIdentityDocument => Self::IDENTITY_DOCUMENT_EXISTS,
            SaveStatus::DuplicateTaxId => Self::TAX_ID_EXISTS,
            SaveStatus::Failed(code) => *code,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, SaveStatus::Created)
    }
}
