use serde::{Deserialize, Serialize};

/// Cursor used to page through the friend ids endpoint.
///
/// The first page of a scan is requested with `-1`. Every response carries
/// the cursor of the following page; `0` means the scan is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(i64);

impl Cursor {
    pub const FIRST: Self = Self(-1);

    pub fn is_end(self) -> bool {
        self.0 == 0
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::FIRST
    }
}
