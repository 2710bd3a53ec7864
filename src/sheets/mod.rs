use crate::error::Result;
use crate::schema::CellRange;

pub mod google;
pub mod memory;

pub use google::GoogleSheets;
pub use memory::MemorySheet;

pub type Rows = Vec<Vec<String>>;

/// The two things the service needs from a spreadsheet: read a range and
/// overwrite a range.
#[rocket::async_trait]
pub trait SheetStore: Send + Sync {
    /// Rows of `range`, top to bottom. Trailing empty cells may be omitted.
    async fn get_values(&self, range: &CellRange) -> Result<Rows>;

    async fn update_values(&self, range: &CellRange, values: Rows) -> Result<()>;
}
