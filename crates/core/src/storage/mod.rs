mod enrich;
mod error;
mod http_mapping;
mod traits;
mod types;

pub use enrich::enrich_process_profiles;
pub use error::{DateRangeError, RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use traits::{
    CompanyRepository, FinancialYearRepository, HolidayRepository, InvoiceRepository,
    LeaveRepository, ProcessProfileRepository, ProfileRepository, RequirementRepository,
    SpocRepository, UserRepository,
};
pub use types::DateRange;
