mod billing;
mod company;
mod hr;
mod recruitment;
mod remarks;
mod user;

pub use billing::{Invoice, InvoiceStatus, InvoiceUpdate, NewInvoice};
pub use company::{
    Company, CompanyUpdate, NewCompany, NewSpoc, RecordStatus, Spoc, SpocUpdate,
};
pub use hr::{
    FinancialYear, FinancialYearUpdate, Holiday, HolidaySelection, HolidayUpdate, Leave,
    LeaveBalance, LeaveBalanceUpdate, LeaveStatus, LeaveType, LeaveUpdate, NewFinancialYear,
    NewHoliday, NewLeave, SelectedHoliday,
};
pub use recruitment::{
    ActivelyWorking, NewProcessProfile, NewProfile, NewRequirement, PipelineProfile,
    PlacementActivity, ProcessProfile, Profile, ProfileStatus, ProfileUpdate, Requirement,
    RequirementStatus, RequirementUpdate, OPEN_STATUS_IDS, TERMINAL_STATUS_IDS,
};
pub use remarks::append_remark;
pub use user::{NewUser, User};
