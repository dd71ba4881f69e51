pub mod activity;
pub mod appointment;
pub mod catalog;
pub mod inventory;
pub mod user;

// Re-export only the types we actually use
pub use activity::{ActivityAction, ActivityLogEntry, NewActivityLog};
pub use appointment::{
    AppointmentLine, AppointmentPayload, AppointmentRecord, AppointmentStatus,
    AppointmentWithItems, CompleteAppointment, LineInput,
};
pub use catalog::{
    Category, CategoryPayload, Location, LocationPayload, Supplier, SupplierPayload,
};
pub use inventory::{
    DamagedItemUpdate, DamagedRecord, DamagedStatus, ItemDetails, NewItem, TransactionKind,
    TransactionPayload, TransactionRecord, UpdateItem,
};
pub use user::{AccountStatus, LoginPayload, SignupPayload, User, UserRole, UserSummary};
