pub mod access;
pub mod dues;
pub mod events;
pub mod expenses;
pub mod formats;
pub mod members;
pub mod notifications;
pub mod rsvps;
pub mod seasons;
pub mod settings;
pub mod teams;

pub use access::{AccessRepo, UpsertAccess};
pub use dues::{DuesFilter, DuesRepo, NewMemberDues, UpdateMemberDues};
pub use events::{EventFilter, EventRepo, NewEvent};
pub use expenses::{ExpenseFilter, ExpenseRepo, NewGeneralExpense, UpdateGeneralExpense};
pub use formats::FormatRepo;
pub use members::{MemberFilter, MemberRepo, NewMember, UpdateMember};
pub use notifications::{NewNotification, NotificationRepo};
pub use rsvps::RsvpRepo;
pub use seasons::SeasonRepo;
pub use settings::SettingsRepo;
pub use teams::TeamRepo;
