pub mod account;
pub mod availability;
pub mod booking;
pub mod checkout;
pub mod selection;
pub mod session;
pub mod slot_fetcher;
