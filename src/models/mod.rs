pub mod account;
pub mod booking;
pub mod payment;
pub mod slot;
