pub mod booking;
pub mod enquiry;
