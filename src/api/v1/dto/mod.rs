pub mod bookings;
pub mod envelope;
