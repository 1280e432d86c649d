pub mod booking_model;
pub mod review_model;
pub mod user_model;
pub mod venue_model;
