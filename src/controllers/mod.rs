pub mod booking_controller;
pub mod review_controller;
pub mod stats_controller;
pub mod user_controller;
pub mod venue_controller;
