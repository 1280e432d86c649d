pub mod booking_service;
pub mod review_service;
pub mod stats_service;
pub mod user_service;
pub mod venue_service;
