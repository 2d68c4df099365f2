pub mod cats;
pub mod favorites;
pub mod metrics;
pub mod token;
pub mod users;
