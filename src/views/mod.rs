pub mod layout;
pub mod results;
pub mod survey;

// Re-export commonly used functions from layout
pub use layout::page;
