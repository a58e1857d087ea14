pub mod metal;
pub mod price;
pub mod timestamp;
