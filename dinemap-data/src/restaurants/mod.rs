//! Nearby restaurants from a JSON directory service.

mod provider;
mod record;

pub use provider::{HttpRestaurantDirectory, HttpRestaurantDirectoryConfig};
