// Adapters layer: concrete clients for the external booking store.

pub mod store;

pub use store::RestBookingStore;
