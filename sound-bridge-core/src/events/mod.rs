pub mod inbound;
pub mod registry;
pub mod stream;
