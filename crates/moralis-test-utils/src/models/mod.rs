//! Provider request and response models.

pub mod wallet;

pub use wallet::*;
