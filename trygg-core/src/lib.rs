pub mod error;
pub mod memory;
pub mod offer;
pub mod pii;
pub mod repository;
pub mod service;
pub mod stats;

pub use error::OfferError;
pub use memory::InMemoryOfferRepository;
pub use offer::{Loan, Offer, OfferDraft, OfferStatus};
pub use pii::Masked;
pub use repository::{OfferRepository, StoreError};
pub use service::OfferService;
pub use stats::ConversionStats;
