//! Repository layer for data access

pub mod campaigns;
pub mod memory;
pub mod newsletters;
pub mod subscribers;
pub mod tokens;
pub mod users;

// Re-export concrete repository implementations
pub use campaigns::DbCampaignRepository;
pub use memory::InMemoryRepository;
pub use newsletters::DbNewsletterRepository;
pub use subscribers::DbSubscriberRepository;
pub use tokens::DbTokenRepository;
pub use users::DbUserRepository;

// Re-export repository traits
pub use campaigns::CampaignRepository as CampaignRepositoryTrait;
pub use newsletters::NewsletterRepository as NewsletterRepositoryTrait;
pub use subscribers::SubscriberRepository as SubscriberRepositoryTrait;
pub use tokens::TokenRepository as TokenRepositoryTrait;
pub use users::UserRepository as UserRepositoryTrait;
