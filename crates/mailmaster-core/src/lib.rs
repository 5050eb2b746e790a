//! MailMaster Core - Accounts, authorization and campaign delivery
//!
//! This crate holds the business rules of MailMaster that sit between the
//! HTTP layer and storage: credential handling, bearer token sessions,
//! resource policies, mail transports and the campaign sender.

pub mod accounts;
pub mod campaigns;
pub mod credentials;
pub mod mailer;
pub mod policy;
pub mod seed;

pub use accounts::{AccountService, Registration, Session};
pub use campaigns::{CampaignSender, SendReport};
pub use mailer::{mailer_from_config, LogMailer, MailError, Mailer, OutgoingMail, SmtpMailer};
pub use policy::{authorize, Ability, CampaignPolicy, Decision, NewsletterPolicy, Policy};
pub use seed::seed_demo_users;
