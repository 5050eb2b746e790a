mod accounts;
mod campaigns;
mod health;
mod helpers;
mod newsletters;
mod subscribers;
