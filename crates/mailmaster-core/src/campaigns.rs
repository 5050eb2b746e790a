//! Campaign sending and preview

use crate::mailer::{Mailer, OutgoingMail};
use chrono::Utc;
use mailmaster_common::types::CampaignId;
use mailmaster_common::{Error, Result};
use mailmaster_storage::{Campaign, Newsletter, Store};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Message returned when a non-draft campaign is sent
pub const NOT_DRAFT_MESSAGE: &str = "Campaign must be in draft status to be sent.";

/// Outcome of a campaign send
#[derive(Debug, Clone)]
pub struct SendReport {
    /// The campaign after the status change
    pub campaign: Campaign,
    /// Number of subscribers the campaign was sent to
    pub targeted: usize,
    /// Dispatches the mailer accepted
    pub delivered: usize,
    /// Dispatches that failed and were skipped
    pub failed: usize,
}

/// Sends campaigns to every subscriber
#[derive(Clone)]
pub struct CampaignSender {
    store: Store,
    mailer: Arc<dyn Mailer>,
}

impl CampaignSender {
    pub fn new(store: Store, mailer: Arc<dyn Mailer>) -> Self {
        Self { store, mailer }
    }

    /// Send a draft campaign and move it to `pending`.
    ///
    /// Recipients are all subscribers in the system. Delivery is sequential;
    /// a failed delivery is logged and skipped. The status is written after
    /// the loop whatever the individual outcomes were.
    pub async fn send(&self, id: CampaignId) -> Result<SendReport> {
        let campaign = self.load_campaign(id).await?;
        if !campaign.is_draft() {
            warn!(
                campaign_id = %id,
                status = %campaign.status,
                "Refusing to send non-draft campaign"
            );
            return Err(Error::InvalidState(NOT_DRAFT_MESSAGE.to_string()));
        }

        let newsletter = self.load_newsletter(&campaign).await?;
        let subscribers = self.store.subscribers.all().await?;

        info!(
            campaign_id = %id,
            recipients = subscribers.len(),
            "Sending campaign"
        );

        let mut delivered = 0;
        let mut failed = 0;
        for subscriber in &subscribers {
            let mail = OutgoingMail {
                to: subscriber.email.clone(),
                to_name: subscriber.name.clone(),
                subject: campaign.subject.clone(),
                html_body: newsletter.content.clone(),
            };

            match self.mailer.send(&mail).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    failed += 1;
                    error!(
                        campaign_id = %id,
                        subscriber_id = %subscriber.id,
                        error = %e,
                        "Failed to send campaign email"
                    );
                }
            }
        }

        let campaign = self
            .store
            .campaigns
            .mark_pending(id, Utc::now())
            .await?
            .ok_or_else(|| Error::NotFound(format!("Campaign {}", id)))?;

        info!(
            campaign_id = %id,
            delivered,
            failed,
            "Campaign marked pending"
        );

        Ok(SendReport {
            campaign,
            targeted: subscribers.len(),
            delivered,
            failed,
        })
    }

    /// Raw newsletter content of a campaign
    pub async fn preview(&self, id: CampaignId) -> Result<String> {
        let campaign = self.load_campaign(id).await?;
        Ok(self.load_newsletter(&campaign).await?.content)
    }

    async fn load_campaign(&self, id: CampaignId) -> Result<Campaign> {
        self.store
            .campaigns
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Campaign {}", id)))
    }

    async fn load_newsletter(&self, campaign: &Campaign) -> Result<Newsletter> {
        self.store
            .newsletters
            .get(campaign.newsletter_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Newsletter {}", campaign.newsletter_id)))
    }
}
