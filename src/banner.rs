use std::time::{Duration, Instant};
use chrono::Local;
use crate::models::{Banner, BannerKind};

/// Ordered set of short-lived banners.
///
/// Each banner carries its own deadline; [`expire`](BannerQueue::expire)
/// drops the ones that have passed. Removing a banner early cancels its
/// expiry with it.
#[derive(Debug)]
pub struct BannerQueue {
    banners: Vec<Banner>,
    ttl: Duration,
    next_id: u64,
}

impl BannerQueue {
    pub fn new(ttl: Duration) -> BannerQueue {
        BannerQueue { banners: Vec::new(), ttl, next_id: 1 }
    }

    /// Appends a banner that expires one TTL from now.
    pub fn push(&mut self, title: &str, message: &str, kind: BannerKind) -> u64 {
        self.push_at(title, message, kind, Instant::now())
    }

    pub fn push_at(&mut self, title: &str, message: &str, kind: BannerKind, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.banners.push(Banner {
            id,
            title: title.to_string(),
            message: message.to_string(),
            kind,
            timestamp: Local::now().to_rfc3339(),
            expires_at: now + self.ttl,
        });
        id
    }

    /// Removes a banner. Unknown ids are ignored.
    pub fn remove(&mut self, id: u64) {
        self.banners.retain(|b| b.id != id);
    }

    /// Drops expired banners and returns how many were removed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.banners.len();
        self.banners.retain(|b| b.expires_at > now);
        before - self.banners.len()
    }

    /// Time until the earliest banner expires, if any are showing.
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.banners
            .iter()
            .map(|b| b.expires_at.saturating_duration_since(now))
            .min()
    }

    /// Banners in insertion order.
    pub fn banners(&self) -> &[Banner] {
        &self.banners
    }

    pub fn clear(&mut self) {
        self.banners.clear();
    }
}
