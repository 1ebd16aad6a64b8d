//! Level-completion prizes
//!
//! A prize source never fails loudly: any problem is logged and reported as
//! `None`, and callers substitute [`Prize::fallback`] so the reveal screen is
//! never blocked.

pub mod gemini;

use thiserror::Error;

pub use crate::sim::Prize;
pub use gemini::{GeminiClient, GeminiConfig};

/// Why a prize could not be produced
#[derive(Debug, Error)]
pub enum PrizeError {
    #[error("API key is not set")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Prize service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed prize concept: {0}")]
    Concept(#[from] serde_json::Error),

    #[error("Prize concept is missing {0}")]
    MissingField(&'static str),

    #[error("No image in prize service response")]
    MissingImage,
}

/// Something that can dream up a prize
#[allow(async_fn_in_trait)]
pub trait PrizeSource {
    /// A fresh prize, or None on any failure
    async fn generate_prize(&self) -> Option<Prize>;
}

/// Always answers with the same prize
#[derive(Debug, Clone)]
pub struct FixedPrize(pub Prize);

impl PrizeSource for FixedPrize {
    async fn generate_prize(&self) -> Option<Prize> {
        Some(self.0.clone())
    }
}

/// Never has a prize (offline builds, missing credentials)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrize;

impl PrizeSource for NoPrize {
    async fn generate_prize(&self) -> Option<Prize> {
        None
    }
}

/// Ask `source` for a prize, falling back to the fixed substitute
pub async fn fetch_prize_or_fallback<P: PrizeSource>(source: &P) -> Prize {
    match source.generate_prize().await {
        Some(prize) => prize,
        None => {
            log::warn!("No prize from service, substituting fallback");
            Prize::fallback()
        }
    }
}
