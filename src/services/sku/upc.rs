//! 12-digit UPC-A generation.

use crate::{
    config::AppConfig,
    entities::{variant, Variant},
    errors::ServiceError,
};
use async_trait::async_trait;
use rand::Rng;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use tracing::{debug, warn};

/// Digits in a UPC-A code, check digit included.
pub const UPC_LENGTH: usize = 12;

/// Produces UPCs not yet assigned to any variant.
#[async_trait]
pub trait UpcGenerator: Send + Sync {
    async fn compute_unique_upc(&self) -> Result<String, ServiceError>;
}

#[derive(Debug, Clone, Copy)]
pub struct UpcSettings {
    /// Leading digit of every generated code
    pub number_system: u8,
    /// Random candidates tried before giving up
    pub max_attempts: u32,
}

impl Default for UpcSettings {
    fn default() -> Self {
        Self {
            number_system: 0,
            max_attempts: 10,
        }
    }
}

impl From<&AppConfig> for UpcSettings {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            number_system: cfg.upc_number_system,
            max_attempts: cfg.upc_max_attempts,
        }
    }
}

/// UPC-A check digit for the first eleven digits.
pub fn check_digit(body: &[u8; UPC_LENGTH - 1]) -> u8 {
    let sum: u32 = body
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { u32::from(*d) * 3 } else { u32::from(*d) })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

/// Whether `code` is twelve digits with a correct check digit.
pub fn is_valid_upc(code: &str) -> bool {
    if code.len() != UPC_LENGTH || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u8> = code.bytes().map(|b| b - b'0').collect();
    let mut body = [0u8; UPC_LENGTH - 1];
    body.copy_from_slice(&digits[..UPC_LENGTH - 1]);
    check_digit(&body) == digits[UPC_LENGTH - 1]
}

fn render(body: &[u8; UPC_LENGTH - 1]) -> String {
    body.iter()
        .chain(std::iter::once(&check_digit(body)))
        .map(|d| char::from(b'0' + d))
        .collect()
}

fn random_upc(number_system: u8) -> String {
    let mut rng = rand::thread_rng();
    let mut body = [0u8; UPC_LENGTH - 1];
    body[0] = number_system % 10;
    for digit in body.iter_mut().skip(1) {
        *digit = rng.gen_range(0..10);
    }
    render(&body)
}

/// Draws random UPCs and keeps the first one no variant carries yet.
pub struct RandomUpcGenerator<'a, C> {
    db: &'a C,
    settings: UpcSettings,
}

impl<'a, C> RandomUpcGenerator<'a, C>
where
    C: ConnectionTrait,
{
    pub fn new(db: &'a C, settings: UpcSettings) -> Self {
        Self { db, settings }
    }
}

#[async_trait]
impl<'a, C> UpcGenerator for RandomUpcGenerator<'a, C>
where
    C: ConnectionTrait,
{
    async fn compute_unique_upc(&self) -> Result<String, ServiceError> {
        for attempt in 1..=self.settings.max_attempts {
            let candidate = random_upc(self.settings.number_system);

            let taken = Variant::find()
                .filter(variant::Column::UniversalProductCode.eq(candidate.as_str()))
                .one(self.db)
                .await?
                .is_some();

            if !taken {
                return Ok(candidate);
            }
            debug!(attempt, upc = %candidate, "UPC candidate already assigned");
        }

        warn!(
            attempts = self.settings.max_attempts,
            "Could not find a free UPC"
        );
        Err(ServiceError::Conflict(format!(
            "No free UPC found after {} attempts",
            self.settings.max_attempts
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_digit_matches_known_code() {
        let body = [0, 3, 6, 0, 0, 0, 2, 9, 1, 4, 5];
        assert_eq!(check_digit(&body), 2);
        assert_eq!(render(&body), "036000291452");
    }

    #[test]
    fn validates_upcs() {
        assert!(is_valid_upc("036000291452"));
        assert!(!is_valid_upc("036000291453"));
        assert!(!is_valid_upc("03600029145"));
        assert!(!is_valid_upc("03600029145X"));
    }

    #[test]
    fn random_upcs_are_well_formed() {
        for ns in [0u8, 7, 9] {
            let upc = random_upc(ns);
            assert_eq!(upc.len(), UPC_LENGTH);
            assert!(upc.starts_with(char::from(b'0' + ns)));
            assert!(is_valid_upc(&upc), "invalid UPC {}", upc);
        }
    }

    #[test]
    fn settings_follow_app_config() {
        let mut cfg = AppConfig::new("sqlite::memory:".into(), "test".into());
        cfg.upc_number_system = 4;
        cfg.upc_max_attempts = 3;

        let settings = UpcSettings::from(&cfg);
        assert_eq!(settings.number_system, 4);
        assert_eq!(settings.max_attempts, 3);
    }
}
