//! Demo catalogue seeding.
//!
//! Loads the SLPE service provider with its ten gateways and their rates.
//! Rates go through the same validation guard as API writes.

use rust_decimal::Decimal;
use tracing::info;

use domain::models::{EntityStatus, NewCompany, NewGateway, RateCandidate, FALLBACK_ISSUER};
use domain::services::validate_rate;

use crate::store::{EntityStore, RateWrite, StoreError};

/// (name, pg_partner)
const DEMO_GATEWAYS: [(&str, &str); 10] = [
    ("Slpe silver edu pro", "slpe_silver_edu_pro"),
    ("Slpe silver edu", "slpe_silver_edu"),
    ("Slpe gold travel pure", "slpe_gold_travel_pure"),
    ("Slpe silver edu lite", "razorpay"),
    ("Slpe gold travel prime", "razorpay"),
    ("Slpe gold travel", "payu"),
    ("Slpe gold travel lite", "slpe_gold_travel_lite"),
    ("Slpe silver prime edu", "slpe_silver_prime_edu"),
    ("Razorpay", "razorpay"),
    ("Payu", "payu"),
];

struct DemoRate {
    /// 1-based position in `DEMO_GATEWAYS`.
    gateway: usize,
    card_type: &'static str,
    card_issuer: &'static str,
    category: &'static str,
    /// Commission in ten-thousandths of a percent.
    commission: i64,
    min_amount: i64,
    max_amount: i64,
}

const fn demo(
    gateway: usize,
    card_type: &'static str,
    card_issuer: &'static str,
    category: &'static str,
    commission: i64,
    min_amount: i64,
    max_amount: i64,
) -> DemoRate {
    DemoRate {
        gateway,
        card_type,
        card_issuer,
        category,
        commission,
        min_amount,
        max_amount,
    }
}

const OTHERS: &str = FALLBACK_ISSUER;

const DEMO_RATES: [DemoRate; 25] = [
    demo(1, "business", OTHERS, "education", 27178, 100, 100_000),
    demo(1, "consumer", OTHERS, "education", 19000, 100, 100_000),
    demo(2, "R", OTHERS, "education", 16000, 100, 50_000),
    demo(2, "P", OTHERS, "education", 16000, 100, 50_000),
    demo(2, "C", OTHERS, "education", 16000, 100, 50_000),
    demo(2, "upi_credit_card", OTHERS, "education", 30000, 100, 50_000),
    demo(3, "business", OTHERS, "travel", 18500, 100, 50_000),
    demo(3, "consumer", OTHERS, "travel", 13900, 100, 50_000),
    demo(4, "business", OTHERS, "education", 18500, 100, 95_000),
    demo(4, "consumer", OTHERS, "education", 12900, 100, 95_000),
    demo(5, "business", OTHERS, "travel", 18500, 100, 40_000),
    demo(5, "consumer", OTHERS, "travel", 13900, 100, 40_000),
    demo(6, "CC", OTHERS, "travel", 14500, 100, 100_000),
    demo(7, "upi_credit_card", OTHERS, "travel", 30000, 100, 50_000),
    demo(7, "C", OTHERS, "travel", 16000, 100, 50_000),
    demo(7, "P", OTHERS, "travel", 16000, 100, 50_000),
    demo(7, "R", OTHERS, "travel", 16000, 100, 50_000),
    demo(8, "corporate", OTHERS, "education", 18000, 100, 200_000),
    demo(8, "domestic", OTHERS, "education", 14000, 100, 200_000),
    demo(9, "Visa", OTHERS, "general", 12000, 100, 95_000),
    demo(10, "CC", OTHERS, "general", 12000, 10, 100_000),
    demo(9, "business_visa", "HDFC", "general", 29000, 100, 95_000),
    demo(9, "Visa", "HDFC", "general", 14000, 100, 95_000),
    demo(9, "business_visa", OTHERS, "general", 15000, 100, 95_000),
    demo(9, "upi", OTHERS, "general", 30000, 100, 95_000),
];

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub companies: usize,
    pub gateways: usize,
    pub rates: usize,
}

/// Seed the demo catalogue into an empty store.
///
/// Returns `None` without writing anything when the store already has
/// companies.
pub async fn seed_demo_data(store: &dyn EntityStore) -> Result<Option<SeedSummary>, StoreError> {
    if !store.list_companies().await?.is_empty() {
        info!("Store already holds data, skipping demo seed");
        return Ok(None);
    }

    let company = store
        .create_company(NewCompany {
            name: "SLPE".to_string(),
            description: "SLPE Service Provider".to_string(),
            status: EntityStatus::Active,
        })
        .await?;

    let mut gateway_ids = Vec::with_capacity(DEMO_GATEWAYS.len());
    for (name, pg_partner) in DEMO_GATEWAYS {
        let gateway = store
            .create_gateway(NewGateway {
                name: name.to_string(),
                company_id: company.id,
                pg_partner: pg_partner.to_string(),
                status: EntityStatus::Active,
            })
            .await?;
        gateway_ids.push(gateway.id);
    }

    for rate in &DEMO_RATES {
        let candidate = RateCandidate {
            gateway_id: gateway_ids[rate.gateway - 1],
            card_type: rate.card_type.to_string(),
            card_issuer: rate.card_issuer.to_string(),
            category: rate.category.to_string(),
            commission: Decimal::new(rate.commission, 4).normalize(),
            surcharge: Decimal::ZERO,
            min_amount: Decimal::from(rate.min_amount),
            max_amount: Decimal::from(rate.max_amount),
        };
        store
            .write_rate(RateWrite::Create(candidate), &|ctx| {
                validate_rate(ctx.validation_input())
            })
            .await?;
    }

    let summary = SeedSummary {
        companies: 1,
        gateways: gateway_ids.len(),
        rates: DEMO_RATES.len(),
    };
    info!(
        companies = summary.companies,
        gateways = summary.gateways,
        rates = summary.rates,
        "Seeded demo rate catalogue"
    );
    Ok(Some(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use domain::models::{RateFilter, RateSettings};
    use domain::services::{resolve_rate, IssuerMatch, RateQuery};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_seed_loads_demo_catalogue() {
        let store = MemoryStore::new();
        let summary = seed_demo_data(&store).await.unwrap().unwrap();

        assert_eq!(
            summary,
            SeedSummary {
                companies: 1,
                gateways: 10,
                rates: 25
            }
        );
        assert_eq!(store.list_gateways(None).await.unwrap().len(), 10);
        assert_eq!(store.list_rates(&RateFilter::default()).await.unwrap().len(), 25);
        assert_eq!(store.get_settings().await.unwrap(), RateSettings::default());
    }

    #[tokio::test]
    async fn test_seed_skips_populated_store() {
        let store = MemoryStore::new();
        seed_demo_data(&store).await.unwrap();
        assert!(seed_demo_data(&store).await.unwrap().is_none());
        assert_eq!(store.list_companies().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_seeded_hdfc_rate_beats_fallback() {
        let store = MemoryStore::new();
        seed_demo_data(&store).await.unwrap();

        let gateway = store.get_gateway(9).await.unwrap().unwrap();
        assert_eq!(gateway.name, "Razorpay");
        let rates = store.list_rates(&RateFilter::for_gateway(9)).await.unwrap();

        let query = RateQuery {
            gateway_id: 9,
            card_type: "business_visa".to_string(),
            card_issuer: "HDFC".to_string(),
            category: "general".to_string(),
            amount: dec!(1000),
        };
        let matched = resolve_rate(&query, Some(&gateway), &rates).unwrap();
        assert_eq!(matched.issuer_match, IssuerMatch::Exact);
        assert_eq!(matched.rate.commission, dec!(2.9));

        let query = RateQuery {
            card_issuer: "ICICI".to_string(),
            ..query
        };
        let matched = resolve_rate(&query, Some(&gateway), &rates).unwrap();
        assert_eq!(matched.issuer_match, IssuerMatch::Fallback);
        assert_eq!(matched.rate.commission, dec!(1.5));
    }
}
