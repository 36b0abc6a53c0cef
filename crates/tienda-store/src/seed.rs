//! First-run data: the launch catalog and a demo account.
//!
//! Seeding only fills empty tables, so it is safe to call on every open.

use tienda_shared::constants::{DEMO_USER_EMAIL, DEMO_USER_NAME, DEMO_USER_PASSWORD};
use tienda_shared::password;

use crate::database::Database;
use crate::error::Result;
use crate::migrations::v004_image_urls::IMAGE_URLS;
use crate::models::{NewUser, Product};

/// What a seeding pass actually wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub products: usize,
    pub demo_user: bool,
}

/// The four launch products with the prices and images a fully migrated
/// install carries.
pub fn default_catalog() -> Vec<Product> {
    let entries: [(i64, &str, &str, f64); 4] = [
        (1, "Cafetera", "Cafetera de goteo compacta", 49.99),
        (2, "Auriculares", "In-ear con cancelación de ruido", 79.99),
        (3, "Mochila", "Mochila urbana 20L", 39.99),
        (4, "Taza térmica", "Taza para café de viaje 350ml", 12.99),
    ];

    entries
        .into_iter()
        .map(|(id, name, description, price)| Product {
            id,
            name: name.to_string(),
            description: description.to_string(),
            price,
            image_res: 0,
            image_url: IMAGE_URLS
                .iter()
                .find(|(image_id, _)| *image_id == id)
                .map(|(_, url)| url.to_string()),
        })
        .collect()
}

/// Seed empty tables, propagating failures.
pub fn try_seed(db: &mut Database) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if db.count_products()? == 0 {
        report.products = db.upsert_products(&default_catalog())?;
    }

    if db.count_users()? == 0 {
        db.insert_user(&NewUser {
            name: DEMO_USER_NAME.to_string(),
            email: DEMO_USER_EMAIL.to_string(),
            password_hash: password::hash_password(DEMO_USER_PASSWORD),
        })?;
        report.demo_user = true;
    }

    Ok(report)
}

/// Seed empty tables.  A failure is logged and otherwise ignored; the
/// database stays usable without sample data.
pub fn seed_if_empty(db: &mut Database) -> SeedReport {
    match try_seed(db) {
        Ok(report) => {
            if report.products > 0 || report.demo_user {
                tracing::info!(
                    products = report.products,
                    demo_user = report.demo_user,
                    "seeded local database"
                );
            }
            report
        }
        Err(e) => {
            tracing::warn!(error = %e, "seeding skipped");
            SeedReport::default()
        }
    }
}
