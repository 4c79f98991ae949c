//! Seed the database with sample data.
//!
//! Importing clears every table, creates the admin user, and inserts the
//! sample catalog with one admin review per product, so the derived
//! `rating`/`num_reviews` columns are consistent from the start.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use secrecy::SecretString;
use sqlx::PgPool;
use tracing::info;

use velour_api::db;
use velour_api::db::products::{ProductRepository, ProductUpdate};
use velour_api::db::users::UserRepository;
use velour_api::services::auth;
use velour_core::{Email, Rating};

/// One sample catalog entry plus the rating of its seed review.
struct SeedProduct {
    name: &'static str,
    image: &'static str,
    brand: &'static str,
    category: &'static str,
    description: &'static str,
    price: Decimal,
    count_in_stock: i32,
    seed_rating: i16,
}

fn sample_products() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Relaxed Linen Shirt",
            image: "/uploads/relaxed-linen-shirt.jpg",
            brand: "Velour",
            category: "Shirts",
            description: "A breathable linen shirt with a relaxed cut, \
                          garment-washed for softness from the first wear.",
            price: dec!(49.90),
            count_in_stock: 12,
            seed_rating: 5,
        },
        SeedProduct {
            name: "High-Rise Straight Jeans",
            image: "/uploads/high-rise-straight-jeans.jpg",
            brand: "Velour Denim",
            category: "Jeans",
            description: "Rigid denim with a high rise and a straight leg \
                          that breaks just above the ankle.",
            price: dec!(89.00),
            count_in_stock: 7,
            seed_rating: 4,
        },
        SeedProduct {
            name: "Merino Crewneck Sweater",
            image: "/uploads/merino-crewneck.jpg",
            brand: "Velour",
            category: "Knitwear",
            description: "Fine-gauge merino knit, fully fashioned, with \
                          ribbed cuffs and hem.",
            price: dec!(119.00),
            count_in_stock: 5,
            seed_rating: 5,
        },
        SeedProduct {
            name: "Pleated Midi Skirt",
            image: "/uploads/pleated-midi-skirt.jpg",
            brand: "Atelier V",
            category: "Skirts",
            description: "Knife pleats in a fluid crepe that holds its \
                          shape, with a concealed side zip.",
            price: dec!(74.50),
            count_in_stock: 9,
            seed_rating: 4,
        },
        SeedProduct {
            name: "Cotton Twill Chore Jacket",
            image: "/uploads/chore-jacket.jpg",
            brand: "Atelier V",
            category: "Outerwear",
            description: "Three-pocket chore jacket in heavyweight cotton \
                          twill that softens with wear.",
            price: dec!(128.00),
            count_in_stock: 4,
            seed_rating: 5,
        },
        SeedProduct {
            name: "Everyday Canvas Tote",
            image: "/uploads/canvas-tote.jpg",
            brand: "Velour",
            category: "Accessories",
            description: "A structured canvas tote with an interior pocket \
                          and riveted handles.",
            price: dec!(32.00),
            count_in_stock: 20,
            seed_rating: 4,
        },
    ]
}

const SEED_REVIEW_COMMENT: &str =
    "Lovely fabric and true to size. Exactly what the photos show.";

/// Import sample data, clearing any existing data first.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is missing, the admin email or
/// password is invalid, or a database operation fails.
pub async fn import(
    admin_name: &str,
    admin_email: &str,
    admin_password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;

    clear_all(&pool).await?;

    let email = Email::parse(admin_email)?;
    let password_hash = auth::hash_password(admin_password)?;

    let users = UserRepository::new(&pool);
    let admin = users.create(admin_name, &email, &password_hash, true).await?;
    info!(admin_id = %admin.id, "admin user created");

    let products = ProductRepository::new(&pool);
    let catalog = sample_products();
    let count = catalog.len();

    for seed in catalog {
        let update = ProductUpdate {
            name: seed.name.to_owned(),
            image: seed.image.to_owned(),
            brand: seed.brand.to_owned(),
            category: seed.category.to_owned(),
            description: seed.description.to_owned(),
            price: seed.price,
            count_in_stock: seed.count_in_stock,
        };
        let product = products.create(admin.id, &update).await?;

        // One seed review per product; add_review keeps the aggregates
        // consistent with the review rows.
        let rating = Rating::new(seed.seed_rating)?;
        products
            .add_review(product.id, admin.id, &admin.name, rating, SEED_REVIEW_COMMENT)
            .await?;
    }

    info!(products = count, "data imported");
    Ok(())
}

/// Clear all data without re-seeding.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is missing or the truncate fails.
pub async fn destroy() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;
    clear_all(&pool).await?;
    info!("data destroyed");
    Ok(())
}

async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "DATABASE_URL not set")?;

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");
    Ok(pool)
}

async fn clear_all(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "TRUNCATE order_items, orders, reviews, products, users RESTART IDENTITY CASCADE",
    )
    .execute(pool)
    .await?;
    Ok(())
}
