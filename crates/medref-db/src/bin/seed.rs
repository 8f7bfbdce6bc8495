//! # Seed Data Generator
//!
//! Populates the database with medicine reference data for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 medicines (default)
//! cargo run -p medref-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p medref-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p medref-db --bin seed -- --db ./data/medref.db
//! ```
//!
//! ## Generated Medicines
//! Each category contributes active ingredients; a medicine combines one
//! ingredient with a manufacturer, dosage form and strength:
//! - Unique name: `{Ingredient} {Form} {Strength}`
//! - Category and manufacturer rotated deterministically
//! - Roughly one in twelve medicines has no category, and one in fifteen
//!   no manufacturer, so exports exercise the "Unknown" bucket

use std::env;

use medref_core::{Ingredient, MedicineRecord};
use medref_db::{Database, DbConfig};

/// Categories with their active ingredients and typical indication.
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "Analgesic",
        "Pain and fever",
        &["Paracetamol", "Ibuprofen", "Aspirin", "Naproxen", "Diclofenac"],
    ),
    (
        "Antibiotic",
        "Bacterial infections",
        &["Amoxicillin", "Azithromycin", "Ciprofloxacin", "Doxycycline", "Cefalexin"],
    ),
    (
        "Antihistamine",
        "Allergic rhinitis",
        &["Cetirizine", "Loratadine", "Fexofenadine", "Chlorphenamine"],
    ),
    (
        "Antihypertensive",
        "High blood pressure",
        &["Amlodipine", "Lisinopril", "Losartan", "Bisoprolol"],
    ),
    (
        "Antidiabetic",
        "Type 2 diabetes",
        &["Metformin", "Gliclazide", "Sitagliptin"],
    ),
    (
        "Gastrointestinal",
        "Acid reflux",
        &["Omeprazole", "Ranitidine", "Lansoprazole", "Loperamide"],
    ),
];

const MANUFACTURERS: &[&str] = &[
    "Bayer",
    "Pfizer",
    "GSK",
    "Novartis",
    "Sanofi",
    "Teva",
    "Sun Pharma",
    "Cipla",
];

/// Dosage forms with the strengths offered in each.
const FORMS: &[(&str, &[&str])] = &[
    ("Tablet", &["250 mg", "500 mg"]),
    ("Capsule", &["200 mg", "400 mg"]),
    ("Syrup", &["125 mg/5 ml"]),
    ("Injection", &["10 mg/ml"]),
];

const CLASSIFICATIONS: &[&str] = &["OTC", "Prescription", "Pharmacy Only"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./medref_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("MedRef Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of medicines to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./medref_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 MedRef Seed Data Generator");
    println!("============================");
    println!("Database:  {}", db_path);
    println!("Medicines: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.table_counts().await?;
    if existing.medicines > 0 {
        println!("⚠ Database already has {} medicines", existing.medicines);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating medicines...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    for (seed, record) in generate_records().take(count).enumerate() {
        if let Err(e) = db.medicines().insert(&record).await {
            eprintln!("Failed to insert {}: {}", record.medicine_name, e);
            continue;
        }
        generated += 1;

        if (seed + 1) % 50 == 0 {
            println!("  Generated {} medicines...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} medicines in {:?}", generated, elapsed);

    let counts = db.table_counts().await?;
    println!(
        "  Tables: {} medicines, {} manufacturers, {} categories",
        counts.medicines, counts.manufacturers, counts.categories
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Every (ingredient, form, strength) combination, in a fixed order.
fn generate_records() -> impl Iterator<Item = MedicineRecord> {
    let mut records = Vec::new();
    let mut seed = 0usize;

    for (category, indication, ingredients) in CATEGORIES {
        for ingredient in ingredients.iter() {
            for (form, strengths) in FORMS {
                for strength in strengths.iter() {
                    records.push(generate_record(category, indication, ingredient, form, strength, seed));
                    seed += 1;
                }
            }
        }
    }

    records.into_iter()
}

fn generate_record(
    category: &str,
    indication: &str,
    ingredient: &str,
    form: &str,
    strength: &str,
    seed: usize,
) -> MedicineRecord {
    let mut record = MedicineRecord::new(format!("{ingredient} {form} {strength}"))
        .dosage_form(form)
        .classification(CLASSIFICATIONS[seed % CLASSIFICATIONS.len()])
        .ingredients(vec![Ingredient {
            name: ingredient.to_string(),
            strength: Some(strength.to_string()),
        }]);

    record.strength = Some(strength.to_string());
    record.indication = Some(indication.to_string());

    if seed % 12 != 11 {
        record = record.category(category);
    }
    if seed % 15 != 14 {
        record = record.manufacturer(MANUFACTURERS[(seed * 7) % MANUFACTURERS.len()]);
    }

    record
}
