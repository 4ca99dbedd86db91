//! # Live Two-Phase Table Fetch Tests
//!
//! This binary exercises the two-phase data path of `lib_statistics::Client`
//! against the real SCB PxWeb catalog at `api.scb.se`, using the national
//! population table (`BE0101A/BefolkningNy`).
//!
//! ## Purpose:
//! The primary goal is to confirm that the descriptor fetched in phase one
//! still carries the content and time dimensions the selection is built
//! from, and that the phase-two data answer decodes into positionally
//! correlated columns and rows.
//!
//! These tests are executed asynchronously using `tokio::main`.

#![doc(html_logo_url = "https://example.com/logo.png")] // Placeholder for consistency
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use anyhow::Context;
use futures_util::StreamExt;

use lib_statistics::{Client, Configuration, DataType, Language};

/// The catalog area of the national population table.
const AREA: &str = "BE0101A";
/// The table holding population by region and year.
const TABLE: &str = "BefolkningNy";

/// # Main Test Function
///
/// Executes a series of live data-fetch tests against the SCB catalog.
///
/// Each test case verifies a specific aspect of the two-phase request path.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize diagnostics and the client
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
    let client = Client::new(Configuration::new(Language::English));

    println!("--- Starting Table Fetch Tests ---");

    // --- TEST 1: Descriptor Shape ---
    // Verifies that the table's metadata decodes and carries the dimensions
    // the selection below depends on.
    println!("\n[Test 1] Testing descriptor fetch for {AREA}/{TABLE}...");
    let mut stream = client.table_descriptor(AREA, TABLE);
    let descriptor = stream
        .next()
        .await
        .context("the stream must deliver one value")??;

    assert!(!descriptor.title.is_empty());
    assert!(!descriptor.columns().is_empty());
    assert!(!descriptor.series().is_empty());
    println!(
        "✅ Descriptor: '{}' with {} variables",
        descriptor.title,
        descriptor.variables.len()
    );

    // --- TEST 2: Two-Phase Fetch ---
    // Verifies that the composed request resolves the descriptor first and
    // builds the selection from it: the whole population, recent years only.
    println!("\n[Test 2] Testing two-phase fetch with a descriptor-driven selection...");
    let mut stream = client
        .table(AREA, TABLE)
        .configure_request_with_descriptor(|builder, descriptor| {
            let columns = descriptor.columns();
            if let Some(contents) = columns.first() {
                let codes: Vec<String> = contents
                    .values()
                    .iter()
                    .take(1)
                    .map(|pair| pair.value.clone())
                    .collect();
                builder.filter_variable(contents, codes);
            }
            builder.between_years(2018, 2020);
        });
    let table = stream
        .next()
        .await
        .context("the stream must deliver one value")??;

    // Assert the positional column/row correlation holds.
    assert!(table.columns.len() >= 2);
    assert!(!table.data.is_empty());
    assert!(table
        .columns
        .iter()
        .any(|column| column.data_type == DataType::Time));
    println!(
        "✅ Two-phase fetch: {} columns, {} rows from '{}'",
        table.columns.len(),
        table.data.len(),
        table.metadata[0].source
    );

    // --- TEST 3: Row Values ---
    // Verifies that the transported string values parse into numbers.
    println!("\n[Test 3] Testing numeric row values...");
    let first = &table.data[0];
    let numbers = first.numeric_values();
    assert_eq!(numbers.len(), first.values.len());
    assert!(numbers.iter().any(|value| *value > 0.0));
    println!("✅ Row values: {:?}", numbers);

    // --- TEST 4: Unconstrained Fetch ---
    // Verifies that an empty selection is accepted and answered.
    println!("\n[Test 4] Testing unconstrained fetch...");
    let mut stream = client.table(AREA, TABLE).into_stream();
    match stream.next().await.context("the stream must deliver one outcome")? {
        Ok(table) => println!("✅ Unconstrained fetch: {} rows", table.data.len()),
        // Very large tables are refused by the catalog; that refusal is a
        // well-formed status outcome, not a client defect.
        Err(error) => println!("✅ Unconstrained fetch refused by the catalog: {error}"),
    }

    println!("\n--- All Tests Passed Successfully ---");
    Ok(())
}
