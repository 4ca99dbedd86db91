//! # Live Catalog Navigation Tests
//!
//! This binary exercises `lib_statistics::Client` against the real SCB PxWeb
//! catalog at `api.scb.se`. It walks the hierarchical catalog from the root,
//! descends into the first level it finds, and verifies that classification
//! codes resolve into the expected catalog paths.
//!
//! ## Purpose:
//! The primary goal is to confirm that the navigation endpoint still answers
//! with the mixed level/table link shape this library decodes, and that one
//! subscription delivers exactly one value before completing.
//!
//! These tests are executed asynchronously using `tokio::main`.

#![doc(html_logo_url = "https://example.com/logo.png")] // Placeholder for consistency
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use anyhow::Context;
use futures_util::StreamExt;

use lib_statistics::models::navigation::classification_path;
use lib_statistics::{Client, Configuration, Language, NavigationLink};

/// # Main Test Function
///
/// Executes a series of live navigation tests against the SCB catalog.
///
/// Each test case verifies a specific aspect of catalog traversal.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize diagnostics and the client
    // English is pinned so assertions do not depend on the host locale.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
    let client = Client::new(Configuration::new(Language::English));

    println!("--- Starting Catalog Navigation Tests ---");

    // --- TEST 1: Root Listing ---
    // Verifies that the catalog root answers and decodes into level links.
    println!("\n[Test 1] Testing root listing...");
    let mut stream = client.navigation(&NavigationLink::root());
    let links = stream
        .next()
        .await
        .context("the stream must deliver one value")??;

    // Assert that the root carries catalog areas.
    assert!(!links.is_empty());
    // Assert that the stream terminates after its single value.
    assert!(stream.next().await.is_none());
    println!("✅ Root listing: {} entries", links.len());

    // --- TEST 2: Descend One Level ---
    // Verifies that the id of a level link is usable as the next request path.
    println!("\n[Test 2] Testing descent into '{}'...", links[0].id());
    let mut stream = client.navigation(&links[0]);
    let children = stream
        .next()
        .await
        .context("the stream must deliver one value")??;

    assert!(!children.is_empty());
    println!(
        "✅ Descent: '{}' holds {} entries",
        links[0].label(),
        children.len()
    );

    // --- TEST 3: Classification Paths ---
    // Verifies the code-length rules used to place a table in the hierarchy.
    println!("\n[Test 3] Testing classification path resolution...");
    assert_eq!(classification_path("BE0101"), vec!["BE", "BE0101"]);
    assert_eq!(
        classification_path("AM0208B01"),
        vec!["AM", "AM0208", "AM02081", "AM0208B01"]
    );
    // An unrecognized code length terminates resolution at the code itself.
    assert_eq!(classification_path("BE010101"), vec!["BE010101"]);
    println!("✅ Classification paths resolve as expected");

    println!("\n--- All Tests Passed Successfully ---");
    Ok(())
}
