//! Integration tests for outbound bot message building.
//!
//! These tests verify the texts the bot sends - confirmations, usage hints,
//! and the drop notification caption - through the server's public API.

use chrono::Utc;

use dropcast_core::{DropId, StoreId};
use dropcast_server::models::ProductDrop;
use dropcast_server::telegram::{
    CommandKind, build_drop_caption, build_help_message, build_store_not_found_message,
    build_subscribed_message, build_unsubscribed_message, build_usage_message,
};

fn sample_drop() -> ProductDrop {
    ProductDrop {
        id: DropId::generate(),
        store_id: StoreId::generate(),
        title: "Night Runner".to_owned(),
        description: "200 pairs, glow-in-the-dark sole".to_owned(),
        image_url: "https://cdn.example.com/night-runner.jpg".to_owned(),
        price: "$180".to_owned(),
        product_url: "https://shop.example.com/night-runner".to_owned(),
        published_at: None,
        created_at: Utc::now(),
    }
}

// =============================================================================
// Drop Caption Tests
// =============================================================================

#[test]
fn test_caption_structure() {
    let caption = build_drop_caption(&sample_drop());

    let lines: Vec<&str> = caption.lines().collect();
    assert_eq!(lines.len(), 4, "title, price, description, link");
    assert_eq!(lines.first().copied(), Some("🔥 *Night Runner*"));
    assert_eq!(lines.get(1).copied(), Some("$180"));
    assert_eq!(
        lines.last().copied(),
        Some("[Buy now](https://shop.example.com/night-runner)")
    );
}

#[test]
fn test_caption_price_is_passed_through_verbatim() {
    let mut drop = sample_drop();
    drop.price = "ab 79,90 €".to_owned();

    let caption = build_drop_caption(&drop);
    assert!(caption.contains("ab 79,90 €"), "price is an opaque string");
}

// =============================================================================
// Command Reply Tests
// =============================================================================

#[test]
fn test_usage_messages_name_the_right_command() {
    assert!(build_usage_message(CommandKind::Subscribe).contains("/subscribe"));
    assert!(build_usage_message(CommandKind::Unsubscribe).contains("/unsubscribe"));
}

#[test]
fn test_confirmations_and_not_found() {
    assert_eq!(
        build_subscribed_message("Night Division"),
        "✅ Subscribed to Night Division"
    );
    assert_eq!(
        build_unsubscribed_message("Night Division"),
        "❌ Unsubscribed from Night Division"
    );
    assert_eq!(
        build_store_not_found_message("night-division"),
        "❌ Store 'night-division' not found"
    );
}

#[test]
fn test_help_lists_every_command() {
    let help = build_help_message();
    assert!(help.contains("/subscribe"));
    assert!(help.contains("/unsubscribe"));
    assert!(help.contains("/help"));
}
