//! Console walkthrough of the admin list pages
//!
//! This example demonstrates:
//! - Loading dashboard settings from YAML
//! - Searching, filtering, sorting and paging the donations list
//! - Donation summary cards and the overview cards with recent users
//! - Bulk-approving volunteer applications with one failing call
//! - Exporting the filtered rows and a donation receipt to disk

use admin::entities::PaymentDetails;
use admin::prelude::*;
use chrono::Duration;
use std::sync::Arc;

const CONFIG: &str = r#"
timezone_offset_minutes: 330
access: authenticated
lists:
  donations:
    page_size: 10
    export_file_name: donations.csv
  volunteers:
    page_size: 12
    page_size_options: [12]
"#;

fn donations(now: DateTime<Utc>) -> Vec<Donation> {
    let names = ["Asha Rao", "Vikram Smith", "Meera Shah", "John Smithson", "Farah Khan"];
    let statuses = ["completed", "pending", "completed", "failed", "paid"];

    (0..25)
        .map(|i| {
            let (first, last) = names[i % names.len()].split_once(' ').unwrap_or(("Donor", ""));
            Donation {
                id: format!("don-{i:02}"),
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: format!("{}@example.org", first.to_lowercase()),
                amount: 250.0 * (1 + i % 4) as f64,
                currency: "INR".to_string(),
                program: Some(if i % 2 == 0 { "Education" } else { "Health" }.to_string()),
                donation_type: Some("one-time".to_string()),
                anonymous: i % 7 == 0,
                payment_details: PaymentDetails {
                    status: Some(statuses[i % statuses.len()].to_string()),
                    transaction_id: Some(format!("pay_{i:04}")),
                    method: Some("upi".to_string()),
                },
                created_at: (now - Duration::days(i as i64 * 3)).to_rfc3339(),
                ..Default::default()
            }
        })
        .collect()
}

fn volunteers(now: DateTime<Utc>) -> Vec<Volunteer> {
    ["Kabir Das", "Lata Menon", "Nikhil Iyer"]
        .iter()
        .enumerate()
        .map(|(i, name)| Volunteer {
            id: format!("vol-{i}"),
            full_name: name.to_string(),
            email: format!("vol{i}@example.org"),
            phone: "9000000000".to_string(),
            role: Some("Teaching".to_string()),
            application_date: (now - Duration::days(i as i64)).to_rfc3339(),
            ..Default::default()
        })
        .collect()
}

fn users(now: DateTime<Utc>) -> Vec<User> {
    (0..14)
        .map(|i| User {
            id: format!("user-{i}"),
            first_name: format!("Member{i}"),
            last_name: "Sharma".to_string(),
            email: format!("member{i}@example.org"),
            mobile: "9876543210".to_string(),
            status: "active".to_string(),
            created_at: (now - Duration::hours(i * 5)).to_rfc3339(),
            ..Default::default()
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    admin::logging::init();

    println!("📋 Community Admin Console");
    println!("==========================\n");

    let config = DashboardConfig::from_yaml_str(CONFIG)?;
    let now = Utc::now();
    let session = Session::admin(
        Admin {
            id: "admin-1".to_string(),
            name: "Asha".to_string(),
            email: "asha@example.org".to_string(),
            roles: vec!["admin".to_string()],
        },
        "demo-token",
    );
    let context = DashboardContext::new(session, Arc::new(TracingNotifier));
    let export_dir = std::env::temp_dir().join("community-admin-demo");
    let exports = FileExportSink::new(&export_dir);

    // Donations
    let donation_store = InMemoryRecordStore::with_records(donations(now));
    let mut donation_view = ListView::from_config(
        Arc::new(donation_store.clone()),
        Arc::new(donation_store.clone()),
        Donation::descriptor(),
        context.clone(),
        &config,
    );
    donation_view.refresh().await?;

    let summary = DonationSummary::compute(donation_view.records(), now, config.utc_offset());
    println!("💰 Donations");
    println!("   - total received: {}", admin::dashboard::format_inr(summary.total_amount));
    println!("   - this month:     {}", admin::dashboard::format_inr(summary.this_month));
    println!("   - average:        {}", admin::dashboard::format_inr(summary.average));
    println!("   - donors:         {}\n", summary.total_donors);

    donation_view.set_search("smith");
    donation_view.set_filter("paymentStatus", "completed");
    donation_view.toggle_sort("amount");
    let page = donation_view.visible();
    println!(
        "🔎 'smith' + completed, by amount: {} matches, page {} of {}",
        page.total_filtered(),
        page.pagination.page,
        page.total_pages()
    );
    for donation in &page.data {
        println!("   - {:<16} {:>8}", donation.donor_name(), admin::dashboard::format_inr(donation.amount));
    }

    let artifact = donation_view.export_csv(&exports).await?;
    println!("\n📄 Exported {} to {}", artifact.file_name, export_dir.display());

    if let Some(first) = donation_view.records().first() {
        let receipt = download_receipt(
            first,
            ReceiptIssuer {
                name: "Community Trust".to_string(),
                website: "community.example.org".to_string(),
                email: "hello@community.example.org".to_string(),
                ..Default::default()
            },
            config.utc_offset(),
            &TextReceiptRenderer,
            &exports,
            donation_view.context(),
        )
        .await?;
        println!("🧾 Receipt written as {}\n", receipt.file_name);
    }

    // Volunteers
    let volunteer_store = InMemoryRecordStore::with_records(volunteers(now));
    volunteer_store.fail_mutations_for("vol-1", "upstream timeout");
    let mut volunteer_view = ListView::from_config(
        Arc::new(volunteer_store.clone()),
        Arc::new(volunteer_store.clone()),
        Volunteer::descriptor(),
        context.clone(),
        &config,
    );
    volunteer_view.refresh().await?;
    volunteer_view.toggle_all_visible();

    let outcome = volunteer_view.run_bulk(BulkAction::Approve).await?;
    println!("🙋 Bulk approve: {}", outcome.summary());
    for volunteer in volunteer_view.records() {
        println!("   - {:<12} {}", volunteer.full_name, volunteer.status_label());
    }

    // Overview
    let overview = DashboardOverview::compute(&users(now), volunteer_view.records(), &[]);
    println!(
        "\n📊 {} users, {} volunteers, {} events",
        overview.total_users, overview.total_volunteers, overview.total_events
    );
    if let Some(newest) = overview.recent_users.first() {
        println!("👥 {} most recent users, newest: {}", overview.recent_users.len(), newest.full_name());
    }

    println!("\n✅ Done");
    Ok(())
}
