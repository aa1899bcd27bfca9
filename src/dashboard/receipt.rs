//! Donation receipts
//!
//! A receipt is built as a structured document first. A [`ReceiptRenderer`]
//! turns it into file bytes and names the file format; delivering the file is
//! an [`ExportSink`]'s job.

use crate::core::error::{DashboardError, DashboardResult, ExportError};
use crate::core::export::{ExportArtifact, ExportSink};
use crate::core::field::{PLACEHOLDER, parse_timestamp};
use crate::core::notify::Notification;
use crate::dashboard::context::DashboardContext;
use crate::dashboard::summary::format_inr;
use crate::entities::{Donation, or_placeholder};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

/// Currency printed when a donation does not carry one
pub const DEFAULT_CURRENCY: &str = "INR";

/// Organization printed in the receipt header and footer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptIssuer {
    pub name: String,
    pub tagline: String,
    pub website: String,
    pub email: String,
    pub address: String,
}

/// Everything printed on a donation receipt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptDocument {
    pub receipt_number: String,
    pub date: String,
    pub status: String,
    pub donor_name: String,
    pub donor_email: String,
    pub program: String,
    pub donation_type: String,
    pub amount: String,
    pub currency: String,
    pub transaction_id: String,
    pub message: String,
    pub issuer: ReceiptIssuer,
}

impl ReceiptDocument {
    /// Build the receipt; dates are printed in `offset`
    pub fn from_donation(donation: &Donation, issuer: ReceiptIssuer, offset: FixedOffset) -> Self {
        let date = parse_timestamp(&donation.created_at)
            .map(|dt| dt.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        Self {
            receipt_number: donation.id.clone(),
            date,
            status: or_placeholder(donation.payment_status()),
            donor_name: donation.donor_name(),
            donor_email: or_placeholder(Some(&donation.email)),
            program: or_placeholder(donation.program.as_deref()),
            donation_type: or_placeholder(donation.donation_type.as_deref()),
            amount: format_inr(donation.amount),
            currency: if donation.currency.trim().is_empty() {
                DEFAULT_CURRENCY.to_string()
            } else {
                donation.currency.to_uppercase()
            },
            transaction_id: or_placeholder(donation.payment_details.transaction_id.as_deref()),
            message: or_placeholder(donation.message.as_deref()),
            issuer,
        }
    }

    /// `donation-receipt-<id>.<extension>`
    pub fn file_name(&self, extension: &str) -> String {
        format!("donation-receipt-{}.{}", self.receipt_number, extension)
    }
}

/// Turns a receipt document into file bytes
pub trait ReceiptRenderer: Send + Sync {
    /// MIME type of the rendered bytes
    fn content_type(&self) -> &'static str;

    /// File extension matching `content_type`, without the dot
    fn extension(&self) -> &'static str;

    /// Format name shown to the admin, e.g. "PDF"
    fn format_label(&self) -> &'static str;

    fn render(&self, receipt: &ReceiptDocument) -> anyhow::Result<Vec<u8>>;
}

/// Plain-text layout of the receipt, suitable for feeding a PDF primitive
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReceiptRenderer;

impl ReceiptRenderer for TextReceiptRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain;charset=utf-8"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }

    fn format_label(&self) -> &'static str {
        "text"
    }

    fn render(&self, receipt: &ReceiptDocument) -> anyhow::Result<Vec<u8>> {
        let issuer = &receipt.issuer;
        let mut lines: Vec<String> = [&issuer.name, &issuer.tagline]
            .into_iter()
            .filter(|line| !line.is_empty())
            .cloned()
            .collect();
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend([
            "Donation Receipt".to_string(),
            "Thank you for your generous contribution!".to_string(),
            String::new(),
            format!("Receipt No: {}", receipt.receipt_number),
            format!("Date: {}", receipt.date),
            format!("Status: {}", receipt.status),
            String::new(),
            "Donor Details".to_string(),
            format!("Name: {}", receipt.donor_name),
            format!("Email: {}", receipt.donor_email),
            format!("Program: {}", receipt.program),
            format!("Type: {}", receipt.donation_type),
            String::new(),
            "Payment Details".to_string(),
            format!("Amount: {} ({})", receipt.amount, receipt.currency),
            format!("Transaction ID: {}", receipt.transaction_id),
            format!("Message: {}", receipt.message),
            String::new(),
        ]);

        let contact: Vec<&str> = [&issuer.name, &issuer.website, &issuer.email]
            .into_iter()
            .map(String::as_str)
            .filter(|part| !part.is_empty())
            .collect();
        if !contact.is_empty() {
            lines.push(contact.join(" | "));
        }
        if !issuer.address.is_empty() {
            lines.push(issuer.address.clone());
        }
        lines.push("Thank you for making a difference!".to_string());
        lines.push("This is a computer-generated receipt and does not require a signature.".to_string());
        lines.push(String::new());
        Ok(lines.join("\n").into_bytes())
    }
}

/// Render a receipt and hand it to `sink`, notifying once either way
pub async fn download_receipt(
    donation: &Donation,
    issuer: ReceiptIssuer,
    offset: FixedOffset,
    renderer: &dyn ReceiptRenderer,
    sink: &dyn ExportSink,
    context: &DashboardContext,
) -> DashboardResult<ExportArtifact> {
    let receipt = ReceiptDocument::from_donation(donation, issuer, offset);
    let file_name = receipt.file_name(renderer.extension());

    let delivered: anyhow::Result<ExportArtifact> = async {
        let bytes = renderer.render(&receipt)?;
        let artifact = ExportArtifact::new(file_name.clone(), renderer.content_type(), bytes);
        sink.deliver(artifact.clone()).await?;
        Ok(artifact)
    }
    .await;

    match delivered {
        Ok(artifact) => {
            tracing::info!(donation = %donation.id, file = %file_name, "receipt generated");
            context.notify(Notification::success(
                "Receipt Downloaded",
                format!("The donation receipt has been downloaded as {}.", renderer.format_label()),
            ));
            Ok(artifact)
        }
        Err(e) => {
            let err = DashboardError::from(ExportError::WriteFailed {
                file_name,
                message: e.to_string(),
            });
            context.notify(Notification::error("Error", err.to_string()));
            Err(err)
        }
    }
}
