//! Tag a small sample batch and print the results.
//!
//! Uses an offline scripted fallback so the demo runs without network
//! access; swap in `gstd-model-client`'s `ModelClient` for live
//! determination.
//!
//! Run with: `cargo run -p gstd-agent --example tag_invoices`

use gstd_agent::{
    DeterminationPipeline, FallbackError, FallbackOutcome, FallbackRequest, GenerativeFallback,
    TaggingRequest,
};
use gstd_core::{ErpSystem, LineItem, TaxEntry, TokenUsage};

struct OfflineFallback;

impl GenerativeFallback for OfflineFallback {
    async fn determine(
        &self,
        _request: &FallbackRequest,
    ) -> Result<FallbackOutcome, FallbackError> {
        Ok(FallbackOutcome {
            tax_code: "R9".to_string(),
            reasoning: "RCM intrastate at 18% maps to the R9 family".to_string(),
            confidence: 0.7,
            usage: TokenUsage {
                prompt: 850,
                completion: 64,
                reasoning: 0,
            },
        })
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let request = TaggingRequest::new(
        ErpSystem::SapEcc,
        vec![
            LineItem::new(
                "Professional consulting services",
                998314,
                "ABC Consultants Pvt Ltd",
                "27AABCU9603R1ZM",
                "27AADCB2501D1ZF",
            )
            .with_tax(vec![TaxEntry::new("CGST", "9%"), TaxEntry::new("SGST", "9%")])
            .with_purchase_order("PO-2024-001", 1)
            .with_amounts("100000.00", "118000.00"),
            LineItem::new(
                "Software license",
                997331,
                "XYZ Tech Solutions",
                "29AABCX1234F1Z5",
                "27AADCB2501D1ZF",
            )
            .with_tax(vec![TaxEntry::new("IGST", "18%")])
            .with_purchase_order("PO-2024-002", 10)
            .with_amounts("50000.00", "590000.00"),
            LineItem::new(
                "Legal services from unregistered vendor",
                998212,
                "Advocate Services",
                "UNREGISTERED",
                "27AADCB2501D1ZF",
            )
            .with_tax(vec![TaxEntry::new("CGST", "9%"), TaxEntry::new("SGST", "9%")]),
        ],
    );

    let mut pipeline = DeterminationPipeline::new(OfflineFallback);
    let response = pipeline.process(&request).await;

    println!("{:=<70}", "");
    println!("TAX TAGGING RESULTS");
    println!("{:=<70}", "");
    for result in &response.results {
        println!(
            "\nLine {}: {}",
            result.line_index + 1,
            result.item_description
        );
        println!("  Tax Code:    {}", result.tax_code);
        println!("  Description: {}", result.tax_description);
        println!(
            "  Confidence:  {:.2} ({})",
            result.confidence, result.provenance
        );
        println!(
            "  Tokens:      prompt {} / completion {} / reasoning {} / total {}",
            result.total_prompt_tokens,
            result.total_completion_tokens,
            result.total_reasoning_tokens,
            result.total_tokens
        );
        if !result.errors.is_empty() {
            println!("  Errors:      {}", result.errors.join("; "));
        }
    }

    let summary = &response.summary;
    println!("\n{:=<70}", "");
    println!("SUMMARY");
    println!("{:=<70}", "");
    println!("  Total lines:        {}", summary.total_lines);
    println!("  Successful:         {}", summary.successful);
    println!("  Manual review:      {}", summary.manual_review);
    println!("  Errors:             {}", summary.errors);
    println!("  Average confidence: {:.3}", summary.average_confidence);
    println!("  Total tokens:       {}", summary.total_tokens);
}
