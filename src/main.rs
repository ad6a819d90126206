// Recon Ledger - batch CLI
// Reads a transaction CSV, runs FIFO reconciliation, writes the
// allocation ledger as CSV.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;

use recon_ledger::{export_rows, normalize, read_rows, reconcile, VERSION};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let program = args.first().map(String::as_str).unwrap_or("recon-ledger");
    if args.len() < 2 {
        print_usage(program);
        bail!("missing input file");
    }
    if args[1] == "--help" || args[1] == "-h" {
        print_usage(program);
        return Ok(());
    }

    let input_path = &args[1];
    let output_path = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| "reconciliation_complete.csv".to_string());

    println!("🧾 Recon Ledger v{} - FIFO reconciliation", VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Ingest
    println!("\n📂 Reading {}...", input_path);
    let file = fs::File::open(input_path)
        .with_context(|| format!("failed to open {}", input_path))?;
    let rows = read_rows(file)?;
    println!("✓ Read {} rows", rows.len());

    // 2. Normalize
    let transactions = normalize(&rows);
    let credits = transactions.iter().filter(|t| t.is_credit()).count();
    let debits = transactions.iter().filter(|t| t.is_debit()).count();
    let skipped = transactions.len() - credits - debits;
    println!("✓ Normalized: {} credits, {} debits, {} unmatched rows", credits, debits, skipped);

    // 3. Reconcile
    println!("\n⚖️  Running allocation...");
    let ledger = reconcile(&transactions);
    println!("✓ Produced {} allocation records", ledger.len());

    // 4. Export
    let bytes = export_rows(&ledger)?;
    fs::write(&output_path, bytes)
        .with_context(|| format!("failed to write {}", output_path))?;
    println!("\n💾 Ledger written to {}", output_path);

    Ok(())
}

fn print_usage(program: &str) {
    println!("Usage: {} <input.csv> [output.csv]", program);
    println!();
    println!("Input columns: ID, Date, Amount, UUID");
    println!("Output defaults to reconciliation_complete.csv");
}
