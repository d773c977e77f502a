use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use zakat_ledger::{
    compute_entitlement, display_entitlement, infer_unit_with_rule, load_records,
    load_recipients, validate_payment, Category, DashboardReport, MemoryStore, OrderBy, Payment,
    RecipientGroup, RecordStore, Unit, ZakatConfig,
};

const USAGE: &str = "\
Usage:
  zakat-ledger dashboard <payments> <categories> [--donors F] [--warga F] [--lainnya F] [--json]
  zakat-ledger entitlement <base_entitlement> <beras|uang>
  zakat-ledger infer <stored_value> [base_entitlement]
  zakat-ledger audit <payments>

Table exports may be CSV or JSON. Config is read from $ZAKAT_CONFIG.";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = ZakatConfig::from_env_or_default()?;

    match args.first().map(String::as_str) {
        Some("dashboard") => run_dashboard(&args[1..], &config),
        Some("entitlement") => run_entitlement(&args[1..], &config),
        Some("infer") => run_infer(&args[1..], &config),
        Some("audit") => run_audit(&args[1..], &config),
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }
}

// ============================================================================
// DASHBOARD
// ============================================================================

struct DashboardArgs {
    payments: PathBuf,
    categories: PathBuf,
    donors: Option<PathBuf>,
    warga: Option<PathBuf>,
    lainnya: Option<PathBuf>,
    json: bool,
}

fn parse_dashboard_args(args: &[String]) -> Result<DashboardArgs> {
    let mut positional = Vec::new();
    let mut donors = None;
    let mut warga = None;
    let mut lainnya = None;
    let mut json = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--donors" | "--warga" | "--lainnya" => {
                let value = iter
                    .next()
                    .with_context(|| format!("{} needs a file argument", arg))?;
                let slot = match arg.as_str() {
                    "--donors" => &mut donors,
                    "--warga" => &mut warga,
                    _ => &mut lainnya,
                };
                *slot = Some(PathBuf::from(value));
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    if positional.len() != 2 {
        bail!("dashboard needs <payments> and <categories>\n\n{}", USAGE);
    }

    let categories = positional.pop().unwrap_or_default();
    let payments = positional.pop().unwrap_or_default();

    Ok(DashboardArgs {
        payments,
        categories,
        donors,
        warga,
        lainnya,
        json,
    })
}

fn load_optional<T: serde::de::DeserializeOwned>(path: Option<&Path>) -> Result<Vec<T>> {
    match path {
        Some(path) => load_records(path),
        None => Ok(Vec::new()),
    }
}

fn run_dashboard(args: &[String], config: &ZakatConfig) -> Result<()> {
    let args = parse_dashboard_args(args)?;

    // The store hands payments over oldest first; exports may not be
    let payments: Vec<Payment> = load_records(&args.payments)?;
    let payments = MemoryStore::from_records(payments).list(OrderBy::CreatedAsc);
    let categories: Vec<Category> = load_records(&args.categories)?;
    let donors = load_optional(args.donors.as_deref())?;

    let mut recipients = Vec::new();
    if let Some(path) = &args.warga {
        recipients.extend(load_recipients(path, RecipientGroup::Warga)?);
    }
    if let Some(path) = &args.lainnya {
        recipients.extend(load_recipients(path, RecipientGroup::Lainnya)?);
    }

    let report = DashboardReport::build(
        &donors,
        &recipients,
        &payments,
        &categories,
        config,
        Utc::now(),
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("📊 Laporan Zakat");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Periode: {}", report.period);
    println!();
    println!("  Total Muzakki   {}", report.stats.total_donors);
    println!(
        "  Total Mustahik  {} ({} warga, {} lainnya)",
        report.stats.total_recipients, report.stats.residents, report.stats.others
    );
    println!("  Total Beras     {}", report.stats.grain_label());
    println!("  Total Uang      {}", report.stats.cash_label());

    println!("\n📅 Pengumpulan per tanggal (beras kg / uang juta)");
    if report.collection.is_empty() {
        println!("  (belum ada pembayaran)");
    }
    for point in &report.collection {
        println!(
            "  {:<8} {:>10.1} {:>10.3}",
            point.date, point.grain_total, point.cash_total
        );
    }

    println!("\n🥧 Distribusi per kategori");
    for slice in &report.distribution {
        let category = categories.iter().find(|c| c.name == slice.name);
        println!(
            "  {:<20} {}",
            slice.name,
            slice.label(category.and_then(|c| c.unit), config)
        );
    }

    Ok(())
}

// ============================================================================
// ENTITLEMENT / INFER
// ============================================================================

fn parse_number(arg: Option<&String>, what: &str) -> Result<f64> {
    let raw = arg.with_context(|| format!("missing {}\n\n{}", what, USAGE))?;
    raw.parse::<f64>()
        .with_context(|| format!("{} is not a number: {}", what, raw))
}

fn run_entitlement(args: &[String], config: &ZakatConfig) -> Result<()> {
    let base = parse_number(args.first(), "base_entitlement")?;
    let raw_unit = args
        .get(1)
        .with_context(|| format!("missing unit\n\n{}", USAGE))?;
    let unit = Unit::parse(raw_unit).with_context(|| format!("unknown unit: {}", raw_unit))?;

    let value = compute_entitlement(base, unit, config.exchange_rate);
    println!("{}", display_entitlement(value, Some(unit), None, config));

    Ok(())
}

fn run_infer(args: &[String], config: &ZakatConfig) -> Result<()> {
    let stored = parse_number(args.first(), "stored_value")?;
    let category = match args.get(1) {
        Some(raw) => Some(Category::new(
            "cli".to_string(),
            parse_number(Some(raw), "base_entitlement")?,
        )),
        None => None,
    };

    let (unit, rule) = infer_unit_with_rule(stored, category.as_ref(), config);
    println!(
        "{} ({:?}) → {}",
        unit,
        rule,
        display_entitlement(stored, Some(unit), None, config)
    );

    Ok(())
}

// ============================================================================
// AUDIT
// ============================================================================

fn run_audit(args: &[String], config: &ZakatConfig) -> Result<()> {
    let path = args
        .first()
        .with_context(|| format!("missing <payments>\n\n{}", USAGE))?;
    let payments: Vec<Payment> = load_records(Path::new(path))?;

    let mut flagged = 0;
    for payment in &payments {
        let report = validate_payment(payment, config);
        if report.issues.is_empty() {
            continue;
        }

        flagged += 1;
        println!("⚠️  {} ({})", payment.head_of_household, report.summary());
        for issue in &report.issues {
            println!("   {:?} {}: {}", issue.severity, issue.field, issue.message);
        }
    }

    println!("\n✓ Checked {} payments, {} flagged", payments.len(), flagged);
    Ok(())
}
