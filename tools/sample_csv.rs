//! Sample Transaction CSV Generator
//!
//! Writes random card transactions with the columns the analysis service
//! expects, for demo uploads.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use fraudshield::types::Field;
use rand::Rng;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "sample-csv", about = "Generate a sample transactions CSV")]
struct Args {
    /// Number of transactions
    #[arg(short, long, default_value = "100")]
    count: u64,

    /// Share of suspicious-looking transactions
    #[arg(short, long, default_value = "0.1")]
    fraud_rate: f64,

    /// Output file, stdout when omitted
    #[arg(short, long)]
    out: Option<PathBuf>,
}

const FIRST_NAMES: &[&str] = &["Ana", "Ben", "Chloe", "David", "Elena", "Farid", "Grace", "Hiro"];
const LAST_NAMES: &[&str] = &["Silva", "Okafor", "Martin", "Kim", "Novak", "Haddad", "Lee"];
const CITIES: &[&str] = &["Austin", "Denver", "Seattle", "Boston", "Chicago", "94107", "10001"];
const CARD_TYPES: &[&str] = &["Visa", "Mastercard", "Amex", "Discover"];

/// Everyday merchants and their category codes
const MERCHANTS: &[(&str, &str)] = &[
    ("Fresh Market", "5411"),
    ("Corner Bistro", "5812"),
    ("Fuel Stop", "5541"),
    ("City Pharmacy", "5912"),
    ("Book Nook", "5942"),
];

/// Merchants typical of card testing and cash-out fraud
const RISKY_MERCHANTS: &[(&str, &str)] = &[
    ("Quick Wire Transfer", "4829"),
    ("Online Electronics Hub", "5732"),
    ("Gift Card Depot", "5999"),
    ("Crypto Exchange", "6051"),
];

/// Transaction row generator
struct TransactionGenerator {
    rng: rand::rngs::ThreadRng,
    transaction_counter: u64,
}

impl TransactionGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            transaction_counter: 0,
        }
    }

    /// Small amount, everyday merchant, recent daytime timestamp
    fn generate_legitimate(&mut self) -> Vec<String> {
        let amount = self.rng.gen_range(5.0..400.0);
        let merchant = self.random_choice(MERCHANTS);
        let hours_ago = self.rng.gen_range(1..24 * 30);
        self.row(amount, merchant, hours_ago, "USD")
    }

    /// Large amount at a risky merchant, often in a foreign currency
    fn generate_suspicious(&mut self) -> Vec<String> {
        let amount = self.rng.gen_range(1500.0..9000.0);
        let merchant = self.random_choice(RISKY_MERCHANTS);
        let hours_ago = self.rng.gen_range(1..48);
        let currency = self.random_choice(&["USD", "EUR", "RUB"]);
        self.row(amount, merchant, hours_ago, currency)
    }

    fn row(
        &mut self,
        amount: f64,
        (merchant, mcc): (&str, &str),
        hours_ago: i64,
        currency: &str,
    ) -> Vec<String> {
        self.transaction_counter += 1;
        let timestamp = Utc::now() - Duration::hours(hours_ago);
        let cardholder = format!(
            "{} {}",
            self.random_choice(FIRST_NAMES),
            self.random_choice(LAST_NAMES)
        );

        Field::ALL
            .iter()
            .map(|field| match field {
                Field::CardNumber => format!("4{:015}", self.rng.gen_range(0..10u64.pow(15))),
                Field::Amount => format!("{amount:.2}"),
                Field::DateTime => timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                Field::CardholderName => cardholder.clone(),
                Field::MerchantName => merchant.to_string(),
                Field::Mcc => mcc.to_string(),
                Field::Location => self.random_choice(CITIES).to_string(),
                Field::Currency => currency.to_string(),
                Field::CardType => self.random_choice(CARD_TYPES).to_string(),
                Field::TransactionId => format!("TX{:08}", self.transaction_counter),
            })
            .collect()
    }

    fn random_choice<T: Copy>(&mut self, choices: &[T]) -> T {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

/// Quote a value when it would break the row
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn write_row<W: Write>(out: &mut W, values: &[String]) -> std::io::Result<()> {
    let line: Vec<String> = values.iter().map(|v| csv_field(v)).collect();
    writeln!(out, "{}", line.join(","))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_csv=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let fraud_rate = args.fraud_rate.clamp(0.0, 1.0);

    let mut out: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(std::io::BufWriter::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    let header: Vec<String> = Field::ALL.iter().map(|f| f.column().to_string()).collect();
    write_row(&mut out, &header)?;

    let mut generator = TransactionGenerator::new();
    let mut rng = rand::thread_rng();
    let mut suspicious_count = 0;

    for _ in 0..args.count {
        let row = if rng.gen_bool(fraud_rate) {
            suspicious_count += 1;
            generator.generate_suspicious()
        } else {
            generator.generate_legitimate()
        };
        write_row(&mut out, &row)?;
    }
    out.flush()?;

    info!(
        count = args.count,
        suspicious = suspicious_count,
        "Sample transactions written"
    );

    Ok(())
}
