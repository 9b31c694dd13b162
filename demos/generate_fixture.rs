use std::collections::BTreeSet;
use std::env;
use std::fs::{create_dir_all, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

const SEED: u64 = 42;
const NUM_ACCOUNTS: usize = 10;
const MIN_AMOUNT: f64 = 500.0;
const MAX_AMOUNT: f64 = 50_000.0;

struct GeneratorConfig {
    days: u64,
    transactions_per_day: usize,
    alert_days: u64,
    transaction_start: NaiveDate,
    alert_start: NaiveDate,
    output_dir: String,
}

impl GeneratorConfig {
    fn from_args() -> Self {
        let args: Vec<String> = env::args().collect();
        let days = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(5);
        let transactions_per_day = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(8);

        Self {
            days,
            transactions_per_day,
            alert_days: 5,
            transaction_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            alert_start: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap_or_default(),
            output_dir: "samples/generated".to_string(),
        }
    }
}

fn main() -> io::Result<()> {
    let config = GeneratorConfig::from_args();
    let mut rng = StdRng::seed_from_u64(SEED);
    let accounts: Vec<String> = (0..NUM_ACCOUNTS).map(|i| format!("A{}", 100 + i)).collect();

    create_dir_all(&config.output_dir)?;

    let transactions_path = Path::new(&config.output_dir).join("transactions.csv");
    let alerts_path = Path::new(&config.output_dir).join("alerts.csv");

    println!(
        "Generating {} days x {} transactions for {} accounts in {}...",
        config.days, config.transactions_per_day, accounts.len(), config.output_dir
    );

    let senders = write_transactions(&transactions_path, &config, &accounts, &mut rng)?;
    write_alerts(&alerts_path, &config, &senders, &mut rng)?;

    println!("Generation complete.");

    Ok(())
}

/// Writes the transaction file and returns every account that sent money at least once.
fn write_transactions<R: Rng>(path: &Path, config: &GeneratorConfig, accounts: &[String], rng: &mut R) -> io::Result<BTreeSet<String>> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut senders = BTreeSet::new();

    writeln!(writer, "SYSTEM_DATE,SENDER_ACCOUNT_ID,RECEIVER_ACCOUNT_ID,TXN_AMT_ABS")?;

    for day in 0..config.days {
        let date = config.transaction_start + Days::new(day);

        for _ in 0..config.transactions_per_day {
            let Some(sender) = accounts.choose(rng) else {
                continue;
            };
            let Some(receiver) = accounts.iter().filter(|account| *account != sender).choose(rng) else {
                continue;
            };

            writeln!(writer, "{},{},{},{}", date, sender, receiver, random_amount(rng))?;
            senders.insert(sender.clone());
        }
    }

    writer.flush()?;

    Ok(senders)
}

/// One alert per account for a third of the senders, each on a random day of the alert span.
fn write_alerts<R: Rng>(path: &Path, config: &GeneratorConfig, senders: &BTreeSet<String>, rng: &mut R) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let senders: Vec<&String> = senders.iter().collect();
    let count = (senders.len() / 3).max(1).min(senders.len());

    writeln!(writer, "ACCOUNT_ID,CREATE_DATE,FLAG")?;

    for account in senders.choose_multiple(rng, count) {
        let offset = rng.gen_range(0..config.alert_days);
        writeln!(writer, "{},{},ALERT", account, config.alert_start + Days::new(offset))?;
    }

    writer.flush()?;

    Ok(())
}

fn random_amount<R: Rng>(rng: &mut R) -> Decimal {
    Decimal::from_f64(rng.gen_range(MIN_AMOUNT..MAX_AMOUNT))
        .unwrap_or(Decimal::ZERO)
        .round_dp(2)
}
