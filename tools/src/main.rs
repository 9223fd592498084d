//! payreq-runner: headless payment request file generator.
//!
//! Usage:
//!   payreq-runner migrate   --db payreq.db
//!   payreq-runner seed-demo --db payreq.db
//!   payreq-runner generate  --db payreq.db --config payreq.json --request-id REQ
//!                           --method cs --payments P1,P2 --due-from 2026-11-01 --due-until 2026-11-30
//!   payreq-runner generate  --db payreq.db --request-id REQ --method dd --payments P3 --due-date 2026-11-27
//!   payreq-runner reconcile --db payreq.db --config payreq.json --request-id REQ1,REQ2
//!
//! `generate` retries dependency failures (`--retries N`, default 3 attempts).
//! `reconcile` checks each request on its own worker thread.

mod seed;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use payreq_core::{
    clock::{Clock, SystemClock},
    config::GeneratorConfig,
    generator::{generate_payment_request, GenerationContext, PaymentRequest, RequestDates},
    reconcile::reconcile_uploaded_files,
    retry::RetryPolicy,
    storage::LocalObjectStorage,
    store::PaymentStore,
    types::PaymentMethod,
    worker_pool::WorkerPool,
};
use std::{env, sync::mpsc};

const MAX_RECONCILE_WORKERS: usize = 4;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("help");
    let db = arg(&args, "--db").unwrap_or("payreq.db");

    match command {
        "migrate" => {
            open_store(db)?;
            println!("migrated {db}");
        }
        "seed-demo" => {
            let store = open_store(db)?;
            let summary = seed::seed_demo(&store, &SystemClock)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        "generate" => run_generate(&args, db)?,
        "reconcile" => run_reconcile(&args, db)?,
        _ => print_usage(),
    }
    Ok(())
}

fn run_generate(args: &[String], db: &str) -> Result<()> {
    let config = load_config(args)?;
    let store = open_store(db)?;
    let storage = LocalObjectStorage::from_config(&config.storage)?;
    let clock = SystemClock;

    let request_id = arg(args, "--request-id")
        .map(str::to_string)
        .ok_or_else(|| anyhow!("--request-id is required"))?;
    let method = match arg(args, "--method") {
        Some("cs") => PaymentMethod::ConvenienceStore,
        Some("dd") => PaymentMethod::DirectDebit,
        other => bail!("--method must be cs or dd, got {other:?}"),
    };
    let payment_ids: Vec<String> = arg(args, "--payments")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();
    if payment_ids.is_empty() {
        bail!("--payments needs at least one payment id");
    }
    let dates = match method {
        PaymentMethod::ConvenienceStore => RequestDates::ConvenienceStore {
            due_from: date_arg(args, "--due-from")?,
            due_until: date_arg(args, "--due-until")?,
        },
        PaymentMethod::DirectDebit => RequestDates::DirectDebit {
            due_date: date_arg(args, "--due-date")?,
        },
    };

    store.insert_bulk_payment_request(&request_id, method.as_str(), &clock.now_utc())?;

    let ctx = GenerationContext {
        store: &store,
        storage: &storage,
        config: &config,
        clock: &clock,
    };
    let request = PaymentRequest {
        bulk_payment_request_id: request_id,
        payment_ids,
        method,
        dates,
    };
    let policy = RetryPolicy {
        max_attempts: arg(args, "--retries")
            .map(str::parse::<u32>)
            .transpose()
            .context("--retries")?
            .unwrap_or(RetryPolicy::default().max_attempts),
        ..RetryPolicy::default()
    };
    let report = policy.run(|attempt| {
        if attempt > 1 {
            log::info!("generation attempt {attempt} for {}", request.bulk_payment_request_id);
        }
        generate_payment_request(ctx, request.clone())
    })?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.all_uploaded() {
        log::warn!("some files were committed but not uploaded; run reconcile");
    }
    Ok(())
}

fn run_reconcile(args: &[String], db: &str) -> Result<()> {
    let config = load_config(args)?;
    let request_ids: Vec<String> = arg(args, "--request-id")
        .ok_or_else(|| anyhow!("--request-id is required"))?
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    let pool = WorkerPool::new(request_ids.len().min(MAX_RECONCILE_WORKERS));
    let (tx, rx) = mpsc::channel();
    for request_id in request_ids {
        let tx = tx.clone();
        let db = db.to_string();
        let storage_config = config.storage.clone();
        pool.submit(move || {
            let result = (|| -> Result<_> {
                // One connection per worker.
                let store = open_store(&db)?;
                let storage = LocalObjectStorage::from_config(&storage_config)?;
                Ok(reconcile_uploaded_files(&store, &storage, &request_id)?)
            })();
            let _ = tx.send((request_id, result));
        })?;
    }
    drop(tx);
    pool.join()?;

    let mut results: Vec<_> = rx.iter().collect();
    results.sort_by(|a, b| a.0.cmp(&b.0));
    for (request_id, result) in results {
        let missing = result.with_context(|| format!("reconciling {request_id}"))?;
        if missing.is_empty() {
            println!("request {request_id}: every file is in storage");
        } else {
            println!("{}", serde_json::to_string_pretty(&missing)?);
        }
    }
    Ok(())
}

fn open_store(db: &str) -> Result<PaymentStore> {
    let store = PaymentStore::open(db).with_context(|| format!("opening {db}"))?;
    store.migrate()?;
    Ok(store)
}

fn load_config(args: &[String]) -> Result<GeneratorConfig> {
    match arg(args, "--config") {
        Some(path) => GeneratorConfig::load(path),
        None => Ok(GeneratorConfig::default()),
    }
}

fn arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn date_arg(args: &[String], flag: &str) -> Result<NaiveDate> {
    let raw = arg(args, flag).ok_or_else(|| anyhow!("{flag} is required"))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("{flag} {raw}"))
}

fn print_usage() {
    println!("payreq-runner <migrate|seed-demo|generate|reconcile> --db PATH [options]");
    println!("  generate:  --config FILE --request-id ID --method cs|dd --payments ID,ID [--retries N]");
    println!("             cs: --due-from YYYY-MM-DD --due-until YYYY-MM-DD");
    println!("             dd: --due-date YYYY-MM-DD");
    println!("  reconcile: --config FILE --request-id ID[,ID]");
}
