use clap::Parser;
use shortlet_conflict::utils::{error::ErrorSeverity, logger, validation::Validate};
use shortlet_conflict::{
    read_reservations_csv, BookingDecision, BookingError, BookingRequest, BookingService,
    CliConfig, JsonFileStore, Reservation, Settings,
};

enum Outcome {
    Clear,
    Booked(Reservation),
    Conflict(Reservation),
}

async fn run(config: &CliConfig, settings: &Settings) -> shortlet_conflict::Result<Outcome> {
    let checker = settings.checker()?;
    let request = BookingRequest {
        resource_id: config.resource.clone(),
        check_in: config.check_in.clone().into(),
        check_out: config.check_out.clone().into(),
        guest: config.guest.clone(),
    };

    // CSV 模式只讀，不寫入 store
    if let Some(csv_path) = &config.existing_csv {
        let candidate = checker.interval(request.check_in, request.check_out)?;
        let file = std::fs::File::open(csv_path)?;
        let existing: Vec<Reservation> = read_reservations_csv(file, &checker)?
            .into_iter()
            .filter(|r| r.resource_id == request.resource_id)
            .collect();
        tracing::info!(
            "Loaded {} reservation(s) for {} from {}",
            existing.len(),
            request.resource_id,
            csv_path
        );
        return Ok(match checker.find_conflict(&candidate, &existing) {
            Some(conflict) => Outcome::Conflict(conflict.clone()),
            None => Outcome::Clear,
        });
    }

    let store = JsonFileStore::new(&settings.store_path);
    let service = BookingService::new(store, checker);

    if config.commit {
        match service.book(request).await? {
            BookingDecision::Accepted(reservation) => Ok(Outcome::Booked(reservation)),
            BookingDecision::Rejected { conflict } => Ok(Outcome::Conflict(conflict)),
        }
    } else {
        Ok(match service.check(&request).await? {
            Some(conflict) => Outcome::Conflict(conflict),
            None => Outcome::Clear,
        })
    }
}

fn exit_code(e: &BookingError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 1,
        ErrorSeverity::Medium | ErrorSeverity::High | ErrorSeverity::Critical => 3,
    }
}

fn report_failure(e: &BookingError) -> ! {
    tracing::error!("❌ {} (Severity: {:?})", e, e.severity());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    let settings = match config.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            logger::init_cli_logger("info");
            report_failure(&e)
        }
    };

    if settings.json_logs {
        logger::init_json_logger(&settings.log_level);
    } else {
        logger::init_cli_logger(&settings.log_level);
    }

    tracing::info!("Starting shortlet-check");
    tracing::debug!("Effective settings: {:?}", settings);

    if let Err(e) = config.validate() {
        report_failure(&e);
    }

    match run(&config, &settings).await {
        Ok(Outcome::Clear) => {
            println!(
                "✅ {} is free from {} to {}",
                config.resource, config.check_in, config.check_out
            );
        }
        Ok(Outcome::Booked(reservation)) => {
            println!("✅ Booked {}", reservation);
            println!("📁 Saved to: {}", settings.store_path);
        }
        Ok(Outcome::Conflict(conflict)) => {
            println!("⛔ Dates overlap existing reservation {}", conflict);
            std::process::exit(2);
        }
        Err(e) => report_failure(&e),
    }

    Ok(())
}
