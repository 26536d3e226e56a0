use anyhow::Result;
use std::env;

use cpf_auth::{
    customer_count, insert_customer, setup_database, Config, Pipeline, PipelineOutcome,
    SqliteLookup, TokenIssuer,
};
use rusqlite::Connection;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("seed") => run_seed(&args[2..])?,
        Some("check") => run_check(&args[2..])?,
        _ => print_usage(),
    }

    Ok(())
}

fn print_usage() {
    println!("cpf-auth {}", cpf_auth::VERSION);
    println!();
    println!("Usage:");
    println!("  cpf-auth seed <cpf> [name]     Add a customer to the store");
    println!("  cpf-auth check <cpf>           Validate, look up and issue a token");
    println!();
    println!("Environment:");
    println!("  CPF_AUTH_DB            SQLite path (default: cpf-auth.db)");
    println!("  CPF_AUTH_SIGNING_KEY   64-char hex key (default: generated)");
}

fn run_seed(args: &[String]) -> Result<()> {
    let cpf = match args.first() {
        Some(c) => c,
        None => {
            eprintln!("❌ Missing CPF argument");
            eprintln!("   Usage: cpf-auth seed <cpf> [name]");
            std::process::exit(1);
        }
    };
    let name = args.get(1).map(String::as_str);

    println!("🗄️  Seeding customer store");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = Config::from_env()?;
    let conn = Connection::open(&config.db_path)?;
    setup_database(&conn)?;

    if insert_customer(&conn, cpf, name)? {
        println!("✓ Customer added: {}", cpf);
    } else {
        println!("✓ Customer already present: {}", cpf);
    }

    let total = customer_count(&conn)?;
    println!("✓ Store contains {} customers", total);

    Ok(())
}

fn run_check(args: &[String]) -> Result<()> {
    let cpf = args.first().map(String::as_str);

    println!("🔎 CPF check");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = Config::from_env()?;
    let store = SqliteLookup::open(&config.db_path)?;
    let pipeline = Pipeline::new(Box::new(store), TokenIssuer::new(config.signing_key));

    match pipeline.process(cpf) {
        PipelineOutcome::Success {
            cpf,
            registered,
            token,
        } => {
            println!("✓ CPF:        {}", cpf);
            println!("✓ Registered: {}", registered);
            println!("✓ Token:      {}", token);
        }
        PipelineOutcome::BadInput(message) => {
            eprintln!("❌ Rejected: {}", message);
            std::process::exit(1);
        }
        PipelineOutcome::InternalError(cause) => {
            eprintln!("❌ Internal error: {}", cause);
            std::process::exit(1);
        }
    }

    Ok(())
}
