//! Builds the EVMDD of an arithmetic term and prints it as DOT.
//!
//! Run with:
//! ```bash
//! cargo run --example evmdd -- "A*B*B + C + 2" --order A,B,C --domains 2,3,2 --eval A=1,B=2,C=0
//! ```

use std::collections::HashMap;

use clap::Parser;
use color_eyre::eyre::{bail, eyre};

use evmdd_rs::manager::Reduction;
use evmdd_rs::parser::{parse_term, term_to_evmdd, TermOptions};

#[derive(Debug, Parser)]
#[command(author, version, about = "Build the EVMDD of an arithmetic term")]
struct Cli {
    /// Function term, e.g. "A*B*B + C + 2".
    term: String,

    /// Variable ordering. Defaults to the sorted variables of the term.
    #[arg(long, value_name = "VARS", value_delimiter = ',')]
    order: Vec<String>,

    /// Domain sizes, one per variable of the ordering. Defaults to 2.
    #[arg(long, value_name = "SIZES", value_delimiter = ',')]
    domains: Vec<String>,

    /// Build the quasi-reduced diagram.
    #[arg(long)]
    quasi: bool,

    /// Valuation to evaluate the diagram under, e.g. "A=1,B=2".
    #[arg(long, value_name = "VALUATION", value_delimiter = ',')]
    eval: Vec<String>,

    /// Write DOT to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    let level = if args.verbose {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };
    simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let mut order: Vec<String> = args.order.iter().map(|s| s.trim().to_string()).collect();
    if order.is_empty() {
        order = parse_term(&args.term)?.variables().into_iter().collect();
        log::info!("No variable ordering specified, using lexicographic ordering {:?}", order);
    }

    let mut options = TermOptions::default().with_order(order.clone());
    if args.domains.is_empty() {
        log::info!("No domain sizes specified, assuming binary domains");
    } else {
        if args.domains.len() != order.len() {
            bail!(
                "{} domain sizes given for {} variables",
                args.domains.len(),
                order.len()
            );
        }
        for (name, size) in order.iter().zip(&args.domains) {
            let size: u64 = size.trim().parse()?;
            options = options.with_domain(name.clone(), size);
        }
    }
    if args.quasi {
        options = options.with_reduction(Reduction::Quasi);
    }

    let (mgr, f) = term_to_evmdd(&args.term, &options)?;
    log::info!("mgr = {:?}", mgr);
    log::info!(
        "f = {}: {} nodes, {} edges, cache: {}",
        f,
        mgr.size(f),
        mgr.num_edges(f),
        mgr.cache_stats()
    );
    for var in mgr.vars() {
        log::debug!("{}: {} nodes", mgr.var_name(var)?, mgr.num_nodes_at(var));
    }

    if !args.eval.is_empty() {
        let mut valuation = HashMap::new();
        for assignment in &args.eval {
            let (name, value) = assignment
                .split_once('=')
                .ok_or_else(|| eyre!("expected NAME=VALUE, got `{}`", assignment))?;
            valuation.insert(name.trim().to_string(), value.trim().parse::<i64>()?);
        }
        let value = mgr.evaluate(f, &valuation)?;
        println!("f({}) = {}", args.eval.join(", "), value);
    }

    let dot = mgr.to_dot(&[f])?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, dot)?;
            log::info!("DOT written to {}", path);
        }
        None => print!("{}", dot),
    }

    Ok(())
}
