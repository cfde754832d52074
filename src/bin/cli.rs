//! Option Pricer CLI
//!
//! Usage: `option-pricer [--wide-spreads] [config.json]`
//!
//! `--wide-spreads` uses 10% wings and skips recording when no config file is given.
//!
//! Prints prices, Greeks, hedges, profit heatmaps and strategy summaries for
//! the configured contract, then records the inputs.

use std::process;

use tracing_subscriber::EnvFilter;

use option_pricer::data::{record_quietly, JsonLinesSink, MemorySink};
use option_pricer::models::black_scholes;
use option_pricer::prelude::*;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> PricerResult<()> {
    let mut path = None;
    let mut wide = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--wide-spreads" => wide = true,
            _ if arg.starts_with("--") => {
                return Err(PricerError::invalid_input(format!("unknown flag {}", arg)))
            }
            _ => path = Some(arg),
        }
    }
    let config = match (path, wide) {
        (Some(path), _) => PricerConfig::from_json_file(path)?,
        (None, true) => PricerConfig::wide_spreads(),
        (None, false) => PricerConfig::default(),
    };
    config.validate()?;

    println!("Black-Scholes Option Pricer");
    println!("===========================\n");

    let (call, put) = config.priced_contracts()?;
    print_contract(&call);
    print_prices(&call, &put);
    print_greeks(&call, &put);
    print_hedges(&config.book()?);

    let grid_config = config.grid_config()?;
    let grid = ScenarioGrid::spot_vol(&grid_config)?;
    println!("\nCall P&L (mark-to-model, premium {:.2}):", call.purchase_price());
    print_surface(&option_profit_surface(&grid, &call, OptionType::Call)?);
    println!("\nPut P&L (mark-to-model, premium {:.2}):", put.purchase_price());
    print_surface(&option_profit_surface(&grid, &put, OptionType::Put)?);

    let params = config.strategy_params();
    let curve_axis = grid_config.curve_axis()?;
    println!("\n--- Strategies ---");
    for kind in StrategyKind::ALL {
        let strategy = kind.build(&params)?;
        let curve = profit_curve_on(&strategy, &curve_axis)?;
        print_strategy(kind, &strategy, &curve);
    }

    let fly = StrategyKind::LongButterfly.build(&params)?;
    println!("\n{} P&L:", fly.name());
    print_surface(&par_strategy_surface(&grid, &fly)?);

    let record = config.input_record()?;
    let session = MemorySink::new();
    record_quietly(&session, &record);
    match JsonLinesSink::new(config.recorder.clone()) {
        Ok(sink) => record_quietly(&sink, &record),
        Err(e) => tracing::warn!(error = %e, "Input recorder unavailable"),
    }

    println!("\n--- Done ({} input record) ---", session.len());
    Ok(())
}

fn print_contract(c: &OptionContract) {
    println!("Contract:");
    println!("  Spot: ${:.2}", c.spot());
    println!("  Strike: ${:.2}", c.strike());
    println!("  Time: {:.0} days", c.time() * 365.0);
    println!("  Rate: {:.1}%", c.rate() * 100.0);
    println!("  Vol: {:.1}%\n", c.vol() * 100.0);
}

fn print_prices(call: &OptionContract, put: &OptionContract) {
    let (call_value, put_value) = black_scholes::prices(call);
    println!("Option Prices:");
    println!("  Call: ${:.4}  (paid {:.4})", call_value, call.purchase_price());
    println!("  Put:  ${:.4}  (paid {:.4})", put_value, put.purchase_price());
}

fn print_greeks(call: &OptionContract, put: &OptionContract) {
    let call_greeks = black_scholes::greeks(call, OptionType::Call);
    let put_greeks = black_scholes::greeks(put, OptionType::Put);

    println!("\nGreeks      Call        Put");
    for kind in GreekKind::ALL {
        println!(
            "  {:<6} {:>10.6} {:>10.6}",
            kind.label(),
            call_greeks.get(kind),
            put_greeks.get(kind)
        );
    }
}

fn print_hedges(book: &OptionBook) {
    println!(
        "\nHedges for {} call(s) + {} put(s):",
        book.call_count, book.put_count
    );
    for report in book.hedges() {
        println!(
            "  {:<6} total {:>10.4}: {} calls or {} puts",
            report.greek.label(),
            report.total,
            report.with_call,
            report.with_put
        );
    }
}

fn print_surface(surface: &ScenarioSurface) {
    let y_label = match surface.y_axis().kind() {
        AxisKind::Volatility => "Vol\\Spot",
        _ => "TTM\\Spot",
    };
    print!("{:>9} |", y_label);
    for spot in surface.x_axis().rounded(2) {
        print!(" {:>7.2}", spot);
    }
    println!();
    println!("{}", "-".repeat(10 + 8 * surface.x_axis().len()));

    for (y, row) in surface.rows_top_down() {
        print!("{:>9.2} |", y);
        for value in row {
            print!(" {:>7.2}", value);
        }
        println!();
    }
}

fn print_strategy(kind: StrategyKind, strategy: &Strategy, curve: &ProfitCurve) {
    let greeks = strategy.greeks();
    println!("\n{} ({})", strategy.name(), kind.outlook());
    for leg in strategy.legs() {
        println!("  {} (premium {:.4})", leg.describe(), leg.premium());
    }
    if let Some(stock) = strategy.stock() {
        println!("  long {} share(s) @ {:.2}", stock.quantity, stock.entry_price);
    }
    println!(
        "  Net premium {:.4} | delta {:.4} gamma {:.4} vega {:.4} theta {:.4}",
        strategy.net_premium(),
        greeks.delta,
        greeks.gamma,
        greeks.vega,
        greeks.theta
    );
    let breakevens: Vec<String> = curve.breakevens().iter().map(|b| format!("{:.2}", b)).collect();
    println!(
        "  At expiry: max profit {:.4}, max loss {:.4}, breakeven [{}]",
        curve.max_profit(),
        curve.max_loss(),
        breakevens.join(", ")
    );
}
