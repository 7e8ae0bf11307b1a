use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pu_core::{
    COMPOSITE_UNITS, Dimension, Ladder, PrefixRegistry, Quantity, UnitParser, constants,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod config;

use config::{CliError, CliResult, Config};

#[derive(Parser)]
#[command(name = "pu-cli")]
#[command(about = "physunits CLI - dimensional analysis of SI quantities", long_about = None)]
struct Cli {
    /// YAML file with custom prefixes
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a unit expression into its dimension vector
    Parse {
        /// Unit expression, e.g. "kg*m/s^2"
        expr: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Re-express a quantity with another prefix
    Convert {
        /// Quantity, e.g. "2.5 km"
        #[arg(allow_hyphen_values = true)]
        quantity: String,
        /// Target prefix symbol ("" for none)
        prefix: String,
    },
    /// Convert a quantity to a compatible prefixed unit expression
    To {
        #[arg(allow_hyphen_values = true)]
        quantity: String,
        /// Target unit expression, e.g. "mm^2"
        unit: String,
    },
    /// Pick the best engineering prefix for a quantity
    Normalize {
        #[arg(allow_hyphen_values = true)]
        quantity: String,
        /// Decimal places to keep
        #[arg(long, default_value_t = 4)]
        precision: usize,
        /// Allow c, d, da and h with a [1, 10) mantissa
        #[arg(long)]
        tenths: bool,
    },
    /// Combine two quantities: + - * / (or add sub mul div)
    Calc {
        #[arg(allow_hyphen_values = true)]
        left: String,
        op: String,
        #[arg(allow_hyphen_values = true)]
        right: String,
    },
    /// Raise a quantity to a power
    Pow {
        #[arg(allow_hyphen_values = true)]
        quantity: String,
        #[arg(allow_hyphen_values = true)]
        exponent: f64,
    },
    /// List registered prefixes
    Prefixes,
    /// List named SI units
    Units,
    /// List the physical constants catalogue
    Constants,
}

#[derive(Serialize)]
struct ParseReport<'a> {
    expr: &'a str,
    display: String,
    dimensionless: bool,
    exponents: Vec<(String, i32)>,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let registry = config.registry()?;

    match cli.command {
        Commands::Parse { expr, json } => {
            println!("{}", render_parse(&registry, &expr, json)?);
            Ok(())
        }
        Commands::Convert { quantity, prefix } => {
            let q = Quantity::parse_with(&quantity, &registry)?;
            println!("{}", q.convert(&prefix, &registry)?);
            Ok(())
        }
        Commands::To { quantity, unit } => {
            let q = Quantity::parse_with(&quantity, &registry)?;
            println!("{}", q.to(&unit, &registry)?);
            Ok(())
        }
        Commands::Normalize {
            quantity,
            precision,
            tenths,
        } => {
            let ladder = if tenths {
                Ladder::Tenths
            } else {
                Ladder::Engineering
            };
            let q = Quantity::parse_with(&quantity, &registry)?;
            println!("{}", q.pretty_with(precision, ladder));
            Ok(())
        }
        Commands::Calc { left, op, right } => {
            println!("{}", calc(&registry, &left, &op, &right)?);
            Ok(())
        }
        Commands::Pow { quantity, exponent } => {
            let q = Quantity::parse_with(&quantity, &registry)?;
            println!("{}", q.powf(exponent)?);
            Ok(())
        }
        Commands::Prefixes => {
            for prefix in registry.iter() {
                let symbol = if prefix.symbol().is_empty() {
                    "(none)"
                } else {
                    prefix.symbol()
                };
                println!("{:>8}  {:e}", symbol, prefix.factor());
            }
            Ok(())
        }
        Commands::Units => {
            for unit in COMPOSITE_UNITS {
                println!("{:>4}  {:<10} {:?}", unit.symbol, unit.name, unit.units.exponents());
            }
            Ok(())
        }
        Commands::Constants => {
            for (name, q) in constants::catalogue() {
                println!("{:<28} {}", name, q);
            }
            Ok(())
        }
    }
}

fn parse_report<'a>(registry: &PrefixRegistry, expr: &'a str) -> CliResult<ParseReport<'a>> {
    let units = UnitParser::new(registry).parse(expr)?;
    Ok(ParseReport {
        expr,
        display: units.display_name(),
        dimensionless: units.is_dimensionless(),
        exponents: Dimension::ALL
            .iter()
            .map(|d| (d.symbol().to_string(), units.exponent(*d)))
            .collect(),
    })
}

fn render_parse(registry: &PrefixRegistry, expr: &str, json: bool) -> CliResult<String> {
    let report = parse_report(registry, expr)?;
    if json {
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    let mut out = if report.dimensionless {
        format!("{expr} = dimensionless")
    } else {
        format!("{expr} = {}", report.display)
    };
    for (dim, (_, e)) in Dimension::ALL.iter().zip(&report.exponents) {
        if *e != 0 {
            out.push_str(&format!("\n  {:<20} {:>3}", dim.to_string(), e));
        }
    }
    Ok(out)
}

fn calc(registry: &PrefixRegistry, left: &str, op: &str, right: &str) -> CliResult<Quantity> {
    let a = Quantity::parse_with(left, registry)?;
    let b = Quantity::parse_with(right, registry)?;
    let result = match op {
        "+" | "add" => a.add(&b)?,
        "-" | "sub" => a.sub(&b)?,
        "*" | "x" | "mul" => a.mul(&b)?,
        "/" | "div" => a.div(&b)?,
        _ => {
            return Err(CliError::UnknownOperator { op: op.to_string() });
        }
    };
    tracing::debug!(%a, %b, op, %result, "calc");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pu_core::PuError;

    fn reg() -> PrefixRegistry {
        PrefixRegistry::standard()
    }

    #[test]
    fn calc_operator_aliases() {
        let reg = reg();
        for op in ["+", "add"] {
            assert_eq!(calc(&reg, "1.5 km", op, "250 m").unwrap().to_string(), "1.75 km");
        }
        for op in ["-", "sub"] {
            assert_eq!(calc(&reg, "2 km", op, "500 m").unwrap().to_string(), "1.5 km");
        }
        for op in ["*", "x", "mul"] {
            assert_eq!(calc(&reg, "10 N", op, "200 m").unwrap().to_string(), "2.0 kJ");
        }
        for op in ["/", "div"] {
            assert_eq!(calc(&reg, "100 m", op, "4 s").unwrap().to_string(), "25.0 m/s");
        }
    }

    #[test]
    fn calc_rejects_unknown_operator() {
        let err = calc(&reg(), "1 m", "^", "2 m").unwrap_err();
        assert!(matches!(err, CliError::UnknownOperator { ref op } if op == "^"));
    }

    #[test]
    fn calc_surfaces_engine_errors() {
        assert!(matches!(
            calc(&reg(), "1 m", "+", "1 s"),
            Err(CliError::Engine(PuError::DimensionMismatch { op: "add", .. }))
        ));
        assert!(matches!(
            calc(&reg(), "1 m", "/", "0 s"),
            Err(CliError::Engine(PuError::DivisionByZero { .. }))
        ));
        assert!(matches!(
            calc(&reg(), "fast", "+", "1 m"),
            Err(CliError::Engine(PuError::InvalidQuantity { .. }))
        ));
    }

    #[test]
    fn calc_uses_custom_prefixes() {
        let mut reg = reg();
        reg.register("Ki", 1024.0).unwrap();
        let sum = calc(&reg, "1 KiA", "+", "1024 A").unwrap();
        assert_eq!(sum.magnitude(), 2048.0);
    }

    #[test]
    fn parse_text_lists_nonzero_exponents() {
        let out = render_parse(&reg(), "kg*m/s^2", false).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "kg*m/s^2 = N");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].trim_start().starts_with("length"));
        assert!(lines[3].trim_start().starts_with("time"));
        assert!(lines[3].ends_with("-2"));

        assert_eq!(render_parse(&reg(), "m/m", false).unwrap(), "m/m = dimensionless");
    }

    #[test]
    fn parse_json_report_shape() {
        let out = render_parse(&reg(), "J/s", true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["expr"], "J/s");
        assert_eq!(value["display"], "W");
        assert_eq!(value["dimensionless"], false);
        let exponents = value["exponents"].as_array().unwrap();
        assert_eq!(exponents.len(), 7);
        assert_eq!(exponents[0], serde_json::json!(["m", 2]));
        assert_eq!(exponents[1], serde_json::json!(["kg", 1]));
        assert_eq!(exponents[2], serde_json::json!(["s", -3]));
    }

    #[test]
    fn parse_errors_propagate() {
        assert!(matches!(
            render_parse(&reg(), "m*furlong", false),
            Err(CliError::Engine(PuError::UnknownUnitSymbol { .. }))
        ));
        assert!(matches!(
            render_parse(&reg(), "m^2147483647*m", true),
            Err(CliError::Engine(PuError::MalformedExponent { .. }))
        ));
    }

    #[test]
    fn cli_arguments_parse() {
        let cli = Cli::try_parse_from(["pu-cli", "calc", "-3 m", "+", "5 m"]).unwrap();
        assert!(matches!(cli.command, Commands::Calc { ref left, .. } if left == "-3 m"));

        let cli = Cli::try_parse_from(["pu-cli", "normalize", "0.032 m", "--tenths"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Normalize {
                tenths: true,
                precision: 4,
                ..
            }
        ));
    }
}
