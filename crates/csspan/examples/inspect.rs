//! Print both trees of a stylesheet and what sits under a position
//!
//! Usage: inspect [FILE] [LINE:COLUMN]

use anyhow::Context;
use csspan::foreign::print_foreign_node_with_details;
use csspan::light::print_node_location;
use csspan::{Config, Inspection, Side};
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = "@media (min-width: 990px) {\n  .bg { background-color: red; }\n}\n.bg { background-color: green; }\n";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("csspan v{}", csspan::VERSION);

    let mut args = std::env::args().skip(1);
    let mut config = Config::default();
    let css = match args.next() {
        Some(path) => {
            config.transform.filename = path.clone();
            std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?
        }
        None => SAMPLE.to_string(),
    };
    let (line, column) = match args.next() {
        Some(position) => parse_position(&position)?,
        None => (1, 8),
    };

    let inspection = Inspection::run(&css, &config)?;

    println!("\n== engine tree ==");
    print!("{}", inspection.tree().dump());

    if let Some(root) = inspection.foreign() {
        println!("\n== foreign tree ==");
        for node in root.walk() {
            println!("{}", print_foreign_node_with_details(node));
        }
    }

    let locator = inspection.locator()?;
    println!("\n== at {}:{} ==", line, column);
    for side in [Side::Light, Side::Foreign] {
        match locator.deepest_at_location(side, line, column) {
            Some(node) => println!("{:?}: {}", side, node.describe()),
            None => println!("{:?}: nothing", side),
        }
    }
    if let Some(csspan::NodeRef::Light(node)) = locator.deepest_at_location(Side::Light, line, column) {
        if let Some(location) = print_node_location(node) {
            println!("engine location {}", location);
        }
    }

    println!("\n== output ==\n{}", inspection.output());
    Ok(())
}

fn parse_position(text: &str) -> anyhow::Result<(u32, u32)> {
    let (line, column) = text.split_once(':').context("expected LINE:COLUMN")?;
    Ok((line.parse()?, column.parse()?))
}
