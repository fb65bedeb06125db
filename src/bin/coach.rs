use clap::{Parser, Subcommand};
use poker_coach::config::CoachConfig;
use poker_coach::decision::{DecisionAnalyzer, DecisionRequest};
use poker_coach::equity::EquityCalculator;
use poker_coach::evaluator::SevenCardEvaluator;
use poker_coach::range::{get_opponent_range, OpponentInfo, PostflopAction, PreflopAction};
use poker_coach::texture::analyze_board_texture_str;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "poker-coach", version = poker_coach::VERSION)]
#[command(about = "Hold'em decision analysis: equity, opponent ranges, board texture and EV")]
struct Cli {
    /// JSON config file; missing fields use defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Seed for reproducible Monte Carlo runs
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Equity of two or more hands, e.g. `equity "As Kc" "Qd Qc" --board "Jh 2d 5s"`
    Equity {
        /// Hole cards per player
        #[arg(required = true, num_args = 2..)]
        hands: Vec<String>,
        #[arg(short, long, default_value = "")]
        board: String,
        /// Monte Carlo runouts (overrides config)
        #[arg(short, long)]
        iterations: Option<usize>,
    },
    /// Classify how coordinated a board is
    Texture {
        /// Community cards, e.g. "Qh Jh Th"
        cards: String,
    },
    /// Resolve an opponent's likely range
    Range {
        #[arg(long, default_value = "MP")]
        position: String,
        #[arg(long, default_value_t = 0)]
        hands: u32,
        #[arg(long, default_value_t = 25.0)]
        vpip: f64,
        #[arg(long, default_value_t = 15.0)]
        pfr: f64,
        #[arg(long, default_value_t = 1.5)]
        af: f64,
        /// open_raise, call, 3bet, 4bet+ or none
        #[arg(long, value_parser = label::<PreflopAction>)]
        preflop: Option<PreflopAction>,
        /// bet, raise, check or call
        #[arg(long, value_parser = label::<PostflopAction>)]
        postflop: Option<PostflopAction>,
    },
    /// Score a decision read from a JSON request file
    Analyze {
        request: PathBuf,
    },
}

// Parse a snake-case label the same way the JSON input does.
fn label<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string())).map_err(|e| e.to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CoachConfig::from_path(path)?,
        None => CoachConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    match cli.command {
        Commands::Equity { hands, board, iterations } => {
            if let Some(n) = iterations {
                config.equity.iterations = n;
            }
            let names: Vec<String> = (1..=hands.len()).map(|i| format!("player{i}")).collect();
            let players: Vec<(&str, &str)> =
                names.iter().map(String::as_str).zip(hands.iter().map(String::as_str)).collect();
            let calc = EquityCalculator::new(SevenCardEvaluator, config.equity);
            match calc.calculate_equity_str(&players, &board)? {
                Some(result) => print_json(&result)?,
                None => println!("null"),
            }
        }
        Commands::Texture { cards } => print_json(&analyze_board_texture_str(&cards)?)?,
        Commands::Range { position, hands, vpip, pfr, af, preflop, postflop } => {
            let mut villain =
                OpponentInfo::new("villain", position).with_stats(hands, vpip, pfr, af);
            villain.preflop_action = preflop;
            villain.postflop_aggression_this_hand = postflop;
            let range = get_opponent_range(&villain, &config.range);
            print_json(&serde_json::json!({
                "hands": range.len(),
                "combos": range.combo_count(),
                "percentage": range.percentage(),
                "range": range.to_string(),
            }))?;
        }
        Commands::Analyze { request } => {
            let text = std::fs::read_to_string(&request)?;
            let request: DecisionRequest = serde_json::from_str(&text)?;
            let analysis = DecisionAnalyzer::from_config(&config).analyze(&request)?;
            print_json(&analysis)?;
        }
    }
    Ok(())
}
