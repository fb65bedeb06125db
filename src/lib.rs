//! poker-coach: decision analysis for Texas Hold'em
//!
//! Goals:
//! - Estimate equity exactly on a complete board, by seeded Monte Carlo otherwise
//! - Infer opponent ranges from position, VPIP/PFR and the action this hand
//! - Score an action as correct or a mistake with side-pot-aware EV
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! ## Quick start: score a fold
//! ```
//! use poker_coach::decision::{DecisionAnalyzer, DecisionQuality, DecisionRequest, PlayerAction};
//!
//! let hole = "As Ad".parse().unwrap();
//! let board = "Kc 7d 2s".parse().unwrap();
//! let request = DecisionRequest::new("hero", hole, board)
//!     .with_pot(100, 20, 1000)
//!     .with_action(PlayerAction::Fold);
//! let analysis = DecisionAnalyzer::default().analyze_with_equity(&request, Some(0.9));
//! assert_eq!(analysis.decision_quality, DecisionQuality::Mistake);
//! ```
//!
//! ## Equity between known hands
//! ```
//! use poker_coach::equity::EquityCalculator;
//!
//! let calc = EquityCalculator::default();
//! let result = calc
//!     .calculate_equity_str(&[("ak", "As Kc"), ("qq", "Qd Qc")], "Jh 2d 5s Ah")
//!     .unwrap()
//!     .unwrap();
//! assert!(result.equity("ak").unwrap() > 0.8);
//! ```
//!
//! ## CLI
//! ```sh
//! cargo run -- equity "As Kc" "Qd Qc" --board "Jh 2d 5s"
//! ```

pub mod cards;
pub mod config;
pub mod decision;
pub mod deck;
pub mod equity;
pub mod evaluator;
pub mod hand;
pub mod notation;
pub mod range;
pub mod texture;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
