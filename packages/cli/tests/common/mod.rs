#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use recall_cli::render::Style;
use recall_cli::{AppResult, Cli, Config, Outcome};
use tempfile::TempDir;

pub const CONCEPTS: &str = r#"[
    {
        "card_uuid": "c-001",
        "card_name": "Two Pointers",
        "deck_name": "concepts",
        "description": "Walk two indices towards each other",
        "time_complexity": "O(n)"
    },
    {
        "card_uuid": "c-002",
        "card_name": "Sliding Window",
        "deck_name": "concepts",
        "description": "Grow and shrink a window over a sequence",
        "time_complexity": "O(n)"
    },
    {
        "card_uuid": "c-003",
        "card_name": "Prefix Sums",
        "deck_name": "concepts",
        "description": "Precompute cumulative sums for range queries",
        "time_complexity": "O(1) per query"
    }
]"#;

/// Deck directory and store path inside one temp dir
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::create_dir_all(dir.path().join("json")).expect("Failed to create deck dir");
        let workspace = Self { dir };
        workspace.write_deck("concepts", CONCEPTS);
        workspace
    }

    pub fn write_deck(&self, name: &str, json: &str) {
        std::fs::write(self.deck_dir().join(format!("{name}.json")), json)
            .expect("Failed to write deck");
    }

    pub fn deck_dir(&self) -> PathBuf {
        self.dir.path().join("json")
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("db.sqlite")
    }

    pub fn config(&self) -> Config {
        Config::default().with_overrides(Some(self.deck_dir()), Some(self.db_path()))
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap()
}

pub fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("flashcards").chain(args.iter().copied()))
        .expect("Failed to parse arguments")
}

/// Run one invocation with scripted input at a fixed time
pub fn invoke_at(
    workspace: &Workspace,
    args: &[&str],
    input: &str,
    now: DateTime<Utc>,
) -> (AppResult<Outcome>, String) {
    invoke_configured(&workspace.config(), args, input, now)
}

pub fn invoke_configured(
    config: &Config,
    args: &[&str],
    input: &str,
    now: DateTime<Utc>,
) -> (AppResult<Outcome>, String) {
    let cli = parse(args);
    let mut output = Vec::new();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let result = recall_cli::run_with(
        &cli,
        config,
        input.as_bytes(),
        &mut output,
        Style::plain(),
        move || now,
        &mut rng,
    );
    (result, String::from_utf8(output).expect("output is utf-8"))
}

pub fn invoke(workspace: &Workspace, args: &[&str], input: &str) -> (AppResult<Outcome>, String) {
    invoke_at(workspace, args, input, fixed_now())
}
