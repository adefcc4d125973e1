//! Terminal walk-through of the trainer core.
//!
//! Run with: `cargo run --example quiz -- ranges.xlsx [config.json] [--advice]`
//!
//! Loads the workbook, draws a handful of VsOpen questions with a fixed seed,
//! grades "call" on each and prints the range summary that would accompany an
//! advice request. With `--advice` the last question is also sent to the
//! configured relay. Set `RUST_LOG=debug` to see parser and quiz logging.

use std::process::ExitCode;

use preflop_trainer::{
    parse_workbook, Action, AdviceClient, AdviceGate, AdviceRequest, QuizState, RankBuckets,
    ScenarioFilter, StudyMode, TrainerConfig,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();

    let (flags, positional): (Vec<String>, Vec<String>) =
        std::env::args().skip(1).partition(|a| a.starts_with("--"));
    let ask_relay = flags.iter().any(|f| f == "--advice");
    let mut args = positional.into_iter();
    let Some(workbook) = args.next() else {
        eprintln!("usage: quiz <workbook.xlsx> [config.json] [--advice]");
        return ExitCode::FAILURE;
    };
    let config = match args.next() {
        Some(path) => match TrainerConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => TrainerConfig { rng_seed: Some(7), ..TrainerConfig::default() },
    };

    let bytes = match std::fs::read(&workbook) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("cannot read {workbook}: {e}");
            return ExitCode::FAILURE;
        }
    };
    let table = match parse_workbook(&bytes, &config.parse_options()) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    println!("Loaded {} entries across {} scenario(s)", table.len(), table.scenarios().len());

    let buckets = match config.bucket_path.as_deref().map(RankBuckets::load) {
        Some(Ok(buckets)) => buckets,
        Some(Err(e)) => {
            eprintln!("ignoring bucket file: {e}");
            None
        }
        None => None,
    };

    let mut quiz = QuizState::from_config(&config);
    quiz.load(table);
    quiz.set_study_filter(Some(ScenarioFilter::from(StudyMode::VsOpen)));

    let mut rng = rand::thread_rng();
    let mut last_request = None;
    for round in 1..=5 {
        let Some(question) = quiz.draw(None).copied() else {
            println!("No VsOpen questions in this workbook.");
            break;
        };
        let [c1, c2] = question.hole_cards(&mut rng);
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("  #{round}  {question}   ({c1} {c2})");
        println!("  Hero: {}", question.scenario.hero().name());
        let options: Vec<String> = question.answer_options().into_iter().map(|o| o.text).collect();
        println!("  Options: {}", options.join(" | "));
        if let Some(bucket) = buckets.as_ref().and_then(|b| b.bucket_of(question.hand)) {
            println!("  Hint: strength bucket {bucket} of 10");
        }

        let Some(grade) = quiz.grade(Action::Call) else { continue };
        let mark = if grade.correct { "✓" } else { "✗" };
        println!("  [{mark}] call   allowed: {}", grade.allowed);

        if let Some(table) = quiz.table() {
            let request = AdviceRequest::build(table, &question, Action::Call);
            let s = &request.summary;
            println!(
                "  Hero enters {:.1}% of hands ({:.1}% of combos), raises {:.1}% ({:.1}%)",
                s.hero_enter_percent, s.hero_enter_combo_percent,
                s.hero_raise_percent, s.hero_raise_combo_percent,
            );
            if let (Some(cells), Some(combos)) = (s.opener_rfi_percent, s.opener_rfi_combo_percent) {
                println!("  Opener RFI: {cells:.1}% of hands ({combos:.1}% of combos)");
            }
            println!("  This hand: {}", s.hand_label);
            last_request = Some(request);
        }
    }

    if let (true, Some(request)) = (ask_relay, last_request) {
        let client = AdviceClient::from_config(&config);
        let gate = AdviceGate::new();
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("  Asking {} about {} / {}", client.endpoint(), request.scenario, request.hand);
        let ticket = gate.begin();
        match gate.accept(ticket, client.fetch(&request).await) {
            Some(Ok(advice)) => println!("  Advice: {advice}"),
            Some(Err(e)) => eprintln!("  Advice unavailable: {e}"),
            None => {}
        }
    }

    ExitCode::SUCCESS
}
