//! Debatify CLI - AI Debate Practice Toolkit
//!
//! A command-line companion for debate practice: a conversational coach,
//! a practice-speech analyzer, and a transcript judge, with session
//! statistics kept locally.

use clap::{Parser, Subcommand};
use colored::Colorize;
use debatify_core::{
    AggregateStats, Config, ModelClient, PromptRequest, SessionOutcome, SessionRecorder,
    SessionStore,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "debatify",
    version,
    about = "AI Debate Practice Toolkit",
    long_about = "Practice debating against an AI coach, analyze recorded speeches, and \
                  judge full transcripts. Session scores accumulate in a local dashboard."
)]
struct Cli {
    /// Path to a TOML config file (motions, topics, prompts, model)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chat with the debate coach on a motion (interactive)
    Coach {
        /// Topic to debate; a random one is drawn when omitted
        #[arg(long, value_name = "TOPIC")]
        topic: Option<String>,
    },
    /// Analyze a practice speech and record the session
    Practice {
        /// Motion argued; a random one is drawn when omitted
        #[arg(long, value_name = "MOTION")]
        motion: Option<String>,
        /// Speech transcript text
        #[arg(long, value_name = "TEXT", conflicts_with = "file")]
        transcript: Option<String>,
        /// Read the transcript from a file
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
        /// Length of the recording, in seconds
        #[arg(long, value_name = "SECS")]
        duration: Option<u32>,
    },
    /// Judge a full debate transcript and record the session
    Judge {
        /// Debate transcript text
        #[arg(long, value_name = "TEXT", conflicts_with = "file")]
        transcript: Option<String>,
        /// Read the transcript from a file
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Show the session dashboard
    Stats,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Ok(api_base) = env::var("GEMINI_API_BASE") {
        config.model.api_base = api_base;
    }

    let store = SessionStore::open_default()?;

    if let Command::Stats = &cli.command {
        print_dashboard(&store.load());
        return Ok(());
    }

    let api_key = env::var("GEMINI_API_KEY").unwrap_or_else(|_| {
        eprintln!(
            "{}",
            "Warning: GEMINI_API_KEY not set. API calls may fail.".yellow()
        );
        String::new()
    });
    let client = ModelClient::new(&config.model, api_key)?;

    match cli.command {
        Command::Coach { topic } => run_coach(&client, &store, &config, topic).await?,
        Command::Practice {
            motion,
            transcript,
            file,
            duration,
        } => {
            let transcript = resolve_transcript(transcript, file)?;
            let motion = match motion.or_else(|| config.random_motion(None)) {
                Some(motion) => motion,
                None => return Err("No motion given and none configured.".into()),
            };
            run_practice(&client, &store, &config, motion, transcript, duration).await?;
        }
        Command::Judge { transcript, file } => {
            let transcript = resolve_transcript(transcript, file)?;
            run_judge(&client, &store, &config, transcript).await?;
        }
        Command::Stats => unreachable!(),
    }

    Ok(())
}

fn resolve_transcript(
    transcript: Option<String>,
    file: Option<PathBuf>,
) -> Result<String, Box<dyn std::error::Error>> {
    match (transcript, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
        (None, None) => Err("Provide a transcript with --transcript or --file.".into()),
    }
}

async fn run_coach(
    client: &ModelClient,
    store: &SessionStore,
    config: &Config,
    topic: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut topic = match topic.or_else(|| config.random_topic(None)) {
        Some(topic) => topic,
        None => return Err("No topic given and none configured.".into()),
    };

    banner("AI Debate Coach");
    println!("{} {}", "Topic:".bold(), topic.bright_white());
    println!(
        "{}",
        "Make your argument. Type 'new' for a fresh topic, 'quit' to leave.".dimmed()
    );
    println!();

    let stdin = io::stdin();
    loop {
        print!("{} ", "you>".bright_cyan().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line {
            "" => continue,
            "quit" | "exit" => break,
            "new" => {
                if let Some(next) = config.random_topic(Some(&topic)) {
                    topic = next;
                }
                println!();
                println!("{} {}", "Topic:".bold(), topic.bright_white());
                println!();
                continue;
            }
            _ => {}
        }

        let recorder = SessionRecorder::new(client, store, config);
        let outcome = recorder
            .run(PromptRequest::Coach {
                topic: topic.clone(),
                utterance: line.to_string(),
            })
            .await?;

        if let SessionOutcome::CoachReply { text, failed } = outcome {
            let label = "coach>".bright_magenta().bold();
            if failed {
                println!("{} {}", label, text.red());
            } else {
                for wrapped in textwrap(&text, 70).lines() {
                    println!("{} {}", label, wrapped);
                }
            }
            println!();
        }
    }

    Ok(())
}

async fn run_practice(
    client: &ModelClient,
    store: &SessionStore,
    config: &Config,
    motion: String,
    transcript: String,
    duration: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    banner("Practice Arena");
    println!("{} {}", "Motion:".bold(), motion.bright_white());
    println!("{}", "Analyzing speech...".dimmed());

    let recorder = SessionRecorder::new(client, store, config);
    let outcome = recorder
        .run(PromptRequest::PracticeAnalysis {
            motion,
            transcript,
            duration_seconds: duration,
        })
        .await?;

    if let SessionOutcome::PracticeReport {
        feedback,
        fallback_used,
        failed,
        recorded,
    } = outcome
    {
        println!();
        if failed {
            println!("{}", "Analysis failed.".red().bold());
            println!("{}", feedback.detailed_feedback);
            return Ok(());
        }
        if fallback_used {
            println!(
                "{}",
                "Note: the model's reply could not be parsed; showing standard feedback."
                    .yellow()
            );
            println!();
        }

        score_line("Structure", feedback.structure);
        score_line("Clarity", feedback.clarity);
        score_line("Logic", feedback.logic);
        score_line("Tone", feedback.tone);
        println!();
        println!(
            "{} {}",
            "Overall:".bold(),
            format!("{}/100", feedback.overall).bright_magenta().bold()
        );

        print_list("Strengths", &feedback.strengths, |s| s.green());
        print_list("Areas for Improvement", &feedback.improvements, |s| {
            s.yellow()
        });

        println!();
        println!("{}", "Detailed Feedback".bold());
        for line in textwrap(&feedback.detailed_feedback, 70).lines() {
            println!("  {}", line);
        }

        if let Some(stats) = recorded {
            print_recorded_summary(&stats);
        }
    }

    Ok(())
}

async fn run_judge(
    client: &ModelClient,
    store: &SessionStore,
    config: &Config,
    transcript: String,
) -> Result<(), Box<dyn std::error::Error>> {
    banner("Smart Judge");
    println!("{}", "Adjudicating transcript...".dimmed());

    let recorder = SessionRecorder::new(client, store, config);
    let outcome = recorder
        .run(PromptRequest::JudgeAnalysis { transcript })
        .await?;

    if let SessionOutcome::JudgeReport {
        feedback,
        fallback_used,
        failed,
        recorded,
    } = outcome
    {
        println!();
        if failed {
            println!("{}", "Adjudication failed.".red().bold());
            println!("{}", feedback.detailed_analysis);
            return Ok(());
        }
        if fallback_used {
            println!(
                "{}",
                "Note: the model's reply could not be parsed; showing standard judgment."
                    .yellow()
            );
            println!();
        }

        score_line("Argument Strength", feedback.argument_strength);
        score_line("Logical Consistency", feedback.logical_consistency);
        score_line("Evidence Quality", feedback.evidence_quality);
        score_line("Presentation", feedback.presentation);
        println!();
        println!(
            "{} {}",
            "Overall:".bold(),
            format!("{}/100", feedback.overall_score)
                .bright_magenta()
                .bold()
        );

        print_list("Fallacies Detected", &feedback.fallacies, |s| s.red());
        print_list("Strengths", &feedback.strengths, |s| s.green());
        print_list("Weaknesses", &feedback.weaknesses, |s| s.yellow());

        if !feedback.speaker_roles.is_empty() {
            println!();
            println!("{}", "Speakers".bold());
            for speaker in &feedback.speaker_roles {
                println!(
                    "  {} {} {}",
                    speaker.speaker.bright_cyan(),
                    format!("({})", speaker.role).yellow(),
                    format!("{}/100", speaker.performance).dimmed()
                );
                for line in textwrap(&speaker.feedback, 66).lines() {
                    println!("    {}", line);
                }
            }
        }

        println!();
        println!("{}", "Detailed Analysis".bold());
        for line in textwrap(&feedback.detailed_analysis, 70).lines() {
            println!("  {}", line);
        }
        println!();
        println!(
            "{} {}",
            "Winner Prediction:".bold(),
            feedback.winner_prediction.bright_white()
        );

        if let Some(stats) = recorded {
            print_recorded_summary(&stats);
        }
    }

    Ok(())
}

fn print_dashboard(stats: &AggregateStats) {
    banner("Debatify Dashboard");
    println!(
        "  {} {}",
        "Total Sessions:".bold(),
        stats.total_sessions.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Minutes Practiced:".bold(),
        stats.total_minutes.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Average Score:".bold(),
        format!("{}/100", stats.average_score).bright_magenta()
    );
    println!();

    if stats.history.is_empty() {
        println!("{}", "No sessions recorded yet.".dimmed());
        return;
    }

    println!("{}", "Recent Sessions".bold());
    for session in &stats.history {
        let mut extras = Vec::new();
        if let Some(seconds) = session.duration_seconds {
            extras.push(format!("{}:{:02}", seconds / 60, seconds % 60));
        }
        if let Some(length) = session.subject_length {
            extras.push(format!("{} chars", length));
        }
        let extras = if extras.is_empty() {
            String::new()
        } else {
            format!(" [{}]", extras.join(", "))
        };

        println!(
            "  {} {} {}{}",
            session.date.dimmed(),
            session.kind.display_name().bright_cyan(),
            format!("{}/100", session.score).yellow(),
            extras.dimmed()
        );
    }
}

fn print_recorded_summary(stats: &AggregateStats) {
    println!();
    println!("{}", "─".repeat(70).dimmed());
    println!(
        "{} {} sessions, average {}/100",
        "Session recorded.".green().bold(),
        stats.total_sessions,
        stats.average_score
    );
}

fn print_list<F>(title: &str, items: &[String], style: F)
where
    F: Fn(&str) -> colored::ColoredString,
{
    if items.is_empty() {
        return;
    }
    println!();
    println!("{}", title.bold());
    for item in items {
        println!("  {} {}", "•".dimmed(), style(item));
    }
}

fn banner(title: &str) {
    println!();
    println!("{}", "═".repeat(70).bright_blue());
    println!("{}", format!("  {}", title).bright_blue().bold());
    println!("{}", "═".repeat(70).bright_blue());
    println!();
}

fn score_line(label: &str, score: u32) {
    let filled = (score.min(100) as usize) / 5;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled));
    println!(
        "  {:<20} {} {}",
        label.bold(),
        bar.bright_cyan(),
        format!("{}/100", score).dimmed()
    );
}

/// Simple text wrapping function.
fn textwrap(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut current_line_len = 0;

    for word in text.split_whitespace() {
        if current_line_len + word.len() + 1 > width && current_line_len > 0 {
            result.push('\n');
            current_line_len = 0;
        }
        if current_line_len > 0 {
            result.push(' ');
            current_line_len += 1;
        }
        result.push_str(word);
        current_line_len += word.len();
    }

    result
}
