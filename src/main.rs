//! Fall Course entry point
//!
//! Generates a course and prints a summary (or the full course as JSON).
//!
//! Usage: fall-course [--seed N] [--segments N] [--config FILE] [--json]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fall_course::{CourseGenerator, GenerationConfig, SceneRecorder};

#[derive(Debug, Parser)]
#[command(name = "fall-course", version, about = "Generate a seeded obstacle course")]
struct Args {
    /// Seed for the course RNG (time-derived when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Override the configured segment count
    #[arg(long)]
    segments: Option<u32>,
    /// JSON generation config
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the full course as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match GenerationConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{}: {}", path.display(), err);
                return ExitCode::FAILURE;
            }
        },
        None => GenerationConfig::default(),
    };
    if let Some(segments) = args.segments {
        config = config.with_segment_count(segments);
    }

    let mut generator = CourseGenerator::new(config);
    let course = generator.generate_course(args.seed);

    if args.json {
        match serde_json::to_string_pretty(course) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("failed to serialize course: {}", err);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    println!("Course seed {}", course.seed);
    for segment in &course.segments {
        println!(
            "  #{:<2} {:<15} d={:.1} len={:6.2} dy={:+5.2} obstacles={}",
            segment.index,
            segment.kind.as_str(),
            segment.difficulty,
            segment.length,
            segment.elevation,
            segment.obstacles.len
        );
    }
    for (i, checkpoint) in course.checkpoints.iter().enumerate() {
        println!(
            "  checkpoint {} after #{} at {:?}",
            i + 1,
            checkpoint.after_segment,
            checkpoint.position
        );
    }
    println!("  finish at {:?}", course.finish_position);

    let mut recorder = SceneRecorder::new();
    course.emit_into(&mut recorder);
    generator.publish(&mut recorder);
    log::info!(
        "Emitted {} shapes, {} obstacles, {} respawn points",
        recorder.shape_count(),
        recorder.obstacle_count(),
        recorder.respawn_points.len()
    );

    ExitCode::SUCCESS
}
