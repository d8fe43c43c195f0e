//! Dump Cleaner - batch line filter for compressed database dumps
//!
//! Main entry point for the command-line application.

use anyhow::Context;
use bytesize::ByteSize;
use clap::Parser;
use std::fs;
use std::process;

use dump_cleaner::cli::Args;
use dump_cleaner::config::Configuration;
use dump_cleaner::coordinator::Coordinator;
use dump_cleaner::filter::LineFilter;
use dump_cleaner::output::ensure_output_dir;
use dump_cleaner::pipeline::PipelineContext;
use dump_cleaner::progress::{
    create_progress_bar, print_banner, print_bullet, print_error, print_file_result, print_header,
    print_info, print_success, print_summary, print_warning,
};
use dump_cleaner::selector::{list_dir, FileSelector};

/// Exit status when `--strict` is set and a file failed
const EXIT_FILE_FAILURES: i32 = 2;

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging, an explicit RUST_LOG wins
    if std::env::var_os("RUST_LOG").is_none() {
        if args.verbose {
            std::env::set_var("RUST_LOG", "debug");
        } else if !args.quiet {
            std::env::set_var("RUST_LOG", "warn");
        }
    }
    env_logger::init();

    match run(args) {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(e) => {
            print_error(&format!("{}", e));

            // Print chain of errors
            for cause in e.chain().skip(1) {
                print_error(&format!("  Caused by: {}", cause));
            }

            process::exit(1);
        }
    }
}

fn run(args: Args) -> anyhow::Result<i32> {
    if !args.quiet {
        print_banner();
    }

    // An unusable config is not fatal; the warning is shown even with --quiet
    let mut config = match Configuration::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            print_warning(&format!("{}; continuing with an empty configuration", e));
            Configuration::default()
        }
    };
    if let Some(ref dir) = args.files_dir {
        config.files_dir = dir.clone();
    }
    let input_dir = config.resolved_files_dir();
    let output_dir = args.get_output_dir();

    if args.verbose && !args.quiet {
        print_config(&args, &config);
    }

    // Selection
    let selector = FileSelector::new(config.files.as_slice())?.with_dedup(args.dedup);
    let entries = list_dir(&input_dir)
        .with_context(|| format!("cannot select input files in {:?}", input_dir))?;
    let selected = selector.select(entries);

    if !args.quiet {
        print_header("These files are found for parsing:");
        for name in &selected {
            print_bullet(name);
        }
    }

    if selected.is_empty() {
        if !args.quiet {
            print_warning("No files matched the configured patterns");
        }
        return Ok(0);
    }

    let mut distinct = selected.clone();
    distinct.sort();
    distinct.dedup();
    if distinct.len() != selected.len() {
        log::warn!(
            "{} file(s) matched more than one pattern and will be processed repeatedly; use --dedup to avoid it",
            selected.len() - distinct.len()
        );
    }

    let ctx = PipelineContext::new(input_dir, output_dir.clone(), LineFilter::new(&config.remove));

    if args.dry_run {
        dry_run_report(&ctx, &selected);
        return Ok(0);
    }

    ensure_output_dir(&output_dir)?;

    // Processing
    let coordinator = Coordinator::new(ctx, args.get_threads());

    let pb = if args.quiet {
        indicatif::ProgressBar::hidden()
    } else {
        print_header("Processing...");
        create_progress_bar(selected.len() as u64, "")
    };

    let summary = coordinator.run(
        &selected,
        |name| {
            if !args.quiet {
                pb.suspend(|| print_info(&format!("Parse file: {}", name)));
            }
        },
        |result| {
            pb.inc(1);
            if !args.quiet {
                pb.suspend(|| print_file_result(result));
            }
        },
    )?;

    pb.finish_and_clear();

    if args.quiet {
        for (name, reason) in summary.failures() {
            print_error(&format!("{}: {}", name, reason));
        }
    } else {
        print_summary(&summary);
        print_success("Files processed...");
    }

    if args.strict && summary.has_failures() {
        return Ok(EXIT_FILE_FAILURES);
    }

    Ok(0)
}

/// Dry run report
fn dry_run_report(ctx: &PipelineContext, selected: &[String]) {
    print_header("DRY RUN - No files will be written");

    for name in selected {
        let input = ctx.input_path(name);
        let size = match fs::metadata(&input) {
            Ok(meta) => ByteSize(meta.len()).to_string(),
            Err(e) => format!("unreadable: {}", e),
        };
        print_bullet(&format!("{} ({}) -> {}", name, size, ctx.output_path(name).display()));
    }
}

/// Print configuration summary
fn print_config(args: &Args, config: &Configuration) {
    print_header("Configuration");

    print_info(&format!("Config file:  {:?}", args.config));
    print_info(&format!("Files dir:    {:?}", config.resolved_files_dir()));
    print_info(&format!("Output dir:   {:?}", args.get_output_dir()));
    print_info(&format!("Patterns:     {:?}", config.files));
    print_info(&format!("Remove:       {:?}", config.remove));
    print_info(&format!("Dedup:        {}", args.dedup));
    print_info(&format!(
        "Threads:      {}",
        args.get_threads().unwrap_or_else(num_cpus::get)
    ));
}
