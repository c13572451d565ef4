//! Smoke-test harness for manual use (SPEC_FULL.md §6): decodes a FIT file
//! named on the command line and prints message counts and day stats.
//! Not a deliverable interface — presentation and CLI parsing are out of
//! scope for this crate (spec.md §1).

use std::env;
use std::fs;
use std::process::ExitCode;

use fit_monitor::UnitPolicy;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args().skip(1);
    let path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: fit-dump <path-to-fit-file> [--english]");
            return ExitCode::FAILURE;
        }
    };
    let unit_policy = if args.any(|a| a == "--english") {
        UnitPolicy::ENGLISH
    } else {
        UnitPolicy::METRIC
    };

    let data = match fs::read(&path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("failed to read {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let file = match fit_monitor::decode(&data, unit_policy) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("failed to decode {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("profile version: {}", file.profile_version());
    if let Some(file_type) = file.file_type() {
        println!("file type: {file_type}");
    }
    if let Some(time_created) = file.time_created() {
        println!("time created: {time_created}");
    }
    if let Some((first, last)) = file.date_span() {
        println!("date span: {first} .. {last}");
    }

    for name in ["file_id", "device_info", "monitoring", "record", "session", "lap", "activity"] {
        let count = file.messages(name).len();
        if count > 0 {
            println!("{name}: {count} messages");
        }
    }

    let mut days: Vec<_> = file.day_stats().into_iter().collect();
    days.sort_by_key(|(day, _)| *day);
    for (day, fields) in days {
        println!("{day}:");
        let mut names: Vec<_> = fields.keys().collect();
        names.sort();
        for name in names {
            let s = &fields[name];
            println!(
                "  {name}: count={} min={:.2} max={:.2} avg={:.2} total={:.2}",
                s.count, s.min, s.max, s.avg, s.total
            );
        }
    }

    ExitCode::SUCCESS
}
