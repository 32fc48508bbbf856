use std::env;
use std::fs;
use std::process;

use pianotrainer::{map_text, MappingConfig, MappingError};

const USAGE: &str = "Usage: pianotrainer [options] <text>
       pianotrainer [options] --file <path>

Options:
  --mode <letters|letters-and-digits|phonemes>
  --tonic <A-G with optional # or b>
  --scale <minor|major>       scale for letters
  --seconds <S>               target duration (default 8)
  --floor <S>                 minimum event duration (default 0.05)
  --alternate                 alternate minor/major per letter
  --consonant-ticks           consonants tick instead of rest
  --config <file.yaml>        base configuration, flags override it";

struct Args {
    config_path: Option<String>,
    input_path: Option<String>,
    text: Option<String>,
    overrides: Vec<(String, String)>,
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    eprintln!("{}", USAGE);
    process::exit(1);
}

fn parse_args(args: &[String]) -> Args {
    let mut parsed = Args {
        config_path: None,
        input_path: None,
        text: None,
        overrides: Vec::new(),
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &String| -> String {
            match iter.next() {
                Some(v) => v.clone(),
                None => fail(&format!("Missing value for {}", flag)),
            }
        };

        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            "--config" => parsed.config_path = Some(value(arg)),
            "--file" => parsed.input_path = Some(value(arg)),
            "--mode" | "--tonic" | "--scale" | "--seconds" | "--floor" => {
                let v = value(arg);
                parsed.overrides.push((arg.clone(), v));
            }
            "--alternate" | "--consonant-ticks" => {
                parsed.overrides.push((arg.clone(), "true".to_string()));
            }
            flag if flag.starts_with("--") => fail(&format!("Unknown option {}", flag)),
            text => {
                if parsed.text.is_some() {
                    fail("Only one text argument is allowed; quote text with spaces");
                }
                parsed.text = Some(text.to_string());
            }
        }
    }

    parsed
}

fn apply_override(config: &mut MappingConfig, flag: &str, value: &str) -> Result<(), MappingError> {
    let seconds = |field: &str| {
        value.parse::<f64>().map_err(|_| MappingError::ConfigError {
            field: field.to_string(),
            message: format!("'{}' is not a number", value),
        })
    };

    match flag {
        "--mode" => config.mode = value.parse()?,
        "--tonic" => config.tonic = value.parse()?,
        "--scale" => config.letter_scale = value.parse()?,
        "--seconds" => config.target_seconds = seconds("target-seconds")?,
        "--floor" => config.min_event_seconds = seconds("min-event-seconds")?,
        "--alternate" => config.alternate_mode = true,
        "--consonant-ticks" => config.consonant_ticks = true,
        _ => {}
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        fail("No input given");
    }
    let args = parse_args(&args);

    // Base configuration
    let mut config = match &args.config_path {
        Some(path) => {
            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("Error reading config '{}': {}", path, e);
                    process::exit(1);
                }
            };
            match MappingConfig::from_yaml(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Configuration error in '{}': {}", path, e);
                    process::exit(1);
                }
            }
        }
        None => MappingConfig::default(),
    };

    for (flag, value) in &args.overrides {
        if let Err(e) = apply_override(&mut config, flag, value) {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    }

    // Input text
    let text = match (&args.input_path, args.text) {
        (Some(path), None) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path, e);
                process::exit(1);
            }
        },
        (None, Some(text)) => text,
        (Some(_), Some(_)) => fail("Give either <text> or --file, not both"),
        (None, None) => fail("No input given"),
    };

    let output = match map_text(&text, &config) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    for diagnostic in &output.diagnostics {
        eprintln!("warning: {}", diagnostic.message);
    }

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error writing output: {}", e);
            process::exit(1);
        }
    }
}
