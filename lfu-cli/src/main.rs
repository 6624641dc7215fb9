use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use lfu_cache::{CacheConfig, CacheError, CacheStrategy, FrequencyCache, build_cache};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use serde_json::json;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error};

#[derive(Parser, Debug)]
#[command(name = "lfu-cli")]
#[command(about = "LFU cache CLI - interactive in-process cache shell", long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Maximum number of entries (overrides config)
    #[arg(short = 'n', long)]
    capacity: Option<usize>,

    /// Cache strategy: bucketed or ordered (overrides config)
    #[arg(short = 's', long)]
    strategy: Option<CacheStrategy>,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,

    /// Commands to execute, separated by ';' (if not in interactive mode)
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

struct CacheSession {
    cache: Box<dyn FrequencyCache<i64, i64> + Send>,
}

impl CacheSession {
    fn new(strategy: CacheStrategy, capacity: usize) -> Self {
        Self {
            cache: build_cache(strategy, capacity),
        }
    }

    fn execute_command(&mut self, command: &str, args: &[String]) -> Result<String> {
        let start = Instant::now();

        let response = match command.to_uppercase().as_str() {
            "PUT" | "SET" => self.cmd_put(args)?,
            "GET" => self.cmd_get(args)?,
            "PEEK" => self.cmd_peek(args)?,
            "EXISTS" => self.cmd_exists(args)?,
            "FREQ" => self.cmd_freq(args)?,
            "LEN" | "DBSIZE" => format!("(integer) {}", self.cache.len()),
            "INFO" | "STATS" => self.cmd_info()?,
            "CHECK" => self.cmd_check()?,
            "CLEAR" | "FLUSHALL" => {
                self.cache.clear();
                "OK".green().to_string()
            }
            "HELP" => self.help_text(),
            _ => return Err(anyhow::anyhow!("Unknown command: {}", command)),
        };

        let elapsed = start.elapsed();
        Ok(format!(
            "{}\n{}",
            response,
            format!("({:.2?})", elapsed).dimmed()
        ))
    }

    fn cmd_put(&mut self, args: &[String]) -> Result<String> {
        if args.len() < 2 {
            return Err(anyhow::anyhow!("Usage: PUT key value"));
        }
        let key = parse_int(&args[0])?;
        let value = parse_int(&args[1])?;
        self.cache.put(key, value);
        Ok("OK".green().to_string())
    }

    fn cmd_get(&mut self, args: &[String]) -> Result<String> {
        let key = single_key(args, "GET")?;
        Ok(match self.cache.get(&key) {
            Some(value) => format!("(integer) {}", value),
            None => "(nil)".dimmed().to_string(),
        })
    }

    fn cmd_peek(&self, args: &[String]) -> Result<String> {
        let key = single_key(args, "PEEK")?;
        Ok(match self.cache.peek(&key) {
            Some(value) => format!("(integer) {}", value),
            None => "(nil)".dimmed().to_string(),
        })
    }

    fn cmd_exists(&self, args: &[String]) -> Result<String> {
        let key = single_key(args, "EXISTS")?;
        let exists = self.cache.contains_key(&key);
        Ok(format!("(integer) {}", if exists { 1 } else { 0 }))
    }

    fn cmd_freq(&self, args: &[String]) -> Result<String> {
        let key = single_key(args, "FREQ")?;
        Ok(match self.cache.frequency_of(&key) {
            Some(frequency) => format!("(integer) {}", frequency),
            None => "(nil)".dimmed().to_string(),
        })
    }

    fn cmd_info(&self) -> Result<String> {
        let info = json!({
            "strategy": self.cache.strategy(),
            "capacity": self.cache.capacity(),
            "len": self.cache.len(),
            "least_frequency": self.cache.least_frequency(),
            "stats": self.cache.stats(),
        });
        Ok(serde_json::to_string_pretty(&info)?)
    }

    fn cmd_check(&self) -> Result<String> {
        self.cache
            .check_invariants()
            .context("invariant check failed")?;
        Ok("OK".green().to_string())
    }

    fn help_text(&self) -> String {
        format!(
            r#"{}

{}
  PUT key value              Insert or overwrite key (alias SET)
  GET key                    Get the value of key, counting the access
  PEEK key                   Get the value of key without counting it
  EXISTS key                 Check if key is resident
  FREQ key                   Show the access frequency of key

{}
  LEN                        Return number of resident keys (alias DBSIZE)
  INFO                       Show strategy, capacity and statistics (alias STATS)
  CHECK                      Verify internal invariants
  CLEAR                      Remove all keys (alias FLUSHALL)
  HELP                       Show this help message
  QUIT                       Exit the CLI
"#,
            "LFU CLI - Available Commands".bold().cyan(),
            "Key Commands:".bold(),
            "Cache Commands:".bold(),
        )
    }
}

fn parse_int(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .with_context(|| format!("invalid integer: {}", raw))
}

fn single_key(args: &[String], command: &str) -> Result<i64> {
    match args.first() {
        Some(raw) => parse_int(raw),
        None => Err(anyhow::anyhow!("Usage: {} key", command)),
    }
}

/// Split a one-shot argument list into `;`-separated commands
fn split_commands(words: &[String]) -> Vec<Vec<String>> {
    words
        .join(" ")
        .split(';')
        .map(|part| part.split_whitespace().map(String::from).collect::<Vec<_>>())
        .filter(|parts| !parts.is_empty())
        .collect()
}

/// Errors raised by a broken cache rather than by bad input
fn is_cache_bug(e: &anyhow::Error) -> bool {
    e.downcast_ref::<CacheError>()
        .is_some_and(CacheError::is_internal)
}

fn log_failure(e: &anyhow::Error) {
    if is_cache_bug(e) {
        error!(error = %e, "cache integrity failure");
    } else {
        error!(error = %e, "command failed");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => CacheConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CacheConfig::default(),
    };
    if let Some(capacity) = args.capacity {
        config.cache.capacity = capacity;
    }
    if let Some(strategy) = args.strategy {
        config.cache.strategy = strategy;
    }

    if args.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    lfu_cache::logging::init(&config.logging)?;
    debug!(
        capacity = config.cache.capacity,
        strategy = %config.cache.strategy,
        "cache configured"
    );

    let mut session = CacheSession::new(config.cache.strategy, config.cache.capacity);

    // Check if running in command mode or interactive mode
    if !args.command.is_empty() {
        for parts in split_commands(&args.command) {
            match session.execute_command(&parts[0], &parts[1..]) {
                Ok(output) => println!("{}", output),
                Err(e) => {
                    log_failure(&e);
                    eprintln!("{}", format!("Error: {:#}", e).red());
                    std::process::exit(1);
                }
            }
        }
        Ok(())
    } else {
        run_interactive(session, &config)
    }
}

fn run_interactive(mut session: CacheSession, config: &CacheConfig) -> Result<()> {
    println!(
        "{}",
        format!("LFU CLI v{}", env!("CARGO_PKG_VERSION"))
            .bold()
            .cyan()
    );
    println!(
        "Cache: {} strategy, capacity {}",
        config.cache.strategy, config.cache.capacity
    );
    println!("Type {} for available commands\n", "HELP".bold());

    let mut rl = DefaultEditor::new()?;

    loop {
        let prompt = format!("{}> ", format!("lfu {}", config.cache.strategy).green());
        let readline = rl.readline(&prompt);

        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                rl.add_history_entry(&line)?;

                let parts: Vec<String> = line.split_whitespace().map(String::from).collect();
                let cmd = &parts[0];
                let args = &parts[1..];

                if cmd.to_uppercase() == "QUIT" || cmd.to_uppercase() == "EXIT" {
                    println!("Goodbye!");
                    break;
                }

                match session.execute_command(cmd, args) {
                    Ok(output) => println!("{}", output),
                    Err(e) => {
                        log_failure(&e);
                        println!("{}", format!("Error: {:#}", e).red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                error!(error = ?err, "Readline error");
                break;
            }
        }
    }

    Ok(())
}
