//! CLI tool for System Monitor (sysmon)

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use sysmon::format::{elapsed_time, percent};
use sysmon::{Config, Monitor, ProcessInfo, SystemSnapshot};

#[derive(Parser)]
#[command(name = "sysmon")]
#[command(about = "System Monitor: procfs system facts, process statistics and CPU utilization", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// CPU sample window in seconds (overrides the config file)
    #[arg(short, long, global = true)]
    interval: Option<f64>,

    /// Output format (json or text)
    #[arg(short, long, default_value = "text", global = true)]
    format: String,

    /// Configuration file (default: ~/.config/sysmon/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the full system summary and process table (default)
    System,
    /// Measure CPU utilization over one sample window
    Cpu,
    /// Show memory utilization
    Memory,
    /// List processes, busiest first
    Processes {
        /// Maximum number of processes to show (0 = all)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show a single process
    Process {
        /// Process ID
        pid: u32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(interval) = cli.interval {
        config.general.set_interval_secs(interval)?;
    }
    if let Some(Commands::Processes { limit: Some(limit) }) = &cli.command {
        config.general.process_limit = *limit;
    }
    log::debug!("using config: {:?}", config);

    let monitor = Monitor::from_config(&config);
    let json = cli.format == "json";

    match &cli.command {
        Some(Commands::Cpu) => {
            let cpu = monitor.cpu_utilization();
            if json {
                println!("{}", serde_json::json!({ "cpu_utilization": cpu }));
            } else {
                println!("CPU: {}", percent(cpu.unwrap_or(f64::NAN)));
            }
        }
        Some(Commands::Memory) => {
            let mem = monitor.reader().memory_utilization();
            if json {
                println!("{}", serde_json::json!({ "memory_utilization": mem }));
            } else {
                println!("Memory: {}", percent(mem));
            }
        }
        Some(Commands::Processes { .. }) => {
            let processes = monitor.processes();
            if json {
                println!("{}", serde_json::to_string_pretty(&processes)?);
            } else {
                print_process_table(&processes);
            }
        }
        Some(Commands::Process { pid }) => match monitor.reader().process_info(*pid) {
            Some(info) if json => println!("{}", serde_json::to_string_pretty(&info)?),
            Some(info) => print_process_table(std::slice::from_ref(&info)),
            None => return Err(format!("process {} not found", pid).into()),
        },
        Some(Commands::System) | None => {
            let snapshot = monitor.snapshot();
            if json {
                println!("{}", snapshot.to_json()?);
            } else {
                print_system_info(&snapshot);
            }
        }
    }

    Ok(())
}

fn print_system_info(snapshot: &SystemSnapshot) {
    println!("=== System Information ===");
    println!("OS: {}", snapshot.operating_system);
    println!("Kernel: {}", snapshot.kernel);
    println!(
        "CPU: {}",
        percent(snapshot.cpu_utilization.unwrap_or(f64::NAN))
    );
    println!("Memory: {}", percent(snapshot.memory_utilization));
    println!("Total Processes: {}", snapshot.total_processes);
    println!("Running Processes: {}", snapshot.running_processes);
    println!("Up Time: {}", elapsed_time(snapshot.uptime_seconds));
    println!();
    print_process_table(&snapshot.processes);
}

fn print_process_table(processes: &[ProcessInfo]) {
    println!(
        "{:>7}  {:<12} {:>6}  {:>10}  {:>8}  COMMAND",
        "PID", "USER", "CPU%", "RAM[MB]", "TIME+"
    );
    for proc in processes {
        println!(
            "{:>7}  {:<12} {:>6.1}  {:>10}  {:>8}  {}",
            proc.pid,
            truncate(&proc.user, 12),
            proc.cpu_utilization * 100.0,
            proc.ram_mb,
            proc.uptime,
            proc.command.replace('\0', " ").trim_end()
        );
    }
}

fn truncate(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}
