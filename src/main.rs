//! SAP-1 Emulator - CLI Entry Point
//!
//! Commands:
//! - `sap1-emu run <image>` - Run a RAM image until the machine halts
//! - `sap1-emu debug <image>` - Step through an image in the TUI debugger
//! - `sap1-emu disasm <image>` - Print an image as the control unit sees it

use clap::{Parser, Subcommand};
use sap1::{disassemble_cell, load_image, CycleResult, Machine, RAM_SIZE};

#[derive(Parser)]
#[command(name = "sap1-emu")]
#[command(version = "0.1.0")]
#[command(about = "An emulator of the SAP-1 style 8-bit microcoded breadboard computer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a RAM image until the machine halts
    Run {
        /// Path to the RAM image file
        image: String,
        /// Maximum number of clock pulses (a program without HALT never stops)
        #[arg(short, long, default_value = "10000")]
        max_pulses: u64,
        /// Print every applied control word with a register snapshot
        #[arg(short, long)]
        trace: bool,
        /// Print the final machine state as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },
    /// Step through a RAM image in the TUI debugger
    #[cfg(feature = "tui")]
    Debug {
        /// Path to the RAM image file
        image: String,
    },
    /// Print a RAM image as the control unit sees it
    Disasm {
        /// Path to the RAM image file
        image: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            image,
            max_pulses,
            trace,
            json,
        } => run_image(&image, max_pulses, trace, json),
        #[cfg(feature = "tui")]
        Commands::Debug { image } => debug_image(&image),
        Commands::Disasm { image } => disasm_image(&image),
    }
}

fn load_or_exit(path: &str) -> [u8; RAM_SIZE] {
    match load_image(path) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("❌ Failed to load {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn run_image(path: &str, max_pulses: u64, trace: bool, json: bool) {
    let image = load_or_exit(path);
    let mut machine = Machine::new(image);

    if !json {
        println!("🔧 Running: {}", path);
        println!();
    }

    while !machine.is_halted() && machine.cycles < max_pulses {
        match machine.pulse() {
            CycleResult::Applied { word, regs } => {
                if trace {
                    println!(
                        "{:>5}  {:<6} PC={:<2} ADDR={:<2} IR={:<3} A={:<3} B={:<3} OUT={:<3} BUS={:<3}",
                        machine.cycles, word.to_string(),
                        regs.pc, regs.addr, regs.ir, regs.a, regs.b, regs.out, regs.bus,
                    );
                }
            }
            CycleResult::Halted => break,
        }
    }

    if json {
        match serde_json::to_string_pretty(&machine) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("❌ Failed to serialize machine state: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!();
    println!("━━━ Result ━━━");
    println!("Pulses: {}", machine.cycles);
    println!("State:  {:?}", machine.state());
    println!("OUT:    {}", machine.regs.out);
    println!("A:      {}", machine.regs.a);
    println!("B:      {}", machine.regs.b);
    println!("PC:     {}", machine.regs.pc);

    if !machine.is_halted() {
        println!();
        println!(
            "⚠️  Reached max pulses limit ({}). Use --max-pulses to increase.",
            max_pulses
        );
    }
}

#[cfg(feature = "tui")]
fn debug_image(path: &str) {
    let image = load_or_exit(path);

    if let Err(e) = sap1::run_debugger(image) {
        eprintln!("❌ Debugger error: {}", e);
        std::process::exit(1);
    }
}

fn disasm_image(path: &str) {
    let image = load_or_exit(path);

    for (addr, value) in image.iter().enumerate() {
        println!("{:>2}: {:<8} ({})", addr, disassemble_cell(*value), value);
    }
}
