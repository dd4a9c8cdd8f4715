//! Bounded variable addition preprocessor for CNF formulas in DIMACS format

use bva_common::{
    bva::{apply, Outcome, DEFAULT_ITERATION_LIMIT},
    config, die,
    formula::Formula,
    memory::format_memory_usage,
    output::{install_signal_handler, print_key_value, Timer},
    parser::{
        open_file_for_writing, parse_formula, read_compressed_file_or_stdin, write_dimacs,
    },
    proof::DratTracer,
    puts,
};
use clap::{Arg, ArgMatches};
use std::io::{self, Write};

fn main() {
    std::process::exit(run_frontend());
}

/// Run `bva`, returning its exit code.
///
/// This is a separate function because `std::process::exit` does not
/// call destructors, and the proof writer needs to be flushed.
fn run_frontend() -> i32 {
    install_signal_handler();
    let mut app = clap::App::new("bva")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .after_help(
            "Input files may be compressed - supported file extensions are: zst, gz, bz2, xz and lz4.
Use \"-\" for the input or output file to use standard input or output.",
        )
        .arg(
            Arg::with_name("INPUT")
                .required(true)
                .help("input file in DIMACS format"),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .help("output file for the preprocessed formula (defaults to standard output)"),
        )
        .arg(
            Arg::with_name("PROOF_FILE")
                .takes_value(true)
                .short("p")
                .long("proof")
                .help("Write a DRAT trace of all clause additions and deletions to this file."),
        )
        .arg(
            Arg::with_name("ITERATIONS")
                .takes_value(true)
                .short("i")
                .long("iterations")
                .help("Stop after this many scheduler iterations [default: 10000000]."),
        )
        .arg(
            Arg::with_name("MEMORY_USAGE_BREAKDOWN")
                .short("m")
                .long("--memory-breakdown")
                .help("Output detailed memory usage metrics.")
                .hidden(true),
        );
    if config::ENABLE_LOGGING {
        app = app.arg(
            Arg::with_name("v")
                .short("v")
                .help("Verbose output. Print timing for the individual phases."),
        );
    }

    let flags = Flags::new(app.get_matches());
    let timer = Timer::name("total time");
    let mut formula = match &flags.proof_filename {
        None => Formula::new(),
        Some(filename) => {
            Formula::with_tracer(Box::new(DratTracer::new(open_file_for_writing(filename))))
        }
    };
    {
        let mut _timer = Timer::name("parsing formula");
        if !flags.verbose {
            _timer.disabled = true;
        }
        let stdin = io::stdin();
        let input = read_compressed_file_or_stdin(&flags.formula_filename, stdin.lock());
        parse_formula(&mut formula, input)
            .unwrap_or_else(|err| die!("failed to parse formula: {}", err));
    }
    let input_clauses = formula.number_of_live_clauses();
    let outcome = {
        let mut _timer = Timer::name("factoring");
        if !flags.verbose {
            _timer.disabled = true;
        }
        apply(&mut formula, flags.max_iterations)
    };
    let added = formula.stats.added - input_clauses;
    let net_reduction = formula.stats.deleted as i64 - added as i64;
    formula.trace_comment(&format!("clauses added: {}", added));
    formula.trace_comment(&format!("clauses deleted: {}", formula.stats.deleted));
    formula.trace_comment(&format!("net clause reduction: {}", net_reduction));
    formula.trace_comment(&format!(
        "auxiliary variables: {}",
        formula.stats.auxiliary_variables
    ));
    write_output(&formula, &flags.output_filename);
    print_key_value("input clauses", input_clauses);
    print_key_value("output clauses", formula.number_of_live_clauses());
    print_key_value("tautologies dropped", formula.stats.tautologies);
    print_key_value("clauses added", added);
    print_key_value("clauses deleted", formula.stats.deleted);
    print_key_value("net clause reduction", net_reduction);
    print_key_value(
        "auxiliary variables",
        formula.stats.auxiliary_variables,
    );
    print_key_value(
        "outcome",
        match outcome {
            Outcome::Drained => "schedule drained",
            Outcome::IterationLimit => "iteration limit reached",
        },
    );
    drop(timer);
    print_memory_usage(&formula, &flags);
    0
}

pub struct Flags {
    pub memory_usage_breakdown: bool,
    pub verbose: bool,
    pub max_iterations: usize,
    /// Input formula
    pub formula_filename: String,
    /// Output formula, "-" meaning stdout
    pub output_filename: String,
    /// Present when we want to write a DRAT trace
    pub proof_filename: Option<String>,
}

impl Flags {
    /// Create a flags instance from commandline arguments.
    pub fn new(matches: ArgMatches) -> Flags {
        let max_iterations = match matches.value_of("ITERATIONS") {
            None => DEFAULT_ITERATION_LIMIT,
            Some(text) => text
                .parse()
                .unwrap_or_else(|_| die!("invalid iteration limit: {}", text)),
        };
        Flags {
            memory_usage_breakdown: matches.is_present("MEMORY_USAGE_BREAKDOWN"),
            verbose: matches.is_present("v"),
            max_iterations,
            formula_filename: matches.value_of("INPUT").map(String::from).unwrap_or_default(),
            output_filename: matches
                .value_of("OUTPUT")
                .map(String::from)
                .unwrap_or_else(|| "-".to_string()),
            proof_filename: matches.value_of("PROOF_FILE").map(String::from),
        }
    }
}

/// Write the preprocessed formula to the output file, or to stdout for "-".
fn write_output(formula: &Formula, filename: &str) {
    if filename == "-" {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        write_dimacs(formula, &mut lock)
            .unwrap_or_else(|err| die!("failed to write formula: {}", err));
        return;
    }
    let mut sink = open_file_for_writing(filename);
    write_dimacs(formula, &mut sink)
        .and_then(|()| sink.flush())
        .unwrap_or_else(|err| die!("failed to write formula: {}", err));
}

fn print_memory_usage(formula: &Formula, flags: &Flags) {
    let usages = formula.memory_breakdown();
    let total = usages.iter().fold(0, |sum, pair| sum + pair.1);
    print_key_value("memory (MB)", format_memory_usage(total));
    if !flags.memory_usage_breakdown {
        return;
    }
    for pair in usages {
        print_key_value(&format!("memory-{}", pair.0), format_memory_usage(pair.1));
    }
}
