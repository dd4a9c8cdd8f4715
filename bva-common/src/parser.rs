//! DIMACS CNF reading and writing

use crate::{
    clause::write_clause,
    formula::Formula,
    input::Input,
    literal::{Literal, Variable},
    marks::Marks,
};
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Result, StdinLock, Write},
};

/// Open a file for reading.
/// # Panics
/// Panics on error.
pub fn open_file(filename: &str) -> File {
    File::open(filename).unwrap_or_else(|err| die!("cannot open file: {}", err))
}

/// Open a file for writing.
/// # Panics
/// Panics on error.
pub fn open_file_for_writing(filename: &str) -> BufWriter<File> {
    BufWriter::new(
        File::create(filename).unwrap_or_else(|err| die!("cannot open file for writing: {}", err)),
    )
}

/// File extension of Zstandard archives.
const ZSTD: &str = ".zst";
/// File extension of Gzip archives.
const GZIP: &str = ".gz";
/// File extension of Bzip2 archives.
const BZIP2: &str = ".bz2";
/// File extension of XZ archives.
const XZ: &str = ".xz";
/// File extension of LZ4 archives.
const LZ4: &str = ".lz4";

/// Strip the compression format off a filename.
///
/// If the filename ends with a known archive extension,
/// return the filename without extension and the extension.
/// Otherwise return the unmodified filename and the empty string.
fn compression_format_by_extension(filename: &str) -> (&str, &str) {
    let mut basename = filename;
    let mut compression_format = "";
    for extension in &[ZSTD, GZIP, BZIP2, LZ4, XZ] {
        if filename.ends_with(extension) {
            compression_format = extension;
            basename = &filename[0..filename.len() - extension.len()];
            break;
        }
    }
    (basename, compression_format)
}

/// Return an [Input](../input/struct.Input.html) to read from a possibly
/// compressed file.
///
/// If the file is compressed it is transparently uncompressed.
/// If the filename is "-", returns an input reading data from stdin.
pub fn read_compressed_file_or_stdin<'a>(filename: &'a str, stdin: StdinLock<'a>) -> Input<'a> {
    match filename {
        "-" => Input::new(Box::new(stdin.bytes().map(panic_on_error))),
        filename => read_compressed_file(filename),
    }
}

/// Return an [Input](../input/struct.Input.html) to read from a possibly
/// compressed file.
pub fn read_compressed_file(filename: &str) -> Input {
    let file = open_file(filename);
    Input::new(read_from_compressed_file(file, filename))
}

fn read_from_compressed_file(file: File, filename: &str) -> Box<dyn Iterator<Item = u8>> {
    let (_basename, compression_format) = compression_format_by_extension(filename);
    if compression_format == "" {
        return Box::new(BufReader::new(file).bytes().map(panic_on_error));
    }
    match compression_format {
        ZSTD => {
            let de = zstd::stream::read::Decoder::new(file)
                .unwrap_or_else(|err| die!("failed to decompress ZST archive: {}", err));
            Box::new(de.bytes().map(panic_on_error))
        }
        GZIP => {
            let de = flate2::read::GzDecoder::new(file);
            Box::new(de.bytes().map(panic_on_error))
        }
        BZIP2 => {
            let de = bzip2::read::BzDecoder::new(file);
            Box::new(de.bytes().map(panic_on_error))
        }
        XZ => {
            let de = xz2::read::XzDecoder::new(file);
            Box::new(de.bytes().map(panic_on_error))
        }
        LZ4 => {
            let de = lz4::Decoder::new(file)
                .unwrap_or_else(|err| die!("failed to decode LZ4 archive: {}", err));
            Box::new(de.bytes().map(panic_on_error))
        }
        _ => crate::output::unreachable(),
    }
}

/// Unwraps a result, panicking on error.
pub fn panic_on_error<T>(result: Result<T>) -> T {
    result.unwrap_or_else(|error| die!("{}", error))
}

/// Parse a DIMACS comment starting with "c ".
///
/// Consumes a leading "c" and any characters until (including) the next newline.
fn parse_comment(input: &mut Input) -> Result<()> {
    match input.peek() {
        Some(b'c') => {
            input.next();
            while let Some(c) = input.next() {
                if c == b'\n' {
                    return Ok(());
                }
            }
            Err(input.error(Input::NEWLINE))
        }
        _ => Err(input.error(Input::P_CNF)),
    }
}

/// Parse the DIMACS header, returning the variable bound and the declared
/// number of clauses.
fn parse_formula_header(input: &mut Input) -> Result<(Variable, usize)> {
    while Some(b'c') == input.peek() {
        parse_comment(input)?
    }
    for &expected in b"p cnf" {
        if input.peek().map_or(true, |c| c != expected) {
            return Err(input.error(Input::P_CNF));
        }
        input.next();
    }
    input.skip_some_whitespace()?;
    let maxvar = input.parse_dec32()?;
    if maxvar < 0 {
        return Err(input.error(Input::P_CNF));
    }
    input.skip_some_whitespace()?;
    let num_clauses = input.parse_dec32()?;
    if num_clauses < 0 {
        return Err(input.error(Input::P_CNF));
    }
    input.skip_some_whitespace()?;
    Ok((Variable(maxvar as u32), num_clauses as usize))
}

enum ParsedClause {
    Regular,
    Tautology,
}

/// Parse one clause body into `literals`, ending at the terminating zero.
///
/// Repeated literals are dropped. A clause containing both polarities of a
/// variable is reported as a tautology; its literals are meaningless then.
fn parse_clause(
    input: &mut Input,
    bound: Variable,
    marks: &mut Marks,
    literals: &mut Vec<Literal>,
) -> Result<ParsedClause> {
    literals.clear();
    let mut lease = marks.lease();
    let mut tautology = false;
    loop {
        let value = input.parse_dec32()?;
        input.skip_some_whitespace()?;
        if value == 0 {
            if tautology {
                return Ok(ParsedClause::Tautology);
            }
            if literals.is_empty() {
                return Err(input.error("empty clause"));
            }
            return Ok(ParsedClause::Regular);
        }
        let literal = Literal::new(value);
        if literal.variable() > bound {
            return Err(input.error("variable exceeds the header bound"));
        }
        let sign = lease.sign(literal);
        if sign > 0 {
            continue; // repeated literal
        }
        if sign < 0 {
            tautology = true;
            continue;
        }
        lease.mark(literal);
        if !tautology {
            literals.push(literal);
        }
    }
}

/// Parse a DIMACS formula into the clause store.
///
/// The header's variable bound becomes the store's maximum variable even
/// if some variables never occur. Tautological clauses are counted and
/// dropped; every other clause is inserted as an original clause. The
/// number of parsed clauses must match the header exactly.
pub fn parse_formula(formula: &mut Formula, mut input: Input) -> Result<()> {
    let (maxvar, num_clauses) = parse_formula_header(&mut input)?;
    formula.declare_maximum_variable(maxvar);
    let mut marks = Marks::new();
    marks.enlarge(maxvar);
    let mut literals = Vec::new();
    let mut parsed = 0;
    while let Some(c) = input.peek() {
        if c == b'c' {
            parse_comment(&mut input)?;
            continue;
        }
        match parse_clause(&mut input, maxvar, &mut marks, &mut literals)? {
            ParsedClause::Tautology => formula.stats.tautologies += 1,
            ParsedClause::Regular => {
                formula.insert(&literals, true);
            }
        }
        parsed += 1;
    }
    if parsed != num_clauses {
        return Err(input.error("clause count does not match the header"));
    }
    Ok(())
}

/// Parse a formula from a possibly compressed file.
pub fn parse_formula_file(formula: &mut Formula, filename: &str) -> Result<()> {
    parse_formula(formula, read_compressed_file(filename))
}

/// Write the live clauses in DIMACS format, header included.
pub fn write_dimacs(formula: &Formula, sink: &mut impl Write) -> io::Result<()> {
    writeln!(
        sink,
        "p cnf {} {}",
        formula.maximum_variable().0,
        formula.number_of_live_clauses()
    )?;
    for clause in formula.live_clauses() {
        write_clause(sink, formula.literals(clause))?;
        writeln!(sink)?;
    }
    Ok(())
}
