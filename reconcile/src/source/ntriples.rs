//! Raw N-Triples source.
//!
//! Statements are streamed through `sophia_turtle`'s N-Triples parser straight
//! into a [`Canonicalizer`]; the raw graph is never materialised twice.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use sophia_api::source::{StreamError, TripleSource};
use sophia_api::term::Term;
use sophia_api::triple::Triple;
use sophia_turtle::parser::nt;

use crate::canonical::Canonicalizer;
use crate::error::{ReconcileError, Result};

/// Origin label used in diagnostics for in-memory sources.
const MEMORY_ORIGIN: &str = "<memory>";

/// Feeds every statement of the file at `path` into `canonicalizer`.
///
/// # Errors
///
/// Returns [`ReconcileError::Io`] if the file cannot be opened,
/// [`ReconcileError::Parse`] on a syntax error, or any error raised by
/// [`Canonicalizer::observe`].
pub fn read_file(path: &Path, canonicalizer: &mut Canonicalizer) -> Result<()> {
    let file = File::open(path).map_err(|e| ReconcileError::io(path, e))?;
    read_bufread(
        BufReader::new(file),
        &path.display().to_string(),
        canonicalizer,
    )
}

/// Feeds every statement of `text` into `canonicalizer`.
///
/// # Errors
///
/// Same as [`read_file`], minus I/O.
pub fn read_str(text: &str, canonicalizer: &mut Canonicalizer) -> Result<()> {
    read_bufread(text.as_bytes(), MEMORY_ORIGIN, canonicalizer)
}

fn read_bufread<R: BufRead>(
    reader: R,
    origin: &str,
    canonicalizer: &mut Canonicalizer,
) -> Result<()> {
    let before = canonicalizer.statements();
    let outcome = nt::parse_bufread(reader).try_for_each_triple(|t| {
        let predicate = term_text(t.p());
        canonicalizer.observe(term_text(t.s()), &predicate, term_text(t.o()))
    });
    match outcome {
        Ok(()) => {
            tracing::debug!(
                origin,
                statements = canonicalizer.statements() - before,
                "raw source read"
            );
            Ok(())
        }
        Err(StreamError::SourceError(e)) => Err(ReconcileError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        }),
        Err(StreamError::SinkError(e)) => Err(e),
    }
}

/// String form of a raw term: IRI text, blank node label, or literal
/// lexical form. Entities of the encoded tables are compared against this.
fn term_text<T: Term>(term: T) -> String {
    if let Some(iri) = term.iri() {
        iri.as_str().to_string()
    } else if let Some(id) = term.bnode_id() {
        id.as_str().to_string()
    } else if let Some(lex) = term.lexical_form() {
        (*lex).to_owned()
    } else {
        String::new()
    }
}
