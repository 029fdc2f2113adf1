//! `booldex` builds a boolean inverted index for a set of text files, or
//! searches one.
//!
//! Build:  `booldex [-1] [-i index.dat] [--table-size N] [--no-stem] [--top N] FILES...`
//!
//! Search: `booldex -s [-i index.dat] [--no-stem] WORD [and|or WORD]`
//!         `booldex -s [-i index.dat] not WORD`
//!
//! The heavy lifting is in the library; this file parses arguments and
//! prints results.

use std::path::PathBuf;
use std::process::ExitCode;

use argparse::{ArgumentParser, Collect, Store, StoreFalse, StoreTrue};
use booldex::{run_build, run_search, BuildOptions, SearchOptions, SearchOutcome};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut search = false;
    let mut build = BuildOptions::default();
    let mut index_path = build.index_path.display().to_string();
    let mut words: Vec<String> = vec![];

    {
        let mut ap = ArgumentParser::new();
        ap.set_description("Build a boolean inverted index over text files, or search one.");
        _ = ap.refer(&mut search).add_option(
            &["-s", "--search"],
            StoreTrue,
            "Search the index instead of building it. \
                The remaining arguments are the query.",
        );
        _ = ap.refer(&mut index_path).add_option(
            &["-i", "--index"],
            Store,
            "Index file to write or read (default: index.dat).",
        );
        _ = ap.refer(&mut build.single_threaded).add_option(
            &["-1", "--single-threaded"],
            StoreTrue,
            "Do all the work on a single thread.",
        );
        _ = ap.refer(&mut build.table_size).add_option(
            &["--table-size"],
            Store,
            "Number of hash buckets in a new index.",
        );
        _ = ap.refer(&mut build.stem).add_option(
            &["--no-stem"],
            StoreFalse,
            "Index or search tokens as they are, without stemming.",
        );
        _ = ap.refer(&mut build.top_terms).add_option(
            &["--top"],
            Store,
            "After building, print the N most frequent terms.",
        );
        _ = ap.refer(&mut words).add_argument(
            "args",
            Collect,
            "Files/directories to index, or the query words with --search. \
                For directories, all files immediately under the directory \
                are indexed.",
        );
        ap.parse_args_or_exit();
    }

    let index_path = PathBuf::from(index_path);
    let result = if search {
        let options = SearchOptions {
            index_path,
            stem: build.stem,
            query: words.join(" "),
        };
        run_search(&options).map(|outcome| match outcome {
            SearchOutcome::InvalidQuery => {
                println!("invalid query: expected WORD, not WORD, WORD and WORD, or WORD or WORD");
            }
            SearchOutcome::Hits(hits) if hits.is_empty() => println!("no documents found"),
            SearchOutcome::Hits(hits) => {
                for hit in hits {
                    match hit.path {
                        Some(path) => println!("{}\t{}", hit.doc_id, path.display()),
                        None => println!("{}", hit.doc_id),
                    }
                }
            }
        })
    } else {
        build.index_path = index_path;
        build.documents = words;
        run_build(&build).map(|summary| {
            println!(
                "indexed {} documents, {} terms",
                summary.documents, summary.terms
            );
            for (rank, (term, count)) in summary.top_terms.iter().enumerate() {
                println!("{:>5} {:>10} {}", rank + 1, count, term);
            }
        })
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
