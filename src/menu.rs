//! Text menu for querying a generated tree.

use std::io::{self, BufRead, Write};

use crate::tree::FamilyTree;

/// A parsed menu selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    Total,
    ByDecade,
    Duplicates,
    Quit,
}

impl MenuChoice {
    /// Case-insensitive single-letter parse.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "T" => Some(MenuChoice::Total),
            "D" => Some(MenuChoice::ByDecade),
            "N" => Some(MenuChoice::Duplicates),
            "Q" => Some(MenuChoice::Quit),
            _ => None,
        }
    }
}

/// Prompt on `output` and answer queries read from `input` until the user
/// quits or input runs out.
pub fn run_menu<R: BufRead, W: Write>(tree: &FamilyTree, mut input: R, mut output: W) -> io::Result<()> {
    let mut line = String::new();
    loop {
        writeln!(output, "\nAre you interested in:")?;
        writeln!(output, "(T)otal number of people in the tree")?;
        writeln!(output, "Total number of people in the tree by (D)ecade")?;
        writeln!(output, "(N)ames duplicated")?;
        writeln!(output, "(Q)uit")?;
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }

        match MenuChoice::parse(&line) {
            Some(MenuChoice::Total) => {
                writeln!(output, "The tree contains {} people total", tree.total_people())?;
            }
            Some(MenuChoice::ByDecade) => {
                for (decade, count) in tree.total_by_decade() {
                    writeln!(output, "{}: {}", decade, count)?;
                }
            }
            Some(MenuChoice::Duplicates) => {
                let duplicates = tree.duplicate_names();
                writeln!(output, "There are {} duplicate names:", duplicates.len())?;
                for name in duplicates {
                    writeln!(output, "* {}", name)?;
                }
            }
            Some(MenuChoice::Quit) => return Ok(()),
            None => writeln!(output, "Invalid choice.")?,
        }
    }
}
