//! Head/tail and random-sample views of a table.

use rand::Rng;

use crate::error::PreviewError;
use crate::types::Table;

/// Which rows to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewMode {
    /// The first `head` and last `tail` rows.
    HeadTail { head: usize, tail: usize },
    /// `n` distinct rows drawn without replacement.
    RandomSample { n: usize },
}

impl Default for PreviewMode {
    fn default() -> Self {
        PreviewMode::HeadTail { head: 5, tail: 5 }
    }
}

/// One titled block of a preview.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSection {
    pub title: String,
    pub rows: Table,
}

/// Build the sections shown for `table`.
///
/// A random sample replaces the head/tail view entirely.
pub fn preview<R: Rng + ?Sized>(
    table: &Table,
    mode: PreviewMode,
    rng: &mut R,
) -> Result<Vec<PreviewSection>, PreviewError> {
    match mode {
        PreviewMode::RandomSample { n } => Ok(vec![PreviewSection {
            title: format!("Random sample of {n} rows from the table:"),
            rows: sample(table, n, rng)?,
        }]),
        PreviewMode::HeadTail { head, tail } => Ok(vec![
            PreviewSection {
                title: "Head of the table:".to_string(),
                rows: table.head(head),
            },
            PreviewSection {
                title: "Tail of the table:".to_string(),
                rows: table.tail(tail),
            },
        ]),
    }
}

/// Draw `n` distinct rows in random order.
pub fn sample<R: Rng + ?Sized>(table: &Table, n: usize, rng: &mut R) -> Result<Table, PreviewError> {
    let available = table.row_count();
    if n == 0 || n > available {
        return Err(PreviewError::InvalidSampleSize {
            requested: n,
            available,
        });
    }
    let picked = rand::seq::index::sample(rng, available, n);
    Ok(table.select_rows(picked.into_iter()))
}
