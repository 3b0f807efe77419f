use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{format_date, parse_date};
use crate::error::ValidationError;
use crate::time_block::validate_block;

/// One grid cell as reported by the UI: a date key and a time block.
///
/// Unvalidated on purpose; cells come straight from pointer events and are
/// only checked when a gesture is committed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub date: String,
    pub block: usize,
}

impl Cell {
    pub fn new(date: impl Into<String>, block: usize) -> Self {
        Cell {
            date: date.into(),
            block,
        }
    }
}

/// Axis-aligned, validated rectangle. Both corners are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionRect {
    start_date: NaiveDate,
    end_date: NaiveDate,
    start_block: usize,
    end_block: usize,
}

impl SelectionRect {
    /// Normalise two opposite corners, in any order, into a rectangle.
    pub fn from_corners(a: &Cell, b: &Cell) -> Result<Self, ValidationError> {
        let start_block = validate_block(a.block.min(b.block))?;
        let end_block = validate_block(a.block.max(b.block))?;

        // Canonical dates sort chronologically, so string order is enough here.
        let (first, second) = if a.date <= b.date {
            (&a.date, &b.date)
        } else {
            (&b.date, &a.date)
        };
        let start_date = parse_date(first)?;
        let end_date = parse_date(second)?;

        Ok(SelectionRect {
            start_date,
            end_date,
            start_block,
            end_block,
        })
    }

    pub fn single(cell: &Cell) -> Result<Self, ValidationError> {
        Self::from_corners(cell, cell)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn start_block(&self) -> usize {
        self.start_block
    }

    pub fn end_block(&self) -> usize {
        self.end_block
    }

    pub fn blocks(&self) -> RangeInclusive<usize> {
        self.start_block..=self.end_block
    }

    /// Every calendar day between the two date corners, inclusive.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |d| *d <= end)
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.blocks().contains(&cell.block)
            && parse_date(&cell.date)
                .is_ok_and(|d| d >= self.start_date && d <= self.end_date)
    }

    pub fn cells(&self) -> Vec<Cell> {
        self.blocks()
            .flat_map(|block| self.dates().map(move |d| Cell::new(format_date(d), block)))
            .collect()
    }
}

/// True when the two corners describe a committable rectangle.
pub fn bounds_are_valid(a: &Cell, b: &Cell) -> bool {
    SelectionRect::from_corners(a, b).is_ok()
}
