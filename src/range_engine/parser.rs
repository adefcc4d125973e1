//! Workbook → [`StrategyTable`].
//!
//! A range workbook has up to two relevant sheets, `RFI` and `VsOpen`. Each
//! holds one or more stacked grids laid out as:
//!
//! ```text
//! RFI: CO                      <- title, 1 or 2 rows above the header
//!     A  K  Q  J  T  9 ... 2   <- header, columns B..N
//! A   R  R  R  R  R  R ...     <- 13 body rows
//! K   R  R  R/F ...
//! ...
//! ```
//!
//! Cells hold slash-separated tokens `R`, `C`, `F`, each optionally followed
//! by a numeric frequency that is ignored (`R/C50`, `F`).

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::range_engine::{
    cleaning,
    error::{RangeError, Result},
    hand_key::{encode, GRID},
    models::{Action, ActionSet, Position, Scenario, RANK_SYMBOLS},
    table::{key_for, StrategyTable},
};

pub const RFI_SHEET: &str = "RFI";
pub const VS_OPEN_SHEET: &str = "VsOpen";

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([RCF])\s*(\d+(\.\d+)?)?$").expect("token regex"));

static RFI_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)RFI:\s*(UTG|HJ|CO|BTN|SB)").expect("rfi title regex"));

static VS_OPEN_TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)VsOpen:\s*(UTG|HJ|CO|BTN|SB|BB)\s*vs\s*(UTG|HJ|CO|BTN|SB|BB)")
        .expect("vs open title regex")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Fail on untitled grids instead of assuming a default identity, and
    /// skip the AA/KK fold clean-up.
    pub strict: bool,
}

/// The two sheet layouts the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    Rfi,
    VsOpen,
}

impl SheetKind {
    pub fn from_name(name: &str) -> Option<SheetKind> {
        match name {
            RFI_SHEET => Some(SheetKind::Rfi),
            VS_OPEN_SHEET => Some(SheetKind::VsOpen),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SheetKind::Rfi => RFI_SHEET,
            SheetKind::VsOpen => VS_OPEN_SHEET,
        }
    }

    /// Calling is structurally impossible in an unopened pot.
    fn allows_call(self) -> bool {
        self == SheetKind::VsOpen
    }

    fn title_scenario(self, text: &str) -> Option<Scenario> {
        match self {
            SheetKind::Rfi => {
                let caps = RFI_TITLE_RE.captures(text)?;
                let hero = caps[1].parse::<Position>().ok()?;
                Some(Scenario::Unopened { hero })
            }
            SheetKind::VsOpen => {
                let caps = VS_OPEN_TITLE_RE.captures(text)?;
                let hero = caps[1].parse::<Position>().ok()?;
                let opener = caps[2].parse::<Position>().ok()?;
                Some(Scenario::VsOpen { hero, opener })
            }
        }
    }

    fn default_scenario(self) -> Scenario {
        match self {
            SheetKind::Rfi => cleaning::default_rfi_scenario(),
            SheetKind::VsOpen => cleaning::default_vs_open_scenario(),
        }
    }
}

/// One sheet as a dense grid of cell text. Row 0 / column 0 is cell A1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl SheetGrid {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        SheetGrid { name: name.into(), rows }
    }

    fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Parse workbook bytes (xlsx, xls, xlsb or ods) into a strategy table.
///
/// A workbook without `RFI`/`VsOpen` sheets, or whose sheets hold no
/// recognisable grid, gives an empty table.
///
/// # Errors
///
/// Bytes that are not a readable workbook give [`RangeError::Workbook`].
/// Callers that show such a file as "no ranges loaded" should map this error
/// to an empty [`StrategyTable`] themselves.
pub fn parse_workbook(bytes: &[u8], options: &ParseOptions) -> Result<StrategyTable> {
    let sheets = read_workbook(bytes)?;
    parse_sheets(&sheets, options)
}

/// Extract the `RFI` and `VsOpen` sheets as text grids.
pub fn read_workbook(bytes: &[u8]) -> Result<Vec<SheetGrid>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| RangeError::Workbook(e.to_string()))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        if SheetKind::from_name(&name).is_none() {
            debug!("ignoring sheet {name:?}");
            continue;
        }
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| RangeError::Sheet { sheet: name.clone(), message: e.to_string() })?;
        sheets.push(SheetGrid { rows: dense_rows(&range), name });
    }
    Ok(sheets)
}

/// Lay out a used range at absolute coordinates, padding above and to the left.
fn dense_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((row0, col0)) = range.start() else {
        return Vec::new();
    };
    let mut rows = vec![Vec::new(); row0 as usize];
    for row in range.rows() {
        let mut cells = vec![String::new(); col0 as usize];
        cells.extend(row.iter().map(cell_text));
        rows.push(cells);
    }
    rows
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse already-extracted sheets. Sheets with other names are ignored.
pub fn parse_sheets(sheets: &[SheetGrid], options: &ParseOptions) -> Result<StrategyTable> {
    let mut table = StrategyTable::new();
    for kind in [SheetKind::Rfi, SheetKind::VsOpen] {
        if let Some(sheet) = sheets.iter().find(|s| s.name == kind.name()) {
            parse_sheet(sheet, kind, options, &mut table)?;
        }
    }

    if !options.strict {
        let (cleaned, _) = cleaning::strip_premium_folds(table);
        table = cleaned;
    }
    info!("parsed {} range entries across {} scenario(s)", table.len(), table.scenarios().len());
    Ok(table)
}

fn parse_sheet(
    sheet: &SheetGrid,
    kind: SheetKind,
    options: &ParseOptions,
    table: &mut StrategyTable,
) -> Result<()> {
    let mut r = 0;
    while r < sheet.rows.len() {
        if !is_header_row(&sheet.rows[r]) {
            r += 1;
            continue;
        }

        let scenario = match find_title(sheet, kind, r) {
            Some(scenario) => scenario,
            None if options.strict => {
                return Err(RangeError::MissingTitle { sheet: sheet.name.clone(), row: r });
            }
            None => {
                let fallback = kind.default_scenario();
                warn!("{}: no title above header row {r}, assuming {fallback}", sheet.name);
                fallback
            }
        };
        debug!("{}: grid for {} at row {r}", sheet.name, scenario);

        let mut written = 0usize;
        for i in 0..GRID {
            for j in 0..GRID {
                let actions = parse_cell(sheet.cell(r + 1 + i, 1 + j), kind.allows_call());
                if actions.is_empty() {
                    continue;
                }
                table.insert(key_for(scenario, encode(i, j)), actions);
                written += 1;
            }
        }
        debug!("{}: {written} cell(s) assigned for {scenario}", sheet.name);

        r += 1 + GRID;
    }
    Ok(())
}

/// Columns B..N hold the 13 rank symbols, highest first.
fn is_header_row(row: &[String]) -> bool {
    match row.get(1..1 + GRID) {
        Some(cells) => cells.iter().zip(RANK_SYMBOLS).all(|(c, s)| c.trim() == s),
        None => false,
    }
}

/// Look for the grid title one row above the header, then two.
fn find_title(sheet: &SheetGrid, kind: SheetKind, header_row: usize) -> Option<Scenario> {
    [1, 2]
        .into_iter()
        .filter(|&up| header_row >= up)
        .find_map(|up| kind.title_scenario(sheet.cell(header_row - up, 0)))
}

/// Parse one cell's text into an action set.
///
/// Unrecognised tokens are dropped. With `allow_call` false a `C` token is
/// ignored as well.
pub fn parse_cell(text: &str, allow_call: bool) -> ActionSet {
    let upper = text.trim().to_uppercase();
    let mut actions = ActionSet::empty();
    for token in upper.split('/').map(str::trim).filter(|t| !t.is_empty()) {
        let Some(caps) = TOKEN_RE.captures(token) else {
            continue;
        };
        let Some(action) = caps[1].chars().next().and_then(Action::from_letter) else {
            continue;
        };
        if action == Action::Call && !allow_call {
            continue;
        }
        actions.insert(action);
    }
    actions
}
