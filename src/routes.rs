//! Load the table of recorded routes from a spreadsheet
use crate::Error;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, trace};
use std::path::Path;

/// Header names of the columns every route table must provide
pub static REQUIRED_COLUMNS: [&str; 6] = ["File_GPX", "Tipo", "Location", "Titolo", "Data", "Link"];

/// Text shown for blank cells
pub static MISSING_VALUE: &str = "nan";

/// Display format of date and time cells
static DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single row of the route table with every cell converted into display text
#[derive(Clone, Debug, PartialEq)]
pub struct RouteRecord {
    /// spreadsheet row of the record, counting the first data row as 1
    pub row: usize,
    pub file: String,
    pub category: String,
    pub location: String,
    pub title: String,
    pub date: String,
    pub link: String,
}

/// Read every route in the first worksheet of the spreadsheet stored at `path`, in row order
pub fn load_routes<P: AsRef<Path>>(path: P) -> Result<Vec<RouteRecord>, Error> {
    let path = path.as_ref();
    let table_error = |msg: String| Error::TableLoadError(path.to_path_buf(), msg);
    if !path.exists() {
        return Err(table_error("file does not exist".to_string()));
    }

    let mut workbook = open_workbook_auto(path).map_err(|e| table_error(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| table_error("workbook has no worksheets".to_string()))?
        .map_err(|e| table_error(e.to_string()))?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .map(|cells| cells.iter().map(display_cell).collect())
        .unwrap_or_default();
    let mut columns = [0usize; 6];
    for (idx, name) in REQUIRED_COLUMNS.iter().enumerate() {
        columns[idx] = header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| table_error(format!("missing required column '{}'", name)))?;
    }
    trace!("Route table columns: {:?}", header);

    let mut routes = Vec::new();
    for (idx, cells) in rows.enumerate() {
        if cells.iter().all(|c| matches!(c, Data::Empty)) {
            debug!("Skipping blank row {} of {:?}", idx + 1, path);
            continue;
        }
        let cell = |col: usize| cells.get(columns[col]).map_or_else(|| MISSING_VALUE.to_string(), display_cell);
        routes.push(RouteRecord {
            row: idx + 1,
            file: cell(0),
            category: cell(1).trim().to_string(),
            location: cell(2).trim().to_string(),
            title: cell(3),
            date: cell(4),
            link: cell(5),
        });
    }
    debug!("Loaded {} routes from {:?}", routes.len(), path);

    Ok(routes)
}

/// Convert a spreadsheet cell into the text shown on the map
pub fn display_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => MISSING_VALUE.to_string(),
        Data::String(val) => val.clone(),
        Data::Int(val) => val.to_string(),
        Data::Float(val) => {
            if val.fract() == 0.0 && val.abs() < 1e15 {
                format!("{}", *val as i64)
            } else {
                val.to_string()
            }
        }
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(val) => match val.as_datetime() {
            Some(dt) => dt.format(DATETIME_FORMAT).to_string(),
            None => val.as_f64().to_string(),
        },
        Data::DateTimeIso(val) => display_iso_datetime(val),
        Data::DurationIso(val) => val.clone(),
        Data::Error(err) => err.to_string(),
    }
}

/// Show ISO 8601 dates the same way as native spreadsheet dates, other text is kept as is
fn display_iso_datetime(val: &str) -> String {
    if let Ok(dt) = NaiveDateTime::parse_from_str(val, "%Y-%m-%dT%H:%M:%S%.f") {
        dt.format(DATETIME_FORMAT).to_string()
    } else if let Ok(date) = NaiveDate::parse_from_str(val, "%Y-%m-%d") {
        date.format("%Y-%m-%d 00:00:00").to_string()
    } else {
        val.to_string()
    }
}
