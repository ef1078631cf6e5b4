/*! YouTube category labels.

Replaces a numeric category id column with the category name.
!*/
use std::path::Path;

use csv::ByteRecord;
use log::{debug, info};

use crate::error::Error;
use crate::io::columns::require_column;
use crate::io::table::Table;
use crate::io::writer::write_table;

pub const DEFAULT_ID_COLUMN: &str = "Categoria_ID";
pub const DEFAULT_NAME_COLUMN: &str = "Categoria_Nombre";

/// Name of the YouTube category `id`.
pub fn category_name(id: u32) -> Option<&'static str> {
    let name = match id {
        1 => "Film & Animation",
        2 => "Autos & Vehicles",
        10 => "Music",
        15 => "Pets & Animals",
        17 => "Sports",
        18 => "Short Movies",
        19 => "Travel & Events",
        20 => "Gaming",
        21 => "Videoblogging",
        22 => "People & Blogs",
        23 => "Comedy",
        24 => "Entertainment",
        25 => "News & Politics",
        26 => "Howto & Style",
        27 => "Education",
        28 => "Science & Technology",
        29 => "Nonprofits & Activism",
        30 => "Movies",
        31 => "Anime/Animation",
        32 => "Action/Adventure",
        33 => "Classics",
        34 => "Comedy (Movies)",
        35 => "Documentary",
        36 => "Drama",
        37 => "Family",
        38 => "Foreign",
        39 => "Horror",
        40 => "Sci-Fi/Fantasy",
        41 => "Thriller",
        42 => "Shorts",
        43 => "Shows",
        44 => "Trailers",
        _ => return None,
    };
    Some(name)
}

/// Parse a raw id field. Integral floats (`"22.0"`) are accepted.
fn parse_id(field: &str) -> Option<u32> {
    let field = field.trim();
    field.parse::<u32>().ok().or_else(|| {
        field
            .parse::<f64>()
            .ok()
            .filter(|id| id.fract() == 0.0 && *id >= 0.0 && *id <= u32::MAX as f64)
            .map(|id| id as u32)
    })
}

/// Replace `id_column` of the table at `path` by a `name_column` holding category names.
///
/// The file is rewritten in place. Unknown or non numeric ids yield empty names.
/// Returns the number of rows with a known category.
pub fn relabel(path: &Path, id_column: &str, name_column: &str) -> Result<usize, Error> {
    let table = Table::from_path(path)?;
    let id_idx = require_column(
        table.headers().iter().map(String::as_str),
        &[id_column],
        &path.to_string_lossy(),
    )?;

    let mut headers: Vec<String> = table
        .headers()
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != id_idx)
        .map(|(_, header)| header.clone())
        .collect();
    headers.push(name_column.to_string());

    let mut known = 0;
    let mut rows = Vec::with_capacity(table.len());
    let mut names = Vec::with_capacity(table.len());
    for (idx, row) in table.rows().iter().enumerate() {
        let name = table
            .text(idx, id_idx)
            .unwrap_or(None)
            .and_then(parse_id)
            .and_then(category_name);
        match name {
            Some(_) => known += 1,
            None => debug!("row {}: unknown category {:?}", idx, row.get(id_idx)),
        }

        let kept: ByteRecord = row
            .iter()
            .enumerate()
            .filter(|(col, _)| *col != id_idx)
            .map(|(_, field)| field)
            .collect();
        rows.push(kept);
        names.push(vec![name.unwrap_or_default().to_string()]);
    }

    write_table(path, &headers, &rows, &names)?;
    info!(
        "{:?}: {} of {} rows with a known category",
        path,
        known,
        table.len()
    );
    Ok(known)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn names() {
        assert_eq!(category_name(10), Some("Music"));
        assert_eq!(category_name(44), Some("Trailers"));
        assert_eq!(category_name(3), None);
    }

    #[test]
    fn ids() {
        assert_eq!(parse_id("22"), Some(22));
        assert_eq!(parse_id(" 22.0 "), Some(22));
        assert_eq!(parse_id("22.5"), None);
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("-1"), None);
    }

    #[test]
    fn relabel_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("videos.csv");
        fs::write(
            &path,
            "Titulo_Video,Categoria_ID,Vistas\nuno,10,5\ndos,abc,6\ntres,,7\ncuatro,3,8\n",
        )
        .unwrap();

        let known = relabel(&path, DEFAULT_ID_COLUMN, DEFAULT_NAME_COLUMN).unwrap();
        assert_eq!(known, 1);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "\u{feff}Titulo_Video,Vistas,Categoria_Nombre\nuno,5,Music\ndos,6,\ntres,7,\ncuatro,8,\n"
        );
    }

    #[test]
    fn missing_id_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("videos.csv");
        fs::write(&path, "Titulo_Video\nuno\n").unwrap();
        assert!(matches!(
            relabel(&path, DEFAULT_ID_COLUMN, DEFAULT_NAME_COLUMN),
            Err(Error::Resource(_))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "Titulo_Video\nuno\n");
    }
}
