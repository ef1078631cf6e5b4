/*! Column alias resolution.

Input files and lexicon resources name their columns differently depending on where they come from
(`Título_Video` or `Titulo_Video`, `palabra` or `word`).
An [Alias] groups the names a single logical column can have, and is resolved once against a header.
!*/
use log::{debug, warn};

use crate::error::Error;

/// Normalize a header cell for comparison: strip a BOM, trim and lowercase.
fn normalize(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Find the position of the first of `names` present in `headers`.
///
/// Comparison is case-insensitive and ignores a leading BOM.
/// Aliases are tried in order, so the first alias wins if a header holds several of them.
pub fn find_column<'h>(headers: impl IntoIterator<Item = &'h str> + Clone, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| {
        let name = normalize(name);
        headers
            .clone()
            .into_iter()
            .position(|header| normalize(header) == name)
    })
}

/// Same as [find_column], failing with [Error::Resource] when nothing matches.
pub fn require_column<'h>(
    headers: impl IntoIterator<Item = &'h str> + Clone,
    names: &[&str],
    resource: &str,
) -> Result<usize, Error> {
    find_column(headers, names).ok_or_else(|| {
        Error::Resource(format!(
            "{resource}: missing required column (expected one of {names:?})"
        ))
    })
}

/// A logical text column and the header names it may appear under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    name: String,
    names: Vec<String>,
}

impl Alias {
    pub fn new(name: &str, names: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Alias group holding a single, explicit column name.
    pub fn exact(column: &str) -> Self {
        Self::new(column, &[column])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// A text column found in the input header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    /// position in the input row
    pub index: usize,
    /// header as written in the input file
    pub header: String,
}

/// Resolve every alias group against `headers`, keeping the declared order.
///
/// Groups that match nothing are reported and skipped.
/// Fails with [Error::Resource] naming `resource` if no group matches at all.
pub fn resolve(
    headers: &[String],
    aliases: &[Alias],
    resource: &str,
) -> Result<Vec<ResolvedColumn>, Error> {
    let mut resolved: Vec<ResolvedColumn> = Vec::with_capacity(aliases.len());

    for alias in aliases {
        let names: Vec<&str> = alias.names().iter().map(String::as_str).collect();
        match find_column(headers.iter().map(String::as_str), &names) {
            Some(index) if resolved.iter().any(|c| c.index == index) => {
                warn!(
                    "column {:?} already resolved by another group, skipping {}",
                    headers[index],
                    alias.name()
                );
            }
            Some(index) => {
                debug!("{} resolved to column {:?}", alias.name(), headers[index]);
                resolved.push(ResolvedColumn {
                    index,
                    header: headers[index].trim_start_matches('\u{feff}').to_string(),
                });
            }
            None => warn!("no column found for {} (tried {:?})", alias.name(), alias.names()),
        }
    }

    if resolved.is_empty() {
        return Err(Error::Resource(format!(
            "{resource}: none of the configured text columns were found in header {headers:?}"
        )));
    }

    Ok(resolved)
}

/// Text columns looked for by the service pipeline.
pub fn default_service_aliases() -> Vec<Alias> {
    vec![
        Alias::new("comment", &["Comentario", "comment"]),
        Alias::new(
            "title",
            &["Titulo_Video", "Título_Video", "Título del video", "title"],
        ),
        Alias::new(
            "description",
            &[
                "Descripcion_Video",
                "Descripción_Video",
                "Descripción",
                "description",
            ],
        ),
    ]
}

/// Text columns looked for by the lexicon pipeline: service ones, plus tags.
pub fn default_lexicon_aliases() -> Vec<Alias> {
    let mut aliases = default_service_aliases();
    aliases.push(Alias::new("tags", &["Tags", "tags"]));
    aliases
}
