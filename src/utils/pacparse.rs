//! Parse pacman style package description files (`desc` entries of a db)
use crate::types::{Detail, PackageRecord};
use chrono::{DateTime, TimeZone, Utc};
use nom::{
    bytes::complete::take_till1,
    character::complete::char,
    combinator::eof,
    sequence::{delimited, terminated},
    IResult,
};
use std::collections::HashMap;

/// Section key => value lines
pub type Fields = HashMap<String, Vec<String>>;

/// Parse the key line of a section, like `%NAME%`
fn parse_key(i: &str) -> IResult<&str, &str> {
    terminated(delimited(char('%'), take_till1(|c| c == '%'), char('%')), eof)(i)
}

/// Split a desc file into its sections.
///
/// Never fails: a line starting with `%` opens a section, a blank line
/// closes it. Lines outside of a section and sections with a malformed key
/// line are dropped. A repeated key keeps its last section.
pub fn parse_str(i: &str) -> Fields {
    let mut res = HashMap::new();
    let mut key: Option<&str> = None;
    let mut values = Vec::new();

    let mut flush = |key: &mut Option<&str>, values: &mut Vec<String>| match key.take() {
        Some(k) => {
            res.insert(k.to_owned(), std::mem::take(values));
        }
        None => values.clear(),
    };

    for line in i.lines() {
        if line.is_empty() {
            flush(&mut key, &mut values);
        } else if line.starts_with('%') {
            flush(&mut key, &mut values);
            key = parse_key(line.trim_end()).ok().map(|(_, k)| k);
        } else if key.is_some() {
            values.push(line.to_owned());
        }
    }
    flush(&mut key, &mut values);

    res
}

/// Turn one desc file into a record of `repo`.
///
/// Missing or broken fields are left empty, including NAME: it's up to
/// the caller to throw away nameless records.
pub fn parse_record(block: &str, repo: &str, detail: Detail) -> PackageRecord {
    let mut f = parse_str(block);
    let mut record = PackageRecord {
        name: get_first("NAME", &mut f),
        version: get_first("VERSION", &mut f),
        repo: repo.to_owned(),
        build_date: get_date("BUILDDATE", &mut f),
        packager: get_first("PACKAGER", &mut f),
        ..Default::default()
    };
    if detail == Detail::Long {
        record.description = get_first("DESC", &mut f);
        record.url = get_first("URL", &mut f);
    }

    record
}

fn get_first(name: &str, f: &mut Fields) -> String {
    f.remove(name)
        .and_then(|values| values.into_iter().next())
        .map(|v| v.trim().to_owned())
        .unwrap_or_default()
}

/// Seconds since epoch, negative or garbage means no date
fn get_date(name: &str, f: &mut Fields) -> Option<DateTime<Utc>> {
    let secs: i64 = get_first(name, f).parse().ok()?;
    if secs < 0 {
        return None;
    }
    Utc.timestamp_opt(secs, 0).single()
}
