//! Splitting an encoded filter specification into named arguments.

use std::fmt;

use crate::error::{FilterError, Result};

/// One `name=v1,v2` segment of a filter specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterArg {
    pub name: String,
    pub values: Vec<String>,
}

impl FilterArg {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterArg {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for FilterArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.values.join(","))
    }
}

/// Parses `name=v1,v2;name2=v3` into ordered [`FilterArg`]s.
///
/// The input is the path tail after percent-decoding. A trailing `/` is
/// ignored, `+` stands for a space, and an empty string or the bare word
/// `filter` means no filters. Values are trimmed and empty values dropped.
///
/// ```
/// use schemafilter::{parse_spec, FilterArg};
///
/// let args = parse_spec("by-date=2024-03-01,2024-03-31;by-violation=dead+mice/").unwrap();
/// assert_eq!(
///     args,
///     [
///         FilterArg::new("by-date", ["2024-03-01", "2024-03-31"]),
///         FilterArg::new("by-violation", ["dead mice"]),
///     ]
/// );
/// assert!(parse_spec("filter").unwrap().is_empty());
/// assert!(parse_spec("by-date").is_err());
/// ```
pub fn parse_spec(spec: &str) -> Result<Vec<FilterArg>> {
    let spec = spec.trim_end_matches('/').replace('+', " ");
    if spec.is_empty() || spec == "filter" {
        return Ok(Vec::new());
    }

    let mut args = Vec::new();
    for segment in spec.split(';') {
        if segment.trim().is_empty() {
            continue;
        }
        let (name, values) = segment
            .split_once('=')
            .ok_or_else(|| FilterError::InvalidSegment {
                segment: segment.to_string(),
            })?;
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let values = values
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .collect();
        args.push(FilterArg {
            name: name.to_string(),
            values,
        });
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_specs() {
        for spec in ["", "/", "filter", "filter/"] {
            assert!(parse_spec(spec).unwrap().is_empty(), "{spec:?}");
        }
    }

    #[test]
    fn keeps_segment_order() {
        let args = parse_spec("locations=wards,ward-1;by-date=2024-01-01,2024-01-31").unwrap();
        let names: Vec<&str> = args.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["locations", "by-date"]);
    }

    #[test]
    fn values_are_trimmed_and_empties_dropped() {
        let args = parse_spec(" by-cuisine = thai , ,bakery,").unwrap();
        assert_eq!(args, [FilterArg::new("by-cuisine", ["thai", "bakery"])]);
    }

    #[test]
    fn name_without_values() {
        let args = parse_spec("by-date=").unwrap();
        assert_eq!(args, [FilterArg::new("by-date", Vec::<String>::new())]);
    }

    #[test]
    fn only_first_equals_splits() {
        let args = parse_spec("by-notes=a=b").unwrap();
        assert_eq!(args[0].values, ["a=b"]);
    }

    #[test]
    fn missing_equals_is_an_error() {
        let err = parse_spec("by-date=2024-01-01,2024-01-02;streets").unwrap_err();
        assert!(matches!(err, FilterError::InvalidSegment { segment } if segment == "streets"));
    }

    #[test]
    fn blank_names_and_segments_are_skipped() {
        let args = parse_spec(";=orphan;by-date=2024-01-01,2024-01-01;").unwrap();
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn display_re_encodes() {
        let arg = FilterArg::new("locations", ["zipcodes", "60614"]);
        assert_eq!(arg.to_string(), "locations=zipcodes,60614");
    }
}
