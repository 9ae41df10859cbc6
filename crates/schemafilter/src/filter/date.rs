//! Item-date and publication-date range filters.

use chrono::{Datelike, Days, NaiveDate};

use super::{require, Description, MoreInput, SchemaFilter, DATE_WEIGHT};
use crate::catalog::Catalog;
use crate::context::SharedContext;
use crate::error::{FilterError, Result};
use crate::place::PlaceResolver;
use crate::queryable::{DateField, Queryable};
use crate::settings::FilterRequest;

/// Restricts items to an inclusive range of days.
///
/// ```
/// use schemafilter::{
///     DateField, DateRangeFilter, FilterRequest, FilterSettings, Schema, SchemaFilter,
/// };
///
/// let schema = Schema::new("crime", "Crime", "crime date");
/// let settings = FilterSettings::default();
/// let request = FilterRequest::new(&schema, &settings);
///
/// let args = ["2024-03-01".to_string(), "2024-03-01".to_string()];
/// let filter = DateRangeFilter::new(&request, DateField::ItemDate, &args).unwrap();
/// assert_eq!(filter.description().value, "Mar. 1, 2024");
/// assert_eq!(filter.description().url.as_deref(), Some("by-date=2024-03-01,2024-03-01"));
/// ```
#[derive(Debug, Clone)]
pub struct DateRangeFilter {
    field: DateField,
    range: Option<(NaiveDate, NaiveDate)>,
    description: Description,
}

impl DateRangeFilter {
    /// Parses `[start, end]` as `YYYY-MM-DD` dates. No arguments leaves the
    /// filter incomplete; any other shape is an error.
    pub fn new(request: &FilterRequest<'_>, field: DateField, args: &[String]) -> Result<Self> {
        let label = match field {
            DateField::ItemDate => request.schema.date_name.clone(),
            DateField::PubDate => "date published".to_string(),
        };
        let mut description = Description::labelled(label);

        let range = match args {
            [] => None,
            [start, end] => {
                let invalid = || FilterError::InvalidDateRange {
                    value: args.join(","),
                };
                let start = parse_date(start).ok_or_else(invalid)?;
                let end = parse_date(end).ok_or_else(invalid)?;
                if start > end {
                    return Err(invalid());
                }
                Some((start, end))
            }
            _ => {
                return Err(FilterError::InvalidDateRange {
                    value: args.join(","),
                })
            }
        };

        if let Some((start, end)) = range {
            if start == end {
                description.set_value(format_date(start));
            } else {
                description.set_value(format!("{} \u{2013} {}", format_date(start), format_date(end)));
            }
            description.url = Some(format!(
                "{}={},{}",
                field.arg_name(),
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ));
        }

        Ok(DateRangeFilter {
            field,
            range,
            description,
        })
    }

    pub fn field(&self) -> DateField {
        self.field
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.range.map(|(start, _)| start)
    }

    /// Last day included by the filter.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.range.map(|(_, end)| end)
    }
}

impl SchemaFilter for DateRangeFilter {
    fn key(&self) -> &str {
        "date"
    }

    fn arg_name(&self) -> &str {
        self.field.arg_name()
    }

    fn sort_weight(&self) -> f64 {
        DATE_WEIGHT
    }

    fn is_complete(&self) -> bool {
        self.range.is_some()
    }

    fn description(&self) -> &Description {
        &self.description
    }

    fn validate(&self, _catalog: &dyn Catalog) -> Result<Option<MoreInput>> {
        if self.is_complete() {
            return Ok(None);
        }
        Ok(Some(MoreInput {
            required_field_label: self.description.label.clone(),
            required_field_slug: self.field.arg_name().trim_start_matches("by-").to_string(),
            resubmit_arg_name: self.field.arg_name().to_string(),
            candidates: None,
        }))
    }

    fn apply<Q, R>(
        &mut self,
        _request: &FilterRequest<'_>,
        queryable: Q,
        _context: &mut SharedContext,
        _places: &R,
    ) -> Result<Q>
    where
        Q: Queryable,
        R: PlaceResolver<Q> + ?Sized,
    {
        let (start, end) = *require(self.range.as_ref(), self.arg_name())?;
        // The end date is inclusive; the queryable takes an exclusive bound.
        let end = end
            .checked_add_days(Days::new(1))
            .ok_or_else(|| FilterError::InvalidDateRange {
                value: end.to_string(),
            })?;
        Ok(queryable.date_range(self.field, start, end))
    }
}

/// Parses `Y-M-D` with unpadded components allowed.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split('-').map(|p| p.trim().parse::<i64>().ok());
    let (year, month, day) = (parts.next()??, parts.next()??, parts.next()??);
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )
}

const MONTHS: [&str; 12] = [
    "Jan.", "Feb.", "Mar.", "Apr.", "May", "June", "July", "Aug.", "Sept.", "Oct.", "Nov.", "Dec.",
];

/// `Mar. 1, 2024`
pub(crate) fn format_date(date: NaiveDate) -> String {
    format!("{} {}, {}", MONTHS[date.month0() as usize], date.day(), date.year())
}
